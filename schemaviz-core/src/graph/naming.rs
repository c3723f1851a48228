//! Naming rules for tables, edge columns and generated constraint names.

/// Converts an entity name to snake_case (`UserProfile` -> `user_profile`).
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len().saturating_add(4));

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev_lower = i > 0 && chars.get(i.saturating_sub(1)).is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
            let next_lower = chars.get(i.saturating_add(1)).is_some_and(char::is_ascii_lowercase);
            let prev_upper = i > 0 && chars.get(i.saturating_sub(1)).is_some_and(char::is_ascii_uppercase);
            if !out.is_empty() && !out.ends_with('_') && (prev_lower || (prev_upper && next_lower)) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '-' || c == ' ' {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// Pluralizes a snake_case word with English suffix rules.
pub fn pluralize(word: &str) -> String {
    const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

    if word.is_empty() {
        return String::new();
    }

    if let Some(stem) = word.strip_suffix('y')
        && !stem.ends_with(VOWELS)
        && !stem.is_empty()
    {
        return format!("{}ies", stem);
    }

    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{}es", word);
    }

    format!("{}s", word)
}

/// Default table name for an entity (`User` -> `users`).
pub fn table_name(entity: &str) -> String {
    pluralize(&snake_case(entity))
}

/// Column holding the foreign key of a belongs-to edge.
pub fn edge_column(edge: &str) -> String {
    format!("{}_id", snake_case(edge))
}

/// Foreign key symbol for an edge column.
pub fn foreign_key_symbol(table: &str, ref_table: &str, edge: &str) -> String {
    format!("{}_{}_{}", table, ref_table, snake_case(edge))
}

/// Default name of a composite index.
pub fn index_name(table: &str, columns: &[String]) -> String {
    format!("{}_{}", table, columns.join("_"))
}
