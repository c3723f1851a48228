//! Minimal HCL document writer.
//!
//! Only what schema documents need: labelled blocks, attributes whose values
//! are pre-rendered expressions, and `=` alignment across each run of
//! consecutive attribute lines.

/// One body entry: an attribute or a nested block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// `key = expr`
    Attr {
        /// Attribute name
        key: String,
        /// Pre-rendered value
        expr: String,
    },
    /// Nested block
    Block(Block),
}

/// A labelled HCL block, e.g. `table "users" { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block type, e.g. `table`
    pub kind: String,
    /// Quoted labels after the type
    pub labels: Vec<String>,
    /// Entries in write order
    pub body: Vec<Entry>,
}

impl Block {
    /// Creates an unlabelled, empty block.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            labels: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Creates a block with a single label.
    pub fn labelled(kind: impl Into<String>, label: impl Into<String>) -> Self {
        let mut block = Self::new(kind);
        block.labels.push(label.into());
        block
    }

    /// Appends an attribute; `expr` is written verbatim.
    pub fn attr(&mut self, key: impl Into<String>, expr: impl Into<String>) -> &mut Self {
        self.body.push(Entry::Attr {
            key: key.into(),
            expr: expr.into(),
        });
        self
    }

    /// Appends a nested block.
    pub fn block(&mut self, block: Self) -> &mut Self {
        self.body.push(Entry::Block(block));
        self
    }

    fn write(&self, out: &mut String, depth: usize) {
        indent(out, depth);
        out.push_str(&self.kind);
        for label in &self.labels {
            out.push(' ');
            out.push_str(&quote(label));
        }
        out.push_str(" {\n");

        let inner = depth.saturating_add(1);
        let mut i = 0;
        while let Some(entry) = self.body.get(i) {
            match entry {
                Entry::Block(block) => {
                    block.write(out, inner);
                    i = i.saturating_add(1);
                }
                Entry::Attr { .. } => {
                    let run: Vec<(&str, &str)> = self.body[i..]
                        .iter()
                        .map_while(|e| match e {
                            Entry::Attr { key, expr } => Some((key.as_str(), expr.as_str())),
                            Entry::Block(_) => None,
                        })
                        .collect();
                    let width = run.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
                    for (key, expr) in &run {
                        indent(out, inner);
                        out.push_str(&format!("{:<width$} = {}\n", key, expr, width = width));
                    }
                    i = i.saturating_add(run.len());
                }
            }
        }

        indent(out, depth);
        out.push_str("}\n");
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Renders top-level blocks into a document.
pub fn write_document(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        block.write(&mut out, 0);
    }
    out
}

/// Quotes a string literal, escaping HCL special sequences.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len().saturating_add(2));
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders a list expression.
pub fn list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let rendered: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

/// Renders a `sql("...")` call for raw SQL.
pub fn sql(raw: &str) -> String {
    format!("sql({})", quote(raw))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Reference to an object by kind and name, e.g. `column.id` or `column["my col"]`.
pub fn reference(kind: &str, name: &str) -> String {
    if is_identifier(name) {
        format!("{}.{}", kind, name)
    } else {
        format!("{}[{}]", kind, quote(name))
    }
}
