use std::{collections::HashMap, fmt::Write};

enum PathSegment {
    Index(usize),
    Property(String),
}

/// Accumulates the diagnostic rendering of a glue graph.
///
/// Tracks the path from the root to the node being rendered. A node reached
/// a second time is written as `"~<path>"`, pointing at its first
/// occurrence, which also keeps cyclic graphs finite.
#[derive(Default)]
pub struct DescriptionBuilder {
    output: String,
    path: Vec<PathSegment>,
    seen: HashMap<usize, String>,
}

impl DescriptionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn append_quoted(&mut self, text: &str) {
        self.output.push('"');
        for c in text.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if c.is_control() => {
                    let _ = write!(self.output, "\\u{:04x}", c as u32);
                }
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }

    pub fn with_index<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(PathSegment::Index(index));
        let result = f(self);
        self.path.pop();
        result
    }

    pub fn with_property<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(PathSegment::Property(name.to_string()));
        let result = f(self);
        self.path.pop();
        result
    }

    /// Path of the node currently being rendered, empty at the root.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Index(index) => {
                    let _ = write!(path, "[{}]", index);
                }
                PathSegment::Property(name) => {
                    let _ = write!(path, ".{}", name);
                }
            }
        }
        path
    }

    /// Records a visit of the node identified by `key`. Returns false, after
    /// writing a reference, if the node was already rendered.
    pub(crate) fn enter(&mut self, key: usize) -> bool {
        if let Some(first_path) = self.seen.get(&key) {
            let reference = format!("~{}", first_path);
            self.append_quoted(&reference);
            return false;
        }
        let path = self.path();
        self.seen.insert(key, path);
        true
    }

    pub fn finish(self) -> String {
        self.output
    }
}
