//! The indentation stack: one whitespace prefix per nesting level on the
//! path from the file root down to the current block.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentationDiff {
    Increase,
    Decrease,
    Same,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indentation {
    levels: Vec<String>,
}

impl Indentation {
    pub fn root() -> Indentation {
        Indentation { levels: vec![] }
    }

    /// Classify the leading whitespace of a new line against this stack.
    /// Matching the top is Same, matching an enclosing level is Decrease,
    /// extending the top is Increase, and anything else is an inconsistent
    /// mix of indentation styles.
    pub fn diff(&self, next_whitespace: &str) -> IndentationDiff {
        let top = match self
            .levels
            .last()
        {
            Some(top) => top,
            None => {
                return if next_whitespace.is_empty() {
                    IndentationDiff::Same
                } else {
                    IndentationDiff::Increase
                };
            }
        };
        if next_whitespace == top {
            return IndentationDiff::Same;
        }
        if self
            .levels
            .iter()
            .any(|level| level == next_whitespace)
        {
            return IndentationDiff::Decrease;
        }
        if !next_whitespace.starts_with(top.as_str()) {
            return IndentationDiff::Error;
        }
        IndentationDiff::Increase
    }

    /// A copy of this stack with one more level pushed. Callers carry the
    /// returned value down into nested scans; the receiver is untouched.
    pub fn indent(&self, whitespace: &str) -> Indentation {
        let mut levels = self
            .levels
            .clone();
        levels.push(whitespace.to_string());
        Indentation { levels }
    }
}
