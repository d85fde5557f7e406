use std::{fmt, path::Path};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError<'i> {
    pub problem: String,
    pub details: String,
    pub filename: &'i Path,
}

impl<'i> fmt::Display for LoadingError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.problem, self.details)
    }
}

/// The ways a scan can fail. Each variant carries the 1-based line number
/// the diagnostic points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CompilationError {
    InvalidIndentation(usize),
    InstructionDoesNotAcceptBlock(usize),
    UnknownInstruction(usize, String),
}

impl CompilationError {
    pub fn line_num(&self) -> usize {
        match self {
            CompilationError::InvalidIndentation(line_num) => *line_num,
            CompilationError::InstructionDoesNotAcceptBlock(line_num) => *line_num,
            CompilationError::UnknownInstruction(line_num, _) => *line_num,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CompilationError::InvalidIndentation(_) => {
                "indentation does not match any enclosing level".to_string()
            }
            CompilationError::InstructionDoesNotAcceptBlock(_) => {
                "the previous instruction does not open a block, place this line on the same level"
                    .to_string()
            }
            CompilationError::UnknownInstruction(_, name) => {
                format!("unknown instruction `{}`", name)
            }
        }
    }
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_num(), self.message())
    }
}
