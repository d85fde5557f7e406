//! The taxonomy tree produced by scanning, and the per-instruction strategy
//! the state machine reports back to the scanner.

use std::fmt;

use serde::Serialize;

use super::error::CompilationError;
use super::line::Line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrat {
    Value,
    Command,
    Branch,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFunction {
    /// The instruction does not open a block at all.
    None,
    /// Indented lines below the instruction become its multi-line input.
    Append,
    /// Indented lines below the instruction form a nested routine.
    Routine,
}

/// What the state machine knows about one instruction name: how to parse
/// it, whether it opens a block, and which keywords introduce alternate
/// branches (only meaningful for Branch instructions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxStrat {
    pub parse_strat: ParseStrat,
    pub block_function: BlockFunction,
    pub branch_instr: Vec<String>,
}

pub fn value_strat() -> TaxStrat {
    TaxStrat {
        parse_strat: ParseStrat::Value,
        block_function: BlockFunction::None,
        branch_instr: vec![],
    }
}

pub fn command_strat() -> TaxStrat {
    TaxStrat {
        parse_strat: ParseStrat::Command,
        block_function: BlockFunction::Append,
        branch_instr: vec![],
    }
}

pub fn branch_strat(branch_instr: &[&str]) -> TaxStrat {
    TaxStrat {
        parse_strat: ParseStrat::Branch,
        block_function: BlockFunction::Routine,
        branch_instr: branch_instr
            .iter()
            .map(|instr| instr.to_string())
            .collect(),
    }
}

pub fn custom_strat(block_function: BlockFunction) -> TaxStrat {
    TaxStrat {
        parse_strat: ParseStrat::Custom,
        block_function,
        branch_instr: vec![],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionTaxonomy {
    /// The instruction's first word.
    pub name: String,
    /// The instruction's argument text, possibly spanning several source
    /// lines when the instruction appends a block.
    pub input: Vec<Line>,
    pub branches: Vec<BranchTaxonomy>,
}

impl InstructionTaxonomy {
    pub fn branch(&mut self, default_branch: bool, input: Line) -> &mut BranchTaxonomy {
        self.branches
            .push(BranchTaxonomy {
                default_branch,
                input,
                routine: RoutineTaxonomy::default(),
            });
        self.branches
            .last_mut()
            .expect("branch was just pushed")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchTaxonomy {
    /// True for the primary block, false for each else-like alternate.
    pub default_branch: bool,
    /// The branch header's trailing text, e.g. `if false` of an
    /// `else if false`. Empty for the default branch.
    pub input: Line,
    pub routine: RoutineTaxonomy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoutineTaxonomy {
    pub instructions: Vec<InstructionTaxonomy>,
}

impl RoutineTaxonomy {
    pub fn append(&mut self, line: &Line) -> &mut InstructionTaxonomy {
        self.instructions
            .push(InstructionTaxonomy {
                name: line
                    .first_word()
                    .to_string(),
                input: vec![line.crop_from_first_word()],
                branches: vec![],
            });
        self.instructions
            .last_mut()
            .expect("instruction was just pushed")
    }
}

/// The terminal result of scanning one file: either a populated routine
/// tree, or the errors that stopped the scan. By convention exactly one of
/// the two is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTaxonomy {
    pub routine: RoutineTaxonomy,
    pub errors: Vec<CompilationError>,
}

impl FileTaxonomy {
    pub fn empty() -> FileTaxonomy {
        FileTaxonomy {
            routine: RoutineTaxonomy::default(),
            errors: vec![],
        }
    }

    pub fn failed(errors: Vec<CompilationError>) -> FileTaxonomy {
        FileTaxonomy {
            routine: RoutineTaxonomy::default(),
            errors,
        }
    }

    pub fn is_failed(&self) -> bool {
        !self
            .errors
            .is_empty()
    }
}

fn pad(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        write!(f, "  ")?;
    }
    Ok(())
}

fn write_routine(f: &mut fmt::Formatter<'_>, routine: &RoutineTaxonomy, depth: usize) -> fmt::Result {
    for instruction in &routine.instructions {
        pad(f, depth)?;
        write!(f, "{}", instruction.name)?;
        for line in &instruction.input {
            write!(f, " `{}`", line.raw())?;
        }
        writeln!(f)?;
        for branch in &instruction.branches {
            pad(f, depth)?;
            if branch.default_branch {
                writeln!(f, "+ branch")?;
            } else {
                writeln!(f, "+ branch `{}`", branch.input.raw())?;
            }
            write_routine(f, &branch.routine, depth + 1)?;
        }
    }
    Ok(())
}

impl fmt::Display for RoutineTaxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_routine(f, self, 0)
    }
}

impl fmt::Display for FileTaxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_failed() {
            for error in &self.errors {
                writeln!(f, "line {}: {}", error.line_num(), error.message())?;
            }
            return Ok(());
        }
        write_routine(f, &self.routine, 0)
    }
}
