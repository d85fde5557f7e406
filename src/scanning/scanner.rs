//! The block, branch, and routine scanners: the recursive walk that turns a
//! flat list of tokenized lines into a taxonomy tree.

use tracing::debug;

use crate::language::{
    command_strat, BlockFunction, CompilationError, FileTaxonomy, Indentation, IndentationDiff,
    InstructionTaxonomy, Line, RoutineTaxonomy, TaxStrat,
};
use crate::machine::StateMachine;

/// What to do when the state machine cannot resolve an instruction name at
/// a block decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownPolicy {
    /// Treat the name as a command invocation that appends its block.
    #[default]
    AssumeCommand,
    /// Fail the scan with an UnknownInstruction error.
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub unknown_instructions: UnknownPolicy,
}

/// Scan a whole file's worth of raw lines into a taxonomy. The result
/// either carries the complete tree or the error that stopped the scan,
/// never both.
pub fn scan_file(
    lines_raw: &[&str],
    machine: &dyn StateMachine,
    options: ScanOptions,
) -> FileTaxonomy {
    let lines = crate::language::tokenize_lines(lines_raw);
    let mut file = FileTaxonomy::empty();
    let errors = scan_routine(
        &lines,
        &Indentation::root(),
        &mut file.routine,
        machine,
        options,
    );
    if !errors.is_empty() {
        return FileTaxonomy::failed(errors);
    }
    file
}

/// Whether the scanner is inside a `#<` ... `>#` comment. Threaded as a
/// plain value so sibling scans always start outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentState {
    Outside,
    Inside,
}

fn skip_line(line: &Line, state: CommentState) -> (bool, CommentState) {
    if line.only_whitespace() {
        return (true, state);
    }
    match state {
        CommentState::Inside => {
            if line.ends_with_symbol_seq(">#") {
                (true, CommentState::Outside)
            } else {
                (true, CommentState::Inside)
            }
        }
        CommentState::Outside => {
            if line.starts_with_symbol_seq("#<") {
                (true, CommentState::Inside)
            } else if line.starts_with_symbol_seq("#") {
                (true, CommentState::Outside)
            } else {
                (false, CommentState::Outside)
            }
        }
    }
}

/// The first line at or after `from` that is not a blank or a comment,
/// simulating the comment state forward from `state`. Peeking never
/// consumes; the main loops re-skip the same lines themselves.
fn peek_content(lines: &[Line], from: usize, state: CommentState) -> Option<&Line> {
    let mut state = state;
    for line in &lines[from.min(lines.len())..] {
        let (skip, next) = skip_line(line, state);
        state = next;
        if !skip {
            return Some(line);
        }
    }
    None
}

struct BlockResult {
    lines: Vec<Line>,
    resume_at: usize,
    errors: Vec<CompilationError>,
}

struct BranchResult {
    resume_at: usize,
    errors: Vec<CompilationError>,
}

/// Walk one routine at the given indentation level, appending each
/// non-skipped line as an instruction and recursing into nested blocks.
/// The first error anywhere aborts the whole scan.
fn scan_routine(
    lines: &[Line],
    indentation: &Indentation,
    routine: &mut RoutineTaxonomy,
    machine: &dyn StateMachine,
    options: ScanOptions,
) -> Vec<CompilationError> {
    let mut comments = CommentState::Outside;
    let mut idx = 0;
    while idx < lines.len() {
        let line = &lines[idx];
        let (skip, next) = skip_line(line, comments);
        comments = next;
        if skip {
            idx += 1;
            continue;
        }

        let instr = routine.append(line);

        // Peek past comments and blanks at the next content line's leading
        // whitespace to learn whether a block opens under this instruction.
        let next_line = match peek_content(lines, idx + 1, comments) {
            Some(next_line) => next_line,
            None => break,
        };
        let next_line_num = next_line.line_num;
        let starting_whitespace = next_line
            .starting_whitespace()
            .to_string();
        match indentation.diff(&starting_whitespace) {
            IndentationDiff::Same | IndentationDiff::Decrease => {
                idx += 1;
                continue;
            }
            IndentationDiff::Error => {
                debug!("inconsistent indentation after {}", line.raw());
                return vec![CompilationError::InvalidIndentation(next_line_num)];
            }
            IndentationDiff::Increase => {}
        }

        let tax_strat = match machine.tax_strat(&instr.name) {
            Some(tax_strat) => tax_strat,
            None => match options.unknown_instructions {
                UnknownPolicy::AssumeCommand => command_strat(),
                UnknownPolicy::Reject => {
                    return vec![CompilationError::UnknownInstruction(
                        line.line_num,
                        instr
                            .name
                            .clone(),
                    )];
                }
            },
        };
        if tax_strat.block_function == BlockFunction::None {
            return vec![CompilationError::InstructionDoesNotAcceptBlock(
                next_line_num,
            )];
        }

        let result = scan_block(lines, idx + 1, indentation);
        if !result
            .errors
            .is_empty()
        {
            return result.errors;
        }

        if tax_strat.block_function == BlockFunction::Append {
            let mut input: Vec<Line> = result
                .lines
                .iter()
                .map(|block_line| block_line.trim())
                .collect();
            let first_input = line.crop_from_first_word();
            if !first_input.empty() {
                input.insert(0, first_input);
            }
            instr.input = input;
            idx = result.resume_at + 1;
            continue;
        }

        // We must be in a routine block: the default branch holds the
        // nested body, then any else-like headers chain further branches.
        let branch = instr.branch(true, Line::from_tokens(0, vec![]));
        let deeper = indentation.indent(&starting_whitespace);
        let errors = scan_routine(&result.lines, &deeper, &mut branch.routine, machine, options);
        if !errors.is_empty() {
            return errors;
        }

        let branch_result = scan_branches(
            lines,
            result.resume_at,
            &tax_strat,
            indentation,
            instr,
            machine,
            options,
        );
        if !branch_result
            .errors
            .is_empty()
        {
            return branch_result.errors;
        }
        idx = branch_result.resume_at + 1;
    }
    vec![]
}

/// Walk the candidate branch headers immediately following a closed routine
/// block, chaining an alternate branch for each one whose body is
/// non-empty.
fn scan_branches(
    lines: &[Line],
    from: usize,
    tax_strat: &TaxStrat,
    indentation: &Indentation,
    instr: &mut InstructionTaxonomy,
    machine: &dyn StateMachine,
    options: ScanOptions,
) -> BranchResult {
    let mut comments = CommentState::Outside;
    let mut idx = from;
    while idx + 1 < lines.len() {
        let next_line = &lines[idx + 1];
        let (skip, next) = skip_line(next_line, comments);
        comments = next;
        if skip {
            idx += 1;
            continue;
        }

        let next_instr_is_branch = tax_strat
            .branch_instr
            .iter()
            .any(|name| name == next_line.first_word());
        if !next_instr_is_branch {
            return BranchResult {
                resume_at: idx,
                errors: vec![],
            };
        }

        let result = scan_block(lines, idx + 2, indentation);
        if !result
            .errors
            .is_empty()
        {
            return BranchResult {
                resume_at: lines.len(),
                errors: result.errors,
            };
        }
        // The block scan already consumed everything belonging to this
        // header; the next candidate header sits right after its resume
        // position.
        idx = result.resume_at;
        if result
            .lines
            .is_empty()
        {
            // A header with no body is discarded, not an error.
            continue;
        }

        let branch = instr.branch(false, next_line.crop_from_first_word());
        let deeper = indentation.indent(
            result.lines[0]
                .starting_whitespace(),
        );
        let errors = scan_routine(&result.lines, &deeper, &mut branch.routine, machine, options);
        if !errors.is_empty() {
            return BranchResult {
                resume_at: lines.len(),
                errors,
            };
        }
    }
    BranchResult {
        resume_at: lines.len(),
        errors: vec![],
    }
}

/// Capture the contiguous indented region starting at `starting_from`. The
/// block ends implicitly on a dedent (the boundary line is left for the
/// caller to re-examine) or explicitly on a bare `end` at the same level
/// (consumed).
fn scan_block(lines: &[Line], starting_from: usize, indentation: &Indentation) -> BlockResult {
    let mut block = Vec::new();
    let mut comments = CommentState::Outside;
    for idx in starting_from..lines.len() {
        let line = &lines[idx];
        let (skip, next) = skip_line(line, comments);
        comments = next;
        if skip {
            continue;
        }
        match indentation.diff(line.starting_whitespace()) {
            IndentationDiff::Error => {
                return BlockResult {
                    lines: block,
                    resume_at: idx - 1,
                    errors: vec![CompilationError::InvalidIndentation(line.line_num)],
                };
            }
            IndentationDiff::Increase => {
                block.push(line.clone());
            }
            IndentationDiff::Decrease => {
                return BlockResult {
                    lines: block,
                    resume_at: idx - 1,
                    errors: vec![],
                };
            }
            IndentationDiff::Same => {
                if line.first_word() != "end" {
                    return BlockResult {
                        lines: block,
                        resume_at: idx - 1,
                        errors: vec![],
                    };
                }
                return BlockResult {
                    lines: block,
                    resume_at: idx,
                    errors: vec![],
                };
            }
        }
    }
    BlockResult {
        lines: block,
        resume_at: lines.len(),
        errors: vec![],
    }
}
