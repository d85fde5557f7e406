//! taxscan: an indentation-sensitive scanner for a small scripting notation.
//!
//! Raw source lines go in, a taxonomy tree comes out: a file is a routine, a
//! routine is a sequence of instructions, and an instruction may carry
//! multi-line input or nested branches depending on what the consulted state
//! machine says about its name.

pub mod language;
pub mod machine;
pub mod problem;
pub mod scanning;
