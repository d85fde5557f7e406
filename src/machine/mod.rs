//! The state machine the scanner consults: one strategy lookup per
//! instruction name.

use std::collections::HashMap;

use crate::language::TaxStrat;

mod commands;

pub use commands::*;

/// The scanner's narrow view of instruction-name policy. Must answer
/// consistently for the duration of one file scan.
pub trait StateMachine {
    /// The parse strategy for an instruction name, or None when the name
    /// does not resolve.
    fn tax_strat(&self, instr_name: &str) -> Option<TaxStrat>;
}

/// A map-backed state machine, for embedders and tests.
#[derive(Debug, Clone, Default)]
pub struct TableStateMachine {
    strategies: HashMap<String, TaxStrat>,
}

impl TableStateMachine {
    pub fn new() -> TableStateMachine {
        TableStateMachine {
            strategies: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, tax_strat: TaxStrat) {
        self.strategies
            .insert(name.to_string(), tax_strat);
    }
}

impl StateMachine for TableStateMachine {
    fn tax_strat(&self, instr_name: &str) -> Option<TaxStrat> {
        self.strategies
            .get(instr_name)
            .cloned()
    }
}
