//! Execution of program trees against an input state.
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    error::{TreeError, TreeResult},
    grammar::Symbol,
    tree::ProgramTree,
    value::DynamicValue,
};

/// Bindings of symbols to values for one execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    bindings: BTreeMap<String, DynamicValue>,
}

impl State {
    /// State binding only the program input.
    pub fn for_input(symbol: &Arc<Symbol>, value: impl Into<DynamicValue>) -> Self {
        let mut state = Self::default();
        state.bind(symbol, value);
        state
    }

    pub fn bind(
        &mut self,
        symbol: &Symbol,
        value: impl Into<DynamicValue>,
    ) -> Option<DynamicValue> {
        self.bindings.insert(symbol.name.clone(), value.into())
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&DynamicValue> {
        self.bindings.get(&symbol.name)
    }

    /// Lookup by symbol name.
    pub fn get_by_name(&self, name: &str) -> Option<&DynamicValue> {
        self.bindings.get(name)
    }
}

impl ProgramTree {
    /// Execute the program on `state`.
    pub fn invoke(&self, state: &State) -> TreeResult<DynamicValue> {
        match self {
            ProgramTree::Literal(lit) => Ok(lit.value.clone()),
            ProgramTree::Variable(var) => state
                .get(&var.symbol)
                .cloned()
                .ok_or_else(|| TreeError::UnboundVariable(var.symbol.name.clone())),
            ProgramTree::NonTerminal(nt) => {
                let semantics = nt
                    .rule
                    .semantics
                    .ok_or_else(|| TreeError::MissingSemantics(nt.rule.name.clone()))?;

                let args = nt
                    .children
                    .iter()
                    .map(|child| child.invoke(state))
                    .collect::<TreeResult<Vec<_>>>()?;

                semantics(state, &args)
            }
            ProgramTree::Terminal(_)
            | ProgramTree::Hole(_)
            | ProgramTree::Lambda(_)
            | ProgramTree::Let(_) => Err(TreeError::NotEvaluable(self.kind())),
        }
    }
}
