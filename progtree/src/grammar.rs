//! Grammar definitions and the name-resolution interface consumed by the codec.
//!
//! The codec treats a grammar as an opaque [`GrammarAdapter`]: it only ever asks for a
//! rule or a symbol by name. [`Grammar`] is a small in-memory implementation, built
//! with [`GrammarBuilder`], that is sufficient to construct and execute program trees.
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    error::{TreeError, TreeResult},
    eval::State,
    tree::{NonTerminal, ProgramTree},
    value::DynamicValue,
};

/// Semantic function attached to a rule. Receives the evaluation state and the
/// already-evaluated children, in order.
pub type Semantics = fn(&State, &[DynamicValue]) -> TreeResult<DynamicValue>;

/// Role a symbol plays in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolKind {
    /// The program input, bound in the [`State`] at execution time.
    Input,
    /// A position holding a constant payload.
    Literal,
    /// A position produced by a rule.
    Nonterminal,
}

/// A grammar symbol, labelling a position in a program tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A grammar production with a fixed number of child slots.
#[derive(Clone)]
pub struct Rule {
    pub name: String,
    pub arity: usize,
    pub semantics: Option<Semantics>,
}

impl Rule {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
            semantics: None,
        }
    }

    pub fn with_semantics(mut self, semantics: Semantics) -> Self {
        self.semantics = Some(semantics);
        self
    }

    /// Build a [`ProgramTree::NonTerminal`] applying this rule to `children`.
    ///
    /// Fails with [`TreeError::ArityMismatch`] if the number of children differs from
    /// the rule's arity.
    pub fn construct(self: &Arc<Self>, children: Vec<ProgramTree>) -> TreeResult<ProgramTree> {
        if children.len() != self.arity {
            return Err(TreeError::ArityMismatch {
                rule: self.name.clone(),
                expected: self.arity,
                found: children.len(),
            });
        }

        Ok(ProgramTree::NonTerminal(NonTerminal {
            rule: Arc::clone(self),
            children,
        }))
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("semantics", &self.semantics.is_some())
            .finish()
    }
}

// Semantics are function pointers and carry no identity of their own: two rules are
// the same rule when they share a name and an arity.
impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}

impl Eq for Rule {}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Name-resolution service over a grammar.
///
/// Implementations are populated by whatever compiles the grammar; the codec only
/// reads from them.
pub trait GrammarAdapter {
    /// Human-readable grammar name, used in diagnostics.
    fn name(&self) -> &str;

    fn resolve_rule(&self, name: &str) -> Option<Arc<Rule>>;

    fn resolve_symbol(&self, name: &str) -> Option<Arc<Symbol>>;
}

/// In-memory grammar: named symbols and rules.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    input_symbol: Option<Arc<Symbol>>,
    symbols: BTreeMap<String, Arc<Symbol>>,
    rules: BTreeMap<String, Arc<Rule>>,
}

impl Grammar {
    pub fn builder(name: impl Into<String>) -> GrammarBuilder {
        GrammarBuilder {
            grammar: Grammar {
                name: name.into(),
                input_symbol: None,
                symbols: BTreeMap::new(),
                rules: BTreeMap::new(),
            },
        }
    }

    /// The symbol bound to the program input, if the grammar declares one.
    pub fn input_symbol(&self) -> Option<&Arc<Symbol>> {
        self.input_symbol.as_ref()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Arc<Symbol>> {
        self.symbols.values()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.values()
    }

    /// Lookup that panics on unknown names, for building fixtures.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn rule(&self, name: &str) -> Arc<Rule> {
        self.resolve_rule(name)
            .unwrap_or_else(|| panic!("rule '{}' is not defined in '{}'", name, self.name))
    }

    /// Lookup that panics on unknown names, for building fixtures.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn symbol(&self, name: &str) -> Arc<Symbol> {
        self.resolve_symbol(name)
            .unwrap_or_else(|| panic!("symbol '{}' is not defined in '{}'", name, self.name))
    }
}

impl GrammarAdapter for Grammar {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_rule(&self, name: &str) -> Option<Arc<Rule>> {
        self.rules.get(name).cloned()
    }

    fn resolve_symbol(&self, name: &str) -> Option<Arc<Symbol>> {
        self.symbols.get(name).cloned()
    }
}

/// Incremental constructor for [`Grammar`].
pub struct GrammarBuilder {
    grammar: Grammar,
}

impl GrammarBuilder {
    pub fn symbol(mut self, name: impl Into<String>, kind: SymbolKind) -> TreeResult<Self> {
        let symbol = Arc::new(Symbol::new(name, kind));
        if self.grammar.symbols.contains_key(&symbol.name) {
            return Err(TreeError::DuplicateDefinition {
                grammar: self.grammar.name.clone(),
                kind: "symbol",
                name: symbol.name.clone(),
            });
        }

        if kind == SymbolKind::Input && self.grammar.input_symbol.is_none() {
            self.grammar.input_symbol = Some(Arc::clone(&symbol));
        }
        self.grammar.symbols.insert(symbol.name.clone(), symbol);
        Ok(self)
    }

    pub fn rule(mut self, rule: Rule) -> TreeResult<Self> {
        if self.grammar.rules.contains_key(&rule.name) {
            return Err(TreeError::DuplicateDefinition {
                grammar: self.grammar.name.clone(),
                kind: "rule",
                name: rule.name,
            });
        }

        self.grammar.rules.insert(rule.name.clone(), Arc::new(rule));
        Ok(self)
    }

    pub fn build(self) -> Grammar {
        self.grammar
    }
}
