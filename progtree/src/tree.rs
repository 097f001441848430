//! In-memory program trees.
use std::sync::Arc;

use strum::{EnumIs, IntoStaticStr};

use crate::{
    grammar::{Rule, Symbol},
    value::DynamicValue,
};

/// Application of a grammar rule to its children.
#[derive(Debug, Clone, PartialEq)]
pub struct NonTerminal {
    pub rule: Arc<Rule>,
    pub children: Vec<ProgramTree>,
}

/// A constant payload attached to a literal symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub symbol: Arc<Symbol>,
    pub value: DynamicValue,
}

/// A reference to a symbol bound at execution time.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub symbol: Arc<Symbol>,
}

/// An unfilled position of a partial program.
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    pub symbol: Arc<Symbol>,
}

/// An anonymous function over `parameter`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub parameter: Arc<Symbol>,
    pub body: Box<ProgramTree>,
}

/// A local binding of `variable` to `binding` inside `body`.
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub variable: Arc<Symbol>,
    pub binding: Box<ProgramTree>,
    pub body: Box<ProgramTree>,
}

/// A synthesized program.
///
/// Only [`ProgramTree::NonTerminal`], [`ProgramTree::Literal`] and
/// [`ProgramTree::Variable`] are fully supported. [`ProgramTree::Terminal`] is the
/// abstract base of leaves and exists only so it can be rejected; `Hole`, `Lambda` and
/// `Let` are placeholders for partial and higher-order programs.
#[derive(Debug, Clone, PartialEq, EnumIs, IntoStaticStr)]
pub enum ProgramTree {
    NonTerminal(NonTerminal),
    Literal(Literal),
    Variable(Variable),
    Terminal(Arc<Symbol>),
    Hole(Hole),
    Lambda(Lambda),
    Let(Let),
}

impl ProgramTree {
    pub fn literal(symbol: &Arc<Symbol>, value: impl Into<DynamicValue>) -> Self {
        ProgramTree::Literal(Literal {
            symbol: Arc::clone(symbol),
            value: value.into(),
        })
    }

    pub fn variable(symbol: &Arc<Symbol>) -> Self {
        ProgramTree::Variable(Variable {
            symbol: Arc::clone(symbol),
        })
    }

    /// Name of the variant, e.g. `"NonTerminal"`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Direct sub-trees, in order. Payload trees nested inside literal values are
    /// not included.
    pub fn children(&self) -> Vec<&ProgramTree> {
        match self {
            ProgramTree::NonTerminal(nt) => nt.children.iter().collect(),
            ProgramTree::Lambda(lambda) => vec![&lambda.body],
            ProgramTree::Let(let_) => vec![&let_.binding, &let_.body],
            ProgramTree::Literal(_)
            | ProgramTree::Variable(_)
            | ProgramTree::Terminal(_)
            | ProgramTree::Hole(_) => Vec::new(),
        }
    }

    /// Depth of the tree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(ProgramTree::depth)
            .max()
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(ProgramTree::node_count)
            .sum::<usize>()
    }
}

impl std::fmt::Display for ProgramTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramTree::NonTerminal(nt) => {
                write!(f, "{}(", nt.rule)?;
                for (i, child) in nt.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            ProgramTree::Literal(lit) => write!(f, "{}:{}", lit.symbol, lit.value),
            ProgramTree::Variable(var) => write!(f, "{}", var.symbol),
            ProgramTree::Terminal(symbol) => write!(f, "<terminal {}>", symbol),
            ProgramTree::Hole(hole) => write!(f, "?{}", hole.symbol),
            ProgramTree::Lambda(lambda) => write!(f, "\\{} => {}", lambda.parameter, lambda.body),
            ProgramTree::Let(let_) => write!(
                f,
                "let {} = {} in {}",
                let_.variable, let_.binding, let_.body
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::SymbolKind;

    #[test]
    fn display_and_shape() {
        let k = Arc::new(Symbol::new("k", SymbolKind::Literal));
        let v = Arc::new(Symbol::new("v", SymbolKind::Input));
        let rule = Arc::new(Rule::new("Pick", 2));
        let tree = rule
            .construct(vec![ProgramTree::variable(&v), ProgramTree::literal(&k, 3i32)])
            .unwrap();

        assert_eq!(tree.to_string(), "Pick(v, k:3)");
        assert_eq!(tree.kind(), "NonTerminal");
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn unsupported_kinds_report_their_name() {
        let x = Arc::new(Symbol::new("x", SymbolKind::Literal));
        let hole = ProgramTree::Hole(Hole {
            symbol: Arc::clone(&x),
        });
        let lambda = ProgramTree::Lambda(Lambda {
            parameter: Arc::clone(&x),
            body: Box::new(hole.clone()),
        });
        assert_eq!(hole.kind(), "Hole");
        assert_eq!(lambda.kind(), "Lambda");
        assert_eq!(lambda.depth(), 2);
    }
}
