use thiserror::Error;

/// Boxed error returned by user-provided factories and semantics.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Rule '{rule}' expects {expected} children, got {found}")]
    ArityMismatch {
        rule: String,
        expected: usize,
        found: usize,
    },

    #[error("Grammar '{grammar}' already defines a {kind} named '{name}'")]
    DuplicateDefinition {
        grammar: String,
        kind: &'static str,
        name: String,
    },

    #[error("Variable '{0}' is not bound in the evaluation state")]
    UnboundVariable(String),

    #[error("Rule '{0}' has no semantics attached")]
    MissingSemantics(String),

    #[error("Node of kind '{0}' cannot be evaluated")]
    NotEvaluable(&'static str),

    #[error("Rule '{rule}' received an argument of the wrong kind: expected {expected}")]
    ArgumentKind { rule: String, expected: &'static str },

    #[error("Evaluation of rule '{rule}' failed: {message}")]
    Evaluation { rule: String, message: String },
}

pub type TreeResult<T> = Result<T, TreeError>;
