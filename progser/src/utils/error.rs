use progtree::TreeError;
use strum::EnumIs;
use thiserror::Error;

use crate::utils::path::NodePath;

/// What a failed name resolution was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionTarget {
    Rule,
    Symbol,
    Type,
}

impl std::fmt::Display for ResolutionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResolutionTarget::Rule => "rule",
            ResolutionTarget::Symbol => "symbol",
            ResolutionTarget::Type => "type",
        };
        write!(f, "{}", s)
    }
}

fn describe_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("'{}'", name),
        None => "(attribute missing)".to_string(),
    }
}

/// Every way an encode or decode call can fail. All of them abort the whole call.
#[derive(Debug, Error, EnumIs)]
pub enum CodecError {
    #[error("Unsupported {kind} node at {path}: {reason}")]
    Structural {
        kind: String,
        reason: &'static str,
        path: NodePath,
    },

    #[error("Unknown document tag '{tag}' at {path}")]
    UnknownTag { tag: String, path: NodePath },

    #[error("Cannot resolve {target} {} at {path}", describe_name(.name))]
    TypeResolution {
        target: ResolutionTarget,
        name: Option<String>,
        path: NodePath,
    },

    #[error("Cannot parse {text:?} as {expected} at {path}")]
    ValueParse {
        expected: String,
        text: String,
        path: NodePath,
    },

    #[error("Cannot construct value of type '{type_id}' at {path}: {reason}")]
    Construction {
        type_id: String,
        reason: String,
        path: NodePath,
    },

    #[error("Rule '{rule}' rejected its children at {path}: {source}")]
    RuleConstruction {
        rule: String,
        path: NodePath,
        source: TreeError,
    },

    #[error("Malformed '{type_id}' fragment at {path}: {reason}")]
    MalformedFragment {
        type_id: String,
        reason: String,
        path: NodePath,
    },

    #[error("Nested program at {path} cannot be decoded without a grammar")]
    MissingGrammarContext { path: NodePath },

    #[error("Value of type '{type_name}' at {path} is not serializable")]
    Unserializable { type_name: String, path: NodePath },

    #[error("No handler registered for type '{type_id}' at {path}")]
    UnknownType { type_id: String, path: NodePath },

    #[error("List at {path} declares elements of type '{expected}' but holds '{found}'")]
    HeterogeneousList {
        expected: String,
        found: String,
        path: NodePath,
    },

    #[error("Type identifier '{type_id}' is already registered or reserved")]
    DuplicateType { type_id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    ConfigParse {
        source: toml::de::Error,
        file: String,
    },

    #[error("Malformed XML document: {message}")]
    Xml { message: String },
}

impl CodecError {
    /// Location of the failing node, for errors raised during a tree walk.
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            CodecError::Structural { path, .. }
            | CodecError::UnknownTag { path, .. }
            | CodecError::TypeResolution { path, .. }
            | CodecError::ValueParse { path, .. }
            | CodecError::Construction { path, .. }
            | CodecError::RuleConstruction { path, .. }
            | CodecError::MalformedFragment { path, .. }
            | CodecError::MissingGrammarContext { path }
            | CodecError::Unserializable { path, .. }
            | CodecError::UnknownType { path, .. }
            | CodecError::HeterogeneousList { path, .. } => Some(path),
            CodecError::DuplicateType { .. }
            | CodecError::Io(_)
            | CodecError::ConfigParse { .. }
            | CodecError::Xml { .. } => None,
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
