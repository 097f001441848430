//! Tags, attribute names and reserved type tokens of the document format.

/// Tag of a rule application.
pub const TAG_NONTERMINAL: &str = "NonterminalNode";

/// Tag of a literal carrying a value fragment.
pub const TAG_LITERAL: &str = "LiteralNode";

/// Tag of a variable reference.
pub const TAG_VARIABLE: &str = "VariableNode";

/// Tag of one element inside a list value fragment.
pub const TAG_LIST_ELEMENT: &str = "Attr-ListElement";

/// Tags of node kinds that exist in program trees but are never valid in documents.
pub const TAG_TERMINAL: &str = "TerminalNode";
pub const TAG_HOLE: &str = "Hole";
pub const TAG_LAMBDA: &str = "LambdaNode";
pub const TAG_LET: &str = "LetNode";

/// Rule name on [`TAG_NONTERMINAL`].
pub const ATTR_RULE: &str = "rule";

/// Symbol name on [`TAG_LITERAL`] and [`TAG_VARIABLE`].
pub const ATTR_SYMBOL: &str = "symbol";

/// Type identifier of a value fragment.
pub const ATTR_TYPE: &str = "type";

/// Type token of list fragments. Hinted lists use `list<element>`.
pub const TYPE_LIST: &str = "list";

/// Type token of a nested program tree.
pub const TYPE_PROGRAM: &str = "program";

/// Name of the environment variable holding the path to the codec configuration file.
/// If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/progser/codec.toml` or `$HOME/.config/progser/codec.toml`
///  (2) on Windows: `%APPDATA%\progser\codec.toml`
pub const ENV_CONFIG_PATH: &str = "PROGSER_CONFIG_PATH";
