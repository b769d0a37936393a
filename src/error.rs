use thiserror::Error;

/// Errors raised by the schema guard before any evaluation or compilation runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Failed to parse strategy JSON: {0}")]
    JsonParseError(String),

    #[error("Strategy payload must be a JSON object")]
    NotAnObject,

    #[error("Unsupported schema version: expected '{expected}', but received '{found}'")]
    UnsupportedSchemaVersion { expected: String, found: String },

    #[error("Required field '{0}' is missing")]
    MissingField(&'static str),

    #[error("Field '{0}' must be an array")]
    NotAnArray(&'static str),

    #[error("Field '{field}' is invalid: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("Node at index {index} is malformed: {message}")]
    InvalidNode { index: usize, message: String },

    #[error("Connection at index {index} is malformed: {message}")]
    InvalidConnection { index: usize, message: String },

    #[error("Node id '{0}' is declared more than once")]
    DuplicateNodeId(String),

    #[error("Connection '{from}' -> '{to}' references unknown node '{missing}'")]
    DanglingConnection {
        from: String,
        to: String,
        missing: String,
    },

    #[error("Action node '{0}' is terminal and cannot feed another node")]
    ActionAsSource(String),

    #[error("Strategy declares no action node, so it can never emit a signal")]
    NoActionNode,

    #[error("Connections form a cycle: {}", .cycle.join(" -> "))]
    CycleDetected { cycle: Vec<String> },

    #[error("Graph declares {count} {kind}, exceeding the limit of {max}")]
    TooMany {
        kind: &'static str,
        count: usize,
        max: usize,
    },

    #[error("Field '{field}' is {len} characters long, exceeding the limit of {max}")]
    NameTooLong {
        field: String,
        len: usize,
        max: usize,
    },

    #[error("Invalid selection mode '{0}', expected 'automatic' or 'hybrid'")]
    InvalidSelectionMode(String),

    #[error("Gating field '{field}' is invalid: {message}")]
    InvalidGating { field: &'static str, message: String },
}

/// Errors raised while reading a round history.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Failed to parse history JSON: {0}")]
    JsonParseError(String),

    #[error("History must contain at least one outcome")]
    Empty,

    #[error("History must be a JSON array")]
    NotAnArray,

    #[error("History entry {index} is not a valid outcome: {found}")]
    InvalidEntry { index: usize, found: String },
}

/// Errors raised by the code generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Node '{node_id}' has subtype '{subtype}', which has no script template")]
    UnsupportedSubtype { node_id: String, subtype: String },

    #[error("None of the {actions} action(s) is wired to any of the {steps} condition step(s)")]
    EmptyProgram { steps: usize, actions: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors raised when persisting or loading a compiled strategy.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact serialization failed: {0}")]
    Encode(String),

    #[error("Artifact deserialization failed: {0}")]
    Decode(String),

    #[error("Artifact I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Umbrella error for the `StrategyEngine` façade.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
