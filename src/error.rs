use std::path::PathBuf;
use thiserror::Error;

/// A machine or recipe record that could not be turned into a typed value.
/// Loaders skip the record and keep going.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record is missing field '{0}'")]
    MissingField(&'static str),

    #[error("invalid record: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("recipe '{0}' has no inputs or no outputs")]
    Empty(String),

    #[error("multiblock '{0}' has no structure template")]
    NoStructure(String),
}

/// Failures at the persistence boundary. Callers log these and carry on as
/// if nothing was stored.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON under key '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("persistence writer has shut down")]
    WriterClosed,
}

/// Reasons a recipe selection is rejected. The session is left unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no machine is active")]
    NoActiveMachine,

    #[error("unknown recipe '{0}'")]
    UnknownRecipe(String),

    #[error("recipe '{recipe_id}' does not belong to machine '{machine_id}'")]
    WrongMachine {
        recipe_id: String,
        machine_id: String,
    },
}
