#![warn(missing_docs)]
//! # deepguard-contract-tests
//!
//! Loads the frozen JSON schemas and fixtures under the workspace
//! `contracts/` directory so tests can check both the documents and the
//! parser against them.

use std::path::{Path, PathBuf};

use jsonschema::JSONSchema;
use serde_json::Value;
use thiserror::Error;

/// Absolute path of the workspace `contracts/` directory.
pub fn contracts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../contracts")
}

/// Path of a file relative to [`contracts_dir`].
pub fn contract_path(relative: &str) -> PathBuf {
    contracts_dir().join(relative)
}

/// Reads and parses one JSON document.
///
/// # Errors
/// Returns [`ContractLoadError`] when the file is missing or not JSON.
pub fn load_json(path: &Path) -> Result<Value, ContractLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ContractLoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ContractLoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Loads and compiles a schema.
///
/// # Errors
/// Returns [`ContractLoadError::Schema`] when the document is not a usable
/// schema.
pub fn compile_validator(schema_path: &Path) -> Result<JSONSchema, ContractLoadError> {
    let schema = load_json(schema_path)?;
    JSONSchema::compile(&schema).map_err(|error| ContractLoadError::Schema {
        path: schema_path.display().to_string(),
        message: error.to_string(),
    })
}

/// Collects every validation failure for `instance` as display strings.
pub fn validation_errors(validator: &JSONSchema, instance: &Value) -> Vec<String> {
    match validator.validate(instance) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|error| error.to_string()).collect(),
    }
}

/// Contract loading failures.
#[derive(Debug, Error)]
pub enum ContractLoadError {
    /// File could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Offending path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// File is not valid JSON.
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// Offending path.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// Document did not compile as a schema.
    #[error("invalid schema {path}: {message}")]
    Schema {
        /// Offending path.
        path: String,
        /// Compiler message.
        message: String,
    },
}
