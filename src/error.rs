use std::io;

use http::status::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[cfg(feature = "wasm")]
use serde_wasm_bindgen::Error as WasmError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum SluiceError {
    /// A structurally malformed edit request, e.g. creating a node without a
    /// kind-tagged settings payload.
    #[error("Invalid Command: {0}")]
    Command(String),
    /// The persisted state references an object that does not exist. Always
    /// surfaced to the caller; masking it would hide a server-side
    /// inconsistency from the participant.
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("File System error: {0}")]
    Io(String),
}

impl SluiceError {
    /// Status code the REST layer should answer with when an editor call
    /// fails with this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SluiceError::Command(_) => StatusCode::BAD_REQUEST,
            SluiceError::NotFound(_) => StatusCode::NOT_FOUND,
            SluiceError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SluiceError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonError> for SluiceError {
    fn from(src: JsonError) -> SluiceError {
        SluiceError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<toml::de::Error> for SluiceError {
    fn from(src: toml::de::Error) -> SluiceError {
        SluiceError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for SluiceError {
    fn from(src: toml::ser::Error) -> SluiceError {
        SluiceError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<io::Error> for SluiceError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => SluiceError::NotFound(format!("{x}")),
            _ => SluiceError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

#[cfg(feature = "wasm")]
impl From<WasmError> for SluiceError {
    fn from(wasm_error: WasmError) -> Self {
        SluiceError::Serialization(format!("Serde-wasm-bindgen error: {wasm_error}"))
    }
}
