//! Error handling for WASM bindings.
//!
//! Converts livepen's error types into JavaScript `Error` objects carrying a
//! `code` property.

use livepen_core::SessionError;
use livepen_traits::{ArchiveError, ContextError, StorageError};
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Error codes for TypeScript consumption.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A file name outside `index.html`, `style.css`, `script.js`
    UnknownFile,
    /// A buffer over the size limit
    FileTooLarge,
    /// `localStorage` unavailable or a write failed
    Storage,
    /// The preview frame could not be used
    Context,
    /// Export failed
    Archive,
    /// JSON serialization/deserialization error
    Json,
    /// A DOM call failed
    Dom,
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnknownFile => "UNKNOWN_FILE",
            ErrorCode::FileTooLarge => "FILE_TOO_LARGE",
            ErrorCode::Storage => "STORAGE_ERROR",
            ErrorCode::Context => "CONTEXT_ERROR",
            ErrorCode::Archive => "ARCHIVE_ERROR",
            ErrorCode::Json => "JSON_ERROR",
            ErrorCode::Dom => "DOM_ERROR",
            ErrorCode::Unknown => "UNKNOWN_ERROR",
        }
    }
}

/// A JavaScript-friendly error type.
///
/// Not a `wasm_bindgen` struct: it converts into a plain JavaScript `Error`.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct LivePenError {
    code: ErrorCode,
    message: String,
}

impl LivePenError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn dom(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Dom, message)
    }

    /// A DOM failure described by the thrown JavaScript value.
    pub fn from_js(context: &str, value: &JsValue) -> Self {
        Self::dom(format!("{}: {}", context, describe_js(value)))
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Best-effort text for a thrown JavaScript value.
pub fn describe_js(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl From<SessionError> for LivePenError {
    fn from(err: SessionError) -> Self {
        let code = match &err {
            SessionError::UnknownFile(_) => ErrorCode::UnknownFile,
            SessionError::FileTooLarge { .. } => ErrorCode::FileTooLarge,
            SessionError::Storage(_) => ErrorCode::Storage,
            SessionError::Json(_) => ErrorCode::Json,
            SessionError::Archive(_) => ErrorCode::Archive,
        };
        Self::new(code, err.to_string())
    }
}

impl From<StorageError> for LivePenError {
    fn from(err: StorageError) -> Self {
        Self::new(ErrorCode::Storage, err.to_string())
    }
}

impl From<ContextError> for LivePenError {
    fn from(err: ContextError) -> Self {
        Self::new(ErrorCode::Context, err.to_string())
    }
}

impl From<ArchiveError> for LivePenError {
    fn from(err: ArchiveError) -> Self {
        Self::new(ErrorCode::Archive, err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for LivePenError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::new(ErrorCode::Json, err.to_string())
    }
}

impl From<LivePenError> for JsValue {
    fn from(err: LivePenError) -> Self {
        let js_error = js_sys::Error::new(&err.message);
        js_sys::Reflect::set(
            &js_error,
            &"code".into(),
            &JsValue::from_str(err.code.as_str()),
        )
        .ok();
        js_error.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepen_types::DocumentRole;

    #[test]
    fn test_session_error_codes() {
        let err: LivePenError = SessionError::UnknownFile("a.txt".into()).into();
        assert_eq!(err.code(), ErrorCode::UnknownFile);
        assert!(err.message().contains("a.txt"));

        let err: LivePenError = SessionError::FileTooLarge {
            role: DocumentRole::Markup,
            size: 2,
            limit: 1,
        }
        .into();
        assert_eq!(err.code(), ErrorCode::FileTooLarge);
    }

    #[test]
    fn test_code_strings_are_distinct() {
        let codes = [
            ErrorCode::UnknownFile,
            ErrorCode::FileTooLarge,
            ErrorCode::Storage,
            ErrorCode::Context,
            ErrorCode::Archive,
            ErrorCode::Json,
            ErrorCode::Dom,
            ErrorCode::Unknown,
        ];
        let mut names: Vec<_> = codes.iter().map(|c| c.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), codes.len());
    }
}
