//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Valtox.
//! The Valtox project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Valtox Error Module
//!
//! This module defines the error types used throughout Valtox for consistent
//! error handling and reporting.
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem errors while reading input or writing exports
//! - **Encoding**: Input bytes that are not valid UTF-8 (fatal for the request)
//! - **Config**: Invalid or unreadable analyzer configuration
//! - **ClassifierLoad**: The classifier capability could not be initialized
//! - **Classifier**: A classification call failed or returned unusable output
//! - **Pipeline**: Ordering or orchestration failures in the analysis pass
//! - **Export**: CSV serialization failures
//! - **Serde**: JSON/YAML serialization errors
//! - **Internal**: Unexpected internal failures
//!
//! Parsing never fails: every chat line is consumed by one of the parser's
//! fallback branches, so there is no parser error variant.

use std::io;
use std::string::FromUtf8Error;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Valtox.
pub type Result<T> = std::result::Result<T, VtError>;

/// Canonical error enumeration for Valtox.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum VtError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Input text could not be decoded as UTF-8.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid configuration values or unreadable configuration files.
    #[error("config error: {message}")]
    Config { message: String },

    /// The classifier capability failed to load.
    #[error("classifier '{classifier}' failed to load: {message}")]
    ClassifierLoad { classifier: String, message: String },

    /// A classification call failed.
    #[error("classifier '{classifier}' failed: {message}")]
    Classifier { classifier: String, message: String },

    /// Failures that occur while orchestrating the analysis pass.
    #[error("pipeline error at stage '{stage}': {message}")]
    Pipeline { stage: String, message: String },

    /// CSV export failures.
    #[error("export error: {0}")]
    Export(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for VtError {
    fn from(err: io::Error) -> Self {
        VtError::Io(err.to_string())
    }
}

impl From<FromUtf8Error> for VtError {
    fn from(err: FromUtf8Error) -> Self {
        VtError::Encoding(err.to_string())
    }
}

impl From<std::str::Utf8Error> for VtError {
    fn from(err: std::str::Utf8Error) -> Self {
        VtError::Encoding(err.to_string())
    }
}

impl From<serde_json::Error> for VtError {
    fn from(err: serde_json::Error) -> Self {
        VtError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for VtError {
    fn from(err: serde_yaml::Error) -> Self {
        VtError::Serde(err.to_string())
    }
}

impl From<csv::Error> for VtError {
    fn from(err: csv::Error) -> Self {
        VtError::Export(err.to_string())
    }
}

impl VtError {
    /// Helper to construct configuration errors.
    pub fn config<T: Into<String>>(message: T) -> Self {
        VtError::Config {
            message: message.into(),
        }
    }

    /// Helper to construct classifier load errors.
    pub fn classifier_load(name: impl Into<String>, message: impl Into<String>) -> Self {
        VtError::ClassifierLoad {
            classifier: name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct classifier invocation errors.
    pub fn classifier(name: impl Into<String>, message: impl Into<String>) -> Self {
        VtError::Classifier {
            classifier: name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct pipeline errors.
    pub fn pipeline(stage: impl Into<String>, message: impl Into<String>) -> Self {
        VtError::Pipeline {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Helper to construct export errors.
    pub fn export<T: Into<String>>(message: T) -> Self {
        VtError::Export(message.into())
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        VtError::Internal(message.into())
    }

    /// Returns true when the failure came from the classifier capability.
    pub fn is_classifier_failure(&self) -> bool {
        matches!(
            self,
            VtError::ClassifierLoad { .. } | VtError::Classifier { .. }
        )
    }
}
