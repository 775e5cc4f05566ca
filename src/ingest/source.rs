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

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VtError};

const UTF8_BOM: &str = "\u{feff}";

/// Where the chat text came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VtInputKind {
    /// A file-like upload, decoded from bytes.
    Upload,
    /// Text typed or pasted directly.
    Pasted,
}

impl VtInputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VtInputKind::Upload => "upload",
            VtInputKind::Pasted => "pasted",
        }
    }
}

/// Decoded chat text ready for the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VtChatInput {
    pub kind: VtInputKind,
    pub text: String,
}

impl VtChatInput {
    /// Decodes uploaded bytes as UTF-8. Malformed input is fatal.
    pub fn from_upload(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| VtError::Encoding(format!("upload is not valid UTF-8: {}", e)))?;
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

        Ok(VtChatInput {
            kind: VtInputKind::Upload,
            text: text.to_string(),
        })
    }

    pub fn from_pasted(text: impl Into<String>) -> Self {
        VtChatInput {
            kind: VtInputKind::Pasted,
            text: text.into(),
        }
    }

    /// Reads a chat log file as if it had been uploaded.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_upload(&bytes)
    }

    /// Picks the input to analyze.
    ///
    /// An upload always wins over pasted text. Pasted text is only used when
    /// it has non-whitespace content. Returns `Ok(None)` when there is nothing
    /// to analyze, which callers report as a notice rather than an error.
    pub fn resolve(upload: Option<&[u8]>, pasted: &str) -> Result<Option<Self>> {
        let input = match upload {
            Some(bytes) => Self::from_upload(bytes)?,
            None if !pasted.trim().is_empty() => Self::from_pasted(pasted),
            None => {
                log::info!("No chat input provided");
                return Ok(None);
            }
        };

        if input.text.is_empty() {
            log::info!("Chat {} is empty", input.kind.as_str());
            return Ok(None);
        }

        log::info!(
            "Resolved chat input from {} ({} bytes)",
            input.kind.as_str(),
            input.text.len()
        );
        Ok(Some(input))
    }
}
