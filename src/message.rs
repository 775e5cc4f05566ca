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

//! # Valtox Message Module
//!
//! This module provides the data structures that flow through the analysis
//! pass: a parsed chat [`VtMessage`], the [`VtVerdict`] produced for it by the
//! classifier adapter, and the [`VtAnalysisRow`] that joins the two for
//! display and export.
//!
//! Messages and verdicts are joined by position, not by key. Every stage that
//! produces one of these sequences must keep strict input order.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VtError};

/// One parsed chat line.
///
/// `time` and `player` are empty strings when the line did not carry them.
/// `text` is always present but may be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtMessage {
    /// Timestamp token captured from a `[time]` prefix.
    pub time: String,
    /// Sender name.
    pub player: String,
    /// Message body.
    #[serde(rename = "message")]
    pub text: String,
}

impl VtMessage {
    /// Constructs a message from its three fields.
    pub fn new(
        time: impl Into<String>,
        player: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        VtMessage {
            time: time.into(),
            player: player.into(),
            text: text.into(),
        }
    }

    /// Constructs a message that carries only a body.
    pub fn text_only(text: impl Into<String>) -> Self {
        VtMessage {
            time: String::new(),
            player: String::new(),
            text: text.into(),
        }
    }

    /// Returns the sender name when one was parsed.
    pub fn player(&self) -> Option<&str> {
        if self.player.is_empty() {
            None
        } else {
            Some(&self.player)
        }
    }
}

/// Convenience alias for the ordered output of the chat parser.
pub type VtMessageBatch = Vec<VtMessage>;

/// Toxicity classification outcome for one message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VtVerdict {
    /// Winning label, absent when the message had no analyzable content.
    pub label: Option<String>,
    /// Confidence of the winning label, `0.0` when the label is absent.
    pub score: f64,
    /// Whether the winning label is toxic and its score clears the threshold.
    #[serde(rename = "toxic")]
    pub is_toxic: bool,
}

impl VtVerdict {
    /// Verdict for a message that cleaned down to nothing.
    pub fn empty() -> Self {
        VtVerdict {
            label: None,
            score: 0.0,
            is_toxic: false,
        }
    }

    /// Verdict carrying a classifier label.
    pub fn labelled(label: impl Into<String>, score: f64, is_toxic: bool) -> Self {
        VtVerdict {
            label: Some(label.into()),
            score,
            is_toxic,
        }
    }
}

/// A message joined with its verdict, the unit of display and export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VtAnalysisRow {
    #[serde(flatten)]
    pub message: VtMessage,
    #[serde(flatten)]
    pub verdict: VtVerdict,
}

impl VtAnalysisRow {
    pub fn new(message: VtMessage, verdict: VtVerdict) -> Self {
        VtAnalysisRow { message, verdict }
    }

    pub fn is_toxic(&self) -> bool {
        self.verdict.is_toxic
    }

    /// Positionally joins messages with their verdicts.
    ///
    /// Both sequences must have the same length; the n-th verdict belongs to
    /// the n-th message.
    pub fn join(messages: &[VtMessage], verdicts: Vec<VtVerdict>) -> Result<Vec<VtAnalysisRow>> {
        if messages.len() != verdicts.len() {
            return Err(VtError::pipeline(
                "join",
                format!(
                    "{} messages but {} verdicts",
                    messages.len(),
                    verdicts.len()
                ),
            ));
        }

        Ok(messages
            .iter()
            .cloned()
            .zip(verdicts)
            .map(|(message, verdict)| VtAnalysisRow::new(message, verdict))
            .collect())
    }
}
