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

//! # Valtox Core Library
//!
//! Valtox parses game chat logs into structured messages, classifies each
//! message for offensive content with a pretrained text classifier, and
//! summarizes the result as totals, a toxic percentage and a per-player
//! toxicity ranking.
//!
//! ## Module Overview
//!
//! - **errors**: `VtError` and the crate-wide `Result` alias
//! - **message**: `VtMessage`, `VtVerdict` and `VtAnalysisRow`
//! - **config**: analyzer configuration (toxic labels, threshold, endpoint, export)
//! - **ingest**: input resolution and the chat line parser
//! - **classify**: classifier capability traits, lazy handle, hosted classifier
//! - **inspect**: totals and the toxic player ranking
//! - **export**: CSV artifact, text tables and chart data
//! - **pipeline**: the ordered parse → classify → aggregate pass
//! - **session**: the analyst workflow from input to export
//!
//! ## Quick Start
//!
//! ```rust
//! use valtox::{VtAnalyzerConfig, VtSession};
//!
//! let mut session = VtSession::with_http_classifier(VtAnalyzerConfig::default())?;
//! session.submit(None, "[00:41] Jett: nice try\n[00:42] Reyna: uninstall the game")?;
//! let analysis = session.analyze()?;
//! println!("{} of {} messages toxic", analysis.summary.toxic_count, analysis.summary.total);
//! let csv = session.export()?;
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, VtError>`. Parsing never fails;
//! classifier load or call failures abort the whole analysis.

pub mod classify;
pub mod config;
pub mod errors;
pub mod export;
pub mod ingest;
pub mod inspect;
pub mod message;
pub mod pipeline;
pub mod session;

pub use classify::{
    clean_text, VtClassifier, VtClassifierAdapter, VtClassifierHandle, VtClassifierLoader,
    VtHttpClassifier, VtHttpClassifierLoader, VtLabelScore,
};
pub use config::{VtAnalyzerConfig, VtClassifierConfig, VtExportConfig, VtToxicityConfig};
pub use errors::{Result, Result as VtResult, VtError};
pub use export::{
    VtBar, VtBarChart, VtChartRenderer, VtCsvWriter, VtExportArtifact, VtReport,
    VtTextChartRenderer, VtWriteStats,
};
pub use ingest::{parse_chat, VtChatInput, VtChatParser, VtInputKind, VtLinePattern, VtParseStats};
pub use inspect::{aggregate, VtRankingEntry, VtSummary, VtToxicRanking};
pub use message::{VtAnalysisRow, VtMessage, VtMessageBatch, VtVerdict};
pub use pipeline::{VtAnalysis, VtPipeline};
pub use session::{VtSession, VtSubmitOutcome, EMPTY_INPUT_NOTICE};
