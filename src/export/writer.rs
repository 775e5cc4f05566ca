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

//! # CSV Export Module
//!
//! Serializes analysis rows into the downloadable CSV artifact: UTF-8 with an
//! optional byte-order marker, one header row, then one row per analyzed
//! message in input order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::VtExportConfig;
use crate::errors::{Result, VtError};
use crate::message::{VtAnalysisRow, VtMessage, VtVerdict};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column order of the exported table.
pub const EXPORT_COLUMNS: [&str; 6] = ["time", "player", "message", "label", "score", "toxic"];

/// Statistics about write operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtWriteStats {
    pub rows_written: usize,
    pub bytes_written: usize,
}

/// A serialized table offered for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VtExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl VtExportArtifact {
    /// Writes the artifact into `dir` under its file name.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

fn format_score(score: f64) -> String {
    // Debug keeps a fractional part: 0.0, 0.61
    format!("{:?}", score)
}

fn format_toxic(toxic: bool) -> &'static str {
    if toxic {
        "True"
    } else {
        "False"
    }
}

/// CSV writer for analysis rows.
#[derive(Debug, Default)]
pub struct VtCsvWriter {
    config: VtExportConfig,
}

impl VtCsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: VtExportConfig) -> Self {
        self.config = config;
        self
    }

    fn delimiter(&self) -> Result<u8> {
        u8::try_from(self.config.delimiter)
            .ok()
            .filter(|b| b.is_ascii())
            .ok_or_else(|| {
                VtError::export(format!(
                    "delimiter '{}' is not a single ASCII byte",
                    self.config.delimiter
                ))
            })
    }

    /// Converts one row into CSV fields.
    pub fn row_fields(row: &VtAnalysisRow) -> [String; 6] {
        [
            row.message.time.clone(),
            row.message.player.clone(),
            row.message.text.clone(),
            row.verdict.label.clone().unwrap_or_default(),
            format_score(row.verdict.score),
            format_toxic(row.verdict.is_toxic).to_string(),
        ]
    }

    /// Serializes rows into CSV bytes.
    pub fn to_bytes(&self, rows: &[VtAnalysisRow]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        if self.config.byte_order_mark {
            buffer.extend_from_slice(UTF8_BOM);
        }

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter()?)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(buffer);

        csv_writer.write_record(EXPORT_COLUMNS)?;
        for row in rows {
            csv_writer.write_record(Self::row_fields(row))?;
        }

        csv_writer
            .into_inner()
            .map_err(|e| VtError::export(format!("CSV flush error: {}", e)))
    }

    /// Builds the downloadable artifact.
    pub fn artifact(&self, rows: &[VtAnalysisRow]) -> Result<VtExportArtifact> {
        let bytes = self.to_bytes(rows)?;
        log::info!(
            "Exported {} rows to {} ({} bytes)",
            rows.len(),
            self.config.file_name,
            bytes.len()
        );
        Ok(VtExportArtifact {
            file_name: self.config.file_name.clone(),
            mime_type: self.config.mime_type.clone(),
            bytes,
        })
    }

    /// Writes rows to `path` through a temporary file and a rename.
    pub fn write(&self, rows: &[VtAnalysisRow], path: &Path) -> Result<VtWriteStats> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let bytes = self.to_bytes(rows)?;
        let temp_path = Self::temp_path(path);
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(&bytes)?;
            writer.flush()?;
        }
        std::fs::rename(&temp_path, path)?;

        Ok(VtWriteStats {
            rows_written: rows.len(),
            bytes_written: bytes.len(),
        })
    }

    /// Reads an exported table back into rows.
    pub fn read(&self, bytes: &[u8]) -> Result<Vec<VtAnalysisRow>> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter()?)
            .has_headers(true)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        if headers.iter().ne(EXPORT_COLUMNS.iter().copied()) {
            return Err(VtError::export(format!(
                "unexpected header row: {:?}",
                headers.iter().collect::<Vec<_>>()
            )));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let field = |i: usize| record.get(i).unwrap_or_default().to_string();
            let label = field(3);
            let score = field(4)
                .parse::<f64>()
                .map_err(|e| VtError::export(format!("invalid score '{}': {}", field(4), e)))?;
            let is_toxic = match field(5).as_str() {
                "True" => true,
                "False" => false,
                other => {
                    return Err(VtError::export(format!("invalid toxic flag '{}'", other)))
                }
            };

            rows.push(VtAnalysisRow::new(
                VtMessage::new(field(0), field(1), field(2)),
                VtVerdict {
                    label: if label.is_empty() { None } else { Some(label) },
                    score,
                    is_toxic,
                },
            ));
        }
        Ok(rows)
    }

    fn temp_path(path: &Path) -> PathBuf {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let parent = path.parent().unwrap_or(Path::new("."));
        parent.join(format!(".{}.tmp", stem))
    }
}
