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

//! # Valtox Configuration Module
//!
//! Analyzer settings grouped by concern. Every section has defaults that
//! reproduce the stock behaviour, so an empty document is a valid config.
//!
//! ```yaml
//! toxicity:
//!   labels: ["offensive", "toxic"]
//!   threshold: 0.6
//! classifier:
//!   model: cardiffnlp/twitter-roberta-base-offensive
//!   timeout_secs: 60
//! export:
//!   file_name: valorant_toxicity_results.csv
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VtError};

/// Label set and threshold that decide whether a verdict is toxic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VtToxicityConfig {
    /// Labels counted as toxic, compared case-insensitively.
    pub labels: Vec<String>,
    /// A verdict is toxic only when its score is strictly greater than this.
    pub threshold: f64,
}

impl Default for VtToxicityConfig {
    fn default() -> Self {
        Self {
            labels: vec!["offensive".to_string(), "toxic".to_string()],
            threshold: 0.6,
        }
    }
}

impl VtToxicityConfig {
    /// Returns true when `label` belongs to the configured toxic set.
    pub fn is_toxic_label(&self, label: &str) -> bool {
        let lowered = label.to_lowercase();
        self.labels.iter().any(|l| l.to_lowercase() == lowered)
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Settings for the hosted text-classification endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VtClassifierConfig {
    /// Base URL; the model id is appended as a path segment.
    pub endpoint: String,
    /// Model identifier.
    pub model: String,
    /// Bearer token sent with every request.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Send one warm-up request while loading so a broken endpoint fails early.
    pub warmup: bool,
}

impl Default for VtClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models".to_string(),
            model: "cardiffnlp/twitter-roberta-base-offensive".to_string(),
            api_key: None,
            timeout_secs: 60,
            warmup: true,
        }
    }
}

impl VtClassifierConfig {
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn warmup(mut self, enabled: bool) -> Self {
        self.warmup = enabled;
        self
    }

    /// Full URL of the model endpoint.
    pub fn model_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.model.trim_start_matches('/')
        )
    }
}

/// Settings for the downloadable CSV artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VtExportConfig {
    pub file_name: String,
    pub mime_type: String,
    /// Field delimiter, must be a single ASCII character.
    pub delimiter: char,
    /// Prefix the file with a UTF-8 byte-order marker.
    pub byte_order_mark: bool,
}

impl Default for VtExportConfig {
    fn default() -> Self {
        Self {
            file_name: "valorant_toxicity_results.csv".to_string(),
            mime_type: "text/csv".to_string(),
            delimiter: ',',
            byte_order_mark: true,
        }
    }
}

/// Top-level analyzer configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VtAnalyzerConfig {
    pub toxicity: VtToxicityConfig,
    pub classifier: VtClassifierConfig,
    pub export: VtExportConfig,
}

impl VtAnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toxicity(mut self, toxicity: VtToxicityConfig) -> Self {
        self.toxicity = toxicity;
        self
    }

    pub fn classifier(mut self, classifier: VtClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn export(mut self, export: VtExportConfig) -> Self {
        self.export = export;
        self
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, choosing the format from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text),
            "json" => Self::from_json_str(&text),
            other => Err(VtError::config(format!(
                "unsupported config format '{}' for {}",
                other,
                path.display()
            ))),
        }
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.toxicity.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(VtError::config(format!(
                "toxicity threshold {} is outside [0, 1]",
                threshold
            )));
        }
        if self.toxicity.labels.iter().all(|l| l.trim().is_empty()) {
            return Err(VtError::config("toxic label set is empty"));
        }
        if self.classifier.endpoint.trim().is_empty() {
            return Err(VtError::config("classifier endpoint is empty"));
        }
        if self.classifier.model.trim().is_empty() {
            return Err(VtError::config("classifier model is empty"));
        }
        if self.classifier.timeout_secs == 0 {
            return Err(VtError::config("classifier timeout must be positive"));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(VtError::config("export file name is empty"));
        }
        if !self.export.delimiter.is_ascii() {
            return Err(VtError::config(format!(
                "export delimiter '{}' is not ASCII",
                self.export.delimiter
            )));
        }
        Ok(())
    }
}
