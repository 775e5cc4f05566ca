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

//! # Hosted Text Classifier
//!
//! A [`VtClassifier`] backed by a text-classification inference endpoint that
//! speaks the HuggingFace Inference API wire format:
//!
//! ```json
//! POST {endpoint}/{model}
//! {"inputs": "you are bad", "options": {"wait_for_model": true}}
//!
//! [[{"label": "offensive", "score": 0.91}, {"label": "non-offensive", "score": 0.09}]]
//! ```

use std::time::Duration;

use serde_json::{json, Value};

use crate::classify::classifier::{VtClassifier, VtClassifierLoader, VtLabelScore};
use crate::config::VtClassifierConfig;
use crate::errors::{Result, VtError};

const WARMUP_TEXT: &str = "good game";

/// Loads a [`VtHttpClassifier`] from configuration.
#[derive(Clone, Debug)]
pub struct VtHttpClassifierLoader {
    config: VtClassifierConfig,
}

impl VtHttpClassifierLoader {
    pub fn new(config: VtClassifierConfig) -> Self {
        VtHttpClassifierLoader { config }
    }
}

impl VtClassifierLoader for VtHttpClassifierLoader {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn load(&self) -> Result<Box<dyn VtClassifier>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| VtError::classifier_load(&self.config.model, e.to_string()))?;

        let classifier = VtHttpClassifier {
            client,
            url: self.config.model_url(),
            model: self.config.model.clone(),
            api_key: self.config.api_key.clone(),
        };

        if self.config.warmup {
            classifier
                .classify(WARMUP_TEXT)
                .map_err(|e| VtError::classifier_load(&self.config.model, e.to_string()))?;
        }

        Ok(Box::new(classifier))
    }
}

/// Classifier calling a remote inference endpoint, one request per text.
#[derive(Debug)]
pub struct VtHttpClassifier {
    client: reqwest::blocking::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl VtClassifier for VtHttpClassifier {
    fn name(&self) -> &str {
        &self.model
    }

    fn classify(&self, text: &str) -> Result<Vec<VtLabelScore>> {
        let body = json!({
            "inputs": text,
            "options": {"wait_for_model": true},
        });

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .map_err(|e| VtError::classifier(&self.model, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(VtError::classifier(
                &self.model,
                format!("endpoint returned {}: {}", status, body),
            ));
        }

        let value: Value = response.json().map_err(|e| {
            VtError::classifier(&self.model, format!("invalid response body: {}", e))
        })?;

        parse_scores(&self.model, &value)
    }
}

/// Extracts label scores from an inference response.
///
/// Accepts the nested single-input form `[[{..}, ..]]` and the flat form
/// `[{..}, ..]`. An `{"error": ..}` object becomes a classifier error.
pub fn parse_scores(model: &str, value: &Value) -> Result<Vec<VtLabelScore>> {
    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        return Err(VtError::classifier(model, message.to_string()));
    }

    let entries = match value.as_array() {
        Some(outer) => match outer.first() {
            Some(Value::Array(inner)) => inner,
            _ => outer,
        },
        None => {
            return Err(VtError::classifier(
                model,
                format!("unexpected response shape: {}", value),
            ))
        }
    };

    let mut scores = Vec::with_capacity(entries.len());
    for entry in entries {
        let label = entry.get("label").and_then(|l| l.as_str());
        let score = entry.get("score").and_then(|s| s.as_f64());
        match (label, score) {
            (Some(label), _) if label.trim().is_empty() => {
                return Err(VtError::classifier(
                    model,
                    format!("blank label in entry: {}", entry),
                ))
            }
            (Some(label), Some(score)) => scores.push(VtLabelScore::new(label, score)),
            _ => {
                return Err(VtError::classifier(
                    model,
                    format!("malformed label entry: {}", entry),
                ))
            }
        }
    }

    if scores.is_empty() {
        return Err(VtError::classifier(model, "response contained no labels"));
    }
    Ok(scores)
}
