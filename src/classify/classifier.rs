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

//! # Classifier Adapter
//!
//! The text classifier is an external capability reached through two narrow
//! traits: [`VtClassifierLoader`] performs the expensive one-time load and
//! [`VtClassifier`] scores a single text against every label it knows.
//!
//! [`VtClassifierHandle`] owns a loader and initializes the classifier lazily,
//! at most once per handle. [`VtClassifierAdapter`] turns raw label scores into
//! a [`VtVerdict`] using the configured toxic label set and threshold.

use std::fmt;
use std::sync::OnceLock;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::VtToxicityConfig;
use crate::errors::{Result, VtError};
use crate::message::VtVerdict;

/// One label and its confidence as returned by a classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VtLabelScore {
    pub label: String,
    pub score: f64,
}

impl VtLabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        VtLabelScore {
            label: label.into(),
            score,
        }
    }
}

/// A loaded text classifier.
pub trait VtClassifier: Send + Sync + fmt::Debug {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Scores `text` against the full label set.
    fn classify(&self, text: &str) -> Result<Vec<VtLabelScore>>;
}

/// Produces a [`VtClassifier`]. Loading may be slow and may fail.
pub trait VtClassifierLoader: fmt::Debug {
    fn name(&self) -> &str;

    fn load(&self) -> Result<Box<dyn VtClassifier>>;
}

/// Lazily-initialized classifier resource.
///
/// The first successful [`get`](Self::get) runs the loader; later calls reuse
/// the loaded classifier. A failed load is returned to the caller and nothing
/// is cached, so no partial state survives.
pub struct VtClassifierHandle {
    loader: Option<Box<dyn VtClassifierLoader>>,
    classifier: OnceLock<Box<dyn VtClassifier>>,
}

impl fmt::Debug for VtClassifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VtClassifierHandle")
            .field("loader", &self.loader)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl VtClassifierHandle {
    pub fn new(loader: Box<dyn VtClassifierLoader>) -> Self {
        VtClassifierHandle {
            loader: Some(loader),
            classifier: OnceLock::new(),
        }
    }

    /// Wraps a classifier that is already loaded.
    pub fn preloaded(classifier: Box<dyn VtClassifier>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(classifier);
        VtClassifierHandle {
            loader: None,
            classifier: cell,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.classifier.get().is_some()
    }

    /// Returns the classifier, loading it on first use.
    pub fn get(&self) -> Result<&dyn VtClassifier> {
        if let Some(classifier) = self.classifier.get() {
            return Ok(classifier.as_ref());
        }

        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| VtError::internal("classifier handle has no loader"))?;

        log::info!("Loading classifier '{}'", loader.name());
        let started = Instant::now();
        let loaded = loader.load().map_err(|err| {
            log::error!("Classifier '{}' failed to load: {}", loader.name(), err);
            match err {
                VtError::ClassifierLoad { .. } => err,
                other => VtError::classifier_load(loader.name(), other.to_string()),
            }
        })?;
        log::info!(
            "Classifier '{}' loaded in {} ms",
            loader.name(),
            started.elapsed().as_millis()
        );

        Ok(self.classifier.get_or_init(|| loaded).as_ref())
    }
}

/// Lowercases, keeps only ASCII letters and spaces, then trims.
pub fn clean_text(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect();
    kept.trim().to_string()
}

/// Picks the highest-scoring label; the first one wins a tie.
///
/// Non-finite scores are ignored.
pub fn select_top(scores: &[VtLabelScore]) -> Option<&VtLabelScore> {
    let mut best: Option<&VtLabelScore> = None;
    for candidate in scores.iter().filter(|s| s.score.is_finite()) {
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Converts classifier output into verdicts.
#[derive(Clone, Debug, Default)]
pub struct VtClassifierAdapter {
    toxicity: VtToxicityConfig,
}

impl VtClassifierAdapter {
    pub fn new(toxicity: VtToxicityConfig) -> Self {
        VtClassifierAdapter { toxicity }
    }

    pub fn toxicity(&self) -> &VtToxicityConfig {
        &self.toxicity
    }

    /// Toxic only when the label is in the toxic set and the score is
    /// strictly above the threshold.
    pub fn is_toxic(&self, label: &str, score: f64) -> bool {
        self.toxicity.is_toxic_label(label) && score > self.toxicity.threshold
    }

    /// Builds a verdict from a full set of label scores.
    pub fn judge(&self, classifier: &str, scores: &[VtLabelScore]) -> Result<VtVerdict> {
        let top = select_top(scores).ok_or_else(|| {
            VtError::classifier(classifier, "classifier returned no usable scores")
        })?;
        if top.label.trim().is_empty() {
            return Err(VtError::classifier(classifier, "classifier returned a blank label"));
        }
        Ok(VtVerdict::labelled(
            top.label.clone(),
            top.score,
            self.is_toxic(&top.label, top.score),
        ))
    }

    /// Classifies one message body.
    ///
    /// Text that cleans down to nothing gets the empty verdict and the
    /// classifier is not called.
    pub fn classify(&self, classifier: &dyn VtClassifier, text: &str) -> Result<VtVerdict> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            log::debug!("Skipping classification of message with no letters");
            return Ok(VtVerdict::empty());
        }

        let scores = classifier.classify(&cleaned).map_err(|err| match err {
            VtError::Classifier { .. } => err,
            other => VtError::classifier(classifier.name(), other.to_string()),
        })?;
        let verdict = self.judge(classifier.name(), &scores)?;

        log::debug!(
            "Classified '{}' as {:?} ({:.3}, toxic={})",
            cleaned,
            verdict.label,
            verdict.score,
            verdict.is_toxic
        );
        Ok(verdict)
    }
}
