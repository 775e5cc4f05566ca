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

//! # Valtox Classify Tests - Classifier Adapter
//!
//! Exercises gating, label selection and the toxicity threshold against
//! scripted classifiers. No network access is needed.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test classifier
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use valtox::{
    VtClassifier, VtClassifierAdapter, VtClassifierHandle, VtClassifierLoader, VtError,
    VtLabelScore, VtResult, VtToxicityConfig,
};

/// Classifier returning a fixed score list and recording every text it saw.
#[derive(Debug, Default)]
struct FixedClassifier {
    scores: Vec<VtLabelScore>,
    seen: Mutex<Vec<String>>,
}

impl FixedClassifier {
    fn new(scores: Vec<VtLabelScore>) -> Self {
        FixedClassifier {
            scores,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl VtClassifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn classify(&self, text: &str) -> VtResult<Vec<VtLabelScore>> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(self.scores.clone())
    }
}

#[derive(Debug)]
struct FailingClassifier;

impl VtClassifier for FailingClassifier {
    fn name(&self) -> &str {
        "failing"
    }

    fn classify(&self, _text: &str) -> VtResult<Vec<VtLabelScore>> {
        Err(VtError::internal("connection reset"))
    }
}

#[derive(Debug)]
struct CountingLoader {
    loads: Arc<AtomicUsize>,
    fail: bool,
}

impl VtClassifierLoader for CountingLoader {
    fn name(&self) -> &str {
        "counting"
    }

    fn load(&self) -> VtResult<Box<dyn VtClassifier>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(VtError::internal("model weights missing"));
        }
        Ok(Box::new(FixedClassifier::new(vec![VtLabelScore::new(
            "offensive",
            0.9,
        )])))
    }
}

fn offensive(score: f64) -> Vec<VtLabelScore> {
    vec![
        VtLabelScore::new("non-offensive", 1.0 - score),
        VtLabelScore::new("OFFENSIVE", score),
    ]
}

/// Tests that text without letters never reaches the classifier.
#[test]
fn test_empty_cleaned_text_skips_classifier() {
    let classifier = FixedClassifier::new(offensive(0.99));
    let adapter = VtClassifierAdapter::default();

    for text in ["!!!123", "", "   ", "42 :) <3"] {
        let verdict = adapter.classify(&classifier, text).unwrap();
        assert_eq!(verdict.label, None);
        assert_eq!(verdict.score, 0.0);
        assert!(!verdict.is_toxic);
    }
    assert_eq!(classifier.calls(), 0);
}

/// Tests that the classifier receives the cleaned text.
#[test]
fn test_classifier_receives_cleaned_text() {
    let classifier = FixedClassifier::new(offensive(0.2));
    VtClassifierAdapter::default()
        .classify(&classifier, "  U R SO BAD!!! 1v5 ")
        .unwrap();
    assert_eq!(classifier.seen.lock().unwrap()[0], "u r so bad v");
}

/// Tests the strict threshold on a toxic label.
#[test]
fn test_threshold_is_strict() {
    let adapter = VtClassifierAdapter::default();

    let above = adapter.classify(&FixedClassifier::new(offensive(0.61)), "you").unwrap();
    assert_eq!(above.label.as_deref(), Some("OFFENSIVE"));
    assert!(above.is_toxic);

    let at = adapter.classify(&FixedClassifier::new(offensive(0.60)), "you").unwrap();
    assert!(!at.is_toxic);
}

/// Tests that a confident non-toxic label is not toxic.
#[test]
fn test_confident_clean_label_is_not_toxic() {
    let classifier = FixedClassifier::new(vec![
        VtLabelScore::new("non-offensive", 0.97),
        VtLabelScore::new("offensive", 0.03),
    ]);
    let verdict = VtClassifierAdapter::default().classify(&classifier, "nice shot").unwrap();
    assert_eq!(verdict.label.as_deref(), Some("non-offensive"));
    assert_eq!(verdict.score, 0.97);
    assert!(!verdict.is_toxic);
}

/// Tests a model with a different label vocabulary.
#[test]
fn test_configured_label_set() {
    let classifier = FixedClassifier::new(vec![
        VtLabelScore::new("LABEL_0", 0.2),
        VtLabelScore::new("LABEL_1", 0.8),
    ]);

    let stock = VtClassifierAdapter::default().classify(&classifier, "x").unwrap();
    assert!(!stock.is_toxic);

    let custom = VtClassifierAdapter::new(
        VtToxicityConfig::default().labels(["label_1"]).threshold(0.75),
    )
    .classify(&classifier, "x")
    .unwrap();
    assert!(custom.is_toxic);
}

/// Tests that an empty score list is a classifier failure.
#[test]
fn test_empty_scores_are_an_error() {
    let err = VtClassifierAdapter::default()
        .classify(&FixedClassifier::new(Vec::new()), "hello")
        .unwrap_err();
    assert!(err.is_classifier_failure());
}

/// Tests that invocation errors are reported as classifier failures.
#[test]
fn test_invocation_failure_is_classifier_error() {
    let err = VtClassifierAdapter::default()
        .classify(&FailingClassifier, "hello")
        .unwrap_err();
    match err {
        VtError::Classifier { classifier, message } => {
            assert_eq!(classifier, "failing");
            assert!(message.contains("connection reset"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Tests that the handle runs its loader only once.
#[test]
fn test_handle_loads_once() {
    let loads = Arc::new(AtomicUsize::new(0));
    let handle = VtClassifierHandle::new(Box::new(CountingLoader {
        loads: loads.clone(),
        fail: false,
    }));

    assert!(!handle.is_loaded());
    handle.get().unwrap();
    handle.get().unwrap();
    assert!(handle.is_loaded());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

/// Tests that a load failure surfaces as a load error.
#[test]
fn test_handle_surfaces_load_failure() {
    let handle = VtClassifierHandle::new(Box::new(CountingLoader {
        loads: Arc::new(AtomicUsize::new(0)),
        fail: true,
    }));

    let err = handle.get().unwrap_err();
    assert!(matches!(err, VtError::ClassifierLoad { .. }));
    assert!(!handle.is_loaded());
}

/// Tests a handle built around an already loaded classifier.
#[test]
fn test_preloaded_handle() {
    let handle = VtClassifierHandle::preloaded(Box::new(FixedClassifier::new(offensive(0.7))));
    assert!(handle.is_loaded());
    assert_eq!(handle.get().unwrap().name(), "fixed");
}

/// Tests that a blank top label is a classifier failure, not an empty label.
#[test]
fn test_blank_label_is_an_error() {
    let adapter = VtClassifierAdapter::default();
    for label in ["", "   "] {
        let classifier = FixedClassifier::new(vec![
            VtLabelScore::new(label, 0.9),
            VtLabelScore::new("offensive", 0.1),
        ]);
        let err = adapter.classify(&classifier, "hello").unwrap_err();
        assert!(err.is_classifier_failure());
    }

    let judged = adapter.judge("fixed", &[VtLabelScore::new("", 0.9)]);
    assert!(matches!(judged, Err(VtError::Classifier { .. })));
}
