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

//! # Valtox Pipeline Tests - Session
//!
//! Runs the analyst workflow end to end against a scripted classifier:
//! submit input, preview, load, analyze, present and export.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test session
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use valtox::{
    VtAnalyzerConfig, VtChartRenderer, VtClassifier, VtClassifierLoader, VtCsvWriter, VtError,
    VtLabelScore, VtPipeline, VtResult, VtSession, VtSubmitOutcome, VtTextChartRenderer,
    VtToxicityConfig, EMPTY_INPUT_NOTICE,
};

const INSULTS: [&str; 3] = ["trash", "noob", "idiot"];

#[derive(Debug)]
struct KeywordClassifier {
    calls: Arc<AtomicUsize>,
    fail_on: Option<&'static str>,
}

impl VtClassifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    fn classify(&self, text: &str) -> VtResult<Vec<VtLabelScore>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(word) = self.fail_on {
            if text.contains(word) {
                return Err(VtError::classifier("keyword", "inference timed out"));
            }
        }
        let score = if INSULTS.iter().any(|w| text.contains(w)) {
            0.91
        } else {
            0.08
        };
        Ok(vec![
            VtLabelScore::new("non-offensive", 1.0 - score),
            VtLabelScore::new("offensive", score),
        ])
    }
}

#[derive(Debug, Clone, Default)]
struct Counters {
    loads: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
}

#[derive(Debug)]
struct KeywordLoader {
    counters: Counters,
    fail_load: bool,
    fail_on: Option<&'static str>,
}

impl VtClassifierLoader for KeywordLoader {
    fn name(&self) -> &str {
        "keyword"
    }

    fn load(&self) -> VtResult<Box<dyn VtClassifier>> {
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            return Err(VtError::classifier_load("keyword", "download failed"));
        }
        Ok(Box::new(KeywordClassifier {
            calls: self.counters.calls.clone(),
            fail_on: self.fail_on,
        }))
    }
}

fn session_with(fail_load: bool, fail_on: Option<&'static str>) -> (VtSession, Counters) {
    let counters = Counters::default();
    let loader = KeywordLoader {
        counters: counters.clone(),
        fail_load,
        fail_on,
    };
    let session = VtSession::new(VtAnalyzerConfig::default(), Box::new(loader)).unwrap();
    (session, counters)
}

const CHAT: &str = "\
[00:05] Jett: glhf
[00:31] Reyna: you are trash
[00:32] Omen: ...
[00:40] Reyna: noob team
Phoenix: idiot sage

[01:02] Sage: 123!!!
gg";

/// Tests that empty input produces the notice and nothing else.
#[test]
fn test_empty_input_shows_notice() {
    let (mut session, counters) = session_with(false, None);

    let outcome = session.submit(None, "   ").unwrap();
    assert_eq!(outcome, VtSubmitOutcome::Notice(EMPTY_INPUT_NOTICE.to_string()));
    assert!(session.preview().is_none());
    assert!(session.messages().is_empty());
    assert_eq!(counters.loads.load(Ordering::SeqCst), 0);
}

/// Tests the full workflow from pasted text to export.
#[test]
fn test_full_analysis() {
    let (mut session, counters) = session_with(false, None);

    let outcome = session.submit(None, CHAT).unwrap();
    assert_eq!(outcome, VtSubmitOutcome::Parsed { messages: 7 });
    let preview = session.preview().unwrap();
    assert!(preview.contains("Reyna"));

    session.load_classifier().unwrap();
    assert!(session.classifier_loaded());

    let analysis = session.analyze().unwrap();
    assert_eq!(analysis.summary.total, 7);
    assert_eq!(analysis.summary.toxic_count, 3);
    assert_eq!(
        analysis.summary.ranking.pairs(),
        vec![("Reyna", 2), ("Phoenix", 1)]
    );
    assert_eq!(analysis.rows[2].verdict.label, None);
    assert_eq!(analysis.rows[5].verdict.label, None);

    // "..." and "123!!!" never reach the classifier
    assert_eq!(counters.calls.load(Ordering::SeqCst), 5);
    assert_eq!(counters.loads.load(Ordering::SeqCst), 1);

    let report = session.report().unwrap();
    let text = report.render_text();
    assert!(text.contains("Total messages analyzed: 7"));
    assert!(text.contains("Toxic messages: 3 (42.9%)"));
    assert!(text.contains("Top Toxic Players"));

    let chart = session.render_chart(&VtTextChartRenderer::default()).unwrap();
    let chart = String::from_utf8(chart).unwrap();
    assert!(chart.contains("Toxic vs Non-toxic"));

    let artifact = session.export().unwrap();
    let reloaded = VtCsvWriter::new().read(&artifact.bytes).unwrap();
    assert_eq!(reloaded, session.analysis().unwrap().rows);
}

/// Tests that a second analysis reuses the loaded classifier.
#[test]
fn test_classifier_loaded_once_per_session() {
    let (mut session, counters) = session_with(false, None);

    session.submit(Some(b"Reyna: trash"), "").unwrap();
    session.analyze().unwrap();
    session.submit(None, "Jett: gg").unwrap();
    session.analyze().unwrap();

    assert_eq!(counters.loads.load(Ordering::SeqCst), 1);
}

/// Tests that a load failure aborts analysis with no results.
#[test]
fn test_load_failure_is_fatal() {
    let (mut session, _) = session_with(true, None);
    session.submit(None, CHAT).unwrap();

    let err = session.analyze().unwrap_err();
    assert!(matches!(err, VtError::ClassifierLoad { .. }));
    assert!(session.analysis().is_none());
    assert!(session.export().is_err());
}

/// Tests that one failing message aborts the whole analysis.
#[test]
fn test_invocation_failure_leaves_no_partial_results() {
    let (mut session, _) = session_with(false, Some("noob"));
    session.submit(None, CHAT).unwrap();

    let err = session.analyze().unwrap_err();
    assert!(err.is_classifier_failure());
    assert!(session.analysis().is_none());
    assert!(session.results_table().is_err());
}

/// Tests that analysis requires submitted input.
#[test]
fn test_analyze_without_input() {
    let (mut session, _) = session_with(false, None);
    let err = session.analyze().unwrap_err();
    assert!(matches!(err, VtError::Pipeline { .. }));
}

/// Tests that malformed uploads fail the request.
#[test]
fn test_malformed_upload_fails_submit() {
    let (mut session, _) = session_with(false, None);
    let err = session.submit(Some(&[0xc3, 0x28]), "").unwrap_err();
    assert!(matches!(err, VtError::Encoding(_)));
}

/// Tests that an invalid config is rejected up front.
#[test]
fn test_invalid_config_rejected() {
    let config = VtAnalyzerConfig::default()
        .toxicity(VtToxicityConfig::default().threshold(2.0));
    let loader = KeywordLoader {
        counters: Counters::default(),
        fail_load: false,
        fail_on: None,
    };
    assert!(VtSession::new(config, Box::new(loader)).is_err());
}

/// Tests progress reporting and order of verdicts.
#[test]
fn test_pipeline_progress_follows_input_order() {
    let classifier = KeywordClassifier {
        calls: Arc::new(AtomicUsize::new(0)),
        fail_on: None,
    };
    let pipeline = VtPipeline::new(VtToxicityConfig::default());
    let messages = pipeline.parse("a: trash\nb: hello\nc: noob");

    let mut seen = Vec::new();
    let verdicts = pipeline
        .classify_all_with_progress(&classifier, &messages, |done, total| {
            seen.push((done, total))
        })
        .unwrap();

    assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    let flags: Vec<_> = verdicts.iter().map(|v| v.is_toxic).collect();
    assert_eq!(flags, vec![true, false, true]);
}

/// Tests the JSON snapshot of a session report.
#[test]
fn test_report_serializes_to_json() {
    let (mut session, _) = session_with(false, None);
    session.submit(None, CHAT).unwrap();
    session.analyze().unwrap();

    let json = session.report().unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value["generated_at"].is_string());
    assert_eq!(value["summary"]["total"], 7);
    assert_eq!(value["summary"]["toxic_count"], 3);
    assert_eq!(value["summary"]["ranking"]["entries"][0]["player"], "Reyna");
    assert_eq!(value["summary"]["ranking"]["entries"][0]["toxic_count"], 2);
    assert_eq!(value["chart"]["bars"][0]["label"], "Non-toxic");
    assert_eq!(value["chart"]["bars"][0]["count"], 4);
    assert_eq!(value["chart"]["bars"][1]["count"], 3);

    let rows = value["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[1]["player"], "Reyna");
    assert_eq!(rows[1]["message"], "you are trash");
    assert_eq!(rows[1]["label"], "offensive");
    assert_eq!(rows[1]["toxic"], true);
    assert!(rows[2]["label"].is_null());
}

/// Tests the media type reported by the text chart renderer.
#[test]
fn test_text_chart_media_type() {
    let renderer = VtTextChartRenderer::default();
    let dyn_renderer: &dyn VtChartRenderer = &renderer;
    assert_eq!(dyn_renderer.media_type(), "text/plain");
}

/// Classifier that answers with the text it was given, after a delay that
/// varies from message to message.
#[cfg(feature = "parallel")]
#[derive(Debug)]
struct EchoClassifier;

#[cfg(feature = "parallel")]
impl VtClassifier for EchoClassifier {
    fn name(&self) -> &str {
        "echo"
    }

    fn classify(&self, text: &str) -> VtResult<Vec<VtLabelScore>> {
        let delay = 1 + (text.len() * 7) % 29;
        std::thread::sleep(std::time::Duration::from_millis(delay as u64));
        Ok(vec![VtLabelScore::new(text, 0.5)])
    }
}

/// Tests that parallel classification keeps verdict i with message i.
#[cfg(feature = "parallel")]
#[test]
fn test_parallel_classification_preserves_order() {
    let pipeline = VtPipeline::new(VtToxicityConfig::default());
    let raw: Vec<String> = (0..40)
        .map(|i| format!("p{}: {}", i, "x".repeat(i + 1)))
        .collect();
    let messages = pipeline.parse(&raw.join("\n"));
    assert_eq!(messages.len(), 40);

    let verdicts = pipeline
        .classify_all_parallel(&EchoClassifier, &messages)
        .unwrap();

    assert_eq!(verdicts.len(), messages.len());
    for (message, verdict) in messages.iter().zip(&verdicts) {
        assert_eq!(verdict.label.as_deref(), Some(message.text.as_str()));
    }

    let analysis = pipeline.analyze(&EchoClassifier, &messages).unwrap();
    for (idx, row) in analysis.rows.iter().enumerate() {
        assert_eq!(row.message.player, format!("p{}", idx));
        assert_eq!(row.verdict.label.as_deref(), Some(row.message.text.as_str()));
    }
}
