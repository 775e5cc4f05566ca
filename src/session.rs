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

//! # Analysis Session
//!
//! Drives one user's workflow in the order the analyst sees it:
//!
//! 1. [`submit`](VtSession::submit) an upload or pasted text; nothing to
//!    analyze yields a notice, otherwise the text is parsed for preview.
//! 2. [`load_classifier`](VtSession::load_classifier) runs the one-time
//!    classifier load (also triggered by the first analysis).
//! 3. [`analyze`](VtSession::analyze) classifies every parsed message and
//!    aggregates the result.
//! 4. Tables, the chart and the CSV artifact are produced from that result.
//!
//! A failed analysis leaves no partial result behind.

use crate::classify::{VtClassifierHandle, VtClassifierLoader, VtHttpClassifierLoader};
use crate::config::VtAnalyzerConfig;
use crate::errors::{Result, VtError};
use crate::export::{
    render_analysis, render_messages, VtBarChart, VtChartRenderer, VtCsvWriter,
    VtExportArtifact, VtReport,
};
use crate::ingest::VtChatInput;
use crate::message::VtMessage;
use crate::pipeline::{VtAnalysis, VtPipeline};

/// Notice shown when neither an upload nor pasted text was provided.
pub const EMPTY_INPUT_NOTICE: &str = "Upload a file or paste text to analyze.";

/// Result of submitting chat input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VtSubmitOutcome {
    /// Nothing to analyze; processing stops here.
    Notice(String),
    /// Input was parsed into this many messages.
    Parsed { messages: usize },
}

#[derive(Debug)]
pub struct VtSession {
    config: VtAnalyzerConfig,
    pipeline: VtPipeline,
    classifier: VtClassifierHandle,
    messages: Option<Vec<VtMessage>>,
    analysis: Option<VtAnalysis>,
}

impl VtSession {
    /// Creates a session around a classifier loader. The loader is not run
    /// until the classifier is first needed.
    pub fn new(config: VtAnalyzerConfig, loader: Box<dyn VtClassifierLoader>) -> Result<Self> {
        config.validate()?;
        Ok(VtSession {
            pipeline: VtPipeline::new(config.toxicity.clone()),
            classifier: VtClassifierHandle::new(loader),
            config,
            messages: None,
            analysis: None,
        })
    }

    /// Creates a session using the hosted classifier from `config.classifier`.
    pub fn with_http_classifier(config: VtAnalyzerConfig) -> Result<Self> {
        let loader = VtHttpClassifierLoader::new(config.classifier.clone());
        Self::new(config, Box::new(loader))
    }

    pub fn config(&self) -> &VtAnalyzerConfig {
        &self.config
    }

    /// Accepts new input, replacing any previous messages and results.
    pub fn submit(&mut self, upload: Option<&[u8]>, pasted: &str) -> Result<VtSubmitOutcome> {
        self.messages = None;
        self.analysis = None;

        let Some(input) = VtChatInput::resolve(upload, pasted)? else {
            return Ok(VtSubmitOutcome::Notice(EMPTY_INPUT_NOTICE.to_string()));
        };

        let messages = self.pipeline.parse(&input.text);
        let count = messages.len();
        log::info!("Parsed {} messages from {}", count, input.kind.as_str());
        self.messages = Some(messages);
        Ok(VtSubmitOutcome::Parsed { messages: count })
    }

    /// Parsed messages, empty before a successful submit.
    pub fn messages(&self) -> &[VtMessage] {
        self.messages.as_deref().unwrap_or(&[])
    }

    /// Preview table of parsed messages.
    pub fn preview(&self) -> Option<String> {
        self.messages.as_deref().map(render_messages)
    }

    pub fn classifier_loaded(&self) -> bool {
        self.classifier.is_loaded()
    }

    /// Loads the classifier if it is not loaded yet.
    pub fn load_classifier(&self) -> Result<()> {
        self.classifier.get().map(|_| ())
    }

    /// Classifies all parsed messages and aggregates the result.
    pub fn analyze(&mut self) -> Result<&VtAnalysis> {
        self.analysis = None;

        let messages = self
            .messages
            .as_deref()
            .ok_or_else(|| VtError::pipeline("analyze", "no chat input has been submitted"))?;
        let classifier = self.classifier.get()?;
        let analysis = self.pipeline.analyze(classifier, messages)?;

        Ok(self.analysis.insert(analysis))
    }

    pub fn analysis(&self) -> Option<&VtAnalysis> {
        self.analysis.as_ref()
    }

    fn require_analysis(&self, stage: &str) -> Result<&VtAnalysis> {
        self.analysis
            .as_ref()
            .ok_or_else(|| VtError::pipeline(stage, "messages have not been analyzed"))
    }

    /// Table of analyzed messages.
    pub fn results_table(&self) -> Result<String> {
        Ok(render_analysis(&self.require_analysis("results")?.rows))
    }

    pub fn report(&self) -> Result<VtReport> {
        let analysis = self.require_analysis("report")?;
        Ok(VtReport::new(analysis.rows.clone(), analysis.summary.clone()))
    }

    /// Asks `renderer` to draw the toxic vs non-toxic chart.
    pub fn render_chart(&self, renderer: &dyn VtChartRenderer) -> Result<Vec<u8>> {
        let analysis = self.require_analysis("chart")?;
        renderer.render(&VtBarChart::toxicity(&analysis.summary))
    }

    /// Builds the downloadable CSV artifact.
    pub fn export(&self) -> Result<VtExportArtifact> {
        let analysis = self.require_analysis("export")?;
        VtCsvWriter::new()
            .with_config(self.config.export.clone())
            .artifact(&analysis.rows)
    }
}
