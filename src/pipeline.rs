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

//! # Analysis Pipeline
//!
//! One sequential pass: parse the chat text, classify every message in input
//! order, join messages and verdicts by position, then aggregate.
//!
//! With the `parallel` feature, [`VtPipeline::classify_all_parallel`] spreads
//! classification over a Rayon pool. Each verdict is tagged with its message
//! index and reassembled in input order before the positional join.

use serde::{Deserialize, Serialize};

use crate::classify::{VtClassifier, VtClassifierAdapter};
use crate::config::VtToxicityConfig;
use crate::errors::Result;
#[cfg(feature = "parallel")]
use crate::errors::VtError;
use crate::ingest::VtChatParser;
use crate::inspect::VtSummary;
use crate::message::{VtAnalysisRow, VtMessage, VtMessageBatch, VtVerdict};

/// Output of one analysis pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VtAnalysis {
    pub rows: Vec<VtAnalysisRow>,
    pub summary: VtSummary,
}

/// Parser, classifier adapter and aggregator wired together.
#[derive(Clone, Debug, Default)]
pub struct VtPipeline {
    parser: VtChatParser,
    adapter: VtClassifierAdapter,
}

impl VtPipeline {
    pub fn new(toxicity: VtToxicityConfig) -> Self {
        VtPipeline {
            parser: VtChatParser::new(),
            adapter: VtClassifierAdapter::new(toxicity),
        }
    }

    pub fn adapter(&self) -> &VtClassifierAdapter {
        &self.adapter
    }

    pub fn parse(&self, raw: &str) -> VtMessageBatch {
        self.parser.parse(raw)
    }

    /// Classifies every message in input order. The first failure aborts the
    /// whole pass.
    pub fn classify_all(
        &self,
        classifier: &dyn VtClassifier,
        messages: &[VtMessage],
    ) -> Result<Vec<VtVerdict>> {
        self.classify_all_with_progress(classifier, messages, |_, _| {})
    }

    /// Like [`classify_all`](Self::classify_all), calling `progress(done, total)`
    /// after each message.
    pub fn classify_all_with_progress(
        &self,
        classifier: &dyn VtClassifier,
        messages: &[VtMessage],
        mut progress: impl FnMut(usize, usize),
    ) -> Result<Vec<VtVerdict>> {
        let total = messages.len();
        let mut verdicts = Vec::with_capacity(total);
        for (idx, message) in messages.iter().enumerate() {
            verdicts.push(self.adapter.classify(classifier, &message.text)?);
            progress(idx + 1, total);
        }
        Ok(verdicts)
    }

    /// Classifies on the Rayon pool and restores input order.
    #[cfg(feature = "parallel")]
    pub fn classify_all_parallel(
        &self,
        classifier: &dyn VtClassifier,
        messages: &[VtMessage],
    ) -> Result<Vec<VtVerdict>> {
        use rayon::prelude::*;

        let mut tagged: Vec<(usize, VtVerdict)> = messages
            .par_iter()
            .enumerate()
            .map(|(idx, message)| {
                self.adapter
                    .classify(classifier, &message.text)
                    .map(|verdict| (idx, verdict))
            })
            .collect::<Result<Vec<_>>>()?;

        tagged.sort_by_key(|(idx, _)| *idx);
        if tagged.iter().enumerate().any(|(pos, (idx, _))| pos != *idx) {
            return Err(VtError::pipeline(
                "classify",
                "parallel classification lost or duplicated a message",
            ));
        }

        Ok(tagged.into_iter().map(|(_, verdict)| verdict).collect())
    }

    /// Joins messages with their verdicts and aggregates the result.
    pub fn assemble(
        &self,
        messages: &[VtMessage],
        verdicts: Vec<VtVerdict>,
    ) -> Result<VtAnalysis> {
        let rows = VtAnalysisRow::join(messages, verdicts)?;
        let summary = VtSummary::compute(&rows);
        Ok(VtAnalysis { rows, summary })
    }

    /// Classifies and aggregates already-parsed messages.
    pub fn analyze(
        &self,
        classifier: &dyn VtClassifier,
        messages: &[VtMessage],
    ) -> Result<VtAnalysis> {
        log::info!(
            "Analyzing {} messages with '{}'",
            messages.len(),
            classifier.name()
        );

        #[cfg(feature = "parallel")]
        let verdicts = self.classify_all_parallel(classifier, messages)?;
        #[cfg(not(feature = "parallel"))]
        let verdicts = self.classify_all(classifier, messages)?;

        self.assemble(messages, verdicts)
    }

    /// Parses, classifies and aggregates raw chat text.
    pub fn run(&self, classifier: &dyn VtClassifier, raw: &str) -> Result<VtAnalysis> {
        let messages = self.parse(raw);
        self.analyze(classifier, &messages)
    }
}
