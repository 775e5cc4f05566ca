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

//! # Report Module
//!
//! Presentation data for one analysis pass: text tables for the parsed and
//! analyzed messages, the ranking table, the summary lines and the two-bar
//! toxic vs non-toxic chart. Drawing the chart is delegated to a
//! [`VtChartRenderer`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

use crate::errors::{Result, VtError};
use crate::inspect::{VtSummary, VtToxicRanking};
use crate::message::{VtAnalysisRow, VtMessage};

#[derive(Tabled)]
struct MessageTableRow {
    time: String,
    player: String,
    message: String,
}

#[derive(Tabled)]
struct AnalysisTableRow {
    time: String,
    player: String,
    message: String,
    label: String,
    score: String,
    toxic: bool,
}

#[derive(Tabled)]
struct RankingTableRow {
    player: String,
    toxic_count: usize,
}

/// Table of parsed messages, shown before analysis.
pub fn render_messages(messages: &[VtMessage]) -> String {
    Table::new(messages.iter().map(|m| MessageTableRow {
        time: m.time.clone(),
        player: m.player.clone(),
        message: m.text.clone(),
    }))
    .to_string()
}

/// Table of analyzed messages.
pub fn render_analysis(rows: &[VtAnalysisRow]) -> String {
    Table::new(rows.iter().map(|r| AnalysisTableRow {
        time: r.message.time.clone(),
        player: r.message.player.clone(),
        message: r.message.text.clone(),
        label: r.verdict.label.clone().unwrap_or_default(),
        score: format!("{:.4}", r.verdict.score),
        toxic: r.verdict.is_toxic,
    }))
    .to_string()
}

/// Ranking table, or `None` when no player has a toxic message.
pub fn render_ranking(ranking: &VtToxicRanking) -> Option<String> {
    if ranking.is_empty() {
        return None;
    }
    Some(
        Table::new(ranking.entries.iter().map(|e| RankingTableRow {
            player: e.player.clone(),
            toxic_count: e.toxic_count,
        }))
        .to_string(),
    )
}

/// Human-readable totals.
pub fn summary_lines(summary: &VtSummary) -> Vec<String> {
    vec![
        format!("Total messages analyzed: {}", summary.total),
        format!(
            "Toxic messages: {} ({:.1}%)",
            summary.toxic_count, summary.toxic_percentage
        ),
    ]
}

/// One bar of a bar chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtBar {
    pub label: String,
    pub count: usize,
    /// Hex colour hint for renderers.
    pub color: String,
}

/// Bar chart request handed to a renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<VtBar>,
}

impl VtBarChart {
    /// Toxic vs non-toxic counts.
    pub fn toxicity(summary: &VtSummary) -> Self {
        VtBarChart {
            title: "Toxic vs Non-toxic".to_string(),
            x_label: "Toxic".to_string(),
            y_label: "Count".to_string(),
            bars: vec![
                VtBar {
                    label: "Non-toxic".to_string(),
                    count: summary.non_toxic_count(),
                    color: "#2ecc71".to_string(),
                },
                VtBar {
                    label: "Toxic".to_string(),
                    count: summary.toxic_count,
                    color: "#e74c3c".to_string(),
                },
            ],
        }
    }

    pub fn count_of(&self, label: &str) -> Option<usize> {
        self.bars.iter().find(|b| b.label == label).map(|b| b.count)
    }
}

/// Plotting capability that turns a chart request into a displayable image.
pub trait VtChartRenderer {
    /// Media type of the rendered output, e.g. `text/plain` or `image/png`.
    fn media_type(&self) -> &str;

    fn render(&self, chart: &VtBarChart) -> Result<Vec<u8>>;
}

/// Renders bars as rows of `#` characters.
#[derive(Clone, Debug)]
pub struct VtTextChartRenderer {
    width: usize,
}

impl Default for VtTextChartRenderer {
    fn default() -> Self {
        Self { width: 40 }
    }
}

impl VtTextChartRenderer {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl VtChartRenderer for VtTextChartRenderer {
    fn media_type(&self) -> &str {
        "text/plain"
    }

    fn render(&self, chart: &VtBarChart) -> Result<Vec<u8>> {
        if self.width == 0 {
            return Err(VtError::export("chart width must be positive"));
        }

        let max = chart.bars.iter().map(|b| b.count).max().unwrap_or(0);
        let label_width = chart
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = format!("{}\n{} / {}\n", chart.title, chart.x_label, chart.y_label);
        for bar in &chart.bars {
            let len = if max == 0 {
                0
            } else {
                bar.count * self.width / max
            };
            out.push_str(&format!(
                "{:<lw$} | {} {}\n",
                bar.label,
                "#".repeat(len),
                bar.count,
                lw = label_width
            ));
        }
        Ok(out.into_bytes())
    }
}

/// Serializable snapshot of one analysis pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VtReport {
    pub generated_at: DateTime<Utc>,
    pub summary: VtSummary,
    pub chart: VtBarChart,
    pub rows: Vec<VtAnalysisRow>,
}

impl VtReport {
    pub fn new(rows: Vec<VtAnalysisRow>, summary: VtSummary) -> Self {
        VtReport {
            generated_at: Utc::now(),
            chart: VtBarChart::toxicity(&summary),
            summary,
            rows,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VtError::internal(format!("Failed to serialize report: {}", e)))
    }

    /// Summary lines followed by the ranking table when there is one.
    pub fn render_text(&self) -> String {
        let mut out = summary_lines(&self.summary).join("\n");
        if let Some(table) = render_ranking(&self.summary.ranking) {
            out.push_str("\n\nTop Toxic Players\n");
            out.push_str(&table);
        }
        out
    }
}
