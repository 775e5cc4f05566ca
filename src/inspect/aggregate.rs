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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::message::VtAnalysisRow;

/// Toxic message count for one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtRankingEntry {
    pub player: String,
    pub toxic_count: usize,
}

/// Players ordered by toxic message count, highest first.
///
/// Players with equal counts keep the order in which they first appeared in
/// a toxic row. Players without toxic rows are not listed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtToxicRanking {
    pub entries: Vec<VtRankingEntry>,
}

impl VtToxicRanking {
    pub fn compute(rows: &[VtAnalysisRow]) -> Self {
        let mut entries: Vec<VtRankingEntry> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for row in rows.iter().filter(|r| r.is_toxic()) {
            let Some(player) = row.message.player() else {
                continue;
            };
            match index.get(player) {
                Some(&i) => entries[i].toxic_count += 1,
                None => {
                    index.insert(player, entries.len());
                    entries.push(VtRankingEntry {
                        player: player.to_string(),
                        toxic_count: 1,
                    });
                }
            }
        }

        // sort_by is stable, ties keep first-appearance order
        entries.sort_by(|a, b| b.toxic_count.cmp(&a.toxic_count));
        VtToxicRanking { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `(player, count)` pairs in ranking order.
    pub fn pairs(&self) -> Vec<(&str, usize)> {
        self.entries
            .iter()
            .map(|e| (e.player.as_str(), e.toxic_count))
            .collect()
    }

    pub fn count_for(&self, player: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.player == player)
            .map(|e| e.toxic_count)
    }
}

/// Totals and ranking for one analysis pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VtSummary {
    pub total: usize,
    pub toxic_count: usize,
    /// Percentage of toxic rows, `0.0` when there are no rows.
    pub toxic_percentage: f64,
    pub ranking: VtToxicRanking,
}

impl VtSummary {
    pub fn compute(rows: &[VtAnalysisRow]) -> Self {
        let total = rows.len();
        let toxic_count = rows.iter().filter(|r| r.is_toxic()).count();
        let toxic_percentage = if total > 0 {
            toxic_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let summary = VtSummary {
            total,
            toxic_count,
            toxic_percentage,
            ranking: VtToxicRanking::compute(rows),
        };
        log::info!(
            "Aggregated {} messages: {} toxic ({:.1}%), {} ranked players",
            summary.total,
            summary.toxic_count,
            summary.toxic_percentage,
            summary.ranking.len()
        );
        summary
    }

    pub fn non_toxic_count(&self) -> usize {
        self.total.saturating_sub(self.toxic_count)
    }
}

/// Computes totals, toxic percentage and the player ranking.
pub fn aggregate(rows: &[VtAnalysisRow]) -> VtSummary {
    VtSummary::compute(rows)
}
