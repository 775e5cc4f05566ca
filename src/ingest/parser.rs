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

//! # Chat Parser
//!
//! Turns raw chat text into an ordered [`VtMessageBatch`]. Each non-blank,
//! trimmed line becomes exactly one message; the first matching rule wins:
//!
//! 1. `[time] player: message` captures all three fields verbatim.
//! 2. Otherwise a line with a colon is split on its first colon into a
//!    trimmed player and a trimmed message.
//! 3. Otherwise the whole line is the message.
//!
//! Every line is consumed by some rule, so parsing cannot fail.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::message::{VtMessage, VtMessageBatch};

static BRACKETED_LINE: OnceLock<Regex> = OnceLock::new();

fn bracketed_line() -> &'static Regex {
    BRACKETED_LINE.get_or_init(|| {
        Regex::new(r"^\[(.*?)\]\s*(.*?):\s*(.*)").expect("bracketed line pattern is valid")
    })
}

/// Line separators recognised when splitting raw text into lines.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Characters stripped from line ends. Unicode whitespace plus the ASCII
/// information separators.
fn is_blank_char(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{1c}'..='\u{1f}')
}

fn trim_blank(s: &str) -> &str {
    s.trim_matches(is_blank_char)
}

/// Which rule produced a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VtLinePattern {
    Bracketed,
    ColonSplit,
    TextOnly,
}

/// Counters collected while parsing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtParseStats {
    pub lines_seen: usize,
    pub blank_skipped: usize,
    pub bracketed: usize,
    pub colon_split: usize,
    pub text_only: usize,
}

impl VtParseStats {
    pub fn messages(&self) -> usize {
        self.bracketed + self.colon_split + self.text_only
    }

    fn record(&mut self, pattern: VtLinePattern) {
        match pattern {
            VtLinePattern::Bracketed => self.bracketed += 1,
            VtLinePattern::ColonSplit => self.colon_split += 1,
            VtLinePattern::TextOnly => self.text_only += 1,
        }
    }
}

/// Line-oriented chat log parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct VtChatParser;

impl VtChatParser {
    pub fn new() -> Self {
        VtChatParser
    }

    /// Parses raw text into messages, one per non-blank line, in input order.
    pub fn parse(&self, raw: &str) -> VtMessageBatch {
        self.parse_with_stats(raw).0
    }

    /// Like [`parse`](Self::parse) but also reports which rules fired.
    pub fn parse_with_stats(&self, raw: &str) -> (VtMessageBatch, VtParseStats) {
        let mut stats = VtParseStats::default();
        let mut messages = Vec::new();

        for line in raw.split(is_line_break) {
            stats.lines_seen += 1;
            let line = trim_blank(line);
            if line.is_empty() {
                stats.blank_skipped += 1;
                continue;
            }

            let (message, pattern) = self.parse_line(line);
            stats.record(pattern);
            messages.push(message);
        }

        log::debug!(
            "Parsed {} messages ({} bracketed, {} colon split, {} text only, {} blank skipped)",
            stats.messages(),
            stats.bracketed,
            stats.colon_split,
            stats.text_only,
            stats.blank_skipped
        );

        (messages, stats)
    }

    /// Parses one already-trimmed, non-blank line.
    pub fn parse_line(&self, line: &str) -> (VtMessage, VtLinePattern) {
        if let Some(caps) = bracketed_line().captures(line) {
            let field = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();
            return (
                VtMessage::new(field(1), field(2), field(3)),
                VtLinePattern::Bracketed,
            );
        }

        match line.split_once(':') {
            Some((player, text)) => (
                VtMessage::new("", trim_blank(player), trim_blank(text)),
                VtLinePattern::ColonSplit,
            ),
            None => (VtMessage::text_only(line), VtLinePattern::TextOnly),
        }
    }
}

/// Parses raw chat text with the default parser.
pub fn parse_chat(raw: &str) -> VtMessageBatch {
    VtChatParser::new().parse(raw)
}
