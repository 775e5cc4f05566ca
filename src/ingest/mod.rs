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

//! # Chat Ingestion Module
//!
//! - **source**: picks and decodes the chat text (upload or pasted)
//! - **parser**: splits chat text into ordered messages

pub mod parser;
pub mod source;

pub use parser::{parse_chat, VtChatParser, VtLinePattern, VtParseStats};
pub use source::{VtChatInput, VtInputKind};
