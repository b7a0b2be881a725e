//! Language-model collaborators
//!
//! This module provides the default link categorizer and record extractor,
//! both backed by an OpenAI-compatible chat completion endpoint, plus an
//! offline categorizer that works from URL shapes alone.

mod categorizer;
mod extractor;
mod openai;

pub use categorizer::{categorization_prompt, HeuristicCategorizer, LlmLinkCategorizer};
pub use extractor::{extraction_prompt, parse_posted_date, LlmRecordExtractor};
pub use openai::{strip_code_fence, OpenAiClient};
