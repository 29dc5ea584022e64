//! Summarization adapter
//!
//! Builds the fixed session-summary prompt and sends it to the DeepSeek
//! chat-completions endpoint. The remote model is a black box: status 200
//! with a first choice is a summary, everything else is an error.

mod deepseek;
mod prompt;

pub use deepseek::{DeepSeekSummarizer, SummarizeError, Summarizer};
pub use prompt::build_summary_prompt;
