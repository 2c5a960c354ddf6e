//! Generative-AI analysis of the day's notes

mod client;
mod gemini;
mod prompt;

pub use client::AnalyzerClient;
pub use gemini::{extract_summary, GeminiAnalyzer, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use prompt::build_prompt;
