//! Prompt assembly, inference calls and reply formatting

pub mod formatter;
pub mod ollama;
pub mod prompt;

pub use formatter::{ResponseFormatter, ResponseSections, SectionEntry, SectionLabel, PLACEHOLDER};
pub use ollama::{InferenceError, OllamaClient};
pub use prompt::PromptBuilder;
