//! Prompt templates for paper analysis
//!
//! Kept short and explicit so small local models follow the structure.

use crate::generation::formatter::SectionLabel;

/// Prompt builder for the three analysis actions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Question prompt asking for the five labeled sections
    pub fn build_answer_prompt(context: &str, question: &str) -> String {
        format!(
            r#"Analyze this research paper content and answer the question.

CONTEXT: {context}

QUESTION: {question}

Structure your answer with these sections:
{sections}

Answer:"#,
            context = context,
            question = question.trim(),
            sections = Self::section_outline()
        )
    }

    /// Bullet-point summary prompt
    pub fn build_summary_prompt(context: &str) -> String {
        format!(
            r#"Summarize this research paper content in 100 words using bullet points:

{context}

Summary:"#,
            context = context
        )
    }

    /// True/false quiz prompt
    pub fn build_quiz_prompt(context: &str) -> String {
        format!(
            r#"Generate 3 true/false questions based on this research paper content. For each question, provide the answer and explanation.

{context}

Questions:"#,
            context = context
        )
    }

    /// Numbered outline of the answer sections with a hint per section
    fn section_outline() -> String {
        SectionLabel::ALL
            .iter()
            .map(|label| format!("{}. {}: [{}]", label.ordinal(), label.as_str(), label.hint()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
