//! Analysis request types

use serde::{Deserialize, Serialize};

/// The three analysis actions offered on a processed paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Question answered in five labeled sections
    Question,
    /// Short bullet-point summary
    Summary,
    /// True/false comprehension quiz
    Quiz,
}

impl AnalysisKind {
    /// Label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Summary => "summary",
            Self::Quiz => "quiz",
        }
    }
}

/// Body of `POST /api/sessions/:id/ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The user's question about the paper
    pub question: String,
}
