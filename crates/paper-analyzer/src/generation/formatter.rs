//! Splits a model reply into the fixed answer sections and renders Markdown
//!
//! This is a best-effort line scanner, not a grammar. A line switches the
//! current section when it mentions a section name or starts with that
//! section's ordinal (`"3."`); every other non-blank line is appended to the
//! current section. Small models drift from the requested layout, so some
//! misclassification is expected.

use serde::{Deserialize, Serialize};

use super::ollama::InferenceError;

/// Shown for a section the reply never filled
pub const PLACEHOLDER: &str = "*Information not specified in response*";

const ANALYSIS_TITLE: &str = "## 📊 Research Paper Analysis";
const SUMMARY_TITLE: &str = "### 📄 Paper Summary";
const QUIZ_TITLE: &str = "### ❓ Comprehension Quiz";

/// The five answer sections, in prompt order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionLabel {
    #[serde(rename = "KEY CONCEPT")]
    KeyConcept,
    #[serde(rename = "MATHEMATICAL FORMULATION")]
    MathematicalFormulation,
    #[serde(rename = "MATHEMATICAL INTUITION")]
    MathematicalIntuition,
    #[serde(rename = "PRACTICAL IMPLICATIONS")]
    PracticalImplications,
    #[serde(rename = "SUMMARY")]
    Summary,
}

impl SectionLabel {
    pub const ALL: [SectionLabel; 5] = [
        SectionLabel::KeyConcept,
        SectionLabel::MathematicalFormulation,
        SectionLabel::MathematicalIntuition,
        SectionLabel::PracticalImplications,
        SectionLabel::Summary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyConcept => "KEY CONCEPT",
            Self::MathematicalFormulation => "MATHEMATICAL FORMULATION",
            Self::MathematicalIntuition => "MATHEMATICAL INTUITION",
            Self::PracticalImplications => "PRACTICAL IMPLICATIONS",
            Self::Summary => "SUMMARY",
        }
    }

    /// 1-based position in the answer outline
    pub fn ordinal(&self) -> usize {
        self.index() + 1
    }

    fn index(&self) -> usize {
        match self {
            Self::KeyConcept => 0,
            Self::MathematicalFormulation => 1,
            Self::MathematicalIntuition => 2,
            Self::PracticalImplications => 3,
            Self::Summary => 4,
        }
    }

    /// What the prompt asks for in this section
    pub fn hint(&self) -> &'static str {
        match self {
            Self::KeyConcept => "1-2 sentences",
            Self::MathematicalFormulation => "equations and formulas",
            Self::MathematicalIntuition => "meaning and significance",
            Self::PracticalImplications => "3-5 applications",
            Self::Summary => "2-3 sentence recap",
        }
    }

    /// Section a line introduces, if any (first match in outline order wins)
    fn detect(line: &str) -> Option<Self> {
        let upper = line.to_uppercase();
        Self::ALL.into_iter().find(|label| {
            upper.contains(label.as_str()) || line.starts_with(&format!("{}.", label.ordinal()))
        })
    }
}

/// One rendered section for API consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub label: SectionLabel,
    /// Section text, or the placeholder
    pub content: String,
    /// False when the reply never filled this section
    pub found: bool,
}

/// Reply text grouped by section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSections {
    contents: [String; 5],
    raw_is_blank: bool,
}

impl ResponseSections {
    /// Scan a raw reply line by line
    pub fn parse(raw: &str) -> Self {
        let mut contents: [String; 5] = Default::default();
        let mut current: Option<SectionLabel> = None;

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(label) = SectionLabel::detect(line) {
                current = Some(label);
                if let Some(rest) = inline_content(line, label) {
                    append(&mut contents[label.index()], rest);
                }
            } else if let Some(label) = current {
                append(&mut contents[label.index()], line);
            }
        }

        Self {
            contents,
            raw_is_blank: raw.trim().is_empty(),
        }
    }

    /// Section text, or the placeholder when the section is missing
    pub fn get(&self, label: SectionLabel) -> &str {
        let content = &self.contents[label.index()];
        if content.is_empty() {
            PLACEHOLDER
        } else {
            content
        }
    }

    pub fn is_found(&self, label: SectionLabel) -> bool {
        !self.contents[label.index()].is_empty()
    }

    /// Sections the reply never filled
    pub fn missing(&self) -> Vec<SectionLabel> {
        SectionLabel::ALL
            .into_iter()
            .filter(|l| !self.is_found(*l))
            .collect()
    }

    pub fn entries(&self) -> Vec<SectionEntry> {
        SectionLabel::ALL
            .into_iter()
            .map(|label| SectionEntry {
                label,
                content: self.get(label).to_string(),
                found: self.is_found(label),
            })
            .collect()
    }

    /// Markdown with one `###` block per section
    ///
    /// A blank reply renders the title only.
    pub fn to_markdown(&self) -> String {
        let mut out = format!("{}\n\n", ANALYSIS_TITLE);
        if self.raw_is_blank {
            return out;
        }
        for label in SectionLabel::ALL {
            out.push_str(&format!("### {}\n{}\n\n", label.as_str(), self.get(label)));
        }
        out
    }
}

fn append(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

/// Text after `LABEL:` on a header line, e.g. `1. **KEY CONCEPT:** Attention...`
fn inline_content(line: &str, label: SectionLabel) -> Option<&str> {
    let name = label.as_str();
    let start = line
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| {
            line.get(i..i + name.len())
                .map(|s| s.eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })?;

    let after = line[start + name.len()..].trim_start_matches(['*', ' ', ')', ']']);
    let rest = after.strip_prefix(':')?;
    let rest = rest.trim().trim_start_matches('*').trim();

    if rest.is_empty() || (rest.starts_with('[') && rest.ends_with(']')) {
        None
    } else {
        Some(rest)
    }
}

/// Renders replies and failures for the page
pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Question replies: split into sections
    pub fn format_answer(raw: &str) -> (String, ResponseSections) {
        let sections = ResponseSections::parse(raw);
        (sections.to_markdown(), sections)
    }

    pub fn format_summary(raw: &str) -> String {
        format!("{}\n{}", SUMMARY_TITLE, raw.trim())
    }

    pub fn format_quiz(raw: &str) -> String {
        format!("{}\n{}", QUIZ_TITLE, raw.trim())
    }

    /// Failure shown in place of an answer
    pub fn format_error(err: &InferenceError) -> String {
        format!("**❌ {}**", err)
    }
}
