//! Fill-in-the-blank sentence templates.
//!
//! Teachers author the sentence with the expected answers inline:
//!
//! ```text
//! La capitale de la France est {{Paris}}.
//! ```
//!
//! The template is parsed once, rendered to students with the answers
//! masked, and graded slot by slot with the fuzzy matcher.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TemplateError};
use crate::matching::{match_answer, MatchResult};

/// Placeholder shown to students in place of a blank.
pub const BLANK_PLACEHOLDER: &str = "____";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Segment {
    Text(String),
    /// Index into the expected answers.
    Blank(usize),
}

/// A parsed fill-in-the-blank sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankTemplate {
    segments: Vec<Segment>,
    answers: Vec<String>,
}

impl BlankTemplate {
    /// Parse a sentence with `{{expected answer}}` blank markers.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut answers = Vec::new();
        let mut rest = source;
        let mut offset = 0usize;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }

            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or(TemplateError::UnclosedBlank {
                offset: offset + start,
            })?;

            let answer = after[..end].trim();
            if answer.is_empty() {
                return Err(TemplateError::EmptyBlank {
                    index: answers.len(),
                });
            }

            segments.push(Segment::Blank(answers.len()));
            answers.push(answer.to_string());

            offset += start + 2 + end + 2;
            rest = &after[end + 2..];
        }

        if answers.is_empty() {
            return Err(TemplateError::NoBlanks);
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments, answers })
    }

    /// Number of blanks the student has to fill.
    pub fn blank_count(&self) -> usize {
        self.answers.len()
    }

    /// Expected answers in slot order.
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// The sentence with blanks masked for display.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Blank(_) => out.push_str(BLANK_PLACEHOLDER),
            }
        }
        out
    }

    /// Grade one submission per blank slot.
    ///
    /// Slots are graded independently; the sentence is only correct when
    /// every slot matches. A missing submission grades its slot incorrect,
    /// surplus submissions are ignored.
    pub fn grade(&self, submitted: &[String]) -> BlanksGrade {
        let slots: Vec<MatchResult> = self
            .answers
            .iter()
            .enumerate()
            .map(|(i, reference)| {
                let typed = submitted.get(i).map(String::as_str).unwrap_or("");
                match_answer(typed, reference)
            })
            .collect();

        let all_correct = slots.iter().all(|s| s.is_correct);
        BlanksGrade { slots, all_correct }
    }
}

/// Per-slot outcome of grading one fill-in-the-blank sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlanksGrade {
    pub slots: Vec<MatchResult>,
    /// True only when every slot matched. Partial credit is a display
    /// concern, not computed here.
    pub all_correct: bool,
}
