//! Core data model types for satforge.
//!
//! These are the fundamental types the entire system uses to represent
//! questions, exam structure, and rendering policy. Question records are
//! produced once by the crawler and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AssemblyError;

/// Top-level exam division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    ReadingWriting,
    Math,
}

impl Section {
    /// Canonical document order: Reading & Writing first, then Math.
    pub const ALL: [Section; 2] = [Section::ReadingWriting, Section::Math];

    /// Human-readable section title as it appears on the rendered page.
    pub fn title(&self) -> &'static str {
        match self {
            Section::ReadingWriting => "Reading and Writing",
            Section::Math => "Math",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::ReadingWriting => write!(f, "reading-writing"),
            Section::Math => write!(f, "math"),
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reading-writing" | "reading" | "rw" => Ok(Section::ReadingWriting),
            "math" => Ok(Section::Math),
            other => Err(format!("unknown section: {other}")),
        }
    }
}

/// Difficulty-tier grouping of questions within a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModuleId {
    #[serde(rename = "module-1")]
    Module1,
    #[serde(rename = "module-2")]
    Module2,
}

impl ModuleId {
    /// Canonical in-section order: module 1 before module 2.
    pub const ALL: [ModuleId; 2] = [ModuleId::Module1, ModuleId::Module2];

    pub fn title(&self) -> &'static str {
        match self {
            ModuleId::Module1 => "Module 1",
            ModuleId::Module2 => "Module 2",
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleId::Module1 => write!(f, "module-1"),
            ModuleId::Module2 => write!(f, "module-2"),
        }
    }
}

impl FromStr for ModuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "module-1" | "1" => Ok(ModuleId::Module1),
            "module-2" | "2" => Ok(ModuleId::Module2),
            other => Err(format!("unknown module: {other}")),
        }
    }
}

/// Question difficulty band, serialized with the bank's single-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "E")]
    Easy,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "H")]
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "E"),
            Difficulty::Medium => write!(f, "M"),
            Difficulty::Hard => write!(f, "H"),
        }
    }
}

/// A single answer choice: its letter and rich-text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerChoice {
    /// Option letter, 'A' through 'D'.
    pub letter: char,
    /// Rich-text (HTML) body of the choice.
    pub content: String,
}

/// A single question record from the corpus. Immutable once crawled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Opaque stable identifier from the question bank.
    pub id: String,
    /// Section this question belongs to.
    pub section: Section,
    /// Difficulty-tier module within the section.
    pub module: ModuleId,
    /// Optional rich-text passage preceding the stem.
    #[serde(default)]
    pub stimulus: Option<String>,
    /// The question prompt.
    pub stem: String,
    /// Ordered answer choices, 2–4 entries, letters contiguous from 'A'.
    pub options: Vec<AnswerChoice>,
    /// Letter of the correct choice.
    pub correct: char,
    /// Optional rich-text explanation of the correct answer.
    #[serde(default)]
    pub rationale: Option<String>,
    /// Difficulty band, when the bank provides one.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Skill descriptor, when the bank provides one.
    #[serde(default)]
    pub skill: Option<String>,
}

impl Question {
    /// Check the option-letter invariant: 2–4 options, letters unique and
    /// contiguous starting at 'A', and `correct` referencing one of them.
    pub fn validate(&self) -> Result<(), AssemblyError> {
        if self.options.len() < 2 || self.options.len() > 4 {
            return Err(AssemblyError::malformed(
                &self.id,
                format!("expected 2-4 options, found {}", self.options.len()),
            ));
        }
        for (i, opt) in self.options.iter().enumerate() {
            let expected = (b'A' + i as u8) as char;
            if opt.letter != expected {
                return Err(AssemblyError::malformed(
                    &self.id,
                    format!("option {} has letter '{}', expected '{expected}'", i + 1, opt.letter),
                ));
            }
        }
        if !self.options.iter().any(|o| o.letter == self.correct) {
            return Err(AssemblyError::malformed(
                &self.id,
                format!("correct letter '{}' is not among the options", self.correct),
            ));
        }
        Ok(())
    }
}

/// Policy controlling whether answers and rationales appear in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityMode {
    /// Answers and rationales inline, plus per-module summary tables.
    Full,
    /// Only the per-module answer-summary tables; no question bodies.
    AnswersOnly,
    /// Question bodies only; no answers, rationales, or summary tables.
    NoAnswers,
}

impl fmt::Display for VisibilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisibilityMode::Full => write!(f, "full"),
            VisibilityMode::AnswersOnly => write!(f, "answers-only"),
            VisibilityMode::NoAnswers => write!(f, "no-answers"),
        }
    }
}

impl FromStr for VisibilityMode {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(VisibilityMode::Full),
            "answers-only" => Ok(VisibilityMode::AnswersOnly),
            "no-answers" => Ok(VisibilityMode::NoAnswers),
            other => Err(AssemblyError::InvalidMode(other.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_question(id: &str, section: Section, module: ModuleId) -> Question {
    Question {
        id: id.to_string(),
        section,
        module,
        stimulus: None,
        stem: format!("<p>Stem for {id}</p>"),
        options: vec![
            AnswerChoice { letter: 'A', content: "<p>first</p>".into() },
            AnswerChoice { letter: 'B', content: "<p>second</p>".into() },
            AnswerChoice { letter: 'C', content: "<p>third</p>".into() },
            AnswerChoice { letter: 'D', content: "<p>fourth</p>".into() },
        ],
        correct: 'B',
        rationale: Some(format!("<p>Because of {id}.</p>")),
        difficulty: Some(Difficulty::Medium),
        skill: None,
    }
}
