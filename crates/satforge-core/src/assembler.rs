//! Exam assembly and answer-key derivation.
//!
//! The assembler arranges the selector's output into the canonical document
//! structure (sections in fixed order, module 1 before module 2) and assigns
//! the global question numbering. That numbering is the single source of
//! truth: the renderer consumes it verbatim for both the exam body and the
//! answer-summary tables, so the two can never drift apart.

use serde::{Deserialize, Serialize};

use crate::error::{AssemblyError, Result};
use crate::model::{ModuleId, Question, Section};
use crate::plan::ExamPlan;
use crate::selector::Selection;

/// A question with its global 1-based number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberedQuestion {
    pub number: usize,
    pub question: Question,
}

/// One module of the assembled exam, questions in draw order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamModule {
    pub module: ModuleId,
    pub questions: Vec<NumberedQuestion>,
}

/// One section of the assembled exam, modules in canonical order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSection {
    pub section: Section,
    pub modules: Vec<ExamModule>,
}

/// The assembled exam: transient, recomputed per run, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledExam {
    /// Exam title, taken from the plan.
    pub title: String,
    /// Sections in canonical order: Reading & Writing, then Math.
    pub sections: Vec<ExamSection>,
    /// The seed the selection ran with.
    pub seed: u64,
}

impl AssembledExam {
    pub fn total_questions(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.modules)
            .map(|m| m.questions.len())
            .sum()
    }
}

/// One answer-key row: global number, question id, correct letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
    pub number: usize,
    pub question_id: String,
    pub correct: char,
}

/// Arrange a selection into the canonical exam structure and derive its key.
pub fn assemble(
    selection: &Selection,
    plan: &ExamPlan,
) -> Result<(AssembledExam, Vec<AnswerKeyEntry>)> {
    if plan.total_count() == 0 || selection.total_questions() == 0 {
        return Err(AssemblyError::EmptySpec);
    }

    let mut sections = Vec::new();
    let mut answer_key = Vec::new();
    let mut number = 0usize;

    for section in Section::ALL {
        let mut modules = Vec::new();
        for module in ModuleId::ALL {
            // Selection order within a module is preserved; only the
            // section/module grouping is canonicalized here.
            let drawn: Vec<&Question> = selection
                .slots
                .iter()
                .filter(|s| s.section == section && s.module == module)
                .flat_map(|s| &s.questions)
                .collect();
            if drawn.is_empty() {
                continue;
            }

            let mut questions = Vec::with_capacity(drawn.len());
            for question in drawn {
                number += 1;
                answer_key.push(AnswerKeyEntry {
                    number,
                    question_id: question.id.clone(),
                    correct: question.correct,
                });
                questions.push(NumberedQuestion {
                    number,
                    question: question.clone(),
                });
            }
            modules.push(ExamModule { module, questions });
        }
        if !modules.is_empty() {
            sections.push(ExamSection { section, modules });
        }
    }

    Ok((
        AssembledExam {
            title: plan.name.clone(),
            sections,
            seed: selection.seed,
        },
        answer_key,
    ))
}
