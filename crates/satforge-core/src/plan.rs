//! TOML exam plan parser.
//!
//! Loads exam plans from TOML files and validates them. A plan declares, in
//! order, the (section, module) slots of the exam and how many questions each
//! slot draws, with optional difficulty quotas and per-skill caps.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{ModuleId, Section};

/// Per-difficulty quotas for one slot. Quotas must sum to the slot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyMix {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyMix {
    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }
}

/// One declared (section, module) slot of the exam.
#[derive(Debug, Clone)]
pub struct SlotPlan {
    pub section: Section,
    pub module: ModuleId,
    /// Number of questions to draw for this slot.
    pub count: usize,
    /// Optional difficulty quotas; when present, must sum to `count`.
    pub difficulty_mix: Option<DifficultyMix>,
    /// Optional cap on questions drawn per skill descriptor.
    pub max_per_skill: Option<usize>,
}

/// A full exam plan: declared slots in declared order, plus run options.
#[derive(Debug, Clone)]
pub struct ExamPlan {
    /// Exam name, used as the document title.
    pub name: String,
    /// Declared slots. Declaration order fixes selection order.
    pub slots: Vec<SlotPlan>,
    /// Optional random seed; a fresh one is drawn and reported when absent.
    pub seed: Option<u64>,
}

impl ExamPlan {
    /// Total questions the plan requests across all slots.
    pub fn total_count(&self) -> usize {
        self.slots.iter().map(|s| s.count).sum()
    }
}

/// Intermediate TOML structure for parsing plan files.
#[derive(Debug, Deserialize)]
struct TomlPlanFile {
    exam: TomlExamHeader,
    #[serde(default)]
    slots: Vec<TomlSlot>,
}

#[derive(Debug, Deserialize)]
struct TomlExamHeader {
    name: String,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TomlSlot {
    section: String,
    module: String,
    count: usize,
    #[serde(default)]
    difficulty_mix: Option<TomlDifficultyMix>,
    #[serde(default)]
    max_per_skill: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct TomlDifficultyMix {
    #[serde(default)]
    easy: usize,
    #[serde(default)]
    medium: usize,
    #[serde(default)]
    hard: usize,
}

/// Parse a TOML file into an `ExamPlan`.
pub fn parse_plan(path: &Path) -> Result<ExamPlan> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam plan: {}", path.display()))?;
    parse_plan_str(&content, path)
}

/// Parse a TOML string into an `ExamPlan` (useful for testing).
pub fn parse_plan_str(content: &str, source_path: &Path) -> Result<ExamPlan> {
    let parsed: TomlPlanFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let slots = parsed
        .slots
        .into_iter()
        .map(|s| {
            let section: Section = s
                .section
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{}", e))?;
            let module: ModuleId = s
                .module
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{}", e))?;
            Ok(SlotPlan {
                section,
                module,
                count: s.count,
                difficulty_mix: s.difficulty_mix.map(|m| DifficultyMix {
                    easy: m.easy,
                    medium: m.medium,
                    hard: m.hard,
                }),
                max_per_skill: s.max_per_skill,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ExamPlan {
        name: parsed.exam.name,
        slots,
        seed: parsed.exam.seed,
    })
}

/// A warning from plan validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The slot this warning refers to, if any.
    pub slot: Option<(Section, ModuleId)>,
    /// Warning message.
    pub message: String,
}

/// Validate a plan for common issues.
pub fn validate_plan(plan: &ExamPlan) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if plan.slots.is_empty() {
        warnings.push(ValidationWarning {
            slot: None,
            message: "plan declares no slots".into(),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for slot in &plan.slots {
        let key = (slot.section, slot.module);
        if !seen.insert(key) {
            warnings.push(ValidationWarning {
                slot: Some(key),
                message: format!("duplicate slot: {} {}", slot.section, slot.module),
            });
        }
        if slot.count == 0 {
            warnings.push(ValidationWarning {
                slot: Some(key),
                message: "slot requests zero questions".into(),
            });
        }
        if let Some(mix) = &slot.difficulty_mix {
            if mix.total() != slot.count {
                warnings.push(ValidationWarning {
                    slot: Some(key),
                    message: format!(
                        "difficulty mix sums to {} but count is {}",
                        mix.total(),
                        slot.count
                    ),
                });
            }
        }
        if slot.max_per_skill == Some(0) {
            warnings.push(ValidationWarning {
                slot: Some(key),
                message: "max_per_skill of 0 makes every question ineligible".into(),
            });
        }
    }

    warnings
}
