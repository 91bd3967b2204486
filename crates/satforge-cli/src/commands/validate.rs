//! The `satforge validate` command.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use anyhow::Result;

use satforge_core::corpus::load_corpus;
use satforge_core::model::{Difficulty, Question};
use satforge_core::plan::{parse_plan, validate_plan, ExamPlan};

pub fn execute(plan_path: PathBuf, corpus_path: Option<PathBuf>) -> Result<()> {
    let plan = parse_plan(&plan_path)?;
    println!(
        "Exam plan: {} ({} slots, {} questions)",
        plan.name,
        plan.slots.len(),
        plan.total_count()
    );

    let mut total_warnings = 0;

    for w in validate_plan(&plan) {
        let prefix = w
            .slot
            .map(|(section, module)| format!("  [{section} {module}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
        total_warnings += 1;
    }

    if let Some(corpus_path) = corpus_path {
        let questions = load_corpus(&corpus_path)?;
        println!("Corpus: {} ({} questions)", corpus_path.display(), questions.len());
        total_warnings += check_corpus(&questions);
        total_warnings += check_availability(&plan, &questions);
    }

    if total_warnings == 0 {
        println!("Plan is valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn check_corpus(questions: &[Question]) -> usize {
    let mut warnings = 0;

    let mut seen = HashSet::new();
    for question in questions {
        if !seen.insert(question.id.as_str()) {
            println!("  [{}] WARNING: duplicate question id", question.id);
            warnings += 1;
        }
        if let Err(e) = question.validate() {
            println!("  [{}] WARNING: {e}", question.id);
            warnings += 1;
        }
    }

    warnings
}

/// Check that each slot can be filled, including its difficulty quotas.
fn check_availability(plan: &ExamPlan, questions: &[Question]) -> usize {
    let mut warnings = 0;

    for slot in &plan.slots {
        let pool: Vec<&Question> = questions
            .iter()
            .filter(|q| q.section == slot.section && q.module == slot.module)
            .collect();

        if pool.len() < slot.count {
            println!(
                "  [{} {}] WARNING: plan requests {} questions but corpus has {}",
                slot.section,
                slot.module,
                slot.count,
                pool.len()
            );
            warnings += 1;
        }

        if let Some(mix) = &slot.difficulty_mix {
            let mut by_band: HashMap<Difficulty, usize> = HashMap::new();
            for q in &pool {
                if let Some(band) = q.difficulty {
                    *by_band.entry(band).or_default() += 1;
                }
            }
            let quotas = [
                (Difficulty::Easy, mix.easy),
                (Difficulty::Medium, mix.medium),
                (Difficulty::Hard, mix.hard),
            ];
            for (band, quota) in quotas {
                let available = by_band.get(&band).copied().unwrap_or(0);
                if available < quota {
                    println!(
                        "  [{} {}] WARNING: mix wants {quota} {band:?} questions but corpus has {available}",
                        slot.section, slot.module
                    );
                    warnings += 1;
                }
            }
        }
    }

    warnings
}
