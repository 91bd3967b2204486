//! The `satforge generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use satforge_core::assembler::assemble;
use satforge_core::corpus::load_corpus;
use satforge_core::model::VisibilityMode;
use satforge_core::plan::{parse_plan, validate_plan};
use satforge_core::selector::select;
use satforge_core::store::MemoryStore;
use satforge_report::html::{render, RenderWarning};
use satforge_report::writer::write_html_document;

pub fn execute(
    plan_path: PathBuf,
    corpus_path: PathBuf,
    output: PathBuf,
    mode_str: String,
    seed: Option<u64>,
    title: Option<String>,
) -> Result<()> {
    let mode: VisibilityMode = mode_str.parse()?;

    let mut plan = parse_plan(&plan_path)?;
    if let Some(seed) = seed {
        plan.seed = Some(seed);
    }
    if let Some(title) = title {
        plan.name = title;
    }

    for warning in validate_plan(&plan) {
        match warning.slot {
            Some((section, module)) => {
                eprintln!("  [{section} {module}] WARNING: {}", warning.message)
            }
            None => eprintln!("  WARNING: {}", warning.message),
        }
    }

    let questions = load_corpus(&corpus_path)?;
    tracing::info!(
        corpus = %corpus_path.display(),
        questions = questions.len(),
        "loaded corpus"
    );
    let store = MemoryStore::new(questions);

    let selection = select(&store, &plan)
        .with_context(|| format!("failed to fill plan `{}`", plan.name))?;
    let (exam, answer_key) = assemble(&selection, &plan)?;
    let document = render(&exam, &answer_key, mode)?;

    if document.warnings.contains(&RenderWarning::EmptyOutput) {
        tracing::warn!("rendered document is empty for mode {mode_str}");
    }

    write_html_document(&document, &output)?;

    let run_id = uuid::Uuid::new_v4();
    tracing::info!(%run_id, seed = selection.seed, "exam generated");

    print_summary(&exam);
    eprintln!("Seed: {} (pass --seed {} to reproduce)", exam.seed, exam.seed);
    eprintln!("Exam written to: {}", output.display());

    Ok(())
}

fn print_summary(exam: &satforge_core::assembler::AssembledExam) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Section", "Module", "Questions", "Numbers"]);

    for section in &exam.sections {
        for module in &section.modules {
            let first = module.questions.first().map_or(0, |q| q.number);
            let last = module.questions.last().map_or(0, |q| q.number);
            table.add_row(vec![
                Cell::new(section.section.title()),
                Cell::new(module.module.title()),
                Cell::new(module.questions.len()),
                Cell::new(format!("{first}-{last}")),
            ]);
        }
    }

    eprintln!("\n{table}");
}
