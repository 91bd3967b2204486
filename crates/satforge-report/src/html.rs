//! Semantic HTML fragment rendering.
//!
//! `render` is a pure function of (exam, answer key, mode): one question-body
//! fragment per (section, module), one answer-summary fragment per module,
//! plus the document title. Global numbers and correct letters come straight
//! from the assembler's output; nothing is renumbered or re-derived here.
//!
//! Stimulus, stem, option, and rationale content is corpus-supplied rich text
//! (HTML, MathML included) and passes through verbatim; ids, titles, and
//! other plain metadata are escaped.

use std::collections::HashMap;

use satforge_core::assembler::{AnswerKeyEntry, AssembledExam, ExamModule};
use satforge_core::error::{AssemblyError, Result};
use satforge_core::model::{ModuleId, Section, VisibilityMode};

/// What a fragment is, for template-slot placement by the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Question bodies for one (section, module).
    ModuleQuestions { section: Section, module: ModuleId },
    /// Answer-summary table for one (section, module).
    AnswerSummary { section: Section, module: ModuleId },
}

/// One opaque markup fragment destined for a template slot.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub html: String,
}

/// Non-fatal conditions surfaced alongside a successful render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderWarning {
    /// The chosen mode left nothing to emit.
    EmptyOutput,
}

/// The renderer's output: a title and ordered fragments for the writer.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub title: String,
    pub fragments: Vec<Fragment>,
    pub warnings: Vec<RenderWarning>,
}

/// Escape a string for safe HTML insertion.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render an assembled exam into document fragments.
pub fn render(
    exam: &AssembledExam,
    answer_key: &[AnswerKeyEntry],
    mode: VisibilityMode,
) -> Result<RenderedDocument> {
    for section in &exam.sections {
        for module in &section.modules {
            for numbered in &module.questions {
                numbered.question.validate()?;
            }
        }
    }

    let key_by_number: HashMap<usize, &AnswerKeyEntry> =
        answer_key.iter().map(|e| (e.number, e)).collect();

    let mut fragments = Vec::new();

    if mode != VisibilityMode::AnswersOnly {
        for section in &exam.sections {
            for module in &section.modules {
                fragments.push(Fragment {
                    kind: FragmentKind::ModuleQuestions {
                        section: section.section,
                        module: module.module,
                    },
                    html: render_module_questions(section.section, module, mode),
                });
            }
        }
    }

    if mode != VisibilityMode::NoAnswers {
        for section in &exam.sections {
            for module in &section.modules {
                fragments.push(Fragment {
                    kind: FragmentKind::AnswerSummary {
                        section: section.section,
                        module: module.module,
                    },
                    html: render_answer_summary(section.section, module, &key_by_number)?,
                });
            }
        }
    }

    let mut warnings = Vec::new();
    if fragments.is_empty() {
        warnings.push(RenderWarning::EmptyOutput);
    }

    let title = match mode {
        VisibilityMode::Full => format!("{} — Answer Key & Explanations", exam.title),
        VisibilityMode::AnswersOnly => format!("{} — Answer Key", exam.title),
        VisibilityMode::NoAnswers => exam.title.clone(),
    };

    Ok(RenderedDocument {
        title,
        fragments,
        warnings,
    })
}

fn render_module_questions(section: Section, module: &ExamModule, mode: VisibilityMode) -> String {
    let mut html = format!(
        "<h2>{} — {}</h2>\n",
        html_escape(section.title()),
        module.module.title()
    );

    for numbered in &module.questions {
        let q = &numbered.question;
        html.push_str("<div class=\"question\">");
        html.push_str(&format!(
            "<div class=\"question-header\">Question {}<span class=\"question-id\">{}</span></div>",
            numbered.number,
            html_escape(&q.id)
        ));
        if let Some(stimulus) = &q.stimulus {
            html.push_str(&format!("<div class=\"stimulus\">{stimulus}</div>"));
        }
        html.push_str(&format!("<div class=\"stem\">{}</div>", q.stem));
        html.push_str("<ul class=\"options\">");
        for opt in &q.options {
            html.push_str(&format!(
                "<li class=\"option\"><span class=\"option-letter\">{}</span><span class=\"option-content\">{}</span></li>",
                opt.letter, opt.content
            ));
        }
        html.push_str("</ul>");

        if mode == VisibilityMode::Full {
            html.push_str(&format!(
                "<div class=\"answer-key\"><strong>Correct Answer: {}</strong></div>",
                q.correct
            ));
            if let Some(rationale) = &q.rationale {
                html.push_str(&format!(
                    "<div class=\"rationale\"><strong>Explanation:</strong> {rationale}</div>"
                ));
            }
        }

        html.push_str("</div>\n");
    }

    html
}

fn render_answer_summary(
    section: Section,
    module: &ExamModule,
    key_by_number: &HashMap<usize, &AnswerKeyEntry>,
) -> Result<String> {
    let mut html = format!(
        "<h2>{} — {} Answer Summary</h2>\n",
        html_escape(section.title()),
        module.module.title()
    );
    html.push_str("<table class=\"answer-summary\">\n");
    html.push_str("<thead><tr><th>#</th><th>Question ID</th><th>Correct</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    // Module questions carry increasing global numbers; each row's id and
    // letter come from the matching answer-key entry, never the question.
    for numbered in &module.questions {
        let entry = key_by_number.get(&numbered.number).ok_or_else(|| {
            AssemblyError::malformed(
                &numbered.question.id,
                format!("no answer-key entry for question {}", numbered.number),
            )
        })?;
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            entry.number,
            html_escape(&entry.question_id),
            entry.correct
        ));
    }

    html.push_str("</tbody></table>\n");
    Ok(html)
}
