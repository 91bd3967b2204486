//! Final document output.
//!
//! Embeds rendered fragments into the page template and writes a single
//! self-contained HTML file. The stylesheet carries print rules so the same
//! file serves as the PDF source via the browser's print dialog.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::html::RenderedDocument;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>$document_title</title>
<style>
$content_style
</style>
</head>
<body>
<header>
<h1>$document_title</h1>
<p class="generated-at">Generated $generated_at</p>
</header>
<main>
$content
</main>
</body>
</html>
"#;

const CONTENT_STYLE: &str = r#"body {
  font-family: Georgia, 'Times New Roman', serif;
  max-width: 52rem;
  margin: 0 auto;
  padding: 1.5rem;
  line-height: 1.5;
  color: #1a1a2e;
}
header { border-bottom: 2px solid #1a1a2e; margin-bottom: 1.5rem; }
.generated-at { color: #666; font-size: 0.85rem; }
h2 { margin-top: 2rem; page-break-before: always; }
.question {
  border: 1px solid #ccc;
  border-radius: 6px;
  padding: 1rem;
  margin: 1rem 0;
  page-break-inside: avoid;
}
.question-header {
  font-weight: bold;
  border-bottom: 1px solid #ddd;
  padding-bottom: 0.4rem;
  margin-bottom: 0.75rem;
}
.question-id { float: right; font-weight: normal; color: #888; font-size: 0.8rem; }
.stimulus { margin-bottom: 0.75rem; }
.options { list-style: none; padding-left: 0; }
.option { display: flex; gap: 0.6rem; margin: 0.4rem 0; }
.option-letter {
  flex: none;
  width: 1.6rem;
  height: 1.6rem;
  border: 1px solid #1a1a2e;
  border-radius: 50%;
  text-align: center;
  line-height: 1.5rem;
}
.answer-key { margin-top: 0.75rem; color: #14532d; }
.rationale {
  margin-top: 0.5rem;
  padding: 0.6rem;
  background: #f4f4f0;
  border-left: 3px solid #14532d;
}
.answer-summary { border-collapse: collapse; width: 100%; margin: 1rem 0; }
.answer-summary th, .answer-summary td {
  border: 1px solid #ccc;
  padding: 0.35rem 0.6rem;
  text-align: left;
}
.answer-summary th { background: #f0f0f5; }
@page { size: letter; margin: 1.9cm; }
@media print {
  body { max-width: none; padding: 0; }
  h2:first-of-type { page-break-before: avoid; }
}
"#;

/// Write a rendered document to `path` as a complete HTML page.
///
/// Parent directories are created as needed. An empty document (no
/// fragments) still produces a valid page; the caller decides how loudly
/// to surface the `EmptyOutput` warning.
pub fn write_html_document(document: &RenderedDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    let content: String = document
        .fragments
        .iter()
        .map(|f| f.html.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let page = PAGE_TEMPLATE
        .replace("$document_title", &crate::html::html_escape(&document.title))
        .replace("$content_style", CONTENT_STYLE)
        .replace("$generated_at", &Utc::now().format("%Y-%m-%d %H:%M UTC").to_string())
        .replace("$content", &content);

    fs::write(path, page).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{Fragment, FragmentKind};
    use satforge_core::model::{ModuleId, Section};

    fn document() -> RenderedDocument {
        RenderedDocument {
            title: "Practice Test 1".into(),
            fragments: vec![Fragment {
                kind: FragmentKind::ModuleQuestions {
                    section: Section::Math,
                    module: ModuleId::Module1,
                },
                html: "<div class=\"question\">body</div>".into(),
            }],
            warnings: vec![],
        }
    }

    #[test]
    fn writes_complete_page_with_title_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exam.html");

        write_html_document(&document(), &path).unwrap();

        let page = std::fs::read_to_string(&path).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Practice Test 1</title>"));
        assert!(page.contains("<div class=\"question\">body</div>"));
        assert!(page.contains("@page"));
        assert!(!page.contains("$content"));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/exam.html");

        write_html_document(&document(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn title_is_escaped_in_the_page_shell() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exam.html");
        let mut doc = document();
        doc.title = "Math <2026>".into();

        write_html_document(&doc, &path).unwrap();
        let page = std::fs::read_to_string(&path).unwrap();
        assert!(page.contains("<title>Math &lt;2026&gt;</title>"));
    }

    #[test]
    fn empty_document_still_produces_a_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.html");
        let doc = RenderedDocument {
            title: "Empty".into(),
            fragments: vec![],
            warnings: vec![crate::html::RenderWarning::EmptyOutput],
        };

        write_html_document(&doc, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<main>"));
    }
}
