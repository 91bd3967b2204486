//! Corpus persistence.
//!
//! The crawler writes the normalized corpus in two forms: a pretty-printed
//! JSON file for human inspection and a compact bincode file for fast loads.
//! The format is chosen by file extension (`.json` vs anything else).

use std::path::Path;

use anyhow::{Context, Result};

use crate::model::Question;

/// Load a corpus from a JSON or bincode file, chosen by extension.
pub fn load_corpus(path: &Path) -> Result<Vec<Question>> {
    if is_json(path) {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read corpus from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse corpus JSON: {}", path.display()))
    } else {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read corpus from {}", path.display()))?;
        bincode::deserialize(&bytes)
            .with_context(|| format!("failed to decode corpus: {}", path.display()))
    }
}

/// Save a corpus to a JSON or bincode file, chosen by extension.
pub fn save_corpus(questions: &[Question], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if is_json(path) {
        let json =
            serde_json::to_string_pretty(questions).context("failed to serialize corpus")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write corpus to {}", path.display()))?;
    } else {
        let bytes = bincode::serialize(questions).context("failed to encode corpus")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write corpus to {}", path.display()))?;
    }
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{sample_question, ModuleId, Section};

    #[test]
    fn json_roundtrip() {
        let corpus = vec![
            sample_question("a", Section::Math, ModuleId::Module1),
            sample_question("b", Section::ReadingWriting, ModuleId::Module2),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");

        save_corpus(&corpus, &path).unwrap();
        let loaded = load_corpus(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "a");
        assert_eq!(loaded[1].section, Section::ReadingWriting);
    }

    #[test]
    fn bincode_roundtrip_is_smaller_than_json() {
        let corpus: Vec<_> = (0..50)
            .map(|i| sample_question(&format!("q{i}"), Section::Math, ModuleId::Module1))
            .collect();
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("corpus.json");
        let bin_path = dir.path().join("corpus.bin");

        save_corpus(&corpus, &json_path).unwrap();
        save_corpus(&corpus, &bin_path).unwrap();

        let loaded = load_corpus(&bin_path).unwrap();
        assert_eq!(loaded.len(), 50);

        let json_size = std::fs::metadata(&json_path).unwrap().len();
        let bin_size = std::fs::metadata(&bin_path).unwrap().len();
        assert!(bin_size < json_size);
    }

    #[test]
    fn load_missing_file_fails_with_path_in_error() {
        let err = load_corpus(Path::new("no/such/corpus.json")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/corpus.json"));
    }
}
