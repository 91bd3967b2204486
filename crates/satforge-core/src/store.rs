//! Read-only question store.
//!
//! The store reflects exactly the persisted corpus the crawler produced; the
//! assembly engine queries it by (section, module) and never writes to it.

use std::collections::BTreeSet;

use crate::model::{ModuleId, Question, Section};

/// Query surface the selector draws from.
pub trait QuestionStore {
    /// All questions matching a (section, module) slot.
    fn questions_for(&self, section: Section, module: ModuleId) -> Vec<Question>;

    /// The distinct (section, module) slots present in the corpus.
    fn slots(&self) -> Vec<(Section, ModuleId)>;
}

/// In-memory store over a corpus of question records.
#[derive(Debug, Default)]
pub struct MemoryStore {
    questions: Vec<Question>,
}

impl MemoryStore {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

impl QuestionStore for MemoryStore {
    fn questions_for(&self, section: Section, module: ModuleId) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.section == section && q.module == module)
            .cloned()
            .collect()
    }

    fn slots(&self) -> Vec<(Section, ModuleId)> {
        let set: BTreeSet<(Section, ModuleId)> =
            self.questions.iter().map(|q| (q.section, q.module)).collect();
        set.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_question;

    #[test]
    fn questions_for_filters_by_slot() {
        let store = MemoryStore::new(vec![
            sample_question("a", Section::Math, ModuleId::Module1),
            sample_question("b", Section::Math, ModuleId::Module2),
            sample_question("c", Section::ReadingWriting, ModuleId::Module1),
        ]);

        let math_m1 = store.questions_for(Section::Math, ModuleId::Module1);
        assert_eq!(math_m1.len(), 1);
        assert_eq!(math_m1[0].id, "a");
        assert!(store.questions_for(Section::ReadingWriting, ModuleId::Module2).is_empty());
    }

    #[test]
    fn slots_reports_distinct_pairs() {
        let store = MemoryStore::new(vec![
            sample_question("a", Section::Math, ModuleId::Module1),
            sample_question("b", Section::Math, ModuleId::Module1),
            sample_question("c", Section::ReadingWriting, ModuleId::Module2),
        ]);

        let slots = store.slots();
        assert_eq!(slots.len(), 2);
        assert!(slots.contains(&(Section::Math, ModuleId::Module1)));
        assert!(slots.contains(&(Section::ReadingWriting, ModuleId::Module2)));
    }
}
