// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use quiz_evm::Question;
use std::collections::HashSet;

pub const DEFAULT_QUESTION_PAGE: usize = 10;

/// Fields that make two questions the same question
type ContentKey = (String, Vec<String>, u32, u8);

fn content_key(question: &Question) -> ContentKey {
    (
        question.text.clone(),
        question.options.clone(),
        question.correct_answer,
        question.difficulty,
    )
}

/// Turns whatever the contract returned into the ordered question list players see
#[derive(Debug, Clone, Copy)]
pub struct QuestionRegistry {
    page_size: usize,
}

impl Default for QuestionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTION_PAGE)
    }
}

impl QuestionRegistry {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Active questions, unique by id and by content, ascending by id, at most one page.
    ///
    /// Among content duplicates the lowest id survives.
    pub fn normalize(&self, raw: Vec<Question>) -> Vec<Question> {
        let mut ids = HashSet::new();
        let mut questions: Vec<Question> = raw
            .into_iter()
            .filter(|q| q.active)
            .filter(|q| ids.insert(q.id))
            .collect();
        questions.sort_by_key(|q| q.id);

        let mut contents = HashSet::new();
        questions.retain(|q| contents.insert(content_key(q)));
        questions.dedup_by_key(|q| q.id);
        questions.truncate(self.page_size);
        questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn question(id: u64, text: &str) -> Question {
        Question {
            id,
            text: text.to_string(),
            options: vec!["yes".to_string(), "no".to_string()],
            correct_answer: 0,
            difficulty: 2,
            active: true,
        }
    }

    #[test]
    fn test_content_duplicate_keeps_lowest_id() {
        let registry = QuestionRegistry::default();
        let raw = vec![question(9, "Is Rust fast?"), question(5, "Is Rust fast?")];

        let ids: Vec<u64> = registry.normalize(raw).iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![5]);
    }

    #[test]
    fn test_inactive_and_repeated_ids_dropped() {
        let registry = QuestionRegistry::default();
        let mut inactive = question(1, "Hidden");
        inactive.active = false;
        let raw = vec![
            question(3, "Third"),
            inactive,
            question(0, "First"),
            question(3, "Replacement third"),
        ];

        let normalized = registry.normalize(raw);
        let texts: Vec<&str> = normalized.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Third"]);
    }

    #[test]
    fn test_options_distinguish_content() {
        let registry = QuestionRegistry::default();
        let mut other = question(2, "Pick one");
        other.options.reverse();
        let normalized = registry.normalize(vec![question(1, "Pick one"), other]);
        assert_eq!(normalized.len(), 2);
    }

    #[test]
    fn test_truncated_to_page() {
        let registry = QuestionRegistry::default();
        let raw = (0..25).rev().map(|i| question(i, &format!("Q{i}"))).collect();
        let normalized = registry.normalize(raw);
        assert_eq!(normalized.len(), 10);
        assert_eq!(normalized.first().map(|q| q.id), Some(0));
        assert_eq!(normalized.last().map(|q| q.id), Some(9));
    }

    fn arb_question() -> impl Strategy<Value = Question> {
        (0u64..30, 0usize..4, 0u32..4, 1u8..=5, prop::bool::weighted(0.8)).prop_map(
            |(id, text, correct_answer, difficulty, active)| Question {
                id,
                text: format!("Question {text}"),
                options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                correct_answer,
                difficulty,
                active,
            },
        )
    }

    proptest! {
        #[test]
        fn normalized_output_invariants(raw in prop::collection::vec(arb_question(), 0..60)) {
            let normalized = QuestionRegistry::default().normalize(raw);

            prop_assert!(normalized.len() <= 10);
            prop_assert!(normalized.iter().all(|q| q.active));
            prop_assert!(normalized.windows(2).all(|w| w[0].id < w[1].id));

            let contents: HashSet<_> = normalized.iter().map(content_key).collect();
            prop_assert_eq!(contents.len(), normalized.len());
        }

        #[test]
        fn normalize_is_idempotent(raw in prop::collection::vec(arb_question(), 0..60)) {
            let registry = QuestionRegistry::default();
            let once = registry.normalize(raw);
            let twice = registry.normalize(once.clone());
            prop_assert_eq!(once, twice);
        }
    }
}
