//! Content-derived record identifiers.

use crate::types::RecordId;
use uuid::Uuid;

/// Derive the record id for a question.
///
/// Name-based (v5) UUID over the question text, so resubmitting identical
/// text lands on the same record.
pub fn generate_id(question: &str) -> RecordId {
    RecordId::from(Uuid::new_v5(&Uuid::NAMESPACE_URL, question.as_bytes()).to_string())
}

#[cfg(test)]
mod tests {
    use super::generate_id;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_text_same_id() {
        let question = "What are the top 10 artists by sales?";
        assert_eq!(generate_id(question), generate_id(question));
    }

    #[test]
    fn distinct_texts_distinct_ids() {
        let ids = [
            "How many customers are there?",
            "How many customers are there? ",
            "how many customers are there?",
            "",
        ]
        .map(generate_id);
        for (i, left) in ids.iter().enumerate() {
            for right in &ids[i + 1..] {
                assert_ne!(left, right);
            }
        }
    }

    #[test]
    fn empty_question_yields_hyphenated_uuid() {
        let id = generate_id("");
        assert_eq!(id.as_str().len(), 36);
        assert_eq!(id.as_str().matches('-').count(), 4);
    }
}
