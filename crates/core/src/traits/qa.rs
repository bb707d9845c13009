//! Document-retrieval QA interface
//!
//! The knowledge base (pre-embedded agricultural reference documents) is a
//! black box from the pipelines' point of view: question in, answer plus the
//! supporting snippets out.

use async_trait::async_trait;

use crate::Result;

/// Answer produced by the document-QA pipeline
#[derive(Debug, Clone, Default)]
pub struct QaAnswer {
    pub answer: String,
    /// Source snippets the answer was grounded on, best first
    pub sources: Vec<String>,
}

/// Document QA interface
#[async_trait]
pub trait DocumentQa: Send + Sync + 'static {
    /// Answer a question from the document collection
    async fn answer(&self, question: &str) -> Result<QaAnswer>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockQa;

    #[async_trait]
    impl DocumentQa for MockQa {
        async fn answer(&self, question: &str) -> Result<QaAnswer> {
            Ok(QaAnswer {
                answer: format!("answer to: {question}"),
                sources: vec!["snippet".to_string()],
            })
        }
    }

    #[tokio::test]
    async fn test_mock_qa() {
        let qa = MockQa;
        let result = qa.answer("when to sow wheat?").await.unwrap();
        assert!(result.answer.contains("when to sow wheat?"));
        assert_eq!(result.sources.len(), 1);
    }
}
