//! Answer composition over retrieved context

use std::sync::Arc;

use async_trait::async_trait;

use krishi_agent_core::{DocumentQa, LanguageModel, QaAnswer, Result};
use krishi_agent_llm::prompt::document_qa_prompt;

use crate::store::DocumentIndex;

const NOT_AVAILABLE: &str =
    "I could not find this in my reference documents. Please try rephrasing, \
     or ask about weather or mandi prices.";

/// Document QA over the in-memory index plus the LLM
pub struct KnowledgeBase {
    index: Arc<DocumentIndex>,
    llm: Arc<dyn LanguageModel>,
    top_k: usize,
}

impl KnowledgeBase {
    pub fn new(index: Arc<DocumentIndex>, llm: Arc<dyn LanguageModel>, top_k: usize) -> Self {
        Self { index, llm, top_k }
    }
}

#[async_trait]
impl DocumentQa for KnowledgeBase {
    async fn answer(&self, question: &str) -> Result<QaAnswer> {
        let hits = self.index.search(question, self.top_k);
        if hits.is_empty() {
            return Ok(QaAnswer {
                answer: NOT_AVAILABLE.to_string(),
                sources: Vec::new(),
            });
        }

        let context: Vec<String> = hits.iter().map(|h| h.text.clone()).collect();
        let prompt = document_qa_prompt(question, &context);

        let answer = match self.llm.complete(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => NOT_AVAILABLE.to_string(),
            Err(e) => {
                // Degrade to the strongest snippet rather than failing the
                // whole request.
                tracing::warn!(error = %e, "LLM unavailable for document QA, returning top snippet");
                format!("From my reference documents: {}", context[0])
            }
        };

        Ok(QaAnswer {
            answer,
            sources: context,
        })
    }
}
