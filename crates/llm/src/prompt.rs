//! Prompt templates
//!
//! Two call sites only: the fallback structured extractor and document-QA
//! answer composition.

/// Prompt for the fallback structured entity extractor.
///
/// The model is asked for a bare JSON object; `extract_json` copes with
/// fences and commentary anyway.
pub fn entity_extraction_prompt(query: &str) -> String {
    format!(
        "Extract the fields below from this agricultural market question. \
         Reply with ONLY a JSON object, no explanation.\n\
         Fields:\n\
         - \"commodity\": crop or commodity mentioned, or null\n\
         - \"location\": place name or 6-digit pincode mentioned, or null\n\
         - \"quantity\": numeric amount mentioned with a weight unit, or null\n\
         - \"unit\": one of kg, g, quintal, tonne, or null\n\
         - \"intent\": one of get_price, best_sell, best_buy, trend, \
         compare_prices, is_offer_good, weather, other\n\n\
         Question: {query}"
    )
}

/// Prompt for composing a document-QA answer from retrieved context.
///
/// Keeps the honesty clause: when the context does not contain the answer,
/// the model must say so instead of inventing one.
pub fn document_qa_prompt(question: &str, context_chunks: &[String]) -> String {
    format!(
        "You are an expert agricultural assistant. Based on the following \
         context extracted from reference documents, provide a clear and \
         concise answer to the user's question. If the context does not \
         contain the answer, state that the information is not available in \
         the provided documents.\n\n\
         CONTEXT:\n---\n{}\n---\n\n\
         QUESTION:\n{}\n\n\
         ANSWER:",
        context_chunks.join("\n---\n"),
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_carries_query() {
        let prompt = entity_extraction_prompt("rice ka bhav in 560001");
        assert!(prompt.contains("rice ka bhav in 560001"));
        assert!(prompt.contains("\"commodity\""));
        assert!(prompt.contains("is_offer_good"));
    }

    #[test]
    fn test_qa_prompt_joins_context() {
        let prompt = document_qa_prompt(
            "when to sow wheat?",
            &["chunk one".to_string(), "chunk two".to_string()],
        );
        assert!(prompt.contains("chunk one\n---\nchunk two"));
        assert!(prompt.contains("when to sow wheat?"));
        assert!(prompt.contains("not available"));
    }
}
