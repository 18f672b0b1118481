//! Grounded prompt assembly

use crate::index::ScoredChunk;

/// The grounding contract string
///
/// This instruction is what keeps answers inside the retrieved context; it
/// must survive template substitution verbatim, and a test asserts it does.
pub const GROUNDING_INSTRUCTION: &str = "Answer the question using only the context below. \
If the answer is not in the context, say \"I don't know. That's outside the context of the \
provided documents.\"";

/// Prompt builder for grounded question answering
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunks into a single context block
    pub fn build_context(chunks: &[ScoredChunk]) -> String {
        chunks
            .iter()
            .map(|chunk| chunk.text.trim())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Fill the grounded prompt template with context and question
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            "{GROUNDING_INSTRUCTION}\n\n\
             Context:\n{context}\n\n\
             Question:\n{question}\n\n\
             Answer:"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(text: &str) -> ScoredChunk {
        ScoredChunk {
            seq: 0,
            text: text.to_string(),
            similarity: 1.0,
        }
    }

    #[test]
    fn context_joins_chunks_with_blank_lines() {
        let chunks = vec![scored("first chunk"), scored("second chunk")];
        assert_eq!(
            PromptBuilder::build_context(&chunks),
            "first chunk\n\nsecond chunk"
        );
    }

    #[test]
    fn empty_retrieval_yields_empty_context() {
        assert_eq!(PromptBuilder::build_context(&[]), "");
    }

    #[test]
    fn grounding_instruction_survives_substitution() {
        let prompt = PromptBuilder::build_rag_prompt(
            "What is the capital of France?",
            "The capital of France is Paris.",
        );
        assert!(prompt.contains(GROUNDING_INSTRUCTION));
        assert!(prompt.contains("Context:\nThe capital of France is Paris."));
        assert!(prompt.contains("Question:\nWhat is the capital of France?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn template_does_not_escape_braces_in_inputs() {
        let prompt = PromptBuilder::build_rag_prompt("{question}", "{context}");
        assert!(prompt.contains(GROUNDING_INSTRUCTION));
        assert!(prompt.contains("{question}"));
        assert!(prompt.contains("{context}"));
    }
}
