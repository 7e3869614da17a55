//! Prompt templates for retrieval-grounded answers, summaries, and code

use crate::retrieval::SearchResult;
use crate::types::Citation;

/// Prompt builder for the studio pipelines
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from search results, labelling each block with its
    /// source identifier
    pub fn build_context(results: &[SearchResult]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n\nContent:\n{}\n\n---\n\n",
                i + 1,
                result.chunk.source.identifier,
                result.chunk.content
            ));
        }

        context
    }

    /// Build the grounded question-answering prompt
    pub fn build_qna_prompt(question: &str, context: &str, citations: &[Citation]) -> String {
        format!(
            r#"You are an assistant that answers questions using ONLY the provided context.

RULES:
1. Only use information that is explicitly stated in the CONTEXT below.
2. If the answer is not in the context, respond with "This information is not available in the provided sources."
3. Do not use external knowledge or make inferences beyond what is stated.
4. End your answer with a SOURCES line enumerating the source identifiers you used.

CONTEXT:
{context}

AVAILABLE SOURCES:
{sources}

QUESTION: {question}

Answer using only the context above:"#,
            context = context,
            sources = Self::format_sources_list(citations),
            question = question
        )
    }

    /// Format the numbered sources list for the prompt
    fn format_sources_list(citations: &[Citation]) -> String {
        citations
            .iter()
            .enumerate()
            .map(|(i, c)| format!("[{}] {}", i + 1, c.source))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build a summarization prompt
    pub fn build_summary_prompt(text: &str) -> String {
        format!(
            r#"Summarize the following text in clear, concise language:

{text}

Summary:"#,
            text = text
        )
    }

    /// Build a code generation prompt
    pub fn build_code_prompt(description: &str) -> String {
        format!(
            r#"Write code that satisfies the following request. Reply with the code only, without commentary.

Request:
{description}
"#,
            description = description
        )
    }
}
