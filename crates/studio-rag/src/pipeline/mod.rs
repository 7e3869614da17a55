//! Pipelines wiring loaders, chunking, providers, and the index together

mod generator;
mod qna;
mod summarizer;

pub use generator::CodeGenerator;
pub use qna::{PipelineVariant, QnaPipeline};
pub use summarizer::Summarizer;
