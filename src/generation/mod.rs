//! Prompt assembly and answer generation

mod answer;
mod prompt;

pub use answer::QueryEngine;
pub use prompt::{PromptBuilder, GROUNDING_INSTRUCTION};
