/*!
 * Prompt construction for subtitle translation.
 *
 * This module provides:
 * - The directive template naming the target language
 * - Rendering of a batch, with its context, into one numbered instruction block
 */

pub mod templates;

// Re-export main types
pub use templates::{PromptRenderer, PromptTemplate, render};
