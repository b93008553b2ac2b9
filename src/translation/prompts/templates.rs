/*!
 * Prompt templates for subtitle translation.
 *
 * The numbered list in a rendered prompt is the contract with the response parser:
 * line `k` of the answer must be the translation of `batch.items[k - 1]`.
 */

use crate::language_utils;
use crate::subtitle_processor::Cue;
use crate::translation::batch::Batch;

/// Heading of the leading context section
pub const PRIOR_CONTEXT_HEADING: &str = "[Previous context - for reference only, do not translate]";

/// Heading of the numbered section
pub const LINES_HEADING: &str = "[Lines to translate]";

/// Heading of the trailing context section
pub const FOLLOWING_CONTEXT_HEADING: &str = "[Following context - for reference only, do not translate]";

/// Heading of the output format section
pub const OUTPUT_FORMAT_HEADING: &str = "[Output format]";

/// Directive template for subtitle translation.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with a `{target_language}` placeholder
    template: String,
}

impl PromptTemplate {
    /// The default directive.
    pub const SUBTITLE_TRANSLATOR: &'static str = "You are a professional subtitle translator. Translate the following subtitles into {target_language}.\n\
Keep the original meaning; the wording should read naturally and suit on-screen subtitles.";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default subtitle translator template.
    pub fn subtitle_translator() -> Self {
        Self::new(Self::SUBTITLE_TRANSLATOR)
    }

    /// Render the template for a target language display name.
    pub fn render(&self, target_language: &str) -> String {
        self.template.replace("{target_language}", target_language)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::subtitle_translator()
    }
}

/// Renders batches into prompts for one target language.
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    template: PromptTemplate,
    target_display_name: String,
}

impl PromptRenderer {
    /// Create a renderer with the default template.
    pub fn new(target_language: &str) -> Self {
        Self {
            template: PromptTemplate::default(),
            target_display_name: language_utils::get_display_name(target_language),
        }
    }

    /// Replace the directive template.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Display name used for the target language.
    pub fn target_display_name(&self) -> &str {
        &self.target_display_name
    }

    /// Render one batch.
    pub fn render(&self, batch: &Batch<'_>) -> String {
        let mut parts: Vec<String> = vec![self.template.render(&self.target_display_name), String::new()];

        if !batch.leading_context.is_empty() {
            parts.push(PRIOR_CONTEXT_HEADING.to_string());
            parts.extend(batch.leading_context.iter().map(|cue| format!("- {}", single_line(cue))));
            parts.push(String::new());
        }

        parts.push(LINES_HEADING.to_string());
        parts.extend(
            batch.items
                .iter()
                .enumerate()
                .map(|(i, cue)| format!("{}. {}", i + 1, single_line(cue))),
        );
        parts.push(String::new());

        if !batch.trailing_context.is_empty() {
            parts.push(FOLLOWING_CONTEXT_HEADING.to_string());
            parts.extend(batch.trailing_context.iter().map(|cue| format!("- {}", single_line(cue))));
            parts.push(String::new());
        }

        parts.push(OUTPUT_FORMAT_HEADING.to_string());
        parts.push(format!(
            "Output only the {} translations, one per line, numbered exactly like the input:",
            batch.items.len()
        ));
        parts.push("1. [translation of line 1]".to_string());
        parts.push("2. [translation of line 2]".to_string());
        parts.push("...".to_string());

        parts.join("\n")
    }
}

/// Render one batch for `target_language` with the default template.
pub fn render(batch: &Batch<'_>, target_language: &str) -> String {
    PromptRenderer::new(target_language).render(batch)
}

// @flattens: Multi-line cue text onto one line so numbering stays one line per cue
fn single_line(cue: &Cue) -> String {
    cue.source_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
