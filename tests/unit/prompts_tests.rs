/*!
 * Tests for prompt rendering
 */

use subtrans::subtitle_processor::Cue;
use subtrans::translation::batch::plan;
use subtrans::translation::prompts::{PromptRenderer, PromptTemplate, render};
use subtrans::translation::prompts::templates::{
    FOLLOWING_CONTEXT_HEADING, LINES_HEADING, OUTPUT_FORMAT_HEADING, PRIOR_CONTEXT_HEADING,
};
use crate::common;

#[test]
fn test_render_withContextOnBothSides_shouldOrderSections() {
    let cues = common::numbered_cues(5);
    let batches = plan(&cues, 2, 1);
    let prompt = render(&batches[1], "fr");

    let directive = prompt.find("Français").unwrap();
    let prior = prompt.find(PRIOR_CONTEXT_HEADING).unwrap();
    let lines = prompt.find(LINES_HEADING).unwrap();
    let following = prompt.find(FOLLOWING_CONTEXT_HEADING).unwrap();
    let format = prompt.find(OUTPUT_FORMAT_HEADING).unwrap();

    assert!(directive < prior && prior < lines && lines < following && following < format);
    assert!(prompt.contains("- Line 2"));
    assert!(prompt.contains("1. Line 3"));
    assert!(prompt.contains("2. Line 4"));
    assert!(prompt.contains("- Line 5"));
    assert!(prompt.contains("Output only the 2 translations"));
}

#[test]
fn test_render_firstBatch_shouldOmitPriorContext() {
    let cues = common::numbered_cues(3);
    let batches = plan(&cues, 2, 2);
    let prompt = render(&batches[0], "ja");

    assert!(!prompt.contains(PRIOR_CONTEXT_HEADING));
    assert!(prompt.contains(FOLLOWING_CONTEXT_HEADING));
    assert!(prompt.contains("日本語"));
}

#[test]
fn test_render_withoutContext_shouldOnlyListItems() {
    let cues = common::numbered_cues(2);
    let batches = plan(&cues, 5, 0);
    let prompt = render(&batches[0], "de");

    assert!(!prompt.contains(PRIOR_CONTEXT_HEADING));
    assert!(!prompt.contains(FOLLOWING_CONTEXT_HEADING));
    assert!(prompt.contains("1. Line 1\n2. Line 2"));
}

#[test]
fn test_render_withUnknownLanguage_shouldUseCodeVerbatim() {
    let cues = common::numbered_cues(1);
    let batches = plan(&cues, 1, 0);
    let prompt = render(&batches[0], "tlh");

    assert!(prompt.contains("into tlh."));
}

#[test]
fn test_render_withMultiLineCue_shouldKeepOneLinePerNumber() {
    let cues = vec![Cue::new(1, 0, 1000, "First half\nsecond half"), Cue::new(2, 1000, 2000, "Next")];
    let batches = plan(&cues, 2, 0);
    let prompt = render(&batches[0], "fr");

    assert!(prompt.contains("1. First half second half\n2. Next"));
}

#[test]
fn test_promptRenderer_withCustomTemplate_shouldSubstituteLanguage() {
    let cues = common::numbered_cues(1);
    let batches = plan(&cues, 1, 0);
    let renderer = PromptRenderer::new("zh-TW").with_template(PromptTemplate::new("Into {target_language}, please."));

    assert_eq!(renderer.target_display_name(), "繁體中文");
    assert!(renderer.render(&batches[0]).starts_with("Into 繁體中文, please.\n"));
}
