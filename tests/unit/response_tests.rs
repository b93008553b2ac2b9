/*!
 * Tests for response parsing
 */

use subtrans::translation::response::{parse_response, parse_translation_response};

#[test]
fn test_parse_withWellFormedResponse_shouldReturnAllLines() {
    let parsed = parse_response("1. Bonjour\n2. Au revoir", 2);

    assert_eq!(parsed.translations, vec!["Bonjour", "Au revoir"]);
    assert_eq!(parsed.matched_lines, 2);
    assert!(!parsed.is_mismatch());
}

#[test]
fn test_parse_withGap_shouldLeaveEmptyPlaceholder() {
    assert_eq!(parse_translation_response("1. foo\n3. bar", 3), vec!["foo", "", "bar"]);
}

#[test]
fn test_parse_withQuotedText_shouldStripQuotes() {
    assert_eq!(parse_translation_response("1. 'one'\n2. \"hello\"", 2), vec!["one", "hello"]);
}

#[test]
fn test_parse_withMixedSeparators_shouldAcceptAll() {
    let response = "1) uno\n2: dos\n  3 .  tres  ";
    assert_eq!(parse_translation_response(response, 3), vec!["uno", "dos", "tres"]);
}

#[test]
fn test_parse_withCommentary_shouldIgnoreUnnumberedLines() {
    let response = "Here are your translations:\n\n1. Hallo\nNote: informal register\n2. Welt\nHope this helps!";
    assert_eq!(parse_translation_response(response, 2), vec!["Hallo", "Welt"]);
}

#[test]
fn test_parse_withTooManyLines_shouldTruncate() {
    let parsed = parse_response("1. a\n2. b\n3. c\n4. d", 2);

    assert_eq!(parsed.translations, vec!["a", "b"]);
    assert_eq!(parsed.highest_index, 4);
    assert!(parsed.is_mismatch());
}

#[test]
fn test_parse_withTooFewLines_shouldPad() {
    let parsed = parse_response("1. only", 3);

    assert_eq!(parsed.translations, vec!["only", "", ""]);
    assert_eq!(parsed.non_empty_count(), 1);
    assert!(parsed.is_mismatch());
}

#[test]
fn test_parse_withOutOfOrderAndDuplicates_shouldPlaceByNumberLastWins() {
    let response = "2. second\n1. first\n2. second again";
    assert_eq!(parse_translation_response(response, 2), vec!["first", "second again"]);
}

#[test]
fn test_parse_withZeroOrHugeNumbers_shouldIgnoreThem() {
    let response = "0. zero\n99999999999999999999999. huge\n1. real";
    assert_eq!(parse_translation_response(response, 1), vec!["real"]);
}

#[test]
fn test_parse_withEmptyResponse_shouldReturnPlaceholders() {
    let parsed = parse_response("", 2);
    assert_eq!(parsed.translations, vec!["", ""]);
    assert_eq!(parsed.matched_lines, 0);
}

#[test]
fn test_parse_alwaysReturnsExpectedCount() {
    for expected in 0..6 {
        assert_eq!(parse_translation_response("1. a\n5. e\n9. i", expected).len(), expected);
    }
}
