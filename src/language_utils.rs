use isolang::Language;

/// Language utilities for target-language handling
///
/// Prompts name the target language by a human-readable display name. A small table covers
/// the codes subtitles are most often translated into, including the regional Chinese
/// variants that plain ISO 639 cannot tell apart. Anything else is passed through verbatim.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("zh-tw", "繁體中文"),
    ("zh-hant", "繁體中文"),
    ("zh-cn", "简体中文"),
    ("zh-hans", "简体中文"),
    ("zh", "中文"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("it", "Italiano"),
    ("pt", "Português"),
    ("pt-br", "Português (Brasil)"),
    ("ru", "Русский"),
    ("vi", "Tiếng Việt"),
    ("th", "ไทย"),
    ("id", "Bahasa Indonesia"),
];

/// Get the display name for a target language code
///
/// Lookup is case-insensitive and treats `_` like `-`. Unknown codes are returned unchanged.
pub fn get_display_name(code: &str) -> String {
    let normalized = normalize_tag(code);

    DISPLAY_NAMES
        .iter()
        .find(|(tag, _)| *tag == normalized)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| code.trim().to_string())
}

/// Check whether a code has an entry in the display-name table
pub fn has_display_name(code: &str) -> bool {
    let normalized = normalize_tag(code);
    DISPLAY_NAMES.iter().any(|(tag, _)| *tag == normalized)
}

/// Check whether the primary subtag of a language tag is a known ISO 639-1 or 639-3 code
///
/// Used to warn about likely typos in the configured target language. An unknown code is
/// still usable; it is simply sent to the model verbatim.
pub fn is_known_language(code: &str) -> bool {
    let normalized = normalize_tag(code);
    let primary = normalized.split('-').next().unwrap_or_default();

    match primary.len() {
        2 => Language::from_639_1(primary).is_some(),
        3 => Language::from_639_3(primary).is_some(),
        _ => false,
    }
}

// @normalizes: Lowercase, '_' to '-'
fn normalize_tag(code: &str) -> String {
    code.trim().to_lowercase().replace('_', "-")
}
