use super::Language;

/// Guess the language of a text by script ranges and a few marker words.
///
/// This is a crude heuristic, good enough to pick a translation direction
/// when the user selects auto-detect. Latin-script languages are told apart
/// by diacritics and common function words and default to English.
pub fn detect_likely_language(text: &str) -> Language {
    let total = text.chars().count().max(1);

    let cyrillic = count_in_range(text, '\u{0400}', '\u{04FF}');
    if cyrillic * 10 > total * 3 {
        return Language::Russian;
    }
    if count_in_range(text, '\u{4E00}', '\u{9FFF}') > 0 {
        return Language::Chinese;
    }
    if count_in_range(text, '\u{3040}', '\u{309F}') > 0
        || count_in_range(text, '\u{30A0}', '\u{30FF}') > 0
    {
        return Language::Japanese;
    }
    if count_in_range(text, '\u{AC00}', '\u{D7AF}') > 0 {
        return Language::Korean;
    }
    let arabic = count_in_range(text, '\u{0600}', '\u{06FF}');
    if arabic * 10 > total * 3 {
        return Language::Arabic;
    }
    // Any Cyrillic at all still beats the Latin guesses below.
    if cyrillic > 0 {
        return Language::Russian;
    }

    if text.chars().any(|c| "äöüßÄÖÜ".contains(c)) {
        return Language::German;
    }

    let lower = text.to_lowercase();
    if contains_marker(&lower, &["the", "and", "is", "are", "you", "this"]) {
        return Language::English;
    }
    if contains_marker(&lower, &["le", "la", "et", "est", "une", "des"]) {
        return Language::French;
    }
    if contains_marker(&lower, &["el", "y", "es", "una", "los"]) {
        return Language::Spanish;
    }
    if contains_marker(&lower, &["der", "die", "das", "und", "ich", "ist"]) {
        return Language::German;
    }

    Language::English
}

fn count_in_range(text: &str, lo: char, hi: char) -> usize {
    text.chars().filter(|c| (lo..=hi).contains(c)).count()
}

fn contains_marker(lower: &str, words: &[&str]) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| words.contains(&w))
}
