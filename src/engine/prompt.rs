/// Prompt for the full-quality translation pass.
pub fn build_translation_prompt(text: &str, source_name: &str, target_name: &str) -> String {
    format!(
        "You are a professional translator with many years of experience. \
Your task is to produce an accurate and natural translation.

SOURCE LANGUAGE: {source_name}
TARGET LANGUAGE: {target_name}
TEXT TO TRANSLATE: \"{text}\"

REQUIREMENTS:
- The translation must be as accurate and natural as possible
- Preserve the style and tone of the original text
- Respect the cultural conventions of the target language
- Render idioms and set phrases adequately
- Follow the grammar rules of the target language

OUTPUT ONLY THE FINAL TRANSLATION, NO COMMENTARY.

TRANSLATION:"
    )
}

/// Terse prompt used as a last resort when the full prompt got no usable
/// answer from any provider.
pub fn build_fallback_prompt(text: &str, source_name: &str, target_name: &str) -> String {
    format!("Translate from {source_name} to {target_name}: {text}")
}

const REPLY_PREFIXES: [&str; 6] = [
    "TRANSLATION:",
    "Translation:",
    "RESULT:",
    "Result:",
    "ANSWER:",
    "Answer:",
];

/// Strip the label prefixes and wrapping quotes models like to add.
pub fn clean_translation(reply: &str) -> String {
    let mut cleaned = reply.trim();
    for prefix in REPLY_PREFIXES {
        if let Some(rest) = cleaned.strip_prefix(prefix) {
            cleaned = rest.trim();
        }
    }
    if cleaned.len() >= 2 && cleaned.starts_with('"') && cleaned.ends_with('"') {
        cleaned = &cleaned[1..cleaned.len() - 1];
    }
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_label_prefixes() {
        assert_eq!(clean_translation("Translation: Hallo Welt"), "Hallo Welt");
        assert_eq!(clean_translation("  TRANSLATION:  Hallo  "), "Hallo");
        assert_eq!(clean_translation("Hallo Welt"), "Hallo Welt");
    }

    #[test]
    fn strips_wrapping_quotes() {
        assert_eq!(clean_translation("\"Hallo Welt\""), "Hallo Welt");
        assert_eq!(clean_translation("Translation: \"Hallo\""), "Hallo");
        // A lone quote is not a wrapping pair.
        assert_eq!(clean_translation("\""), "\"");
    }

    #[test]
    fn prompt_names_both_languages() {
        let prompt = build_translation_prompt("Hello", "English", "German");
        assert!(prompt.contains("SOURCE LANGUAGE: English"));
        assert!(prompt.contains("TARGET LANGUAGE: German"));
        assert!(prompt.contains("\"Hello\""));
    }
}
