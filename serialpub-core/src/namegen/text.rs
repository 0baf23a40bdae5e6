//! String helpers shared by the rules and the legacy naming functions

use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Characters that are not allowed in folder names on common filesystems
const FOLDER_UNSAFE: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Decompose accented characters and drop the non-spacing marks ("é" -> "e")
///
/// Spacing and enclosing marks are kept.
pub fn strip_marks(name: &str) -> String {
    name.nfd()
        .filter(|c| c.general_category() != GeneralCategory::NonspacingMark)
        .collect()
}

/// Make a name safe to use as a file name
///
/// Every run of characters other than ASCII letters, digits and `preserve`
/// is replaced by `replacement`, and `replacement` characters are trimmed
/// from both ends. With an ASCII `replacement`, applying it twice gives the
/// same result as applying it once.
pub fn to_safe_filename(name: &str, replacement: &str, preserve: &str) -> String {
    let keep = |c: char| c.is_ascii_alphanumeric() || preserve.contains(c);
    let safe = replace_runs(&strip_marks(name), replacement, |c| !keep(c));
    trim_replacement(&safe, replacement)
}

/// Make a name safe to use as a folder name
///
/// Spaces and most punctuation survive; only characters rejected by common
/// filesystems are replaced.
pub fn to_safe_foldername(name: &str) -> String {
    let safe = replace_runs(&strip_marks(name), "_", |c| FOLDER_UNSAFE.contains(&c));
    trim_replacement(&safe, "_")
}

/// Lowercase, hyphen separated slug of a title
///
/// ```
/// use serialpub_core::namegen::text::slugify;
///
/// assert_eq!(slugify("Rebuild World"), "rebuild-world");
/// assert_eq!(slugify("Café: Déjà Vu!"), "cafe-deja-vu");
/// ```
pub fn slugify(title: &str) -> String {
    strip_marks(title)
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Left-pad a decimal number with zeros; anything else is returned unchanged
pub fn zero_pad(value: &str, width: usize) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        format!("{:0>width$}", value, width = width)
    } else {
        value.to_string()
    }
}

/// Remove ASCII punctuation
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Whether the text ends with an ASCII punctuation mark
pub fn ends_with_punctuation(text: &str) -> bool {
    text.chars().last().is_some_and(|c| c.is_ascii_punctuation())
}

/// Truncate to at most `max_chars` characters, never splitting a character
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn replace_runs(name: &str, replacement: &str, is_unsafe: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if is_unsafe(c) {
            if !in_run {
                out.push_str(replacement);
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

fn trim_replacement(name: &str, replacement: &str) -> String {
    name.trim_matches(|c| replacement.contains(c)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename_basic() {
        assert_eq!(
            to_safe_filename("Tearmoon Empire Volume 1 Part 1", "_", ""),
            "Tearmoon_Empire_Volume_1_Part_1"
        );
    }

    #[test]
    fn test_safe_filename_collapses_runs_and_trims() {
        assert_eq!(
            to_safe_filename("  My Series: Volume 2 [Parts 1 to 3]  ", "_", ""),
            "My_Series_Volume_2_Parts_1_to_3"
        );
    }

    #[test]
    fn test_safe_filename_strips_accents() {
        assert_eq!(to_safe_filename("Héroïne", "_", ""), "Heroine");
    }

    #[test]
    fn test_safe_filename_preserve_chars() {
        assert_eq!(to_safe_filename("Vol. 1-2", "_", "-."), "Vol._1-2");
    }

    #[test]
    fn test_safe_filename_is_idempotent() {
        let once = to_safe_filename("A -- B ?? C!", "_", "");
        assert_eq!(to_safe_filename(&once, "_", ""), once);
    }

    #[test]
    fn test_strip_marks_keeps_spacing_marks() {
        // U+093F DEVANAGARI VOWEL SIGN I is a spacing mark
        assert_eq!(strip_marks("\u{915}\u{93F}"), "\u{915}\u{93F}");
        assert_eq!(strip_marks("Déjà"), "Deja");
    }

    #[test]
    fn test_safe_foldername_keeps_spaces() {
        assert_eq!(to_safe_foldername("Re:Zero <Ex>"), "Re_Zero _Ex");
    }

    #[test]
    fn test_zero_pad_only_numbers() {
        assert_eq!(zero_pad("6", 2), "06");
        assert_eq!(zero_pad("12", 2), "12");
        assert_eq!(zero_pad("6.2", 2), "6.2");
        assert_eq!(zero_pad("One", 2), "One");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("本好きの下剋上", 3), "本好き");
    }
}
