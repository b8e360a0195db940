use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Canonical form used for every comparison: lower-cased, punctuation
/// removed, outer whitespace trimmed. Inner whitespace runs are kept as-is.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    NON_WORD.replace_all(lower.trim(), "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_punctuation() {
        assert_eq!(normalize("Lumela!"), "lumela");
        assert_eq!(normalize("  O KAE?  "), "o kae");
        assert_eq!(normalize("Lebitso la hau ke mang?"), "lebitso la hau ke mang");
    }

    #[test]
    fn test_keeps_digits_underscore_and_inner_spaces() {
        assert_eq!(normalize("ke_1  ho 2"), "ke_1  ho 2");
    }

    #[test]
    fn test_keeps_non_ascii_letters() {
        assert_eq!(normalize("Ó KAÉ?"), "ó kaé");
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Kea leboha!",
            "hello !",
            "  ? spaced  out ?  ",
            "Sala hantle, motswalle.",
            "ÀÉÎ õü",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {:?}", s);
        }
    }
}
