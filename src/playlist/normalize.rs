use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r#"["“”«»„]"#).unwrap());

static BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()\[\]{}]").unwrap());

/// Trailing annotation clause: "- remastered ...", "- live at ...", "- from ...",
/// and a bare remaster marker ending the title, as left behind by brackets.
static ANNOTATION_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\s*(?:[-–—]\s*(?:remaster(?:ed)?|live|bonus|edit|mix|version|single|ost|from|из)\b.*$",
        r"|\b(?:\d{4}\s+)?remaster(?:ed)?(?:\s+\d{4})?\s*$)",
    ))
    .unwrap()
});

static FEATURING: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-–—~]+feat\b\.?.*$").unwrap());

static DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[-–—~]\s*").unwrap());

static ANNOTATION_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?:acoustic|instrumental|karaoke|mashup|live|orchestral|",
        r"symphonic|bonus|edit|mix|version|explicit)\b",
    ))
    .unwrap()
});

// Extend the class to admit further scripts.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9a-zа-яёіїґ]+").unwrap());

/// Canonical form of a track title used for duplicate comparison.
///
/// Folds case and accents, drops quoting, bracket punctuation, remaster/live
/// annotations and featured-artist credits, then keeps only Latin and
/// Cyrillic alphanumerics separated by single spaces. Titles made only of
/// annotations normalize to the empty string.
///
/// The pass is repeated until stable, so `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(title: &str) -> String {
    let mut current = normalize_pass(title);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(title: &str) -> String {
    let text = strip_accents(&case_fold(title)).replace('ё', "е");
    let text = QUOTES.replace_all(&text, "");
    let text = BRACKETS.replace_all(&text, " ");
    let text = ANNOTATION_CLAUSE.replace(&text, "");
    let text = FEATURING.replace(&text, "");
    let text = DASHES.replace_all(&text, " ");
    let text = ANNOTATION_WORDS.replace_all(&text, "");
    let text = DISALLOWED.replace_all(&text, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase with the full folds `to_lowercase` leaves out ("Straße" -> "strasse")
pub fn case_fold(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());
    for c in value.to_lowercase().chars() {
        match c {
            'ß' => folded.push_str("ss"),
            'ς' => folded.push('σ'),
            other => folded.push(other),
        }
    }
    folded
}

/// Compatibility-decompose and drop combining marks ("Beyoncé" -> "Beyonce")
pub fn strip_accents(value: &str) -> String {
    value.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_remaster_annotations() {
        assert_eq!(normalize("Song (Remastered 2011)"), "song");
        assert_eq!(normalize("Song - Remastered 2011"), "song");
        assert_eq!(normalize("Song - 2011 Remaster"), "song");
        assert_eq!(normalize("Song"), "song");
    }

    #[test]
    fn test_remaster_word_inside_title_is_kept() {
        assert_eq!(normalize("Remastered Love Song"), "remastered love song");
        assert_eq!(normalize("Remaster Me Tonight (2009 Remaster)"), "remaster me tonight");
    }

    #[test]
    fn test_case_fold_expands_sharp_s() {
        assert_eq!(case_fold("Straße"), "strasse");
        assert_eq!(case_fold("GROẞ"), "gross");
        assert_eq!(case_fold("ΟΔΟΣ"), "οδοσ");
        assert_eq!(normalize("Weiße Rose"), normalize("WEISSE ROSE"));
        assert_eq!(normalize("Weiße Rose"), "weisse rose");
    }

    #[test]
    fn test_strips_live_and_source_clauses() {
        assert_eq!(normalize("Wind of Change - Live in Moscow"), "wind of change");
        assert_eq!(normalize("Theme - From \"The Movie\""), "theme");
        assert_eq!(normalize("Nothing Else Matters (Live)"), "nothing else matters");
        assert_eq!(normalize("Hero - Single Version"), "hero");
    }

    #[test]
    fn test_strips_featuring_clause() {
        assert_eq!(normalize("Stay feat. Someone Else"), "stay");
        assert_eq!(normalize("Stay (feat. Someone Else)"), "stay");
    }

    #[test]
    fn test_bracket_contents_are_kept_as_words() {
        assert_eq!(normalize("Part (One)"), "part one");
        assert_ne!(normalize("Song (Part 1)"), normalize("Song (Part 2)"));
    }

    #[test]
    fn test_removes_free_standing_annotation_words() {
        assert_eq!(normalize("Creep Acoustic"), "creep");
        assert_eq!(normalize("Explicit Content Mix"), "content");
        // Only whole words are removed
        assert_eq!(normalize("Mixtape"), "mixtape");
    }

    #[test]
    fn test_folds_accents_and_cyrillic() {
        assert_eq!(normalize("Beyoncé"), "beyonce");
        assert_eq!(normalize("Ёлка"), "елка");
        assert_eq!(normalize("«Кино» — Группа крови"), "кино группа крови");
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("(Live)"), "");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Song (Remastered 2011)",
            "x-feat y",
            "x_remastered",
            "Don't Stop Me Now - 2011 Mix",
            "Ärger ~ Ölbild [Bonus Track]",
            "«Кино» — Группа крови (Live)",
            "  spaced   out  ",
            "Version 2.0 (Edit)",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
