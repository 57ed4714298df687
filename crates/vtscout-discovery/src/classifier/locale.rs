//! Detection of the two target locales (Italian and English).

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

const VOCABULARY_WEIGHT: f64 = 3.0;
const NAME_PATTERN_WEIGHT: f64 = 2.0;
const SELF_REFERENCE_WEIGHT: f64 = 1.0;

struct LocaleRules {
    name: &'static str,
    vocabulary: &'static [&'static str],
    self_references: &'static [&'static str],
    name_patterns: &'static [&'static str],
}

const ITALIAN: LocaleRules = LocaleRules {
    name: "italian",
    vocabulary: &[
        "italiana", "italiano", "italia", "roma", "milano", "napoli", "torino", "bologna",
        "firenze", "venezia", "genova", "palermo", "città", "regione", "provincia", "comune",
    ],
    self_references: &["italiano", "italiana"],
    name_patterns: &[
        r"[a-z]+_ita\b",
        r"[a-z]+_italia\b",
        r"[a-z]+_italian\b",
        r"\bita_[a-z]+",
        r"\bitalia_[a-z]+",
        r"\bitalian_[a-z]+",
    ],
};

const ENGLISH: LocaleRules = LocaleRules {
    name: "english",
    vocabulary: &[
        "english",
        "british",
        "american",
        "canadian",
        "australian",
        "uk",
        "usa",
        "canada",
        "australia",
        "england",
        "london",
        "new york",
        "los angeles",
        "toronto",
        "sydney",
    ],
    self_references: &["english", "british", "american"],
    name_patterns: &[
        r"[a-z]+_en\b",
        r"[a-z]+_english\b",
        r"[a-z]+_uk\b",
        r"\ben_[a-z]+",
        r"\benglish_[a-z]+",
        r"\buk_[a-z]+",
    ],
};

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("valid locale name pattern")
        })
        .collect()
}

static ITALIAN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(ITALIAN.name_patterns));
static ENGLISH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(ENGLISH.name_patterns));

/// Score and evidence for one locale.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleScore {
    pub locale: &'static str,
    pub score: f64,
    pub reasons: Vec<String>,
}

fn score_locale(rules: &LocaleRules, patterns: &[Regex], text: &str) -> LocaleScore {
    let lower = text.to_lowercase();
    let mut score = 0.0;
    let mut reasons = Vec::new();

    let vocabulary: Vec<&str> = rules
        .vocabulary
        .iter()
        .copied()
        .filter(|term| lower.contains(term))
        .collect();
    if !vocabulary.is_empty() {
        score += VOCABULARY_WEIGHT;
        reasons.push(format!("{} terms: {}", rules.name, vocabulary.join(", ")));
    }

    for (source, pattern) in rules.name_patterns.iter().zip(patterns) {
        if pattern.is_match(text) {
            score += NAME_PATTERN_WEIGHT;
            reasons.push(format!("{} name pattern: {source}", rules.name));
        }
    }

    if rules.self_references.iter().any(|term| lower.contains(term)) {
        score += SELF_REFERENCE_WEIGHT;
        reasons.push(format!("{} language indicator", rules.name));
    }

    LocaleScore {
        locale: rules.name,
        score,
        reasons,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocaleFocus {
    pub italian: LocaleScore,
    pub english: LocaleScore,
}

impl LocaleFocus {
    /// The higher of the two locale scores.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.italian.score.max(self.english.score)
    }

    /// The winning locale, Italian on ties, `None` when neither scored.
    #[must_use]
    pub fn winner(&self) -> Option<&LocaleScore> {
        if self.score() <= 0.0 {
            None
        } else if self.italian.score >= self.english.score {
            Some(&self.italian)
        } else {
            Some(&self.english)
        }
    }

    #[must_use]
    pub fn describe(&self) -> String {
        self.winner().map_or_else(
            || "international".to_string(),
            |winner| winner.reasons.join("; "),
        )
    }
}

#[must_use]
pub fn detect_language_focus(text: &str) -> LocaleFocus {
    LocaleFocus {
        italian: score_locale(&ITALIAN, &ITALIAN_PATTERNS, text),
        english: score_locale(&ENGLISH, &ENGLISH_PATTERNS, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_text_is_international() {
        let focus = detect_language_focus("Kuro plays rhythm games");
        assert!(focus.score().abs() < f64::EPSILON);
        assert!(focus.winner().is_none());
        assert_eq!(focus.describe(), "international");
    }

    #[test]
    fn italian_vocabulary_and_self_reference_stack() {
        let focus = detect_language_focus("Streamer italiana da Milano");
        assert!((focus.italian.score - 4.0).abs() < f64::EPSILON);
        assert_eq!(focus.winner().map(|w| w.locale), Some("italian"));
        assert!(focus.describe().contains("italian terms: italiana, italia, milano"));
    }

    #[test]
    fn name_suffix_counts_for_english() {
        let focus = detect_language_focus("Luna_EN");
        assert!((focus.english.score - 2.0).abs() < f64::EPSILON);
        assert_eq!(focus.winner().map(|w| w.locale), Some("english"));
    }

    #[test]
    fn name_prefix_counts_for_italian() {
        let focus = detect_language_focus("ITA_Luna");
        assert!((focus.italian.score - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ties_go_to_italian() {
        let focus = detect_language_focus("Luna_ITA and Sol_EN");
        assert!((focus.italian.score - focus.english.score).abs() < f64::EPSILON);
        assert_eq!(focus.winner().map(|w| w.locale), Some("italian"));
    }
}
