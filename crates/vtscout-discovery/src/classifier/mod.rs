//! Keyword-driven performer classifier.
//!
//! Scoring sums independent signals: keyword and agency bonuses, locale
//! focus, and penalties for face-cam or non-performer content. Thresholds
//! are per platform, see [`ScoringPolicy`].

mod adaptive;
mod keywords;
pub mod locale;
mod policy;

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use vtscout_core::Platform;

use crate::types::{Candidate, ScoreResult};

pub(crate) use keywords::CONTENT_INDICATORS;
pub use locale::{detect_language_focus, LocaleFocus, LocaleScore};
pub use policy::ScoringPolicy;

static STYLIZED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid stylized-character regex"));

static CJK_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\u{3040}-\u{309F}\u{30A0}-\u{30FF}\u{4E00}-\u{9FAF}]")
        .expect("valid kana/kanji regex")
});

/// Running score plus the ordered reasons that produced it.
#[derive(Debug, Default)]
struct Tally {
    score: f64,
    reasons: Vec<String>,
}

impl Tally {
    fn terms(&mut self, label: &str, terms: &[&str], weight: f64) {
        if !terms.is_empty() {
            self.score += weight;
            self.reasons.push(format!("{label}: {}", terms.join(", ")));
        }
    }

    fn flag(&mut self, reason: impl Into<String>, weight: f64) {
        self.score += weight;
        self.reasons.push(reason.into());
    }

    fn into_result(self, threshold: f64) -> ScoreResult {
        ScoreResult {
            score: self.score,
            reasons: self.reasons,
            threshold,
        }
    }
}

fn base_tally(candidate: &Candidate) -> Tally {
    use keywords::{
        any_performer_keyword, matching, AGENCIES, ANIME_CULTURE, DESCRIPTION_INDICATORS,
        HIGH_WEIGHT, MEDIUM_WEIGHT, NEGATIVE, NON_PERFORMER_CONTENT, STREAMING,
    };

    let name = candidate.display_name.to_lowercase();
    let title = candidate.title.to_lowercase();
    let description = candidate.description.to_lowercase();
    let all_text = format!("{name} {title} {description}");
    let has_performer_keyword = any_performer_keyword(&all_text);

    let mut tally = Tally::default();
    tally.terms("high-weight terms in name", &matching(HIGH_WEIGHT, &name), 5.0);
    tally.terms("high-weight terms in title", &matching(HIGH_WEIGHT, &title), 4.0);
    tally.terms("medium-weight terms in name", &matching(MEDIUM_WEIGHT, &name), 2.0);
    tally.terms("medium-weight terms in title", &matching(MEDIUM_WEIGHT, &title), 1.0);
    tally.terms(
        "indicators in description",
        &matching(DESCRIPTION_INDICATORS, &description),
        4.0,
    );
    tally.terms("agency", &matching(AGENCIES, &all_text), 6.0);

    let focus = detect_language_focus(&all_text);
    if let Some(winner) = focus.winner() {
        tally.flag(
            format!("locale focus ({}): {}", winner.locale, winner.reasons.join("; ")),
            focus.score(),
        );
    }

    tally.terms("negative indicators", &matching(NEGATIVE, &all_text), -5.0);
    if !has_performer_keyword {
        tally.terms(
            "non-performer content",
            &matching(NON_PERFORMER_CONTENT, &all_text),
            -3.0,
        );
    }
    tally.terms("anime terms", &matching(ANIME_CULTURE, &all_text), 1.0);
    tally.terms("streaming terms", &matching(STREAMING, &all_text), 0.5);

    let stylized: BTreeSet<&str> = STYLIZED_CHARS
        .find_iter(&name)
        .map(|m| m.as_str())
        .collect();
    if !stylized.is_empty() {
        let chars: Vec<&str> = stylized.into_iter().collect();
        tally.flag(format!("stylized characters in name: {}", chars.join(" ")), 1.0);
    }

    if name.contains("gamer") && !has_performer_keyword {
        tally.flag("gamer channel without performer keywords", -2.0);
    }
    if CJK_SCRIPT.is_match(&all_text) {
        tally.flag("kana/kanji script", 1.0);
    }

    tally
}

/// Returns whether any tag contains a performer indicator, plus the
/// matching tags (lowercased).
#[must_use]
pub fn has_performer_tags(tags: &[String]) -> (bool, Vec<String>) {
    let found: Vec<String> = tags
        .iter()
        .map(|tag| tag.to_lowercase())
        .filter(|tag| {
            keywords::PERFORMER_TAGS
                .iter()
                .any(|indicator| tag.contains(indicator))
        })
        .collect();
    (!found.is_empty(), found)
}

/// Scores candidates against per-platform policies.
#[derive(Debug, Clone)]
pub struct Classifier {
    twitch: ScoringPolicy,
    youtube: ScoringPolicy,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            twitch: ScoringPolicy::twitch(),
            youtube: ScoringPolicy::youtube(),
        }
    }

    /// Replaces the policy for one platform.
    #[must_use]
    pub fn with_policy(mut self, platform: Platform, policy: ScoringPolicy) -> Self {
        match platform {
            Platform::Twitch => self.twitch = policy,
            Platform::YouTube => self.youtube = policy,
        }
        self
    }

    #[must_use]
    pub fn policy(&self, platform: Platform) -> &ScoringPolicy {
        match platform {
            Platform::Twitch => &self.twitch,
            Platform::YouTube => &self.youtube,
        }
    }

    /// Base score with the platform's plain threshold.
    #[must_use]
    pub fn score(&self, candidate: &Candidate, platform: Platform) -> ScoreResult {
        base_tally(candidate).into_result(self.policy(platform).base_threshold)
    }

    /// Base score plus tag groups. The threshold drops when tags are present.
    #[must_use]
    pub fn score_with_tags(&self, candidate: &Candidate, platform: Platform) -> ScoreResult {
        let mut tally = base_tally(candidate);
        let lowered: Vec<String> = candidate.tags.iter().map(|t| t.to_lowercase()).collect();
        for (label, terms, weight) in keywords::TAG_GROUPS {
            let found: Vec<&str> = lowered
                .iter()
                .filter(|tag| terms.iter().any(|term| tag.contains(term)))
                .map(String::as_str)
                .collect();
            tally.terms(label, &found, *weight);
        }

        let policy = self.policy(platform);
        let threshold = if candidate.tags.is_empty() {
            policy.untagged_threshold
        } else {
            policy.tagged_threshold
        };
        tally.into_result(threshold)
    }

    /// Winning locale's reasons over name and description, else
    /// `"international"`.
    #[must_use]
    pub fn language_focus(&self, candidate: &Candidate) -> String {
        detect_language_focus(&format!(
            "{} {}",
            candidate.display_name, candidate.description
        ))
        .describe()
    }
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
