//! Name matching between a search query and a candidate's display name.
//!
//! Three variants with increasing precision:
//! - [`loose_match`] for tag-stage hits, where retrieval is already trusted;
//! - [`strict_match`] for content and fallback stages;
//! - [`fuzzy_match`] for open-ended name search, which must not over-match on
//!   generic platform words.

/// Generic platform words that never count as a name match on their own.
pub const STOP_WORDS: &[&str] = &[
    "gamer", "tv", "official", "channel", "live", "stream", "youtube", "twitch", "vtuber",
    "virtual",
];

const FUZZY_MIN_TOKEN_LEN: usize = 4;
const FUZZY_PREFIX_LEN: usize = 4;

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// `hits / total >= numerator / denominator` without float casts.
fn ratio_at_least(hits: usize, total: usize, numerator: usize, denominator: usize) -> bool {
    total > 0 && hits * denominator >= total * numerator
}

/// Substring either way, or any query word inside the candidate.
#[must_use]
pub fn loose_match(candidate: &str, query: &str) -> bool {
    let candidate = candidate.trim().to_lowercase();
    let query = query.trim().to_lowercase();
    if candidate.is_empty() || query.is_empty() {
        return candidate == query;
    }
    candidate.contains(&query)
        || query.contains(&candidate)
        || query.split_whitespace().any(|word| candidate.contains(word))
}

#[must_use]
pub fn strict_match(candidate: &str, query: &str) -> bool {
    let candidate = candidate.trim().to_lowercase();
    let query = query.trim().to_lowercase();

    if candidate == query {
        return true;
    }
    if candidate.is_empty() || query.is_empty() {
        return false;
    }
    if candidate.contains(&query) || query.contains(&candidate) {
        return true;
    }

    let query_words: Vec<&str> = query.split_whitespace().collect();
    let candidate_words: Vec<&str> = candidate.split_whitespace().collect();

    if query_words.len() > 1 {
        let hits = query_words
            .iter()
            .filter(|q| candidate_words.iter().any(|c| c.contains(*q)))
            .count();
        return ratio_at_least(hits, query_words.len(), 6, 10);
    }

    query_words.first().is_some_and(|q| {
        candidate_words
            .iter()
            .any(|c| c.contains(q) || q.contains(c))
    })
}

fn normalize_for_fuzzy(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_lowercase()
}

fn shares_prefix(a: &str, b: &str) -> bool {
    a.chars().count() >= FUZZY_PREFIX_LEN
        && b.chars().count() >= FUZZY_PREFIX_LEN
        && a.chars().take(FUZZY_PREFIX_LEN).eq(b.chars().take(FUZZY_PREFIX_LEN))
}

fn long_enough(word: &str) -> bool {
    word.chars().count() >= FUZZY_MIN_TOKEN_LEN
}

#[must_use]
pub fn fuzzy_match(candidate: &str, query: &str) -> bool {
    let candidate = normalize_for_fuzzy(candidate);
    let query = normalize_for_fuzzy(query);
    if candidate.is_empty() || query.is_empty() {
        return false;
    }

    let query_words: Vec<&str> = query.split_whitespace().collect();
    let candidate_words: Vec<&str> = candidate.split_whitespace().collect();

    if let [only] = query_words.as_slice() {
        if is_stop_word(only) {
            return false;
        }
    }

    if candidate == query {
        return true;
    }
    if (candidate.contains(&query) && !is_stop_word(&query))
        || (query.contains(&candidate) && !is_stop_word(&candidate))
    {
        return true;
    }

    if query_words.len() > 1 {
        let hits = query_words
            .iter()
            .filter(|q| candidate_words.iter().any(|c| c.contains(*q)))
            .count();
        if ratio_at_least(hits, query_words.len(), 7, 10) {
            return true;
        }
    } else if let Some(q) = query_words.first().filter(|q| long_enough(q)) {
        let single_word_hit = candidate_words
            .iter()
            .filter(|c| !is_stop_word(c) && long_enough(c))
            .any(|c| c.contains(q) || q.contains(c));
        if single_word_hit {
            return true;
        }
    }

    query_words.iter().filter(|q| !is_stop_word(q)).any(|q| {
        candidate_words
            .iter()
            .filter(|c| !is_stop_word(c))
            .any(|c| shares_prefix(q, c))
    })
}
