//! Keyword tables used by the classifier.
//!
//! All entries are lowercase and are matched as substrings of lowercased
//! text, so multi-word phrases work the same way as single words.

/// Strong performer evidence in a name or stream title.
pub(crate) const HIGH_WEIGHT: &[&str] = &[
    "vtuber",
    "virtual youtuber",
    "virtual streamer",
    "vtubing",
    "live2d",
    "rigging",
    "anime avatar",
    "virtual avatar",
    "virtual idol",
    "virtual personality",
    "virtual character",
    "vtuber italiana",
    "virtual youtuber italiana",
    "streamer virtuale",
    "avatar virtuale",
    "personaggio virtuale",
    "idol virtuale",
];

pub(crate) const MEDIUM_WEIGHT: &[&str] = &[
    "anime",
    "kawaii",
    "moe",
    "otaku",
    "weeb",
    "japanese",
    "virtual",
    "avatar",
    "character",
    "model",
    "streamer",
    "anime italiano",
    "kawaii italiano",
    "otaku italiano",
    "personaggio",
    "modello",
    "streamer italiano",
];

/// Performer evidence in a channel description.
pub(crate) const DESCRIPTION_INDICATORS: &[&str] = &[
    "vtuber",
    "virtual youtuber",
    "virtual streamer",
    "anime avatar",
    "live2d",
    "rigging",
    "model",
    "character",
    "vtubing",
    "virtual idol",
    "virtual personality",
    "virtual character",
    "anime streamer",
    "vtuber italiana",
    "virtual youtuber italiana",
    "streamer virtuale",
    "avatar anime",
    "personaggio virtuale",
    "idol virtuale",
    "vtubing italiano",
];

/// Signs of a face-cam streamer.
pub(crate) const NEGATIVE: &[&str] = &[
    "irl",
    "face cam",
    "real person",
    "no avatar",
    "camera",
    "real streamer",
    "non-vtuber",
    "human streamer",
    "persona reale",
    "faccia vera",
    "senza avatar",
    "streamer reale",
    "non vtuber",
    "streamer umano",
    "webcam",
    "faccia in diretta",
];

pub(crate) const AGENCIES: &[&str] = &[
    "hololive",
    "nijisanji",
    "vshojo",
    "vspo",
    "anycolor",
    "774inc",
    "upd8",
    "reality",
    "neo-porte",
    "v4mirai",
    "kamitsubaki",
    "noripro",
    "sugar lyric",
    "prism project",
    "vtuber italia",
    "vtuber italiani",
    "virtual youtuber italia",
    "anime italia",
    "otaku italia",
    "vtuber community italia",
    "italian vtuber",
    "italy vtuber",
    "italian virtual youtuber",
];

/// Content categories that say nothing about an avatar.
pub(crate) const NON_PERFORMER_CONTENT: &[&str] = &[
    "gaming", "gameplay", "review", "tutorial", "news", "music", "cooking", "fitness",
];

pub(crate) const ANIME_CULTURE: &[&str] =
    &["anime", "kawaii", "moe", "otaku", "weeb", "japanese", "manga"];

pub(crate) const STREAMING: &[&str] = &["streamer", "content creator", "live", "gaming", "chat"];

/// Tags that prove a channel is a performer. Matched as substrings of each tag.
pub(crate) const PERFORMER_TAGS: &[&str] = &[
    "vtuber",
    "virtual youtuber",
    "virtual streamer",
    "vtubing",
    "live2d",
    "virtual avatar",
    "anime avatar",
    "virtual idol",
    "virtual personality",
    "virtual character",
];

/// Tag groups used by tag-aware scoring: (label, terms, weight).
pub(crate) const TAG_GROUPS: &[(&str, &[&str], f64)] = &[
    (
        "performer tags",
        &[
            "vtuber",
            "virtual youtuber",
            "virtual streamer",
            "vtubing",
            "live2d",
            "virtual avatar",
        ],
        8.0,
    ),
    (
        "anime tags",
        &["anime", "kawaii", "moe", "otaku", "japanese", "manga"],
        3.0,
    ),
    (
        "italian tags",
        &["italiana", "italiano", "italia", "italian"],
        2.0,
    ),
    (
        "english tags",
        &["english", "british", "american", "uk", "usa"],
        2.0,
    ),
];

/// Content-stage gate on stream titles and descriptions.
pub(crate) const CONTENT_INDICATORS: &[&str] = &[
    "vtuber",
    "virtual",
    "avatar",
    "anime",
    "live2d",
    "kawaii",
    "moe",
    "otaku",
    "japanese",
    "character",
];

/// Returns the entries of `terms` that occur in `text`.
pub(crate) fn matching<'a>(terms: &[&'a str], text: &str) -> Vec<&'a str> {
    terms
        .iter()
        .copied()
        .filter(|term| text.contains(term))
        .collect()
}

pub(crate) fn any_performer_keyword(text: &str) -> bool {
    HIGH_WEIGHT
        .iter()
        .chain(MEDIUM_WEIGHT)
        .any(|term| text.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_lowercase() {
        let tables: &[&[&str]] = &[
            HIGH_WEIGHT,
            MEDIUM_WEIGHT,
            DESCRIPTION_INDICATORS,
            NEGATIVE,
            AGENCIES,
            NON_PERFORMER_CONTENT,
            ANIME_CULTURE,
            STREAMING,
            PERFORMER_TAGS,
            CONTENT_INDICATORS,
        ];
        for table in tables {
            for term in *table {
                assert_eq!(*term, term.to_lowercase(), "{term} must be lowercase");
            }
        }
    }

    #[test]
    fn matching_returns_terms_in_table_order() {
        assert_eq!(
            matching(HIGH_WEIGHT, "vtubing with a live2d model"),
            vec!["vtubing", "live2d"]
        );
        assert!(matching(NEGATIVE, "cozy karaoke").is_empty());
    }

    #[test]
    fn performer_keyword_detects_medium_terms() {
        assert!(any_performer_keyword("cute anime girl"));
        assert!(!any_performer_keyword("fps gameplay tutorials"));
    }
}
