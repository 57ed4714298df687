//! Deduplication and relevance ranking of discovered performers.

use std::collections::HashMap;

use vtscout_core::Platform;

use crate::types::{AudienceMetrics, DiscoveredPerformer, SearchStage};

const TAG_STAGE_BONUS: f64 = 3.0;

/// Keeps one record per id, in first-seen order. On collision the higher
/// `vtuber_score` wins; ties keep the record seen first.
#[must_use]
pub fn dedupe(results: Vec<DiscoveredPerformer>) -> Vec<DiscoveredPerformer> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(results.len());
    let mut unique: Vec<DiscoveredPerformer> = Vec::with_capacity(results.len());

    for performer in results {
        match index.get(&performer.id) {
            Some(&slot) => {
                if performer.vtuber_score > unique[slot].vtuber_score {
                    unique[slot] = performer;
                }
            }
            None => {
                index.insert(performer.id.clone(), unique.len());
                unique.push(performer);
            }
        }
    }
    unique
}

/// Classifier score plus audience and stage bonuses.
#[must_use]
pub fn relevance(performer: &DiscoveredPerformer, platform: Platform) -> f64 {
    let mut score = performer.vtuber_score;

    match (platform, &performer.metrics) {
        (
            Platform::Twitch,
            AudienceMetrics::Twitch {
                is_live,
                broadcaster_type,
                viewer_count,
                ..
            },
        ) => {
            if *is_live {
                score += 2.0;
            }
            if matches!(broadcaster_type.as_str(), "partner" | "affiliate") {
                score += 1.0;
            }
            if *viewer_count > 100 {
                score += 0.5;
            }
        }
        (
            Platform::YouTube,
            AudienceMetrics::YouTube {
                subscriber_count,
                view_count,
                ..
            },
        ) => {
            if *subscriber_count > 1_000 {
                score += 1.0;
            }
            if *view_count > 10_000 {
                score += 0.5;
            }
        }
        _ => {}
    }

    if performer.search_stage == Some(SearchStage::Tags) {
        score += TAG_STAGE_BONUS;
    }
    score
}

/// Sorts by descending relevance. The sort is stable, so equal relevance
/// keeps input order and re-ranking is a no-op.
#[must_use]
pub fn rank(mut results: Vec<DiscoveredPerformer>, platform: Platform) -> Vec<DiscoveredPerformer> {
    results.sort_by(|a, b| relevance(b, platform).total_cmp(&relevance(a, platform)));
    results
}
