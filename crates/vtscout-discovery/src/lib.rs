//! Performer (`VTuber`) discovery across Twitch and YouTube.
//!
//! The pipeline normalizes platform records into [`Candidate`]s, matches
//! names, scores candidates with the keyword [`Classifier`], and runs a
//! staged search per platform. [`Discovery`] fans a query out to every
//! platform concurrently and contains per-platform failures.

pub mod aggregate;
pub mod api;
pub mod classifier;
pub mod clients;
pub mod error;
pub mod matcher;
pub mod orchestrator;
pub mod strategy;
pub mod types;

pub use aggregate::{dedupe, rank, relevance};
pub use api::PlatformApi;
pub use classifier::{has_performer_tags, Classifier, ScoringPolicy};
pub use clients::{ClientSettings, TwitchClient, YouTubeClient};
pub use error::DiscoveryError;
pub use matcher::{fuzzy_match, loose_match, strict_match};
pub use orchestrator::{Discovery, DiscoveryReport, PlatformFailure};
pub use strategy::{PlatformStrategy, StagedSearch, StrategyProfile};
pub use types::{
    AudienceMetrics, Candidate, DiscoveredPerformer, RawChannel, RawStream, RawUser, ScoreResult,
    SearchStage,
};
