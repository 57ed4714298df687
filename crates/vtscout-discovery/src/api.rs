//! The capability contract every platform client exposes to the pipeline.

use std::collections::HashMap;

use async_trait::async_trait;
use vtscout_core::Platform;

use crate::error::DiscoveryError;
use crate::types::{RawChannel, RawStream, RawUser};

/// Read-only access to one platform's search and detail endpoints.
///
/// `search_channels` and `get_user_info` are required. Live search and
/// per-channel tags are optional capabilities: the defaults fall back to
/// channel search and to "no extra tags" respectively.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    fn platform(&self) -> Platform;

    async fn search_channels(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawChannel>, DiscoveryError>;

    /// Detail records for `ids`. Unknown ids are silently absent.
    async fn get_user_info(&self, ids: &[String]) -> Result<Vec<RawUser>, DiscoveryError>;

    async fn search_live_streams(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawStream>, DiscoveryError> {
        let channels = self.search_channels(query, max_results).await?;
        Ok(channels.into_iter().map(RawStream::from).collect())
    }

    /// Extra descriptive tags keyed by channel id.
    async fn get_channel_tags(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, DiscoveryError> {
        let _ = ids;
        Ok(HashMap::new())
    }
}
