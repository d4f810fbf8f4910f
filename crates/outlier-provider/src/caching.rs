//! Provider decorator that consults a [`StatsCache`] first

use crate::cache::StatsCache;
use crate::provider::StatsProvider;
use outlier_core::{ChannelStats, OutlierError, VideoStats};
use std::sync::Arc;
use tracing::debug;

/// Largest number of video ids requested from the inner provider at once.
pub const VIDEOS_BATCH_SIZE: usize = 50;

pub struct CachingProvider<P> {
    inner: P,
    cache: Arc<StatsCache>,
    batch_size: usize,
}

impl<P: StatsProvider> CachingProvider<P> {
    /// Wrap `inner` with a fresh cache.
    pub fn new(inner: P) -> Self {
        Self::with_cache(inner, StatsCache::shared())
    }

    /// Wrap `inner` with a cache owned by the caller.
    pub fn with_cache(inner: P, cache: Arc<StatsCache>) -> Self {
        Self {
            inner,
            cache,
            batch_size: VIDEOS_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn cache(&self) -> &Arc<StatsCache> {
        &self.cache
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: StatsProvider> StatsProvider for CachingProvider<P> {
    fn channel(&self, channel_id: &str) -> Result<Option<ChannelStats>, OutlierError> {
        if let Some(cached) = self.cache.channel(channel_id) {
            debug!(channel_id, "channel cache hit");
            return Ok(cached);
        }
        let fetched = self.inner.channel(channel_id)?;
        self.cache.store_channel(channel_id, fetched.clone());
        Ok(fetched)
    }

    fn videos(&self, video_ids: &[String]) -> Result<Vec<VideoStats>, OutlierError> {
        let missing = self.cache.missing_videos(video_ids);
        for chunk in missing.chunks(self.batch_size) {
            let fetched = self.inner.videos(chunk)?;
            debug!(requested = chunk.len(), returned = fetched.len(), "fetched video batch");
            self.cache.store_videos(&fetched);
        }
        Ok(video_ids.iter().filter_map(|id| self.cache.video(id)).collect())
    }

    fn uploads(&self, channel: &ChannelStats, max: usize) -> Result<Vec<String>, OutlierError> {
        let Some(reference) = channel.uploads_reference.as_deref() else {
            return Ok(Vec::new());
        };
        if let Some(cached) = self.cache.uploads(reference, max) {
            return Ok(cached);
        }
        let fetched = self.inner.uploads(channel, max)?;
        self.cache.store_uploads(reference, fetched.clone());
        Ok(fetched)
    }

    fn search(&self, keyword: &str, max: usize) -> Result<Vec<String>, OutlierError> {
        self.inner.search(keyword, max)
    }
}
