//! Memoizing cache for provider lookups
//!
//! Keyed by ID. Channel lookups are cached even when the channel does not
//! exist, so a bad ID costs one upstream call per cache lifetime. Records
//! are handed out as clones; the cache never shares mutable state with the
//! engine.

use outlier_core::{ChannelStats, VideoStats};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct CacheState {
    channels: HashMap<String, Option<ChannelStats>>,
    videos: HashMap<String, VideoStats>,
    uploads: HashMap<String, Vec<String>>,
    hits: u64,
    misses: u64,
}

/// Hit/miss counters and entry counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub channels: usize,
    pub videos: usize,
    pub upload_lists: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub struct StatsCache {
    state: Mutex<CacheState>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // A panic while holding the lock cannot leave a map half-written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `None` when the channel was never looked up, `Some(None)` when it
    /// was looked up and does not exist.
    pub fn channel(&self, channel_id: &str) -> Option<Option<ChannelStats>> {
        let mut state = self.lock();
        let found = state.channels.get(channel_id).cloned();
        if found.is_some() {
            state.hits += 1;
        } else {
            state.misses += 1;
        }
        found
    }

    pub fn store_channel(&self, channel_id: &str, channel: Option<ChannelStats>) {
        self.lock().channels.insert(channel_id.to_string(), channel);
    }

    pub fn video(&self, video_id: &str) -> Option<VideoStats> {
        let mut state = self.lock();
        let found = state.videos.get(video_id).cloned();
        if found.is_some() {
            state.hits += 1;
        } else {
            state.misses += 1;
        }
        found
    }

    /// Ids from `video_ids` that are not cached yet, in order, without duplicates.
    pub fn missing_videos(&self, video_ids: &[String]) -> Vec<String> {
        let state = self.lock();
        let mut seen = std::collections::HashSet::new();
        video_ids
            .iter()
            .filter(|id| !state.videos.contains_key(id.as_str()) && seen.insert(id.as_str()))
            .cloned()
            .collect()
    }

    pub fn store_videos(&self, videos: &[VideoStats]) {
        let mut state = self.lock();
        for video in videos {
            state.videos.insert(video.video_id.clone(), video.clone());
        }
    }

    /// A cached upload list, only when it already holds at least `max` ids.
    pub fn uploads(&self, reference: &str, max: usize) -> Option<Vec<String>> {
        let mut state = self.lock();
        let found = state
            .uploads
            .get(reference)
            .filter(|ids| ids.len() >= max)
            .map(|ids| ids[..max].to_vec());
        if found.is_some() {
            state.hits += 1;
        } else {
            state.misses += 1;
        }
        found
    }

    pub fn store_uploads(&self, reference: &str, video_ids: Vec<String>) {
        self.lock().uploads.insert(reference.to_string(), video_ids);
    }

    /// Forget a channel and its upload list.
    pub fn invalidate_channel(&self, channel_id: &str) {
        let mut state = self.lock();
        if let Some(Some(channel)) = state.channels.remove(channel_id) {
            if let Some(reference) = channel.uploads_reference {
                state.uploads.remove(&reference);
            }
        }
    }

    pub fn invalidate_video(&self, video_id: &str) {
        self.lock().videos.remove(video_id);
    }

    pub fn clear(&self) {
        *self.lock() = CacheState::default();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            channels: state.channels.len(),
            videos: state.videos.len(),
            upload_lists: state.uploads.len(),
            hits: state.hits,
            misses: state.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("v{}", i)).collect()
    }

    #[test]
    fn test_negative_channel_lookup_is_cached() {
        let cache = StatsCache::new();
        assert_eq!(cache.channel("UCnope"), None);
        cache.store_channel("UCnope", None);
        assert_eq!(cache.channel("UCnope"), Some(None));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_missing_videos_dedupes() {
        let cache = StatsCache::new();
        cache.store_videos(&[VideoStats::new("v1", "UC1", 10)]);
        let wanted = vec!["v0".to_string(), "v1".to_string(), "v0".to_string(), "v2".to_string()];
        assert_eq!(cache.missing_videos(&wanted), vec!["v0", "v2"]);
    }

    #[test]
    fn test_uploads_need_enough_ids() {
        let cache = StatsCache::new();
        cache.store_uploads("UU1", ids(10));
        assert_eq!(cache.uploads("UU1", 5), Some(ids(5)));
        assert_eq!(cache.uploads("UU1", 10), Some(ids(10)));
        assert_eq!(cache.uploads("UU1", 11), None);
    }

    #[test]
    fn test_invalidate_channel_drops_uploads() {
        let cache = StatsCache::new();
        cache.store_channel("UC1", Some(ChannelStats::new("UC1", "c").with_uploads("UU1")));
        cache.store_uploads("UU1", ids(3));

        cache.invalidate_channel("UC1");
        assert_eq!(cache.channel("UC1"), None);
        assert_eq!(cache.uploads("UU1", 1), None);
    }

    #[test]
    fn test_clear_resets_everything() {
        let cache = StatsCache::new();
        cache.store_videos(&[VideoStats::new("v1", "UC1", 10)]);
        let _ = cache.video("v1");
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
