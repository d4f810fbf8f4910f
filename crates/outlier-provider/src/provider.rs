//! Stats Provider contract
use outlier_core::{ChannelStats, OutlierError, VideoStats};

/// Source of channel and video statistics.
///
/// Unknown IDs are not errors: `channel` answers `Ok(None)` and `videos`
/// leaves them out. `Err` is reserved for the provider itself failing.
pub trait StatsProvider: Send + Sync {
    fn channel(&self, channel_id: &str) -> Result<Option<ChannelStats>, OutlierError>;

    /// Details for every known id in `video_ids`, in request order.
    fn videos(&self, video_ids: &[String]) -> Result<Vec<VideoStats>, OutlierError>;

    /// Up to `max` upload ids of `channel`, most recent first.
    fn uploads(&self, channel: &ChannelStats, max: usize) -> Result<Vec<String>, OutlierError>;

    /// Up to `max` video ids matching a search keyword.
    fn search(&self, keyword: &str, max: usize) -> Result<Vec<String>, OutlierError>;

    /// Like [`StatsProvider::channel`], but an unknown channel is `MissingData`.
    fn require_channel(&self, channel_id: &str) -> Result<ChannelStats, OutlierError> {
        self.channel(channel_id)?
            .ok_or_else(|| OutlierError::missing_channel(channel_id))
    }
}

impl<P: StatsProvider + ?Sized> StatsProvider for std::sync::Arc<P> {
    fn channel(&self, channel_id: &str) -> Result<Option<ChannelStats>, OutlierError> {
        (**self).channel(channel_id)
    }

    fn videos(&self, video_ids: &[String]) -> Result<Vec<VideoStats>, OutlierError> {
        (**self).videos(video_ids)
    }

    fn uploads(&self, channel: &ChannelStats, max: usize) -> Result<Vec<String>, OutlierError> {
        (**self).uploads(channel, max)
    }

    fn search(&self, keyword: &str, max: usize) -> Result<Vec<String>, OutlierError> {
        (**self).search(keyword, max)
    }
}
