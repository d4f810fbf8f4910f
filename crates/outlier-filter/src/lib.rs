//! Outlier Filter: criteria, ranking and sampling
//!
//! Declarative selection over a set of [`ScoredVideo`]s.
//!
//! # Example
//!
//! ```
//! use outlier_core::{Baseline, ChannelStats, ScoredVideo, VideoStats};
//! use outlier_filter::{filter, rank, FilterCriteria, SortOrder};
//!
//! let channel = ChannelStats::new("UC1", "Workshop").with_subscribers(100);
//! let baseline = Baseline::from_sample(200.0, 3);
//! let videos = vec![
//!     ScoredVideo::new(VideoStats::new("a", "UC1", 1000), &channel, &baseline),
//!     ScoredVideo::new(VideoStats::new("b", "UC1", 150), &channel, &baseline),
//! ];
//!
//! let criteria = FilterCriteria::none().with_min_outlier_score(5.0);
//! criteria.validate().unwrap();
//!
//! let kept = rank(filter(videos, &criteria), SortOrder::ViewsDescending);
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].video_id(), "a");
//! ```

pub mod criteria;
pub mod date_preset;
pub mod filter;
pub mod rank;

pub use criteria::{Criterion, FilterCriteria};
pub use date_preset::DatePreset;
pub use filter::{filter, partition, rejection};
pub use rank::{rank, rank_with_rng, sample_random, sample_random_with_rng, SortOrder};
