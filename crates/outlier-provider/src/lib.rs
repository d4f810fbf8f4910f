//! Outlier Provider: where channel and video statistics come from
//!
//! The engine never talks to the hosting platform itself. It asks a
//! [`StatsProvider`] for records by ID. Caching is layered on top by
//! [`CachingProvider`], with the cache handed in by the caller so its
//! lifetime and invalidation stay explicit.
//!
//! ```text
//! engine ─→ CachingProvider ─→ StatsCache (Arc, caller-owned)
//!                 │
//!                 └──→ inner StatsProvider (HTTP client, InMemoryProvider, ...)
//! ```

pub mod cache;
pub mod caching;
pub mod memory;
pub mod parse;
pub mod provider;

pub use cache::{CacheStats, StatsCache};
pub use caching::{CachingProvider, VIDEOS_BATCH_SIZE};
pub use memory::{FixtureVideo, InMemoryProvider, ProviderCalls, StatsFixture};
pub use parse::{parse_channel_id, parse_iso8601_duration, parse_list};
pub use provider::StatsProvider;
