//! Integration tests for the caching provider over the shared stats fixture.

use outlier_provider::{CachingProvider, InMemoryProvider, StatsCache, StatsFixture, StatsProvider};
use std::sync::Arc;

/// Path to the fixture relative to the workspace root
const FIXTURE_PATH: &str = "testing/fixtures/stats.yaml";

fn fixture_path() -> String {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    workspace_root.join(FIXTURE_PATH).to_string_lossy().to_string()
}

fn provider() -> InMemoryProvider {
    InMemoryProvider::from_fixture(StatsFixture::from_yaml_file(fixture_path()).unwrap())
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Channel lookups
// =============================================================================

#[test]
fn test_channel_lookups_are_memoized() {
    let caching = CachingProvider::new(provider());

    for _ in 0..3 {
        assert!(caching.channel("UCmaker").unwrap().is_some());
        assert!(caching.channel("UCgone").unwrap().is_none());
    }

    assert_eq!(caching.inner().calls().channel, 2);
    let stats = caching.cache().stats();
    assert_eq!(stats.channels, 2);
    assert_eq!(stats.hits, 4);
}

#[test]
fn test_provider_errors_are_not_cached() {
    let caching = CachingProvider::new(provider());
    assert!(caching.channel("UCdown").is_err());
    assert!(caching.channel("UCdown").is_err());
    assert_eq!(caching.inner().calls().channel, 2);
    assert_eq!(caching.cache().stats().channels, 0);
}

// =============================================================================
// Video details
// =============================================================================

#[test]
fn test_only_uncached_videos_are_fetched() {
    let caching = CachingProvider::new(provider());

    let first = caching.videos(&ids(&["m1", "m2"])).unwrap();
    assert_eq!(first.len(), 2);

    let second = caching.videos(&ids(&["m2", "m3", "nope"])).unwrap();
    let got: Vec<_> = second.iter().map(|v| v.video_id.as_str()).collect();
    assert_eq!(got, vec!["m2", "m3"]);

    // one batch per call; "m2" was not requested again
    assert_eq!(caching.inner().calls().videos, 2);
}

#[test]
fn test_videos_fetched_in_batches() {
    let caching = CachingProvider::new(provider()).with_batch_size(2);
    let all = ids(&["m1", "m2", "m3", "m4", "m5"]);
    assert_eq!(caching.videos(&all).unwrap().len(), 5);
    assert_eq!(caching.inner().calls().videos, 3);
}

// =============================================================================
// Upload lists
// =============================================================================

#[test]
fn test_upload_list_reused_when_long_enough() {
    let caching = CachingProvider::new(provider());
    let channel = caching.channel("UCmaker").unwrap().unwrap();

    assert_eq!(caching.uploads(&channel, 5).unwrap().len(), 5);
    assert_eq!(caching.uploads(&channel, 3).unwrap(), ids(&["m1", "m2", "m3"]));
    assert_eq!(caching.inner().calls().uploads, 1);

    // asking for more than was cached goes upstream again
    assert_eq!(caching.uploads(&channel, 50).unwrap().len(), 5);
    assert_eq!(caching.inner().calls().uploads, 2);
}

#[test]
fn test_channel_without_upload_reference() {
    let caching = CachingProvider::new(provider());
    let channel = caching.channel("UCbare").unwrap().unwrap();
    assert!(caching.uploads(&channel, 10).unwrap().is_empty());
    assert_eq!(caching.inner().calls().uploads, 0);
}

// =============================================================================
// Cache lifetime
// =============================================================================

#[test]
fn test_injected_cache_outlives_provider() {
    let cache = StatsCache::shared();

    {
        let caching = CachingProvider::with_cache(provider(), Arc::clone(&cache));
        caching.channel("UCmaker").unwrap();
        caching.videos(&ids(&["m1"])).unwrap();
    }

    let caching = CachingProvider::with_cache(provider(), Arc::clone(&cache));
    caching.channel("UCmaker").unwrap();
    caching.videos(&ids(&["m1"])).unwrap();
    assert_eq!(caching.inner().calls().channel, 0);
    assert_eq!(caching.inner().calls().videos, 0);
}

#[test]
fn test_invalidation_forces_refetch() {
    let caching = CachingProvider::new(provider());
    caching.channel("UCmaker").unwrap();
    caching.videos(&ids(&["m1"])).unwrap();

    caching.cache().invalidate_channel("UCmaker");
    caching.cache().invalidate_video("m1");

    caching.channel("UCmaker").unwrap();
    caching.videos(&ids(&["m1"])).unwrap();
    assert_eq!(caching.inner().calls().channel, 2);
    assert_eq!(caching.inner().calls().videos, 2);
}

#[test]
fn test_search_passes_through() {
    let caching = CachingProvider::new(provider());
    assert_eq!(caching.search("I tried", 2).unwrap(), ids(&["m4", "q1"]));
    assert_eq!(caching.search("I tried", 2).unwrap(), ids(&["m4", "q1"]));
    assert_eq!(caching.inner().calls().search, 2);
}
