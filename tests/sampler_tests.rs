// Sampler tests against a scripted provider

mod common;

use common::{Capture, GIB, MockProvider, ticks};
use std::sync::Arc;
use std::time::{Duration, Instant};
use sysdash::models::LOAD_AVERAGE_UNSUPPORTED;
use sysdash::sampler::{SampleError, Sampler};
use tokio_util::sync::CancellationToken;

fn sampler(provider: MockProvider) -> Sampler {
    Sampler::new(Arc::new(provider))
}

#[tokio::test]
async fn sample_assembles_complete_snapshot() {
    let snapshot = sampler(MockProvider::new())
        .sample(5, &CancellationToken::new())
        .await
        .expect("sample");

    assert_eq!(snapshot.host_name, "testhost");
    assert_eq!(snapshot.os_description, "TestOS 1.0 build 6.1.0");
    assert_eq!(snapshot.boot_epoch_seconds, 1_700_000_000);
    assert!(snapshot.boot_local_time.is_some());
    assert_eq!(snapshot.uptime_human, "1 days, 02:03:04");
    assert_eq!(snapshot.manufacturer, "Acme");
    assert_eq!(snapshot.serial, "SN123");
    assert_eq!(snapshot.memory_total_bytes, 8 * GIB);
    assert_eq!(snapshot.memory_available_bytes, 4 * GIB);
    assert_eq!(snapshot.cpu_load_fraction, 0.5);
    assert_eq!(snapshot.per_core_load_fractions, vec![1.0, 0.0]);
    assert!(!snapshot.per_core_best_effort);
    assert_eq!(snapshot.load_averages(), [0.5, 0.75, 1.25]);
    assert_eq!(snapshot.interval_millis, 5);
    assert!(snapshot.sampled_at_millis > 0);
}

#[tokio::test]
async fn sample_waits_for_the_interval() {
    let started = Instant::now();
    sampler(MockProvider::new())
        .sample(50, &CancellationToken::new())
        .await
        .expect("sample");
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn zero_interval_is_rejected() {
    let provider = Arc::new(MockProvider::new());
    let err = Sampler::new(provider.clone())
        .sample(0, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SampleError::InvalidInterval));
    assert_eq!(provider.tick_reads(), 0);
}

#[tokio::test]
async fn unavailable_provider_yields_hardware_unavailable() {
    let err = sampler(MockProvider::unavailable())
        .sample(5, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SampleError::HardwareUnavailable(_)));
}

#[tokio::test]
async fn wrapped_counters_are_clamped() {
    let provider = MockProvider::new().with_captures(vec![
        Capture {
            aggregate: ticks(u64::MAX - 10, 1_000),
            per_core: vec![ticks(0, 1_000), ticks(1_000, 0)],
        },
        Capture {
            // aggregate busy wrapped to a small value
            aggregate: ticks(5, 2_000),
            // core 0: busy jumped past elapsed total; core 1: busy went backwards
            per_core: vec![ticks(500, 600), ticks(0, 2_000)],
        },
    ]);
    let snapshot = sampler(provider)
        .sample(5, &CancellationToken::new())
        .await
        .expect("sample");
    assert!((0.0..=1.0).contains(&snapshot.cpu_load_fraction));
    assert_eq!(snapshot.per_core_load_fractions, vec![1.0, 0.0]);
    for f in &snapshot.per_core_load_fractions {
        assert!((0.0..=1.0).contains(f));
    }
}

#[tokio::test]
async fn core_hot_plug_truncates_and_flags_best_effort() {
    let provider = MockProvider::new().with_captures(vec![
        Capture {
            aggregate: ticks(0, 0),
            per_core: vec![ticks(0, 0), ticks(0, 0)],
        },
        Capture {
            aggregate: ticks(10, 10),
            per_core: vec![ticks(10, 0), ticks(0, 10), ticks(5, 5)],
        },
    ]);
    let snapshot = sampler(provider)
        .sample(5, &CancellationToken::new())
        .await
        .expect("sample");
    assert_eq!(snapshot.per_core_load_fractions, vec![1.0, 0.0]);
    assert!(snapshot.per_core_best_effort);
}

#[tokio::test]
async fn unsupported_load_average_uses_sentinels() {
    let provider = MockProvider::new().with_load_averages(None);
    let snapshot = sampler(provider)
        .sample(5, &CancellationToken::new())
        .await
        .expect("unsupported load average must not fail the sample");
    assert_eq!(snapshot.load_averages(), [LOAD_AVERAGE_UNSUPPORTED; 3]);
    assert_eq!(snapshot.host_name, "testhost");
}

#[tokio::test]
async fn short_load_average_read_pads_with_sentinels() {
    let provider = MockProvider::new().with_load_averages(Some(vec![0.25]));
    let snapshot = sampler(provider)
        .sample(5, &CancellationToken::new())
        .await
        .expect("sample");
    assert_eq!(snapshot.load_averages(), [0.25, -1.0, -1.0]);
}

#[tokio::test]
async fn invalid_boot_epoch_leaves_boot_time_absent() {
    let provider = MockProvider::new().with_facts(|f| f.boot_epoch_seconds = 0);
    let snapshot = sampler(provider)
        .sample(5, &CancellationToken::new())
        .await
        .expect("sample");
    assert!(snapshot.boot_local_time.is_none());
    assert_eq!(snapshot.boot_epoch_seconds, 0);
}

#[tokio::test]
async fn available_memory_never_exceeds_total() {
    let provider = MockProvider::new().with_facts(|f| {
        f.memory_total_bytes = GIB;
        f.memory_available_bytes = 2 * GIB;
    });
    let snapshot = sampler(provider)
        .sample(5, &CancellationToken::new())
        .await
        .expect("sample");
    assert_eq!(snapshot.memory_available_bytes, GIB);
}

#[tokio::test]
async fn disk_summaries_skip_empty_mounts_and_keep_free_within_total() {
    let snapshot = sampler(MockProvider::new())
        .sample(5, &CancellationToken::new())
        .await
        .expect("sample");
    assert_eq!(snapshot.disk_summaries.len(), 1);
    assert_eq!(snapshot.disk_summaries[0].mount_point, "/");
    for d in &snapshot.disk_summaries {
        assert!(d.free_bytes <= d.total_bytes);
    }
}

#[tokio::test]
async fn unreadable_file_stores_yield_empty_disk_list() {
    let provider = MockProvider::new().with_file_stores(None);
    let snapshot = sampler(provider)
        .sample(5, &CancellationToken::new())
        .await
        .expect("sample");
    assert!(snapshot.disk_summaries.is_empty());
}

#[tokio::test]
async fn cancellation_abandons_the_wait() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });
    let started = Instant::now();
    let err = sampler(MockProvider::new())
        .sample(60_000, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, SampleError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn already_cancelled_sample_reads_nothing() {
    let provider = Arc::new(MockProvider::new());
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = Sampler::new(provider.clone())
        .sample(5, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, SampleError::Cancelled));
    assert_eq!(provider.fact_reads(), 0);
    assert_eq!(provider.tick_reads(), 0);
    assert_eq!(provider.per_core_reads(), 0);
}

#[tokio::test]
async fn concurrent_samples_on_one_sampler_take_their_own_reads() {
    // Counters grow evenly, so any earlier/later pair of reads gives 50%.
    let captures = (0..4)
        .map(|k| Capture {
            aggregate: ticks(10 * k, 10 * k),
            per_core: vec![ticks(10 * k, 10 * k); 2],
        })
        .collect();
    let provider = Arc::new(MockProvider::new().with_captures(captures));
    let sampler = Sampler::new(provider.clone());
    let cancel = CancellationToken::new();

    let (a, b) = tokio::join!(sampler.sample(20, &cancel), sampler.sample(20, &cancel));
    let (a, b) = (a.expect("a"), b.expect("b"));

    assert_eq!(provider.tick_reads(), 4);
    assert_eq!(provider.per_core_reads(), 4);
    for snapshot in [&a, &b] {
        assert_eq!(snapshot.cpu_load_fraction, 0.5);
        assert_eq!(snapshot.per_core_load_fractions, vec![0.5, 0.5]);
    }
}

#[tokio::test]
async fn memory_used_percent_from_snapshot() {
    let snapshot = sampler(MockProvider::new())
        .sample(5, &CancellationToken::new())
        .await
        .expect("sample");
    assert_eq!(snapshot.memory_used_fraction(), 0.5);
    assert_eq!(
        sysdash::format::to_percent_string_default(snapshot.memory_used_fraction()),
        "50.0%"
    );
}
