#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use fusion_core::FusionConfig;
use fusion_gateway::services::FusionService;

#[test]
fn health_check_is_ok() {
    assert_eq!(FusionService::new().health_check(), "ok");
}

#[test]
fn fuse_basic_and_outliers() {
    let svc = FusionService::new();
    let v = svc.fuse_readings(&[10.0, 11.0, 12.0, 13.0, 14.0]).unwrap();
    assert_eq!(v, 12.0);

    let v = svc.fuse_readings(&[10.0, 11.0, 12.0, 13.0, 100.0]).unwrap();
    assert!(v > 10.0 && v < 14.0, "v={v}");
}

#[test]
fn large_dataset_stays_central() {
    let svc = FusionService::new();
    let readings: Vec<f64> = (0..100).map(|i| 10.0 + (i % 10) as f64).collect();
    let v = svc.fuse_readings(&readings).unwrap();
    assert_eq!(v, 14.5);
}

#[test]
fn statistics_track_requests() {
    let svc = FusionService::new();
    let s = svc.get_stats();
    assert_eq!(s.total_requests, 0);
    assert_eq!(s.successful_requests, 0);
    assert_eq!(s.failed_requests, 0);
    assert_eq!(s.average_fused_value, 0.0);

    svc.fuse_readings(&[10.0, 11.0, 12.0]).unwrap();
    svc.fuse_readings(&[10.0, 11.0, 12.0]).unwrap();

    let s = svc.get_stats();
    assert_eq!(s.total_requests, 2);
    assert_eq!(s.successful_requests, 2);
    assert_eq!(s.failed_requests, 0);
    assert_eq!(s.average_fused_value, 11.0);
    assert!(s.last_confidence > 0.0 && s.last_confidence <= 1.0);
}

#[test]
fn average_uses_truncated_milli_units() {
    let svc = FusionService::new();
    svc.fuse_readings(&[1.23456]).unwrap();
    svc.fuse_readings(&[2.0005]).unwrap();
    svc.fuse_readings(&[-0.5]).unwrap();

    // floor(1234.56) + floor(2000.5) + floor(-500) = 1234 + 2000 - 500
    let expected = (1234.0 + 2000.0 - 500.0) / 3000.0;
    assert_eq!(svc.get_stats().average_fused_value, expected);
}

#[test]
fn running_sum_saturates_instead_of_wrapping() {
    let svc = FusionService::new();
    svc.fuse_readings(&[1e16]).unwrap();
    svc.fuse_readings(&[1e16]).unwrap();

    let s = svc.get_stats();
    assert_eq!(s.successful_requests, 2);
    let expected = i64::MAX as f64 / 2000.0;
    assert_eq!(s.average_fused_value, expected);
    assert!(s.average_fused_value > 0.0);

    let svc = FusionService::new();
    svc.fuse_readings(&[-1e16]).unwrap();
    svc.fuse_readings(&[-1e16]).unwrap();
    assert_eq!(svc.get_stats().average_fused_value, i64::MIN as f64 / 2000.0);
}

#[test]
fn non_finite_result_counts_as_failure() {
    let svc = FusionService::new();
    let err = svc.fuse_readings(&[f64::MAX, f64::MAX]).expect_err("overflow must fail");
    assert_eq!(err.class().as_str(), "internal_error");

    let s = svc.get_stats();
    assert_eq!(s.total_requests, 1);
    assert_eq!(s.successful_requests, 0);
    assert_eq!(s.failed_requests, 1);
    assert_eq!(s.total_requests, s.successful_requests + s.failed_requests);
}

#[test]
fn reset_keeps_start_time() {
    let svc = FusionService::new();
    svc.fuse_readings(&[10.0, 11.0, 12.0]).unwrap();
    let before = svc.get_stats();
    assert_eq!(before.total_requests, 1);

    svc.reset_stats();
    let after = svc.get_stats();
    assert_eq!(after.total_requests, 0);
    assert_eq!(after.successful_requests, 0);
    assert_eq!(after.failed_requests, 0);
    assert_eq!(after.average_fused_value, 0.0);
    assert_eq!(after.start_time_unix_ms, before.start_time_unix_ms);
    assert!(after.uptime.as_secs() < 60);
}

#[test]
fn config_defaults_and_updates() {
    let svc = FusionService::new();
    assert_eq!(svc.get_config(), FusionConfig::default());

    let cfg = svc
        .set_config(r#"{"outlier_threshold": 2.0, "min_confidence": 0.85}"#)
        .unwrap();
    assert_eq!(cfg.outlier_threshold, 2.0);
    assert_eq!(cfg.min_confidence, 0.85);
    assert_eq!(svc.get_config(), cfg);

    let err = svc.set_config(r#"{"outlier_threshold": -3}"#).expect_err("must fail");
    assert_eq!(err.class().as_str(), "invalid_config");
    assert_eq!(svc.get_config(), cfg);
}

#[test]
fn service_starts_from_given_config() {
    let cfg = FusionConfig {
        outlier_threshold: 1.5,
        ..FusionConfig::default()
    };
    let svc = FusionService::with_config(cfg);
    assert_eq!(svc.get_config(), cfg);
    assert_eq!(svc.fuse_readings(&[10.0, 11.0, 12.0, 13.0, 100.0]).unwrap(), 11.5);
}

#[test]
fn config_threshold_changes_fusion() {
    let svc = FusionService::new();
    let readings = [10.0, 11.0, 12.0, 13.0, 100.0];
    assert_eq!(svc.fuse_readings(&readings).unwrap(), 12.0);

    svc.set_config(r#"{"outlier_threshold": 1.5}"#).unwrap();
    assert_eq!(svc.fuse_readings(&readings).unwrap(), 11.5);

    svc.set_config(r#"{"enable_outlier_detection": false, "outlier_threshold": 0.1}"#)
        .unwrap();
    assert_eq!(svc.fuse_readings(&readings).unwrap(), 12.0);
}

#[test]
fn concurrent_fusions_and_config_swaps() {
    let svc = Arc::new(FusionService::new());
    let workers = 8;
    let per_worker = 250;

    let mut handles: Vec<_> = (0..workers)
        .map(|_| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || {
                for _ in 0..per_worker {
                    let v = svc.fuse_readings(&[10.0, 11.0, 12.0, 13.0, 14.0]).unwrap();
                    assert_eq!(v, 12.0);
                }
            })
        })
        .collect();

    let swapper = {
        let svc = Arc::clone(&svc);
        thread::spawn(move || {
            for i in 0..200 {
                let t = if i % 2 == 0 { 2.5 } else { 3.0 };
                svc.set_config(&format!(r#"{{"outlier_threshold": {t}}}"#)).unwrap();
                let cfg = svc.get_config();
                assert!(cfg.outlier_threshold == 2.5 || cfg.outlier_threshold == 3.0);
            }
        })
    };
    handles.push(swapper);
    for h in handles {
        h.join().unwrap();
    }

    let s = svc.get_stats();
    let total = (workers * per_worker) as u64;
    assert_eq!(s.total_requests, total);
    assert_eq!(s.successful_requests, total);
    assert_eq!(s.average_fused_value, 12.0);
}
