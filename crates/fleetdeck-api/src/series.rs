//! Synthetic metric series for offline demos

use chrono::{DateTime, Duration, Utc};
use fleetdeck_core::MetricSample;
use rand::Rng;
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Sample spacing for a window of `hours`
pub fn interval_for(hours: u32) -> Duration {
    match hours {
        0..=1 => Duration::seconds(15),
        2..=6 => Duration::seconds(60),
        7..=24 => Duration::seconds(300),
        _ => Duration::seconds(1800),
    }
}

/// Resting level of a metric, picked by name
pub fn base_level(metric_name: &str) -> f64 {
    let name = metric_name.to_lowercase();
    if name.contains("cpu") {
        45.0
    } else if name.contains("memory") {
        62.0
    } else if name.contains("disk") {
        71.0
    } else {
        50.0
    }
}

/// Generate a noisy series ending now
pub fn generate_series(hostname: &str, metric_name: &str, hours: u32) -> Vec<MetricSample> {
    generate_series_at(Utc::now(), &mut rand::thread_rng(), hostname, metric_name, hours)
}

/// Two sine periods over the window, uniform noise in [-10, 10) and a +25
/// spike between 70% and 75% of the way through, clamped to [0, 100].
pub fn generate_series_at<R: Rng>(
    now: DateTime<Utc>,
    rng: &mut R,
    hostname: &str,
    metric_name: &str,
    hours: u32,
) -> Vec<MetricSample> {
    let interval = interval_for(hours);
    let interval_ms = interval.num_milliseconds();
    let count = (i64::from(hours) * 3_600_000 / interval_ms) as usize;
    let base = base_level(metric_name);

    (0..count)
        .map(|i| {
            let (at, total) = (i as f64, count as f64);
            let wave = (at / total * PI * 4.0).sin() * 15.0;
            let noise: f64 = rng.gen_range(-10.0..10.0);
            let spike = if at > total * 0.7 && at < total * 0.75 { 25.0 } else { 0.0 };

            MetricSample {
                time: now - interval * (count - i) as i32,
                hostname: hostname.to_string(),
                metric_name: metric_name.to_string(),
                value: (base + wave + noise + spike).clamp(0.0, 100.0),
                labels: BTreeMap::new(),
            }
        })
        .collect()
}
