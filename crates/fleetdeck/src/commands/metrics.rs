//! Metric series command

use anyhow::Result;
use fleetdeck_core::present::{format_percent, metric_tone, progress_bar};
use fleetdeck_core::MetricSample;
use serde::Serialize;

use super::Context;
use crate::cli::MetricsArgs;
use crate::output::{is_json_mode, paint, print_info, print_json};

/// Summary of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub latest: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub samples: usize,
}

impl SeriesStats {
    pub fn from_samples(samples: &[MetricSample]) -> Option<Self> {
        let latest = samples.last()?.value;
        let (min, max, sum) = samples.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), s| (min.min(s.value), max.max(s.value), sum + s.value),
        );
        Some(Self {
            latest,
            min,
            max,
            avg: sum / samples.len() as f64,
            samples: samples.len(),
        })
    }
}

/// At most `rows` samples, evenly spaced, always including the last one
fn downsample(samples: &[MetricSample], rows: usize) -> Vec<&MetricSample> {
    if samples.len() <= rows || rows == 0 {
        return samples.iter().collect();
    }
    let step = samples.len().div_ceil(rows);
    let mut picked: Vec<&MetricSample> = samples.iter().rev().step_by(step).collect();
    picked.reverse();
    picked
}

pub async fn execute(ctx: &Context, args: MetricsArgs) -> Result<()> {
    let samples = ctx
        .source
        .host_metrics(&args.hostname, &args.metric, args.range.hours())
        .await;

    if is_json_mode() {
        print_json(&samples);
        return Ok(());
    }

    let Some(stats) = SeriesStats::from_samples(&samples) else {
        print_info(&format!(
            "No {} samples for {} in the last {}",
            args.metric,
            args.hostname,
            args.range.label()
        ));
        return Ok(());
    };

    println!(
        "{} on {} over {} ({} samples)",
        args.metric,
        args.hostname,
        args.range.label(),
        stats.samples
    );
    for sample in downsample(&samples, 24) {
        println!(
            "  {}  {} {}",
            sample.time.format("%m-%d %H:%M"),
            progress_bar(sample.value, 30),
            paint(&format_percent(sample.value), metric_tone(sample.value))
        );
    }
    print_stats(&stats);
    Ok(())
}

pub fn print_stats(stats: &SeriesStats) {
    println!(
        "  latest {}  min {}  max {}  avg {}",
        paint(&format_percent(stats.latest), metric_tone(stats.latest)),
        format_percent(stats.min),
        format_percent(stats.max),
        format_percent(stats.avg)
    );
}
