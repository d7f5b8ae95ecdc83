// Bounded random-walk telemetry generator. Pure given (previous, config, rng);
// the RNG is injected so tests can seed it and assert exact sequences.

use crate::models::{AnalyticsSample, SignalSample, now_millis};
use rand::Rng;
use serde::Deserialize;

/// Random-walk parameters for one numeric field.
#[derive(Debug, Clone, Deserialize)]
pub struct WalkParams {
    /// Starting value when there is no previous sample.
    pub base: f64,
    pub floor: f64,
    pub ceiling: f64,
    /// Maximum per-tick movement magnitude; each step draws from [-jitter/2, +jitter/2].
    pub jitter: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub signal_strength: WalkParams,
    pub data_rate: WalkParams,
    /// Error rate is an independent uniform draw in [0, max_error_rate] each
    /// tick; it models transient noise rather than drift.
    pub max_error_rate: f64,
    pub throughput: WalkParams,
    pub light_intensity: WalkParams,
    /// Packet loss (percent) is an independent uniform draw in
    /// [0, max_packet_loss] each tick, like error rate.
    pub max_packet_loss: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            signal_strength: WalkParams {
                base: 85.0,
                floor: 60.0,
                ceiling: 95.0,
                jitter: 5.0,
            },
            data_rate: WalkParams {
                base: 10.5,
                floor: 5.0,
                ceiling: 15.0,
                jitter: 2.0,
            },
            max_error_rate: 0.05,
            throughput: WalkParams {
                base: 10.5,
                floor: 8.0,
                ceiling: 15.0,
                jitter: 2.0,
            },
            light_intensity: WalkParams {
                base: 82.0,
                floor: 70.0,
                ceiling: 95.0,
                jitter: 6.0,
            },
            max_packet_loss: 2.0,
        }
    }
}

/// Time window for GET /api/analytics; picks series length and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsRange {
    Hour,
    Day,
    Week,
}

impl AnalyticsRange {
    /// (points, interval_ms): one minute over an hour, half an hour over a
    /// day, one hour over a week.
    pub fn series_shape(self) -> (usize, u64) {
        match self {
            AnalyticsRange::Hour => (60, 60_000),
            AnalyticsRange::Day => (48, 1_800_000),
            AnalyticsRange::Week => (168, 3_600_000),
        }
    }
}

fn walk_step<R: Rng>(previous: f64, params: &WalkParams, rng: &mut R) -> f64 {
    let half = params.jitter / 2.0;
    let delta = rng.random_range(-half..=half);
    (previous + delta).clamp(params.floor, params.ceiling)
}

/// Produces the next sample of the walk. With no previous sample the walk
/// starts from each field's base value. Output fields always land in
/// [floor, ceiling] regardless of where the previous sample was.
pub fn next_sample<R: Rng>(
    previous: Option<&SignalSample>,
    config: &GeneratorConfig,
    rng: &mut R,
) -> SignalSample {
    let (prev_signal, prev_rate) = match previous {
        Some(s) => (s.signal_strength, s.data_rate),
        None => (config.signal_strength.base, config.data_rate.base),
    };
    SignalSample {
        timestamp: now_millis(),
        signal_strength: walk_step(prev_signal, &config.signal_strength, rng),
        data_rate: walk_step(prev_rate, &config.data_rate, rng),
        error_rate: rng.random_range(0.0..=config.max_error_rate),
    }
}

/// Produces `points` samples ending at "now", spaced `interval_ms` apart, by
/// iterating the single-step walk from the base values. Each invocation is a
/// fresh independent sequence; used to seed charts with historical-looking data.
pub fn backfill<R: Rng>(
    points: usize,
    interval_ms: u64,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Vec<SignalSample> {
    let now = now_millis();
    let mut series = Vec::with_capacity(points);
    let mut previous: Option<SignalSample> = None;
    for i in 0..points {
        let mut sample = next_sample(previous.as_ref(), config, rng);
        sample.timestamp = now.saturating_sub((points as u64 - 1 - i as u64) * interval_ms);
        previous = Some(sample.clone());
        series.push(sample);
    }
    series
}

/// Next analytics reading: throughput and light intensity walk, packet loss
/// is an independent draw. Same contract as [`next_sample`].
pub fn next_analytics_sample<R: Rng>(
    previous: Option<&AnalyticsSample>,
    config: &GeneratorConfig,
    rng: &mut R,
) -> AnalyticsSample {
    let (prev_throughput, prev_light) = match previous {
        Some(s) => (s.throughput, s.light_intensity),
        None => (config.throughput.base, config.light_intensity.base),
    };
    AnalyticsSample {
        timestamp: now_millis(),
        throughput: walk_step(prev_throughput, &config.throughput, rng),
        packet_loss: rng.random_range(0.0..=config.max_packet_loss),
        light_intensity: walk_step(prev_light, &config.light_intensity, rng),
    }
}

/// Analytics trend series for a time range, ending at "now"; a fresh
/// independent sequence per invocation, like [`backfill`].
pub fn analytics_series<R: Rng>(
    range: AnalyticsRange,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Vec<AnalyticsSample> {
    let (points, interval_ms) = range.series_shape();
    let now = now_millis();
    let mut series = Vec::with_capacity(points);
    let mut previous: Option<AnalyticsSample> = None;
    for i in 0..points {
        let mut sample = next_analytics_sample(previous.as_ref(), config, rng);
        sample.timestamp = now.saturating_sub((points as u64 - 1 - i as u64) * interval_ms);
        previous = Some(sample.clone());
        series.push(sample);
    }
    series
}
