//! Trend series for sensor charts.
//!
//! Smoothing is display-only. Classification and the health index always use
//! the raw latest value.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::reading::{readings_for_sensor, Reading};
use crate::thresholds::FilterMode;
use crate::types::Timestamp;

/// Trailing window used by [`FilterMode::MovingAvg5m`], in minutes.
pub const MOVING_AVERAGE_WINDOW_MINUTES: i64 = 5;

/// Process noise of the scalar Kalman filter.
const KALMAN_PROCESS_NOISE: f64 = 0.01;
/// Measurement noise of the scalar Kalman filter.
const KALMAN_MEASUREMENT_NOISE: f64 = 0.1;

/// One point on a sensor trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: Timestamp,
    pub value: f64,
}

/// Readings of one sensor, oldest first, smoothed with `filter`.
pub fn trend_series(
    readings: &[Reading],
    asset_id: &str,
    sensor_id: &str,
    filter: FilterMode,
) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = readings_for_sensor(readings, asset_id, sensor_id)
        .map(|r| TrendPoint {
            timestamp: r.timestamp,
            value: r.value,
        })
        .collect();
    // Stable, so readings sharing a timestamp keep input order.
    points.sort_by_key(|p| p.timestamp);
    apply_filter(&points, filter)
}

/// Smooth an already time-ordered series.
pub fn apply_filter(points: &[TrendPoint], filter: FilterMode) -> Vec<TrendPoint> {
    match filter {
        FilterMode::Raw => points.to_vec(),
        FilterMode::MovingAvg5m => {
            moving_average(points, Duration::minutes(MOVING_AVERAGE_WINDOW_MINUTES))
        }
        FilterMode::Kalman => kalman(points),
    }
}

/// Mean of the points in `(t - window, t]` for every point `t`.
fn moving_average(points: &[TrendPoint], window: Duration) -> Vec<TrendPoint> {
    let mut out = Vec::with_capacity(points.len());
    let mut start = 0;
    let mut sum = 0.0;

    for (end, point) in points.iter().enumerate() {
        sum += point.value;
        while points[start].timestamp <= point.timestamp - window {
            sum -= points[start].value;
            start += 1;
        }
        let count = (end - start + 1) as f64;
        out.push(TrendPoint {
            timestamp: point.timestamp,
            value: sum / count,
        });
    }
    out
}

fn kalman(points: &[TrendPoint]) -> Vec<TrendPoint> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let mut estimate = first.value;
    let mut error = 1.0;

    points
        .iter()
        .map(|p| {
            error += KALMAN_PROCESS_NOISE;
            let gain = error / (error + KALMAN_MEASUREMENT_NOISE);
            estimate += gain * (p.value - estimate);
            error *= 1.0 - gain;
            TrendPoint {
                timestamp: p.timestamp,
                value: estimate,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(minutes: i64, value: f64) -> Reading {
        Reading {
            asset_id: "BR-P3".to_string(),
            sensor_id: "DISP-P3-02".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
                + Duration::minutes(minutes),
            value,
        }
    }

    fn values(points: &[TrendPoint]) -> Vec<f64> {
        points.iter().map(|p| p.value).collect()
    }

    #[test]
    fn raw_series_is_sorted_by_timestamp() {
        let readings = vec![at(3, 3.0), at(1, 1.0), at(2, 2.0)];
        let series = trend_series(&readings, "BR-P3", "DISP-P3-02", FilterMode::Raw);
        assert_eq!(values(&series), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn series_excludes_other_sensors() {
        let mut other = at(1, 50.0);
        other.sensor_id = "ACC-P3-01".to_string();
        let readings = vec![at(0, 1.0), other];
        let series = trend_series(&readings, "BR-P3", "DISP-P3-02", FilterMode::Raw);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        for filter in [FilterMode::Raw, FilterMode::MovingAvg5m, FilterMode::Kalman] {
            assert!(trend_series(&[], "BR-P3", "DISP-P3-02", filter).is_empty());
        }
    }

    #[test]
    fn moving_average_uses_trailing_five_minutes() {
        // Points at 0, 2, 4, 6 minutes; the window at t=6 covers (1, 6].
        let readings = vec![at(0, 2.0), at(2, 4.0), at(4, 6.0), at(6, 8.0)];
        let series = trend_series(&readings, "BR-P3", "DISP-P3-02", FilterMode::MovingAvg5m);
        assert_eq!(values(&series), vec![2.0, 3.0, 4.0, 6.0]);
    }

    #[test]
    fn moving_average_excludes_point_exactly_window_old() {
        let readings = vec![at(0, 10.0), at(5, 20.0)];
        let series = trend_series(&readings, "BR-P3", "DISP-P3-02", FilterMode::MovingAvg5m);
        assert_eq!(values(&series), vec![10.0, 20.0]);
    }

    #[test]
    fn kalman_starts_at_first_value_and_damps_spikes() {
        let readings = vec![at(0, 5.0), at(1, 5.0), at(2, 15.0), at(3, 5.0)];
        let series = trend_series(&readings, "BR-P3", "DISP-P3-02", FilterMode::Kalman);
        assert_eq!(series[0].value, 5.0);
        assert!(series[2].value > 5.0 && series[2].value < 15.0);
    }

    #[test]
    fn kalman_converges_on_constant_signal() {
        let readings: Vec<Reading> = (0..20).map(|m| at(m, 7.0)).collect();
        let series = trend_series(&readings, "BR-P3", "DISP-P3-02", FilterMode::Kalman);
        assert!(series.iter().all(|p| (p.value - 7.0).abs() < 1e-12));
    }
}
