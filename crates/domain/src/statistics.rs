use crate::{Metric, MetricSet, MetricValue, Reps, Time, Weight, WeightUnit, Workout};

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub metric: Metric,
    pub personal_best: Option<MetricValue>,
    pub progress: f32,
    pub average: Option<MetricValue>,
    pub workouts: usize,
}

/// Summarize the workouts of an exercise based on its primary metric.
///
/// Returns `None` if there are no workouts.
#[must_use]
pub fn summary(workouts: &[Workout], metrics: &MetricSet) -> Option<Summary> {
    if workouts.is_empty() {
        return None;
    }

    let metric = primary_metric(metrics);

    Some(Summary {
        metric,
        personal_best: personal_best(workouts, metric),
        progress: net_progress(workouts, metric),
        average: average(workouts, metric),
        workouts: workouts.len(),
    })
}

#[must_use]
pub fn primary_metric(metrics: &MetricSet) -> Metric {
    metrics.primary()
}

/// All values of the most recently stored workout.
#[must_use]
pub fn last_value(workouts: &[Workout], unit: WeightUnit) -> String {
    workouts
        .last()
        .map(|w| w.values.label(unit))
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| "0".to_string())
}

/// Mean of all recorded values of a metric.
///
/// Reps and times are rounded to integers, weights to one decimal.
#[must_use]
pub fn average(workouts: &[Workout], metric: Metric) -> Option<MetricValue> {
    let values = values(workouts, metric).collect::<Vec<_>>();

    if values.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = values.iter().sum::<f32>() / values.len() as f32;

    Some(from_f32(metric, mean))
}

/// Highest recorded value of a metric, the longest duration for times.
#[must_use]
pub fn personal_best(workouts: &[Workout], metric: Metric) -> Option<MetricValue> {
    workouts
        .iter()
        .filter_map(|w| w.values.get(metric))
        .max_by(|a, b| a.as_f32().total_cmp(&b.as_f32()))
}

/// Difference between the last and the first recorded value in storage order.
///
/// Times are compared in seconds.
#[must_use]
pub fn net_progress(workouts: &[Workout], metric: Metric) -> f32 {
    let mut values = values(workouts, metric);
    let Some(first) = values.next() else {
        return 0.0;
    };
    let Some(last) = values.last() else {
        return 0.0;
    };
    let delta = last - first;

    match metric {
        Metric::Weight => round_to_tenth(delta),
        Metric::Reps | Metric::Time => delta,
    }
}

/// Series of (index, value) pairs of a metric in storage order.
///
/// Times are given in seconds.
pub fn chart_series(workouts: &[Workout], metric: Metric) -> impl Iterator<Item = (usize, f32)> {
    values(workouts, metric).enumerate()
}

/// The most recently stored workouts, newest first.
pub fn recent(workouts: &[Workout], count: usize) -> impl Iterator<Item = &Workout> {
    workouts.iter().rev().take(count)
}

#[must_use]
pub fn format_progress(metric: Metric, delta: f32, unit: WeightUnit) -> String {
    let sign = if delta > 0.0 { "+" } else { "" };
    let label = match metric {
        Metric::Reps => "reps".to_string(),
        Metric::Weight => unit.to_string(),
        Metric::Time => "sec".to_string(),
    };
    format!("{sign}{delta} {label}")
}

fn values(workouts: &[Workout], metric: Metric) -> impl Iterator<Item = f32> {
    workouts
        .iter()
        .filter_map(move |w| w.values.get(metric))
        .map(MetricValue::as_f32)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn from_f32(metric: Metric, value: f32) -> MetricValue {
    match metric {
        Metric::Reps => MetricValue::Reps(Reps(value.round())),
        Metric::Weight => MetricValue::Weight(Weight(round_to_tenth(value))),
        Metric::Time => MetricValue::Time(Time(value.round() as u32)),
    }
}

fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
