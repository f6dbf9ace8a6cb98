use std::fmt;

use derive_more::{Deref, Display, Into};
use strum::IntoEnumIterator;

/// A quantity that can be tracked for an exercise.
///
/// The declaration order defines the precedence used to pick the primary
/// metric of an exercise.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    strum::AsRefStr,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Metric {
    Reps,
    Weight,
    Time,
}

/// Non-empty, duplicate-free list of metrics in input order.
#[derive(Deref, Debug, Clone, PartialEq, Eq)]
pub struct MetricSet(Vec<Metric>);

impl MetricSet {
    pub fn new(metrics: impl IntoIterator<Item = Metric>) -> Result<Self, MetricSetError> {
        let mut result = Vec::new();

        for metric in metrics {
            if !result.contains(&metric) {
                result.push(metric);
            }
        }

        if result.is_empty() {
            return Err(MetricSetError::Empty);
        }

        Ok(Self(result))
    }

    /// The metric used for single-number summaries (reps before weight before time).
    #[must_use]
    pub fn primary(&self) -> Metric {
        Metric::iter()
            .find(|metric| self.0.contains(metric))
            .unwrap_or(Metric::Reps)
    }

    /// Metrics of `self` which are not part of `previous`.
    #[must_use]
    pub fn added_since(&self, previous: &MetricSet) -> Vec<Metric> {
        self.0
            .iter()
            .filter(|metric| !previous.contains(*metric))
            .copied()
            .collect()
    }
}

impl Default for MetricSet {
    fn default() -> Self {
        Self(vec![Metric::Reps])
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names = self.0.iter().map(Metric::as_ref).collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricSetError {
    #[error("Please select at least one metric to track")]
    Empty,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Reps(pub(crate) f32);

impl Reps {
    pub fn new(value: f32) -> Result<Self, RepsError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(RepsError::NotPositive);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.replace(',', ".").trim().parse::<f32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RepsError {
    #[error("Reps must be a positive number")]
    NotPositive,
    #[error("Reps must be a number")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(pub(crate) f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(WeightError::NotPositive);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.replace(',', ".").trim().parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WeightError {
    #[error("Weight must be a positive number")]
    NotPositive,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// Duration in whole seconds, displayed as `m:ss`.
#[derive(Debug, Default, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time(pub(crate) u32);

impl Time {
    #[must_use]
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    #[must_use]
    pub fn seconds(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Accepts `m:ss` or a bare number of seconds.
impl TryFrom<&str> for Time {
    type Error = TimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();

        if value.contains(':') {
            let parts = value.split(':').collect::<Vec<_>>();
            let [minutes, seconds] = parts.as_slice() else {
                return Err(TimeError::Format);
            };
            let minutes = parse_digits(minutes)?;
            let seconds = parse_digits(seconds)?;
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .map(Self)
                .ok_or(TimeError::Format)
        } else {
            parse_digits(value).map(Self)
        }
    }
}

fn parse_digits(value: &str) -> Result<u32, TimeError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::Format);
    }
    value.parse::<u32>().map_err(|_| TimeError::Format)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Time must be given as m:ss or in seconds")]
    Format,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                WeightUnit::Lbs => "lbs",
                WeightUnit::Kg => "kg",
            }
        )
    }
}

/// A single recorded value of one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Reps(Reps),
    Weight(Weight),
    Time(Time),
}

impl MetricValue {
    #[must_use]
    pub fn metric(self) -> Metric {
        match self {
            MetricValue::Reps(_) => Metric::Reps,
            MetricValue::Weight(_) => Metric::Weight,
            MetricValue::Time(_) => Metric::Time,
        }
    }

    /// Numeric value used for arithmetic, times are given in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f32(self) -> f32 {
        match self {
            MetricValue::Reps(reps) => reps.0,
            MetricValue::Weight(weight) => weight.0,
            MetricValue::Time(time) => time.0 as f32,
        }
    }

    #[must_use]
    pub fn label(self, unit: WeightUnit) -> String {
        match self {
            MetricValue::Reps(reps) => format!("{reps} reps"),
            MetricValue::Weight(weight) => format!("{weight} {unit}"),
            MetricValue::Time(time) => time.to_string(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetricValue::Reps(reps) => write!(f, "{reps}"),
            MetricValue::Weight(weight) => write!(f, "{weight}"),
            MetricValue::Time(time) => write!(f, "{time}"),
        }
    }
}
