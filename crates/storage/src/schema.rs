use std::{collections::BTreeMap, str::FromStr};

use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use repbook_domain as domain;
use serde::Serializer;

/// Exercise as persisted, either as bare name or with its tracked metrics.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Exercise {
    Legacy(String),
    Current { name: String, metrics: Vec<String> },
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Exercise::Current {
            name: value.name.to_string(),
            metrics: value
                .metrics
                .iter()
                .map(|metric| metric.as_ref().to_string())
                .collect(),
        }
    }
}

impl From<Exercise> for domain::RawExercise {
    fn from(value: Exercise) -> Self {
        match value {
            Exercise::Legacy(name) => domain::RawExercise::Legacy(name),
            Exercise::Current { name, metrics } => domain::RawExercise::Current {
                metrics: metrics
                    .iter()
                    .filter_map(|metric| {
                        domain::Metric::from_str(metric)
                            .inspect_err(|_| {
                                warn!("ignoring unknown metric \"{metric}\" of exercise \"{name}\"");
                            })
                            .ok()
                    })
                    .collect(),
                name,
            },
        }
    }
}

/// Convert persisted exercises, skipping entries of unknown shape.
///
/// Returns `None` if the value is not a list.
#[must_use]
pub fn exercises(value: serde_json::Value) -> Option<Vec<domain::RawExercise>> {
    let serde_json::Value::Array(entries) = value else {
        warn!("ignoring exercises of unexpected type: {value}");
        return None;
    };

    Some(
        entries
            .into_iter()
            .filter_map(|entry| {
                serde_json::from_value::<Exercise>(entry)
                    .inspect_err(|err| warn!("skipping exercise: {err}"))
                    .ok()
            })
            .map(domain::RawExercise::from)
            .collect(),
    )
}

/// Workout as persisted.
///
/// Records written by early versions do not contain the exercise.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_number"
    )]
    pub reps: Option<f32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_number"
    )]
    pub weight: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl From<&domain::WorkoutRecord> for Workout {
    fn from(value: &domain::WorkoutRecord) -> Self {
        Self {
            date: value.date.to_rfc3339_opts(SecondsFormat::Millis, true),
            exercise: Some(value.exercise.to_string()),
            reps: value.values.reps.map(f32::from),
            weight: value.values.weight.map(f32::from),
            time: value.values.time.map(|time| time.to_string()),
        }
    }
}

impl From<&domain::Workout> for Workout {
    fn from(value: &domain::Workout) -> Self {
        Self::from(&domain::WorkoutRecord::from(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum WorkoutError {
    #[error("not an object")]
    Format,
    #[error("invalid date \"{0}\"")]
    Date(String),
    #[error("no valid value")]
    NoValue,
}

/// Convert a persisted workout into a record of the exercise `bucket`.
///
/// Invalid values are dropped.
#[allow(clippy::cast_possible_truncation)]
pub fn record(
    value: &serde_json::Value,
    bucket: &domain::Name,
) -> Result<domain::WorkoutRecord, WorkoutError> {
    let Some(workout) = value.as_object() else {
        return Err(WorkoutError::Format);
    };
    let date = workout
        .get("date")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    let date = DateTime::parse_from_rfc3339(date)
        .map_err(|_| WorkoutError::Date(date.to_string()))?
        .with_timezone(&Utc);
    let number = |key: &str| workout.get(key).and_then(serde_json::Value::as_f64);
    let values = domain::WorkoutValues {
        reps: number("reps").and_then(|reps| domain::Reps::new(reps as f32).ok()),
        weight: number("weight").and_then(|weight| domain::Weight::new(weight as f32).ok()),
        time: workout
            .get("time")
            .and_then(serde_json::Value::as_str)
            .and_then(stored_time),
    };

    if values.is_empty() {
        return Err(WorkoutError::NoValue);
    }

    Ok(domain::WorkoutRecord {
        date,
        exercise: bucket.clone(),
        values,
    })
}

/// Read a stored time.
///
/// Early versions stored `m:ss` values with fractional or padded parts, which
/// were read by the integer prefix of each part.
fn stored_time(value: &str) -> Option<domain::Time> {
    let Some((minutes, rest)) = value.split_once(':') else {
        return domain::Time::try_from(value).ok();
    };
    let minutes = integer_prefix(minutes)?;
    let seconds = integer_prefix(rest.split(':').next().unwrap_or_default())?;
    let total = minutes.checked_mul(60)?.checked_add(seconds)?;
    u32::try_from(total).ok().map(domain::Time::from_seconds)
}

fn integer_prefix(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(digits) => (-1, digits),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

pub type WorkoutData = BTreeMap<String, Vec<Workout>>;

/// Convert persisted workouts into records grouped by exercise.
///
/// Buckets with invalid names and invalid records are skipped.
#[must_use]
pub fn records(data: serde_json::Value) -> BTreeMap<domain::Name, Vec<domain::WorkoutRecord>> {
    let mut result: BTreeMap<domain::Name, Vec<domain::WorkoutRecord>> = BTreeMap::new();

    let serde_json::Value::Object(buckets) = data else {
        warn!("ignoring workouts of unexpected type: {data}");
        return result;
    };

    for (name, workouts) in buckets {
        let bucket = match domain::Name::new(&name) {
            Ok(bucket) => bucket,
            Err(err) => {
                warn!("skipping workouts of \"{name}\": {err}");
                continue;
            }
        };
        let serde_json::Value::Array(workouts) = workouts else {
            warn!("skipping workouts of \"{bucket}\": not a list");
            continue;
        };
        let records = result.entry(bucket.clone()).or_default();
        for workout in &workouts {
            match record(workout, &bucket) {
                Ok(record) => records.push(record),
                Err(err) => warn!("skipping workout of \"{bucket}\": {err}"),
            }
        }
    }

    result
}

#[must_use]
pub fn workout_data(ledger: &domain::Ledger) -> WorkoutData {
    ledger
        .buckets()
        .map(|(name, workouts)| {
            (
                name.to_string(),
                workouts.iter().map(Workout::from).collect(),
            )
        })
        .collect()
}

/// Write whole numbers without fractional part.
#[allow(clippy::ref_option, clippy::float_cmp, clippy::cast_possible_truncation)]
fn serialize_number<S: Serializer>(value: &Option<f32>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) if value.fract() == 0.0 && value.abs() < 1e9 => {
            serializer.serialize_i64(*value as i64)
        }
        Some(value) => serializer.serialize_f64(value.to_string().parse().unwrap_or_default()),
        None => serializer.serialize_none(),
    }
}
