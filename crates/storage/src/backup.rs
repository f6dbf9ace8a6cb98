use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use repbook_domain::{self as domain, Backup, ImportError};

use crate::schema;

pub const VERSION: &str = "2.0";

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct File {
    exercises: Vec<schema::Exercise>,
    workout_data: schema::WorkoutData,
    export_date: String,
    version: &'static str,
}

/// Exported file as read back.
///
/// Exercises and workouts are decoded entry by entry, so that invalid entries
/// are skipped instead of rejecting the whole file.
#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ImportedFile {
    exercises: serde_json::Value,
    workout_data: serde_json::Value,
    #[serde(default)]
    export_date: Option<serde_json::Value>,
    #[serde(default)]
    version: Option<serde_json::Value>,
}

/// Serialize all exercises and workouts as pretty-printed JSON.
pub fn export(
    catalog: &domain::Catalog,
    ledger: &domain::Ledger,
    date: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&File {
        exercises: catalog
            .exercises()
            .iter()
            .map(schema::Exercise::from)
            .collect(),
        workout_data: schema::workout_data(ledger),
        export_date: date.to_rfc3339_opts(SecondsFormat::Millis, true),
        version: VERSION,
    })
}

#[must_use]
pub fn file_name(date: NaiveDate) -> String {
    format!("workout-data-{}.json", date.format("%Y-%m-%d"))
}

/// Parse the content of an exported file.
///
/// Files of all versions are accepted as long as they contain exercises and
/// workout data.
pub fn parse(text: &str) -> Result<Backup, ImportError> {
    let invalid_format = |err: serde_json::Error| ImportError::InvalidFormat(err.to_string());
    let value: serde_json::Value = serde_json::from_str(text).map_err(invalid_format)?;
    if !value.is_object() {
        return Err(ImportError::InvalidFormat("not an object".to_string()));
    }
    let file: ImportedFile = serde_json::from_value(value).map_err(invalid_format)?;
    let string = |value: Option<serde_json::Value>| {
        value.and_then(|value| value.as_str().map(str::to_string))
    };

    Ok(Backup {
        exercises: schema::exercises(file.exercises)
            .ok_or_else(|| ImportError::InvalidFormat("exercises is not a list".to_string()))?,
        workouts: schema::records(file.workout_data),
        export_date: string(file.export_date),
        version: string(file.version),
    })
}
