use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{MAX_SESSION_MINUTES, MIN_SESSION_MINUTES},
    error::RequestError,
};

/// Body of `POST /api/search`.
///
/// `q` is always serialized, as `null` when there is no query, so the
/// service can tell "no query" apart from an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub objectives: Vec<String>,
    pub session_minutes: Option<u32>,
    #[serde(default)]
    pub pathologies: Vec<String>,
    pub level: String,
    pub q: Option<String>,
}

impl SearchRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        let Some(minutes) = self.session_minutes else {
            return Err(RequestError::InvalidSessionMinutes);
        };
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&minutes) {
            return Err(RequestError::SessionMinutesOutOfRange {
                minutes,
                min: MIN_SESSION_MINUTES,
                max: MAX_SESSION_MINUTES,
            });
        }
        Ok(())
    }
}

/// Successful search body. Routine records stay as raw JSON until
/// normalization so one bad record cannot fail the whole response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutinePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub minutes_target: Option<Quantity>,
    /// Keyed by section id, in the order the service declared them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionPayload {
    #[serde(
        default,
        deserialize_with = "lenient_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub minutes: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseItemPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contraindications: Option<ContraindicationsPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fallback: Option<bool>,
}

/// Numeric-ish field. The service sends sets and minutes as numbers but reps
/// as text ranges such as `"8-10"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Whole(i64),
    Decimal(f64),
    Text(String),
}

impl Quantity {
    /// Zero, NaN and blank text count as "not given".
    pub fn is_present(&self) -> bool {
        match self {
            Quantity::Whole(value) => *value != 0,
            Quantity::Decimal(value) => *value != 0.0 && !value.is_nan(),
            Quantity::Text(text) => !text.trim().is_empty(),
        }
    }

    /// A positive finite number of minutes; text never qualifies.
    pub fn is_duration(&self) -> bool {
        match self {
            Quantity::Whole(value) => *value > 0,
            Quantity::Decimal(value) => value.is_finite() && *value > 0.0,
            Quantity::Text(_) => false,
        }
    }
}

/// Any value that is not a quantity reads as absent instead of failing the
/// enclosing record.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<Quantity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Whole(value) => write!(f, "{value}"),
            Quantity::Decimal(value) => write!(f, "{value}"),
            Quantity::Text(text) => f.write_str(text),
        }
    }
}

/// Contraindications arrive either as one free-text string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContraindicationsPayload {
    One(String),
    Many(Vec<String>),
}

/// Error body returned by the service on non-success statuses. FastAPI puts a
/// string in `detail` for handled errors and a list for request validation
/// failures, so the raw value is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ApiErrorBody {
    pub fn detail_message(&self) -> Option<&str> {
        match &self.detail {
            Some(Value::String(detail)) if !detail.trim().is_empty() => Some(detail.as_str()),
            _ => None,
        }
    }
}
