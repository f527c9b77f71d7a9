//! Normalized routine model. Everything the renderer sees has gone through
//! [`SearchResults::from_response`], so optional fields are either present
//! and meaningful or `None`, and contraindications always have one shape.

use serde_json::Value;
use tracing::warn;

use crate::{
    error::RecordError,
    protocol::{
        ContraindicationsPayload, ExerciseItemPayload, Quantity, RoutinePayload, SearchResponse,
        SectionPayload,
    },
};

pub const OBJECTIVES: &[&str] = &["fuerza", "hipertrofia", "resistencia", "movilidad", "salud"];
pub const PATHOLOGIES: &[&str] = &["hombro", "lumbar", "rodilla"];
pub const LEVELS: &[&str] = &["principiante", "medio", "avanzado"];

pub const DEFAULT_LEVEL: &str = "medio";
/// Objective the service uses for plans composed from several objectives.
pub const MIXED_OBJECTIVE: &str = "mixto";

pub const MIN_SESSION_MINUTES: u32 = 10;
pub const MAX_SESSION_MINUTES: u32 = 180;
pub const DEFAULT_SESSION_MINUTES: u32 = 45;

pub const WARMUP_SECTION: &str = "warmup";
pub const MAIN_SECTION: &str = "main";
pub const COOLDOWN_SECTION: &str = "cooldown";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub routines: Vec<Routine>,
}

impl SearchResults {
    pub fn from_response(response: SearchResponse) -> Self {
        if response.ok == Some(false) {
            warn!("search service answered with ok=false on a success status");
        }

        let routines = response
            .results
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(position, raw)| {
                match serde_json::from_value::<RoutinePayload>(raw) {
                    Ok(payload) => Some(Routine::from_payload(payload)),
                    Err(err) => {
                        warn!(position, error = %err, "skipping malformed routine record");
                        None
                    }
                }
            })
            .collect();

        Self { routines }
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Routine {
    pub routine_id: Option<i64>,
    pub name: String,
    pub objective: String,
    pub minutes_target: Option<Quantity>,
    pub level: Option<String>,
    pub sections: Vec<Section>,
}

impl Routine {
    pub fn from_payload(payload: RoutinePayload) -> Self {
        let sections = payload
            .sections
            .unwrap_or_default()
            .into_iter()
            .map(|(key, raw)| Section::from_value(key, raw))
            .collect();

        Self {
            routine_id: payload.routine_id,
            name: payload.name.unwrap_or_default(),
            objective: payload.objective.unwrap_or_default(),
            minutes_target: payload.minutes_target.filter(Quantity::is_duration),
            level: non_blank(payload.level),
            sections,
        }
    }

    pub fn is_mixed(&self) -> bool {
        self.objective == MIXED_OBJECTIVE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub key: String,
    pub minutes: Option<Quantity>,
    pub entries: Vec<SectionEntry>,
}

impl Section {
    pub fn from_value(key: String, raw: Value) -> Self {
        let payload = match serde_json::from_value::<SectionPayload>(raw) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(section = %key, error = %err, "section record is malformed; rendering it empty");
                SectionPayload::default()
            }
        };

        let entries = payload
            .items
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(position, raw)| match ExerciseItem::from_value(raw) {
                Ok(item) => SectionEntry::Exercise(item),
                Err(err) => {
                    warn!(section = %key, position, error = %err, "unreadable exercise item");
                    SectionEntry::Malformed {
                        position,
                        reason: err.to_string(),
                    }
                }
            })
            .collect();

        Self {
            key,
            minutes: payload.minutes.filter(Quantity::is_duration),
            entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionEntry {
    Exercise(ExerciseItem),
    Malformed { position: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseItem {
    pub exercise_id: Option<i64>,
    pub name: String,
    pub pattern: Option<String>,
    pub sets: Option<Quantity>,
    pub reps: Option<Quantity>,
    pub minutes: Option<Quantity>,
    pub rest: Option<String>,
    pub intensity: Option<String>,
    pub notes: Option<String>,
    pub contraindications: Contraindications,
    pub is_fallback: bool,
}

impl ExerciseItem {
    pub fn from_value(raw: Value) -> Result<Self, RecordError> {
        let payload = serde_json::from_value::<ExerciseItemPayload>(raw)
            .map_err(|err| RecordError::malformed("exercise item", err))?;
        Self::try_from(payload)
    }
}

impl TryFrom<ExerciseItemPayload> for ExerciseItem {
    type Error = RecordError;

    fn try_from(payload: ExerciseItemPayload) -> Result<Self, Self::Error> {
        let name = non_blank(payload.name).ok_or(RecordError::MissingName)?;

        Ok(Self {
            exercise_id: payload.exercise_id,
            name,
            pattern: non_blank(payload.pattern),
            sets: payload.sets.filter(Quantity::is_present),
            reps: payload.reps.filter(Quantity::is_present),
            minutes: payload.minutes.filter(Quantity::is_present),
            rest: non_blank(payload.rest),
            intensity: non_blank(payload.intensity),
            notes: non_blank(payload.notes),
            contraindications: payload.contraindications.into(),
            is_fallback: payload.is_fallback.unwrap_or(false),
        })
    }
}

/// Ordered, trimmed, non-empty contraindication tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contraindications(Vec<String>);

impl Contraindications {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Option<ContraindicationsPayload>> for Contraindications {
    fn from(value: Option<ContraindicationsPayload>) -> Self {
        let tags = match value {
            None => Vec::new(),
            Some(ContraindicationsPayload::One(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    Vec::new()
                } else {
                    vec![text.to_string()]
                }
            }
            Some(ContraindicationsPayload::Many(list)) => list
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
        };
        Self(tags)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
