//! Search form state and request building.

use std::collections::BTreeMap;

use shared::{domain::DEFAULT_LEVEL, protocol::SearchRequest};

pub const OBJECTIVES_FIELD: &str = "objectives";
pub const PATHOLOGIES_FIELD: &str = "pathologies";
pub const LEVEL_FIELD: &str = "level";
pub const SESSION_MINUTES_FIELD: &str = "session_minutes";
pub const QUERY_FIELD: &str = "query";

/// Read access to raw form fields. Multi-valued fields return every value in
/// selection order; single-valued reads take the first one.
pub trait FormSource {
    fn values(&self, field: &str) -> Vec<String>;

    fn value(&self, field: &str) -> Option<String> {
        self.values(field).into_iter().next()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, field: &str, value: impl Into<String>) -> &mut Self {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(value.into());
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> &mut Self {
        self.fields.insert(field.to_string(), vec![value.into()]);
        self
    }
}

impl FormSource for FormSnapshot {
    fn values(&self, field: &str) -> Vec<String> {
        self.fields.get(field).cloned().unwrap_or_default()
    }
}

/// Never fails: unusable minutes become `None` and are caught by
/// [`SearchRequest::validate`].
pub fn build_request<F: FormSource + ?Sized>(form: &F) -> SearchRequest {
    let level = form
        .value(LEVEL_FIELD)
        .map(|level| level.trim().to_string())
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());

    let q = form
        .value(QUERY_FIELD)
        .map(|query| query.trim().to_string())
        .filter(|query| !query.is_empty());

    SearchRequest {
        objectives: form.values(OBJECTIVES_FIELD),
        session_minutes: form
            .value(SESSION_MINUTES_FIELD)
            .as_deref()
            .and_then(parse_minutes),
        pathologies: form.values(PATHOLOGIES_FIELD),
        level,
        q,
    }
}

fn parse_minutes(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|minutes| minutes.is_finite() && *minutes >= 0.0 && *minutes <= u32::MAX as f64)
        .map(|minutes| minutes.round() as u32)
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
