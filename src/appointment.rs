//! Appointment records and the schedule document that holds them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::timestamp::{format_derived, format_instant, parse_instant};

/// Title given to appointments created without one.
pub const DEFAULT_TITLE: &str = "Untitled Appointment";

/// Status given to appointments created without one.
pub const DEFAULT_STATUS: &str = "CONFIRMED";

/// A scheduled service visit.
///
/// Field names serialize in camelCase to match the stored document. Fields
/// this crate does not know about are kept in `extra` so a read/write cycle
/// never drops data.
///
/// `customer_id` tells an absent key (`None`) apart from an explicit
/// `null` (`Some(None)`); use [`Appointment::customer_id`] for the value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer_id: Option<Option<String>>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Appointment {
    /// Build a new record from caller input, applying every field default.
    ///
    /// `endTime` defaults to one hour after `startTime`. When `startTime`
    /// cannot be parsed the hour is counted from `now` instead.
    pub fn create(id: String, input: NewAppointment, now: DateTime<Utc>) -> Self {
        let start_time = non_empty(input.start_time).unwrap_or_else(|| format_instant(now));
        let end_time = non_empty(input.end_time).unwrap_or_else(|| {
            let base = parse_instant(&start_time).unwrap_or(now);
            format_derived(base + Duration::hours(1))
        });

        Appointment {
            id,
            title: non_empty(input.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: input.description.unwrap_or_default(),
            customer_id: input.customer_id,
            customer_name: input.customer_name.unwrap_or_default(),
            start_time,
            end_time,
            location: input.location.unwrap_or_default(),
            status: non_empty(input.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            created_at: format_instant(now),
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// Merge a patch over this record and stamp `updatedAt`.
    ///
    /// A patch field replaces the current value only when it is present and
    /// non-empty; empty strings and absent fields leave the value untouched.
    pub fn apply(&mut self, patch: AppointmentPatch, now: DateTime<Utc>) {
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
        if let Some(customer_id) = non_empty(patch.customer_id.flatten()) {
            self.customer_id = Some(Some(customer_id));
        }
        merge(&mut self.customer_name, patch.customer_name);
        merge(&mut self.start_time, patch.start_time);
        merge(&mut self.end_time, patch.end_time);
        merge(&mut self.location, patch.location);
        merge(&mut self.status, patch.status);
        self.updated_at = Some(format_instant(now));
    }

    /// Customer id, if one is set and not `null`.
    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_ref().and_then(|id| id.as_deref())
    }

    /// Parsed `startTime`, if it is a recognizable timestamp.
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.start_time)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Deserialize a field that was present in the input, keeping `null` as
/// `Some(None)`. Absent fields fall back to `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn merge(field: &mut String, value: Option<String>) {
    if let Some(value) = non_empty(value) {
        *field = value;
    }
}

/// Input for creating an appointment. Every field is optional.
///
/// An explicit `"customerId": null` is stored as `null`; an absent one is
/// left out of the record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewAppointment {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Option<String>>,
    pub customer_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

impl NewAppointment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn customer(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.customer_id = Some(Some(id.into()));
        self.customer_name = Some(name.into());
        self
    }

    pub fn customer_id(mut self, id: impl Into<String>) -> Self {
        self.customer_id = Some(Some(id.into()));
        self
    }

    pub fn start_time(mut self, start: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self
    }

    pub fn end_time(mut self, end: impl Into<String>) -> Self {
        self.end_time = Some(end.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Partial update for an existing appointment.
///
/// Same shape as [`NewAppointment`]; `id` and `createdAt` cannot be patched.
pub type AppointmentPatch = NewAppointment;

/// The persisted container: every appointment in insertion order.
///
/// Top-level keys other than `appointments` are carried in `extra` and
/// written back unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.appointments.iter().position(|a| a.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

/// Confirmation returned by a successful delete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    pub success: bool,
    pub message: String,
}

impl Deletion {
    pub fn for_id(id: &str) -> Self {
        Deletion {
            success: true,
            message: format!("Appointment {} deleted successfully", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 20, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_create_applies_defaults() {
        let input = NewAppointment::new()
            .customer_id("c1")
            .start_time("2025-03-01T10:00:00Z");
        let appt = Appointment::create("a1".to_string(), input, fixed_now());

        assert_eq!(appt.title, DEFAULT_TITLE);
        assert_eq!(appt.description, "");
        assert_eq!(appt.customer_id(), Some("c1"));
        assert_eq!(appt.customer_name, "");
        assert_eq!(appt.end_time, "2025-03-01T11:00:00Z");
        assert_eq!(appt.location, "");
        assert_eq!(appt.status, DEFAULT_STATUS);
        assert_eq!(appt.created_at, "2025-02-20T08:30:00.000Z");
        assert!(appt.updated_at.is_none());
    }

    #[test]
    fn test_create_without_start_uses_now() {
        let appt = Appointment::create("a1".to_string(), NewAppointment::new(), fixed_now());
        assert_eq!(appt.start_time, "2025-02-20T08:30:00.000Z");
        assert_eq!(appt.end_time, "2025-02-20T09:30:00Z");
    }

    #[test]
    fn test_create_with_unparseable_start_keeps_string() {
        let input = NewAppointment::new().start_time("tomorrow morning");
        let appt = Appointment::create("a1".to_string(), input, fixed_now());
        assert_eq!(appt.start_time, "tomorrow morning");
        assert_eq!(appt.end_time, "2025-02-20T09:30:00Z");
    }

    #[test]
    fn test_create_keeps_explicit_end_even_if_before_start() {
        let input = NewAppointment::new()
            .start_time("2025-03-01T10:00:00Z")
            .end_time("2025-03-01T09:00:00Z");
        let appt = Appointment::create("a1".to_string(), input, fixed_now());
        assert_eq!(appt.end_time, "2025-03-01T09:00:00Z");
    }

    #[test]
    fn test_apply_truthy_wins() {
        let input = NewAppointment::new()
            .title("Furnace tune-up")
            .customer("c1", "Dana")
            .start_time("2025-03-01T10:00:00Z")
            .location("12 Elm St");
        let mut appt = Appointment::create("a1".to_string(), input, fixed_now());
        let before = appt.clone();

        let patch = AppointmentPatch {
            title: Some(String::new()),
            location: Some("14 Elm St".to_string()),
            customer_id: Some(Some(String::new())),
            ..Default::default()
        };
        let later = fixed_now() + Duration::minutes(5);
        appt.apply(patch, later);

        assert_eq!(appt.title, before.title);
        assert_eq!(appt.customer_id(), Some("c1"));
        assert_eq!(appt.location, "14 Elm St");
        assert_eq!(appt.created_at, before.created_at);
        assert_eq!(appt.updated_at.as_deref(), Some("2025-02-20T08:35:00.000Z"));
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let raw = r#"{
            "id": "a1",
            "title": "AC repair",
            "startTime": "2025-03-01T10:00:00Z",
            "technician": "Sam"
        }"#;
        let appt: Appointment = serde_json::from_str(raw).expect("should parse");
        assert_eq!(appt.extra.get("technician"), Some(&Value::from("Sam")));

        let out = serde_json::to_value(&appt).expect("should serialize");
        assert_eq!(out["technician"], "Sam");
        assert!(out.get("customerId").is_none());
        assert!(out.get("updatedAt").is_none());
    }

    #[test]
    fn test_null_customer_id_is_kept() {
        let raw = r#"{"id": "a1", "customerId": null}"#;
        let appt: Appointment = serde_json::from_str(raw).expect("should parse");
        assert_eq!(appt.customer_id, Some(None));
        assert_eq!(appt.customer_id(), None);

        let out = serde_json::to_value(&appt).expect("should serialize");
        assert_eq!(out.get("customerId"), Some(&Value::Null));
    }

    #[test]
    fn test_create_with_null_customer_id_stores_null() {
        let input: NewAppointment =
            serde_json::from_str(r#"{"title": "Walk-in", "customerId": null}"#)
                .expect("should parse");
        assert_eq!(input.customer_id, Some(None));

        let appt = Appointment::create("a1".to_string(), input, fixed_now());
        let out = serde_json::to_value(&appt).expect("should serialize");
        assert_eq!(out.get("customerId"), Some(&Value::Null));

        let absent = Appointment::create("a2".to_string(), NewAppointment::new(), fixed_now());
        let out = serde_json::to_value(&absent).expect("should serialize");
        assert!(out.get("customerId").is_none());
    }

    #[test]
    fn test_null_patch_keeps_customer_id() {
        let input = NewAppointment::new().customer_id("c1");
        let mut appt = Appointment::create("a1".to_string(), input, fixed_now());
        let patch: AppointmentPatch =
            serde_json::from_str(r#"{"customerId": null}"#).expect("should parse");
        appt.apply(patch, fixed_now());
        assert_eq!(appt.customer_id(), Some("c1"));
    }

    #[test]
    fn test_document_keeps_unknown_top_level_keys() {
        let raw = r#"{"appointments": [], "version": 3, "owner": {"name": "ops"}}"#;
        let doc: ScheduleDocument = serde_json::from_str(raw).expect("should parse");
        assert_eq!(doc.extra.get("version"), Some(&Value::from(3)));

        let before: Value = serde_json::from_str(raw).expect("should parse");
        let after = serde_json::to_value(&doc).expect("should serialize");
        assert_eq!(before, after);
    }

    #[test]
    fn test_document_missing_key_reads_empty() {
        let doc: ScheduleDocument = serde_json::from_str("{}").expect("should parse");
        assert!(doc.is_empty());
        let out = serde_json::to_string(&doc).expect("should serialize");
        assert_eq!(out, r#"{"appointments":[]}"#);
    }

    #[test]
    fn test_deletion_message() {
        let d = Deletion::for_id("a1");
        assert!(d.success);
        assert_eq!(d.message, "Appointment a1 deleted successfully");
    }
}
