//! Listing filters over appointments.
//!
//! Bounds compare instants, not calendar days: an `end_date` of
//! `2025-03-01` means `2025-03-01T00:00:00Z`, so a 10:00 appointment on that
//! day falls outside it. A timestamp that fails to parse, on either side of a
//! comparison, never satisfies the bound.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;
use crate::timestamp::parse_instant;

/// Optional constraints for [`ScheduleService::list`](crate::ScheduleService::list).
///
/// All present constraints must hold. Empty strings count as absent, which
/// is how blank query parameters arrive from the HTTP layer.
///
/// Timestamps without an offset, on bounds and on records alike, are read as
/// UTC rather than host-local time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentFilter {
    /// Keep appointments starting at or after this instant.
    pub start_date: Option<String>,
    /// Keep appointments starting at or before this instant.
    pub end_date: Option<String>,
    /// Keep appointments for this customer only.
    pub customer_id: Option<String>,
}

impl AppointmentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, start: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self
    }

    pub fn end_date(mut self, end: impl Into<String>) -> Self {
        self.end_date = Some(end.into());
        self
    }

    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        active(&self.start_date).is_none()
            && active(&self.end_date).is_none()
            && active(&self.customer_id).is_none()
    }

    /// Check a single appointment against every constraint.
    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.compile().matches(appointment)
    }

    /// Keep the matching appointments, preserving their order.
    pub fn apply(&self, mut appointments: Vec<Appointment>) -> Vec<Appointment> {
        let compiled = self.compile();
        appointments.retain(|a| compiled.matches(a));
        appointments
    }

    fn compile(&self) -> CompiledFilter<'_> {
        CompiledFilter {
            start: active(&self.start_date).map(parse_instant),
            end: active(&self.end_date).map(parse_instant),
            customer_id: active(&self.customer_id),
        }
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Bounds parsed once per listing.
///
/// `Some(None)` is a bound that was given but does not parse; it rejects
/// everything.
struct CompiledFilter<'a> {
    start: Option<Option<DateTime<Utc>>>,
    end: Option<Option<DateTime<Utc>>>,
    customer_id: Option<&'a str>,
}

impl CompiledFilter<'_> {
    fn matches(&self, appointment: &Appointment) -> bool {
        if self.start.is_some() || self.end.is_some() {
            let Some(start_time) = appointment.start_instant() else {
                return false;
            };

            if let Some(bound) = self.start {
                if !bound.is_some_and(|b| start_time >= b) {
                    return false;
                }
            }

            if let Some(bound) = self.end {
                if !bound.is_some_and(|b| start_time <= b) {
                    return false;
                }
            }
        }

        match self.customer_id {
            Some(wanted) => appointment.customer_id() == Some(wanted),
            None => true,
        }
    }
}
