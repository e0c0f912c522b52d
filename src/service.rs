//! Scheduling service: CRUD and filtered listing over the schedule document.
//!
//! Every operation loads the whole document from the repository. Mutations
//! then rewrite it in full. Within one service (and its clones) mutations are
//! serialized, so concurrent creates and updates never lose each other's
//! changes. Separate processes sharing a store file are not coordinated.

use crate::appointment::{
    Appointment, AppointmentPatch, Deletion, NewAppointment, ScheduleDocument,
};
use crate::error::{Error, Result};
use crate::filter::AppointmentFilter;
use crate::observability::{NoOpMetrics, ScheduleMetrics};
use crate::repository::ScheduleRepository;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Source of "now" for `createdAt` / `updatedAt` and create defaults.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// High-level scheduling service.
///
/// Wraps the repository in `Arc`, so clones are cheap and share the same
/// store and write lock.
///
/// # Example
///
/// ```ignore
/// use schedule_kit::{AppointmentFilter, NewAppointment, ScheduleService};
/// use schedule_kit::repository::JsonFileRepository;
///
/// let service = ScheduleService::new(JsonFileRepository::new("data/schedule.json"));
///
/// let appt = service
///     .create(NewAppointment::new().customer_id("c1").start_time("2025-03-01T10:00:00Z"))
///     .await?;
/// assert_eq!(appt.end_time, "2025-03-01T11:00:00Z");
///
/// let mine = service.list(&AppointmentFilter::new().customer_id("c1")).await?;
/// ```
pub struct ScheduleService<R: ScheduleRepository> {
    repository: Arc<R>,
    write_lock: Arc<Mutex<()>>,
    metrics: Arc<dyn ScheduleMetrics>,
    clock: Clock,
}

impl<R: ScheduleRepository> Clone for ScheduleService<R> {
    fn clone(&self) -> Self {
        ScheduleService {
            repository: Arc::clone(&self.repository),
            write_lock: Arc::clone(&self.write_lock),
            metrics: Arc::clone(&self.metrics),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: ScheduleRepository> ScheduleService<R> {
    /// Create a new service over the given repository.
    pub fn new(repository: R) -> Self {
        ScheduleService {
            repository: Arc::new(repository),
            write_lock: Arc::new(Mutex::new(())),
            metrics: Arc::new(NoOpMetrics),
            clock: Arc::new(Utc::now),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Arc<dyn ScheduleMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the clock used for timestamps.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Get a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// List appointments in store order, keeping those that match `filter`.
    ///
    /// # Errors
    ///
    /// - `Error::StoreCorrupt`: the document cannot be parsed
    /// - `Error::StoreRead`: the document cannot be read
    pub async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let document = self.load("list").await?;
        Ok(filter.apply(document.appointments))
    }

    /// Fetch one appointment by id.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` when no record has this id, plus the read errors of
    /// [`list`](Self::list).
    pub async fn get(&self, id: &str) -> Result<Appointment> {
        let document = self.load("get").await?;
        match document.find(id) {
            Some(appointment) => Ok(appointment.clone()),
            None => Err(self.not_found("get", id)),
        }
    }

    /// Create an appointment, filling defaults and assigning a fresh id.
    ///
    /// # Errors
    ///
    /// Read errors, or `Error::StoreWrite` if the new document is not
    /// persisted (the appointment then does not exist).
    pub async fn create(&self, input: NewAppointment) -> Result<Appointment> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load("create").await?;

        let id = fresh_id(&document);
        let appointment = Appointment::create(id, input, self.now());
        document.appointments.push(appointment.clone());

        self.store("create", &document).await?;
        info!(
            "Created appointment {} for customer {}",
            appointment.id,
            appointment.customer_id().unwrap_or("-")
        );
        Ok(appointment)
    }

    /// Merge `patch` over an existing appointment ("non-empty value wins").
    ///
    /// # Errors
    ///
    /// `Error::NotFound` when no record has this id, plus read and write
    /// errors.
    pub async fn update(&self, id: &str, patch: AppointmentPatch) -> Result<Appointment> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load("update").await?;

        let Some(index) = document.position(id) else {
            return Err(self.not_found("update", id));
        };

        let now = self.now();
        let appointment = &mut document.appointments[index];
        appointment.apply(patch, now);
        let updated = appointment.clone();

        self.store("update", &document).await?;
        info!("Updated appointment {}", id);
        Ok(updated)
    }

    /// Remove an appointment.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` when no record has this id (the store is not
    /// rewritten), plus read and write errors.
    pub async fn delete(&self, id: &str) -> Result<Deletion> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load("delete").await?;

        let Some(index) = document.position(id) else {
            return Err(self.not_found("delete", id));
        };
        document.appointments.remove(index);

        self.store("delete", &document).await?;
        info!("Deleted appointment {}", id);
        Ok(Deletion::for_id(id))
    }

    /// Appointments starting at or after `now`, earliest first.
    ///
    /// Records whose start time does not parse are skipped. Ties keep store
    /// order.
    pub async fn upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Appointment>> {
        let document = self.load("upcoming").await?;
        let mut upcoming: Vec<(DateTime<Utc>, Appointment)> = document
            .appointments
            .into_iter()
            .filter_map(|a| a.start_instant().map(|start| (start, a)))
            .filter(|(start, _)| *start >= now)
            .collect();
        upcoming.sort_by_key(|(start, _)| *start);
        Ok(upcoming.into_iter().map(|(_, a)| a).collect())
    }

    /// Appointments starting on the given UTC calendar day, in store order.
    pub async fn on_day(&self, day: NaiveDate) -> Result<Vec<Appointment>> {
        let document = self.load("on_day").await?;
        Ok(document
            .appointments
            .into_iter()
            .filter(|a| a.start_instant().is_some_and(|s| s.date_naive() == day))
            .collect())
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn not_found(&self, operation: &str, id: &str) -> Error {
        self.metrics.record_not_found(operation, id);
        Error::NotFound(id.to_string())
    }

    async fn load(&self, operation: &str) -> Result<ScheduleDocument> {
        let start = Instant::now();
        match self.repository.read().await {
            Ok(document) => {
                self.metrics.record_read(operation, start.elapsed());
                Ok(document)
            }
            Err(e) => {
                self.metrics.record_error(operation, &e.to_string());
                Err(e)
            }
        }
    }

    async fn store(&self, operation: &str, document: &ScheduleDocument) -> Result<()> {
        let start = Instant::now();
        match self.repository.write(document).await {
            Ok(()) => {
                self.metrics.record_write(operation, start.elapsed());
                Ok(())
            }
            Err(e) => {
                self.metrics.record_error(operation, &e.to_string());
                Err(e)
            }
        }
    }
}

fn fresh_id(document: &ScheduleDocument) -> String {
    loop {
        let id = Uuid::now_v7().to_string();
        if document.find(&id).is_none() {
            return id;
        }
    }
}
