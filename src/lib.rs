//! # schedule-kit
//!
//! Appointment scheduling for a small HVAC service business, stored as a
//! single JSON document.
//!
//! ## Features
//!
//! - **Whole-document store:** every operation reads the full schedule; every
//!   mutation rewrites it atomically
//! - **Swappable storage:** anything implementing [`ScheduleRepository`]
//! - **Filtered listing:** by start-time range and customer
//! - **Serialized writers:** clones of a [`ScheduleService`] share one write lock
//! - **REST surface:** optional axum router (feature `http`, on by default)
//!
//! ## Quick Start
//!
//! ```ignore
//! use schedule_kit::{
//!     AppointmentFilter, NewAppointment, ScheduleService,
//!     repository::JsonFileRepository,
//! };
//!
//! let service = ScheduleService::new(JsonFileRepository::new("data/schedule.json"));
//!
//! let appt = service
//!     .create(
//!         NewAppointment::new()
//!             .title("Furnace inspection")
//!             .customer("c1", "Dana Reyes")
//!             .start_time("2025-03-01T10:00:00Z"),
//!     )
//!     .await?;
//!
//! // endTime defaults to one hour after startTime
//! assert_eq!(appt.end_time, "2025-03-01T11:00:00Z");
//!
//! let march = service
//!     .list(
//!         &AppointmentFilter::new()
//!             .start_date("2025-03-01")
//!             .end_date("2025-04-01"),
//!     )
//!     .await?;
//! ```

#[macro_use]
extern crate log;

pub mod appointment;
pub mod config;
pub mod error;
pub mod filter;
#[cfg(feature = "http")]
pub mod http;
pub mod observability;
pub mod repository;
pub mod service;
pub mod timestamp;

// Re-exports for convenience
pub use appointment::{Appointment, AppointmentPatch, Deletion, NewAppointment, ScheduleDocument};
pub use config::ScheduleConfig;
pub use error::{Error, Result};
pub use filter::AppointmentFilter;
pub use repository::ScheduleRepository;
pub use service::ScheduleService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
