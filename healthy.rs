//! healthy - Animated backgrounds and demo schedule data for the Healthy
//! appointment booking front-end
//! No heap allocation, no_std compatible

#![no_std]

#[cfg(test)]
extern crate std;

pub mod directory;
pub mod error;
pub mod field;
pub mod hexagon;
#[cfg(feature = "embedded-graphics")]
pub mod render;
pub mod role;
pub mod schedule;
pub mod view;

pub use error::{Error, Result};
pub use field::{Edge, FieldKind, FieldSettings, Particle, ParticleField, Viewport, MAX_PARTICLES};
pub use role::{Role, RoleContext, RoleStore, Theme};
pub use schedule::{
    AppointmentRecord, AppointmentStatus, AvailabilitySlot, ScheduleGenerator, ScheduleSettings,
};
pub use view::{BackgroundView, Host};
