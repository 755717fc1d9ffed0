//! error - Failures surfaced by the schedule generators

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The generated batch did not fit in the fixed-capacity output buffer.
    #[error("generated batch exceeds capacity of {capacity} records")]
    CapacityExceeded { capacity: usize },

    #[error("date {start} + {offset} days is outside the supported calendar")]
    DateOutOfRange { start: NaiveDate, offset: u64 },
}

pub type Result<T> = core::result::Result<T, Error>;
