//! schedule - Mock appointments and availability for the dashboards
//!
//! Everything here is demo data: values are drawn from small fixed pools and
//! every call produces a fresh batch. Only the shape of the output is stable.

use core::fmt::{self, Write};

use chrono::{Days, NaiveDate};
use heapless::{String, Vec};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::error::{Error, Result};

pub const PATIENT_NAMES: [&str; 5] = [
    "Ana García",
    "Carlos Rodríguez",
    "María López",
    "Juan Martínez",
    "Laura Sánchez",
];

/// Consultation fees in pesos.
pub const FEES: [u32; 4] = [50_000, 60_000, 75_000, 100_000];

pub const MAX_APPOINTMENTS_PER_DAY: usize = 5;
pub const MAX_SLOTS_PER_DAY: usize = 5;
pub const AVAILABILITY_DAYS: usize = 14;

/// Fits the default 30-day window at the busiest rate.
pub const APPOINTMENT_CAPACITY: usize = 160;

/// Bookable times offered to patients, in ascending order.
pub const SLOT_CANDIDATES: [TimeOfDay; 16] = [
    TimeOfDay::new(9, 0),
    TimeOfDay::new(9, 30),
    TimeOfDay::new(10, 0),
    TimeOfDay::new(10, 30),
    TimeOfDay::new(11, 0),
    TimeOfDay::new(11, 30),
    TimeOfDay::new(12, 0),
    TimeOfDay::new(12, 30),
    TimeOfDay::new(15, 0),
    TimeOfDay::new(15, 30),
    TimeOfDay::new(16, 0),
    TimeOfDay::new(16, 30),
    TimeOfDay::new(17, 0),
    TimeOfDay::new(17, 30),
    TimeOfDay::new(18, 0),
    TimeOfDay::new(18, 30),
];

/// Wall-clock time, displayed as `H:MM`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AppointmentKind {
    Consultation,
    FollowUp,
    Exam,
}

impl AppointmentKind {
    pub const ALL: [AppointmentKind; 3] = [
        AppointmentKind::Consultation,
        AppointmentKind::FollowUp,
        AppointmentKind::Exam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentKind::Consultation => "Consulta",
            AppointmentKind::FollowUp => "Control",
            AppointmentKind::Exam => "Examen",
        }
    }
}

impl fmt::Display for AppointmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 2] = [AppointmentStatus::Confirmed, AppointmentStatus::Pending];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "Confirmada",
            AppointmentStatus::Pending => "Pendiente",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `YYYY-MM-DD-<index>`.
pub type AppointmentId = String<24>;

#[derive(Clone, Debug, PartialEq)]
pub struct AppointmentRecord {
    pub id: AppointmentId,
    pub patient_name: &'static str,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    pub fee: u32,
}

impl AppointmentRecord {
    pub fn is_confirmed(&self) -> bool {
        self.status == AppointmentStatus::Confirmed
    }
}

pub type Slots = Vec<TimeOfDay, MAX_SLOTS_PER_DAY>;

#[derive(Clone, Debug, PartialEq)]
pub struct AvailabilitySlot {
    pub date: NaiveDate,
    pub slots: Slots,
}

impl AvailabilitySlot {
    pub fn is_fully_booked(&self) -> bool {
        self.slots.is_empty()
    }
}

pub type Availability = Vec<AvailabilitySlot, AVAILABILITY_DAYS>;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScheduleSettings {
    /// Days covered by the professional dashboard.
    pub days: u32,
    /// Chance that a day in the availability window has any free slot.
    /// Clamped to `[0, 1]`; a non-finite value books every day out.
    pub open_day_probability: f64,
    /// Appointment hours, inclusive. Values past 23 are treated as 23.
    pub first_hour: u8,
    pub last_hour: u8,
}

impl ScheduleSettings {
    /// Earliest and latest appointment hour, ordered and within a day.
    pub fn hour_range(&self) -> (u8, u8) {
        let first = self.first_hour.min(23);
        let last = self.last_hour.min(23);
        (first.min(last), first.max(last))
    }

    pub fn open_probability(&self) -> f64 {
        if self.open_day_probability.is_finite() {
            self.open_day_probability.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            days: 30,
            open_day_probability: 0.7,
            first_hour: 9,
            last_hour: 16,
        }
    }
}

pub struct ScheduleGenerator<R> {
    rng: R,
    settings: ScheduleSettings,
}

impl<R: Rng> ScheduleGenerator<R> {
    pub fn new(rng: R, settings: ScheduleSettings) -> Self {
        Self { rng, settings }
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: ScheduleSettings) {
        self.settings = settings;
    }

    /// Appointments for `num_days` consecutive days starting at `start`,
    /// one to five per day, grouped by ascending date.
    pub fn appointments<const N: usize>(
        &mut self,
        start: NaiveDate,
        num_days: u32,
    ) -> Result<Vec<AppointmentRecord, N>> {
        let mut batch: Vec<AppointmentRecord, N> = Vec::new();
        for offset in 0..u64::from(num_days) {
            let date = day_after(start, offset)?;
            let count = self.rng.gen_range(1..=MAX_APPOINTMENTS_PER_DAY);
            for index in 0..count {
                let record = self.appointment(date, index);
                batch
                    .push(record)
                    .map_err(|_| Error::CapacityExceeded { capacity: N })?;
            }
        }
        debug!(%start, days = num_days, records = batch.len(), "generated appointments");
        Ok(batch)
    }

    /// The professional dashboard's default window: `settings.days` from
    /// `start`.
    pub fn default_appointments(
        &mut self,
        start: NaiveDate,
    ) -> Result<Vec<AppointmentRecord, APPOINTMENT_CAPACITY>> {
        let days = self.settings.days;
        self.appointments(start, days)
    }

    fn appointment(&mut self, date: NaiveDate, index: usize) -> AppointmentRecord {
        let mut id = AppointmentId::new();
        // a 10-character date plus a single-digit index always fits
        let _ = write!(id, "{date}-{index}");

        AppointmentRecord {
            id,
            patient_name: pick(&mut self.rng, &PATIENT_NAMES),
            date,
            time: self.random_time(),
            kind: pick(&mut self.rng, &AppointmentKind::ALL),
            status: pick(&mut self.rng, &AppointmentStatus::ALL),
            fee: pick(&mut self.rng, &FEES),
        }
    }

    fn random_time(&mut self) -> TimeOfDay {
        let (first, last) = self.settings.hour_range();
        let hour = self.rng.gen_range(first..=last);
        let minute = if self.rng.gen_bool(0.5) { 0 } else { 30 };
        TimeOfDay::new(hour, minute)
    }

    /// Fourteen days of bookable slots starting at `today`. Roughly three in
    /// ten days come back fully booked.
    pub fn availability(&mut self, today: NaiveDate) -> Result<Availability> {
        let probability = self.settings.open_probability();
        let mut days = Availability::new();
        for offset in 0..AVAILABILITY_DAYS as u64 {
            let date = day_after(today, offset)?;
            let slots = if self.rng.gen_bool(probability) {
                self.open_slots()
            } else {
                Slots::new()
            };
            days.push(AvailabilitySlot { date, slots })
                .map_err(|_| Error::CapacityExceeded {
                    capacity: AVAILABILITY_DAYS,
                })?;
        }
        Ok(days)
    }

    fn open_slots(&mut self) -> Slots {
        let count = self.rng.gen_range(1..=MAX_SLOTS_PER_DAY);
        let mut pool = SLOT_CANDIDATES;
        let (picked, _) = pool.partial_shuffle(&mut self.rng, count);
        let mut slots: Slots = picked.iter().copied().collect();
        slots.sort_unstable();
        slots
    }
}

fn day_after(start: NaiveDate, offset: u64) -> Result<NaiveDate> {
    start
        .checked_add_days(Days::new(offset))
        .ok_or(Error::DateOutOfRange { start, offset })
}

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, pool: &[T]) -> T {
    pool[rng.gen_range(0..pool.len())]
}

/// Which appointments a dashboard list shows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AppointmentStatus),
}

impl StatusFilter {
    pub fn matches(&self, record: &AppointmentRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => record.status == *status,
        }
    }
}

pub fn filter_by_status(
    records: &[AppointmentRecord],
    filter: StatusFilter,
) -> impl Iterator<Item = &AppointmentRecord> + '_ {
    records.iter().filter(move |r| filter.matches(r))
}

pub fn confirmed(records: &[AppointmentRecord]) -> impl Iterator<Item = &AppointmentRecord> + '_ {
    filter_by_status(records, StatusFilter::Only(AppointmentStatus::Confirmed))
}

/// Sum of fees over confirmed appointments.
pub fn total_earnings(records: &[AppointmentRecord]) -> u64 {
    confirmed(records).map(|r| u64::from(r.fee)).sum()
}

/// Figures shown on the overview tab.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub earnings: u64,
}

pub fn summarize(records: &[AppointmentRecord]) -> ScheduleSummary {
    let confirmed = confirmed(records).count();
    ScheduleSummary {
        total: records.len(),
        confirmed,
        pending: records.len() - confirmed,
        earnings: total_earnings(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn generator(seed: u64) -> ScheduleGenerator<SmallRng> {
        ScheduleGenerator::new(SmallRng::seed_from_u64(seed), ScheduleSettings::default())
    }

    #[test]
    fn two_day_batch_matches_example_scenario() {
        for seed in 0..50 {
            let mut schedule = generator(seed);
            let batch: Vec<AppointmentRecord, 16> = schedule.appointments(date(2025, 3, 1), 2).unwrap();

            let first = batch.iter().filter(|r| r.date == date(2025, 3, 1)).count();
            let second = batch.iter().filter(|r| r.date == date(2025, 3, 2)).count();
            assert!((1..=5).contains(&first));
            assert!((1..=5).contains(&second));
            assert_eq!(first + second, batch.len());
            assert!(batch.iter().all(|r| FEES.contains(&r.fee)));

            // grouped by ascending day
            assert!(batch.windows(2).all(|w| w[0].date <= w[1].date));
        }
    }

    #[test]
    fn batch_size_dates_and_ids_hold_for_a_month() {
        let start = date(2025, 2, 20);
        for seed in 0..20 {
            let mut schedule = generator(seed);
            let batch = schedule.default_appointments(start).unwrap();
            assert!(batch.len() >= 30 && batch.len() <= 150);

            let last = start + Days::new(29);
            assert!(batch.iter().all(|r| r.date >= start && r.date <= last));

            let ids: HashSet<&str> = batch.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids.len(), batch.len());
        }
    }

    #[test]
    fn records_draw_from_fixed_pools() {
        let mut schedule = generator(3);
        let batch: Vec<AppointmentRecord, 64> = schedule.appointments(date(2025, 3, 1), 10).unwrap();
        for r in &batch {
            assert!(PATIENT_NAMES.contains(&r.patient_name));
            assert!((9..=16).contains(&r.time.hour()));
            assert!(r.time.minute() == 0 || r.time.minute() == 30);
            assert!(r.id.starts_with("2025-03-"));
        }
    }

    #[test]
    fn id_combines_date_and_index() {
        let mut schedule = generator(8);
        let batch: Vec<AppointmentRecord, 8> = schedule.appointments(date(2025, 12, 31), 1).unwrap();
        assert_eq!(batch[0].id.as_str(), "2025-12-31-0");
        if batch.len() > 1 {
            assert_eq!(batch[1].id.as_str(), "2025-12-31-1");
        }
    }

    #[test]
    fn successive_calls_differ() {
        let mut schedule = generator(21);
        let a: Vec<AppointmentRecord, APPOINTMENT_CAPACITY> =
            schedule.appointments(date(2025, 3, 1), 30).unwrap();
        let b: Vec<AppointmentRecord, APPOINTMENT_CAPACITY> =
            schedule.appointments(date(2025, 3, 1), 30).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn zero_days_is_empty() {
        let mut schedule = generator(0);
        let batch: Vec<AppointmentRecord, 4> = schedule.appointments(date(2025, 3, 1), 0).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn overflowing_buffer_is_reported() {
        let mut schedule = generator(0);
        let err = schedule
            .appointments::<4>(date(2025, 3, 1), 10)
            .unwrap_err();
        assert_eq!(err, Error::CapacityExceeded { capacity: 4 });
    }

    #[test]
    fn calendar_overflow_is_reported() {
        let mut schedule = generator(0);
        let err = schedule.appointments::<16>(NaiveDate::MAX, 2).unwrap_err();
        assert_eq!(
            err,
            Error::DateOutOfRange {
                start: NaiveDate::MAX,
                offset: 1
            }
        );
    }

    #[test]
    fn earnings_sum_confirmed_fees_only() {
        for seed in 0..20 {
            let mut schedule = generator(seed);
            let batch: Vec<AppointmentRecord, APPOINTMENT_CAPACITY> =
                schedule.appointments(date(2025, 3, 1), 30).unwrap();
            let expected: u64 = batch
                .iter()
                .filter(|r| r.status.as_str() == "Confirmada")
                .map(|r| r.fee as u64)
                .sum();
            assert_eq!(total_earnings(&batch), expected);

            let summary = summarize(&batch);
            assert_eq!(summary.earnings, expected);
            assert_eq!(summary.confirmed + summary.pending, summary.total);
        }
    }

    #[test]
    fn status_filter_partitions_batch() {
        let mut schedule = generator(4);
        let batch: Vec<AppointmentRecord, 64> = schedule.appointments(date(2025, 3, 1), 10).unwrap();
        let all = filter_by_status(&batch, StatusFilter::All).count();
        let confirmed = filter_by_status(&batch, StatusFilter::Only(AppointmentStatus::Confirmed)).count();
        let pending = filter_by_status(&batch, StatusFilter::Only(AppointmentStatus::Pending)).count();
        assert_eq!(all, batch.len());
        assert_eq!(confirmed + pending, all);
        assert!(filter_by_status(&batch, StatusFilter::Only(AppointmentStatus::Pending))
            .all(|r| !r.is_confirmed()));
    }

    #[test]
    fn availability_covers_fourteen_sorted_days() {
        let today = date(2025, 3, 1);
        let pool: HashSet<TimeOfDay> = SLOT_CANDIDATES.iter().copied().collect();
        for seed in 0..50 {
            let mut schedule = generator(seed);
            let days = schedule.availability(today).unwrap();
            assert_eq!(days.len(), AVAILABILITY_DAYS);
            for (offset, day) in days.iter().enumerate() {
                assert_eq!(day.date, today + Days::new(offset as u64));
                assert!(day.slots.len() <= MAX_SLOTS_PER_DAY);
                assert!(day.slots.windows(2).all(|w| w[0] < w[1]));
                assert!(day.slots.iter().all(|t| pool.contains(t)));
            }
        }
    }

    #[test]
    fn availability_has_open_and_booked_days() {
        let mut schedule = generator(12);
        let mut open = 0;
        let mut booked = 0;
        for _ in 0..20 {
            for day in schedule.availability(date(2025, 3, 1)).unwrap() {
                if day.is_fully_booked() {
                    booked += 1;
                } else {
                    open += 1;
                }
            }
        }
        // 280 days at p = 0.7
        assert!(open > 150 && booked > 40);
    }

    #[test]
    fn certain_probability_never_books_out() {
        let settings = ScheduleSettings {
            open_day_probability: 1.0,
            ..ScheduleSettings::default()
        };
        let mut schedule = ScheduleGenerator::new(SmallRng::seed_from_u64(5), settings);
        let days = schedule.availability(date(2025, 3, 1)).unwrap();
        assert!(days.iter().all(|d| !d.is_fully_booked()));
    }

    #[test]
    fn out_of_range_hours_stay_within_a_day() {
        let settings = ScheduleSettings {
            first_hour: 40,
            last_hour: 30,
            ..ScheduleSettings::default()
        };
        assert_eq!(settings.hour_range(), (23, 23));

        let mut schedule = ScheduleGenerator::new(SmallRng::seed_from_u64(2), settings);
        let batch: Vec<AppointmentRecord, 64> = schedule.appointments(date(2025, 3, 1), 5).unwrap();
        assert!(batch.iter().all(|r| r.time.hour() == 23));

        let reversed = ScheduleSettings {
            first_hour: 16,
            last_hour: 9,
            ..ScheduleSettings::default()
        };
        assert_eq!(reversed.hour_range(), (9, 16));
    }

    #[test]
    fn non_finite_probability_books_every_day_out() {
        for probability in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let settings = ScheduleSettings {
                open_day_probability: probability,
                ..ScheduleSettings::default()
            };
            let mut schedule = ScheduleGenerator::new(SmallRng::seed_from_u64(3), settings);
            let days = schedule.availability(date(2025, 3, 1)).unwrap();
            assert_eq!(days.len(), AVAILABILITY_DAYS);
            assert!(days.iter().all(|d| d.is_fully_booked()));
        }

        let above = ScheduleSettings {
            open_day_probability: 3.5,
            ..ScheduleSettings::default()
        };
        assert_eq!(above.open_probability(), 1.0);
    }

    #[test]
    fn time_renders_without_hour_padding() {
        let mut s: String<8> = String::new();
        write!(s, "{}", TimeOfDay::new(9, 0)).unwrap();
        assert_eq!(s.as_str(), "9:00");
        s.clear();
        write!(s, "{}", TimeOfDay::new(16, 30)).unwrap();
        assert_eq!(s.as_str(), "16:30");
    }
}
