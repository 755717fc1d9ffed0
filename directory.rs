//! directory - Demo roster of doctors shown on the patient side

use chrono::NaiveDate;
use heapless::Vec;
use rand::Rng;

use crate::error::Result;
use crate::schedule::{Availability, ScheduleGenerator, TimeOfDay};

pub const INSURANCE_TYPES: [&str; 6] = [
    "Fonasa",
    "Isapre Banmédica",
    "Isapre Cruz Blanca",
    "Isapre Colmena",
    "Isapre Vida Tres",
    "Particular",
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Doctor {
    pub id: &'static str,
    pub name: &'static str,
    pub specialty: &'static str,
    pub location: &'static str,
    pub address: &'static str,
    pub rating: f32,
    pub review_count: u32,
    pub insurance: &'static [&'static str],
}

impl Doctor {
    pub fn accepts(&self, insurance: &str) -> bool {
        self.insurance.iter().any(|accepted| *accepted == insurance)
    }
}

pub const DOCTOR_COUNT: usize = 8;

pub static DOCTORS: [Doctor; DOCTOR_COUNT] = [
    Doctor {
        id: "1",
        name: "Dra. Ana Martínez",
        specialty: "Cardiología",
        location: "Providencia",
        address: "Av. Providencia 1208, Providencia",
        rating: 4.8,
        review_count: 124,
        insurance: &["Fonasa", "Isapre Banmédica", "Isapre Cruz Blanca"],
    },
    Doctor {
        id: "2",
        name: "Dr. Carlos Rodríguez",
        specialty: "Dermatología",
        location: "Las Condes",
        address: "Av. Apoquindo 4501, Las Condes",
        rating: 4.6,
        review_count: 98,
        insurance: &["Isapre Banmédica", "Isapre Colmena", "Particular"],
    },
    Doctor {
        id: "3",
        name: "Dr. Javier Morales",
        specialty: "Neurología",
        location: "Santiago Centro",
        address: "Alameda 1340, Santiago",
        rating: 4.9,
        review_count: 156,
        insurance: &["Fonasa", "Isapre Cruz Blanca", "Isapre Vida Tres"],
    },
    Doctor {
        id: "4",
        name: "Dra. Valentina Soto",
        specialty: "Pediatría",
        location: "Ñuñoa",
        address: "Irarrázaval 3412, Ñuñoa",
        rating: 4.7,
        review_count: 203,
        insurance: &["Fonasa", "Isapre Banmédica", "Isapre Colmena"],
    },
    Doctor {
        id: "5",
        name: "Dr. Matías González",
        specialty: "Oftalmología",
        location: "Providencia",
        address: "Los Leones 220, Providencia",
        rating: 4.5,
        review_count: 87,
        insurance: &["Isapre Cruz Blanca", "Isapre Vida Tres", "Particular"],
    },
    Doctor {
        id: "6",
        name: "Dra. Camila Vargas",
        specialty: "Ortopedia",
        location: "Las Condes",
        address: "Manquehue Norte 1407, Las Condes",
        rating: 4.8,
        review_count: 112,
        insurance: &["Fonasa", "Isapre Banmédica", "Isapre Colmena"],
    },
    Doctor {
        id: "7",
        name: "Dr. Felipe Rojas",
        specialty: "Psiquiatría",
        location: "Vitacura",
        address: "Vitacura 4380, Vitacura",
        rating: 4.9,
        review_count: 94,
        insurance: &["Isapre Banmédica", "Isapre Vida Tres", "Particular"],
    },
    Doctor {
        id: "8",
        name: "Dra. Daniela Muñoz",
        specialty: "Ginecología",
        location: "La Florida",
        address: "Vicuña Mackenna 7110, La Florida",
        rating: 4.7,
        review_count: 178,
        insurance: &["Fonasa", "Isapre Cruz Blanca", "Isapre Colmena"],
    },
];

pub fn find(id: &str) -> Option<&'static Doctor> {
    DOCTORS.iter().find(|d| d.id == id)
}

/// Doctors matching both filters; `None` matches anything.
pub fn search<'a>(
    specialty: Option<&'a str>,
    location: Option<&'a str>,
) -> impl Iterator<Item = &'static Doctor> + 'a {
    DOCTORS.iter().filter(move |d| {
        specialty.map_or(true, |s| d.specialty == s) && location.map_or(true, |l| d.location == l)
    })
}

#[derive(Clone, Debug)]
pub struct DoctorAvailability {
    pub doctor: &'static Doctor,
    pub days: Availability,
}

impl DoctorAvailability {
    /// Earliest bookable slot in the window.
    pub fn next_open_slot(&self) -> Option<(NaiveDate, TimeOfDay)> {
        self.days
            .iter()
            .find_map(|day| day.slots.first().map(|time| (day.date, *time)))
    }
}

/// A fresh availability window for every doctor on the roster.
pub fn roster_availability<R: Rng>(
    generator: &mut ScheduleGenerator<R>,
    today: NaiveDate,
) -> Result<Vec<DoctorAvailability, DOCTOR_COUNT>> {
    let mut roster: Vec<DoctorAvailability, DOCTOR_COUNT> = Vec::new();
    for doctor in DOCTORS.iter() {
        let days = generator.availability(today)?;
        // one entry per doctor, exactly DOCTOR_COUNT
        let _ = roster.push(DoctorAvailability { doctor, days });
    }
    Ok(roster)
}
