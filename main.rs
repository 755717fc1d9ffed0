//! main.rs - Desktop preview of the Healthy backgrounds and demo schedule
//! Handles windowing, timing, role persistence and keyboard controls

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    text::{Baseline, Text},
};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use rand::{rngs::SmallRng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use healthy_rust::directory;
use healthy_rust::render::{draw_field, Palette};
use healthy_rust::role;
use healthy_rust::schedule::{self, ScheduleSummary};
use healthy_rust::view::{FrameRequest, Subscription};
use healthy_rust::{
    BackgroundView, FieldKind, FieldSettings, Host, Role, RoleContext, RoleStore,
    ScheduleGenerator, ScheduleSettings, Viewport, MAX_PARTICLES,
};

const SCREEN_WIDTH: u32 = 480;
const SCREEN_HEIGHT: u32 = 270;
const TARGET_FPS: u32 = 60;

/// Role preference kept as a `userRole=<role>` line.
struct FileRoleStore {
    path: PathBuf,
}

impl FileRoleStore {
    fn from_env() -> Self {
        let path = env::var_os("HEALTHY_ROLE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".healthy-role"));
        Self { path }
    }
}

impl RoleStore for FileRoleStore {
    type Error = io::Error;

    fn load(&self) -> Option<Role> {
        let stored = fs::read_to_string(&self.path).ok()?;
        stored.lines().find_map(role::parse_entry)
    }

    fn save(&mut self, role: Role) -> Result<(), Self::Error> {
        fs::write(&self.path, format!("{}\n", role::Entry(role)))
    }
}

/// The simulator window has a fixed size and is repainted every loop
/// iteration, so the host only tracks what is outstanding.
struct WindowHost {
    viewport: Option<Viewport>,
    next_id: u32,
    resize_listener: Option<Subscription>,
    frame: Option<FrameRequest>,
}

impl WindowHost {
    fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            next_id: 0,
            resize_listener: None,
            frame: None,
        }
    }

    fn next_id(&mut self) -> u32 {
        self.next_id = self.next_id.wrapping_add(1);
        self.next_id
    }
}

impl Host for WindowHost {
    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn subscribe_resize(&mut self) -> Subscription {
        let subscription = Subscription(self.next_id());
        self.resize_listener = Some(subscription);
        subscription
    }

    fn unsubscribe_resize(&mut self, subscription: Subscription) {
        if self.resize_listener == Some(subscription) {
            self.resize_listener = None;
        }
    }

    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id());
        self.frame = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.frame == Some(request) {
            self.frame = None;
        }
    }
}

fn next_kind(kind: FieldKind) -> FieldKind {
    match kind {
        FieldKind::ConnectedDots => FieldKind::WanderingHexagons,
        FieldKind::WanderingHexagons => FieldKind::HexagonGrid,
        FieldKind::HexagonGrid => FieldKind::LandingParticles,
        FieldKind::LandingParticles => FieldKind::ConnectedDots,
    }
}

fn refresh_schedule(schedule: &mut ScheduleGenerator<SmallRng>, today: NaiveDate) -> ScheduleSummary {
    match schedule.default_appointments(today) {
        Ok(appointments) => {
            let summary = schedule::summarize(&appointments);
            info!(
                total = summary.total,
                confirmed = summary.confirmed,
                pending = summary.pending,
                earnings = summary.earnings,
                "schedule regenerated"
            );
            summary
        }
        Err(err) => {
            warn!(%err, "could not generate schedule");
            ScheduleSummary::default()
        }
    }
}

fn log_roster(schedule: &mut ScheduleGenerator<SmallRng>, today: NaiveDate) {
    let roster = match directory::roster_availability(schedule, today) {
        Ok(roster) => roster,
        Err(err) => {
            warn!(%err, "could not generate doctor availability");
            return;
        }
    };
    for entry in &roster {
        match entry.next_open_slot() {
            Some((date, time)) => info!(
                doctor = entry.doctor.name,
                specialty = entry.doctor.specialty,
                %date,
                %time,
                "next open slot"
            ),
            None => info!(doctor = entry.doctor.name, "fully booked for two weeks"),
        }
    }
}

fn draw_overlay(
    display: &mut SimulatorDisplay<Rgb565>,
    kind: FieldKind,
    role: Role,
    summary: &ScheduleSummary,
) {
    let style = MonoTextStyle::new(&FONT_6X10, Rgb565::new(6, 12, 6));

    let header = format!("{} | {}", kind.name(), role);
    Text::with_baseline(&header, Point::new(5, 5), style, Baseline::Top)
        .draw(display)
        .unwrap();

    let figures = format!(
        "Citas: {}  Confirmadas: {}  Ingresos: ${}",
        summary.total, summary.confirmed, summary.earnings
    );
    Text::with_baseline(&figures, Point::new(5, 17), style, Baseline::Top)
        .draw(display)
        .unwrap();

    let instructions_style = MonoTextStyle::new(&FONT_6X10, Rgb565::new(12, 24, 12));
    Text::with_baseline(
        "V: Preset | R: Role | S: Schedule | D: Doctors | Q: Quit",
        Point::new(5, SCREEN_HEIGHT as i32 - 15),
        instructions_style,
        Baseline::Top,
    )
    .draw(display)
    .unwrap();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut roles = RoleContext::load(FileRoleStore::from_env());
    let mut rng = SmallRng::from_entropy();
    let mut schedule = ScheduleGenerator::new(SmallRng::from_entropy(), ScheduleSettings::default());
    let today = Local::now().date_naive();
    let mut summary = refresh_schedule(&mut schedule, today);

    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("Healthy - Backgrounds", &output_settings);
    let mut host = WindowHost::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let frame_duration = Duration::from_secs_f32(1.0 / TARGET_FPS as f32);

    println!("=== Healthy - Background & Schedule Preview ===");
    println!("Controls:");
    println!("  V: Next background preset");
    println!("  R: Switch patient / professional");
    println!("  S: Regenerate schedule");
    println!("  D: Log next open slot per doctor");
    println!("  Q: Quit");

    let mut kind = FieldKind::ConnectedDots;
    'presets: loop {
        let Some(mut view) = BackgroundView::<_, MAX_PARTICLES>::mount(
            &mut host,
            FieldSettings::for_kind(kind),
            &mut rng,
        ) else {
            warn!("no drawing surface available");
            break;
        };
        info!(preset = kind.name(), "showing background");
        let step_interval = view.field().settings().step_interval;
        let mut last_step: Option<Instant> = None;

        loop {
            let now = Instant::now();

            let due = match (step_interval, last_step) {
                (Some(interval), Some(last)) => now.duration_since(last) >= interval,
                _ => true,
            };
            if due {
                view.on_frame();
                last_step = Some(now);
            }
            let palette = Palette::for_theme(roles.theme());
            draw_field(view.field(), &mut display, &palette, &mut rng).unwrap();
            draw_overlay(&mut display, kind, roles.role(), &summary);
            window.update(&display);

            let mut switch_preset = false;
            for event in window.events() {
                match event {
                    SimulatorEvent::Quit => break 'presets,
                    SimulatorEvent::KeyDown { keycode, .. } => {
                        let key = format!("{:?}", keycode).to_lowercase();
                        match key.as_str() {
                            "v" => switch_preset = true,
                            "r" => {
                                roles.toggle();
                            }
                            "s" => summary = refresh_schedule(&mut schedule, today),
                            "d" => log_roster(&mut schedule, today),
                            "q" => break 'presets,
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if switch_preset {
                kind = next_kind(kind);
                break;
            }

            let elapsed = now.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }
    }

    println!("Goodbye from Healthy!");
}
