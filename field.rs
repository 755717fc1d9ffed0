//! field - Ambient particle field behind the dashboards
//!
//! Points drift across the viewport and are joined by faint lines when they
//! come close to each other. Four presets share the same frame contract:
//! bouncing dots, wandering hexagons, a scrolling hexagon grid and the
//! landing page's drifting specks.

use core::time::Duration;

use heapless::Vec;
use rand::Rng;
use tracing::{debug, warn};

use crate::hexagon::HexGrid;

/// Pool capacity used by the bundled presets.
pub const MAX_PARTICLES: usize = 64;

/// Size of the drawing surface in pixels. Never zero in either axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// `None` when the surface has no area to draw on.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    fn limits(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Small circles bouncing off the viewport edges.
    ConnectedDots,
    /// Hexagon outlines on a slow circular drift, wrapping at the edges.
    WanderingHexagons,
    /// A full hexagon tiling scrolling downward. Has no particles.
    HexagonGrid,
    /// Specks of varying size drifting on a fixed tick, wrapping at the
    /// edges. Never joined by lines.
    LandingParticles,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::ConnectedDots => "connected dots",
            FieldKind::WanderingHexagons => "wandering hexagons",
            FieldKind::HexagonGrid => "hexagon grid",
            FieldKind::LandingParticles => "landing particles",
        }
    }

    pub fn draws_edges(&self) -> bool {
        matches!(self, FieldKind::ConnectedDots | FieldKind::WanderingHexagons)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldSettings {
    pub kind: FieldKind,
    pub count: usize,
    /// Minimum time between steps. `None` steps on every paint.
    pub step_interval: Option<Duration>,

    // Motion
    pub max_speed: f32,
    pub wander_speed: f32,
    pub wander_time_step: f32,

    // Edges
    pub connect_distance: f32,
    pub max_edge_opacity: f32,

    // Shapes
    pub dot_radius: f32,
    pub dot_opacity: f32,
    pub hex_min_size: f32,
    pub hex_max_size: f32,
    pub hex_opacity: f32,
    pub speck_min_size: f32,
    pub speck_max_size: f32,

    // Grid
    pub grid_hex_size: f32,
    pub grid_scroll_speed: f32,
    pub grid_min_opacity: f32,
    pub grid_opacity_jitter: f32,
}

impl FieldSettings {
    pub fn connected_dots() -> Self {
        Self {
            kind: FieldKind::ConnectedDots,
            count: 50,
            step_interval: None,
            max_speed: 0.25,
            wander_speed: 0.5,
            wander_time_step: 0.01,
            connect_distance: 150.0,
            max_edge_opacity: 0.2,
            dot_radius: 2.0,
            dot_opacity: 0.5,
            hex_min_size: 10.0,
            hex_max_size: 30.0,
            hex_opacity: 0.2,
            speck_min_size: 1.0,
            speck_max_size: 6.0,
            grid_hex_size: 30.0,
            grid_scroll_speed: 0.2,
            grid_min_opacity: 0.05,
            grid_opacity_jitter: 0.1,
        }
    }

    pub fn wandering_hexagons() -> Self {
        Self {
            kind: FieldKind::WanderingHexagons,
            count: 30,
            max_edge_opacity: 0.1,
            ..Self::connected_dots()
        }
    }

    pub fn hexagon_grid() -> Self {
        Self {
            kind: FieldKind::HexagonGrid,
            count: 0,
            ..Self::connected_dots()
        }
    }

    pub fn landing_particles() -> Self {
        Self {
            kind: FieldKind::LandingParticles,
            count: 50,
            step_interval: Some(Duration::from_millis(50)),
            max_speed: 1.0,
            ..Self::connected_dots()
        }
    }

    pub fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::ConnectedDots => Self::connected_dots(),
            FieldKind::WanderingHexagons => Self::wandering_hexagons(),
            FieldKind::HexagonGrid => Self::hexagon_grid(),
            FieldKind::LandingParticles => Self::landing_particles(),
        }
    }
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self::connected_dots()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Dot radius, speck diameter, or hexagon circumradius.
    pub size: f32,
}

/// A proximity line between two particles, recomputed every frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub opacity: f32,
}

/// Edge between two particles if they are closer than `threshold`.
/// Opacity falls linearly from `max_opacity` at distance zero.
pub fn edge_between(
    a: usize,
    pa: &Particle,
    b: usize,
    pb: &Particle,
    threshold: f32,
    max_opacity: f32,
) -> Option<Edge> {
    let dx = pa.x - pb.x;
    let dy = pa.y - pb.y;
    let distance = libm::sqrtf(dx * dx + dy * dy);
    if distance >= threshold {
        return None;
    }
    Some(Edge {
        a,
        b,
        distance,
        opacity: max_opacity * (1.0 - distance / threshold),
    })
}

pub struct ParticleField<const N: usize> {
    particles: Vec<Particle, N>,
    grid: Option<HexGrid>,
    viewport: Viewport,
    time: f32,
    settings: FieldSettings,
}

impl<const N: usize> ParticleField<N> {
    pub fn new<R: Rng + ?Sized>(viewport: Viewport, settings: FieldSettings, rng: &mut R) -> Self {
        let mut field = Self {
            particles: Vec::new(),
            grid: None,
            viewport,
            time: 0.0,
            settings,
        };

        if settings.kind == FieldKind::HexagonGrid {
            field.grid = Some(HexGrid::new(viewport, settings.grid_hex_size));
        } else {
            field.seed(rng);
        }

        debug!(
            kind = settings.kind.name(),
            particles = field.particles.len(),
            width = viewport.width,
            height = viewport.height,
            "particle field initialised"
        );
        field
    }

    fn seed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = if self.settings.count > N {
            warn!(
                requested = self.settings.count,
                capacity = N,
                "particle count exceeds pool, truncating"
            );
            N
        } else {
            self.settings.count
        };

        let (width, height) = self.viewport.limits();
        let speed = self.settings.max_speed;
        for _ in 0..count {
            let x = rng.gen::<f32>() * width;
            let y = rng.gen::<f32>() * height;
            let particle = match self.settings.kind {
                FieldKind::WanderingHexagons => Particle {
                    x,
                    y,
                    size: random_between(rng, self.settings.hex_min_size, self.settings.hex_max_size),
                    ..Particle::default()
                },
                FieldKind::LandingParticles => Particle {
                    x,
                    y,
                    vx: (rng.gen::<f32>() - 0.5) * 2.0 * speed,
                    vy: (rng.gen::<f32>() - 0.5) * 2.0 * speed,
                    size: random_between(rng, self.settings.speck_min_size, self.settings.speck_max_size),
                },
                _ => Particle {
                    x,
                    y,
                    vx: (rng.gen::<f32>() - 0.5) * 2.0 * speed,
                    vy: (rng.gen::<f32>() - 0.5) * 2.0 * speed,
                    size: self.settings.dot_radius,
                },
            };
            // count <= N, so the pool never overflows
            let _ = self.particles.push(particle);
        }
    }

    /// Advance the field by one animation frame.
    pub fn step(&mut self) {
        match self.settings.kind {
            FieldKind::ConnectedDots => self.step_bounce(),
            FieldKind::WanderingHexagons => self.step_wander(),
            FieldKind::LandingParticles => self.step_drift(),
            FieldKind::HexagonGrid => {
                if let Some(grid) = &mut self.grid {
                    grid.advance(self.settings.grid_scroll_speed);
                }
            }
        }
    }

    fn step_bounce(&mut self) {
        let (width, height) = self.viewport.limits();
        for p in self.particles.iter_mut() {
            p.x += p.vx;
            p.y += p.vy;
            reflect(&mut p.x, &mut p.vx, width);
            reflect(&mut p.y, &mut p.vy, height);
        }
    }

    fn step_wander(&mut self) {
        self.time += self.settings.wander_time_step;
        let time = self.time;
        let speed = self.settings.wander_speed;
        let (width, height) = self.viewport.limits();
        for (i, p) in self.particles.iter_mut().enumerate() {
            let phase = time + i as f32;
            p.vx = libm::sinf(phase) * speed;
            p.vy = libm::cosf(phase) * speed;
            p.x += p.vx;
            p.y += p.vy;
            wrap(&mut p.x, width);
            wrap(&mut p.y, height);
        }
    }

    fn step_drift(&mut self) {
        let (width, height) = self.viewport.limits();
        for p in self.particles.iter_mut() {
            p.x = wrap_modulo(p.x + p.vx, width);
            p.y = wrap_modulo(p.y + p.vy, height);
        }
    }

    /// Every unordered pair of particles closer than the connect distance.
    /// Empty for presets that draw no lines.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let threshold = self.settings.connect_distance;
        let max_opacity = self.settings.max_edge_opacity;
        let particles: &[Particle] = if self.settings.kind.draws_edges() {
            &self.particles
        } else {
            &[]
        };
        // PERF: O(n²) over at most N points, small enough for a background
        (0..particles.len())
            .flat_map(move |a| ((a + 1)..particles.len()).map(move |b| (a, b)))
            .filter_map(move |(a, b)| {
                edge_between(a, &particles[a], b, &particles[b], threshold, max_opacity)
            })
    }

    /// Track a new surface size. Particles keep their positions; any that are
    /// now outside get pushed back by the next step.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(grid) = &mut self.grid {
            grid.resize(viewport);
        }
        debug!(width = viewport.width, height = viewport.height, "particle field resized");
    }

    /// Replace the tuning values without reseeding. A change of `kind` only
    /// takes effect on a new field.
    pub fn update_settings(&mut self, settings: FieldSettings) {
        self.settings = FieldSettings {
            kind: self.settings.kind,
            ..settings
        };
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn grid(&self) -> Option<&HexGrid> {
        self.grid.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn kind(&self) -> FieldKind {
        self.settings.kind
    }

    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }
}

/// Bounce off `[0, limit]`: clamp the overshoot and point the velocity back
/// inside.
fn reflect(pos: &mut f32, vel: &mut f32, limit: f32) {
    if *pos < 0.0 {
        *pos = 0.0;
        *vel = libm::fabsf(*vel);
    } else if *pos > limit {
        *pos = limit;
        *vel = -libm::fabsf(*vel);
    }
}

fn wrap(pos: &mut f32, limit: f32) {
    if *pos < 0.0 {
        *pos = limit;
    } else if *pos > limit {
        *pos = 0.0;
    }
}

/// Position on `[0, limit)`, wrapping from either side.
fn wrap_modulo(pos: f32, limit: f32) -> f32 {
    let wrapped = libm::fmodf(pos, limit);
    let wrapped = if wrapped < 0.0 { wrapped + limit } else { wrapped };
    // fmodf of a tiny negative plus limit can round up to limit
    if wrapped >= limit {
        0.0
    } else {
        wrapped
    }
}

fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
