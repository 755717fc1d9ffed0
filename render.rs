//! render - Paint a particle field onto an embedded-graphics target
//!
//! Targets have no alpha channel, so translucency is approximated by blending
//! the accent color toward the background.

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, Line, Polyline, PrimitiveStyle},
};
use rand::Rng;

use crate::field::{FieldKind, ParticleField};
use crate::hexagon::hexagon_vertices;
use crate::role::Theme;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb565,
    pub accent: Rgb565,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            // rgb(0, 123, 255)
            Theme::Patient => Self {
                background: Rgb565::WHITE,
                accent: Rgb565::new(0, 30, 31),
            },
            // rgb(22, 163, 74)
            Theme::Professional => Self {
                background: Rgb565::WHITE,
                accent: Rgb565::new(2, 40, 9),
            },
        }
    }
}

/// Mix `fg` over `bg` at `alpha` in `[0, 1]`.
pub fn blend(fg: Rgb565, bg: Rgb565, alpha: f32) -> Rgb565 {
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| -> u8 {
        let value = b as f32 + (f as f32 - b as f32) * alpha;
        libm::roundf(value) as u8
    };
    Rgb565::new(mix(fg.r(), bg.r()), mix(fg.g(), bg.g()), mix(fg.b(), bg.b()))
}

fn point(x: f32, y: f32) -> Point {
    Point::new(libm::roundf(x) as i32, libm::roundf(y) as i32)
}

fn draw_hexagon<D>(target: &mut D, cx: f32, cy: f32, size: f32, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let corners = hexagon_vertices(cx, cy, size);
    let mut outline = [Point::zero(); 7];
    for (slot, (x, y)) in outline.iter_mut().zip(corners) {
        *slot = point(x, y);
    }
    outline[6] = outline[0];
    Polyline::new(&outline)
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(target)
}

/// Draw one frame: clear, shapes, then proximity lines on top. `rng` drives
/// the grid preset's flicker.
pub fn draw_field<D, R, const N: usize>(
    field: &ParticleField<N>,
    target: &mut D,
    palette: &Palette,
    rng: &mut R,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
    R: Rng + ?Sized,
{
    let settings = field.settings();
    target.clear(palette.background)?;

    match field.kind() {
        FieldKind::ConnectedDots => {
            let color = blend(palette.accent, palette.background, settings.dot_opacity);
            for p in field.particles() {
                let diameter = libm::roundf(p.size * 2.0) as u32;
                Circle::with_center(point(p.x, p.y), diameter)
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(target)?;
            }
        }
        FieldKind::WanderingHexagons => {
            let color = blend(palette.accent, palette.background, settings.hex_opacity);
            for p in field.particles() {
                draw_hexagon(target, p.x, p.y, p.size, color)?;
            }
        }
        FieldKind::LandingParticles => {
            for p in field.particles() {
                let diameter = (libm::roundf(p.size) as u32).max(1);
                Circle::with_center(point(p.x, p.y), diameter)
                    .into_styled(PrimitiveStyle::with_fill(palette.accent))
                    .draw(target)?;
            }
        }
        FieldKind::HexagonGrid => {
            if let Some(grid) = field.grid() {
                for (x, y) in grid.cells() {
                    let alpha = settings.grid_min_opacity + rng.gen::<f32>() * settings.grid_opacity_jitter;
                    let color = blend(palette.accent, palette.background, alpha);
                    draw_hexagon(target, x, y, grid.size(), color)?;
                }
            }
        }
    }

    let particles = field.particles();
    for edge in field.edges() {
        let (a, b) = (&particles[edge.a], &particles[edge.b]);
        let color = blend(palette.accent, palette.background, edge.opacity);
        Line::new(point(a.x, a.y), point(b.x, b.y))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(target)?;
    }

    Ok(())
}
