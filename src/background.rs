//! Procedural parallax scenery
//!
//! Five layers scrolling at different speeds behind the lane: gradient sky
//! with stars, two mountain ranges, a tree line, and foreground silhouettes,
//! plus drifting clouds and the textured ground strip. Everything is
//! generated geometry; there are no image assets to load. Generation is
//! seeded so a given run always shows the same scenery.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{GROUND_LEVEL, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::renderer::shapes;
use crate::renderer::vertex::Vertex;

/// Layers are built twice as wide as the screen and drawn twice for
/// seamless wrap-around.
const LAYER_WIDTH: f32 = SCREEN_WIDTH * 2.0;

/// Scroll speeds per layer, back to front (px/s)
const LAYER_SPEEDS: [f32; 5] = [0.0, 6.0, 12.0, 24.0, 42.0];

/// Selectable color themes, cycled with the background key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    BlueDusk,
    Night,
    Sunset,
}

impl Theme {
    pub fn next(self) -> Self {
        match self {
            Theme::BlueDusk => Theme::Night,
            Theme::Night => Theme::Sunset,
            Theme::Sunset => Theme::BlueDusk,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::BlueDusk => "blue dusk",
            Theme::Night => "night",
            Theme::Sunset => "sunset",
        }
    }

    fn palette(self) -> Palette {
        match self {
            Theme::BlueDusk => Palette {
                sky_top: [0.12, 0.31, 0.71, 1.0],
                sky_bottom: [0.35, 0.71, 0.47, 1.0],
                star: [0.78, 0.86, 1.0, 1.0],
                mountain_far: [0.16, 0.24, 0.47, 1.0],
                mountain_far_light: [0.20, 0.27, 0.55, 1.0],
                mountain_mid: [0.20, 0.31, 0.59, 1.0],
                mountain_mid_light: [0.22, 0.33, 0.63, 1.0],
                forest: [0.08, 0.16, 0.39, 1.0],
                foreground: [0.04, 0.08, 0.24, 1.0],
                cloud_light: [0.31, 0.39, 0.71, 0.78],
                cloud_dark: [0.16, 0.24, 0.55, 0.78],
                mist: [0.71, 0.78, 1.0, 0.25],
            },
            Theme::Night => Palette {
                sky_top: [0.02, 0.03, 0.12, 1.0],
                sky_bottom: [0.08, 0.10, 0.27, 1.0],
                star: [0.94, 0.94, 0.86, 1.0],
                mountain_far: [0.06, 0.08, 0.20, 1.0],
                mountain_far_light: [0.09, 0.11, 0.25, 1.0],
                mountain_mid: [0.10, 0.12, 0.27, 1.0],
                mountain_mid_light: [0.12, 0.14, 0.31, 1.0],
                forest: [0.04, 0.05, 0.14, 1.0],
                foreground: [0.02, 0.02, 0.08, 1.0],
                cloud_light: [0.16, 0.18, 0.31, 0.71],
                cloud_dark: [0.10, 0.11, 0.22, 0.71],
                mist: [0.47, 0.51, 0.71, 0.20],
            },
            Theme::Sunset => Palette {
                sky_top: [0.35, 0.16, 0.47, 1.0],
                sky_bottom: [0.98, 0.55, 0.24, 1.0],
                star: [1.0, 0.90, 0.71, 1.0],
                mountain_far: [0.43, 0.20, 0.39, 1.0],
                mountain_far_light: [0.51, 0.25, 0.43, 1.0],
                mountain_mid: [0.55, 0.27, 0.35, 1.0],
                mountain_mid_light: [0.63, 0.31, 0.39, 1.0],
                forest: [0.27, 0.12, 0.24, 1.0],
                foreground: [0.14, 0.06, 0.14, 1.0],
                cloud_light: [1.0, 0.71, 0.47, 0.78],
                cloud_dark: [0.86, 0.47, 0.35, 0.78],
                mist: [1.0, 0.78, 0.59, 0.22],
            },
        }
    }
}

struct Palette {
    sky_top: [f32; 4],
    sky_bottom: [f32; 4],
    star: [f32; 4],
    mountain_far: [f32; 4],
    mountain_far_light: [f32; 4],
    mountain_mid: [f32; 4],
    mountain_mid_light: [f32; 4],
    forest: [f32; 4],
    foreground: [f32; 4],
    cloud_light: [f32; 4],
    cloud_dark: [f32; 4],
    mist: [f32; 4],
}

/// One pre-built scenery layer
struct Layer {
    vertices: Vec<Vertex>,
    speed: f32,
    scroll: f32,
}

/// A drifting cloud blob
struct Cloud {
    vertices: Vec<Vertex>,
    pos: Vec2,
    width: f32,
    speed: f32,
}

pub struct Background {
    pub theme: Theme,
    seed: u64,
    layers: Vec<Layer>,
    clouds: Vec<Cloud>,
    ground: Vec<Vertex>,
}

impl Background {
    pub fn new(seed: u64, theme: Theme) -> Self {
        let palette = theme.palette();
        let mut rng = Pcg32::seed_from_u64(seed);

        let layers = vec![
            Layer {
                vertices: build_sky(&palette, &mut rng, theme),
                speed: LAYER_SPEEDS[0],
                scroll: 0.0,
            },
            Layer {
                vertices: build_far_mountains(&palette, &mut rng),
                speed: LAYER_SPEEDS[1],
                scroll: 0.0,
            },
            Layer {
                vertices: build_mid_mountains(&palette, &mut rng),
                speed: LAYER_SPEEDS[2],
                scroll: 0.0,
            },
            Layer {
                vertices: build_forest(&palette, &mut rng),
                speed: LAYER_SPEEDS[3],
                scroll: 0.0,
            },
            Layer {
                vertices: build_foreground(&palette, &mut rng),
                speed: LAYER_SPEEDS[4],
                scroll: 0.0,
            },
        ];

        let clouds = (0..5).map(|_| build_cloud(&palette, &mut rng)).collect();
        let ground = build_ground(&mut rng);

        Self {
            theme,
            seed,
            layers,
            clouds,
            ground,
        }
    }

    /// Switch to the next theme, rebuilding all layers
    pub fn cycle_theme(&mut self) {
        let next = self.theme.next();
        log::info!("Background theme: {}", next.name());
        *self = Self::new(self.seed, next);
    }

    /// Advance scroll positions
    pub fn update(&mut self, dt: f32) {
        for layer in &mut self.layers {
            layer.scroll -= layer.speed * dt;
            if layer.scroll <= -LAYER_WIDTH {
                layer.scroll = 0.0;
            }
        }
        for cloud in &mut self.clouds {
            cloud.pos.x -= cloud.speed * dt;
            if cloud.pos.x + cloud.width < 0.0 {
                cloud.pos.x = SCREEN_WIDTH;
            }
        }
    }

    /// Append all scenery geometry (back to front, ground last)
    pub fn emit(&self, out: &mut Vec<Vertex>) {
        for layer in &self.layers {
            shapes::append_shifted(out, &layer.vertices, Vec2::new(layer.scroll, 0.0));
            shapes::append_shifted(
                out,
                &layer.vertices,
                Vec2::new(layer.scroll + LAYER_WIDTH, 0.0),
            );
        }
        for cloud in &self.clouds {
            shapes::append_shifted(out, &cloud.vertices, cloud.pos);
        }
        out.extend_from_slice(&self.ground);
    }
}

fn build_sky(palette: &Palette, rng: &mut Pcg32, theme: Theme) -> Vec<Vertex> {
    let mut out = Vec::new();
    shapes::gradient_band(
        &mut out,
        0.0,
        LAYER_WIDTH,
        0.0,
        SCREEN_HEIGHT,
        palette.sky_top,
        palette.sky_bottom,
    );

    let star_count = if theme == Theme::Night { 360 } else { 240 };
    for _ in 0..star_count {
        let pos = Vec2::new(
            rng.random_range(0.0..LAYER_WIDTH),
            rng.random_range(0.0..SCREEN_HEIGHT * 0.7),
        );
        let size = rng.random_range(1.0..3.0);
        shapes::circle(&mut out, pos, size, palette.star, 6);
    }
    out
}

fn build_far_mountains(palette: &Palette, rng: &mut Pcg32) -> Vec<Vertex> {
    let mut out = Vec::new();
    for _ in 0..10 {
        let width = rng.random_range(200.0..350.0);
        let height = rng.random_range(100.0..180.0);
        let x = rng.random_range(0.0..LAYER_WIDTH);

        shapes::triangle(
            &mut out,
            Vec2::new(x - width / 2.0, GROUND_LEVEL),
            Vec2::new(x, GROUND_LEVEL - height),
            Vec2::new(x + width / 2.0, GROUND_LEVEL),
            palette.mountain_far,
        );
        // Peak highlight
        shapes::triangle(
            &mut out,
            Vec2::new(x - width / 4.0, GROUND_LEVEL - height / 2.0),
            Vec2::new(x, GROUND_LEVEL - height),
            Vec2::new(x + width / 4.0, GROUND_LEVEL - height / 2.0),
            palette.mountain_far_light,
        );
    }
    out
}

fn build_mid_mountains(palette: &Palette, rng: &mut Pcg32) -> Vec<Vertex> {
    let mut out = Vec::new();
    for _ in 0..14 {
        let width = rng.random_range(150.0..300.0);
        let height = rng.random_range(80.0..150.0);
        let x = rng.random_range(0.0..LAYER_WIDTH);

        shapes::triangle(
            &mut out,
            Vec2::new(x - width / 2.0, GROUND_LEVEL),
            Vec2::new(x, GROUND_LEVEL - height),
            Vec2::new(x + width / 2.0, GROUND_LEVEL),
            palette.mountain_mid,
        );
        for _ in 0..3 {
            let tx = x + rng.random_range(-width / 3.0..width / 3.0);
            let ty = GROUND_LEVEL - rng.random_range(10.0..height - 10.0);
            let size = rng.random_range(5.0..15.0);
            shapes::circle(
                &mut out,
                Vec2::new(tx, ty),
                size,
                palette.mountain_mid_light,
                8,
            );
        }
    }
    out
}

/// A stack of shrinking triangles reads as a pine silhouette
fn pine_tree(out: &mut Vec<Vertex>, x: f32, height: f32, tiers: u32, color: [f32; 4]) {
    let tier_height = height / tiers as f32;
    let base_width = height / 1.5;
    for j in 0..tiers {
        let size = base_width - j as f32 * (base_width / (tiers as f32 + 1.0));
        let y = GROUND_LEVEL - tier_height * (j + 1) as f32;
        shapes::triangle(
            out,
            Vec2::new(x, y - tier_height),
            Vec2::new(x - size / 2.0, y),
            Vec2::new(x + size / 2.0, y),
            color,
        );
    }
}

fn build_forest(palette: &Palette, rng: &mut Pcg32) -> Vec<Vertex> {
    let mut out = Vec::new();
    let spacing = LAYER_WIDTH / 40.0;
    for i in 0..80 {
        let x = i as f32 * spacing;
        let height = rng.random_range(70.0..130.0);
        pine_tree(&mut out, x, height, 3, palette.forest);
    }
    out
}

fn build_foreground(palette: &Palette, rng: &mut Pcg32) -> Vec<Vertex> {
    let mut out = Vec::new();
    for _ in 0..30 {
        let x = rng.random_range(0.0..LAYER_WIDTH);
        let height = rng.random_range(120.0..200.0);
        pine_tree(&mut out, x, height, 4, palette.foreground);

        for _ in 0..3 {
            let bx = x + rng.random_range(-height / 4.5..height / 4.5);
            let by = GROUND_LEVEL - rng.random_range(20.0..height - 20.0);
            let size = rng.random_range(10.0..25.0);
            shapes::circle(&mut out, Vec2::new(bx, by), size, palette.foreground, 8);
        }
    }

    // Low mist banks hugging the ground
    for _ in 0..20 {
        let center = Vec2::new(
            rng.random_range(0.0..LAYER_WIDTH),
            rng.random_range(GROUND_LEVEL - 100.0..GROUND_LEVEL - 10.0),
        );
        let radii = Vec2::new(rng.random_range(50.0..150.0), rng.random_range(10.0..30.0));
        shapes::ellipse(&mut out, center, radii, palette.mist, 10);
    }
    out
}

fn build_cloud(palette: &Palette, rng: &mut Pcg32) -> Cloud {
    let width = rng.random_range(80.0..150.0);
    let height = rng.random_range(40.0..70.0);
    let mut vertices = Vec::new();

    for i in 0..3 {
        let color = if rng.random_range(0.0..1.0) > 0.4 {
            palette.cloud_light
        } else {
            palette.cloud_dark
        };
        let cx = width * (0.25 + 0.25 * i as f32);
        let cy = height * rng.random_range(0.3..0.6);
        shapes::ellipse(
            &mut vertices,
            Vec2::new(cx, cy),
            Vec2::new(
                rng.random_range(width * 0.2..width * 0.4),
                rng.random_range(height * 0.25..height * 0.45),
            ),
            color,
            10,
        );
    }
    for _ in 0..7 {
        let pos = Vec2::new(
            rng.random_range(10.0..width - 10.0),
            rng.random_range(5.0..height - 10.0),
        );
        let radius = rng.random_range(8.0..18.0);
        let color = if pos.y < height / 2.0 {
            palette.cloud_light
        } else {
            palette.cloud_dark
        };
        shapes::circle(&mut vertices, pos, radius, color, 8);
    }

    Cloud {
        vertices,
        pos: Vec2::new(
            rng.random_range(0.0..SCREEN_WIDTH),
            rng.random_range(20.0..GROUND_LEVEL - 250.0),
        ),
        width,
        speed: rng.random_range(18.0..48.0),
    }
}

/// Dirt body, grass lip, and scattered texture for the ground strip
fn build_ground(rng: &mut Pcg32) -> Vec<Vertex> {
    use crate::renderer::vertex::colors;
    let mut out = Vec::new();

    shapes::rect(
        &mut out,
        Vec2::new(0.0, GROUND_LEVEL),
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT - GROUND_LEVEL),
        colors::DIRT,
    );
    shapes::rect(
        &mut out,
        Vec2::new(0.0, GROUND_LEVEL),
        Vec2::new(SCREEN_WIDTH, 15.0),
        colors::GRASS,
    );

    // Grass blades along the lip
    let mut x = 0.0;
    while x < SCREEN_WIDTH {
        let height = rng.random_range(2.0..8.0);
        let roll = rng.random_range(0.0..1.0);
        let color = if roll < 0.2 {
            colors::GRASS_DARK
        } else if roll < 0.7 {
            colors::GRASS
        } else {
            colors::GRASS_LIGHT
        };
        shapes::line(
            &mut out,
            Vec2::new(x, GROUND_LEVEL),
            Vec2::new(x, GROUND_LEVEL - height),
            1.5,
            color,
        );
        x += 4.0;
    }

    // Lighter/darker grass patches
    for _ in 0..40 {
        let center = Vec2::new(
            rng.random_range(0.0..SCREEN_WIDTH),
            GROUND_LEVEL + rng.random_range(2.0..12.0),
        );
        let radii = Vec2::new(rng.random_range(10.0..25.0), rng.random_range(2.0..4.0));
        let color = if rng.random_range(0.0..1.0) < 0.5 {
            colors::GRASS_LIGHT
        } else {
            colors::GRASS_DARK
        };
        shapes::ellipse(&mut out, center, radii, color, 8);
    }

    // Dirt speckle and small rocks
    for _ in 0..120 {
        let pos = Vec2::new(
            rng.random_range(0.0..SCREEN_WIDTH),
            rng.random_range(GROUND_LEVEL + 15.0..SCREEN_HEIGHT - 2.0),
        );
        let variation = rng.random_range(-0.06..0.06);
        let color = [
            (colors::DIRT[0] + variation).clamp(0.0, 1.0),
            (colors::DIRT[1] + variation / 2.0).clamp(0.0, 1.0),
            (colors::DIRT[2] + variation / 2.0).clamp(0.0, 1.0),
            1.0,
        ];
        shapes::circle(&mut out, pos, rng.random_range(1.0..4.0), color, 6);
    }
    for _ in 0..20 {
        let pos = Vec2::new(
            rng.random_range(0.0..SCREEN_WIDTH - 10.0),
            rng.random_range(GROUND_LEVEL + 20.0..SCREEN_HEIGHT - 10.0),
        );
        let grey = rng.random_range(0.40..0.55);
        shapes::circle(
            &mut out,
            pos,
            rng.random_range(2.0..5.0),
            [grey, grey, grey, 1.0],
            6,
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_seeded() {
        let a = Background::new(77, Theme::BlueDusk);
        let b = Background::new(77, Theme::BlueDusk);
        assert_eq!(a.layers.len(), b.layers.len());
        for (la, lb) in a.layers.iter().zip(&b.layers) {
            assert_eq!(la.vertices.len(), lb.vertices.len());
            assert_eq!(la.vertices[0].position, lb.vertices[0].position);
        }
    }

    #[test]
    fn test_theme_cycle_wraps() {
        let mut theme = Theme::BlueDusk;
        for _ in 0..3 {
            theme = theme.next();
        }
        assert_eq!(theme, Theme::BlueDusk);
    }

    #[test]
    fn test_layers_wrap_scroll() {
        let mut bg = Background::new(5, Theme::Sunset);
        for _ in 0..100_000 {
            bg.update(1.0 / 60.0);
        }
        for layer in &bg.layers {
            assert!(layer.scroll <= 0.0);
            assert!(layer.scroll > -LAYER_WIDTH);
        }
    }
}
