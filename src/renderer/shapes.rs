//! Shape generation for 2D primitives
//!
//! All generators append triangle-list vertices in logical screen
//! coordinates; the pipeline converts to NDC at upload time.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle from its top-left corner
pub fn rect(out: &mut Vec<Vertex>, top_left: Vec2, size: Vec2, color: [f32; 4]) {
    let (x0, y0) = (top_left.x, top_left.y);
    let (x1, y1) = (top_left.x + size.x, top_left.y + size.y);

    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));

    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y1, color));
    out.push(Vertex::new(x0, y1, color));
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Axis-stretched circle (for clouds and bushes)
pub fn ellipse(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radii: Vec2,
    color: [f32; 4],
    segments: u32,
) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }
}

/// Filled triangle
pub fn triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Thick line segment rendered as a quad
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));

    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(d.x, d.y, color));
}

/// Vertical gradient band: `top_color` at `y0` blending to `bottom_color` at `y1`
pub fn gradient_band(
    out: &mut Vec<Vertex>,
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
    top_color: [f32; 4],
    bottom_color: [f32; 4],
) {
    out.push(Vertex::new(x0, y0, top_color));
    out.push(Vertex::new(x1, y0, top_color));
    out.push(Vertex::new(x1, y1, bottom_color));

    out.push(Vertex::new(x0, y0, top_color));
    out.push(Vertex::new(x1, y1, bottom_color));
    out.push(Vertex::new(x0, y1, bottom_color));
}

/// Append `src` shifted by `offset` (used to scroll pre-built layers)
pub fn append_shifted(out: &mut Vec<Vertex>, src: &[Vertex], offset: Vec2) {
    out.extend(src.iter().map(|v| {
        Vertex::new(v.position[0] + offset.x, v.position[1] + offset.y, v.color)
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_emits_two_triangles() {
        let mut out = Vec::new();
        rect(&mut out, Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), [1.0; 4]);
        assert_eq!(out.len(), 6);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        assert!(xs.iter().all(|&x| (10.0..=40.0).contains(&x)));
        assert!(ys.iter().all(|&y| (20.0..=60.0).contains(&y)));
    }

    #[test]
    fn test_circle_vertex_count() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 5.0, [1.0; 4], 12);
        assert_eq!(out.len(), 36);
    }

    #[test]
    fn test_append_shifted_translates() {
        let mut layer = Vec::new();
        rect(&mut layer, Vec2::ZERO, Vec2::new(1.0, 1.0), [1.0; 4]);
        let mut out = Vec::new();
        append_shifted(&mut out, &layer, Vec2::new(100.0, -5.0));
        assert_eq!(out.len(), layer.len());
        assert_eq!(out[0].position, [100.0, -5.0]);
    }
}
