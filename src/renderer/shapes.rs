//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in pixel coordinates.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Segment count for a circle of the given on-screen radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(6, 32)
}

fn push_tri(out: &mut Vec<Vertex>, a: (Vec2, [f32; 4]), b: (Vec2, [f32; 4]), c: (Vec2, [f32; 4])) {
    out.push(Vertex::new(a.0.x, a.0.y, a.1));
    out.push(Vertex::new(b.0.x, b.0.y, b.1));
    out.push(Vertex::new(c.0.x, c.0.y, c.1));
}

/// Quad with per-corner colors, corners in winding order
pub fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [[f32; 4]; 4]) {
    push_tri(
        out,
        (corners[0], colors[0]),
        (corners[1], colors[1]),
        (corners[2], colors[2]),
    );
    push_tri(
        out,
        (corners[0], colors[0]),
        (corners[2], colors[2]),
        (corners[3], colors[3]),
    );
}

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    gradient_rect(out, min, max, color, color);
}

/// Rectangle shaded from `top` to `bottom`
pub fn gradient_rect(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, top: [f32; 4], bottom: [f32; 4]) {
    quad(
        out,
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ],
        [top, top, bottom, bottom],
    );
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4]) {
    radial_glow(out, center, radius, color, color);
}

/// Circle shaded from `inner` at the center to `outer` at the rim.
/// With a transparent rim this is the soft radial-gradient glow.
pub fn radial_glow(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    inner: [f32; 4],
    outer: [f32; 4],
) {
    let segments = segments_for(radius);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        push_tri(
            out,
            (center, inner),
            (center + Vec2::from_angle(theta1) * radius, outer),
            (center + Vec2::from_angle(theta2) * radius, outer),
        );
    }
}

/// Hollow circle band
pub fn ring(out: &mut Vec<Vertex>, center: Vec2, inner_radius: f32, outer_radius: f32, color: [f32; 4]) {
    let segments = segments_for(outer_radius).max(24);
    for i in 0..segments {
        let d1 = Vec2::from_angle((i as f32 / segments as f32) * TAU);
        let d2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * TAU);
        quad(
            out,
            [
                center + d1 * inner_radius,
                center + d1 * outer_radius,
                center + d2 * outer_radius,
                center + d2 * inner_radius,
            ],
            [color; 4],
        );
    }
}

/// Thick line segment with per-end colors and widths
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, widths: (f32, f32), colors: ([f32; 4], [f32; 4])) {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = dir.perp();
    let (wa, wb) = (widths.0 * 0.5, widths.1 * 0.5);
    quad(
        out,
        [a + perp * wa, b + perp * wb, b - perp * wb, a - perp * wa],
        [colors.0, colors.1, colors.1, colors.0],
    );
}

/// Tapered streak through `points` (oldest first). Alpha and width grow
/// toward the newest point.
pub fn trail(out: &mut Vec<Vertex>, points: &[Vec2], head_width: f32, color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }
    let n = (points.len() - 1) as f32;
    for (i, seg) in points.windows(2).enumerate() {
        let t1 = i as f32 / n;
        let t2 = (i + 1) as f32 / n;
        let c1 = [color[0], color[1], color[2], color[3] * t1];
        let c2 = [color[0], color[1], color[2], color[3] * t2];
        line(
            out,
            seg[0],
            seg[1],
            (head_width * (0.3 + 0.7 * t1), head_width * (0.3 + 0.7 * t2)),
            (c1, c2),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_stays_within_radius() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::new(50.0, 50.0), 10.0, [1.0; 4]);
        assert_eq!(out.len() % 3, 0);
        assert_eq!(out.len() as u32, segments_for(10.0) * 3);
        for v in &out {
            let d = Vec2::from(v.position).distance(Vec2::new(50.0, 50.0));
            assert!(d <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_glow_rim_uses_outer_color() {
        let mut out = Vec::new();
        radial_glow(&mut out, Vec2::ZERO, 8.0, [1.0, 1.0, 1.0, 0.8], [1.0, 1.0, 1.0, 0.0]);
        for tri in out.chunks(3) {
            assert_eq!(tri[0].color[3], 0.8);
            assert_eq!(tri[1].color[3], 0.0);
            assert_eq!(tri[2].color[3], 0.0);
        }
    }

    #[test]
    fn test_degenerate_line_emits_nothing() {
        let mut out = Vec::new();
        line(&mut out, Vec2::ONE, Vec2::ONE, (2.0, 2.0), ([1.0; 4], [1.0; 4]));
        assert!(out.is_empty());
        trail(&mut out, &[Vec2::ZERO], 3.0, [1.0; 4]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_trail_fades_toward_oldest() {
        let mut out = Vec::new();
        let points = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0), Vec2::new(0.0, 20.0)];
        trail(&mut out, &points, 4.0, [1.0, 0.5, 0.2, 1.0]);
        assert_eq!(out.len(), 2 * 6);
        // Oldest end is fully transparent, newest end fully opaque
        assert_eq!(out[0].color[3], 0.0);
        assert!(out.iter().any(|v| v.color[3] == 1.0));
    }

    #[test]
    fn test_gradient_rect_colors() {
        let mut out = Vec::new();
        gradient_rect(&mut out, Vec2::ZERO, Vec2::new(10.0, 20.0), [1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(out.len(), 6);
        for v in &out {
            if v.position[1] == 0.0 {
                assert_eq!(v.color[0], 1.0);
            } else {
                assert_eq!(v.color[2], 1.0);
            }
        }
    }
}
