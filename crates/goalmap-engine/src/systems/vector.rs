//! Lyon-based tessellation of the map.
//!
//! Every paint call appends triangles to one flat vertex buffer
//! (`x, y, r, g, b, a` per vertex) that the host uploads and draws as a
//! plain triangle list in scene coordinates.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor, LineCap,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use crate::api::types::Color;

/// Tessellation tolerance in scene units.
const TOLERANCE: f32 = 0.5;
/// Rings are approximated with this many segments at most.
const MAX_RING_SEGMENTS: usize = 128;

/// Per-vertex data for vector rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(p: Vec2, c: Color) -> Self {
        Self {
            x: p.x,
            y: p.y,
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

struct FillVertexCtor {
    color: Color,
}

impl FillVertexConstructor<VectorVertex> for FillVertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        let p = vertex.position();
        VectorVertex::at(Vec2::new(p.x, p.y), self.color)
    }
}

struct StrokeVertexCtor {
    color: Color,
}

impl StrokeVertexConstructor<VectorVertex> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        let p = vertex.position();
        VectorVertex::at(Vec2::new(p.x, p.y), self.color)
    }
}

fn polygon_path(points: &[Vec2], closed: bool) -> Path {
    let mut builder = Path::builder();
    builder.begin(point(points[0].x, points[0].y));
    for p in &points[1..] {
        builder.line_to(point(p.x, p.y));
    }
    builder.end(closed);
    builder.build()
}

/// Points along a circular arc, angles in radians.
fn arc_points(center: Vec2, radius: f32, start: f32, sweep: f32) -> Vec<Vec2> {
    let full = (radius * TAU / 6.0).clamp(12.0, MAX_RING_SEGMENTS as f32);
    let steps = ((sweep.abs() / TAU) * full).ceil().max(2.0) as usize;
    (0..=steps)
        .map(|i| center + Vec2::from_angle(start + sweep * i as f32 / steps as f32) * radius)
        .collect()
}

/// Tessellators plus the output vertex buffer.
/// Cleared each frame and refilled by the paint pass.
pub struct VectorCanvas {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
}

impl VectorCanvas {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(65536 * VectorVertex::FLOATS),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// The flat float buffer (6 floats per vertex).
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Raw pointer to the flat float buffer, for zero-copy reads from JS.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    /// Flush indexed geometry to the flat buffer as triangle list.
    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn push_triangle(&mut self, a: VectorVertex, b: VectorVertex, c: VectorVertex) {
        for v in [a, b, c] {
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
    }

    pub fn fill_path(&mut self, path: &Path, color: Color) {
        if color.a <= 0.0 {
            return;
        }
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, FillVertexCtor { color }),
        );
        if result.is_ok() {
            self.flush_geometry();
        } else {
            self.geometry.vertices.clear();
            self.geometry.indices.clear();
        }
    }

    pub fn stroke_path(&mut self, path: &Path, width: f32, color: Color) {
        if color.a <= 0.0 || width <= 0.0 {
            return;
        }
        let options = StrokeOptions::tolerance(TOLERANCE)
            .with_line_width(width)
            .with_line_cap(LineCap::Round);
        let result = self.stroke_tess.tessellate_path(
            path,
            &options,
            &mut BuffersBuilder::new(&mut self.geometry, StrokeVertexCtor { color }),
        );
        if result.is_ok() {
            self.flush_geometry();
        } else {
            self.geometry.vertices.clear();
            self.geometry.indices.clear();
        }
    }

    /// Fill a closed polygon (convex or concave).
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        self.fill_path(&polygon_path(points, true), color);
    }

    /// Fill a polygon placed at `offset` and scaled by `scale` around it.
    pub fn fill_polygon_at(&mut self, points: &[Vec2], offset: Vec2, scale: f32, color: Color) {
        let placed: Vec<Vec2> = points.iter().map(|p| offset + *p * scale).collect();
        self.fill_polygon(&placed, color);
    }

    pub fn fill_rect(&mut self, pos: Vec2, width: f32, height: f32, color: Color) {
        let points = [
            pos,
            Vec2::new(pos.x + width, pos.y),
            Vec2::new(pos.x + width, pos.y + height),
            Vec2::new(pos.x, pos.y + height),
        ];
        self.fill_polygon(&points, color);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        self.fill_path(&builder.build(), color);
    }

    pub fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        if radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_ellipse(
            point(center.x, center.y),
            lyon::math::vector(radii.x, radii.y),
            lyon::math::Angle::radians(0.0),
            Winding::Positive,
        );
        self.fill_path(&builder.build(), color);
    }

    pub fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Color) {
        if points.len() < 3 {
            return;
        }
        self.stroke_path(&polygon_path(points, true), width, color);
    }

    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color) {
        self.stroke_path(&polygon_path(&[a, b], false), width, color);
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        self.stroke_path(&builder.build(), width, color);
    }

    /// Stroke an arc. Angles in degrees, 0 pointing right, positive sweeping
    /// clockwise on a y-down screen.
    pub fn stroke_arc(&mut self, center: Vec2, radius: f32, start_deg: f32, sweep_deg: f32, width: f32, color: Color) {
        if radius <= 0.0 || sweep_deg == 0.0 {
            return;
        }
        let points = arc_points(center, radius, start_deg.to_radians(), sweep_deg.to_radians());
        self.stroke_path(&polygon_path(&points, false), width, color);
    }

    /// Dashed circle. `offset` shifts the pattern along the circumference
    /// (negative values march the dashes forward).
    pub fn stroke_dashed_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        width: f32,
        dash: f32,
        gap: f32,
        offset: f32,
        color: Color,
    ) {
        let period = dash + gap;
        if radius <= 0.0 || dash <= 0.0 || period <= 0.0 {
            return;
        }
        let circumference = radius * TAU;
        let mut s = -offset.rem_euclid(period);
        while s < circumference {
            let from = s.max(0.0);
            let to = (s + dash).min(circumference);
            if to > from {
                let points = arc_points(center, radius, from / radius, (to - from) / radius);
                self.stroke_path(&polygon_path(&points, false), width, color);
            }
            s += period;
        }
    }

    /// Radial gradient over an (optionally rotated) ellipse. `stops` are
    /// `(fraction of radius, color)` pairs in ascending order; colors are
    /// interpolated per vertex, the area inside the first stop uses its color.
    pub fn fill_radial_gradient(&mut self, center: Vec2, radii: Vec2, rotation_deg: f32, stops: &[(f32, Color)]) {
        if stops.is_empty() || radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        let segments = (radii.max_element() * TAU / 8.0).clamp(24.0, MAX_RING_SEGMENTS as f32) as usize;
        let rot = Vec2::from_angle(rotation_deg.to_radians());
        let ring = |t: f32, i: usize| -> Vec2 {
            let dir = Vec2::from_angle(TAU * i as f32 / segments as f32);
            center + rot.rotate(dir * radii * t)
        };

        let (t0, c0) = stops[0];
        if t0 > 0.0 && c0.a > 0.0 {
            for i in 0..segments {
                self.push_triangle(
                    VectorVertex::at(center, c0),
                    VectorVertex::at(ring(t0, i), c0),
                    VectorVertex::at(ring(t0, i + 1), c0),
                );
            }
        }
        for pair in stops.windows(2) {
            let ((ti, ci), (to, co)) = (pair[0], pair[1]);
            if to <= ti || (ci.a <= 0.0 && co.a <= 0.0) {
                continue;
            }
            for i in 0..segments {
                let (a, b) = (VectorVertex::at(ring(ti, i), ci), VectorVertex::at(ring(ti, i + 1), ci));
                let (c, d) = (VectorVertex::at(ring(to, i), co), VectorVertex::at(ring(to, i + 1), co));
                self.push_triangle(a, c, b);
                self.push_triangle(b, c, d);
            }
        }
    }
}

impl Default for VectorCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn vector_vertex_is_24_bytes() {
        assert_eq!(size_of::<VectorVertex>(), 24);
        assert_eq!(VectorVertex::STRIDE_BYTES, 24);
    }

    #[test]
    fn fill_polygon_triangle() {
        let mut canvas = VectorCanvas::new();
        canvas.fill_polygon(&[Vec2::ZERO, Vec2::new(100.0, 0.0), Vec2::new(50.0, 100.0)], Color::WHITE);
        assert_eq!(canvas.vertex_count(), 3);
    }

    #[test]
    fn transparent_draws_nothing() {
        let mut canvas = VectorCanvas::new();
        canvas.fill_circle(Vec2::ZERO, 10.0, Color::TRANSPARENT);
        canvas.stroke_circle(Vec2::ZERO, 10.0, 2.0, Color::WHITE.with_alpha(0.0));
        assert_eq!(canvas.vertex_count(), 0);
    }

    #[test]
    fn degenerate_shapes_draw_nothing() {
        let mut canvas = VectorCanvas::new();
        canvas.fill_polygon(&[Vec2::ZERO, Vec2::ONE], Color::WHITE);
        canvas.fill_circle(Vec2::ZERO, 0.0, Color::WHITE);
        canvas.stroke_arc(Vec2::ZERO, 10.0, 0.0, 0.0, 2.0, Color::WHITE);
        canvas.stroke_dashed_circle(Vec2::ZERO, 10.0, 2.0, 0.0, 5.0, 0.0, Color::WHITE);
        assert_eq!(canvas.vertex_count(), 0);
    }

    #[test]
    fn dashes_leave_gaps() {
        let mut solid = VectorCanvas::new();
        solid.stroke_circle(Vec2::ZERO, 100.0, 2.0, Color::WHITE);
        let mut dashed = VectorCanvas::new();
        dashed.stroke_dashed_circle(Vec2::ZERO, 100.0, 2.0, 10.0, 20.0, -3.0, Color::WHITE);
        assert!(dashed.vertex_count() > 0);

        let xs: Vec<Vec2> = dashed
            .buffer()
            .chunks(VectorVertex::FLOATS)
            .map(|v| Vec2::new(v[0], v[1]))
            .collect();
        assert!(xs.iter().all(|p| (p.length() - 100.0).abs() < 3.0));
    }

    #[test]
    fn gradient_interpolates_colors() {
        let mut canvas = VectorCanvas::new();
        canvas.fill_radial_gradient(
            Vec2::ZERO,
            Vec2::splat(50.0),
            0.0,
            &[(0.0, Color::WHITE), (1.0, Color::TRANSPARENT)],
        );
        assert!(canvas.vertex_count() > 0);
        assert_eq!(canvas.vertex_count() % 3, 0);
        let alphas: Vec<f32> = canvas.buffer().chunks(VectorVertex::FLOATS).map(|v| v[5]).collect();
        assert!(alphas.contains(&1.0));
        assert!(alphas.contains(&0.0));
    }

    #[test]
    fn clear_resets_buffer() {
        let mut canvas = VectorCanvas::new();
        canvas.fill_rect(Vec2::ZERO, 100.0, 50.0, Color::BLACK);
        assert_eq!(canvas.vertex_count(), 6);
        canvas.clear();
        assert_eq!(canvas.vertex_count(), 0);
    }
}
