/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use core::fmt;

use super::Vector2;

/// Orientation tests treat cross products below this magnitude as collinear,
/// so shared vertices between polygon rings do not flip the predicate sign.
const ORIENT_EPSILON: f64 = 1e-12;

/// A directed segment between two points of the focal plane, in millimeters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub a: Vector2,
    pub b: Vector2,
}

impl Segment {
    pub fn new(a: Vector2, b: Vector2) -> Self {
        Self { a, b }
    }

    /// Sign of the area of the triangle (a, b, p): positive when p lies on
    /// the left of a->b, negative on the right, zero within tolerance when
    /// the three points are collinear.
    fn orient(&self, p: &Vector2) -> f64 {
        let d = (self.b - self.a).perp(&(p - self.a));
        if d.abs() <= ORIENT_EPSILON {
            0.0
        } else {
            d
        }
    }

    /// Returns whether p, already known to be collinear with this segment,
    /// lies within its bounding box.
    fn on_collinear(&self, p: &Vector2) -> bool {
        p.x >= self.a.x.min(self.b.x) - ORIENT_EPSILON
            && p.x <= self.a.x.max(self.b.x) + ORIENT_EPSILON
            && p.y >= self.a.y.min(self.b.y) - ORIENT_EPSILON
            && p.y <= self.a.y.max(self.b.y) + ORIENT_EPSILON
    }

    /// Returns whether the two segments share at least one point. A touch
    /// (shared endpoint, endpoint on the interior of the other segment)
    /// counts as an intersection.
    pub fn intersects(&self, other: &Segment) -> bool {
        let d1 = other.orient(&self.a);
        let d2 = other.orient(&self.b);
        let d3 = self.orient(&other.a);
        let d4 = self.orient(&other.b);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
        {
            return true;
        }

        (d1 == 0.0 && other.on_collinear(&self.a))
            || (d2 == 0.0 && other.on_collinear(&self.b))
            || (d3 == 0.0 && self.on_collinear(&other.a))
            || (d4 == 0.0 && self.on_collinear(&other.b))
    }
}

/// A closed polygon on the focal plane: an ordered ring of vertices (each
/// consecutive pair forms an edge, and the last vertex connects back to the
/// first) plus a pivot point carried through every rigid motion.
///
/// Rotations take a precomputed `(cos, sin)` pair rather than an angle, so a
/// caller rotating several shapes by the same angle pays for the trig once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    vertices: Vec<Vector2>,
    pivot: Vector2,
}

impl Shape {
    /// Builds a polygon from its vertex ring, with the pivot at the origin.
    pub fn new(vertices: Vec<Vector2>) -> Self {
        Self {
            vertices,
            pivot: Vector2::zeros(),
        }
    }

    /// Builds a polygon from its vertex ring and an explicit pivot.
    pub fn with_pivot(vertices: Vec<Vector2>, pivot: Vector2) -> Self {
        Self { vertices, pivot }
    }

    /// An axis-aligned rectangle covering `[x0, x1] x [y0, y1]`, pivot at the origin.
    pub fn rectangle(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self::new(vec![
            Vector2::new(x0, y0),
            Vector2::new(x1, y0),
            Vector2::new(x1, y1),
            Vector2::new(x0, y1),
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vector2] {
        &self.vertices
    }

    pub fn pivot(&self) -> Vector2 {
        self.pivot
    }

    /// Iterates over the edges of the ring, including the closing edge.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Rigid translation of every vertex and of the pivot.
    pub fn translate(&mut self, delta: &Vector2) {
        for v in &mut self.vertices {
            *v += delta;
        }
        self.pivot += delta;
    }

    /// Rotates every vertex and the pivot about the origin.
    pub fn rotate_origin(&mut self, cos_sin: (f64, f64)) {
        let (c, s) = cos_sin;
        for v in &mut self.vertices {
            *v = Vector2::new(c * v.x - s * v.y, s * v.x + c * v.y);
        }
        let p = self.pivot;
        self.pivot = Vector2::new(c * p.x - s * p.y, s * p.x + c * p.y);
    }

    /// Rotates every vertex about the current pivot. The pivot itself is unchanged.
    pub fn rotate_pivot(&mut self, cos_sin: (f64, f64)) {
        let (c, s) = cos_sin;
        let p = self.pivot;
        for v in &mut self.vertices {
            let d = *v - p;
            *v = p + Vector2::new(c * d.x - s * d.y, s * d.x + c * d.y);
        }
    }

    /// Even-odd test for whether the point lies strictly inside the ring.
    /// Points on the boundary are resolved by the edge tests in
    /// [Shape::intersects], not here.
    pub fn contains(&self, p: &Vector2) -> bool {
        let mut inside = false;
        for seg in self.segments() {
            let (a, b) = (seg.a, seg.b);
            if (a.y > p.y) != (b.y > p.y)
                && p.x < a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y)
            {
                inside = !inside;
            }
        }
        inside
    }

    /// Returns whether the two polygons overlap: any edge of one crosses or
    /// touches an edge of the other, or one polygon swallows a vertex of the
    /// other whole. Zero-area contact counts as an overlap. Empty shapes
    /// overlap nothing.
    pub fn intersects(&self, other: &Shape) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        for sa in self.segments() {
            for sb in other.segments() {
                if sa.intersects(&sb) {
                    return true;
                }
            }
        }
        // No edge contact: either disjoint or fully nested.
        self.contains(&other.vertices[0]) || other.contains(&self.vertices[0])
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Shape[{} vertices, pivot ", self.vertices.len())?;
        write!(f, "({:.3}, {:.3})]", self.pivot.x, self.pivot.y)
    }
}
