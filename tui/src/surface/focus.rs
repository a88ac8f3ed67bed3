//! Directional Focus Navigation
//!
//! There is no adjacency graph: on every arrow key the best target is
//! recomputed from the bounding boxes of the focusable components.
//!
//! # Scoring
//!
//! The source point is the focused box's edge facing the move; each
//! candidate contributes its edge facing back. Candidates behind the source
//! on the primary axis, or further than the cone half-angle off-axis, are
//! dropped. The rest score
//!
//! ```text
//! (distance² / max_distance²)^exponent × (bias + angle/π)
//! ```
//!
//! and the lowest score wins, first one on ties. Horizontal coordinates are
//! scaled by the cell aspect ratio first so visual distance decides.

use std::f32::consts::{FRAC_PI_2, PI};

use super::component::Component;
use crate::geometry::{Aabb, Direction, Point};

/// Weighting constants of the score
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusTuning {
    pub distance_exponent: f32,
    /// Full cone width in degrees; candidates past half of it are dropped
    pub cone_degrees: f32,
    pub angle_bias: f32,
}

pub const DEFAULT_TUNING: FocusTuning = FocusTuning {
    distance_exponent: 1.5,
    cone_degrees: 110.0,
    angle_bias: 0.5,
};

fn edge_point(area: &Aabb, dir: Direction, pixel_ratio: f32) -> Point {
    let p = area.edge(dir);
    Point {
        x: p.x * pixel_ratio,
        y: p.y,
    }
}

fn distance_sq(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Index of the component focus should move to, if any
#[must_use]
pub fn find_best_component(
    components: &[Component],
    focused: usize,
    dir: Direction,
    pixel_ratio: f32,
) -> Option<usize> {
    find_best_component_with(components, focused, dir, pixel_ratio, DEFAULT_TUNING)
}

#[must_use]
pub fn find_best_component_with(
    components: &[Component],
    focused: usize,
    dir: Direction,
    pixel_ratio: f32,
    tuning: FocusTuning,
) -> Option<usize> {
    let source = components.get(focused)?;
    let focusable: Vec<(usize, Aabb)> = components
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_focusable())
        .map(|(i, c)| (i, c.bounding_box()))
        .collect();

    let mut max_distance_sq = 0.0_f32;
    for (i, a) in &focusable {
        for (j, b) in &focusable {
            if i != j {
                let d = distance_sq(
                    edge_point(a, dir, pixel_ratio),
                    edge_point(b, dir.opposite(), pixel_ratio),
                );
                max_distance_sq = max_distance_sq.max(d);
            }
        }
    }

    let from = edge_point(&source.bounding_box(), dir, pixel_ratio);
    let mut best: Option<(usize, f32)> = None;
    for (index, area) in &focusable {
        if *index == focused {
            continue;
        }
        let to = edge_point(area, dir.opposite(), pixel_ratio);
        let Some(weight) = score(from, to, dir, max_distance_sq, tuning) else {
            continue;
        };
        if best.map_or(true, |(_, w)| weight < w) {
            best = Some((*index, weight));
        }
    }
    best.map(|(index, _)| index)
}

fn score(from: Point, to: Point, dir: Direction, max_distance_sq: f32, tuning: FocusTuning) -> Option<f32> {
    let behind = match dir {
        Direction::Left => from.x < to.x,
        Direction::Right => from.x > to.x,
        Direction::Up => from.y < to.y,
        Direction::Down => from.y > to.y,
    };
    if behind {
        return None;
    }

    let dx = from.x - to.x;
    let dy = from.y - to.y;
    let mut angle = dx.atan2(dy).abs();
    if dir.is_vertical() {
        angle = (FRAC_PI_2 - angle).abs();
    }
    angle = (angle - FRAC_PI_2).abs();
    if angle > tuning.cone_degrees * PI / 360.0 {
        return None;
    }

    let ratio = if max_distance_sq > 0.0 {
        distance_sq(from, to) / max_distance_sq
    } else {
        0.0
    };
    Some(ratio.powf(tuning.distance_exponent) * (tuning.angle_bias + angle / PI))
}
