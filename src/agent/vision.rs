//! Ray-cast vision features for the controller
//!
//! Rays are cast from the head, relative to the heading: ray 0 points
//! straight ahead and the rest follow clockwise. Each ray contributes three
//! values:
//! - 0: `1/d` to the wall (or grid edge) that ends the ray
//! - 1: body hit along the ray (see [`VisionType`])
//! - 2: apple hit along the ray (see [`VisionType`])
//!
//! After the rays come the heading one-hot (4 values) and the tail
//! direction one-hot (4 values), both in `Direction` index order.

use super::config::{VisionMode, VisionType};
use crate::error::Result;
use crate::game::{Direction, Grid, Item, Position};

/// Values per ray: wall, body, apple
pub const FEATURES_PER_RAY: usize = 3;

/// Heading one-hot plus tail-direction one-hot
pub const DIRECTION_FEATURES: usize = 8;

/// Ray steps clockwise from Up, for the sixteen-ray mode. The other modes
/// take every second or fourth entry.
const RAY_STEPS: [(i32, i32); 16] = [
    (-1, 0),
    (-2, 1),
    (-1, 1),
    (-1, 2),
    (0, 1),
    (1, 2),
    (1, 1),
    (2, 1),
    (1, 0),
    (2, -1),
    (1, -1),
    (1, -2),
    (0, -1),
    (-1, -2),
    (-1, -1),
    (-2, -1),
];

/// What one ray saw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Step per probe, as (d_row, d_col)
    pub step: (i32, i32),
    /// Last in-grid cell probed, where the ray stopped
    pub end: Position,
    /// Encoded wall, body and apple values
    pub values: [f32; FEATURES_PER_RAY],
}

/// The result of one encoding: per-ray details and the flat feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct Vision {
    pub rays: Vec<Ray>,
    pub features: Vec<f32>,
}

/// Turns a snake's pose on a grid into the controller's input vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisionEncoder {
    mode: VisionMode,
    vision_type: VisionType,
}

impl VisionEncoder {
    pub fn new(mode: VisionMode, vision_type: VisionType) -> Self {
        Self { mode, vision_type }
    }

    pub fn mode(&self) -> VisionMode {
        self.mode
    }

    /// Length of every vector this encoder produces
    pub fn input_len(&self) -> usize {
        self.mode.num_rays() * FEATURES_PER_RAY + DIRECTION_FEATURES
    }

    /// Ray steps for a heading, straight ahead first, then clockwise
    pub fn ray_steps(&self, heading: Direction) -> Vec<(i32, i32)> {
        let num_rays = self.mode.num_rays();
        let stride = RAY_STEPS.len() / num_rays;
        let offset = heading.index() * num_rays / 4;
        (0..num_rays)
            .map(|i| RAY_STEPS[((offset + i) % num_rays) * stride])
            .collect()
    }

    /// Encode a pose. `body` is head first and must not be empty.
    pub fn encode(&self, grid: &Grid, body: &[Position], heading: Direction) -> Result<Vision> {
        let head = body.first().copied().unwrap_or(Position::new(0, 0));
        let mut rays = Vec::with_capacity(self.mode.num_rays());
        let mut features = Vec::with_capacity(self.input_len());

        for step in self.ray_steps(heading) {
            let ray = self.cast(grid, head, step)?;
            features.extend_from_slice(&ray.values);
            rays.push(ray);
        }

        features.extend(one_hot(heading));
        features.extend(one_hot(tail_direction(body, heading)));

        Ok(Vision { rays, features })
    }

    fn cast(&self, grid: &Grid, head: Position, step: (i32, i32)) -> Result<Ray> {
        let mut body_at = None;
        let mut apple_at = None;
        let mut end = head;
        let mut distance = 1;

        loop {
            let probe = head.moved_by(step.0 * distance, step.1 * distance);
            if !grid.contains(probe) {
                break;
            }
            end = probe;
            match grid.get(probe)? {
                Item::Wall => break,
                Item::Body => {
                    body_at.get_or_insert(distance);
                }
                Item::Apple => {
                    apple_at.get_or_insert(distance);
                }
                Item::Empty => {}
            }
            distance += 1;
        }

        let wall = 1.0 / distance as f32;
        Ok(Ray {
            step,
            end,
            values: [wall, self.signal(body_at), self.signal(apple_at)],
        })
    }

    fn signal(&self, hit: Option<i32>) -> f32 {
        match (hit, self.vision_type) {
            (None, _) => 0.0,
            (Some(_), VisionType::Binary) => 1.0,
            (Some(distance), VisionType::Distance) => 1.0 / distance as f32,
        }
    }
}

fn one_hot(direction: Direction) -> [f32; 4] {
    let mut values = [0.0; 4];
    values[direction.index()] = 1.0;
    values
}

/// Direction the tail segment moves in; the heading for a length-1 body
fn tail_direction(body: &[Position], heading: Direction) -> Direction {
    match body {
        [.., before, tail] => {
            Direction::from_delta(before.row - tail.row, before.col - tail.col).unwrap_or(heading)
        }
        _ => heading,
    }
}
