//! Pointer-driven handle that anchors the chain.
//!
//! Raw pointer samples feed a velocity estimate and turn-snap detector. Each
//! tick the handle chases a look-ahead point with a distance-scaled
//! spring-damper, is speed-capped, and is partially snapped toward the
//! target so it never feels laggy.

use crate::float::Float;
use crate::vec::{Vec, Vec2};
use crate::constraint::Bounds;

const MIN_SAMPLE_DT: f64 = 1.0 / 240.0;
const MAX_SAMPLE_DT: f64 = 0.05;
const MAX_POINTER_SPEED: f32 = 3200.0;

const TURN_PREV_MIN_SPEED: f32 = 260.0;
const TURN_NEW_MIN_SPEED: f32 = 300.0;
const TURN_DOT_LIMIT: f32 = 0.42;
const TURN_SEVERITY_SCALE: f32 = 0.75;
const TURN_SEVERITY_MAX: f32 = 0.5;

const POINTER_DECAY: f32 = 0.84;
const TURN_SNAP_DECAY: f32 = 0.62;
const HANDLE_INSET: f32 = 12.0;

/// Links behind the anchor that share the turn-snap kick.
pub const SNAP_LINKS: usize = 3;

/// Output of one handle update.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HandleStep {
    /// Per-tick velocity kick for the first links when a turn-snap is active.
    pub snap_kick: Option<Vec2<f32>>,
}

#[derive(Clone, Debug)]
struct PointerState {
    pos: Vec2<f32>,
    vel: Vec2<f32>,
    last_sample: Option<f64>,
    turn_snap: f32,
    turn_dir: Vec2<f32>,
}

/// Converts pointer samples into the chain anchor's motion.
#[derive(Clone, Debug)]
pub struct HandleController {
    pointer: PointerState,
    pos: Vec2<f32>,
    vel: Vec2<f32>,
}

impl HandleController {
    pub fn new(pos: Vec2<f32>) -> Self {
        HandleController {
            pointer: PointerState {
                pos,
                vel: Vec2::zero(),
                last_sample: None,
                turn_snap: 0.0,
                turn_dir: Vec2::zero(),
            },
            pos,
            vel: Vec2::zero(),
        }
    }

    /// Feed a raw pointer sample taken at `timestamp` seconds.
    ///
    /// The first sample only seats the pointer.
    pub fn sample(&mut self, x: f32, y: f32, timestamp: f64, bounds: &Bounds<f32>) {
        let next = bounds.clamp_point(Vec2::new(x, y), 0.0);
        let Some(last) = self.pointer.last_sample else {
            self.pointer.pos = next;
            self.pointer.vel = Vec2::zero();
            self.pointer.last_sample = Some(timestamp);
            return;
        };

        let dt = (timestamp - last).clamp(MIN_SAMPLE_DT, MAX_SAMPLE_DT) as f32;
        let vel = (next - self.pointer.pos).scale(1.0 / dt).clamp_length(MAX_POINTER_SPEED);
        let speed = vel.length();
        let prev_vel = self.pointer.vel;
        let prev_speed = prev_vel.length();

        if prev_speed > TURN_PREV_MIN_SPEED && speed > TURN_NEW_MIN_SPEED {
            let dot = prev_vel.dot(vel) / (prev_speed * speed);
            if dot < TURN_DOT_LIMIT {
                let severity = ((TURN_DOT_LIMIT - dot) * TURN_SEVERITY_SCALE)
                    .clamp(0.0, TURN_SEVERITY_MAX);
                let to_target = next - self.pos;
                let len = to_target.length();
                self.pointer.turn_dir = if len > 0.0 { to_target.scale(1.0 / len) } else { to_target };
                self.pointer.turn_snap = self.pointer.turn_snap.max(severity);
                tracing::trace!(severity, dot, "turn-snap");
            }
        }

        self.pointer.pos = next;
        self.pointer.vel = vel;
        self.pointer.last_sample = Some(timestamp);
    }

    /// Advance the handle by `dt` seconds.
    pub fn update(&mut self, dt: f32, grip: f32, bounds: &Bounds<f32>) -> HandleStep {
        let frames = dt * 60.0;
        self.pointer.vel = self.pointer.vel.scale(POINTER_DECAY.powf(frames));
        self.pointer.turn_snap *= TURN_SNAP_DECAY.powf(frames);
        let snap = self.pointer.turn_snap;

        let pointer_speed = self.pointer.vel.length();
        let lead = (0.016 + pointer_speed / 56000.0) * grip;
        let target = bounds.clamp_point(self.pointer.pos + self.pointer.vel.scale(lead), 0.0);

        let delta = target - self.pos;
        let distance = delta.length();
        let snap_boost = 1.0 + snap * 1.18;
        let spring = (90.0 + (distance * 0.33).min(170.0)) * grip * snap_boost;
        let feed_forward = (0.22 + snap * 0.21) * grip;
        let damping = (0.71 - (grip - 1.0) * 0.08).clamp(0.61, 0.79).powf(frames);
        let max_speed = 2700.0 + (grip - 1.0) * 680.0 + snap * 420.0;

        self.vel = self.vel
            + delta.scale(spring * dt)
            + self.pointer.vel.scale(feed_forward * dt);
        self.vel = self.vel.scale(damping).clamp_length(max_speed);

        let catchup = ((0.024 + snap * 0.05) * grip * frames).clamp(0.0, 0.22);

        let mut step = HandleStep::default();
        if snap > 0.01 {
            let impulse = self.pointer.turn_dir.scale(snap * 26.0 * dt);
            self.vel = self.vel + impulse;
            step.snap_kick = Some(impulse.scale(dt));
        }

        self.pos = self.pos + delta.scale(catchup) + self.vel.scale(dt);
        self.pos = bounds.clamp_point(self.pos, HANDLE_INSET);
        step
    }

    /// Instantaneous change to the handle velocity (recoil).
    pub fn push(&mut self, delta_velocity: Vec2<f32>) {
        self.vel = self.vel + delta_velocity;
    }

    /// Keep the handle and pointer inside a resized arena.
    pub fn clamp_into(&mut self, bounds: &Bounds<f32>) {
        self.pos = bounds.clamp_point(self.pos, HANDLE_INSET);
        self.pointer.pos = bounds.clamp_point(self.pointer.pos, 0.0);
    }

    pub fn position(&self) -> Vec2<f32> {
        self.pos
    }

    /// Handle velocity in units per second.
    pub fn velocity(&self) -> Vec2<f32> {
        self.vel
    }

    pub fn pointer_position(&self) -> Vec2<f32> {
        self.pointer.pos
    }

    pub fn pointer_velocity(&self) -> Vec2<f32> {
        self.pointer.vel
    }

    pub fn turn_snap(&self) -> f32 {
        self.pointer.turn_snap
    }

    pub fn turn_direction(&self) -> Vec2<f32> {
        self.pointer.turn_dir
    }
}
