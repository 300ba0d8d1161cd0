//! A critically-damped spring that returns an overshot offset to rest.

use alt_fp::FloatOrd;
use log::trace;
use std::f64::consts::PI;

/// The default response (seconds) used by [`SpringBack::absorb`] when no
/// explicit response is given.
pub const DEFAULT_RESPONSE: f64 = 0.575;

/// Position threshold below which the spring-back is considered settled,
/// in points.
pub const EPSILON_POSITION: f64 = 0.1;

/// Velocity threshold below which the spring-back is considered settled,
/// in points/second.
pub const EPSILON_VELOCITY: f64 = 1.0;

/// Hard ceiling on elapsed time, in seconds, past which the spring-back
/// reports stopped regardless of the epsilon thresholds. A safety fuse for
/// pathological initial conditions (e.g. a very long response paired with
/// an initial velocity pointing away from rest).
pub const MAX_DURATION: f64 = 10.0;

/// The result of evaluating a [`SpringBack`] at some elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringBackValue {
    /// The signed residual displacement from rest, in points.
    pub offset: f64,
    /// `true` once the system has settled (or the safety fuse expired).
    pub stopped: bool,
}

/// A critically-damped second-order system: `x'' + 2*omega*x' + omega^2*x
/// = 0`, with `omega = 2*pi / response`.
///
/// Given an initial distance from rest and an initial velocity, the
/// closed-form solution is `x(t) = (distance + (velocity + omega*distance)
/// * t) * exp(-omega*t)`. If the initial velocity points away from rest
/// (same sign as `distance`), the system first overshoots further before
/// decaying back. This is the physically correct behavior and is not
/// short-circuited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringBack {
    distance: f64,
    velocity: f64,
    omega: f64,
}

impl Default for SpringBack {
    fn default() -> Self {
        Self::new()
    }
}

impl SpringBack {
    /// The quiescent state: zero distance, zero velocity.
    pub fn new() -> Self {
        SpringBack {
            distance: 0.0,
            velocity: 0.0,
            omega: 2.0 * PI / DEFAULT_RESPONSE,
        }
    }

    /// Initialize with the default response (`0.575` s).
    pub fn absorb(&mut self, velocity: f64, distance: f64) {
        self.absorb_with_response(velocity, distance, DEFAULT_RESPONSE);
    }

    /// Initialize with an explicit response, in seconds. A non-positive
    /// response falls back to [`DEFAULT_RESPONSE`] rather than producing
    /// a zero or negative `omega`.
    pub fn absorb_with_response(&mut self, velocity: f64, distance: f64, response: f64) {
        let response = if response > 0.0 {
            response
        } else {
            DEFAULT_RESPONSE
        };
        let distance = if distance.is_finite() { distance } else { 0.0 };
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };

        trace!(
            "spring_back: absorb velocity={:?} distance={:?} response={:?}",
            velocity,
            distance,
            response
        );

        self.distance = distance;
        self.velocity = velocity;
        self.omega = 2.0 * PI / response;
    }

    /// Report the signed residual offset at elapsed seconds `t`. `t < 0`
    /// is clamped to `0`.
    pub fn value(&self, t: f64) -> SpringBackValue {
        let t = t.fmax(0.0);

        if self.distance == 0.0 && self.velocity == 0.0 {
            return SpringBackValue {
                offset: 0.0,
                stopped: true,
            };
        }

        let decay = (-self.omega * t).exp();
        let b = self.velocity + self.omega * self.distance;
        let offset = (self.distance + b * t) * decay;
        let velocity_now = (b - self.omega * self.distance - self.omega * b * t) * decay;

        let settled =
            offset.abs() < EPSILON_POSITION && velocity_now.abs() < EPSILON_VELOCITY;
        let fused = t >= MAX_DURATION;
        let stopped = settled || fused;

        if stopped {
            trace!(
                "spring_back: stopped at t={:?} offset={:?} ({})",
                t,
                offset,
                if fused { "safety fuse" } else { "settled" }
            );
        }

        SpringBackValue { offset, stopped }
    }

    /// Return to the quiescent state.
    pub fn reset(&mut self) {
        self.distance = 0.0;
        self.velocity = 0.0;
        self.omega = 2.0 * PI / DEFAULT_RESPONSE;
    }
}
