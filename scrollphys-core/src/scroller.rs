//! Inertial deceleration after a finger lift (a "fling").

use alt_fp::FloatOrd;
use log::trace;

/// The "normal" per-millisecond deceleration rate, matching the typical
/// platform default for a non-fast fling.
pub const DECELERATION_RATE_NORMAL: f64 = 0.998;

/// The "fast" per-millisecond deceleration rate.
pub const DECELERATION_RATE_FAST: f64 = 0.99;

/// Below this velocity (points/second), a fling is considered stopped.
pub const STOP_VELOCITY: f64 = 0.5;

/// The result of evaluating a [`Scroller`] at some elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollerValue {
    /// The cumulative displacement since the fling began, in points.
    pub offset: f64,
    /// The instantaneous velocity, in points/second.
    pub velocity: f64,
    /// `true` once `|velocity| < `[`STOP_VELOCITY`]. Callers should treat
    /// this as terminal for the current fling.
    pub stopped: bool,
}

/// Models continuous exponential velocity decay following a finger lift.
///
/// A scroller is flung with an initial velocity and a deceleration rate,
/// and thereafter reports its trajectory as a pure function of elapsed
/// time: `velocity(t) = v0 * exp(alpha * t)`,
/// `offset(t) = v0 * (exp(alpha * t) - 1) / alpha`, where
/// `alpha = 1000 * ln(k)` is negative for any `k` in `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scroller {
    k: f64,
    alpha: f64,
    v0: f64,
}

impl Default for Scroller {
    fn default() -> Self {
        Self::new(DECELERATION_RATE_NORMAL)
    }
}

impl Scroller {
    /// Construct a scroller with the given per-millisecond deceleration
    /// rate. `k` must lie in `(0, 1)`; a value outside that range falls
    /// back to [`DECELERATION_RATE_NORMAL`] rather than producing a
    /// non-decaying or divergent trajectory.
    pub fn new(k: f64) -> Self {
        let k = clamp_rate(k);
        Scroller {
            k,
            alpha: alpha_for_rate(k),
            v0: 0.0,
        }
    }

    /// Change the deceleration rate used by future [`fling`](Self::fling)
    /// calls. Does not reset the scroller's current trajectory: an
    /// in-flight fling keeps decaying at its original rate until the next
    /// `fling()`.
    pub fn set_deceleration_rate(&mut self, k: f64) {
        let k = clamp_rate(k);
        self.k = k;
        self.alpha = alpha_for_rate(k);
    }

    /// Set the initial velocity and reset elapsed time to zero.
    ///
    /// A non-finite velocity is a no-op: the scroller remains in (or
    /// reverts to) the stopped state rather than propagating NaN or
    /// infinity into the trajectory.
    pub fn fling(&mut self, v0: f64) {
        if !v0.is_finite() {
            self.v0 = 0.0;
            return;
        }
        trace!("scroller: fling v0={:?} k={:?}", v0, self.k);
        self.v0 = v0;
    }

    /// Report the trajectory at elapsed seconds `t`. `t < 0` is clamped to
    /// `0`.
    pub fn value(&self, t: f64) -> ScrollerValue {
        let t = t.fmax(0.0);

        if self.v0 == 0.0 {
            return ScrollerValue {
                offset: 0.0,
                velocity: 0.0,
                stopped: true,
            };
        }

        let decay = (self.alpha * t).exp();
        let velocity = self.v0 * decay;
        let offset = self.v0 * (decay - 1.0) / self.alpha;
        let stopped = velocity.abs() < STOP_VELOCITY;

        if stopped {
            trace!("scroller: stopped at t={:?} offset={:?}", t, offset);
        }

        ScrollerValue {
            offset,
            velocity,
            stopped,
        }
    }

    /// Return to the no-motion state. The deceleration rate is preserved.
    pub fn reset(&mut self) {
        self.v0 = 0.0;
    }

    /// The deceleration rate currently in effect.
    pub fn deceleration_rate(&self) -> f64 {
        self.k
    }

    /// The limit of `offset(t)` as `t -> infinity`, i.e. `-v0 / alpha`.
    /// Finite for any valid scroller configuration.
    pub fn terminal_offset(&self) -> f64 {
        -self.v0 / self.alpha
    }
}

fn clamp_rate(k: f64) -> f64 {
    if !(k > 0.0 && k < 1.0) {
        DECELERATION_RATE_NORMAL
    } else {
        k
    }
}

fn alpha_for_rate(k: f64) -> f64 {
    1000.0 * k.ln()
}
