//! A pure, deterministic numerical core for fluid scroll-view physics.
//!
//! This crate models the three coupled behaviors that make a touch-driven
//! scroll surface feel physically grounded:
//!
//! - [`scroller`]: inertial deceleration after a finger lift (a "fling").
//! - [`spring_back`]: a critically-damped spring that returns an overshot
//!   offset to its resting position.
//! - [`rubber_band`]: the non-linear compression curve applied while
//!   content is dragged past its logical bounds.
//!
//! A fourth component, [`velocity_tracker`], estimates a release velocity
//! from a short trailing history of touch samples, for driving [`fling`] or
//! [`absorb`] with a physically plausible initial condition.
//!
//! Every operation here is a pure function of its inputs and the
//! component's own stored state: no I/O, no threads, no hidden randomness.
//! Given identical inputs, all operations produce bit-identical outputs
//! across calls. The driver (the view that owns touch handling, layout,
//! and rendering) is expected to call `value(t)` once per display-refresh
//! callback and translate the result into an on-screen offset; none of
//! that wiring lives in this crate.
//!
//! [`fling`]: crate::scroller::Scroller::fling
//! [`absorb`]: crate::spring_back::SpringBack::absorb

pub mod rubber_band;
pub mod scroller;
pub mod spring_back;
pub mod velocity_tracker;

pub use rubber_band::rubber_band;
pub use scroller::{Scroller, ScrollerValue, DECELERATION_RATE_FAST, DECELERATION_RATE_NORMAL};
pub use spring_back::{SpringBack, SpringBackValue, DEFAULT_RESPONSE};
pub use velocity_tracker::{approaching_halt, Sample, VelocityStrategy, VelocityTracker};

/// The prelude. Brings the four core types and the free functions into
/// scope without the module-qualified paths.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{
        approaching_halt, rubber_band, Scroller, ScrollerValue, SpringBack, SpringBackValue,
        VelocityStrategy, VelocityTracker,
    };
}
