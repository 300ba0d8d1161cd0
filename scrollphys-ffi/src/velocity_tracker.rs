use scrollphys_core::{VelocityStrategy, VelocityTracker};

/// Mirrors [`VelocityStrategy`] across the C ABI.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScrollphysVelocityStrategy {
    Recurrence = 0,
    Lsq2 = 1,
}

impl From<ScrollphysVelocityStrategy> for VelocityStrategy {
    fn from(s: ScrollphysVelocityStrategy) -> Self {
        match s {
            ScrollphysVelocityStrategy::Recurrence => VelocityStrategy::Recurrence,
            ScrollphysVelocityStrategy::Lsq2 => VelocityStrategy::Lsq2,
        }
    }
}

/// An opaque, heap-allocated handle for a [`VelocityTracker`]. Must be
/// released with [`scrollphys_velocity_tracker_free`].
pub struct ScrollphysVelocityTracker {
    inner: VelocityTracker,
}

/// Allocate a new tracker using the given strategy. The caller owns the
/// returned pointer and must eventually pass it to
/// [`scrollphys_velocity_tracker_free`].
#[no_mangle]
pub extern "C" fn scrollphys_velocity_tracker_new(
    strategy: ScrollphysVelocityStrategy,
) -> *mut ScrollphysVelocityTracker {
    Box::into_raw(Box::new(ScrollphysVelocityTracker {
        inner: VelocityTracker::new(strategy.into()),
    }))
}

/// Allocate a new tracker using the default strategy (`Recurrence`).
#[no_mangle]
pub extern "C" fn scrollphys_velocity_tracker_new_default() -> *mut ScrollphysVelocityTracker {
    scrollphys_velocity_tracker_new(ScrollphysVelocityStrategy::Recurrence)
}

/// Release a tracker allocated by [`scrollphys_velocity_tracker_new`]. A
/// null pointer is a no-op. Passing a pointer not returned by this crate's
/// allocator, or calling this twice on the same pointer, is undefined
/// behavior, same as any other `Box`-owned handle.
#[no_mangle]
pub extern "C" fn scrollphys_velocity_tracker_free(tracker: *mut ScrollphysVelocityTracker) {
    if !tracker.is_null() {
        drop(unsafe { Box::from_raw(tracker) });
    }
}

/// Append a sample. Non-finite values are skipped. A null `tracker` is a
/// no-op.
#[no_mangle]
pub extern "C" fn scrollphys_velocity_tracker_add_sample(
    tracker: *mut ScrollphysVelocityTracker,
    time: f64,
    position: f64,
) {
    if let Some(tracker) = unsafe { tracker.as_mut() } {
        tracker.inner.add_sample(time, position);
    }
}

/// Estimate the current velocity. A null `tracker` returns `0.0`.
#[no_mangle]
pub extern "C" fn scrollphys_velocity_tracker_estimate(
    tracker: *const ScrollphysVelocityTracker,
) -> f64 {
    match unsafe { tracker.as_ref() } {
        Some(tracker) => tracker.inner.estimate(),
        None => 0.0,
    }
}

/// Empty the buffer. A null `tracker` is a no-op.
#[no_mangle]
pub extern "C" fn scrollphys_velocity_tracker_reset(tracker: *mut ScrollphysVelocityTracker) {
    if let Some(tracker) = unsafe { tracker.as_mut() } {
        tracker.inner.reset();
    }
}

/// Returns `true` when the combined 2-D speed is below 1.0 point/second.
#[no_mangle]
pub extern "C" fn scrollphys_approaching_halt(vx: f64, vy: f64) -> bool {
    scrollphys_core::approaching_halt(vx, vy)
}
