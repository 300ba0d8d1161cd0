use scrollphys_core::Scroller;

/// An opaque, fixed-size handle for a [`Scroller`]. Stack-allocatable by
/// the caller; no free function is needed or provided.
#[repr(C)]
pub struct ScrollphysScroller {
    inner: Scroller,
}

/// The by-value result of [`scrollphys_scroller_value`].
#[repr(C)]
pub struct ScrollphysScrollerValue {
    pub offset: f64,
    pub velocity: f64,
}

/// Initialize `handle` with an explicit per-millisecond deceleration rate.
/// A null `handle` is a no-op.
#[no_mangle]
pub extern "C" fn scrollphys_scroller_init(handle: *mut ScrollphysScroller, deceleration_rate: f64) {
    if let Some(handle) = unsafe { handle.as_mut() } {
        handle.inner = Scroller::new(deceleration_rate);
    }
}

/// Initialize `handle` with the default ("normal") deceleration rate.
#[no_mangle]
pub extern "C" fn scrollphys_scroller_init_default(handle: *mut ScrollphysScroller) {
    if let Some(handle) = unsafe { handle.as_mut() } {
        handle.inner = Scroller::default();
    }
}

/// Change the deceleration rate used by future flings. Does not reset an
/// in-flight trajectory. A null `handle` is a no-op.
#[no_mangle]
pub extern "C" fn scrollphys_scroller_set_deceleration_rate(
    handle: *mut ScrollphysScroller,
    deceleration_rate: f64,
) {
    if let Some(handle) = unsafe { handle.as_mut() } {
        handle.inner.set_deceleration_rate(deceleration_rate);
    }
}

/// Set the initial velocity and reset elapsed time to zero. A non-finite
/// velocity is a no-op, per the core's contract. A null `handle` is also
/// a no-op.
#[no_mangle]
pub extern "C" fn scrollphys_scroller_fling(handle: *mut ScrollphysScroller, velocity: f64) {
    if let Some(handle) = unsafe { handle.as_mut() } {
        handle.inner.fling(velocity);
    }
}

/// Evaluate the trajectory at elapsed seconds `time`, writing whether the
/// fling has stopped into `*out_stopped` (if non-null). A null `handle`
/// reports a stopped, zero-valued result without touching `out_stopped`.
#[no_mangle]
pub extern "C" fn scrollphys_scroller_value(
    handle: *const ScrollphysScroller,
    time: f64,
    out_stopped: *mut bool,
) -> ScrollphysScrollerValue {
    let handle = match unsafe { handle.as_ref() } {
        Some(handle) => handle,
        None => {
            return ScrollphysScrollerValue {
                offset: 0.0,
                velocity: 0.0,
            }
        }
    };

    let value = handle.inner.value(time);
    if let Some(out_stopped) = unsafe { out_stopped.as_mut() } {
        *out_stopped = value.stopped;
    }

    ScrollphysScrollerValue {
        offset: value.offset,
        velocity: value.velocity,
    }
}

/// Return `handle` to the no-motion state. A null `handle` is a no-op.
#[no_mangle]
pub extern "C" fn scrollphys_scroller_reset(handle: *mut ScrollphysScroller) {
    if let Some(handle) = unsafe { handle.as_mut() } {
        handle.inner.reset();
    }
}
