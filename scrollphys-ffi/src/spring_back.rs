use scrollphys_core::SpringBack;

/// An opaque, fixed-size handle for a [`SpringBack`]. Stack-allocatable by
/// the caller; no free function is needed or provided.
#[repr(C)]
pub struct ScrollphysSpringBack {
    inner: SpringBack,
}

/// Initialize `handle` to the quiescent state. A null `handle` is a no-op.
#[no_mangle]
pub extern "C" fn scrollphys_spring_back_init(handle: *mut ScrollphysSpringBack) {
    if let Some(handle) = unsafe { handle.as_mut() } {
        handle.inner = SpringBack::new();
    }
}

/// Initialize `handle` with the default response (0.575s). A null
/// `handle` is a no-op.
#[no_mangle]
pub extern "C" fn scrollphys_spring_back_absorb(
    handle: *mut ScrollphysSpringBack,
    velocity: f64,
    distance: f64,
) {
    if let Some(handle) = unsafe { handle.as_mut() } {
        handle.inner.absorb(velocity, distance);
    }
}

/// Initialize `handle` with an explicit response, in seconds. A
/// non-positive response falls back to the default. A null `handle` is a
/// no-op.
#[no_mangle]
pub extern "C" fn scrollphys_spring_back_absorb_with_response(
    handle: *mut ScrollphysSpringBack,
    velocity: f64,
    distance: f64,
    response: f64,
) {
    if let Some(handle) = unsafe { handle.as_mut() } {
        handle.inner.absorb_with_response(velocity, distance, response);
    }
}

/// Evaluate the residual displacement at elapsed seconds `time`, writing
/// whether the system has settled into `*out_stopped` (if non-null). A
/// null `handle` reports a stopped, zero-valued result without touching
/// `out_stopped`.
#[no_mangle]
pub extern "C" fn scrollphys_spring_back_value(
    handle: *const ScrollphysSpringBack,
    time: f64,
    out_stopped: *mut bool,
) -> f64 {
    let handle = match unsafe { handle.as_ref() } {
        Some(handle) => handle,
        None => return 0.0,
    };

    let value = handle.inner.value(time);
    if let Some(out_stopped) = unsafe { out_stopped.as_mut() } {
        *out_stopped = value.stopped;
    }

    value.offset
}

/// Return `handle` to the quiescent state. A null `handle` is a no-op.
#[no_mangle]
pub extern "C" fn scrollphys_spring_back_reset(handle: *mut ScrollphysSpringBack) {
    if let Some(handle) = unsafe { handle.as_mut() } {
        handle.inner.reset();
    }
}
