//! The rubber-band over-drag compression curve.

use alt_fp::FloatOrd;

/// The fraction of `range` that the displayed offset asymptotically
/// approaches as the raw overshoot grows without bound.
///
/// `d = 0.55` is an empirically chosen constant that gives a comfortable
/// amount of resistance for typical touch-scroll viewport sizes.
pub const COEFFICIENT: f64 = 0.55;

/// Map an over-drag `offset` (signed, past a scrollable bound) to a
/// compressed `displayed_offset`, given the viewport's `range` along the
/// dragged axis.
///
/// ```text
/// displayed = (1 - 1 / (|offset| / (d * range) + 1)) * d * range * sign(offset)
/// ```
///
/// This saturates: as `|offset| -> infinity`, `|displayed| -> d * range`.
/// For small offsets the slope is close to 1 (little resistance); for large
/// offsets it flattens out (strong resistance).
///
/// `range` must be positive. `range == 0.0` is treated as the identity
/// function (`rubber_band(x, 0.0) == x`) rather than dividing by zero,
/// since a zero-size viewport has no meaningful compression curve.
///
/// # Examples
///
///     use scrollphys_core::rubber_band;
///
///     assert_eq!(rubber_band(0.0, 1000.0), 0.0);
///     assert!((rubber_band(100.0, 1000.0) - 47.6).abs() < 0.5);
#[inline]
pub fn rubber_band(offset: f64, range: f64) -> f64 {
    if range == 0.0 {
        return offset;
    }
    debug_assert!(range > 0.0, "rubber_band: range must be positive");

    let d = COEFFICIENT;
    let magnitude = offset.abs();
    let compressed = (1.0 - 1.0 / (magnitude / (d * range) + 1.0)) * d * range;
    compressed.copysign(offset)
}

/// Like [`rubber_band`], but clamps its result to never exceed
/// `d * range` in magnitude even if floating-point rounding would let it
/// creep past the asymptote. Not used by `rubber_band` itself; callers
/// that need a hard ceiling (e.g. to feed a layout system that can't
/// tolerate values `>= d * range`) can reach for this instead.
#[inline]
pub fn rubber_band_clamped(offset: f64, range: f64) -> f64 {
    let limit = COEFFICIENT * range.abs();
    rubber_band(offset, range).fmin(limit).fmax(-limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use quickcheck_macros::quickcheck;

    #[test]
    fn zero_offset_is_zero() {
        assert_eq!(rubber_band(0.0, 1000.0), 0.0);
        assert_eq!(rubber_band(0.0, 1.0), 0.0);
    }

    #[test]
    fn zero_range_is_identity() {
        assert_eq!(rubber_band(42.0, 0.0), 42.0);
        assert_eq!(rubber_band(-7.5, 0.0), -7.5);
    }

    #[test]
    fn matches_reference_compression_value() {
        assert_abs_diff_eq!(rubber_band(100.0, 1000.0), 47.6, epsilon = 0.5);
    }

    #[quickcheck]
    fn is_odd(offset: f64, range: f64) -> bool {
        let range = range.abs().fmin(1.0e9);
        if !offset.is_finite() || range == 0.0 {
            return true;
        }
        let a = rubber_band(offset, range);
        let b = rubber_band(-offset, range);
        (a + b).abs() < 1.0e-9 * range.fmax(1.0)
    }

    #[quickcheck]
    fn bounded_and_sublinear(offset: f64, range: f64) -> bool {
        let range = range.abs().fmin(1.0e9) + 1.0;
        if !offset.is_finite() || offset == 0.0 {
            return true;
        }
        let offset = offset.abs().fmin(1.0e9) * offset.signum();
        let displayed = rubber_band(offset, range);
        displayed.abs() < COEFFICIENT * range && displayed.abs() <= offset.abs() + 1.0e-9
    }

    #[quickcheck]
    fn monotonic_in_magnitude(a: f64, b: f64, range: f64) -> bool {
        let range = range.abs().fmin(1.0e9) + 1.0;
        let a = a.abs().fmin(1.0e9);
        let b = b.abs().fmin(1.0e9);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        rubber_band(lo, range) <= rubber_band(hi, range) + 1.0e-9
    }
}
