//! Estimating a release velocity from a short trailing history of touch
//! samples.

use alt_fp::FloatOrd;
use log::trace;

/// Ring buffer capacity: at most this many trailing samples are retained.
pub const CAPACITY: usize = 20;

/// Samples older than this many seconds before the newest sample are
/// ignored during estimation (though they remain in the buffer until
/// overwritten).
pub const HORIZON: f64 = 0.100;

/// The exponential weighting half-life used by [`VelocityStrategy::Recurrence`],
/// in seconds.
pub const RECURRENCE_WEIGHT: f64 = 0.1;

/// A single (time, position) touch sample. Time is in seconds (monotonic
/// within one gesture); position is in the same logical units as the
/// estimated velocity (points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub position: f64,
}

/// Selects one of the two velocity-estimation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityStrategy {
    /// An exponentially-weighted running "impulse", robust to noisy
    /// samples and cheap to update incrementally.
    Recurrence,
    /// A quadratic least-squares fit evaluated at the newest sample,
    /// falling back to a linear fit or a finite difference when the
    /// sample times are too degenerate to support a stable quadratic fit.
    Lsq2,
}

impl Default for VelocityStrategy {
    fn default() -> Self {
        VelocityStrategy::Recurrence
    }
}

/// A fixed-capacity ring buffer of touch samples plus a selected
/// estimation strategy.
///
/// Adding a sample whose time is less than or equal to the newest stored
/// time discards all prior history first: the stream is assumed
/// monotonic, and a backwards step indicates the start of a new gesture.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    strategy: VelocityStrategy,
    samples: [Sample; CAPACITY],
    /// Index of the oldest retained sample.
    head: usize,
    /// Number of valid entries, `0..=CAPACITY`.
    len: usize,
}

impl VelocityTracker {
    /// Construct an empty tracker using the given strategy.
    pub fn new(strategy: VelocityStrategy) -> Self {
        VelocityTracker {
            strategy,
            samples: [Sample {
                time: 0.0,
                position: 0.0,
            }; CAPACITY],
            head: 0,
            len: 0,
        }
    }

    /// The strategy this tracker was constructed with.
    pub fn strategy(&self) -> VelocityStrategy {
        self.strategy
    }

    /// Append a sample. Non-finite `time`/`position` values are skipped.
    /// If `time` is less than or equal to the newest stored time, all
    /// prior history is discarded before the new sample is appended (so
    /// the tracker ends up holding just this one sample).
    pub fn add_sample(&mut self, time: f64, position: f64) {
        if !time.is_finite() || !position.is_finite() {
            trace!(
                "velocity_tracker: dropping non-finite sample time={:?} position={:?}",
                time,
                position
            );
            return;
        }

        if let Some(newest) = self.newest() {
            if time <= newest.time {
                trace!(
                    "velocity_tracker: time {:?} <= last {:?}, discarding history",
                    time,
                    newest.time
                );
                self.head = 0;
                self.len = 0;
            }
        }

        let write_at = (self.head + self.len) % CAPACITY;
        self.samples[write_at] = Sample { time, position };

        if self.len < CAPACITY {
            self.len += 1;
        } else {
            self.head = (self.head + 1) % CAPACITY;
        }
    }

    /// Empty the buffer.
    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    fn newest(&self) -> Option<Sample> {
        if self.len == 0 {
            None
        } else {
            Some(self.samples[(self.head + self.len - 1) % CAPACITY])
        }
    }

    /// Samples in insertion order (oldest first), without the horizon
    /// filter applied.
    fn ordered(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.len).map(move |i| self.samples[(self.head + i) % CAPACITY])
    }

    /// The retained samples within [`HORIZON`] of the newest sample,
    /// oldest first.
    fn windowed(&self) -> Vec<Sample> {
        let newest = match self.newest() {
            Some(s) => s,
            None => return Vec::new(),
        };
        let cutoff = newest.time - HORIZON;
        self.ordered().filter(|s| s.time >= cutoff).collect()
    }

    /// Estimate the current velocity, in position-units per second.
    /// Returns `0.0` if fewer than 2 samples remain after windowing.
    pub fn estimate(&self) -> f64 {
        let retained = self.windowed();
        if retained.len() < 2 {
            return 0.0;
        }

        match self.strategy {
            VelocityStrategy::Recurrence => estimate_recurrence(&retained),
            VelocityStrategy::Lsq2 => estimate_lsq2(&retained),
        }
    }
}

fn estimate_recurrence(samples: &[Sample]) -> f64 {
    // The first retained pair has no prior impulse to blend with, so it
    // seeds `J` directly; later pairs blend the new instantaneous velocity
    // into the running impulse with a decay weight. Seeding with `0.0`
    // instead would bias the estimate towards zero for short sample runs.
    let mut impulse: Option<f64> = None;
    for w in samples.windows(2) {
        let (prev, cur) = (w[0], w[1]);
        let dt = cur.time - prev.time;
        if dt <= 0.0 {
            continue;
        }
        let v = (cur.position - prev.position) / dt;
        impulse = Some(match impulse {
            None => v,
            Some(prev_impulse) => {
                let decay = (-dt / RECURRENCE_WEIGHT).exp();
                prev_impulse * decay + v * (1.0 - decay)
            }
        });
    }
    impulse.unwrap_or(0.0)
}

fn estimate_lsq2(samples: &[Sample]) -> f64 {
    if samples.len() == 2 {
        return finite_difference(samples[0], samples[1]);
    }

    let newest_time = samples.last().unwrap().time;
    let points: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.time - newest_time, s.position))
        .collect();

    if let Some(a) = solve_quadratic_lsq(&points) {
        return a[1];
    }

    trace!("velocity_tracker: lsq2 design matrix rank-deficient, falling back to lsq1");
    if let Some(slope) = solve_linear_lsq(&points) {
        return slope;
    }

    trace!("velocity_tracker: lsq1 also degenerate, falling back to finite difference");
    finite_difference(samples[0], samples[samples.len() - 1])
}

fn finite_difference(a: Sample, b: Sample) -> f64 {
    let dt = b.time - a.time;
    if dt <= 0.0 {
        0.0
    } else {
        (b.position - a.position) / dt
    }
}

/// Fit `y = a0 + a1*x + a2*x^2` by least squares via the normal equations,
/// solved with Cramer's rule. Returns `None` if the resulting 3x3 system
/// is too close to singular to trust (fewer than 3 distinct `x` values, or
/// degenerate spacing).
fn solve_quadratic_lsq(points: &[(f64, f64)]) -> Option<[f64; 3]> {
    let n = points.len() as f64;
    let (mut s1, mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0, 0.0);
    let (mut t0, mut t1, mut t2) = (0.0, 0.0, 0.0);

    for &(x, y) in points {
        let x2 = x * x;
        s1 += x;
        s2 += x2;
        s3 += x2 * x;
        s4 += x2 * x2;
        t0 += y;
        t1 += x * y;
        t2 += x2 * y;
    }

    let m = [[n, s1, s2], [s1, s2, s3], [s2, s3, s4]];
    let rhs = [t0, t1, t2];

    solve3x3(m, rhs)
}

/// Fit `y = a0 + a1*x` by least squares. Returns the slope `a1`, or `None`
/// if the `x` values are too close together (or identical) to trust.
fn solve_linear_lsq(points: &[(f64, f64)]) -> Option<f64> {
    let n = points.len() as f64;
    let (mut s1, mut s2, mut t0, mut t1) = (0.0, 0.0, 0.0, 0.0);
    for &(x, y) in points {
        s1 += x;
        s2 += x * x;
        t0 += y;
        t1 += x * y;
    }

    let det = n * s2 - s1 * s1;
    if det.abs() < 1.0e-9 {
        return None;
    }
    Some((n * t1 - s1 * t0) / det)
}

/// Solve a 3x3 linear system via Cramer's rule. Returns `None` if the
/// determinant is too small to divide by safely.
fn solve3x3(m: [[f64; 3]; 3], rhs: [f64; 3]) -> Option<[f64; 3]> {
    let det = det3(m);
    if det.abs() < 1.0e-9 {
        return None;
    }

    let mut result = [0.0; 3];
    for col in 0..3 {
        let mut m_col = m;
        for row in 0..3 {
            m_col[row][col] = rhs[row];
        }
        result[col] = det3(m_col) / det;
    }
    Some(result)
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Returns `true` when the combined 2-D speed `sqrt(vx^2 + vy^2)` is below
/// 1.0 point/second. A helper so a driver running two independent
/// [`VelocityTracker`]/scroller pairs (one per axis) can unify its
/// per-axis stop decisions for a 2-D surface.
pub fn approaching_halt(vx: f64, vy: f64) -> bool {
    (vx * vx + vy * vy).sqrt() < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use quickcheck_macros::quickcheck;

    #[test]
    fn empty_tracker_estimates_zero() {
        let t = VelocityTracker::new(VelocityStrategy::Recurrence);
        assert_eq!(t.estimate(), 0.0);
    }

    #[test]
    fn single_sample_estimates_zero() {
        let mut t = VelocityTracker::new(VelocityStrategy::Lsq2);
        t.add_sample(0.0, 10.0);
        assert_eq!(t.estimate(), 0.0);
    }

    #[test]
    fn backwards_time_discards_history() {
        let mut t = VelocityTracker::new(VelocityStrategy::Recurrence);
        t.add_sample(1.0, 0.0);
        t.add_sample(1.016, 16.0);
        t.add_sample(0.5, 0.0); // backwards: discards the above two
        assert_eq!(t.estimate(), 0.0); // only one sample remains
    }

    #[test]
    fn non_finite_sample_is_skipped() {
        let mut t = VelocityTracker::new(VelocityStrategy::Recurrence);
        t.add_sample(0.0, 0.0);
        t.add_sample(f64::NAN, 5.0);
        t.add_sample(0.016, 16.0);
        // the NAN sample never got inserted, so this is a normal 2-sample case
        assert!(t.estimate() > 0.0);
    }

    #[test]
    fn samples_past_horizon_are_ignored() {
        let mut t = VelocityTracker::new(VelocityStrategy::Recurrence);
        t.add_sample(0.0, 0.0);
        t.add_sample(0.5, 10_000.0); // way outside the 100ms horizon eventually
        t.add_sample(0.6, 10_016.0);
        t.add_sample(0.616, 10_032.0);
        // Only the last two samples (within 100ms of 0.616) should count.
        let v = t.estimate();
        assert_abs_diff_eq!(v, 1000.0, epsilon = 5.0);
    }

    #[test]
    fn buffer_wraps_at_21st_sample() {
        let mut t = VelocityTracker::new(VelocityStrategy::Lsq2);
        for i in 0..25 {
            t.add_sample(i as f64 * 0.016, i as f64 * 16.0);
        }
        // The oldest 5 samples should have been overwritten; the tracker
        // should still produce a sane, non-panicking estimate from the
        // most recent window.
        let v = t.estimate();
        assert_abs_diff_eq!(v, 1000.0, epsilon = 5.0);
    }

    #[test]
    fn reset_empties_buffer() {
        let mut t = VelocityTracker::new(VelocityStrategy::Recurrence);
        t.add_sample(0.0, 0.0);
        t.add_sample(0.016, 16.0);
        t.reset();
        assert_eq!(t.estimate(), 0.0);
    }

    #[test]
    fn identical_times_do_not_panic() {
        let mut t = VelocityTracker::new(VelocityStrategy::Lsq2);
        t.add_sample(1.0, 5.0);
        t.add_sample(1.0, 5.0);
        t.add_sample(1.0, 5.0);
        assert_eq!(t.estimate(), 0.0);
    }

    #[test]
    fn recurrence_recovers_constant_velocity_trace() {
        let mut t = VelocityTracker::new(VelocityStrategy::Recurrence);
        for &(time, pos) in &[(0.0, 0.0), (0.016, 16.0), (0.032, 32.0), (0.048, 48.0)] {
            t.add_sample(time, pos);
        }
        assert_abs_diff_eq!(t.estimate(), 1000.0, epsilon = 5.0);
    }

    #[test]
    fn lsq2_recovers_velocity_at_newest_sample_of_quadratic_trace() {
        let mut t = VelocityTracker::new(VelocityStrategy::Lsq2);
        for i in 0..5 {
            let time = i as f64 * 0.02;
            let pos = 500.0 * time + 250.0 * time * time;
            t.add_sample(time, pos);
        }
        assert_abs_diff_eq!(t.estimate(), 540.0, epsilon = 1.0);
    }

    #[test]
    fn constant_velocity_both_strategies_agree() {
        for strategy in [VelocityStrategy::Recurrence, VelocityStrategy::Lsq2] {
            let mut t = VelocityTracker::new(strategy);
            for i in 0..6 {
                let time = i as f64 * 0.01;
                t.add_sample(time, 300.0 * time);
            }
            assert_abs_diff_eq!(t.estimate(), 300.0, epsilon = 1.0e-3);
        }
    }

    #[test]
    fn approaching_halt_threshold() {
        assert!(approaching_halt(0.5, 0.5));
        assert!(!approaching_halt(10.0, 0.0));
        assert!(!approaching_halt(0.8, 0.8));
    }

    #[quickcheck]
    fn constant_velocity_is_recovered(v_frac: f64, dt_frac: f64) -> bool {
        // v in (-2000, 2000), dt in (4ms, 20ms) so 5 samples comfortably
        // span more than 50ms.
        let v = v_frac.fract() * 4000.0 - 2000.0;
        let dt = 0.004 + dt_frac.fract().abs() * 0.016;
        if !v.is_finite() || v == 0.0 {
            return true;
        }

        [VelocityStrategy::Recurrence, VelocityStrategy::Lsq2]
            .iter()
            .all(|&strategy| {
                let mut t = VelocityTracker::new(strategy);
                for i in 0..6 {
                    t.add_sample(i as f64 * dt, v * (i as f64 * dt));
                }
                (t.estimate() - v).abs() < 1.0e-3 * v.abs().fmax(1.0)
            })
    }

    #[quickcheck]
    fn lsq2_recovers_quadratic_instantaneous_velocity(a_frac: f64) -> bool {
        let a = a_frac.fract() * 2000.0 - 1000.0;
        if !a.is_finite() || a == 0.0 {
            return true;
        }

        let mut t = VelocityTracker::new(VelocityStrategy::Lsq2);
        let times = [0.0, 0.02, 0.04, 0.06, 0.08];
        for &time in &times {
            t.add_sample(time, 0.5 * a * time * time);
        }
        let t_newest = *times.last().unwrap();
        let expected = a * t_newest;
        (t.estimate() - expected).abs() < 1.0e-3 * expected.abs().fmax(1.0)
    }
}
