//! Closed-form load, power, and service-quality models.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Utilization above which QoS starts to degrade.
pub const QOS_KNEE: f64 = 0.85;
/// Width of the utilization band over which the QoS penalty ramps up.
pub const QOS_RAMP_WIDTH: f64 = 0.15;
/// Maximum QoS penalty at or beyond full load (points).
pub const QOS_MAX_PENALTY: f64 = 30.0;
/// Exponent of the dynamic power curve.
pub const DYN_POWER_EXPONENT: f64 = 1.3;

/// Load fraction `traffic / capacity`, clamped to [0, 1].
///
/// Returns 0.0 when `capacity_mbps` is not positive.
pub fn utilization(traffic_mbps: f64, capacity_mbps: f64) -> f64 {
    if capacity_mbps.is_nan() || capacity_mbps <= 0.0 {
        return 0.0;
    }
    (traffic_mbps / capacity_mbps).clamp(0.0, 1.0)
}

/// Power draw `P = P0 + Pdyn * u^1.3`, with `u` clamped to [0, 1].
///
/// # Examples
///
/// ```
/// use cell_twin::station::models::energy_w;
///
/// assert_eq!(energy_w(0.0, 700.0, 600.0), 700.0);
/// assert_eq!(energy_w(1.5, 700.0, 600.0), 1300.0);
/// ```
pub fn energy_w(u: f64, baseline_w: f64, dyn_w_max: f64) -> f64 {
    baseline_w + dyn_w_max * u.clamp(0.0, 1.0).powf(DYN_POWER_EXPONENT)
}

/// Fraction of the overload band reached: 0 below 0.85, 1 at or above 1.0.
pub fn overload_ramp(u: f64) -> f64 {
    ((u - QOS_KNEE) / QOS_RAMP_WIDTH).clamp(0.0, 1.0)
}

/// QoS score `100 - 30 * ramp(u) + jitter`, clamped to [0, 100].
pub fn qos_score(u: f64, jitter: f64) -> f64 {
    clamp_qos(100.0 - QOS_MAX_PENALTY * overload_ramp(u) + jitter)
}

/// Clamps a QoS value to [0, 100].
pub fn clamp_qos(qos: f64) -> f64 {
    qos.clamp(0.0, 100.0)
}

/// Draws zero-mean Gaussian noise with the given standard deviation.
///
/// Returns 0.0 without consuming randomness when `std_dev` is not a
/// positive finite number.
pub fn gaussian_noise<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return 0.0;
    }
    Normal::new(0.0, std_dev).map_or(0.0, |normal| normal.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn utilization_clamps_and_guards_capacity() {
        assert_eq!(utilization(300.0, 600.0), 0.5);
        assert_eq!(utilization(900.0, 600.0), 1.0);
        assert_eq!(utilization(-5.0, 600.0), 0.0);
        assert_eq!(utilization(100.0, 0.0), 0.0);
    }

    #[test]
    fn energy_is_superlinear() {
        let half = energy_w(0.5, 0.0, 600.0);
        assert!(half < 300.0, "0.5^1.3 should be below linear, got {half}");
    }

    #[test]
    fn overload_ramp_is_piecewise_linear() {
        assert_eq!(overload_ramp(0.5), 0.0);
        assert_eq!(overload_ramp(0.85), 0.0);
        assert!((overload_ramp(0.925) - 0.5).abs() < 1e-9);
        assert_eq!(overload_ramp(1.0), 1.0);
        assert_eq!(overload_ramp(1.2), 1.0);
    }

    #[test]
    fn qos_penalty_caps_at_thirty() {
        assert_eq!(qos_score(0.3, 0.0), 100.0);
        assert!((qos_score(1.0, 0.0) - 70.0).abs() < 1e-9);
        assert_eq!(qos_score(0.3, 5.0), 100.0);
        assert!((qos_score(1.0, -2.0) - 68.0).abs() < 1e-9);
    }

    #[test]
    fn zero_std_noise_draws_nothing() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(gaussian_noise(&mut a, 0.0), 0.0);
        assert_eq!(gaussian_noise(&mut a, 1.0), gaussian_noise(&mut b, 1.0));
    }
}
