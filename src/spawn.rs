//! Spawn geometry for new particles.
//!
//! Diversity drives how far particles land from the center: low-diversity
//! data collapses into a dense core, high-diversity data fills the space
//! available on the canvas. Radii are skewed toward the inner edge with a
//! cubic distribution, so most particles sit close in and a long tail
//! reaches outward.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Below this diversity the inner radius drops to zero.
pub const LOW_DIVERSITY_THRESHOLD: f32 = 10.0;
/// Inner spawn radius for diverse formations.
pub const MIN_SPAWN_RADIUS: f32 = 50.0;
/// Gap kept between the formation and the top/bottom canvas edges.
pub const EDGE_MARGIN: f32 = 40.0;
/// Fixed part of the base orbit radius.
pub const ORBIT_BASE: f32 = 80.0;
/// Random part of the base orbit radius before diversity is added.
pub const ORBIT_JITTER: f32 = 50.0;
/// Extra random orbit range per diversity point.
pub const ORBIT_PER_DIVERSITY: f32 = 5.0;

/// Polar spawn coordinates relative to the display center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub angle: f32,
    pub radius: f32,
}

impl SpawnPoint {
    /// The same point scaled toward the center (for mid-collapse spawns).
    #[inline]
    pub fn scaled(self, scale: f32) -> Self {
        Self {
            angle: self.angle,
            radius: self.radius * scale,
        }
    }

    #[inline]
    pub fn to_cartesian(self, center: Vec2) -> Vec2 {
        center + Vec2::from_angle(self.angle) * self.radius
    }
}

/// Radius bounds for one batch of spawns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnBounds {
    pub min_radius: f32,
    pub max_radius: f32,
    /// Largest radius that still fits vertically on the canvas.
    pub available_radius: f32,
}

impl SpawnBounds {
    pub fn new(diversity: f32, point_count: u32, spread: f32, canvas_height: f32) -> Self {
        let diversity = finite_or_zero(diversity).max(0.0);
        let min_radius = if diversity < LOW_DIVERSITY_THRESHOLD {
            0.0
        } else {
            MIN_SPAWN_RADIUS
        };

        let half_height = finite_or_zero(canvas_height).max(0.0) / 2.0;
        let available_radius = (half_height - EDGE_MARGIN).max(min_radius);

        let factor = spread_factor(diversity, point_count, spread);
        let max_radius =
            (min_radius + (available_radius - min_radius) * factor).min(available_radius);

        Self {
            min_radius,
            max_radius,
            available_radius,
        }
    }

    /// Sample a spawn point: uniform angle, radius skewed toward `min_radius`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SpawnPoint {
        let angle = rng.gen_range(0.0..TAU);
        let skew = rng.gen::<f32>().powi(3);
        SpawnPoint {
            angle,
            radius: self.min_radius + skew * (self.max_radius - self.min_radius),
        }
    }
}

/// How much of the available radius a formation may use.
///
/// Grows with diversity and, more gently, with the number of particles so
/// large sets do not pile up in the core. Scaled by the caller's spread.
pub fn spread_factor(diversity: f32, point_count: u32, spread: f32) -> f32 {
    let diversity = (finite_or_zero(diversity) / 100.0).clamp(0.0, 1.0);
    let density = (point_count as f32 / 1000.0).sqrt().clamp(0.6, 1.4);
    let spread = finite_or_zero(spread).max(0.0);
    spread * (0.35 + 0.65 * diversity) * density
}

/// Sample a spawn location for one particle.
pub fn spawn_position<R: Rng + ?Sized>(
    diversity: f32,
    point_count: u32,
    spread: f32,
    canvas_height: f32,
    rng: &mut R,
) -> SpawnPoint {
    SpawnBounds::new(diversity, point_count, spread, canvas_height).sample(rng)
}

/// Sample the full-convergence orbit radius of one particle.
///
/// More diverse data orbits wider: `ORBIT_BASE` plus up to
/// `ORBIT_JITTER + diversity * ORBIT_PER_DIVERSITY`, scaled by `spread`.
/// Not bounded by the canvas size.
pub fn base_orbit_radius<R: Rng + ?Sized>(diversity: f32, spread: f32, rng: &mut R) -> f32 {
    let diversity = finite_or_zero(diversity).max(0.0);
    let range = ORBIT_JITTER + diversity * ORBIT_PER_DIVERSITY;
    (ORBIT_BASE + rng.gen::<f32>() * range) * finite_or_zero(spread).max(0.0)
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_low_diversity_has_no_inner_radius() {
        let low = SpawnBounds::new(5.0, 500, 1.0, 900.0);
        let high = SpawnBounds::new(50.0, 500, 1.0, 900.0);
        assert_eq!(low.min_radius, 0.0);
        assert_eq!(high.min_radius, MIN_SPAWN_RADIUS);
    }

    #[test]
    fn test_max_radius_fits_canvas() {
        for diversity in [0.0, 20.0, 80.0, 100.0, 400.0] {
            for spread in [0.2, 1.0, 3.0] {
                let b = SpawnBounds::new(diversity, 3000, spread, 800.0);
                assert!(b.max_radius <= b.available_radius);
                assert!(b.max_radius >= b.min_radius);
                assert!(b.available_radius <= 400.0 - EDGE_MARGIN);
            }
        }
    }

    #[test]
    fn test_tiny_canvas_degrades() {
        let b = SpawnBounds::new(60.0, 100, 1.0, 20.0);
        assert_eq!(b.available_radius, MIN_SPAWN_RADIUS);
        assert_eq!(b.max_radius, MIN_SPAWN_RADIUS);
    }

    #[test]
    fn test_spread_grows_with_diversity() {
        assert!(spread_factor(80.0, 1000, 1.0) > spread_factor(20.0, 1000, 1.0));
        assert!(spread_factor(50.0, 1000, 2.0) > spread_factor(50.0, 1000, 1.0));
        assert_eq!(spread_factor(f32::NAN, 1000, 1.0), spread_factor(0.0, 1000, 1.0));
    }

    #[test]
    fn test_samples_stay_in_bounds_and_skew_inward() {
        let mut rng = SmallRng::seed_from_u64(11);
        let bounds = SpawnBounds::new(70.0, 1000, 1.0, 1000.0);
        let mid = (bounds.min_radius + bounds.max_radius) / 2.0;
        let mut inner = 0;
        for _ in 0..2000 {
            let p = bounds.sample(&mut rng);
            assert!(p.radius >= bounds.min_radius && p.radius <= bounds.max_radius);
            assert!(p.angle >= 0.0 && p.angle < TAU);
            if p.radius < mid {
                inner += 1;
            }
        }
        // P(u^3 < 0.5) = 0.5^(1/3) ~ 0.79
        assert!(inner > 1450 && inner < 1700, "inner {}", inner);
    }

    #[test]
    fn test_to_cartesian() {
        let p = SpawnPoint {
            angle: 0.0,
            radius: 10.0,
        };
        let v = p.to_cartesian(Vec2::new(100.0, 50.0));
        assert!((v - Vec2::new(110.0, 50.0)).length() < 1e-4);
        assert_eq!(p.scaled(0.5).radius, 5.0);
    }

    #[test]
    fn test_base_orbit_radius_range() {
        let mut rng = SmallRng::seed_from_u64(12);
        for _ in 0..500 {
            let r = base_orbit_radius(0.0, 1.0, &mut rng);
            assert!(r >= ORBIT_BASE && r <= ORBIT_BASE + ORBIT_JITTER);

            let wide = base_orbit_radius(100.0, 2.0, &mut rng);
            let max = (ORBIT_BASE + ORBIT_JITTER + 100.0 * ORBIT_PER_DIVERSITY) * 2.0;
            assert!(wide >= ORBIT_BASE * 2.0 && wide <= max);
        }
        assert_eq!(base_orbit_radius(f32::NAN, f32::NAN, &mut rng), 0.0);
    }

    #[test]
    fn test_base_orbit_radius_keeps_diversity_apart() {
        let mut rng = SmallRng::seed_from_u64(13);
        let mean = |diversity: f32, rng: &mut SmallRng| {
            (0..2000)
                .map(|_| base_orbit_radius(diversity, 1.0, rng))
                .sum::<f32>()
                / 2000.0
        };
        let low = mean(50.0, &mut rng);
        let high = mean(87.0, &mut rng);
        // Expected means are 80 + (50 + 5d) / 2: 230 and 322.5
        assert!((low - 230.0).abs() < 10.0, "low {}", low);
        assert!((high - 322.5).abs() < 12.0, "high {}", high);
    }
}
