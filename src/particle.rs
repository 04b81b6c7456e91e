//! The particle record and its per-frame physics.
//!
//! A [`Particle`] is plain data. Motion lives in the free function
//! [`advance`], which takes the frame-wide [`Forces`] and a random source,
//! so the physics can be stepped and tested without any rendering context.
//!
//! All quantities are in logical canvas pixels and per-frame units.

use glam::Vec2;
use rand::Rng;

use crate::color::Rgb;

/// Multiplicative velocity damping applied every frame.
pub const DAMPING: f32 = 0.94;
/// Phase advance of a particle's own orbit, radians per frame.
pub const ORBIT_SPEED: f32 = 0.01;
/// Attraction toward the point on the particle's orbit circle.
pub const ORBIT_PULL: f32 = 0.002;
/// Fraction of the gap to the target orbit radius closed per frame.
pub const ORBIT_EASING: f32 = 0.1;
/// Radius of the slowly wandering secondary anchor.
pub const ANCHOR_RADIUS: f32 = 50.0;
/// Attraction toward the wandering anchor.
pub const ANCHOR_PULL: f32 = 0.0005;
/// Inner ring radius at full convergence; particles inside are pushed out.
pub const MIN_RING_RADIUS: f32 = 50.0;
/// Repulsion strength per pixel of ring penetration.
pub const RING_REPULSION: f32 = 0.1;
/// Per-frame probability of a random impulse.
pub const IMPULSE_CHANCE: f64 = 0.05;
/// Impulse magnitude per axis is `(u - 0.5) * IMPULSE_STRENGTH`.
pub const IMPULSE_STRENGTH: f32 = 0.5;
/// Render radius range in pixels.
pub const RADIUS_RANGE: (f32, f32) = (1.0, 2.5);

/// One simulated particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Orbit phase in radians, increasing every frame.
    pub angle: f32,
    /// Current orbit radius; eases toward `base_orbit_radius * scale`.
    orbit_radius: f32,
    radius: f32,
    base_orbit_radius: f32,
    color: Rgb,
}

impl Particle {
    /// Create a particle with a random render radius, velocity and phase.
    ///
    /// `orbit_scale` is the convergence scale at spawn time; the current
    /// orbit radius starts already scaled so mid-animation spawns do not
    /// snap outward.
    pub fn spawn<R: Rng + ?Sized>(
        position: Vec2,
        base_orbit_radius: f32,
        orbit_scale: f32,
        color: Rgb,
        rng: &mut R,
    ) -> Self {
        let base_orbit_radius = base_orbit_radius.max(0.0);
        Self {
            position,
            velocity: Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)),
            angle: rng.gen_range(0.0..std::f32::consts::TAU),
            orbit_radius: base_orbit_radius * orbit_scale,
            radius: rng.gen_range(RADIUS_RANGE.0..RADIUS_RANGE.1),
            base_orbit_radius,
            color,
        }
    }

    /// Render radius in logical pixels, fixed at creation.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Orbit radius at full convergence, fixed at creation.
    #[inline]
    pub fn base_orbit_radius(&self) -> f32 {
        self.base_orbit_radius
    }

    #[inline]
    pub fn orbit_radius(&self) -> f32 {
        self.orbit_radius
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Frame-wide inputs to [`advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forces {
    /// Smoothed display center particles orbit around.
    pub center: Vec2,
    /// Convergence scale in 0..=1 (see [`crate::convergence::convergence_scale`]).
    pub scale: f32,
}

impl Forces {
    pub fn new(center: Vec2, scale: f32) -> Self {
        Self {
            center,
            scale: scale.clamp(0.0, 1.0),
        }
    }

    /// Radius inside which particles are pushed outward.
    #[inline]
    pub fn ring_radius(&self) -> f32 {
        MIN_RING_RADIUS * self.scale
    }
}

/// Advance one particle by a single frame.
pub fn advance<R: Rng + ?Sized>(particle: &mut Particle, forces: &Forces, rng: &mut R) {
    let mut accel = Vec2::ZERO;
    let to_center = forces.center - particle.position;
    let dist = to_center.length();

    // Wandering anchor circling the center at half the orbit rate
    let anchor_angle = particle.angle * 0.5;
    let anchor = forces.center + Vec2::from_angle(anchor_angle) * ANCHOR_RADIUS;
    accel += (anchor - particle.position) * ANCHOR_PULL;

    let ring = forces.ring_radius();
    if dist < ring && dist > f32::EPSILON {
        let push = RING_REPULSION * (ring - dist);
        accel -= to_center / dist * push;
    }

    let target_orbit = particle.base_orbit_radius * forces.scale;
    particle.orbit_radius += (target_orbit - particle.orbit_radius) * ORBIT_EASING;

    particle.angle += ORBIT_SPEED;
    let orbit_point = forces.center + Vec2::from_angle(particle.angle) * particle.orbit_radius;
    accel += (orbit_point - particle.position) * ORBIT_PULL;

    if rng.gen_bool(IMPULSE_CHANCE) {
        accel += Vec2::new(
            (rng.gen::<f32>() - 0.5) * IMPULSE_STRENGTH,
            (rng.gen::<f32>() - 0.5) * IMPULSE_STRENGTH,
        );
    }

    integrate(particle, accel);
}

/// Apply an acceleration, damp, then move.
#[inline]
pub fn integrate(particle: &mut Particle, accel: Vec2) {
    particle.velocity += accel;
    particle.velocity *= DAMPING;
    particle.position += particle.velocity;
}
