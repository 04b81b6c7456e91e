//! The running particle formation.
//!
//! [`SimulationState`] owns everything that changes from frame to frame:
//! the particle batch, the viewport and its smoothed center, the
//! convergence timeline and the random source. It is driven from outside:
//!
//! ```ignore
//! let mut state = SimulationState::new(params, Viewport::new(1280.0, 720.0, 2.0));
//! loop {
//!     state.step(clock.now());
//!     render_frame(&state, &mut canvas);
//! }
//! ```
//!
//! Parameter changes and resizes are applied between frames and take
//! effect on the next [`step`](SimulationState::step).

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

use crate::allocation::{allocate, shuffle};
use crate::convergence::{convergence_scale, ConvergenceController, DEFAULT_CONVERGENCE_MS};
use crate::params::{ParamChange, SimulationParams};
use crate::particle::{advance, Forces, Particle};
use crate::spawn::{base_orbit_radius, SpawnBounds};
use crate::viewport::Viewport;

/// Particles plus the state they are simulated against.
#[derive(Debug)]
pub struct SimulationState {
    params: SimulationParams,
    viewport: Viewport,
    particles: Vec<Particle>,
    convergence: ConvergenceController,
    rng: SmallRng,
    frame: u64,
}

impl SimulationState {
    /// Create a state seeded from OS entropy and spawn the first batch.
    pub fn new(params: SimulationParams, viewport: Viewport) -> Self {
        Self::with_rng(params, viewport, SmallRng::from_entropy())
    }

    /// Create a state with a fixed seed, for reproducible runs.
    pub fn with_seed(params: SimulationParams, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(params, viewport, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(params: SimulationParams, mut viewport: Viewport, rng: SmallRng) -> Self {
        let params = params.sanitized();
        viewport.set_size_multiplier(params.size_multiplier());
        viewport.set_horizontal_shift(params.horizontal_shift);
        viewport.snap_center();

        let mut state = Self {
            convergence: ConvergenceController::new(params.convergence()),
            params,
            viewport,
            particles: Vec::new(),
            rng,
            frame: 0,
        };
        state.reinitialize();
        state
    }

    /// Discard the current batch and spawn a fresh one.
    ///
    /// Counts come from [`allocate`], positions from the spawn bounds
    /// around the display center (pulled in by the current convergence
    /// scale), and the batch is shuffled so colors interleave.
    pub fn reinitialize(&mut self) {
        let params = &self.params;
        let scale = self.convergence.scale();
        let center = self.viewport.display_center();
        let bounds = SpawnBounds::new(
            params.diversity,
            params.points,
            params.spread(),
            self.viewport.logical_size().y,
        );

        let allocations = allocate(params.points, &params.categories);
        let mut particles = Vec::with_capacity(params.points as usize);
        for allocation in &allocations {
            let color = params.categories[allocation.index].color;
            for _ in 0..allocation.count {
                let position = bounds.sample(&mut self.rng).scaled(scale).to_cartesian(center);
                let orbit = base_orbit_radius(params.diversity, params.spread(), &mut self.rng);
                particles.push(Particle::spawn(position, orbit, scale, color, &mut self.rng));
            }
        }
        shuffle(&mut particles, &mut self.rng);

        log::debug!(
            "Spawned {} particles across {} categories (radius {:.1}..{:.1}, scale {:.3})",
            particles.len(),
            allocations.len(),
            bounds.min_radius,
            bounds.max_radius,
            scale
        );
        self.particles = particles;
    }

    /// Advance the whole formation by one frame at time `now`.
    pub fn step(&mut self, now: Duration) {
        let value = self.convergence.sample(now);
        self.viewport.smooth_center();
        let forces = Forces::new(self.viewport.display_center(), convergence_scale(value));

        for particle in &mut self.particles {
            advance(particle, &forces, &mut self.rng);
        }
        self.frame += 1;
    }

    /// React to a viewport change: new buffer size, snapped center and a
    /// fresh batch of particles.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport.resize(width, height, device_pixel_ratio);
        self.viewport.snap_center();
        self.reinitialize();
    }

    /// Replace the parameters and apply whatever the change requires.
    ///
    /// A new convergence target animates over
    /// [`DEFAULT_CONVERGENCE_MS`] starting from the value at `now`.
    pub fn set_params(&mut self, params: SimulationParams, now: Duration) -> ParamChange {
        let params = params.sanitized();
        let change = self.params.diff(&params);
        if change.is_empty() {
            return change;
        }
        self.params = params;

        if change.retarget {
            self.viewport.set_horizontal_shift(self.params.horizontal_shift);
        }
        if change.converge {
            self.convergence.animate_to(
                self.params.convergence(),
                Duration::from_millis(DEFAULT_CONVERGENCE_MS),
                now,
            );
        }
        if change.resize {
            self.viewport.set_size_multiplier(self.params.size_multiplier());
            self.viewport.snap_center();
        }
        if change.resize || change.reinitialize {
            self.reinitialize();
        }
        change
    }

    #[inline]
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Particles in draw order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn convergence(&self) -> &ConvergenceController {
        &self.convergence
    }

    /// Direct access for callers sequencing their own animations.
    #[inline]
    pub fn convergence_mut(&mut self) -> &mut ConvergenceController {
        &mut self.convergence
    }

    /// Frames stepped since creation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn dark_mode(&self) -> bool {
        self.params.dark_mode
    }
}
