//! Simulation parameters supplied by the caller.
//!
//! These are owned by whatever configures the visualization (a scene file,
//! the model catalog, the demo cycle). The simulation reads them; it never
//! edits them. Every setter clamps to the supported range, so a
//! `SimulationParams` value is always usable.

use crate::color::Category;

pub const MIN_SPREAD: f32 = 0.2;
pub const MIN_SIZE_MULTIPLIER: f32 = 1.0;

/// Inputs that shape the formation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    /// Total particle count. Callers scale their own units before passing.
    pub points: u32,
    /// Drives spatial spread; typically 0-100.
    pub diversity: f32,
    /// Weighted, colored groups. Insertion order breaks rounding ties.
    pub categories: Vec<Category>,
    spread: f32,
    blur: f32,
    /// Offset of the formation center from the canvas center, in pixels.
    pub horizontal_shift: f32,
    convergence: f32,
    size_multiplier: f32,
    pub dark_mode: bool,
}

impl SimulationParams {
    pub fn new(points: u32, diversity: f32, categories: Vec<Category>) -> Self {
        Self {
            points,
            diversity: finite_or(diversity, 0.0),
            categories,
            ..Self::default()
        }
    }

    pub fn with_spread(mut self, spread: f32) -> Self {
        self.spread = finite_or(spread, 1.0).max(MIN_SPREAD);
        self
    }

    pub fn with_blur(mut self, blur: f32) -> Self {
        self.blur = finite_or(blur, 0.0).max(0.0);
        self
    }

    pub fn with_horizontal_shift(mut self, shift: f32) -> Self {
        self.horizontal_shift = finite_or(shift, 0.0);
        self
    }

    pub fn with_convergence(mut self, convergence: f32) -> Self {
        self.convergence = finite_or(convergence, 1.0).clamp(0.0, 1.0);
        self
    }

    pub fn with_size_multiplier(mut self, multiplier: f32) -> Self {
        self.size_multiplier = finite_or(multiplier, 1.0).max(MIN_SIZE_MULTIPLIER);
        self
    }

    pub fn with_dark_mode(mut self, dark: bool) -> Self {
        self.dark_mode = dark;
        self
    }

    /// Re-apply the clamps to the public fields.
    pub fn sanitized(mut self) -> Self {
        self.diversity = finite_or(self.diversity, 0.0).max(0.0);
        self.horizontal_shift = finite_or(self.horizontal_shift, 0.0);
        self
    }

    /// Orbit radius multiplier, at least [`MIN_SPREAD`].
    #[inline]
    pub fn spread(&self) -> f32 {
        self.spread
    }

    /// Glow sigma, at least 0.
    #[inline]
    pub fn blur(&self) -> f32 {
        self.blur
    }

    /// Target convergence in 0..=1.
    #[inline]
    pub fn convergence(&self) -> f32 {
        self.convergence
    }

    /// Canvas size relative to the viewport, at least 1.
    #[inline]
    pub fn size_multiplier(&self) -> f32 {
        self.size_multiplier
    }

    /// Classify what changed between `self` (old) and `next`.
    pub fn diff(&self, next: &SimulationParams) -> ParamChange {
        ParamChange {
            reinitialize: self.points != next.points
                || self.diversity != next.diversity
                || self.categories != next.categories
                || self.spread != next.spread
                || self.blur != next.blur,
            resize: self.size_multiplier != next.size_multiplier,
            retarget: self.horizontal_shift != next.horizontal_shift,
            converge: self.convergence != next.convergence,
            restyle: self.dark_mode != next.dark_mode,
        }
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            points: 0,
            diversity: 0.0,
            categories: Vec::new(),
            spread: 1.0,
            blur: 0.0,
            horizontal_shift: 0.0,
            convergence: 1.0,
            size_multiplier: 1.0,
            dark_mode: false,
        }
    }
}

/// What a parameter update requires of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamChange {
    /// Particle batch must be discarded and respawned.
    pub reinitialize: bool,
    /// Canvas buffer size changes (which also respawns).
    pub resize: bool,
    /// Only the target center moves.
    pub retarget: bool,
    /// Convergence controller gets a new target.
    pub converge: bool,
    /// Only rendering style changes.
    pub restyle: bool,
}

impl ParamChange {
    pub fn is_empty(&self) -> bool {
        *self == ParamChange::default()
    }
}

#[inline]
fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_setters_clamp() {
        let p = SimulationParams::new(10, 50.0, Vec::new())
            .with_spread(0.01)
            .with_blur(-4.0)
            .with_convergence(3.0)
            .with_size_multiplier(0.5);
        assert_eq!(p.spread(), MIN_SPREAD);
        assert_eq!(p.blur(), 0.0);
        assert_eq!(p.convergence(), 1.0);
        assert_eq!(p.size_multiplier(), 1.0);
    }

    #[test]
    fn test_non_finite_falls_back() {
        let p = SimulationParams::new(1, f32::NAN, Vec::new())
            .with_spread(f32::INFINITY)
            .with_horizontal_shift(f32::NAN)
            .with_convergence(f32::NAN);
        assert_eq!(p.diversity, 0.0);
        assert_eq!(p.spread(), 1.0);
        assert_eq!(p.horizontal_shift, 0.0);
        assert_eq!(p.convergence(), 1.0);
    }

    #[test]
    fn test_sanitized_fixes_public_fields() {
        let mut p = SimulationParams::new(5, 10.0, Vec::new());
        p.diversity = -3.0;
        p.horizontal_shift = f32::INFINITY;
        let p = p.sanitized();
        assert_eq!(p.diversity, 0.0);
        assert_eq!(p.horizontal_shift, 0.0);
    }

    #[test]
    fn test_diff_classifies_changes() {
        let base = SimulationParams::new(100, 40.0, vec![Category::new("a", Rgb::BLACK, 1.0)]);

        assert!(base.diff(&base).is_empty());
        assert!(base.diff(&base.clone().with_blur(2.0)).reinitialize);
        assert!(base.diff(&base.clone().with_spread(1.5)).reinitialize);

        let shifted = base.diff(&base.clone().with_horizontal_shift(-200.0));
        assert!(shifted.retarget && !shifted.reinitialize);

        let converged = base.diff(&base.clone().with_convergence(0.1));
        assert!(converged.converge && !converged.reinitialize);

        let dark = base.diff(&base.clone().with_dark_mode(true));
        assert_eq!(
            dark,
            ParamChange {
                restyle: true,
                ..ParamChange::default()
            }
        );

        let mut recolored = base.clone();
        recolored.categories[0].color = Rgb::WHITE;
        assert!(base.diff(&recolored).reinitialize);
    }
}
