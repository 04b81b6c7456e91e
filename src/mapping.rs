//! Conversions from dataset metrics to visual parameters.
//!
//! Models are described by scores (diversity and transparency, 0-100),
//! training size (tokens or parameters) and a breakdown of data sources.
//! These functions turn those numbers into particle count, spread, glow
//! and the diversity the spawn geometry sees.

/// Structure diameter for a diversity score of 0.
pub const MIN_DIAMETER: f64 = 24.0;
/// Structure diameter for a diversity score of 100.
pub const MAX_DIAMETER: f64 = 96.0;
/// Diameter that maps to a spread of 1.
pub const BASELINE_DIAMETER: f64 = (MIN_DIAMETER + MAX_DIAMETER) / 2.0;

pub const MAX_BLUR_SIGMA: f64 = 12.0;

pub const POINTS_MAX: u32 = 3000;
/// log10 of the token count that maps to 0 points.
pub const LOG_TOKEN_MIN: f64 = 11.0;
/// log10 of the token count that maps to [`POINTS_MAX`].
pub const LOG_TOKEN_MAX: f64 = 14.06;
/// Rough tokens-per-parameter ratio when only the parameter count is known.
pub const PARAMETER_TO_TOKEN_FACTOR: f64 = 20.0;
/// Points used when neither tokens nor parameters are known.
pub const FALLBACK_POINTS: u32 = 1200;

/// Diversity reported when no source has positive weight.
pub const UNKNOWN_ENTROPY_SCORE: u32 = 10;

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Structure diameter in 24..=96 for a 0-100 diversity score.
pub fn diversity_to_diameter(score: f64) -> u32 {
    let normalized = clamp_score(score) / 100.0;
    (MIN_DIAMETER + normalized * (MAX_DIAMETER - MIN_DIAMETER)).round() as u32
}

/// Spread factor for a structure diameter, never below 0.2.
pub fn diameter_to_spread(diameter: f64) -> f32 {
    let spread = if diameter.is_finite() {
        diameter / BASELINE_DIAMETER
    } else {
        1.0
    };
    (spread as f32).max(crate::params::MIN_SPREAD)
}

/// Glow sigma for a transparency score: opaque data glows most.
///
/// Rounded to two decimals.
pub fn transparency_to_blur(score: f64) -> f32 {
    let inverted = 100.0 - clamp_score(score);
    let blur = inverted / 100.0 * MAX_BLUR_SIGMA;
    ((blur * 100.0).round() / 100.0) as f32
}

/// Map a training token count onto 0..=3000 points on a log scale.
///
/// Returns `None` when the count is missing or not positive.
pub fn tokens_to_points(tokens: Option<f64>) -> Option<u32> {
    let tokens = tokens.filter(|t| t.is_finite() && *t > 0.0)?;
    let normalized = (tokens.log10() - LOG_TOKEN_MIN) / (LOG_TOKEN_MAX - LOG_TOKEN_MIN);
    let scaled = normalized.clamp(0.0, 1.0) * POINTS_MAX as f64;
    Some(scaled.round() as u32)
}

/// Particle count for a model, with whether it had to be estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsEstimate {
    pub points: u32,
    /// True unless the count came from a known token figure.
    pub estimated: bool,
}

/// Points from tokens, else from parameters, else [`FALLBACK_POINTS`].
pub fn estimate_points(tokens: Option<f64>, parameters: Option<f64>) -> PointsEstimate {
    if let Some(points) = tokens_to_points(tokens) {
        return PointsEstimate {
            points,
            estimated: false,
        };
    }

    let from_parameters = parameters
        .filter(|p| *p > 0.0)
        .map(|p| p * PARAMETER_TO_TOKEN_FACTOR);
    PointsEstimate {
        points: tokens_to_points(from_parameters).unwrap_or(FALLBACK_POINTS),
        estimated: true,
    }
}

/// How evenly weight spreads across sources, as a 0-100 score.
///
/// Normalized Shannon entropy of the positive ratios. A single source
/// scores 0; no positive weight at all scores [`UNKNOWN_ENTROPY_SCORE`].
pub fn color_entropy_score(ratios: &[f64]) -> u32 {
    let positive: Vec<f64> = ratios
        .iter()
        .copied()
        .filter(|r| r.is_finite() && *r > 0.0)
        .collect();
    let total: f64 = positive.iter().sum();
    if positive.is_empty() || total <= 0.0 {
        return UNKNOWN_ENTROPY_SCORE;
    }
    if positive.len() == 1 {
        return 0;
    }

    let entropy: f64 = -positive
        .iter()
        .map(|r| {
            let p = r / total;
            p * p.ln()
        })
        .sum::<f64>();
    let max_entropy = (positive.len() as f64).ln();
    (entropy / max_entropy * 100.0).round() as u32
}

/// Diversity fed to the simulation: the dataset score averaged with the
/// source entropy, or the entropy alone when no dataset score exists.
pub fn blended_diversity(dataset_score: f64, entropy_score: u32) -> f32 {
    let dataset_score = if dataset_score.is_finite() {
        dataset_score
    } else {
        0.0
    };
    if dataset_score == 0.0 {
        entropy_score as f32
    } else {
        ((dataset_score + entropy_score as f64) / 2.0).round() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diameter_range() {
        assert_eq!(diversity_to_diameter(0.0), 24);
        assert_eq!(diversity_to_diameter(50.0), 60);
        assert_eq!(diversity_to_diameter(100.0), 96);
        assert_eq!(diversity_to_diameter(250.0), 96);
        assert_eq!(diversity_to_diameter(-5.0), 24);
        assert_eq!(diversity_to_diameter(f64::NAN), 24);
    }

    #[test]
    fn test_spread_from_diameter() {
        assert_eq!(diameter_to_spread(60.0), 1.0);
        assert_eq!(diameter_to_spread(96.0), 1.6);
        assert_eq!(diameter_to_spread(0.0), 0.2);
    }

    #[test]
    fn test_blur_rounding() {
        assert_eq!(transparency_to_blur(100.0), 0.0);
        assert_eq!(transparency_to_blur(0.0), 12.0);
        assert_eq!(transparency_to_blur(65.0), 4.2);
        assert_eq!(transparency_to_blur(33.0), 8.04);
    }

    #[test]
    fn test_tokens_to_points() {
        assert_eq!(tokens_to_points(None), None);
        assert_eq!(tokens_to_points(Some(0.0)), None);
        assert_eq!(tokens_to_points(Some(-1.0)), None);
        assert_eq!(tokens_to_points(Some(1e10)), Some(0));
        assert_eq!(tokens_to_points(Some(1e11)), Some(0));
        assert_eq!(tokens_to_points(Some(1e15)), Some(3000));
        // log10(1e13) = 13 -> (2 / 3.06) * 3000
        assert_eq!(tokens_to_points(Some(1e13)), Some(1961));
    }

    #[test]
    fn test_estimate_points_fallback_chain() {
        let known = estimate_points(Some(1e13), Some(1e9));
        assert_eq!(known, PointsEstimate { points: 1961, estimated: false });

        // 5e11 parameters -> 1e13 tokens
        let from_params = estimate_points(None, Some(5e11));
        assert_eq!(from_params, PointsEstimate { points: 1961, estimated: true });

        let unknown = estimate_points(None, None);
        assert_eq!(unknown, PointsEstimate { points: FALLBACK_POINTS, estimated: true });

        let zero = estimate_points(Some(0.0), Some(0.0));
        assert_eq!(zero.points, FALLBACK_POINTS);
    }

    #[test]
    fn test_entropy_score() {
        assert_eq!(color_entropy_score(&[25.0, 25.0, 25.0, 25.0]), 100);
        assert_eq!(color_entropy_score(&[100.0]), 0);
        assert_eq!(color_entropy_score(&[100.0, 0.0, 0.0]), 0);
        assert_eq!(color_entropy_score(&[]), UNKNOWN_ENTROPY_SCORE);
        assert_eq!(color_entropy_score(&[0.0, -4.0]), UNKNOWN_ENTROPY_SCORE);

        let skewed = color_entropy_score(&[90.0, 2.0, 8.0]);
        assert!(skewed > 0 && skewed < 50, "skewed {}", skewed);
    }

    #[test]
    fn test_blended_diversity() {
        assert_eq!(blended_diversity(0.0, 40), 40.0);
        assert_eq!(blended_diversity(60.0, 41), 51.0);
        assert_eq!(blended_diversity(f64::NAN, 7), 7.0);
    }
}
