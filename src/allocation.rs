//! Apportionment of particles across weighted categories.
//!
//! [`allocate`] uses largest-remainder (Hare quota) apportionment: every
//! category gets the floor of its exact proportional share, and the
//! particles left over go one by one to the categories with the largest
//! fractional remainder. Ties are broken by list order. The counts always
//! sum to the requested total and each count is within 1 of its share.

use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;

use crate::color::Category;

/// Particle count assigned to one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    /// Position of the category in the input list.
    pub index: usize,
    /// Whole number of particles assigned.
    pub count: u32,
    /// Exact (fractional) proportional share before rounding.
    pub exact_share: f64,
}

impl Allocation {
    #[inline]
    fn remainder(&self) -> f64 {
        self.exact_share - self.exact_share.floor()
    }
}

/// Split `point_count` particles across `categories` by weight.
///
/// Returns one entry per category, in input order. An empty category list
/// or a zero count yields an empty list. When no category has positive
/// weight, all categories are weighted equally.
pub fn allocate(point_count: u32, categories: &[Category]) -> Vec<Allocation> {
    if point_count == 0 || categories.is_empty() {
        return Vec::new();
    }

    let total: f64 = categories.iter().map(|c| c.weight() as f64).sum();
    let equal_weights = !(total > 0.0 && total.is_finite());
    if equal_weights {
        log::warn!(
            "All {} category ratios are zero, falling back to equal weighting",
            categories.len()
        );
    }

    let n = categories.len() as f64;
    let mut allocations: Vec<Allocation> = categories
        .iter()
        .enumerate()
        .map(|(index, category)| {
            let share = if equal_weights {
                1.0 / n
            } else {
                category.weight() as f64 / total
            };
            let exact_share = share * point_count as f64;
            Allocation {
                index,
                count: exact_share.floor() as u32,
                exact_share,
            }
        })
        .collect();

    let assigned: u32 = allocations.iter().map(|a| a.count).sum();
    let remaining = point_count.saturating_sub(assigned) as usize;

    // Stable sort keeps list order among equal remainders.
    let mut by_remainder: Vec<usize> = (0..allocations.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        allocations[b]
            .remainder()
            .partial_cmp(&allocations[a].remainder())
            .unwrap_or(Ordering::Equal)
    });

    for &i in by_remainder.iter().cycle().take(remaining) {
        allocations[i].count += 1;
    }

    allocations
}

/// Randomly permute `items` in place (Fisher-Yates).
///
/// Used after spawning so category colors interleave in draw order
/// instead of rendering in blocks.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
