//! Unattended tour through the model catalog.
//!
//! [`DemoCycle`] steps through one formation per model, every
//! [`ENTRY_DURATION`]. Each entry runs the same cue timeline against the
//! convergence controller:
//!
//! | at        | cue                              |
//! |-----------|----------------------------------|
//! | 0 ms      | collapse to 0.02 over 500 ms     |
//! | 350 ms    | expand to 1 over 1100 ms         |
//! | 18 000 ms | collapse to 0.02 over 800 ms     |
//! | 20 000 ms | move on to the next entry (wraps) |
//!
//! The expand cue lands mid-collapse; the controller picks up from the
//! value it has reached, so the formation never jumps. Advancing early
//! (or stopping) drops every pending cue of the current entry.

use std::time::Duration;

use crate::catalog::ModelCatalog;
use crate::convergence::COLLAPSED;
use crate::params::SimulationParams;
use crate::simulation::SimulationState;

/// Time each entry is shown.
pub const ENTRY_DURATION: Duration = Duration::from_millis(20_000);

/// Providers in tour order. Providers not listed are skipped.
pub const PROVIDER_SEQUENCE: [&str; 6] =
    ["aleph-alpha", "anthropic", "google", "meta", "openai", "xai"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cue {
    Converge { target: f32, duration: Duration },
    Advance,
}

const CUES: [(Duration, Cue); 4] = [
    (
        Duration::ZERO,
        Cue::Converge {
            target: COLLAPSED,
            duration: Duration::from_millis(500),
        },
    ),
    (
        Duration::from_millis(350),
        Cue::Converge {
            target: 1.0,
            duration: Duration::from_millis(1100),
        },
    ),
    (
        Duration::from_millis(18_000),
        Cue::Converge {
            target: COLLAPSED,
            duration: Duration::from_millis(800),
        },
    ),
    (ENTRY_DURATION, Cue::Advance),
];

/// One stop of the tour.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoEntry {
    /// `provider-model` slug.
    pub id: String,
    pub provider_name: String,
    pub model_name: String,
    pub params: SimulationParams,
}

/// Tour entries for `catalog`: providers in [`PROVIDER_SEQUENCE`] order,
/// each provider's models from fewest to most points.
pub fn demo_entries(catalog: &ModelCatalog) -> Vec<DemoEntry> {
    PROVIDER_SEQUENCE
        .iter()
        .filter_map(|id| catalog.provider(id))
        .flat_map(|provider| {
            let mut models: Vec<_> = provider
                .models
                .iter()
                .map(|model| (model, model.to_params()))
                .collect();
            models.sort_by_key(|(_, params)| params.points);
            models.into_iter().map(move |(model, params)| DemoEntry {
                id: format!("{}-{}", provider.id, model.id),
                provider_name: provider.name.clone(),
                model_name: model.name.clone(),
                params,
            })
        })
        .collect()
}

/// Cue scheduler for the tour.
#[derive(Debug, Clone)]
pub struct DemoCycle {
    entries: Vec<DemoEntry>,
    index: usize,
    entry_start: Duration,
    /// Index into [`CUES`] of the next cue to fire; `None` when stopped.
    next_cue: Option<usize>,
}

impl DemoCycle {
    pub fn new(entries: Vec<DemoEntry>) -> Self {
        Self {
            entries,
            index: 0,
            entry_start: Duration::ZERO,
            next_cue: None,
        }
    }

    pub fn from_catalog(catalog: &ModelCatalog) -> Self {
        Self::new(demo_entries(catalog))
    }

    /// Begin at the first entry. Does nothing if there are no entries.
    pub fn start(&mut self, now: Duration, state: &mut SimulationState) {
        if self.entries.is_empty() {
            log::warn!("Demo has no entries to show");
            return;
        }
        self.show(0, now, state);
    }

    /// Cancel every pending cue.
    pub fn stop(&mut self) {
        self.next_cue = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_cue.is_some()
    }

    /// Fire the cues that are due at `now`. Returns true if the tour moved
    /// to another entry.
    pub fn update(&mut self, now: Duration, state: &mut SimulationState) -> bool {
        let mut advanced = false;
        while let Some(cue_index) = self.next_cue {
            let Some(&(at, cue)) = CUES.get(cue_index) else {
                self.next_cue = None;
                break;
            };
            if now < self.entry_start + at {
                break;
            }
            match cue {
                Cue::Converge { target, duration } => {
                    state.convergence_mut().animate_to(target, duration, now);
                    self.next_cue = Some(cue_index + 1);
                }
                Cue::Advance => {
                    self.advance(now, state);
                    advanced = true;
                }
            }
        }
        advanced
    }

    /// Skip to the next entry right away, dropping the current entry's
    /// remaining cues.
    pub fn advance(&mut self, now: Duration, state: &mut SimulationState) {
        if self.entries.is_empty() {
            return;
        }
        let next = (self.index + 1) % self.entries.len();
        self.show(next, now, state);
    }

    fn show(&mut self, index: usize, now: Duration, state: &mut SimulationState) {
        self.index = index;
        self.entry_start = now;
        self.next_cue = Some(0);

        let entry = &self.entries[index];
        let current = state.params();
        // Keep the viewer's display settings; convergence is cue-driven.
        let params = entry
            .params
            .clone()
            .with_dark_mode(current.dark_mode)
            .with_horizontal_shift(current.horizontal_shift)
            .with_size_multiplier(current.size_multiplier())
            .with_convergence(current.convergence());
        state.set_params(params, now);

        log::info!(
            "Demo {}/{}: {} {} ({} points)",
            index + 1,
            self.entries.len(),
            entry.provider_name,
            entry.model_name,
            entry.params.points
        );
    }

    pub fn current(&self) -> Option<&DemoEntry> {
        self.entries.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[DemoEntry] {
        &self.entries
    }

    /// Position inside the current entry's window, 0..=1.
    pub fn progress(&self, now: Duration) -> f32 {
        if !self.is_running() {
            return 0.0;
        }
        let elapsed = now.saturating_sub(self.entry_start);
        (elapsed.as_secs_f32() / ENTRY_DURATION.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Category, Rgb};
    use crate::viewport::Viewport;

    fn entry(name: &str, points: u32) -> DemoEntry {
        DemoEntry {
            id: format!("lab-{}", name),
            provider_name: "Lab".into(),
            model_name: name.into(),
            params: SimulationParams::new(
                points,
                50.0,
                vec![Category::new("web", Rgb::new(29, 78, 216), 1.0)],
            ),
        }
    }

    fn state() -> SimulationState {
        SimulationState::with_seed(SimulationParams::default(), Viewport::new(800.0, 600.0, 1.0), 1)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_entries_follow_provider_order_then_points() {
        let catalog = ModelCatalog::builtin().unwrap();
        let entries = demo_entries(&catalog);
        assert_eq!(entries.len(), catalog.len());
        assert_eq!(entries[0].provider_name, "Aleph Alpha");
        assert_eq!(entries.last().map(|e| e.provider_name.as_str()), Some("xAI"));

        let openai: Vec<_> = entries.iter().filter(|e| e.id.starts_with("openai-")).collect();
        for pair in openai.windows(2) {
            assert!(pair[0].params.points <= pair[1].params.points);
        }
        assert_eq!(openai.first().map(|e| e.model_name.as_str()), Some("GPT-2"));
    }

    #[test]
    fn test_cue_timeline() {
        let mut state = state();
        let mut demo = DemoCycle::new(vec![entry("a", 100), entry("b", 200)]);
        demo.start(ms(0), &mut state);
        assert_eq!(state.particles().len(), 100);

        assert!(!demo.update(ms(0), &mut state));
        assert_eq!(state.convergence().target(), COLLAPSED);

        // Expand overrides the collapse mid-flight
        demo.update(ms(350), &mut state);
        assert_eq!(state.convergence().target(), 1.0);
        let resumed = state.convergence().value();
        assert!(resumed < 1.0 && resumed > COLLAPSED);

        demo.update(ms(18_000), &mut state);
        assert_eq!(state.convergence().target(), COLLAPSED);
        assert!((demo.progress(ms(18_000)) - 0.9).abs() < 1e-4);

        assert!(demo.update(ms(20_000), &mut state));
        assert_eq!(demo.index(), 1);
        assert_eq!(state.particles().len(), 200);
        // New entry's first cue fired on the same update
        assert_eq!(state.convergence().target(), COLLAPSED);
        assert_eq!(demo.progress(ms(20_000)), 0.0);
    }

    #[test]
    fn test_wraps_around() {
        let mut state = state();
        let mut demo = DemoCycle::new(vec![entry("a", 10), entry("b", 20)]);
        demo.start(ms(0), &mut state);
        demo.advance(ms(5), &mut state);
        demo.advance(ms(10), &mut state);
        assert_eq!(demo.index(), 0);
        assert_eq!(demo.current().map(|e| e.model_name.as_str()), Some("a"));
    }

    #[test]
    fn test_manual_advance_drops_pending_cues() {
        let mut state = state();
        let mut demo = DemoCycle::new(vec![entry("a", 10), entry("b", 20)]);
        demo.start(ms(0), &mut state);
        demo.update(ms(0), &mut state);

        demo.advance(ms(100), &mut state);
        demo.update(ms(100), &mut state);
        // The old entry's 350 ms expand must not fire at 350 ms
        demo.update(ms(360), &mut state);
        assert_eq!(state.convergence().target(), COLLAPSED);
        // The new entry's expand fires 350 ms after it started
        demo.update(ms(450), &mut state);
        assert_eq!(state.convergence().target(), 1.0);
    }

    #[test]
    fn test_stop_cancels_cues() {
        let mut state = state();
        let mut demo = DemoCycle::new(vec![entry("a", 10)]);
        demo.start(ms(0), &mut state);
        demo.stop();
        assert!(!demo.is_running());
        assert!(!demo.update(ms(30_000), &mut state));
        assert_eq!(demo.progress(ms(30_000)), 0.0);
        assert!(!state.convergence().is_animating());
    }

    #[test]
    fn test_display_settings_survive_advance() {
        let mut state = SimulationState::with_seed(
            SimulationParams::default().with_dark_mode(true),
            Viewport::new(800.0, 600.0, 1.0),
            2,
        );
        let mut demo = DemoCycle::new(vec![entry("a", 10), entry("b", 20)]);
        demo.start(ms(0), &mut state);
        demo.advance(ms(1), &mut state);
        assert!(state.dark_mode());
    }

    #[test]
    fn test_empty_demo_is_inert() {
        let mut state = state();
        let mut demo = DemoCycle::new(Vec::new());
        demo.start(ms(0), &mut state);
        demo.advance(ms(1), &mut state);
        assert!(!demo.is_running());
        assert!(demo.current().is_none());
    }
}
