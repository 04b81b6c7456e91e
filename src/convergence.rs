//! The convergence controller.
//!
//! Convergence is a 0..1 scalar controlling how tightly the formation
//! clusters: 0 is fully collapsed, 1 is the designed spread. The
//! controller animates it along an eased timeline that is independent of
//! the physics integration.
//!
//! # State machine
//!
//! ```text
//!            animate_to(T, D)                 t >= 1
//! Idle(v) ───────────────────► Animating ─────────────► Idle(T)
//!                               │     ▲
//!                               └─────┘ animate_to / set: the old
//!                                       completion resolves Superseded
//! ```
//!
//! Retargeting always starts from the instantaneous value at the moment of
//! the call, so the value never jumps.
//!
//! Every animation hands back a [`Completion`] that resolves exactly once,
//! either [`Outcome::Completed`] or [`Outcome::Superseded`]. It can be
//! polled directly or `.await`ed, which is how collapse → pause → expand
//! sequences are composed without blocking the frame loop.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

/// Exponent of [`convergence_scale`].
pub const SCALE_EXPONENT: f32 = 0.85;
/// Default duration when a caller changes the convergence target.
pub const DEFAULT_CONVERGENCE_MS: u64 = 800;
/// Convergence used for a collapsed formation.
pub const COLLAPSED: f32 = 0.02;

/// Ease-in-out curve with zero slope at both ends.
///
/// `t` is clamped to `[0, 1]`; `ease(0) == 0` and `ease(1) == 1` exactly.
#[inline]
pub fn ease(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t >= 1.0 {
        return 1.0;
    }
    0.5 - (PI * t).cos() / 2.0
}

/// Map a convergence value to the factor applied to orbit radii.
///
/// Slightly slower than linear early on.
#[inline]
pub fn convergence_scale(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0).powf(SCALE_EXPONENT)
}

/// How an animation's completion was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The animation ran to its end and the value snapped to the target.
    Completed,
    /// A newer animation or a direct `set` replaced it first.
    Superseded,
}

#[derive(Debug, Default)]
struct Slot {
    outcome: Option<Outcome>,
    waker: Option<Waker>,
}

/// Handle to a pending convergence animation.
///
/// Cloning yields another handle to the same completion. Resolution happens
/// once; later attempts are ignored.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    slot: Rc<RefCell<Slot>>,
}

impl Completion {
    fn new() -> Self {
        Self::default()
    }

    /// An already-completed handle.
    pub fn completed() -> Self {
        let completion = Self::new();
        completion.resolve(Outcome::Completed);
        completion
    }

    fn resolve(&self, outcome: Outcome) {
        let waker = {
            let mut slot = self.slot.borrow_mut();
            if slot.outcome.is_some() {
                return;
            }
            slot.outcome = Some(outcome);
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// The outcome, once resolved.
    pub fn outcome(&self) -> Option<Outcome> {
        self.slot.borrow().outcome
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.outcome().is_some()
    }
}

impl Future for Completion {
    type Output = Outcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Outcome> {
        let mut slot = self.slot.borrow_mut();
        match slot.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

#[derive(Debug, Clone)]
enum State {
    Idle {
        value: f32,
    },
    Animating {
        from: f32,
        to: f32,
        start: Duration,
        duration: Duration,
        completion: Completion,
    },
}

/// Eased convergence timeline.
#[derive(Debug, Clone)]
pub struct ConvergenceController {
    state: State,
    /// Value at the most recent sample.
    current: f32,
}

impl ConvergenceController {
    /// Start idle at `value` (clamped to 0..=1).
    pub fn new(value: f32) -> Self {
        let value = sanitize(value);
        Self {
            state: State::Idle { value },
            current: value,
        }
    }

    /// Value as of the last [`sample`](Self::sample).
    #[inline]
    pub fn value(&self) -> f32 {
        self.current
    }

    /// [`convergence_scale`] of the current value.
    #[inline]
    pub fn scale(&self) -> f32 {
        convergence_scale(self.current)
    }

    /// Value the controller is heading to (or resting at).
    pub fn target(&self) -> f32 {
        match &self.state {
            State::Idle { value } => *value,
            State::Animating { to, .. } => *to,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, State::Animating { .. })
    }

    /// Advance the timeline to `now` and return the value.
    ///
    /// When the animation's normalized time reaches 1 the value snaps to
    /// the target exactly and the completion resolves.
    pub fn sample(&mut self, now: Duration) -> f32 {
        let finished = match &self.state {
            State::Idle { value } => {
                self.current = *value;
                None
            }
            State::Animating {
                from,
                to,
                start,
                duration,
                completion,
            } => {
                let t = progress(now, *start, *duration);
                if t >= 1.0 {
                    Some((*to, completion.clone()))
                } else {
                    self.current = from + (to - from) * ease(t);
                    None
                }
            }
        };

        if let Some((to, completion)) = finished {
            self.state = State::Idle { value: to };
            self.current = to;
            completion.resolve(Outcome::Completed);
        }

        self.current
    }

    /// Animate from the value at `now` toward `target` over `duration`.
    ///
    /// Any in-flight animation is cancelled and its completion resolves as
    /// [`Outcome::Superseded`].
    pub fn animate_to(&mut self, target: f32, duration: Duration, now: Duration) -> Completion {
        let from = self.sample(now);
        self.supersede();

        let completion = Completion::new();
        self.state = State::Animating {
            from,
            to: sanitize(target),
            start: now,
            duration,
            completion: completion.clone(),
        };
        completion
    }

    /// Jump straight to `value`, cancelling any animation.
    pub fn set(&mut self, value: f32) {
        self.supersede();
        let value = sanitize(value);
        self.state = State::Idle { value };
        self.current = value;
    }

    fn supersede(&mut self) {
        if let State::Animating { completion, .. } = &self.state {
            completion.resolve(Outcome::Superseded);
        }
    }
}

impl Default for ConvergenceController {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn progress(now: Duration, start: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0) as f32
}

/// One step of a [`Choreography`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Animate { target: f32, duration: Duration },
    Pause(Duration),
}

#[derive(Debug)]
enum Running {
    Animate(Completion),
    Pause { until: Duration },
}

/// A queue of convergence animations and pauses run back to back.
///
/// Each step starts when the previous one finishes. If an animation is
/// superseded by someone else driving the controller, the rest of the
/// sequence is dropped.
#[derive(Debug, Default)]
pub struct Choreography {
    steps: VecDeque<Step>,
    running: Option<Running>,
}

impl Choreography {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            running: None,
        }
    }

    /// Collapse, hold, then expand back to full spread.
    pub fn pulse() -> Self {
        Self::new([
            Step::Animate {
                target: COLLAPSED,
                duration: Duration::from_millis(500),
            },
            Step::Pause(Duration::from_millis(400)),
            Step::Animate {
                target: 1.0,
                duration: Duration::from_millis(1000),
            },
        ])
    }

    pub fn is_finished(&self) -> bool {
        self.running.is_none() && self.steps.is_empty()
    }

    /// Drop all remaining steps.
    pub fn cancel(&mut self) {
        self.steps.clear();
        self.running = None;
    }

    /// Drive the sequence. Call once per frame before sampling.
    pub fn update(&mut self, now: Duration, controller: &mut ConvergenceController) {
        loop {
            match &self.running {
                Some(Running::Animate(completion)) => match completion.outcome() {
                    None => return,
                    Some(Outcome::Completed) => self.running = None,
                    Some(Outcome::Superseded) => {
                        self.cancel();
                        return;
                    }
                },
                Some(Running::Pause { until }) => {
                    if now < *until {
                        return;
                    }
                    self.running = None;
                }
                None => {}
            }

            let Some(step) = self.steps.pop_front() else {
                return;
            };
            self.running = Some(match step {
                Step::Animate { target, duration } => {
                    Running::Animate(controller.animate_to(target, duration, now))
                }
                Step::Pause(duration) => Running::Pause {
                    until: now + duration,
                },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_ease_endpoints_are_exact() {
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(1.0), 1.0);
        assert!((ease(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ease_is_non_decreasing() {
        let mut last = ease(0.0);
        for i in 1..=1000 {
            let v = ease(i as f32 / 1000.0);
            assert!(v >= last, "ease dipped at {}", i);
            last = v;
        }
    }

    #[test]
    fn test_scale_is_monotone_and_clamped() {
        assert_eq!(convergence_scale(-1.0), 0.0);
        assert_eq!(convergence_scale(0.0), 0.0);
        assert_eq!(convergence_scale(1.0), 1.0);
        assert_eq!(convergence_scale(7.0), 1.0);
        assert!(convergence_scale(0.25) > 0.25);
        assert!(convergence_scale(0.3) < convergence_scale(0.31));
    }

    #[test]
    fn test_animation_reaches_target_exactly() {
        let mut c = ConvergenceController::new(1.0);
        let done = c.animate_to(0.02, ms(500), ms(0));
        assert!(c.is_animating());
        let mid = c.sample(ms(250));
        assert!(mid < 1.0 && mid > 0.02);
        assert!(done.outcome().is_none());
        assert_eq!(c.sample(ms(500)), 0.02);
        assert!(!c.is_animating());
        assert_eq!(done.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn test_retarget_is_continuous() {
        let mut c = ConvergenceController::new(0.0);
        let first = c.animate_to(1.0, ms(1000), ms(0));
        let before = c.sample(ms(300));
        let _second = c.animate_to(0.0, ms(1000), ms(300));
        let after = c.sample(ms(300));
        assert!((before - after).abs() <= f32::EPSILON);
        assert_eq!(first.outcome(), Some(Outcome::Superseded));
    }

    #[test]
    fn test_retarget_without_intermediate_sample_uses_live_value() {
        let mut c = ConvergenceController::new(0.0);
        c.animate_to(1.0, ms(1000), ms(0));
        // No sample between: the retarget itself must evaluate the curve
        c.animate_to(0.0, ms(1000), ms(500));
        assert!((c.value() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_completion_fires_once() {
        let mut c = ConvergenceController::new(0.0);
        let done = c.animate_to(1.0, ms(100), ms(0));
        c.sample(ms(200));
        // A later set must not flip an already-completed handle
        c.set(0.4);
        assert_eq!(done.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn test_set_supersedes() {
        let mut c = ConvergenceController::new(0.0);
        let done = c.animate_to(1.0, ms(100), ms(0));
        c.set(0.7);
        assert_eq!(done.outcome(), Some(Outcome::Superseded));
        assert_eq!(c.sample(ms(1000)), 0.7);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut c = ConvergenceController::new(0.0);
        let done = c.animate_to(2.0, Duration::ZERO, ms(10));
        assert_eq!(c.sample(ms(10)), 1.0);
        assert!(done.is_resolved());
    }

    #[test]
    fn test_completion_as_future() {
        let mut cx = Context::from_waker(Waker::noop());
        let mut c = ConvergenceController::new(1.0);
        let mut done = c.animate_to(0.0, ms(100), ms(0));
        assert_eq!(Pin::new(&mut done).poll(&mut cx), Poll::Pending);
        c.sample(ms(100));
        assert_eq!(Pin::new(&mut done).poll(&mut cx), Poll::Ready(Outcome::Completed));
    }

    #[test]
    fn test_pulse_choreography() {
        let mut c = ConvergenceController::new(1.0);
        let mut pulse = Choreography::pulse();

        let mut now = Duration::ZERO;
        let mut lowest = 1.0f32;
        while !pulse.is_finished() && now < ms(5000) {
            pulse.update(now, &mut c);
            lowest = lowest.min(c.sample(now));
            now += ms(16);
        }

        assert!(pulse.is_finished());
        assert!((lowest - COLLAPSED).abs() < 1e-6);
        assert_eq!(c.value(), 1.0);
        // 500 + 400 + 1000 ms, rounded up to frame boundaries
        assert!(now >= ms(1900) && now < ms(2100), "finished at {:?}", now);
    }

    #[test]
    fn test_choreography_stops_when_superseded() {
        let mut c = ConvergenceController::new(1.0);
        let mut pulse = Choreography::pulse();
        pulse.update(ms(0), &mut c);
        c.animate_to(0.5, ms(100), ms(100));
        pulse.update(ms(200), &mut c);
        assert!(pulse.is_finished());
        assert_eq!(c.target(), 0.5);
    }
}
