//! Timer handles (runtime state)
//!
//! A [`Timer`] represents one scheduled callback and its lifecycle state.
//! Timers are created through the registry's factory operations and stay
//! registered until they are canceled or fire as a one-shot.
//!
//! # Lifecycle
//!
//! 1. [`TimerRegistry::after_ticks`] or [`TimerRegistry::after`] creates a
//!    `Running` timer and registers it
//! 2. Each registry update the timer either waits, fires, or (while paused)
//!    keeps its remaining time frozen
//! 3. Firing finishes a one-shot timer and restarts a looping one;
//!    cancellation detaches the timer at any point before that
//!
//! [`TimerRegistry::after_ticks`]: crate::registry::TimerRegistry::after_ticks
//! [`TimerRegistry::after`]: crate::registry::TimerRegistry::after

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::registry::RegistryShared;
use crate::tick::TimeUnit;

/// The lifecycle states of a [`Timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Counting down; fires once due.
    Running,
    /// Canceled by the host; detached from the registry, never fires again.
    Canceled,
    /// Suspended; elapsed ticks do not consume the remaining duration.
    Paused,
    /// Fired as a one-shot; detached from the registry.
    Finished,
}

/// Shared bookkeeping behind a [`Timer`] handle.
///
/// The registry's live collection and every host-retained handle point at the
/// same instance, so a detached timer still reports its terminal state. The
/// back-reference to the registry is weak: the registry owns its timers, a
/// timer only reaches back for control operations.
pub(crate) struct TimerShared {
    pub(crate) start_tick: Cell<TimeUnit>,
    pub(crate) duration: Cell<TimeUnit>,
    pub(crate) looping: Cell<bool>,
    pub(crate) state: Cell<TimerState>,
    pub(crate) on_execute: RefCell<Box<dyn FnMut()>>,
    pub(crate) registry: Weak<RegistryShared>,
}

/// Handle to one scheduled callback.
///
/// Created by the registry's factory operations. Clones are cheap and refer
/// to the same timer; equality is identity, never value comparison. All
/// control operations are total: pausing a finished timer, canceling twice,
/// and so on are defined no-ops.
#[derive(Clone)]
pub struct Timer {
    pub(crate) shared: Rc<TimerShared>,
}

impl Timer {
    /// Current lifecycle state.
    pub fn state(&self) -> TimerState {
        self.shared.state.get()
    }

    /// Registry clock value at which this timer was last (re)started.
    pub fn start_tick(&self) -> TimeUnit {
        self.shared.start_tick.get()
    }

    /// Ticks that must elapse from `start_tick` before the timer fires.
    pub fn duration(&self) -> TimeUnit {
        self.shared.duration.get()
    }

    /// Replace the duration. Takes effect on the next update evaluation.
    pub fn set_duration(&self, duration: impl Into<TimeUnit>) {
        self.shared.duration.set(duration.into());
    }

    /// Whether the timer restarts instead of finishing after it fires.
    pub fn looping(&self) -> bool {
        self.shared.looping.get()
    }

    /// Make the timer restart from the firing tick instead of finishing when
    /// it elapses. Defaults to off.
    pub fn set_looping(&self, looping: bool) {
        self.shared.looping.set(looping);
    }

    /// Cancel the timer, detaching it from its registry so it never fires.
    ///
    /// Idempotent: canceling an already canceled or finished timer does
    /// nothing.
    pub fn cancel(&self) {
        if self.state() == TimerState::Finished {
            return;
        }
        self.shared.state.set(TimerState::Canceled);
        if let Some(registry) = self.shared.registry.upgrade() {
            registry.remove_timer(self);
        }
        tracing::trace!(duration = %self.duration(), "Timer canceled");
    }

    /// Pause the timer. While paused it does not consume elapsed ticks, so
    /// [`time_left`](Timer::time_left) holds steady. Only effective on a
    /// running timer.
    pub fn pause(&self) {
        if self.state() == TimerState::Running {
            self.shared.state.set(TimerState::Paused);
        }
    }

    /// Resume a paused timer. Only effective on a paused timer.
    pub fn resume(&self) {
        if self.state() == TimerState::Paused {
            self.shared.state.set(TimerState::Running);
        }
    }

    /// Ticks remaining until the timer is due, computed on demand as
    /// `(duration + start_tick) - current_tick`.
    ///
    /// Zero or negative the instant the timer becomes due, before the update
    /// pass processes it. A handle whose registry has been dropped reports
    /// zero.
    pub fn time_left(&self) -> TimeUnit {
        let Some(registry) = self.shared.registry.upgrade() else {
            return TimeUnit::ZERO;
        };
        (self.duration() + self.start_tick()) - registry.current_tick()
    }

    /// Restart the countdown from the registry's current tick.
    ///
    /// The timer's state is left untouched: restarting a paused timer keeps
    /// it paused, and the paused-tick accounting then holds the full duration
    /// until it is resumed.
    pub fn restart(&self) {
        if let Some(registry) = self.shared.registry.upgrade() {
            self.shared.start_tick.set(registry.current_tick());
        }
    }
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Eq for Timer {}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("state", &self.state())
            .field("start_tick", &self.start_tick())
            .field("duration", &self.duration())
            .field("looping", &self.looping())
            .finish_non_exhaustive()
    }
}
