//! The timer registry (scheduler core)
//!
//! [`TimerRegistry`] owns the live timers, advances a monotonic tick clock,
//! and on each [`update`](TimerRegistry::update) fires the callbacks of
//! timers that have become due. Everything happens synchronously on the
//! thread driving the frame loop; callbacks may re-enter the registry to
//! register, cancel, or clear timers mid-pass.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::tick::{TickRate, TimeUnit};
use crate::timer::{Timer, TimerShared, TimerState};

const TICK: TimeUnit = TimeUnit::new(1);

/// State shared between a registry's handles and its timers' back-references.
pub(crate) struct RegistryShared {
    timers: RefCell<Vec<Timer>>,
    current_tick: Cell<TimeUnit>,
    tick_rate: TickRate,
}

impl RegistryShared {
    pub(crate) fn current_tick(&self) -> TimeUnit {
        self.current_tick.get()
    }

    /// Remove the collection entry matching the given timer by identity.
    /// Entries are unique, so at most one removal occurs.
    pub(crate) fn remove_timer(&self, timer: &Timer) {
        let mut timers = self.timers.borrow_mut();
        if let Some(index) = timers.iter().position(|entry| entry == timer) {
            timers.remove(index);
        }
    }
}

/// Owns scheduled timers and drives them from the host's frame loop.
///
/// The host calls [`update`](TimerRegistry::update) exactly once per logical
/// tick. Cloning yields another handle to the same registry, which is how a
/// firing callback gets to register new timers; the registry is single
/// threaded and must only ever be touched from the thread driving it.
#[derive(Clone)]
pub struct TimerRegistry {
    shared: Rc<RegistryShared>,
}

impl TimerRegistry {
    /// Create an empty registry with its clock at tick zero.
    pub fn new(tick_rate: TickRate) -> Self {
        Self {
            shared: Rc::new(RegistryShared {
                timers: RefCell::new(Vec::new()),
                current_tick: Cell::new(TimeUnit::ZERO),
                tick_rate,
            }),
        }
    }

    /// The tick rate used for duration conversion in [`after`](TimerRegistry::after).
    pub fn tick_rate(&self) -> TickRate {
        self.shared.tick_rate
    }

    /// Current value of the registry clock.
    pub fn current_tick(&self) -> TimeUnit {
        self.shared.current_tick.get()
    }

    /// Schedule `on_execute` to run after `tick_count` ticks.
    ///
    /// The timer starts running at the current tick and is returned as a
    /// handle for later control. A count of zero fires on the very next
    /// update. Safe to call from within a firing callback; the new timer is
    /// first evaluated on the next update.
    pub fn after_ticks(
        &self,
        tick_count: impl Into<TimeUnit>,
        on_execute: impl FnMut() + 'static,
    ) -> Timer {
        let duration = tick_count.into();
        let timer = Timer {
            shared: Rc::new(TimerShared {
                start_tick: Cell::new(self.current_tick()),
                duration: Cell::new(duration),
                looping: Cell::new(false),
                state: Cell::new(TimerState::Running),
                on_execute: RefCell::new(Box::new(on_execute)),
                registry: Rc::downgrade(&self.shared),
            }),
        };
        self.shared.timers.borrow_mut().push(timer.clone());
        tracing::trace!(duration = %duration, start = %timer.start_tick(), "Timer registered");
        timer
    }

    /// Schedule `on_execute` to run after a wall-clock duration, converted to
    /// whole ticks at the registry's tick rate.
    ///
    /// Granularity is whole ticks and fractions truncate: at 60 ticks/s a
    /// tick is ~16.67 ms, so a 20 ms duration fires after one tick and a
    /// 16 ms duration fires on the very next update.
    pub fn after(&self, duration: Duration, on_execute: impl FnMut() + 'static) -> Timer {
        self.after_ticks(
            TimeUnit::from_duration(duration, self.shared.tick_rate),
            on_execute,
        )
    }

    /// Advance the clock by one tick and fire every timer that has become
    /// due. Call exactly once per host tick.
    ///
    /// Callbacks run synchronously on the calling thread and may cancel,
    /// pause, resume, or restart any timer (themselves included), register
    /// new timers through a registry clone, or call
    /// [`clear`](TimerRegistry::clear). Calling `update` itself from within a
    /// callback is not supported.
    pub fn update(&self) {
        let now = self.current_tick() + TICK;
        self.shared.current_tick.set(now);

        // Iterate over a snapshot so callbacks can mutate the live collection
        // without corrupting the scan. Timers added during the pass are not
        // in the snapshot; timers removed during it are skipped by the state
        // check below.
        let snapshot = self.shared.timers.borrow().clone();
        for timer in snapshot {
            match timer.state() {
                // Advancing the reference point keeps time_left() constant
                // while the clock moves past a paused timer.
                TimerState::Paused => {
                    let start = timer.shared.start_tick.get();
                    timer.shared.start_tick.set(start + TICK);
                }
                TimerState::Running
                    if now - timer.shared.start_tick.get() >= timer.shared.duration.get() =>
                {
                    self.fire(&timer, now);
                }
                _ => {}
            }
        }
    }

    fn fire(&self, timer: &Timer, now: TimeUnit) {
        {
            // No registry borrow is held here, so the callback is free to
            // re-enter.
            let mut on_execute = timer.shared.on_execute.borrow_mut();
            on_execute();
        }
        if timer.shared.looping.get() {
            timer.shared.start_tick.set(now);
            tracing::trace!(tick = %now, "Looping timer fired");
        } else {
            timer.shared.state.set(TimerState::Finished);
            self.shared.remove_timer(timer);
            tracing::trace!(tick = %now, "Timer fired");
        }
    }

    /// Cancel every live timer and empty the registry.
    ///
    /// Safe to call from within a firing callback: the rest of that update
    /// pass sees the canceled states and fires nothing further.
    pub fn clear(&self) {
        {
            let timers = self.shared.timers.borrow();
            for timer in timers.iter() {
                if timer.state() != TimerState::Finished {
                    timer.shared.state.set(TimerState::Canceled);
                }
            }
        }
        let removed = {
            let mut timers = self.shared.timers.borrow_mut();
            let removed = timers.len();
            timers.clear();
            removed
        };
        tracing::debug!(removed, "Registry cleared");
    }

    /// Snapshot of the live timer handles.
    pub fn timers(&self) -> Vec<Timer> {
        self.shared.timers.borrow().clone()
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.shared.timers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.timers.borrow().is_empty()
    }
}

impl fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("current_tick", &self.current_tick())
            .field("tick_rate", &self.tick_rate())
            .field("timers", &self.len())
            .finish()
    }
}
