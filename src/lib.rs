//! Tick-based deferred-callback scheduling for fixed-timestep loops.
//!
//! This crate provides:
//! - **[`TimerRegistry`]**: owns scheduled timers, advances a monotonic tick
//!   clock, and fires due callbacks from its per-tick
//!   [`update`](TimerRegistry::update)
//! - **[`Timer`]**: a handle to one scheduled callback, supporting pause,
//!   resume, cancel, and restart
//! - **[`TimeUnit`] / [`TickRate`]**: tick counting and wall-clock conversion
//!
//! Everything runs synchronously on the thread driving the frame loop: the
//! host calls [`TimerRegistry::update`] once per logical tick and callbacks
//! execute inline. Callbacks may re-enter the registry: registering,
//! canceling, and clearing timers mid-pass is safe, and a timer added during
//! a pass is first evaluated on the next one.
//!
//! # Quick Start
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use tickbeat::{TickRate, TimerRegistry};
//!
//! let registry = TimerRegistry::new(TickRate::new(60)?);
//!
//! let fired = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&fired);
//! registry.after_ticks(3, move || flag.set(true));
//!
//! // Host frame loop: one update per tick.
//! for _ in 0..3 {
//!     registry.update();
//! }
//! assert!(fired.get());
//! # Ok::<(), tickbeat::TickRateError>(())
//! ```

pub mod error;
pub mod registry;
pub mod tick;
pub mod timer;

pub use error::TickRateError;
pub use registry::TimerRegistry;
pub use tick::{TickRate, TimeUnit};
pub use timer::{Timer, TimerState};
