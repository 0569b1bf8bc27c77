//! Error types for scheduler configuration

use thiserror::Error;

/// A tick rate of zero ticks per second was supplied.
///
/// Rates are validated at the point of construction so that conversion code
/// never has to deal with a zero divisor.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("tick rate must be at least one tick per second")]
pub struct TickRateError;
