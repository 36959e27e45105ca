//! Stream combinators for clock ticks

mod throttle;

pub use throttle::{Throttle, ThrottleExt};
