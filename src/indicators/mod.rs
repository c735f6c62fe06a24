// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the
// screen.  Series functions return one `Option<f64>` per input close so that
// "window not yet full" is explicit and never confused with a computed zero.

pub mod ema;
pub mod frame;
pub mod macd;
pub mod returns;
pub mod rsi;
pub mod sma;

pub use frame::{compute, IndicatorFrame, IndicatorParams};
