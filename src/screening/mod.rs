// =============================================================================
// Screening Module
// =============================================================================
//
// - Rule sets (strict / trend / custom thresholds)
// - Screening engine (last-row verdict + metric snapshot)

pub mod engine;
pub mod rules;

pub use engine::{ScreeningEngine, ScreeningResult};
pub use rules::{RuleProfile, RuleSet};
