//! # bizpulse Simulator
//!
//! The "what-if" cost calculator: baseline profit and ROI, the same figures after
//! percentage changes to individual cost lines, and the direction of the change.
//! Also converts live metal prices into a raw-material cost for a given quantity.

pub mod engine;
pub mod error;
pub mod metals;

pub use engine::{simulate, BaselineCosts, CostDeltas, RoiTrend, SimulationResult};
pub use error::SimulatorError;
pub use metals::{MassUnit, MetalCatalog, MetalQuote};
