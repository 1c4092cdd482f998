//! Combat orchestration: controllers, sessions, resolution, effects, and
//! strategy dispatch.

pub mod controller;
pub mod effects;
pub mod resolution;
pub mod session;
pub mod strategy;

pub use controller::CombatController;
pub use strategy::{CombatStrategy, StrategyRegistry};
