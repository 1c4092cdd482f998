//! Tick-driven combat runtime for the valegard stack.
//!
//! `combat-runtime` owns the live state and time: the actor registry, the
//! cooperative tick scheduler, per-actor combat controllers, and the
//! background worker that pulses everything on the wall clock. The rules
//! themselves live in `combat-core`; definitions in `combat-content`.

pub mod combat;
pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod worker;
pub mod world;

pub use combat::{CombatController, CombatStrategy, StrategyRegistry};
pub use context::CombatContext;
pub use engine::CombatEngine;
pub use error::{Result, RuntimeError};
pub use events::{DeclineReason, EventBus, GameEvent, StatusEffect};
pub use scheduler::{Repeat, Task, TaskHandle, TaskState, TickScheduler};
pub use worker::{ActorView, CombatHandle, CombatWorker, Command};
pub use world::{Actor, ActorBlueprint, Movement, NpcProfile, Spell, WeaponProfile, World};
