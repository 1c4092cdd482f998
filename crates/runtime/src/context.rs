//! Execution context handed to tasks and strategies.

use combat_core::config::CombatConfig;
use combat_core::rng::{RngOracle, compute_seed};
use combat_core::types::{ActorId, Tick};
use combat_core::zone::ZoneOracle;

use crate::combat::strategy::StrategyRegistry;
use crate::events::EventBus;
use crate::scheduler::{Repeat, Scheduled, Task, TaskHandle};
use crate::world::World;

/// Everything one slice of combat work is allowed to touch.
///
/// The engine assembles a fresh context per task execution and per external
/// command. Tasks spawned through the context land in a pending queue and
/// run no earlier than the next pulse, which keeps the current pulse's
/// iteration order stable.
pub struct CombatContext<'a> {
    pub world: &'a mut World,
    pub now: Tick,
    pub config: &'a CombatConfig,
    pub rng: &'a dyn RngOracle,
    pub zones: &'a dyn ZoneOracle,
    pub strategies: &'a StrategyRegistry,
    pub events: &'a EventBus,
    pub(crate) world_seed: u64,
    pub(crate) pending: &'a mut Vec<Scheduled>,
}

impl CombatContext<'_> {
    /// Schedule a task to run after `delay` ticks.
    pub fn spawn_task(
        &mut self,
        delay: u64,
        repeat: Repeat,
        task: impl Task + 'static,
    ) -> TaskHandle {
        let entry = Scheduled::new(delay, repeat, Box::new(task));
        let handle = entry.handle.clone();
        self.pending.push(entry);
        handle
    }

    /// Oracle seed for a roll made by `actor` this tick in the given roll
    /// context (see [`combat_core::rng::roll`]).
    pub fn seed(&self, actor: ActorId, roll_context: u32) -> u64 {
        compute_seed(self.world_seed, self.now.0, actor.raw(), roll_context)
    }
}
