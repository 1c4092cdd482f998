//! The tick-driven combat engine.
//!
//! Owns the world, the scheduler, and the injected oracles, and advances
//! them one pulse at a time. The engine is synchronous and single-threaded;
//! [`crate::worker::CombatWorker`] wraps it in a wall-clock loop.

use std::sync::Arc;

use combat_core::config::CombatConfig;
use combat_core::rng::SplitMix64;
use combat_core::types::{ActorId, Position, Tick};
use combat_core::zone::ZoneOracle;

use combat_content::npcs::NpcCombatDefinition;

use crate::combat::strategy::StrategyRegistry;
use crate::combat::{controller, effects, session};
use crate::context::CombatContext;
use crate::error::{Result, RuntimeError};
use crate::events::{EventBus, GameEvent};
use crate::scheduler::{self, TaskState, TickScheduler};
use crate::world::{ActorBlueprint, WeaponProfile, World};

pub struct CombatEngine {
    world: World,
    scheduler: TickScheduler,
    config: CombatConfig,
    rng: SplitMix64,
    zones: Arc<dyn ZoneOracle>,
    strategies: StrategyRegistry,
    events: EventBus,
    world_seed: u64,
    now: Tick,
}

impl CombatEngine {
    pub fn new(config: CombatConfig, zones: Arc<dyn ZoneOracle>, world_seed: u64) -> Self {
        let mut engine = Self {
            world: World::new(),
            scheduler: TickScheduler::new(),
            config,
            rng: SplitMix64,
            zones,
            strategies: StrategyRegistry::new(),
            events: EventBus::new(),
            world_seed,
            now: Tick::ZERO,
        };
        let interval = engine.config.special_regen_interval.max(1);
        engine.scheduler.schedule(
            interval,
            crate::scheduler::Repeat::Every(interval),
            effects::SpecialRegenTask,
        );
        engine
            .scheduler
            .schedule(2, crate::scheduler::Repeat::Every(2), session::NpcAggressionTask);
        engine
    }

    /// Engine with a random session seed, for live play rather than replay.
    pub fn with_random_seed(config: CombatConfig, zones: Arc<dyn ZoneOracle>) -> Self {
        Self::new(config, zones, rand::random())
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    pub fn strategies_mut(&mut self) -> &mut StrategyRegistry {
        &mut self.strategies
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Run a closure against a fresh combat context. Tasks it spawns are
    /// queued for the next pulse.
    pub fn run<R>(&mut self, f: impl FnOnce(&mut CombatContext<'_>) -> R) -> R {
        let mut pending = Vec::new();
        let result = {
            let mut ctx = CombatContext {
                world: &mut self.world,
                now: self.now,
                config: &self.config,
                rng: &self.rng,
                zones: self.zones.as_ref(),
                strategies: &self.strategies,
                events: &self.events,
                world_seed: self.world_seed,
                pending: &mut pending,
            };
            f(&mut ctx)
        };
        for entry in pending {
            self.scheduler.push(entry);
        }
        result
    }

    /// Advance the clock one tick and pulse every due task in submission
    /// order.
    pub fn tick(&mut self) {
        self.now = self.now.advance(1);
        let mut queue = self.scheduler.take_tasks();
        let mut survivors = Vec::with_capacity(queue.len());
        for mut entry in queue.drain(..) {
            if entry.handle.is_cancelled() {
                continue;
            }
            if !scheduler::advance(&mut entry) {
                survivors.push(entry);
                continue;
            }
            let state = self.run(|ctx| entry.task.execute(ctx));
            if state == TaskState::Continue
                && !entry.handle.is_cancelled()
                && scheduler::requeue(&mut entry)
            {
                survivors.push(entry);
            }
        }
        // Tasks spawned mid-pulse sit in the scheduler already; keep them
        // behind the survivors so submission order holds.
        self.scheduler.restore_tasks(survivors);
    }

    pub fn spawn_player(&mut self, blueprint: ActorBlueprint) -> ActorId {
        self.world.spawn(blueprint, &self.config)
    }

    pub fn spawn_npc(&mut self, def: &NpcCombatDefinition, position: Position) -> ActorId {
        self.world.spawn(ActorBlueprint::npc(def).at(position), &self.config)
    }

    /// Deregister an actor. In-flight tasks against it fizzle on their next
    /// slice.
    pub fn despawn(&mut self, id: ActorId) {
        if let Some(mut actor) = self.world.remove(id) {
            actor.combat.reset();
        }
    }

    /// Swap an actor's equipped weapon. A mid-engagement swap re-resolves
    /// the strategy, so reach and timing follow the new gear from the next
    /// swing, and any queued special from the old weapon is dropped.
    pub fn equip_weapon(&mut self, id: ActorId, weapon: WeaponProfile) -> Result<()> {
        self.run(|ctx| {
            let Some(actor) = ctx.world.get_mut(id) else {
                return Err(RuntimeError::UnknownActor(id));
            };
            actor.weapon = weapon;
            actor.combat.queued_special = None;
            if actor.combat.is_attacking() {
                let strategy = ctx.strategies.resolve(actor);
                actor.combat.strategy = Some(strategy);
            }
            Ok(())
        })
    }

    /// Request an engagement.
    pub fn attack(&mut self, attacker: ActorId, target: ActorId) {
        self.run(|ctx| controller::attack(ctx, attacker, target));
    }

    /// Run an out-of-schedule attack tick, bypassing the session's pulse.
    pub fn instant_attack(&mut self, actor: ActorId) {
        self.run(|ctx| session::instant(ctx, actor));
    }

    /// Queue the equipped weapon's special attack.
    pub fn queue_special(&mut self, actor: ActorId) {
        self.run(|ctx| controller::queue_special(ctx, actor));
    }

    /// Interrupt an actor's engagement with the standard grace period.
    pub fn interrupt(&mut self, id: ActorId) {
        let ticks = self.config.cooldown_ticks;
        if self.world.get(id).is_some_and(|a| a.combat.is_attacking()) {
            controller::begin_cooldown(&mut self.world, id, ticks, true);
        }
    }

    /// Number of scheduled tasks, exposed for shutdown diagnostics.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }
}
