//! Background worker that owns the authoritative [`CombatEngine`].
//!
//! Receives commands from [`CombatHandle`], pulses the engine on the
//! wall-clock tick interval, and publishes [`GameEvent`] notifications
//! through the engine's bus.

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use combat_core::types::{ActorId, Position};

use combat_content::npcs::NpcCatalog;
use combat_content::weapons::WeaponCatalog;

use crate::engine::CombatEngine;
use crate::error::{Result, RuntimeError};
use crate::events::GameEvent;
use crate::world::{ActorBlueprint, WeaponProfile};

/// Commands the worker accepts.
pub enum Command {
    Attack {
        attacker: ActorId,
        target: ActorId,
    },
    QueueSpecial {
        actor: ActorId,
    },
    SpawnPlayer {
        blueprint: Box<ActorBlueprint>,
        reply: oneshot::Sender<ActorId>,
    },
    SpawnNpc {
        definition_id: u32,
        position: Position,
        reply: oneshot::Sender<Result<ActorId>>,
    },
    EquipWeapon {
        actor: ActorId,
        weapon_id: u32,
        reply: oneshot::Sender<Result<()>>,
    },
    Despawn {
        actor: ActorId,
    },
    Inspect {
        actor: ActorId,
        reply: oneshot::Sender<Option<ActorView>>,
    },
}

/// Read-only actor summary for queries.
#[derive(Debug, Clone)]
pub struct ActorView {
    pub id: ActorId,
    pub name: String,
    pub position: Position,
    pub health: u32,
    pub max_health: u32,
    pub special_energy: u32,
    pub in_combat: bool,
}

/// Background task that pulses the engine and processes commands.
pub struct CombatWorker {
    engine: CombatEngine,
    npcs: NpcCatalog,
    weapons: WeaponCatalog,
    command_rx: mpsc::Receiver<Command>,
}

impl CombatWorker {
    /// Spawn the worker onto the current tokio runtime and hand back its
    /// handle.
    pub fn spawn(
        engine: CombatEngine,
        npcs: NpcCatalog,
        weapons: WeaponCatalog,
    ) -> (CombatHandle, tokio::task::JoinHandle<()>) {
        engine.strategies().verify_catalog(&npcs);
        let (command_tx, command_rx) = mpsc::channel(64);
        let handle = CombatHandle {
            command_tx,
            events: engine.events().clone(),
        };
        let worker = Self {
            engine,
            npcs,
            weapons,
            command_rx,
        };
        let join = tokio::spawn(worker.run());
        (handle, join)
    }

    /// Main worker loop: fixed-interval pulses interleaved with commands.
    pub async fn run(mut self) {
        let mut ticker = time::interval(time::Duration::from_millis(
            self.engine.config().tick_millis,
        ));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            target: "runtime::worker",
            tick_millis = self.engine.config().tick_millis,
            "combat worker started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.engine.tick();
                }
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => break,
                    }
                }
            }
        }
        info!(
            target: "runtime::worker",
            clock = self.engine.now().0,
            pending_tasks = self.engine.pending_tasks(),
            "combat worker stopped"
        );
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Attack { attacker, target } => {
                debug!(target: "runtime::worker", %attacker, %target, "attack command");
                self.engine.attack(attacker, target);
            }
            Command::QueueSpecial { actor } => {
                self.engine.queue_special(actor);
            }
            Command::SpawnPlayer { blueprint, reply } => {
                let id = self.engine.spawn_player(*blueprint);
                let _ = reply.send(id);
            }
            Command::SpawnNpc {
                definition_id,
                position,
                reply,
            } => {
                let result = match self.npcs.get(definition_id) {
                    Some(def) => Ok(self.engine.spawn_npc(def, position)),
                    None => Err(RuntimeError::UnknownNpcDefinition(definition_id)),
                };
                let _ = reply.send(result);
            }
            Command::EquipWeapon {
                actor,
                weapon_id,
                reply,
            } => {
                let result = match self.weapons.get(weapon_id) {
                    Some(def) => self.engine.equip_weapon(actor, WeaponProfile::from(def)),
                    None => Err(RuntimeError::UnknownWeaponDefinition(weapon_id)),
                };
                let _ = reply.send(result);
            }
            Command::Despawn { actor } => {
                self.engine.despawn(actor);
            }
            Command::Inspect { actor, reply } => {
                let now = self.engine.now();
                let view = self.engine.world().get(actor).map(|a| ActorView {
                    id: a.id,
                    name: a.name.clone(),
                    position: a.position,
                    health: a.health,
                    max_health: a.max_health,
                    special_energy: a.special_energy,
                    in_combat: a.combat.in_combat(now),
                });
                let _ = reply.send(view);
            }
        }
    }
}

/// Cloneable front door to a running [`CombatWorker`].
#[derive(Clone)]
pub struct CombatHandle {
    command_tx: mpsc::Sender<Command>,
    events: crate::events::EventBus,
}

impl CombatHandle {
    pub async fn attack(&self, attacker: ActorId, target: ActorId) -> Result<()> {
        self.send(Command::Attack { attacker, target }).await
    }

    pub async fn queue_special(&self, actor: ActorId) -> Result<()> {
        self.send(Command::QueueSpecial { actor }).await
    }

    pub async fn spawn_player(&self, blueprint: ActorBlueprint) -> Result<ActorId> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SpawnPlayer {
            blueprint: Box::new(blueprint),
            reply,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn spawn_npc(&self, definition_id: u32, position: Position) -> Result<ActorId> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SpawnNpc {
            definition_id,
            position,
            reply,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn equip_weapon(&self, actor: ActorId, weapon_id: u32) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::EquipWeapon {
            actor,
            weapon_id,
            reply,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn despawn(&self, actor: ActorId) -> Result<()> {
        self.send(Command::Despawn { actor }).await
    }

    pub async fn inspect(&self, actor: ActorId) -> Result<Option<ActorView>> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Inspect { actor, reply }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    async fn send(&self, cmd: Command) -> Result<()> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}
