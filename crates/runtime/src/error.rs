//! Runtime error types.

use combat_core::types::ActorId;

/// Errors surfaced by the runtime API.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("actor {0} is not registered")]
    UnknownActor(ActorId),

    #[error("no NPC definition with id {0}")]
    UnknownNpcDefinition(u32),

    #[error("no weapon definition with id {0}")]
    UnknownWeaponDefinition(u32),

    /// The worker loop has shut down and can no longer accept commands.
    #[error("combat worker command channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
