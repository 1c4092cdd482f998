//! Error taxonomy for the combat rules.
//!
//! Two classes of failure exist. Programming-contract violations (a strategy
//! driven outside its supported operations, a plan with no usable content)
//! signal configuration bugs and carry [`ErrorSeverity::Internal`]; callers
//! log them and reset the offending engagement. Expected runtime refusals are
//! not errors at all — they surface as declined actions or typed events in
//! the runtime and never pass through this type.

/// Severity classification used for logging and recovery decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// May succeed on retry or with a different action.
    Recoverable,
    /// Invalid input; retrying without changes is pointless.
    Validation,
    /// Unexpected state or misuse of an API contract. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn is_internal(self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Errors produced by the combat rules and strategy contract.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    /// A strategy was asked to perform an operation it does not support,
    /// e.g. calling `attack` on an activation-only special.
    #[error("strategy `{strategy}` does not support operation `{operation}`")]
    UnsupportedStrategyOperation {
        strategy: &'static str,
        operation: &'static str,
    },

    /// A magic attack was requested without a prepared spell.
    #[error("no spell prepared for magic attack")]
    NoSpellPrepared,

    /// A special attack was requested for a weapon with no special behavior.
    #[error("weapon has no special attack")]
    NoSpecialAttack,

    /// A participant of a resolved attack disappeared from the registry
    /// between validation and execution.
    #[error("actor {actor} vanished mid-resolution")]
    ActorVanished { actor: crate::types::ActorId },
}

impl CombatError {
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            CombatError::UnsupportedStrategyOperation { .. } => ErrorSeverity::Internal,
            CombatError::NoSpellPrepared => ErrorSeverity::Validation,
            CombatError::NoSpecialAttack => ErrorSeverity::Validation,
            CombatError::ActorVanished { .. } => ErrorSeverity::Recoverable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_violations_are_internal() {
        let err = CombatError::UnsupportedStrategyOperation {
            strategy: "surge",
            operation: "attack",
        };
        assert!(err.severity().is_internal());
        assert!(!CombatError::NoSpellPrepared.severity().is_internal());
    }
}
