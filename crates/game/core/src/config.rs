//! Combat configuration constants and tunable parameters.

/// Tunable combat balance parameters.
///
/// Every magic number in the resolution pipeline lives here so that balance
/// passes and tests can adjust them without touching formula code. The
/// defaults reproduce the canonical live values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// Wall-clock milliseconds per tick.
    pub tick_millis: u64,

    /// Ticks a damage-cache contribution stays eligible for kill credit
    /// (100 ticks = 60 s at the default tick length).
    pub damage_cache_timeout: u64,

    /// Maximum distance in tiles between attacker and victim for the
    /// attacker to remain eligible for kill credit.
    pub kill_credit_radius: u32,

    /// Ticks of the "combat interrupted, re-approach" grace phase.
    pub cooldown_ticks: u32,

    /// Odds (1-in-N) for each four-piece set proc firing on an accurate hit.
    pub set_proc_odds: u32,

    /// Odds (1-in-N) of ignoring the defence roll entirely when the
    /// attacker's bonus sits at or below [`Self::negative_bonus_floor`].
    pub defence_bypass_odds: u32,

    /// Attack-bonus threshold that exposes the defence bypass roll.
    pub negative_bonus_floor: i32,

    /// Clamp bounds for hit probability; an attack is never a certainty.
    pub hit_chance_floor: f64,
    pub hit_chance_ceiling: f64,

    /// Effective-strength multiplier applied to low-level attackers.
    pub low_level_multiplier: f64,
    /// Base level at or below which the low-level multiplier applies.
    pub low_level_threshold: u32,

    /// Experience per point of damage for each style-designated skill.
    pub style_xp_rate: f64,
    /// Experience per point of damage for the vitality (Hitpoints) skill.
    pub vitality_xp_rate: f64,

    /// Divisor converting damage dealt into smite devotion drain.
    pub smite_divisor: u32,
    /// Health fraction (1-in-N of max) below which redemption triggers.
    pub redemption_threshold_divisor: u32,
    /// Divisor converting max health into the redemption self-heal.
    pub redemption_heal_divisor: u32,
    /// Divisor converting max health into the retribution nova damage cap.
    pub retribution_divisor: u32,
    /// Radius in tiles of the retribution nova.
    pub retribution_radius: u32,

    /// Special energy gained per regeneration pulse.
    pub special_regen_amount: u32,
    /// Ticks between special energy regeneration pulses.
    pub special_regen_interval: u64,
}

impl CombatConfig {
    // ===== fixed structural limits =====
    /// Upper bound on precomputed hits per resolved attack.
    pub const MAX_HITS_PER_PLAN: usize = 4;
    /// Special attack energy scale (0..=100).
    pub const MAX_SPECIAL_ENERGY: u32 = 100;

    // ===== canonical defaults =====
    pub const DEFAULT_TICK_MILLIS: u64 = 600;
    pub const DEFAULT_DAMAGE_CACHE_TIMEOUT: u64 = 100;
    pub const DEFAULT_KILL_CREDIT_RADIUS: u32 = 25;
    pub const DEFAULT_COOLDOWN_TICKS: u32 = 10;

    pub fn new() -> Self {
        Self {
            tick_millis: Self::DEFAULT_TICK_MILLIS,
            damage_cache_timeout: Self::DEFAULT_DAMAGE_CACHE_TIMEOUT,
            kill_credit_radius: Self::DEFAULT_KILL_CREDIT_RADIUS,
            cooldown_ticks: Self::DEFAULT_COOLDOWN_TICKS,
            set_proc_odds: 4,
            defence_bypass_odds: 8,
            negative_bonus_floor: -24,
            hit_chance_floor: 0.01,
            hit_chance_ceiling: 0.99,
            low_level_multiplier: 1.8,
            low_level_threshold: 10,
            style_xp_rate: 4.0,
            vitality_xp_rate: 1.33,
            smite_divisor: 4,
            redemption_threshold_divisor: 10,
            redemption_heal_divisor: 4,
            retribution_divisor: 4,
            retribution_radius: 1,
            special_regen_amount: 10,
            special_regen_interval: 25,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
