//! Default open-world zone rules.

use combat_core::types::{ActorId, Position};
use combat_core::zone::{ZoneOracle, ZoneRect};

/// Open-world rule set: explicit multi-combat rectangles and a northern
/// wilderness band whose depth grows with the y coordinate.
#[derive(Debug, Clone, Default)]
pub struct OpenWorldRules {
    multi_zones: Vec<ZoneRect>,
    /// y coordinate where wilderness depth 1 begins; `None` disables it.
    wilderness_start: Option<i32>,
    /// Tiles of northward travel per additional wilderness level.
    wilderness_step: i32,
}

impl OpenWorldRules {
    pub fn new() -> Self {
        Self {
            multi_zones: Vec::new(),
            wilderness_start: None,
            wilderness_step: 8,
        }
    }

    #[must_use]
    pub fn with_multi_zone(mut self, zone: ZoneRect) -> Self {
        self.multi_zones.push(zone);
        self
    }

    #[must_use]
    pub fn with_wilderness(mut self, start_y: i32, step: i32) -> Self {
        self.wilderness_start = Some(start_y);
        self.wilderness_step = step.max(1);
        self
    }
}

impl ZoneOracle for OpenWorldRules {
    fn multi_combat(&self, pos: Position) -> bool {
        self.multi_zones.iter().any(|z| z.contains(pos))
    }

    fn wilderness_level(&self, pos: Position) -> u32 {
        match self.wilderness_start {
            Some(start) if pos.y >= start => {
                ((pos.y - start) / self.wilderness_step + 1) as u32
            }
            _ => 0,
        }
    }

    fn attack_permitted(&self, _attacker: ActorId, _victim: ActorId) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wilderness_depth_grows_northward() {
        let rules = OpenWorldRules::new().with_wilderness(100, 8);
        assert_eq!(rules.wilderness_level(Position::new(0, 99)), 0);
        assert_eq!(rules.wilderness_level(Position::new(0, 100)), 1);
        assert_eq!(rules.wilderness_level(Position::new(0, 107)), 1);
        assert_eq!(rules.wilderness_level(Position::new(0, 108)), 2);
    }

    #[test]
    fn multi_zones_are_rect_scoped() {
        let rules = OpenWorldRules::new()
            .with_multi_zone(ZoneRect::new(Position::new(0, 0), Position::new(10, 10)));
        assert!(rules.multi_combat(Position::new(5, 5)));
        assert!(!rules.multi_combat(Position::new(11, 5)));
    }
}
