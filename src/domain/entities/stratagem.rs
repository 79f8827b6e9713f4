//! Stratagem entity - resource-costed rules usable at specific phases
//!
//! The engine carries stratagem data for display filtering only; it
//! never evaluates activation or spends command points.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{GamePhase, StratagemId, TurnOwner};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stratagem {
    pub id: StratagemId,
    pub name: String,
    pub cp_cost: u32,
    /// Phases the stratagem may be used in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<GamePhase>,
    #[serde(default)]
    pub turn: TurnOwner,
    /// Category tags as authored ("Battle Tactic", "Epic Deed", ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Stratagem {
    pub fn new(id: impl Into<StratagemId>, name: impl Into<String>, cp_cost: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cp_cost,
            phases: Vec::new(),
            turn: TurnOwner::default(),
            kinds: Vec::new(),
            description: None,
        }
    }

    pub fn with_phase(mut self, phase: GamePhase) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn with_turn(mut self, turn: TurnOwner) -> Self {
        self.turn = turn;
        self
    }

    /// Phase/turn data match for display filtering. An empty phase list
    /// means the stratagem is usable in any phase.
    pub fn is_available(&self, phase: GamePhase, turn: TurnOwner) -> bool {
        (self.phases.is_empty() || self.phases.contains(&phase)) && self.turn.allows(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_by_phase_and_turn() {
        let stratagem = Stratagem::new("str-1", "Counter-Offensive", 2)
            .with_phase(GamePhase::Fight)
            .with_turn(TurnOwner::Either);

        assert!(stratagem.is_available(GamePhase::Fight, TurnOwner::Yours));
        assert!(stratagem.is_available(GamePhase::Fight, TurnOwner::Opponents));
        assert!(!stratagem.is_available(GamePhase::Shooting, TurnOwner::Yours));
    }

    #[test]
    fn test_empty_phase_list_means_any_phase() {
        let stratagem = Stratagem::new("str-2", "Command Re-roll", 1);
        assert!(stratagem.is_available(GamePhase::Movement, TurnOwner::Yours));
    }

    #[test]
    fn test_turn_restriction() {
        let stratagem = Stratagem::new("str-3", "Fire Overwatch", 1)
            .with_phase(GamePhase::Movement)
            .with_turn(TurnOwner::Opponents);
        assert!(!stratagem.is_available(GamePhase::Movement, TurnOwner::Yours));
        assert!(stratagem.is_available(GamePhase::Movement, TurnOwner::Opponents));
    }
}
