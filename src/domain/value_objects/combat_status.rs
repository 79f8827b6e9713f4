//! Combat status register - battlefield condition flags for one side
//!
//! A fresh register is created at the start of every simulated exchange
//! and mutated only through [`CombatStatus::set`]. The flag catalog is
//! the authoritative vocabulary: checkbox UIs enumerate it, condition
//! records reference it, and a new flag must be added here first.

use serde::{Deserialize, Serialize};

/// Which side of a simulated exchange a unit is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Attacker => "Attacker",
            Self::Defender => "Defender",
        }
    }
}

/// Game phases in turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Command,
    Movement,
    Shooting,
    Charge,
    Fight,
    /// Unknown phase (for forward compatibility with authored data)
    #[serde(other)]
    Unknown,
}

impl GamePhase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Command => "Command Phase",
            Self::Movement => "Movement Phase",
            Self::Shooting => "Shooting Phase",
            Self::Charge => "Charge Phase",
            Self::Fight => "Fight Phase",
            Self::Unknown => "Unknown Phase",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::Command,
            Self::Movement,
            Self::Shooting,
            Self::Charge,
            Self::Fight,
        ]
    }
}

/// Whose turn a rule (typically a stratagem) applies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOwner {
    Yours,
    Opponents,
    #[default]
    Either,
}

impl TurnOwner {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Yours => "Your turn",
            Self::Opponents => "Opponent's turn",
            Self::Either => "Either player's turn",
        }
    }

    /// Whether a rule scoped to `self` is usable on `current`.
    pub fn allows(&self, current: TurnOwner) -> bool {
        matches!(self, Self::Either) || *self == current
    }
}

/// A single battlefield-condition flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStatusFlag {
    /// The unit's damaged (bracketed) profile is in effect
    Damaged,
    BelowHalfStrength,
    InCover,
    RemainedStationary,
    Advanced,
    FellBack,
    Charged,
    BattleShocked,
    InRangeOfObjective,
    InRangeOfContestedObjective,
    InRangeOfFriendlyObjective,
    InRangeOfEnemyObjective,
}

impl CombatStatusFlag {
    /// Stable machine name, matching the serde representation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Damaged => "damaged",
            Self::BelowHalfStrength => "below_half_strength",
            Self::InCover => "in_cover",
            Self::RemainedStationary => "remained_stationary",
            Self::Advanced => "advanced",
            Self::FellBack => "fell_back",
            Self::Charged => "charged",
            Self::BattleShocked => "battle_shocked",
            Self::InRangeOfObjective => "in_range_of_objective",
            Self::InRangeOfContestedObjective => "in_range_of_contested_objective",
            Self::InRangeOfFriendlyObjective => "in_range_of_friendly_objective",
            Self::InRangeOfEnemyObjective => "in_range_of_enemy_objective",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Damaged => "Damaged profile active",
            Self::BelowHalfStrength => "Below half strength",
            Self::InCover => "In cover",
            Self::RemainedStationary => "Remained stationary",
            Self::Advanced => "Advanced this turn",
            Self::FellBack => "Fell back this turn",
            Self::Charged => "Charged this turn",
            Self::BattleShocked => "Battle-shocked",
            Self::InRangeOfObjective => "Within range of an objective",
            Self::InRangeOfContestedObjective => "Within range of a contested objective",
            Self::InRangeOfFriendlyObjective => "Within range of a friendly objective",
            Self::InRangeOfEnemyObjective => "Within range of an enemy objective",
        }
    }

    /// The objective-range flags are mutually exclusive.
    pub fn is_objective_flag(&self) -> bool {
        matches!(
            self,
            Self::InRangeOfObjective
                | Self::InRangeOfContestedObjective
                | Self::InRangeOfFriendlyObjective
                | Self::InRangeOfEnemyObjective
        )
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::Damaged,
            Self::BelowHalfStrength,
            Self::InCover,
            Self::RemainedStationary,
            Self::Advanced,
            Self::FellBack,
            Self::Charged,
            Self::BattleShocked,
            Self::InRangeOfObjective,
            Self::InRangeOfContestedObjective,
            Self::InRangeOfFriendlyObjective,
            Self::InRangeOfEnemyObjective,
        ]
    }
}

/// Catalog entry driving dynamic checkbox UIs.
#[derive(Debug, Clone, Serialize)]
pub struct CombatStatusFlagInfo {
    pub flag: CombatStatusFlag,
    pub name: &'static str,
    pub label: &'static str,
}

/// The authoritative flag vocabulary, in display order.
pub fn combat_status_flags() -> Vec<CombatStatusFlagInfo> {
    CombatStatusFlag::all()
        .into_iter()
        .map(|flag| CombatStatusFlagInfo {
            flag,
            name: flag.name(),
            label: flag.label(),
        })
        .collect()
}

/// The boolean condition vector for one side of an exchange.
///
/// All flags start false; create a fresh register per exchange rather
/// than carrying one across roster mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStatus {
    pub damaged: bool,
    pub below_half_strength: bool,
    pub in_cover: bool,
    pub remained_stationary: bool,
    pub advanced: bool,
    pub fell_back: bool,
    pub charged: bool,
    pub battle_shocked: bool,
    pub in_range_of_objective: bool,
    pub in_range_of_contested_objective: bool,
    pub in_range_of_friendly_objective: bool,
    pub in_range_of_enemy_objective: bool,
}

impl CombatStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, flag: CombatStatusFlag) -> bool {
        match flag {
            CombatStatusFlag::Damaged => self.damaged,
            CombatStatusFlag::BelowHalfStrength => self.below_half_strength,
            CombatStatusFlag::InCover => self.in_cover,
            CombatStatusFlag::RemainedStationary => self.remained_stationary,
            CombatStatusFlag::Advanced => self.advanced,
            CombatStatusFlag::FellBack => self.fell_back,
            CombatStatusFlag::Charged => self.charged,
            CombatStatusFlag::BattleShocked => self.battle_shocked,
            CombatStatusFlag::InRangeOfObjective => self.in_range_of_objective,
            CombatStatusFlag::InRangeOfContestedObjective => self.in_range_of_contested_objective,
            CombatStatusFlag::InRangeOfFriendlyObjective => self.in_range_of_friendly_objective,
            CombatStatusFlag::InRangeOfEnemyObjective => self.in_range_of_enemy_objective,
        }
    }

    /// Set one flag. Setting an objective-range flag to true clears the
    /// other three; they describe disjoint board states.
    pub fn set(&mut self, flag: CombatStatusFlag, value: bool) {
        if value && flag.is_objective_flag() {
            self.in_range_of_objective = false;
            self.in_range_of_contested_objective = false;
            self.in_range_of_friendly_objective = false;
            self.in_range_of_enemy_objective = false;
        }
        match flag {
            CombatStatusFlag::Damaged => self.damaged = value,
            CombatStatusFlag::BelowHalfStrength => self.below_half_strength = value,
            CombatStatusFlag::InCover => self.in_cover = value,
            CombatStatusFlag::RemainedStationary => self.remained_stationary = value,
            CombatStatusFlag::Advanced => self.advanced = value,
            CombatStatusFlag::FellBack => self.fell_back = value,
            CombatStatusFlag::Charged => self.charged = value,
            CombatStatusFlag::BattleShocked => self.battle_shocked = value,
            CombatStatusFlag::InRangeOfObjective => self.in_range_of_objective = value,
            CombatStatusFlag::InRangeOfContestedObjective => {
                self.in_range_of_contested_objective = value
            }
            CombatStatusFlag::InRangeOfFriendlyObjective => {
                self.in_range_of_friendly_objective = value
            }
            CombatStatusFlag::InRangeOfEnemyObjective => self.in_range_of_enemy_objective = value,
        }
    }

    pub fn with(mut self, flag: CombatStatusFlag, value: bool) -> Self {
        self.set(flag, value);
        self
    }
}
