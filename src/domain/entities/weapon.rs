//! Weapon entity - wargear entries on a datasheet

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::MechanicSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Ranged,
    Melee,
}

impl WeaponKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ranged => "Ranged",
            Self::Melee => "Melee",
        }
    }
}

/// One firing/striking profile of a weapon.
///
/// Attacks and damage stay as authored strings because they can be
/// dice expressions ("D6", "D6+2"); the engine never rolls them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub name: String,
    /// Range in inches; melee profiles have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,
    pub attacks: String,
    /// BS for ranged, WS for melee; torrent-style weapons have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<u8>,
    pub strength: u32,
    pub armour_penetration: i32,
    pub damage: String,
    /// Static weapon-ability keywords printed on the profile
    /// (e.g. "SUSTAINED HITS 1", "LETHAL HITS")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mechanics: Vec<MechanicSpec>,
}

impl WeaponProfile {
    pub fn new(name: impl Into<String>, attacks: impl Into<String>, strength: u32) -> Self {
        Self {
            name: name.into(),
            range: None,
            attacks: attacks.into(),
            skill: None,
            strength,
            armour_penetration: 0,
            damage: "1".to_string(),
            attributes: Vec::new(),
            mechanics: Vec::new(),
        }
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_skill(mut self, skill: u8) -> Self {
        self.skill = Some(skill);
        self
    }

    pub fn with_ap(mut self, armour_penetration: i32) -> Self {
        self.armour_penetration = armour_penetration;
        self
    }

    pub fn with_damage(mut self, damage: impl Into<String>) -> Self {
        self.damage = damage.into();
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Case-insensitive check for a printed ability keyword.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// A weapon as listed on a datasheet, with one or more profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub kind: WeaponKind,
    pub profiles: Vec<WeaponProfile>,
}

impl Weapon {
    pub fn new(name: impl Into<String>, kind: WeaponKind) -> Self {
        Self {
            name: name.into(),
            kind,
            profiles: Vec::new(),
        }
    }

    pub fn with_profile(mut self, profile: WeaponProfile) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn profile(&self, name: &str) -> Option<&WeaponProfile> {
        self.profiles.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
