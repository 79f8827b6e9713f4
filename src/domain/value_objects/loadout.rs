//! Loadout constraints parsed from wargear-option text
//!
//! Wargear options are authored as prose ("For every 5 models, 1
//! model's bolt pistol can be replaced with..."). The parser turns that
//! prose into a structured constraint bounding how many swaps are legal
//! at the unit's current model count.
//!
//! Pattern precedence is fixed and ordered most-specific-first; the
//! generic fallback would shadow the numeric patterns in any other
//! order. An unrecognized description falls back to a single selection
//! rather than blocking list-building.

use serde::{Deserialize, Serialize};

/// The shape of a wargear-option constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintKind {
    /// "For every N models, ..." - one selection per full group of N
    Ratio { per_models: u32 },
    /// "If this unit contains N models, ..." - all-or-nothing gate
    Threshold { min_models: u32 },
    /// A literal number of selections
    Simple { count: u32 },
    /// "... can be equipped with ..." - pure addition, no replacement
    Addition,
}

/// A parsed wargear-option constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutConstraint {
    #[serde(flatten)]
    pub kind: ConstraintKind,
    pub max_selections: u32,
}

impl LoadoutConstraint {
    /// Parse an option description against the unit's current model
    /// count. Never fails; ambiguous text yields `Simple { count: 1 }`.
    pub fn parse(description: &str, total_models: u32) -> Self {
        let text = description.to_ascii_lowercase();

        // (1) "for every N models"
        if let Some(per) = number_after(&text, "for every ") {
            if per > 0 {
                return Self {
                    kind: ConstraintKind::Ratio { per_models: per },
                    max_selections: total_models / per,
                };
            }
        }

        // (2) "if this unit contains N models"
        if let Some(min) = number_after(&text, "if this unit contains ") {
            return Self {
                kind: ConstraintKind::Threshold { min_models: min },
                max_selections: u32::from(total_models >= min),
            };
        }

        if let Some(replace_at) = text.find("can be replaced") {
            // (3) a leading count before "... can be replaced"
            if let Some(count) = first_number(&text[..replace_at]) {
                return Self {
                    kind: ConstraintKind::Simple { count },
                    max_selections: count,
                };
            }
            // (4) "this model's ... can be replaced" - no count given
            return Self {
                kind: ConstraintKind::Simple { count: 1 },
                max_selections: 1,
            };
        }

        // (5) pure addition
        if text.contains("can be equipped with") {
            return Self {
                kind: ConstraintKind::Addition,
                max_selections: 1,
            };
        }

        // (6) fallback: under-restrict rather than block
        Self {
            kind: ConstraintKind::Simple { count: 1 },
            max_selections: 1,
        }
    }
}

/// Parse the unsigned integer immediately following `prefix`, if any.
fn number_after(text: &str, prefix: &str) -> Option<u32> {
    let rest = &text[text.find(prefix)? + prefix.len()..];
    first_number(rest)
}

/// First run of digits anywhere in `text`.
fn first_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_constraint_floor_division() {
        let constraint = LoadoutConstraint::parse(
            "For every 5 models, 1 model's bolt pistol can be replaced with a plasma pistol.",
            10,
        );
        assert_eq!(constraint.kind, ConstraintKind::Ratio { per_models: 5 });
        assert_eq!(constraint.max_selections, 2);

        let constraint = LoadoutConstraint::parse(
            "For every 5 models, 1 model's bolt pistol can be replaced with a plasma pistol.",
            7,
        );
        assert_eq!(constraint.max_selections, 1);
    }

    #[test]
    fn test_threshold_constraint_is_binary() {
        let text = "If this unit contains 10 models, 1 model's weapon can be replaced with a heavy weapon.";
        assert_eq!(LoadoutConstraint::parse(text, 9).max_selections, 0);

        let constraint = LoadoutConstraint::parse(text, 10);
        assert_eq!(constraint.kind, ConstraintKind::Threshold { min_models: 10 });
        assert_eq!(constraint.max_selections, 1);
    }

    #[test]
    fn test_leading_count_before_replacement() {
        let constraint = LoadoutConstraint::parse(
            "2 models' chainswords can be replaced with power fists.",
            5,
        );
        assert_eq!(constraint.kind, ConstraintKind::Simple { count: 2 });
        assert_eq!(constraint.max_selections, 2);
    }

    #[test]
    fn test_uncounted_replacement_defaults_to_one() {
        let constraint = LoadoutConstraint::parse(
            "This model's master-crafted bolter can be replaced with a combi-weapon.",
            1,
        );
        assert_eq!(constraint.kind, ConstraintKind::Simple { count: 1 });
        assert_eq!(constraint.max_selections, 1);
    }

    #[test]
    fn test_addition_option() {
        let constraint =
            LoadoutConstraint::parse("This model can be equipped with 1 storm shield.", 1);
        assert_eq!(constraint.kind, ConstraintKind::Addition);
        assert_eq!(constraint.max_selections, 1);
    }

    #[test]
    fn test_unrecognized_text_falls_back_to_simple() {
        let constraint = LoadoutConstraint::parse("The sergeant is armed for close assault.", 5);
        assert_eq!(constraint.kind, ConstraintKind::Simple { count: 1 });
        assert_eq!(constraint.max_selections, 1);
    }

    #[test]
    fn test_ratio_checked_before_generic_replacement() {
        // contains "can be replaced" and a leading count, but the ratio
        // pattern must win
        let constraint = LoadoutConstraint::parse(
            "For every 10 models, 2 models' boltguns can be replaced with flamers.",
            20,
        );
        assert_eq!(constraint.kind, ConstraintKind::Ratio { per_models: 10 });
        assert_eq!(constraint.max_selections, 2);
    }
}
