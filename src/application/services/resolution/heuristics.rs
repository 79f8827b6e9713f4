//! Text-classification heuristics for abilities without structured data
//!
//! A fallback tier beneath authored `mechanics` records: when an
//! ability carries only prose, these patterns extract what they can.
//! The same classifier backs the offline audit reporter, which flags
//! every ability that matched here so a human can review the
//! inference. Known false positive, kept deliberately: text about
//! Leadership tests classifies as battle-shock gated.

use crate::domain::value_objects::{
    CombatStatusFlag, ConditionState, GamePhase, MechanicAttribute, MechanicCondition,
    MechanicEffect, MechanicSpec, MechanicValue,
};

/// Classify an ability description into zero or more mechanic specs.
/// Unrecognized text yields an empty vector, never an error.
pub fn classify(description: &str) -> Vec<MechanicSpec> {
    // hyphens vary wildly in authored text ("re-roll", "battle-shock");
    // collapse word-internal hyphens only, "-1 to hit" keeps its sign
    let text = normalize(description);

    let mut specs = Vec::new();
    specs.extend(roll_modifiers(&text));
    specs.extend(ability_grants(&text));

    let conditions = gating_conditions(&text);
    if !conditions.is_empty() {
        for spec in &mut specs {
            spec.conditions.extend(conditions.iter().cloned());
        }
    }
    specs
}

/// "+1 to hit", "add 1 to the wound roll", "subtract 1 from save
/// rolls" and friends.
fn roll_modifiers(text: &str) -> Vec<MechanicSpec> {
    let rolls = [
        ("hit", MechanicAttribute::Hit),
        ("wound", MechanicAttribute::Wound),
        ("sav", MechanicAttribute::Save),
    ];

    let mut specs = Vec::new();
    for (word, attribute) in rolls {
        let bonus = number_then(text, "add ", word, 40)
            .or_else(|| number_then(text, "+", &format!("to {word}"), 24));
        if let Some(value) = bonus {
            specs.push(
                MechanicSpec::new(MechanicEffect::RollBonus)
                    .with_attribute(attribute)
                    .with_value(MechanicValue::Int(value as i64)),
            );
            continue;
        }
        let penalty = number_then(text, "subtract ", word, 40)
            .or_else(|| number_then(text, "-", &format!("to {word}"), 24));
        if let Some(value) = penalty {
            specs.push(
                MechanicSpec::new(MechanicEffect::RollPenalty)
                    .with_attribute(attribute)
                    .with_value(MechanicValue::Int(value as i64)),
            );
        }
    }
    specs
}

/// Ability keywords granted by prose: sustained/lethal hits, re-rolls,
/// feel no pain, once-per-battle riders.
fn ability_grants(text: &str) -> Vec<MechanicSpec> {
    let mut names = Vec::new();

    if let Some(rest) = after(text, "sustained hits") {
        let rider = first_token(rest).unwrap_or("1");
        names.push(format!("SUSTAINED HITS {}", rider.to_ascii_uppercase()));
    }
    if text.contains("lethal hits") {
        names.push("LETHAL HITS".to_string());
    }
    if text.contains("devastating wounds") {
        names.push("DEVASTATING WOUNDS".to_string());
    }
    if text.contains("twin linked") {
        names.push("TWIN-LINKED".to_string());
    }
    if has_word(text, "precision") {
        names.push("PRECISION".to_string());
    }
    if has_word(text, "lance") {
        names.push("LANCE".to_string());
    }

    if let Some(rest) = after(text, "feel no pain") {
        match first_number(rest) {
            Some(threshold) => names.push(format!("FEEL NO PAIN {threshold}+")),
            None => names.push("FEEL NO PAIN".to_string()),
        }
    }

    if let Some(rest) = after(text, "re roll") {
        let window = clip(rest, 32);
        let name = if window.contains("hit") {
            "RE-ROLL HIT ROLLS"
        } else if window.contains("wound") {
            "RE-ROLL WOUND ROLLS"
        } else if window.contains("charge") {
            "RE-ROLL CHARGE ROLLS"
        } else if window.contains("damage") {
            "RE-ROLL DAMAGE ROLLS"
        } else {
            "RE-ROLLS"
        };
        names.push(name.to_string());
    }

    if text.contains("once per battle") {
        names.push("ONCE PER BATTLE".to_string());
    }

    names
        .into_iter()
        .map(|name| MechanicSpec::new(MechanicEffect::AddsAbility).with_ability(name))
        .collect()
}

/// Conditions the prose gates its effects on; applied to every spec the
/// other passes produced.
fn gating_conditions(text: &str) -> Vec<MechanicCondition> {
    let mut conditions = Vec::new();

    let phases: Vec<ConditionState> = [
        ("command phase", GamePhase::Command),
        ("movement phase", GamePhase::Movement),
        ("shooting phase", GamePhase::Shooting),
        ("charge phase", GamePhase::Charge),
        ("fight phase", GamePhase::Fight),
    ]
    .into_iter()
    .filter(|(phrase, _)| text.contains(phrase))
    .map(|(_, phase)| ConditionState::Phase(phase))
    .collect();
    if !phases.is_empty() {
        conditions.push(MechanicCondition::any_of(phases));
    }

    // deliberate over-match: "leadership test" prose is tagged
    // battle-shock gated along with genuine battle-shock wording
    if text.contains("battle shock") || text.contains("leadership test") {
        conditions.push(MechanicCondition::flag(CombatStatusFlag::BattleShocked));
    }

    if text.contains("is leading a unit") || text.contains("while leading") {
        conditions.push(MechanicCondition::leading());
    }

    if text.contains("below half strength") {
        conditions.push(MechanicCondition::flag(CombatStatusFlag::BelowHalfStrength));
    }
    if text.contains("range of an objective") {
        conditions.push(MechanicCondition::flag(CombatStatusFlag::InRangeOfObjective));
    }
    if text.contains("benefit of cover") || text.contains("in cover") {
        conditions.push(MechanicCondition::flag(CombatStatusFlag::InCover));
    }

    conditions
}

/// Lowercase, with hyphens joining two letters turned into spaces.
fn normalize(description: &str) -> String {
    let lower = description.to_ascii_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let between_letters = c == '-'
                && i > 0
                && chars[i - 1].is_ascii_alphabetic()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_alphabetic());
            if between_letters {
                ' '
            } else {
                c
            }
        })
        .collect()
}

/// Rest of `text` after the first occurrence of `phrase`.
fn after<'a>(text: &'a str, phrase: &str) -> Option<&'a str> {
    text.find(phrase).map(|i| text[i + phrase.len()..].trim_start())
}

/// A number following `prefix`, valid only when `needle` appears within
/// `window` characters after it.
fn number_then(text: &str, prefix: &str, needle: &str, window: usize) -> Option<u32> {
    let mut search = 0;
    while let Some(found) = text[search..].find(prefix) {
        let rest = &text[search + found + prefix.len()..];
        if let Some(value) = leading_number(rest) {
            if clip(rest, window).contains(needle) {
                return Some(value);
            }
        }
        search += found + prefix.len();
    }
    None
}

/// Truncate to at most `max` bytes without splitting a character.
fn clip(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// A number starting in the first couple of characters.
fn leading_number(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// First run of digits anywhere.
fn first_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// First whitespace-delimited token, kept only if it is a count or a
/// dice expression ("2", "d3").
fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace()
        .next()
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|t| {
            let dice = t.strip_prefix('d').unwrap_or(t);
            !dice.is_empty() && dice.chars().all(|c| c.is_ascii_digit())
        })
}

/// Whole-word containment, so "lance" does not match "balance".
fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|t| t == word)
}
