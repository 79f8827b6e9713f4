//! Audit Service - offline best-effort reporter over rule data
//!
//! A badly authored rule never crashes the resolver; it silently fails
//! to apply. This reporter is the other half of that bargain: it scans
//! a faction's rule text and flags every ability whose mechanics exist
//! only by text inference (for human review of the heuristics' known
//! false positives) and every ability that matched nothing at all.

use tracing::{info, instrument};

use crate::application::dto::{AuditFinding, AuditFindingKind, AuditReport};
use crate::application::services::resolution::heuristics;
use crate::domain::entities::{Ability, Faction};

pub struct AuditService;

impl AuditService {
    /// Scan one faction's datasheet abilities, detachment rules and
    /// enhancement texts.
    #[instrument(skip(faction), fields(faction = %faction.name))]
    pub fn audit_faction(faction: &Faction) -> AuditReport {
        let mut findings = Vec::new();
        let mut scanned = 0;

        for datasheet in &faction.datasheets {
            for ability in &datasheet.abilities {
                scanned += 1;
                if let Some(finding) = Self::audit_ability(&datasheet.name, ability) {
                    findings.push(finding);
                }
            }
        }

        for detachment in &faction.detachments {
            for rule in &detachment.rules {
                scanned += 1;
                if let Some(finding) =
                    Self::audit_ability(&format!("{} (detachment)", detachment.name), rule)
                {
                    findings.push(finding);
                }
            }
            for enhancement in &detachment.enhancements {
                scanned += 1;
                if enhancement.mechanics.is_empty() {
                    if let Some(description) = &enhancement.description {
                        let inferred = heuristics::classify(description);
                        findings.push(AuditFinding {
                            datasheet: format!("{} (enhancement)", detachment.name),
                            ability: enhancement.name.clone(),
                            kind: if inferred.is_empty() {
                                AuditFindingKind::Unclassified
                            } else {
                                AuditFindingKind::HeuristicOnly
                            },
                            inferred,
                        });
                    }
                }
            }
        }

        info!(
            scanned,
            flagged = findings.len(),
            "audited faction rule data"
        );
        AuditReport {
            faction: faction.name.clone(),
            abilities_scanned: scanned,
            findings,
        }
    }

    /// Structured abilities pass; description-only abilities are
    /// flagged either as heuristic-only or unclassified.
    fn audit_ability(owner: &str, ability: &Ability) -> Option<AuditFinding> {
        if ability.has_structured_mechanics() {
            return None;
        }
        let description = ability.description.as_ref()?;
        let inferred = heuristics::classify(description);
        Some(AuditFinding {
            datasheet: owner.to_string(),
            ability: ability.name.clone(),
            kind: if inferred.is_empty() {
                AuditFindingKind::Unclassified
            } else {
                AuditFindingKind::HeuristicOnly
            },
            inferred,
        })
    }
}
