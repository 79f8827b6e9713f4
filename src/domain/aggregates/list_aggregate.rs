//! List aggregate - roster-graph operations over one army list
//!
//! All modifications to a list go through this aggregate so the
//! leader/bodyguard reference graph stays consistent in both
//! directions. Every mutation is a pure transform: the aggregate
//! borrows a snapshot and returns a new `ArmyList`, never editing in
//! place, and the caller replaces its reference atomically.

use std::collections::HashSet;

use crate::domain::entities::{ArmyList, ArmyListItem, Datasheet, Enhancement, UnitRef};
use crate::domain::value_objects::ListItemId;

/// Errors for operations that misuse the roster graph. Invalid
/// attachment *requests* are not errors; they come back as an
/// [`AttachmentDecision`] for the caller to confirm or abandon.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("list item {0} not found")]
    ItemNotFound(ListItemId),
    #[error("{leader} has no leader rules allowing it to lead {target}")]
    CannotLead { leader: String, target: String },
    #[error("attachment blocked: {reason}")]
    AttachmentBlocked { reason: String },
    #[error("{item} cannot take the enhancement {enhancement}")]
    EnhancementNotEligible { item: String, enhancement: String },
    #[error("enhancement {enhancement} is already held by {holder}")]
    EnhancementInUse { enhancement: String, holder: String },
    #[error("{0} is not a Character and cannot be the warlord")]
    NotACharacter(String),
}

/// Result of the multi-leader attachment gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDecision {
    pub can_attach: bool,
    /// When attachment is refused, attaching anyway replaces the
    /// existing leader group
    pub would_replace: bool,
    pub reason: Option<String>,
}

impl AttachmentDecision {
    fn allow() -> Self {
        Self {
            can_attach: true,
            would_replace: false,
            reason: None,
        }
    }

    fn replace(reason: impl Into<String>) -> Self {
        Self {
            can_attach: false,
            would_replace: true,
            reason: Some(reason.into()),
        }
    }
}

/// How `attach_leader` should resolve a refused gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachMode {
    /// Join the existing leader group; fail if the gate refuses
    Join,
    /// Replace the existing leader group wholesale
    Replace,
}

/// The combined fighting-unit view: a bodyguard unit with its attached
/// leaders, or a standalone item. Downstream extraction and condition
/// evaluation operate over this grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedUnit {
    /// Canonical selection identity: the alphabetically-first leader,
    /// or the standalone item itself
    pub selection: UnitRef,
    pub display_name: String,
    /// Attached leaders in alphabetical order
    pub leaders: Vec<ArmyListItem>,
    /// The bodyguard unit; absent for standalone leaders and plain units
    pub bodyguard: Option<ArmyListItem>,
    /// The standalone item when there is no leader/bodyguard pairing
    pub standalone: Option<ArmyListItem>,
}

/// Warlord eligibility report for one roster item.
#[derive(Debug, Clone, PartialEq)]
pub struct WarlordEligibility {
    pub list_item_id: ListItemId,
    pub name: String,
    pub eligible: bool,
    pub reason: Option<String>,
}

/// The multi-leader gate: whether `new_leader` may join a unit already
/// led by `existing`. This is the sole rule deciding join vs replace.
pub fn validate_multi_leader_attachment(
    new_leader: &Datasheet,
    existing: &[&Datasheet],
) -> AttachmentDecision {
    if existing.is_empty() {
        return AttachmentDecision::allow();
    }

    let conditions = match new_leader.leader.as_ref().and_then(|l| l.leader_conditions.as_ref()) {
        Some(conditions) => conditions,
        None => {
            return AttachmentDecision::replace(format!(
                "{} cannot share a unit with another leader",
                new_leader.name
            ));
        }
    };

    if conditions.allows_any_existing_leader {
        return AttachmentDecision::allow();
    }

    let compatible = existing.iter().any(|leader| {
        leader.keywords.matches_any(
            conditions
                .allowed_existing_leader_keywords
                .iter()
                .map(String::as_str),
        )
    });

    if compatible {
        AttachmentDecision::allow()
    } else {
        AttachmentDecision::replace(format!(
            "{} can only join a unit whose leaders match: {}",
            new_leader.name,
            conditions.allowed_existing_leader_keywords.join(", ")
        ))
    }
}

/// Aggregate root over one army list snapshot.
pub struct ListAggregate<'a> {
    list: &'a ArmyList,
}

impl<'a> ListAggregate<'a> {
    pub fn new(list: &'a ArmyList) -> Self {
        Self { list }
    }

    pub fn list(&self) -> &ArmyList {
        self.list
    }

    fn item(&self, id: ListItemId) -> Result<&ArmyListItem, RosterError> {
        self.list.item(id).ok_or(RosterError::ItemNotFound(id))
    }

    fn snapshot(&self) -> ArmyList {
        let mut next = self.list.clone();
        next.updated_at = chrono::Utc::now();
        next
    }

    // ========================================================================
    // Unit membership
    // ========================================================================

    /// Add a unit to the list (clone of the datasheet plus a generated
    /// roster identity).
    pub fn add_unit(&self, datasheet: Datasheet) -> ArmyList {
        let mut next = self.snapshot();
        next.items.push(ArmyListItem::from_datasheet(datasheet));
        next
    }

    /// Remove a unit, detaching any leaders attached to it and clearing
    /// every reference that pointed at it.
    pub fn remove_unit(&self, id: ListItemId) -> Result<ArmyList, RosterError> {
        let removed = self.item(id)?.clone();
        let mut next = self.snapshot();
        next.items.retain(|i| i.list_item_id != id);

        for item in &mut next.items {
            if let Some(leading) = &item.leading {
                if leading.points_at(&removed) {
                    item.leading = None;
                }
            }
            item.led_by.retain(|r| !r.points_at(&removed));
        }
        Ok(next)
    }

    /// Change a unit's fielded size; loadout selections above the new
    /// legal maximum are the loadout service's concern.
    pub fn set_model_count(&self, id: ListItemId, count: u32) -> Result<ArmyList, RosterError> {
        self.item(id)?;
        let mut next = self.snapshot();
        if let Some(item) = next.items.iter_mut().find(|i| i.list_item_id == id) {
            item.model_count = count.max(1);
        }
        Ok(next)
    }

    // ========================================================================
    // Leader attachment
    // ========================================================================

    /// Resolve the datasheets of the leaders currently attached to an
    /// item, dropping dangling references.
    fn existing_leaders(&self, target: &ArmyListItem) -> Vec<&ArmyListItem> {
        target
            .led_by
            .iter()
            .filter_map(|r| self.list.resolve(r))
            .collect()
    }

    /// Run the attachment gate for a proposed leader/target pairing
    /// without mutating anything.
    pub fn validate_attachment(
        &self,
        leader_id: ListItemId,
        target_id: ListItemId,
    ) -> Result<AttachmentDecision, RosterError> {
        let leader = self.item(leader_id)?;
        let target = self.item(target_id)?;

        if !leader.datasheet.can_lead(&target.datasheet.name) {
            return Err(RosterError::CannotLead {
                leader: leader.datasheet.name.clone(),
                target: target.datasheet.name.clone(),
            });
        }

        let existing = self.existing_leaders(target);
        let existing_sheets: Vec<&Datasheet> = existing.iter().map(|i| &i.datasheet).collect();
        Ok(validate_multi_leader_attachment(
            &leader.datasheet,
            &existing_sheets,
        ))
    }

    /// Attach a leader to a bodyguard unit, keeping the reference graph
    /// consistent in both directions. `Join` respects the multi-leader
    /// gate; `Replace` clears the existing leader group first (the
    /// caller is expected to have confirmed via the gate's decision).
    pub fn attach_leader(
        &self,
        leader_id: ListItemId,
        target_id: ListItemId,
        mode: AttachMode,
    ) -> Result<ArmyList, RosterError> {
        let decision = self.validate_attachment(leader_id, target_id)?;
        if !decision.can_attach && mode == AttachMode::Join {
            return Err(RosterError::AttachmentBlocked {
                reason: decision
                    .reason
                    .unwrap_or_else(|| "incompatible leader group".to_string()),
            });
        }

        let leader_ref = UnitRef::to_item(self.item(leader_id)?);
        let target_ref = UnitRef::to_item(self.item(target_id)?);
        let replacing = !decision.can_attach;

        let mut next = self.snapshot();

        // a leader moving between units leaves its old unit's led_by
        let previous_target = next
            .items
            .iter()
            .find(|i| i.list_item_id == leader_id)
            .and_then(|i| i.leading.clone());
        if let Some(previous) = previous_target {
            for item in &mut next.items {
                if previous.points_at(item) {
                    item.led_by.retain(|r| !r.points_at_id(leader_id));
                }
            }
        }

        if replacing {
            // clear the displaced leaders' forward pointers
            let displaced: Vec<UnitRef> = next
                .items
                .iter()
                .find(|i| i.list_item_id == target_id)
                .map(|t| t.led_by.clone())
                .unwrap_or_default();
            for item in &mut next.items {
                if displaced.iter().any(|r| r.points_at(item)) {
                    item.leading = None;
                }
            }
        }

        for item in &mut next.items {
            if item.list_item_id == leader_id {
                item.leading = Some(target_ref.clone());
            } else if item.list_item_id == target_id {
                if replacing {
                    item.led_by = vec![leader_ref.clone()];
                } else if !item.led_by.iter().any(|r| r.points_at_id(leader_id)) {
                    item.led_by.push(leader_ref.clone());
                }
            }
        }
        Ok(next)
    }

    /// Detach a leader from whatever unit it is leading. Detaching an
    /// unattached leader is a no-op, not an error.
    pub fn detach_leader(&self, leader_id: ListItemId) -> Result<ArmyList, RosterError> {
        self.item(leader_id)?;
        let mut next = self.snapshot();

        let target = next
            .items
            .iter()
            .find(|i| i.list_item_id == leader_id)
            .and_then(|i| i.leading.clone());

        for item in &mut next.items {
            if item.list_item_id == leader_id {
                item.leading = None;
            } else if let Some(target) = &target {
                if target.points_at(item) {
                    item.led_by.retain(|r| !r.points_at_id(leader_id));
                }
            }
        }
        Ok(next)
    }

    // ========================================================================
    // Enhancements and warlord
    // ========================================================================

    /// Equip an enhancement on a leader. Enhancements are unique per
    /// list; equipping one already held elsewhere is refused.
    pub fn equip_enhancement(
        &self,
        item_id: ListItemId,
        enhancement: Enhancement,
    ) -> Result<ArmyList, RosterError> {
        let item = self.item(item_id)?;
        if !enhancement.eligible_for(&item.datasheet) {
            return Err(RosterError::EnhancementNotEligible {
                item: item.datasheet.name.clone(),
                enhancement: enhancement.name,
            });
        }
        if let Some(holder) = self.list.items.iter().find(|i| {
            i.list_item_id != item_id
                && i.enhancement.as_ref().map(|e| &e.id) == Some(&enhancement.id)
        }) {
            return Err(RosterError::EnhancementInUse {
                enhancement: enhancement.name,
                holder: holder.datasheet.name.clone(),
            });
        }

        let mut next = self.snapshot();
        if let Some(item) = next.items.iter_mut().find(|i| i.list_item_id == item_id) {
            item.enhancement = Some(enhancement);
        }
        Ok(next)
    }

    pub fn unequip_enhancement(&self, item_id: ListItemId) -> Result<ArmyList, RosterError> {
        self.item(item_id)?;
        let mut next = self.snapshot();
        if let Some(item) = next.items.iter_mut().find(|i| i.list_item_id == item_id) {
            item.enhancement = None;
        }
        Ok(next)
    }

    /// Warlord eligibility for every item: Characters qualify, Epic
    /// Heroes included.
    pub fn warlord_eligibility(&self) -> Vec<WarlordEligibility> {
        self.list
            .items
            .iter()
            .map(|item| {
                let eligible = item.datasheet.is_character();
                WarlordEligibility {
                    list_item_id: item.list_item_id,
                    name: item.datasheet.name.clone(),
                    eligible,
                    reason: (!eligible).then(|| "not a Character".to_string()),
                }
            })
            .collect()
    }

    pub fn set_warlord(&self, item_id: ListItemId) -> Result<ArmyList, RosterError> {
        let item = self.item(item_id)?;
        if !item.datasheet.is_character() {
            return Err(RosterError::NotACharacter(item.datasheet.name.clone()));
        }
        let mut next = self.snapshot();
        for item in &mut next.items {
            item.is_warlord = item.list_item_id == item_id;
        }
        Ok(next)
    }

    // ========================================================================
    // Combined fighting-unit view
    // ========================================================================

    /// Group the flat item array into combined fighting units. Every
    /// item appears in exactly one entry; leaders whose bodyguard
    /// reference no longer resolves are emitted standalone. The result
    /// is sorted alphabetically by display name for deterministic
    /// presentation.
    pub fn combined_units(&self) -> Vec<CombinedUnit> {
        let mut consumed: HashSet<ListItemId> = HashSet::new();
        let mut combined = Vec::new();

        for item in &self.list.items {
            if consumed.contains(&item.list_item_id) {
                continue;
            }
            let mut leaders = self.existing_leaders(item);
            if leaders.is_empty() {
                continue;
            }
            leaders.sort_by(|a, b| a.datasheet.name.cmp(&b.datasheet.name));

            consumed.insert(item.list_item_id);
            for leader in &leaders {
                consumed.insert(leader.list_item_id);
            }

            let leader_names: Vec<&str> =
                leaders.iter().map(|l| l.datasheet.name.as_str()).collect();
            let display_name = format!("{} + {}", leader_names.join(" + "), item.datasheet.name);

            combined.push(CombinedUnit {
                selection: UnitRef::to_item(leaders[0]),
                display_name,
                leaders: leaders.into_iter().cloned().collect(),
                bodyguard: Some(item.clone()),
                standalone: None,
            });
        }

        for item in &self.list.items {
            if consumed.contains(&item.list_item_id) {
                continue;
            }
            combined.push(CombinedUnit {
                selection: UnitRef::to_item(item),
                display_name: item.datasheet.name.clone(),
                leaders: Vec::new(),
                bodyguard: None,
                standalone: Some(item.clone()),
            });
        }

        combined.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        combined
    }
}

impl UnitRef {
    /// Id-only pointer test, used when pruning references to an item
    /// that is known to have a roster identity.
    fn points_at_id(&self, id: ListItemId) -> bool {
        self.list_item_id == Some(id)
    }
}
