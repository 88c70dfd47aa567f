use contracts::requirement_key;
use serde_json::{json, Value};

use crate::requirement::passive_check;

use super::GameWorld;

impl GameWorld {
    /// Read-only snapshot of one actor, pending state included.
    pub fn inspect_actor(&self, actor_id: &str) -> Option<Value> {
        let actor = self.actors.get(actor_id)?;
        Some(json!({
            "actor_id": actor.actor_id,
            "name": actor.name,
            "location_id": actor.location_id,
            "connected": actor.connected,
            "group_id": self.groups.group_of(actor_id),
            "pending_roll": actor.pending_roll.as_ref().map(|roll| json!({
                "skill": roll.skill,
                "result": roll.result,
                "verb": roll.verb.map(|verb| verb.as_str()),
                "tier": self.ladder.describe(roll.result),
            })),
            "pending_check": actor.pending_check.as_ref().map(|check| json!({
                "action": check.action,
                "skill": check.skill,
                "required_level": check.required_level,
                "target_id": check.target_id,
            })),
            "pending_elaboration": actor.pending_elaboration.as_ref().map(|elab| json!({
                "tier": elab.tier.as_str(),
                "action": elab.action,
                "target_id": elab.target_id,
            })),
            "aspects": actor.aspects.as_ref().map(|ledger| {
                ledger.iter().map(|(slot, text)| json!({
                    "slot": slot,
                    "text": text,
                })).collect::<Vec<_>>()
            }),
        }))
    }

    pub fn inspect_entity(&self, entity_id: &str) -> Option<Value> {
        let entity = self.entities.get(entity_id)?;
        Some(json!({
            "entity_id": entity.entity_id,
            "name": entity.name,
            "location_id": entity.location_id,
            "tags": entity.tags,
            "requirements": entity.requirements,
            "locks": entity.locks,
        }))
    }

    /// Snapshot of a group and its open poll, if any. A stalled poll is
    /// visible here: outstanding voters never shrink on disconnect.
    pub fn inspect_group(&self, group_id: u64) -> Option<Value> {
        let group = self.groups.group(group_id)?;
        Some(json!({
            "group_id": group.group_id,
            "members": group.members,
            "poll": group.poll.as_ref().map(|poll| json!({
                "initiator": poll.initiator,
                "query": poll.query,
                "tallied": poll.voter_count() - poll.votes_outstanding(),
                "total": poll.voter_count(),
            })),
        }))
    }

    /// Character sheet: ladder-labelled skills plus aspects.
    pub fn sheet_text(&self, actor_id: &str) -> Option<String> {
        let actor = self.actors.get(actor_id)?;
        let mut lines = vec![format!("== {} ==", actor.name)];
        if let Some(skills) = actor.skills.as_ref() {
            for skill in skills.iter() {
                lines.push(skills.sheet_line(skill, &self.ladder));
            }
        }
        if let Some(ledger) = actor.aspects.as_ref() {
            lines.push(format!("Refresh: {}", ledger.refresh()));
            for (_, text) in ledger.iter() {
                lines.push(format!("Aspect: {text}"));
            }
        }
        Some(lines.join("\n"))
    }

    /// Whether `viewer_id` passes the entity's passive view gate. Always
    /// re-evaluated from live skill values.
    pub fn can_view(&self, viewer_id: &str, entity_id: &str) -> bool {
        let Some(entity) = self.entities.get(entity_id) else {
            return false;
        };
        let requirement = entity.requirements.get(&requirement_key("view", true));
        let skills = self
            .actors
            .get(viewer_id)
            .and_then(|actor| actor.skills.as_ref());
        passive_check(skills, requirement)
    }

    /// The name `viewer_id` sees, or None when the passive gate hides the
    /// entity entirely. Concealed-but-seen entities carry a marker.
    pub fn display_name(&self, viewer_id: &str, entity_id: &str) -> Option<String> {
        let entity = self.entities.get(entity_id)?;
        let concealed = entity
            .requirements
            .contains_key(&requirement_key("view", true));
        if !self.can_view(viewer_id, entity_id) {
            return None;
        }
        if concealed {
            Some(format!("{}(hidden)", entity.name))
        } else {
            Some(entity.name.clone())
        }
    }

    /// What `viewer_id` sees when looking at the entity. A failed passive
    /// gate yields the requirement's own text when it has one.
    pub fn appearance(&self, viewer_id: &str, entity_id: &str) -> Option<String> {
        let entity = self.entities.get(entity_id)?;
        if !self.can_view(viewer_id, entity_id) {
            let fallback = entity
                .requirements
                .get(&requirement_key("view", true))
                .and_then(|requirement| requirement.desc.clone());
            return Some(fallback.unwrap_or_else(|| "This is hidden.".to_string()));
        }
        let mut text = format!("You see the {}.", entity.name);
        if entity.tags.contains("open") {
            text.push_str(" It is open.");
        }
        Some(text)
    }
}
