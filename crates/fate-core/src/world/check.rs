use contracts::{
    requirement_key, EngineError, ErrorCode, EventType, OutcomeTier, Verb,
};
use serde_json::json;

use super::events::{actor_ref, entity_ref};
use super::{GameWorld, PendingCheck, PendingElaboration, PendingRoll};

/// How a pending roll gets rewritten: a flat additive bonus, or a full
/// reroll that replaces the prior result outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollModifier {
    Bonus(i64),
    Reroll,
}

/// Leading tokens stripped from `<action> <target-phrase>` input.
const PREPOSITIONS: [&str; 3] = ["on ", "at ", "to "];

fn parse_action_phrase(input: &str) -> Option<(String, String)> {
    let mut rest = input.trim();
    for preposition in PREPOSITIONS {
        if let Some(stripped) = rest.strip_prefix(preposition) {
            rest = stripped.trim_start();
            break;
        }
    }
    let mut parts = rest.splitn(2, char::is_whitespace);
    let action = parts.next()?.trim();
    let target = parts.next()?.trim();
    if action.is_empty() || target.is_empty() {
        return None;
    }
    Some((action.to_ascii_lowercase(), target.to_string()))
}

impl GameWorld {
    /// Flavor roll with no target and no retained state.
    pub fn bare_roll(&mut self, actor_id: &str) -> Result<(), EngineError> {
        let actor = self.actors.get(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        if actor.pending_roll.is_some() {
            return Err(EngineError::new(
                ErrorCode::AlreadyRolling,
                "You already have a check in progress.",
                None,
            ));
        }
        let roll = self.dice.roll();
        let location_id = self
            .actors
            .get(actor_id)
            .map(|actor| actor.location_id.clone())
            .unwrap_or_default();
        self.push_event(
            EventType::DiceRolled,
            location_id,
            vec![actor_ref(actor_id)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({ "glyphs": roll.glyphs, "total": roll.total })),
        );
        self.msg_actor(actor_id, format!("{}\nYou rolled {}.", roll.glyphs, roll.total));
        Ok(())
    }

    /// First stage of the pipeline: parse, resolve the target, read its
    /// requirement, and either report "no check needed", reject the skill,
    /// or roll and park the pending state. A prior pending roll/check is
    /// silently overwritten; there is no separate cancel operation.
    pub fn initiate_check(
        &mut self,
        actor_id: &str,
        skill_name: &str,
        input: &str,
    ) -> Result<(), EngineError> {
        let actor = self.actors.get(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        let actor_name = actor.name.clone();
        let location_id = actor.location_id.clone();
        let skills = actor.skills.as_ref().ok_or_else(|| {
            EngineError::new(ErrorCode::NoSkillsCapability, "You can't do that.", None)
        })?;
        let skill = skills.get(skill_name).ok_or_else(|| {
            EngineError::new(
                ErrorCode::UnknownSkill,
                format!("You don't have a skill called {}.", skill_name.trim()),
                None,
            )
        })?;
        let skill_display = skill.name.clone();
        let skill_value = skill.value;

        let (action, target_phrase) = parse_action_phrase(input).ok_or_else(|| {
            EngineError::new(
                ErrorCode::MalformedRequest,
                format!(
                    "You need an action and a target. e.g. {} to open box",
                    skill_display.to_ascii_lowercase()
                ),
                None,
            )
        })?;

        let wanted = target_phrase
            .strip_prefix("the ")
            .unwrap_or(&target_phrase)
            .trim();
        let target = self
            .entities
            .values()
            .find(|entity| {
                entity.location_id == location_id && entity.name.eq_ignore_ascii_case(wanted)
            })
            .or_else(|| self.entities.get(&target_phrase))
            .ok_or_else(|| {
                EngineError::new(
                    ErrorCode::TargetNotFound,
                    format!("You can't find '{target_phrase}'."),
                    None,
                )
            })?;
        let target_id = target.entity_id.clone();
        let target_name = target.name.clone();

        let key = requirement_key(&action, false);
        let Some(requirement) = target.requirements.get(&key).cloned() else {
            self.push_event(
                EventType::NoCheckNeeded,
                location_id,
                vec![actor_ref(actor_id)],
                vec![entity_ref(&target_id)],
                Vec::new(),
                None,
                Some(json!({ "action": action })),
            );
            self.msg_actor(
                actor_id,
                format!("You don't need a skill check to {action} the {target_name}."),
            );
            return Ok(());
        };

        let Some(required_level) = requirement.skills.get(&skill_display).copied() else {
            self.push_event(
                EventType::CheckRejected,
                location_id.clone(),
                vec![actor_ref(actor_id)],
                vec![entity_ref(&target_id)],
                Vec::new(),
                None,
                Some(json!({ "action": action, "skill": skill_display })),
            );
            self.msg_actor(
                actor_id,
                format!("You can't use {skill_display} to {action} the {target_name}."),
            );
            self.msg_room(
                &location_id,
                Some(actor_id),
                format!("{actor_name} can't {action} the {target_name} with {skill_display}."),
            );
            return Ok(());
        };

        let roll = self.dice.roll();
        let result = roll.total + skill_value;
        let tier_label = self.ladder.describe(result).to_string();

        if let Some(actor) = self.actors.get_mut(actor_id) {
            actor.pending_check = Some(PendingCheck {
                action: action.clone(),
                skill: skill_display.clone(),
                required_level,
                target_id: target_id.clone(),
            });
            // Gated actions resolve as overcome rolls.
            actor.pending_roll = Some(PendingRoll {
                skill: skill_display.clone(),
                result,
                verb: Some(Verb::Overcome),
            });
        }

        self.push_event(
            EventType::CheckInitiated,
            location_id.clone(),
            vec![actor_ref(actor_id)],
            vec![entity_ref(&target_id)],
            Vec::new(),
            None,
            Some(json!({
                "action": action,
                "skill": skill_display,
                "required_level": required_level,
                "glyphs": roll.glyphs,
                "roll_total": roll.total,
                "result": result,
                "tier": tier_label,
            })),
        );
        self.msg_actor(
            actor_id,
            format!("{}\nYour {skill_display} check is {tier_label}.", roll.glyphs),
        );
        self.msg_room(
            &location_id,
            Some(actor_id),
            format!("{actor_name} rolls a {tier_label} {skill_display} check."),
        );
        Ok(())
    }

    /// Rewrites a pending roll in place and re-reports the tier.
    pub fn apply_modifier(
        &mut self,
        actor_id: &str,
        modifier: RollModifier,
    ) -> Result<i64, EngineError> {
        let actor = self.actors.get(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        let pending = actor.pending_roll.clone().ok_or_else(|| {
            EngineError::new(
                ErrorCode::NoActiveRoll,
                "You don't have a recent check to modify.",
                None,
            )
        })?;
        let actor_name = actor.name.clone();
        let location_id = actor.location_id.clone();
        let skill_value = actor
            .skills
            .as_ref()
            .and_then(|skills| skills.get(&pending.skill))
            .map(|skill| skill.value)
            .unwrap_or(0);

        let (result, detail) = match modifier {
            RollModifier::Bonus(amount) => (
                pending.result + amount,
                json!({ "kind": "bonus", "amount": amount }),
            ),
            RollModifier::Reroll => {
                let roll = self.dice.roll();
                (
                    roll.total + skill_value,
                    json!({ "kind": "reroll", "glyphs": roll.glyphs, "roll_total": roll.total }),
                )
            }
        };

        if let Some(actor) = self.actors.get_mut(actor_id) {
            if let Some(pending_roll) = actor.pending_roll.as_mut() {
                pending_roll.result = result;
            }
        }

        let tier_label = self.ladder.describe(result).to_string();
        self.push_event(
            EventType::RollModified,
            location_id.clone(),
            vec![actor_ref(actor_id)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({
                "skill": pending.skill,
                "result": result,
                "tier": tier_label,
                "modifier": detail,
            })),
        );
        self.msg_actor(
            actor_id,
            format!("Your new {} check is {tier_label}.", pending.skill),
        );
        self.msg_room(
            &location_id,
            Some(actor_id),
            format!("{actor_name}'s new {} check is {tier_label}.", pending.skill),
        );
        Ok(result)
    }

    /// First half of the commit. Computes the margin, fixes the outcome
    /// tier, and clears the pending roll/check unconditionally. Success
    /// tiers park a [`PendingElaboration`] and prompt the actor; Failure
    /// resolves immediately.
    pub fn commit_begin(&mut self, actor_id: &str) -> Result<OutcomeTier, EngineError> {
        let actor = self.actors.get_mut(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        let (Some(roll), Some(check)) = (actor.pending_roll.clone(), actor.pending_check.clone())
        else {
            return Err(EngineError::new(
                ErrorCode::NoActiveCheck,
                "You don't have an active check to commit.",
                None,
            ));
        };
        actor.pending_roll = None;
        actor.pending_check = None;
        let actor_name = actor.name.clone();
        let location_id = actor.location_id.clone();

        let margin = roll.result - check.required_level;
        let tier = OutcomeTier::for_margin(margin);
        self.push_event(
            EventType::CheckCommitted,
            location_id.clone(),
            vec![actor_ref(actor_id)],
            vec![entity_ref(&check.target_id)],
            Vec::new(),
            None,
            Some(json!({
                "action": check.action,
                "skill": check.skill,
                "result": roll.result,
                "required_level": check.required_level,
                "margin": margin,
                "tier": tier.as_str(),
            })),
        );

        if tier == OutcomeTier::Failure {
            self.msg_room(&location_id, None, format!("{actor_name} failed the check."));
            self.push_event(
                EventType::CheckResolved,
                location_id,
                vec![actor_ref(actor_id)],
                vec![entity_ref(&check.target_id)],
                Vec::new(),
                None,
                Some(json!({ "action": check.action, "tier": tier.as_str() })),
            );
            return Ok(tier);
        }

        if let Some(actor) = self.actors.get_mut(actor_id) {
            actor.pending_elaboration = Some(PendingElaboration {
                tier,
                action: check.action.clone(),
                target_id: check.target_id.clone(),
            });
        }
        let prompt = match tier {
            OutcomeTier::SuccessWithStyle => "You succeed with style! Describe how that looks:",
            OutcomeTier::Success => "You succeed. Describe how that looks:",
            _ => "You succeed, but at a cost. Describe how that looks:",
        };
        self.msg_actor(actor_id, prompt);
        Ok(tier)
    }

    /// Second half of the commit, run when the actor's elaboration text
    /// arrives. Replays the branch fixed by [`Self::commit_begin`]:
    /// broadcasts the text, fires the target action with the tier's bonus
    /// flag, and consumes a oneshot requirement.
    pub fn commit_finish(&mut self, actor_id: &str, text: &str) -> Result<(), EngineError> {
        let actor = self.actors.get_mut(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        let elaboration = actor.pending_elaboration.take().ok_or_else(|| {
            EngineError::new(
                ErrorCode::NoPendingElaboration,
                "You have nothing to describe.",
                None,
            )
        })?;
        let location_id = actor.location_id.clone();

        self.msg_room(&location_id, None, text.to_string());
        self.attempt_action(
            actor_id,
            &elaboration.action,
            &elaboration.target_id,
            true,
            elaboration.tier.bonus_flag(),
        )?;

        let key = requirement_key(&elaboration.action, false);
        let consumed = self
            .entities
            .get_mut(&elaboration.target_id)
            .map(|entity| match entity.requirements.get(&key) {
                Some(requirement) if requirement.oneshot => {
                    entity.requirements.remove(&key);
                    true
                }
                _ => false,
            })
            .unwrap_or(false);
        if consumed {
            self.push_event(
                EventType::RequirementConsumed,
                location_id.clone(),
                vec![actor_ref(actor_id)],
                vec![entity_ref(&elaboration.target_id)],
                Vec::new(),
                None,
                Some(json!({ "action": elaboration.action, "key": key })),
            );
        }

        self.push_event(
            EventType::CheckResolved,
            location_id,
            vec![actor_ref(actor_id)],
            vec![entity_ref(&elaboration.target_id)],
            Vec::new(),
            None,
            Some(json!({
                "action": elaboration.action,
                "tier": elaboration.tier.as_str(),
            })),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::parse_action_phrase;

    #[test]
    fn strips_one_leading_preposition() {
        assert_eq!(
            parse_action_phrase("to open strongbox"),
            Some(("open".to_string(), "strongbox".to_string()))
        );
        assert_eq!(
            parse_action_phrase("open the strongbox"),
            Some(("open".to_string(), "the strongbox".to_string()))
        );
    }

    #[test]
    fn rejects_missing_target_phrase() {
        assert_eq!(parse_action_phrase("open"), None);
        assert_eq!(parse_action_phrase("to open"), None);
        assert_eq!(parse_action_phrase("   "), None);
    }
}
