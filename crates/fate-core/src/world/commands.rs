use contracts::{
    requirement_key, Command, CommandPayload, CommandResult, EngineError, ErrorCode, EventType,
};
use serde_json::json;

use crate::requirement::merge_authoring;
use crate::skills::SkillSet;

use super::events::{actor_ref, entity_ref};
use super::{GameWorld, QueuedCommand};

/// Aspect slots outside the numbered free-slot budget.
const NAMED_ASPECT_SLOTS: [&str; 3] = ["concept", "high_concept", "trouble"];

/// The actor a payload speaks for, used to route rejection notices.
fn payload_actor(payload: &CommandPayload) -> Option<&str> {
    match payload {
        CommandPayload::DiceRoll { actor_id }
        | CommandPayload::CheckInitiate { actor_id, .. }
        | CommandPayload::CheckCommit { actor_id }
        | CommandPayload::CheckElaborate { actor_id, .. }
        | CommandPayload::AspectSet { actor_id, .. }
        | CommandPayload::AspectInvoke { actor_id, .. }
        | CommandPayload::Vote { actor_id, .. }
        | CommandPayload::GroupRemove { actor_id }
        | CommandPayload::GroupSplit { actor_id, .. }
        | CommandPayload::SessionConnect { actor_id }
        | CommandPayload::SessionDisconnect { actor_id }
        | CommandPayload::ActionAttempt { actor_id, .. } => Some(actor_id),
        CommandPayload::GroupAdd { leader_id, .. } => Some(leader_id),
        CommandPayload::RequirementAuthor { .. } | CommandPayload::RequirementRemove { .. } => None,
    }
}

impl GameWorld {
    /// Drains every command whose effective tick has arrived, in
    /// (effective_tick, insertion_sequence) order, and applies each one.
    pub(super) fn process_due_commands(&mut self) -> Vec<CommandResult> {
        let current_tick = self.status.current_tick;
        let mut due: Vec<QueuedCommand> = Vec::new();
        let mut remaining: Vec<QueuedCommand> = Vec::new();
        for queued in std::mem::take(&mut self.queued_commands) {
            if queued.effective_tick <= current_tick {
                due.push(queued);
            } else {
                remaining.push(queued);
            }
        }
        due.sort_by_key(|queued| (queued.effective_tick, queued.insertion_sequence));
        self.queued_commands = remaining;

        let mut results = Vec::with_capacity(due.len());
        for queued in due {
            results.push(self.apply_command(&queued.command));
        }
        self.sync_queue_depth();
        results
    }

    /// Applies one command. Usage errors become a rejected result plus a
    /// notice to the issuing actor; game outcomes (a refused gate, a lost
    /// vote) are accepted commands whose story is in the event log.
    pub fn apply_command(&mut self, command: &Command) -> CommandResult {
        match self.dispatch(&command.payload) {
            Ok(()) => {
                let location_id = payload_actor(&command.payload)
                    .and_then(|actor_id| self.actors.get(actor_id))
                    .map(|actor| actor.location_id.clone())
                    .unwrap_or_default();
                let actors = payload_actor(&command.payload)
                    .map(|actor_id| vec![actor_ref(actor_id)])
                    .unwrap_or_default();
                self.push_event(
                    EventType::CommandApplied,
                    location_id,
                    actors,
                    Vec::new(),
                    vec![command.command_id.clone()],
                    None,
                    Some(json!({ "command_type": command.command_type })),
                );
                CommandResult::accepted(command)
            }
            Err(error) => {
                if let Some(actor_id) = payload_actor(&command.payload) {
                    if self.actors.contains_key(actor_id) {
                        let text = error.message.clone();
                        self.msg_actor(actor_id, text);
                    }
                }
                CommandResult::rejected(command, error)
            }
        }
    }

    fn dispatch(&mut self, payload: &CommandPayload) -> Result<(), EngineError> {
        match payload {
            CommandPayload::DiceRoll { actor_id } => self.bare_roll(actor_id),
            CommandPayload::CheckInitiate {
                actor_id,
                skill,
                input,
            } => self.initiate_check(actor_id, skill, input),
            CommandPayload::CheckCommit { actor_id } => {
                self.commit_begin(actor_id).map(|_| ())
            }
            CommandPayload::CheckElaborate { actor_id, text } => {
                self.commit_finish(actor_id, text)
            }
            CommandPayload::AspectSet {
                actor_id,
                slot,
                text,
            } => self.set_aspect(actor_id, slot, text),
            CommandPayload::AspectInvoke {
                actor_id,
                aspect,
                effect,
            } => self.invoke_aspect(actor_id, aspect, effect),
            CommandPayload::Vote { actor_id, approve } => self.record_vote(actor_id, *approve),
            CommandPayload::GroupAdd {
                leader_id,
                member_id,
            } => self.group_add(leader_id, member_id),
            CommandPayload::GroupRemove { actor_id } => self.group_remove(actor_id),
            CommandPayload::GroupSplit {
                actor_id,
                member_ids,
            } => self.group_split(actor_id, member_ids),
            CommandPayload::SessionConnect { actor_id } => self.session_connect(actor_id),
            CommandPayload::SessionDisconnect { actor_id } => self.session_disconnect(actor_id),
            CommandPayload::RequirementAuthor {
                entity_id,
                action,
                passive,
                skill,
                level,
                oneshot,
                desc,
            } => self.author_requirement(
                entity_id,
                action,
                *passive,
                skill,
                *level,
                *oneshot,
                desc.clone(),
            ),
            CommandPayload::RequirementRemove {
                entity_id,
                action,
                passive,
            } => self.remove_requirement(entity_id, action, *passive),
            CommandPayload::ActionAttempt {
                actor_id,
                action,
                target_id,
            } => self.action_attempt(actor_id, action, target_id),
        }
    }

    fn set_aspect(&mut self, actor_id: &str, slot: &str, text: &str) -> Result<(), EngineError> {
        let actor = self.actors.get(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        let location_id = actor.location_id.clone();
        let ledger = actor.aspects.as_ref().ok_or_else(|| {
            EngineError::new(ErrorCode::NoAspectsCapability, "You can't do that.", None)
        })?;
        let is_new = !ledger.iter().any(|(name, _)| name == slot);
        // Named slots (high concept, trouble) are always settable; only
        // the free slots count against the budget.
        let named = |name: &str| NAMED_ASPECT_SLOTS.contains(&name);
        let slot_cap = self.config.free_aspect_slots as usize;
        let free_in_use = ledger.iter().filter(|(name, _)| !named(name)).count();
        if is_new && !named(slot) && free_in_use >= slot_cap {
            return Err(EngineError::new(
                ErrorCode::MalformedRequest,
                format!("All {slot_cap} of your free aspect slots are in use."),
                None,
            ));
        }
        if let Some(actor) = self.actors.get_mut(actor_id) {
            if let Some(ledger) = actor.aspects.as_mut() {
                ledger.set(slot, text);
            }
        }
        self.push_event(
            EventType::AspectSet,
            location_id,
            vec![actor_ref(actor_id)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({ "slot": slot, "text": text })),
        );
        self.msg_actor(actor_id, format!("You now have the aspect: {text}."));
        Ok(())
    }

    fn session_connect(&mut self, actor_id: &str) -> Result<(), EngineError> {
        let actor = self.actors.get_mut(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        actor.connected = true;
        let location_id = actor.location_id.clone();
        self.push_event(
            EventType::SessionConnected,
            location_id.clone(),
            vec![actor_ref(actor_id)],
            Vec::new(),
            Vec::new(),
            None,
            None,
        );
        // Every connected actor sits in some group; solo actors get one
        // of their own.
        if self.groups.group_of(actor_id).is_none() {
            let acquired = self.groups.acquire();
            self.groups.add(actor_id, acquired.id());
            self.note_acquired(acquired, &location_id, actor_id);
        }
        Ok(())
    }

    fn session_disconnect(&mut self, actor_id: &str) -> Result<(), EngineError> {
        let actor = self.actors.get_mut(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        actor.connected = false;
        let location_id = actor.location_id.clone();
        self.push_event(
            EventType::SessionDisconnected,
            location_id,
            vec![actor_ref(actor_id)],
            Vec::new(),
            Vec::new(),
            None,
            None,
        );
        Ok(())
    }

    fn note_acquired(
        &mut self,
        acquired: crate::group::Acquired,
        location_id: &str,
        actor_id: &str,
    ) {
        let (event_type, group_id) = match acquired {
            crate::group::Acquired::Created(id) => (EventType::GroupCreated, id),
            crate::group::Acquired::Recycled(id) => (EventType::GroupRecycled, id),
        };
        self.push_event(
            event_type,
            location_id.to_string(),
            vec![actor_ref(actor_id)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({ "group_id": group_id })),
        );
    }

    fn group_add(&mut self, leader_id: &str, member_id: &str) -> Result<(), EngineError> {
        let leader = self.actors.get(leader_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        if !leader.connected {
            return Err(EngineError::new(
                ErrorCode::NotEligible,
                "You aren't connected.",
                None,
            ));
        }
        let leader_name = leader.name.clone();
        let location_id = leader.location_id.clone();
        let member = self.actors.get(member_id).ok_or_else(|| {
            EngineError::new(ErrorCode::TargetNotFound, "They aren't here.", None)
        })?;
        if !member.connected {
            return Err(EngineError::new(
                ErrorCode::NotEligible,
                "They aren't connected.",
                None,
            ));
        }
        let member_name = member.name.clone();

        let group_id = match self.groups.group_of(leader_id) {
            Some(group_id) => group_id,
            None => {
                let acquired = self.groups.acquire();
                self.groups.add(leader_id, acquired.id());
                self.note_acquired(acquired, &location_id, leader_id);
                acquired.id()
            }
        };
        if self.groups.group_of(member_id) == Some(group_id) {
            return Err(EngineError::new(
                ErrorCode::MalformedRequest,
                "They are already in your group.",
                None,
            ));
        }
        if let Some(recycled) = self.groups.add(member_id, group_id) {
            self.push_event(
                EventType::GroupRecycled,
                location_id.clone(),
                vec![actor_ref(member_id)],
                Vec::new(),
                Vec::new(),
                None,
                Some(json!({ "group_id": recycled })),
            );
        }
        self.push_event(
            EventType::GroupMemberAdded,
            location_id,
            vec![actor_ref(leader_id), actor_ref(member_id)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({ "group_id": group_id })),
        );
        self.msg_actor(leader_id, format!("You add {member_name} to your group."));
        self.msg_actor(member_id, format!("{leader_name} adds you to their group."));
        Ok(())
    }

    fn group_remove(&mut self, actor_id: &str) -> Result<(), EngineError> {
        let actor = self.actors.get(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        let location_id = actor.location_id.clone();
        let group_id = self.groups.group_of(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::NotAGroupMember, "You aren't in a group.", None)
        })?;
        let recycled = self.groups.remove(actor_id);
        self.push_event(
            EventType::GroupMemberRemoved,
            location_id.clone(),
            vec![actor_ref(actor_id)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({ "group_id": group_id })),
        );
        if let Some(recycled) = recycled {
            self.push_event(
                EventType::GroupRecycled,
                location_id,
                vec![actor_ref(actor_id)],
                Vec::new(),
                Vec::new(),
                None,
                Some(json!({ "group_id": recycled })),
            );
        }
        self.msg_actor(actor_id, "You leave your group.");
        Ok(())
    }

    fn group_split(&mut self, actor_id: &str, member_ids: &[String]) -> Result<(), EngineError> {
        let actor = self.actors.get(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        let location_id = actor.location_id.clone();
        let group_id = self.groups.group_of(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::NotAGroupMember, "You aren't in a group.", None)
        })?;
        let acquired = self
            .groups
            .split(group_id, member_ids)
            .map_err(|()| {
                EngineError::new(
                    ErrorCode::MalformedRequest,
                    "Those aren't all members of your group.",
                    None,
                )
            })?;
        let Some(acquired) = acquired else {
            self.msg_actor(actor_id, "That wouldn't split the group.");
            return Ok(());
        };
        self.note_acquired(acquired, &location_id, actor_id);
        self.push_event(
            EventType::GroupSplit,
            location_id,
            vec![actor_ref(actor_id)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({
                "from_group_id": group_id,
                "to_group_id": acquired.id(),
                "members": member_ids,
            })),
        );
        for member in member_ids {
            self.msg_actor(member, "You split off into your own group.");
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn author_requirement(
        &mut self,
        entity_id: &str,
        action: &str,
        passive: bool,
        skill: &str,
        level: i64,
        oneshot: bool,
        desc: Option<String>,
    ) -> Result<(), EngineError> {
        let skill_display = SkillSet::standard()
            .get(skill)
            .map(|skill| skill.name.clone())
            .ok_or_else(|| {
                EngineError::new(
                    ErrorCode::UnknownSkill,
                    format!("There is no skill called {}.", skill.trim()),
                    None,
                )
            })?;
        let entity = self.entities.get_mut(entity_id).ok_or_else(|| {
            EngineError::new(
                ErrorCode::TargetNotFound,
                "No such thing to set a requirement on.",
                None,
            )
        })?;
        let location_id = entity.location_id.clone();
        let action = action.to_ascii_lowercase();
        let key = requirement_key(&action, passive);
        let first_install = !entity.requirements.contains_key(&key);
        let mut requirement = merge_authoring(
            entity.requirements.remove(&key),
            &skill_display,
            level,
            oneshot,
            desc,
        );
        // The passive gate rides the view lock; the prior lock string is
        // backed up on the record. Removal never restores it.
        let lock_installed = passive && first_install;
        if lock_installed {
            requirement.lock = entity
                .locks
                .insert("view".to_string(), "passive_check".to_string());
        }
        entity.requirements.insert(key.clone(), requirement);

        if lock_installed {
            self.push_event(
                EventType::LockInstalled,
                location_id.clone(),
                Vec::new(),
                vec![entity_ref(entity_id)],
                Vec::new(),
                None,
                Some(json!({ "access": "view", "key": key })),
            );
        }
        self.push_event(
            EventType::RequirementAuthored,
            location_id,
            Vec::new(),
            vec![entity_ref(entity_id)],
            Vec::new(),
            None,
            Some(json!({
                "key": key,
                "skill": skill_display,
                "level": level,
                "oneshot": oneshot,
            })),
        );
        Ok(())
    }

    fn remove_requirement(
        &mut self,
        entity_id: &str,
        action: &str,
        passive: bool,
    ) -> Result<(), EngineError> {
        let entity = self.entities.get_mut(entity_id).ok_or_else(|| {
            EngineError::new(
                ErrorCode::TargetNotFound,
                "No such thing to clear a requirement on.",
                None,
            )
        })?;
        let location_id = entity.location_id.clone();
        let key = requirement_key(&action.to_ascii_lowercase(), passive);
        if entity.requirements.remove(&key).is_none() {
            return Err(EngineError::new(
                ErrorCode::MalformedRequest,
                format!("There is no {key} requirement there."),
                None,
            ));
        }
        self.push_event(
            EventType::RequirementRemoved,
            location_id,
            Vec::new(),
            vec![entity_ref(entity_id)],
            Vec::new(),
            None,
            Some(json!({ "key": key })),
        );
        Ok(())
    }

    /// The plain, no-roll action path. A gated action refuses with the
    /// requirement's wording and points at the check flow instead.
    fn action_attempt(
        &mut self,
        actor_id: &str,
        action: &str,
        target_id: &str,
    ) -> Result<(), EngineError> {
        if !self.actors.contains_key(actor_id) {
            return Err(EngineError::new(
                ErrorCode::ActorNotFound,
                "No such actor.",
                None,
            ));
        }
        let entity = self.entities.get(target_id).ok_or_else(|| {
            EngineError::new(ErrorCode::TargetNotFound, "You can't find that.", None)
        })?;
        let action = action.to_ascii_lowercase();
        let gated = entity
            .requirements
            .contains_key(&requirement_key(&action, false));
        self.attempt_action(actor_id, &action, target_id, !gated, None)
    }
}
