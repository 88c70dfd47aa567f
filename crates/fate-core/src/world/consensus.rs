use contracts::{DeferredAction, EngineError, ErrorCode, EventType, InvokeEffect};
use serde_json::json;

use crate::group::Poll;

use super::check::RollModifier;
use super::events::actor_ref;
use super::GameWorld;

impl GameWorld {
    fn actor_name(&self, actor_id: &str) -> String {
        self.actors
            .get(actor_id)
            .map(|actor| actor.name.clone())
            .unwrap_or_else(|| actor_id.to_string())
    }

    fn require_pending_roll(&self, actor_id: &str) -> Result<(), EngineError> {
        let has_roll = self
            .actors
            .get(actor_id)
            .map(|actor| actor.pending_roll.is_some())
            .unwrap_or(false);
        if has_roll {
            Ok(())
        } else {
            Err(EngineError::new(
                ErrorCode::NoActiveRoll,
                "You don't have a recent check to modify.",
                None,
            ))
        }
    }

    /// Sends `text` to every member of the group, minus `exclude`.
    fn msg_group(&mut self, group_id: u64, exclude: Option<&str>, text: impl Into<String>) {
        let members: Vec<String> = self
            .groups
            .group(group_id)
            .map(|group| group.members.clone())
            .unwrap_or_default();
        let text = text.into();
        for member in members {
            if exclude == Some(member.as_str()) {
                continue;
            }
            self.msg_actor(&member, text.clone());
        }
    }

    /// Proposes spending an aspect. The matching is validated up front;
    /// the effect itself is deferred behind a group vote.
    pub fn invoke_aspect(
        &mut self,
        actor_id: &str,
        aspect_query: &str,
        effect: &InvokeEffect,
    ) -> Result<(), EngineError> {
        let actor = self.actors.get(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        let ledger = actor.aspects.as_ref().ok_or_else(|| {
            EngineError::new(ErrorCode::NoAspectsCapability, "You can't do that.", None)
        })?;

        let matches = ledger.find(aspect_query);
        let aspect = match matches.as_slice() {
            [] => {
                return Err(EngineError::new(
                    ErrorCode::NoMatchingAspect,
                    format!("You don't have an aspect matching '{aspect_query}'."),
                    None,
                ))
            }
            [(_, text)] => text.to_string(),
            many => {
                let listing = many
                    .iter()
                    .map(|(_, text)| *text)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(EngineError::new(
                    ErrorCode::AmbiguousAspect,
                    format!("Which aspect do you mean? {listing}"),
                    None,
                ));
            }
        };

        let (query, action) = match effect {
            InvokeEffect::Reroll => {
                self.require_pending_roll(actor_id)?;
                (
                    format!("invoke {aspect} for a reroll"),
                    DeferredAction::AspectReroll {
                        aspect: aspect.clone(),
                    },
                )
            }
            InvokeEffect::Bonus => {
                self.require_pending_roll(actor_id)?;
                (
                    format!("invoke {aspect} for a +2 bonus"),
                    DeferredAction::AspectBonus {
                        aspect: aspect.clone(),
                        amount: 2,
                    },
                )
            }
            InvokeEffect::Assist { target } => {
                // Validated like the real thing, then refused: applying
                // the bonus to another actor's roll is still unwired.
                let target = self.actors.get(target.as_str()).ok_or_else(|| {
                    EngineError::new(ErrorCode::TargetNotFound, "They aren't here.", None)
                })?;
                if target.skills.is_none() {
                    return Err(EngineError::new(
                        ErrorCode::NoSkillsCapability,
                        "They can't be assisted.",
                        None,
                    ));
                }
                return Err(EngineError::new(
                    ErrorCode::UnsupportedEffect,
                    "Assisting isn't supported yet.",
                    None,
                ));
            }
        };

        let group_id = self.groups.group_of(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::NotAGroupMember, "You aren't in a group.", None)
        })?;
        self.start_poll(group_id, actor_id, query, action)
    }

    /// Opens a poll over the group's currently connected members. The
    /// initiator's approval is recorded immediately and silently, so a
    /// one-member group resolves in the same tick.
    pub fn start_poll(
        &mut self,
        group_id: u64,
        initiator_id: &str,
        query: String,
        action: DeferredAction,
    ) -> Result<(), EngineError> {
        let group = self.groups.group(group_id).ok_or_else(|| {
            EngineError::new(ErrorCode::NotAGroupMember, "You aren't in a group.", None)
        })?;
        if group.poll.is_some() {
            return Err(EngineError::new(
                ErrorCode::PollAlreadyOpen,
                "There's already a vote underway.",
                None,
            ));
        }
        let eligible: Vec<String> = group
            .members
            .iter()
            .filter(|member| {
                self.actors
                    .get(member.as_str())
                    .map(|actor| actor.connected)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        let poll = Poll::new(initiator_id, query.clone(), action, eligible.clone());
        if let Some(group) = self.groups.group_mut(group_id) {
            group.poll = Some(poll);
        }

        let initiator_name = self.actor_name(initiator_id);
        let location_id = self
            .actors
            .get(initiator_id)
            .map(|actor| actor.location_id.clone())
            .unwrap_or_default();
        self.push_event(
            EventType::PollOpened,
            location_id,
            vec![actor_ref(initiator_id)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({
                "group_id": group_id,
                "query": query,
                "eligible": eligible,
            })),
        );
        self.msg_actor(initiator_id, format!("You attempt to {query}."));
        self.msg_group(
            group_id,
            Some(initiator_id),
            format!("{initiator_name} wants to {query}.\nDo you approve?"),
        );

        // Initiator auto-yes: recorded quietly, no vote or progress
        // message of its own.
        if let Some(group) = self.groups.group_mut(group_id) {
            if let Some(poll) = group.poll.as_mut() {
                poll.record(initiator_id, true);
            }
        }
        self.evaluate_tally(group_id, true);
        Ok(())
    }

    /// Records one member's vote on the open poll.
    pub fn record_vote(&mut self, actor_id: &str, approve: bool) -> Result<(), EngineError> {
        let group_id = self.groups.group_of(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::NotAGroupMember, "You aren't in a group.", None)
        })?;
        let group = self.groups.group(group_id).ok_or_else(|| {
            EngineError::new(ErrorCode::NotAGroupMember, "You aren't in a group.", None)
        })?;
        let poll = group.poll.as_ref().ok_or_else(|| {
            EngineError::new(ErrorCode::NoOpenPoll, "There's no vote underway.", None)
        })?;
        if !poll.is_eligible(actor_id) {
            return Err(EngineError::new(
                ErrorCode::NotEligible,
                "You aren't part of this vote.",
                None,
            ));
        }
        // A set entry may be overwritten: ballots are changeable until
        // the tally completes.
        if let Some(group) = self.groups.group_mut(group_id) {
            if let Some(poll) = group.poll.as_mut() {
                poll.record(actor_id, approve);
            }
        }

        let location_id = self
            .actors
            .get(actor_id)
            .map(|actor| actor.location_id.clone())
            .unwrap_or_default();
        self.push_event(
            EventType::VoteRecorded,
            location_id,
            vec![actor_ref(actor_id)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({ "group_id": group_id, "approve": approve })),
        );
        self.msg_actor(
            actor_id,
            if approve { "You vote yes." } else { "You vote no." },
        );
        self.evaluate_tally(group_id, false);
        Ok(())
    }

    /// Re-checks the open poll after every recorded vote. Incomplete
    /// polls broadcast progress unless `quiet` (the initiator's
    /// auto-yes) or config suppresses it; complete polls resolve by
    /// sign of the summed votes, with a coin flip breaking a tie.
    fn evaluate_tally(&mut self, group_id: u64, quiet: bool) {
        let Some(poll) = self
            .groups
            .group(group_id)
            .and_then(|group| group.poll.clone())
        else {
            return;
        };
        let initiator_name = self.actor_name(&poll.initiator);
        let location_id = self
            .actors
            .get(&poll.initiator)
            .map(|actor| actor.location_id.clone())
            .unwrap_or_default();

        if !poll.is_complete() {
            let tallied = poll.voter_count() - poll.votes_outstanding();
            self.push_event(
                EventType::PollProgress,
                location_id,
                vec![actor_ref(&poll.initiator)],
                Vec::new(),
                Vec::new(),
                None,
                Some(json!({
                    "group_id": group_id,
                    "tallied": tallied,
                    "total": poll.voter_count(),
                })),
            );
            if !quiet && !self.config.quiet_polls {
                self.msg_group(
                    group_id,
                    None,
                    format!("{}/{} votes tallied.", tallied, poll.voter_count()),
                );
            }
            return;
        }

        let sum = poll.sum();
        let approved = if sum == 0 {
            let heads = self.dice.coin_flip();
            self.push_event(
                EventType::CoinFlipped,
                location_id.clone(),
                vec![actor_ref(&poll.initiator)],
                Vec::new(),
                Vec::new(),
                None,
                Some(json!({ "group_id": group_id, "heads": heads })),
            );
            self.msg_group(
                group_id,
                None,
                format!(
                    "The vote for {initiator_name} to {} is tied. Heads for Yes, Tails for No.\nThe coin flip says: {}.",
                    poll.query,
                    if heads { "Heads" } else { "Tails" }
                ),
            );
            heads
        } else {
            sum > 0
        };

        if let Some(group) = self.groups.group_mut(group_id) {
            group.poll = None;
        }
        self.push_event(
            EventType::PollResolved,
            location_id,
            vec![actor_ref(&poll.initiator)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({
                "group_id": group_id,
                "query": poll.query,
                "sum": sum,
                "approved": approved,
            })),
        );
        self.msg_group(
            group_id,
            None,
            format!(
                "Vote tallied: {initiator_name} {} {}.",
                if approved { "can" } else { "cannot" },
                poll.query
            ),
        );
        if approved {
            self.execute_deferred(&poll.initiator, &poll.action);
        }
    }

    /// Applies an approved deferred effect. The initiator's check may
    /// have been committed or abandoned while the vote ran; that case
    /// degrades to a notice instead of an error.
    fn execute_deferred(&mut self, initiator_id: &str, action: &DeferredAction) {
        let (aspect, message, modifier) = match action {
            DeferredAction::AspectReroll { aspect } => (
                aspect.clone(),
                format!("You invoke {aspect} for a reroll."),
                RollModifier::Reroll,
            ),
            DeferredAction::AspectBonus { aspect, amount } => (
                aspect.clone(),
                format!("You invoke {aspect} for a +{amount} bonus."),
                RollModifier::Bonus(*amount),
            ),
        };
        let location_id = self
            .actors
            .get(initiator_id)
            .map(|actor| actor.location_id.clone())
            .unwrap_or_default();
        self.push_event(
            EventType::AspectInvoked,
            location_id,
            vec![actor_ref(initiator_id)],
            Vec::new(),
            Vec::new(),
            None,
            Some(json!({ "aspect": aspect, "action": action })),
        );
        self.msg_actor(initiator_id, message);
        if self.apply_modifier(initiator_id, modifier).is_err() {
            self.msg_actor(initiator_id, "You don't have a recent check to reroll.");
        }
    }
}
