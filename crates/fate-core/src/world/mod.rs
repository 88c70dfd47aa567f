use std::collections::{BTreeMap, BTreeSet};

mod actions;
mod check;
mod commands;
mod consensus;
mod events;
mod inspect;

use contracts::{
    Command, CommandResult, EngineConfig, EngineStatus, Event, OutcomeTier, Requirement, Verb,
    SCHEMA_VERSION_V1,
};

use crate::aspects::AspectLedger;
use crate::dice::FateDice;
use crate::group::GroupManager;
use crate::ladder::LadderTable;
use crate::skills::SkillSet;

pub use check::RollModifier;

#[derive(Debug, Clone)]
struct QueuedCommand {
    effective_tick: u64,
    insertion_sequence: u64,
    command: Command,
}

/// Transient roll state, at most one per actor, alive between a roll and
/// its commit. Modifiers rewrite `result` in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRoll {
    pub skill: String,
    pub result: i64,
    pub verb: Option<Verb>,
}

/// Companion to [`PendingRoll`] when the roll targets an entity's
/// requirement. The target reference is a lookup key, not ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCheck {
    pub action: String,
    pub skill: String,
    pub required_level: i64,
    pub target_id: String,
}

/// Second half of the two-phase commit: the tier is already fixed, only
/// the narrative elaboration is outstanding. Resuming replays exactly this
/// branch and never re-derives the tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingElaboration {
    pub tier: OutcomeTier,
    pub action: String,
    pub target_id: String,
}

/// A connected-or-not player character. Skill and aspect capabilities are
/// explicit optionals; an actor may carry zero, one, or both.
#[derive(Debug, Clone)]
pub struct Actor {
    pub actor_id: String,
    pub name: String,
    pub location_id: String,
    pub connected: bool,
    pub skills: Option<SkillSet>,
    pub aspects: Option<AspectLedger>,
    pub pending_roll: Option<PendingRoll>,
    pub pending_check: Option<PendingCheck>,
    pub pending_elaboration: Option<PendingElaboration>,
}

/// A world object that actions act on. Requirements are keyed by the
/// attribute-store convention (`open_check`, `view_passive_check`, ...).
#[derive(Debug, Clone)]
pub struct Entity {
    pub entity_id: String,
    pub name: String,
    pub location_id: String,
    pub requirements: BTreeMap<String, Requirement>,
    pub tags: BTreeSet<String>,
    /// Lock strings installed per action key, for the embedding lock layer.
    pub locks: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct GameWorld {
    config: EngineConfig,
    status: EngineStatus,
    queued_commands: Vec<QueuedCommand>,
    next_command_sequence: u64,
    sequence_in_tick: u64,
    event_log: Vec<Event>,
    ladder: LadderTable,
    dice: FateDice,
    actors: BTreeMap<String, Actor>,
    entities: BTreeMap<String, Entity>,
    groups: GroupManager,
}

impl GameWorld {
    pub fn new(config: EngineConfig) -> Self {
        let status = EngineStatus {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            world_id: config.world_id.clone(),
            current_tick: 0,
            queue_depth: 0,
        };
        let dice = FateDice::seeded(config.seed);
        Self {
            config,
            status,
            queued_commands: Vec::new(),
            next_command_sequence: 0,
            sequence_in_tick: 0,
            event_log: Vec::new(),
            ladder: LadderTable::standard(),
            dice,
            actors: BTreeMap::new(),
            entities: BTreeMap::new(),
            groups: GroupManager::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn status(&self) -> &EngineStatus {
        &self.status
    }

    pub fn world_id(&self) -> &str {
        &self.status.world_id
    }

    pub fn events(&self) -> &[Event] {
        &self.event_log
    }

    pub fn ladder(&self) -> &LadderTable {
        &self.ladder
    }

    pub fn actor(&self, actor_id: &str) -> Option<&Actor> {
        self.actors.get(actor_id)
    }

    pub fn entity(&self, entity_id: &str) -> Option<&Entity> {
        self.entities.get(entity_id)
    }

    pub fn groups(&self) -> &GroupManager {
        &self.groups
    }

    /// World-building hook for the embedding server. Skill and aspect
    /// capabilities follow the standard loadouts when requested.
    pub fn spawn_actor(
        &mut self,
        actor_id: impl Into<String>,
        name: impl Into<String>,
        location_id: impl Into<String>,
        with_skills: bool,
        with_aspects: bool,
    ) {
        let actor_id = actor_id.into();
        let actor = Actor {
            actor_id: actor_id.clone(),
            name: name.into(),
            location_id: location_id.into(),
            connected: false,
            skills: with_skills.then(SkillSet::standard),
            aspects: with_aspects.then(|| AspectLedger::new(self.config.refresh_default)),
            pending_roll: None,
            pending_check: None,
            pending_elaboration: None,
        };
        self.actors.insert(actor_id, actor);
    }

    pub fn spawn_entity(
        &mut self,
        entity_id: impl Into<String>,
        name: impl Into<String>,
        location_id: impl Into<String>,
    ) {
        let entity_id = entity_id.into();
        let entity = Entity {
            entity_id: entity_id.clone(),
            name: name.into(),
            location_id: location_id.into(),
            requirements: BTreeMap::new(),
            tags: BTreeSet::new(),
            locks: BTreeMap::new(),
        };
        self.entities.insert(entity_id, entity);
    }

    /// Advancement hook; returns false for unknown actors, missing skill
    /// capability, or catalog misses.
    pub fn set_skill_value(&mut self, actor_id: &str, skill: &str, value: i64) -> bool {
        self.actors
            .get_mut(actor_id)
            .and_then(|actor| actor.skills.as_mut())
            .map(|skills| skills.set_value(skill, value))
            .unwrap_or(false)
    }

    pub fn add_entity_tag(&mut self, entity_id: &str, tag: &str) -> bool {
        match self.entities.get_mut(entity_id) {
            Some(entity) => {
                entity.tags.insert(tag.to_string());
                true
            }
            None => false,
        }
    }

    pub fn enqueue_command(&mut self, command: Command, effective_tick: u64) {
        self.queued_commands.push(QueuedCommand {
            effective_tick,
            insertion_sequence: self.next_command_sequence,
            command,
        });
        self.next_command_sequence = self.next_command_sequence.saturating_add(1);
        self.sync_queue_depth();
    }

    /// Advances one tick and drains every due command in queue order.
    /// Dispatch is fully serialized; each command runs to completion
    /// before the next is applied.
    pub fn step(&mut self) -> Vec<CommandResult> {
        self.status.current_tick = self.status.current_tick.saturating_add(1);
        self.sequence_in_tick = 0;
        self.process_due_commands()
    }

    pub fn step_n(&mut self, n: u64) -> Vec<CommandResult> {
        let mut results = Vec::new();
        for _ in 0..n {
            results.extend(self.step());
        }
        results
    }

    fn sync_queue_depth(&mut self) {
        self.status.queue_depth = self.queued_commands.len();
    }
}

#[cfg(test)]
mod tests;
