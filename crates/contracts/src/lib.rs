//! v1 cross-boundary contracts between the resolution kernel, the embedding
//! server glue, and tooling.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod serde_u64_string;

pub const SCHEMA_VERSION_V1: &str = "1.0";

/// The four Fate action verbs a skill may support.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Overcome,
    CreateAdvantage,
    Attack,
    Defend,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overcome => "overcome",
            Self::CreateAdvantage => "create_advantage",
            Self::Attack => "attack",
            Self::Defend => "defend",
        }
    }
}

/// Margin-based outcome tier. The boundary table is the central
/// game-design contract of the pipeline and must not drift.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    SuccessWithStyle,
    Success,
    SuccessAtCost,
    Failure,
}

impl OutcomeTier {
    pub fn for_margin(margin: i64) -> Self {
        if margin >= 3 {
            Self::SuccessWithStyle
        } else if margin >= 1 {
            Self::Success
        } else if margin == 0 {
            Self::SuccessAtCost
        } else {
            Self::Failure
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuccessWithStyle => "success_with_style",
            Self::Success => "success",
            Self::SuccessAtCost => "success_at_cost",
            Self::Failure => "failure",
        }
    }

    /// Bonus flag handed to the deferred target action. Failure runs no
    /// action and carries no flag.
    pub fn bonus_flag(self) -> Option<BonusFlag> {
        match self {
            Self::SuccessWithStyle => Some(BonusFlag::Positive),
            Self::Success => Some(BonusFlag::Neutral),
            Self::SuccessAtCost => Some(BonusFlag::Cost),
            Self::Failure => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BonusFlag {
    Positive,
    Neutral,
    Cost,
}

/// Declarative skill-check requirement stored per (entity, action, passive).
///
/// Wire shape matches the attribute-store record:
/// `{"skills": {name: level, ...}, "desc": str?, "oneshot": bool, "lock": str?}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Requirement {
    #[serde(default)]
    pub skills: BTreeMap<String, i64>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub oneshot: bool,
    /// Backup of the lock string a passive requirement was layered over.
    /// Written at authoring time; no restore path is wired yet.
    #[serde(default)]
    pub lock: Option<String>,
}

/// Attribute-store key for a requirement record.
pub fn requirement_key(action: &str, passive: bool) -> String {
    if passive {
        format!("{action}_passive_check")
    } else {
        format!("{action}_check")
    }
}

/// Effect requested when invoking an aspect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvokeEffect {
    Reroll,
    Bonus,
    Assist { target: String },
}

/// Tagged payload a poll votes on. A command object rather than a bound
/// callable, so it can be logged, replayed, or rejected safely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeferredAction {
    AspectReroll { aspect: String },
    AspectBonus { aspect: String, amount: i64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    DiceRoll,
    CheckInitiate,
    CheckCommit,
    CheckElaborate,
    AspectSet,
    AspectInvoke,
    Vote,
    GroupAdd,
    GroupRemove,
    GroupSplit,
    SessionConnect,
    SessionDisconnect,
    RequirementAuthor,
    RequirementRemove,
    ActionAttempt,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandPayload {
    DiceRoll {
        actor_id: String,
    },
    /// `input` is the raw `<action> <target-phrase>` text, possibly led by
    /// one of the prepositions `on`, `at`, `to`.
    CheckInitiate {
        actor_id: String,
        skill: String,
        input: String,
    },
    CheckCommit {
        actor_id: String,
    },
    CheckElaborate {
        actor_id: String,
        text: String,
    },
    AspectSet {
        actor_id: String,
        slot: String,
        text: String,
    },
    AspectInvoke {
        actor_id: String,
        aspect: String,
        effect: InvokeEffect,
    },
    Vote {
        actor_id: String,
        approve: bool,
    },
    GroupAdd {
        leader_id: String,
        member_id: String,
    },
    GroupRemove {
        actor_id: String,
    },
    GroupSplit {
        actor_id: String,
        member_ids: Vec<String>,
    },
    SessionConnect {
        actor_id: String,
    },
    SessionDisconnect {
        actor_id: String,
    },
    RequirementAuthor {
        entity_id: String,
        action: String,
        passive: bool,
        skill: String,
        level: i64,
        oneshot: bool,
        desc: Option<String>,
    },
    RequirementRemove {
        entity_id: String,
        action: String,
        passive: bool,
    },
    ActionAttempt {
        actor_id: String,
        action: String,
        target_id: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Command {
    pub schema_version: String,
    pub command_id: String,
    pub world_id: String,
    pub issued_at_tick: u64,
    pub command_type: CommandType,
    pub payload: CommandPayload,
}

impl Command {
    pub fn new(
        command_id: impl Into<String>,
        world_id: impl Into<String>,
        issued_at_tick: u64,
        command_type: CommandType,
        payload: CommandPayload,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            command_id: command_id.into(),
            world_id: world_id.into(),
            issued_at_tick,
            command_type,
            payload,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AlreadyRolling,
    NoSkillsCapability,
    NoAspectsCapability,
    MalformedRequest,
    TargetNotFound,
    ActorNotFound,
    NoActiveRoll,
    NoActiveCheck,
    NoPendingElaboration,
    PollAlreadyOpen,
    NotAGroupMember,
    NotEligible,
    NoOpenPoll,
    NoMatchingAspect,
    AmbiguousAspect,
    UnsupportedEffect,
    UnknownSkill,
    InvalidCommand,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl EngineError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.error_code, self.message)
    }
}

impl std::error::Error for EngineError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandResult {
    pub schema_version: String,
    pub command_id: String,
    pub world_id: String,
    pub accepted: bool,
    pub error: Option<EngineError>,
}

impl CommandResult {
    pub fn accepted(command: &Command) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            command_id: command.command_id.clone(),
            world_id: command.world_id.clone(),
            accepted: true,
            error: None,
        }
    }

    pub fn rejected(command: &Command, error: EngineError) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            command_id: command.command_id.clone(),
            world_id: command.world_id.clone(),
            accepted: false,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActorRef {
    pub actor_id: String,
    pub actor_kind: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    DiceRolled,
    CheckInitiated,
    CheckRejected,
    NoCheckNeeded,
    RollModified,
    CheckCommitted,
    CheckResolved,
    ActionPerformed,
    ActionRefused,
    RequirementAuthored,
    RequirementRemoved,
    RequirementConsumed,
    LockInstalled,
    AspectSet,
    AspectInvoked,
    PollOpened,
    VoteRecorded,
    PollProgress,
    PollResolved,
    CoinFlipped,
    GroupCreated,
    GroupRecycled,
    GroupMemberAdded,
    GroupMemberRemoved,
    GroupSplit,
    SessionConnected,
    SessionDisconnected,
    ActorMessage,
    RoomMessage,
    CommandApplied,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub schema_version: String,
    pub world_id: String,
    pub tick: u64,
    pub created_at: String,
    pub event_id: String,
    pub sequence_in_tick: u64,
    pub event_type: EventType,
    pub location_id: String,
    pub actors: Vec<ActorRef>,
    #[serde(default)]
    pub targets: Vec<ActorRef>,
    pub caused_by: Vec<String>,
    pub visibility: Option<String>,
    pub details: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    pub schema_version: String,
    pub world_id: String,
    #[serde(with = "serde_u64_string")]
    pub seed: u64,
    /// Starting refresh for actors with aspect capability. Tracked as
    /// invocation currency; spending it is not part of this design yet.
    pub refresh_default: i64,
    pub free_aspect_slots: u8,
    /// Suppress running tally broadcasts while a poll is open.
    pub quiet_polls: bool,
    pub notes: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            world_id: "world_local_001".to_string(),
            seed: 1337,
            refresh_default: 3,
            free_aspect_slots: 3,
            quiet_polls: false,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineStatus {
    pub schema_version: String,
    pub world_id: String,
    pub current_tick: u64,
    pub queue_depth: usize,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "world_id={} tick={} queue_depth={}",
            self.world_id, self.current_tick, self.queue_depth
        )
    }
}
