use contracts::{ActorRef, Event, EventType, SCHEMA_VERSION_V1};
use serde_json::{json, Value};

use super::GameWorld;

fn synthetic_timestamp(tick: u64, seq: u64) -> String {
    format!(
        "1970-01-01T{:02}:{:02}:{:02}Z",
        (tick / 3600) % 24,
        (tick / 60) % 60,
        (tick + seq) % 60
    )
}

pub(super) fn actor_ref(actor_id: &str) -> ActorRef {
    ActorRef {
        actor_id: actor_id.to_string(),
        actor_kind: "actor".to_string(),
    }
}

pub(super) fn entity_ref(entity_id: &str) -> ActorRef {
    ActorRef {
        actor_id: entity_id.to_string(),
        actor_kind: "entity".to_string(),
    }
}

impl GameWorld {
    pub(super) fn push_event(
        &mut self,
        event_type: EventType,
        location_id: String,
        actors: Vec<ActorRef>,
        targets: Vec<ActorRef>,
        caused_by: Vec<String>,
        visibility: Option<String>,
        details: Option<Value>,
    ) -> String {
        let tick = self.status.current_tick;
        let sequence_in_tick = self.sequence_in_tick;
        self.sequence_in_tick = self.sequence_in_tick.saturating_add(1);
        let event_id = format!("evt:{tick}:{sequence_in_tick}");
        self.event_log.push(Event {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            world_id: self.status.world_id.clone(),
            tick,
            created_at: synthetic_timestamp(tick, sequence_in_tick),
            event_id: event_id.clone(),
            sequence_in_tick,
            event_type,
            location_id,
            actors,
            targets,
            caused_by,
            visibility,
            details,
        });
        event_id
    }

    /// Plain text aimed at one actor; the messaging sink of the embedding
    /// server renders it on that actor's session.
    pub(super) fn msg_actor(&mut self, actor_id: &str, text: impl Into<String>) {
        let location_id = self
            .actors
            .get(actor_id)
            .map(|actor| actor.location_id.clone())
            .unwrap_or_default();
        let visibility = Some(format!("actor:{actor_id}"));
        self.push_event(
            EventType::ActorMessage,
            location_id,
            vec![actor_ref(actor_id)],
            Vec::new(),
            Vec::new(),
            visibility,
            Some(json!({ "text": text.into() })),
        );
    }

    /// Location-directed broadcast, optionally excluding one actor (the
    /// usual emote pattern: everyone but the subject).
    pub(super) fn msg_room(
        &mut self,
        location_id: &str,
        exclude: Option<&str>,
        text: impl Into<String>,
    ) {
        let details = match exclude {
            Some(excluded) => json!({ "text": text.into(), "exclude": excluded }),
            None => json!({ "text": text.into() }),
        };
        self.push_event(
            EventType::RoomMessage,
            location_id.to_string(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Some(format!("location:{location_id}")),
            Some(details),
        );
    }
}
