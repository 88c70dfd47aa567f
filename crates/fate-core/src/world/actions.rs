use contracts::{requirement_key, BonusFlag, EngineError, ErrorCode, EventType};
use serde_json::json;

use crate::requirement::gate_text;

use super::events::{actor_ref, entity_ref};
use super::GameWorld;

impl GameWorld {
    /// Runs an action against a target entity after its gate has been
    /// decided. `passed` false means the gate refused: the actor gets the
    /// requirement's own wording when one exists. `bonus` carries the
    /// outcome quality when the action came out of a resolved check.
    pub fn attempt_action(
        &mut self,
        actor_id: &str,
        action: &str,
        target_id: &str,
        passed: bool,
        bonus: Option<BonusFlag>,
    ) -> Result<(), EngineError> {
        let actor = self.actors.get(actor_id).ok_or_else(|| {
            EngineError::new(ErrorCode::ActorNotFound, "No such actor.", None)
        })?;
        let actor_name = actor.name.clone();
        let location_id = actor.location_id.clone();
        let entity = self.entities.get(target_id).ok_or_else(|| {
            EngineError::new(ErrorCode::TargetNotFound, "That is no longer here.", None)
        })?;
        let target_name = entity.name.clone();
        let is_open = entity.tags.contains("open");

        if !passed {
            let key = requirement_key(action, false);
            let refusal = entity
                .requirements
                .get(&key)
                .map(|requirement| gate_text(&self.ladder, action, requirement))
                .unwrap_or_else(|| format!("You can't {action} the {target_name}."));
            self.push_event(
                EventType::ActionRefused,
                location_id,
                vec![actor_ref(actor_id)],
                vec![entity_ref(target_id)],
                Vec::new(),
                None,
                Some(json!({ "action": action })),
            );
            self.msg_actor(actor_id, refusal);
            return Ok(());
        }

        match action {
            "open" => {
                if is_open {
                    self.msg_actor(actor_id, "That is already open.");
                } else {
                    if let Some(entity) = self.entities.get_mut(target_id) {
                        entity.tags.insert("open".to_string());
                    }
                    self.msg_actor(actor_id, format!("You open the {target_name}."));
                    self.msg_room(
                        &location_id,
                        Some(actor_id),
                        format!("{actor_name} opens the {target_name}."),
                    );
                }
            }
            "close" => {
                if !is_open {
                    self.msg_actor(actor_id, "That is already closed.");
                } else {
                    if let Some(entity) = self.entities.get_mut(target_id) {
                        entity.tags.remove("open");
                    }
                    self.msg_actor(actor_id, format!("You close the {target_name}."));
                    self.msg_room(
                        &location_id,
                        Some(actor_id),
                        format!("{actor_name} closes the {target_name}."),
                    );
                }
            }
            "get" => {
                if let Some(entity) = self.entities.get_mut(target_id) {
                    entity.location_id = format!("inv:{actor_id}");
                }
                self.msg_actor(actor_id, format!("You take the {target_name}."));
                self.msg_room(
                    &location_id,
                    Some(actor_id),
                    format!("{actor_name} picks up the {target_name}."),
                );
            }
            "drop" => {
                if let Some(entity) = self.entities.get_mut(target_id) {
                    entity.location_id = location_id.clone();
                }
                self.msg_actor(actor_id, format!("You drop the {target_name}."));
                self.msg_room(
                    &location_id,
                    Some(actor_id),
                    format!("{actor_name} drops the {target_name}."),
                );
            }
            other => {
                self.msg_actor(actor_id, format!("You {other} the {target_name}."));
                self.msg_room(
                    &location_id,
                    Some(actor_id),
                    format!("{actor_name} {other}s the {target_name}."),
                );
            }
        }

        self.push_event(
            EventType::ActionPerformed,
            location_id,
            vec![actor_ref(actor_id)],
            vec![entity_ref(target_id)],
            Vec::new(),
            None,
            Some(json!({ "action": action, "passed": passed, "bonus": bonus })),
        );
        Ok(())
    }
}
