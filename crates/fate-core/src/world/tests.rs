use contracts::{
    Command, CommandPayload, CommandResult, CommandType, EngineConfig, ErrorCode, EventType,
    InvokeEffect, OutcomeTier,
};

use super::GameWorld;

fn world_with_seed(seed: u64) -> GameWorld {
    let config = EngineConfig {
        seed,
        ..EngineConfig::default()
    };
    GameWorld::new(config)
}

/// Enqueues one command for the next tick and steps once.
fn issue(
    world: &mut GameWorld,
    command_type: CommandType,
    payload: CommandPayload,
) -> CommandResult {
    let tick = world.status().current_tick + 1;
    let command_id = format!("cmd-{}-{}", tick, world.events().len());
    let command = Command::new(
        command_id,
        world.world_id().to_string(),
        tick,
        command_type,
        payload,
    );
    world.enqueue_command(command, tick);
    let mut results = world.step();
    assert_eq!(results.len(), 1, "exactly one command should be due");
    results.remove(0)
}

fn messages_for(world: &GameWorld, actor_id: &str) -> Vec<String> {
    let visibility = format!("actor:{actor_id}");
    world
        .events()
        .iter()
        .filter(|event| {
            event.event_type == EventType::ActorMessage
                && event.visibility.as_deref() == Some(visibility.as_str())
        })
        .filter_map(|event| {
            event
                .details
                .as_ref()
                .and_then(|details| details.get("text"))
                .and_then(|text| text.as_str())
                .map(String::from)
        })
        .collect()
}

fn count_events(world: &GameWorld, event_type: EventType) -> usize {
    world
        .events()
        .iter()
        .filter(|event| event.event_type == event_type)
        .count()
}

fn author_open_requirement(world: &mut GameWorld, entity_id: &str, skill: &str, level: i64) {
    let result = issue(
        world,
        CommandType::RequirementAuthor,
        CommandPayload::RequirementAuthor {
            entity_id: entity_id.to_string(),
            action: "open".to_string(),
            passive: false,
            skill: skill.to_string(),
            level,
            oneshot: false,
            desc: None,
        },
    );
    assert!(result.accepted);
}

fn connect(world: &mut GameWorld, actor_id: &str) {
    let result = issue(
        world,
        CommandType::SessionConnect,
        CommandPayload::SessionConnect {
            actor_id: actor_id.to_string(),
        },
    );
    assert!(result.accepted);
}

fn initiate(world: &mut GameWorld, actor_id: &str, skill: &str, input: &str) -> CommandResult {
    issue(
        world,
        CommandType::CheckInitiate,
        CommandPayload::CheckInitiate {
            actor_id: actor_id.to_string(),
            skill: skill.to_string(),
            input: input.to_string(),
        },
    )
}

fn commit(world: &mut GameWorld, actor_id: &str) -> CommandResult {
    issue(
        world,
        CommandType::CheckCommit,
        CommandPayload::CheckCommit {
            actor_id: actor_id.to_string(),
        },
    )
}

fn elaborate(world: &mut GameWorld, actor_id: &str, text: &str) -> CommandResult {
    issue(
        world,
        CommandType::CheckElaborate,
        CommandPayload::CheckElaborate {
            actor_id: actor_id.to_string(),
            text: text.to_string(),
        },
    )
}

#[test]
fn wrong_skill_is_a_game_outcome_not_an_error() {
    let mut world = world_with_seed(11);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    world.spawn_entity("box-1", "strongbox", "vault");
    author_open_requirement(&mut world, "box-1", "Burglary", 2);

    let result = initiate(&mut world, "ann", "Notice", "open strongbox");
    assert!(result.accepted);
    assert_eq!(count_events(&world, EventType::CheckRejected), 1);
    assert!(world.actor("ann").expect("ann").pending_roll.is_none());
    assert!(messages_for(&world, "ann")
        .iter()
        .any(|text| text == "You can't use Notice to open the strongbox."));
}

#[test]
fn ungated_target_needs_no_check() {
    let mut world = world_with_seed(12);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    world.spawn_entity("box-1", "strongbox", "vault");

    let result = initiate(&mut world, "ann", "Burglary", "open strongbox");
    assert!(result.accepted);
    assert_eq!(count_events(&world, EventType::NoCheckNeeded), 1);
    assert!(world.actor("ann").expect("ann").pending_roll.is_none());
}

#[test]
fn initiate_parks_pending_state_and_rolls_once() {
    let mut world = world_with_seed(13);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    world.spawn_entity("box-1", "strongbox", "vault");
    author_open_requirement(&mut world, "box-1", "Burglary", 1);
    world.set_skill_value("ann", "Burglary", 3);

    let result = initiate(&mut world, "ann", "Burglary", "to open strongbox");
    assert!(result.accepted);
    let actor = world.actor("ann").expect("ann");
    let roll = actor.pending_roll.as_ref().expect("pending roll");
    // 4dF spans -4..=4, so the sum with a +3 skill is bounded.
    assert!((-1..=7).contains(&roll.result));
    let check = actor.pending_check.as_ref().expect("pending check");
    assert_eq!(check.action, "open");
    assert_eq!(check.required_level, 1);
    assert_eq!(check.target_id, "box-1");
    // A gated roll is an overcome roll, visible on the snapshot.
    let snapshot = world.inspect_actor("ann").expect("snapshot");
    assert_eq!(snapshot["pending_roll"]["verb"], "overcome");

    // No explicit cancel exists: re-initiating replaces the pending state.
    world.set_skill_value("ann", "Burglary", 6);
    let again = initiate(&mut world, "ann", "Burglary", "open strongbox");
    assert!(again.accepted);
    let replaced = world
        .actor("ann")
        .expect("ann")
        .pending_roll
        .as_ref()
        .expect("pending roll")
        .result;
    assert!((2..=10).contains(&replaced));

    // A bare flavor roll, by contrast, refuses to trample the check.
    let bare = issue(
        &mut world,
        CommandType::DiceRoll,
        CommandPayload::DiceRoll {
            actor_id: "ann".to_string(),
        },
    );
    assert!(!bare.accepted);
    assert_eq!(
        bare.error.expect("error").error_code,
        ErrorCode::AlreadyRolling
    );
}

#[test]
fn high_margin_commit_succeeds_with_style_and_replays_the_action() {
    let mut world = world_with_seed(14);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    world.spawn_entity("box-1", "strongbox", "vault");
    author_open_requirement(&mut world, "box-1", "Burglary", 1);
    // Margin is at least (10 - 4) - 1 = 5 regardless of the dice.
    world.set_skill_value("ann", "Burglary", 10);

    assert!(initiate(&mut world, "ann", "Burglary", "open strongbox").accepted);
    assert!(commit(&mut world, "ann").accepted);

    let actor = world.actor("ann").expect("ann");
    assert!(actor.pending_roll.is_none());
    assert!(actor.pending_check.is_none());
    let elaboration = actor.pending_elaboration.as_ref().expect("elaboration");
    assert_eq!(elaboration.tier, OutcomeTier::SuccessWithStyle);

    assert!(elaborate(&mut world, "ann", "Ann coaxes the lock open with a flourish.").accepted);
    let actor = world.actor("ann").expect("ann");
    assert!(actor.pending_elaboration.is_none());
    assert!(world.entity("box-1").expect("box").tags.contains("open"));
    assert_eq!(count_events(&world, EventType::ActionPerformed), 1);
    assert_eq!(count_events(&world, EventType::CheckResolved), 1);
}

#[test]
fn zero_margin_commit_is_success_at_cost() {
    let mut world = world_with_seed(15);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    world.spawn_entity("box-1", "strongbox", "vault");
    author_open_requirement(&mut world, "box-1", "Burglary", 3);
    world.set_skill_value("ann", "Burglary", 2);

    assert!(initiate(&mut world, "ann", "Burglary", "open strongbox").accepted);
    // Pin the roll so the margin is exactly zero.
    world
        .actors
        .get_mut("ann")
        .expect("ann")
        .pending_roll
        .as_mut()
        .expect("pending roll")
        .result = 3;

    assert!(commit(&mut world, "ann").accepted);
    let elaboration = world
        .actor("ann")
        .expect("ann")
        .pending_elaboration
        .as_ref()
        .cloned()
        .expect("elaboration");
    assert_eq!(elaboration.tier, OutcomeTier::SuccessAtCost);
}

#[test]
fn failed_commit_resolves_immediately_with_a_room_broadcast() {
    let mut world = world_with_seed(16);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    world.spawn_entity("box-1", "strongbox", "vault");
    author_open_requirement(&mut world, "box-1", "Burglary", 3);
    // Result tops out at -10 + 4, far below the requirement.
    world.set_skill_value("ann", "Burglary", -10);

    assert!(initiate(&mut world, "ann", "Burglary", "open strongbox").accepted);
    assert!(commit(&mut world, "ann").accepted);

    let actor = world.actor("ann").expect("ann");
    assert!(actor.pending_elaboration.is_none());
    assert_eq!(count_events(&world, EventType::CheckResolved), 1);
    assert!(!world.entity("box-1").expect("box").tags.contains("open"));
    let failed = world.events().iter().any(|event| {
        event.event_type == EventType::RoomMessage
            && event
                .details
                .as_ref()
                .and_then(|details| details.get("text"))
                .and_then(|text| text.as_str())
                == Some("Ann failed the check.")
    });
    assert!(failed);
}

#[test]
fn oneshot_requirement_is_consumed_after_a_successful_resolution() {
    let mut world = world_with_seed(17);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    world.spawn_entity("box-1", "strongbox", "vault");
    let result = issue(
        &mut world,
        CommandType::RequirementAuthor,
        CommandPayload::RequirementAuthor {
            entity_id: "box-1".to_string(),
            action: "open".to_string(),
            passive: false,
            skill: "Burglary".to_string(),
            level: 1,
            oneshot: true,
            desc: None,
        },
    );
    assert!(result.accepted);
    world.set_skill_value("ann", "Burglary", 10);

    assert!(initiate(&mut world, "ann", "Burglary", "open strongbox").accepted);
    assert!(commit(&mut world, "ann").accepted);
    assert!(elaborate(&mut world, "ann", "The hasp gives way.").accepted);

    assert_eq!(count_events(&world, EventType::RequirementConsumed), 1);
    assert!(world
        .entity("box-1")
        .expect("box")
        .requirements
        .is_empty());

    // The gate is gone: the next attempt needs no check at all.
    assert!(initiate(&mut world, "ann", "Burglary", "open strongbox").accepted);
    assert_eq!(count_events(&world, EventType::NoCheckNeeded), 1);
}

#[test]
fn connect_auto_groups_and_solo_invoke_resolves_in_one_tick() {
    let mut world = world_with_seed(18);
    world.spawn_actor("ann", "Ann", "vault", true, true);
    world.spawn_entity("box-1", "strongbox", "vault");
    author_open_requirement(&mut world, "box-1", "Burglary", 2);
    world.set_skill_value("ann", "Burglary", 1);
    connect(&mut world, "ann");
    assert!(world.groups().group_of("ann").is_some());

    let result = issue(
        &mut world,
        CommandType::AspectSet,
        CommandPayload::AspectSet {
            actor_id: "ann".to_string(),
            slot: "high_concept".to_string(),
            text: "Lucky Break".to_string(),
        },
    );
    assert!(result.accepted);

    assert!(initiate(&mut world, "ann", "Burglary", "open strongbox").accepted);
    let before = world
        .actor("ann")
        .expect("ann")
        .pending_roll
        .as_ref()
        .expect("roll")
        .result;

    let result = issue(
        &mut world,
        CommandType::AspectInvoke,
        CommandPayload::AspectInvoke {
            actor_id: "ann".to_string(),
            aspect: "lucky".to_string(),
            effect: InvokeEffect::Bonus,
        },
    );
    assert!(result.accepted);

    // Sole voter: the initiator's auto-yes closes the poll immediately.
    assert_eq!(count_events(&world, EventType::PollResolved), 1);
    let after = world
        .actor("ann")
        .expect("ann")
        .pending_roll
        .as_ref()
        .expect("roll")
        .result;
    assert_eq!(after, before + 2);
}

#[test]
fn three_member_poll_tallies_progress_and_applies_the_bonus() {
    let mut world = world_with_seed(19);
    for (id, name) in [("ann", "Ann"), ("bo", "Bo"), ("cy", "Cy")] {
        world.spawn_actor(id, name, "vault", true, id == "ann");
        connect(&mut world, id);
    }
    world.spawn_entity("box-1", "strongbox", "vault");
    author_open_requirement(&mut world, "box-1", "Burglary", 2);

    for member in ["bo", "cy"] {
        let result = issue(
            &mut world,
            CommandType::GroupAdd,
            CommandPayload::GroupAdd {
                leader_id: "ann".to_string(),
                member_id: member.to_string(),
            },
        );
        assert!(result.accepted);
    }
    let group_id = world.groups().group_of("ann").expect("group");
    assert_eq!(world.groups().group_of("bo"), Some(group_id));

    let result = issue(
        &mut world,
        CommandType::AspectSet,
        CommandPayload::AspectSet {
            actor_id: "ann".to_string(),
            slot: "high_concept".to_string(),
            text: "Lucky Break".to_string(),
        },
    );
    assert!(result.accepted);
    assert!(initiate(&mut world, "ann", "Burglary", "open strongbox").accepted);
    let before = world
        .actor("ann")
        .expect("ann")
        .pending_roll
        .as_ref()
        .expect("roll")
        .result;

    let result = issue(
        &mut world,
        CommandType::AspectInvoke,
        CommandPayload::AspectInvoke {
            actor_id: "ann".to_string(),
            aspect: "lucky".to_string(),
            effect: InvokeEffect::Bonus,
        },
    );
    assert!(result.accepted);
    // 1/3 tallied so far; the poll stays open. The initiator's auto-yes
    // is quiet, so nobody hears a progress broadcast for it.
    assert_eq!(count_events(&world, EventType::PollResolved), 0);
    for member in ["ann", "bo", "cy"] {
        assert!(messages_for(&world, member)
            .iter()
            .all(|text| text != "1/3 votes tallied."));
    }

    let result = issue(
        &mut world,
        CommandType::Vote,
        CommandPayload::Vote {
            actor_id: "bo".to_string(),
            approve: true,
        },
    );
    assert!(result.accepted);
    assert_eq!(count_events(&world, EventType::PollResolved), 0);
    assert!(messages_for(&world, "cy")
        .iter()
        .any(|text| text == "2/3 votes tallied."));

    let result = issue(
        &mut world,
        CommandType::Vote,
        CommandPayload::Vote {
            actor_id: "cy".to_string(),
            approve: false,
        },
    );
    assert!(result.accepted);
    // Sum is +1: approved without a coin flip.
    assert_eq!(count_events(&world, EventType::PollResolved), 1);
    assert_eq!(count_events(&world, EventType::CoinFlipped), 0);
    let after = world
        .actor("ann")
        .expect("ann")
        .pending_roll
        .as_ref()
        .expect("roll")
        .result;
    assert_eq!(after, before + 2);

    // The poll is gone; a stray vote is a usage error.
    let stray = issue(
        &mut world,
        CommandType::Vote,
        CommandPayload::Vote {
            actor_id: "bo".to_string(),
            approve: true,
        },
    );
    assert_eq!(
        stray.error.expect("error").error_code,
        ErrorCode::NoOpenPoll
    );
}

#[test]
fn tied_poll_is_settled_by_coin_flip() {
    let mut world = world_with_seed(20);
    for (id, name) in [("ann", "Ann"), ("bo", "Bo")] {
        world.spawn_actor(id, name, "vault", true, id == "ann");
        connect(&mut world, id);
    }
    world.spawn_entity("box-1", "strongbox", "vault");
    author_open_requirement(&mut world, "box-1", "Burglary", 2);
    let result = issue(
        &mut world,
        CommandType::GroupAdd,
        CommandPayload::GroupAdd {
            leader_id: "ann".to_string(),
            member_id: "bo".to_string(),
        },
    );
    assert!(result.accepted);
    let result = issue(
        &mut world,
        CommandType::AspectSet,
        CommandPayload::AspectSet {
            actor_id: "ann".to_string(),
            slot: "high_concept".to_string(),
            text: "Lucky Break".to_string(),
        },
    );
    assert!(result.accepted);
    assert!(initiate(&mut world, "ann", "Burglary", "open strongbox").accepted);

    let result = issue(
        &mut world,
        CommandType::AspectInvoke,
        CommandPayload::AspectInvoke {
            actor_id: "ann".to_string(),
            aspect: "lucky".to_string(),
            effect: InvokeEffect::Reroll,
        },
    );
    assert!(result.accepted);
    let result = issue(
        &mut world,
        CommandType::Vote,
        CommandPayload::Vote {
            actor_id: "bo".to_string(),
            approve: false,
        },
    );
    assert!(result.accepted);

    assert_eq!(count_events(&world, EventType::CoinFlipped), 1);
    assert_eq!(count_events(&world, EventType::PollResolved), 1);
    let resolved = world
        .events()
        .iter()
        .find(|event| event.event_type == EventType::PollResolved)
        .expect("resolution");
    let approved = resolved
        .details
        .as_ref()
        .and_then(|details| details.get("approved"))
        .and_then(|value| value.as_bool())
        .expect("approved flag");
    let flipped = world
        .events()
        .iter()
        .find(|event| event.event_type == EventType::CoinFlipped)
        .expect("coin flip");
    let heads = flipped
        .details
        .as_ref()
        .and_then(|details| details.get("heads"))
        .and_then(|value| value.as_bool())
        .expect("heads flag");
    assert_eq!(approved, heads);
}

#[test]
fn poll_stalls_when_a_snapshotted_voter_disconnects() {
    let mut world = world_with_seed(21);
    for (id, name) in [("ann", "Ann"), ("bo", "Bo"), ("cy", "Cy")] {
        world.spawn_actor(id, name, "vault", true, id == "ann");
        connect(&mut world, id);
    }
    world.spawn_entity("box-1", "strongbox", "vault");
    author_open_requirement(&mut world, "box-1", "Burglary", 2);
    for member in ["bo", "cy"] {
        let result = issue(
            &mut world,
            CommandType::GroupAdd,
            CommandPayload::GroupAdd {
                leader_id: "ann".to_string(),
                member_id: member.to_string(),
            },
        );
        assert!(result.accepted);
    }
    let result = issue(
        &mut world,
        CommandType::AspectSet,
        CommandPayload::AspectSet {
            actor_id: "ann".to_string(),
            slot: "high_concept".to_string(),
            text: "Lucky Break".to_string(),
        },
    );
    assert!(result.accepted);
    assert!(initiate(&mut world, "ann", "Burglary", "open strongbox").accepted);
    let result = issue(
        &mut world,
        CommandType::AspectInvoke,
        CommandPayload::AspectInvoke {
            actor_id: "ann".to_string(),
            aspect: "lucky".to_string(),
            effect: InvokeEffect::Reroll,
        },
    );
    assert!(result.accepted);

    // One snapshotted voter leaves; the outstanding count never shrinks.
    let result = issue(
        &mut world,
        CommandType::SessionDisconnect,
        CommandPayload::SessionDisconnect {
            actor_id: "cy".to_string(),
        },
    );
    assert!(result.accepted);
    let result = issue(
        &mut world,
        CommandType::Vote,
        CommandPayload::Vote {
            actor_id: "bo".to_string(),
            approve: true,
        },
    );
    assert!(result.accepted);

    assert_eq!(count_events(&world, EventType::PollResolved), 0);
    let group_id = world.groups().group_of("ann").expect("group");
    let snapshot = world.inspect_group(group_id).expect("group snapshot");
    assert_eq!(snapshot["poll"]["tallied"], 2);
    assert_eq!(snapshot["poll"]["total"], 3);
}

#[test]
fn future_commands_wait_for_their_tick() {
    let mut world = world_with_seed(22);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    let command = Command::new(
        "cmd-later",
        world.world_id().to_string(),
        3,
        CommandType::DiceRoll,
        CommandPayload::DiceRoll {
            actor_id: "ann".to_string(),
        },
    );
    world.enqueue_command(command, 3);

    assert!(world.step().is_empty());
    assert!(world.step().is_empty());
    assert_eq!(world.status().queue_depth, 1);
    let results = world.step();
    assert_eq!(results.len(), 1);
    assert!(results[0].accepted);
    assert_eq!(world.status().queue_depth, 0);
    assert_eq!(count_events(&world, EventType::DiceRolled), 1);
}

#[test]
fn only_free_aspect_slots_count_against_the_cap() {
    let mut world = world_with_seed(23);
    world.spawn_actor("ann", "Ann", "vault", false, true);
    // Named slots ride outside the free-slot budget entirely.
    for (slot, text) in [
        ("high_concept", "Wizard for Hire"),
        ("trouble", "One Step Behind"),
        ("1", "Aspect 1"),
        ("2", "Aspect 2"),
        ("3", "Aspect 3"),
    ] {
        let result = issue(
            &mut world,
            CommandType::AspectSet,
            CommandPayload::AspectSet {
                actor_id: "ann".to_string(),
                slot: slot.to_string(),
                text: text.to_string(),
            },
        );
        assert!(result.accepted, "slot {slot} should fit");
    }
    let overflow = issue(
        &mut world,
        CommandType::AspectSet,
        CommandPayload::AspectSet {
            actor_id: "ann".to_string(),
            slot: "4".to_string(),
            text: "One too many".to_string(),
        },
    );
    assert!(!overflow.accepted);
    // Rewriting existing slots stays allowed, named and free alike.
    for slot in ["high_concept", "1"] {
        let rewrite = issue(
            &mut world,
            CommandType::AspectSet,
            CommandPayload::AspectSet {
                actor_id: "ann".to_string(),
                slot: slot.to_string(),
                text: "Rewritten".to_string(),
            },
        );
        assert!(rewrite.accepted);
    }
}

#[test]
fn passive_view_gate_hides_the_entity_from_weak_observers() {
    let mut world = world_with_seed(24);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    world.spawn_actor("bo", "Bo", "vault", true, false);
    world.spawn_entity("door-1", "hidden door", "vault");
    let result = issue(
        &mut world,
        CommandType::RequirementAuthor,
        CommandPayload::RequirementAuthor {
            entity_id: "door-1".to_string(),
            action: "view".to_string(),
            passive: true,
            skill: "Notice".to_string(),
            level: 3,
            oneshot: false,
            desc: Some("A seam in the plaster, easy to miss.".to_string()),
        },
    );
    assert!(result.accepted);
    assert_eq!(count_events(&world, EventType::LockInstalled), 1);
    world.set_skill_value("ann", "Notice", 3);

    assert!(world.can_view("ann", "door-1"));
    assert!(!world.can_view("bo", "door-1"));
    assert_eq!(
        world.display_name("ann", "door-1").as_deref(),
        Some("hidden door(hidden)")
    );
    assert_eq!(world.display_name("bo", "door-1"), None);
    assert_eq!(
        world.appearance("bo", "door-1").as_deref(),
        Some("A seam in the plaster, easy to miss.")
    );

    // Gate is live, not cached: advancement flips it.
    world.set_skill_value("bo", "Notice", 4);
    assert!(world.can_view("bo", "door-1"));
}

#[test]
fn plain_action_on_a_gated_target_refuses_with_gate_text() {
    let mut world = world_with_seed(25);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    world.spawn_entity("box-1", "strongbox", "vault");
    author_open_requirement(&mut world, "box-1", "Burglary", 2);

    let result = issue(
        &mut world,
        CommandType::ActionAttempt,
        CommandPayload::ActionAttempt {
            actor_id: "ann".to_string(),
            action: "open".to_string(),
            target_id: "box-1".to_string(),
        },
    );
    assert!(result.accepted);
    assert_eq!(count_events(&world, EventType::ActionRefused), 1);
    assert!(!world.entity("box-1").expect("box").tags.contains("open"));
    assert!(messages_for(&world, "ann")
        .iter()
        .any(|text| text.contains("Opening this requires Fair Burglary.")));
}

#[test]
fn rejected_commands_notify_the_issuing_actor() {
    let mut world = world_with_seed(26);
    world.spawn_actor("ann", "Ann", "vault", true, false);
    let result = commit(&mut world, "ann");
    assert!(!result.accepted);
    assert_eq!(
        result.error.expect("error").error_code,
        ErrorCode::NoActiveCheck
    );
    assert!(messages_for(&world, "ann")
        .iter()
        .any(|text| text == "You don't have an active check to commit."));
}
