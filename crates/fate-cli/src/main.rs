use std::env;

use contracts::{Command, CommandPayload, CommandType, EngineConfig};
use fate_core::GameWorld;

fn print_usage() {
    println!("fate-cli <command>");
    println!("commands:");
    println!("  status");
    println!("  demo <seed> [extra-ticks]");
    println!("    runs the scripted vault scenario and prints events as JSON lines");
    println!("  sheet <seed>");
    println!("    prints the demo protagonist's character sheet");
}

fn parse_seed(value: Option<&String>) -> Result<u64, String> {
    let raw = value.ok_or_else(|| "missing seed".to_string())?;
    raw.parse::<u64>()
        .map_err(|_| format!("invalid seed: {raw}"))
}

fn parse_extra_ticks(value: Option<&String>) -> Result<u64, String> {
    match value {
        None => Ok(0),
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| format!("invalid extra-ticks: {raw}")),
    }
}

struct Script {
    world: GameWorld,
    next_command: u64,
}

impl Script {
    fn new(seed: u64) -> Self {
        let config = EngineConfig {
            seed,
            ..EngineConfig::default()
        };
        let mut world = GameWorld::new(config);
        world.spawn_actor("ann", "Ann", "vault", true, true);
        world.spawn_actor("bo", "Bo", "vault", true, false);
        world.spawn_entity("box-1", "strongbox", "vault");
        Self {
            world,
            next_command: 0,
        }
    }

    fn issue(&mut self, command_type: CommandType, payload: CommandPayload) {
        let tick = self.world.status().current_tick + 1;
        let command = Command::new(
            format!("cmd-{:04}", self.next_command),
            self.world.world_id().to_string(),
            tick,
            command_type,
            payload,
        );
        self.next_command += 1;
        self.world.enqueue_command(command, tick);
        let _ = self.world.step();
    }

    /// The scripted vault scenario: a gated strongbox, a two-member group,
    /// an aspect invocation put to a vote, and a committed check.
    fn run(&mut self) {
        self.issue(
            CommandType::RequirementAuthor,
            CommandPayload::RequirementAuthor {
                entity_id: "box-1".to_string(),
                action: "open".to_string(),
                passive: false,
                skill: "Burglary".to_string(),
                level: 2,
                oneshot: false,
                desc: Some("The lock is old but stubborn.".to_string()),
            },
        );
        self.world.set_skill_value("ann", "Burglary", 3);
        for actor_id in ["ann", "bo"] {
            self.issue(
                CommandType::SessionConnect,
                CommandPayload::SessionConnect {
                    actor_id: actor_id.to_string(),
                },
            );
        }
        self.issue(
            CommandType::GroupAdd,
            CommandPayload::GroupAdd {
                leader_id: "ann".to_string(),
                member_id: "bo".to_string(),
            },
        );
        self.issue(
            CommandType::AspectSet,
            CommandPayload::AspectSet {
                actor_id: "ann".to_string(),
                slot: "high_concept".to_string(),
                text: "Second-Story Specialist".to_string(),
            },
        );
        self.issue(
            CommandType::CheckInitiate,
            CommandPayload::CheckInitiate {
                actor_id: "ann".to_string(),
                skill: "Burglary".to_string(),
                input: "to open strongbox".to_string(),
            },
        );
        self.issue(
            CommandType::AspectInvoke,
            CommandPayload::AspectInvoke {
                actor_id: "ann".to_string(),
                aspect: "specialist".to_string(),
                effect: contracts::InvokeEffect::Bonus,
            },
        );
        self.issue(
            CommandType::Vote,
            CommandPayload::Vote {
                actor_id: "bo".to_string(),
                approve: true,
            },
        );
        self.issue(
            CommandType::CheckCommit,
            CommandPayload::CheckCommit {
                actor_id: "ann".to_string(),
            },
        );
        if self
            .world
            .actor("ann")
            .map(|actor| actor.pending_elaboration.is_some())
            .unwrap_or(false)
        {
            self.issue(
                CommandType::CheckElaborate,
                CommandPayload::CheckElaborate {
                    actor_id: "ann".to_string(),
                    text: "Ann teases the stubborn lock open.".to_string(),
                },
            );
        }
    }
}

fn run_demo(seed: u64, extra_ticks: u64) -> Result<(), String> {
    let mut script = Script::new(seed);
    script.run();
    let _ = script.world.step_n(extra_ticks);
    for event in script.world.events() {
        let line = serde_json::to_string(event)
            .map_err(|err| format!("failed to encode event: {err}"))?;
        println!("{line}");
    }
    println!("{}", script.world.status());
    Ok(())
}

fn run_sheet(seed: u64) -> Result<(), String> {
    let mut script = Script::new(seed);
    script.run();
    let sheet = script
        .world
        .sheet_text("ann")
        .ok_or_else(|| "demo protagonist missing".to_string())?;
    println!("{sheet}");
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    match command {
        Some("status") => {
            let world = GameWorld::new(EngineConfig::default());
            println!("{}", world.status());
        }
        Some("demo") => {
            let outcome = parse_seed(args.get(2))
                .and_then(|seed| Ok((seed, parse_extra_ticks(args.get(3))?)))
                .and_then(|(seed, extra)| run_demo(seed, extra));
            if let Err(err) = outcome {
                eprintln!("error: {err}");
                print_usage();
                std::process::exit(2);
            }
        }
        Some("sheet") => match parse_seed(args.get(2)).and_then(run_sheet) {
            Ok(()) => {}
            Err(err) => {
                eprintln!("error: {err}");
                print_usage();
                std::process::exit(2);
            }
        },
        _ => {
            print_usage();
        }
    }
}
