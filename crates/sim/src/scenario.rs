//! Scripted sessions.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;

use gameplay_content::WeaponCatalog;
use gameplay_core::{MoveInput, RotationMode, Rotator};
use gameplay_runtime::{Event, RuntimeConfig, Session, Topic};

const TOPICS: [Topic; 4] = [Topic::Weapon, Topic::Inventory, Topic::Combat, Topic::Net];

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Event counts and the final state of both players
    Summary,
    /// One JSON event per line on stdout
    Json,
}

/// Two players; the first fires at the second with every weapon it carries
#[derive(Parser)]
pub struct Duel {
    /// Seconds the trigger is held per weapon
    #[arg(long, default_value_t = 0.5)]
    hold: f32,

    /// Seconds to wait after releasing before switching weapons
    #[arg(long, default_value_t = 2.0)]
    settle: f32,

    /// Distance between the two players
    #[arg(long, default_value_t = 600.0)]
    distance: f32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Duel {
    pub fn execute(self, config: RuntimeConfig, catalog: WeaponCatalog) -> Result<()> {
        let muzzle_height = config.gameplay.character.muzzle_offset.z;
        let mut session = Session::new(config, catalog).context("Failed to start session")?;

        let counts = Rc::new(RefCell::new(BTreeMap::<String, usize>::new()));
        for topic in TOPICS {
            let counts = Rc::clone(&counts);
            let format = self.format;
            session.events_mut().subscribe(topic, move |event| {
                *counts.borrow_mut().entry(format!("{topic:?}")).or_default() += 1;
                if let OutputFormat::Json = format {
                    print_json(event);
                }
            });
        }

        let shooter_client = session.connect_client()?;
        let target_client = session.connect_client()?;
        let shooter = session.spawn_player_at(shooter_client, Vec3::ZERO, Rotator::ZERO)?;
        let target = session.spawn_player_at(
            target_client,
            Vec3::new(self.distance, 0.0, muzzle_height),
            Rotator::ZERO,
        )?;
        session.step()?;

        session.set_movement(
            shooter_client,
            MoveInput {
                rotation_mode: RotationMode::Aiming,
                ..MoveInput::default()
            },
        )?;

        let slots = session
            .server()
            .character(shooter)
            .map(|character| character.inventory().len())
            .unwrap_or_default();
        for slot in 0..slots {
            tracing::info!("Volley with slot {slot}");
            session.equip_slot(shooter_client, slot)?;
            session.run_for(1.0)?;
            session.press_fire(shooter_client)?;
            session.run_for(self.hold)?;
            session.release_fire(shooter_client)?;
            session.run_for(self.settle)?;
        }

        if let OutputFormat::Summary = self.format {
            println!(
                "simulated {:.2}s in {} ticks, {} bytes on the wire",
                session.now(),
                session.ticks(),
                session.transport().bytes_sent()
            );
            for (topic, count) in counts.borrow().iter() {
                println!("{topic:<10} {count} events");
            }
            for (label, id) in [("shooter", shooter), ("target", target)] {
                match session.server().character(id) {
                    Some(character) => println!(
                        "{label:<10} {id} health {:.1}/{:.1}",
                        character.health(),
                        character.max_health()
                    ),
                    None => println!("{label:<10} {id} despawned"),
                }
            }
        }
        Ok(())
    }
}

fn print_json(event: &Event) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(err) => tracing::warn!("Failed to encode event: {err}"),
    }
}
