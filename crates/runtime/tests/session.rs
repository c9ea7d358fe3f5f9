use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use gameplay_content::WeaponCatalog;
use gameplay_core::{
    CharacterId, CharacterVariant, ClientId, MoveInput, NetRole, Request, RotationMode, Rotator,
    ValidationPolicy, WeaponCue, WeaponId, WeaponRequest, WeaponState,
};
use gameplay_runtime::{
    CombatEvent, Event, InventoryEvent, NetEvent, PeerId, RuntimeConfig, RuntimeError, Session,
    Topic,
};

fn session_with(config: RuntimeConfig) -> Session {
    let catalog = WeaponCatalog::builtin().expect("built-in weapons should parse");
    Session::new(config, catalog).expect("session should start")
}

fn session() -> Session {
    session_with(RuntimeConfig::default())
}

/// Connects a client and spawns its character, then lets the spawn arrive.
fn join(session: &mut Session, location: Vec3) -> (ClientId, CharacterId) {
    let client = session.connect_client().expect("client should connect");
    let character = session
        .spawn_player_at(client, location, Rotator::ZERO)
        .expect("player should spawn");
    session.step().expect("step");
    (client, character)
}

fn aim(session: &mut Session, client: ClientId) {
    session
        .set_movement(
            client,
            MoveInput {
                rotation_mode: RotationMode::Aiming,
                ..MoveInput::default()
            },
        )
        .expect("movement input");
    session.step().expect("step");
}

fn server_weapon_slot(session: &Session, character: CharacterId, slot: usize) -> WeaponId {
    session
        .server()
        .character(character)
        .and_then(|c| c.inventory().get(slot))
        .expect("inventory slot")
}

fn rejections(session: &Session) -> Vec<String> {
    session
        .events()
        .history(Topic::Net)
        .filter_map(|event| match event {
            Event::Net(NetEvent::RequestRejected { code, .. }) => Some(code.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_spawn_replicates_character_and_equips_first_weapon() {
    let mut session = session();
    let (client, character) = join(&mut session, Vec3::ZERO);

    let server = session.server().character(character).unwrap();
    let rifle = server_weapon_slot(&session, character, 0);
    assert_eq!(server.inventory().len(), 2);
    assert_eq!(server.current_weapon(), Some(rifle));

    let peer = session.client(client).unwrap();
    let replica = peer.controlled_character().unwrap();
    assert_eq!(replica.id(), character);
    assert!(replica.is_locally_controlled());
    assert_eq!(replica.net().role, NetRole::AutonomousProxy);
    assert_eq!(replica.inventory().weapons(), server.inventory().weapons());
    assert_eq!(replica.current_weapon(), Some(rifle));

    let weapon = peer.arsenal().get(rifle).unwrap();
    assert_eq!(weapon.owner(), Some(character));
    assert!(weapon.is_equipped());
    assert!(weapon.owner_status().locally_controlled);

    assert!(session.events().history(Topic::Net).any(|event| matches!(
        event,
        Event::Net(NetEvent::CharacterSpawned { controller, .. }) if *controller == client
    )));
    assert_eq!(session.character_of(client), Some(character));
    assert_eq!(session.controller_of(character), Some(client));
}

#[test]
fn test_fire_while_aiming_spends_ammo_on_server_and_owner() {
    let mut session = session();
    let (client, character) = join(&mut session, Vec3::ZERO);
    let rifle = server_weapon_slot(&session, character, 0);
    aim(&mut session, client);

    session.press_fire(client).unwrap();
    session.step().unwrap();
    session.release_fire(client).unwrap();
    session.run_for(0.2).unwrap();

    let server_clip = session.server().arsenal().get(rifle).unwrap().ammo().in_clip();
    let client_clip = session
        .client(client)
        .unwrap()
        .arsenal()
        .get(rifle)
        .unwrap()
        .ammo()
        .in_clip();
    assert_eq!(server_clip, 29);
    assert_eq!(client_clip, 29);

    let shots = session
        .events()
        .history(Topic::Weapon)
        .filter(|event| matches!(
            event,
            Event::Weapon(cue) if cue.peer == PeerId::Client(client) && matches!(cue.cue, WeaponCue::Shot { .. })
        ))
        .count();
    assert_eq!(shots, 1);
    assert!(session.events().history(Topic::Combat).any(|event| matches!(
        event,
        Event::Combat(CombatEvent::ProjectileLaunched { instigator, weapon, .. })
            if *instigator == Some(character) && *weapon == rifle
    )));
}

#[test]
fn test_fire_without_aiming_is_ignored() {
    let mut session = session();
    let (client, character) = join(&mut session, Vec3::ZERO);
    let rifle = server_weapon_slot(&session, character, 0);

    session.press_fire(client).unwrap();
    session.run_for(0.2).unwrap();

    assert_eq!(session.server().arsenal().get(rifle).unwrap().ammo().in_clip(), 30);
    assert_eq!(session.events().history(Topic::Combat).count(), 0);
}

#[test]
fn test_reload_refills_clip_from_reserve() {
    let mut session = session();
    let (client, character) = join(&mut session, Vec3::ZERO);
    let rifle = server_weapon_slot(&session, character, 0);
    let initial_total = session.server().arsenal().get(rifle).unwrap().ammo().total();
    aim(&mut session, client);

    session.press_fire(client).unwrap();
    session.step().unwrap();
    session.release_fire(client).unwrap();
    session.step().unwrap();

    session.press_reload(client).unwrap();
    session.step().unwrap();
    assert_eq!(
        session.server().arsenal().get(rifle).unwrap().state(),
        WeaponState::Reloading
    );

    session.run_for(2.0).unwrap();
    for arsenal in [
        session.server().arsenal(),
        session.client(client).unwrap().arsenal(),
    ] {
        let weapon = arsenal.get(rifle).unwrap();
        assert_eq!(weapon.ammo().in_clip(), 30);
        assert_eq!(weapon.ammo().total(), initial_total - 1);
        assert_eq!(weapon.state(), WeaponState::Idle);
    }
}

#[test]
fn test_equip_slot_switches_weapon_on_every_peer() {
    let mut session = session();
    let (client, character) = join(&mut session, Vec3::ZERO);
    let launcher = server_weapon_slot(&session, character, 1);

    session.equip_slot(client, 1).unwrap();
    session.step().unwrap();
    assert_eq!(
        session.server().arsenal().get(launcher).unwrap().state(),
        WeaponState::Equipping
    );

    session.run_for(1.0).unwrap();
    assert_eq!(
        session.server().character(character).unwrap().current_weapon(),
        Some(launcher)
    );
    let peer = session.client(client).unwrap();
    assert_eq!(peer.controlled_character().unwrap().current_weapon(), Some(launcher));
    assert!(peer.arsenal().get(launcher).unwrap().is_equipped());

    assert!(session.events().history(Topic::Inventory).any(|event| matches!(
        event,
        Event::Inventory(InventoryEvent::Equipped { peer: PeerId::Server, weapon, .. })
            if *weapon == launcher
    )));
}

#[test]
fn test_next_weapon_cycles_and_empty_slot_is_ignored() {
    let mut session = session();
    let (client, character) = join(&mut session, Vec3::ZERO);
    let launcher = server_weapon_slot(&session, character, 1);

    session.equip_slot(client, 7).unwrap();
    session.next_weapon(client).unwrap();
    session.run_for(1.0).unwrap();
    assert_eq!(
        session.server().character(character).unwrap().current_weapon(),
        Some(launcher)
    );
}

#[test]
fn test_strict_policy_rejects_foreign_requests() {
    let mut session = session();
    let (_, owner) = join(&mut session, Vec3::ZERO);
    let (intruder, _) = join(&mut session, Vec3::new(0.0, 500.0, 0.0));
    let rifle = server_weapon_slot(&session, owner, 0);

    session
        .send_request(
            intruder,
            Request::Weapon {
                weapon: rifle,
                request: WeaponRequest::StartReload,
            },
        )
        .unwrap();
    session
        .send_request(
            intruder,
            Request::Weapon {
                weapon: WeaponId(999),
                request: WeaponRequest::StartFire,
            },
        )
        .unwrap();
    session.step().unwrap();

    assert_eq!(
        rejections(&session),
        vec!["REQUEST_WEAPON_NOT_OWNED", "REQUEST_UNKNOWN_WEAPON"]
    );
    assert_eq!(
        session.server().arsenal().get(rifle).unwrap().state(),
        WeaponState::Idle
    );
}

#[test]
fn test_accept_all_applies_foreign_requests() {
    let mut config = RuntimeConfig::default();
    config.gameplay.validation = ValidationPolicy::AcceptAll;
    let mut session = session_with(config);
    let (owner_client, owner) = join(&mut session, Vec3::ZERO);
    let (intruder, _) = join(&mut session, Vec3::new(0.0, 500.0, 0.0));
    let rifle = server_weapon_slot(&session, owner, 0);

    // Make room in the clip so the reload is eligible.
    aim(&mut session, owner_client);
    session.press_fire(owner_client).unwrap();
    session.step().unwrap();
    session.release_fire(owner_client).unwrap();
    session.step().unwrap();

    session
        .send_request(
            intruder,
            Request::Weapon {
                weapon: rifle,
                request: WeaponRequest::StartReload,
            },
        )
        .unwrap();
    session.step().unwrap();

    assert!(rejections(&session).is_empty());
    assert_eq!(
        session.server().arsenal().get(rifle).unwrap().state(),
        WeaponState::Reloading
    );
}

#[test]
fn test_requests_from_clients_without_a_character_are_rejected() {
    let mut session = session();
    let client = session.connect_client().unwrap();
    session
        .send_request(
            client,
            Request::Weapon {
                weapon: WeaponId(1),
                request: WeaponRequest::StartFire,
            },
        )
        .unwrap();
    session.step().unwrap();
    assert_eq!(rejections(&session), vec!["REQUEST_NO_CHARACTER"]);

    assert!(matches!(
        session.press_fire(client),
        Err(RuntimeError::NoCharacter(_))
    ));
    assert!(matches!(
        session.press_fire(ClientId(42)),
        Err(RuntimeError::UnknownClient(_))
    ));
}

fn fire_projectile(session: &mut Session, client: ClientId, weapon: WeaponId, origin: Vec3) {
    session
        .send_request(
            client,
            Request::Weapon {
                weapon,
                request: WeaponRequest::FireProjectile {
                    origin,
                    direction: Vec3::X,
                },
            },
        )
        .expect("request should queue");
}

fn launches(session: &Session) -> Vec<Vec3> {
    session
        .events()
        .history(Topic::Combat)
        .filter_map(|event| match event {
            Event::Combat(CombatEvent::ProjectileLaunched { origin, .. }) => Some(*origin),
            _ => None,
        })
        .collect()
}

#[test]
fn test_strict_rejects_projectiles_without_a_spent_round() {
    let mut session = session();
    let (client, shooter) = join(&mut session, Vec3::ZERO);
    let (_, victim) = join(&mut session, Vec3::new(5000.0, 0.0, 60.0));
    let rifle = server_weapon_slot(&session, shooter, 0);
    let muzzle = session.server().character(shooter).unwrap().muzzle_location();

    for _ in 0..40 {
        fire_projectile(&mut session, client, rifle, muzzle);
    }
    session.run_for(1.0).unwrap();

    let codes = rejections(&session);
    assert_eq!(codes.len(), 40);
    assert!(codes.iter().all(|code| code == "REQUEST_NO_SHOT_SPENT"));
    assert!(launches(&session).is_empty());
    assert!(session.projectiles().is_empty());

    let ammo = session.server().arsenal().get(rifle).unwrap().ammo();
    assert_eq!(ammo.in_clip(), 30);
    assert_eq!(session.server().character(victim).unwrap().health(), 100.0);
}

#[test]
fn test_strict_rejects_projectiles_far_from_the_muzzle() {
    let mut session = session();
    let (client, shooter) = join(&mut session, Vec3::ZERO);
    let rifle = server_weapon_slot(&session, shooter, 0);
    let muzzle = session.server().character(shooter).unwrap().muzzle_location();

    // One round spent on the authority pays for exactly one projectile.
    session
        .send_request(
            client,
            Request::Weapon {
                weapon: rifle,
                request: WeaponRequest::HandleFiring,
            },
        )
        .unwrap();
    fire_projectile(&mut session, client, rifle, Vec3::new(4990.0, 0.0, 0.0));
    fire_projectile(&mut session, client, rifle, muzzle);
    fire_projectile(&mut session, client, rifle, muzzle);
    session.step().unwrap();

    assert_eq!(
        rejections(&session),
        vec!["REQUEST_ORIGIN_MISMATCH", "REQUEST_NO_SHOT_SPENT"]
    );
    assert_eq!(launches(&session), vec![muzzle]);
    assert_eq!(
        session.server().arsenal().get(rifle).unwrap().ammo().in_clip(),
        29
    );
}

#[test]
fn test_launcher_projectiles_damage_and_kill() {
    let mut session = session();
    let (shooter_client, shooter) = join(&mut session, Vec3::ZERO);
    let (target_client, target) = join(&mut session, Vec3::new(600.0, 0.0, 60.0));

    session.equip_slot(shooter_client, 1).unwrap();
    session.run_for(1.0).unwrap();
    aim(&mut session, shooter_client);

    session.press_fire(shooter_client).unwrap();
    session.step().unwrap();
    session.release_fire(shooter_client).unwrap();
    session.run_for(1.0).unwrap();

    let health = session.server().character(target).unwrap().health();
    assert!(health > 0.0 && health < 20.0, "health after one rocket: {health}");
    assert_eq!(session.server().character(shooter).unwrap().health(), 100.0);
    let replicated = session
        .client(target_client)
        .unwrap()
        .controlled_character()
        .unwrap()
        .health();
    assert_eq!(replicated, health);
    assert!(session.events().history(Topic::Combat).any(|event| matches!(
        event,
        Event::Combat(CombatEvent::Damaged { character, instigator, .. })
            if *character == target && *instigator == Some(shooter)
    )));

    // Wait out the automatic reload, then fire again.
    session.run_for(2.0).unwrap();
    session.press_fire(shooter_client).unwrap();
    session.step().unwrap();
    session.release_fire(shooter_client).unwrap();
    session.run_for(1.0).unwrap();

    assert!(!session.server().character(target).unwrap().is_alive());
    assert!(session.events().history(Topic::Combat).any(|event| matches!(
        event,
        Event::Combat(CombatEvent::Killed { character, .. }) if *character == target
    )));
    assert!(session.projectiles().is_empty());
}

#[test]
fn test_blocker_stops_projectiles() {
    let mut session = session();
    let (client, _) = join(&mut session, Vec3::ZERO);
    let (_, target) = join(&mut session, Vec3::new(600.0, 0.0, 60.0));
    session.scene_mut().add_blocker(gameplay_runtime::Blocker::new(
        Vec3::new(300.0, -100.0, -100.0),
        Vec3::new(320.0, 100.0, 300.0),
    ));
    aim(&mut session, client);

    session.press_fire(client).unwrap();
    session.step().unwrap();
    session.release_fire(client).unwrap();
    session.run_for(0.5).unwrap();

    assert!(session.events().history(Topic::Combat).any(|event| matches!(
        event,
        Event::Combat(CombatEvent::ProjectileExploded { struck: None, .. })
    )));
    assert_eq!(session.server().character(target).unwrap().health(), 100.0);
}

#[test]
fn test_late_joining_client_receives_existing_players() {
    let mut session = session();
    let (first_client, first) = join(&mut session, Vec3::ZERO);
    let launcher = server_weapon_slot(&session, first, 1);
    session.equip_slot(first_client, 1).unwrap();
    session.run_for(1.0).unwrap();

    let (late_client, late) = join(&mut session, Vec3::new(0.0, 500.0, 0.0));
    let peer = session.client(late_client).unwrap();
    assert_eq!(peer.controlled(), Some(late));

    let other = peer.character(first).unwrap();
    assert!(!other.is_locally_controlled());
    assert_eq!(other.net().role, NetRole::SimulatedProxy);
    assert_eq!(other.current_weapon(), Some(launcher));
    assert!(other.inventory().is_empty());

    let weapon = peer.arsenal().get(launcher).unwrap();
    assert_eq!(weapon.owner(), Some(first));
    assert_eq!(weapon.net().role, NetRole::SimulatedProxy);
    assert!(!weapon.owner_status().locally_controlled);
}

#[test]
fn test_despawn_removes_replicas_everywhere() {
    let mut session = session();
    let (client, character) = join(&mut session, Vec3::ZERO);

    session.despawn_player(character).unwrap();
    session.step().unwrap();

    assert!(session.server().character(character).is_none());
    assert!(session.server().arsenal().is_empty());
    let peer = session.client(client).unwrap();
    assert!(peer.controlled().is_none());
    assert!(peer.arsenal().is_empty());
    assert_eq!(session.character_of(client), None);
    assert!(matches!(
        session.despawn_player(character),
        Err(RuntimeError::UnknownCharacter(_))
    ));
}

#[test]
fn test_top_down_aim_point_reaches_server() {
    let mut config = RuntimeConfig::default();
    config.gameplay.variant = CharacterVariant::TopDown;
    let mut session = session_with(config);
    let (client, character) = join(&mut session, Vec3::ZERO);

    session
        .set_movement(
            client,
            MoveInput {
                aim_point: Some(Vec3::new(0.0, 200.0, 0.0)),
                ..MoveInput::default()
            },
        )
        .unwrap();
    session.step().unwrap();

    let yaw = session
        .server()
        .character(character)
        .unwrap()
        .control_rotation()
        .yaw;
    assert!((yaw - 90.0).abs() < 1e-3, "server yaw {yaw}");

    let pose = session.update_camera(client).unwrap();
    assert!(pose.location.is_finite());
}

#[test]
fn test_subscribers_receive_events_in_order() {
    let mut session = session();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = session.events_mut().subscribe(Topic::Net, move |event| {
        sink.borrow_mut().push(event.clone());
    });

    let (client, character) = join(&mut session, Vec3::ZERO);
    assert_eq!(
        *seen.borrow(),
        vec![
            Event::Net(NetEvent::ClientConnected { client }),
            Event::Net(NetEvent::CharacterSpawned {
                character,
                controller: client,
            }),
        ]
    );

    assert!(session.events_mut().unsubscribe(id));
    session.despawn_player(character).unwrap();
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_invalid_tick_rate_is_rejected() {
    let config = RuntimeConfig {
        tick_rate: 0.0,
        ..RuntimeConfig::default()
    };
    let catalog = WeaponCatalog::builtin().unwrap();
    assert!(matches!(
        Session::new(config, catalog),
        Err(RuntimeError::InvalidTickRate(_))
    ));
}

#[test]
fn test_unknown_default_weapon_is_rejected() {
    let mut config = RuntimeConfig::default();
    config.gameplay.character.default_inventory = vec!["crossbow".to_owned()];
    let catalog = WeaponCatalog::builtin().unwrap();
    assert!(matches!(
        Session::new(config, catalog),
        Err(RuntimeError::UnknownWeaponDefinition(name)) if name == "crossbow"
    ));
}
