//! Session host: one authority, any number of clients, one clock.
//!
//! Every call to [`Session::step`] runs a full network round trip in a fixed
//! order:
//!
//! 1. each client ticks its replicas and sends its queued requests;
//! 2. the authority validates and applies requests in arrival order, ticks,
//!    and advances projectiles;
//! 3. the authority sends each client the dirty state it may see;
//! 4. each client applies what it received, replaying the on-rep hooks.
use std::collections::BTreeMap;
use std::sync::Arc;

use glam::Vec3;

use gameplay_content::WeaponCatalog;
use gameplay_core::camera::CameraPose;
use gameplay_core::net::{
    validate_character_request, validate_projectile_origin, validate_weapon_request,
};
use gameplay_core::{
    Arsenal, Character, CharacterId, CharacterRequest, CharacterSpawn, ClientId, GameError,
    IdAllocator, MoveInput, NetContext, NetRole, NoCurves, Observer, OverlayState, Request,
    RequestRejection, Rotator, Weapon, WeaponCue, WeaponDefinition, WeaponId, WeaponRequest,
};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{CombatEvent, Event, EventBus, InventoryEvent, NetEvent, WeaponEvent};
use crate::net::{Envelope, LoopbackTransport, PeerId, ServerMessage};
use crate::peer::{DrainedCue, Peer};
use crate::projectiles::{ProjectileOutcome, ProjectileSystem};
use crate::scene::StaticScene;

/// Distance between consecutive default spawn points.
pub const SPAWN_SPACING: f32 = 300.0;

pub struct Session {
    config: RuntimeConfig,
    catalog: WeaponCatalog,
    default_inventory: Vec<Arc<WeaponDefinition>>,
    now: f32,
    ticks: u64,
    ids: IdAllocator,
    server: Peer,
    clients: BTreeMap<ClientId, Peer>,
    /// Which client controls each character.
    controllers: BTreeMap<CharacterId, ClientId>,
    possessed: BTreeMap<ClientId, CharacterId>,
    next_client: u16,
    transport: LoopbackTransport,
    events: EventBus,
    projectiles: ProjectileSystem,
    scene: StaticScene,
}

impl Session {
    pub fn new(config: RuntimeConfig, catalog: WeaponCatalog) -> Result<Self> {
        config.validate()?;
        let default_inventory = config
            .gameplay
            .character
            .default_inventory
            .iter()
            .map(|name| {
                catalog
                    .get(name)
                    .ok_or_else(|| RuntimeError::UnknownWeaponDefinition(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut transport = LoopbackTransport::new();
        transport.connect(PeerId::Server);

        tracing::info!(
            target: "runtime::session",
            tick_rate = config.tick_rate,
            variant = %config.gameplay.variant,
            validation = %config.gameplay.validation,
            "session created"
        );

        Ok(Self {
            events: EventBus::with_capacity(config.event_history),
            config,
            catalog,
            default_inventory,
            now: 0.0,
            ticks: 0,
            ids: IdAllocator::new(),
            server: Peer::new(PeerId::Server, NetContext::authority(true)),
            clients: BTreeMap::new(),
            controllers: BTreeMap::new(),
            possessed: BTreeMap::new(),
            next_client: 1,
            transport,
            projectiles: ProjectileSystem::new(),
            scene: StaticScene::new(),
        })
    }

    // ===== accessors =====

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn server(&self) -> &Peer {
        &self.server
    }

    pub fn client(&self, client: ClientId) -> Option<&Peer> {
        self.clients.get(&client)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn projectiles(&self) -> &ProjectileSystem {
        &self.projectiles
    }

    pub fn scene_mut(&mut self) -> &mut StaticScene {
        &mut self.scene
    }

    pub fn transport(&self) -> &LoopbackTransport {
        &self.transport
    }

    pub fn character_of(&self, client: ClientId) -> Option<CharacterId> {
        self.possessed.get(&client).copied()
    }

    pub fn controller_of(&self, character: CharacterId) -> Option<ClientId> {
        self.controllers.get(&character).copied()
    }

    // ===== connections and spawning =====

    /// Adds a client and sends it every replica that already exists.
    pub fn connect_client(&mut self) -> Result<ClientId> {
        let client = ClientId(self.next_client);
        self.next_client = self
            .next_client
            .checked_add(1)
            .ok_or(RuntimeError::ClientLimit)?;

        self.transport.connect(PeerId::Client(client));
        self.clients.insert(
            client,
            Peer::new(PeerId::Client(client), NetContext::proxy(NetRole::SimulatedProxy)),
        );

        let existing: Vec<CharacterId> = self.server.characters().map(Character::id).collect();
        for character in existing {
            self.send_character_snapshot(client, character)?;
        }

        tracing::info!(target: "runtime::session", %client, "client connected");
        self.events
            .publish(Event::Net(NetEvent::ClientConnected { client }));
        Ok(client)
    }

    /// Spawns a character for `client` at the next default spawn point.
    pub fn spawn_player(&mut self, client: ClientId) -> Result<CharacterId> {
        let location = Vec3::new(0.0, SPAWN_SPACING * self.controllers.len() as f32, 0.0);
        self.spawn_player_at(client, location, Rotator::ZERO)
    }

    /// Creates the authoritative character with its default inventory and
    /// replicates it to every client.
    pub fn spawn_player_at(
        &mut self,
        client: ClientId,
        location: Vec3,
        rotation: Rotator,
    ) -> Result<CharacterId> {
        if !self.clients.contains_key(&client) {
            return Err(RuntimeError::UnknownClient(client));
        }
        if let Some(character) = self.possessed.get(&client) {
            return Err(RuntimeError::AlreadyControlling {
                client,
                character: *character,
            });
        }

        let id = self.ids.next_character();
        let spawn = CharacterSpawn {
            id,
            net: self.server.net(),
            locally_controlled: false,
            location,
            rotation,
        };
        self.server
            .insert_character(Character::new(spawn, &self.config.gameplay));
        self.controllers.insert(id, client);
        self.possessed.insert(client, id);

        let (character, arsenal) = self
            .server
            .character_and_arsenal(id)
            .ok_or(RuntimeError::UnknownCharacter(id))?;
        let weapons =
            character.give_default_inventory(arsenal, &self.default_inventory, &mut self.ids, self.now)?;

        let clients: Vec<ClientId> = self.clients.keys().copied().collect();
        for peer in clients {
            self.send_character_snapshot(peer, id)?;
        }
        self.clear_dirty_of(id);

        tracing::info!(
            target: "runtime::session",
            character = %id,
            %client,
            weapons = weapons.len(),
            "player spawned"
        );
        self.events.publish(Event::Net(NetEvent::CharacterSpawned {
            character: id,
            controller: client,
        }));
        Ok(id)
    }

    /// Destroys a character and its inventory everywhere.
    pub fn despawn_player(&mut self, character: CharacterId) -> Result<()> {
        let (replica, arsenal) = self
            .server
            .character_and_arsenal(character)
            .ok_or(RuntimeError::UnknownCharacter(character))?;
        let weapons = replica.destroy_inventory(arsenal, self.now);
        self.server.remove_character(character);
        if let Some(client) = self.controllers.remove(&character) {
            self.possessed.remove(&client);
        }

        let clients: Vec<ClientId> = self.clients.keys().copied().collect();
        for client in clients {
            let to = PeerId::Client(client);
            for weapon in &weapons {
                self.send(to, ServerMessage::DespawnWeapon(*weapon))?;
            }
            self.send(to, ServerMessage::DespawnCharacter(character))?;
        }

        tracing::info!(target: "runtime::session", %character, "player despawned");
        self.events
            .publish(Event::Net(NetEvent::CharacterDespawned { character }));
        Ok(())
    }

    // ===== client input =====

    pub fn press_fire(&mut self, client: ClientId) -> Result<()> {
        self.with_controlled(client, |character, arsenal, now| {
            character.on_fire_pressed(arsenal, now)
        })
    }

    pub fn release_fire(&mut self, client: ClientId) -> Result<()> {
        self.with_controlled(client, |character, arsenal, now| {
            character.stop_weapon_fire(arsenal, now)
        })
    }

    pub fn press_reload(&mut self, client: ClientId) -> Result<()> {
        self.with_controlled(client, |character, arsenal, now| character.reload(arsenal, now))
    }

    /// Equips the weapon in inventory `slot`. Empty slots are ignored.
    pub fn equip_slot(&mut self, client: ClientId, slot: usize) -> Result<()> {
        self.with_controlled(client, |character, arsenal, now| {
            if let Some(weapon) = character.inventory().get(slot) {
                character.equip_weapon(arsenal, Some(weapon), now);
            }
        })
    }

    pub fn next_weapon(&mut self, client: ClientId) -> Result<()> {
        self.with_controlled(client, |character, arsenal, now| {
            character.next_weapon(arsenal, now)
        })
    }

    pub fn previous_weapon(&mut self, client: ClientId) -> Result<()> {
        self.with_controlled(client, |character, arsenal, now| {
            character.previous_weapon(arsenal, now)
        })
    }

    pub fn set_overlay(&mut self, client: ClientId, overlay: OverlayState) -> Result<()> {
        self.with_controlled(client, |character, arsenal, now| {
            character.set_overlay_state(arsenal, overlay, now)
        })
    }

    pub fn set_movement(&mut self, client: ClientId, input: MoveInput) -> Result<()> {
        self.with_controlled(client, |character, _, _| character.apply_move_input(&input))
    }

    /// Runs the camera of `client`'s character against the level and the
    /// bodies that client sees.
    pub fn update_camera(&mut self, client: ClientId) -> Result<CameraPose> {
        let delta_time = self.config.delta_time();
        let peer = self
            .clients
            .get_mut(&client)
            .ok_or(RuntimeError::UnknownClient(client))?;
        let bodies = peer.character_bodies();
        let id = peer.controlled().ok_or(RuntimeError::NoCharacter(client))?;
        let (character, _) = peer
            .character_and_arsenal(id)
            .ok_or(RuntimeError::UnknownCharacter(id))?;
        let world = self.scene.with_characters(&bodies);
        Ok(character.update_camera(delta_time, &world))
    }

    /// Queues a raw request from `client` to the authority, as if its replica
    /// had produced it. Delivered on the next step.
    pub fn send_request(&mut self, client: ClientId, request: Request) -> Result<()> {
        if !self.clients.contains_key(&client) {
            return Err(RuntimeError::UnknownClient(client));
        }
        self.transport
            .send(PeerId::Server, &Envelope::Request { from: client, request })?;
        Ok(())
    }

    fn with_controlled(
        &mut self,
        client: ClientId,
        action: impl FnOnce(&mut Character, &mut Arsenal, f32),
    ) -> Result<()> {
        let now = self.now;
        let peer = self
            .clients
            .get_mut(&client)
            .ok_or(RuntimeError::UnknownClient(client))?;
        let id = peer.controlled().ok_or(RuntimeError::NoCharacter(client))?;
        let (character, arsenal) = peer
            .character_and_arsenal(id)
            .ok_or(RuntimeError::UnknownCharacter(id))?;
        action(character, arsenal, now);
        Ok(())
    }

    // ===== simulation =====

    /// Advances the session by one fixed tick.
    pub fn step(&mut self) -> Result<()> {
        let delta_time = self.config.delta_time();
        self.now += delta_time;
        self.ticks += 1;
        let now = self.now;

        // Clients simulate and send.
        let mut outgoing = Vec::new();
        for (client, peer) in &mut self.clients {
            peer.tick(now, delta_time, &NoCurves);
            let (requests, cues) = drain_client_output(peer);
            publish_cues(&mut self.events, peer.id(), cues, now);
            outgoing.push((*client, requests));
        }
        for (client, requests) in outgoing {
            for request in requests {
                self.transport
                    .send(PeerId::Server, &Envelope::Request { from: client, request })?;
            }
        }

        // Authority applies requests, simulates and resolves projectiles.
        for envelope in self.transport.receive(PeerId::Server)? {
            if let Envelope::Request { from, request } = envelope {
                self.handle_request(from, request);
            }
        }
        self.server.tick(now, delta_time, &NoCurves);
        let cues = self.server.drain_cues();
        publish_cues(&mut self.events, PeerId::Server, cues, now);
        self.advance_projectiles(delta_time);

        // Authority replicates; clients apply.
        self.replicate()?;
        let clients: Vec<ClientId> = self.clients.keys().copied().collect();
        for client in clients {
            let envelopes = self.transport.receive(PeerId::Client(client))?;
            let Some(peer) = self.clients.get_mut(&client) else {
                continue;
            };
            for envelope in envelopes {
                if let Envelope::Server(message) = envelope {
                    apply_server_message(peer, &self.catalog, &self.config, message, now);
                }
            }
            peer.refresh_owner_status();
        }

        tracing::trace!(target: "runtime::session", tick = self.ticks, now, "step complete");
        Ok(())
    }

    /// Steps for `seconds` of simulated time.
    pub fn run_for(&mut self, seconds: f32) -> Result<()> {
        let steps = (seconds * self.config.tick_rate).round().max(0.0) as u64;
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    fn handle_request(&mut self, from: ClientId, request: Request) {
        let name = request.name();
        let Some(requester) = self.possessed.get(&from).copied() else {
            tracing::warn!(target: "runtime::session", client = %from, request = name, "request from client without a character");
            self.events.publish(Event::Net(NetEvent::RequestRejected {
                client: from,
                request: name.to_owned(),
                code: "REQUEST_NO_CHARACTER".to_owned(),
                reason: format!("{from} controls no character"),
            }));
            return;
        };
        let policy = self.config.gameplay.validation;
        let now = self.now;

        match request {
            Request::Weapon { weapon, request } => {
                let verdict = validate_weapon_request(
                    policy,
                    requester,
                    weapon,
                    self.server.arsenal().get(weapon),
                    &request,
                )
                .and_then(|()| match &request {
                    WeaponRequest::FireProjectile { origin, .. } => validate_projectile_origin(
                        policy,
                        requester,
                        *origin,
                        self.server.character(requester).map(Character::muzzle_location),
                        self.config.gameplay.character.muzzle_tolerance,
                    ),
                    _ => Ok(()),
                });
                if let Err(rejection) = verdict {
                    self.reject(from, name, &rejection);
                    return;
                }
                tracing::debug!(target: "runtime::session", client = %from, %weapon, request = name, "applying weapon request");
                match request {
                    WeaponRequest::FireProjectile { origin, direction } => {
                        let paid = self
                            .server
                            .arsenal_mut()
                            .get_mut(weapon)
                            .is_some_and(Weapon::claim_shot);
                        if !paid {
                            tracing::debug!(target: "runtime::session", %weapon, "launching a projectile no round paid for");
                        }
                        self.launch_projectile(weapon, origin, direction);
                    }
                    other => {
                        if let Some(replica) = self.server.arsenal_mut().get_mut(weapon) {
                            replica.apply_request(other, now);
                        }
                    }
                }
            }
            Request::Character { character, request } => {
                let verdict = validate_character_request(
                    policy,
                    requester,
                    character,
                    self.server.character(character).map(Character::inventory),
                    &request,
                );
                if let Err(rejection) = verdict {
                    self.reject(from, name, &rejection);
                    return;
                }
                tracing::debug!(target: "runtime::session", client = %from, %character, request = name, "applying character request");
                let Some((replica, arsenal)) = self.server.character_and_arsenal(character) else {
                    return;
                };
                match request {
                    CharacterRequest::EquipWeapon(weapon) => {
                        replica.equip_weapon(arsenal, Some(weapon), now)
                    }
                    CharacterRequest::NextWeapon => replica.next_weapon(arsenal, now),
                    CharacterRequest::PreviousWeapon => replica.previous_weapon(arsenal, now),
                    CharacterRequest::SetOverlay(overlay) => {
                        replica.set_overlay_state(arsenal, overlay, now)
                    }
                    CharacterRequest::Move(input) => replica.apply_move_input(&input),
                }
            }
        }
    }

    fn reject(&mut self, client: ClientId, request: &str, rejection: &RequestRejection) {
        tracing::warn!(
            target: "runtime::session",
            %client,
            request,
            code = rejection.error_code(),
            severity = ?rejection.severity(),
            "rejected request: {rejection}"
        );
        self.events.publish(Event::Net(NetEvent::RequestRejected {
            client,
            request: request.to_owned(),
            code: rejection.error_code().to_owned(),
            reason: rejection.to_string(),
        }));
    }

    fn launch_projectile(&mut self, weapon: WeaponId, origin: Vec3, direction: Vec3) {
        let Some(replica) = self.server.arsenal().get(weapon) else {
            return;
        };
        let instigator = replica.owner();
        let config = replica.definition().projectile.clone();
        let projectile = self.projectiles.launch(
            &mut self.ids,
            instigator,
            weapon,
            origin,
            direction,
            config,
        );
        self.events
            .publish(Event::Combat(CombatEvent::ProjectileLaunched {
                projectile,
                instigator,
                weapon,
                origin,
                direction,
            }));
    }

    fn advance_projectiles(&mut self, delta_time: f32) {
        let bodies = self.server.character_bodies();
        let outcomes = {
            let world = self.scene.with_characters(&bodies);
            self.projectiles.step(delta_time, &world)
        };

        for outcome in outcomes {
            match outcome {
                ProjectileOutcome::Expired { projectile } => {
                    self.events
                        .publish(Event::Combat(CombatEvent::ProjectileExpired { projectile }));
                }
                ProjectileOutcome::Exploded {
                    projectile,
                    instigator,
                    location,
                    struck,
                    ..
                } => {
                    self.events
                        .publish(Event::Combat(CombatEvent::ProjectileExploded {
                            projectile,
                            location,
                            struck,
                        }));
                    for (id, body) in &bodies {
                        self.apply_explosion_damage(*id, instigator, outcome.damage_at(*body));
                    }
                }
            }
        }
    }

    fn apply_explosion_damage(
        &mut self,
        character: CharacterId,
        instigator: Option<CharacterId>,
        amount: f32,
    ) {
        if amount <= 0.0 {
            return;
        }
        let now = self.now;
        let Some((replica, arsenal)) = self.server.character_and_arsenal(character) else {
            return;
        };
        let was_alive = replica.is_alive();
        let taken = replica.apply_damage(arsenal, amount, now);
        if taken <= 0.0 {
            return;
        }
        let health = replica.health();
        let killed = was_alive && !replica.is_alive();

        tracing::debug!(target: "runtime::session", %character, taken, health, "damaged");
        self.events.publish(Event::Combat(CombatEvent::Damaged {
            character,
            instigator,
            amount: taken,
            health,
        }));
        if killed {
            tracing::info!(target: "runtime::session", %character, ?instigator, "killed");
            self.events
                .publish(Event::Combat(CombatEvent::Killed { character, instigator }));
        }
    }

    // ===== replication =====

    fn observer_for(&self, client: ClientId, character: Option<CharacterId>) -> Observer {
        match character {
            Some(character) if self.controllers.get(&character) == Some(&client) => Observer::Owner,
            _ => Observer::Other,
        }
    }

    fn send(&mut self, to: PeerId, message: ServerMessage) -> Result<()> {
        tracing::trace!(target: "runtime::net", %to, message = message.name(), "send");
        self.transport.send(to, &Envelope::Server(message))?;
        Ok(())
    }

    /// Sends `client` everything it needs to create replicas of a character
    /// and its weapons.
    fn send_character_snapshot(&mut self, client: ClientId, character: CharacterId) -> Result<()> {
        let to = PeerId::Client(client);
        let replica = self
            .server
            .character(character)
            .ok_or(RuntimeError::UnknownCharacter(character))?;
        let mut weapons: Vec<WeaponId> = replica.inventory().weapons().to_vec();
        if let Some(current) = replica.current_weapon() {
            if !weapons.contains(&current) {
                weapons.push(current);
            }
        }

        let mut messages = Vec::new();
        for weapon in weapons {
            let Some(weapon) = self.server.arsenal().get(weapon) else {
                continue;
            };
            let observer = self.observer_for(client, weapon.owner());
            messages.push(ServerMessage::SpawnWeapon {
                weapon: weapon.id(),
                definition: weapon.definition().name.clone(),
                autonomous: observer == Observer::Owner,
            });
            messages.push(ServerMessage::Weapon(weapon.collect_full_sync(observer)));
        }

        let observer = self.observer_for(client, Some(character));
        messages.push(ServerMessage::SpawnCharacter {
            character,
            location: replica.location(),
            rotation: replica.rotation(),
            autonomous: observer == Observer::Owner,
        });
        messages.push(ServerMessage::Character(replica.collect_full_sync(observer)));

        for message in messages {
            self.send(to, message)?;
        }
        Ok(())
    }

    fn clear_dirty_of(&mut self, character: CharacterId) {
        let Some((replica, arsenal)) = self.server.character_and_arsenal(character) else {
            return;
        };
        replica.clear_dirty();
        for weapon in replica.inventory().weapons() {
            if let Some(weapon) = arsenal.get_mut(*weapon) {
                weapon.clear_dirty();
            }
        }
    }

    /// Sends each client the dirty state it may observe, then forgets it.
    fn replicate(&mut self) -> Result<()> {
        let clients: Vec<ClientId> = self.clients.keys().copied().collect();
        let mut messages = Vec::new();
        for client in &clients {
            for weapon in self.server.arsenal().iter() {
                let sync = weapon.collect_sync(self.observer_for(*client, weapon.owner()));
                if !sync.is_empty() {
                    messages.push((*client, ServerMessage::Weapon(sync)));
                }
            }
            for character in self.server.characters() {
                let sync = character.collect_sync(self.observer_for(*client, Some(character.id())));
                if !sync.is_empty() {
                    messages.push((*client, ServerMessage::Character(sync)));
                }
            }
        }
        for (client, message) in messages {
            self.send(PeerId::Client(client), message)?;
        }

        for weapon in self.server.arsenal_mut().iter_mut() {
            weapon.clear_dirty();
        }
        let characters: Vec<CharacterId> = self.server.characters().map(Character::id).collect();
        for character in characters {
            if let Some((replica, _)) = self.server.character_and_arsenal(character) {
                replica.clear_dirty();
            }
        }
        Ok(())
    }
}

/// Requests a client sends this tick. Shots fired by its own character become
/// projectile requests aimed from the muzzle.
fn drain_client_output(peer: &mut Peer) -> (Vec<Request>, Vec<DrainedCue>) {
    let cues = peer.drain_cues();
    let Some(controlled) = peer.controlled() else {
        return (Vec::new(), cues);
    };
    let Some((character, arsenal)) = peer.character_and_arsenal(controlled) else {
        return (Vec::new(), cues);
    };

    let mut requests: Vec<Request> = character
        .take_requests()
        .into_iter()
        .map(|request| Request::Character {
            character: controlled,
            request,
        })
        .collect();

    for weapon in arsenal.iter_mut() {
        let owned = weapon.owner() == Some(controlled);
        let pending = weapon.take_requests();
        if owned {
            requests.extend(pending.into_iter().map(|request| Request::Weapon {
                weapon: weapon.id(),
                request,
            }));
        }
    }

    for cue in &cues {
        if cue.owner == Some(controlled) && matches!(cue.cue, WeaponCue::Shot { .. }) {
            requests.push(Request::Weapon {
                weapon: cue.weapon,
                request: WeaponRequest::FireProjectile {
                    origin: character.muzzle_location(),
                    direction: character.aim_direction(),
                },
            });
        }
    }
    (requests, cues)
}

fn publish_cues(events: &mut EventBus, peer: PeerId, cues: Vec<DrainedCue>, now: f32) {
    for DrainedCue { weapon, owner, cue } in cues {
        let event = match cue {
            WeaponCue::Equipped => Event::Inventory(InventoryEvent::Equipped {
                peer,
                character: owner,
                weapon,
            }),
            WeaponCue::Unequipped => Event::Inventory(InventoryEvent::Unequipped {
                peer,
                character: owner,
                weapon,
            }),
            cue => Event::Weapon(WeaponEvent {
                peer,
                weapon,
                owner,
                cue,
                time: now,
            }),
        };
        events.publish(event);
    }
}

fn apply_server_message(
    peer: &mut Peer,
    catalog: &WeaponCatalog,
    config: &RuntimeConfig,
    message: ServerMessage,
    now: f32,
) {
    match message {
        ServerMessage::SpawnWeapon {
            weapon,
            definition,
            autonomous,
        } => {
            let Some(definition) = catalog.get(&definition) else {
                tracing::warn!(target: "runtime::net", peer = %peer.id(), %weapon, %definition, "unknown weapon definition");
                return;
            };
            let role = if autonomous {
                NetRole::AutonomousProxy
            } else {
                NetRole::SimulatedProxy
            };
            peer.arsenal_mut()
                .insert(Weapon::new(weapon, definition, NetContext::proxy(role)));
        }
        ServerMessage::SpawnCharacter {
            character,
            location,
            rotation,
            autonomous,
        } => {
            let role = if autonomous {
                NetRole::AutonomousProxy
            } else {
                NetRole::SimulatedProxy
            };
            let spawn = CharacterSpawn {
                id: character,
                net: NetContext::proxy(role),
                locally_controlled: autonomous,
                location,
                rotation,
            };
            peer.insert_character(Character::new(spawn, &config.gameplay));
            if autonomous {
                peer.set_controlled(Some(character));
            }
        }
        ServerMessage::Weapon(sync) => match peer.arsenal_mut().get_mut(sync.weapon) {
            Some(weapon) => weapon.apply_sync(&sync, now),
            None => {
                tracing::warn!(target: "runtime::net", peer = %peer.id(), weapon = %sync.weapon, "sync for unknown weapon")
            }
        },
        ServerMessage::Character(sync) => match peer.character_and_arsenal(sync.character) {
            Some((character, arsenal)) => character.apply_sync(&sync, arsenal, now),
            None => {
                tracing::warn!(target: "runtime::net", peer = %peer.id(), character = %sync.character, "sync for unknown character")
            }
        },
        ServerMessage::DespawnCharacter(character) => {
            peer.remove_character(character);
        }
        ServerMessage::DespawnWeapon(weapon) => {
            peer.arsenal_mut().remove(weapon);
        }
    }
}
