//! Character composition: locomotion, camera, inventory and health.
//!
//! A `Character` never owns its weapons. Every operation that touches a
//! weapon takes the peer's [`Arsenal`] so the weapon replicas stay addressable
//! by id on every peer.

use std::sync::Arc;

use glam::Vec3;

use crate::arsenal::Arsenal;
use crate::camera::{
    CameraBehaviorParams, CameraController, CameraPivotPolicy, CameraPose, CameraSubject,
};
use crate::collision::CollisionQuery;
use crate::config::{CharacterVariant, GameplayConfig};
use crate::ids::{CharacterId, IdAllocator, WeaponId};
use crate::inventory::{Inventory, InventoryError};
use crate::locomotion::{
    AnimCurves, AnimationFeed, LocomotionInput, LocomotionPolicy, LocomotionState,
    MovementSettingsTable, OverlayState, ViewMode,
};
use crate::math::{Rotator, v_interp_to};
use crate::net::{
    CHARACTER_REPLICATION, CharacterFields, CharacterRequest, CharacterSync, ModeSnapshot,
    MoveInput, MovementSnapshot, NetContext, Observer, visible_fields,
};
use crate::weapon::{OwnerStatus, Weapon, WeaponDefinition, WeaponState};

/// Speed at which the aim point follows the cursor point.
pub const AIM_POINT_INTERP_SPEED: f32 = 30.0;

/// Where and how a character replica comes into existence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterSpawn {
    pub id: CharacterId,
    pub net: NetContext,
    pub locally_controlled: bool,
    pub location: Vec3,
    pub rotation: Rotator,
}

/// One replica of a player character.
#[derive(Debug)]
pub struct Character {
    id: CharacterId,
    net: NetContext,
    locally_controlled: bool,
    variant: CharacterVariant,

    locomotion: LocomotionState,
    locomotion_policy: Box<dyn LocomotionPolicy>,
    movement: MovementSettingsTable,
    max_acceleration: f32,

    camera: CameraController,
    camera_policy: Box<dyn CameraPivotPolicy>,
    camera_params: CameraBehaviorParams,
    right_shoulder: bool,

    location: Vec3,
    velocity: Vec3,
    control_rotation: Rotator,
    current_acceleration: Vec3,
    /// Smoothed aim point.
    aim_location: Vec3,
    /// Raw aim point from input.
    control_location: Vec3,
    muzzle_offset: Vec3,

    inventory: Inventory,
    wants_to_fire: bool,
    fire_requires_aiming: bool,

    health: f32,
    max_health: f32,

    dirty: CharacterFields,
    requests: Vec<CharacterRequest>,
}

impl Character {
    pub fn new(spawn: CharacterSpawn, config: &GameplayConfig) -> Self {
        Self {
            id: spawn.id,
            net: spawn.net,
            locally_controlled: spawn.locally_controlled,
            variant: config.variant,
            locomotion: LocomotionState::new(spawn.rotation),
            locomotion_policy: config.locomotion_policy(),
            movement: config.movement.clone(),
            max_acceleration: config.character.max_acceleration,
            camera: CameraController::new(),
            camera_policy: config.camera_policy(),
            camera_params: config.camera_params().clone(),
            right_shoulder: true,
            location: spawn.location,
            velocity: Vec3::ZERO,
            control_rotation: spawn.rotation,
            current_acceleration: Vec3::ZERO,
            aim_location: spawn.location,
            control_location: spawn.location,
            muzzle_offset: config.character.muzzle_offset,
            inventory: Inventory::new(),
            wants_to_fire: false,
            fire_requires_aiming: config.character.fire_requires_aiming,
            health: config.character.max_health,
            max_health: config.character.max_health,
            dirty: CharacterFields::all(),
            requests: Vec::new(),
        }
    }

    // ===== accessors =====

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn net(&self) -> NetContext {
        self.net
    }

    pub fn is_locally_controlled(&self) -> bool {
        self.locally_controlled
    }

    pub fn variant(&self) -> CharacterVariant {
        self.variant
    }

    pub fn locomotion(&self) -> &LocomotionState {
        &self.locomotion
    }

    pub fn animation_feed(&self) -> AnimationFeed {
        AnimationFeed::from(&self.locomotion)
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn current_weapon(&self) -> Option<WeaponId> {
        self.inventory.current()
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn rotation(&self) -> Rotator {
        self.locomotion.rotation()
    }

    pub fn control_rotation(&self) -> Rotator {
        self.control_rotation
    }

    pub fn aim_location(&self) -> Vec3 {
        self.aim_location
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn wants_to_fire(&self) -> bool {
        self.wants_to_fire
    }

    pub fn right_shoulder(&self) -> bool {
        self.right_shoulder
    }

    pub fn dirty_fields(&self) -> CharacterFields {
        self.dirty
    }

    /// Projectile spawn point in world space.
    pub fn muzzle_location(&self) -> Vec3 {
        self.location + self.control_rotation.yaw_only().rotate_vector(self.muzzle_offset)
    }

    /// Direction shots travel in.
    pub fn aim_direction(&self) -> Vec3 {
        self.control_rotation.forward()
    }

    /// Drains requests bound for the authority.
    pub fn take_requests(&mut self) -> Vec<CharacterRequest> {
        std::mem::take(&mut self.requests)
    }

    fn owner_status(&self) -> OwnerStatus {
        OwnerStatus {
            alive: self.is_alive(),
            locally_controlled: self.locally_controlled,
        }
    }

    /// Pushes this character's liveness and control to every held weapon.
    pub fn sync_weapon_owner_status(&self, arsenal: &mut Arsenal) {
        let status = self.owner_status();
        for id in self.inventory.weapons() {
            if let Some(weapon) = arsenal.get_mut(*id) {
                weapon.set_owner_status(status);
            }
        }
        if let Some(current) = self.inventory.current() {
            if let Some(weapon) = arsenal.get_mut(current) {
                weapon.set_owner_status(status);
            }
        }
    }

    // ===== inventory =====

    /// Adds a weapon already present in `arsenal`. Authority only.
    pub fn add_weapon(&mut self, arsenal: &mut Arsenal, weapon: WeaponId) -> Result<(), InventoryError> {
        if !self.net.has_authority() {
            return Ok(());
        }
        let status = self.owner_status();
        let replica = arsenal
            .get_mut(weapon)
            .ok_or(InventoryError::NotFound(weapon))?;
        self.inventory.add(weapon)?;
        replica.on_enter_inventory(self.id);
        replica.set_owner_status(status);
        self.dirty |= CharacterFields::INVENTORY;
        Ok(())
    }

    /// Removes a weapon, detaching it first if held. Authority only.
    pub fn remove_weapon(
        &mut self,
        arsenal: &mut Arsenal,
        weapon: WeaponId,
        now: f32,
    ) -> Result<(), InventoryError> {
        if !self.net.has_authority() {
            return Ok(());
        }
        if !self.inventory.contains(weapon) {
            return Err(InventoryError::NotFound(weapon));
        }
        if let Some(replica) = arsenal.get_mut(weapon) {
            replica.on_leave_inventory(now);
        }
        let was_current = self.inventory.current() == Some(weapon);
        self.inventory.remove(weapon)?;
        self.dirty |= CharacterFields::INVENTORY;
        if was_current {
            self.dirty |= CharacterFields::CURRENT_WEAPON;
        }
        Ok(())
    }

    /// Spawns one weapon per definition, adds them in order and equips the
    /// first. Authority only; returns the new weapon ids.
    pub fn give_default_inventory(
        &mut self,
        arsenal: &mut Arsenal,
        definitions: &[Arc<WeaponDefinition>],
        ids: &mut IdAllocator,
        now: f32,
    ) -> Result<Vec<WeaponId>, InventoryError> {
        if !self.net.has_authority() {
            return Ok(Vec::new());
        }
        let mut spawned = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let id = ids.next_weapon();
            arsenal.insert(Weapon::new(id, Arc::clone(definition), self.net));
            if let Err(err) = self.add_weapon(arsenal, id) {
                arsenal.remove(id);
                return Err(err);
            }
            spawned.push(id);
        }
        if let Some(first) = self.inventory.first() {
            self.equip_weapon(arsenal, Some(first), now);
        }
        Ok(spawned)
    }

    /// Removes every weapon, last slot first, and drops them from `arsenal`.
    /// Authority only; returns the removed ids.
    pub fn destroy_inventory(&mut self, arsenal: &mut Arsenal, now: f32) -> Vec<WeaponId> {
        if !self.net.has_authority() {
            return Vec::new();
        }
        let mut removed = Vec::with_capacity(self.inventory.len());
        while let Some(weapon) = self.inventory.weapons().last().copied() {
            if self.remove_weapon(arsenal, weapon, now).is_err() {
                break;
            }
            arsenal.remove(weapon);
            removed.push(weapon);
        }
        removed
    }

    // ===== equip =====

    /// Makes `weapon` the held weapon. The authority swaps directly; other
    /// replicas ask the authority.
    pub fn equip_weapon(&mut self, arsenal: &mut Arsenal, weapon: Option<WeaponId>, now: f32) {
        if weapon == self.inventory.current() {
            return;
        }
        if self.net.has_authority() {
            let last = self.inventory.current();
            self.set_current_weapon(arsenal, weapon, last, now);
        } else if let Some(weapon) = weapon {
            self.requests.push(CharacterRequest::EquipWeapon(weapon));
        }
    }

    /// Unequips the previous weapon and equips `new`. The new weapon is bound
    /// to this character before its equip hook runs.
    pub fn set_current_weapon(
        &mut self,
        arsenal: &mut Arsenal,
        new: Option<WeaponId>,
        last: Option<WeaponId>,
        now: f32,
    ) {
        if self.net.has_authority() {
            if let Some(new) = new {
                if !self.inventory.contains(new) {
                    return;
                }
            }
        }

        let mut local_last = last;
        if new != self.inventory.current() {
            local_last = self.inventory.current();
        }

        if let Some(previous) = local_last {
            if let Some(replica) = arsenal.get_mut(previous) {
                replica.on_unequip(now);
            }
        }

        if self.net.has_authority() {
            if self.inventory.set_current(new).is_err() {
                return;
            }
        } else {
            self.inventory.observe_current(new);
        }
        self.dirty |= CharacterFields::CURRENT_WEAPON;

        if let Some(new) = new {
            let status = self.owner_status();
            if let Some(replica) = arsenal.get_mut(new) {
                replica.on_enter_inventory(self.id);
                replica.set_owner_status(status);
                replica.on_equip(last, now);
                if self.wants_to_fire {
                    replica.start_fire(now);
                }
            }
        }
    }

    /// Replica hook for a replicated current-weapon change.
    pub fn on_rep_current_weapon(&mut self, arsenal: &mut Arsenal, current: Option<WeaponId>, now: f32) {
        let last = self.inventory.current();
        self.set_current_weapon(arsenal, current, last, now);
    }

    fn current_weapon_state(&self, arsenal: &Arsenal) -> Option<WeaponState> {
        self.inventory
            .current()
            .and_then(|id| arsenal.get(id))
            .map(Weapon::state)
    }

    fn can_switch_weapon(&self, arsenal: &Arsenal) -> bool {
        self.inventory.len() >= 2 && self.current_weapon_state(arsenal) != Some(WeaponState::Equipping)
    }

    /// Cycles forward through the inventory. Ignored mid-equip.
    pub fn next_weapon(&mut self, arsenal: &mut Arsenal, now: f32) {
        if !self.net.has_authority() && self.inventory.is_empty() {
            self.requests.push(CharacterRequest::NextWeapon);
            return;
        }
        if !self.can_switch_weapon(arsenal) {
            return;
        }
        let next = match self.inventory.current() {
            Some(current) => self.inventory.next_after(current),
            None => self.inventory.first(),
        };
        self.equip_weapon(arsenal, next, now);
    }

    /// Cycles backward through the inventory. Ignored mid-equip.
    pub fn previous_weapon(&mut self, arsenal: &mut Arsenal, now: f32) {
        if !self.net.has_authority() && self.inventory.is_empty() {
            self.requests.push(CharacterRequest::PreviousWeapon);
            return;
        }
        if !self.can_switch_weapon(arsenal) {
            return;
        }
        let previous = match self.inventory.current() {
            Some(current) => self.inventory.previous_before(current),
            None => self.inventory.get(self.inventory.len() - 1),
        };
        self.equip_weapon(arsenal, previous, now);
    }

    // ===== weapon usage =====

    pub fn start_weapon_fire(&mut self, arsenal: &mut Arsenal, now: f32) {
        if self.wants_to_fire {
            return;
        }
        self.wants_to_fire = true;
        if let Some(weapon) = self.inventory.current().and_then(|id| arsenal.get_mut(id)) {
            weapon.start_fire(now);
        }
    }

    pub fn stop_weapon_fire(&mut self, arsenal: &mut Arsenal, now: f32) {
        if !self.wants_to_fire {
            return;
        }
        self.wants_to_fire = false;
        if let Some(weapon) = self.inventory.current().and_then(|id| arsenal.get_mut(id)) {
            weapon.stop_fire(now);
        }
    }

    /// Fire button pressed. Characters configured to fire only while aiming
    /// ignore the press in any other rotation mode.
    pub fn on_fire_pressed(&mut self, arsenal: &mut Arsenal, now: f32) {
        let aiming = self.locomotion.rotation_mode() == crate::locomotion::RotationMode::Aiming;
        if !self.fire_requires_aiming || aiming {
            self.start_weapon_fire(arsenal, now);
        }
    }

    pub fn reload(&mut self, arsenal: &mut Arsenal, now: f32) {
        if let Some(weapon) = self.inventory.current().and_then(|id| arsenal.get_mut(id)) {
            weapon.start_reload(now, false);
        }
    }

    // ===== overlay =====

    /// Weapon overlays hold the first inventory slot; every other overlay
    /// holsters.
    pub fn set_overlay_state(&mut self, arsenal: &mut Arsenal, overlay: OverlayState, now: f32) {
        if overlay == self.locomotion.overlay_state() {
            return;
        }
        self.locomotion.set_overlay_state(overlay);
        self.dirty |= CharacterFields::OVERLAY;
        if !self.net.has_authority() && self.locally_controlled {
            self.requests.push(CharacterRequest::SetOverlay(overlay));
        }

        if overlay.is_weapon_overlay() {
            if let Some(first) = self.inventory.first() {
                self.equip_weapon(arsenal, Some(first), now);
            }
        } else {
            self.equip_weapon(arsenal, None, now);
        }
    }

    // ===== movement =====

    /// Applies controller input. The owning client forwards it to the
    /// authority.
    pub fn apply_move_input(&mut self, input: &MoveInput) {
        self.velocity = input.velocity;
        self.current_acceleration = input.acceleration;
        self.control_rotation = input.control_rotation;
        if let Some(point) = input.aim_point {
            self.set_aim_point(point);
        }

        self.locomotion.set_desired_gait(input.desired_gait);
        self.locomotion.set_stance(input.stance);
        self.locomotion.set_desired_rotation_mode(input.rotation_mode);
        self.locomotion.set_view_mode(input.view_mode);
        if !self.locally_controlled {
            self.locomotion
                .apply_replicated_inputs(self.control_rotation, self.current_acceleration);
        }

        self.dirty |= CharacterFields::CONTROL_ROTATION
            | CharacterFields::ACCELERATION
            | CharacterFields::MODES;

        if !self.net.has_authority() && self.locally_controlled {
            self.requests.push(CharacterRequest::Move(*input));
        }
    }

    /// Turns the character toward a ground point it aims at.
    fn set_aim_point(&mut self, point: Vec3) {
        let delta = point - self.location;
        if delta.truncate().length_squared() > 0.0 {
            let yaw = Rotator::from_direction(delta).yaw;
            self.control_rotation = Rotator::new(0.0, yaw, 0.0);
        }
        self.control_location = point;
    }

    pub fn set_right_shoulder(&mut self, right_shoulder: bool) {
        self.right_shoulder = right_shoulder;
    }

    /// Integrates velocity and runs the locomotion blender.
    pub fn tick(&mut self, delta_time: f32, curves: &dyn AnimCurves) {
        if delta_time <= 0.0 {
            return;
        }
        if self.net.has_authority() || self.locally_controlled {
            self.location += self.velocity * delta_time;
        }
        self.aim_location = v_interp_to(
            self.aim_location,
            self.control_location,
            delta_time,
            AIM_POINT_INTERP_SPEED,
        );

        let rotation_before = self.locomotion.rotation();
        let settings = self
            .movement
            .get(self.locomotion.rotation_mode(), self.locomotion.stance());
        let input = LocomotionInput {
            velocity: self.velocity,
            current_acceleration: self.current_acceleration,
            max_acceleration: self.max_acceleration,
            control_rotation: self.control_rotation,
            delta_time,
            locally_controlled: self.locally_controlled,
        };
        self.locomotion
            .tick(&input, settings, self.locomotion_policy.as_ref(), curves);

        if self.velocity != Vec3::ZERO || self.locomotion.rotation() != rotation_before {
            self.dirty |= CharacterFields::MOVEMENT;
        }
    }

    /// Runs the camera behavior for this frame.
    pub fn update_camera(&mut self, delta_time: f32, world: &dyn CollisionQuery) -> CameraPose {
        let subject = CameraSubject {
            location: self.location,
            rotation: self.locomotion.rotation(),
            control_rotation: self.control_rotation,
            aim_location: self.aim_location,
            right_shoulder: self.right_shoulder,
        };
        let targets = self.camera_policy.targets(&subject);
        let mut params = self.camera_params.clone();
        if self.locomotion.view_mode() == ViewMode::FirstPerson {
            params.first_person_weight = 1.0;
        }
        self.camera
            .update(&targets, &params, delta_time, world, Some(self.id))
    }

    // ===== health =====

    /// Applies damage on the authority and returns the amount taken. A killed
    /// character stops firing.
    pub fn apply_damage(&mut self, arsenal: &mut Arsenal, amount: f32, now: f32) -> f32 {
        if !self.net.has_authority() || !self.is_alive() || amount <= 0.0 {
            return 0.0;
        }
        let taken = amount.min(self.health);
        self.health -= taken;
        self.dirty |= CharacterFields::HEALTH;
        if !self.is_alive() {
            self.on_death(arsenal, now);
        }
        taken
    }

    fn on_death(&mut self, arsenal: &mut Arsenal, now: f32) {
        self.stop_weapon_fire(arsenal, now);
        self.sync_weapon_owner_status(arsenal);
    }

    // ===== replication =====

    /// Dirty fields `observer` may see, packed into a sync message.
    pub fn collect_sync(&self, observer: Observer) -> CharacterSync {
        self.sync_for(self.dirty, observer)
    }

    /// Every field `observer` may see. Used for new replicas.
    pub fn collect_full_sync(&self, observer: Observer) -> CharacterSync {
        self.sync_for(CharacterFields::all(), observer)
    }

    fn sync_for(&self, fields: CharacterFields, observer: Observer) -> CharacterSync {
        let visible = visible_fields(fields, CHARACTER_REPLICATION, observer);
        let mut sync = CharacterSync::empty(self.id);
        if visible.contains(CharacterFields::INVENTORY) {
            sync.inventory = Some(self.inventory.weapons().to_vec());
        }
        if visible.contains(CharacterFields::CURRENT_WEAPON) {
            sync.current_weapon = Some(self.inventory.current());
        }
        if visible.contains(CharacterFields::MOVEMENT) {
            sync.movement = Some(MovementSnapshot {
                location: self.location,
                velocity: self.velocity,
                rotation: self.locomotion.rotation(),
            });
        }
        if visible.contains(CharacterFields::CONTROL_ROTATION) {
            sync.control_rotation = Some(self.control_rotation);
        }
        if visible.contains(CharacterFields::ACCELERATION) {
            sync.acceleration = Some(self.current_acceleration);
        }
        if visible.contains(CharacterFields::MODES) {
            sync.modes = Some(ModeSnapshot {
                desired_gait: self.locomotion.desired_gait(),
                stance: self.locomotion.stance(),
                rotation_mode: self.locomotion.desired_rotation_mode(),
                view_mode: self.locomotion.view_mode(),
            });
        }
        if visible.contains(CharacterFields::OVERLAY) {
            sync.overlay = Some(self.locomotion.overlay_state());
        }
        if visible.contains(CharacterFields::HEALTH) {
            sync.health = Some(self.health);
        }
        sync
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = CharacterFields::empty();
    }

    /// Applies an authoritative update and replays the matching hooks.
    pub fn apply_sync(&mut self, sync: &CharacterSync, arsenal: &mut Arsenal, now: f32) {
        if let Some(weapons) = &sync.inventory {
            self.inventory.replace_with(weapons);
            self.sync_weapon_owner_status(arsenal);
        }

        if let Some(current) = sync.current_weapon {
            if current != self.inventory.current() {
                self.on_rep_current_weapon(arsenal, current, now);
            }
        }

        if let Some(movement) = sync.movement {
            self.location = movement.location;
            self.velocity = movement.velocity;
            if !self.locally_controlled {
                self.locomotion.set_rotation(movement.rotation);
            }
        }

        if let Some(control_rotation) = sync.control_rotation {
            self.control_rotation = control_rotation;
        }
        if let Some(acceleration) = sync.acceleration {
            self.current_acceleration = acceleration;
        }
        if sync.control_rotation.is_some() || sync.acceleration.is_some() {
            self.locomotion
                .apply_replicated_inputs(self.control_rotation, self.current_acceleration);
        }

        if let Some(modes) = sync.modes {
            self.locomotion.set_desired_gait(modes.desired_gait);
            self.locomotion.set_stance(modes.stance);
            self.locomotion.set_desired_rotation_mode(modes.rotation_mode);
            self.locomotion.set_view_mode(modes.view_mode);
        }

        if let Some(overlay) = sync.overlay {
            self.locomotion.set_overlay_state(overlay);
        }

        if let Some(health) = sync.health {
            if health != self.health {
                self.health = health;
                self.sync_weapon_owner_status(arsenal);
                if !self.is_alive() {
                    self.stop_weapon_fire(arsenal, now);
                }
            }
        }
    }
}
