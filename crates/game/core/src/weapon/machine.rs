//! Weapon fire/reload/equip state machine.
//!
//! Every peer holds its own replica of a weapon. The replica's [`NetContext`]
//! and [`OwnerStatus`] decide which half of each transition it runs:
//!
//! * the locally controlled replica predicts shots, spends ammo and forwards
//!   each transition to the authority as a [`WeaponRequest`];
//! * the authority performs the real ammo mutation and marks the replicated
//!   fields dirty;
//! * simulated replicas only replay cosmetics from replicated counters.
//!
//! Deferred transitions run through a [`TimerQueue`] drained by [`Weapon::tick`].

use std::sync::Arc;

use crate::ids::{CharacterId, WeaponId};
use crate::math::SMALL_NUMBER;
use crate::net::{NetContext, WeaponFields, WeaponRequest};
use crate::timer::{TimerHandle, TimerQueue};

use super::ammo::AmmoLedger;
use super::cue::{WeaponAction, WeaponCue};
use super::definition::WeaponDefinition;
use super::state::{OwnerStatus, WeaponState, WeaponTimer};

/// One replica of a weapon instance.
#[derive(Clone, Debug)]
pub struct Weapon {
    id: WeaponId,
    definition: Arc<WeaponDefinition>,
    net: NetContext,

    pub(super) owner: Option<CharacterId>,
    owner_status: OwnerStatus,
    pub(super) ledger: AmmoLedger,

    state: WeaponState,
    wants_to_fire: bool,
    pub(super) pending_reload: bool,
    /// Reload replayed from replication on a replica that cannot see ammo.
    replaying_reload: bool,
    pending_equip: bool,
    is_equipped: bool,
    refiring: bool,
    fx_active: bool,
    pub(super) burst_counter: u32,
    /// Rounds the authority spent on the owner's behalf that no projectile
    /// has claimed yet.
    unclaimed_shots: u32,

    /// `0.0` until the first shot.
    last_fire_time: f32,
    equip_started_time: f32,
    equip_duration: f32,
    timer_interval_adjustment: f32,

    timers: TimerQueue<WeaponTimer>,
    firing_timer: Option<TimerHandle>,
    stop_reload_timer: Option<TimerHandle>,
    reload_weapon_timer: Option<TimerHandle>,
    equip_timer: Option<TimerHandle>,

    pub(super) dirty: WeaponFields,
    cues: Vec<WeaponCue>,
    requests: Vec<WeaponRequest>,
}

impl Weapon {
    /// Spawns a fresh weapon with the definition's starting ammo.
    pub fn new(id: WeaponId, definition: Arc<WeaponDefinition>, net: NetContext) -> Self {
        let ledger = definition.initial_ledger();
        Self {
            id,
            definition,
            net,
            owner: None,
            owner_status: OwnerStatus::default(),
            ledger,
            state: WeaponState::Idle,
            wants_to_fire: false,
            pending_reload: false,
            replaying_reload: false,
            pending_equip: false,
            is_equipped: false,
            refiring: false,
            fx_active: false,
            burst_counter: 0,
            unclaimed_shots: 0,
            last_fire_time: 0.0,
            equip_started_time: 0.0,
            equip_duration: 0.0,
            timer_interval_adjustment: 0.0,
            timers: TimerQueue::new(),
            firing_timer: None,
            stop_reload_timer: None,
            reload_weapon_timer: None,
            equip_timer: None,
            dirty: WeaponFields::all(),
            cues: Vec::new(),
            requests: Vec::new(),
        }
    }

    // ===== accessors =====

    pub fn id(&self) -> WeaponId {
        self.id
    }

    pub fn definition(&self) -> &WeaponDefinition {
        &self.definition
    }

    pub fn net(&self) -> NetContext {
        self.net
    }

    pub fn owner(&self) -> Option<CharacterId> {
        self.owner
    }

    pub fn owner_status(&self) -> OwnerStatus {
        self.owner_status
    }

    pub fn ammo(&self) -> &AmmoLedger {
        &self.ledger
    }

    pub fn state(&self) -> WeaponState {
        self.state
    }

    pub fn wants_to_fire(&self) -> bool {
        self.wants_to_fire
    }

    pub fn is_pending_reload(&self) -> bool {
        self.pending_reload
    }

    pub fn is_pending_equip(&self) -> bool {
        self.pending_equip
    }

    pub fn is_equipped(&self) -> bool {
        self.is_equipped
    }

    /// Equipped or in the middle of equipping.
    pub fn is_attached(&self) -> bool {
        self.is_equipped || self.pending_equip
    }

    pub fn is_refiring(&self) -> bool {
        self.refiring
    }

    pub fn is_simulating_fire(&self) -> bool {
        self.fx_active
    }

    pub fn burst_counter(&self) -> u32 {
        self.burst_counter
    }

    pub fn unclaimed_shots(&self) -> u32 {
        self.unclaimed_shots
    }

    pub fn last_fire_time(&self) -> f32 {
        self.last_fire_time
    }

    pub fn timer_interval_adjustment(&self) -> f32 {
        self.timer_interval_adjustment
    }

    pub fn dirty_fields(&self) -> WeaponFields {
        self.dirty
    }

    /// Pending timer for `kind`, if any.
    pub fn timer_remaining(&self, kind: WeaponTimer, now: f32) -> Option<f32> {
        let handle = match kind {
            WeaponTimer::HandleFiring | WeaponTimer::HandleReFiring => self.firing_timer,
            WeaponTimer::StopReload => self.stop_reload_timer,
            WeaponTimer::ReloadWeapon => self.reload_weapon_timer,
            WeaponTimer::EquipFinished => self.equip_timer,
        }?;
        self.timers.remaining(handle, now)
    }

    /// Equip progress in `[0, 1]`: `1` when equipped, `0` when not equipping.
    pub fn equip_progress(&self, now: f32) -> f32 {
        if self.is_equipped {
            return 1.0;
        }
        if !self.pending_equip || self.equip_duration <= 0.0 {
            return 0.0;
        }
        ((now - self.equip_started_time) / self.equip_duration).clamp(0.0, 1.0)
    }

    // ===== host wiring =====

    /// Updates the view of the holding character.
    pub fn set_owner_status(&mut self, status: OwnerStatus) {
        self.owner_status = status;
    }

    /// Drains buffered cosmetic and notification cues.
    pub fn take_cues(&mut self) -> Vec<WeaponCue> {
        std::mem::take(&mut self.cues)
    }

    /// Drains requests bound for the authority.
    pub fn take_requests(&mut self) -> Vec<WeaponRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Runs every timer due at or before `now`.
    pub fn tick(&mut self, now: f32) {
        let cutoff = self.timers.cutoff();
        while let Some(timer) = self.timers.pop_due(now, cutoff) {
            match timer {
                WeaponTimer::HandleFiring => {
                    self.firing_timer = None;
                    self.handle_firing(now);
                }
                WeaponTimer::HandleReFiring => {
                    self.firing_timer = None;
                    self.handle_refiring(now);
                }
                WeaponTimer::StopReload => {
                    self.stop_reload_timer = None;
                    // A reload shorter than the transfer delay still loads.
                    if let Some(handle) = self.reload_weapon_timer.take() {
                        if self.timers.is_active(handle) {
                            self.timers.clear(handle);
                            self.reload_weapon();
                        }
                    }
                    self.stop_reload(now);
                }
                WeaponTimer::ReloadWeapon => {
                    self.reload_weapon_timer = None;
                    self.reload_weapon();
                }
                WeaponTimer::EquipFinished => {
                    self.equip_timer = None;
                    self.on_equip_finished(now);
                }
            }
        }
    }

    // ===== gates =====

    fn is_locally_controlled(&self) -> bool {
        self.owner.is_some() && self.owner_status.locally_controlled
    }

    fn plays_cosmetics(&self) -> bool {
        !self.net.dedicated_server
    }

    /// Owner alive, weapon ready, no reload pending and a round available.
    pub fn can_fire(&self) -> bool {
        let owner_can_fire = self.owner.is_some() && self.owner_status.alive;
        owner_can_fire && self.state.is_ready() && !self.pending_reload && self.ledger.has_ammo()
    }

    /// Owner alive (or none), clip not full with something to load, and the
    /// weapon ready.
    pub fn can_reload(&self) -> bool {
        let owner_can_reload = self.owner.is_none() || self.owner_status.alive;
        owner_can_reload && self.ledger.can_reload() && self.state.is_ready()
    }

    // ===== state resolution =====

    /// Recomputes the state from the equip, reload and trigger flags.
    pub fn determine_state(&mut self, now: f32) {
        let next = if self.is_equipped {
            if self.pending_reload {
                if self.replaying_reload || self.can_reload() {
                    WeaponState::Reloading
                } else {
                    self.state
                }
            } else if self.wants_to_fire && self.can_fire() {
                WeaponState::Firing
            } else {
                WeaponState::Idle
            }
        } else if self.pending_equip {
            WeaponState::Equipping
        } else {
            WeaponState::Idle
        };
        self.set_state(next, now);
    }

    fn set_state(&mut self, next: WeaponState, now: f32) {
        let previous = self.state;
        if previous == WeaponState::Firing && next != WeaponState::Firing {
            self.burst_finished();
        }
        self.state = next;
        if previous != WeaponState::Firing && next == WeaponState::Firing {
            self.burst_started(now);
        }
    }

    // ===== firing =====

    /// Trigger pressed.
    pub fn start_fire(&mut self, now: f32) {
        if !self.net.has_authority() {
            self.requests.push(WeaponRequest::StartFire);
        }
        if !self.wants_to_fire {
            self.wants_to_fire = true;
            self.determine_state(now);
            if self.state != WeaponState::Firing {
                self.on_fire_blocked(now);
            }
        }
    }

    /// Trigger released.
    pub fn stop_fire(&mut self, now: f32) {
        if !self.net.has_authority() && self.is_locally_controlled() {
            self.requests.push(WeaponRequest::StopFire);
        }
        if self.wants_to_fire {
            self.wants_to_fire = false;
            self.determine_state(now);
        }
    }

    fn on_fire_blocked(&mut self, now: f32) {
        let empty = !self.ledger.has_ammo();
        if !self.is_locally_controlled() || !self.is_equipped || self.pending_reload || !empty {
            return;
        }
        if self.can_reload() {
            self.start_reload(now, false);
        } else {
            self.cues.push(WeaponCue::OutOfAmmo);
        }
    }

    fn burst_started(&mut self, now: f32) {
        let interval = self.definition.time_between_shots;
        if self.last_fire_time > 0.0 && interval > 0.0 && self.last_fire_time + interval > now {
            let delay = self.last_fire_time + interval - now;
            self.set_firing_timer(now, delay, WeaponTimer::HandleFiring);
        } else {
            self.handle_firing(now);
        }
    }

    fn burst_finished(&mut self) {
        self.burst_counter = 0;
        self.dirty |= WeaponFields::BURST_COUNTER;
        if self.plays_cosmetics() {
            self.stop_simulating_fire();
        }
        if let Some(handle) = self.firing_timer.take() {
            self.timers.clear(handle);
        }
        self.refiring = false;
        self.timer_interval_adjustment = 0.0;
    }

    /// Fires one round if possible, otherwise reloads or ends the burst, then
    /// schedules the next shot of an automatic burst.
    pub fn handle_firing(&mut self, now: f32) {
        let local = self.is_locally_controlled();

        if self.ledger.has_ammo() && self.can_fire() {
            if self.plays_cosmetics() {
                self.simulate_fire();
            }
            if local {
                self.ledger.consume_round();
                self.burst_counter += 1;
                self.dirty |= WeaponFields::AMMO | WeaponFields::BURST_COUNTER;
                self.cues.push(WeaponCue::Shot {
                    burst_counter: self.burst_counter,
                });
            }
        } else if self.can_reload() {
            self.start_reload(now, false);
        } else if local {
            if self.ledger.in_clip() == 0 && !self.refiring {
                self.cues.push(WeaponCue::OutOfAmmo);
            }
            if self.burst_counter > 0 {
                self.burst_finished();
            }
        }

        if local {
            if !self.net.has_authority() {
                self.requests.push(WeaponRequest::HandleFiring);
            }
            if self.ledger.in_clip() == 0 && self.can_reload() {
                self.start_reload(now, false);
            }
        }

        if self.state == WeaponState::Firing && !self.can_fire() {
            self.determine_state(now);
        }

        if local {
            let interval = self.definition.time_between_shots;
            self.refiring = self.state == WeaponState::Firing && interval > 0.0;
            if self.refiring {
                let delay = (interval + self.timer_interval_adjustment).max(SMALL_NUMBER);
                self.set_firing_timer(now, delay, WeaponTimer::HandleReFiring);
                self.timer_interval_adjustment = 0.0;
            }
        }

        self.last_fire_time = now;
    }

    /// Refire tick of an automatic burst, absorbing frame overshoot when
    /// catch-up is enabled.
    pub fn handle_refiring(&mut self, now: f32) {
        let slack = (now - self.last_fire_time - self.definition.time_between_shots).max(0.0);
        if self.definition.automatic_catchup {
            self.timer_interval_adjustment -= slack;
        }
        self.handle_firing(now);
    }

    fn set_firing_timer(&mut self, now: f32, delay: f32, kind: WeaponTimer) {
        if let Some(handle) = self.firing_timer.take() {
            self.timers.clear(handle);
        }
        self.firing_timer = Some(self.timers.set(now, delay, kind));
    }

    fn simulate_fire(&mut self) {
        self.fx_active = true;
        self.cues.push(WeaponCue::SimulateFire);
    }

    fn stop_simulating_fire(&mut self) {
        if self.fx_active {
            self.fx_active = false;
            self.cues.push(WeaponCue::StopSimulatingFire);
        }
    }

    // ===== reloading =====

    /// Begins a reload. `from_replication` replays a reload the authority
    /// already accepted and skips the eligibility check.
    pub fn start_reload(&mut self, now: f32, from_replication: bool) {
        if !from_replication && !self.net.has_authority() {
            self.requests.push(WeaponRequest::StartReload);
        }
        if !from_replication && !self.can_reload() {
            return;
        }

        self.pending_reload = true;
        self.replaying_reload = from_replication;
        self.dirty |= WeaponFields::PENDING_RELOAD;
        self.determine_state(now);

        if self.definition.has_reload_animation() {
            self.cues.push(WeaponCue::PlayAnimation(WeaponAction::Reload));
        }

        self.clear_reload_timers();
        let duration = self.definition.reload_duration();
        self.stop_reload_timer = Some(self.timers.set(now, duration, WeaponTimer::StopReload));
        if self.net.has_authority() {
            let delay = self.definition.reload_transfer_delay();
            self.reload_weapon_timer = Some(self.timers.set(now, delay, WeaponTimer::ReloadWeapon));
        }

        if self.is_locally_controlled() {
            self.cues.push(WeaponCue::PlaySound(WeaponAction::Reload));
        }
    }

    /// Ends a reload. Ignored unless the weapon is reloading; a reload stopped
    /// before its ammo transfer loads nothing.
    pub fn stop_reload(&mut self, now: f32) {
        if self.state != WeaponState::Reloading {
            return;
        }
        self.pending_reload = false;
        self.replaying_reload = false;
        self.dirty |= WeaponFields::PENDING_RELOAD;
        self.clear_reload_timers();
        self.determine_state(now);
        self.cues.push(WeaponCue::StopAnimation(WeaponAction::Reload));
    }

    /// Moves ammo from reserve into the clip.
    pub fn reload_weapon(&mut self) {
        let added = self.ledger.transfer_reload();
        self.dirty |= WeaponFields::AMMO;
        self.cues.push(WeaponCue::Reloaded { added });
    }

    fn clear_reload_timers(&mut self) {
        if let Some(handle) = self.stop_reload_timer.take() {
            self.timers.clear(handle);
        }
        if let Some(handle) = self.reload_weapon_timer.take() {
            self.timers.clear(handle);
        }
    }

    /// Tops up reserve ammo on the authority; returns the rounds accepted.
    /// An empty current weapon held locally starts reloading right away.
    pub fn give_ammo(&mut self, amount: u32, now: f32) -> u32 {
        let added = self.ledger.give(amount);
        if added > 0 {
            self.dirty |= WeaponFields::AMMO;
        }
        self.reload_if_empty(now);
        added
    }

    pub(super) fn reload_if_empty(&mut self, now: f32) {
        if self.is_locally_controlled()
            && self.is_equipped
            && !self.pending_reload
            && self.ledger.in_clip() == 0
            && self.can_reload()
        {
            self.start_reload(now, false);
        }
    }

    // ===== equip =====

    /// Starts equipping. With no previously held weapon the equip completes
    /// immediately; otherwise it finishes after the equip duration.
    pub fn on_equip(&mut self, previous: Option<WeaponId>, now: f32) {
        self.cues.push(WeaponCue::Attached);
        self.pending_equip = true;
        self.determine_state(now);

        if previous.is_some() {
            if self
                .definition
                .equip_anim_duration
                .is_some_and(|duration| duration > 0.0)
            {
                self.cues.push(WeaponCue::PlayAnimation(WeaponAction::Equip));
            }
            let duration = self.definition.equip_duration();
            self.equip_started_time = now;
            self.equip_duration = duration;
            if let Some(handle) = self.equip_timer.take() {
                self.timers.clear(handle);
            }
            self.equip_timer = Some(self.timers.set(now, duration, WeaponTimer::EquipFinished));
        } else {
            self.on_equip_finished(now);
        }

        if self.is_locally_controlled() {
            self.cues.push(WeaponCue::PlaySound(WeaponAction::Equip));
        }
        self.cues.push(WeaponCue::Equipped);
    }

    /// Completes an equip.
    pub fn on_equip_finished(&mut self, now: f32) {
        self.is_equipped = true;
        self.pending_equip = false;
        self.determine_state(now);
        self.reload_if_empty(now);
    }

    /// Detaches and cancels any in-flight reload or equip. Ammo is untouched.
    pub fn on_unequip(&mut self, now: f32) {
        self.cues.push(WeaponCue::Detached);
        self.is_equipped = false;
        self.stop_fire(now);

        if self.pending_reload {
            self.cues.push(WeaponCue::StopAnimation(WeaponAction::Reload));
            self.pending_reload = false;
            self.replaying_reload = false;
            self.dirty |= WeaponFields::PENDING_RELOAD;
            self.clear_reload_timers();
        }

        if self.pending_equip {
            self.cues.push(WeaponCue::StopAnimation(WeaponAction::Equip));
            self.pending_equip = false;
            if let Some(handle) = self.equip_timer.take() {
                self.timers.clear(handle);
            }
        }

        self.cues.push(WeaponCue::Unequipped);
        self.determine_state(now);
    }

    // ===== inventory =====

    /// Bound to a new holder.
    pub fn on_enter_inventory(&mut self, owner: CharacterId) {
        if self.owner != Some(owner) {
            self.owner = Some(owner);
            self.dirty |= WeaponFields::OWNER;
        }
    }

    /// Released by its holder; detaches first if attached.
    pub fn on_leave_inventory(&mut self, now: f32) {
        if self.is_attached() {
            self.on_unequip(now);
        }
        if self.net.has_authority() {
            self.owner = None;
            self.dirty |= WeaponFields::OWNER;
        }
    }

    // ===== authority request handlers =====

    /// Applies a transition requested by the owning client. `FireProjectile`
    /// is resolved by the host and ignored here.
    pub fn apply_request(&mut self, request: WeaponRequest, now: f32) {
        match request {
            WeaponRequest::StartFire => self.start_fire(now),
            WeaponRequest::StopFire => self.stop_fire(now),
            WeaponRequest::StartReload => self.start_reload(now, false),
            WeaponRequest::StopReload => self.stop_reload(now),
            WeaponRequest::HandleFiring => self.server_handle_firing(now),
            WeaponRequest::FireProjectile { .. } => {}
        }
    }

    /// A shot the owning client already simulated. Ammo is only spent when the
    /// authority agrees a round was fireable.
    pub fn server_handle_firing(&mut self, now: f32) {
        let should_update_ammo = self.ledger.in_clip() > 0 && self.can_fire();

        self.handle_firing(now);

        if should_update_ammo {
            self.ledger.consume_round();
            self.unclaimed_shots += 1;
            self.burst_counter += 1;
            self.dirty |= WeaponFields::AMMO | WeaponFields::BURST_COUNTER;
            if self.state == WeaponState::Firing && !self.can_fire() {
                self.determine_state(now);
            }
        }
    }

    /// Pairs a projectile with a round spent by [`Self::server_handle_firing`].
    /// Returns `false` when no such round is left.
    pub fn claim_shot(&mut self) -> bool {
        if self.unclaimed_shots == 0 {
            return false;
        }
        self.unclaimed_shots -= 1;
        true
    }

    // ===== replication replay =====

    /// Burst counter arrived: positive drives looping effects on, zero off.
    pub(super) fn on_rep_burst_counter(&mut self) {
        if self.burst_counter > 0 {
            if self.plays_cosmetics() {
                self.simulate_fire();
            }
        } else {
            self.stop_simulating_fire();
        }
    }

    pub(super) fn on_rep_pending_reload(&mut self, pending: bool, now: f32) {
        if pending {
            self.start_reload(now, true);
        } else {
            self.stop_reload(now);
        }
    }

    pub(super) fn on_rep_owner(&mut self, owner: Option<CharacterId>, now: f32) {
        match owner {
            Some(owner) => self.on_enter_inventory(owner),
            None => {
                self.on_leave_inventory(now);
                self.owner = None;
            }
        }
    }
}
