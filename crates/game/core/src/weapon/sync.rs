//! Weapon replication: per-observer sync collection on the authority and
//! replay on replicas.

use crate::net::{Observer, WEAPON_REPLICATION, WeaponFields, WeaponSync, visible_fields};

use super::machine::Weapon;

impl Weapon {
    /// Dirty fields `observer` may see, packed into a sync message.
    pub fn collect_sync(&self, observer: Observer) -> WeaponSync {
        self.sync_for(self.dirty, observer)
    }

    /// Every field `observer` may see, dirty or not. Used for new replicas.
    pub fn collect_full_sync(&self, observer: Observer) -> WeaponSync {
        self.sync_for(WeaponFields::all(), observer)
    }

    fn sync_for(&self, fields: WeaponFields, observer: Observer) -> WeaponSync {
        let visible = visible_fields(fields, WEAPON_REPLICATION, observer);
        WeaponSync {
            weapon: self.id(),
            owner: visible.contains(WeaponFields::OWNER).then_some(self.owner),
            ammo: visible
                .contains(WeaponFields::AMMO)
                .then(|| self.ledger.snapshot()),
            burst_counter: visible
                .contains(WeaponFields::BURST_COUNTER)
                .then_some(self.burst_counter),
            pending_reload: visible
                .contains(WeaponFields::PENDING_RELOAD)
                .then_some(self.pending_reload),
        }
    }

    /// Forgets dirty state once every observer has been sent its sync.
    pub fn clear_dirty(&mut self) {
        self.dirty = WeaponFields::empty();
    }

    /// Applies an authoritative update and replays the matching hooks. Only
    /// values that differ from the replica's own trigger a hook.
    pub fn apply_sync(&mut self, sync: &WeaponSync, now: f32) {
        if let Some(owner) = sync.owner {
            if owner != self.owner {
                self.on_rep_owner(owner, now);
            }
        }

        if let Some(ammo) = sync.ammo {
            self.ledger.apply_snapshot(ammo);
            self.reload_if_empty(now);
        }

        if let Some(burst_counter) = sync.burst_counter {
            if burst_counter != self.burst_counter {
                self.burst_counter = burst_counter;
                self.on_rep_burst_counter();
            }
        }

        if let Some(pending) = sync.pending_reload {
            if pending != self.pending_reload {
                self.on_rep_pending_reload(pending, now);
            }
        }
    }
}
