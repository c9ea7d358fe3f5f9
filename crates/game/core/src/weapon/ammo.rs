//! Clip and reserve ammo bookkeeping.

use crate::net::AmmoSnapshot;

/// Clip and reserve counters for one weapon.
///
/// Invariants: `in_clip <= clip_capacity`, `reserve <= max_ammo`. Neither
/// counter can go negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoLedger {
    in_clip: u32,
    reserve: u32,
    clip_capacity: u32,
    max_ammo: u32,
    infinite_ammo: bool,
    infinite_clip: bool,
}

impl AmmoLedger {
    /// Creates a ledger holding `initial_clips` clips: one loaded, the rest in
    /// reserve (capped at `max_ammo`).
    pub fn new(
        clip_capacity: u32,
        max_ammo: u32,
        initial_clips: u32,
        infinite_ammo: bool,
        infinite_clip: bool,
    ) -> Self {
        let in_clip = if initial_clips > 0 { clip_capacity } else { 0 };
        let reserve = clip_capacity
            .saturating_mul(initial_clips.saturating_sub(1))
            .min(max_ammo);
        Self {
            in_clip,
            reserve,
            clip_capacity,
            max_ammo,
            infinite_ammo,
            infinite_clip,
        }
    }

    pub const fn in_clip(&self) -> u32 {
        self.in_clip
    }

    pub const fn reserve(&self) -> u32 {
        self.reserve
    }

    pub const fn clip_capacity(&self) -> u32 {
        self.clip_capacity
    }

    pub const fn max_ammo(&self) -> u32 {
        self.max_ammo
    }

    pub const fn infinite_ammo(&self) -> bool {
        self.infinite_ammo
    }

    pub const fn infinite_clip(&self) -> bool {
        self.infinite_clip
    }

    /// Total rounds carried, clip included.
    pub const fn total(&self) -> u32 {
        self.in_clip + self.reserve
    }

    /// A round can be fired without reloading.
    pub const fn has_ammo(&self) -> bool {
        self.in_clip > 0 || self.infinite_clip || self.infinite_ammo
    }

    pub const fn is_clip_full(&self) -> bool {
        self.in_clip >= self.clip_capacity
    }

    /// Clip not full and there is something to load.
    pub const fn can_reload(&self) -> bool {
        !self.is_clip_full() && (self.reserve > 0 || self.infinite_clip)
    }

    /// Spends one round from the clip. Infinite ammo never depletes.
    pub fn consume_round(&mut self) {
        if !self.infinite_ammo {
            self.in_clip = self.in_clip.saturating_sub(1);
        }
    }

    /// Rounds a reload would move into the clip.
    pub fn reload_delta(&self) -> u32 {
        let missing = self.clip_capacity.saturating_sub(self.in_clip);
        if self.infinite_clip {
            missing
        } else {
            missing.min(self.reserve)
        }
    }

    /// Moves rounds from reserve into the clip; returns how many were loaded.
    pub fn transfer_reload(&mut self) -> u32 {
        let delta = self.reload_delta();
        if delta == 0 {
            return 0;
        }
        self.in_clip += delta;
        if !self.infinite_clip && !self.infinite_ammo {
            self.reserve -= delta;
        }
        delta
    }

    /// Adds up to `amount` rounds to the reserve; returns what was accepted.
    pub fn give(&mut self, amount: u32) -> u32 {
        let missing = self.max_ammo.saturating_sub(self.reserve);
        let added = amount.min(missing);
        self.reserve += added;
        added
    }

    pub const fn snapshot(&self) -> AmmoSnapshot {
        AmmoSnapshot {
            in_clip: self.in_clip,
            reserve: self.reserve,
        }
    }

    /// Overwrites the counters with authoritative values, clamped to limits.
    pub fn apply_snapshot(&mut self, snapshot: AmmoSnapshot) {
        self.in_clip = snapshot.in_clip.min(self.clip_capacity);
        self.reserve = snapshot.reserve.min(self.max_ammo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_clip_loaded() {
        let ledger = AmmoLedger::new(30, 120, 4, false, false);
        assert_eq!(ledger.in_clip(), 30);
        assert_eq!(ledger.reserve(), 90);

        let capped = AmmoLedger::new(30, 60, 8, false, false);
        assert_eq!(capped.reserve(), 60);

        let empty = AmmoLedger::new(30, 60, 0, false, false);
        assert_eq!(empty.in_clip(), 0);
        assert_eq!(empty.reserve(), 0);
    }

    #[test]
    fn consume_never_underflows() {
        let mut ledger = AmmoLedger::new(2, 0, 1, false, false);
        for _ in 0..5 {
            ledger.consume_round();
        }
        assert_eq!(ledger.in_clip(), 0);
        assert!(!ledger.has_ammo());
    }

    #[test]
    fn reload_moves_only_what_reserve_holds() {
        let mut ledger = AmmoLedger::new(10, 100, 1, false, false);
        for _ in 0..7 {
            ledger.consume_round();
        }
        ledger.give(4);
        assert_eq!(ledger.reload_delta(), 4);
        assert_eq!(ledger.transfer_reload(), 4);
        assert_eq!(ledger.in_clip(), 7);
        assert_eq!(ledger.reserve(), 0);
        assert!(!ledger.can_reload());
    }

    #[test]
    fn infinite_clip_refills_without_reserve() {
        let mut ledger = AmmoLedger::new(5, 0, 1, false, true);
        ledger.consume_round();
        ledger.consume_round();
        assert!(ledger.can_reload());
        assert_eq!(ledger.transfer_reload(), 2);
        assert_eq!(ledger.in_clip(), 5);
        assert_eq!(ledger.reserve(), 0);
    }

    #[test]
    fn give_is_capped_by_max_ammo() {
        let mut ledger = AmmoLedger::new(10, 25, 2, false, false);
        assert_eq!(ledger.give(100), 15);
        assert_eq!(ledger.reserve(), 25);
    }
}
