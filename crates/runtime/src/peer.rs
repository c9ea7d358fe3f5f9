//! One participant's view of the session: its weapon and character replicas.

use std::collections::BTreeMap;

use gameplay_core::{
    AnimCurves, Arsenal, Character, CharacterId, NetContext, OwnerStatus, WeaponCue, WeaponId,
};

use crate::net::PeerId;

/// A cue drained from a weapon replica, tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrainedCue {
    pub weapon: WeaponId,
    pub owner: Option<CharacterId>,
    pub cue: WeaponCue,
}

#[derive(Debug)]
pub struct Peer {
    id: PeerId,
    net: NetContext,
    arsenal: Arsenal,
    characters: BTreeMap<CharacterId, Character>,
    /// Character this peer's player controls.
    controlled: Option<CharacterId>,
}

impl Peer {
    pub fn new(id: PeerId, net: NetContext) -> Self {
        Self {
            id,
            net,
            arsenal: Arsenal::new(),
            characters: BTreeMap::new(),
            controlled: None,
        }
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    pub fn net(&self) -> NetContext {
        self.net
    }

    pub fn arsenal(&self) -> &Arsenal {
        &self.arsenal
    }

    pub fn arsenal_mut(&mut self) -> &mut Arsenal {
        &mut self.arsenal
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn controlled(&self) -> Option<CharacterId> {
        self.controlled
    }

    pub fn controlled_character(&self) -> Option<&Character> {
        self.controlled.and_then(|id| self.characters.get(&id))
    }

    pub fn set_controlled(&mut self, character: Option<CharacterId>) {
        self.controlled = character;
    }

    pub fn insert_character(&mut self, character: Character) {
        self.characters.insert(character.id(), character);
    }

    pub fn remove_character(&mut self, id: CharacterId) -> Option<Character> {
        if self.controlled == Some(id) {
            self.controlled = None;
        }
        self.characters.remove(&id)
    }

    /// Splits the peer into a character and the arsenal it operates on.
    pub fn character_and_arsenal(
        &mut self,
        id: CharacterId,
    ) -> Option<(&mut Character, &mut Arsenal)> {
        let character = self.characters.get_mut(&id)?;
        Some((character, &mut self.arsenal))
    }

    /// Copies each owning character's liveness and control onto its weapons.
    pub fn refresh_owner_status(&mut self) {
        for weapon in self.arsenal.iter_mut() {
            let Some(owner) = weapon.owner() else {
                continue;
            };
            if let Some(character) = self.characters.get(&owner) {
                weapon.set_owner_status(OwnerStatus {
                    alive: character.is_alive(),
                    locally_controlled: character.is_locally_controlled(),
                });
            }
        }
    }

    /// Runs due weapon timers and the locomotion of every character.
    pub fn tick(&mut self, now: f32, delta_time: f32, curves: &dyn AnimCurves) {
        self.arsenal.tick(now);
        for character in self.characters.values_mut() {
            character.tick(delta_time, curves);
        }
    }

    pub fn drain_cues(&mut self) -> Vec<DrainedCue> {
        let mut drained = Vec::new();
        for weapon in self.arsenal.iter_mut() {
            let owner = weapon.owner();
            let id = weapon.id();
            drained.extend(weapon.take_cues().into_iter().map(|cue| DrainedCue {
                weapon: id,
                owner,
                cue,
            }));
        }
        drained
    }

    /// Character locations for collision queries.
    pub fn character_bodies(&self) -> Vec<(CharacterId, glam::Vec3)> {
        self.characters
            .values()
            .filter(|character| character.is_alive())
            .map(|character| (character.id(), character.location()))
            .collect()
    }
}
