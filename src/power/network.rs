use std::collections::BTreeSet;

use slotmap::new_key_type;

use super::conductor::EntityId;
use super::tier::Tier;

new_key_type! {
    /// Handle for a power network. Two networks are the same iff their ids are equal.
    pub struct NetworkId;
}

/// A connectivity group of same-tier conductors.
///
/// While `dirty` is false, `members` is exactly the grid-connected component
/// of same-tier conductors containing any one member. Once a member leaves
/// the network is marked dirty and its set is stale until regenerated.
#[derive(Debug, Clone)]
pub struct PowerNetwork {
    tier: Tier,
    members: BTreeSet<EntityId>,
    dirty: bool,
}

impl PowerNetwork {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            members: BTreeSet::new(),
            dirty: false,
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn members(&self) -> &BTreeSet<EntityId> {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    /// Adds a member; returns `false` if it was already present.
    pub(crate) fn insert(&mut self, id: EntityId) -> bool {
        self.members.insert(id)
    }

    /// Removes a member; returns `false` if it was not present.
    pub(crate) fn remove(&mut self, id: EntityId) -> bool {
        self.members.remove(&id)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Moves every member out, leaving this network empty.
    pub(crate) fn drain(&mut self) -> BTreeSet<EntityId> {
        std::mem::take(&mut self.members)
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn membership_is_unique() {
        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        let a = arena.insert(());

        let mut net = PowerNetwork::new(Tier::Medium);
        assert!(net.insert(a));
        assert!(!net.insert(a));
        assert_eq!(net.len(), 1);
        assert!(net.contains(a));
    }

    #[test]
    fn drain_empties_but_keeps_flags() {
        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        let a = arena.insert(());
        let b = arena.insert(());

        let mut net = PowerNetwork::new(Tier::High);
        net.insert(a);
        net.insert(b);
        net.mark_dirty();

        let drained = net.drain();
        assert_eq!(drained.len(), 2);
        assert!(net.is_empty());
        assert!(net.is_dirty());
        assert_eq!(net.tier(), Tier::High);
    }
}
