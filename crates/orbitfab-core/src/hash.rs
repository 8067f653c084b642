//! Deterministic state hashing for replay verification and desync checks.

use crate::state::FactoryState;

/// A simple deterministic hash of factory state for desync detection.
///
/// Uses FNV-1a (64-bit) for speed and simplicity. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    /// Start a new hash.
    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    /// Feed bytes into the hash.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    /// Feed an f64 by its bit pattern. `0.0` and `-0.0` hash differently.
    pub fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    /// Finalize and return the hash value.
    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

impl FactoryState {
    /// Hash every field that affects future ticks plus the unit counters.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        for (_, qty) in self.inventory.iter() {
            h.write_f64(qty);
        }
        for (_, f) in self.facilities.iter() {
            h.write_u32(f.count);
            h.write_u32(f.level);
            h.write_f64(f.efficiency);
        }
        for (_, active) in self.active_recipes.iter() {
            h.write_u32(active.recipe.index() as u32);
            h.write_f64(active.progress_days);
        }
        h.write_f64(self.units_built_total);
        h.write_f64(self.units_ready_on_ground);
        h.write_f64(self.units_built_this_tick);
        h.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::FacilityType;
    use crate::resource::ResourceId;
    use crate::state::create_default_state;

    #[test]
    fn state_hash_deterministic() {
        let mut h1 = StateHash::new();
        h1.write_u64(42);
        h1.write_u32(7);

        let mut h2 = StateHash::new();
        h2.write_u64(42);
        h2.write_u32(7);

        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn state_hash_order_matters() {
        let mut h1 = StateHash::new();
        h1.write_u32(1);
        h1.write_u32(2);

        let mut h2 = StateHash::new();
        h2.write_u32(2);
        h2.write_u32(1);

        assert_ne!(h1.finish(), h2.finish());
    }

    #[test]
    fn equal_states_hash_equal() {
        assert_eq!(
            create_default_state().state_hash(),
            create_default_state().state_hash()
        );
    }

    #[test]
    fn inventory_change_changes_hash() {
        let a = create_default_state();
        let mut b = a.clone();
        b.inventory.add(ResourceId::Chips, 1.0);
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn facility_change_changes_hash() {
        let a = create_default_state();
        let mut b = a.clone();
        b.facilities[FacilityType::RackLine].level = 2;
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
