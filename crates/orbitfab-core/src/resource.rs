use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

/// Cash balance every new factory starts with.
pub const STARTING_CASH: f64 = 100.0;

// ---------------------------------------------------------------------------
// Resource identifiers
// ---------------------------------------------------------------------------

/// A fungible resource tracked in the factory inventory.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceId {
    Cash,
    Chips,
    Racks,
    PodShells,
    LaunchSlots,
    Fuel,
    RdPoints,
}

impl ResourceId {
    pub const COUNT: usize = 7;

    /// Every resource, in declaration order.
    pub const ALL: [ResourceId; Self::COUNT] = [
        ResourceId::Cash,
        ResourceId::Chips,
        ResourceId::Racks,
        ResourceId::PodShells,
        ResourceId::LaunchSlots,
        ResourceId::Fuel,
        ResourceId::RdPoints,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name, matching the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            ResourceId::Cash => "cash",
            ResourceId::Chips => "chips",
            ResourceId::Racks => "racks",
            ResourceId::PodShells => "pod_shells",
            ResourceId::LaunchSlots => "launch_slots",
            ResourceId::Fuel => "fuel",
            ResourceId::RdPoints => "rd_points",
        }
    }

    /// Inverse of [`ResourceId::name`].
    pub fn from_name(name: &str) -> Option<ResourceId> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Quantity of every resource, indexed by [`ResourceId`].
///
/// Stored as a dense array; serialized as a `resource -> quantity` map so
/// persisted states stay readable. Resources missing from a map deserialize
/// as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<ResourceId, f64>",
    into = "BTreeMap<ResourceId, f64>"
)]
pub struct Inventory {
    amounts: [f64; ResourceId::COUNT],
}

impl Inventory {
    /// An inventory with every resource at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, resource: ResourceId, quantity: f64) -> Self {
        self.set(resource, quantity);
        self
    }

    #[inline]
    pub fn get(&self, resource: ResourceId) -> f64 {
        self.amounts[resource.index()]
    }

    #[inline]
    pub fn set(&mut self, resource: ResourceId, quantity: f64) {
        self.amounts[resource.index()] = quantity;
    }

    /// Add `delta` (which may be negative) to a resource.
    #[inline]
    pub fn add(&mut self, resource: ResourceId, delta: f64) {
        self.amounts[resource.index()] += delta;
    }

    /// Iterate `(resource, quantity)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, f64)> + '_ {
        ResourceId::ALL.iter().map(move |&r| (r, self.get(r)))
    }

    /// True when every quantity is finite and `>= 0`.
    pub fn is_non_negative(&self) -> bool {
        self.amounts.iter().all(|q| q.is_finite() && *q >= 0.0)
    }
}

impl Index<ResourceId> for Inventory {
    type Output = f64;

    fn index(&self, resource: ResourceId) -> &f64 {
        &self.amounts[resource.index()]
    }
}

impl IndexMut<ResourceId> for Inventory {
    fn index_mut(&mut self, resource: ResourceId) -> &mut f64 {
        &mut self.amounts[resource.index()]
    }
}

impl From<BTreeMap<ResourceId, f64>> for Inventory {
    fn from(map: BTreeMap<ResourceId, f64>) -> Self {
        let mut inv = Inventory::new();
        for (resource, quantity) in map {
            inv.set(resource, quantity);
        }
        inv
    }
}

impl From<Inventory> for BTreeMap<ResourceId, f64> {
    fn from(inv: Inventory) -> Self {
        inv.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_inventory_is_zeroed() {
        let inv = Inventory::new();
        for r in ResourceId::ALL {
            assert_eq!(inv[r], 0.0);
        }
        assert!(inv.is_non_negative());
    }

    #[test]
    fn all_matches_index_order() {
        for (i, r) in ResourceId::ALL.iter().enumerate() {
            assert_eq!(r.index(), i);
        }
    }

    #[test]
    fn names_round_trip() {
        for r in ResourceId::ALL {
            assert_eq!(ResourceId::from_name(r.name()), Some(r));
        }
        assert_eq!(ResourceId::from_name("unobtainium"), None);
    }

    #[test]
    fn with_and_add() {
        let mut inv = Inventory::new().with(ResourceId::Cash, 10.0);
        inv.add(ResourceId::Cash, -4.0);
        inv.add(ResourceId::Fuel, 2.5);
        assert_eq!(inv.get(ResourceId::Cash), 6.0);
        assert_eq!(inv[ResourceId::Fuel], 2.5);
    }

    #[test]
    fn negative_quantity_is_flagged() {
        let inv = Inventory::new().with(ResourceId::Chips, -0.5);
        assert!(!inv.is_non_negative());
    }

    #[test]
    fn nan_quantity_is_flagged() {
        let inv = Inventory::new().with(ResourceId::Chips, f64::NAN);
        assert!(!inv.is_non_negative());
    }

    #[test]
    fn serializes_as_named_map() {
        let inv = Inventory::new()
            .with(ResourceId::Cash, 100.0)
            .with(ResourceId::PodShells, 2.0);
        let json = serde_json::to_string(&inv).unwrap();
        assert!(json.contains("\"cash\":100.0"), "got: {json}");
        assert!(json.contains("\"pod_shells\":2.0"), "got: {json}");
    }

    #[test]
    fn missing_resources_deserialize_as_zero() {
        let inv: Inventory = serde_json::from_str(r#"{"fuel": 12.0}"#).unwrap();
        assert_eq!(inv[ResourceId::Fuel], 12.0);
        assert_eq!(inv[ResourceId::Cash], 0.0);
    }

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(ResourceId::LaunchSlots.to_string(), "launch_slots");
    }
}
