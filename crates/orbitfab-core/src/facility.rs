//! Facilities and the throughput model.
//!
//! A facility's effective parallel capacity is
//! `count * 1.5^(level - 1) * efficiency`. Each level above 1 multiplies
//! capacity by 1.5 rather than adding a fixed amount.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Per-level capacity multiplier.
pub const LEVEL_SCALING: f64 = 1.5;

// ---------------------------------------------------------------------------
// Facility types
// ---------------------------------------------------------------------------

/// The kind of production site. Exactly one [`Facility`] exists per type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    ChipFab,
    RackLine,
    PodFactory,
    FuelDepot,
    LaunchComplex,
}

impl FacilityType {
    pub const COUNT: usize = 5;

    /// Every facility type in tick processing order: fabrication, assembly
    /// line, unit integration, fuel, launch preparation.
    pub const ALL: [FacilityType; Self::COUNT] = [
        FacilityType::ChipFab,
        FacilityType::RackLine,
        FacilityType::PodFactory,
        FacilityType::FuelDepot,
        FacilityType::LaunchComplex,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FacilityType::ChipFab => "chip_fab",
            FacilityType::RackLine => "rack_line",
            FacilityType::PodFactory => "pod_factory",
            FacilityType::FuelDepot => "fuel_depot",
            FacilityType::LaunchComplex => "launch_complex",
        }
    }
}

impl std::fmt::Display for FacilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Facility
// ---------------------------------------------------------------------------

/// A production site: parallel lines, upgrade level, and efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Number of parallel lines.
    pub count: u32,
    /// Upgrade level, starting at 1.
    pub level: u32,
    /// Fraction of nominal output in `[0, 1]`.
    pub efficiency: f64,
}

impl Facility {
    /// The record a facility type has before anything is built: no lines,
    /// level 1, full efficiency.
    pub const fn idle() -> Self {
        Self {
            count: 0,
            level: 1,
            efficiency: 1.0,
        }
    }

    /// A level-1, full-efficiency facility with `count` lines.
    pub const fn with_lines(count: u32) -> Self {
        Self {
            count,
            level: 1,
            efficiency: 1.0,
        }
    }

    /// Whether this facility can produce anything at all.
    pub fn is_active(&self) -> bool {
        self.count > 0 && self.efficiency > 0.0
    }

    pub fn throughput_multiplier(&self) -> f64 {
        throughput_multiplier(self)
    }
}

impl Default for Facility {
    fn default() -> Self {
        Self::idle()
    }
}

/// Effective parallel batch capacity of a facility.
///
/// Never negative. Zero lines, zero efficiency, or a non-finite efficiency
/// all yield 0.
pub fn throughput_multiplier(facility: &Facility) -> f64 {
    let efficiency = facility.efficiency;
    // Written as a negated comparison so NaN lands here too.
    if facility.count == 0 || !(efficiency > 0.0) {
        return 0.0;
    }
    let efficiency = efficiency.min(1.0);
    let exponent = facility.level.saturating_sub(1).min(i32::MAX as u32) as i32;
    let level_factor = LEVEL_SCALING.powi(exponent);
    facility.count as f64 * level_factor * efficiency
}

// ---------------------------------------------------------------------------
// PerFacility
// ---------------------------------------------------------------------------

/// One value per [`FacilityType`], stored densely.
///
/// Every slot exists from construction, so lookups never miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerFacility<T>([T; FacilityType::COUNT]);

impl<T> PerFacility<T> {
    /// Build a table by calling `f` once per facility type, in order.
    pub fn from_fn(mut f: impl FnMut(FacilityType) -> T) -> Self {
        Self(std::array::from_fn(|i| f(FacilityType::ALL[i])))
    }

    /// Iterate `(type, value)` pairs in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (FacilityType, &T)> + '_ {
        FacilityType::ALL.iter().copied().zip(self.0.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FacilityType, &mut T)> + '_ {
        FacilityType::ALL.iter().copied().zip(self.0.iter_mut())
    }
}

impl<T> Index<FacilityType> for PerFacility<T> {
    type Output = T;

    fn index(&self, facility: FacilityType) -> &T {
        &self.0[facility.index()]
    }
}

impl<T> IndexMut<FacilityType> for PerFacility<T> {
    fn index_mut(&mut self, facility: FacilityType) -> &mut T {
        &mut self.0[facility.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn single_line_baseline() {
        assert_eq!(throughput_multiplier(&Facility::with_lines(1)), 1.0);
    }

    #[test]
    fn lines_scale_linearly() {
        assert_eq!(throughput_multiplier(&Facility::with_lines(4)), 4.0);
    }

    #[test]
    fn levels_scale_geometrically() {
        let f = Facility {
            count: 2,
            level: 3,
            efficiency: 1.0,
        };
        assert!(approx(throughput_multiplier(&f), 2.0 * 2.25));
    }

    #[test]
    fn efficiency_scales_and_clamps() {
        let half = Facility {
            count: 2,
            level: 1,
            efficiency: 0.5,
        };
        assert!(approx(throughput_multiplier(&half), 1.0));

        let over = Facility {
            count: 2,
            level: 1,
            efficiency: 3.0,
        };
        assert_eq!(throughput_multiplier(&over), 2.0);
    }

    #[test]
    fn degenerate_facilities_yield_zero() {
        assert_eq!(throughput_multiplier(&Facility::idle()), 0.0);
        for efficiency in [0.0, -1.0, f64::NAN] {
            let f = Facility {
                count: 3,
                level: 2,
                efficiency,
            };
            assert_eq!(throughput_multiplier(&f), 0.0, "efficiency {efficiency}");
        }
    }

    #[test]
    fn level_zero_treated_as_level_one() {
        let f = Facility {
            count: 1,
            level: 0,
            efficiency: 1.0,
        };
        assert_eq!(throughput_multiplier(&f), 1.0);
    }

    #[test]
    fn huge_level_saturates_without_panicking() {
        let f = Facility {
            count: 1,
            level: u32::MAX,
            efficiency: 1.0,
        };
        let m = throughput_multiplier(&f);
        assert!(m.is_infinite() && m > 0.0);
    }

    #[test]
    fn per_facility_iterates_in_processing_order() {
        let table = PerFacility::from_fn(|t| t.index());
        let order: Vec<FacilityType> = table.iter().map(|(t, _)| t).collect();
        assert_eq!(order, FacilityType::ALL.to_vec());
        for (t, &i) in table.iter() {
            assert_eq!(t.index(), i);
        }
    }

    #[test]
    fn per_facility_index_mut() {
        let mut table = PerFacility::from_fn(|_| Facility::idle());
        table[FacilityType::FuelDepot].count = 7;
        assert_eq!(table[FacilityType::FuelDepot].count, 7);
        assert_eq!(table[FacilityType::ChipFab].count, 0);
    }
}
