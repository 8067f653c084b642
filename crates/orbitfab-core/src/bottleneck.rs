//! Per-stage utilization against a monthly unit target.
//!
//! Each stage's figure is the theoretical batch rate of its facility running
//! the stage's reference recipe, not inventory-constrained output. A stage
//! starved by its upstream neighbour still reports its full capacity, so the
//! numbers are optimistic for end-to-end flow diagnosis.

use serde::{Deserialize, Serialize};

use crate::facility::FacilityType;
use crate::recipe::{Recipe, RecipeId};
use crate::resource::ResourceId;
use crate::state::FactoryState;
use crate::tick::ThroughputTarget;

/// A production stage, in upstream-to-downstream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckStage {
    Chips,
    Racks,
    Pods,
    Launch,
}

impl BottleneckStage {
    pub const ALL: [BottleneckStage; 4] = [
        BottleneckStage::Chips,
        BottleneckStage::Racks,
        BottleneckStage::Pods,
        BottleneckStage::Launch,
    ];

    pub fn facility(self) -> FacilityType {
        match self {
            BottleneckStage::Chips => FacilityType::ChipFab,
            BottleneckStage::Racks => FacilityType::RackLine,
            BottleneckStage::Pods => FacilityType::PodFactory,
            BottleneckStage::Launch => FacilityType::LaunchComplex,
        }
    }

    /// The recipe the stage is measured by, independent of what the facility
    /// is currently bound to.
    pub fn reference_recipe(self) -> RecipeId {
        match self {
            BottleneckStage::Chips => RecipeId::MakeChips,
            BottleneckStage::Racks => RecipeId::BuildRacks,
            BottleneckStage::Pods => RecipeId::IntegratePods,
            BottleneckStage::Launch => RecipeId::PrepareLaunch,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BottleneckStage::Chips => "chips",
            BottleneckStage::Racks => "racks",
            BottleneckStage::Pods => "pods",
            BottleneckStage::Launch => "launch",
        }
    }
}

impl std::fmt::Display for BottleneckStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Capacity of one stage relative to the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckSummary {
    pub stage: BottleneckStage,
    pub required_per_month: f64,
    /// Theoretical batches per month.
    pub actual_per_month: f64,
    /// `actual / required`; see [`utilization`].
    pub utilization: f64,
    /// The reference-recipe input whose stock cannot cover one month of this
    /// stage's capacity. Informational; never affects `utilization`.
    pub limiting_resource: Option<ResourceId>,
}

/// `actual / target`, or 1/0 for a non-positive target depending on whether
/// the stage has any capacity.
pub fn utilization(actual: f64, target: f64) -> f64 {
    if target > 0.0 {
        actual / target
    } else if actual > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Summarize every stage of `state` against `target`.
///
/// Read-only and callable without ticking, e.g. to preview an upgrade.
/// Ignores upstream starvation; see the module docs.
pub fn summarize_bottlenecks(
    state: &FactoryState,
    target: ThroughputTarget,
) -> Vec<BottleneckSummary> {
    let required = target.units_per_month;
    BottleneckStage::ALL
        .iter()
        .map(|&stage| {
            let recipe = stage.reference_recipe().recipe();
            let actual = recipe.batches_per_month(state.facility(stage.facility()));
            BottleneckSummary {
                stage,
                required_per_month: required,
                actual_per_month: actual,
                utilization: utilization(actual, required),
                limiting_resource: limiting_resource(state, recipe, actual),
            }
        })
        .collect()
}

/// The input with the fewest months of stock, if that is under one month.
fn limiting_resource(state: &FactoryState, recipe: &Recipe, batches_per_month: f64) -> Option<ResourceId> {
    if !(batches_per_month > 0.0) {
        return None;
    }
    let mut tightest: Option<(ResourceId, f64)> = None;
    for &(resource, per_batch) in recipe.inputs {
        if per_batch <= 0.0 {
            continue;
        }
        let batches = state.inventory[resource] / per_batch;
        if batches < batches_per_month && tightest.is_none_or(|(_, best)| batches < best) {
            tightest = Some((resource, batches));
        }
    }
    tightest.map(|(resource, _)| resource)
}

/// The stage with the lowest utilization. Earlier stages win ties.
pub fn tightest_stage(summaries: &[BottleneckSummary]) -> Option<&BottleneckSummary> {
    summaries.iter().fold(None, |best, s| match best {
        Some(b) if b.utilization <= s.utilization => Some(b),
        _ => Some(s),
    })
}
