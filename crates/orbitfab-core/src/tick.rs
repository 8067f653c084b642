//! The tick integrator.
//!
//! A tick advances a [`FactoryState`] by an elapsed span of days. Facility
//! types are processed in [`FacilityType::ALL`] order against one working copy
//! of the inventory, so a later stage sees what earlier stages consumed and
//! produced during the same tick.
//!
//! For each facility type:
//!
//! 1. Skip if it has no lines or no efficiency.
//! 2. `batches_per_month = (30 / duration_days) * throughput_multiplier`.
//! 3. `ideal = batches_per_month * elapsed_days / 30`; skip if not positive.
//! 4. Cap by every input: `available / required_per_batch`, minimum wins.
//! 5. Subtract inputs, add outputs, credit completed units.
//!
//! Partial cycles do not carry over between ticks.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::bottleneck::{BottleneckSummary, summarize_bottlenecks};
use crate::facility::FacilityType;
use crate::recipe::{DAYS_PER_MONTH, RecipeId};
use crate::resource::ResourceId;
use crate::state::FactoryState;

// ---------------------------------------------------------------------------
// Inputs and results
// ---------------------------------------------------------------------------

/// Desired finished-unit output per month. Only used for utilization ratios.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThroughputTarget {
    pub units_per_month: f64,
}

impl ThroughputTarget {
    pub const fn new(units_per_month: f64) -> Self {
        Self { units_per_month }
    }
}

/// Why a facility ran fewer batches than its capacity allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StallReason {
    /// No lines, or zero efficiency.
    NoCapacity,
    /// The elapsed window yields no batches.
    NoTime,
    /// An input ran short; names the tightest one.
    MissingInputs(ResourceId),
    /// The bound recipe belongs to another facility type.
    RecipeMismatch,
}

/// What one facility did during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRun {
    pub facility: FacilityType,
    pub recipe: RecipeId,
    /// Batches the facility could run given capacity and time alone.
    pub ideal_batches: f64,
    /// Batches actually run after the input cap.
    pub actual_batches: f64,
    pub stall: Option<StallReason>,
}

/// The outcome of [`tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub next_state: FactoryState,
    pub units_completed: f64,
    pub launch_capacity_created: f64,
    pub bottlenecks: Vec<BottleneckSummary>,
    /// One entry per facility type, in processing order.
    pub runs: Vec<FacilityRun>,
}

// ---------------------------------------------------------------------------
// tick
// ---------------------------------------------------------------------------

/// Advance `state` by `elapsed_days`.
///
/// Never fails and never mutates `state`. Missing capacity, a zero or
/// negative window, or a recipe bound to the wrong facility all degrade to
/// zero output for the affected facility.
pub fn tick(state: &FactoryState, elapsed_days: f64, target: ThroughputTarget) -> TickResult {
    let mut next = state.clone();
    next.units_built_this_tick = 0.0;

    let mut units_completed = 0.0;
    let mut launch_capacity_created = 0.0;
    let mut runs = Vec::with_capacity(FacilityType::ALL.len());

    for facility_type in FacilityType::ALL {
        let run = run_facility(&mut next, facility_type, elapsed_days);

        if run.actual_batches > 0.0 {
            let recipe = run.recipe.recipe();
            launch_capacity_created += recipe.output(ResourceId::LaunchSlots) * run.actual_batches;

            let units = recipe.units_per_batch * run.actual_batches;
            if units > 0.0 {
                units_completed += units;
                next.units_built_this_tick += units;
                next.units_built_total += units;
                next.units_ready_on_ground += units;
            }
        }

        runs.push(run);
    }

    let bottlenecks = summarize_bottlenecks(&next, target);

    debug!(
        elapsed_days,
        units_completed, launch_capacity_created, "factory tick complete"
    );

    TickResult {
        next_state: next,
        units_completed,
        launch_capacity_created,
        bottlenecks,
        runs,
    }
}

/// Run one facility against the working inventory in `next`.
fn run_facility(next: &mut FactoryState, facility_type: FacilityType, elapsed_days: f64) -> FacilityRun {
    let facility = *next.facility(facility_type);
    let recipe = next.bound_recipe(facility_type);

    let mut run = FacilityRun {
        facility: facility_type,
        recipe: recipe.id,
        ideal_batches: 0.0,
        actual_batches: 0.0,
        stall: None,
    };

    if !facility.is_active() {
        trace!(facility = %facility_type, "no capacity, skipping");
        run.stall = Some(StallReason::NoCapacity);
        return run;
    }

    if recipe.facility != facility_type {
        warn!(
            facility = %facility_type,
            recipe = ?recipe.id,
            "bound recipe belongs to {}, facility produces nothing",
            recipe.facility
        );
        run.stall = Some(StallReason::RecipeMismatch);
        return run;
    }

    let ideal = recipe.batches_per_month(&facility) * (elapsed_days / DAYS_PER_MONTH);
    // Negated so a NaN window is skipped as well.
    if !(ideal > 0.0) {
        trace!(facility = %facility_type, elapsed_days, "empty window, skipping");
        run.stall = Some(StallReason::NoTime);
        return run;
    }
    run.ideal_batches = ideal;

    // Tightest input. A recipe without inputs is limited by capacity alone.
    let mut affordable = f64::INFINITY;
    let mut tightest = None;
    for &(resource, per_batch) in recipe.inputs {
        if per_batch <= 0.0 {
            continue;
        }
        let batches = next.inventory[resource] / per_batch;
        if batches < affordable {
            affordable = batches;
            tightest = Some(resource);
        }
    }

    let actual = ideal.min(affordable).max(0.0);
    if affordable < ideal {
        run.stall = tightest.map(StallReason::MissingInputs);
    }
    if !(actual > 0.0) {
        trace!(facility = %facility_type, ?tightest, "inputs exhausted, skipping");
        return run;
    }
    run.actual_batches = actual;

    for &(resource, per_batch) in recipe.inputs {
        if per_batch <= 0.0 {
            continue;
        }
        // `actual` never exceeds available / per_batch, so anything below
        // zero here is rounding residue.
        let remaining = next.inventory[resource] - per_batch * actual;
        next.inventory[resource] = remaining.max(0.0);
    }
    for &(resource, per_batch) in recipe.outputs {
        if per_batch <= 0.0 {
            continue;
        }
        next.inventory.add(resource, per_batch * actual);
    }

    debug!(
        facility = %facility_type,
        recipe = ?recipe.id,
        ideal,
        actual,
        "facility ran"
    );

    run
}
