//! End-to-end production chain scenarios driven through the public API.

use orbitfab_core::bottleneck::{BottleneckStage, summarize_bottlenecks, tightest_stage};
use orbitfab_core::command::{FactoryCommand, apply_command};
use orbitfab_core::facility::{Facility, FacilityType};
use orbitfab_core::recipe::RecipeId;
use orbitfab_core::resource::{ResourceId, STARTING_CASH};
use orbitfab_core::state::{FactoryState, create_default_state};
use orbitfab_core::test_utils::*;
use orbitfab_core::tick::{ThroughputTarget, tick};
use orbitfab_core::validation::{check_invariants, diff_states};

// -----------------------------------------------------------------------
// Concrete scenarios
// -----------------------------------------------------------------------

#[test]
fn chip_fab_over_one_cycle() {
    let state = single_facility_state(
        FacilityType::ChipFab,
        Facility::with_lines(1),
        inventory(&[(ResourceId::Cash, 100.0)]),
    );
    let result = tick(&state, 10.0, ThroughputTarget::new(1.0));
    assert_close(result.next_state.resource(ResourceId::Cash), 95.0);
    assert_close(result.next_state.resource(ResourceId::Chips), 10.0);
}

#[test]
fn chip_fab_short_on_cash() {
    let state = single_facility_state(
        FacilityType::ChipFab,
        Facility::with_lines(1),
        inventory(&[(ResourceId::Cash, 3.0)]),
    );
    let result = tick(&state, 10.0, ThroughputTarget::new(1.0));
    assert_eq!(result.next_state.resource(ResourceId::Cash), 0.0);
    assert_close(result.next_state.resource(ResourceId::Chips), 6.0);
}

#[test]
fn two_pods_integrated() {
    let state = apply_command(
        &single_facility_state(
            FacilityType::PodFactory,
            Facility::with_lines(1),
            inventory(&[
                (ResourceId::Cash, 500.0),
                (ResourceId::Chips, 500.0),
                (ResourceId::PodShells, 10.0),
            ]),
        ),
        &FactoryCommand::SelectRecipe {
            facility: FacilityType::PodFactory,
            recipe: RecipeId::IntegratePods,
        },
    )
    .unwrap();

    let result = tick(&state, 16.0, ThroughputTarget::new(2.0));
    assert_close(result.units_completed, 2.0);
    assert_close(result.next_state.units_built_total, 2.0);
    assert_close(result.next_state.units_ready_on_ground, 2.0);
    assert_eq!(result.launch_capacity_created, 0.0);
}

// -----------------------------------------------------------------------
// Longer runs
// -----------------------------------------------------------------------

#[test]
fn default_factory_runs_a_year_without_going_negative() {
    let mut state = create_default_state();
    let target = ThroughputTarget::new(2.0);
    for _ in 0..365 {
        let result = tick(&state, 1.0, target);
        assert!(check_invariants(&result.next_state).is_empty());
        state = result.next_state;
    }
    // The starting cash is finite and everything costs cash.
    assert!(state.resource(ResourceId::Cash) < STARTING_CASH);
    assert!(state.resource(ResourceId::Chips) >= 0.0);
}

#[test]
fn integrating_factory_completes_units_every_day() {
    let mut state = integrating_factory(2);
    let target = ThroughputTarget::new(5.0);
    let mut total = 0.0;
    for _ in 0..10 {
        let result = tick(&state, 1.0, target);
        assert!(result.units_completed > 0.0);
        total += result.units_completed;
        state = result.next_state;
    }
    assert_close(state.units_built_total, total);
    assert_close(state.units_ready_on_ground, total);
    // 2 lines * 30/8 per month * 10/30 months.
    assert_close(total, 2.5);
}

#[test]
fn one_long_tick_matches_many_short_ticks_when_unconstrained() {
    let start = integrating_factory(1);
    let target = ThroughputTarget::new(1.0);

    let long = tick(&start, 6.0, target).next_state;
    let mut short = start;
    for _ in 0..6 {
        short = tick(&short, 1.0, target).next_state;
    }

    for r in ResourceId::ALL {
        let (a, b) = (long.resource(r), short.resource(r));
        assert!((a - b).abs() < 1e-6, "{r}: {a} vs {b}");
    }
    assert!((long.units_built_total - short.units_built_total).abs() < 1e-9);
}

#[test]
fn replays_from_the_same_state_are_identical() {
    let run = |mut state: FactoryState| {
        for days in [3.0, 0.5, 11.0, 30.0, 2.25] {
            state = tick(&state, days, ThroughputTarget::new(4.0)).next_state;
        }
        state
    };
    let a = run(integrating_factory(3));
    let b = run(integrating_factory(3));
    assert!(diff_states(&a, &b).is_identical);
    assert_eq!(a.state_hash(), b.state_hash());
}

// -----------------------------------------------------------------------
// Bottlenecks
// -----------------------------------------------------------------------

#[test]
fn adding_chip_lines_moves_the_bottleneck() {
    let target = ThroughputTarget::new(4.0);
    let state = create_default_state();
    let before = summarize_bottlenecks(&state, target);
    assert_eq!(tightest_stage(&before).map(|s| s.stage), Some(BottleneckStage::Chips));

    let expanded = apply_command(
        &state,
        &FactoryCommand::AddLines {
            facility: FacilityType::ChipFab,
            count: 2,
        },
    )
    .unwrap();
    let after = summarize_bottlenecks(&expanded, target);
    // Chips now 9/month; pods at 3.75/month are the tightest.
    assert_eq!(tightest_stage(&after).map(|s| s.stage), Some(BottleneckStage::Pods));
}

#[test]
fn tick_bottlenecks_match_standalone_summary() {
    let state = create_default_state();
    let target = ThroughputTarget::new(3.0);
    let result = tick(&state, 12.0, target);
    assert_eq!(
        result.bottlenecks,
        summarize_bottlenecks(&result.next_state, target)
    );
}
