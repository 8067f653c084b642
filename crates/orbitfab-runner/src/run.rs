//! Driving a scenario tick by tick.

use anyhow::{Context, Result};
use orbitfab_core::bottleneck::{
    BottleneckStage, BottleneckSummary, summarize_bottlenecks, tightest_stage,
};
use orbitfab_core::command::apply_command;
use orbitfab_core::replay::{ReplayCommand, ReplayLog};
use orbitfab_core::resource::ResourceId;
use orbitfab_core::state::FactoryState;
use orbitfab_core::tick::tick;
use orbitfab_data::Scenario;
use tracing::{debug, info};

/// What one tick did, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRecord {
    pub index: u32,
    /// Simulated day at the end of the tick.
    pub day: f64,
    pub units_completed: f64,
    pub units_built_total: f64,
    pub launch_capacity_created: f64,
    pub cash: f64,
    pub tightest: Option<BottleneckStage>,
}

/// The outcome of a full scenario run.
#[derive(Debug)]
pub struct RunOutcome {
    pub final_state: FactoryState,
    pub records: Vec<TickRecord>,
    pub bottlenecks: Vec<BottleneckSummary>,
    /// Every command and tick, with a hash after each step.
    pub log: ReplayLog,
}

impl RunOutcome {
    pub fn final_hash(&self) -> u64 {
        self.final_state.state_hash()
    }
}

/// Run `scenario` to completion. Scheduled commands are applied just before
/// the tick with the matching index.
pub fn run_scenario(scenario: &Scenario) -> Result<RunOutcome> {
    let mut state = scenario.initial_state.clone();
    let mut log = ReplayLog::new(&state);
    let mut records = Vec::with_capacity(scenario.ticks as usize);

    for index in 0..scenario.ticks {
        for command in scenario.commands_at(index) {
            state = apply_command(&state, command)
                .with_context(|| format!("scheduled command before tick {index} failed"))?;
            log.record_with_hash(ReplayCommand::Apply(command.clone()), state.state_hash());
        }

        let result = tick(&state, scenario.tick_days, scenario.target);
        log.record_with_hash(
            ReplayCommand::Tick {
                elapsed_days: scenario.tick_days,
                target: scenario.target,
            },
            result.next_state.state_hash(),
        );

        let record = TickRecord {
            index,
            day: f64::from(index + 1) * scenario.tick_days,
            units_completed: result.units_completed,
            units_built_total: result.next_state.units_built_total,
            launch_capacity_created: result.launch_capacity_created,
            cash: result.next_state.resource(ResourceId::Cash),
            tightest: tightest_stage(&result.bottlenecks).map(|s| s.stage),
        };
        debug!(
            tick = index,
            units = record.units_completed,
            cash = record.cash,
            "tick recorded"
        );
        records.push(record);
        state = result.next_state;
    }

    let bottlenecks = summarize_bottlenecks(&state, scenario.target);
    info!(
        scenario = %scenario.name,
        ticks = scenario.ticks,
        units = state.units_built_total,
        "scenario complete"
    );

    Ok(RunOutcome {
        final_state: state,
        records,
        bottlenecks,
        log,
    })
}
