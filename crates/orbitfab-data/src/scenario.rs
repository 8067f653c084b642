//! Resolution of scenario data into a ready-to-run factory.

use std::path::{Path, PathBuf};

use orbitfab_core::command::FactoryCommand;
use orbitfab_core::facility::{Facility, FacilityType};
use orbitfab_core::recipe::default_recipe;
use orbitfab_core::resource::{Inventory, ResourceId};
use orbitfab_core::state::{ActiveRecipe, FactoryState, create_default_state};
use orbitfab_core::tick::ThroughputTarget;
use tracing::{debug, warn};

use crate::loader::{DataLoadError, deserialize_file};
use crate::schema::{FacilityData, ScenarioData, ScheduledCommand};

/// A validated scenario: the starting state plus how to drive it.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub initial_state: FactoryState,
    pub target: ThroughputTarget,
    pub tick_days: f64,
    pub ticks: u32,
    /// Sorted by `at_tick`; commands for the same tick keep file order.
    pub schedule: Vec<ScheduledCommand>,
}

impl Scenario {
    /// Commands to apply just before tick `index`, in order.
    pub fn commands_at(&self, index: u32) -> impl Iterator<Item = &FactoryCommand> {
        self.schedule
            .iter()
            .filter(move |s| s.at_tick == index)
            .map(|s| &s.command)
    }

    /// Resolve and validate `data`. `file` is only used in errors.
    pub fn from_data(data: ScenarioData, file: &Path) -> Result<Self, DataLoadError> {
        let invalid = |field: &'static str, detail: String| DataLoadError::InvalidValue {
            file: file.to_path_buf(),
            field,
            detail,
        };

        if !(data.tick_days > 0.0 && data.tick_days.is_finite()) {
            return Err(invalid(
                "tick_days",
                format!("must be positive, got {}", data.tick_days),
            ));
        }
        if !(data.target_units_per_month >= 0.0 && data.target_units_per_month.is_finite()) {
            return Err(invalid(
                "target_units_per_month",
                format!("must be non-negative, got {}", data.target_units_per_month),
            ));
        }

        let mut state = create_default_state();
        if let Some(amounts) = &data.inventory {
            state.inventory = resolve_inventory(amounts.iter(), file)?;
        }
        apply_facilities(&mut state, &data.facilities, file)?;

        let mut schedule = data.schedule;
        schedule.sort_by_key(|s| s.at_tick);
        for s in schedule.iter().filter(|s| s.at_tick >= data.ticks) {
            warn!(
                scenario = %data.name,
                at_tick = s.at_tick,
                ticks = data.ticks,
                "scheduled command falls after the last tick and will never run"
            );
        }

        debug!(scenario = %data.name, ticks = data.ticks, "scenario resolved");

        Ok(Scenario {
            name: data.name,
            description: data.description,
            initial_state: state,
            target: ThroughputTarget::new(data.target_units_per_month),
            tick_days: data.tick_days,
            ticks: data.ticks,
            schedule,
        })
    }
}

/// Load, resolve, and validate the scenario at `path`.
pub fn load_scenario(path: &Path) -> Result<Scenario, DataLoadError> {
    let data: ScenarioData = deserialize_file(path)?;
    Scenario::from_data(data, path)
}

fn resolve_inventory<'a>(
    amounts: impl Iterator<Item = (&'a String, &'a f64)>,
    file: &Path,
) -> Result<Inventory, DataLoadError> {
    let mut inventory = Inventory::new();
    for (name, &quantity) in amounts {
        let resource = ResourceId::from_name(name).ok_or_else(|| DataLoadError::UnresolvedRef {
            file: file.to_path_buf(),
            name: name.clone(),
            expected_kind: "resource",
        })?;
        if !(quantity >= 0.0 && quantity.is_finite()) {
            return Err(DataLoadError::InvalidValue {
                file: file.to_path_buf(),
                field: "inventory",
                detail: format!("{resource} must be non-negative, got {quantity}"),
            });
        }
        inventory.set(resource, quantity);
    }
    Ok(inventory)
}

fn apply_facilities(
    state: &mut FactoryState,
    facilities: &[FacilityData],
    file: &Path,
) -> Result<(), DataLoadError> {
    let mut seen = [false; FacilityType::COUNT];
    for entry in facilities {
        let facility = entry.facility;
        if std::mem::replace(&mut seen[facility.index()], true) {
            return Err(DataLoadError::DuplicateFacility {
                file: file.to_path_buf(),
                facility,
            });
        }
        if entry.level == 0 {
            return Err(invalid_facility(file, facility, "level must be at least 1"));
        }
        if !(0.0..=1.0).contains(&entry.efficiency) {
            return Err(invalid_facility(
                file,
                facility,
                &format!("efficiency must be within [0, 1], got {}", entry.efficiency),
            ));
        }
        let recipe = entry.recipe.unwrap_or_else(|| default_recipe(facility));
        if recipe.recipe().facility != facility {
            return Err(DataLoadError::RecipeMismatch {
                file: file.to_path_buf(),
                facility,
                recipe,
            });
        }

        state.facilities[facility] = Facility {
            count: entry.count,
            level: entry.level,
            efficiency: entry.efficiency,
        };
        state.active_recipes[facility] = ActiveRecipe::new(recipe);
    }
    Ok(())
}

fn invalid_facility(file: &Path, facility: FacilityType, detail: &str) -> DataLoadError {
    DataLoadError::InvalidValue {
        file: PathBuf::from(file),
        field: "facilities",
        detail: format!("{facility}: {detail}"),
    }
}
