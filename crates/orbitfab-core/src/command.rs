//! Construction and upgrade actions on facilities.
//!
//! Commands are pure: [`apply_command`] returns a new state and leaves its
//! input untouched, so a host can apply a command to a copy and summarize the
//! result before committing it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::facility::FacilityType;
use crate::recipe::RecipeId;
use crate::state::{ActiveRecipe, FactoryState};

/// A single facility action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactoryCommand {
    /// Build additional parallel lines.
    AddLines { facility: FacilityType, count: u32 },
    /// Decommission lines.
    RemoveLines { facility: FacilityType, count: u32 },
    /// Raise the upgrade level by one.
    Upgrade { facility: FacilityType },
    /// Set efficiency, clamped to `[0, 1]`.
    SetEfficiency { facility: FacilityType, efficiency: f64 },
    /// Bind a different recipe. The recipe must belong to the facility type.
    SelectRecipe { facility: FacilityType, recipe: RecipeId },
}

impl FactoryCommand {
    /// The facility this command targets.
    pub fn facility(&self) -> FacilityType {
        match *self {
            FactoryCommand::AddLines { facility, .. }
            | FactoryCommand::RemoveLines { facility, .. }
            | FactoryCommand::Upgrade { facility }
            | FactoryCommand::SetEfficiency { facility, .. }
            | FactoryCommand::SelectRecipe { facility, .. } => facility,
        }
    }
}

/// Errors from [`apply_command`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("recipe {recipe:?} runs on {expected}, not {facility}")]
    RecipeMismatch {
        facility: FacilityType,
        recipe: RecipeId,
        expected: FacilityType,
    },
    #[error("cannot remove {requested} lines from {facility}: only {available} built")]
    InsufficientLines {
        facility: FacilityType,
        available: u32,
        requested: u32,
    },
    #[error("efficiency must be finite, got {0}")]
    InvalidEfficiency(f64),
}

/// Apply `command` to a copy of `state`.
pub fn apply_command(
    state: &FactoryState,
    command: &FactoryCommand,
) -> Result<FactoryState, CommandError> {
    let mut next = state.clone();
    apply_in_place(&mut next, command)?;
    debug!(?command, "facility command applied");
    Ok(next)
}

/// Apply a sequence of commands, stopping at the first failure.
pub fn apply_commands<'a>(
    state: &FactoryState,
    commands: impl IntoIterator<Item = &'a FactoryCommand>,
) -> Result<FactoryState, CommandError> {
    let mut next = state.clone();
    for command in commands {
        apply_in_place(&mut next, command)?;
    }
    Ok(next)
}

fn apply_in_place(state: &mut FactoryState, command: &FactoryCommand) -> Result<(), CommandError> {
    match *command {
        FactoryCommand::AddLines { facility, count } => {
            let f = &mut state.facilities[facility];
            f.count = f.count.saturating_add(count);
        }
        FactoryCommand::RemoveLines { facility, count } => {
            let f = &mut state.facilities[facility];
            if count > f.count {
                return Err(CommandError::InsufficientLines {
                    facility,
                    available: f.count,
                    requested: count,
                });
            }
            f.count -= count;
        }
        FactoryCommand::Upgrade { facility } => {
            let f = &mut state.facilities[facility];
            f.level = f.level.max(1).saturating_add(1);
        }
        FactoryCommand::SetEfficiency {
            facility,
            efficiency,
        } => {
            if !efficiency.is_finite() {
                return Err(CommandError::InvalidEfficiency(efficiency));
            }
            state.facilities[facility].efficiency = efficiency.clamp(0.0, 1.0);
        }
        FactoryCommand::SelectRecipe { facility, recipe } => {
            let expected = recipe.recipe().facility;
            if expected != facility {
                return Err(CommandError::RecipeMismatch {
                    facility,
                    recipe,
                    expected,
                });
            }
            let active = &mut state.active_recipes[facility];
            if active.recipe != recipe {
                *active = ActiveRecipe::new(recipe);
            }
        }
    }
    Ok(())
}
