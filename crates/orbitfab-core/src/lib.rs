//! orbitfab core -- the production-chain simulation behind the orbital
//! compute factory.
//!
//! Everything here is a pure function of its inputs. A host owns the timer
//! and the current [`state::FactoryState`]; each call to [`tick::tick`]
//! returns a fresh state, so ticks must be applied strictly in sequence.
//!
//! # Key Types
//!
//! - [`resource::Inventory`] -- quantity of every [`resource::ResourceId`].
//! - [`facility::Facility`] -- lines, level and efficiency of a production
//!   site; [`facility::throughput_multiplier`] turns them into capacity.
//! - [`recipe::RECIPES`] -- the read-only recipe catalog.
//! - [`state::FactoryState`] -- the aggregate snapshotted by every tick.
//! - [`tick::tick`] -- the integrator; returns a [`tick::TickResult`].
//! - [`bottleneck::summarize_bottlenecks`] -- per-stage utilization.
//! - [`command::FactoryCommand`] -- construction and upgrade actions.
//! - [`replay::ReplayLog`] -- recorded sessions with hash checkpoints.
//!
//! # Example
//!
//! ```
//! use orbitfab_core::state::create_default_state;
//! use orbitfab_core::tick::{ThroughputTarget, tick};
//!
//! let state = create_default_state();
//! let result = tick(&state, 10.0, ThroughputTarget::new(2.0));
//! assert!(result.next_state.inventory.is_non_negative());
//! assert_eq!(result.bottlenecks.len(), 4);
//! ```

pub mod bottleneck;
pub mod command;
pub mod facility;
pub mod hash;
pub mod recipe;
pub mod replay;
pub mod resource;
pub mod state;
pub mod tick;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bottleneck::{BottleneckStage, BottleneckSummary, summarize_bottlenecks};
pub use command::{CommandError, FactoryCommand, apply_command};
pub use facility::{Facility, FacilityType, throughput_multiplier};
pub use recipe::{RECIPES, Recipe, RecipeId};
pub use resource::{Inventory, ResourceId};
pub use state::{ActiveRecipe, FactoryState, create_default_state};
pub use tick::{ThroughputTarget, TickResult, tick};
