pub mod loader;
pub mod scenario;
pub mod schema;

pub use loader::{DataLoadError, Format, find_scenario, require_scenario};
pub use scenario::{Scenario, load_scenario};
