mod engine;
mod types;

pub use engine::{run_comparison, simulate, simulate_residency};
pub use types::{
    Comparison, DEFAULT_YEARS, LONG_RESIDENCY_YEARS, MAX_YEARS, NetWorthTrajectory, SHORT_RESIDENCY_YEARS,
    Scenario, SimulationParameters, Track,
};
