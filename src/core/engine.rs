use super::types::{Comparison, NetWorthTrajectory, Scenario, SimulationParameters};
use crate::error::Result;

/// Projects net worth for `years` years after graduation.
///
/// Each year depends only on the previous balance. During training the
/// resident salary is earned and a negative balance accrues interest; after
/// training the track's attending salary is earned and no interest is charged,
/// whatever the sign of the balance.
pub fn simulate(
    params: &SimulationParameters,
    years: u32,
    scenario: Scenario,
) -> NetWorthTrajectory {
    let mut trajectory = NetWorthTrajectory::starting_at(-params.initial_debt, years);
    let mut prev = -params.initial_debt;

    for year in 1..=years {
        let next = if scenario.in_training(year) {
            let interest = if prev < 0.0 {
                prev * params.interest_rate
            } else {
                0.0
            };
            prev + (params.resident_salary - params.living_expenses) + interest
        } else {
            let income = params.attending_salary(scenario.track());
            prev + (income - params.living_expenses)
        };
        trajectory.push(next);
        prev = next;
    }

    trajectory
}

pub fn simulate_residency(
    params: &SimulationParameters,
    years: u32,
    residency_length: u32,
) -> Result<NetWorthTrajectory> {
    let scenario = Scenario::new(residency_length)?;
    Ok(simulate(params, years, scenario))
}

pub fn run_comparison(params: &SimulationParameters, years: u32) -> Comparison {
    let short_track = simulate(params, years, Scenario::short_track());
    let long_track = simulate(params, years, Scenario::long_track());
    tracing::debug!(
        years,
        short_final = short_track.last(),
        long_final = long_track.last(),
        "simulated residency scenarios"
    );
    Comparison {
        years,
        short_track,
        long_track,
    }
}
