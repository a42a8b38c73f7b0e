use serde::Serialize;

use crate::error::{Error, Result};

pub const SHORT_RESIDENCY_YEARS: u32 = 3;
pub const LONG_RESIDENCY_YEARS: u32 = 7;
pub const DEFAULT_YEARS: u32 = 15;
/// Longest projection horizon accepted from run configuration.
pub const MAX_YEARS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub initial_debt: f64,
    pub resident_salary: f64,
    pub short_attending_salary: f64,
    pub long_attending_salary: f64,
    pub living_expenses: f64,
    /// Annual rate as a fraction, charged only on negative balances during training.
    pub interest_rate: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_debt: 500_000.0,
            resident_salary: 60_000.0,
            short_attending_salary: 300_000.0,
            long_attending_salary: 400_000.0,
            living_expenses: 50_000.0,
            interest_rate: 0.06,
        }
    }
}

impl SimulationParameters {
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("initialDebt", self.initial_debt),
            ("residentSalary", self.resident_salary),
            ("shortAttendingSalary", self.short_attending_salary),
            ("longAttendingSalary", self.long_attending_salary),
            ("livingExpenses", self.living_expenses),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(field, "must be a finite amount >= 0"));
            }
        }

        if !self.interest_rate.is_finite() || !(0.0..=1.0).contains(&self.interest_rate) {
            return Err(Error::invalid("interestRate", "must be between 0 and 1"));
        }

        Ok(())
    }

    pub fn attending_salary(&self, track: Track) -> f64 {
        match track {
            Track::ShortTrack => self.short_attending_salary,
            Track::LongTrack => self.long_attending_salary,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Track {
    ShortTrack,
    LongTrack,
}

impl Track {
    /// Salary tier for a residency length. Only an exact 3-year residency
    /// earns the short-track salary; every other length is long track.
    pub fn for_residency(residency_years: u32) -> Self {
        if residency_years == SHORT_RESIDENCY_YEARS {
            Track::ShortTrack
        } else {
            Track::LongTrack
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Track::ShortTrack => "3-Year Residency",
            Track::LongTrack => "7-Year Residency",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Scenario {
    residency_years: u32,
    track: Track,
}

impl Scenario {
    pub fn new(residency_years: u32) -> Result<Self> {
        if residency_years == 0 {
            return Err(Error::invalid("residencyLength", "must be > 0"));
        }
        Ok(Self {
            residency_years,
            track: Track::for_residency(residency_years),
        })
    }

    pub fn short_track() -> Self {
        Self {
            residency_years: SHORT_RESIDENCY_YEARS,
            track: Track::ShortTrack,
        }
    }

    pub fn long_track() -> Self {
        Self {
            residency_years: LONG_RESIDENCY_YEARS,
            track: Track::LongTrack,
        }
    }

    pub fn residency_years(&self) -> u32 {
        self.residency_years
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn in_training(&self, year: u32) -> bool {
        year <= self.residency_years
    }
}

/// Yearly net worth, index 0 being graduation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NetWorthTrajectory(Vec<f64>);

impl NetWorthTrajectory {
    pub(crate) fn starting_at(opening_balance: f64, years: u32) -> Self {
        let mut values = Vec::with_capacity(years as usize + 1);
        values.push(opening_balance);
        Self(values)
    }

    pub(crate) fn push(&mut self, value: f64) {
        self.0.push(value);
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> f64 {
        self.0.last().copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub years: u32,
    pub short_track: NetWorthTrajectory,
    pub long_track: NetWorthTrajectory,
}

impl Comparison {
    pub fn year_index(&self) -> Vec<u32> {
        (0..=self.years).collect()
    }
}
