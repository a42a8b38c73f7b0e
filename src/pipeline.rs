use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Comparison, DEFAULT_YEARS, MAX_YEARS, SimulationParameters, run_comparison};
use crate::error::{Error, Result};
use crate::plot;
use crate::report::ComparisonTable;

pub const CSV_FILE_NAME: &str = "residency_comparison.csv";
pub const CHART_FILE_NAME: &str = "residency_returns.png";
const STAGED_CHART_FILE_NAME: &str = ".residency_returns.partial.png";

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub params: SimulationParameters,
    pub years: u32,
    pub output_dir: PathBuf,
    pub show_chart: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            params: SimulationParameters::default(),
            years: DEFAULT_YEARS,
            output_dir: PathBuf::from("."),
            show_chart: true,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.years == 0 || self.years > MAX_YEARS {
            return Err(Error::invalid(
                "years",
                format!("must be between 1 and {MAX_YEARS}"),
            ));
        }
        self.params.validate()
    }
}

#[derive(Debug)]
pub struct RunOutput {
    pub comparison: Comparison,
    pub table: ComparisonTable,
    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
}

/// Simulates both tracks, prints the table and writes the CSV and chart.
pub fn run(config: &RunConfig) -> Result<RunOutput> {
    config.validate()?;
    tracing::info!(
        years = config.years,
        output_dir = %config.output_dir.display(),
        "running residency comparison"
    );

    let comparison = run_comparison(&config.params, config.years);
    let table = ComparisonTable::from_comparison(&comparison);

    println!("\nNet Worth Comparison Table:");
    print!("{table}");

    let (csv_path, chart_path) = write_outputs(&config.output_dir, &table, |staged| {
        plot::render_chart(&comparison, staged)
    })?;
    println!("\nTable saved to '{CSV_FILE_NAME}'");
    println!("Chart saved to '{CHART_FILE_NAME}'");

    if config.show_chart {
        plot::show_chart(&chart_path);
    }

    Ok(RunOutput {
        comparison,
        table,
        csv_path,
        chart_path,
    })
}

/// Writes both output files or neither. The chart is rendered to a staging
/// file first and only moved into place once the CSV has been written.
pub(crate) fn write_outputs<F>(
    output_dir: &Path,
    table: &ComparisonTable,
    render_chart: F,
) -> Result<(PathBuf, PathBuf)>
where
    F: FnOnce(&Path) -> Result<()>,
{
    fs::create_dir_all(output_dir).map_err(|e| Error::output_write(output_dir, e))?;

    let csv_bytes = table.to_csv_bytes()?;
    let staged_chart = output_dir.join(STAGED_CHART_FILE_NAME);
    let csv_path = output_dir.join(CSV_FILE_NAME);
    let chart_path = output_dir.join(CHART_FILE_NAME);

    if let Err(err) = render_chart(&staged_chart) {
        discard(&staged_chart);
        return Err(err);
    }

    if let Err(source) = fs::write(&csv_path, &csv_bytes) {
        discard(&staged_chart);
        discard(&csv_path);
        return Err(Error::output_write(csv_path, source));
    }
    tracing::debug!(path = %csv_path.display(), bytes = csv_bytes.len(), "csv written");

    if let Err(source) = fs::rename(&staged_chart, &chart_path) {
        discard(&staged_chart);
        discard(&csv_path);
        return Err(Error::output_write(chart_path, source));
    }
    tracing::debug!(path = %chart_path.display(), "chart written");

    Ok((csv_path, chart_path))
}

fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("failed to remove partial output {}: {e}", path.display()),
    }
}
