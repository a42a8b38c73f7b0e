use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::core::Comparison;
use crate::error::Result;

pub const YEAR_HEADER: &str = "Years Since Graduation";
pub const SHORT_TRACK_HEADER: &str = "3-Year Residency Net Worth";
pub const LONG_TRACK_HEADER: &str = "7-Year Residency Net Worth";

/// Compact currency label: whole thousands below one million (truncated
/// toward zero), millions with one decimal place otherwise.
pub fn format_net_worth(value: f64) -> String {
    if value.abs() < 1_000_000.0 {
        let thousands = (value / 1_000.0).trunc() as i64;
        format!("${thousands}K")
    } else {
        format!("${:.1}M", value / 1_000_000.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    #[serde(rename = "Years Since Graduation")]
    pub year: u32,
    #[serde(rename = "3-Year Residency Net Worth")]
    pub short_track: String,
    #[serde(rename = "7-Year Residency Net Worth")]
    pub long_track: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTable {
    rows: Vec<TableRow>,
}

impl ComparisonTable {
    pub fn from_comparison(comparison: &Comparison) -> Self {
        let rows = comparison
            .year_index()
            .into_iter()
            .zip(comparison.short_track.values())
            .zip(comparison.long_track.values())
            .map(|((year, &short), &long)| TableRow {
                year,
                short_track: format_net_worth(short),
                long_track: format_net_worth(long),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        for row in &self.rows {
            out.serialize(row)?;
        }
        out.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_width = self
            .rows
            .iter()
            .map(|r| r.year.to_string().len())
            .chain([YEAR_HEADER.len()])
            .max()
            .unwrap_or_default();
        let short_width = self
            .rows
            .iter()
            .map(|r| r.short_track.len())
            .chain([SHORT_TRACK_HEADER.len()])
            .max()
            .unwrap_or_default();
        let long_width = self
            .rows
            .iter()
            .map(|r| r.long_track.len())
            .chain([LONG_TRACK_HEADER.len()])
            .max()
            .unwrap_or_default();

        writeln!(
            f,
            "{YEAR_HEADER:>year_width$}  {SHORT_TRACK_HEADER:>short_width$}  {LONG_TRACK_HEADER:>long_width$}"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>year_width$}  {:>short_width$}  {:>long_width$}",
                row.year, row.short_track, row.long_track
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SimulationParameters, run_comparison};

    #[test]
    fn formats_thousands_with_truncation() {
        assert_eq!(format_net_worth(-520_000.0), "$-520K");
        assert_eq!(format_net_worth(-563_672.0), "$-563K");
        assert_eq!(format_net_worth(999_999.0), "$999K");
        assert_eq!(format_net_worth(-999.0), "$0K");
        assert_eq!(format_net_worth(0.0), "$0K");
    }

    #[test]
    fn formats_millions_with_one_decimal() {
        assert_eq!(format_net_worth(1_234_567.0), "$1.2M");
        assert_eq!(format_net_worth(1_000_000.0), "$1.0M");
        assert_eq!(format_net_worth(-2_500_000.0), "$-2.5M");
    }

    #[test]
    fn table_has_one_row_per_year() {
        let comparison = run_comparison(&SimulationParameters::default(), 15);
        let table = ComparisonTable::from_comparison(&comparison);
        assert_eq!(table.rows().len(), 16);
        assert_eq!(
            table.rows()[0],
            TableRow {
                year: 0,
                short_track: "$-500K".to_string(),
                long_track: "$-500K".to_string(),
            }
        );
        assert_eq!(table.rows()[4].short_track, "$-313K");
    }

    #[test]
    fn csv_has_header_and_formatted_rows() {
        let comparison = run_comparison(&SimulationParameters::default(), 2);
        let table = ComparisonTable::from_comparison(&comparison);
        let csv = String::from_utf8(table.to_csv_bytes().unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Years Since Graduation,3-Year Residency Net Worth,7-Year Residency Net Worth",
                "0,$-500K,$-500K",
                "1,$-520K,$-520K",
                "2,$-541K,$-541K",
            ]
        );
    }

    #[test]
    fn console_rendering_aligns_columns() {
        let comparison = run_comparison(&SimulationParameters::default(), 1);
        let rendered = ComparisonTable::from_comparison(&comparison).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(YEAR_HEADER));
        assert!(lines[2].ends_with("$-520K"));
        assert!(lines.iter().all(|line| line.len() == lines[0].len()));
    }
}
