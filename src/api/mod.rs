use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use crate::core::{
    Comparison, DEFAULT_YEARS, MAX_YEARS, NetWorthTrajectory, SimulationParameters, run_comparison,
};
use crate::error::{Error, Result};
use crate::pipeline::RunConfig;
use crate::report::{ComparisonTable, TableRow};

#[derive(Parser, Debug)]
#[command(
    name = "residency-returns",
    about = "Net worth projection for a 3-year vs 7-year residency"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(long, default_value_t = 500_000.0, help = "Debt at graduation")]
    pub initial_debt: f64,
    #[arg(long, default_value_t = 60_000.0, help = "Annual salary during residency")]
    pub resident_salary: f64,
    #[arg(
        long,
        default_value_t = 300_000.0,
        help = "Annual attending salary after a 3-year residency"
    )]
    pub short_attending_salary: f64,
    #[arg(
        long,
        default_value_t = 400_000.0,
        help = "Annual attending salary after a 7-year residency"
    )]
    pub long_attending_salary: f64,
    #[arg(long, default_value_t = 50_000.0)]
    pub living_expenses: f64,
    #[arg(
        long,
        default_value_t = 0.06,
        help = "Annual interest on debt during residency as a fraction, e.g. 0.06"
    )]
    pub interest_rate: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS, help = "Years since graduation to project")]
    pub years: u32,

    #[arg(long, default_value = ".", help = "Directory for the CSV and chart")]
    pub output_dir: PathBuf,
    #[arg(long, help = "Do not open the chart after saving it")]
    pub no_show: bool,
    #[arg(long, default_value = "info", help = "Log level (debug, info, warn, error)")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the projection as JSON over HTTP
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

pub fn build_config(cli: &Cli) -> Result<RunConfig> {
    let config = RunConfig {
        params: SimulationParameters {
            initial_debt: cli.initial_debt,
            resident_salary: cli.resident_salary,
            short_attending_salary: cli.short_attending_salary,
            long_attending_salary: cli.long_attending_salary,
            living_expenses: cli.living_expenses,
            interest_rate: cli.interest_rate,
        },
        years: cli.years,
        output_dir: cli.output_dir.clone(),
        show_chart: !cli.no_show,
    };
    config.validate()?;
    Ok(config)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    initial_debt: Option<f64>,
    resident_salary: Option<f64>,
    short_attending_salary: Option<f64>,
    long_attending_salary: Option<f64>,
    living_expenses: Option<f64>,
    interest_rate: Option<f64>,
    years: Option<u32>,
}

#[derive(Debug)]
struct ApiRequest {
    params: SimulationParameters,
    years: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    years: u32,
    year_index: Vec<u32>,
    parameters: SimulationParameters,
    short_track: NetWorthTrajectory,
    long_track: NetWorthTrajectory,
    table: Vec<TableRowResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TableRowResponse {
    year: u32,
    short_track: String,
    long_track: String,
}

impl From<&TableRow> for TableRowResponse {
    fn from(row: &TableRow) -> Self {
        Self {
            year: row.year,
            short_track: row.short_track.clone(),
            long_track: row.long_track.clone(),
        }
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("residency returns HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/simulate");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler)
}

async fn not_found_handler() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        serde_json::json!({ "error": "Not found" }),
    )
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!("rejected simulate request: {err}");
            return err.into_response();
        }
    };

    let comparison = run_comparison(&request.params, request.years);
    json_response(
        StatusCode::OK,
        build_simulate_response(&request.params, comparison),
    )
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| Error::invalid("body", format!("Invalid API JSON payload: {e}")))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest> {
    let defaults = SimulationParameters::default();
    let params = SimulationParameters {
        initial_debt: payload.initial_debt.unwrap_or(defaults.initial_debt),
        resident_salary: payload.resident_salary.unwrap_or(defaults.resident_salary),
        short_attending_salary: payload
            .short_attending_salary
            .unwrap_or(defaults.short_attending_salary),
        long_attending_salary: payload
            .long_attending_salary
            .unwrap_or(defaults.long_attending_salary),
        living_expenses: payload.living_expenses.unwrap_or(defaults.living_expenses),
        interest_rate: payload.interest_rate.unwrap_or(defaults.interest_rate),
    };
    params.validate()?;

    let years = payload.years.unwrap_or(DEFAULT_YEARS);
    if years == 0 || years > MAX_YEARS {
        return Err(Error::invalid(
            "years",
            format!("must be between 1 and {MAX_YEARS}"),
        ));
    }

    Ok(ApiRequest { params, years })
}

fn build_simulate_response(
    params: &SimulationParameters,
    comparison: Comparison,
) -> SimulateResponse {
    let table = ComparisonTable::from_comparison(&comparison);
    SimulateResponse {
        years: comparison.years,
        year_index: comparison.year_index(),
        parameters: *params,
        table: table.rows().iter().map(TableRowResponse::from).collect(),
        short_track: comparison.short_track,
        long_track: comparison.long_track,
    }
}
