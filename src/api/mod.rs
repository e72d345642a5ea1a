mod render;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    AdjustedBenefit, BreakevenError, BreakevenReport, CumulativeSeries, Parameters,
    compute_breakeven,
};
use crate::logging::LogLevel;

pub use render::{
    ChartData, ChartTrace, TableRow, chart_traces, format_currency, render_table, table_rows,
};

const MIN_CLAIMING_AGE: u32 = 62;
const MAX_CLAIMING_AGE: u32 = 70;
const MIN_HORIZON_AGE: u32 = 70;
const MAX_HORIZON_AGE: u32 = 110;
const MIN_BENEFIT: f64 = 100.0;
const MAX_RETURN_PERCENT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("--benefit-fra must be a finite amount >= {min} (got {value})")]
    Benefit { min: f64, value: f64 },
    #[error("--annual-return must be between 0 and {max} percent (got {value})")]
    AnnualReturn { max: f64, value: f64 },
    #[error("--{field} must be between {min} and {max} (got {value})")]
    AgeRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },
    #[error("Invalid API payload: {0}")]
    Payload(String),
    #[error("Failed to render report: {0}")]
    Render(String),
    #[error(transparent)]
    Breakeven(#[from] BreakevenError),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "breakeven",
    about = "Social Security breakeven estimator (two claiming ages, monthly compounding of banked benefits)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
    #[command(flatten)]
    pub inputs: InputArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = LogLevel::Info,
        help = "Log level when RUST_LOG is unset"
    )]
    pub log_level: LogLevel,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the JSON API over HTTP.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    #[arg(
        long,
        default_value_t = 2000.0,
        help = "Monthly benefit at full retirement age (67)"
    )]
    pub benefit_fra: f64,
    #[arg(
        long,
        default_value_t = 6.0,
        help = "Annual investment return in percent, e.g. 6"
    )]
    pub annual_return: f64,
    #[arg(long, default_value_t = 62)]
    pub early_age: u32,
    #[arg(long, default_value_t = 67)]
    pub late_age: u32,
    #[arg(long, default_value_t = 100)]
    pub max_age: u32,
}

impl Default for InputArgs {
    fn default() -> Self {
        Self {
            benefit_fra: 2_000.0,
            annual_return: 6.0,
            early_age: 62,
            late_age: 67,
            max_age: 100,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BreakevenPayload {
    #[serde(alias = "benefit")]
    benefit_fra: Option<f64>,
    #[serde(alias = "returnRate")]
    annual_return: Option<f64>,
    early_age: Option<u32>,
    late_age: Option<u32>,
    max_age: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakevenResponse {
    pub parameters: Parameters,
    pub early_benefit: AdjustedBenefit,
    pub late_benefit: AdjustedBenefit,
    pub ages: Vec<u32>,
    pub series: CumulativeSeries,
    pub breakeven_age: Option<u32>,
    pub message: String,
    pub rows: Vec<TableRow>,
    pub chart: ChartData,
}

impl From<BreakevenReport> for BreakevenResponse {
    fn from(report: BreakevenReport) -> Self {
        Self {
            ages: report.series.ages(),
            message: report.summary(),
            rows: table_rows(&report),
            chart: chart_traces(&report),
            parameters: report.parameters,
            early_benefit: report.early_benefit,
            late_benefit: report.late_benefit,
            breakeven_age: report.breakeven_age,
            series: report.series,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn build_parameters(args: &InputArgs) -> Result<Parameters, InputError> {
    if !args.benefit_fra.is_finite() || args.benefit_fra < MIN_BENEFIT {
        return Err(InputError::Benefit {
            min: MIN_BENEFIT,
            value: args.benefit_fra,
        });
    }

    if !(0.0..=MAX_RETURN_PERCENT).contains(&args.annual_return) {
        return Err(InputError::AnnualReturn {
            max: MAX_RETURN_PERCENT,
            value: args.annual_return,
        });
    }

    check_age("early-age", args.early_age, MIN_CLAIMING_AGE, MAX_CLAIMING_AGE)?;
    check_age("late-age", args.late_age, MIN_CLAIMING_AGE, MAX_CLAIMING_AGE)?;
    check_age("max-age", args.max_age, MIN_HORIZON_AGE, MAX_HORIZON_AGE)?;

    if args.early_age >= args.late_age {
        return Err(BreakevenError::AgeOrder {
            early_age: args.early_age,
            late_age: args.late_age,
        }
        .into());
    }

    Ok(Parameters {
        benefit_at_fra: args.benefit_fra,
        annual_return_rate: args.annual_return / 100.0,
        early_age: args.early_age,
        late_age: args.late_age,
        max_age: args.max_age,
    })
}

fn check_age(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), InputError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(InputError::AgeRange {
            field,
            min,
            max,
            value,
        })
    }
}

/// Runs one calculation and renders it in the requested format.
pub fn run_report(args: &InputArgs, format: OutputFormat) -> Result<String, InputError> {
    let params = build_parameters(args)?;
    let report = compute_breakeven(&params)?;
    info!(
        early_age = params.early_age,
        late_age = params.late_age,
        breakeven_age = ?report.breakeven_age,
        "computed breakeven"
    );

    match format {
        OutputFormat::Table => Ok(format!("{}\n\n{}", report.summary(), render_table(&report))),
        OutputFormat::Json => {
            let response = BreakevenResponse::from(report);
            serde_json::to_string_pretty(&response)
                .map(|mut body| {
                    body.push('\n');
                    body
                })
                .map_err(|e| InputError::Render(e.to_string()))
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/breakeven",
            get(breakeven_get_handler).post(breakeven_post_handler),
        )
        .route("/healthz", get(health_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "breakeven HTTP API listening");
    info!("Local access: http://127.0.0.1:{port}/api/breakeven");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn breakeven_get_handler(
    payload: Result<Query<BreakevenPayload>, QueryRejection>,
) -> Response {
    breakeven_handler_impl(
        payload
            .map(|Query(payload)| payload)
            .map_err(|rejection| InputError::Payload(rejection.body_text())),
    )
}

async fn breakeven_post_handler(
    payload: Result<Json<BreakevenPayload>, JsonRejection>,
) -> Response {
    breakeven_handler_impl(
        payload
            .map(|Json(payload)| payload)
            .map_err(|rejection| InputError::Payload(rejection.body_text())),
    )
}

fn breakeven_handler_impl(payload: Result<BreakevenPayload, InputError>) -> Response {
    let report = match payload
        .and_then(params_from_payload)
        .and_then(|params| compute_breakeven(&params).map_err(InputError::from))
    {
        Ok(report) => report,
        Err(err) => {
            warn!(error = %err, "rejected breakeven request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    info!(breakeven_age = ?report.breakeven_age, "served breakeven request");
    json_response(StatusCode::OK, BreakevenResponse::from(report))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn params_from_json(json: &str) -> Result<Parameters, InputError> {
    let payload = serde_json::from_str::<BreakevenPayload>(json)
        .map_err(|e| InputError::Payload(e.to_string()))?;
    params_from_payload(payload)
}

fn params_from_payload(payload: BreakevenPayload) -> Result<Parameters, InputError> {
    let mut args = InputArgs::default();

    if let Some(v) = payload.benefit_fra {
        args.benefit_fra = v;
    }
    if let Some(v) = payload.annual_return {
        args.annual_return = v;
    }
    if let Some(v) = payload.early_age {
        args.early_age = v;
    }
    if let Some(v) = payload.late_age {
        args.late_age = v;
    }
    if let Some(v) = payload.max_age {
        args.max_age = v;
    }

    build_parameters(&args)
}
