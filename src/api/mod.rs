use axum::{
    Router,
    extract::{Json, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::{
    AmortizationSchedule, LoanTerms, PrepayScenario, TaxSlab, amortization_schedule,
    assess_income_tax, compare_prepay_vs_invest, default_slabs, public_questions, score_quiz,
    validate_slabs,
};

mod error;

pub use error::ApiError;

const STATUS_MESSAGE: &str = "Taxes & Loans API running";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn default_payments_per_year() -> u32 {
    12
}

#[derive(Debug, Deserialize)]
struct TaxPayload {
    annual_income: f64,
    #[serde(default)]
    deductions: f64,
    #[serde(default = "default_slabs")]
    slabs: Vec<TaxSlab>,
}

#[derive(Debug, Deserialize)]
struct LoanPayload {
    principal: f64,
    annual_rate_pct: f64,
    years: f64,
    #[serde(default = "default_payments_per_year")]
    payments_per_year: u32,
}

#[derive(Debug, Deserialize)]
struct PrepayPayload {
    principal: f64,
    annual_rate_pct: f64,
    years: f64,
    #[serde(default)]
    extra_monthly: f64,
    #[serde(default = "default_payments_per_year")]
    payments_per_year: u32,
    invest_rate_pct: f64,
    #[serde(default)]
    inflation_pct: f64,
}

#[derive(Debug, Deserialize)]
struct QuizAnswersPayload {
    answers: HashMap<String, i64>,
}

#[derive(Debug)]
struct TaxRequest {
    annual_income: f64,
    deductions: f64,
    slabs: Vec<TaxSlab>,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

/// Amortization schedule with the loan terms echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizeResponse {
    pub principal: f64,
    pub annual_rate_pct: f64,
    pub years: f64,
    pub payments_per_year: u32,
    #[serde(flatten)]
    pub result: AmortizationSchedule,
}

impl AmortizeResponse {
    pub fn new(terms: &LoanTerms, result: AmortizationSchedule) -> Self {
        Self {
            principal: terms.principal,
            annual_rate_pct: terms.annual_rate_pct,
            years: terms.years,
            payments_per_year: terms.payments_per_year,
            result,
        }
    }
}

fn tax_request_from_payload(payload: TaxPayload) -> Result<TaxRequest, ApiError> {
    if !payload.annual_income.is_finite() || payload.annual_income < 0.0 {
        return Err(ApiError::Validation("annual_income must be >= 0".to_string()));
    }
    if !payload.deductions.is_finite() || payload.deductions < 0.0 {
        return Err(ApiError::Validation("deductions must be >= 0".to_string()));
    }
    validate_slabs(&payload.slabs)?;

    Ok(TaxRequest {
        annual_income: payload.annual_income,
        deductions: payload.deductions,
        slabs: payload.slabs,
    })
}

fn loan_terms_from_payload(payload: LoanPayload) -> Result<LoanTerms, ApiError> {
    let terms = LoanTerms {
        principal: payload.principal,
        annual_rate_pct: payload.annual_rate_pct,
        years: payload.years,
        payments_per_year: payload.payments_per_year,
    };
    terms.validate()?;
    Ok(terms)
}

fn prepay_scenario_from_payload(payload: PrepayPayload) -> Result<PrepayScenario, ApiError> {
    let scenario = PrepayScenario {
        loan: LoanTerms {
            principal: payload.principal,
            annual_rate_pct: payload.annual_rate_pct,
            years: payload.years,
            payments_per_year: payload.payments_per_year,
        },
        extra_monthly: payload.extra_monthly,
        invest_rate_pct: payload.invest_rate_pct,
        inflation_pct: payload.inflation_pct,
    };
    scenario.validate()?;
    Ok(scenario)
}

pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(status_handler))
        .route("/api/tax", post(tax_handler))
        .route("/api/loan/amortize", post(amortize_handler))
        .route("/api/loan/prepay_vs_invest", post(prepay_handler))
        .route("/api/quiz", get(quiz_handler))
        .route("/api/quiz/score", post(quiz_score_handler))
        .fallback(not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Taxes & Loans API listening");
    tracing::info!("Local access: http://127.0.0.1:{}/", config.port);

    axum::serve(listener, router()).await
}

async fn status_handler() -> Response {
    json_response(
        StatusCode::OK,
        StatusResponse {
            status: STATUS_MESSAGE,
        },
    )
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

async fn tax_handler(
    payload: Result<Json<TaxPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let request = tax_request_from_payload(payload)?;
    let assessment = assess_income_tax(request.annual_income, request.deductions, &request.slabs);
    tracing::debug!(
        taxable_income = assessment.taxable_income,
        tax_due = assessment.tax_due,
        bands = assessment.breakdown.len(),
        "tax assessed"
    );
    Ok(json_response(StatusCode::OK, assessment))
}

async fn amortize_handler(
    payload: Result<Json<LoanPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let terms = loan_terms_from_payload(payload)?;
    let schedule = amortization_schedule(&terms);
    tracing::debug!(
        periods = schedule.periods,
        payment = schedule.payment,
        "amortization schedule built"
    );
    Ok(json_response(
        StatusCode::OK,
        AmortizeResponse::new(&terms, schedule),
    ))
}

async fn prepay_handler(
    payload: Result<Json<PrepayPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let scenario = prepay_scenario_from_payload(payload)?;
    let comparison = compare_prepay_vs_invest(&scenario)?;
    Ok(json_response(StatusCode::OK, comparison))
}

async fn quiz_handler() -> Response {
    json_response(StatusCode::OK, public_questions())
}

async fn quiz_score_handler(
    payload: Result<Json<QuizAnswersPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    Ok(json_response(StatusCode::OK, score_quiz(&payload.answers)))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}
