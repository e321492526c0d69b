use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::process::ExitCode;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::core::{
    BenefitCalculator, CalculationError, CalculationInput, CalculationResult,
    DEFAULT_DEDUCTION_LIMIT, DEFAULT_MAJORITY_AGE, DEFAULT_MAX_AGE, DEFAULT_RETROACTIVE_YEARS,
    DeductionPolicy, FormattedResult, PolicyError, mask_currency_input, parse_currency,
    parse_decimal_field, parse_integer_field,
};
use crate::ui::{Effect, Field, FormController, FormEvent};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Parser, Debug)]
#[command(
    name = "tuition-benefit",
    about = "Estimates the income-tax benefit of deducting school tuition above the education ceiling"
)]
pub struct Cli {
    #[command(flatten)]
    policy: PolicyArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct PolicyArgs {
    #[arg(
        long,
        global = true,
        env = "EDUCATION_DEDUCTION_LIMIT",
        default_value_t = DEFAULT_DEDUCTION_LIMIT,
        help = "Annual education deduction ceiling in BRL"
    )]
    deduction_limit: f64,
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_RETROACTIVE_YEARS,
        help = "Past tax years a refund can be claimed for"
    )]
    retroactive_years: u32,
    #[arg(long, global = true, default_value_t = DEFAULT_MAJORITY_AGE)]
    majority_age: u32,
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_MAX_AGE,
        help = "Oldest accepted dependant age"
    )]
    max_age: i64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and print the four benefit figures
    Calculate(CalculateArgs),
    /// Serve the simulator page and JSON API
    Serve {
        #[arg(default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug, Default)]
struct CalculateArgs {
    #[arg(long, default_value = "", help = "Taxable income, e.g. 100.000,00")]
    taxable_income: String,
    #[arg(long, default_value = "", help = "Annual tuition, e.g. 20.000,00")]
    annual_tuition: String,
    #[arg(long, default_value = "", help = "Marginal tax rate in percent, e.g. 27.5")]
    tax_rate: String,
    #[arg(long, default_value = "")]
    current_age: String,
    #[arg(long, default_value = "")]
    years_of_college: String,
    #[arg(long, help = "Print JSON instead of labelled lines")]
    json: bool,
}

/// A form value as sent by API clients: either raw field text or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    fn currency(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(s) => parse_currency(s),
        }
    }

    fn decimal(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(s) => parse_decimal_field(s),
        }
    }

    fn integer(&self) -> Option<i64> {
        match self {
            FieldValue::Number(v) if v.is_finite() => Some(v.trunc() as i64),
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => parse_integer_field(s),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    taxable_income: Option<FieldValue>,
    annual_tuition: Option<FieldValue>,
    tax_rate: Option<FieldValue>,
    current_age: Option<FieldValue>,
    years_of_college: Option<FieldValue>,
}

impl CalculatePayload {
    fn to_input(&self) -> CalculationInput {
        CalculationInput {
            taxable_income: self.taxable_income.as_ref().and_then(FieldValue::currency),
            annual_tuition: self.annual_tuition.as_ref().and_then(FieldValue::currency),
            tax_rate_percent: self.tax_rate.as_ref().and_then(FieldValue::decimal),
            current_age: self.current_age.as_ref().and_then(FieldValue::integer),
            years_of_college: self.years_of_college.as_ref().and_then(FieldValue::integer),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct MaskQuery {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    #[serde(flatten)]
    result: CalculationResult,
    formatted: FormattedResult,
}

#[derive(Debug, Serialize)]
struct MaskResponse {
    masked: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

#[derive(Clone, Debug)]
struct AppState {
    calculator: BenefitCalculator,
}

fn build_policy(args: &PolicyArgs) -> Result<DeductionPolicy, PolicyError> {
    let policy = DeductionPolicy {
        deduction_limit: args.deduction_limit,
        retroactive_years: args.retroactive_years,
        majority_age: args.majority_age,
        max_age: args.max_age,
    };
    policy.validate()?;
    Ok(policy)
}

pub async fn run(cli: Cli) -> ExitCode {
    let policy = match build_policy(&cli.policy) {
        Ok(policy) => policy,
        Err(e) => {
            error!(error = %e, "invalid deduction policy");
            return ExitCode::FAILURE;
        }
    };
    let calculator = BenefitCalculator::new(policy);

    match cli.command {
        Command::Calculate(args) => run_calculate(calculator, &args),
        Command::Serve { port } => match run_http_server(port, calculator).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "server error");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_calculate(calculator: BenefitCalculator, args: &CalculateArgs) -> ExitCode {
    let mut controller = FormController::new(calculator);
    for event in calculate_events(args) {
        controller.dispatch(event);
    }

    let mut code = ExitCode::FAILURE;
    for effect in controller.dispatch(FormEvent::Submit) {
        match effect {
            Effect::ShowResults(formatted) => {
                if args.json {
                    match serde_json::to_string_pretty(&formatted) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            error!(error = %e, "failed to serialize results");
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{}", render_results(&formatted));
                }
                code = ExitCode::SUCCESS;
            }
            Effect::Alert(message) => eprintln!("{message}"),
            Effect::SetFieldValue { .. } | Effect::ScrollIntoView(_) => {}
        }
    }
    code
}

fn calculate_events(args: &CalculateArgs) -> Vec<FormEvent> {
    [
        (Field::TaxableIncome, &args.taxable_income),
        (Field::AnnualTuition, &args.annual_tuition),
        (Field::TaxRate, &args.tax_rate),
        (Field::CurrentAge, &args.current_age),
        (Field::YearsOfCollege, &args.years_of_college),
    ]
    .into_iter()
    .map(|(field, text)| FormEvent::Set {
        field,
        text: text.clone(),
    })
    .collect()
}

fn render_results(formatted: &FormattedResult) -> String {
    format!(
        "Economia anual:           {}\n\
         Economia em 5 anos:       {}\n\
         Benefício futuro:         {}\n\
         Benefício total estimado: {}",
        formatted.annual_savings,
        formatted.five_year_savings,
        formatted.future_benefit,
        formatted.total_estimated_benefit
    )
}

fn router(calculator: BenefitCalculator) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .route("/api/format-currency", get(format_currency_handler))
        .route("/api/policy", get(policy_handler))
        .fallback(not_found_handler)
        .with_state(AppState { calculator })
}

pub async fn run_http_server(port: u16, calculator: BenefitCalculator) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router(calculator);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "tuition benefit API listening");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found", None)
}

async fn calculate_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<CalculatePayload>,
) -> Response {
    calculate_handler_impl(&state.calculator, &payload)
}

async fn calculate_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<CalculatePayload>,
) -> Response {
    calculate_handler_impl(&state.calculator, &payload)
}

async fn format_currency_handler(Query(query): Query<MaskQuery>) -> Response {
    json_response(
        StatusCode::OK,
        MaskResponse {
            masked: mask_currency_input(&query.value),
        },
    )
}

async fn policy_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, *state.calculator.policy())
}

fn calculate_handler_impl(calculator: &BenefitCalculator, payload: &CalculatePayload) -> Response {
    match calculate(calculator, payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(e) => {
            warn!(kind = e.kind(), "calculation rejected");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string(), Some(e.kind()))
        }
    }
}

fn calculate(
    calculator: &BenefitCalculator,
    payload: &CalculatePayload,
) -> Result<CalculateResponse, CalculationError> {
    let result = calculator.compute(&payload.to_input())?;
    Ok(CalculateResponse {
        formatted: result.formatted(),
        result,
    })
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str, kind: Option<&'static str>) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            kind,
        },
    )
}

#[cfg(test)]
fn payload_from_json(json: &str) -> Result<CalculatePayload, String> {
    serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))
}
