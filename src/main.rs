use std::error::Error;
use std::net::IpAddr;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use taxloan::api::{AmortizeResponse, ServerConfig, run_http_server};
use taxloan::core::{
    CalcError, LoanTerms, PrepayScenario, amortization_schedule, assess_income_tax,
    compare_prepay_vs_invest, default_slabs,
};

#[derive(Parser, Debug)]
#[command(
    name = "taxloan",
    about = "Progressive tax, loan amortization and prepay-vs-invest calculators"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON HTTP API
    Serve {
        #[arg(long, env = "TAXLOAN_HOST", default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, env = "TAXLOAN_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Progressive tax on the default slab table
    Tax {
        #[arg(long)]
        annual_income: f64,
        #[arg(long, default_value_t = 0.0)]
        deductions: f64,
    },
    /// Full amortization schedule for a fixed-payment loan
    Amortize {
        #[command(flatten)]
        loan: LoanArgs,
    },
    /// Compare prepaying a loan against investing the same amount
    Prepay {
        #[command(flatten)]
        loan: LoanArgs,
        #[arg(long, default_value_t = 0.0, help = "Extra amount paid per month")]
        extra_monthly: f64,
        #[arg(long, help = "Expected annual investment return in percent")]
        invest_rate_pct: f64,
        #[arg(long, default_value_t = 0.0, help = "Annual inflation in percent (not yet used)")]
        inflation_pct: f64,
    },
}

#[derive(Args, Debug)]
struct LoanArgs {
    #[arg(long)]
    principal: f64,
    #[arg(long, help = "Annual interest rate in percent, e.g. 6")]
    annual_rate_pct: f64,
    #[arg(long)]
    years: f64,
    #[arg(long, default_value_t = 12)]
    payments_per_year: u32,
}

impl From<LoanArgs> for LoanTerms {
    fn from(args: LoanArgs) -> Self {
        LoanTerms {
            principal: args.principal,
            annual_rate_pct: args.annual_rate_pct,
            years: args.years,
            payments_per_year: args.payments_per_year,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Serve { host, port } => {
            if let Err(e) = run_http_server(ServerConfig { host, port }).await {
                tracing::error!("Server error: {e}");
                std::process::exit(1);
            }
            return;
        }
        Command::Tax {
            annual_income,
            deductions,
        } => run_tax(annual_income, deductions),
        Command::Amortize { loan } => run_amortize(loan.into()),
        Command::Prepay {
            loan,
            extra_monthly,
            invest_rate_pct,
            inflation_pct,
        } => run_prepay(PrepayScenario {
            loan: loan.into(),
            extra_monthly,
            invest_rate_pct,
            inflation_pct,
        }),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_tax(annual_income: f64, deductions: f64) -> Result<(), Box<dyn Error>> {
    if !annual_income.is_finite() || annual_income < 0.0 {
        return Err(CalcError::InvalidInput("--annual-income must be >= 0".to_string()).into());
    }
    if !deductions.is_finite() || deductions < 0.0 {
        return Err(CalcError::InvalidInput("--deductions must be >= 0".to_string()).into());
    }
    print_json(&assess_income_tax(annual_income, deductions, &default_slabs()))
}

fn run_amortize(terms: LoanTerms) -> Result<(), Box<dyn Error>> {
    terms.validate()?;
    let schedule = amortization_schedule(&terms);
    print_json(&AmortizeResponse::new(&terms, schedule))
}

fn run_prepay(scenario: PrepayScenario) -> Result<(), Box<dyn Error>> {
    let comparison = compare_prepay_vs_invest(&scenario)?;
    print_json(&comparison)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
