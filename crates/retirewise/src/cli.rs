use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{WrapErr, eyre};
use retirewise_core::config::SimulationRequest;
use retirewise_core::model::{Allocation, RetirementOutlook};
use retirewise_core::{InMemoryPriceHistory, project};

use crate::data::{UserData, load_config, load_portfolio, load_prices};
use crate::report::ProjectionReport;

#[derive(Parser, Debug)]
#[command(name = "retirewise")]
#[command(about = "Monte Carlo projection of a retirement portfolio")]
pub struct Args {
    /// Portfolio JSON produced by the portfolio supplier
    #[arg(short, long)]
    pub portfolio: PathBuf,

    /// Portfolio to use when the file holds several
    #[arg(short, long)]
    pub name: Option<String>,

    /// Price history JSON: { "TICKER": [["YYYY-MM-DD", close], ...] }
    #[arg(long)]
    pub prices: Option<PathBuf>,

    /// YAML file with market assumptions and run defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Projection horizon in years (overrides the age-based horizon)
    #[arg(long)]
    pub years: Option<usize>,

    /// Current age (default: from the portfolio's user data)
    #[arg(long)]
    pub age: Option<u32>,

    /// Retirement age (default: from the portfolio's user data)
    #[arg(long)]
    pub retirement_age: Option<u32>,

    /// Initial deposit (default: from the portfolio's user data)
    #[arg(long)]
    pub initial: Option<f64>,

    /// Monthly contribution (default: from the portfolio's user data)
    #[arg(long)]
    pub monthly: Option<f64>,

    /// Number of Monte Carlo trials
    #[arg(short, long)]
    pub trials: Option<usize>,

    /// Base seed for reproducible output
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Age used to spread the final value into a monthly withdrawal
    #[arg(long)]
    pub life_expectancy: Option<u32>,

    /// Print the full result as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

enum Horizon {
    Years(usize),
    Ages(u32, u32),
}

/// Horizon and the retirement age used for the withdrawal outlook
fn resolve_horizon(args: &Args, user: &UserData) -> color_eyre::Result<(Horizon, Option<u32>)> {
    let age = args.age.or(user.age);
    let retirement_age = args.retirement_age.or(user.retirement_age);

    if let Some(years) = args.years {
        let retire_at = match (args.retirement_age, age) {
            (Some(retire), _) => Some(retire),
            (None, Some(age)) => u32::try_from(years).ok().and_then(|y| age.checked_add(y)),
            (None, None) => None,
        };
        return Ok((Horizon::Years(years), retire_at));
    }

    match (age, retirement_age) {
        (Some(age), Some(retire)) => Ok((Horizon::Ages(age, retire), Some(retire))),
        _ => Err(eyre!(
            "no projection horizon: pass --years, or --age and --retirement-age"
        )),
    }
}

/// Load inputs, run the projection and render the report
pub fn run(args: &Args) -> color_eyre::Result<String> {
    let config = load_config(args.config.as_deref())?;
    let doc = load_portfolio(&args.portfolio, args.name.as_deref())?;
    let provider = match &args.prices {
        Some(path) => load_prices(path)?,
        None => InMemoryPriceHistory::new(),
    };

    let allocation = Allocation::from_holdings(&doc.portfolio).wrap_err("invalid portfolio")?;
    let initial = args
        .initial
        .or(doc.user_data.initial_investment)
        .unwrap_or(0.0);
    let monthly = args
        .monthly
        .or(doc.user_data.monthly_contribution)
        .unwrap_or(0.0);
    let (horizon, retirement_age) = resolve_horizon(args, &doc.user_data)?;

    let mut builder = SimulationRequest::builder(allocation)
        .defaults(&config.defaults)
        .initial_deposit(initial)
        .monthly_contribution(monthly);
    builder = match horizon {
        Horizon::Years(years) => builder.horizon_years(years),
        Horizon::Ages(age, retire) => builder.retirement(age, retire),
    };
    if let Some(trials) = args.trials {
        builder = builder.num_trials(trials);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let request = builder.build().wrap_err("invalid simulation parameters")?;

    tracing::info!(
        portfolio = doc.portfolio_name.as_deref().unwrap_or("<unnamed>"),
        horizon_months = request.horizon_months(),
        trials = request.num_trials(),
        "running projection"
    );
    let projection = project(&request, &provider, &config.market).wrap_err("projection failed")?;

    let life_expectancy = args
        .life_expectancy
        .unwrap_or(config.defaults.life_expectancy);
    let outlook = retirement_age.and_then(|retire| {
        RetirementOutlook::from_result(&projection.result, retire, life_expectancy)
            .inspect_err(|err| tracing::debug!(%err, "skipping retirement outlook"))
            .ok()
    });

    let report = ProjectionReport {
        portfolio_name: doc.portfolio_name,
        initial_deposit: initial,
        monthly_contribution: monthly,
        allocation: request.allocation().category_weights(),
        holdings: request.allocation().holding_amounts(initial, monthly),
        projection,
        outlook,
    };

    if args.json {
        Ok(report.to_json()?)
    } else {
        Ok(report.to_string())
    }
}
