//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::json_state_adapter::JsonStateAdapter;
use crate::adapters::log_notifier::LogNotifier;
use crate::domain::backtest::{run_backtest, BacktestConfig};
use crate::domain::benchmark::compare;
use crate::domain::config_validation::{
    read_benchmarks, read_date_range, read_dividend_mode, read_initial_capital, read_period,
    read_thresholds, read_usize, validate_backtest_config, validate_monitor_config,
};
use crate::domain::error::WatchError;
use crate::domain::metrics::PerformanceSummary;
use crate::domain::monitor::{run_monitor, MonitorConfig, MonitorOutcome};
use crate::domain::optimize::{sweep, SweepGrid};
use crate::domain::portfolio::DividendMode;
use crate::domain::price::validate_series;
use crate::domain::report::BacktestReport;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_STATE_PATH: &str = "state.json";
const DEFAULT_REPORT_PATH: &str = "backtest_report.json";

#[derive(Parser, Debug)]
#[command(name = "rsiwatch", about = "RSI threshold monitor and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate the latest RSI and update the stored signal state
    Monitor {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        buy_threshold: Option<f64>,
        #[arg(long)]
        sell_threshold: Option<f64>,
        #[arg(long)]
        period: Option<usize>,
    },
    /// Replay the threshold rule over the price history
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        buy_threshold: Option<f64>,
        #[arg(long)]
        sell_threshold: Option<f64>,
        #[arg(long)]
        period: Option<usize>,
        /// reinvest, accumulate or withhold
        #[arg(long)]
        dividend_mode: Option<DividendMode>,
    },
    /// Sweep RSI period and threshold pairs and rank them by total return
    Optimize {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub buy_threshold: Option<f64>,
    pub sell_threshold: Option<f64>,
    pub period: Option<usize>,
    pub dividend_mode: Option<DividendMode>,
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub monitor: MonitorConfig,
    pub data_path: PathBuf,
    pub state_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BacktestSettings {
    pub symbol: String,
    pub backtest: BacktestConfig,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub benchmarks: Vec<String>,
    pub data_path: PathBuf,
    pub report_path: PathBuf,
}

impl BacktestSettings {
    /// Open ends of the configured range extend to the whole series.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (
            self.start_date.unwrap_or(NaiveDate::MIN),
            self.end_date.unwrap_or(NaiveDate::MAX),
        )
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Monitor {
            config,
            buy_threshold,
            sell_threshold,
            period,
        } => run_monitor_command(
            &config,
            &Overrides {
                buy_threshold,
                sell_threshold,
                period,
                dividend_mode: None,
            },
        ),
        Command::Backtest {
            config,
            output,
            buy_threshold,
            sell_threshold,
            period,
            dividend_mode,
        } => run_backtest_command(
            &config,
            output.as_deref(),
            &Overrides {
                buy_threshold,
                sell_threshold,
                period,
                dividend_mode,
            },
        ),
        Command::Optimize { config, top } => run_optimize_command(&config, top),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, WatchError> {
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

fn read_symbol(adapter: &dyn ConfigPort) -> Result<String, WatchError> {
    match adapter.get_string("monitor", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(WatchError::ConfigMissing {
            section: "monitor".into(),
            key: "symbol".into(),
        }),
    }
}

fn data_path(adapter: &dyn ConfigPort) -> PathBuf {
    adapter
        .get_string("data", "path")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn build_monitor_settings(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<MonitorSettings, WatchError> {
    let monitor = MonitorConfig {
        symbol: read_symbol(adapter)?,
        thresholds: read_thresholds(adapter, overrides.buy_threshold, overrides.sell_threshold)?,
        period: read_period(adapter, overrides.period)?,
        lookback: read_usize(adapter, "monitor", "lookback", 0)?,
    };
    let state_path = adapter
        .get_string("monitor", "state_path")
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_STATE_PATH.to_string());

    Ok(MonitorSettings {
        monitor,
        data_path: data_path(adapter),
        state_path: PathBuf::from(state_path),
    })
}

pub fn build_backtest_settings(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<BacktestSettings, WatchError> {
    let initial_capital = read_initial_capital(adapter)?;
    let (start_date, end_date) = read_date_range(adapter)?;

    let dividend_mode = match overrides.dividend_mode {
        Some(mode) => mode,
        None => read_dividend_mode(adapter)?,
    };
    let report_path = adapter
        .get_string("backtest", "report_path")
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_REPORT_PATH.to_string());

    Ok(BacktestSettings {
        symbol: read_symbol(adapter)?,
        backtest: BacktestConfig {
            thresholds: read_thresholds(
                adapter,
                overrides.buy_threshold,
                overrides.sell_threshold,
            )?,
            period: read_period(adapter, overrides.period)?,
            initial_capital,
            dividend_mode,
        },
        start_date,
        end_date,
        benchmarks: read_benchmarks(adapter)?,
        data_path: data_path(adapter),
        report_path: PathBuf::from(report_path),
    })
}

/// Fetch, simulate, summarize and compare; everything except writing the report.
pub fn backtest_pipeline(
    data_port: &dyn DataPort,
    settings: &BacktestSettings,
) -> Result<BacktestReport, WatchError> {
    let (start, end) = settings.date_range();

    let prices = data_port.fetch_prices(&settings.symbol, start, end)?;
    tracing::info!(
        symbol = %settings.symbol,
        points = prices.len(),
        period = settings.backtest.period,
        buy = settings.backtest.thresholds.buy(),
        sell = settings.backtest.thresholds.sell(),
        "running backtest"
    );

    let result = run_backtest(&prices, &settings.backtest)?;
    let summary = PerformanceSummary::compute(&result)?;

    let mut benchmark_series = BTreeMap::new();
    for name in &settings.benchmarks {
        let series = data_port.fetch_prices(name, start, end)?;
        validate_series(&series)?;
        benchmark_series.insert(name.clone(), series);
    }
    let benchmarks = compare(&result.curve, &benchmark_series)?;

    Ok(BacktestReport::new(
        &settings.symbol,
        &settings.backtest,
        result,
        summary,
        benchmarks,
    ))
}

fn run_monitor_command(config_path: &Path, overrides: &Overrides) -> Result<(), WatchError> {
    let adapter = load_config(config_path)?;
    let settings = build_monitor_settings(&adapter, overrides)?;

    let data_port = CsvAdapter::new(settings.data_path.clone());
    let prices = data_port.fetch_prices(&settings.monitor.symbol, NaiveDate::MIN, NaiveDate::MAX)?;
    let store = JsonStateAdapter::new(settings.state_path.clone());
    tracing::debug!(state = %store.path().display(), points = prices.len(), "monitor inputs");

    let MonitorOutcome { document, signal } =
        run_monitor(&prices, &settings.monitor, &store, &LogNotifier)?;

    println!(
        "{} {}: RSI({}) {:.2} close {} state {} signal {}",
        document.date,
        settings.monitor.symbol,
        settings.monitor.period,
        document.rsi,
        document.price,
        document.signal_state,
        signal,
    );
    Ok(())
}

fn run_backtest_command(
    config_path: &Path,
    output: Option<&Path>,
    overrides: &Overrides,
) -> Result<(), WatchError> {
    let adapter = load_config(config_path)?;
    let settings = build_backtest_settings(&adapter, overrides)?;

    let data_port = CsvAdapter::new(settings.data_path.clone());
    let report = backtest_pipeline(&data_port, &settings)?;
    print_summary(&report);

    let output = output.unwrap_or(settings.report_path.as_path());
    JsonReportAdapter.write(&report, &output.to_string_lossy())?;
    eprintln!("\nReport written to: {}", output.display());
    Ok(())
}

fn print_summary(report: &BacktestReport) {
    let summary = &report.summary;
    eprintln!(
        "\n=== {} RSI({}) buy<{} sell>{} ===",
        report.symbol, report.period, report.buy_threshold, report.sell_threshold
    );
    eprintln!("Total Return:     {:.2}%", summary.total_return * 100.0);
    eprintln!("Annualized:       {:.2}%", summary.annualized_return * 100.0);
    eprintln!("Max Drawdown:     -{:.1}%", summary.max_drawdown * 100.0);
    eprintln!("Round Trips:      {}", summary.round_trips);
    eprintln!("Win Rate:         {:.1}%", summary.win_rate * 100.0);
    eprintln!("Final Holding:    {:?}", summary.final_holding);
    eprintln!("Dividend Mode:    {:?}", report.dividend_mode);

    eprintln!("\n=== Benchmarks ===");
    for result in report.benchmarks.values() {
        eprintln!(
            "  {:<28} {:>9.2}% total  {:>8.2}% annualized",
            result.name,
            result.total_return * 100.0,
            result.annualized_return * 100.0,
        );
    }
}

fn run_optimize_command(config_path: &Path, top: usize) -> Result<(), WatchError> {
    let adapter = load_config(config_path)?;
    let settings = build_backtest_settings(&adapter, &Overrides::default())?;

    let data_port = CsvAdapter::new(settings.data_path.clone());
    let (start, end) = settings.date_range();
    let prices = data_port.fetch_prices(&settings.symbol, start, end)?;

    let grid = SweepGrid {
        initial_capital: settings.backtest.initial_capital,
        dividend_mode: settings.backtest.dividend_mode,
        ..SweepGrid::default()
    };
    eprintln!(
        "Sweeping {} combinations over {} prices",
        grid.combinations().len(),
        prices.len()
    );
    let results = sweep(&prices, &grid)?;

    println!(
        "{:>6} {:>4} {:>4} {:>10} {:>10} {:>9} {:>6} {:>8}",
        "period", "buy", "sell", "total%", "annual%", "maxdd%", "trips", "winrate%"
    );
    for r in results.iter().take(top) {
        println!(
            "{:>6} {:>4} {:>4} {:>10.2} {:>10.2} {:>9.2} {:>6} {:>8.1}",
            r.period,
            r.buy_threshold,
            r.sell_threshold,
            r.summary.total_return * 100.0,
            r.summary.annualized_return * 100.0,
            r.summary.max_drawdown * 100.0,
            r.summary.round_trips,
            r.summary.win_rate * 100.0,
        );
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), WatchError> {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = load_config(config_path)?;

    validate_monitor_config(&adapter)?;
    validate_backtest_config(&adapter)?;

    let monitor = build_monitor_settings(&adapter, &Overrides::default())?;
    let backtest = build_backtest_settings(&adapter, &Overrides::default())?;

    eprintln!("\nMonitor:");
    eprintln!("  symbol:     {}", monitor.monitor.symbol);
    eprintln!(
        "  thresholds: buy < {}, sell > {}",
        monitor.monitor.thresholds.buy(),
        monitor.monitor.thresholds.sell()
    );
    eprintln!("  period:     {}", monitor.monitor.period);
    eprintln!("  state:      {}", monitor.state_path.display());
    eprintln!("  data:       {}", monitor.data_path.display());

    eprintln!("\nBacktest:");
    eprintln!(
        "  range:      {} to {}",
        backtest
            .start_date
            .map_or("start of data".to_string(), |d| d.to_string()),
        backtest
            .end_date
            .map_or("end of data".to_string(), |d| d.to_string()),
    );
    eprintln!("  capital:    {}", backtest.backtest.initial_capital);
    eprintln!("  dividends:  {:?}", backtest.backtest.dividend_mode);
    if !backtest.benchmarks.is_empty() {
        eprintln!("  benchmarks: {}", backtest.benchmarks.join(", "));
    }

    eprintln!("\nConfiguration is valid.");
    Ok(())
}
