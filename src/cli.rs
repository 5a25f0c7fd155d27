//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use crate::adapters::console_report::{render_summary, ConsoleReportAdapter};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::analysis::{analyze, AnalysisRequest, PortfolioAnalysis};
use crate::domain::config_validation::{parse_date, validate_portfolio_config};
use crate::domain::error::RebalancerError;
use crate::domain::rebalance::{FullRebalance, DEFAULT_INITIAL_CAPITAL};
use crate::domain::resample::{GapPolicy, Period};
use crate::domain::universe::{parse_tickers, parse_weights};
use crate::domain::weights::{WeightCheck, WeightVector, DEFAULT_WEIGHT_TOLERANCE};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{fetch_all, DataPort};
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_PATH: &str = "./data";

#[derive(Parser, Debug)]
#[command(
    name = "rebalancer",
    about = "Fixed-weight rebalancing portfolio analyzer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate the configured portfolio and report CAGR and MDD
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated tickers, overriding [portfolio] tickers
        #[arg(long)]
        tickers: Option<String>,
        /// Comma-separated weights, overriding [portfolio] weights
        #[arg(long)]
        weights: Option<String>,
        /// YYYY-MM-DD or YYYY-MM
        #[arg(long)]
        start_date: Option<String>,
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a portfolio configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show available data range per ticker
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
    Typst,
}

impl ReportFormat {
    fn default_output(self) -> Option<PathBuf> {
        match self {
            ReportFormat::Console => None,
            ReportFormat::Json => Some(PathBuf::from("report.json")),
            ReportFormat::Typst => Some(PathBuf::from("report.typ")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Console => "console",
            ReportFormat::Json => "json",
            ReportFormat::Typst => "typst",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(ReportFormat::Console),
            "json" => Ok(ReportFormat::Json),
            "typst" => Ok(ReportFormat::Typst),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

/// Command-line values layered over a config file; a key set here hides the
/// file's value.
pub struct LayeredConfig<'a> {
    base: &'a dyn ConfigPort,
    overrides: HashMap<(String, String), String>,
}

impl<'a> LayeredConfig<'a> {
    pub fn new(base: &'a dyn ConfigPort) -> Self {
        Self {
            base,
            overrides: HashMap::new(),
        }
    }

    pub fn set(&mut self, section: &str, key: &str, value: Option<String>) {
        if let Some(value) = value {
            self.overrides
                .insert((section.to_string(), key.to_string()), value);
        }
    }
}

impl ConfigPort for LayeredConfig<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.overrides
            .get(&(section.to_string(), key.to_string()))
            .cloned()
            .or_else(|| self.base.get_string(section, key))
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            tickers,
            weights,
            start_date,
            format,
            output,
        } => run_analyze(&config, tickers, weights, start_date, format, output),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
    }
}

fn fail(err: RebalancerError) -> ExitCode {
    tracing::error!("{err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    tracing::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(fail)
}

fn config_invalid(key: &str, reason: impl ToString) -> RebalancerError {
    RebalancerError::ConfigInvalid {
        section: "portfolio".into(),
        key: key.into(),
        reason: reason.to_string(),
    }
}

/// Tickers and the analysis parameters for them, read from `[portfolio]`.
pub fn build_analysis_request(
    config: &dyn ConfigPort,
) -> Result<(Vec<String>, AnalysisRequest), RebalancerError> {
    let tickers_str =
        config
            .get_trimmed("portfolio", "tickers")
            .ok_or_else(|| RebalancerError::ConfigMissing {
                section: "portfolio".into(),
                key: "tickers".into(),
            })?;
    let tickers = parse_tickers(&tickers_str).map_err(|e| config_invalid("tickers", e))?;

    let weights_str =
        config
            .get_trimmed("portfolio", "weights")
            .ok_or_else(|| RebalancerError::ConfigMissing {
                section: "portfolio".into(),
                key: "weights".into(),
            })?;
    let weights = parse_weights(&weights_str).map_err(|e| config_invalid("weights", e))?;
    let weights = WeightVector::new(weights)?;

    let start_date = match config.get_trimmed("portfolio", "start_date") {
        Some(s) => Some(parse_date(&s).ok_or_else(|| {
            config_invalid("start_date", "expected YYYY-MM-DD or YYYY-MM")
        })?),
        None => None,
    };

    let period = match config.get_trimmed("portfolio", "period") {
        Some(s) => s.parse::<Period>().map_err(|e| config_invalid("period", e))?,
        None => Period::default(),
    };
    let gap_policy = match config.get_trimmed("portfolio", "gap_policy") {
        Some(s) => s
            .parse::<GapPolicy>()
            .map_err(|e| config_invalid("gap_policy", e))?,
        None => GapPolicy::default(),
    };

    let weight_check = if config.get_bool("portfolio", "require_unit_weights", false)? {
        WeightCheck::UnitSum {
            tolerance: config.get_double(
                "portfolio",
                "weight_tolerance",
                DEFAULT_WEIGHT_TOLERANCE,
            )?,
        }
    } else {
        WeightCheck::Permissive
    };

    let request = AnalysisRequest {
        weights,
        start_date,
        initial_capital: config.get_double(
            "portfolio",
            "initial_capital",
            DEFAULT_INITIAL_CAPITAL,
        )?,
        period,
        gap_policy,
        weight_check,
    };
    Ok((tickers, request))
}

/// Fetch every ticker and run the core pipeline with full rebalancing.
pub fn run_analysis_pipeline(
    data_port: &dyn DataPort,
    tickers: &[String],
    request: &AnalysisRequest,
) -> Result<PortfolioAnalysis, RebalancerError> {
    tracing::info!("Fetching {} series", tickers.len());
    let series = fetch_all(data_port, tickers)?;
    for s in &series {
        tracing::debug!(ticker = %s.name, points = s.len(), "series fetched");
    }

    tracing::info!(
        period = %request.period,
        gap_policy = %request.gap_policy,
        "Running analysis"
    );
    let analysis = analyze(&series, request, &FullRebalance)?;
    tracing::info!(
        periods = analysis.returns.len(),
        "Analysis complete"
    );
    Ok(analysis)
}

pub fn write_report(
    analysis: &PortfolioAnalysis,
    format: ReportFormat,
    output: Option<&Path>,
    template_path: Option<PathBuf>,
) -> Result<Option<PathBuf>, RebalancerError> {
    let Some(path) = output.map(Path::to_path_buf).or_else(|| format.default_output()) else {
        return Ok(None);
    };
    let port: Box<dyn ReportPort> = match format {
        ReportFormat::Console => Box::new(ConsoleReportAdapter),
        ReportFormat::Json => Box::new(JsonReportAdapter),
        ReportFormat::Typst => Box::new(TypstReportAdapter::new(template_path)),
    };
    port.write(analysis, &path)?;
    Ok(Some(path))
}

fn run_analyze(
    config_path: &Path,
    tickers: Option<String>,
    weights: Option<String>,
    start_date: Option<String>,
    format: Option<ReportFormat>,
    output: Option<PathBuf>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let mut config = LayeredConfig::new(&adapter);
    config.set("portfolio", "tickers", tickers);
    config.set("portfolio", "weights", weights);
    config.set("portfolio", "start_date", start_date);
    config.set("report", "format", format.map(|f| f.to_string()));

    if let Err(e) = validate_portfolio_config(&config) {
        return fail(e);
    }

    let (tickers, request) = match build_analysis_request(&config) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    let format = match config.get_trimmed("report", "format") {
        Some(f) => match f.parse::<ReportFormat>() {
            Ok(f) => f,
            Err(reason) => {
                return fail(RebalancerError::ConfigInvalid {
                    section: "report".into(),
                    key: "format".into(),
                    reason,
                });
            }
        },
        None => ReportFormat::default(),
    };
    let output = output.or_else(|| config.get_trimmed("report", "output").map(PathBuf::from));
    let template_path = config
        .get_trimmed("report", "template_path")
        .map(PathBuf::from);

    let data_path = config
        .get_trimmed("data", "path")
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let data_port = CsvAdapter::new(PathBuf::from(data_path));

    let analysis = match run_analysis_pipeline(&data_port, &tickers, &request) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };

    print!("{}", render_summary(&analysis));

    match write_report(&analysis, format, output.as_deref(), template_path) {
        Ok(Some(path)) => {
            tracing::info!("Report written to: {}", path.display());
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_portfolio_config(&adapter) {
        return fail(e);
    }
    let (tickers, request) = match build_analysis_request(&adapter) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    println!("Portfolio:");
    for (ticker, weight) in tickers.iter().zip(request.weights.as_slice()) {
        println!("  {:<12} {:>6.1}%", ticker, weight * 100.0);
    }
    println!("  weight sum: {:.4}", request.weights.sum());
    if let Some(start) = request.start_date {
        println!("Start date: {}", start);
    }
    println!("Initial capital: {}", request.initial_capital);
    println!("Period: {}", request.period);
    println!("Gap policy: {}", request.gap_policy);
    println!("\nConfig validated successfully");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, ticker: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data_path = config
        .get_trimmed("data", "path")
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let data_port = CsvAdapter::new(PathBuf::from(data_path));

    let tickers = match ticker {
        Some(t) => vec![t.to_string()],
        None => match config.get_trimmed("portfolio", "tickers") {
            Some(raw) => match parse_tickers(&raw) {
                Ok(t) => t,
                Err(e) => return fail(config_invalid("tickers", e)),
            },
            None => match data_port.list_tickers() {
                Ok(t) => t,
                Err(e) => return fail(e),
            },
        },
    };

    for ticker in &tickers {
        match data_port.get_data_range(ticker) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} rows, {} to {}", ticker, count, first, last)
            }
            Ok(None) => println!("{}: no data", ticker),
            Err(e) => return fail(e),
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn cli_parses_analyze_overrides() {
        let cli = Cli::try_parse_from([
            "rebalancer",
            "analyze",
            "--config",
            "p.ini",
            "--tickers",
            "A,B",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze {
                tickers, format, ..
            } => {
                assert_eq!(tickers.as_deref(), Some("A,B"));
                assert_eq!(format, Some(ReportFormat::Json));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn layered_config_prefers_overrides() {
        let base = config("[portfolio]\ntickers = A\nweights = 1\ninitial_capital = 5\n");
        let mut layered = LayeredConfig::new(&base);
        layered.set("portfolio", "tickers", Some("B".into()));
        layered.set("portfolio", "weights", None);
        layered.set("portfolio", "initial_capital", Some("7.5".into()));

        assert_eq!(layered.get_string("portfolio", "tickers"), Some("B".into()));
        assert_eq!(layered.get_string("portfolio", "weights"), Some("1".into()));
        assert_eq!(
            layered.get_double("portfolio", "initial_capital", 1.0).unwrap(),
            7.5
        );
    }

    #[test]
    fn build_request_reads_all_keys() {
        let cfg = config(
            "[portfolio]\ntickers = A, B\nweights = 60%, 40%\nstart_date = 2022-03\n\
             initial_capital = 100\nperiod = quarterly\ngap_policy = skip\n\
             require_unit_weights = true\nweight_tolerance = 0.01\n",
        );
        let (tickers, request) = build_analysis_request(&cfg).unwrap();

        assert_eq!(tickers, vec!["A", "B"]);
        assert_eq!(request.weights.len(), 2);
        assert_eq!(
            request.start_date,
            chrono::NaiveDate::from_ymd_opt(2022, 3, 1)
        );
        assert_eq!(request.initial_capital, 100.0);
        assert_eq!(request.period, Period::Quarterly);
        assert_eq!(request.gap_policy, GapPolicy::Skip);
        assert_eq!(request.weight_check, WeightCheck::UnitSum { tolerance: 0.01 });
    }

    #[test]
    fn build_request_defaults() {
        let cfg = config("[portfolio]\ntickers = A\nweights = 1\n");
        let (_, request) = build_analysis_request(&cfg).unwrap();

        assert_eq!(request.start_date, None);
        assert_eq!(request.initial_capital, DEFAULT_INITIAL_CAPITAL);
        assert_eq!(request.period, Period::Monthly);
        assert_eq!(request.gap_policy, GapPolicy::ForwardFill);
        assert_eq!(request.weight_check, WeightCheck::Permissive);
    }

    #[test]
    fn build_request_rejects_negative_weight() {
        let cfg = config("[portfolio]\ntickers = A,B\nweights = 1.5,-0.5\n");
        let err = build_analysis_request(&cfg).unwrap_err();
        assert!(matches!(err, RebalancerError::InvalidWeight { index: 1, .. }));
    }

    #[test]
    fn report_format_parsing() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("pdf".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::Typst.to_string(), "typst");
    }

    #[test]
    fn report_format_names_match_validation() {
        for name in crate::domain::config_validation::REPORT_FORMATS {
            let format = name.parse::<ReportFormat>().unwrap();
            assert_eq!(format.to_string(), name);
        }
        assert!("text".parse::<ReportFormat>().is_err());
        assert!("typ".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn build_request_rejects_malformed_numbers_and_flags() {
        let cfg = config("[portfolio]\ntickers = A\nweights = 1\ninitial_capital = 10_000\n");
        let err = build_analysis_request(&cfg).unwrap_err();
        assert!(
            matches!(err, RebalancerError::ConfigInvalid { key, .. } if key == "initial_capital")
        );

        let cfg = config("[portfolio]\ntickers = A\nweights = 1\nrequire_unit_weights = sure\n");
        let err = build_analysis_request(&cfg).unwrap_err();
        assert!(
            matches!(err, RebalancerError::ConfigInvalid { key, .. } if key == "require_unit_weights")
        );
    }
}
