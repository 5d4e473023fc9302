use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use beilage::config::StatementConfig;
use beilage::justification::JustificationStrategy;
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "beilage",
    version,
    about = "Generate per-creditor statement enclosures from a claims ledger"
)]
struct Cli {
    /// Workbook holding the ledger (and the justification register).
    #[arg(long)]
    input: PathBuf,

    /// Workbook whose first sheet provides the static statement labels.
    #[arg(long)]
    template: PathBuf,

    /// Output workbook, one sheet per creditor.
    #[arg(long)]
    output: PathBuf,

    /// TOML configuration; unspecified settings keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ledger sheet name.
    #[arg(long)]
    sheet: Option<String>,

    /// Justification register sheet name.
    #[arg(long)]
    register_sheet: Option<String>,

    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Exit with an error when any creditor had to be skipped.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum StrategyArg {
    CrossReference,
    Inline,
}

impl From<StrategyArg> for JustificationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::CrossReference => JustificationStrategy::CrossReference,
            StrategyArg::Inline => JustificationStrategy::Inline,
        }
    }
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "run failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let report = beilage::xlsx::run(&cli.input, &cli.template, &cli.output, &config)
        .with_context(|| format!("generating statements from {}", cli.input.display()))?;

    let outcome = &report.outcome;
    for failure in &outcome.failures {
        warn!(error = %failure, "creditor skipped");
    }
    for advisory in &outcome.advisories {
        info!(
            creditor = %advisory.creditor,
            sheet = %advisory.sheet_name,
            start_row = advisory.start_row,
            "check page break before justification block"
        );
    }
    info!(
        output = %cli.output.display(),
        sheets = report.persisted.sheets_written,
        skipped = outcome.failures.len(),
        "done"
    );

    if cli.strict && outcome.has_failures() {
        bail!("{} creditor(s) skipped", outcome.failures.len());
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<StatementConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            StatementConfig::from_toml_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => StatementConfig::default(),
    };
    if let Some(sheet) = &cli.sheet {
        config.input_sheet = sheet.clone();
    }
    if let Some(sheet) = &cli.register_sheet {
        config.justification.register_sheet = sheet.clone();
    }
    if let Some(strategy) = cli.strategy {
        config.justification.strategy = strategy.into();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
