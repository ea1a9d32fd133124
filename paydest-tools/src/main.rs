use std::{collections::BTreeMap, fmt, fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use paydest_classifier::{Classifier, ClassifierConfig, DestinationKind, Network};
use paydest_intent::{SendIntent, SendIntentController};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "PAYDEST_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(
    name = "paydest",
    about = "Classify payment destinations and decide whether a send can proceed"
)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Overrides on top of the `PAYDEST_*` environment configuration.
#[derive(Args)]
struct ConfigArgs {
    /// Only accept destinations for this network (bitcoin, testnet, signet, regtest).
    #[arg(long, global = true, value_parser = parse_network)]
    network: Option<Network>,
    /// Reject `bitcoin:` and `lightning:` URIs.
    #[arg(long, global = true)]
    no_uri_schemes: bool,
    /// Reject `<pubkey>@<host>[:<port>]` connection strings.
    #[arg(long, global = true)]
    no_connection_strings: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the destination kind of TEXT.
    Classify(TextArgs),
    /// Print whether a send to TEXT proceeds or why it is rejected.
    Decide(TextArgs),
    /// Print everything parsed out of TEXT as JSON.
    Inspect(InspectArgs),
    /// Decide every line of a file and print a summary.
    Screen(ScreenArgs),
}

#[derive(Args)]
struct TextArgs {
    text: String,
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct InspectArgs {
    text: String,
}

#[derive(Args)]
struct ScreenArgs {
    /// File with one destination per line.
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config.resolve();
    info!(
        network = config.network.map(|n| n.as_str()).unwrap_or("any"),
        allow_uri_schemes = config.allow_uri_schemes,
        allow_connection_strings = config.allow_connection_strings,
        "classifier configured"
    );
    let classifier = Classifier::new(config);

    match cli.command {
        Commands::Classify(args) => classify(&classifier, args),
        Commands::Decide(args) => decide(classifier, args),
        Commands::Inspect(args) => inspect(&classifier, args),
        Commands::Screen(args) => screen(classifier, args),
    }
}

impl ConfigArgs {
    fn resolve(&self) -> ClassifierConfig {
        let mut config = ClassifierConfig::from_env();
        if let Some(network) = self.network {
            config = config.with_network(network);
        }
        if self.no_uri_schemes {
            config = config.with_uri_schemes(false);
        }
        if self.no_connection_strings {
            config = config.with_connection_strings(false);
        }
        config
    }
}

fn parse_network(s: &str) -> Result<Network, String> {
    Network::from_str(s).ok_or_else(|| format!("unknown network '{}'", s))
}

fn classify(classifier: &Classifier, args: TextArgs) -> Result<()> {
    let summary = ClassifySummary {
        kind: classifier.classify(&args.text),
        scheme: classifier.matched_scheme(&args.text).map(|s| s.as_str()),
    };
    output_summary(&summary, args.json)
}

fn decide(classifier: Classifier, args: TextArgs) -> Result<()> {
    let intent = SendIntentController::new(classifier).decide(&args.text);
    output_summary(&DecideSummary(intent), args.json)
}

fn inspect(classifier: &Classifier, args: InspectArgs) -> Result<()> {
    let destination = classifier
        .parse(&args.text)
        .context("not a recognized destination")?;
    println!("{}", serde_json::to_string_pretty(&destination)?);
    Ok(())
}

fn screen(classifier: Classifier, args: ScreenArgs) -> Result<()> {
    let contents = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let controller = SendIntentController::new(classifier);

    let report = screen_contents(&controller, args.input.display().to_string(), &contents);
    info!(lines = report.lines.len(), "screened input file");
    output_summary(&report, args.json)
}

fn screen_contents(
    controller: &SendIntentController,
    input: String,
    contents: &str,
) -> ScreenReport {
    let mut lines = Vec::new();
    let mut counts = BTreeMap::new();
    for (index, text) in contents.lines().enumerate() {
        let intent = controller.decide(text);
        *counts.entry(outcome_label(&intent)).or_insert(0usize) += 1;
        lines.push(ScreenLine {
            line: index + 1,
            intent,
        });
    }
    ScreenReport {
        input,
        lines,
        counts,
    }
}

fn outcome_label(intent: &SendIntent) -> &'static str {
    match intent {
        SendIntent::Proceed { kind, .. } => kind.as_str(),
        SendIntent::Reject { reason } => reason.code(),
    }
}

fn output_summary<T>(summary: &T, json: bool) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", summary);
    }
    Ok(())
}

#[derive(Serialize)]
struct ClassifySummary {
    kind: DestinationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheme: Option<&'static str>,
}

impl fmt::Display for ClassifySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scheme {
            Some(scheme) => writeln!(f, "{} ({})", self.kind, scheme),
            None => writeln!(f, "{}", self.kind),
        }
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct DecideSummary(SendIntent);

impl fmt::Display for DecideSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            SendIntent::Proceed { kind, .. } => writeln!(f, "proceed: {}", kind),
            SendIntent::Reject { reason } => {
                writeln!(f, "reject: {}", reason.code())?;
                writeln!(f, "  {}", reason.message())
            }
        }
    }
}

#[derive(Serialize)]
struct ScreenLine {
    line: usize,
    #[serde(flatten)]
    intent: SendIntent,
}

#[derive(Serialize)]
struct ScreenReport {
    input: String,
    lines: Vec<ScreenLine>,
    counts: BTreeMap<&'static str, usize>,
}

impl fmt::Display for ScreenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{:>5}  {}", line.line, outcome_label(&line.intent))?;
        }
        writeln!(f, "\nSummary ({}):", self.input)?;
        for (label, count) in &self.counts {
            writeln!(f, "  {}: {}", label, count)?;
        }
        Ok(())
    }
}
