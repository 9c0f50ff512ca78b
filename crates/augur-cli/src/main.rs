mod about;
mod display;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use augur_ai::client::{DEFAULT_API_VERSION, DEFAULT_TEMPERATURE};
use augur_ai::{AzureConfig, Rationale, RationaleClient, RationaleError, RationaleInputs};
use augur_mot::{EXPORT_FILE_NAME, JoinSuffixes, compare_with, read_snapshot_path};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "augur",
    version,
    about = "IFRS13 fair value classification: movement over time and model rationale"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the product overview
    About,
    /// Compare two classification snapshots (Movement over Time)
    Compare(CompareArgs),
    /// Ask the language model to explain a model classification
    Rationale(RationaleArgs),
}

#[derive(Args)]
struct CompareArgs {
    /// Prior-period snapshot CSV (needs trade_id and Predicted IFRS13 Level)
    #[arg(long)]
    prior: PathBuf,

    /// Current-period snapshot CSV
    #[arg(long)]
    current: PathBuf,

    /// Where to write the CSV export
    #[arg(long, short, default_value = EXPORT_FILE_NAME)]
    output: PathBuf,

    /// Skip writing the CSV export
    #[arg(long)]
    no_export: bool,

    /// Suffix for prior-snapshot columns that also exist in the current one
    #[arg(long, default_value = "_prior")]
    prior_suffix: String,

    /// Suffix for current-snapshot columns that also exist in the prior one
    #[arg(long, default_value = "_current")]
    current_suffix: String,

    /// Maximum rows shown in the commentary table
    #[arg(long, default_value_t = 50)]
    limit: usize,

    /// Print records as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RationaleArgs {
    /// Interest-rate delta summary
    #[arg(long)]
    ir_summary: Option<String>,

    /// Volatility summary
    #[arg(long)]
    vol_summary: Option<String>,

    /// Model prediction label, e.g. "Level 2"
    #[arg(long)]
    model_pred: Option<String>,

    /// JSON file with ir_summary / vol_summary / model_pred (flags take precedence)
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Write the outcome (rationale_text, rat_done) as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    endpoint: Option<String>,

    #[arg(long, env = "AZURE_OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Deployment (model) name
    #[arg(long, env = "AZURE_OPENAI_MODEL")]
    deployment: Option<String>,

    #[arg(long, env = "AZURE_OPENAI_API_VERSION", default_value = DEFAULT_API_VERSION)]
    api_version: String,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Request timeout in seconds (single attempt, no retries)
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

/// Outcome file written by `augur rationale --output`.
#[derive(Serialize)]
struct RationaleOutcome<'a> {
    rationale_text: &'a str,
    rat_done: bool,
    deployment: &'a str,
    generated_at: chrono::DateTime<chrono::Utc>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::About => {
            print!("{}", about::render());
            Ok(())
        }
        Command::Compare(args) => run_compare(args),
        Command::Rationale(args) => run_rationale(args).await,
    }
}

fn run_compare(args: CompareArgs) -> anyhow::Result<()> {
    let prior = read_snapshot_path(&args.prior)
        .with_context(|| format!("reading prior snapshot {}", args.prior.display()))?;
    let current = read_snapshot_path(&args.current)
        .with_context(|| format!("reading current snapshot {}", args.current.display()))?;

    let suffixes = JoinSuffixes {
        prior: args.prior_suffix,
        current: args.current_suffix,
    };
    let table = compare_with(&prior, &current, &suffixes)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(table.records())?);
    } else {
        println!("Movement Over Time Analysis Completed");
        println!();
        display::print_summary(&table.movement_summary());
        display::print_commentary(&table, args.limit)?;
    }

    if !args.no_export {
        table
            .write_csv_path(&args.output)
            .with_context(|| format!("writing export {}", args.output.display()))?;
        eprintln!(
            "Exported {} rows to {}",
            table.num_rows(),
            args.output.display()
        );
    }
    Ok(())
}

async fn run_rationale(args: RationaleArgs) -> anyhow::Result<()> {
    let flags = RationaleInputs {
        ir_summary: args.ir_summary,
        vol_summary: args.vol_summary,
        model_pred: args.model_pred,
    };
    let inputs = match &args.inputs {
        Some(path) => flags.or(read_inputs(path)?),
        None => flags,
    };

    let missing = inputs.missing();
    if !missing.is_empty() {
        warn!(?missing, "rationale not requested");
        return Err(RationaleError::MissingInputs(missing).into());
    }

    let config = AzureConfig::new(
        args.endpoint.unwrap_or_default(),
        args.api_key.unwrap_or_default(),
        args.deployment.unwrap_or_default(),
    )
    .with_api_version(args.api_version)
    .with_temperature(args.temperature)
    .with_timeout(Duration::from_secs(args.timeout_secs));

    let client = RationaleClient::new(config).context("configuring Azure OpenAI client")?;
    let rationale = client
        .explain(&inputs)
        .await
        .context("rationale request failed")?;

    println!("Rationale Generated");
    println!();
    println!("Explanation:");
    println!();
    println!("{}", rationale.text);

    if let Some(path) = &args.output {
        write_outcome(path, &rationale)?;
    }
    Ok(())
}

fn read_inputs(path: &Path) -> anyhow::Result<RationaleInputs> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading rationale inputs {}", path.display()))?;
    RationaleInputs::from_json(&json)
        .with_context(|| format!("parsing rationale inputs {}", path.display()))
}

fn write_outcome(path: &Path, rationale: &Rationale) -> anyhow::Result<()> {
    let outcome = RationaleOutcome {
        rationale_text: &rationale.text,
        rat_done: true,
        deployment: &rationale.deployment,
        generated_at: rationale.generated_at,
    };
    std::fs::write(path, serde_json::to_string_pretty(&outcome)?)
        .with_context(|| format!("writing rationale outcome {}", path.display()))?;
    info!(path = %path.display(), "wrote rationale outcome");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compare_defaults() {
        let cli = Cli::parse_from(["augur", "compare", "--prior", "dec.csv", "--current", "mar.csv"]);
        match cli.command {
            Command::Compare(args) => {
                assert_eq!(args.output, PathBuf::from("mot_analysis_results.csv"));
                assert_eq!(args.prior_suffix, "_prior");
                assert_eq!(args.current_suffix, "_current");
                assert!(!args.no_export);
                assert_eq!(args.limit, 50);
            }
            _ => panic!("expected compare"),
        }
    }

    fn compare_args(dir: &Path, output: PathBuf, no_export: bool, json: bool) -> CompareArgs {
        let prior = dir.join("dec.csv");
        let current = dir.join("mar.csv");
        std::fs::write(
            &prior,
            "trade_id,Predicted IFRS13 Level\nT1,Level 3\nT2,Level 2\n",
        )
        .unwrap();
        std::fs::write(
            &current,
            "trade_id,Predicted IFRS13 Level\nT1,Level 2\nT3,Level 1\n",
        )
        .unwrap();
        CompareArgs {
            prior,
            current,
            output,
            no_export,
            prior_suffix: "_prior".into(),
            current_suffix: "_current".into(),
            limit: 50,
            json,
        }
    }

    #[test]
    fn compare_writes_export() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        run_compare(compare_args(dir.path(), output.clone(), false, false)).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some(
                "trade_id,Predicted IFRS13 Level_prior,Predicted IFRS13 Level_current,\
                 Movement Summary,MOT Commentary"
            )
        );
        assert_eq!(lines.count(), 1);
        assert!(written.contains("Moved from Level 3 to Level 2"));
    }

    #[test]
    fn compare_no_export_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        run_compare(compare_args(dir.path(), output.clone(), true, false)).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn compare_json_still_exports() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        run_compare(compare_args(dir.path(), output.clone(), false, true)).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn compare_missing_snapshot_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.csv");
        let mut args = compare_args(dir.path(), output.clone(), false, false);
        args.current = dir.path().join("absent.csv");
        let err = run_compare(args).unwrap_err();
        assert!(err.to_string().contains("reading current snapshot"));
        assert!(!output.exists());
    }

    #[test]
    fn inputs_file_fills_missing_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.json");
        std::fs::write(
            &path,
            r#"{"ir_summary": "IR flat", "vol_summary": "Vol observable", "model_pred": "Level 2"}"#,
        )
        .unwrap();

        let flags = RationaleInputs {
            model_pred: Some("Level 3".into()),
            ..Default::default()
        };
        let inputs = flags.or(read_inputs(&path).unwrap());
        assert!(inputs.missing().is_empty());
        assert_eq!(inputs.model_pred.as_deref(), Some("Level 3"));
    }

    #[test]
    fn outcome_file_uses_session_key_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outcome.json");
        let rationale = Rationale {
            text: "Level 2 supported; confidence medium.".into(),
            deployment: "gpt-4o".into(),
            generated_at: "2026-03-31T09:00:00Z".parse().unwrap(),
        };
        write_outcome(&path, &rationale).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["rationale_text"], "Level 2 supported; confidence medium.");
        assert_eq!(json["rat_done"], true);
    }

    #[tokio::test]
    async fn rationale_without_inputs_is_refused() {
        let args = RationaleArgs {
            ir_summary: None,
            vol_summary: Some("Vol observable".into()),
            model_pred: None,
            inputs: None,
            output: None,
            endpoint: None,
            api_key: None,
            deployment: None,
            api_version: DEFAULT_API_VERSION.into(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: 60,
        };
        let err = run_rationale(args).await.unwrap_err();
        match err.downcast_ref::<RationaleError>() {
            Some(RationaleError::MissingInputs(keys)) => {
                assert_eq!(keys, &vec!["ir_summary", "model_pred"]);
            }
            other => panic!("expected MissingInputs, got {other:?}"),
        }
    }
}
