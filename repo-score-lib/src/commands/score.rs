use super::Host;
use super::common::{LogLevel, init_logging};
use super::config::Config;
use crate::Result;
use crate::facts::{Collector, PackageFacts, ProviderResult, UrlList, npm};
use crate::reports::generate_ndjson;
use crate::scoring::{MetricRecord, Scorer};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::{IntoAppError, bail};
use std::io::Write;

const LOG_TARGET: &str = "     score";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// File listing one package URL per line (GitHub repositories or npm packages)
    #[arg(value_name = "URL_FILE")]
    pub url_file: Utf8PathBuf,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `repo-score.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", env = "LOG_LEVEL", default_value = "none")]
    pub log_level: LogLevel,

    /// Write diagnostic output to this file instead of stderr
    #[arg(long, value_name = "PATH", env = "LOG_FILE")]
    pub log_file: Option<Utf8PathBuf>,

    /// Exit with an error if any net score falls outside the calibrated range
    #[arg(long)]
    pub error_if_miscalibrated: bool,

    /// Base URL of the GitHub REST API
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL, hide = true)]
    pub github_api_url: String,

    /// Base URL of the npm registry
    #[arg(long, value_name = "URL", env = "NPM_REGISTRY_URL", default_value = npm::DEFAULT_REGISTRY_URL, hide = true)]
    pub npm_registry_url: String,
}

/// Score every package listed in the URL file and write one NDJSON record per package.
pub async fn process_scores<H: Host>(host: &mut H, args: &ScoreArgs) -> Result<()> {
    init_logging(args.log_level, args.log_file.as_deref())?;

    let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    let scorer = Scorer::new(&config.desired_license, &config.calibration, config.weights)?;

    let url_list = UrlList::load(&args.url_file)?;
    for rejected in &url_list.rejected {
        let _ = writeln!(host.error(), "Skipping unsupported entry at {rejected}");
    }

    let collector = Collector::new(
        args.github_token.as_deref(),
        &args.github_api_url,
        &args.npm_registry_url,
        config.max_concurrent_requests,
    )?;

    let collected = collector.collect(url_list.entries).await;
    let (records, failures) = score_all(&scorer, collected);

    let mut output = String::new();
    generate_ndjson(&records, &mut output)?;
    write_records(host, &output)?;

    let suspect: Vec<&MetricRecord> = records.iter().filter(|r| r.net_score.value.is_suspect()).collect();
    for record in &suspect {
        if let Some(anomaly) = record.net_score.value.anomaly() {
            log::warn!(target: LOG_TARGET, "Net score for '{}' is out of range: {anomaly}", record.url);
        }
    }

    if !failures.is_empty() {
        let _ = writeln!(host.error(), "\nUnable to score {} package(s)", failures.len());
        for facts in &failures {
            match &facts.snapshot {
                ProviderResult::Unavailable(reason) => {
                    let _ = writeln!(host.error(), "  {}: {reason}", facts.package.raw);
                }
                ProviderResult::Error(err) => {
                    let _ = writeln!(host.error(), "  {}: {err:#}", facts.package.raw);
                }
                ProviderResult::Found(_) => {}
            }
        }
        bail!("{} package(s) could not be scored", failures.len());
    }

    if args.error_if_miscalibrated && !suspect.is_empty() {
        bail!("{} package(s) produced a net score outside the calibrated range", suspect.len());
    }

    Ok(())
}

fn write_records<H: Host>(host: &mut H, text: &str) -> Result<()> {
    let mut out = host.output();
    out.write_all(text.as_bytes()).and_then(|()| out.flush()).into_app_err("writing records")
}

/// Score every collected package, keeping input order and setting aside the ones without data.
fn score_all(scorer: &Scorer, collected: Vec<PackageFacts>) -> (Vec<MetricRecord>, Vec<PackageFacts>) {
    let mut records = Vec::with_capacity(collected.len());
    let mut failures = Vec::new();

    for facts in collected {
        match (&facts.repo_spec, &facts.snapshot) {
            (Some(spec), ProviderResult::Found(snapshot)) => records.push(scorer.score(&facts.package.raw, spec, snapshot)),
            _ => failures.push(facts),
        }
    }

    (records, failures)
}
