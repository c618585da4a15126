//! Command dispatch logic for repo-score

use super::{ScoreArgs, process_scores};
use crate::{Host, Result};
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "repo-score", version, author, long_about = None)]
#[command(about = "Score the trustworthiness of open-source packages from their repository metadata")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(flatten)]
    args: ScoreArgs,
}

/// Parse command-line arguments and run the scoring command
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the configuration or URL file cannot be used, if any package could not
/// be scored, or if a miscalibrated score was found while `--error-if-miscalibrated` is set
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    process_scores(host, &cli.args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["repo-score", "urls.txt"]).unwrap();
        assert_eq!(cli.args.url_file.as_str(), "urls.txt");
        assert!(!cli.args.error_if_miscalibrated);
    }

    #[test]
    fn test_url_file_is_required() {
        let _ = Cli::try_parse_from(["repo-score"]).unwrap_err();
    }

    #[test]
    fn test_numeric_log_level() {
        let cli = Cli::try_parse_from(["repo-score", "urls.txt", "--log-level", "2"]).unwrap();
        assert_eq!(cli.args.log_level, super::super::LogLevel::Debug);
    }

    #[tokio::test]
    async fn test_missing_url_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let mut host = crate::commands::host::TestHost::new();

        let result = run(&mut host, ["repo-score".into(), missing.into_os_string()]).await;
        let _ = result.unwrap_err();
        assert!(host.output_buf.is_empty());
    }
}
