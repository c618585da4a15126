//! Score the trustworthiness of open-source packages from their repository metadata.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use repo_score_lib::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Host wired to the real process streams.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() {
    let mut host = RealHost;
    if let Err(e) = run(&mut host, std::env::args()).await {
        let _ = writeln!(host.error(), "error: {e:#}");
        host.exit(1);
    }
}
