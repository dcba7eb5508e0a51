//! check_ssllabs — monitoring plugin reporting the SSL Labs grade of a domain.
//!
//! Prints a single `"<LEVEL> - <message>"` line (plus the assessment JSON
//! when a grade was obtained) and exits with the monitoring status code.
//!
//! # Usage
//!
//! ```text
//! check_ssllabs -d example.com -w B -c C --timeout 300
//! ```

use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser};
use ssllabs_probe::{
    CachePolicy, CheckOptions, CheckOutcome, HttpTransport, OptionsError, Status, Thresholds,
    options::{DEFAULT_API_URL, DEFAULT_CACHE_HOURS},
    run_check,
};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "check_ssllabs",
    about = "Check command for SSL Labs score monitoring",
    version
)]
struct Cli {
    /// Domain name to test.
    #[arg(short = 'd', value_name = "DOMAIN")]
    domain: String,

    /// IP to test when the host has more than one endpoint.
    #[arg(short = 'i', value_name = "IP")]
    ip_address: Option<String>,

    /// Publish the results on the SSL Labs board.
    #[arg(short = 'p')]
    publish: bool,

    /// Do not accept cached results.
    #[arg(long)]
    no_cache: bool,

    /// Max age of cached results (hours).
    #[arg(long, default_value_t = DEFAULT_CACHE_HOURS)]
    cache_hours: u32,

    /// Timeout for test results in seconds (0 waits indefinitely).
    #[arg(long, default_value_t = 240)]
    timeout: u64,

    /// Warning threshold grade.
    #[arg(short = 'w', default_value = "B")]
    warning: String,

    /// Critical threshold grade.
    #[arg(short = 'c', default_value = "C")]
    critical: String,

    /// Base URL of the SSL Labs API.
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Connect timeout for API requests in seconds.
    #[arg(long, default_value_t = 30)]
    connect_timeout: u64,

    /// Upper bound for each API request in seconds.
    #[arg(long, default_value_t = 60)]
    request_timeout: u64,

    /// Increase log verbosity on stderr (-v info, -vv debug).
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_options(self) -> Result<CheckOptions, OptionsError> {
        let thresholds = Thresholds::new(self.warning, self.critical)?;
        let cache = if self.no_cache {
            CachePolicy::StartNew
        } else {
            CachePolicy::FromCache {
                max_age_hours: self.cache_hours,
            }
        };

        let mut options = CheckOptions::new(self.domain)
            .with_publish(self.publish)
            .with_cache(cache)
            .with_deadline(Duration::from_secs(self.timeout))
            .with_thresholds(thresholds)
            .with_api_url(self.api_url)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout))
            .with_request_timeout(Duration::from_secs(self.request_timeout));
        if let Some(ip) = self.ip_address {
            options = options.with_ip_filter(ip);
        }

        options.validate()?;
        Ok(options)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprint!("{e}");
            return report(&CheckOutcome::new(Status::Unknown, "invalid command line arguments"));
        }
    };

    init_tracing(cli.verbose);

    let options = match cli.into_options() {
        Ok(options) => options,
        Err(e) => return report(&CheckOutcome::new(Status::Unknown, e.to_string())),
    };
    debug!(?options, "configuration loaded");

    let outcome = match run(&options).await {
        Ok(outcome) => outcome,
        Err(e) => CheckOutcome::new(Status::Unknown, format!("{e:#}")),
    };
    report(&outcome)
}

async fn run(options: &CheckOptions) -> anyhow::Result<CheckOutcome> {
    let transport = HttpTransport::from_options(options)?;
    debug!(url = transport.analyze_url(), "transport ready");
    Ok(run_check(&transport, options).await)
}

/// The single place the process reports and picks its exit code.
fn report(outcome: &CheckOutcome) -> ExitCode {
    print!("{}", outcome.render());
    ExitCode::from(outcome.exit_code())
}

/// Logs go to stderr; stdout belongs to the monitoring output.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
