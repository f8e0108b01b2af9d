//! gcsign - sign Google Cloud Storage URLs from the command line.
//!
//! Each argument after the scheme is a `name=value` signing property. A value
//! starting with `@` is read from the named file, which is convenient for
//! service-account JSON and PEM keys. The resulting variables are printed as
//! JSON on stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! gcsign v4 verb=GET bucket=my-bucket object=report.pdf expires-in=10m \
//!     service-account-key=@service-account.json
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GCSIGN_VARIABLE_PREFIX` | `sign_` | Prefix of every output variable |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use gcsign_auth::{Outcome, SigningScheme, UrlSigner};
use gcsign_core::{InMemoryContext, Properties, SignerConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: gcsign <v2|v4> [name=value ...]";

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    Ok(())
}

/// Parse `name=value` arguments into signing properties.
fn parse_properties<I>(args: I) -> Result<Properties>
where
    I: IntoIterator<Item = String>,
{
    let mut properties = Properties::new();
    for arg in args {
        let Some((name, value)) = arg.split_once('=') else {
            bail!("expected name=value, got '{arg}'\n{USAGE}");
        };
        let value = match value.strip_prefix('@') {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read value of '{name}' from {path}"))?,
            None => value.to_owned(),
        };
        debug!(property = name, "configured property");
        properties.insert(name, value);
    }
    Ok(properties)
}

fn main() -> Result<ExitCode> {
    let config = SignerConfig::from_env();
    init_tracing(&config.log_level)?;

    let mut args = std::env::args().skip(1);
    let scheme: SigningScheme = args
        .next()
        .context(USAGE)?
        .parse()
        .context(USAGE)?;
    let properties = parse_properties(args)?;

    let signer = UrlSigner::new(scheme, properties).with_config(config);
    let mut ctx = InMemoryContext::new();
    let outcome = signer.execute(&mut ctx);

    let output = serde_json::to_string_pretty(&ctx.into_variables())
        .context("failed to render result variables")?;
    println!("{output}");

    Ok(match outcome {
        Outcome::Success => ExitCode::SUCCESS,
        Outcome::Abort => ExitCode::FAILURE,
    })
}
