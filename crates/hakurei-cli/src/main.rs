//! `hakurei` - render a template file against JSON or YAML data.
//!
//! ```text
//! hakurei greeting.hk --data visitor.json
//! hakurei report.hk --data stats.yaml --missing-keys error
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hakurei::{MissingKeys, RenderOptions, Template};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hakurei", version, about = "Render a Hakurei template")]
struct Cli {
    /// Template file to render
    template: PathBuf,

    /// JSON or YAML file providing the render context
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// What to do when an interpolation key has no value
    #[arg(long, value_enum, default_value_t = MissingKeysArg::Warn)]
    missing_keys: MissingKeysArg,

    /// Keep leading and trailing whitespace in the output
    #[arg(long)]
    no_trim: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MissingKeysArg {
    Ignore,
    Warn,
    Error,
}

impl From<MissingKeysArg> for MissingKeys {
    fn from(arg: MissingKeysArg) -> Self {
        match arg {
            MissingKeysArg::Ignore => MissingKeys::Ignore,
            MissingKeysArg::Warn => MissingKeys::Warn,
            MissingKeysArg::Error => MissingKeys::Error,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = run(&cli)?;
    write_output(&mut io::stdout().lock(), &output, cli.no_trim)?;
    Ok(())
}

/// Writes the rendered text. Untrimmed output is written exactly as rendered.
fn write_output(out: &mut impl Write, output: &str, no_trim: bool) -> io::Result<()> {
    if no_trim {
        write!(out, "{}", output)?;
    } else {
        writeln!(out, "{}", output)?;
    }
    out.flush()
}

/// Installs a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> Result<String> {
    let source = fs::read_to_string(&cli.template)
        .with_context(|| format!("Failed to read template {}", cli.template.display()))?;

    let name = cli
        .template
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.template.display().to_string());
    let template = Template::compile_named(name, source)?;

    let context = match &cli.data {
        Some(path) => load_context(path)?,
        None => Value::Object(Default::default()),
    };

    let options = RenderOptions::new()
        .missing_keys(cli.missing_keys.into())
        .trim_output(!cli.no_trim);

    Ok(template.render_value_with(&context, &options)?)
}

/// Reads a context file, choosing the format by extension.
fn load_context(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let value: Value = match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
    };
    Ok(value)
}
