//! Command-line interface for polyschema
//!
//! # Usage Examples
//!
//! ```bash
//! # SQL DDL to Java, domains inferred from the extension and the flag
//! polyschema convert schema.sql --to java
//!
//! # Read stdin, write a file
//! cat model.puml | polyschema convert - --from plantuml --to linkml -o model.yaml
//!
//! # Show the universal model a file maps to
//! polyschema inspect Order.java
//!
//! # List the registered domains
//! polyschema domains
//! ```
//!
//! Defaults for `--from`, `--to` and the log level come from
//! `.polyschema/config.toml` and the user config directory. `RUST_LOG`
//! overrides the configured log level.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::PolyschemaConfig;
use polyschema::{Domain, DomainKind};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polyschema")]
#[command(about = "Translate schemas between SQL, Java, C#, LinkML, JSON Schema, OFN and PlantUML")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a schema from one domain to another
    Convert {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Source domain (default: config, then the input file extension)
        #[arg(long)]
        from: Option<DomainKind>,

        /// Target domain (default: config)
        #[arg(long)]
        to: Option<DomainKind>,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Print the universal model of a schema as JSON
    Inspect {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Source domain (default: config, then the input file extension)
        #[arg(long)]
        from: Option<DomainKind>,
    },

    /// List registered domains and their file extensions
    Domains,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    let config = PolyschemaConfig::load(&cwd)?;
    init_logging(&config);

    match cli.command {
        Commands::Convert {
            input,
            from,
            to,
            output,
        } => {
            let source = source_domain(from, &config, &input)?;
            let target = configured_domain(to, config.convert.to.as_deref())?
                .context("no target domain: pass --to or set convert.to in the config")?;
            let text = read_input(&input)?;
            let universal = source
                .read(&text)
                .with_context(|| format!("failed to parse {}", input.display()))?;
            tracing::info!(
                from = source.name(),
                to = target.name(),
                entities = universal.entities.len(),
                relationships = universal.relationships.len(),
                "converting"
            );
            let rendered = target.render(&universal)?;
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Inspect { input, from } => {
            let source = source_domain(from, &config, &input)?;
            let universal = source
                .read(&read_input(&input)?)
                .with_context(|| format!("failed to parse {}", input.display()))?;
            println!("{}", serde_json::to_string_pretty(&universal)?);
        }
        Commands::Domains => {
            for domain in polyschema::domains() {
                println!("{:<12} {}", domain.name(), domain.extensions().join(", "));
            }
        }
    }
    Ok(())
}

/// `RUST_LOG` wins, then the configured level, then `warn`. Logs go to stderr.
fn init_logging(config: &PolyschemaConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.log.level.as_deref().unwrap_or("warn");
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn configured_domain(
    flag: Option<DomainKind>,
    configured: Option<&str>,
) -> anyhow::Result<Option<&'static dyn Domain>> {
    let kind = match (flag, configured) {
        (Some(kind), _) => kind,
        (None, Some(name)) => name
            .parse::<DomainKind>()
            .map_err(anyhow::Error::msg)
            .context("invalid domain in config")?,
        (None, None) => return Ok(None),
    };
    let domain = kind
        .domain()
        .with_context(|| format!("domain {kind} is not enabled in this build"))?;
    Ok(Some(domain))
}

fn source_domain(
    flag: Option<DomainKind>,
    config: &PolyschemaConfig,
    input: &Path,
) -> anyhow::Result<&'static dyn Domain> {
    if let Some(domain) = configured_domain(flag, config.convert.from.as_deref())? {
        return Ok(domain);
    }
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .context("no source domain: pass --from or set convert.from in the config")?;
    polyschema::domain_for_extension(ext)
        .with_context(|| format!("no domain handles .{ext} files; pass --from"))
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn write_output(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.is_empty() && !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}
