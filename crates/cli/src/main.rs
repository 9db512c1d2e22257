use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use codenn_ast::SampleLocator;
use codenn_cli::flags::AlgorithmFlag;
use codenn_cli::{router, Session, SharedSession, VisConfig};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Parser)]
#[command(name = "codenn-vis")]
#[command(about = "Inspect how a code model sees source samples", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); defaults to ./codenn-vis.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a sample: every view, prediction and cluster diagram
    Render(SampleArgs),

    /// Scatterplot of AST node order
    Scatter(SampleArgs),

    /// Tree view of the AST
    Tree(SampleArgs),

    /// Seesoft density map
    Seesoft(SampleArgs),

    /// Colored source text units
    Source(SourceArgs),

    /// Submit several samples and project the cluster store
    Cluster(ClusterArgs),

    /// Serve the session over HTTP (POST /sample, GET /clusters, GET /health)
    ServeHttp(ServeArgs),
}

#[derive(Args)]
struct SampleArgs {
    /// AST sidecar JSON: a file path or an http(s) URL
    sample: String,
}

#[derive(Args)]
struct SourceArgs {
    #[command(flatten)]
    sample: SampleArgs,

    /// Emit an HTML <pre> block instead of JSON
    #[arg(long)]
    html: bool,
}

#[derive(Args)]
struct ClusterArgs {
    /// AST sidecars, submitted in order
    #[arg(required = true)]
    samples: Vec<String>,

    /// Projection algorithm (defaults to the configured one)
    #[arg(long, value_enum)]
    algorithm: Option<AlgorithmFlag>,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:8050
    #[arg(long, default_value = "127.0.0.1:8050")]
    addr: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = VisConfig::load(cli.config.as_deref())?;
    let mut session = Session::new(config).context("Failed to start session")?;
    let pretty = cli.pretty;

    match cli.command {
        Commands::Render(args) => {
            let report = session.submit(locator(&args.sample))?;
            print_json(&report, pretty)?;
        }
        Commands::Scatter(args) => {
            print_json(&session.open(locator(&args.sample))?.scatter, pretty)?;
        }
        Commands::Tree(args) => {
            print_json(&session.open(locator(&args.sample))?.tree, pretty)?;
        }
        Commands::Seesoft(args) => {
            print_json(&session.open(locator(&args.sample))?.seesoft, pretty)?;
        }
        Commands::Source(args) => {
            let views = session.open(locator(&args.sample.sample))?;
            if args.html {
                print_stdout(&views.source.to_html())?;
            } else {
                print_json(&views.source, pretty)?;
            }
        }
        Commands::Cluster(args) => {
            for sample in &args.samples {
                session
                    .submit(locator(sample))
                    .with_context(|| format!("Failed to submit {sample}"))?;
            }
            let scene = session.clusters(args.algorithm.map(AlgorithmFlag::as_domain))?;
            print_json(&scene, pretty)?;
        }
        Commands::ServeHttp(args) => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(serve_http(args, Arc::new(Mutex::new(session))))?;
        }
    }

    Ok(())
}

fn locator(arg: &str) -> SampleLocator {
    SampleLocator::parse_arg(arg)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    print_stdout(&text)
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

async fn serve_http(args: ServeArgs, session: SharedSession) -> Result<()> {
    let app = router(session);
    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.addr))?;
    log::info!("Serving CodeNN Vis API on http://{}", args.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
