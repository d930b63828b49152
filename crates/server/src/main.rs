use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use statement_server::{build_router, config::Config, state::AppState};
use truck_statement::{builder, StatementBuilder, StatementRequest};

/// Payload rendered by `render` when the input file does not exist.
const MOCK_PAYLOAD: &str = r#"{"trips":[],"deductions":[],"ytd":{"net":0,"gross":0}}"#;

/// Renders trucking statements as PDF, over HTTP or from a JSON file.
///
/// Fonts are looked up in `STATEMENT_FONTS_DIR`, `assets/fonts` and the usual system font
/// directories unless `assets.fonts_dir` is configured.
#[derive(Parser)]
#[command(author, version, about = "Trucking statement PDF service")]
struct Cli {
    /// TOML configuration file (defaults to `config/default.toml` when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve `GET /` and `POST /` (the default).
    Serve,

    /// Render one statement from a JSON file.
    Render {
        #[arg(long, short, default_value = "data.json")]
        input: PathBuf,

        #[arg(long, short, default_value = "statement.pdf")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let builder = statement_builder(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, builder).await,
        Commands::Render { input, output } => render(&builder, &input, &output),
    }
}

fn statement_builder(config: &Config) -> anyhow::Result<StatementBuilder> {
    let builder = match &config.assets.fonts_dir {
        Some(dir) => StatementBuilder::with_fonts_dir(dir)
            .with_context(|| format!("Failed to load fonts from {}", dir.display()))?,
        None => StatementBuilder::with_default_fonts().context("Failed to load fonts")?,
    };
    let builder = builder.with_currency(config.currency.clone());

    match builder::resolve_logo_path(config.assets.logo_path.as_deref()) {
        Some(path) => Ok(builder.with_logo_path(&path)),
        None => {
            log::warn!("No logo found; the header shows the company name");
            Ok(builder)
        }
    }
}

async fn serve(config: Config, builder: StatementBuilder) -> anyhow::Result<()> {
    let app = build_router(AppState::new(builder), config.server.max_request_bytes());

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("Statement service listening on {}", addr);
    log::info!("  - GET  / (usage)");
    log::info!("  - POST / (render statement)");

    axum::serve(listener, app).await?;

    Ok(())
}

fn render(builder: &StatementBuilder, input: &Path, output: &Path) -> anyhow::Result<()> {
    let payload = if input.exists() {
        fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?
    } else {
        log::warn!("{} not found; rendering mock data", input.display());
        MOCK_PAYLOAD.as_bytes().to_vec()
    };

    let request = StatementRequest::from_slice(&payload);
    let statement = builder
        .generate(&request)
        .context("Failed to render statement")?;

    fs::write(output, &statement.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} ({} pages)", output.display(), statement.pages);

    Ok(())
}
