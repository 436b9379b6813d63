use anyhow::{Context, Result};
use futures::StreamExt;
use scout::cli::output::Output;
use scout::cli::{Cli, Commands, LogFormat, init};
use scout::search::SearchEvent;
use scout::{AppState, LocationQuery, ScoutConfigManager};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Some(Commands::Init {
        path,
        force,
        provider,
    }) = &cli.command
    {
        let config = init::InitConfig {
            path: path.clone(),
            force: *force,
            provider: provider.clone(),
        };
        return match init::run(config, &output) {
            init::InitResult::Error(e) => Err(anyhow::anyhow!(e)),
            _ => Ok(()),
        };
    }

    let config_manager = match ScoutConfigManager::new(&cli.config) {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            output.error(&e.to_string());
            output.hint("Run `scout-server init` to create a starter scout.toml");
            return Err(e).context(format!("Failed to load {}", cli.config.display()));
        }
    };

    init_tracing(&config_manager.config().server.log_level, cli.verbose, cli.log_format);

    match cli.command {
        None | Some(Commands::Serve) => serve(config_manager).await,
        Some(Commands::Search {
            franchise,
            city,
            state,
            country,
            json,
        }) => {
            let query = LocationQuery::new(franchise, country, state, city);
            search(config_manager, query, json, &output).await
        }
        Some(Commands::Sources) => {
            list_sources(&config_manager, &output);
            Ok(())
        }
        Some(Commands::Config { validate }) => show_config(&config_manager, validate, &output),
        Some(Commands::Init { .. }) => Ok(()),
    }
}

/// Logs go to stderr so `search --json` output stays clean
fn init_tracing(config_level: &str, verbose: bool, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn serve(config_manager: Arc<ScoutConfigManager>) -> Result<()> {
    if let Err(e) = config_manager.start_watching() {
        warn!("Config hot-reload disabled: {}", e);
    }

    let config = config_manager.config();
    for warning in config.validate_with_warnings().unwrap_or_default() {
        warn!("{}", warning);
    }

    let state = AppState::new(config_manager.clone());
    let app = scout::api::create_router(state);

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/swagger.json", scout::api::ApiDoc::openapi()),
        )
    };

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        sources = config.catalog().len(),
        "Server listening on {}",
        address
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    config_manager.stop_watching();
    info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn search(
    config_manager: Arc<ScoutConfigManager>,
    query: LocationQuery,
    json: bool,
    output: &Output,
) -> Result<()> {
    query.validate().context("Invalid query")?;

    let config = config_manager.config();
    let state = AppState::new(config_manager.clone());
    let mut events = state.coordinator(&config).search(query);

    let mut failed = false;
    while let Some(event) = events.next().await {
        if json {
            println!("{}", event.to_json());
        } else {
            output.event(&event);
        }
        failed |= matches!(event, SearchEvent::FatalError { .. });
    }

    if failed {
        anyhow::bail!("Search failed");
    }
    Ok(())
}

fn list_sources(config_manager: &ScoutConfigManager, output: &Output) {
    let config = config_manager.config();
    let from = if config.workers.is_some() {
        "configured"
    } else {
        "built-in"
    };

    output.header(&format!("Sources ({})", from));
    output.table_header(&["Name", "Step budget", "Enabled"]);
    for source in config.catalog().sources() {
        let budget = source.step_budget.to_string();
        output.table_row(&[
            source.name.as_str(),
            budget.as_str(),
            if source.enabled { "yes" } else { "no" },
        ]);
    }
}

fn show_config(config_manager: &ScoutConfigManager, validate: bool, output: &Output) -> Result<()> {
    let config = config_manager.config();

    output.header("Configuration");
    output.kv("file", &config_manager.path().display().to_string());
    output.kv(
        "server",
        &format!("{}:{}", config.server.host, config.server.port),
    );
    output.kv("log level", &config.server.log_level);
    output.kv("agent provider", &config.agent.provider);
    output.kv(
        "drain interval",
        &format!("{}ms", config.search.drain_interval_ms),
    );
    output.kv(
        "cancel on disconnect",
        &config.search.cancel_on_disconnect.to_string(),
    );
    output.kv("sources", &config.catalog().len().to_string());

    if validate {
        let warnings = config
            .validate_with_warnings()
            .context("Configuration is invalid")?;
        for warning in &warnings {
            output.warning(&warning.message);
        }
        output.success("Configuration is valid");
    }
    Ok(())
}
