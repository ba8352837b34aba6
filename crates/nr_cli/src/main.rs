mod config;
mod scheduler;

use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use cron::Schedule;
use tracing::{info, warn};

use nr_core::{ArticleStore, NewsLookup, SortKey};
use nr_feeds::{GoogleNewsLookup, NewsSearchTool};
use nr_inference::{create_model, ModelConfig};
use nr_pipeline::{Commander, Dispatcher, NewsClassifier, NewsDiscovery, NewsRanker};
use nr_storage::JsonFileStore;
use nr_web::{create_app, AppState};

use config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about = "Topic-to-ranked-news pipeline service", long_about = None)]
struct Cli {
    /// Model backend to use. Available backends: openai (default), scripted
    #[arg(long, default_value = "openai")]
    backend: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the news API with the cron scheduler running
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Run the pipeline once for a topic and exit
    Run { topic: String },
    /// Print the stored articles
    List {
        /// Sort order: latest or popular
        #[arg(long, default_value = "latest")]
        sort: SortKey,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    match cli.command {
        Commands::Serve { host, port } => serve(&cli.backend, config, &host, port).await,
        Commands::Run { topic } => run_once(&cli.backend, config, &topic).await,
        Commands::List { sort } => list(config, sort).await,
    }
}

/// Wire the concrete stages into a dispatcher and commander. The only place
/// where implementations meet the pipeline.
async fn build_pipeline(
    backend: &str,
    config: &Config,
) -> anyhow::Result<(Arc<Commander>, Arc<dyn ArticleStore>)> {
    let model = create_model(
        backend,
        ModelConfig {
            api_key: config.api_key.clone(),
            model: Some(config.model.clone()),
            base_url: config.model_url.clone(),
        },
    )?;
    info!(backend = model.name(), "model backend ready");

    let lookup: Arc<dyn NewsLookup> = Arc::new(GoogleNewsLookup::new());
    let store: Arc<dyn ArticleStore> = Arc::new(JsonFileStore::new(&config.storage_path).await?);
    info!(path = %config.storage_path, "🏦 storage ready");

    let dispatcher = Dispatcher::new(
        Arc::new(NewsDiscovery::new(
            model.clone(),
            Arc::new(NewsSearchTool::new(lookup)),
        )),
        Arc::new(NewsClassifier::new(model.clone())),
        Arc::new(NewsRanker::new(model)),
        store.clone(),
    );
    let commander = Arc::new(Commander::new(dispatcher).with_max_articles(config.max_articles));
    Ok((commander, store))
}

async fn serve(backend: &str, config: Config, host: &str, port: u16) -> anyhow::Result<()> {
    let schedule = Schedule::from_str(&config.schedule).map_err(|e| {
        anyhow::anyhow!("invalid NEWSROOM_SCHEDULE '{}': {e}", config.schedule)
    })?;

    let (commander, store) = build_pipeline(backend, &config).await?;

    // The original system kicks off one run at startup so the collection is
    // never empty for longer than a single pipeline pass.
    {
        let commander = commander.clone();
        let topic = config.default_topic.clone();
        tokio::spawn(async move {
            info!(%topic, "performing initial run on startup");
            if let Err(e) = commander.run(&topic).await {
                warn!(error = %e, "initial run failed");
            }
        });
    }

    tokio::spawn(scheduler::run_scheduler(
        commander.clone(),
        schedule,
        config.default_topic.clone(),
    ));

    let app = create_app(AppState {
        commander,
        store,
        default_topic: config.default_topic,
    });

    let addr = format!("{host}:{port}");
    info!(%addr, "🌐 serving news API");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_once(backend: &str, config: Config, topic: &str) -> anyhow::Result<()> {
    let (commander, _store) = build_pipeline(backend, &config).await?;
    let result = commander.run(topic).await?;
    match result.reason {
        Some(reason) => println!("{:?}: {reason}", result.status),
        None => println!("{:?}: {} articles stored", result.status, result.stored),
    }
    Ok(())
}

async fn list(config: Config, sort: SortKey) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.storage_path).await?;
    let articles = store.load_sorted(sort).await?;
    println!("{} articles ({sort})", articles.len());
    for article in articles {
        println!(
            "📰 [{}] {} ({}) {}",
            article.category,
            article.title,
            article.popularity,
            article.url
        );
    }
    Ok(())
}
