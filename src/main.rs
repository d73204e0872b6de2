mod api;
mod backend;
mod server;

use clap::{Args, Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use ultrafeed_threads::{
    format_float, get_ranked_threads, short_hash, DisplayStatus, FeedConfig, PreparedThread,
    RankRequest,
};

use crate::backend::FeedBackend;

#[derive(Parser)]
#[command(name = "ultrafeed-threads", about = "UltraFeed comment-thread ranking")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    Rank(RankArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct RankArgs {
    #[arg(long, conflicts_with_all = ["endpoint", "synthetic"])]
    dataset: Option<PathBuf>,
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long, conflicts_with = "endpoint")]
    synthetic: bool,
    #[arg(long, default_value_t = 7)]
    seed: u64,
    #[arg(long, default_value_t = 20)]
    discussions: usize,
    #[arg(long)]
    user: Option<String>,
    #[arg(long, default_value_t = 20)]
    limit: usize,
    #[arg(long)]
    served: Vec<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

impl Default for RankArgs {
    fn default() -> Self {
        Self {
            dataset: None,
            endpoint: None,
            synthetic: true,
            seed: 7,
            discussions: 20,
            user: None,
            limit: 20,
            served: Vec::new(),
            config: None,
            json: false,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long)]
    dataset: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Rank(RankArgs::default()));

    match command {
        Command::Rank(args) => run_rank(args).await,
        Command::Serve(args) => server::serve(args).await,
    }
}

async fn run_rank(args: RankArgs) -> Result<(), String> {
    let config = load_config(args.config.clone())?;
    let synthetic = args.synthetic.then_some((args.seed, args.discussions));
    let backend = FeedBackend::resolve(
        args.dataset.as_deref(),
        args.endpoint.clone(),
        synthetic,
        &config,
    )
    .await?;

    let user_id = args.user.clone().or_else(|| backend.default_viewer());
    let mut request = RankRequest::new(user_id, args.limit);
    request.served_thread_hashes = args.served.iter().cloned().collect::<HashSet<_>>();
    request.windows = config.fetch.clone();

    let settings = config.ranking_settings();
    let threads = get_ranked_threads(&request, &settings, &backend.sources())
        .await
        .map_err(|err| err.to_string())?;

    if args.json {
        let payload = serde_json::to_string_pretty(&threads)
            .map_err(|err| format!("failed to serialize threads: {}", err))?;
        println!("{}", payload);
        return Ok(());
    }

    match request.user_id.as_deref() {
        Some(user_id) => println!(
            "Ranked {} thread(s) for {} from {} ({} aggregation)",
            threads.len(),
            user_id,
            backend.label(),
            settings.aggregation.label()
        ),
        None => println!("No viewer given: pass --user to rank threads"),
    }
    for (rank, thread) in threads.iter().enumerate() {
        print_thread(rank + 1, thread);
    }

    Ok(())
}

fn print_thread(rank: usize, thread: &PreparedThread) {
    let source = thread
        .primary_source
        .map(|source| source.label())
        .unwrap_or("-");
    println!(
        "\n#{} score {} | source {} | hash {}",
        rank,
        format_float(thread.score, 3),
        source,
        short_hash(&thread.thread_hash)
    );
    for (depth, comment) in thread.comments.iter().enumerate() {
        let marker = match comment.display_status {
            DisplayStatus::Expanded => "+",
            DisplayStatus::Collapsed => "-",
        };
        let highlight = if comment.highlight { " *new*" } else { "" };
        println!(
            "  {}{} {} (karma {}, score {}){}",
            "  ".repeat(depth),
            marker,
            comment.comment_id(),
            comment.scored.comment.base_score,
            format_float(comment.scored.score, 3),
            highlight
        );
    }
}

pub(crate) fn load_config(path: Option<PathBuf>) -> Result<FeedConfig, String> {
    let (config, _) = FeedConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
