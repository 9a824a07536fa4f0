use clap::{Parser, Subcommand};
use ragbench::bench::suite;
use ragbench::cache::ModelRegistry;
use ragbench::server::{HttpServer, RunRequest};
use ragbench::store::{leaderboard, FsRunStore};
use ragbench::Config;

/// RAGBench: benchmark RAG retrieval configurations and rank them.
#[derive(Parser, Debug)]
#[command(name = "ragbench", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the benchmark HTTP API (default)
    Serve,
    /// Execute one benchmark run from the command line
    Run {
        /// Chunking strategy label (informational)
        #[arg(long)]
        chunk_strategy: Option<String>,
        /// Chunk window size in characters
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Characters shared between adjacent chunks
        #[arg(long)]
        overlap: Option<usize>,
        /// Embedding model identifier
        #[arg(long)]
        embedding_model: Option<String>,
        /// Reranker model identifier ("none" disables reranking)
        #[arg(long)]
        reranker_model: Option<String>,
        /// Candidates kept by the retrieval and rerank stages
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Print the leaderboard of stored runs
    Leaderboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = Config::load()?;
            log::info!("Starting RAGBench v{}", env!("CARGO_PKG_VERSION"));
            log::info!("Runs directory: {}", config.storage.runs_dir.display());
            log::info!("Inference endpoint: {}", config.inference.endpoint);
            HttpServer::new(config)?.run().await?;
        }
        Command::Run {
            chunk_strategy,
            chunk_size,
            overlap,
            embedding_model,
            reranker_model,
            top_k,
        } => {
            let config = Config::load()?;
            let request = RunRequest {
                chunk_strategy,
                chunk_size,
                overlap,
                embedding_model,
                reranker_model,
                top_k,
            };
            let retrieval = request.into_retrieval_config(&config.defaults)?;

            let models = ModelRegistry::new(config.inference.clone());
            let store = FsRunStore::new(&config.storage.runs_dir)?;
            let (id, record) = suite::execute_run(&config, &retrieval, &models, &store).await?;

            println!("Saved run {}\n", id);
            println!("=== Overall ===");
            println!("Recall:     {:.2}%", record.summary.overall_avg_recall);
            println!("Precision:  {:.2}%", record.summary.overall_avg_precision);
            println!("F1:         {:.2}%", record.summary.overall_avg_f1);
            println!("Similarity: {:.2}%", record.summary.overall_avg_similarity);
            println!("Total time: {:.3}s", record.summary.total_time);

            for (name, track) in &record.tracks {
                println!("\n=== Track: {} ({} queries) ===", name, track.per_query.len());
                println!("Recall:     {:.2}%", track.summary.avg_recall);
                println!("Precision:  {:.2}%", track.summary.avg_precision);
                println!("F1:         {:.2}%", track.summary.avg_f1);
                println!("Similarity: {:.2}%", track.summary.avg_similarity);
                println!("Latency:    {:.3}s", track.summary.avg_latency);
            }
        }
        Command::Leaderboard => {
            let config = Config::load()?;
            let store = FsRunStore::new(&config.storage.runs_dir)?;
            let entries = leaderboard(&store)?;

            if entries.is_empty() {
                println!("No runs recorded yet.");
                return Ok(());
            }

            println!(
                "{:<4} {:<22} {:>8} {:>10} {:>8} {:>11} {:>11}",
                "#", "run", "F1", "precision", "recall", "similarity", "time"
            );
            for (rank, entry) in entries.iter().enumerate() {
                println!(
                    "{:<4} {:<22} {:>7.2}% {:>9.2}% {:>7.2}% {:>10.2}% {:>10.3}s",
                    rank + 1,
                    entry.id,
                    entry.f1,
                    entry.precision,
                    entry.recall,
                    entry.similarity,
                    entry.total_time
                );
            }
        }
    }

    Ok(())
}
