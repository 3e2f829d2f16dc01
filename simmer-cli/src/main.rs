//! Simmer CLI binary: answer one recipe question and print it on stdout.
//!
//! Builds the production adapter set (OpenAI chat + embeddings, Chroma,
//! Tavily) from flags and environment, runs the pipeline once, and prints the
//! answer. Configuration comes from `.env` or the environment; logs stay out
//! of stdout (see `logging`).

mod logging;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use simmer::adapters::{ChromaRetriever, OpenAiChat, OpenAiEmbedder, TavilySearch};
use simmer::memory::MemorySaver;
use simmer::{Pipeline, RunConfig, Services};

#[derive(Parser, Debug)]
#[command(name = "simmer")]
#[command(about = "Simmer — grounded recipe answers from the command line")]
struct Args {
    /// The question to answer
    question: String,

    /// Session id for state checkpointing
    #[arg(long, value_name = "ID")]
    session: Option<String>,

    /// Abort with a cancelled error if no answer within this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Chat model for classify/grade/generate
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o")]
    model: String,

    /// Embedding model for retrieval queries
    #[arg(long, env = "EMBEDDING_MODEL", default_value = "text-embedding-3-small")]
    embedding_model: String,

    /// Chroma server root URL
    #[arg(long, env = "CHROMA_URL", default_value = "http://localhost:8000")]
    chroma_url: String,

    /// Chroma collection holding the recipe passages
    #[arg(long, env = "CHROMA_COLLECTION", default_value = "recipes")]
    collection: String,

    /// Passages to retrieve per question
    #[arg(long, default_value_t = 1)]
    top_k: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();
    if let Err(error) = logging::init() {
        eprintln!("logging init failed: {}", error);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(answer) => {
            println!("{}", answer);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<String, Box<dyn std::error::Error>> {
    let tavily_key =
        std::env::var("TAVILY_API_KEY").map_err(|_| "TAVILY_API_KEY not set in environment")?;

    // One chat client serves classifier, grader, and generator.
    let chat = Arc::new(OpenAiChat::new(&args.model));
    let embedder = Arc::new(OpenAiEmbedder::new(&args.embedding_model));
    let mut retriever = ChromaRetriever::new(&args.chroma_url, &args.collection, embedder)
        .with_top_k(args.top_k);
    if let Ok(key) = std::env::var("CHROMA_API_KEY") {
        retriever = retriever.with_api_key(key);
    }

    let services = Services {
        classifier: chat.clone(),
        retriever: Arc::new(retriever),
        grader: chat.clone(),
        search: Arc::new(TavilySearch::new(tavily_key)),
        generator: chat,
    };
    let mut builder = Pipeline::builder(services);
    if args.session.is_some() {
        builder = builder.checkpointer(Arc::new(MemorySaver::new()));
    }
    let pipeline = builder.build()?;

    let config = RunConfig {
        session_id: args.session,
        deadline: args.timeout.map(Duration::from_secs),
    };
    Ok(pipeline.run(&args.question, config).await?)
}
