mod args;
mod play;
mod render;

use std::sync::Arc;

use args::{Args, Command, print_usage};
use services::{AppServices, Clock, OpenAiQuizGenerator, PromptOptions};
use storage::Storage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn list_articles(storage: &Storage) -> Result<(), Box<dyn std::error::Error>> {
    let articles = storage.articles.list_articles().await?;
    if articles.is_empty() {
        println!("Ingen artikler funnet.");
        return Ok(());
    }
    for article in &articles {
        let mut line = format!("- {}", article.title);
        if let Some(source) = article.source() {
            line.push_str(&format!(" ({source})"));
        }
        if let Some(at) = article.published_at() {
            line.push_str(&format!(" {}", at.format("%Y-%m-%d")));
        }
        println!("{line}");
    }
    println!("{} artikler", articles.len());
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok()).map_err(
        |e| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;

    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    init_tracing(&parsed);
    info!(dir = %parsed.articles_dir.display(), "using article directory");

    // Keep file access and network setup in the binary glue so core/services stay pure.
    let storage = Storage::directory(&parsed.articles_dir);

    match parsed.command {
        Command::Articles => list_articles(&storage).await,
        Command::Play => {
            let generator = OpenAiQuizGenerator::from_env();
            if !generator.enabled() {
                warn!("no API key set (QUIZ_AI_API_KEY or OPENAI_API_KEY); quiz fetches will fail");
            }
            let prompt = PromptOptions {
                question_count: parsed.question_count,
                ..PromptOptions::default()
            };
            let services = AppServices::new(
                &storage,
                Arc::new(generator),
                prompt,
                parsed.max_articles,
                parsed.scoring,
                Clock::default_clock(),
            );
            play::run(services.session()).await
        }
        Command::Help => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
