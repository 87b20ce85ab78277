mod error;
mod fetcher;
mod model;
mod parser;
mod traverse;

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use crate::fetcher::{HttpSource, RecordSource, DEFAULT_BASE_URL};
use crate::model::Store;

#[derive(Parser)]
#[command(name = "grave_scraper", about = "Recursive ancestry scraper for memorial pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect a full ancestry tree starting from one memorial id
    Run {
        /// Starting memorial id (prompted for if omitted)
        #[arg(short, long)]
        id: Option<String>,
        /// Output JSON file (prompted for if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Base endpoint the id is appended to
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Fetch and print a single record without recursing
    Peek {
        /// Memorial id
        #[arg(short, long)]
        id: String,
        /// Base endpoint the id is appended to
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { id, output, base_url } => {
            let id = match id {
                Some(v) => v,
                None => prompt("Please enter the initial memorial id: ")?,
            };
            let output = match output {
                Some(v) => v,
                None => PathBuf::from(prompt("Please enter the filename to write data: ")?),
            };

            let source = HttpSource::new(base_url)?;
            let mut store = Store::new();
            let mut visited = HashSet::new();
            traverse::collect(&source, &id, &mut store, &mut visited)?;

            println!("{} records found!", store.len());
            model::write_store(&store, &output)?;
            println!("Exiting normally");
            Ok(())
        }
        Commands::Peek { id, base_url } => {
            let source = HttpSource::new(base_url)?;
            let html = source.fetch(&id)?;
            let doc = parser::parse_document(&html);
            let record = traverse::extract_record(&doc, &id)?;

            let mut obj = serde_json::Map::new();
            obj.insert(record.name.clone(), serde_json::to_value(&record)?);
            println!("{}", serde_json::to_string_pretty(&obj)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn prompt(msg: &str) -> anyhow::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
