//! pack: packd CLI client
//!
//! Browse the catalog served by packd.

use clap::{Parser, Subcommand};
use pack_service::{HttpCatalogClient, Pack, PackClient, PackSummary};

/// packd CLI client
#[derive(Parser)]
#[command(name = "pack")]
#[command(version = pack_service::PKG_VERSION)]
#[command(about = "Question pack catalog client")]
struct Args {
    /// HTTP address of packd (list, health)
    #[arg(long, env = "PACKD_HTTP_URL", default_value = "http://127.0.0.1:8005")]
    http: String,

    /// gRPC address of packd (info, content, exists)
    #[arg(long, env = "PACKD_GRPC_URL", default_value = "http://127.0.0.1:50055")]
    grpc: String,

    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check service health
    Health,

    /// List every pack
    List,

    /// Show pack metadata
    Info {
        /// Pack identifier
        pack_id: String,
    },

    /// Show a pack with all rounds, themes and questions
    Content {
        /// Pack identifier
        pack_id: String,
    },

    /// Check whether a pack exists
    Exists {
        /// Pack identifier
        pack_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Health => {
            let health = HttpCatalogClient::new(&args.http).health().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("{} {}", health.service, health.version);
                println!("status: {}", health.status);
            }
        }

        Command::List => {
            let list = HttpCatalogClient::new(&args.http).list_packs().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if list.packs.is_empty() {
                println!("no packs available");
            } else {
                for pack in &list.packs {
                    print_summary_line(pack);
                }
                println!("total: {}", list.total);
            }
        }

        Command::Info { pack_id } => {
            let client = PackClient::connect(&args.grpc).await?;
            match client.get_pack_info(&pack_id).await? {
                Some(summary) if args.json => {
                    println!("{}", serde_json::to_string_pretty(&summary)?)
                }
                Some(summary) => print_summary(&summary),
                None => not_found(&pack_id),
            }
        }

        Command::Content { pack_id } => {
            let client = PackClient::connect(&args.grpc).await?;
            match client.get_pack_content(&pack_id).await? {
                Some(pack) if args.json => println!("{}", serde_json::to_string_pretty(&pack)?),
                Some(pack) => print_content(&pack),
                None => not_found(&pack_id),
            }
        }

        Command::Exists { pack_id } => {
            let client = PackClient::connect(&args.grpc).await?;
            let exists = client.validate_pack_exists(&pack_id).await?;
            println!("{pack_id}: {}", if exists { "exists" } else { "not found" });
            if !exists {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn not_found(pack_id: &str) -> ! {
    eprintln!("pack {pack_id} not found");
    std::process::exit(1);
}

fn print_summary_line(pack: &PackSummary) {
    let media = if pack.has_media { " [media]" } else { "" };
    println!(
        "{}  {} by {} ({} rounds, {} questions){media}",
        pack.id, pack.name, pack.author, pack.rounds_count, pack.questions_count
    );
}

fn print_summary(pack: &PackSummary) {
    println!("id: {}", pack.id);
    println!("name: {}", pack.name);
    println!("author: {}", pack.author);
    println!("description: {}", pack.description);
    println!("rounds: {}", pack.rounds_count);
    println!("questions: {}", pack.questions_count);
    println!("has media: {}", pack.has_media);
    println!("created: {}", pack.created_at);
}

fn print_content(pack: &Pack) {
    println!("{} by {} [{}]", pack.name(), pack.author(), pack.status());
    for round in pack.rounds() {
        println!("round {}: {}", round.round_number, round.name);
        for theme in &round.themes {
            println!("  {}", theme.name);
            for q in &theme.questions {
                let media = match &q.media_url {
                    Some(url) => format!(" ({} {url})", q.media_type.as_str()),
                    None => String::new(),
                };
                println!("    {:>4}  {}{media}", q.price, q.text);
            }
        }
    }
}
