//! Legacy story interviews from the terminal.
//!
//! Picks a photo, asks the interview questions one line at a time and
//! saves the finished story to the data directory:
//!
//! ```bash
//! cargo run -p legacy -- --photo sample-2 --data-dir ./legacy-data
//! ```

mod headless;

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Data directory used when neither `--data-dir` nor `LEGACY_DATA_DIR` is set.
const DEFAULT_DATA_DIR: &str = "./legacy-data";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays a clean transcript.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("legacy=info,legacy_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = parse_config_from_args(&args);
    headless::run_headless(config).await.map_err(|e| e.into())
}

/// Parse runner configuration from command line arguments and the environment.
fn parse_config_from_args(args: &[String]) -> headless::RunConfig {
    let mut config = headless::RunConfig {
        data_dir: std::env::var("LEGACY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
        photo_id: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--photo" => {
                if let Some(id) = args.get(i + 1) {
                    config.photo_id = Some(id.clone());
                    i += 1;
                }
            }
            "--data-dir" => {
                if let Some(dir) = args.get(i + 1) {
                    config.data_dir = PathBuf::from(dir);
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Legacy - turn a photo into a recorded life story");
    println!();
    println!("USAGE:");
    println!("  legacy [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help           Show this help message");
    println!("  --photo <ID>         Start interviewing about this photo");
    println!("  --data-dir <PATH>    Where stories and photos are kept");
    println!("                       (default: $LEGACY_DATA_DIR or {DEFAULT_DATA_DIR})");
    println!();
    println!("EXAMPLES:");
    println!("  legacy                       # Choose a photo with #photo <id>");
    println!("  legacy --photo sample-2      # Interview about the wedding photo");
}
