use std::path::PathBuf;

use clap::Parser;

use infradraw::RenderConfig;
use infradraw::config::{DEFAULT_EXTERNAL, DEFAULT_INVENTORY, DEFAULT_OUTPUT};

#[derive(Parser)]
#[command(
    name = "infradraw",
    about = "Render a PNG diagram of running components and their external services"
)]
struct Cli {
    /// Pipe-delimited inventory file (name|image|ports|status)
    #[arg(long, default_value = DEFAULT_INVENTORY)]
    inventory: PathBuf,

    /// JSON list of external services; built-in placeholders are used if absent
    #[arg(long, default_value = DEFAULT_EXTERNAL)]
    external: PathBuf,

    /// Output PNG path
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "INFRADRAW_LOG", default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = RenderConfig {
        inventory_path: cli.inventory,
        external_path: cli.external,
        output_path: cli.output,
        ..Default::default()
    };

    match infradraw::generate(&config) {
        Ok(summary) => println!("Wrote {}", summary.output_path.display()),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}
