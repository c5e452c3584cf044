use std::process;
use std::sync::Arc;

use starter_rpc::config::{load_config, schema_json};
use starter_rpc::startup::run;
use starter_rpc::utils::logger::init_logging;
use tracing::error;

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--schema") {
        match schema_json() {
            Ok(schema) => println!("{}", schema),
            Err(e) => {
                eprintln!("Error rendering configuration schema: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        process::exit(1);
    }

    if let Err(e) = run(Arc::new(config)).await {
        error!("Server stopped: {}", e);
        process::exit(1);
    }
}
