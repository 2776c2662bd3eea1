use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use sampras_scan::{
    config::AppConfig,
    models::job::{ImagePayload, JobRequest},
    services::{delay::TokioDelay, recognition::SamprasClient, runner::JobRunner, session::Session},
};
use tracing_subscriber::EnvFilter;

fn load_image(path: &Path) -> Result<ImagePayload, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    Ok(ImagePayload::from_image_bytes(&bytes)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [receipt_path, slip_path] = args.as_slice() else {
        eprintln!("usage: scan-once <receipt-image> <slip-image>");
        return ExitCode::from(2);
    };

    let config = AppConfig::from_env().expect("Failed to load configuration");

    let receipt = match load_image(Path::new(receipt_path)) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("receipt {}: {}", receipt_path, e);
            return ExitCode::from(2);
        }
    };
    let slip = match load_image(Path::new(slip_path)) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("slip {}: {}", slip_path, e);
            return ExitCode::from(2);
        }
    };
    let job = match JobRequest::new(Some(receipt), Some(slip)) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let client = SamprasClient::from_config(&config).expect("Failed to initialize API client");
    let session = Arc::new(Session::new());
    let runner = JobRunner::from_config(&config, session.clone(), Arc::new(client), Arc::new(TokioDelay));

    let outcome = match runner.run(job).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    for entry in session.entries() {
        println!("{}", entry);
    }

    if !outcome.is_success() {
        eprintln!("job ended: {}", outcome);
        return ExitCode::FAILURE;
    }

    if let Some(result) = session.result() {
        match serde_json::to_string_pretty(&result) {
            Ok(pretty) => println!("{}", pretty),
            Err(e) => eprintln!("failed to render result: {}", e),
        }
    }
    ExitCode::SUCCESS
}
