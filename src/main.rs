use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rattle::config::{Config, DEFAULT_LOG_FILE};
use rattle::{Goodreads, GoodreadsError, OAuth1Session};

/// Log to `path` (truncated on start), falling back to stderr if the file
/// cannot be created
fn init_tracing(path: &str) {
    let (writer, ansi, file_error) = match File::create(path) {
        Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), false, None),
        Err(e) => (BoxMakeWriter::new(std::io::stderr), true, Some(e)),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rattle=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi),
        )
        .init();

    if let Some(e) = file_error {
        tracing::warn!("Could not open log file {}: {} (logging to stderr)", path, e);
    }
}

async fn run(config: Config) -> Result<(), GoodreadsError> {
    let session = OAuth1Session::new(config.credentials.clone())?;
    let mut goodreads = Goodreads::from_config(session, &config);

    goodreads.initialise_user().await?;
    let books = goodreads.get_books().await?;

    for book in &books {
        match serde_json::to_string(book) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!("Failed to serialize review {}: {}", book.id, e),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let log_file = config
        .as_ref()
        .map(|c| c.log_file.clone())
        .unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    init_tracing(&log_file);

    let result = match config {
        Ok(config) => run(config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
