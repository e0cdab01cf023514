//! cinema-db - holds the shared database connection and reports its state.

use cinema_db::{connection, logging};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; MONGO_URI may come from the real environment.
    let _ = dotenvy::dotenv();

    logging::init_stderr_logging();

    let (handle, _pending) = match connection::initialize_shared() {
        Ok(initialized) => initialized,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    };

    let mut states = handle.subscribe();
    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                info!("Connection state: {}", state);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }
}
