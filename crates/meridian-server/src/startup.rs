//! Server startup utilities.

use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
    __  ___          _     ___
   /  |/  /__  _____(_)___/ (_)___ _____
  / /|_/ / _ \/ ___/ / __  / / __ `/ __ \
 / /  / /  __/ /  / / /_/ / / /_/ / / / /
/_/  /_/\___/_/  /_/\__,_/_/\__,_/_/ /_/
    "#
    );
}

/// Prints where the server can be reached.
pub fn print_startup_info(addr: &str, cache_backend: &str) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1/users", addr);
    info!("Health:    http://{}/health", addr);
    info!("Cache:     {}", cache_backend);
    info!("{}", separator);
}
