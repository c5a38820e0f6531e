#[tokio::main]
async fn main() {
    // Startup failures end the process without ever serving traffic.
    if let Err(e) = guest_server::run_with_config().await {
        tracing::error!(error = %e, "startup aborted.");
    }
}
