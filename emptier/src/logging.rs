use tracing_subscriber::{EnvFilter, fmt};

pub fn init() {
    // RUST_LOG wins; otherwise info, with the SDK's own chatter held to warn.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aws_config=warn,aws_smithy_runtime=warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
