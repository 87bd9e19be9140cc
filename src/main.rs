//! blog-gate entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment (fails without `GATE_SECRET`)
//! 2. Build the Sanity content store client
//! 3. Build router: login/logout routes + rendered site as fallback
//! 4. Apply the access gate and security headers
//! 5. Start Axum server
//!
//! Also supports `keygen` and `hash-password` subcommands.

use base64::{engine::general_purpose, Engine as _};
use blog_gate::{
    auth::{access_gate, hash_password, AppState},
    config::Config,
    middleware::security_headers,
    routes,
    storage::sanity::SanityClient,
};
use rand::Rng;
use std::sync::Arc;
use tower_http::services::ServeDir;
use zeroize::Zeroizing;

/// Generate a random 32-byte secret for `GATE_SECRET`, base64 encoded.
fn keygen() -> String {
    let mut bytes = Zeroizing::new([0u8; 32]);
    rand::rng().fill(&mut bytes[..]);
    general_purpose::STANDARD.encode(bytes.as_slice())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  blog-gate                          Run the server");
    eprintln!("  blog-gate keygen                   Generate a GATE_SECRET");
    eprintln!("  blog-gate hash-password <password> Hash a category password for the CMS");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  blog-gate hash-password 'correct horse battery staple'");
    eprintln!();
    eprintln!("Then paste the output into the category's passwordHash field.");
}

#[tokio::main]
async fn main() {
    // Check for subcommands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None => {}
        Some("keygen") if args.len() == 2 => {
            println!("{}", keygen());
            return;
        }
        Some("hash-password") if args.len() == 3 => {
            let password = Zeroizing::new(args[2].clone());
            println!("{}", hash_password(&password));
            return;
        }
        Some(_) => {
            print_usage();
            std::process::exit(1);
        }
    }

    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!(
        bind_addr = %config.bind_addr,
        content_root = %config.content_root,
        lookup_failure_policy = %config.lookup_failure_policy,
        "Starting blog-gate"
    );

    let store = SanityClient::new(config.sanity_settings())
        .expect("Failed to build content store client");
    tracing::info!(endpoint = %store.endpoint(), "Content store configured");

    // Build shared state
    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config.clone()),
    };

    // Build router:
    // - Login/logout routes (with state)
    // - Rendered site (fallback)
    // - Access gate over everything, including the fallback
    // - Security headers
    let app = routes::gate_router(&config.content_root)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_gate,
        ))
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
