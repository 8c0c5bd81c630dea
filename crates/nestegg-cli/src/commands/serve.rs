//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use nestegg_core::ModelArtifact;

/// Resolve the listen port: explicit flag, then the PORT env var, then 8080
pub fn resolve_port(flag: Option<u16>) -> u16 {
    flag.or_else(|| {
        std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
    })
    .unwrap_or(nestegg_server::DEFAULT_PORT)
}

pub async fn cmd_serve(host: &str, port: Option<u16>, model_path: &Path) -> Result<()> {
    // A missing or corrupt artifact is fatal: without its feature-name list
    // the service cannot guarantee schema alignment
    let artifact = ModelArtifact::load(model_path)
        .with_context(|| format!("Cannot serve without a model artifact at {}", model_path.display()))?;

    let port = resolve_port(port);

    println!("Starting Nestegg server...");
    println!("   Model: {}", model_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!();
    println!("   Press Ctrl+C to stop");

    nestegg_server::serve(artifact, host, port).await?;

    Ok(())
}
