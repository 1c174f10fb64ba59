//! Writes every post page to disk as a static site.

use anyhow::Context;
use clap::Parser;
use domain::PageProps;
use render::FormView;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use server::config::Settings;
use server::pages::{load_post, static_paths};

#[derive(Parser)]
#[command(about = "Render all post pages into a directory")]
struct Args {
    /// Output directory
    #[arg(short, long, default_value = "out")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let settings = Settings::new().context("Failed to load configuration")?;
    let store = settings.content_store().await?;
    let renderer = settings.renderer();

    let paths = static_paths(store.as_ref())
        .await
        .context("Failed to enumerate post paths")?;

    let mut written = 0;
    for slug in paths.slugs() {
        let post = match load_post(store.as_ref(), Some(slug.as_str()))
            .await
            .with_context(|| format!("Failed to load post {}", slug))?
        {
            PageProps::Found { post, .. } => post,
            PageProps::NotFound => {
                warn!("Enumerated path /post/{} has no post, skipping", slug);
                continue;
            }
        };

        let dir = args.out.join("post").join(slug.as_str());
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let html = renderer.render_post(&post, &FormView::default());
        tokio::fs::write(dir.join("index.html"), html).await?;
        written += 1;
    }

    tokio::fs::create_dir_all(&args.out).await?;
    tokio::fs::write(args.out.join("404.html"), renderer.render_not_found()).await?;

    info!("Exported {} post pages to {}", written, args.out.display());
    Ok(())
}
