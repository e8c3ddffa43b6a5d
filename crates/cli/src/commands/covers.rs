use bookshelf_covers::{BatchOutcome, BookCover, CoverRequest};
use eyre::Result;
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::utils::create_cover_fetcher;

pub async fn handle_covers_command(
    book_id: Uuid,
    urls: Vec<Url>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let fetcher = create_cover_fetcher(&config.covers)?;

    let batch = if urls.is_empty() {
        info!("🖼️ Fetching covers for book {}", book_id);
        fetcher.fetch_book_covers(book_id).await?
    } else {
        info!("🖼️ Fetching {} covers for book {}", urls.len(), book_id);
        fetcher.fetch_all(&CoverRequest::new(book_id, urls)).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&batch.covers)?);
        return Ok(());
    }

    match &batch.outcome {
        BatchOutcome::Success if batch.covers.is_empty() => {
            println!("📭 No covers configured for book {}", book_id);
        }
        BatchOutcome::Success => {
            println!("✅ Fetched {} covers for book {}", batch.covers.len(), book_id);
            for cover in &batch.covers {
                print_cover(cover);
            }
        }
        BatchOutcome::CancelledPartial { reason } => {
            println!("⚠️ No covers returned for book {}", book_id);
            println!("   Batch cancelled: {}", reason);
        }
    }

    Ok(())
}

pub async fn handle_cover_command(cover_id: String, json: bool, config: &Config) -> Result<()> {
    let fetcher = create_cover_fetcher(&config.covers)?;

    match fetcher.fetch_cover(&cover_id).await? {
        Some(cover) if json => println!("{}", serde_json::to_string_pretty(&cover)?),
        Some(cover) => print_cover(&cover),
        None => println!("📭 Cover {} not found", cover_id),
    }

    Ok(())
}

fn print_cover(cover: &BookCover) {
    let size = cover
        .content
        .as_ref()
        .map(|c| format!("{} bytes encoded", c.len()))
        .unwrap_or_else(|| "no content".to_string());
    println!("  • {} ({}) from {}", cover.id, size, cover.source);
}
