use anyhow::Result;

use cinevault_core::media::{MediaSource, TimeWindow, TrendingKind};
use cinevault_core::{AppConfig, TmdbClient};

pub async fn run(config: &AppConfig, kind: TrendingKind, window: TimeWindow, json: bool) -> Result<()> {
    let client = TmdbClient::new(&config.tmdb)?;
    let items = client.fetch_trending(kind, window).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No movies or TV series available.");
        return Ok(());
    }

    println!("Trending {} this {} ({}):\n", kind, window, items.len());

    for (i, item) in items.iter().enumerate() {
        let year = item
            .release_year()
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        let rating = item
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());

        println!("{:>3}. {}{} [{}]  ★ {}", i + 1, item.title, year, item.kind_label(), rating);
        println!("     id {}  {}", item.id, item.web_url());
    }

    Ok(())
}
