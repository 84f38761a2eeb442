use anyhow::Result;
use serde_json::json;

use cinevault_core::media::{MediaKind, MediaSource, Provider};
use cinevault_core::{AppConfig, TmdbClient};

pub async fn run(config: &AppConfig, id: u64, kind: Option<MediaKind>, json: bool) -> Result<()> {
    let client = TmdbClient::new(&config.tmdb)?;

    let detail = client.fetch_detail(id, kind).await?;
    let kind = detail.item.kind;

    // Auxiliary data is optional; failures degrade to "not available"
    let (credits, providers) = tokio::join!(
        client.fetch_credits(id, kind),
        client.fetch_watch_providers(id, kind)
    );
    let credits = credits.unwrap_or_else(|e| {
        tracing::warn!("Credits unavailable for {} {}: {}", kind, id, e);
        None
    });
    let providers = providers.unwrap_or_else(|e| {
        tracing::warn!("Watch providers unavailable for {} {}: {}", kind, id, e);
        None
    });

    if json {
        let out = json!({
            "detail": detail,
            "credits": credits,
            "providers": providers,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let item = &detail.item;
    println!("{} [{}]", item.title, item.kind_label());
    if let Some(tagline) = &detail.tagline {
        println!("  \"{}\"", tagline);
    }
    println!();
    println!("  Released:  {}", item.release_date.as_deref().unwrap_or("Unknown"));
    println!("  {}", item.rating_label());
    if let Some(runtime) = detail.runtime_label() {
        println!("  Runtime:   {}", runtime);
    }
    if !detail.genres.is_empty() {
        println!("  Genres:    {}", detail.genres.join(", "));
    }
    if kind == MediaKind::Series {
        if let Some(seasons) = detail.number_of_seasons {
            println!(
                "  Seasons:   {} ({} episodes)",
                seasons,
                detail.number_of_episodes.unwrap_or(0)
            );
        }
    }
    if let Some(status) = &detail.status {
        println!("  Status:    {}", status);
    }
    println!("  Page:      {}", item.web_url());
    if let Some(poster) = client.poster_url(item, "w500") {
        println!("  Poster:    {}", poster);
    }
    println!();
    println!("{}", item.overview_or_placeholder());
    println!();

    match &credits {
        Some(credits) => {
            println!("Cast:");
            for member in &credits.cast {
                if member.character.is_empty() {
                    println!("  {}", member.name);
                } else {
                    println!("  {} as {}", member.name, member.character);
                }
            }
        }
        None => println!("Cast information not available"),
    }
    println!();

    match providers.as_ref().filter(|p| !p.is_empty()) {
        Some(providers) => {
            println!("Where to watch ({}):", providers.region);
            print_providers("Stream", &providers.flatrate);
            print_providers("Rent", &providers.rent);
            print_providers("Buy", &providers.buy);
        }
        None => println!("Streaming information not available"),
    }

    Ok(())
}

fn print_providers(label: &str, providers: &[Provider]) {
    if providers.is_empty() {
        return;
    }
    let names: Vec<&str> = providers.iter().map(|p| p.provider_name.as_str()).collect();
    println!("  {:<7}{}", format!("{}:", label), names.join(", "));
}
