use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use top5_app::backend::LiveBackend;
use top5_app::config::AppConfig;
use top5_app::session::Session;
use top5_app::{leaderboard, lists, themes};
use top5_core::ListSubmission;
use top5_rawg::RawgClient;
use top5_render::{Composer, ImageFetcher};
use top5_supabase::SupabaseClient;

/// A prepared submission: who is posting, which theme, and five search
/// queries resolved to their first hit in rank order.
#[derive(Debug, Deserialize)]
struct SubmissionFile {
    username: String,
    #[serde(default)]
    twitter: bool,
    #[serde(default)]
    instagram: bool,
    #[serde(default)]
    show_username: Option<bool>,
    #[serde(default)]
    theme: Option<String>,
    games: Vec<String>,
}

fn usage() -> ! {
    eprintln!("usage: top5 <leaderboard | themes | search <query> | submit <submission.toml>>");
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load();
    config.validate();

    let store = SupabaseClient::new(&config.supabase_url, &config.supabase_anon_key);

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("leaderboard") => show_leaderboard(&store).await,
        Some("themes") => show_themes(&store).await,
        Some("search") => {
            let Some(query) = args.next() else { usage() };
            run_search(&config, &store, &query).await;
        },
        Some("submit") => {
            let Some(path) = args.next() else { usage() };
            run_submit(&config, &store, &path).await;
        },
        _ => usage(),
    }
}

async fn show_leaderboard(store: &SupabaseClient) {
    match leaderboard::load_count(store).await {
        Ok(count) => println!("{count} lists saved so far\n"),
        Err(e) => tracing::warn!(error = %e, "List count unavailable"),
    }
    let board = match leaderboard::load_leaderboard(store).await {
        Ok(board) => board,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load leaderboard");
            std::process::exit(1);
        },
    };
    println!("Most-picked games:");
    for (rank, entry) in board.iter().enumerate() {
        println!("{:>2}. {} ({} lists)", rank + 1, entry.name, entry.count);
    }
    if let Ok(recent) = leaderboard::load_recent(store).await {
        println!("\nRecent lists:");
        for record in recent {
            println!(
                "  #{} @{} {}",
                record.id,
                record.username,
                record.created_at.unwrap_or_default()
            );
        }
    }
}

async fn show_themes(store: &SupabaseClient) {
    let set = themes::resolve_themes(store).await;
    for theme in set.iter() {
        let kind = if theme.is_photo() { "photo" } else { "gradient" };
        println!("{:<12} {:<20} {kind}", theme.key, theme.name);
    }
}

fn live_backend(config: &AppConfig, store: &SupabaseClient) -> LiveBackend {
    LiveBackend {
        supabase: store.clone(),
        rawg: RawgClient::new(&config.rawg_api_key),
        fetcher: ImageFetcher::new(),
    }
}

async fn run_search(config: &AppConfig, store: &SupabaseClient, query: &str) {
    let session = Session::new(live_backend(config, store));
    for game in session.search_now(query).await {
        let origin = if game.from_cache { "cache" } else { "api" };
        println!("{:>9}  {} ({}) [{origin}]", game.id, game.name, game.year_label());
    }
}

async fn run_submit(config: &AppConfig, store: &SupabaseClient, path: &str) {
    let file = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(path, error = %e, "Cannot read submission file");
            std::process::exit(1);
        },
    };
    let submission: SubmissionFile = match toml::from_str(&file) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!(path, error = %e, "Cannot parse submission file");
            std::process::exit(1);
        },
    };

    let session = Session::new(live_backend(config, store));
    for query in &submission.games {
        let results = session.search_now(query).await;
        let Some(game) = results.into_iter().next() else {
            tracing::error!(query, "No search results");
            std::process::exit(1);
        };
        println!("{query} -> {} ({})", game.name, game.year_label());
        session.select(game).await;
    }
    session.wait_for_images().await;

    let theme_set = themes::resolve_themes(store).await;
    let selected = submission.theme.as_deref().unwrap_or_default();
    let theme = match theme_set
        .selected_or_first(selected)
        .and_then(|key| theme_set.get(key))
    {
        Some(theme) => theme.clone(),
        None => {
            tracing::error!("No themes available");
            std::process::exit(1);
        },
    };

    let selection = session.selection().await;
    if let Err(message) =
        lists::validate_submission(&selection, &submission.username, Some(&theme))
    {
        eprintln!("{message}");
        std::process::exit(1);
    }

    let composer = Composer::new(ImageFetcher::new());
    let generated_image = match composer
        .compose(
            selection.games(),
            &theme,
            &submission.username,
            submission.show_username.unwrap_or(true),
            selection.images(),
        )
        .await
    {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            tracing::error!(error = %e, "Failed to generate card");
            std::process::exit(1);
        },
    };

    let Some(games) = selection.finalize() else {
        tracing::error!("Selection incomplete after search");
        std::process::exit(1);
    };
    let list = ListSubmission {
        username: submission.username.clone(),
        twitter: submission.twitter,
        instagram: submission.instagram,
        games,
        generated_image,
    };

    match lists::save_list(store, config, &list).await {
        Ok(list_id) => {
            println!("Saved list #{list_id}");
            println!("Share page: {}", lists::share_url(store, config, list_id));
            println!("View: {}?list={list_id}", config.site_url);
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to save list");
            std::process::exit(1);
        },
    }
}
