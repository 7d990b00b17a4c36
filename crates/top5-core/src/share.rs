use std::fmt::Write;

use crate::list::RankedFive;

/// Escape text for safe embedding in generated HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The ranked-names description used in social-preview metadata, e.g.
/// `1. Doom • 2. Quake • ...`. Names are HTML-escaped.
pub fn ranked_description(games: &RankedFive) -> String {
    let mut out = String::new();
    for (rank, game) in games.ranked() {
        if rank > 1 {
            out.push_str(" • ");
        }
        let _ = write!(out, "{rank}. {}", escape_html(&game.name));
    }
    out
}

/// Render the static share page for a persisted list: social-card metadata
/// (Twitter + Open Graph), an inline preview, and a meta-refresh redirect
/// to the canonical site. All interpolated user content is escaped here.
pub fn share_page_html(
    username: &str,
    games: &RankedFive,
    image_url: &str,
    list_id: i64,
    site_url: &str,
) -> String {
    let username = escape_html(username);
    let description = ranked_description(games);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>@{username}'s Top 5 Games</title>
    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:title" content="@{username}'s Top 5 Games of All Time">
    <meta name="twitter:description" content="{description}">
    <meta name="twitter:image" content="{image_url}">
    <meta property="og:title" content="@{username}'s Top 5 Games of All Time">
    <meta property="og:description" content="{description}">
    <meta property="og:image" content="{image_url}">
    <meta property="og:image:width" content="390">
    <meta property="og:image:height" content="844">
    <meta property="og:type" content="website">
    <meta http-equiv="refresh" content="0;url={site_url}?list={list_id}">
    <style>
        body {{ font-family: -apple-system, sans-serif; display: flex; justify-content: center; align-items: center; min-height: 100vh; margin: 0; background: #f5f5f5; }}
        .container {{ text-align: center; padding: 2rem; }}
        img {{ max-width: 390px; height: auto; border-radius: 12px; box-shadow: 0 4px 12px rgba(0,0,0,0.1); }}
    </style>
</head>
<body>
    <div class="container">
        <img src="{image_url}" alt="@{username}'s Top 5 Games">
        <p>Redirecting to Top 5 Games...</p>
    </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::RankedGame;

    fn five(names: [&str; 5]) -> RankedFive {
        RankedFive::from_vec(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| RankedGame {
                    id: i as u64 + 1,
                    name: name.to_string(),
                    image: None,
                    year: None,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn escapes_script_tags() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html(r#"a"b'c&d"#), "a&quot;b&#039;c&amp;d");
    }

    #[test]
    fn description_lists_ranked_names() {
        let games = five(["Doom", "Quake", "Myst", "Hades", "Celeste"]);
        assert_eq!(
            ranked_description(&games),
            "1. Doom • 2. Quake • 3. Myst • 4. Hades • 5. Celeste"
        );
    }

    #[test]
    fn share_page_escapes_username_and_redirects() {
        let games = five(["A", "B", "C", "D", "E"]);
        let html = share_page_html(
            "<script>alert(1)</script>",
            &games,
            "https://cdn.example/42.png",
            42,
            "https://top5.games",
        );
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"content="0;url=https://top5.games?list=42""#));
        assert!(html.contains(r#"meta property="og:image" content="https://cdn.example/42.png""#));
    }

    #[test]
    fn share_page_escapes_game_names_in_description() {
        let games = five(["<b>Doom</b>", "B", "C", "D", "E"]);
        let html = share_page_html("player1", &games, "https://x/1.png", 1, "https://top5.games");
        assert!(html.contains("1. &lt;b&gt;Doom&lt;/b&gt;"));
    }
}
