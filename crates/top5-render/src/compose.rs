//! Composes the shareable "top 5" card: fixed portrait canvas, themed
//! background, five rank cards, footer branding.

use std::time::Duration;

use ab_glyph::FontRef;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use top5_core::theme::Background;
use top5_core::{Game, ImageCache, Rgba, Theme};

use crate::acquire::ImageFetcher;
use crate::data_url;
use crate::draw::{Align, cover_crop, draw_text, fill_gradient, fill_rect, wrap_text};

pub const CANVAS_WIDTH: u32 = 1080;
pub const CANVAS_HEIGHT: u32 = 1920;

/// Bound on loading a photographic theme background.
const BACKGROUND_TIMEOUT: Duration = Duration::from_secs(3);

/// Bound on loading each game image.
const GAME_IMAGE_TIMEOUT: Duration = Duration::from_secs(5);

const START_Y: i64 = 200;
const ITEM_HEIGHT: i64 = 310;
const IMAGE_SIZE: u32 = 240;
const ITEM_SPACING: u32 = 15;
const TEXT_COLUMN_X: f32 = 340.0;

/// Flat color shown behind a photographic background that fails to load.
const PHOTO_FALLBACK: Rgba = Rgba::rgb(0x8b, 0x6f, 0x47);

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("expected exactly 5 ranked games, got {0}")]
    GameCount(usize),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Renders finished top-5 cards. Holds the bundled fonts and the fetcher
/// used for remote theme/game images.
pub struct Composer {
    regular: FontRef<'static>,
    bold: FontRef<'static>,
    fetcher: ImageFetcher,
}

impl Composer {
    pub fn new(fetcher: ImageFetcher) -> Self {
        let regular = FontRef::try_from_slice(include_bytes!("../assets/fonts/DejaVuSans.ttf"))
            .expect("bundled font is valid");
        let bold = FontRef::try_from_slice(include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf"))
            .expect("bundled font is valid");
        Self {
            regular,
            bold,
            fetcher,
        }
    }

    /// Compose the card for exactly five ranked games and return it as a
    /// PNG data URL. Individual image failures degrade to a glyph
    /// placeholder; only a wrong game count or a PNG encoding problem
    /// fails the composition.
    pub async fn compose(
        &self,
        games: &[Game],
        theme: &Theme,
        username: &str,
        show_username: bool,
        images: &ImageCache,
    ) -> Result<String, ComposeError> {
        if games.len() != 5 {
            return Err(ComposeError::GameCount(games.len()));
        }

        let mut canvas = self.background(theme).await;

        // Title block
        let center_x = CANVAS_WIDTH as f32 / 2.0;
        draw_text(
            &mut canvas,
            theme.text_color,
            center_x,
            90.0,
            56.0,
            &self.bold,
            "MY TOP 5",
            Align::Center,
        );
        draw_text(
            &mut canvas,
            theme.secondary_color,
            center_x,
            138.0,
            32.0,
            &self.regular,
            "GAMES OF ALL TIME",
            Align::Center,
        );

        for (i, game) in games.iter().enumerate() {
            let y = START_Y + i as i64 * ITEM_HEIGHT;
            self.draw_card(&mut canvas, game, i + 1, y, theme, images)
                .await;
        }

        // Footer
        if show_username && !username.is_empty() {
            draw_text(
                &mut canvas,
                theme.accent_color,
                center_x,
                (CANVAS_HEIGHT - 100) as f32,
                26.0,
                &self.regular,
                &format!("@{username}"),
                Align::Center,
            );
        }
        fill_rect(
            &mut canvas,
            0,
            (CANVAS_HEIGHT - 70) as i64,
            CANVAS_WIDTH,
            70,
            Rgba::rgba(255, 255, 255, 64),
        );
        draw_text(
            &mut canvas,
            theme.text_color,
            center_x,
            (CANVAS_HEIGHT - 42) as f32,
            22.0,
            &self.regular,
            "CREATE YOURS AT",
            Align::Center,
        );
        draw_text(
            &mut canvas,
            theme.accent_color,
            center_x,
            (CANVAS_HEIGHT - 14) as f32,
            26.0,
            &self.bold,
            "TOP5.GAMES",
            Align::Center,
        );

        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(&canvas, CANVAS_WIDTH, CANVAS_HEIGHT, ExtendedColorType::Rgba8)
            .map_err(|e| ComposeError::Encode(e.to_string()))?;
        Ok(data_url::encode("image/png", &buf))
    }

    async fn background(&self, theme: &Theme) -> RgbaImage {
        match &theme.background {
            Background::Photo { image_url, overlay } => {
                // Flat fallback first, so a failed load still yields a
                // usable card.
                let mut canvas = RgbaImage::from_pixel(
                    CANVAS_WIDTH,
                    CANVAS_HEIGHT,
                    image::Rgba([PHOTO_FALLBACK.r, PHOTO_FALLBACK.g, PHOTO_FALLBACK.b, 255]),
                );
                match self.fetcher.load_image(image_url, BACKGROUND_TIMEOUT).await {
                    Ok(img) => {
                        let bg = cover_crop(&img, CANVAS_WIDTH, CANVAS_HEIGHT);
                        image::imageops::overlay(&mut canvas, &bg, 0, 0);
                    },
                    Err(err) => {
                        tracing::debug!(url = image_url, error = %err, "Theme background failed to load");
                    },
                }
                if let Some(overlay) = overlay {
                    fill_rect(&mut canvas, 0, 0, CANVAS_WIDTH, CANVAS_HEIGHT, *overlay);
                }
                canvas
            },
            Background::Gradient(spec) => {
                let mut canvas = RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
                fill_gradient(&mut canvas, spec);
                canvas
            },
        }
    }

    async fn draw_card(
        &self,
        canvas: &mut RgbaImage,
        game: &Game,
        rank: usize,
        y: i64,
        theme: &Theme,
        images: &ImageCache,
    ) {
        // Card backdrop and image well
        fill_rect(
            canvas,
            50,
            y,
            CANVAS_WIDTH - 100,
            (ITEM_HEIGHT as u32) - ITEM_SPACING,
            Rgba::rgba(0, 0, 0, 89),
        );
        fill_rect(canvas, 70, y + 35, IMAGE_SIZE, IMAGE_SIZE, Rgba::rgba(0, 0, 0, 102));

        let drawn = match images.compose_source(game) {
            Some(src) => match self.fetcher.load_image(src, GAME_IMAGE_TIMEOUT).await {
                Ok(img) => {
                    let tile = cover_crop(&img, IMAGE_SIZE, IMAGE_SIZE);
                    image::imageops::overlay(canvas, &tile, 70, y + 35);
                    true
                },
                Err(err) => {
                    tracing::debug!(game = game.name, error = %err, "Game image failed to load");
                    false
                },
            },
            None => false,
        };
        if !drawn {
            // Visual fallback: the name's first character as a large glyph
            let glyph = game.name.chars().next().unwrap_or('?').to_string();
            draw_text(
                canvas,
                theme.accent_color,
                70.0 + IMAGE_SIZE as f32 / 2.0,
                (y + 35 + IMAGE_SIZE as i64 / 2 + 25) as f32,
                80.0,
                &self.regular,
                &glyph,
                Align::Center,
            );
        }

        // Rank numeral
        draw_text(
            canvas,
            theme.text_color,
            TEXT_COLUMN_X,
            (y + 75) as f32,
            60.0,
            &self.regular,
            &rank.to_string(),
            Align::Left,
        );

        // Name, wrapped to at most three lines
        let max_width = (CANVAS_WIDTH - 370) as f32;
        let lines = wrap_text(&self.regular, 28.0, &game.name, max_width, 3);
        let mut line_y = (y + 130) as f32;
        for line in &lines {
            draw_text(
                canvas,
                theme.text_color,
                TEXT_COLUMN_X,
                line_y,
                28.0,
                &self.regular,
                line,
                Align::Left,
            );
            line_y += 36.0;
        }

        // Release year under the name
        draw_text(
            canvas,
            theme.secondary_color,
            TEXT_COLUMN_X,
            line_y + 12.0,
            22.0,
            &self.regular,
            &game.year_label(),
            Align::Left,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use top5_core::theme::ThemeSet;

    fn tiny_png_data_url(color: [u8; 4]) -> String {
        let img = RgbaImage::from_pixel(8, 8, image::Rgba(color));
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(&img, 8, 8, ExtendedColorType::Rgba8)
            .unwrap();
        data_url::encode("image/png", &buf)
    }

    fn game(id: u64, name: &str) -> Game {
        Game {
            id,
            name: name.to_string(),
            slug: None,
            released: Some("2015-03-10".to_string()),
            rating: None,
            metacritic: None,
            background_image: None,
            platforms: vec![],
            genres: vec![],
            from_cache: false,
        }
    }

    fn five_games() -> Vec<Game> {
        vec![
            game(1, "Outer Wilds"),
            game(2, "Hades"),
            game(3, "The Witness"),
            game(4, "Disco Elysium"),
            game(5, "Return of the Obra Dinn"),
        ]
    }

    fn gradient_theme() -> Theme {
        ThemeSet::fallback().get("midnight").unwrap().clone()
    }

    fn decode_png(data_url_str: &str) -> RgbaImage {
        let (mime, bytes) = data_url::decode(data_url_str).unwrap();
        assert_eq!(mime, "image/png");
        image::load_from_memory(&bytes).unwrap().to_rgba8()
    }

    #[tokio::test]
    async fn composes_fixed_size_card_with_full_cache() {
        let composer = Composer::new(ImageFetcher::new());
        let games = five_games();
        let mut cache = ImageCache::new();
        for g in &games {
            cache.resolve(g.id, tiny_png_data_url([200, 40, 40, 255]));
        }
        let out = composer
            .compose(&games, &gradient_theme(), "player1", true, &cache)
            .await
            .unwrap();
        let img = decode_png(&out);
        assert_eq!(img.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }

    #[tokio::test]
    async fn missing_and_loading_cache_entries_still_compose() {
        let composer = Composer::new(ImageFetcher::new());
        let games = five_games();

        // One entry missing entirely
        let mut cache = ImageCache::new();
        for g in games.iter().skip(1) {
            cache.resolve(g.id, tiny_png_data_url([0, 120, 220, 255]));
        }
        let out = composer
            .compose(&games, &gradient_theme(), "player1", false, &cache)
            .await
            .unwrap();
        assert_eq!(decode_png(&out).dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));

        // One entry stuck on the loading sentinel
        cache.mark_loading(games[0].id);
        let out = composer
            .compose(&games, &gradient_theme(), "player1", false, &cache)
            .await
            .unwrap();
        assert_eq!(decode_png(&out).dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }

    #[tokio::test]
    async fn unreachable_game_image_degrades_to_glyph() {
        let composer = Composer::new(ImageFetcher::new());
        let games = five_games();
        let mut cache = ImageCache::new();
        // Connection refused fails fast; composition must still succeed
        cache.resolve(games[0].id, "http://127.0.0.1:1/nope.png".to_string());
        let out = composer
            .compose(&games, &gradient_theme(), "player1", false, &cache)
            .await
            .unwrap();
        assert_eq!(decode_png(&out).dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }

    #[tokio::test]
    async fn photo_theme_with_dead_background_uses_fallback_fill() {
        let composer = Composer::new(ImageFetcher::new());
        let theme = Theme {
            key: "arcade".to_string(),
            name: "Arcade".to_string(),
            background: Background::Photo {
                image_url: "http://127.0.0.1:1/bg.jpg".to_string(),
                overlay: Some(Rgba::rgba(0, 0, 0, 100)),
            },
            text_color: Rgba::rgb(255, 255, 255),
            secondary_color: Rgba::rgba(255, 255, 255, 179),
            accent_color: Rgba::rgb(0xe9, 0x45, 0x60),
        };
        let out = composer
            .compose(&five_games(), &theme, "", false, &ImageCache::new())
            .await
            .unwrap();
        let img = decode_png(&out);
        assert_eq!(img.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        // Overlay-darkened fallback brown, not black
        let px = img.get_pixel(CANVAS_WIDTH / 2, 180).0;
        assert!(px[0] > 50, "expected fallback fill, got {px:?}");
    }

    #[tokio::test]
    async fn wrong_game_count_is_rejected() {
        let composer = Composer::new(ImageFetcher::new());
        let games = five_games()[..3].to_vec();
        let err = composer
            .compose(&games, &gradient_theme(), "p", false, &ImageCache::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ComposeError::GameCount(3)));
    }

    #[tokio::test]
    async fn flat_fallback_gradient_never_panics() {
        // A theme whose gradient failed to parse renders as a flat color
        let record = top5_core::theme::ThemeRecord {
            key: "broken".to_string(),
            name: "Broken".to_string(),
            kind: "gradient".to_string(),
            gradient: Some("linear-gradient(garbage".to_string()),
            image_url: None,
            text_color: "#ffffff".to_string(),
            secondary_color: "#cccccc".to_string(),
            accent_color: "#e94560".to_string(),
            overlay: None,
            sort_order: 0,
        };
        let theme = Theme::from_record(&record).unwrap();
        let composer = Composer::new(ImageFetcher::new());
        let out = composer
            .compose(&five_games(), &theme, "p", false, &ImageCache::new())
            .await
            .unwrap();
        assert_eq!(decode_png(&out).dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }
}
