use crate::color::Rgba;

/// Gradient orientation, derived from the CSS direction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    Vertical,
    Diagonal,
}

/// A parsed `linear-gradient(...)` description: orientation plus ordered,
/// evenly spaced color stops.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientSpec {
    pub direction: GradientDirection,
    pub stops: Vec<Rgba>,
}

impl GradientSpec {
    /// Parse a CSS `linear-gradient(direction, color, color, ...)` string.
    /// Returns `None` for anything malformed; callers fall back to a flat
    /// color.
    pub fn parse(css: &str) -> Option<Self> {
        let start = css.find("linear-gradient(")? + "linear-gradient(".len();
        let end = css[start..].find(')')? + start;
        let parts: Vec<&str> = css[start..end].split(',').map(str::trim).collect();
        if parts.len() < 3 {
            return None;
        }
        let direction = if parts[0].contains("bottom") {
            GradientDirection::Vertical
        } else if parts[0].contains("135deg") {
            GradientDirection::Diagonal
        } else {
            GradientDirection::Vertical
        };
        let stops: Option<Vec<Rgba>> = parts[1..].iter().map(|c| Rgba::parse(c)).collect();
        let stops = stops?;
        if stops.len() < 2 {
            return None;
        }
        Some(Self { direction, stops })
    }

    /// Color at position `t` in 0.0–1.0 along the gradient axis.
    pub fn color_at(&self, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let segments = (self.stops.len() - 1) as f32;
        let pos = t * segments;
        let i = (pos.floor() as usize).min(self.stops.len() - 2);
        self.stops[i].lerp(self.stops[i + 1], pos - i as f32)
    }
}

/// What fills the card background. The two kinds carry different payloads,
/// so a gradient theme can never also claim a background image.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Gradient(GradientSpec),
    Photo {
        image_url: String,
        /// Translucent wash drawn over the photo for text legibility.
        overlay: Option<Rgba>,
    },
}

/// A named visual theme. Loaded once per session; immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub key: String,
    pub name: String,
    pub background: Background,
    pub text_color: Rgba,
    pub secondary_color: Rgba,
    pub accent_color: Rgba,
}

/// A raw theme row as fetched from the remote config table, before
/// validation. `image_url` is already resolved to a full public URL.
#[derive(Debug, Clone, Default)]
pub struct ThemeRecord {
    pub key: String,
    pub name: String,
    pub kind: String,
    pub gradient: Option<String>,
    pub image_url: Option<String>,
    pub text_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub overlay: Option<String>,
    pub sort_order: i64,
}

impl Theme {
    /// Validate a fetched record into a theme. Gradient records keep their
    /// parsed spec; a gradient that fails to parse still yields a theme
    /// (the composer falls back to a flat color), but colors must parse.
    pub fn from_record(record: &ThemeRecord) -> Option<Self> {
        let text_color = Rgba::parse(&record.text_color)?;
        let secondary_color = Rgba::parse(&record.secondary_color)?;
        let accent_color = Rgba::parse(&record.accent_color)?;
        let background = match record.kind.as_str() {
            "image" => Background::Photo {
                image_url: record.image_url.clone()?,
                overlay: record.overlay.as_deref().and_then(Rgba::parse),
            },
            "gradient" => {
                let spec = record.gradient.as_deref().and_then(GradientSpec::parse);
                Background::Gradient(spec.unwrap_or_else(fallback_gradient))
            },
            _ => return None,
        };
        Some(Self {
            key: record.key.clone(),
            name: record.name.clone(),
            background,
            text_color,
            secondary_color,
            accent_color,
        })
    }

    pub fn is_photo(&self) -> bool {
        matches!(self.background, Background::Photo { .. })
    }
}

/// Flat dark color used when a gradient description cannot be parsed.
fn fallback_gradient() -> GradientSpec {
    GradientSpec {
        direction: GradientDirection::Vertical,
        stops: vec![Rgba::rgb(0x1a, 0x1a, 0x2e), Rgba::rgb(0x1a, 0x1a, 0x2e)],
    }
}

/// The resolved set of themes for a session, in display order:
/// photographic themes first, gradients last, each by explicit sort order.
#[derive(Debug, Clone)]
pub struct ThemeSet {
    themes: Vec<Theme>,
}

impl ThemeSet {
    /// Build from fetched records: invalid records are skipped, the rest
    /// ordered gradient-kind-last then by sort order. Returns `None` when
    /// nothing valid remains (callers keep the fallback set).
    pub fn from_records(records: &[ThemeRecord]) -> Option<Self> {
        let mut ordered: Vec<(&ThemeRecord, Theme)> = records
            .iter()
            .filter_map(|r| Theme::from_record(r).map(|t| (r, t)))
            .collect();
        if ordered.is_empty() {
            return None;
        }
        ordered.sort_by_key(|(r, t)| (if t.is_photo() { 0 } else { 1 }, r.sort_order));
        Some(Self {
            themes: ordered.into_iter().map(|(_, t)| t).collect(),
        })
    }

    /// The built-in gradient themes used when remote config is
    /// unavailable.
    pub fn fallback() -> Self {
        let gradient = |css: &str| {
            Background::Gradient(GradientSpec::parse(css).unwrap_or_else(fallback_gradient))
        };
        let white = Rgba::rgb(255, 255, 255);
        Self {
            themes: vec![
                Theme {
                    key: "midnight".to_string(),
                    name: "Midnight".to_string(),
                    background: gradient(
                        "linear-gradient(to bottom, #1a1a2e, #16213e, #0f3460)",
                    ),
                    text_color: white,
                    secondary_color: Rgba::rgba(255, 255, 255, 179),
                    accent_color: Rgba::rgb(0xe9, 0x45, 0x60),
                },
                Theme {
                    key: "sunset".to_string(),
                    name: "Sunset".to_string(),
                    background: gradient(
                        "linear-gradient(to bottom, #ff6b6b, #feca57, #ff9ff3)",
                    ),
                    text_color: white,
                    secondary_color: Rgba::rgba(255, 255, 255, 204),
                    accent_color: white,
                },
                Theme {
                    key: "ocean".to_string(),
                    name: "Ocean".to_string(),
                    background: gradient("linear-gradient(to bottom, #667eea, #764ba2)"),
                    text_color: white,
                    secondary_color: Rgba::rgba(255, 255, 255, 179),
                    accent_color: Rgba::rgb(0xff, 0xea, 0xa7),
                },
                Theme {
                    key: "forest".to_string(),
                    name: "Forest".to_string(),
                    background: gradient("linear-gradient(to bottom, #134e5e, #71b280)"),
                    text_color: white,
                    secondary_color: Rgba::rgba(255, 255, 255, 179),
                    accent_color: Rgba::rgb(0xf9, 0xca, 0x24),
                },
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.key == key)
    }

    pub fn first_key(&self) -> Option<&str> {
        self.themes.first().map(|t| t.key.as_str())
    }

    /// The key to use given the current selection: unchanged when still
    /// present, otherwise the first available key.
    pub fn selected_or_first<'a>(&'a self, current: &'a str) -> Option<&'a str> {
        if self.get(current).is_some() {
            Some(current)
        } else {
            self.first_key()
        }
    }
}
