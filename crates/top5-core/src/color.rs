/// An 8-bit RGBA color.
///
/// Theme configuration arrives as CSS color strings (`#rrggbb`,
/// `rgba(...)`); everything downstream works on parsed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS color: `#rgb`, `#rrggbb`, `rgb(r, g, b)` or
    /// `rgba(r, g, b, a)` with a 0.0–1.0 alpha component.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let inner = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let r = parts[0].parse::<f64>().ok()?;
        let g = parts[1].parse::<f64>().ok()?;
        let b = parts[2].parse::<f64>().ok()?;
        let a = match parts.get(3) {
            Some(p) => p.parse::<f64>().ok()?,
            None => 1.0,
        };
        if !(0.0..=255.0).contains(&r)
            || !(0.0..=255.0).contains(&g)
            || !(0.0..=255.0).contains(&b)
            || !(0.0..=1.0).contains(&a)
        {
            return None;
        }
        Some(Self {
            r: r.round() as u8,
            g: g.round() as u8,
            b: b.round() as u8,
            a: (a * 255.0).round() as u8,
        })
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        match hex.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, ch) in hex.chars().enumerate() {
                    let v = ch.to_digit(16)? as u8;
                    c[i] = v * 16 + v;
                }
                Some(Self::rgb(c[0], c[1], c[2]))
            },
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            },
            _ => None,
        }
    }

    /// Linear interpolation between two colors, `t` clamped to 0.0–1.0.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}
