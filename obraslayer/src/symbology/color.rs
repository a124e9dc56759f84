//! RGBA color type

use std::fmt;

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in 0.0..=1.0
    pub a: f64,
}

impl Color {
    /// Opaque color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parses `#rgb` or `#rrggbb` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match digits.len() {
            3 => {
                let mut chars = digits.chars();
                let mut next = || {
                    let c = chars.next()?;
                    channel(&format!("{c}{c}"))
                };
                Some(Self::rgb(next()?, next()?, next()?))
            }
            6 => Some(Self::rgb(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
            )),
            _ => None,
        }
    }

    /// Returns the same color with a different alpha, clamped to 0..=1.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Raises the dominant channel by 20 and lowers the other two by 10.
    ///
    /// Ties go to the first channel in r, g, b order.
    pub fn saturate(self) -> Self {
        let channels = [self.r, self.g, self.b];
        let dominant = (0..3)
            .max_by(|&a, &b| channels[a].cmp(&channels[b]).then(b.cmp(&a)))
            .unwrap_or(0);

        let shifted: Vec<u8> = channels
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if i == dominant {
                    c.saturating_add(20)
                } else {
                    c.saturating_sub(10)
                }
            })
            .collect();

        Self {
            r: shifted[0],
            g: shifted[1],
            b: shifted[2],
            a: self.a,
        }
    }
}

impl fmt::Display for Color {
    /// CSS notation: `#rrggbb` when opaque, `rgba(...)` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            f.write_str(&self.to_hex())
        } else {
            write!(f, "rgba({}, {}, {}, {:.2})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Default layer color.
pub const DEFAULT_LAYER_COLOR: Color = Color::rgb(0x33, 0x88, 0xff);

/// Fill used by choropleth layers for zero values or an all-zero layer.
pub const NEUTRAL_COLOR: Color = Color {
    r: 224,
    g: 224,
    b: 224,
    a: 0.5,
};

/// Palette for categorical layers, indexed by first-seen order.
pub const DEFAULT_PALETTE: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!(Color::from_hex("#3388ff"), Some(Color::rgb(0x33, 0x88, 0xff)));
        assert_eq!(Color::from_hex("38f"), Some(Color::rgb(0x33, 0x88, 0xff)));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
        assert_eq!(
            Color::rgb(255, 0, 16).with_alpha(0.25).to_string(),
            "rgba(255, 0, 16, 0.25)"
        );
    }

    #[test]
    fn test_saturate_shifts_dominant_channel() {
        let boosted = Color::rgb(200, 100, 50).saturate();
        assert_eq!((boosted.r, boosted.g, boosted.b), (220, 90, 40));
    }

    #[test]
    fn test_saturate_clamps() {
        let boosted = Color::rgb(5, 250, 0).saturate();
        assert_eq!((boosted.r, boosted.g, boosted.b), (0, 255, 0));
    }

    #[test]
    fn test_saturate_tie_prefers_red() {
        let boosted = Color::rgb(100, 100, 100).saturate();
        assert_eq!((boosted.r, boosted.g, boosted.b), (120, 90, 90));
    }
}
