//! CSS-style color parsing for export backends.

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)`,
    /// `transparent` and a few named colors.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(args);
        }
        match s.as_str() {
            "transparent" => Some(Self { a: 0, ..Self::BLACK }),
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::rgb(255, 0, 0)),
            "green" => Some(Self::rgb(0, 128, 0)),
            "blue" => Some(Self::rgb(0, 0, 255)),
            "gray" | "grey" => Some(Self::rgb(128, 128, 128)),
            _ => None,
        }
    }

    /// Parse or fall back.
    #[must_use]
    pub fn parse_or(input: &str, fallback: Self) -> Self {
        Self::parse(input).unwrap_or(fallback)
    }

    /// `RRGGBB` without the hash, as used by `DrawingML` `srgbClr`.
    #[must_use]
    pub fn hex6(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `#rrggbb` for SVG paint attributes.
    #[must_use]
    pub fn svg(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha in 0..=1.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Whether fully transparent.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..=i)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17)),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba {
            a: byte(6)?,
            ..Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)
        }),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_functional(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let (r, g, b) = (
        channel(parts.first().copied()?)?,
        channel(parts.get(1).copied()?)?,
        channel(parts.get(2).copied()?)?,
    );
    let a = match parts.get(3) {
        Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };
    Some(Rgba { r, g, b, a })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::parse("#3B82F6").map(|c| c.hex6()), Some("3B82F6".into()));
        assert_eq!(Rgba::parse("#00000080").map(|c| c.a), Some(128));
        assert_eq!(Rgba::parse("#12"), None);
    }

    #[test]
    fn test_functional_and_named() {
        assert_eq!(
            Rgba::parse("rgba(255, 0, 0, 0.5)"),
            Some(Rgba { r: 255, g: 0, b: 0, a: 128 })
        );
        assert_eq!(Rgba::parse("rgb(1,2,3)"), Some(Rgba::rgb(1, 2, 3)));
        assert!(Rgba::parse("transparent").is_some_and(|c| c.is_transparent()));
        assert_eq!(Rgba::parse_or("nope", Rgba::BLACK), Rgba::BLACK);
    }
}
