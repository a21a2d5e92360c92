use crate::foundation::error::{TraceryError, TraceryResult};

/// Straight (non-premultiplied) RGBA8 color, parsed from a scene color string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (straight).
    pub a: u8,
}

impl Color {
    /// Build a color from straight RGBA8 channels.
    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black: the value both paint channels reset to when a
    /// node carries no color for them.
    pub const TRANSPARENT: Self = Self::rgba8(0, 0, 0, 0);

    /// Whether drawing with this color has no effect.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Parse a scene color string.
    ///
    /// Accepted forms: `transparent` / `none`, a small named set, hex
    /// (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb(r, g, b)` /
    /// `rgba(r, g, b, a)` with 0–255 channels and 0–1 alpha, and
    /// `hsl(h, s%, l%)` / `hsla(h, s%, l%, a)`.
    pub fn parse(s: &str) -> TraceryResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TraceryError::validation("empty color string"));
        }

        if let Some(c) = parse_named(s) {
            return Ok(c);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = strip_func(s, "rgba").or_else(|| strip_func(s, "rgb")) {
            return parse_rgb_args(args);
        }
        if let Some(args) = strip_func(s, "hsla").or_else(|| strip_func(s, "hsl")) {
            return parse_hsl_args(args);
        }

        Err(TraceryError::validation(format!(
            "unrecognized color \"{s}\""
        )))
    }
}

fn parse_named(s: &str) -> Option<Color> {
    let c = match s.to_ascii_lowercase().as_str() {
        "transparent" | "none" => Color::TRANSPARENT,
        "black" => Color::rgba8(0, 0, 0, 255),
        "white" => Color::rgba8(255, 255, 255, 255),
        "red" => Color::rgba8(255, 0, 0, 255),
        "green" => Color::rgba8(0, 128, 0, 255),
        "lime" => Color::rgba8(0, 255, 0, 255),
        "blue" => Color::rgba8(0, 0, 255, 255),
        "yellow" => Color::rgba8(255, 255, 0, 255),
        "cyan" => Color::rgba8(0, 255, 255, 255),
        "magenta" => Color::rgba8(255, 0, 255, 255),
        "orange" => Color::rgba8(255, 165, 0, 255),
        "purple" => Color::rgba8(128, 0, 128, 255),
        "pink" => Color::rgba8(255, 192, 203, 255),
        "gray" | "grey" => Color::rgba8(128, 128, 128, 255),
        _ => return None,
    };
    Some(c)
}

fn parse_hex(s: &str) -> TraceryResult<Color> {
    fn hex_byte(pair: &str) -> TraceryResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| TraceryError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    fn hex_nibble(ch: &str) -> TraceryResult<u8> {
        // #rgb shorthand doubles each digit.
        let v = u8::from_str_radix(ch, 16)
            .map_err(|_| TraceryError::validation(format!("invalid hex digit \"{ch}\"")))?;
        Ok(v << 4 | v)
    }

    let (r, g, b, a) = match s.len() {
        3 => (
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
            255,
        ),
        4 => (
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
            hex_nibble(&s[3..4])?,
        ),
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err(TraceryError::validation(
                "hex color must have 3, 4, 6 or 8 digits",
            ));
        }
    };
    Ok(Color::rgba8(r, g, b, a))
}

fn strip_func<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(name)?.trim_start();
    let inner = rest.strip_prefix('(')?;
    inner.trim_end().strip_suffix(')')
}

fn split_args(args: &str) -> Vec<&str> {
    args.split(',').map(str::trim).collect()
}

fn parse_rgb_args(args: &str) -> TraceryResult<Color> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return Err(TraceryError::validation(
            "rgb()/rgba() expects 3 or 4 arguments",
        ));
    }

    fn channel(s: &str) -> TraceryResult<u8> {
        let v: f64 = s
            .parse()
            .map_err(|_| TraceryError::validation(format!("invalid rgb channel \"{s}\"")))?;
        Ok(v.clamp(0.0, 255.0).round() as u8)
    }

    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = if parts.len() == 4 {
        alpha_byte(parts[3])?
    } else {
        255
    };
    Ok(Color::rgba8(r, g, b, a))
}

fn parse_hsl_args(args: &str) -> TraceryResult<Color> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return Err(TraceryError::validation(
            "hsl()/hsla() expects 3 or 4 arguments",
        ));
    }

    fn number(s: &str) -> TraceryResult<f64> {
        s.trim_end_matches('%')
            .trim()
            .parse()
            .map_err(|_| TraceryError::validation(format!("invalid hsl component \"{s}\"")))
    }

    let h = number(parts[0])?;
    let s = number(parts[1])? / 100.0;
    let l = number(parts[2])? / 100.0;
    let a = if parts.len() == 4 {
        alpha_byte(parts[3])?
    } else {
        255
    };
    Ok(hsl_to_rgb(h, s, l, a))
}

fn alpha_byte(s: &str) -> TraceryResult<u8> {
    let v: f64 = s
        .trim_end_matches('%')
        .parse()
        .map_err(|_| TraceryError::validation(format!("invalid alpha \"{s}\"")))?;
    let v = if s.ends_with('%') { v / 100.0 } else { v };
    Ok((v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64, a: u8) -> Color {
    // Standard HSL -> RGB conversion (sRGB space, normalized 0..1 inputs).
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    fn to_u8(x: f64) -> u8 {
        (x.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    if s == 0.0 {
        let v = to_u8(l);
        return Color::rgba8(v, v, v, a);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    Color::rgba8(
        to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_rgb(p, q, h)),
        to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        a,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse("#ff0000").unwrap(), Color::rgba8(255, 0, 0, 255));
        assert_eq!(Color::parse("#f00").unwrap(), Color::rgba8(255, 0, 0, 255));
        assert_eq!(
            Color::parse("#0000ff80").unwrap(),
            Color::rgba8(0, 0, 255, 128)
        );
        assert_eq!(Color::parse("#f008").unwrap(), Color::rgba8(255, 0, 0, 136));
        assert!(Color::parse("#f0").is_err());
    }

    #[test]
    fn parses_rgb_functional_forms() {
        assert_eq!(
            Color::parse("rgb(255, 165, 0)").unwrap(),
            Color::rgba8(255, 165, 0, 255)
        );
        assert_eq!(
            Color::parse("rgba(0, 0, 0, 0.5)").unwrap(),
            Color::rgba8(0, 0, 0, 128)
        );
        assert!(Color::parse("rgb(1, 2)").is_err());
    }

    #[test]
    fn parses_hsl_functional_forms() {
        // Pure red.
        assert_eq!(
            Color::parse("hsl(0, 100%, 50%)").unwrap(),
            Color::rgba8(255, 0, 0, 255)
        );
        // Achromatic gray.
        assert_eq!(
            Color::parse("hsl(123, 0%, 50%)").unwrap(),
            Color::rgba8(128, 128, 128, 255)
        );
        // Alpha variant.
        let c = Color::parse("hsla(200, 50%, 50%, 0.2)").unwrap();
        assert_eq!(c.a, 51);
        // Hue wraps.
        assert_eq!(
            Color::parse("hsl(360, 100%, 50%)").unwrap(),
            Color::parse("hsl(0, 100%, 50%)").unwrap()
        );
    }

    #[test]
    fn parses_named_and_transparent() {
        assert_eq!(Color::parse("red").unwrap(), Color::rgba8(255, 0, 0, 255));
        assert_eq!(Color::parse("RED").unwrap(), Color::rgba8(255, 0, 0, 255));
        assert!(Color::parse("transparent").unwrap().is_transparent());
        assert!(Color::parse("none").unwrap().is_transparent());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Color::parse("").is_err());
        assert!(Color::parse("notacolor").is_err());
        assert!(Color::parse("hsl(a, b%, c%)").is_err());
    }
}
