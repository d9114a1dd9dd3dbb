//! RGBA/HSLA color values.
//!
//! Ported from the teacher's `ColorValue` hex/named-color parsing
//! (`crates/koala-css/src/style/values.rs`), extended with an HSL channel
//! view and the small math helpers `lighten`/`darken`/`saturate`/`mix`
//! that spec §3 lists as part of the value system.

/// A color stored as 8-bit RGB channels plus a 0.0-1.0 alpha, the same
/// representation the teacher's `ColorValue` used. HSL channels are
/// derived on demand rather than stored redundantly.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SassColor {
    /// Red channel, 0-255.
    pub r: u8,
    /// Green channel, 0-255.
    pub g: u8,
    /// Blue channel, 0-255.
    pub b: u8,
    /// Alpha channel, 0.0 (transparent) to 1.0 (opaque).
    pub a: f64,
}

impl SassColor {
    /// An opaque color from 8-bit channels.
    #[must_use]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// A color from 8-bit channels and an explicit alpha, clamped to
    /// `[0, 1]`.
    #[must_use]
    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Parse a `#rgb`, `#rgba`, `#rrggbb`, or `#rrggbbaa` hex literal.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let expand = |c: char| u8::from_str_radix(&c.to_string().repeat(2), 16).ok();
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut chars = hex.chars();
                let r = expand(chars.next()?)?;
                let g = expand(chars.next()?)?;
                let b = expand(chars.next()?)?;
                Some(Self::rgb(r, g, b))
            }
            4 => {
                let mut chars = hex.chars();
                let r = expand(chars.next()?)?;
                let g = expand(chars.next()?)?;
                let b = expand(chars.next()?)?;
                let a = expand(chars.next()?)?;
                Some(Self::rgba(r, g, b, f64::from(a) / 255.0))
            }
            6 => Some(Self::rgb(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?)),
            8 => Some(Self::rgba(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                f64::from(byte(&hex[6..8])?) / 255.0,
            )),
            _ => None,
        }
    }

    /// Build from HSL(A) channels: `h` in degrees, `s`/`l`/`a` in `[0, 1]`.
    #[must_use]
    pub fn from_hsla(h: f64, s: f64, l: f64, a: f64) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Self::rgba(v, v, v, a);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let to_channel = |t: f64| {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round() as u8
        };
        Self::rgba(to_channel(h + 1.0 / 3.0), to_channel(h), to_channel(h - 1.0 / 3.0), a)
    }

    /// This color's `(hue, saturation, lightness)` in degrees/`[0,1]`/`[0,1]`.
    #[must_use]
    pub fn to_hsl(self) -> (f64, f64, f64) {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        if (max - min).abs() < f64::EPSILON {
            return (0.0, 0.0, l);
        }
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if (max - r).abs() < f64::EPSILON {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h * 60.0, s, l)
    }

    /// Named CSS colors recognized by `name-to-color`. A deliberately small
    /// subset (kept from the teacher's table, which also only covered the
    /// common set, not the full ~148-entry CSS keyword list).
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Some(match lower.as_str() {
            "black" => Self::rgb(0, 0, 0),
            "white" => Self::rgb(255, 255, 255),
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "transparent" => Self::rgba(0, 0, 0, 0.0),
            _ => return None,
        })
    }

    /// Shortest valid CSS rendering: `#rgb`/`#rrggbb` when opaque,
    /// `rgba(...)` otherwise.
    #[must_use]
    pub fn to_css_string(self) -> String {
        if (self.a - 1.0).abs() < f64::EPSILON {
            let (r, g, b) = (self.r, self.g, self.b);
            if is_hex_shorthand(r) && is_hex_shorthand(g) && is_hex_shorthand(b) {
                format!("#{:x}{:x}{:x}", r & 0xf, g & 0xf, b & 0xf)
            } else {
                format!("#{r:02x}{g:02x}{b:02x}")
            }
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, crate::value::format_number(self.a))
        }
    }

    /// Mix this color with `other` in proportion `weight` (0.0 = all
    /// `other`, 1.0 = all `self`), matching `mix($color1, $color2, $weight)`.
    #[must_use]
    pub fn mix(self, other: Self, weight: f64) -> Self {
        let weight = weight.clamp(0.0, 1.0);
        let alpha_diff = self.a - other.a;
        let w1 = if (alpha_diff).abs() < f64::EPSILON {
            weight
        } else {
            let scaled = weight * 2.0 - 1.0;
            let combined = scaled * alpha_diff;
            ((scaled + alpha_diff) / (1.0 + combined) + 1.0) / 2.0
        };
        let w2 = 1.0 - w1;
        let lerp_u8 = |a: u8, b: u8| (f64::from(a) * w1 + f64::from(b) * w2).round() as u8;
        Self::rgba(
            lerp_u8(self.r, other.r),
            lerp_u8(self.g, other.g),
            lerp_u8(self.b, other.b),
            self.a * weight + other.a * (1.0 - weight),
        )
    }

    /// Lighten by `amount` (0.0-1.0) of lightness.
    #[must_use]
    pub fn lighten(self, amount: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsla(h, s, (l + amount).clamp(0.0, 1.0), self.a)
    }

    /// Darken by `amount` (0.0-1.0) of lightness.
    #[must_use]
    pub fn darken(self, amount: f64) -> Self {
        self.lighten(-amount)
    }

    /// Increase saturation by `amount` (0.0-1.0).
    #[must_use]
    pub fn saturate(self, amount: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsla(h, (s + amount).clamp(0.0, 1.0), l, self.a)
    }

    /// Decrease saturation by `amount` (0.0-1.0).
    #[must_use]
    pub fn desaturate(self, amount: f64) -> Self {
        self.saturate(-amount)
    }

    /// Fully desaturated version of this color.
    #[must_use]
    pub fn grayscale(self) -> Self {
        self.desaturate(1.0)
    }

    /// Rotate hue by `degrees`.
    #[must_use]
    pub fn adjust_hue(self, degrees: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsla(h + degrees, s, l, self.a)
    }

    /// RGB-complement: hue rotated 180 degrees.
    #[must_use]
    pub fn complement(self) -> Self {
        self.adjust_hue(180.0)
    }

    /// Channel-wise 255-inversion, alpha unchanged.
    #[must_use]
    pub fn invert(self, weight: f64) -> Self {
        let inverted = Self::rgba(255 - self.r, 255 - self.g, 255 - self.b, self.a);
        self.mix(inverted, 1.0 - weight)
    }

    /// Alpha shifted by `amount`, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_alpha_delta(self, amount: f64) -> Self {
        Self::rgba(self.r, self.g, self.b, self.a + amount)
    }
}

fn is_hex_shorthand(channel: u8) -> bool {
    channel & 0xf0 == (channel & 0xf) << 4
}

#[cfg(test)]
mod tests {
    use super::SassColor;

    #[test]
    fn test_from_hex_three_digit_expands() {
        let c = SassColor::from_hex("#abc").unwrap();
        assert_eq!((c.r, c.g, c.b), (0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn test_from_hex_six_digit() {
        let c = SassColor::from_hex("#336699").unwrap();
        assert_eq!((c.r, c.g, c.b), (0x33, 0x66, 0x99));
    }

    #[test]
    fn test_to_css_string_shorthand() {
        let c = SassColor::rgb(0x11, 0x22, 0x33);
        assert_eq!(c.to_css_string(), "#123");
    }

    #[test]
    fn test_lighten_increases_lightness() {
        let c = SassColor::rgb(51, 51, 51);
        let (_, _, l0) = c.to_hsl();
        let (_, _, l1) = c.lighten(0.2).to_hsl();
        assert!(l1 > l0);
    }

    #[test]
    fn test_mix_halfway_is_average() {
        let black = SassColor::rgb(0, 0, 0);
        let white = SassColor::rgb(255, 255, 255);
        let mid = black.mix(white, 0.5);
        assert_eq!(mid.r, 128);
    }

    #[test]
    fn test_complement_is_double_hue_rotation_of_adjust_hue() {
        let c = SassColor::rgb(200, 50, 50);
        assert_eq!(c.complement().to_hsl().0, c.adjust_hue(180.0).to_hsl().0);
    }
}
