//! Procedural gradient textures
//!
//! Gradient pickups are drawn as a disc filled with a top-to-bottom linear
//! gradient and outlined with a faint ring in the first stop's colour.

use glam::Vec4;

/// Alpha of the outline ring (0x33)
const OUTLINE_ALPHA: u8 = 0x33;

/// An sRGB colour with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (leading `#` optional)
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => Some(Self([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
            4 => Some(Self([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
            6 => Some(Self([byte(0)?, byte(2)?, byte(4)?, 255])),
            8 => Some(Self([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => None,
        }
    }

    /// Packed `0xRRGGBB`, the form fill colours take
    pub fn to_rgb_number(self) -> u32 {
        let [r, g, b, _] = self.0;
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    pub fn with_alpha(self, alpha: u8) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    fn to_vec4(self) -> Vec4 {
        Vec4::from_array(self.0.map(|c| c as f32 / 255.0))
    }

    fn from_vec4(v: Vec4) -> Self {
        let c = v.clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
        Self([
            c.x.round() as u8,
            c.y.round() as u8,
            c.z.round() as u8,
            c.w.round() as u8,
        ])
    }

    /// Source-over compositing of `self` onto `dst`
    fn over(self, dst: Self) -> Self {
        let src = self.to_vec4();
        let dst = dst.to_vec4();
        let out_a = src.w + dst.w * (1.0 - src.w);
        if out_a <= 0.0 {
            return Self::TRANSPARENT;
        }
        let rgb = (src.truncate() * src.w + dst.truncate() * dst.w * (1.0 - src.w)) / out_a;
        Self::from_vec4(rgb.extend(out_a))
    }
}

/// An off-screen RGBA texture, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct GradientTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba>,
}

impl GradientTexture {
    /// Render a circular swatch; `stops` needs at least two colours
    pub fn render(stops: &[Rgba], width: u32, height: u32) -> Self {
        let mut pixels = vec![Rgba::TRANSPARENT; (width * height) as usize];
        if stops.len() < 2 || width == 0 || height == 0 {
            return Self {
                width,
                height,
                pixels,
            };
        }

        let center = glam::Vec2::new(width as f32 / 2.0, height as f32 / 2.0);
        let radius = width as f32 / 2.0;
        let outline = stops[0].with_alpha(OUTLINE_ALPHA);

        for y in 0..height {
            let t = (y as f32 + 0.5) / height as f32;
            let fill = sample_stops(stops, t);
            for x in 0..width {
                let p = glam::Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let dist = p.distance(center);
                let mut px = Rgba::TRANSPARENT;
                if dist <= radius {
                    px = fill;
                }
                // One pixel wide stroke centred on the rim
                if (dist - radius).abs() <= 0.5 {
                    px = outline.over(px);
                }
                pixels[(y * width + x) as usize] = px;
            }
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Flat RGBA bytes, ready for an `ImageData` upload
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.0).collect()
    }
}

/// Colour at `t` in [0, 1] along evenly spaced stops
fn sample_stops(stops: &[Rgba], t: f32) -> Rgba {
    let span = (stops.len() - 1) as f32;
    let pos = t.clamp(0.0, 1.0) * span;
    let i = (pos.floor() as usize).min(stops.len() - 2);
    let local = pos - i as f32;
    Rgba::from_vec4(stops[i].to_vec4().lerp(stops[i + 1].to_vec4(), local))
}
