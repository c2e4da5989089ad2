use std::fmt;

/// An sRGB color with 8 bit channels and a normalized alpha value.
///
/// The alpha value is always kept inside `[0, 1]`.
#[derive(Clone, Copy, PartialEq)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const CYAN: Self = Self::rgb(0, 255, 255);

    /// Fully transparent black, the background of a cleared buffer
    pub const TRANSPARENT: Self = Self {
        red: 0,
        green: 0,
        blue: 0,
        alpha: 0.,
    };

    #[inline]
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.,
        }
    }

    #[inline]
    #[must_use]
    pub fn rgba(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: clamp_alpha(alpha),
        }
    }

    /// Look up one of the named colors
    ///
    /// Names are matched case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "yellow" => Self::YELLOW,
            "magenta" => Self::MAGENTA,
            "cyan" => Self::CYAN,
            _ => return None,
        };
        Some(color)
    }

    #[inline]
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    #[inline]
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    #[inline]
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    #[inline]
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    #[inline]
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = clamp_alpha(alpha);
    }

    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.set_alpha(alpha);
        self
    }

    /// Channel-wise multiplication, as used to tint a texture with a shape color
    ///
    /// The alpha values are multiplied as well.
    #[must_use]
    pub fn multiply(&self, other: Self) -> Self {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16 + 127) / 255) as u8;
        Self::rgba(
            mul(self.red, other.red),
            mul(self.green, other.green),
            mul(self.blue, other.blue),
            self.alpha * other.alpha,
        )
    }

    /// Draw `source` on top of `self` using alpha-over compositing
    ///
    /// Both colors and the result are straight (not premultiplied) colors:
    /// `out.a = a + dst.a * (1 - a)` and
    /// `out.rgb = (src * a + dst * dst.a * (1 - a)) / out.a`.
    #[must_use]
    pub fn blend_over(&self, source: Self) -> Self {
        let opacity = source.alpha;
        if opacity >= 1. {
            return source;
        }
        if opacity <= 0. {
            return *self;
        }

        let background = self.alpha * (1. - opacity);
        let alpha = opacity + background;
        let mix = |src: u8, dst: u8| {
            ((src as f32).mul_add(opacity, dst as f32 * background) / alpha)
                .round()
                .clamp(0., 255.) as u8
        };

        Self::rgba(
            mix(source.red, self.red),
            mix(source.green, self.green),
            mix(source.blue, self.blue),
            alpha,
        )
    }

    /// The channels multiplied by alpha, which is how a LED displays a translucent color
    #[must_use]
    pub fn premultiplied(&self) -> [u8; 3] {
        let scale = |channel: u8| (channel as f32 * self.alpha).round() as u8;
        [scale(self.red), scale(self.green), scale(self.blue)]
    }

    /// Scale the (opaque) channels by a brightness level where `255` means full brightness
    #[must_use]
    pub fn scaled(channels: [u8; 3], level: u8) -> [u8; 3] {
        channels.map(|channel| ((channel as u16 * level as u16 + 127) / 255) as u8)
    }
}

fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        0.
    } else {
        alpha.clamp(0., 1.)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[u8; 3]> for Color {
    fn from(value: [u8; 3]) -> Self {
        Self::rgb(value[0], value[1], value[2])
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Color::rgba(1, 2, 3, 1.5).alpha(), 1.);
        assert_eq!(Color::rgba(1, 2, 3, -0.5).alpha(), 0.);
        assert_eq!(Color::rgba(1, 2, 3, f32::NAN).alpha(), 0.);
    }

    #[test]
    fn named_colors() {
        assert_eq!(Color::from_name("Magenta"), Some(Color::MAGENTA));
        assert_eq!(Color::from_name("white"), Some(Color::WHITE));
        assert_eq!(Color::from_name("purple"), None);
    }

    #[test]
    fn blend_half_transparent() {
        let dst = Color::rgb(0, 0, 200);
        let src = Color::rgba(200, 0, 0, 0.5);
        let out = dst.blend_over(src);
        assert_eq!((out.red(), out.green(), out.blue()), (100, 0, 100));
        assert_eq!(out.alpha(), 1.);
    }

    #[test]
    fn blend_onto_transparent_background() {
        let out = Color::TRANSPARENT.blend_over(Color::rgba(255, 255, 255, 0.25));
        assert_eq!(out.alpha(), 0.25);

        // The channels stay unscaled, alpha is applied once on output
        assert_eq!((out.red(), out.green(), out.blue()), (255, 255, 255));
        assert_eq!(out.premultiplied(), [64, 64, 64]);
    }

    #[test]
    fn blend_onto_translucent_background() {
        let dst = Color::rgba(0, 0, 255, 0.5);
        let out = dst.blend_over(Color::rgba(255, 0, 0, 0.5));

        assert_eq!(out.alpha(), 0.75);
        assert_eq!((out.red(), out.green(), out.blue()), (170, 0, 85));
    }

    #[test]
    fn opaque_source_replaces_destination() {
        assert_eq!(Color::WHITE.blend_over(Color::RED), Color::RED);
    }

    #[test]
    fn multiply_tints() {
        let tinted = Color::rgb(255, 128, 0).multiply(Color::rgb(255, 255, 255));
        assert_eq!(tinted, Color::rgb(255, 128, 0));
        assert_eq!(Color::WHITE.multiply(Color::BLACK), Color::BLACK);
    }

    #[test]
    fn premultiply_and_scale() {
        assert_eq!(Color::rgba(200, 100, 0, 0.5).premultiplied(), [100, 50, 0]);
        assert_eq!(Color::scaled([255, 100, 0], 0), [0, 0, 0]);
        assert_eq!(Color::scaled([255, 100, 0], 255), [255, 100, 0]);
    }
}
