//! Color types and named gradients.
//!
//! Bars are filled along a sequential gradient (light for small shares, dark
//! for large ones); label tones are picked against that fill.
//!
//! # References
//!
//! - W3C (2008). "Web Content Accessibility Guidelines 2.0", relative luminance
//!   and contrast ratio definitions.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f32::from(self.r) * inv_t + f32::from(other.r) * t).round() as u8,
            (f32::from(self.g) * inv_t + f32::from(other.g) * t).round() as u8,
            (f32::from(self.b) * inv_t + f32::from(other.b) * t).round() as u8,
            (f32::from(self.a) * inv_t + f32::from(other.a) * t).round() as u8,
        )
    }

    /// WCAG relative luminance in `[0, 1]`.
    #[must_use]
    pub fn relative_luminance(self) -> f32 {
        fn channel(c: u8) -> f32 {
            let c = f32::from(c) / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// WCAG contrast ratio against another color, in `[1, 21]`.
    #[must_use]
    pub fn contrast_ratio(self, other: Self) -> f32 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        let (hi, lo) = if a > b { (a, b) } else { (b, a) };
        (hi + 0.05) / (lo + 0.05)
    }

    /// CSS color string (`rgb(..)` or `rgba(..)`).
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, f32::from(self.a) / 255.0)
        }
    }
}

/// Named sequential gradient used to fill bars by their share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Gradient {
    /// Magma (light yellow to near black).
    #[default]
    Magma,
    /// Viridis (yellow to deep purple).
    Viridis,
    /// Sequential blues.
    Blues,
    /// Greyscale.
    Greys,
}

impl Gradient {
    /// Color stops ordered from light (small share) to dark (large share).
    #[must_use]
    pub fn stops(self) -> &'static [Rgba] {
        const MAGMA: [Rgba; 5] = [
            Rgba::rgb(252, 253, 191),
            Rgba::rgb(252, 137, 97),
            Rgba::rgb(183, 55, 121),
            Rgba::rgb(81, 18, 124),
            Rgba::rgb(0, 0, 4),
        ];
        const VIRIDIS: [Rgba; 5] = [
            Rgba::rgb(253, 231, 37),
            Rgba::rgb(94, 201, 98),
            Rgba::rgb(33, 145, 140),
            Rgba::rgb(59, 82, 139),
            Rgba::rgb(68, 1, 84),
        ];
        const BLUES: [Rgba; 5] = [
            Rgba::rgb(247, 251, 255),
            Rgba::rgb(198, 219, 239),
            Rgba::rgb(107, 174, 214),
            Rgba::rgb(33, 113, 181),
            Rgba::rgb(8, 48, 107),
        ];
        const GREYS: [Rgba; 2] = [Rgba::rgb(230, 230, 230), Rgba::rgb(40, 40, 40)];

        match self {
            Gradient::Magma => &MAGMA,
            Gradient::Viridis => &VIRIDIS,
            Gradient::Blues => &BLUES,
            Gradient::Greys => &GREYS,
        }
    }

    /// Sample the gradient at `t` in `[0, 1]`.
    ///
    /// The extremes are pulled inwards so that no bar is drawn in the
    /// near-white or near-black end of a scheme.
    #[must_use]
    pub fn at(self, t: f32) -> Rgba {
        let stops = self.stops();
        let t = 0.15 + 0.7 * if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (stops.len() - 1) as f32;
        let idx = (scaled.floor() as usize).min(stops.len() - 2);
        stops[idx].lerp(stops[idx + 1], scaled - idx as f32)
    }
}
