//! Sentiment to color/atmosphere mapping.
//!
//! `map` is a pure function of [`SceneParameters`]: three base palettes keyed
//! by class, brightened or darkened for `high_intensity`, and scaled by the
//! score magnitude. Every output color is clamped.

use crate::color::Rgb;
use crate::params::{SceneParameters, SentimentClass};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Atmosphere {
    pub fog_density: f32,
    pub fog_color: Rgb,
    pub ambient_light: f32,
    /// Global multiplier already folded into the palette colors.
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub ambient: Rgb,
    pub highlight: Rgb,
    pub shadow: Rgb,
    pub atmosphere: Atmosphere,
}

/// Named palette slot; particle kinds and lights pick their color by slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Swatch {
    Primary,
    Secondary,
    Accent,
    Ambient,
    Highlight,
    Shadow,
}

struct BasePalette {
    colors: [u32; 6], // primary, secondary, accent, ambient, highlight, shadow
    fog_density: f32,
    ambient_light: f32,
}

const POSITIVE: BasePalette = BasePalette {
    colors: [0xFFB347, 0xFFD166, 0xFF6B9D, 0x87CEEB, 0xFFF6D5, 0x4A3B6B],
    fog_density: 0.0012,
    ambient_light: 0.35,
};

const NEUTRAL: BasePalette = BasePalette {
    colors: [0x7FA99B, 0xA8C5B5, 0xD4A574, 0xB0C4DE, 0xF0F0F0, 0x2F3E46],
    fog_density: 0.0018,
    ambient_light: 0.28,
};

const NEGATIVE: BasePalette = BasePalette {
    colors: [0x4A5568, 0x2D3748, 0x9B2C2C, 0x1A202C, 0xA0AEC0, 0x0D1117],
    fog_density: 0.0028,
    ambient_light: 0.18,
};

const HIGH_INTENSITY_BRIGHTEN: f32 = 1.15;
const HIGH_INTENSITY_DARKEN: f32 = 0.8;
const FOG_SHADOW_MIX: f32 = 0.35;

fn base_for(class: SentimentClass) -> &'static BasePalette {
    match class {
        SentimentClass::Positive => &POSITIVE,
        SentimentClass::Neutral => &NEUTRAL,
        SentimentClass::Negative => &NEGATIVE,
    }
}

/// Derives the palette and atmosphere for one parameter snapshot.
pub fn map(params: &SceneParameters) -> Palette {
    let class = params.sentiment_class;
    let magnitude = if params.sentiment_score.is_nan() {
        0.0
    } else {
        params.sentiment_score.abs().min(1.0)
    };
    let base = base_for(class);

    let mut intensity = 0.7 + 0.6 * magnitude;
    if params.high_intensity {
        intensity *= match class {
            SentimentClass::Negative => HIGH_INTENSITY_DARKEN,
            _ => HIGH_INTENSITY_BRIGHTEN,
        };
    }

    let shade = |hex: u32| Rgb::from_hex(hex).scale(intensity).clamped();
    let [primary, secondary, accent, ambient, highlight, shadow] = base.colors.map(shade);
    // Negative high-intensity keeps the accent hot while everything else darkens.
    let accent = if params.high_intensity && class == SentimentClass::Negative {
        Rgb::from_hex(base.colors[2]).scale(1.2).clamped()
    } else {
        accent
    };

    let fog_density = match class {
        SentimentClass::Negative => base.fog_density * (1.0 + 0.5 * magnitude),
        _ => base.fog_density,
    };
    let fog_color = ambient.lerp(shadow, FOG_SHADOW_MIX).clamped();
    let ambient_light = (base.ambient_light * (0.85 + 0.3 * magnitude)).clamp(0.05, 0.6);

    Palette {
        primary,
        secondary,
        accent,
        ambient,
        highlight,
        shadow,
        atmosphere: Atmosphere {
            fog_density,
            fog_color,
            ambient_light,
            intensity,
        },
    }
}

impl Palette {
    pub fn swatch(&self, swatch: Swatch) -> Rgb {
        match swatch {
            Swatch::Primary => self.primary,
            Swatch::Secondary => self.secondary,
            Swatch::Accent => self.accent,
            Swatch::Ambient => self.ambient,
            Swatch::Highlight => self.highlight,
            Swatch::Shadow => self.shadow,
        }
    }

    pub fn colors(&self) -> [Rgb; 6] {
        [
            self.primary,
            self.secondary,
            self.accent,
            self.ambient,
            self.highlight,
            self.shadow,
        ]
    }

    pub fn sky_top(&self) -> Rgb {
        self.shadow.lerp(self.ambient, 0.3).clamped()
    }

    pub fn sky_horizon(&self) -> Rgb {
        self.atmosphere.fog_color.lerp(self.highlight, 0.2).clamped()
    }

    /// One color per light source: the sun takes the highlight, the moon the accent.
    pub fn light_colors(&self) -> [Rgb; 2] {
        [self.highlight, self.accent]
    }
}
