//! Style catalog: the fixed set of presets and color schemes.
//!
//! Every preset carries two [`GeometryProfile`]s (landscape and portrait)
//! plus two flags:
//!
//! | Preset | Alias | Blurred portrait backdrop | Compact captions |
//! |---|---|---|---|
//! | `full` | `F` | no | no |
//! | `half` | `H` | no | no |
//! | `quarter` | `Q` | no | no |
//! | `square-insta` | `IS` | yes | no |
//! | `full-compact` | `FC` | no | yes |
//! | `half-compact` | `HC` | no | yes |
//! | `quarter-compact` | `QC` | no | yes |
//! | `square-insta-compact` | `ISC` | yes | yes |
//!
//! All margins are fractions of the photo's longer side. Caption anchors are
//! fractions of the finished (bordered) canvas. Standard presets center both
//! captions; compact presets pin the main caption to the left edge and the
//! sub caption to the right edge.
//!
//! The catalog is plain static data: [`resolve`] and
//! [`resolve_color_scheme`] are table lookups returning `'static` values.

use image::Rgb;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Unknown preset '{0}' (run `polaroid presets` for the list)")]
    UnknownPreset(String),
    #[error("Unknown color scheme '{0}' (expected light or dark)")]
    UnknownColorScheme(String),
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Text alignment of a caption row relative to its anchor column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Caption anchor as fractions of the finished canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// Orientation-specific layout parameters of a preset.
///
/// Index `0` of the caption arrays is the main caption, index `1` the sub
/// caption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryProfile {
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    /// Divisors applied to the canvas' shorter side to get the caption pixel size.
    pub caption_font_scale: [f64; 2],
    pub caption_anchor: [Anchor; 2],
    pub caption_alignment: [Alignment; 2],
}

impl GeometryProfile {
    /// Reject profiles that would produce a degenerate or inverted canvas.
    ///
    /// Every fraction must lie in `[0, 1]`, opposite margins must sum to
    /// less than 1 and font scales must be positive.
    pub fn validate(&self) -> Result<(), StyleError> {
        let fractions = [
            ("margin_top", self.margin_top),
            ("margin_right", self.margin_right),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("main anchor x", self.caption_anchor[0].x),
            ("main anchor y", self.caption_anchor[0].y),
            ("sub anchor x", self.caption_anchor[1].x),
            ("sub anchor y", self.caption_anchor[1].y),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(StyleError::InvalidGeometry(format!(
                    "{name} must be within 0-1, got {value}"
                )));
            }
        }
        if self.margin_left + self.margin_right >= 1.0 {
            return Err(StyleError::InvalidGeometry(
                "margin_left + margin_right must be below 1".into(),
            ));
        }
        if self.margin_top + self.margin_bottom >= 1.0 {
            return Err(StyleError::InvalidGeometry(
                "margin_top + margin_bottom must be below 1".into(),
            ));
        }
        for scale in self.caption_font_scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(StyleError::InvalidGeometry(format!(
                    "caption font scale must be positive, got {scale}"
                )));
            }
        }
        Ok(())
    }
}

/// Identifier of one of the eight catalog presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetId {
    Full,
    Half,
    Quarter,
    SquareInsta,
    FullCompact,
    HalfCompact,
    QuarterCompact,
    SquareInstaCompact,
}

impl PresetId {
    pub const ALL: [PresetId; 8] = [
        PresetId::Full,
        PresetId::Half,
        PresetId::Quarter,
        PresetId::SquareInsta,
        PresetId::FullCompact,
        PresetId::HalfCompact,
        PresetId::QuarterCompact,
        PresetId::SquareInstaCompact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PresetId::Full => "full",
            PresetId::Half => "half",
            PresetId::Quarter => "quarter",
            PresetId::SquareInsta => "square-insta",
            PresetId::FullCompact => "full-compact",
            PresetId::HalfCompact => "half-compact",
            PresetId::QuarterCompact => "quarter-compact",
            PresetId::SquareInstaCompact => "square-insta-compact",
        }
    }

    /// Short code accepted wherever a preset id is.
    pub fn alias(self) -> &'static str {
        match self {
            PresetId::Full => "F",
            PresetId::Half => "H",
            PresetId::Quarter => "Q",
            PresetId::SquareInsta => "IS",
            PresetId::FullCompact => "FC",
            PresetId::HalfCompact => "HC",
            PresetId::QuarterCompact => "QC",
            PresetId::SquareInstaCompact => "ISC",
        }
    }

    pub fn preset(self) -> &'static StylePreset {
        match self {
            PresetId::Full => &FULL,
            PresetId::Half => &HALF,
            PresetId::Quarter => &QUARTER,
            PresetId::SquareInsta => &SQUARE_INSTA,
            PresetId::FullCompact => &FULL_COMPACT,
            PresetId::HalfCompact => &HALF_COMPACT,
            PresetId::QuarterCompact => &QUARTER_COMPACT,
            PresetId::SquareInstaCompact => &SQUARE_INSTA_COMPACT,
        }
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetId {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PresetId::ALL
            .into_iter()
            .find(|id| {
                id.as_str().eq_ignore_ascii_case(wanted) || id.alias().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| StyleError::UnknownPreset(s.to_string()))
    }
}

/// A named layout: geometry per orientation plus behavior flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StylePreset {
    pub id: PresetId,
    pub landscape: GeometryProfile,
    pub portrait: GeometryProfile,
    /// Fill the side margins of portrait photos with a blurred echo of the photo.
    pub blur_portrait_background: bool,
    /// Move the capture date from the main caption to a second sub caption row.
    pub compact_caption: bool,
}

impl StylePreset {
    /// Profile for an image of the given orientation.
    pub fn profile(&self, is_portrait: bool) -> &GeometryProfile {
        if is_portrait {
            &self.portrait
        } else {
            &self.landscape
        }
    }
}

/// Resolve a preset by canonical id or short alias (case-insensitive).
pub fn resolve(preset_id: &str) -> Result<&'static StylePreset, StyleError> {
    preset_id.parse::<PresetId>().map(PresetId::preset)
}

/// Text and background colors of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub main_text_color: Rgb<u8>,
    pub sub_text_color: Rgb<u8>,
    pub background_color: Rgb<u8>,
}

impl ColorScheme {
    pub const LIGHT: ColorScheme = ColorScheme {
        main_text_color: Rgb([0, 0, 0]),
        sub_text_color: Rgb([128, 128, 128]),
        background_color: Rgb([255, 255, 255]),
    };

    pub const DARK: ColorScheme = ColorScheme {
        main_text_color: Rgb([255, 255, 255]),
        sub_text_color: Rgb([128, 128, 128]),
        background_color: Rgb([0, 0, 0]),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSchemeId {
    Light,
    Dark,
}

impl ColorSchemeId {
    pub const ALL: [ColorSchemeId; 2] = [ColorSchemeId::Light, ColorSchemeId::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorSchemeId::Light => "light",
            ColorSchemeId::Dark => "dark",
        }
    }

    pub fn alias(self) -> &'static str {
        match self {
            ColorSchemeId::Light => "L",
            ColorSchemeId::Dark => "D",
        }
    }

    pub fn scheme(self) -> &'static ColorScheme {
        match self {
            ColorSchemeId::Light => &ColorScheme::LIGHT,
            ColorSchemeId::Dark => &ColorScheme::DARK,
        }
    }
}

impl fmt::Display for ColorSchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorSchemeId {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ColorSchemeId::ALL
            .into_iter()
            .find(|id| {
                id.as_str().eq_ignore_ascii_case(wanted) || id.alias().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| StyleError::UnknownColorScheme(s.to_string()))
    }
}

/// Resolve a color scheme by id or alias (case-insensitive).
pub fn resolve_color_scheme(id: &str) -> Result<&'static ColorScheme, StyleError> {
    id.parse::<ColorSchemeId>().map(ColorSchemeId::scheme)
}

// =============================================================================
// Catalog tables
// =============================================================================

/// Margins in `[top, right, bottom, left]` order.
type Margins = [f64; 4];

/// Both captions centered on the canvas, stacked near the bottom edge.
const fn centered(
    margins: Margins,
    main_y: f64,
    sub_y: f64,
    font_scale: [f64; 2],
) -> GeometryProfile {
    GeometryProfile {
        margin_top: margins[0],
        margin_right: margins[1],
        margin_bottom: margins[2],
        margin_left: margins[3],
        caption_font_scale: font_scale,
        caption_anchor: [Anchor { x: 0.5, y: main_y }, Anchor { x: 0.5, y: sub_y }],
        caption_alignment: [Alignment::Center, Alignment::Center],
    }
}

/// Main caption pinned left, sub caption pinned right.
const fn split(
    margins: Margins,
    main_y: f64,
    sub_y: f64,
    font_scale: [f64; 2],
) -> GeometryProfile {
    GeometryProfile {
        margin_top: margins[0],
        margin_right: margins[1],
        margin_bottom: margins[2],
        margin_left: margins[3],
        caption_font_scale: font_scale,
        caption_anchor: [Anchor { x: 0.05, y: main_y }, Anchor { x: 0.95, y: sub_y }],
        caption_alignment: [Alignment::Left, Alignment::Right],
    }
}

static FULL: StylePreset = StylePreset {
    id: PresetId::Full,
    landscape: centered([0.02, 0.02, 0.125, 0.02], 0.93, 0.965, [29.44, 44.14]),
    portrait: centered([0.02, 0.02, 0.13, 0.02], 0.93, 0.96, [30.44, 46.14]),
    blur_portrait_background: false,
    compact_caption: false,
};

static HALF: StylePreset = StylePreset {
    id: PresetId::Half,
    landscape: centered([0.03, 0.0, 0.145, 0.0], 0.91, 0.945, [30.44, 44.14]),
    portrait: centered([0.03, 0.0, 0.13, 0.0], 0.93, 0.955, [30.44, 44.14]),
    blur_portrait_background: false,
    compact_caption: false,
};

static QUARTER: StylePreset = StylePreset {
    id: PresetId::Quarter,
    landscape: centered([0.0, 0.0, 0.12, 0.0], 0.925, 0.965, [30.44, 44.14]),
    portrait: centered([0.0, 0.0, 0.11, 0.0], 0.945, 0.97, [30.44, 44.14]),
    blur_portrait_background: false,
    compact_caption: false,
};

static SQUARE_INSTA: StylePreset = StylePreset {
    id: PresetId::SquareInsta,
    landscape: centered([0.07, 0.0, 0.145, 0.0], 0.925, 0.96, [30.44, 44.14]),
    portrait: centered([0.07, 0.0, 0.13, 0.0], 0.94, 0.97, [34.44, 48.14]),
    blur_portrait_background: true,
    compact_caption: false,
};

static FULL_COMPACT: StylePreset = StylePreset {
    id: PresetId::FullCompact,
    landscape: split([0.02, 0.02, 0.125, 0.02], 0.94, 0.96, [32.44, 44.14]),
    portrait: split([0.02, 0.02, 0.13, 0.02], 0.945, 0.96, [33.44, 48.14]),
    blur_portrait_background: false,
    compact_caption: true,
};

static HALF_COMPACT: StylePreset = StylePreset {
    id: PresetId::HalfCompact,
    landscape: split([0.03, 0.0, 0.145, 0.0], 0.935, 0.945, [30.44, 44.14]),
    portrait: split([0.03, 0.0, 0.13, 0.0], 0.945, 0.955, [34.44, 48.14]),
    blur_portrait_background: false,
    compact_caption: true,
};

static QUARTER_COMPACT: StylePreset = StylePreset {
    id: PresetId::QuarterCompact,
    landscape: split([0.0, 0.0, 0.12, 0.0], 0.945, 0.96, [30.44, 44.14]),
    portrait: split([0.0, 0.0, 0.11, 0.0], 0.955, 0.97, [33.44, 47.14]),
    blur_portrait_background: false,
    compact_caption: true,
};

static SQUARE_INSTA_COMPACT: StylePreset = StylePreset {
    id: PresetId::SquareInstaCompact,
    landscape: split([0.07, 0.0, 0.145, 0.0], 0.94, 0.955, [31.44, 44.14]),
    portrait: split([0.07, 0.0, 0.13, 0.0], 0.96, 0.975, [33.44, 48.14]),
    blur_portrait_background: true,
    compact_caption: true,
};
