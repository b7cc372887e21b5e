//! Text effect resolution for the two render targets.
//!
//! The live canvas (vector primitives) and the in-place DOM text editor
//! express shadows and outlines through different primitives but must look
//! identical. Both resolvers are pure functions over the same
//! `(EffectKind, EffectParams)` inputs; any new effect must supply both
//! mappings.

use crate::color::Rgba;
use serde::{Deserialize, Serialize};

/// Canonical default for `EffectParams::direction` (degrees). Applied
/// uniformly at every call site; the offset angle is `direction - 90`, so
/// the default lands on the +x axis.
pub const DEFAULT_DIRECTION: f64 = 90.0;

/// Text decoration effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    #[default]
    None,
    Shadow,
    Lift,
    Hollow,
    Outline,
    Echo,
    Splice,
    Glitch,
    Neon,
}

/// Tuning parameters shared by all effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectParams {
    /// Strength of the effect, 0..=100.
    pub intensity: f64,
    /// Shadow distance control; the rendered distance is `offset / 2`.
    pub offset: f64,
    /// Shadow direction in degrees; 90 offsets along +x, 180 straight down.
    pub direction: f64,
    /// Primary effect color.
    pub color: Rgba,
    /// Secondary color (splice only).
    pub color2: Rgba,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            intensity: 50.0,
            offset: 30.0,
            direction: DEFAULT_DIRECTION,
            color: Rgba::black(),
            color2: Rgba::new(255, 0, 0, 255),
        }
    }
}

impl EffectParams {
    /// Shadow offset vector derived from `direction` and `offset`. The
    /// angle is `direction - 90`, so 90 points along +x and 180 down.
    fn shadow_offset(&self) -> (f64, f64) {
        let rad = (self.direction - 90.0).to_radians();
        let dist = self.offset / 2.0;
        (rad.cos() * dist, rad.sin() * dist)
    }
}

/// Drop shadow attributes for the vector target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorShadow {
    pub color: Rgba,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub opacity: f64,
}

/// Resolved attributes for the vector (canvas) renderer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorEffect {
    pub shadow: Option<VectorShadow>,
    /// Stroke color and width, when the effect draws an outline.
    pub stroke: Option<(Rgba, f64)>,
    /// When false the glyph fill is suppressed entirely (hollow).
    pub fill_enabled: bool,
    /// Replaces the element's fill color (neon forces white).
    pub fill_override: Option<Rgba>,
}

impl VectorEffect {
    fn plain() -> Self {
        Self {
            shadow: None,
            stroke: None,
            fill_enabled: true,
            fill_override: None,
        }
    }
}

/// One `text-shadow` layer for the DOM target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: Rgba,
}

/// Resolved CSS-like attributes for the DOM text overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DomEffect {
    pub text_shadows: Vec<TextShadow>,
    /// `-webkit-text-stroke` width and color.
    pub stroke: Option<(f64, Rgba)>,
    /// Replaces the text color (`transparent` for hollow, white for neon).
    pub color_override: Option<Rgba>,
    /// Render stroke beneath fill (`paint-order: stroke fill`).
    pub paint_order_stroke: bool,
}

/// Resolve the vector-renderer attributes for an effect.
/// `fill` is the element's own text fill color.
pub fn resolve_vector(kind: EffectKind, params: &EffectParams, fill: Rgba) -> VectorEffect {
    let (ox, oy) = params.shadow_offset();
    match kind {
        EffectKind::None => VectorEffect::plain(),
        EffectKind::Shadow => VectorEffect {
            shadow: Some(VectorShadow {
                color: params.color,
                blur: 5.0,
                offset_x: ox,
                offset_y: oy,
                opacity: params.intensity / 100.0,
            }),
            ..VectorEffect::plain()
        },
        EffectKind::Lift => VectorEffect {
            shadow: Some(VectorShadow {
                color: Rgba::black().with_alpha(0.4),
                blur: params.intensity / 5.0,
                offset_x: 0.0,
                offset_y: params.intensity / 10.0,
                opacity: params.intensity / 100.0,
            }),
            ..VectorEffect::plain()
        },
        EffectKind::Hollow => VectorEffect {
            stroke: Some((fill, 1.5)),
            fill_enabled: false,
            ..VectorEffect::plain()
        },
        EffectKind::Outline => VectorEffect {
            stroke: Some((params.color, 2.0)),
            ..VectorEffect::plain()
        },
        EffectKind::Echo => VectorEffect {
            shadow: Some(VectorShadow {
                color: params.color.with_alpha(0.3),
                blur: 0.0,
                offset_x: ox,
                offset_y: oy,
                opacity: 1.0,
            }),
            ..VectorEffect::plain()
        },
        EffectKind::Splice => VectorEffect {
            stroke: Some((params.color, 1.5)),
            shadow: Some(VectorShadow {
                color: params.color2,
                blur: 0.0,
                offset_x: ox,
                offset_y: oy,
                opacity: 1.0,
            }),
            ..VectorEffect::plain()
        },
        EffectKind::Glitch => VectorEffect {
            shadow: Some(VectorShadow {
                color: Rgba::magenta(),
                blur: 0.0,
                offset_x: params.intensity / 10.0,
                offset_y: 0.0,
                opacity: 1.0,
            }),
            ..VectorEffect::plain()
        },
        EffectKind::Neon => VectorEffect {
            shadow: Some(VectorShadow {
                color: params.color,
                blur: params.intensity / 2.0,
                offset_x: 0.0,
                offset_y: 0.0,
                opacity: 1.0,
            }),
            fill_override: Some(Rgba::white()),
            ..VectorEffect::plain()
        },
    }
}

/// Resolve the DOM-overlay attributes for an effect.
/// `fill` is the element's own text fill color.
pub fn resolve_dom(kind: EffectKind, params: &EffectParams, fill: Rgba) -> DomEffect {
    let (ox, oy) = params.shadow_offset();
    match kind {
        EffectKind::None => DomEffect::default(),
        EffectKind::Shadow => DomEffect {
            text_shadows: vec![TextShadow {
                offset_x: ox,
                offset_y: oy,
                blur: 5.0,
                color: params.color.with_alpha(params.intensity / 100.0),
            }],
            ..DomEffect::default()
        },
        EffectKind::Lift => DomEffect {
            text_shadows: vec![TextShadow {
                offset_x: 0.0,
                offset_y: params.intensity / 10.0,
                blur: params.intensity / 5.0,
                color: Rgba::black().with_alpha(0.4),
            }],
            ..DomEffect::default()
        },
        EffectKind::Hollow => DomEffect {
            stroke: Some((1.2, fill)),
            color_override: Some(Rgba::transparent()),
            ..DomEffect::default()
        },
        EffectKind::Outline => DomEffect {
            stroke: Some((2.0, params.color)),
            paint_order_stroke: true,
            ..DomEffect::default()
        },
        EffectKind::Echo => DomEffect {
            text_shadows: vec![TextShadow {
                offset_x: ox,
                offset_y: oy,
                blur: 0.0,
                color: params.color.with_alpha(0.3),
            }],
            ..DomEffect::default()
        },
        EffectKind::Splice => DomEffect {
            stroke: Some((1.5, params.color)),
            text_shadows: vec![TextShadow {
                offset_x: ox,
                offset_y: oy,
                blur: 0.0,
                color: params.color2,
            }],
            ..DomEffect::default()
        },
        EffectKind::Glitch => DomEffect {
            text_shadows: vec![
                TextShadow {
                    offset_x: -params.intensity / 8.0,
                    offset_y: 0.0,
                    blur: 0.0,
                    color: Rgba::cyan(),
                },
                TextShadow {
                    offset_x: params.intensity / 8.0,
                    offset_y: 0.0,
                    blur: 0.0,
                    color: Rgba::magenta(),
                },
            ],
            ..DomEffect::default()
        },
        EffectKind::Neon => DomEffect {
            text_shadows: [
                params.intensity / 10.0,
                params.intensity / 5.0,
                params.intensity / 2.0,
                params.intensity,
            ]
            .iter()
            .map(|&blur| TextShadow {
                offset_x: 0.0,
                offset_y: 0.0,
                blur,
                color: params.color,
            })
            .collect(),
            color_override: Some(Rgba::white()),
            ..DomEffect::default()
        },
    }
}
