//! Graphics state: colors, line styles, fill rules and ExtGState resources.
//!
//! Transparency is set through ExtGState dictionaries. One resource object
//! exists per distinct parameter set; see [`ExtGState`].

use crate::object::{Dict, Object};
use crate::writer::content_stream::{ContentStreamOp, LineCap, LineJoin};

/// Blend modes for transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Normal
    #[default]
    Normal,
    /// Multiply
    Multiply,
    /// Screen
    Screen,
    /// Overlay
    Overlay,
    /// Darken
    Darken,
    /// Lighten
    Lighten,
    /// ColorDodge
    ColorDodge,
    /// ColorBurn
    ColorBurn,
    /// HardLight
    HardLight,
    /// SoftLight
    SoftLight,
    /// Difference
    Difference,
    /// Exclusion
    Exclusion,
    /// Hue
    Hue,
    /// Saturation
    Saturation,
    /// Color
    Color,
    /// Luminosity
    Luminosity,
}

impl BlendMode {
    /// PDF name of the blend mode.
    pub fn as_pdf_name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::Darken => "Darken",
            BlendMode::Lighten => "Lighten",
            BlendMode::ColorDodge => "ColorDodge",
            BlendMode::ColorBurn => "ColorBurn",
            BlendMode::HardLight => "HardLight",
            BlendMode::SoftLight => "SoftLight",
            BlendMode::Difference => "Difference",
            BlendMode::Exclusion => "Exclusion",
            BlendMode::Hue => "Hue",
            BlendMode::Saturation => "Saturation",
            BlendMode::Color => "Color",
            BlendMode::Luminosity => "Luminosity",
        }
    }
}

/// Extended graphics state resource.
///
/// Only the parameters the writer sets are modelled; equality on this struct
/// is what deduplicates resources.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtGState {
    /// Blend mode (BM)
    pub blend_mode: Option<BlendMode>,
    /// Stroke alpha (CA), 0.0 to 1.0
    pub stroke_alpha: Option<f32>,
    /// Fill alpha (ca), 0.0 to 1.0
    pub fill_alpha: Option<f32>,
}

impl ExtGState {
    /// Create an empty graphics state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set blend mode.
    pub fn blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = Some(mode);
        self
    }

    /// Set stroke alpha.
    pub fn stroke_alpha(mut self, alpha: f32) -> Self {
        self.stroke_alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Set fill alpha.
    pub fn fill_alpha(mut self, alpha: f32) -> Self {
        self.fill_alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Build the ExtGState dictionary.
    pub fn to_object(&self) -> Object {
        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("ExtGState"));
        if let Some(mode) = self.blend_mode {
            dict.insert("BM".into(), Object::name(mode.as_pdf_name()));
        }
        if let Some(alpha) = self.stroke_alpha {
            dict.insert("CA".into(), Object::from(alpha));
        }
        if let Some(alpha) = self.fill_alpha {
            dict.insert("ca".into(), Object::from(alpha));
        }
        Object::Dictionary(dict)
    }
}

/// A device color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// DeviceGray
    Gray(f32),
    /// DeviceRGB
    Rgb(f32, f32, f32),
    /// DeviceCMYK
    Cmyk(f32, f32, f32, f32),
}

impl Color {
    /// RGB color from components in 0.0 to 1.0.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color::Rgb(r, g, b)
    }

    /// Black in DeviceGray.
    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    /// Operator setting this as the fill color.
    pub fn fill_op(&self) -> ContentStreamOp {
        match *self {
            Color::Gray(g) => ContentStreamOp::SetFillColorGray(g),
            Color::Rgb(r, g, b) => ContentStreamOp::SetFillColorRGB(r, g, b),
            Color::Cmyk(c, m, y, k) => ContentStreamOp::SetFillColorCMYK(c, m, y, k),
        }
    }

    /// Operator setting this as the stroke color.
    pub fn stroke_op(&self) -> ContentStreamOp {
        match *self {
            Color::Gray(g) => ContentStreamOp::SetStrokeColorGray(g),
            Color::Rgb(r, g, b) => ContentStreamOp::SetStrokeColorRGB(r, g, b),
            Color::Cmyk(c, m, y, k) => ContentStreamOp::SetStrokeColorCMYK(c, m, y, k),
        }
    }
}

/// Winding rule used for fills and clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Non-zero winding
    #[default]
    NonZero,
    /// Even-odd
    EvenOdd,
}

impl FillRule {
    /// `f` or `f*`.
    pub fn fill_op(&self) -> ContentStreamOp {
        match self {
            FillRule::NonZero => ContentStreamOp::Fill,
            FillRule::EvenOdd => ContentStreamOp::FillEvenOdd,
        }
    }

    /// `B` or `B*`.
    pub fn fill_stroke_op(&self) -> ContentStreamOp {
        match self {
            FillRule::NonZero => ContentStreamOp::FillStroke,
            FillRule::EvenOdd => ContentStreamOp::FillStrokeEvenOdd,
        }
    }

    /// `W n` or `W* n`.
    pub fn clip_op(&self) -> ContentStreamOp {
        match self {
            FillRule::NonZero => ContentStreamOp::Clip,
            FillRule::EvenOdd => ContentStreamOp::ClipEvenOdd,
        }
    }
}

/// Stroke parameters set with `set_line_style`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    /// Line width
    pub width: f32,
    /// Cap style; `None` leaves the current one
    pub cap: Option<LineCap>,
    /// Join style; `None` leaves the current one
    pub join: Option<LineJoin>,
    /// Dash array; empty means no dash operator
    pub dash: Vec<f32>,
    /// Dash phase
    pub phase: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: None,
            join: None,
            dash: Vec::new(),
            phase: 0.0,
        }
    }
}

impl LineStyle {
    /// A solid line of the given width.
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Set the cap style.
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Set the join style.
    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = Some(join);
        self
    }

    /// Set a dash pattern.
    pub fn with_dash(mut self, dash: Vec<f32>, phase: f32) -> Self {
        self.dash = dash;
        self.phase = phase;
        self
    }

    /// Operators establishing this style, in `w J j d` order.
    pub fn ops(&self) -> Vec<ContentStreamOp> {
        let mut ops = vec![ContentStreamOp::SetLineWidth(self.width)];
        if let Some(cap) = self.cap {
            ops.push(ContentStreamOp::SetLineCap(cap));
        }
        if let Some(join) = self.join {
            ops.push(ContentStreamOp::SetLineJoin(join));
        }
        if !self.dash.is_empty() {
            ops.push(ContentStreamOp::SetDashPattern(self.dash.clone(), self.phase));
        }
        ops
    }
}

/// Snapshot pushed by `save()` and replayed across a page break.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedState {
    /// Fill color at save time
    pub fill_color: Option<Color>,
    /// Stroke color at save time
    pub stroke_color: Option<Color>,
    /// Line style at save time
    pub line_style: Option<LineStyle>,
}

impl SavedState {
    /// Operators restoring colors and line style.
    pub fn ops(&self) -> Vec<ContentStreamOp> {
        let mut ops = Vec::new();
        if let Some(color) = self.fill_color {
            ops.push(color.fill_op());
        }
        if let Some(color) = self.stroke_color {
            ops.push(color.stroke_op());
        }
        if let Some(style) = &self.line_style {
            ops.extend(style.ops());
        }
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ContentStreamBuilder;

    fn render(ops: Vec<ContentStreamOp>) -> String {
        let mut builder = ContentStreamBuilder::new();
        builder.ops(ops);
        String::from_utf8(builder.build()).unwrap()
    }

    #[test]
    fn test_ext_gstate_dictionary() {
        let gs = ExtGState::new().blend_mode(BlendMode::Multiply).fill_alpha(0.5);
        let obj = gs.to_object();
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get("BM").and_then(Object::as_name), Some("Multiply"));
        assert_eq!(dict.get("ca"), Some(&Object::Real(0.5)));
        assert!(dict.get("CA").is_none());
    }

    #[test]
    fn test_ext_gstate_equality_drives_dedup() {
        let a = ExtGState::new().stroke_alpha(0.3);
        let b = ExtGState::new().stroke_alpha(0.3);
        let c = ExtGState::new().fill_alpha(0.3);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(ExtGState::new().fill_alpha(3.0).fill_alpha, Some(1.0));
    }

    #[test]
    fn test_line_style_ops() {
        let style = LineStyle::new(2.0)
            .with_cap(LineCap::Square)
            .with_join(LineJoin::Round)
            .with_dash(vec![4.0, 2.0], 1.0);
        assert_eq!(render(style.ops()), "\n2 w\n2 J\n1 j\n[4 2] 1 d");
    }

    #[test]
    fn test_color_ops() {
        assert_eq!(render(vec![Color::rgb(1.0, 0.0, 0.0).fill_op()]), "\n1 0 0 rg");
        assert_eq!(render(vec![Color::Cmyk(0.0, 0.0, 0.0, 1.0).stroke_op()]), "\n0 0 0 1 K");
    }

    #[test]
    fn test_fill_rule_ops() {
        assert_eq!(FillRule::EvenOdd.fill_op(), ContentStreamOp::FillEvenOdd);
        assert_eq!(FillRule::NonZero.clip_op(), ContentStreamOp::Clip);
    }
}
