//! Vector drawing on the current content stream.
//!
//! Every method appends operators immediately. Colors are cached in the
//! drawing context so an unchanged color is written once; `save` and
//! `restore` clear the cache because the real graphics state moves under
//! it.

use std::f32::consts::PI;

use super::content_stream::ContentStreamOp;
use super::graphics_state::{BlendMode, Color, ExtGState, FillRule, LineStyle, SavedState};
use super::pdf_writer::PdfWriter;
use crate::error::{Error, Result};
use crate::store::PdfObject;

/// Shape of an elliptical arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseArc {
    /// Rotation of the ellipse axes, degrees counterclockwise
    pub angle: f32,
    /// Bezier segments used for the full sweep
    pub segments: u32,
    /// Start angle in degrees
    pub start: f32,
    /// Stop angle in degrees
    pub stop: f32,
}

impl Default for EllipseArc {
    fn default() -> Self {
        Self {
            angle: 0.0,
            segments: 8,
            start: 0.0,
            stop: 360.0,
        }
    }
}

impl EllipseArc {
    /// Arc between two angles.
    pub fn between(start: f32, stop: f32) -> Self {
        Self {
            start,
            stop,
            ..Self::default()
        }
    }

    fn is_closed(&self) -> bool {
        (self.stop - self.start).abs() >= 360.0
    }

    /// Path of the arc around `(cx, cy)`. With `continue_path` the first
    /// point is joined to the current path instead of starting a new one.
    fn path(&self, cx: f32, cy: f32, r1: f32, r2: f32, continue_path: bool) -> Vec<ContentStreamOp> {
        let segments = self.segments.max(2);
        let start = self.start.to_radians();
        let stop = self.stop.to_radians();
        let dt = (stop - start) / segments as f32;
        let dtm = dt / 3.0;

        let mut t = start;
        let mut a = cx + r1 * t.cos();
        let mut b = cy + r2 * t.sin();
        let mut c = -r1 * t.sin();
        let mut d = r2 * t.cos();

        let mut ops = Vec::with_capacity(segments as usize + 1);
        ops.push(if continue_path {
            ContentStreamOp::LineTo(a, b)
        } else {
            ContentStreamOp::MoveTo(a, b)
        });
        for _ in 0..segments {
            t += dt;
            let a1 = cx + r1 * t.cos();
            let b1 = cy + r2 * t.sin();
            let c1 = -r1 * t.sin();
            let d1 = r2 * t.cos();
            ops.push(ContentStreamOp::CurveTo(
                a + c * dtm,
                b + d * dtm,
                a1 - c1 * dtm,
                b1 - d1 * dtm,
                a1,
                b1,
            ));
            (a, b, c, d) = (a1, b1, c1, d1);
        }
        ops
    }
}

/// A 2x3 matrix `[a b c d e f]` rotating by `degrees` around `(x, y)`.
fn rotation_about(degrees: f32, x: f32, y: f32) -> [f32; 6] {
    let (s, c) = degrees.to_radians().sin_cos();
    [c, s, -s, c, x - c * x + s * y, y - s * x - c * y]
}

impl PdfWriter {
    fn path_end(&self, fill: bool, stroke: bool, closed: bool) -> ContentStreamOp {
        match (fill, stroke) {
            (true, true) => self.ctx.fill_rule.fill_stroke_op(),
            (true, false) => self.ctx.fill_rule.fill_op(),
            (false, true) if closed => ContentStreamOp::CloseStroke,
            (false, true) => ContentStreamOp::Stroke,
            (false, false) => ContentStreamOp::EndPath,
        }
    }

    // ---------------------------------------------------------------
    // Color and style
    // ---------------------------------------------------------------

    /// Set the fill color unless it is already current.
    pub fn set_color(&mut self, color: Color) -> Result<()> {
        if self.ctx.fill_color == Some(color) {
            return Ok(());
        }
        self.set_color_forced(color)
    }

    /// Set the fill color even if it is already current.
    pub fn set_color_forced(&mut self, color: Color) -> Result<()> {
        self.ctx.fill_color = Some(color);
        self.emit([color.fill_op()])
    }

    /// Set the stroke color unless it is already current.
    pub fn set_stroke_color(&mut self, color: Color) -> Result<()> {
        if self.ctx.stroke_color == Some(color) {
            return Ok(());
        }
        self.set_stroke_color_forced(color)
    }

    /// Set the stroke color even if it is already current.
    pub fn set_stroke_color_forced(&mut self, color: Color) -> Result<()> {
        self.ctx.stroke_color = Some(color);
        self.emit([color.stroke_op()])
    }

    /// Winding rule for later fills and clips.
    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.ctx.fill_rule = rule;
    }

    /// Set width, cap, join and dash pattern.
    pub fn set_line_style(&mut self, style: LineStyle) -> Result<()> {
        self.emit(style.ops())?;
        self.ctx.line_style = Some(style);
        Ok(())
    }

    /// Blend mode and opacity for strokes.
    pub fn set_line_transparency(&mut self, mode: BlendMode, opacity: f32) -> Result<()> {
        self.set_ext_gstate(ExtGState::new().blend_mode(mode).stroke_alpha(opacity))
    }

    /// Blend mode and opacity for fills.
    pub fn set_fill_transparency(&mut self, mode: BlendMode, opacity: f32) -> Result<()> {
        self.set_ext_gstate(ExtGState::new().blend_mode(mode).fill_alpha(opacity))
    }

    /// Apply a graphics state parameter set, reusing the resource of an
    /// equal set.
    pub fn set_ext_gstate(&mut self, gs: ExtGState) -> Result<()> {
        let existing = self
            .state
            .ext_gstates
            .iter()
            .find(|(known, _)| *known == gs)
            .map(|(_, name)| name.clone());
        let name = match existing {
            Some(name) => name,
            None => {
                let name = format!("GS{}", self.state.ext_gstates.len() + 1);
                let id = self.state.store.insert(PdfObject::ExtGState(gs.clone()));
                self.pages_mut()?.resources.ext_gstates.insert(name.clone(), id);
                log::debug!("Graphics state {} in object {}", name, id);
                self.state.ext_gstates.push((gs, name.clone()));
                name
            }
        };
        self.emit([ContentStreamOp::SetExtGState(name)])
    }

    /// Push the graphics state (`q`).
    pub fn save(&mut self) -> Result<()> {
        self.ctx.state_stack.push(SavedState {
            fill_color: self.ctx.fill_color,
            stroke_color: self.ctx.stroke_color,
            line_style: self.ctx.line_style.clone(),
        });
        self.ctx.fill_color = None;
        self.ctx.stroke_color = None;
        self.emit([ContentStreamOp::SaveState])
    }

    /// Pop the graphics state (`Q`).
    pub fn restore(&mut self) -> Result<()> {
        let saved = self.ctx.state_stack.pop().ok_or(Error::EmptyStateStack)?;
        self.ctx.fill_color = None;
        self.ctx.stroke_color = None;
        self.ctx.line_style = saved.line_style;
        self.emit([ContentStreamOp::RestoreState])
    }

    // ---------------------------------------------------------------
    // Paths
    // ---------------------------------------------------------------

    /// Begin a subpath.
    pub fn move_to(&mut self, x: f32, y: f32) -> Result<()> {
        self.emit([ContentStreamOp::MoveTo(x, y)])
    }

    /// Straight segment to `(x, y)`.
    pub fn line_to(&mut self, x: f32, y: f32) -> Result<()> {
        self.emit([ContentStreamOp::LineTo(x, y)])
    }

    /// Cubic Bezier segment.
    pub fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> Result<()> {
        self.emit([ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3)])
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) -> Result<()> {
        self.emit([ContentStreamOp::ClosePath])
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) -> Result<()> {
        self.emit([ContentStreamOp::Stroke])
    }

    /// Close and stroke the current path.
    pub fn close_path_stroke(&mut self) -> Result<()> {
        self.emit([ContentStreamOp::CloseStroke])
    }

    /// Fill the current path with the current fill rule.
    pub fn fill(&mut self) -> Result<()> {
        let op = self.ctx.fill_rule.fill_op();
        self.emit([op])
    }

    /// Fill and stroke the current path.
    pub fn fill_stroke(&mut self) -> Result<()> {
        let op = self.ctx.fill_rule.fill_stroke_op();
        self.emit([op])
    }

    /// Stroked line.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<()> {
        self.emit([
            ContentStreamOp::MoveTo(x1, y1),
            ContentStreamOp::LineTo(x2, y2),
            ContentStreamOp::Stroke,
        ])
    }

    /// Stroked Bezier curve from `(x0, y0)` to `(x3, y3)`.
    #[allow(clippy::too_many_arguments)]
    pub fn curve(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> Result<()> {
        self.emit([
            ContentStreamOp::MoveTo(x0, y0),
            ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3),
            ContentStreamOp::Stroke,
        ])
    }

    /// Rectangle path without painting.
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.emit([ContentStreamOp::Rectangle(x, y, width, height)])
    }

    /// Stroked rectangle.
    pub fn rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.emit([ContentStreamOp::Rectangle(x, y, width, height), ContentStreamOp::Stroke])
    }

    /// Filled rectangle.
    pub fn filled_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        let fill = self.ctx.fill_rule.fill_op();
        self.emit([ContentStreamOp::Rectangle(x, y, width, height), fill])
    }

    /// Closed polygon through `points`, filled or stroked.
    pub fn polygon(&mut self, points: &[(f32, f32)], fill: bool) -> Result<()> {
        let Some(((x, y), rest)) = points.split_first() else {
            return Ok(());
        };
        let mut ops = vec![ContentStreamOp::MoveTo(*x, *y)];
        ops.extend(rest.iter().map(|&(x, y)| ContentStreamOp::LineTo(x, y)));
        if fill {
            ops.push(ContentStreamOp::ClosePath);
            ops.push(self.ctx.fill_rule.fill_op());
        } else {
            ops.push(ContentStreamOp::CloseStroke);
        }
        self.emit(ops)
    }

    /// Stroked ellipse; `r2 == 0` draws a circle of radius `r1`.
    pub fn ellipse(&mut self, x0: f32, y0: f32, r1: f32, r2: f32) -> Result<()> {
        self.ellipse_arc(x0, y0, r1, r2, EllipseArc::default(), false, true)
    }

    /// Filled ellipse.
    pub fn filled_ellipse(&mut self, x0: f32, y0: f32, r1: f32, r2: f32) -> Result<()> {
        self.ellipse_arc(x0, y0, r1, r2, EllipseArc::default(), true, false)
    }

    /// Stroked arc between two angles in degrees.
    pub fn part_ellipse(&mut self, x0: f32, y0: f32, r1: f32, r2: f32, start: f32, stop: f32) -> Result<()> {
        self.ellipse_arc(x0, y0, r1, r2, EllipseArc::between(start, stop), false, true)
    }

    /// General elliptical arc.
    #[allow(clippy::too_many_arguments)]
    pub fn ellipse_arc(
        &mut self,
        x0: f32,
        y0: f32,
        r1: f32,
        r2: f32,
        arc: EllipseArc,
        fill: bool,
        stroke: bool,
    ) -> Result<()> {
        let r2 = if r2 == 0.0 { r1 } else { r2 };
        let closed = arc.is_closed();
        let mut ops = Vec::new();
        if arc.angle != 0.0 {
            let (s, c) = arc.angle.to_radians().sin_cos();
            ops.push(ContentStreamOp::SaveState);
            ops.push(ContentStreamOp::Transform(c, s, -s, c, x0, y0));
            ops.extend(arc.path(0.0, 0.0, r1, r2, false));
        } else {
            ops.extend(arc.path(x0, y0, r1, r2, false));
        }
        if closed && fill {
            ops.push(ContentStreamOp::ClosePath);
        }
        ops.push(self.path_end(fill, stroke, closed));
        if arc.angle != 0.0 {
            ops.push(ContentStreamOp::RestoreState);
        }
        self.emit(ops)
    }

    // ---------------------------------------------------------------
    // Clipping
    // ---------------------------------------------------------------

    /// Clip to a rectangle until `clipping_end`.
    pub fn clipping_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.save()?;
        let clip = self.ctx.fill_rule.clip_op();
        self.emit([ContentStreamOp::Rectangle(x, y, width, height), clip])
    }

    /// Clip to a rectangle with rounded corners.
    ///
    /// Radii are given top-left, top-right, bottom-right, bottom-left.
    #[allow(clippy::too_many_arguments)]
    pub fn clipping_rectangle_rounded(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        top_left: f32,
        top_right: f32,
        bottom_right: f32,
        bottom_left: f32,
    ) -> Result<()> {
        self.save()?;
        let quarter = |start: f32| EllipseArc {
            segments: 2,
            ..EllipseArc::between(start, start - 90.0)
        };
        let mut ops = vec![ContentStreamOp::MoveTo(x, y + height - top_left)];
        ops.extend(quarter(180.0).path(x + top_left, y + height - top_left, top_left, top_left, true));
        ops.push(ContentStreamOp::LineTo(x + width - top_right, y + height));
        ops.extend(quarter(90.0).path(x + width - top_right, y + height - top_right, top_right, top_right, true));
        ops.push(ContentStreamOp::LineTo(x + width, y + bottom_right));
        ops.extend(quarter(0.0).path(x + width - bottom_right, y + bottom_right, bottom_right, bottom_right, true));
        ops.push(ContentStreamOp::LineTo(x + bottom_left, y));
        ops.extend(quarter(-90.0).path(x + bottom_left, y + bottom_left, bottom_left, bottom_left, true));
        ops.push(ContentStreamOp::ClosePath);
        ops.push(self.ctx.fill_rule.clip_op());
        self.emit(ops)
    }

    /// Clip to a polygon.
    pub fn clipping_polygon(&mut self, points: &[(f32, f32)]) -> Result<()> {
        self.save()?;
        let Some(((x, y), rest)) = points.split_first() else {
            return Ok(());
        };
        let mut ops = vec![ContentStreamOp::MoveTo(*x, *y)];
        ops.extend(rest.iter().map(|&(x, y)| ContentStreamOp::LineTo(x, y)));
        ops.push(ContentStreamOp::ClosePath);
        ops.push(self.ctx.fill_rule.clip_op());
        self.emit(ops)
    }

    /// End the innermost clipping region.
    pub fn clipping_end(&mut self) -> Result<()> {
        self.restore()
    }

    // ---------------------------------------------------------------
    // Transforms
    // ---------------------------------------------------------------

    /// Concatenate a raw matrix `[a b c d e f]`.
    pub fn transform(&mut self, matrix: [f32; 6]) -> Result<()> {
        let [a, b, c, d, e, f] = matrix;
        self.emit([ContentStreamOp::Transform(a, b, c, d, e, f)])
    }

    /// Scale around `(x, y)`.
    pub fn scale(&mut self, sx: f32, sy: f32, x: f32, y: f32) -> Result<()> {
        self.transform([sx, 0.0, 0.0, sy, x * (1.0 - sx), y * (1.0 - sy)])
    }

    /// Move the origin.
    pub fn translate(&mut self, tx: f32, ty: f32) -> Result<()> {
        self.transform([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// Rotate counterclockwise around `(x, y)`.
    pub fn rotate(&mut self, degrees: f32, x: f32, y: f32) -> Result<()> {
        self.transform(rotation_about(degrees, x, y))
    }

    /// Skew by angles in degrees around `(x, y)`.
    pub fn skew(&mut self, angle_x: f32, angle_y: f32, x: f32, y: f32) -> Result<()> {
        let tan_x = (angle_x * PI / 180.0).tan();
        let tan_y = (angle_y * PI / 180.0).tan();
        self.transform([1.0, tan_y, tan_x, 1.0, -tan_x * y, -tan_y * x])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::content_stream::LineCap;
    use crate::store::ObjectKind;

    fn drawn(writer: &PdfWriter) -> String {
        let id = writer.current_contents();
        String::from_utf8(writer.store().contents(id).unwrap().data.clone()).unwrap()
    }

    #[test]
    fn test_color_cache() {
        let mut writer = PdfWriter::new();
        writer.set_color(Color::rgb(0.5, 0.0, 0.0)).unwrap();
        writer.set_color(Color::rgb(0.5, 0.0, 0.0)).unwrap();
        writer.set_stroke_color(Color::Cmyk(0.0, 0.0, 0.0, 1.0)).unwrap();
        assert_eq!(drawn(&writer), "\n0.5 0 0 rg\n0 0 0 1 K");
        writer.set_color_forced(Color::rgb(0.5, 0.0, 0.0)).unwrap();
        assert!(drawn(&writer).ends_with("\n0.5 0 0 rg\n0 0 0 1 K\n0.5 0 0 rg"));
    }

    #[test]
    fn test_save_clears_color_cache() {
        let mut writer = PdfWriter::new();
        writer.set_color(Color::Gray(0.2)).unwrap();
        writer.save().unwrap();
        writer.set_color(Color::Gray(0.2)).unwrap();
        writer.restore().unwrap();
        assert_eq!(drawn(&writer), "\n0.2 g\nq\n0.2 g\nQ");
        assert!(matches!(writer.restore(), Err(Error::EmptyStateStack)));
    }

    #[test]
    fn test_fill_rule_selects_operators() {
        let mut writer = PdfWriter::new();
        writer.filled_rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
        writer.set_fill_rule(FillRule::EvenOdd);
        writer.filled_rectangle(0.0, 0.0, 10.0, 10.0).unwrap();
        writer.clipping_rectangle(1.0, 1.0, 5.0, 5.0).unwrap();
        writer.clipping_end().unwrap();
        assert_eq!(
            drawn(&writer),
            "\n0 0 10 10 re\nf\n0 0 10 10 re\nf*\nq\n1 1 5 5 re\nW* n\nQ"
        );
    }

    #[test]
    fn test_line_style_and_line() {
        let mut writer = PdfWriter::new();
        writer
            .set_line_style(LineStyle::new(1.5).with_cap(LineCap::Round).with_dash(vec![3.0, 1.0], 0.0))
            .unwrap();
        writer.line(0.0, 0.0, 100.0, 50.0).unwrap();
        assert_eq!(drawn(&writer), "\n1.5 w\n1 J\n[3 1] 0 d\n0 0 m\n100 50 l\nS");
    }

    #[test]
    fn test_non_finite_coordinates_are_rejected() {
        let mut writer = PdfWriter::new();
        writer.line(0.0, 0.0, 10.0, 10.0).unwrap();
        let before = drawn(&writer);
        assert!(matches!(
            writer.line(f32::NAN, 0.0, f32::INFINITY, 1.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            writer.set_line_style(LineStyle::new(1.0).with_dash(vec![f32::NEG_INFINITY], 0.0)),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(drawn(&writer), before);
        assert!(!before.contains("NaN") && !before.contains("inf"));
    }

    #[test]
    fn test_ellipse_uses_eight_segments() {
        let mut writer = PdfWriter::new();
        writer.ellipse(100.0, 100.0, 50.0, 0.0).unwrap();
        let out = drawn(&writer);
        assert!(out.starts_with("\n150 100 m"));
        assert_eq!(out.matches(" c").count(), 8);
        assert!(out.ends_with("\ns"));

        let mut writer = PdfWriter::new();
        writer.filled_ellipse(0.0, 0.0, 10.0, 5.0).unwrap();
        assert!(drawn(&writer).ends_with("\nh\nf"));
    }

    #[test]
    fn test_part_ellipse_is_open() {
        let mut writer = PdfWriter::new();
        writer.part_ellipse(0.0, 0.0, 10.0, 10.0, 0.0, 90.0).unwrap();
        let out = drawn(&writer);
        assert!(out.starts_with("\n10 0 m"));
        assert!(out.ends_with("\n0 10 c\nS"));
    }

    #[test]
    fn test_rounded_clip_has_four_corners() {
        let mut writer = PdfWriter::new();
        writer
            .clipping_rectangle_rounded(0.0, 0.0, 100.0, 50.0, 5.0, 5.0, 5.0, 5.0)
            .unwrap();
        let out = drawn(&writer);
        assert!(out.starts_with("\nq\n0 45 m"));
        assert_eq!(out.matches(" c").count(), 8);
        assert!(out.ends_with("\nh\nW n"));
    }

    #[test]
    fn test_transforms() {
        let mut writer = PdfWriter::new();
        writer.translate(10.0, 20.0).unwrap();
        writer.scale(2.0, 2.0, 0.0, 0.0).unwrap();
        writer.rotate(90.0, 0.0, 0.0).unwrap();
        assert_eq!(
            drawn(&writer),
            "\n1 0 0 1 10 20 cm\n2 0 0 2 0 0 cm\n0 1 -1 0 0 0 cm"
        );
    }

    #[test]
    fn test_transparency_dedupes_ext_gstate() {
        let mut writer = PdfWriter::new();
        writer.set_fill_transparency(BlendMode::Multiply, 0.5).unwrap();
        writer.set_fill_transparency(BlendMode::Multiply, 0.5).unwrap();
        writer.set_line_transparency(BlendMode::Normal, 0.5).unwrap();
        assert_eq!(writer.store().count_kind(ObjectKind::ExtGState), 2);
        assert_eq!(drawn(&writer), "\n/GS1 gs\n/GS1 gs\n/GS2 gs");
    }

    #[test]
    fn test_polygon() {
        let mut writer = PdfWriter::new();
        writer.polygon(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)], false).unwrap();
        assert_eq!(drawn(&writer), "\n0 0 m\n10 0 l\n5 8 l\ns");
    }

    #[test]
    fn test_path_construction() {
        let mut writer = PdfWriter::new();
        writer.move_to(0.0, 0.0).unwrap();
        writer.line_to(10.0, 0.0).unwrap();
        writer.curve_to(12.0, 2.0, 12.0, 8.0, 10.0, 10.0).unwrap();
        writer.close_path().unwrap();
        writer.fill_stroke().unwrap();
        writer.move_to(20.0, 0.0).unwrap();
        writer.line_to(30.0, 5.0).unwrap();
        writer.close_path_stroke().unwrap();
        assert_eq!(
            drawn(&writer),
            "\n0 0 m\n10 0 l\n12 2 12 8 10 10 c\nh\nB\n20 0 m\n30 5 l\ns"
        );
    }

    #[test]
    fn test_clipping_polygon_even_odd() {
        let mut writer = PdfWriter::new();
        writer.set_fill_rule(FillRule::EvenOdd);
        writer.clipping_polygon(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]).unwrap();
        writer.clipping_end().unwrap();
        assert_eq!(drawn(&writer), "\nq\n0 0 m\n10 0 l\n5 8 l\nh\nW* n\nQ");
    }

    #[test]
    fn test_skew() {
        let mut writer = PdfWriter::new();
        writer.skew(45.0, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(drawn(&writer), "\n1 0 1 1 0 0 cm");
    }
}
