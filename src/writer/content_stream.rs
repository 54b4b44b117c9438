//! PDF content stream builder.
//!
//! Drawing calls are turned into [`ContentStreamOp`] values and encoded as
//! operator text. Every operator starts on its own line, so appending the
//! encoded bytes of successive calls to a contents object keeps the stream
//! well formed.

use std::io::Write;

use crate::writer::object_serializer::hex_upper;

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Concatenate a matrix onto the CTM (cm)
    Transform(f32, f32, f32, f32, f32, f32),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font resource and size (Tf)
    SetFont(String, f32),
    /// Move text position (Td)
    MoveText(f32, f32),
    /// Set text matrix (Tm)
    SetTextMatrix(f32, f32, f32, f32, f32, f32),
    /// Show single-byte text as a literal string (Tj)
    ShowText(Vec<u8>),
    /// Show two-byte codes as a hex string (Tj)
    ShowHexText(Vec<u8>),
    /// Show text with positioning adjustments (TJ)
    ShowTextArray(Vec<TextArrayItem>),
    /// Set character spacing (Tc)
    SetCharacterSpacing(f32),
    /// Set word spacing (Tw)
    SetWordSpacing(f32),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f32, f32, f32),
    /// Set stroke color RGB (RG)
    SetStrokeColorRGB(f32, f32, f32),
    /// Set fill color CMYK (k)
    SetFillColorCMYK(f32, f32, f32, f32),
    /// Set stroke color CMYK (K)
    SetStrokeColorCMYK(f32, f32, f32, f32),
    /// Set fill color gray (g)
    SetFillColorGray(f32),
    /// Set stroke color gray (G)
    SetStrokeColorGray(f32),
    /// Set line width (w)
    SetLineWidth(f32),
    /// Set line cap style (J)
    SetLineCap(LineCap),
    /// Set line join style (j)
    SetLineJoin(LineJoin),
    /// Set dash pattern (d)
    SetDashPattern(Vec<f32>, f32),
    /// Move to (m)
    MoveTo(f32, f32),
    /// Line to (l)
    LineTo(f32, f32),
    /// Curve to (c)
    CurveTo(f32, f32, f32, f32, f32, f32),
    /// Rectangle (re)
    Rectangle(f32, f32, f32, f32),
    /// Close path (h)
    ClosePath,
    /// Stroke (S)
    Stroke,
    /// Close and stroke (s)
    CloseStroke,
    /// Fill (f)
    Fill,
    /// Fill using even-odd rule (f*)
    FillEvenOdd,
    /// Fill and stroke (B)
    FillStroke,
    /// Fill and stroke using even-odd rule (B*)
    FillStrokeEvenOdd,
    /// End path without filling or stroking (n)
    EndPath,
    /// Clip using non-zero winding rule (W)
    Clip,
    /// Clip using even-odd rule (W*)
    ClipEvenOdd,
    /// Paint XObject (Do)
    PaintXObject(String),
    /// Set graphics state from an ExtGState resource (gs)
    SetExtGState(String),
}

/// Item in a TJ array.
#[derive(Debug, Clone, PartialEq)]
pub enum TextArrayItem {
    /// Single-byte text, written as a literal string
    Text(Vec<u8>),
    /// Two-byte codes, written as a hex string
    HexText(Vec<u8>),
    /// Position adjustment in thousandths of text space
    Adjustment(i32),
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LineCap {
    /// Butt cap
    #[default]
    Butt = 0,
    /// Round cap
    Round = 1,
    /// Projecting square cap
    Square = 2,
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LineJoin {
    /// Miter join
    #[default]
    Miter = 0,
    /// Round join
    Round = 1,
    /// Bevel join
    Bevel = 2,
}

impl ContentStreamOp {
    /// Whether every numeric operand is a finite number.
    pub fn is_finite(&self) -> bool {
        use ContentStreamOp::*;
        let all = |values: &[f32]| values.iter().all(|v| v.is_finite());
        match self {
            Transform(a, b, c, d, e, f)
            | SetTextMatrix(a, b, c, d, e, f)
            | CurveTo(a, b, c, d, e, f) => all(&[*a, *b, *c, *d, *e, *f]),
            SetFillColorCMYK(a, b, c, d) | SetStrokeColorCMYK(a, b, c, d) | Rectangle(a, b, c, d) => {
                all(&[*a, *b, *c, *d])
            },
            SetFillColorRGB(a, b, c) | SetStrokeColorRGB(a, b, c) => all(&[*a, *b, *c]),
            MoveText(a, b) | MoveTo(a, b) | LineTo(a, b) => all(&[*a, *b]),
            SetFont(_, v)
            | SetCharacterSpacing(v)
            | SetWordSpacing(v)
            | SetFillColorGray(v)
            | SetStrokeColorGray(v)
            | SetLineWidth(v) => v.is_finite(),
            SetDashPattern(pattern, phase) => phase.is_finite() && all(pattern),
            SaveState | RestoreState | BeginText | EndText | ShowText(_) | ShowHexText(_)
            | ShowTextArray(_) | SetLineCap(_) | SetLineJoin(_) | ClosePath | Stroke | CloseStroke
            | Fill | FillEvenOdd | FillStroke | FillStrokeEvenOdd | EndPath | Clip | ClipEvenOdd
            | PaintXObject(_) | SetExtGState(_) => true,
        }
    }
}

/// Format a number with at most 3 decimals, trailing zeros removed.
pub fn fmt_num(value: f32) -> String {
    let formatted = format!("{:.3}", value);
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Builder collecting operators for one drawing call.
#[derive(Debug, Clone, Default)]
pub struct ContentStreamBuilder {
    ops: Vec<ContentStreamOp>,
}

impl ContentStreamBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw operation.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// Add several operations.
    pub fn ops<I: IntoIterator<Item = ContentStreamOp>>(&mut self, ops: I) -> &mut Self {
        self.ops.extend(ops);
        self
    }

    /// Whether no operation has been added.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Encode every collected operation, each preceded by a newline.
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for op in &self.ops {
            buf.push(b'\n');
            // Writing into a Vec cannot fail.
            let _ = write_op(&mut buf, op);
        }
        buf
    }
}

/// Encode a single operation.
pub fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    let n = fmt_num;
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::Transform(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} cm", n(*a), n(*b), n(*c), n(*d), n(*e), n(*f))
        },
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, n(*size)),
        ContentStreamOp::MoveText(tx, ty) => write!(w, "{} {} Td", n(*tx), n(*ty)),
        ContentStreamOp::SetTextMatrix(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} Tm", n(*a), n(*b), n(*c), n(*d), n(*e), n(*f))
        },
        ContentStreamOp::ShowText(text) => {
            write_literal(w, text)?;
            write!(w, " Tj")
        },
        ContentStreamOp::ShowHexText(codes) => write!(w, "<{}> Tj", hex_upper(codes)),
        ContentStreamOp::ShowTextArray(items) => {
            write!(w, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(w, " ")?;
                }
                match item {
                    TextArrayItem::Text(t) => write_literal(w, t)?,
                    TextArrayItem::HexText(codes) => write!(w, "<{}>", hex_upper(codes))?,
                    TextArrayItem::Adjustment(adj) => write!(w, "{}", adj)?,
                }
            }
            write!(w, "] TJ")
        },
        ContentStreamOp::SetCharacterSpacing(spacing) => write!(w, "{} Tc", n(*spacing)),
        ContentStreamOp::SetWordSpacing(spacing) => write!(w, "{} Tw", n(*spacing)),
        ContentStreamOp::SetFillColorRGB(r, g, b) => write!(w, "{} {} {} rg", n(*r), n(*g), n(*b)),
        ContentStreamOp::SetStrokeColorRGB(r, g, b) => {
            write!(w, "{} {} {} RG", n(*r), n(*g), n(*b))
        },
        ContentStreamOp::SetFillColorCMYK(c, m, y, k) => {
            write!(w, "{} {} {} {} k", n(*c), n(*m), n(*y), n(*k))
        },
        ContentStreamOp::SetStrokeColorCMYK(c, m, y, k) => {
            write!(w, "{} {} {} {} K", n(*c), n(*m), n(*y), n(*k))
        },
        ContentStreamOp::SetFillColorGray(g) => write!(w, "{} g", n(*g)),
        ContentStreamOp::SetStrokeColorGray(g) => write!(w, "{} G", n(*g)),
        ContentStreamOp::SetLineWidth(width) => write!(w, "{} w", n(*width)),
        ContentStreamOp::SetLineCap(cap) => write!(w, "{} J", *cap as u8),
        ContentStreamOp::SetLineJoin(join) => write!(w, "{} j", *join as u8),
        ContentStreamOp::SetDashPattern(pattern, phase) => {
            write!(w, "[")?;
            for (i, p) in pattern.iter().enumerate() {
                if i > 0 {
                    write!(w, " ")?;
                }
                write!(w, "{}", n(*p))?;
            }
            write!(w, "] {} d", n(*phase))
        },
        ContentStreamOp::MoveTo(x, y) => write!(w, "{} {} m", n(*x), n(*y)),
        ContentStreamOp::LineTo(x, y) => write!(w, "{} {} l", n(*x), n(*y)),
        ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3) => write!(
            w,
            "{} {} {} {} {} {} c",
            n(*x1),
            n(*y1),
            n(*x2),
            n(*y2),
            n(*x3),
            n(*y3)
        ),
        ContentStreamOp::Rectangle(x, y, w_val, h) => {
            write!(w, "{} {} {} {} re", n(*x), n(*y), n(*w_val), n(*h))
        },
        ContentStreamOp::ClosePath => write!(w, "h"),
        ContentStreamOp::Stroke => write!(w, "S"),
        ContentStreamOp::CloseStroke => write!(w, "s"),
        ContentStreamOp::Fill => write!(w, "f"),
        ContentStreamOp::FillEvenOdd => write!(w, "f*"),
        ContentStreamOp::FillStroke => write!(w, "B"),
        ContentStreamOp::FillStrokeEvenOdd => write!(w, "B*"),
        ContentStreamOp::EndPath => write!(w, "n"),
        ContentStreamOp::Clip => write!(w, "W n"),
        ContentStreamOp::ClipEvenOdd => write!(w, "W* n"),
        ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
        ContentStreamOp::SetExtGState(name) => write!(w, "/{} gs", name),
    }
}

/// Write a literal string with `(`, `)` and `\` escaped.
fn write_literal<W: Write>(w: &mut W, text: &[u8]) -> std::io::Result<()> {
    write!(w, "(")?;
    for &byte in text {
        match byte {
            b'(' => write!(w, "\\(")?,
            b')' => write!(w, "\\)")?,
            b'\\' => write!(w, "\\\\")?,
            b'\r' => write!(w, "\\r")?,
            _ => w.write_all(&[byte])?,
        }
    }
    write!(w, ")")
}
