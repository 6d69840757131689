use std::fmt::Write as _;

use crate::model::{BoxRect, Point};

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub size: f32,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        rect: BoxRect,
        fill: Option<String>,
        stroke: String,
        stroke_width: f32,
    },
    Line {
        from: Point,
        to: Point,
        color: String,
        width: f32,
    },
    Polygon {
        points: Vec<Point>,
        fill: String,
    },
    Text {
        at: Point,
        content: String,
        color: String,
        style: TextStyle,
    },
}

/// Fixed-size drawing surface. Shapes are kept in draw order and only turned
/// into pixels by [`crate::raster`].
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: String,
    shapes: Vec<Shape>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: &str) -> Self {
        Self {
            width,
            height,
            background: background.to_string(),
            shapes: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn rect(&mut self, rect: BoxRect, fill: Option<&str>, stroke: &str, stroke_width: f32) {
        self.shapes.push(Shape::Rect {
            rect,
            fill: fill.map(str::to_string),
            stroke: stroke.to_string(),
            stroke_width,
        });
    }

    pub fn line(&mut self, from: Point, to: Point, color: &str, width: f32) {
        self.shapes.push(Shape::Line {
            from,
            to,
            color: color.to_string(),
            width,
        });
    }

    pub fn polygon(&mut self, points: &[Point], fill: &str) {
        self.shapes.push(Shape::Polygon {
            points: points.to_vec(),
            fill: fill.to_string(),
        });
    }

    /// Text anchored at its top-left corner.
    pub fn text(&mut self, at: Point, content: &str, color: &str, style: &TextStyle) {
        self.shapes.push(Shape::Text {
            at,
            content: content.to_string(),
            color: color.to_string(),
            style: style.clone(),
        });
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = write!(
            out,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.width,
            self.height,
            escape_xml_attr(&self.background)
        );
        for shape in &self.shapes {
            write_shape(&mut out, shape);
        }
        out.push_str("</svg>");
        out
    }
}

fn write_shape(out: &mut String, shape: &Shape) {
    match shape {
        Shape::Rect {
            rect,
            fill,
            stroke,
            stroke_width,
        } => {
            let fill = fill.as_deref().unwrap_or("none");
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                escape_xml_attr(fill),
                escape_xml_attr(stroke),
                stroke_width
            );
        }
        Shape::Line {
            from,
            to,
            color,
            width,
        } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                from.x,
                from.y,
                to.x,
                to.y,
                escape_xml_attr(color),
                width
            );
        }
        Shape::Polygon { points, fill } => {
            let pts = points
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(
                out,
                r#"<polygon points="{}" fill="{}"/>"#,
                pts,
                escape_xml_attr(fill)
            );
        }
        Shape::Text {
            at,
            content,
            color,
            style,
        } => {
            // Baseline sits one em below the requested top edge.
            let weight = if style.bold { "bold" } else { "normal" };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" fill="{}" font-family="{}, sans-serif" font-size="{}" font-weight="{}" xml:space="preserve">{}</text>"#,
                at.x,
                at.y + style.size,
                escape_xml_attr(color),
                escape_xml_attr(&style.family),
                style.size,
                weight,
                escape_xml_text(content)
            );
        }
    }
}

/// Whether XML 1.0 allows `c` anywhere in a document.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

pub fn escape_xml_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            c if !is_xml_char(c) => result.push(char::REPLACEMENT_CHARACTER),
            _ => result.push(c),
        }
    }
    result
}

pub fn escape_xml_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            c if !is_xml_char(c) => result.push(char::REPLACEMENT_CHARACTER),
            _ => result.push(c),
        }
    }
    result
}
