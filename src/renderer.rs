use std::f32::consts::FRAC_PI_6;

use tracing::{debug, warn};

use crate::canvas::{Canvas, TextStyle};
use crate::config::RenderConfig;
use crate::layout::{self, Layout, PlacedBox};
use crate::model::{ComponentRecord, ExternalServiceRecord, Point, RelationshipEdge};
use crate::relationships::targets_missing;
use crate::resolve::resolve;

const TITLE_AT: (f32, f32) = (10.0, 8.0);
const FOOTER_X: f32 = 10.0;
const FOOTER_FROM_BOTTOM: f32 = 22.0;
const TEXT_INSET_X: f32 = 8.0;
const LINE_OFFSETS: [f32; 3] = [6.0, 28.0, 48.0];
const LABEL_OFFSET: (f32, f32) = (6.0, -6.0);

/// Inputs of one render pass.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub components: &'a [ComponentRecord],
    pub services: &'a [ExternalServiceRecord],
    pub relationships: &'a [RelationshipEdge],
}

#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub canvas: Canvas,
    pub layout: Layout,
    pub arrows_drawn: usize,
    pub edges_dropped: usize,
}

/// First `limit` characters of `s`.
pub fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Triangle for an arrowhead ending at `to`: the tip, then the two barbs
/// `length` back from it at 30 degrees either side of the line.
pub fn arrow_head(from: Point, to: Point, length: f32) -> [Point; 3] {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let barb = |a: f32| Point::new(to.x - length * a.cos(), to.y - length * a.sin());
    [to, barb(angle - FRAC_PI_6), barb(angle + FRAC_PI_6)]
}

/// Top-left corner of an edge label: the midpoint, nudged off the line.
pub fn label_anchor(from: Point, to: Point) -> Point {
    Point::new(
        (from.x + to.x) / 2.0 + LABEL_OFFSET.0,
        (from.y + to.y) / 2.0 + LABEL_OFFSET.1,
    )
}

struct Styles {
    title: TextStyle,
    body: TextStyle,
}

impl Styles {
    fn new(config: &RenderConfig) -> Self {
        let body = TextStyle {
            family: config.fonts.family.clone(),
            size: config.fonts.body_size,
            bold: false,
        };
        let title = TextStyle {
            size: config.fonts.title_size,
            bold: true,
            ..body.clone()
        };
        Self { title, body }
    }
}

pub fn render(scene: &Scene<'_>, config: &RenderConfig) -> RenderOutput {
    let layout = layout::compute(scene.components, scene.services, &config.layout);
    for name in layout.out_of_bounds(config.canvas_width as f32, config.canvas_height as f32) {
        warn!(name, "entity center falls outside the canvas");
    }

    let styles = Styles::new(config);
    let palette = &config.palette;
    let mut canvas = Canvas::new(config.canvas_width, config.canvas_height, &palette.background);

    canvas.text(
        Point::new(TITLE_AT.0, TITLE_AT.1),
        &config.title,
        &palette.text,
        &styles.title,
    );

    for (component, placed) in scene.components.iter().zip(&layout.local) {
        draw_component(&mut canvas, component, placed, config, &styles);
    }

    for (service, placed) in scene.services.iter().zip(&layout.external) {
        draw_service(&mut canvas, service, placed, config, &styles);
    }

    let mut arrows_drawn = 0;
    let mut edges_dropped = 0;
    for edge in scene.relationships {
        let src = resolve(&edge.source_name, &layout.positions);
        let dst = resolve(&edge.dest_name, &layout.positions);
        match (src, dst) {
            (Some(from), Some(to)) => {
                let color = if targets_missing(&edge.dest_name) {
                    &palette.alert_edge
                } else {
                    &palette.edge
                };
                draw_arrow(&mut canvas, from, to, &edge.label, color, config, &styles);
                arrows_drawn += 1;
            }
            _ => {
                debug!(src = %edge.source_name, dst = %edge.dest_name, "edge endpoint unresolved");
                edges_dropped += 1;
            }
        }
    }

    canvas.text(
        Point::new(FOOTER_X, config.canvas_height as f32 - FOOTER_FROM_BOTTOM),
        &config.footer_text(),
        &palette.footer,
        &styles.body,
    );

    RenderOutput {
        canvas,
        layout,
        arrows_drawn,
        edges_dropped,
    }
}

fn text_line(rect_x: f32, rect_y: f32, line: usize) -> Point {
    Point::new(rect_x + TEXT_INSET_X, rect_y + LINE_OFFSETS[line])
}

fn draw_component(
    canvas: &mut Canvas,
    component: &ComponentRecord,
    placed: &PlacedBox,
    config: &RenderConfig,
    styles: &Styles,
) {
    let palette = &config.palette;
    let r = placed.rect;
    canvas.rect(
        r,
        Some(palette.local_fill.as_str()),
        &palette.border,
        config.border_width,
    );
    canvas.text(text_line(r.x, r.y, 0), &component.name, &palette.text, &styles.body);
    canvas.text(
        text_line(r.x, r.y, 1),
        truncate_chars(&component.image, config.image_limit),
        &palette.text,
        &styles.body,
    );
    canvas.text(
        text_line(r.x, r.y, 2),
        truncate_chars(&component.ports, config.ports_limit),
        &palette.text,
        &styles.body,
    );
}

fn draw_service(
    canvas: &mut Canvas,
    service: &ExternalServiceRecord,
    placed: &PlacedBox,
    config: &RenderConfig,
    styles: &Styles,
) {
    let palette = &config.palette;
    let r = placed.rect;
    let name_color = if service.is_missing() {
        canvas.rect(r, None, &palette.warning, config.border_width);
        &palette.warning
    } else {
        canvas.rect(
            r,
            Some(palette.external_fill.as_str()),
            &palette.border,
            config.border_width,
        );
        &palette.text
    };
    canvas.text(text_line(r.x, r.y, 0), &service.name, name_color, &styles.body);
    canvas.text(
        text_line(r.x, r.y, 1),
        &format!("ip: {}", service.ip),
        &palette.text,
        &styles.body,
    );
    canvas.text(text_line(r.x, r.y, 2), &service.note, &palette.text, &styles.body);
}

fn draw_arrow(
    canvas: &mut Canvas,
    from: Point,
    to: Point,
    label: &str,
    color: &str,
    config: &RenderConfig,
    styles: &Styles,
) {
    canvas.line(from, to, color, config.edge_width);
    canvas.polygon(&arrow_head(from, to, config.arrow_length), color);
    if !label.is_empty() {
        canvas.text(label_anchor(from, to), label, color, &styles.body);
    }
}
