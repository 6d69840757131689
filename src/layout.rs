use indexmap::IndexMap;
use tracing::debug;

use crate::model::{BoxRect, ComponentRecord, ExternalServiceRecord, Point};

/// Fixed tiling constants for both tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub origin_x: f32,
    pub origin_y: f32,
    pub box_width: f32,
    pub box_height: f32,
    pub column_gap: f32,
    pub row_height: f32,
    pub rows_per_column: usize,
    /// Local columns reserved to the left of the external tier.
    pub reserved_columns: usize,
    pub external_gap: f32,
    pub external_box_width: f32,
    pub external_box_height: f32,
    pub external_spacing: f32,
    pub external_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 20.0,
            origin_y: 60.0,
            box_width: 480.0,
            box_height: 78.0,
            column_gap: 20.0,
            row_height: 90.0,
            rows_per_column: 8,
            reserved_columns: 2,
            external_gap: 40.0,
            external_box_width: 380.0,
            external_box_height: 100.0,
            external_spacing: 40.0,
            external_margin: 40.0,
        }
    }
}

impl LayoutConfig {
    pub fn external_x(&self) -> f32 {
        self.origin_x
            + self.reserved_columns as f32 * (self.box_width + self.column_gap)
            + self.external_gap
    }

    /// Height of a stacked block of `count` external boxes.
    pub fn external_block_height(&self, count: usize) -> f32 {
        let gaps = count.saturating_sub(1);
        count as f32 * self.external_box_height + gaps as f32 * self.external_spacing
    }
}

/// Entity name to center point, in placement order.
///
/// Re-inserting a name overwrites its point but keeps its original position
/// in iteration order (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionMap {
    points: IndexMap<String, Point>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, point: Point) -> Option<Point> {
        self.points.insert(name.to_string(), point)
    }

    pub fn get(&self, name: &str) -> Option<Point> {
        self.points.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.points.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBox {
    pub name: String,
    pub rect: BoxRect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub local: Vec<PlacedBox>,
    pub external: Vec<PlacedBox>,
    pub positions: PositionMap,
}

impl Layout {
    /// Names whose center falls outside a `width` x `height` canvas.
    pub fn out_of_bounds(&self, width: f32, height: f32) -> Vec<&str> {
        self.positions
            .iter()
            .filter(|(_, p)| p.x < 0.0 || p.y < 0.0 || p.x > width || p.y > height)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Column and row of the `index`-th local component.
pub fn grid_cell(index: usize, config: &LayoutConfig) -> (usize, usize) {
    let per_col = config.rows_per_column.max(1);
    (index / per_col, index % per_col)
}

pub fn local_box(index: usize, config: &LayoutConfig) -> BoxRect {
    let (col, row) = grid_cell(index, config);
    BoxRect {
        x: config.origin_x + col as f32 * (config.box_width + config.column_gap),
        y: config.origin_y + row as f32 * config.row_height,
        width: config.box_width,
        height: config.box_height,
    }
}

/// Vertical span `[top, bottom]` covered by the local boxes centered at `centers`.
pub fn local_span<I>(centers: I, config: &LayoutConfig) -> Option<(f32, f32)>
where
    I: IntoIterator<Item = Point>,
{
    let half = (config.box_height as i64 / 2) as f32;
    let mut span: Option<(f32, f32)> = None;
    for p in centers {
        span = Some(match span {
            None => (p.y, p.y),
            Some((lo, hi)) => (lo.min(p.y), hi.max(p.y)),
        });
    }
    span.map(|(min_c, max_c)| (min_c - half, max_c + half))
}

/// Top edge of the external block: centered inside the local span when it
/// fits, otherwise stacked below it.
pub fn external_start_y(span: Option<(f32, f32)>, count: usize, config: &LayoutConfig) -> f32 {
    let Some((top, bottom)) = span else {
        return config.origin_y;
    };

    let available = bottom - top;
    let block = config.external_block_height(count);
    if block <= available {
        let y = (top + (available - block) / 2.0).trunc();
        y.max(config.origin_y)
    } else {
        (bottom + config.external_margin).trunc()
    }
}

pub fn compute(
    components: &[ComponentRecord],
    services: &[ExternalServiceRecord],
    config: &LayoutConfig,
) -> Layout {
    let mut positions = PositionMap::new();

    let local: Vec<PlacedBox> = components
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let rect = local_box(i, config);
            if positions.insert(&c.name, rect.center()).is_some() {
                debug!(name = %c.name, "duplicate component name, later position wins");
            }
            PlacedBox {
                name: c.name.clone(),
                rect,
            }
        })
        .collect();

    let span = local_span(positions.iter().map(|(_, p)| p), config);
    let start_y = external_start_y(span, services.len(), config);
    debug!(?span, start_y, count = services.len(), "placing external services");

    let ext_x = config.external_x();
    let stride = config.external_box_height + config.external_spacing;
    let external: Vec<PlacedBox> = services
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let rect = BoxRect {
                x: ext_x,
                y: start_y + i as f32 * stride,
                width: config.external_box_width,
                height: config.external_box_height,
            };
            positions.insert(&s.name, rect.center());
            PlacedBox {
                name: s.name.clone(),
                rect,
            }
        })
        .collect();

    Layout {
        local,
        external,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServiceType;
    use pretty_assertions::assert_eq;

    fn components(n: usize) -> Vec<ComponentRecord> {
        (0..n)
            .map(|i| ComponentRecord {
                name: format!("c{i}"),
                ..Default::default()
            })
            .collect()
    }

    fn services(n: usize) -> Vec<ExternalServiceRecord> {
        (0..n)
            .map(|i| ExternalServiceRecord::new(&format!("s{i}"), ServiceType::External, "", ""))
            .collect()
    }

    #[test]
    fn grid_cells_wrap_after_rows_per_column() {
        let cfg = LayoutConfig::default();
        assert_eq!(grid_cell(0, &cfg), (0, 0));
        assert_eq!(grid_cell(7, &cfg), (0, 7));
        assert_eq!(grid_cell(8, &cfg), (1, 0));
        assert_eq!(grid_cell(17, &cfg), (2, 1));
    }

    #[test]
    fn local_boxes_follow_fixed_pixel_grid() {
        let cfg = LayoutConfig::default();
        let layout = compute(&components(10), &[], &cfg);

        assert_eq!(layout.local[0].rect, BoxRect::new(20.0, 60.0, 480.0, 78.0));
        assert_eq!(layout.local[1].rect.y, 150.0);
        assert_eq!(layout.local[8].rect.x, 520.0);
        assert_eq!(layout.local[8].rect.y, 60.0);
        assert_eq!(layout.positions.get("c0"), Some(Point::new(260.0, 99.0)));
    }

    #[test]
    fn local_boxes_never_overlap() {
        let cfg = LayoutConfig::default();
        let layout = compute(&components(20), &[], &cfg);
        for (i, a) in layout.local.iter().enumerate() {
            for b in &layout.local[i + 1..] {
                assert!(!a.rect.overlaps(&b.rect), "{} overlaps {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn box_height_leaves_vertical_padding() {
        let cfg = LayoutConfig::default();
        assert!(cfg.box_height < cfg.row_height);
    }

    #[test]
    fn no_components_puts_externals_at_top_margin() {
        let cfg = LayoutConfig::default();
        let layout = compute(&[], &services(3), &cfg);
        assert_eq!(layout.external[0].rect.y, cfg.origin_y);
        assert_eq!(layout.external[1].rect.y, cfg.origin_y + 140.0);
    }

    #[test]
    fn externals_centered_when_block_fits() {
        let cfg = LayoutConfig::default();
        // 8 rows: span 60..768 (708 high); block of 3 is 380 high.
        let layout = compute(&components(8), &services(3), &cfg);
        assert_eq!(layout.external[0].rect.y, 60.0 + ((708.0 - 380.0) / 2.0));
        assert_eq!(layout.external[0].rect.x, 1060.0);
    }

    #[test]
    fn centered_start_is_half_the_slack() {
        let cfg = LayoutConfig::default();
        let (top, bottom) = (100.0, 900.0);
        let block = cfg.external_block_height(4);
        let y = external_start_y(Some((top, bottom)), 4, &cfg);
        assert_eq!(y, top + ((bottom - top) - block) / 2.0);
    }

    #[test]
    fn centered_start_is_clamped_to_top_margin() {
        let cfg = LayoutConfig::default();
        // Exact fit: slack is zero, start would be 10 which is above origin_y.
        let block = cfg.external_block_height(1);
        let y = external_start_y(Some((10.0, 10.0 + block)), 1, &cfg);
        assert_eq!(y, cfg.origin_y);
    }

    #[test]
    fn externals_stack_below_when_block_too_tall() {
        let cfg = LayoutConfig::default();
        // 2 rows: span 60..228 (168 high); block of 3 is 380 high.
        let layout = compute(&components(2), &services(3), &cfg);
        let local_bottom = 228.0;
        assert_eq!(layout.external[0].rect.y, local_bottom + cfg.external_margin);
        for b in &layout.local {
            for e in &layout.external {
                assert!(!b.rect.overlaps(&e.rect));
            }
        }
    }

    #[test]
    fn external_boxes_never_overlap() {
        let cfg = LayoutConfig::default();
        let layout = compute(&components(5), &services(6), &cfg);
        for (i, a) in layout.external.iter().enumerate() {
            for b in &layout.external[i + 1..] {
                assert!(!a.rect.overlaps(&b.rect));
                assert!(b.rect.y - a.rect.y >= cfg.external_box_height + cfg.external_spacing);
            }
        }
    }

    #[test]
    fn block_height_of_zero_and_one() {
        let cfg = LayoutConfig::default();
        assert_eq!(cfg.external_block_height(0), 0.0);
        assert_eq!(cfg.external_block_height(1), 100.0);
        assert_eq!(cfg.external_block_height(3), 380.0);
    }

    #[test]
    fn duplicate_names_last_write_wins() {
        let cfg = LayoutConfig::default();
        let mut comps = components(3);
        comps[2].name = "c0".into();
        let layout = compute(&comps, &[], &cfg);

        assert_eq!(layout.local.len(), 3);
        assert_eq!(layout.positions.len(), 2);
        assert_eq!(layout.positions.get("c0"), Some(layout.local[2].rect.center()));
        let order: Vec<&str> = layout.positions.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["c0", "c1"]);
    }

    #[test]
    fn typical_layout_stays_on_canvas() {
        let cfg = LayoutConfig::default();
        let layout = compute(&components(16), &services(3), &cfg);
        assert!(layout.out_of_bounds(1600.0, 1000.0).is_empty());
    }

    #[test]
    fn overflowing_layout_is_reported() {
        let cfg = LayoutConfig::default();
        let layout = compute(&components(2), &services(8), &cfg);
        let off = layout.out_of_bounds(1600.0, 1000.0);
        assert!(off.contains(&"s7"), "got {off:?}");
        assert!(!off.contains(&"c0"));
    }
}
