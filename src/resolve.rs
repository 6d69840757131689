use crate::layout::PositionMap;
use crate::model::Point;

/// Look up a relationship endpoint among placed entities.
///
/// An exact name wins; otherwise the first entity in placement order whose
/// name starts with `name` is used. Hand-written endpoint names are often
/// shorter than the generated instance names they refer to
/// (`st2-docker-st2api` vs `st2-docker-st2api-1`).
pub fn resolve(name: &str, positions: &PositionMap) -> Option<Point> {
    positions.get(name).or_else(|| {
        positions
            .iter()
            .find(|(candidate, _)| candidate.starts_with(name))
            .map(|(_, point)| point)
    })
}
