use std::path::Path;

use tracing::{debug, warn};
use winnow::combinator::separated;
use winnow::prelude::*;
use winnow::token::take_till;

use crate::error::{DiagramError, Result};
use crate::model::{ComponentRecord, ExternalServiceRecord, ServiceType};

const FIELD_SEPARATOR: char = '|';

/// Parse one inventory line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<ComponentRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // Splitting on `|` accepts any text; a lone field is the name.
    let parts = fields.parse(line).unwrap_or_else(|_| vec![line]);
    let field = |i: usize| parts.get(i).map(|s| s.to_string()).unwrap_or_default();

    Some(ComponentRecord {
        name: field(0),
        image: field(1),
        ports: field(2),
        status: field(3),
    })
}

fn fields<'s>(input: &mut &'s str) -> winnow::Result<Vec<&'s str>> {
    separated(1.., field_text, FIELD_SEPARATOR).parse_next(input)
}

fn field_text<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_till(0.., FIELD_SEPARATOR).parse_next(input)
}

/// Parse the whole inventory text, keeping line order.
pub fn parse_inventory(text: &str) -> Vec<ComponentRecord> {
    text.lines().filter_map(parse_line).collect()
}

/// Inverse of [`parse_line`] for records without `|` in their fields.
pub fn serialize_record(record: &ComponentRecord) -> String {
    [
        record.name.as_str(),
        record.image.as_str(),
        record.ports.as_str(),
        record.status.as_str(),
    ]
    .join("|")
}

pub fn load_inventory(path: &Path) -> Result<Vec<ComponentRecord>> {
    let text = std::fs::read_to_string(path).map_err(|source| DiagramError::InventoryRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_inventory(&text);
    debug!(path = %path.display(), count = records.len(), "loaded inventory");
    Ok(records)
}

pub fn parse_external_services(
    text: &str,
) -> std::result::Result<Vec<ExternalServiceRecord>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Load external services, substituting `defaults` when the file is absent or malformed.
pub fn load_external_services(
    path: &Path,
    defaults: &[ExternalServiceRecord],
) -> Vec<ExternalServiceRecord> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "external services unavailable, using defaults"
            );
            return defaults.to_vec();
        }
    };

    match parse_external_services(&text) {
        Ok(services) => {
            debug!(
                path = %path.display(),
                count = services.len(),
                "loaded external services"
            );
            services
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "external services malformed, using defaults"
            );
            defaults.to_vec()
        }
    }
}

pub fn default_external_services() -> Vec<ExternalServiceRecord> {
    vec![
        ExternalServiceRecord::new(
            "NetBox (remote)",
            ServiceType::External,
            "<vm-ip>",
            "inventory",
        ),
        ExternalServiceRecord::new(
            "Gluware (remote)",
            ServiceType::External,
            "<vm-ip>",
            "config mgmt",
        ),
        ExternalServiceRecord::new("Batfish (missing)", ServiceType::Missing, "", "not running"),
    ]
}
