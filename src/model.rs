use serde::{Deserialize, Deserializer};

/// One running component from the inventory file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentRecord {
    pub name: String,
    pub image: String,
    pub ports: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Normal,
    Missing,
    #[default]
    #[serde(other)]
    External,
}

/// A dependency outside the local inventory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalServiceRecord {
    pub name: String,
    #[serde(rename = "type", default)]
    pub service_type: ServiceType,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ip: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ExternalServiceRecord {
    pub fn new(name: &str, service_type: ServiceType, ip: &str, note: &str) -> Self {
        Self {
            name: name.to_string(),
            service_type,
            ip: ip.to_string(),
            note: note.to_string(),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.service_type == ServiceType::Missing
    }
}

/// A directed, labeled interaction between two named entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEdge {
    pub source_name: String,
    pub dest_name: String,
    pub label: String,
}

impl RelationshipEdge {
    pub fn new(source_name: &str, dest_name: &str, label: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            dest_name: dest_name.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in canvas units, `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoxRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center using integer half-extents, so centers land on whole pixels.
    pub fn center(&self) -> Point {
        let half_w = (self.width as i64 / 2) as f32;
        let half_h = (self.height as i64 / 2) as f32;
        Point::new(self.x + half_w, self.y + half_h)
    }

    pub fn overlaps(&self, other: &BoxRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
