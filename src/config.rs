use std::path::PathBuf;

use crate::inventory::default_external_services;
use crate::layout::LayoutConfig;
use crate::model::{ExternalServiceRecord, RelationshipEdge};
use crate::relationships::default_relationships;

pub const DEFAULT_INVENTORY: &str = "docker_containers.txt";
pub const DEFAULT_EXTERNAL: &str = "external_services.json";
pub const DEFAULT_OUTPUT: &str = "current_infrastructure.png";

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: String,
    pub text: String,
    pub border: String,
    pub local_fill: String,
    pub external_fill: String,
    pub warning: String,
    pub edge: String,
    pub alert_edge: String,
    pub footer: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "white".into(),
            text: "black".into(),
            border: "black".into(),
            local_fill: "#e8f4ff".into(),
            external_fill: "#fff3cd".into(),
            warning: "red".into(),
            edge: "black".into(),
            alert_edge: "red".into(),
            footer: "gray".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    pub family: String,
    pub title_size: f32,
    pub body_size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "DejaVu Sans".into(),
            title_size: 16.0,
            body_size: 12.0,
        }
    }
}

/// Everything one render run needs. `Default` reproduces the fixed-path tool.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub inventory_path: PathBuf,
    pub external_path: PathBuf,
    pub output_path: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub title: String,
    /// Footer override; `None` builds the default note naming `external_path`.
    pub footer: Option<String>,
    pub image_limit: usize,
    pub ports_limit: usize,
    pub border_width: f32,
    pub edge_width: f32,
    pub arrow_length: f32,
    pub palette: Palette,
    pub fonts: FontConfig,
    pub layout: LayoutConfig,
    pub relationships: Vec<RelationshipEdge>,
    pub default_external: Vec<ExternalServiceRecord>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            inventory_path: PathBuf::from(DEFAULT_INVENTORY),
            external_path: PathBuf::from(DEFAULT_EXTERNAL),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            canvas_width: 1600,
            canvas_height: 1000,
            title: "Current infrastructure (generated)".into(),
            footer: None,
            image_limit: 60,
            ports_limit: 80,
            border_width: 2.0,
            edge_width: 2.0,
            arrow_length: 12.0,
            palette: Palette::default(),
            fonts: FontConfig::default(),
            layout: LayoutConfig::default(),
            relationships: default_relationships(),
            default_external: default_external_services(),
        }
    }
}

impl RenderConfig {
    pub fn footer_text(&self) -> String {
        match &self.footer {
            Some(text) => text.clone(),
            None => format!(
                "Note: auto-generated; external services may be placeholders. Provide {} for accurate info.",
                self.external_path.display()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_footer_names_external_path() {
        let cfg = RenderConfig {
            external_path: PathBuf::from("/srv/ext.json"),
            ..Default::default()
        };
        assert!(cfg.footer_text().contains("Provide /srv/ext.json for accurate info."));
    }

    #[test]
    fn footer_override_wins() {
        let cfg = RenderConfig {
            footer: Some("draft".into()),
            ..Default::default()
        };
        assert_eq!(cfg.footer_text(), "draft");
    }

    #[test]
    fn defaults_match_fixed_canvas() {
        let cfg = RenderConfig::default();
        assert_eq!((cfg.canvas_width, cfg.canvas_height), (1600, 1000));
        assert_eq!(cfg.relationships.len(), 8);
        assert_eq!(cfg.default_external.len(), 3);
    }
}
