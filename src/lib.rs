pub mod canvas;
pub mod config;
pub mod error;
pub mod inventory;
pub mod layout;
pub mod model;
pub mod raster;
pub mod relationships;
pub mod renderer;
pub mod resolve;

use std::path::PathBuf;

use tracing::info;

pub use config::RenderConfig;
pub use error::{DiagramError, Result};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub output_path: PathBuf,
    pub components: usize,
    pub services: usize,
    pub arrows_drawn: usize,
    pub edges_dropped: usize,
}

/// Render the diagram to PNG bytes without touching the output path.
pub fn render_png(config: &RenderConfig) -> Result<(Vec<u8>, RenderSummary)> {
    let components = inventory::load_inventory(&config.inventory_path)?;
    let services =
        inventory::load_external_services(&config.external_path, &config.default_external);
    info!(
        components = components.len(),
        services = services.len(),
        "inputs loaded"
    );

    let scene = renderer::Scene {
        components: &components,
        services: &services,
        relationships: &config.relationships,
    };
    let output = renderer::render(&scene, config);
    let png = raster::to_png(&output.canvas, &config.fonts)?;

    let summary = RenderSummary {
        output_path: config.output_path.clone(),
        components: components.len(),
        services: services.len(),
        arrows_drawn: output.arrows_drawn,
        edges_dropped: output.edges_dropped,
    };
    Ok((png, summary))
}

/// Load inputs, lay out, draw, and write the image in one step.
pub fn generate(config: &RenderConfig) -> Result<RenderSummary> {
    let (png, summary) = render_png(config)?;
    raster::write_atomic(&config.output_path, &png)?;
    info!(
        path = %config.output_path.display(),
        bytes = png.len(),
        arrows = summary.arrows_drawn,
        "diagram written"
    );
    Ok(summary)
}
