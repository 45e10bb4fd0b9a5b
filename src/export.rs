//! One-shot picture export: render the scene for a fixed time and view,
//! write it as a PNG named after the timestamp.

use crate::catalog::PlanetCatalog;
use crate::raster::Canvas;
use crate::scene::{build_scene, Scene};
use crate::time::export_stamp;
use crate::view::ViewConfig;
use chrono::{DateTime, Utc};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PICTURE_WIDTH: u32 = 800;
pub const PICTURE_HEIGHT: u32 = 480;

const BACKGROUND: [u8; 3] = [255, 255, 255];
const OUTLINE_COLOR: [u8; 3] = [192, 192, 192];
const MARKER_RADIUS_PX: f64 = 6.0;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Rasterize a scene. Deterministic: identical scenes yield identical pixels.
pub fn render_scene(scene: &Scene, width: u32, height: u32) -> RgbaImage {
    let mut canvas = Canvas::new(width, height, scene.extent, BACKGROUND);

    // Outlines first so trails and markers draw over them.
    for trace in &scene.traces {
        if let Some(outline) = &trace.outline {
            canvas.dashed_polyline(outline, OUTLINE_COLOR, 4, 3);
        }
    }
    for trace in &scene.traces {
        if let Some(trail) = &trace.trail {
            canvas.polyline(trail, trace.color);
        }
        if trace.outline.is_some() {
            canvas.circle(trace.position, MARKER_RADIUS_PX, trace.color);
        } else {
            let radius = canvas.to_px_len(trace.body_radius).max(2.0);
            canvas.disc(trace.position, radius, trace.color);
        }
    }

    canvas.into_image()
}

/// Render the catalog at `time` under `view` and write
/// `<dir>/<YYYYMMDD_HHMMSS>.png`. Returns the written path.
pub fn export_picture(
    catalog: &PlanetCatalog,
    view: &ViewConfig,
    time: DateTime<Utc>,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let scene = build_scene(catalog, time, view);
    let image = render_scene(&scene, PICTURE_WIDTH, PICTURE_HEIGHT);

    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(format!("{}.png", export_stamp(time)));
    image.save(&path)?;
    log::info!("wrote {}", path.display());
    Ok(path)
}
