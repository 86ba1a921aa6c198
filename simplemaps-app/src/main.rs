use anyhow::Context;
use async_trait::async_trait;
use log::info;
use simplemaps::{
    objects::{style::Color, Label, LineString, Point as PointMarker, Polygon},
    Coordinate, MapEngine, MapEngineOptions, MapEvent, MapObject, RasterRequest, Rasterizer,
    TileCoord, TileMetadata, TileProvider, TileRenderer,
};
use std::sync::Arc;

/// Writes a one-line text summary per tile instead of pixels
struct SummaryRasterizer;

#[async_trait]
impl Rasterizer for SummaryRasterizer {
    async fn rasterize(&self, request: RasterRequest<'_>) -> simplemaps::Result<Vec<u8>> {
        let kinds: Vec<&str> = request
            .features
            .iter()
            .map(|f| f.map_object().kind().name())
            .collect();
        Ok(format!(
            "tile {}/{}/{} @ {:.2} m/px: {}",
            request.tile.level,
            request.tile.col,
            request.tile.row,
            request.resolution,
            kinds.join(", ")
        )
        .into_bytes())
    }
}

/// Serves the tile's corner coordinates as its "image"
struct CornerProvider;

#[async_trait]
impl TileProvider for CornerProvider {
    async fn get_tile(&self, tile: &TileMetadata) -> simplemaps::Result<Vec<u8>> {
        Ok(format!("base {} .. {}", tile.top_left, tile.bottom_right).into_bytes())
    }
}

fn demo_objects() -> anyhow::Result<Vec<Arc<MapObject>>> {
    let stockholm = Coordinate::wgs84(59.3293, 18.0686)?;
    let uppsala = Coordinate::wgs84(59.8586, 17.6389)?;
    let vasteras = Coordinate::wgs84(59.6099, 16.5448)?;

    Ok(vec![
        MapObject::from(PointMarker::new(stockholm).with_color(Color::BLUE)).shared(),
        MapObject::from(LineString::new(vec![stockholm, uppsala])).shared(),
        MapObject::from(Polygon::new(vec![stockholm, uppsala, vasteras]).with_fill(Color::rgba(0, 128, 0, 64)))
            .with_rendering_order(-1)
            .shared(),
        MapObject::from(Label::new(uppsala).with_text("Uppsala"))
            .with_rendering_order(1)
            .shared(),
    ])
}

fn load_options() -> anyhow::Result<MapEngineOptions> {
    match std::env::args().nth(1) {
        Some(path) => MapEngineOptions::from_json_file(&path).with_context(|| format!("loading {path}")),
        None => Ok(MapEngineOptions::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut engine = MapEngine::new(load_options()?);
    engine.on("viewportchanged", |event| {
        if let MapEvent::ViewportChanged { center, resolution, .. } = event {
            info!("viewport now at {center} ({resolution:.2} m/px)");
        }
    });
    engine.on("mapclicked", |event| {
        if let MapEvent::MapClicked { location } = event {
            info!("clicked {location}");
        }
    });

    engine.set_base_map(Arc::new(CornerProvider));
    engine.set_show_location_marker(true);

    let objects = demo_objects()?;
    engine.add(&objects, 0)?;
    engine.zoom_and_center_on(&objects)?;
    engine.move_location_marker(&Coordinate::wgs84(59.33, 18.07)?, 45.0)?;
    engine.click(100.0, 100.0)?;
    engine.process_events();

    let center = engine.viewport().center;
    let level = engine.viewport().zoom_level().min(u8::MAX as usize) as u8;
    let tile = TileCoord::from_point(&center, level);

    let rasterizer = SummaryRasterizer;
    for image in engine.render_tile(tile, &rasterizer).await.map_err(anyhow::Error::msg)? {
        println!("{:>20}: {}", image.name, String::from_utf8_lossy(&image.image));
    }

    let renderer = TileRenderer::new(&objects, None, Arc::new(SummaryRasterizer))?;
    let tiles = [tile, tile.parent().unwrap_or(tile)];
    for image in renderer.render_tiles(&tiles).await.map_err(anyhow::Error::msg)? {
        println!("{:>20}: {}", "renderer", String::from_utf8_lossy(&image));
    }

    Ok(())
}
