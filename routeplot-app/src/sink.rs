use fxhash::FxHashMap as HashMap;
use routeplot::{
    core::{bounds::PixelBounds, config::Color, geo::PixelPoint},
    rendering::{DrawCommand, RenderSink, TextAnchor},
    tiles::TileImage,
};
use std::sync::Arc;

use egui::{Align2, Color32, ColorImage, FontId, Painter, Pos2, Rect, Shape, Stroke, TextureHandle};

/// Render sink backed by egui. Commands are buffered on `present` and painted
/// at the end of the egui frame, since egui cannot flush mid-frame.
pub struct EguiSink {
    ctx: egui::Context,
    textures: HashMap<u8, TextureHandle>,
    pending: Vec<DrawCommand>,
    shown: Vec<DrawCommand>,
    map_size: PixelPoint,
    status_bar_height: u32,
}

impl EguiSink {
    pub fn new(ctx: egui::Context, map_size: PixelPoint, status_bar_height: u32) -> Self {
        Self {
            ctx,
            textures: HashMap::default(),
            pending: Vec::new(),
            shown: Vec::new(),
            map_size,
            status_bar_height,
        }
    }

    pub fn paint(&self, painter: &Painter) {
        let bar = Rect::from_min_size(
            Pos2::new(0.0, self.map_size.y as f32),
            egui::vec2(self.map_size.x as f32, self.status_bar_height as f32),
        );
        painter.rect_filled(bar, 0.0, Color32::WHITE);

        for command in &self.shown {
            match command {
                DrawCommand::Blit { zoom, source, dest } => self.paint_blit(painter, *zoom, *source, *dest),
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => {
                    painter.circle_filled(pos(*center), *radius as f32, color32(*color));
                }
                DrawCommand::Polyline {
                    points,
                    width,
                    color,
                } => {
                    painter.add(Shape::line(
                        points.iter().copied().map(pos).collect(),
                        Stroke::new(*width as f32, color32(*color)),
                    ));
                }
                DrawCommand::Text { text, anchor } => {
                    let y = bar.center().y;
                    let (at, align) = match anchor {
                        TextAnchor::StatusLeft => (Pos2::new(bar.left() + 4.0, y), Align2::LEFT_CENTER),
                        TextAnchor::StatusRight => (Pos2::new(bar.right() - 4.0, y), Align2::RIGHT_CENTER),
                    };
                    painter.text(at, align, text, FontId::monospace(12.0), Color32::BLACK);
                }
            }
        }
    }

    fn paint_blit(&self, painter: &Painter, zoom: u8, source: PixelBounds, dest: PixelPoint) {
        let Some(texture) = self.textures.get(&zoom) else {
            log::warn!("no texture uploaded for zoom {}", zoom);
            return;
        };
        let [width, height] = texture.size().map(|side| side.max(1) as f32);
        let uv = Rect::from_min_max(
            Pos2::new(source.min.x as f32 / width, source.min.y as f32 / height),
            Pos2::new(source.max.x as f32 / width, source.max.y as f32 / height),
        );
        let rect = Rect::from_min_size(
            pos(dest),
            egui::vec2(source.width() as f32, source.height() as f32),
        );
        painter.image(texture.id(), rect, uv, Color32::WHITE);
    }
}

impl RenderSink for EguiSink {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn blit(&mut self, image: &Arc<TileImage>, source: PixelBounds, dest: PixelPoint) {
        let ctx = &self.ctx;
        self.textures.entry(image.zoom).or_insert_with(|| {
            log::debug!("uploading {}x{} bitmap for zoom {}", image.width, image.height, image.zoom);
            ctx.load_texture(
                format!("zoom-{}", image.zoom),
                ColorImage::from_rgba_unmultiplied(
                    [image.width as usize, image.height as usize],
                    &image.pixels,
                ),
                egui::TextureOptions::NEAREST,
            )
        });
        self.pending.push(DrawCommand::Blit {
            zoom: image.zoom,
            source,
            dest,
        });
    }

    fn circle(&mut self, center: PixelPoint, radius: u32, color: Color) {
        self.pending.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn polyline(&mut self, points: &[PixelPoint], width: u32, color: Color) {
        self.pending.push(DrawCommand::Polyline {
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn text(&mut self, text: &str, anchor: TextAnchor) {
        self.pending.push(DrawCommand::Text {
            text: text.to_string(),
            anchor,
        });
    }

    fn present(&mut self) -> routeplot::Result<()> {
        self.shown = std::mem::take(&mut self.pending);
        Ok(())
    }
}

fn pos(point: PixelPoint) -> Pos2 {
    Pos2::new(point.x as f32, point.y as f32)
}

fn color32(color: Color) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}
