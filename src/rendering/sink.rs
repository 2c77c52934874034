use crate::{
    core::{bounds::PixelBounds, config::Color, geo::PixelPoint},
    tiles::source::TileImage,
    Result,
};
use std::sync::Arc;

/// Where a line of status text goes. The status bar sits directly below the
/// map window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// Left end of the status bar
    StatusLeft,
    /// Right end of the status bar
    StatusRight,
}

/// Drawing surface the plotter renders into. Nothing is read back.
pub trait RenderSink {
    /// Start a new frame
    fn clear(&mut self);

    /// Copy `source` out of `image` to `dest` in window coordinates
    fn blit(&mut self, image: &Arc<TileImage>, source: PixelBounds, dest: PixelPoint);

    fn circle(&mut self, center: PixelPoint, radius: u32, color: Color);

    fn polyline(&mut self, points: &[PixelPoint], width: u32, color: Color);

    fn text(&mut self, text: &str, anchor: TextAnchor);

    /// Make everything drawn since the last `clear` visible
    fn present(&mut self) -> Result<()>;
}

impl<T: RenderSink + ?Sized> RenderSink for &mut T {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn blit(&mut self, image: &Arc<TileImage>, source: PixelBounds, dest: PixelPoint) {
        (**self).blit(image, source, dest)
    }

    fn circle(&mut self, center: PixelPoint, radius: u32, color: Color) {
        (**self).circle(center, radius, color)
    }

    fn polyline(&mut self, points: &[PixelPoint], width: u32, color: Color) {
        (**self).polyline(points, width, color)
    }

    fn text(&mut self, text: &str, anchor: TextAnchor) {
        (**self).text(text, anchor)
    }

    fn present(&mut self) -> Result<()> {
        (**self).present()
    }
}

/// Commands that can be issued to a render sink
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Blit {
        zoom: u8,
        source: PixelBounds,
        dest: PixelPoint,
    },
    Circle {
        center: PixelPoint,
        radius: u32,
        color: Color,
    },
    Polyline {
        points: Vec<PixelPoint>,
        width: u32,
        color: Color,
    },
    Text {
        text: String,
        anchor: TextAnchor,
    },
}

/// Headless sink that keeps the commands of every presented frame.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Drawing primitives queued since the last clear
    pending: Vec<DrawCommand>,
    frames: Vec<Vec<DrawCommand>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every presented frame, oldest first
    pub fn frames(&self) -> &[Vec<DrawCommand>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[DrawCommand]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// All text drawn in any presented frame
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().flatten().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl RenderSink for RecordingSink {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn blit(&mut self, image: &Arc<TileImage>, source: PixelBounds, dest: PixelPoint) {
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

    fn present(&mut self) -> Result<()> {
        self.frames.push(self.pending.clone());
        Ok(())
    }
}
