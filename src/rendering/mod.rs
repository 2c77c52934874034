pub mod sink;

pub use sink::{DrawCommand, RecordingSink, RenderSink, TextAnchor};
