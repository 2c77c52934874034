pub mod annotations;
pub mod marker;
pub mod route;

pub use annotations::{AnnotationStore, DotPair};
pub use marker::Dot;
pub use route::Route;
