//! Freehand annotation surfaces: raster compositing, stroke tracking and the
//! PNG data-URL form drawings are stored in.

pub mod annotation;
pub mod board;
pub mod codec;
pub mod surface;

pub use annotation::{AnnotationCanvas, PointerInput, RestoreStatus, StrokeState};
pub use board::DiaryBoard;
pub use codec::{CodecError, decode_data_url, encode_data_url};
pub use surface::{Brush, Composite, DrawingContext, Point, Surface, ToolMode};
