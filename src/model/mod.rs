//! Data models for annotation shapes.

mod record;
mod shape;

pub use record::{
    NO_GROUP, ShapeRecord, records_from_json, records_from_shapes, records_to_json,
    shapes_from_records,
};
pub use shape::{HighlightMode, Shape, ShapeId, ShapeKind, ShapePath};
