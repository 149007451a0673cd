//! Bulk shape records exchanged with the persistence layer.
//!
//! A record is the plain-data form of a [`Shape`]: label, points, type name,
//! group, flags, and any extra keys, which are carried through untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CanvasError;
use crate::geometry::Point;
use crate::model::shape::{Shape, ShapeKind};

/// Group id written for ungrouped shapes.
pub const NO_GROUP: i32 = -1;

/// A shape as stored in annotation files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    /// Label text
    #[serde(default)]
    pub label: String,

    /// Vertices as `[x, y]` pairs
    #[serde(default)]
    pub points: Vec<[f64; 2]>,

    /// Shape type name, polygon when absent
    #[serde(default = "default_shape_type")]
    pub shape_type: String,

    /// Group id, -1 when ungrouped
    #[serde(default = "default_group_id", deserialize_with = "null_as_no_group")]
    pub group_id: i32,

    /// Named boolean flags
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,

    /// Any other keys, passed through unmodified
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_shape_type() -> String {
    ShapeKind::Polygon.as_str().to_string()
}

fn default_group_id() -> i32 {
    NO_GROUP
}

fn null_as_no_group<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(NO_GROUP))
}

impl ShapeRecord {
    /// Build a record from a finished shape.
    pub fn from_shape(shape: &Shape) -> Self {
        Self {
            label: shape.label.clone(),
            points: shape.points().iter().map(|&p| p.into()).collect(),
            shape_type: shape.kind().as_str().to_string(),
            group_id: shape.group_id.unwrap_or(NO_GROUP),
            flags: shape.flags.clone(),
            extra: shape.extra.clone(),
        }
    }

    /// Convert into a closed shape.
    ///
    /// Fails for unknown shape types or when the point count exceeds what the
    /// kind can hold.
    pub fn to_shape(&self) -> Result<Shape, CanvasError> {
        let group_id = (self.group_id >= 0).then_some(self.group_id);
        let mut shape =
            Shape::with_type_name(&self.label, &self.shape_type, self.flags.clone(), group_id)?;

        if let Some(max) = shape.kind().max_points() {
            if self.points.len() > max {
                return Err(CanvasError::invalid_shape_type(format!(
                    "{} with {} points",
                    self.shape_type,
                    self.points.len()
                )));
            }
        }

        shape.set_points(self.points.iter().map(|&p| Point::from(p)).collect());
        shape.extra = self.extra.clone();
        shape.close();
        Ok(shape)
    }
}

/// Convert loaded records into shapes, skipping records without points.
pub fn shapes_from_records(records: &[ShapeRecord]) -> Result<Vec<Shape>, CanvasError> {
    let mut shapes = Vec::with_capacity(records.len());
    for record in records {
        if record.points.is_empty() {
            log::debug!("Skipping shape record '{}' with no points", record.label);
            continue;
        }
        shapes.push(record.to_shape()?);
    }
    Ok(shapes)
}

/// Convert shapes into records for saving.
pub fn records_from_shapes<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Vec<ShapeRecord> {
    shapes.into_iter().map(ShapeRecord::from_shape).collect()
}

/// Parse a JSON array of shape records.
pub fn records_from_json(json: &str) -> Result<Vec<ShapeRecord>, CanvasError> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize shape records as pretty-printed JSON.
pub fn records_to_json(records: &[ShapeRecord]) -> Result<String, CanvasError> {
    Ok(serde_json::to_string_pretty(records)?)
}
