//! Serialized form of curves, as exchanged with the drawing store.
//!
//! Field names are kept short, points make up the bulk of every payload.

use super::{Curve, Point, SequenceIndex};
use crate::color::ColorKey;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("curve has no points")]
    Empty,
    #[error("point {0} has a non-finite field")]
    NonFinite(usize),
}

#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WirePoint {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "p", default)]
    pub pressure: f64,
    #[serde(rename = "w")]
    pub width: f64,
    #[serde(rename = "t", default)]
    pub timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WireCurve {
    /// Absent in payloads written before sequence indices were tracked.
    #[serde(rename = "seq", default, skip_serializing_if = "Option::is_none")]
    pub sequence_index: Option<SequenceIndex>,
    #[serde(default)]
    pub color: ColorKey,
    pub width_multiplier: f64,
    pub points: Vec<WirePoint>,
}

impl From<&Curve> for WireCurve {
    fn from(curve: &Curve) -> Self {
        Self {
            sequence_index: Some(curve.sequence_index),
            color: curve.color,
            width_multiplier: curve.width_class,
            points: curve
                .points
                .iter()
                .map(|point| WirePoint {
                    x: point.x,
                    y: point.y,
                    pressure: point.pressure,
                    width: point.width,
                    timestamp: point.timestamp,
                })
                .collect(),
        }
    }
}

impl WireCurve {
    /// Validate into a [`Curve`]. `fallback_index` is used when the payload carries no sequence index.
    pub fn into_curve(self, fallback_index: SequenceIndex) -> Result<Curve, WireError> {
        let points = self
            .points
            .into_iter()
            .enumerate()
            .map(|(idx, point)| {
                let finite = [point.x, point.y, point.pressure, point.width]
                    .iter()
                    .all(|field| field.is_finite());
                if finite {
                    Ok(Point {
                        x: point.x,
                        y: point.y,
                        pressure: point.pressure.clamp(0.0, 1.0),
                        width: point.width.max(0.0),
                        timestamp: point.timestamp,
                    })
                } else {
                    Err(WireError::NonFinite(idx))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Curve::from_points(
            self.sequence_index.unwrap_or(fallback_index),
            self.color,
            self.width_multiplier,
            points,
        )
        .ok_or(WireError::Empty)
    }
}
