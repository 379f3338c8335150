//! Dataset categories, load status and snapshot post-processing.
//!
//! Published snapshots come in two flavors: water temperature (one scalar
//! plane in degrees Celsius) and surface flow (two planes, `u` and `v`, in
//! metres per second). Both are stored south-up, so rows are flipped before
//! display. The category is resolved once at load time with a single match.

use crate::{Grid, LakeError, LakeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Metres per second to feet per minute.
pub const MS_TO_FT_PER_MIN: f64 = 196.85;

/// Kind of snapshot published by the data pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataCategory {
    Temperature,
    Flow,
}

impl DataCategory {
    /// Directory / key prefix that holds this category's files.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            DataCategory::Temperature => "temperature",
            DataCategory::Flow => "flow",
        }
    }

    /// Number of 2D planes a decoded snapshot of this category carries.
    pub fn plane_count(&self) -> usize {
        match self {
            DataCategory::Temperature => 1,
            DataCategory::Flow => 2,
        }
    }

    /// Convert decoded planes into a display-ready snapshot.
    ///
    /// Returns new grids; the inputs are consumed and never mutated in place.
    pub fn post_process(&self, planes: Vec<Grid>) -> LakeResult<Snapshot> {
        if planes.len() != self.plane_count() {
            return Err(LakeError::Shape(format!(
                "{} snapshot needs {} plane(s), got {}",
                self,
                self.plane_count(),
                planes.len()
            )));
        }

        debug!(category = %self, shape = ?planes[0].shape(), "Post-processing snapshot");
        let mut planes = planes.into_iter();
        match self {
            DataCategory::Temperature => {
                let celsius = planes.next().ok_or_else(|| missing_plane(*self))?;
                Ok(Snapshot::Temperature(
                    celsius.flip_vertical().map(celsius_to_fahrenheit),
                ))
            }
            DataCategory::Flow => {
                let u = planes.next().ok_or_else(|| missing_plane(*self))?;
                let v = planes.next().ok_or_else(|| missing_plane(*self))?;
                if u.shape() != v.shape() {
                    return Err(LakeError::Shape(format!(
                        "u grid {:?} and v grid {:?} differ",
                        u.shape(),
                        v.shape()
                    )));
                }
                Ok(Snapshot::Flow {
                    u: u.flip_vertical(),
                    v: v.flip_vertical(),
                })
            }
        }
    }
}

fn missing_plane(category: DataCategory) -> LakeError {
    LakeError::Shape(format!("{} snapshot is missing a plane", category))
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_prefix())
    }
}

impl FromStr for DataCategory {
    type Err = LakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "temperature" => Ok(DataCategory::Temperature),
            "flow" => Ok(DataCategory::Flow),
            other => Err(LakeError::Config(format!("unknown data category '{}'", other))),
        }
    }
}

/// A decoded, post-processed snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// Water temperature in degrees Fahrenheit, north-up.
    Temperature(Grid),
    /// Surface current components in m/s, north-up.
    Flow { u: Grid, v: Grid },
}

impl Snapshot {
    pub fn category(&self) -> DataCategory {
        match self {
            Snapshot::Temperature(_) => DataCategory::Temperature,
            Snapshot::Flow { .. } => DataCategory::Flow,
        }
    }
}

/// Per-dataset load status that drives the user-visible fallback text.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetStatus<T> {
    Loading,
    Unavailable(String),
    Ready(T),
}

impl<T> DatasetStatus<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, DatasetStatus::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            DatasetStatus::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            DatasetStatus::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Convert a load result; errors become `Unavailable` with the error text.
    pub fn from_result(result: LakeResult<T>) -> Self {
        match result {
            Ok(value) => DatasetStatus::Ready(value),
            Err(e) => DatasetStatus::Unavailable(e.to_string()),
        }
    }
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * (9.0 / 5.0) + 32.0
}

pub fn ms_to_ft_per_min(speed: f64) -> f64 {
    speed * MS_TO_FT_PER_MIN
}

/// Round `x` to `decimals` decimal places.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (x * factor).round() / factor
}
