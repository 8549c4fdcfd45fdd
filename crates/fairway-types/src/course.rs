//! Course layout: holes with tee and flag positions.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geo::Coordinate;
use crate::ids::CourseId;

/// One hole of a course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Hole {
    /// 1-based hole number.
    pub number: u32,
    /// Par for the hole.
    pub par: u32,
    /// Tee box position.
    pub tee: Coordinate,
    /// Flag (pin) position.
    pub flag: Coordinate,
}

/// A golf course: an ordered list of holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Course {
    /// Course identifier.
    pub id: CourseId,
    /// Display name.
    pub name: String,
    /// Holes in playing order.
    pub holes: Vec<Hole>,
}

impl Course {
    /// Look up a hole by its number.
    pub fn hole(&self, number: u32) -> Option<&Hole> {
        self.holes.iter().find(|h| h.number == number)
    }

    /// Number of holes on the course.
    pub fn hole_count(&self) -> u32 {
        u32::try_from(self.holes.len()).unwrap_or(u32::MAX)
    }

    /// Sum of par over all holes. Saturates.
    pub fn total_par(&self) -> u64 {
        self.holes
            .iter()
            .fold(0, |total: u64, h| total.saturating_add(u64::from(h.par)))
    }
}
