use slotmap::SlotMap;
use tracing::warn;

use super::{resolve, PointId};
use crate::error::{GeometryError, LayoutError, Result};
use crate::math::line_2d::line_end_perpendicular;
use crate::math::{Point2, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for a corridor in the layout.
    pub struct CorridorId;
}

/// One of the two ends of a corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorridorEnd {
    Start,
    End,
}

impl CorridorEnd {
    /// Both ends, in index order.
    pub const BOTH: [Self; 2] = [Self::Start, Self::End];

    /// Returns `0` for the start and `1` for the end.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Start => 0,
            Self::End => 1,
        }
    }

    /// Returns the opposite end.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Closed wall/door outline of a corridor as four two-point edges.
///
/// Layout: start door, side wall, end door, side wall. Edge endpoints are
/// repeated, so the eighth point equals the first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallQuad {
    points: [Point2; 8],
}

impl WallQuad {
    fn from_doors(start: [Point2; 2], end: [Point2; 2]) -> Self {
        Self {
            points: [
                // start door
                start[0],
                start[1],
                // side
                start[1],
                end[0],
                // end door
                end[0],
                end[1],
                // side
                end[1],
                start[0],
            ],
        }
    }

    /// Returns the eight outline points.
    #[must_use]
    pub fn points(&self) -> &[Point2; 8] {
        &self.points
    }

    /// Returns the door edge at the given end.
    #[must_use]
    pub fn door(&self, end: CorridorEnd) -> [Point2; 2] {
        let i = end.index() * 4;
        [self.points[i], self.points[i + 1]]
    }

    /// Returns the two side walls.
    #[must_use]
    pub fn sides(&self) -> [[Point2; 2]; 2] {
        [
            [self.points[2], self.points[3]],
            [self.points[6], self.points[7]],
        ]
    }

    /// Returns `true` if the last point coincides with the first.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.points[7] == self.points[0]
    }

    /// Returns the outline as flat `x, y` pairs.
    #[must_use]
    pub fn coordinates(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (i, p) in self.points.iter().enumerate() {
            out[2 * i] = p.x;
            out[2 * i + 1] = p.y;
        }
        out
    }
}

fn check_width(width: f64) -> Result<()> {
    if !width.is_finite() || width <= 0.0 {
        return Err(LayoutError::InvalidWidth(width).into());
    }
    Ok(())
}

fn build_walls(ends: &[Point2; 2], width: f64) -> Result<WallQuad> {
    check_width(width)?;
    let start = line_end_perpendicular(&ends[0], &ends[1], width)?;
    let end = line_end_perpendicular(&ends[1], &ends[0], width)?;
    Ok(WallQuad::from_doors(start, end))
}

/// A passage between two rooms, before its walls have been derived.
///
/// The endpoints are ids into the layout's point arena; their positions are
/// only read when the corridor is built.
#[derive(Debug, Clone)]
pub struct Corridor {
    end_points: [PointId; 2],
    width: f64,
}

impl Corridor {
    /// Creates a corridor from its start and end point ids and half-width.
    #[must_use]
    pub fn new(start: PointId, end: PointId, width: f64) -> Self {
        Self {
            end_points: [start, end],
            width,
        }
    }

    /// Returns the start and end point ids.
    #[must_use]
    pub fn end_points(&self) -> &[PointId; 2] {
        &self.end_points
    }

    /// Returns the half-width used to offset the door edges.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Resolves the endpoints against `points`, snapshots them and derives
    /// the wall/door outline.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::EntityNotFound` for an unknown point id,
    /// `LayoutError::InvalidWidth` for a non-positive width, or
    /// `GeometryError::ZeroVector` if the endpoints coincide.
    pub fn build(&self, points: &SlotMap<PointId, Point2>) -> Result<BuiltCorridor> {
        let ends = [
            resolve(points, self.end_points[0])?,
            resolve(points, self.end_points[1])?,
        ];
        let walls = build_walls(&ends, self.width)?;
        Ok(BuiltCorridor {
            end_points: ends,
            ends,
            width: self.width,
            walls,
        })
    }
}

/// A corridor whose wall and door geometry has been derived.
///
/// Only this type exposes door geometry, so a room can never read the doors
/// of a corridor that has not been built.
#[derive(Debug, Clone)]
pub struct BuiltCorridor {
    end_points: [Point2; 2],
    ends: [Point2; 2],
    width: f64,
    walls: WallQuad,
}

impl BuiltCorridor {
    /// Re-derives the wall/door outline from the current ends.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidWidth` for a non-positive width, or
    /// `GeometryError::ZeroVector` if the ends have collapsed to a point.
    /// The corridor is left unchanged on error.
    pub fn rebuild_walls_and_doors(&mut self, width: f64) -> Result<()> {
        self.walls = build_walls(&self.ends, width)?;
        self.width = width;
        Ok(())
    }

    /// Pulls `end` toward the other end by `amount` of the current length.
    ///
    /// The other end and the corridor's direction are unchanged; the length
    /// becomes `(1 - amount)` times the old length. Walls are rebuilt with
    /// `width`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` unless `0 <= amount < 1`,
    /// `GeometryError::Degenerate` if the corridor has zero length, or any
    /// error from rebuilding the walls. The corridor is left unchanged on
    /// error.
    pub fn shorten(&mut self, amount: f64, end: CorridorEnd, width: f64) -> Result<()> {
        if !(0.0..1.0).contains(&amount) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "amount",
                value: amount,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        let fixed = self.ends[end.other().index()];
        let old_line = self.ends[end.index()] - fixed;
        if old_line.norm() < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cannot shorten a zero-length corridor".to_owned())
                    .into(),
            );
        }

        let mut ends = self.ends;
        if amount > 0.0 {
            ends[end.index()] = fixed + old_line * (1.0 - amount);
        }
        self.walls = build_walls(&ends, width)?;
        self.ends = ends;
        self.width = width;
        Ok(())
    }

    /// Returns the endpoints as resolved when the corridor was built.
    #[must_use]
    pub fn end_points(&self) -> &[Point2; 2] {
        &self.end_points
    }

    /// Returns the current (possibly shortened) ends.
    #[must_use]
    pub fn ends(&self) -> &[Point2; 2] {
        &self.ends
    }

    /// Returns the current position of one end.
    #[must_use]
    pub fn end(&self, end: CorridorEnd) -> Point2 {
        self.ends[end.index()]
    }

    /// Returns the current corridor length.
    #[must_use]
    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.ends[0], &self.ends[1])
    }

    /// Returns the half-width the walls were last built with.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the wall/door outline.
    #[must_use]
    pub fn walls(&self) -> &WallQuad {
        &self.walls
    }

    /// Returns the door edge at the given end.
    #[must_use]
    pub fn door(&self, end: CorridorEnd) -> [Point2; 2] {
        self.walls.door(end)
    }

    /// Returns the end nearer to `point`. Ties resolve to the start.
    #[must_use]
    pub fn closest_end(&self, point: &Point2) -> CorridorEnd {
        let d0 = nalgebra::distance_squared(&self.ends[0], point);
        let d1 = nalgebra::distance_squared(&self.ends[1], point);
        if d1 < d0 {
            CorridorEnd::End
        } else {
            CorridorEnd::Start
        }
    }

    /// Returns the end that opens into the room centred on `centre`.
    ///
    /// An end belongs to the room whose centre, among `room_centres`, is
    /// nearest to it. If that does not single out exactly one end for this
    /// room, the end nearest to `centre` is used.
    #[must_use]
    pub fn end_for_room(&self, centre: &Point2, room_centres: &[Point2]) -> CorridorEnd {
        let owned = CorridorEnd::BOTH.map(|end| {
            nearest(&self.end(end), room_centres)
                .is_some_and(|c| nalgebra::distance(c, centre) < TOLERANCE)
        });
        match owned {
            [true, false] => CorridorEnd::Start,
            [false, true] => CorridorEnd::End,
            _ => {
                let end = self.closest_end(centre);
                warn!(
                    x = centre.x,
                    y = centre.y,
                    ?end,
                    "ambiguous corridor end for room, using nearest end"
                );
                end
            }
        }
    }
}

fn nearest<'a>(point: &Point2, candidates: &'a [Point2]) -> Option<&'a Point2> {
    candidates.iter().min_by(|a, b| {
        nalgebra::distance_squared(a, point).total_cmp(&nalgebra::distance_squared(b, point))
    })
}
