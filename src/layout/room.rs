use slotmap::{SecondaryMap, SlotMap};
use tracing::trace;

use super::corridor::{BuiltCorridor, CorridorId};
use super::{resolve, PointId};
use crate::error::{GeometryError, LayoutError, Result};
use crate::math::polar::{from_polar, to_polar, Polar};
use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a room in the layout.
    pub struct RoomId;
}

/// A chamber described by its centre and the corridors that open into it.
///
/// `branches[i]` is where the corridor `connections[i]` meets the room. All
/// positions are ids into the layout's point arena.
#[derive(Debug, Clone)]
pub struct Room {
    centre: PointId,
    branches: Vec<PointId>,
    connections: Vec<CorridorId>,
}

impl Room {
    /// Creates a new room. Nothing is resolved until [`Room::build_geometry`].
    #[must_use]
    pub fn new(centre: PointId, branches: Vec<PointId>, connections: Vec<CorridorId>) -> Self {
        Self {
            centre,
            branches,
            connections,
        }
    }

    /// Returns the id of the centre point.
    #[must_use]
    pub fn centre(&self) -> PointId {
        self.centre
    }

    /// Returns the ids of the branch points, one per connection.
    #[must_use]
    pub fn branches(&self) -> &[PointId] {
        &self.branches
    }

    /// Returns the ids of the attached corridors, parallel to the branches.
    #[must_use]
    pub fn connections(&self) -> &[CorridorId] {
        &self.connections
    }

    /// Resolves the centre and branches against `points` and computes the
    /// nominal radius.
    ///
    /// The radius is the sum of centre-to-branch distances divided by twice
    /// the branch count, i.e. half the mean branch distance.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::EmptyRoom` if the room has no branches,
    /// `LayoutError::BranchMismatch` if branches and connections differ in
    /// length, or `LayoutError::EntityNotFound` for an unknown point id.
    pub fn build_geometry(&self, points: &SlotMap<PointId, Point2>) -> Result<PlacedRoom> {
        if self.branches.is_empty() {
            return Err(LayoutError::EmptyRoom.into());
        }
        if self.branches.len() != self.connections.len() {
            return Err(LayoutError::BranchMismatch {
                branches: self.branches.len(),
                connections: self.connections.len(),
            }
            .into());
        }

        let centre = resolve(points, self.centre)?;
        let branch_points = self
            .branches
            .iter()
            .map(|&id| resolve(points, id))
            .collect::<Result<Vec<_>>>()?;

        let total: f64 = branch_points
            .iter()
            .map(|b| nalgebra::distance(&centre, b))
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let radius = total / (2.0 * branch_points.len() as f64);

        Ok(PlacedRoom {
            centre,
            branch_points,
            connections: self.connections.clone(),
            radius,
        })
    }
}

/// A room whose centre, branches and radius have been resolved.
#[derive(Debug, Clone)]
pub struct PlacedRoom {
    centre: Point2,
    branch_points: Vec<Point2>,
    connections: Vec<CorridorId>,
    radius: f64,
}

impl PlacedRoom {
    /// Returns the absolute centre position.
    #[must_use]
    pub fn centre(&self) -> Point2 {
        self.centre
    }

    /// Returns the absolute branch positions.
    #[must_use]
    pub fn branch_points(&self) -> &[Point2] {
        &self.branch_points
    }

    /// Returns the ids of the attached corridors, parallel to the branches.
    #[must_use]
    pub fn connections(&self) -> &[CorridorId] {
        &self.connections
    }

    /// Returns the nominal room radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Converts an absolute position to polar form centred on the room.
    #[must_use]
    pub fn to_polar(&self, point: &Point2) -> Polar {
        to_polar(&(point - self.centre))
    }

    /// Converts a room-centred polar coordinate to an absolute position.
    #[must_use]
    pub fn from_polar(&self, polar: &Polar) -> Point2 {
        self.centre + from_polar(polar)
    }

    /// Builds the wall polygon from the doors of every connected corridor.
    ///
    /// For each connection the door at the end opening into this room is
    /// projected into room polar form. The door points are sorted by angle;
    /// equal angles are ordered by radius, then by connection order, then by
    /// point order within the door. Between each angularly adjacent pair a
    /// wall vertex is inserted at the first point's radius and the mid angle,
    /// giving `2k - 1` vertices for `k` door points.
    ///
    /// `room_centres` holds the centres of every room in the layout and is
    /// used to decide which end of a corridor belongs to this room.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::EntityNotFound` if a connection has no built
    /// corridor in `corridors`.
    pub fn build_floorplan(
        self,
        corridors: &SecondaryMap<CorridorId, BuiltCorridor>,
        room_centres: &[Point2],
    ) -> Result<BuiltRoom> {
        let mut doors = Vec::with_capacity(self.connections.len() * 2);
        for &id in &self.connections {
            let corridor = corridors
                .get(id)
                .ok_or_else(|| LayoutError::EntityNotFound("corridor".into()))?;
            let end = corridor.end_for_room(&self.centre, room_centres);
            doors.extend(corridor.door(end).iter().map(|p| self.to_polar(p)));
        }

        // Stable sort: remaining ties keep collection order.
        doors.sort_by(|a, b| a.theta.total_cmp(&b.theta).then(a.r.total_cmp(&b.r)));

        let Some(&first) = doors.first() else {
            return Err(GeometryError::Degenerate("room has no door points".to_owned()).into());
        };
        let mut vertices = Vec::with_capacity(doors.len() * 2 - 1);
        vertices.push(first);
        for pair in doors.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            vertices.push(Polar::new(a.r, a.theta + (b.theta - a.theta) / 2.0));
            vertices.push(b);
        }
        trace!(doors = doors.len(), vertices = vertices.len(), "built floorplan");

        Ok(BuiltRoom {
            floorplan: Floorplan { vertices },
            room: self,
        })
    }
}

/// Closed wall polygon of a room in room-centred polar coordinates.
///
/// Even indices are door-edge points, odd indices are synthesized wall
/// vertices. The polygon closes from the last vertex back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Floorplan {
    vertices: Vec<Polar>,
}

impl Floorplan {
    /// Returns the polar vertices in increasing angle.
    #[must_use]
    pub fn vertices(&self) -> &[Polar] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the floorplan has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Converts the vertices to absolute positions around `centre`.
    #[must_use]
    pub fn to_points(&self, centre: &Point2) -> Vec<Point2> {
        self.vertices.iter().map(|p| centre + from_polar(p)).collect()
    }
}

/// A room with its floorplan built.
#[derive(Debug, Clone)]
pub struct BuiltRoom {
    room: PlacedRoom,
    floorplan: Floorplan,
}

impl BuiltRoom {
    /// Returns the placed room this was built from.
    #[must_use]
    pub fn placed(&self) -> &PlacedRoom {
        &self.room
    }

    /// Returns the resolved centre.
    #[must_use]
    pub fn centre(&self) -> Point2 {
        self.room.centre
    }

    /// Returns the nominal radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.room.radius
    }

    /// Returns the polar floorplan relative to the centre.
    #[must_use]
    pub fn floorplan(&self) -> &Floorplan {
        &self.floorplan
    }

    /// Returns the floorplan as absolute wall vertices.
    #[must_use]
    pub fn outline(&self) -> Vec<Point2> {
        self.floorplan.to_points(&self.room.centre)
    }
}
