pub mod corridor;
pub mod room;

pub use corridor::{BuiltCorridor, Corridor, CorridorEnd, CorridorId, WallQuad};
pub use room::{BuiltRoom, Floorplan, PlacedRoom, Room, RoomId};

use slotmap::{SecondaryMap, SlotMap};
use tracing::debug;

use crate::error::{GeometryError, LayoutError, Result};
use crate::math::{Point2, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for a position in the layout's point arena.
    pub struct PointId;
}

fn resolve(points: &SlotMap<PointId, Point2>, id: PointId) -> Result<Point2> {
    points
        .get(id)
        .copied()
        .ok_or_else(|| LayoutError::EntityNotFound("point".into()).into())
}

/// Tuning knobs for [`Layout::build`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Fraction in `[0, 0.5)` of each corridor's length trimmed from each of
    /// its ends before room floorplans are built. `0` leaves corridors
    /// untouched.
    pub corridor_trim: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { corridor_trim: 0.0 }
    }
}

/// Arena that owns every position, corridor and room of one level.
///
/// Rooms refer to positions and corridors by typed ids (generational
/// indices), so moving a point is seen by every room that references it.
#[derive(Debug, Default)]
pub struct Layout {
    points: SlotMap<PointId, Point2>,
    corridors: SlotMap<CorridorId, Corridor>,
    rooms: SlotMap<RoomId, Room>,
}

impl Layout {
    /// Creates a new, empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Point operations ---

    /// Inserts a position and returns its ID.
    pub fn add_point(&mut self, point: Point2) -> PointId {
        self.points.insert(point)
    }

    /// Returns the position, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not in the arena.
    pub fn point(&self, id: PointId) -> Result<Point2> {
        resolve(&self.points, id)
    }

    /// Returns a mutable reference to the position, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not in the arena.
    pub fn point_mut(&mut self, id: PointId) -> Result<&mut Point2> {
        self.points
            .get_mut(id)
            .ok_or_else(|| LayoutError::EntityNotFound("point".into()).into())
    }

    /// Returns the point arena.
    #[must_use]
    pub fn points(&self) -> &SlotMap<PointId, Point2> {
        &self.points
    }

    // --- Corridor operations ---

    /// Inserts a corridor and returns its ID.
    pub fn add_corridor(&mut self, corridor: Corridor) -> CorridorId {
        self.corridors.insert(corridor)
    }

    /// Inserts a corridor between two arena positions.
    ///
    /// The corridor keeps the ids, so moving either point before
    /// [`Layout::build`] moves the corridor with it.
    ///
    /// # Errors
    ///
    /// Returns an error if either point is not in the arena.
    pub fn connect(&mut self, a: PointId, b: PointId, width: f64) -> Result<CorridorId> {
        self.point(a)?;
        self.point(b)?;
        Ok(self.add_corridor(Corridor::new(a, b, width)))
    }

    /// Returns the corridor, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the corridor is not in the layout.
    pub fn corridor(&self, id: CorridorId) -> Result<&Corridor> {
        self.corridors
            .get(id)
            .ok_or_else(|| LayoutError::EntityNotFound("corridor".into()).into())
    }

    /// Returns the corridor arena.
    #[must_use]
    pub fn corridors(&self) -> &SlotMap<CorridorId, Corridor> {
        &self.corridors
    }

    // --- Room operations ---

    /// Inserts a room and returns its ID.
    pub fn add_room(&mut self, room: Room) -> RoomId {
        self.rooms.insert(room)
    }

    /// Returns the room, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the room is not in the layout.
    pub fn room(&self, id: RoomId) -> Result<&Room> {
        self.rooms
            .get(id)
            .ok_or_else(|| LayoutError::EntityNotFound("room".into()).into())
    }

    /// Returns the room arena.
    #[must_use]
    pub fn rooms(&self) -> &SlotMap<RoomId, Room> {
        &self.rooms
    }

    // --- Pipeline ---

    /// Checks the topology before any geometry is derived.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a corridor with a non-positive width,
    /// a dangling endpoint or coincident endpoints, a room without branches,
    /// a room whose branch and connection counts differ, or a dangling point
    /// or corridor id.
    pub fn validate(&self) -> Result<()> {
        for corridor in self.corridors.values() {
            let width = corridor.width();
            if !width.is_finite() || width <= 0.0 {
                return Err(LayoutError::InvalidWidth(width).into());
            }
            let [a, b] = corridor.end_points();
            let (a, b) = (self.point(*a)?, self.point(*b)?);
            if nalgebra::distance(&a, &b) < TOLERANCE {
                return Err(GeometryError::Degenerate(format!(
                    "corridor endpoints coincide at ({}, {})",
                    a.x, a.y
                ))
                .into());
            }
        }

        for room in self.rooms.values() {
            if room.branches().is_empty() {
                return Err(LayoutError::EmptyRoom.into());
            }
            if room.branches().len() != room.connections().len() {
                return Err(LayoutError::BranchMismatch {
                    branches: room.branches().len(),
                    connections: room.connections().len(),
                }
                .into());
            }
            self.point(room.centre())?;
            for &id in room.branches() {
                self.point(id)?;
            }
            for &id in room.connections() {
                self.corridor(id)?;
            }
        }
        Ok(())
    }

    /// Derives the geometry of the whole level.
    ///
    /// Every corridor is built first from the current point positions (and
    /// trimmed, if requested), then every room floorplan is built from the
    /// finished corridor doors.
    ///
    /// # Errors
    ///
    /// Returns any validation error, `GeometryError::ParameterOutOfRange` for
    /// a trim outside `[0, 0.5)`, or the first failure while building a
    /// corridor or room.
    pub fn build(&self, options: &LayoutOptions) -> Result<LayoutGeometry> {
        self.validate()?;
        let trim = options.corridor_trim;
        if !(0.0..0.5).contains(&trim) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "corridor_trim",
                value: trim,
                min: 0.0,
                max: 0.5,
            }
            .into());
        }

        let mut corridors = SecondaryMap::with_capacity(self.corridors.len());
        for (id, corridor) in &self.corridors {
            corridors.insert(id, corridor.build(&self.points)?);
        }
        debug!(count = corridors.len(), "built corridor walls");

        if trim > 0.0 {
            // The end is cut from what the start cut left, so both ends
            // move by `trim` of the original length.
            let end_trim = trim / (1.0 - trim);
            for corridor in corridors.values_mut() {
                let width = corridor.width();
                corridor.shorten(trim, CorridorEnd::Start, width)?;
                corridor.shorten(end_trim, CorridorEnd::End, width)?;
            }
            debug!(trim, "trimmed corridors");
        }

        let room_centres = self
            .rooms
            .values()
            .map(|room| self.point(room.centre()))
            .collect::<Result<Vec<_>>>()?;

        let mut rooms = SecondaryMap::with_capacity(self.rooms.len());
        for (id, room) in &self.rooms {
            let built = room
                .build_geometry(&self.points)?
                .build_floorplan(&corridors, &room_centres)?;
            rooms.insert(id, built);
        }
        debug!(count = rooms.len(), "built room floorplans");

        Ok(LayoutGeometry { corridors, rooms })
    }
}

/// Derived geometry of a level: corridor outlines and room floorplans.
#[derive(Debug, Clone)]
pub struct LayoutGeometry {
    corridors: SecondaryMap<CorridorId, BuiltCorridor>,
    rooms: SecondaryMap<RoomId, BuiltRoom>,
}

impl LayoutGeometry {
    /// Returns the built corridor, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the corridor was not part of the build.
    pub fn corridor(&self, id: CorridorId) -> Result<&BuiltCorridor> {
        self.corridors
            .get(id)
            .ok_or_else(|| LayoutError::EntityNotFound("corridor".into()).into())
    }

    /// Returns the built room, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the room was not part of the build.
    pub fn room(&self, id: RoomId) -> Result<&BuiltRoom> {
        self.rooms
            .get(id)
            .ok_or_else(|| LayoutError::EntityNotFound("room".into()).into())
    }

    /// Returns every built corridor keyed by its layout id.
    #[must_use]
    pub fn corridors(&self) -> &SecondaryMap<CorridorId, BuiltCorridor> {
        &self.corridors
    }

    /// Returns every built room keyed by its layout id.
    #[must_use]
    pub fn rooms(&self) -> &SecondaryMap<RoomId, BuiltRoom> {
        &self.rooms
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ChambersError;
    use approx::assert_abs_diff_eq;

    struct Level {
        layout: Layout,
        west: RoomId,
        east: RoomId,
        north: RoomId,
        hall: CorridorId,
        w_east: PointId,
    }

    /// Three rooms: west and east joined by a hall, east and north by a
    /// second corridor.
    fn level() -> Level {
        let mut layout = Layout::new();
        let w = layout.add_point(Point2::new(0.0, 0.0));
        let e = layout.add_point(Point2::new(20.0, 0.0));
        let n = layout.add_point(Point2::new(20.0, 20.0));

        let w_east = layout.add_point(Point2::new(4.0, 0.0));
        let e_west = layout.add_point(Point2::new(16.0, 0.0));
        let e_north = layout.add_point(Point2::new(20.0, 4.0));
        let n_south = layout.add_point(Point2::new(20.0, 16.0));

        let hall = layout.connect(w_east, e_west, 1.0).unwrap();
        let stair = layout.connect(e_north, n_south, 0.5).unwrap();

        let west = layout.add_room(Room::new(w, vec![w_east], vec![hall]));
        let east = layout.add_room(Room::new(e, vec![e_west, e_north], vec![hall, stair]));
        let north = layout.add_room(Room::new(n, vec![n_south], vec![stair]));
        Level {
            layout,
            west,
            east,
            north,
            hall,
            w_east,
        }
    }

    #[test]
    fn builds_every_corridor_and_room() {
        let level = level();
        let geometry = level.layout.build(&LayoutOptions::default()).unwrap();
        assert_eq!(geometry.corridors().len(), 2);
        assert_eq!(geometry.rooms().len(), 3);
        for corridor in geometry.corridors().values() {
            assert!(corridor.walls().is_closed());
        }

        assert_eq!(geometry.room(level.west).unwrap().floorplan().len(), 3);
        assert_eq!(geometry.room(level.east).unwrap().floorplan().len(), 7);
        assert_eq!(geometry.room(level.north).unwrap().floorplan().len(), 3);
        assert_abs_diff_eq!(
            geometry.room(level.east).unwrap().radius(),
            2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn rooms_use_their_own_corridor_doors() {
        let level = level();
        let geometry = level.layout.build(&LayoutOptions::default()).unwrap();
        let west = geometry.room(level.west).unwrap().outline();
        let east = geometry.room(level.east).unwrap().outline();
        for p in west.iter().step_by(2) {
            assert_abs_diff_eq!(p.x, 4.0, epsilon = 1e-9);
        }
        assert!(east
            .iter()
            .step_by(2)
            .any(|p| (p.x - 16.0).abs() < 1e-9));
        assert!(!east.iter().step_by(2).any(|p| (p.x - 4.0).abs() < 1e-9));
    }

    #[test]
    fn trim_shortens_both_ends_equally() {
        let level = level();
        let options = LayoutOptions { corridor_trim: 0.25 };
        let geometry = level.layout.build(&options).unwrap();
        let hall = geometry.corridor(level.hall).unwrap();
        // 12 long, 3 off each end.
        let start = hall.end(CorridorEnd::Start);
        let end = hall.end(CorridorEnd::End);
        assert_abs_diff_eq!(hall.length(), 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(start, Point2::new(7.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(end, Point2::new(13.0, 0.0), epsilon = 1e-12);
        let [first, last] = hall.end_points();
        assert_eq!(*first, Point2::new(4.0, 0.0));
        assert_abs_diff_eq!(
            nalgebra::distance(first, &start),
            nalgebra::distance(last, &end),
            epsilon = 1e-12
        );
    }

    #[test]
    fn trim_of_a_fifth_moves_each_end_by_a_fifth() {
        let mut layout = Layout::new();
        let a = layout.add_point(Point2::new(0.0, 0.0));
        let b = layout.add_point(Point2::new(10.0, 0.0));
        let id = layout.connect(a, b, 1.0).unwrap();
        let geometry = layout.build(&LayoutOptions { corridor_trim: 0.2 }).unwrap();
        let corridor = geometry.corridor(id).unwrap();
        let start = corridor.end(CorridorEnd::Start);
        let end = corridor.end(CorridorEnd::End);
        assert_abs_diff_eq!(start, Point2::new(2.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(end, Point2::new(8.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn bad_trim_is_rejected() {
        let level = level();
        for corridor_trim in [0.5, 1.0, -0.1] {
            let err = level
                .layout
                .build(&LayoutOptions { corridor_trim })
                .unwrap_err();
            assert!(matches!(
                err,
                ChambersError::Geometry(GeometryError::ParameterOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn validate_rejects_empty_room() {
        let mut level = level();
        let c = level.layout.add_point(Point2::new(50.0, 50.0));
        level.layout.add_room(Room::new(c, vec![], vec![]));
        let err = level.layout.validate().unwrap_err();
        assert!(matches!(err, ChambersError::Layout(LayoutError::EmptyRoom)));
        assert!(level.layout.build(&LayoutOptions::default()).is_err());
    }

    #[test]
    fn validate_rejects_coincident_corridor() {
        let mut layout = Layout::new();
        let p = layout.add_point(Point2::new(1.0, 1.0));
        layout.connect(p, p, 1.0).unwrap();
        let err = layout.validate().unwrap_err();
        assert!(matches!(
            err,
            ChambersError::Geometry(GeometryError::Degenerate(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_width() {
        let mut layout = Layout::new();
        let a = layout.add_point(Point2::new(0.0, 0.0));
        let b = layout.add_point(Point2::new(1.0, 0.0));
        layout.connect(a, b, 0.0).unwrap();
        let err = layout.validate().unwrap_err();
        assert!(matches!(
            err,
            ChambersError::Layout(LayoutError::InvalidWidth(_))
        ));
    }

    #[test]
    fn validate_rejects_dangling_corridor() {
        let mut level = level();
        level.layout.corridors.remove(level.hall);
        let err = level.layout.validate().unwrap_err();
        assert!(matches!(
            err,
            ChambersError::Layout(LayoutError::EntityNotFound(_))
        ));
    }

    #[test]
    fn validate_rejects_dangling_point() {
        let mut level = level();
        let centre = level.layout.room(level.north).unwrap().centre();
        level.layout.points.remove(centre);
        assert!(level.layout.point(centre).is_err());
        let err = level.layout.build(&LayoutOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ChambersError::Layout(LayoutError::EntityNotFound(_))
        ));
    }

    #[test]
    fn moved_point_is_seen_by_rooms() {
        let mut level = level();
        let centre = level.layout.room(level.east).unwrap().centre();
        *level.layout.point_mut(centre).unwrap() = Point2::new(22.0, 0.0);
        let geometry = level.layout.build(&LayoutOptions::default()).unwrap();
        assert_abs_diff_eq!(
            geometry.room(level.east).unwrap().centre(),
            Point2::new(22.0, 0.0)
        );
    }

    #[test]
    fn moved_corridor_endpoint_is_seen_by_corridor_and_room() {
        let mut level = level();
        let moved = Point2::new(0.0, 4.0);
        *level.layout.point_mut(level.w_east).unwrap() = moved;
        let geometry = level.layout.build(&LayoutOptions::default()).unwrap();

        let hall = geometry.corridor(level.hall).unwrap();
        assert_eq!(hall.end_points()[0], moved);
        assert_abs_diff_eq!(hall.end(CorridorEnd::Start), moved, epsilon = 1e-12);

        let west = geometry.room(level.west).unwrap().outline();
        for p in west.iter().step_by(2) {
            assert_abs_diff_eq!(nalgebra::distance(p, &moved), 1.0, epsilon = 1e-9);
        }
        assert!(!west.iter().any(|p| (p.x - 4.0).abs() < 1e-9));
    }

    #[test]
    fn connect_rejects_unknown_point() {
        let mut layout = Layout::new();
        let a = layout.add_point(Point2::new(0.0, 0.0));
        let b = layout.add_point(Point2::new(1.0, 0.0));
        layout.points.remove(b);
        let err = layout.connect(a, b, 1.0).unwrap_err();
        assert!(matches!(
            err,
            ChambersError::Layout(LayoutError::EntityNotFound(_))
        ));
        assert!(layout.corridors().is_empty());
    }

    #[test]
    fn rooms_added_after_build_are_not_in_geometry() {
        let mut level = level();
        let geometry = level.layout.build(&LayoutOptions::default()).unwrap();
        let west = level.layout.room(level.west).unwrap().clone();
        let late = level.layout.add_room(west);
        assert!(geometry.room(late).is_err());
        assert!(geometry.room(level.west).is_ok());
    }
}
