//! Wall and door geometry for procedurally generated levels.
//!
//! A level is an arena of positions plus corridors (two endpoints and a
//! half-width) and rooms (a centre, the branch points where corridors meet
//! it, and the corridors themselves). Corridors derive a closed wall/door
//! outline; rooms then project the doors of their corridors into a
//! room-centred polar frame and close the gaps between them with synthesized
//! wall vertices.

pub mod error;
pub mod layout;
pub mod math;

pub use error::{ChambersError, Result};
pub use layout::{Layout, LayoutGeometry, LayoutOptions};
