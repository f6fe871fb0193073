//! Builds a small four-room level and prints its wall geometry.
//!
//! Run with `RUST_LOG=chambers=trace cargo run --example dungeon` to see the
//! pipeline events.

use chambers::layout::{CorridorEnd, Room};
use chambers::math::spline::catmull_rom_chain;
use chambers::math::Point2;
use chambers::{Layout, LayoutOptions};
use tracing_subscriber::EnvFilter;

fn main() -> chambers::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let mut layout = Layout::new();

    // Room centres on a rough diamond.
    let hub = layout.add_point(Point2::new(0.0, 0.0));
    let east = layout.add_point(Point2::new(24.0, 2.0));
    let north = layout.add_point(Point2::new(-3.0, 22.0));
    let west = layout.add_point(Point2::new(-25.0, -4.0));

    // Branch points where corridors meet the rooms.
    let hub_e = layout.add_point(Point2::new(5.0, 0.5));
    let hub_n = layout.add_point(Point2::new(-0.5, 5.0));
    let hub_w = layout.add_point(Point2::new(-5.0, -1.0));
    let east_w = layout.add_point(Point2::new(19.0, 1.5));
    let north_s = layout.add_point(Point2::new(-2.5, 17.0));
    let west_e = layout.add_point(Point2::new(-20.0, -3.0));

    let c_east = layout.connect(hub_e, east_w, 1.2)?;
    let c_north = layout.connect(north_s, hub_n, 1.0)?;
    let c_west = layout.connect(hub_w, west_e, 1.5)?;

    let hub_room = layout.add_room(Room::new(
        hub,
        vec![hub_e, hub_n, hub_w],
        vec![c_east, c_north, c_west],
    ));
    layout.add_room(Room::new(east, vec![east_w], vec![c_east]));
    layout.add_room(Room::new(north, vec![north_s], vec![c_north]));
    layout.add_room(Room::new(west, vec![west_e], vec![c_west]));

    let geometry = layout.build(&LayoutOptions { corridor_trim: 0.1 })?;

    for (id, corridor) in geometry.corridors() {
        println!("corridor {id:?}: length {:.3}", corridor.length());
        for end in CorridorEnd::BOTH {
            let [a, b] = corridor.door(end);
            println!(
                "  {end:?} door ({:.3}, {:.3}) - ({:.3}, {:.3})",
                a.x, a.y, b.x, b.y
            );
        }
        let coords: Vec<String> = corridor
            .walls()
            .coordinates()
            .iter()
            .map(|c| format!("{c:.3}"))
            .collect();
        println!("  walls [{}]", coords.join(", "));
    }

    for (id, room) in geometry.rooms() {
        println!(
            "room {id:?}: centre ({:.3}, {:.3}) radius {:.3}",
            room.centre().x,
            room.centre().y,
            room.radius()
        );
        for (p, polar) in room.outline().iter().zip(room.floorplan().vertices()) {
            println!(
                "  r {:.3} theta {:.3} -> ({:.3}, {:.3})",
                polar.r, polar.theta, p.x, p.y
            );
        }
    }

    // Smooth the hub outline the way a renderer would before drawing it.
    let smooth = catmull_rom_chain(&geometry.room(hub_room)?.outline(), 4);
    println!("hub outline smoothed to {} points", smooth.len());

    Ok(())
}
