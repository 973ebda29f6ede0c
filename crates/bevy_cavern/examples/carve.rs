//! Headless carving demo.
//!
//! Digs a few tunnels through solid terrain with the plugin, then prints the
//! map with each room drawn in its own letter and lists the room contours.
//!
//! Run with: `cargo run -p bevy_cavern --example carve`
//! Pass a TOML config path to override the map: `-- cavern.toml`

use bevy::ecs::message::Messages;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_cavern::{
  Brush, CarveTerrain, CavernConfig, CavernPlugin, Cell, CellPos, EditRequest, Terrain,
};

fn main() {
  let config = match std::env::args().nth(1) {
    Some(path) => match CavernConfig::load(&path) {
      Ok(config) => config,
      Err(err) => {
        eprintln!("{path}: {err}");
        std::process::exit(1);
      }
    },
    None => CavernConfig::for_chunk_counts(5, 3, 8),
  };

  let mut app = App::new();
  app.add_plugins((MinimalPlugins, LogPlugin::default(), CavernPlugin::new(config)));
  app.update();

  let (width, height) = {
    let grid = app.world().resource::<Terrain>().grid();
    (grid.width() as i32, grid.height() as i32)
  };

  // Two shafts that drift sideways as they descend, then a tunnel joining
  // them near the bottom.
  for y in 1..height - 2 {
    let left = width / 4 + (y % 5) - 2;
    let right = 3 * width / 4 - (y % 3) + 1;
    let mut messages = app.world_mut().resource_mut::<Messages<CarveTerrain>>();
    messages.write(CarveTerrain(EditRequest::centered(
      CellPos::new(left, y),
      Brush::Cross.mask(),
      true,
    )));
    messages.write(CarveTerrain(EditRequest::centered(
      CellPos::new(right, y),
      Brush::Point.mask(),
      true,
    )));
    app.update();
  }
  for x in width / 4..=3 * width / 4 {
    app
      .world_mut()
      .resource_mut::<Messages<CarveTerrain>>()
      .write(CarveTerrain(EditRequest::centered(
        CellPos::new(x, height - 4),
        Brush::Square3.mask(),
        true,
      )));
  }
  app.update();

  print_terrain(app.world().resource::<Terrain>());
}

fn print_terrain(terrain: &Terrain) {
  let regions = terrain.regions();
  let ids = regions.ids_by_serial();
  let grid = terrain.grid();

  for y in 0..grid.height() as i32 {
    let row: String = (0..grid.width() as i32)
      .map(|x| match grid.cell(CellPos::new(x, y)) {
        Some(Cell::Room(id)) => {
          let index = ids.iter().position(|r| *r == id).unwrap_or(0);
          char::from(b'a' + (index % 26) as u8)
        }
        Some(Cell::Unassigned) => '?',
        _ => '#',
      })
      .collect();
    println!("{row}");
  }

  println!();
  for (index, (_, region)) in regions.iter().enumerate() {
    println!(
      "room {} (#{}): {} cells, {} edge cells",
      char::from(b'a' + (index % 26) as u8),
      region.serial(),
      region.len(),
      region.edge_tiles().len()
    );
    for contour in region.contours() {
      let Some(first) = contour.points.first() else {
        continue;
      };
      let start = terrain.transform().cell_to_world(*first);
      println!(
        "  {} contour, {} points, starts at ({:.1}, {:.1})",
        if contour.closed { "closed" } else { "open" },
        contour.len(),
        start.x,
        start.y
      );
    }
  }

  let chunk_contours: usize = terrain.chunks().iter().map(|c| c.contours().len()).sum();
  println!(
    "\n{} chunks, {} chunk contours",
    terrain.chunks().len(),
    chunk_contours
  );
}
