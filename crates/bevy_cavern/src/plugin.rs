//! Bevy integration.
//!
//! [`CavernPlugin`] inserts a [`Terrain`] resource and applies
//! [`CarveTerrain`] messages to it once per frame, in the order they were
//! written. Every edit that changed the grid is echoed as a
//! [`TerrainChanged`] message for renderers and collider builders.

use std::path::Path;

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::config::CavernConfig;
use crate::edit::EditRequest;
use crate::error::ConfigError;
use crate::terrain::{EditOutcome, Terrain};

/// Request to edit the terrain.
#[derive(bevy::prelude::Message, Clone, Debug)]
pub struct CarveTerrain(pub EditRequest);

/// Emitted after an edit changed at least one cell.
#[derive(bevy::prelude::Message, Clone, Debug)]
pub struct TerrainChanged(pub EditOutcome);

/// Plugin owning the [`Terrain`] resource.
#[derive(Default)]
pub struct CavernPlugin {
  pub config: CavernConfig,
}

impl CavernPlugin {
  pub fn new(config: CavernConfig) -> Self {
    Self { config }
  }

  /// Creates the plugin from a TOML config file.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    CavernConfig::load(path).map(Self::new)
  }
}

impl Plugin for CavernPlugin {
  fn build(&self, app: &mut App) {
    let terrain = Terrain::new(self.config.clone()).or_else(|err| {
      warn!("invalid terrain config, using defaults: {err}");
      Terrain::new(CavernConfig::default())
    });
    match terrain {
      Ok(terrain) => {
        app.insert_resource(terrain);
      }
      Err(err) => error!("failed to create terrain: {err}"),
    }

    app
      .add_message::<CarveTerrain>()
      .add_message::<TerrainChanged>()
      .add_systems(
        Update,
        apply_carve_requests.run_if(resource_exists::<Terrain>),
      );
  }
}

/// Applies queued [`CarveTerrain`] requests.
pub fn apply_carve_requests(
  mut terrain: ResMut<Terrain>,
  mut requests: MessageReader<CarveTerrain>,
  mut changed: MessageWriter<TerrainChanged>,
) {
  for CarveTerrain(request) in requests.read() {
    match terrain.apply_edit(request) {
      Ok(outcome) if outcome.is_noop() => {}
      Ok(outcome) => {
        changed.write(TerrainChanged(outcome));
      }
      Err(err) => warn!("rejected terrain edit: {err}"),
    }
  }
}
