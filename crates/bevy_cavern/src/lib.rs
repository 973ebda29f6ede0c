//! Cavern - destructible cave terrain for Bevy.
//!
//! A fixed-size occupancy grid that can be carved and filled cell by cell.
//! Edits keep three derived views up to date incrementally:
//! - rooms: connected empty regions, each with its boundary contours
//! - chunks: overlapping windows with their own contours, for bounded rebuilds
//! - contours: ordered boundary polylines for physics and rendering
//!
//! Use [`Terrain`] directly, or add [`CavernPlugin`] and write
//! [`CarveTerrain`] messages.

pub mod chunk;
pub mod config;
pub mod contour;
pub mod coords;
pub mod edit;
pub mod error;
pub mod grid;
pub mod plugin;
pub mod region;
pub mod seeding;
pub mod terrain;

pub use chunk::{Chunk, ChunkPartition, ChunkPos, ChunkRange};
pub use config::{BorderPolicy, CavernConfig};
pub use contour::{Contour, TraceDiagnostic, TraceOutput, trace_edges};
pub use coords::{CellPos, CellRect, Direction, MapTransform};
pub use edit::{Brush, EditMask, EditRequest};
pub use error::{ConfigError, EditError};
pub use grid::{Cell, OccupancyGrid};
pub use plugin::{CarveTerrain, CavernPlugin, TerrainChanged, apply_carve_requests};
pub use region::{ReconcileReport, Region, RegionId, RegionTracker};
pub use seeding::SeedPattern;
pub use terrain::{EditOutcome, PipelineState, Terrain};
