//! Hexstead - a settlement-building board game engine
//!
//! This crate provides the core rules for Hexstead, including:
//! - Direction enumerations and fixed hex-adjacency tables
//! - The 19-hex board with shared-geometry resolution for edges and corners
//! - Piece pools, the resource ledger, and production crediting
//! - The turn-phase state machine with full rule enforcement
//!
//! # Architecture
//!
//! Tiles live in a flat arena owned by the board; neighbor links are arena
//! indices wired once at construction. A road or settlement is stored in
//! exactly one tile's slot even though up to two tiles share an edge and up
//! to three share a corner, so every rule check resolves the full sharer set.
//! Play is driven through [`Game`], which authenticates a player name and
//! delegates to the current phase state; every rule violation comes back as
//! a [`RequestResult`] value rather than an error.
//!
//! # Modules
//!
//! - [`direction`]: edge and corner directions plus adjacency tables
//! - [`resource`]: resource types, card sets, building costs, the card bank
//! - [`die`]: the six-sided die boundary
//! - [`piece`]: road and settlement pieces, the per-player piece pool
//! - [`tile`]: a single hex with its local slots
//! - [`board`]: the arena, spiral construction, and placement operations
//! - [`player`]: player identity, resources, and victory points
//! - [`game`]: the phase state machine and the request façade

pub mod board;
pub mod die;
pub mod direction;
pub mod game;
pub mod piece;
pub mod player;
pub mod resource;
pub mod tile;

// Re-export commonly used types
pub use board::{Board, BoardError, CornerSite, EdgeSite, PlacementRefusal, GRID_SIDE, TILE_COUNT};
pub use die::{FlatRandomDie, SequenceDie, SixSidedDie};
pub use direction::{CornerDirection, EdgeDirection};
pub use game::{
    Game, GamePhase, GameSnapshot, PhaseState, RequestEffect, RequestResult,
    ROBBER_ACTIVATION_SCORE,
};
pub use piece::{PieceKind, PiecePool, RoadPiece, SettlementKind, SettlementPiece};
pub use player::{Player, PlayerColor, PlayerIndex, VICTORY_POINT_THRESHOLD};
pub use resource::{costs, CardBank, Resource, ResourceCardSet};
pub use tile::{LandType, ProductionScore, Tile, TileId};
