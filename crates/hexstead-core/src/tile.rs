//! The hex tile: land type, production score, robber flag, and the local
//! piece slots.
//!
//! A tile only knows its own six edge slots and six corner slots plus the
//! arena indices of its neighbors. Everything that spans tile boundaries -
//! resolving which tiles share an edge or corner, placement legality,
//! production crediting - lives on [`crate::board::Board`], which owns the
//! arena.

use crate::direction::{CornerDirection, EdgeDirection};
use crate::piece::{RoadPiece, SettlementPiece};
use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a tile in the board's arena. Neighbor links are stored as these
/// indices rather than references, so the cyclic adjacency graph needs no
/// shared ownership.
pub type TileId = usize;

/// The kind of land a hex represents, determining what it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandType {
    /// Produces brick
    Hills,
    /// Produces lumber
    Forest,
    /// Produces ore
    Mountains,
    /// Produces grain
    Fields,
    /// Produces wool
    Pasture,
    /// Produces nothing; the robber starts here
    Desert,
}

impl LandType {
    /// The resource this land yields, None for desert
    pub fn produced_resource(self) -> Option<Resource> {
        match self {
            LandType::Hills => Some(Resource::Brick),
            LandType::Forest => Some(Resource::Lumber),
            LandType::Mountains => Some(Resource::Ore),
            LandType::Fields => Some(Resource::Grain),
            LandType::Pasture => Some(Resource::Wool),
            LandType::Desert => None,
        }
    }
}

impl fmt::Display for LandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LandType::Hills => "hills",
            LandType::Forest => "forest",
            LandType::Mountains => "mountains",
            LandType::Fields => "fields",
            LandType::Pasture => "pasture",
            LandType::Desert => "desert",
        };
        write!(f, "{}", name)
    }
}

/// A production trigger score: the 2d6 sum that makes a hex produce.
/// Only 2-12 excluding 7 are valid; 7 activates the robber instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductionScore(u8);

impl ProductionScore {
    /// Wrap a 2d6 sum, or None for 7 and out-of-range values
    pub const fn new(score: u8) -> Option<Self> {
        match score {
            2..=6 | 8..=12 => Some(Self(score)),
            _ => None,
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ProductionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One hexagonal board cell.
///
/// The slot arrays are indexed by direction ordinals. An edge or corner slot
/// being occupied here does not mean the physical location is free elsewhere:
/// a piece for a shared location is stored in exactly one of the sharing
/// tiles' slots, so every read must go through the board's sharer resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    land: LandType,
    score: Option<ProductionScore>,
    /// Whether the robber currently occupies this hex
    pub has_robber: bool,
    pub(crate) neighbors: [Option<TileId>; 6],
    pub(crate) roads: [Option<RoadPiece>; 6],
    pub(crate) settlements: [Option<SettlementPiece>; 6],
}

impl Tile {
    /// Create a productive tile. Panics on `LandType::Desert`; use
    /// [`Tile::desert`] for the one desert hex.
    pub fn productive(land: LandType, score: ProductionScore) -> Self {
        assert!(
            land != LandType::Desert,
            "the desert hex has no production score"
        );
        Self {
            land,
            score: Some(score),
            has_robber: false,
            neighbors: [None; 6],
            roads: [None; 6],
            settlements: [None; 6],
        }
    }

    /// Create the desert tile. The robber starts on it.
    pub fn desert() -> Self {
        Self {
            land: LandType::Desert,
            score: None,
            has_robber: true,
            neighbors: [None; 6],
            roads: [None; 6],
            settlements: [None; 6],
        }
    }

    pub fn land_type(&self) -> LandType {
        self.land
    }

    /// The 2d6 sum that triggers production, None for the desert
    pub fn production_score(&self) -> Option<ProductionScore> {
        self.score
    }

    /// The resource this tile produces, None for the desert
    pub fn produced_resource(&self) -> Option<Resource> {
        self.land.produced_resource()
    }

    /// The arena index of the neighbor across the given edge, if any
    pub fn neighbor(&self, direction: EdgeDirection) -> Option<TileId> {
        self.neighbors[direction.index()]
    }

    /// The road stored in this tile's own slot. The physical edge may still
    /// carry a road stored on the neighbor across it.
    pub fn road_in_slot(&self, edge: EdgeDirection) -> Option<&RoadPiece> {
        self.roads[edge.index()].as_ref()
    }

    /// The settlement stored in this tile's own slot. The physical corner
    /// may still carry a settlement stored on a sharing neighbor.
    pub fn settlement_in_slot(&self, corner: CornerDirection) -> Option<&SettlementPiece> {
        self.settlements[corner.index()].as_ref()
    }

    /// Local half of the distance rule: true if this corner slot and the two
    /// slots one rotational step away are all empty on this tile.
    pub(crate) fn corner_clear_with_flanks(&self, corner: CornerDirection) -> bool {
        let [previous, next] = corner.rotational_neighbors();
        self.settlements[previous.index()].is_none()
            && self.settlements[corner.index()].is_none()
            && self.settlements[next.index()].is_none()
    }
}
