//! Road and settlement pieces and the per-player piece pool.

use crate::player::PlayerIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a settlement is still a village or has been upgraded to a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementKind {
    Village,
    City,
}

impl SettlementKind {
    /// Cards credited per production event on an adjacent hex
    pub fn resource_multiplier(self) -> i64 {
        match self {
            SettlementKind::Village => 1,
            SettlementKind::City => 2,
        }
    }
}

/// A road on one edge of a hex. Its location on the board is the slot that
/// holds it; the piece itself only records ownership and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadPiece {
    pub owner: PlayerIndex,
}

/// A settlement on one corner of a hex. The village-to-city upgrade is the
/// only mutation a placed piece ever undergoes; it stays on its corner with
/// its owner for the rest of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPiece {
    pub owner: PlayerIndex,
    kind: SettlementKind,
}

impl SettlementPiece {
    /// New settlements always start as villages
    pub fn village(owner: PlayerIndex) -> Self {
        Self {
            owner,
            kind: SettlementKind::Village,
        }
    }

    pub fn kind(&self) -> SettlementKind {
        self.kind
    }

    /// Cards credited to the owner per production event on an adjacent hex
    pub fn resource_multiplier(&self) -> i64 {
        self.kind.resource_multiplier()
    }

    pub fn upgrade_to_city(&mut self) {
        self.kind = SettlementKind::City;
    }
}

/// The kinds of physical pieces a pool hands out, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    Road,
    Village,
    City,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Road => "road",
            PieceKind::Village => "village",
            PieceKind::City => "city",
        };
        write!(f, "{}", name)
    }
}

/// The stock of physical pieces belonging to one player.
///
/// Initial placement draws from this same pool, so a player enters normal
/// turns with 13 roads and 3 villages left. Upgrading a village to a city
/// returns the village allotment for future building; the city allotment is
/// consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiecePool {
    owner: PlayerIndex,
    roads_remaining: u32,
    villages_remaining: u32,
    cities_remaining: u32,
}

/// Full stock at the start of the game: 15 roads, 5 villages, 4 cities
const INITIAL_ROADS: u32 = 15;
const INITIAL_VILLAGES: u32 = 5;
const INITIAL_CITIES: u32 = 4;

impl PiecePool {
    pub fn new(owner: PlayerIndex) -> Self {
        Self {
            owner,
            roads_remaining: INITIAL_ROADS,
            villages_remaining: INITIAL_VILLAGES,
            cities_remaining: INITIAL_CITIES,
        }
    }

    pub fn owner(&self) -> PlayerIndex {
        self.owner
    }

    pub fn roads_remaining(&self) -> u32 {
        self.roads_remaining
    }

    pub fn villages_remaining(&self) -> u32 {
        self.villages_remaining
    }

    pub fn cities_remaining(&self) -> u32 {
        self.cities_remaining
    }

    /// Draw a road piece, or None when the stock is exhausted
    pub fn take_road(&mut self) -> Option<RoadPiece> {
        if self.roads_remaining == 0 {
            return None;
        }
        self.roads_remaining -= 1;
        Some(RoadPiece { owner: self.owner })
    }

    /// Draw a village piece, or None when the stock is exhausted
    pub fn take_village(&mut self) -> Option<SettlementPiece> {
        if self.villages_remaining == 0 {
            return None;
        }
        self.villages_remaining -= 1;
        Some(SettlementPiece::village(self.owner))
    }

    /// Consume a city allotment and return the upgraded piece's village
    /// allotment to the stock. False when no cities remain.
    pub fn upgrade_village_to_city(&mut self) -> bool {
        if self.cities_remaining == 0 {
            return false;
        }
        self.cities_remaining -= 1;
        self.villages_remaining += 1;
        true
    }
}
