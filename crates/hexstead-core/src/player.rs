//! Player identity, resource ledger, and victory points.

use crate::piece::PiecePool;
use crate::resource::{Resource, ResourceCardSet};
use serde::{Deserialize, Serialize};

/// Position of a player in the turn order, used as their identity everywhere
/// inside the engine. The façade resolves names to indices.
pub type PlayerIndex = usize;

/// Points needed to win the game
pub const VICTORY_POINT_THRESHOLD: u32 = 10;

/// Color tag identifying a player's pieces on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Orange,
    White,
}

impl PlayerColor {
    /// Color for a turn-order position
    pub fn for_player(index: PlayerIndex) -> Self {
        match index % 4 {
            0 => PlayerColor::Red,
            1 => PlayerColor::Blue,
            2 => PlayerColor::Orange,
            _ => PlayerColor::White,
        }
    }
}

/// A player within the game state. Other systems are relied on to have
/// authenticated the entity issuing requests as this player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Turn-order position, the player's identity inside the engine
    pub index: PlayerIndex,
    /// Display name, the player's identity at the façade boundary
    pub name: String,
    pub color: PlayerColor,
    /// Fully-owned resource cards
    pub resources: ResourceCardSet,
    /// Points from settlements and cities. Starts at 2 for the two initial
    /// settlements; initial placement itself does not add points.
    victory_points: u32,
    /// Whether this player holds the longest-road bonus (worth 2 points).
    /// Unreachable while recalculation is stubbed, but scored if ever set.
    pub has_longest_road: bool,
    /// Remaining physical pieces
    pub pieces: PiecePool,
}

impl Player {
    pub fn new(index: PlayerIndex, name: String) -> Self {
        Self {
            index,
            name,
            color: PlayerColor::for_player(index),
            resources: ResourceCardSet::new(),
            victory_points: 2,
            has_longest_road: false,
            pieces: PiecePool::new(index),
        }
    }

    /// Total score: building points plus the longest-road bonus
    pub fn victory_point_score(&self) -> u32 {
        let road_bonus = if self.has_longest_road { 2 } else { 0 };
        self.victory_points + road_bonus
    }

    /// Credit one more building point (new settlement, or village upgraded)
    pub fn award_victory_point(&mut self) {
        self.victory_points += 1;
    }

    /// Whether this player has reached the victory threshold
    pub fn has_won(&self) -> bool {
        self.victory_point_score() >= VICTORY_POINT_THRESHOLD
    }

    /// Credit produced resource cards
    pub fn accept_resource(&mut self, resource: Resource, count: i64) {
        self.resources.add_to(resource, count);
    }

    /// Whether the player's hand covers a building cost
    pub fn can_afford(&self, cost: &ResourceCardSet) -> bool {
        self.resources.has_at_least(cost)
    }

    /// Pay a building cost out of the player's hand
    pub fn pay(&mut self, cost: &ResourceCardSet) {
        self.resources.subtract_all(cost);
    }

    /// Cards of a single type this player must give the bank for one card
    /// back. Ports would lower this; ports are not implemented, so the rate
    /// is the flat 4.
    pub fn maritime_rate(&self) -> i64 {
        4
    }

    /// Offer a trade to another player. Trading between players is not
    /// supported yet, so every offer is refused.
    pub fn offer_trade(
        &self,
        _other_player: PlayerIndex,
        _offered_resources: &ResourceCardSet,
        _requested_resources: &ResourceCardSet,
    ) -> bool {
        false
    }
}
