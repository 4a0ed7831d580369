//! The 19-hex board: tile arena, almanac-spiral construction, shared-geometry
//! resolution, and the placement operations.
//!
//! Tiles live in a flat arena indexed by [`TileId`]; the 5x5 grid and the
//! neighbor links are wired once at construction and never change. An edge is
//! physically shared by up to two tiles and a corner by up to three, but a
//! piece is stored in exactly one tile's slot, so every legality check and
//! read resolves the full sharer set instead of trusting a local slot.

use crate::direction::{CornerDirection, EdgeDirection};
use crate::piece::{PieceKind, PiecePool, SettlementKind, SettlementPiece};
use crate::player::PlayerIndex;
use crate::resource::Resource;
use crate::tile::{LandType, ProductionScore, Tile, TileId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Width and height of the square grid holding the hex board
pub const GRID_SIDE: usize = 5;

/// Number of land hexes on a board
pub const TILE_COUNT: usize = 19;

/// A physical edge named by the slot that stores (or would store) its road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeSite {
    pub tile: TileId,
    pub edge: EdgeDirection,
}

impl EdgeSite {
    pub fn new(tile: TileId, edge: EdgeDirection) -> Self {
        Self { tile, edge }
    }
}

/// A physical corner named by the slot that stores (or would store) its
/// settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CornerSite {
    pub tile: TileId,
    pub corner: CornerDirection,
}

impl CornerSite {
    pub fn new(tile: TileId, corner: CornerDirection) -> Self {
        Self { tile, corner }
    }
}

/// Construction-time invariant violations. Rule refusals during play are
/// [`PlacementRefusal`] values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cannot fit {0} hex tiles into the 19-hex almanac spiral pattern")]
    WrongTileCount(usize),
}

/// Why the board refused a placement. Every variant renders the diagnostic
/// shown to the requesting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementRefusal {
    #[error("the {edge} edge is already occupied by a road")]
    EdgeOccupied { edge: EdgeDirection },

    #[error("the {edge} edge does not lead away from the {corner} corner")]
    EdgeNotAtCorner {
        corner: CornerDirection,
        edge: EdgeDirection,
    },

    #[error("the {corner} corner is too close to another settlement")]
    TooCloseToSettlement { corner: CornerDirection },

    #[error("neither corner of the {edge} edge connects to a road or settlement of the placing player")]
    RoadNotConnected { edge: EdgeDirection },

    #[error("no road owned by the player leads to the {corner} corner (remember to place on a hex carrying the road)")]
    SettlementNotConnected { corner: CornerDirection },

    #[error("a settlement on the {corner} corner would sever another player's road")]
    WouldSeverRoad { corner: CornerDirection },

    #[error("there is no settlement on the {corner} corner to upgrade")]
    NoSettlementToUpgrade { corner: CornerDirection },

    #[error("the settlement on the {corner} corner belongs to another player")]
    SettlementOwnedByAnother { corner: CornerDirection },

    #[error("the settlement on the {corner} corner is already a city")]
    AlreadyACity { corner: CornerDirection },

    #[error("no {piece} pieces left in the pool")]
    OutOfPieces { piece: PieceKind },
}

/// The hex board.
///
/// Row 0 of the grid is the southernmost row; rows run south to north and
/// columns west to east. Not every grid cell holds a tile - the hexagonal
/// outline leaves three cells empty in each of the four corners of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<Tile>,
    grid: [[Option<TileId>; GRID_SIDE]; GRID_SIDE],
    /// Producing tile -> storage sites of the settlements adjacent to it.
    /// Updated when a settlement is placed; read when the tile produces.
    production_registry: HashMap<TileId, Vec<CornerSite>>,
}

/// Grid placement of the almanac spiral: 0 means no hex, any other value is
/// the position in the spiral plus one. The first row is the southernmost,
/// so the pattern reads vertically inverted compared to the printed almanac.
const ALMANAC_SPIRAL: [[usize; GRID_SIDE]; GRID_SIDE] = [
    [5, 6, 7, 0, 0],
    [4, 15, 16, 8, 0],
    [3, 14, 19, 17, 9],
    [0, 2, 13, 18, 10],
    [0, 0, 1, 12, 11],
];

/// The eighteen production score tokens of the game box, in the almanac's
/// alphabetical token order
const SCORE_TOKENS: [u8; 18] = [5, 2, 6, 3, 8, 10, 9, 12, 11, 4, 8, 10, 9, 4, 5, 6, 3, 11];

/// Grid offset of the neighbor in the given direction, as (row, column)
/// deltas. The square grid's x = y diagonal runs along the NE/SW axis.
const fn grid_step(direction: EdgeDirection) -> (isize, isize) {
    match direction {
        EdgeDirection::NorthEast => (1, 1),
        EdgeDirection::East => (0, 1),
        EdgeDirection::SouthEast => (-1, 0),
        EdgeDirection::SouthWest => (-1, -1),
        EdgeDirection::West => (0, -1),
        EdgeDirection::NorthWest => (1, 0),
    }
}

impl Board {
    /// Build a board from 19 tiles given in almanac-spiral order, wiring
    /// every neighbor link once.
    pub fn from_spiral(tiles_in_spiral_order: Vec<Tile>) -> Result<Self, BoardError> {
        if tiles_in_spiral_order.len() != TILE_COUNT {
            return Err(BoardError::WrongTileCount(tiles_in_spiral_order.len()));
        }

        let mut grid = [[None; GRID_SIDE]; GRID_SIDE];
        for (row, spiral_row) in ALMANAC_SPIRAL.iter().enumerate() {
            for (column, &position_plus_one) in spiral_row.iter().enumerate() {
                if position_plus_one > 0 {
                    grid[row][column] = Some(position_plus_one - 1);
                }
            }
        }

        let mut board = Self {
            tiles: tiles_in_spiral_order,
            grid,
            production_registry: HashMap::new(),
        };
        board.wire_neighbors();
        Ok(board)
    }

    /// A fully random board from the thread-local generator; see
    /// [`Board::random`] for the layout guarantees
    pub fn fully_random() -> Self {
        let mut rng = rand::thread_rng();
        Self::random(&mut rng)
    }

    /// A random compliant board: 3 hills, 4 forest, 3 mountains, 4 fields,
    /// and 4 pasture with scores drawn without replacement from the fixed
    /// token multiset, plus the desert at a uniformly random spiral position.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut lands = vec![
            LandType::Hills,
            LandType::Hills,
            LandType::Hills,
            LandType::Forest,
            LandType::Forest,
            LandType::Forest,
            LandType::Forest,
            LandType::Mountains,
            LandType::Mountains,
            LandType::Mountains,
            LandType::Fields,
            LandType::Fields,
            LandType::Fields,
            LandType::Fields,
            LandType::Pasture,
            LandType::Pasture,
            LandType::Pasture,
            LandType::Pasture,
        ];
        lands.shuffle(rng);

        let mut scores = SCORE_TOKENS;
        scores.shuffle(rng);

        let mut tiles: Vec<Tile> = lands
            .into_iter()
            .zip(scores)
            .map(|(land, score)| {
                let score = ProductionScore::new(score)
                    .expect("every box token is a valid production score");
                Tile::productive(land, score)
            })
            .collect();
        tiles.insert(rng.gen_range(0..=tiles.len()), Tile::desert());

        Self::from_spiral(tiles).expect("the random layout always has 19 tiles")
    }

    fn wire_neighbors(&mut self) {
        for row in 0..GRID_SIDE {
            for column in 0..GRID_SIDE {
                let tile_id = match self.grid[row][column] {
                    Some(tile_id) => tile_id,
                    None => continue,
                };
                for direction in EdgeDirection::ALL {
                    let (row_step, column_step) = grid_step(direction);
                    let neighbor_row = row as isize + row_step;
                    let neighbor_column = column as isize + column_step;
                    let in_bounds = (0..GRID_SIDE as isize).contains(&neighbor_row)
                        && (0..GRID_SIDE as isize).contains(&neighbor_column);
                    if in_bounds {
                        self.tiles[tile_id].neighbors[direction.index()] =
                            self.grid[neighbor_row as usize][neighbor_column as usize];
                    }
                }
            }
        }
    }

    pub fn tile(&self, tile_id: TileId) -> &Tile {
        &self.tiles[tile_id]
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// The tile at a grid position, if the indices are in range and the cell
    /// holds a hex
    pub fn tile_at(&self, row: usize, column: usize) -> Option<TileId> {
        *self.grid.get(row)?.get(column)?
    }

    /// Read-only view of the grid for rendering
    pub fn view(&self) -> [[Option<&Tile>; GRID_SIDE]; GRID_SIDE] {
        let mut view = [[None; GRID_SIDE]; GRID_SIDE];
        for (row, grid_row) in self.grid.iter().enumerate() {
            for (column, cell) in grid_row.iter().enumerate() {
                view[row][column] = cell.map(|tile_id| &self.tiles[tile_id]);
            }
        }
        view
    }

    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> {
        0..self.tiles.len()
    }

    /// The 1-2 sites naming the same physical edge: the site itself plus the
    /// neighbor across the edge using the opposite direction.
    pub fn edge_sharers(&self, site: EdgeSite) -> Vec<EdgeSite> {
        let mut sharers = vec![site];
        if let Some(neighbor) = self.tiles[site.tile].neighbor(site.edge) {
            sharers.push(EdgeSite::new(neighbor, site.edge.opposite()));
        }
        sharers
    }

    /// The 1-3 sites naming the same physical corner: the site itself plus,
    /// across each edge touching the corner, the neighbor's reflected corner.
    pub fn corner_sharers(&self, site: CornerSite) -> Vec<CornerSite> {
        let mut sharers = vec![site];
        for edge in site.corner.edges() {
            if let Some(neighbor) = self.tiles[site.tile].neighbor(edge) {
                sharers.push(CornerSite::new(
                    neighbor,
                    site.corner.reflected_across(edge),
                ));
            }
        }
        sharers
    }

    /// Whether the physical edge carries a road, whichever sharer stores it
    pub fn has_road(&self, site: EdgeSite) -> bool {
        self.road_owner(site).is_some()
    }

    /// Owner of the road on the physical edge, if any. At most one sharer
    /// slot can be occupied.
    pub fn road_owner(&self, site: EdgeSite) -> Option<PlayerIndex> {
        self.edge_sharers(site).into_iter().find_map(|sharer| {
            self.tiles[sharer.tile]
                .road_in_slot(sharer.edge)
                .map(|road| road.owner)
        })
    }

    /// Owner and kind of the settlement on the physical corner, if any.
    ///
    /// Panics if more than one sharer slot is occupied: the placement
    /// discipline makes that structurally impossible, so finding it means
    /// the board is corrupt and play must not continue.
    pub fn settlement_at(&self, site: CornerSite) -> Option<(PlayerIndex, SettlementKind)> {
        self.settlement_storage_site(site).map(|storage| {
            let piece = self.tiles[storage.tile]
                .settlement_in_slot(storage.corner)
                .expect("storage site is occupied");
            (piece.owner, piece.kind())
        })
    }

    /// The sharer slot actually storing the settlement on this physical
    /// corner, if any
    fn settlement_storage_site(&self, site: CornerSite) -> Option<CornerSite> {
        let occupied: Vec<CornerSite> = self
            .corner_sharers(site)
            .into_iter()
            .filter(|sharer| {
                self.tiles[sharer.tile]
                    .settlement_in_slot(sharer.corner)
                    .is_some()
            })
            .collect();

        if occupied.len() > 1 {
            panic!(
                "multiple tiles claim the settlement on the physical corner at {:?}",
                site
            );
        }

        occupied.into_iter().next()
    }

    /// Distance rule: the corner itself and every physically adjacent corner
    /// must be free of settlements. Each flanking corner is resolved through
    /// its own sharer set, so a piece stored on a tile outside this corner's
    /// sharers is still seen.
    fn corner_too_close_to_settlement(&self, site: CornerSite) -> bool {
        if self.settlement_at(site).is_some() {
            return true;
        }
        self.corner_sharers(site).into_iter().any(|sharer| {
            sharer
                .corner
                .rotational_neighbors()
                .into_iter()
                .any(|flank| {
                    self.settlement_at(CornerSite::new(sharer.tile, flank))
                        .is_some()
                })
        })
    }

    /// Whether any edge touching the physical corner carries a road of the
    /// given player
    fn owned_road_touches_corner(&self, owner: PlayerIndex, site: CornerSite) -> bool {
        self.corner_sharers(site).into_iter().any(|sharer| {
            sharer.corner.edges().into_iter().any(|edge| {
                self.road_owner(EdgeSite::new(sharer.tile, edge)) == Some(owner)
            })
        })
    }

    /// Whether a corner lets the given player's road network continue through
    /// it: either the player's own settlement sits there, or it is empty and
    /// one of its edges carries the player's road. Another player's
    /// settlement blocks the connection.
    fn corner_connects_for(&self, owner: PlayerIndex, site: CornerSite) -> bool {
        match self.settlement_at(site) {
            Some((settlement_owner, _)) => settlement_owner == owner,
            None => self.owned_road_touches_corner(owner, site),
        }
    }

    /// Whether placing a settlement on the corner would cut a road of a
    /// single other player running straight through it
    fn would_sever_road(&self, owner: PlayerIndex, site: CornerSite) -> bool {
        self.corner_sharers(site).into_iter().any(|sharer| {
            let [anticlockwise, clockwise] = sharer.corner.edges();
            let first = self.road_owner(EdgeSite::new(sharer.tile, anticlockwise));
            let second = self.road_owner(EdgeSite::new(sharer.tile, clockwise));
            first.is_some() && first == second && first != Some(owner)
        })
    }

    /// Place a road on an unoccupied edge connected to the placing player's
    /// network. The piece is drawn from the pool only after the geometry
    /// checks pass, so an exhausted pool is reported as such and never as a
    /// geometry refusal.
    pub fn place_road(
        &mut self,
        pool: &mut PiecePool,
        site: EdgeSite,
    ) -> Result<(), PlacementRefusal> {
        if self.has_road(site) {
            return Err(PlacementRefusal::EdgeOccupied { edge: site.edge });
        }

        let owner = pool.owner();
        let connects = site
            .edge
            .corners()
            .into_iter()
            .any(|corner| self.corner_connects_for(owner, CornerSite::new(site.tile, corner)));
        if !connects {
            return Err(PlacementRefusal::RoadNotConnected { edge: site.edge });
        }

        let road = pool
            .take_road()
            .ok_or(PlacementRefusal::OutOfPieces {
                piece: PieceKind::Road,
            })?;
        self.tiles[site.tile].roads[site.edge.index()] = Some(road);
        Ok(())
    }

    /// Place a settlement on a corner reached by the player's own road,
    /// respecting the distance rule. The connectivity check reads the two
    /// edges of the invoking tile, so the request must name a tile carrying
    /// the road.
    pub fn place_settlement(
        &mut self,
        pool: &mut PiecePool,
        site: CornerSite,
    ) -> Result<(), PlacementRefusal> {
        let owner = pool.owner();
        let connected = site.corner.edges().into_iter().any(|edge| {
            self.road_owner(EdgeSite::new(site.tile, edge)) == Some(owner)
        });
        if !connected {
            return Err(PlacementRefusal::SettlementNotConnected {
                corner: site.corner,
            });
        }

        if self.corner_too_close_to_settlement(site) {
            return Err(PlacementRefusal::TooCloseToSettlement {
                corner: site.corner,
            });
        }

        if self.would_sever_road(owner, site) {
            return Err(PlacementRefusal::WouldSeverRoad {
                corner: site.corner,
            });
        }

        let settlement = pool
            .take_village()
            .ok_or(PlacementRefusal::OutOfPieces {
                piece: PieceKind::Village,
            })?;
        self.record_settlement(site, settlement);
        Ok(())
    }

    /// Combined settlement-and-road placement for the initial rounds: the
    /// road must lead away from the new settlement, and the connectivity
    /// requirements of normal play are skipped since there is nothing to
    /// connect to yet. Returns the resources of the sharing tiles that
    /// produce, for the second-round starting grant.
    pub fn place_initial_settlement_and_road(
        &mut self,
        pool: &mut PiecePool,
        settlement_site: CornerSite,
        road_edge: EdgeDirection,
    ) -> Result<Vec<Resource>, PlacementRefusal> {
        if !settlement_site.corner.edges().contains(&road_edge) {
            return Err(PlacementRefusal::EdgeNotAtCorner {
                corner: settlement_site.corner,
                edge: road_edge,
            });
        }

        let road_site = EdgeSite::new(settlement_site.tile, road_edge);
        if self.has_road(road_site) {
            return Err(PlacementRefusal::EdgeOccupied { edge: road_edge });
        }

        if self.corner_too_close_to_settlement(settlement_site) {
            return Err(PlacementRefusal::TooCloseToSettlement {
                corner: settlement_site.corner,
            });
        }

        if pool.villages_remaining() == 0 {
            return Err(PlacementRefusal::OutOfPieces {
                piece: PieceKind::Village,
            });
        }
        if pool.roads_remaining() == 0 {
            return Err(PlacementRefusal::OutOfPieces {
                piece: PieceKind::Road,
            });
        }

        let settlement = pool.take_village().expect("stock checked above");
        let road = pool.take_road().expect("stock checked above");
        self.record_settlement(settlement_site, settlement);
        self.tiles[road_site.tile].roads[road_site.edge.index()] = Some(road);

        let adjacent_production = self
            .corner_sharers(settlement_site)
            .into_iter()
            .filter_map(|sharer| self.tiles[sharer.tile].produced_resource())
            .collect();
        Ok(adjacent_production)
    }

    /// Upgrade the player's own settlement on the corner to a city. A city
    /// occupies the same corner with the same owner, so connectivity and
    /// distance state are unaffected.
    pub fn upgrade_to_city(
        &mut self,
        pool: &mut PiecePool,
        site: CornerSite,
    ) -> Result<(), PlacementRefusal> {
        let storage = self.settlement_storage_site(site).ok_or(
            PlacementRefusal::NoSettlementToUpgrade {
                corner: site.corner,
            },
        )?;

        let piece = self.tiles[storage.tile]
            .settlement_in_slot(storage.corner)
            .expect("storage site is occupied");
        if piece.owner != pool.owner() {
            return Err(PlacementRefusal::SettlementOwnedByAnother {
                corner: site.corner,
            });
        }
        if piece.kind() == SettlementKind::City {
            return Err(PlacementRefusal::AlreadyACity {
                corner: site.corner,
            });
        }

        if !pool.upgrade_village_to_city() {
            return Err(PlacementRefusal::OutOfPieces {
                piece: PieceKind::City,
            });
        }

        self.tiles[storage.tile].settlements[storage.corner.index()]
            .as_mut()
            .expect("storage site is occupied")
            .upgrade_to_city();
        Ok(())
    }

    /// Resource credits due when this tile produces: one entry per adjacent
    /// settlement, with the card count read live from the piece so a later
    /// city upgrade doubles the credit without touching the registry. Empty
    /// for the desert.
    pub fn produce(&self, tile_id: TileId) -> Vec<(PlayerIndex, Resource, i64)> {
        let resource = match self.tiles[tile_id].produced_resource() {
            Some(resource) => resource,
            None => return Vec::new(),
        };

        let mut credits = Vec::new();
        if let Some(sites) = self.production_registry.get(&tile_id) {
            for site in sites {
                let piece = self.tiles[site.tile]
                    .settlement_in_slot(site.corner)
                    .expect("registered settlement sites stay occupied");
                credits.push((piece.owner, resource, piece.resource_multiplier()));
            }
        }
        credits
    }

    /// Store a settlement in the invoking site's slot and subscribe it to
    /// production on every sharing tile.
    fn record_settlement(&mut self, site: CornerSite, settlement: SettlementPiece) {
        self.tiles[site.tile].settlements[site.corner.index()] = Some(settlement);
        for sharer in self.corner_sharers(site) {
            self.production_registry
                .entry(sharer.tile)
                .or_default()
                .push(site);
        }

        // Consistency check: the mutation discipline guarantees a single
        // occupied slot per physical corner; settlement_at aborts otherwise.
        let _ = self.settlement_at(site);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// The desert at the start of the spiral (a coastal cell), then 18
    /// productive tiles cycling through the land types
    fn plain_board() -> Board {
        let lands = [
            LandType::Hills,
            LandType::Forest,
            LandType::Mountains,
            LandType::Fields,
            LandType::Pasture,
        ];
        let mut tiles = vec![Tile::desert()];
        for position in 0..18 {
            let land = lands[position % lands.len()];
            let score = SCORE_TOKENS[position];
            tiles.push(Tile::productive(
                land,
                ProductionScore::new(score).unwrap(),
            ));
        }
        Board::from_spiral(tiles).unwrap()
    }

    /// The center tile of the board (last position in the spiral)
    fn center_tile(board: &Board) -> TileId {
        board.tile_at(2, 2).unwrap()
    }

    #[test]
    fn test_wrong_tile_count_is_refused() {
        let tiles = vec![Tile::desert(); 5];
        assert_eq!(
            Board::from_spiral(tiles),
            Err(BoardError::WrongTileCount(5))
        );
    }

    #[test]
    fn test_neighbor_links_are_reciprocal() {
        let board = plain_board();
        for tile_id in board.tile_ids() {
            for direction in EdgeDirection::ALL {
                if let Some(neighbor) = board.tile(tile_id).neighbor(direction) {
                    assert_eq!(
                        board.tile(neighbor).neighbor(direction.opposite()),
                        Some(tile_id),
                        "neighbor links must form reciprocal pairs"
                    );
                }
            }
        }
    }

    #[test]
    fn test_center_tile_has_six_neighbors() {
        let board = plain_board();
        let center = center_tile(&board);
        let neighbor_count = EdgeDirection::ALL
            .iter()
            .filter(|direction| board.tile(center).neighbor(**direction).is_some())
            .count();
        assert_eq!(neighbor_count, 6);
    }

    #[test]
    fn test_boundary_tile_has_fewer_neighbors() {
        let board = plain_board();
        // Spiral position 1 sits on the coast.
        let coastal = board.tile_at(4, 2).unwrap();
        let neighbor_count = EdgeDirection::ALL
            .iter()
            .filter(|direction| board.tile(coastal).neighbor(**direction).is_some())
            .count();
        assert!(neighbor_count < 6);
    }

    #[test]
    fn test_sharer_counts() {
        let board = plain_board();
        let center = center_tile(&board);

        for edge in EdgeDirection::ALL {
            assert_eq!(board.edge_sharers(EdgeSite::new(center, edge)).len(), 2);
        }
        for corner in CornerDirection::ALL {
            assert_eq!(
                board.corner_sharers(CornerSite::new(center, corner)).len(),
                3
            );
        }

        // A coastal tile has edges and corners with no sharer at all.
        let coastal = board.tile_at(4, 2).unwrap();
        let lone_edges = EdgeDirection::ALL
            .iter()
            .filter(|edge| board.edge_sharers(EdgeSite::new(coastal, **edge)).len() == 1)
            .count();
        assert!(lone_edges > 0);
    }

    #[test]
    fn test_corner_sharers_name_the_same_point() {
        // Every sharer of a corner must list the original site among its own
        // sharers; the relation is symmetric because the point is physical.
        let board = plain_board();
        for tile_id in board.tile_ids() {
            for corner in CornerDirection::ALL {
                let site = CornerSite::new(tile_id, corner);
                for sharer in board.corner_sharers(site) {
                    assert!(
                        board.corner_sharers(sharer).contains(&site),
                        "sharer sets must agree on the physical point"
                    );
                }
            }
        }
    }

    #[test]
    fn test_random_board_composition() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let board = Board::random(&mut rng);
            assert_eq!(board.tile_count(), TILE_COUNT);

            let mut land_counts: HashMap<LandType, usize> = HashMap::new();
            let mut score_counts: HashMap<u8, usize> = HashMap::new();
            for tile_id in board.tile_ids() {
                let tile = board.tile(tile_id);
                *land_counts.entry(tile.land_type()).or_default() += 1;
                if let Some(score) = tile.production_score() {
                    *score_counts.entry(score.value()).or_default() += 1;
                }
                // The robber starts on the desert and nowhere else.
                assert_eq!(tile.has_robber, tile.land_type() == LandType::Desert);
            }

            assert_eq!(land_counts[&LandType::Hills], 3);
            assert_eq!(land_counts[&LandType::Forest], 4);
            assert_eq!(land_counts[&LandType::Mountains], 3);
            assert_eq!(land_counts[&LandType::Fields], 4);
            assert_eq!(land_counts[&LandType::Pasture], 4);
            assert_eq!(land_counts[&LandType::Desert], 1);

            for score in [3u8, 4, 5, 6, 8, 9, 10, 11] {
                assert_eq!(score_counts[&score], 2, "score {} appears twice", score);
            }
            assert_eq!(score_counts[&2], 1);
            assert_eq!(score_counts[&12], 1);
        }
    }

    #[test]
    fn test_initial_placement_and_read_through_sharers() {
        let mut board = plain_board();
        let mut pool = PiecePool::new(0);
        let center = center_tile(&board);
        let site = CornerSite::new(center, CornerDirection::North);

        board
            .place_initial_settlement_and_road(&mut pool, site, EdgeDirection::NorthEast)
            .unwrap();

        // Every sharer sees the same settlement and the same road.
        for sharer in board.corner_sharers(site) {
            assert_eq!(
                board.settlement_at(sharer),
                Some((0, SettlementKind::Village))
            );
        }
        let road_site = EdgeSite::new(center, EdgeDirection::NorthEast);
        for sharer in board.edge_sharers(road_site) {
            assert_eq!(board.road_owner(sharer), Some(0));
        }

        // Exactly one slot stores the settlement.
        let occupied_slots = board
            .corner_sharers(site)
            .into_iter()
            .filter(|sharer| {
                board
                    .tile(sharer.tile)
                    .settlement_in_slot(sharer.corner)
                    .is_some()
            })
            .count();
        assert_eq!(occupied_slots, 1);
    }

    #[test]
    fn test_initial_placement_requires_edge_at_corner() {
        let mut board = plain_board();
        let mut pool = PiecePool::new(0);
        let center = center_tile(&board);

        let refused = board.place_initial_settlement_and_road(
            &mut pool,
            CornerSite::new(center, CornerDirection::North),
            EdgeDirection::SouthWest,
        );
        assert_eq!(
            refused,
            Err(PlacementRefusal::EdgeNotAtCorner {
                corner: CornerDirection::North,
                edge: EdgeDirection::SouthWest,
            })
        );
        assert_eq!(pool.villages_remaining(), 5);
        assert_eq!(pool.roads_remaining(), 15);
    }

    #[test]
    fn test_initial_placement_refuses_occupied_edge_via_neighbor() {
        let mut board = plain_board();
        let mut first_pool = PiecePool::new(0);
        let mut second_pool = PiecePool::new(1);
        let center = center_tile(&board);

        board
            .place_initial_settlement_and_road(
                &mut first_pool,
                CornerSite::new(center, CornerDirection::North),
                EdgeDirection::NorthEast,
            )
            .unwrap();

        // The same physical edge named from the neighboring tile.
        let neighbor = board.tile(center).neighbor(EdgeDirection::NorthEast).unwrap();
        let refused = board.place_initial_settlement_and_road(
            &mut second_pool,
            CornerSite::new(neighbor, CornerDirection::South),
            EdgeDirection::SouthWest,
        );
        assert_eq!(
            refused,
            Err(PlacementRefusal::EdgeOccupied {
                edge: EdgeDirection::SouthWest,
            })
        );
    }

    #[test]
    fn test_distance_rule_across_sharers() {
        let mut board = plain_board();
        let mut first_pool = PiecePool::new(0);
        let mut second_pool = PiecePool::new(1);
        let center = center_tile(&board);

        board
            .place_initial_settlement_and_road(
                &mut first_pool,
                CornerSite::new(center, CornerDirection::North),
                EdgeDirection::NorthEast,
            )
            .unwrap();

        // One rotational step away on the same tile: too close.
        let refused = board.place_initial_settlement_and_road(
            &mut second_pool,
            CornerSite::new(center, CornerDirection::NorthEast),
            EdgeDirection::East,
        );
        assert_eq!(
            refused,
            Err(PlacementRefusal::TooCloseToSettlement {
                corner: CornerDirection::NorthEast,
            })
        );

        // The adjacent corner named from a sharing neighbor: still too close.
        let neighbor = board.tile(center).neighbor(EdgeDirection::NorthWest).unwrap();
        let refused = board.place_initial_settlement_and_road(
            &mut second_pool,
            CornerSite::new(neighbor, CornerDirection::NorthEast),
            EdgeDirection::NorthEast,
        );
        assert_eq!(
            refused,
            Err(PlacementRefusal::TooCloseToSettlement {
                corner: CornerDirection::NorthEast,
            })
        );
    }

    #[test]
    fn test_distance_rule_sees_piece_stored_on_third_sharer() {
        // A settlement stored on a tile outside the placement corner's own
        // sharer set must still block placement one edge away.
        let mut board = plain_board();
        let mut first_pool = PiecePool::new(0);
        let mut second_pool = PiecePool::new(1);
        let center = center_tile(&board);

        // The corner north of center's North corner, stored on the tile
        // north of the point rather than on either tile sharing an edge
        // with the center.
        let north_west = board.tile(center).neighbor(EdgeDirection::NorthWest).unwrap();
        let north_of_point = board
            .tile(north_west)
            .neighbor(EdgeDirection::NorthEast)
            .unwrap();
        board
            .place_initial_settlement_and_road(
                &mut first_pool,
                CornerSite::new(north_of_point, CornerDirection::South),
                EdgeDirection::SouthEast,
            )
            .unwrap();

        let refused = board.place_initial_settlement_and_road(
            &mut second_pool,
            CornerSite::new(center, CornerDirection::North),
            EdgeDirection::NorthEast,
        );
        assert_eq!(
            refused,
            Err(PlacementRefusal::TooCloseToSettlement {
                corner: CornerDirection::North,
            })
        );
    }

    #[test]
    fn test_road_placement_requires_connection() {
        let mut board = plain_board();
        let mut pool = PiecePool::new(0);
        let center = center_tile(&board);

        let refused = board.place_road(&mut pool, EdgeSite::new(center, EdgeDirection::East));
        assert_eq!(
            refused,
            Err(PlacementRefusal::RoadNotConnected {
                edge: EdgeDirection::East,
            })
        );

        board
            .place_initial_settlement_and_road(
                &mut pool,
                CornerSite::new(center, CornerDirection::North),
                EdgeDirection::NorthEast,
            )
            .unwrap();

        // Now the East edge connects through the NorthEast corner to the
        // initial road.
        board
            .place_road(&mut pool, EdgeSite::new(center, EdgeDirection::East))
            .unwrap();
        assert_eq!(
            board.road_owner(EdgeSite::new(center, EdgeDirection::East)),
            Some(0)
        );
    }

    #[test]
    fn test_road_placement_blocked_by_other_settlement() {
        let mut board = plain_board();
        let mut first_pool = PiecePool::new(0);
        let mut second_pool = PiecePool::new(1);
        let center = center_tile(&board);

        board
            .place_initial_settlement_and_road(
                &mut first_pool,
                CornerSite::new(center, CornerDirection::North),
                EdgeDirection::NorthEast,
            )
            .unwrap();

        // The second player settles on the physical point at the center's
        // SouthEast corner, invoking the eastern neighbor so their road
        // leads away without touching the center's edges.
        let east_neighbor = board.tile(center).neighbor(EdgeDirection::East).unwrap();
        board
            .place_initial_settlement_and_road(
                &mut second_pool,
                CornerSite::new(east_neighbor, CornerDirection::SouthWest),
                EdgeDirection::SouthWest,
            )
            .unwrap();
        assert_eq!(
            board.settlement_at(CornerSite::new(center, CornerDirection::SouthEast)),
            Some((1, SettlementKind::Village))
        );

        // First player's continuation through NorthEast works: that corner
        // is empty with their road on it.
        board
            .place_road(&mut first_pool, EdgeSite::new(center, EdgeDirection::East))
            .unwrap();

        // But continuing past the second player's settlement is blocked:
        // the SouthEast corner belongs to someone else.
        let refused = board.place_road(
            &mut first_pool,
            EdgeSite::new(center, EdgeDirection::SouthEast),
        );
        assert_eq!(
            refused,
            Err(PlacementRefusal::RoadNotConnected {
                edge: EdgeDirection::SouthEast,
            })
        );
    }

    #[test]
    fn test_settlement_requires_own_road_on_invoking_tile() {
        let mut board = plain_board();
        let mut pool = PiecePool::new(0);
        let center = center_tile(&board);

        board
            .place_initial_settlement_and_road(
                &mut pool,
                CornerSite::new(center, CornerDirection::North),
                EdgeDirection::NorthEast,
            )
            .unwrap();
        board
            .place_road(&mut pool, EdgeSite::new(center, EdgeDirection::East))
            .unwrap();

        // The SouthEast corner touches the East road on this tile and is two
        // steps from the North settlement.
        board
            .place_settlement(&mut pool, CornerSite::new(center, CornerDirection::SouthEast))
            .unwrap();
        assert_eq!(
            board.settlement_at(CornerSite::new(center, CornerDirection::SouthEast)),
            Some((0, SettlementKind::Village))
        );

        // A corner with no road of this player nearby is refused.
        let refused =
            board.place_settlement(&mut pool, CornerSite::new(center, CornerDirection::SouthWest));
        assert_eq!(
            refused,
            Err(PlacementRefusal::SettlementNotConnected {
                corner: CornerDirection::SouthWest,
            })
        );
    }

    #[test]
    fn test_upgrade_to_city() {
        let mut board = plain_board();
        let mut pool = PiecePool::new(0);
        let mut other_pool = PiecePool::new(1);
        let center = center_tile(&board);
        let site = CornerSite::new(center, CornerDirection::North);

        board
            .place_initial_settlement_and_road(&mut pool, site, EdgeDirection::NorthEast)
            .unwrap();

        // Wrong owner is refused before the pool is touched.
        assert_eq!(
            board.upgrade_to_city(&mut other_pool, site),
            Err(PlacementRefusal::SettlementOwnedByAnother {
                corner: CornerDirection::North,
            })
        );
        assert_eq!(other_pool.cities_remaining(), 4);

        // Upgrading through a sharer site touches the same physical corner.
        let sharer = board.corner_sharers(site)[1];
        board.upgrade_to_city(&mut pool, sharer).unwrap();
        assert_eq!(board.settlement_at(site), Some((0, SettlementKind::City)));

        // A city cannot be upgraded again.
        assert_eq!(
            board.upgrade_to_city(&mut pool, site),
            Err(PlacementRefusal::AlreadyACity {
                corner: CornerDirection::North,
            })
        );

        // An empty corner has nothing to upgrade.
        assert_eq!(
            board.upgrade_to_city(&mut pool, CornerSite::new(center, CornerDirection::South)),
            Err(PlacementRefusal::NoSettlementToUpgrade {
                corner: CornerDirection::South,
            })
        );
    }

    #[test]
    fn test_production_credits_every_sharing_tile() {
        let mut board = plain_board();
        let mut pool = PiecePool::new(0);
        let center = center_tile(&board);
        let site = CornerSite::new(center, CornerDirection::North);

        board
            .place_initial_settlement_and_road(&mut pool, site, EdgeDirection::NorthEast)
            .unwrap();

        // All three tiles sharing the corner credit the owner once each.
        for sharer in board.corner_sharers(site) {
            let credits = board.produce(sharer.tile);
            let expected_resource = board.tile(sharer.tile).produced_resource().unwrap();
            assert_eq!(credits, vec![(0, expected_resource, 1)]);
        }

        // After the upgrade the same events credit two cards.
        board.upgrade_to_city(&mut pool, site).unwrap();
        for sharer in board.corner_sharers(site) {
            let credits = board.produce(sharer.tile);
            let expected_resource = board.tile(sharer.tile).produced_resource().unwrap();
            assert_eq!(credits, vec![(0, expected_resource, 2)]);
        }
    }

    #[test]
    fn test_desert_produces_nothing() {
        let mut board = plain_board();
        let mut pool = PiecePool::new(0);

        // Spiral position 1 is the desert in the plain layout.
        let desert = board.tile_at(4, 2).unwrap();
        assert_eq!(board.tile(desert).land_type(), LandType::Desert);

        board
            .place_initial_settlement_and_road(
                &mut pool,
                CornerSite::new(desert, CornerDirection::North),
                EdgeDirection::NorthEast,
            )
            .unwrap();
        assert_eq!(board.produce(desert), Vec::new());
    }
}
