//! The turn-phase state machine and the request façade.
//!
//! Play moves through a strict sequence of phases: two rounds of initial
//! placement, then normal turns, then a terminal post-victory state. Each
//! phase is one variant of the closed [`PhaseState`] union, every variant
//! answering the same request contract; a request that makes no sense for
//! the current phase gets a fixed refusal rather than being structurally
//! absent, which keeps the façade's call sites uniform.
//!
//! Every mutating request consumes the current state and returns the next
//! state together with a [`RequestResult`]. Refusals hand back the state
//! unchanged; rule violations are values, never panics. The shared
//! [`InternalState`] record travels from variant to variant in a
//! single-writer ownership handoff.

use crate::board::{Board, CornerSite, EdgeSite, GRID_SIDE};
use crate::die::SixSidedDie;
use crate::direction::{CornerDirection, EdgeDirection};
use crate::player::{Player, PlayerColor, PlayerIndex};
use crate::resource::{costs, CardBank, ResourceCardSet};
use crate::tile::{Tile, TileId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// The 2d6 sum that activates the robber instead of production
pub const ROBBER_ACTIVATION_SCORE: u8 = 7;

/// Coarse phase tag exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    InitialPlacement,
    NormalTurns,
    GameOver,
}

/// What a request did to the flow of the game: whether it was applied, and
/// whether control passes to the next player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestEffect {
    /// The request was refused; the same player should correct and retry
    RefusedSameTurn,
    /// The request was applied; the same player continues
    SuccessfulSameTurn,
    /// The request was applied and control passes to the next player
    SuccessfulNewTurn,
    /// The game is over; nothing can be applied any more
    RefusedGameOver,
}

/// The outcome handed back for every request: an effect tag plus a
/// human-readable confirmation or diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestResult {
    pub effect: RequestEffect,
    pub message: String,
}

impl RequestResult {
    fn refused(message: impl Into<String>) -> Self {
        Self {
            effect: RequestEffect::RefusedSameTurn,
            message: message.into(),
        }
    }

    fn successful_same_turn(message: impl Into<String>) -> Self {
        Self {
            effect: RequestEffect::SuccessfulSameTurn,
            message: message.into(),
        }
    }

    fn successful_new_turn(message: impl Into<String>) -> Self {
        Self {
            effect: RequestEffect::SuccessfulNewTurn,
            message: message.into(),
        }
    }

    fn refused_game_over(message: impl Into<String>) -> Self {
        Self {
            effect: RequestEffect::RefusedGameOver,
            message: message.into(),
        }
    }
}

/// Reported by the longest-road recalculation hook.
///
/// The hook runs after every road or settlement mutation; the recalculation
/// itself is not implemented yet, so the holder never changes hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongestRoadChange {
    Unchanged,
}

/// The record shared by every phase: board, die, players in turn order, the
/// coarse phase tag, and the result of the last applied request. Owned by
/// exactly one phase-state value at a time.
#[derive(Debug)]
pub struct InternalState {
    pub board: Board,
    pub die: Box<dyn SixSidedDie>,
    pub players: Vec<Player>,
    pub card_bank: CardBank,
    pub phase: GamePhase,
    pub last_successful_request_result: Option<RequestResult>,
}

impl InternalState {
    pub(crate) fn new(board: Board, die: Box<dyn SixSidedDie>, player_names: Vec<String>) -> Self {
        let players = player_names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Player::new(index, name))
            .collect();
        Self {
            board,
            die,
            players,
            card_bank: CardBank::new(),
            phase: GamePhase::InitialPlacement,
            last_successful_request_result: None,
        }
    }

    /// Look a player up by name
    pub fn player(&self, player_name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == player_name)
    }

    fn player_name(&self, player: PlayerIndex) -> &str {
        &self.players[player].name
    }

    /// Resolve a row/column pair to a tile, with a specific diagnostic for
    /// each way the lookup can fail
    fn resolve_tile(&self, row: usize, column: usize) -> Result<TileId, String> {
        if row >= GRID_SIDE {
            return Err(format!(
                "row {} is not a valid row index, the range is 0 to {}",
                row,
                GRID_SIDE - 1
            ));
        }
        if column >= GRID_SIDE {
            return Err(format!(
                "position {} is not a valid hex index, the range is 0 to {}",
                column,
                GRID_SIDE - 1
            ));
        }
        self.board
            .tile_at(row, column)
            .ok_or_else(|| format!("there is no hex at position {} in row {}", column, row))
    }
}

/// The current phase of the game, implementing the full request contract.
/// Transitions only move forward; `AfterVictory` is absorbing.
#[derive(Debug)]
pub enum PhaseState {
    FirstPlacementRound(PlacementRound),
    SecondPlacementRound(PlacementRound),
    NormalTurns(NormalTurns),
    AfterVictory(AfterVictory),
}

impl PhaseState {
    /// Start a new game in the first placement round
    pub fn new_game(
        player_names: Vec<String>,
        board: Board,
        die: Box<dyn SixSidedDie>,
    ) -> Self {
        assert!(
            (3..=4).contains(&player_names.len()),
            "the game needs 3 or 4 players"
        );
        let mut seen = Vec::new();
        for name in &player_names {
            assert!(!seen.contains(&name), "player names must be distinct");
            seen.push(name);
        }

        let state = InternalState::new(board, die, player_names);
        let placement_queue = (0..state.players.len()).collect();
        PhaseState::FirstPlacementRound(PlacementRound {
            state,
            placement_queue,
        })
    }

    /// The shared state as clients may read it
    pub fn readable(&self) -> &InternalState {
        match self {
            PhaseState::FirstPlacementRound(round) => &round.state,
            PhaseState::SecondPlacementRound(round) => &round.state,
            PhaseState::NormalTurns(turns) => &turns.state,
            PhaseState::AfterVictory(after) => &after.state,
        }
    }

    /// The player whose action the game is waiting for, None once it is over
    pub fn active_player(&self) -> Option<PlayerIndex> {
        match self {
            PhaseState::FirstPlacementRound(round)
            | PhaseState::SecondPlacementRound(round) => {
                round.placement_queue.front().copied()
            }
            PhaseState::NormalTurns(turns) => Some(turns.active_player),
            PhaseState::AfterVictory(_) => None,
        }
    }

    pub fn place_initial_settlement(
        self,
        player: PlayerIndex,
        row: usize,
        column: usize,
        settlement_corner: CornerDirection,
        road_edge: EdgeDirection,
    ) -> (PhaseState, RequestResult) {
        match self {
            PhaseState::FirstPlacementRound(round) => {
                round.place_initial_settlement(false, player, row, column, settlement_corner, road_edge)
            }
            PhaseState::SecondPlacementRound(round) => {
                round.place_initial_settlement(true, player, row, column, settlement_corner, road_edge)
            }
            PhaseState::NormalTurns(turns) => (
                PhaseState::NormalTurns(turns),
                RequestResult::refused("the initial settlement placement phase is over"),
            ),
            PhaseState::AfterVictory(after) => after.game_over(),
        }
    }

    pub fn begin_next_normal_turn(self, player: PlayerIndex) -> (PhaseState, RequestResult) {
        match self {
            PhaseState::FirstPlacementRound(round) => (
                PhaseState::FirstPlacementRound(round),
                RequestResult::refused("still in the initial settlement placement phase"),
            ),
            PhaseState::SecondPlacementRound(round) => (
                PhaseState::SecondPlacementRound(round),
                RequestResult::refused("still in the initial settlement placement phase"),
            ),
            PhaseState::NormalTurns(turns) => turns.begin_next_normal_turn(player),
            PhaseState::AfterVictory(after) => after.game_over(),
        }
    }

    pub fn make_maritime_trade(
        self,
        player: PlayerIndex,
        offered_outgoing: ResourceCardSet,
        desired_incoming: ResourceCardSet,
    ) -> (PhaseState, RequestResult) {
        match self {
            PhaseState::FirstPlacementRound(round) => (
                PhaseState::FirstPlacementRound(round),
                RequestResult::refused("still in the initial settlement placement phase"),
            ),
            PhaseState::SecondPlacementRound(round) => (
                PhaseState::SecondPlacementRound(round),
                RequestResult::refused("still in the initial settlement placement phase"),
            ),
            PhaseState::NormalTurns(turns) => {
                turns.make_maritime_trade(player, offered_outgoing, desired_incoming)
            }
            PhaseState::AfterVictory(after) => after.game_over(),
        }
    }

    pub fn build_road(
        self,
        player: PlayerIndex,
        row: usize,
        column: usize,
        road_edge: EdgeDirection,
    ) -> (PhaseState, RequestResult) {
        match self {
            PhaseState::FirstPlacementRound(round) => (
                PhaseState::FirstPlacementRound(round),
                RequestResult::refused("still in the initial settlement placement phase"),
            ),
            PhaseState::SecondPlacementRound(round) => (
                PhaseState::SecondPlacementRound(round),
                RequestResult::refused("still in the initial settlement placement phase"),
            ),
            PhaseState::NormalTurns(turns) => turns.build_road(player, row, column, road_edge),
            PhaseState::AfterVictory(after) => after.game_over(),
        }
    }

    pub fn build_settlement(
        self,
        player: PlayerIndex,
        row: usize,
        column: usize,
        settlement_corner: CornerDirection,
    ) -> (PhaseState, RequestResult) {
        match self {
            PhaseState::FirstPlacementRound(round) => (
                PhaseState::FirstPlacementRound(round),
                RequestResult::refused("still in the initial settlement placement phase"),
            ),
            PhaseState::SecondPlacementRound(round) => (
                PhaseState::SecondPlacementRound(round),
                RequestResult::refused("still in the initial settlement placement phase"),
            ),
            PhaseState::NormalTurns(turns) => {
                turns.build_settlement(player, row, column, settlement_corner)
            }
            PhaseState::AfterVictory(after) => after.game_over(),
        }
    }

    pub fn upgrade_to_city(
        self,
        player: PlayerIndex,
        row: usize,
        column: usize,
        settlement_corner: CornerDirection,
    ) -> (PhaseState, RequestResult) {
        match self {
            PhaseState::FirstPlacementRound(round) => (
                PhaseState::FirstPlacementRound(round),
                RequestResult::refused("still in the initial settlement placement phase"),
            ),
            PhaseState::SecondPlacementRound(round) => (
                PhaseState::SecondPlacementRound(round),
                RequestResult::refused("still in the initial settlement placement phase"),
            ),
            PhaseState::NormalTurns(turns) => {
                turns.upgrade_to_city(player, row, column, settlement_corner)
            }
            PhaseState::AfterVictory(after) => after.game_over(),
        }
    }
}

/// One round of initial placement. The queue holds the players yet to place
/// this round; the head is the active player. The first round runs in turn
/// order, the second in reverse, and only the second grants starting
/// resources for the tiles around the new settlement.
#[derive(Debug)]
pub struct PlacementRound {
    state: InternalState,
    placement_queue: VecDeque<PlayerIndex>,
}

impl PlacementRound {
    fn rewrap(self, is_second_round: bool) -> PhaseState {
        if is_second_round {
            PhaseState::SecondPlacementRound(self)
        } else {
            PhaseState::FirstPlacementRound(self)
        }
    }

    fn place_initial_settlement(
        mut self,
        is_second_round: bool,
        player: PlayerIndex,
        row: usize,
        column: usize,
        settlement_corner: CornerDirection,
        road_edge: EdgeDirection,
    ) -> (PhaseState, RequestResult) {
        let active = *self
            .placement_queue
            .front()
            .expect("a live placement round always has players waiting");
        if player != active {
            let message = format!(
                "{} is not the active player, {} is",
                self.state.player_name(player),
                self.state.player_name(active)
            );
            return (self.rewrap(is_second_round), RequestResult::refused(message));
        }

        let tile = match self.state.resolve_tile(row, column) {
            Ok(tile) => tile,
            Err(message) => {
                return (self.rewrap(is_second_round), RequestResult::refused(message))
            }
        };

        let placement = {
            let InternalState { board, players, .. } = &mut self.state;
            board.place_initial_settlement_and_road(
                &mut players[player].pieces,
                CornerSite::new(tile, settlement_corner),
                road_edge,
            )
        };
        let adjacent_production = match placement {
            Ok(adjacent_production) => adjacent_production,
            Err(refusal) => {
                return (
                    self.rewrap(is_second_round),
                    RequestResult::refused(refusal.to_string()),
                )
            }
        };

        // The second placement comes with one card for every producing tile
        // around the new settlement; the first comes with nothing.
        if is_second_round {
            for resource in adjacent_production {
                self.state.players[player].accept_resource(resource, 1);
            }
        }

        self.placement_queue.pop_front();

        let message = format!(
            "Player {} placed on hex {}-{} a settlement on the {} corner and a road on the {} edge",
            self.state.player_name(player),
            row,
            column,
            settlement_corner,
            road_edge
        );

        if !self.placement_queue.is_empty() {
            let result = RequestResult::successful_same_turn(message);
            self.state.last_successful_request_result = Some(result.clone());
            return (self.rewrap(is_second_round), result);
        }

        // The round is complete: reverse the order for round two, or enter
        // normal turns after round two.
        let result = RequestResult::successful_new_turn(message);
        self.state.last_successful_request_result = Some(result.clone());
        if is_second_round {
            (
                PhaseState::NormalTurns(NormalTurns::enter(self.state)),
                result,
            )
        } else {
            let placement_queue = (0..self.state.players.len()).rev().collect();
            (
                PhaseState::SecondPlacementRound(PlacementRound {
                    state: self.state,
                    placement_queue,
                }),
                result,
            )
        }
    }
}

/// The main phase of the game: players roll for production, trade with the
/// bank, and build, until someone reaches the victory threshold.
#[derive(Debug)]
pub struct NormalTurns {
    state: InternalState,
    active_player: PlayerIndex,
    player_count: usize,
    /// Production score -> tiles triggered by it, built once at entry
    tiles_by_score: HashMap<u8, Vec<TileId>>,
}

impl NormalTurns {
    pub(crate) fn enter(mut state: InternalState) -> Self {
        state.phase = GamePhase::NormalTurns;

        let mut tiles_by_score: HashMap<u8, Vec<TileId>> = HashMap::new();
        for tile_id in state.board.tile_ids() {
            if let Some(score) = state.board.tile(tile_id).production_score() {
                tiles_by_score.entry(score.value()).or_default().push(tile_id);
            }
        }

        let player_count = state.players.len();
        let mut turns = Self {
            state,
            active_player: 0,
            player_count,
            tiles_by_score,
        };
        turns.roll_for_production();
        turns
    }

    /// Roll both dice and, unless the robber sum comes up, credit every
    /// settlement adjacent to a triggered tile
    fn roll_for_production(&mut self) -> (u8, u8) {
        let first = self.state.die.new_roll();
        let second = self.state.die.new_roll();
        let score = first + second;

        if score != ROBBER_ACTIVATION_SCORE {
            if let Some(tile_ids) = self.tiles_by_score.get(&score) {
                for &tile_id in tile_ids {
                    for (player, resource, count) in self.state.board.produce(tile_id) {
                        self.state.players[player].accept_resource(resource, count);
                    }
                }
            }
        }

        (first, second)
    }

    /// Recalculate which player holds the longest-road bonus. Called after
    /// every road and settlement mutation; the algorithm itself is not
    /// implemented, so the holder never changes hands.
    fn recompute_longest_road(&mut self) -> LongestRoadChange {
        LongestRoadChange::Unchanged
    }

    fn refuse_unless_active(&self, player: PlayerIndex) -> Option<RequestResult> {
        if player == self.active_player {
            return None;
        }
        Some(RequestResult::refused(format!(
            "{} is not the active player, {} is",
            self.state.player_name(player),
            self.state.player_name(self.active_player)
        )))
    }

    fn begin_next_normal_turn(mut self, player: PlayerIndex) -> (PhaseState, RequestResult) {
        if let Some(refusal) = self.refuse_unless_active(player) {
            return (PhaseState::NormalTurns(self), refusal);
        }

        // Another player's action may have pushed the incoming player over
        // the threshold already (a broken road bonus, say): the game ends
        // before any dice are rolled.
        let next = (self.active_player + 1) % self.player_count;
        if self.state.players[next].has_won() {
            return AfterVictory::enter(self.state, next).game_over();
        }

        self.active_player = next;
        let (first, second) = self.roll_for_production();
        let score = first + second;

        let message = if score == ROBBER_ACTIVATION_SCORE {
            format!(
                "Player {} rolled {} + {} = 7, so the robber let no hex produce",
                self.state.player_name(next),
                first,
                second
            )
        } else {
            format!(
                "Player {} rolled {} + {} = {}, producing for hexes with that score",
                self.state.player_name(next),
                first,
                second,
                score
            )
        };
        let result = RequestResult::successful_new_turn(message);
        self.state.last_successful_request_result = Some(result.clone());
        (PhaseState::NormalTurns(self), result)
    }

    fn make_maritime_trade(
        mut self,
        player: PlayerIndex,
        offered_outgoing: ResourceCardSet,
        desired_incoming: ResourceCardSet,
    ) -> (PhaseState, RequestResult) {
        if let Some(refusal) = self.refuse_unless_active(player) {
            return (PhaseState::NormalTurns(self), refusal);
        }

        let maritime_rate = self.state.players[player].maritime_rate();
        let offered_type = offered_outgoing.single_resource_and_count().map(|(resource, _)| resource);
        let desired_type = desired_incoming.single_resource_and_count().map(|(resource, _)| resource);

        let traded = {
            let InternalState {
                players, card_bank, ..
            } = &mut self.state;
            card_bank.make_maritime_trade(
                &mut players[player].resources,
                maritime_rate,
                &offered_outgoing,
                &desired_incoming,
            )
        };
        if !traded {
            let message = format!(
                "not a valid maritime trade: offer a single resource type at your maritime rate of {} cards for exactly 1 card of a different type",
                maritime_rate
            );
            return (PhaseState::NormalTurns(self), RequestResult::refused(message));
        }

        let message = format!(
            "Player {} gave the bank {} {} for 1 {}",
            self.state.player_name(player),
            maritime_rate,
            offered_type.expect("a completed trade had a single offered type"),
            desired_type.expect("a completed trade had a single desired type"),
        );
        let result = RequestResult::successful_same_turn(message);
        self.state.last_successful_request_result = Some(result.clone());
        (PhaseState::NormalTurns(self), result)
    }

    fn build_road(
        mut self,
        player: PlayerIndex,
        row: usize,
        column: usize,
        road_edge: EdgeDirection,
    ) -> (PhaseState, RequestResult) {
        if let Some(refusal) = self.refuse_unless_active(player) {
            return (PhaseState::NormalTurns(self), refusal);
        }

        let cost = costs::road();
        if !self.state.players[player].can_afford(&cost) {
            let message = format!(
                "{} cannot afford a road (1 brick + 1 lumber)",
                self.state.player_name(player)
            );
            return (PhaseState::NormalTurns(self), RequestResult::refused(message));
        }

        let tile = match self.state.resolve_tile(row, column) {
            Ok(tile) => tile,
            Err(message) => {
                return (PhaseState::NormalTurns(self), RequestResult::refused(message))
            }
        };

        let placement = {
            let InternalState { board, players, .. } = &mut self.state;
            board.place_road(&mut players[player].pieces, EdgeSite::new(tile, road_edge))
        };
        if let Err(refusal) = placement {
            return (
                PhaseState::NormalTurns(self),
                RequestResult::refused(refusal.to_string()),
            );
        }

        self.state.players[player].pay(&cost);
        self.state.card_bank.absorb(&cost);
        self.recompute_longest_road();

        let message = format!(
            "Player {} placed a road on the {} edge of hex {}-{}",
            self.state.player_name(player),
            road_edge,
            row,
            column
        );
        self.finish_build(player, message)
    }

    fn build_settlement(
        mut self,
        player: PlayerIndex,
        row: usize,
        column: usize,
        settlement_corner: CornerDirection,
    ) -> (PhaseState, RequestResult) {
        if let Some(refusal) = self.refuse_unless_active(player) {
            return (PhaseState::NormalTurns(self), refusal);
        }

        let cost = costs::settlement();
        if !self.state.players[player].can_afford(&cost) {
            let message = format!(
                "{} cannot afford a settlement (1 brick + 1 lumber + 1 grain + 1 wool)",
                self.state.player_name(player)
            );
            return (PhaseState::NormalTurns(self), RequestResult::refused(message));
        }

        let tile = match self.state.resolve_tile(row, column) {
            Ok(tile) => tile,
            Err(message) => {
                return (PhaseState::NormalTurns(self), RequestResult::refused(message))
            }
        };

        let placement = {
            let InternalState { board, players, .. } = &mut self.state;
            board.place_settlement(
                &mut players[player].pieces,
                CornerSite::new(tile, settlement_corner),
            )
        };
        if let Err(refusal) = placement {
            return (
                PhaseState::NormalTurns(self),
                RequestResult::refused(refusal.to_string()),
            );
        }

        self.state.players[player].pay(&cost);
        self.state.card_bank.absorb(&cost);
        self.state.players[player].award_victory_point();
        self.recompute_longest_road();

        let message = format!(
            "Player {} placed a settlement on the {} corner of hex {}-{}",
            self.state.player_name(player),
            settlement_corner,
            row,
            column
        );
        self.finish_build(player, message)
    }

    fn upgrade_to_city(
        mut self,
        player: PlayerIndex,
        row: usize,
        column: usize,
        settlement_corner: CornerDirection,
    ) -> (PhaseState, RequestResult) {
        if let Some(refusal) = self.refuse_unless_active(player) {
            return (PhaseState::NormalTurns(self), refusal);
        }

        let cost = costs::city();
        if !self.state.players[player].can_afford(&cost) {
            let message = format!(
                "{} cannot afford a city (3 ore + 2 grain)",
                self.state.player_name(player)
            );
            return (PhaseState::NormalTurns(self), RequestResult::refused(message));
        }

        let tile = match self.state.resolve_tile(row, column) {
            Ok(tile) => tile,
            Err(message) => {
                return (PhaseState::NormalTurns(self), RequestResult::refused(message))
            }
        };

        let placement = {
            let InternalState { board, players, .. } = &mut self.state;
            board.upgrade_to_city(
                &mut players[player].pieces,
                CornerSite::new(tile, settlement_corner),
            )
        };
        if let Err(refusal) = placement {
            return (
                PhaseState::NormalTurns(self),
                RequestResult::refused(refusal.to_string()),
            );
        }

        self.state.players[player].pay(&cost);
        self.state.card_bank.absorb(&cost);
        self.state.players[player].award_victory_point();
        self.recompute_longest_road();

        let message = format!(
            "Player {} upgraded the settlement on the {} corner of hex {}-{} to a city",
            self.state.player_name(player),
            settlement_corner,
            row,
            column
        );
        self.finish_build(player, message)
    }

    /// Common tail of every build: check the victory threshold and either
    /// stay in normal turns or end the game
    fn finish_build(mut self, player: PlayerIndex, message: String) -> (PhaseState, RequestResult) {
        if self.state.players[player].has_won() {
            let result = RequestResult::successful_new_turn(format!(
                "{}, winning the game",
                message
            ));
            // AfterVictory caches the game-over summary as the last result;
            // every request from here on gets that summary back.
            let after = AfterVictory::enter(self.state, player);
            return (PhaseState::AfterVictory(after), result);
        }

        let result = RequestResult::successful_same_turn(message);
        self.state.last_successful_request_result = Some(result.clone());
        (PhaseState::NormalTurns(self), result)
    }
}

/// The terminal phase. The game-over summary with the final scores is
/// computed once at entry and returned for every request from then on.
#[derive(Debug)]
pub struct AfterVictory {
    state: InternalState,
    game_over_result: RequestResult,
}

impl AfterVictory {
    fn enter(mut state: InternalState, winner: PlayerIndex) -> Self {
        state.phase = GamePhase::GameOver;

        let final_scores = state
            .players
            .iter()
            .map(|player| format!("{}: {}", player.name, player.victory_point_score()))
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!(
            "Game over, won by {} - final scores: {}",
            state.players[winner].name, final_scores
        );
        let game_over_result = RequestResult::refused_game_over(message);
        state.last_successful_request_result = Some(game_over_result.clone());

        Self {
            state,
            game_over_result,
        }
    }

    fn game_over(self) -> (PhaseState, RequestResult) {
        let result = self.game_over_result.clone();
        (PhaseState::AfterVictory(self), result)
    }
}

/// One whole game. Authenticates a player name to a position in the turn
/// order, delegates the request to the current phase state, and replaces
/// that state with whatever comes back.
#[derive(Debug)]
pub struct Game {
    phase_state: Option<PhaseState>,
}

impl Game {
    pub fn new(player_names: Vec<String>, board: Board, die: Box<dyn SixSidedDie>) -> Self {
        Self {
            phase_state: Some(PhaseState::new_game(player_names, board, die)),
        }
    }

    fn state(&self) -> &PhaseState {
        self.phase_state
            .as_ref()
            .expect("the phase state is only vacant mid-request")
    }

    /// Read-only view of the board grid
    pub fn view_board(&self) -> [[Option<&Tile>; GRID_SIDE]; GRID_SIDE] {
        self.state().readable().board.view()
    }

    pub fn phase(&self) -> GamePhase {
        self.state().readable().phase
    }

    pub fn player(&self, player_name: &str) -> Option<&Player> {
        self.state().readable().player(player_name)
    }

    pub fn active_player_name(&self) -> Option<&str> {
        let readable = self.state().readable();
        self.state()
            .active_player()
            .map(|player| readable.players[player].name.as_str())
    }

    pub fn last_successful_request_result(&self) -> Option<&RequestResult> {
        self.state()
            .readable()
            .last_successful_request_result
            .as_ref()
    }

    pub fn place_initial_settlement(
        &mut self,
        player_name: &str,
        row: usize,
        column: usize,
        settlement_corner: CornerDirection,
        road_edge: EdgeDirection,
    ) -> RequestResult {
        self.authenticate_then_delegate(player_name, |phase, player| {
            phase.place_initial_settlement(player, row, column, settlement_corner, road_edge)
        })
    }

    pub fn begin_next_normal_turn(&mut self, player_name: &str) -> RequestResult {
        self.authenticate_then_delegate(player_name, |phase, player| {
            phase.begin_next_normal_turn(player)
        })
    }

    pub fn make_maritime_trade(
        &mut self,
        player_name: &str,
        offered_outgoing: ResourceCardSet,
        desired_incoming: ResourceCardSet,
    ) -> RequestResult {
        self.authenticate_then_delegate(player_name, |phase, player| {
            phase.make_maritime_trade(player, offered_outgoing, desired_incoming)
        })
    }

    pub fn build_road(
        &mut self,
        player_name: &str,
        row: usize,
        column: usize,
        road_edge: EdgeDirection,
    ) -> RequestResult {
        self.authenticate_then_delegate(player_name, |phase, player| {
            phase.build_road(player, row, column, road_edge)
        })
    }

    pub fn build_settlement(
        &mut self,
        player_name: &str,
        row: usize,
        column: usize,
        settlement_corner: CornerDirection,
    ) -> RequestResult {
        self.authenticate_then_delegate(player_name, |phase, player| {
            phase.build_settlement(player, row, column, settlement_corner)
        })
    }

    pub fn upgrade_to_city(
        &mut self,
        player_name: &str,
        row: usize,
        column: usize,
        settlement_corner: CornerDirection,
    ) -> RequestResult {
        self.authenticate_then_delegate(player_name, |phase, player| {
            phase.upgrade_to_city(player, row, column, settlement_corner)
        })
    }

    /// Serializable snapshot of the visible game state
    pub fn snapshot(&self) -> GameSnapshot<'_> {
        let readable = self.state().readable();
        GameSnapshot {
            phase: readable.phase,
            active_player: self.active_player_name(),
            players: readable
                .players
                .iter()
                .map(|player| PlayerSnapshot {
                    name: &player.name,
                    color: player.color,
                    resources: &player.resources,
                    victory_points: player.victory_point_score(),
                })
                .collect(),
            board: &readable.board,
            last_successful_request_result: readable.last_successful_request_result.as_ref(),
        }
    }

    /// The visible game state as a JSON string, for clients
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }

    fn authenticate_then_delegate(
        &mut self,
        player_name: &str,
        request: impl FnOnce(PhaseState, PlayerIndex) -> (PhaseState, RequestResult),
    ) -> RequestResult {
        let player = match self
            .state()
            .readable()
            .players
            .iter()
            .position(|player| player.name == player_name)
        {
            Some(player) => player,
            None => return RequestResult::refused(format!("Unknown player {}", player_name)),
        };

        let phase = self
            .phase_state
            .take()
            .expect("the phase state is only vacant mid-request");
        let (next_phase, result) = request(phase, player);
        self.phase_state = Some(next_phase);
        result
    }
}

/// The visible game state, serializable for clients
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot<'a> {
    pub phase: GamePhase,
    pub active_player: Option<&'a str>,
    pub players: Vec<PlayerSnapshot<'a>>,
    pub board: &'a Board,
    pub last_successful_request_result: Option<&'a RequestResult>,
}

/// One player as everyone may see them: hidden hands are not a concern at
/// this boundary, clients filter for their own UI
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot<'a> {
    pub name: &'a str,
    pub color: PlayerColor,
    pub resources: &'a ResourceCardSet,
    pub victory_points: u32,
}
