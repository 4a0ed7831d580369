//! Direction enumerations and the fixed hex-adjacency tables.
//!
//! This module provides the foundational geometry for the board:
//! - `EdgeDirection`: the six sides of a hex, where roads are placed
//! - `CornerDirection`: the six points of a hex, where settlements are placed
//! - Lookup tables relating edges to corners, edges to flanking edges, and
//!   corners across a shared edge
//!
//! Both enumerations are closed, ordinal-indexable sets used purely for array
//! indexing and table lookup. Everything here is a pure function; the tables
//! never change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction from a hex to one of its six neighbors, which is also the
/// direction naming the edge shared with that neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// Northeast edge (top-right)
    NorthEast,
    /// East edge (right)
    East,
    /// Southeast edge (bottom-right)
    SouthEast,
    /// Southwest edge (bottom-left)
    SouthWest,
    /// West edge (left)
    West,
    /// Northwest edge (top-left)
    NorthWest,
}

impl EdgeDirection {
    /// All edge directions in clockwise order starting from NorthEast.
    /// The position in this array is the ordinal used for slot indexing.
    pub const ALL: [EdgeDirection; 6] = [
        EdgeDirection::NorthEast,
        EdgeDirection::East,
        EdgeDirection::SouthEast,
        EdgeDirection::SouthWest,
        EdgeDirection::West,
        EdgeDirection::NorthWest,
    ];

    /// Ordinal index (0-5) for slot arrays and table lookup
    pub const fn index(self) -> usize {
        match self {
            EdgeDirection::NorthEast => 0,
            EdgeDirection::East => 1,
            EdgeDirection::SouthEast => 2,
            EdgeDirection::SouthWest => 3,
            EdgeDirection::West => 4,
            EdgeDirection::NorthWest => 5,
        }
    }

    /// The edge a neighboring hex would use to name the same physical edge.
    ///
    /// This is an involution: `e.opposite().opposite() == e`.
    pub const fn opposite(self) -> EdgeDirection {
        match self {
            EdgeDirection::NorthEast => EdgeDirection::SouthWest,
            EdgeDirection::East => EdgeDirection::West,
            EdgeDirection::SouthEast => EdgeDirection::NorthWest,
            EdgeDirection::SouthWest => EdgeDirection::NorthEast,
            EdgeDirection::West => EdgeDirection::East,
            EdgeDirection::NorthWest => EdgeDirection::SouthEast,
        }
    }

    /// The two corners at the endpoints of this edge, anticlockwise endpoint
    /// first, clockwise endpoint second.
    pub const fn corners(self) -> [CornerDirection; 2] {
        match self {
            EdgeDirection::NorthEast => [CornerDirection::North, CornerDirection::NorthEast],
            EdgeDirection::East => [CornerDirection::NorthEast, CornerDirection::SouthEast],
            EdgeDirection::SouthEast => [CornerDirection::SouthEast, CornerDirection::South],
            EdgeDirection::SouthWest => [CornerDirection::South, CornerDirection::SouthWest],
            EdgeDirection::West => [CornerDirection::SouthWest, CornerDirection::NorthWest],
            EdgeDirection::NorthWest => [CornerDirection::NorthWest, CornerDirection::North],
        }
    }

    /// The two edges of the same hex which meet this edge at its endpoints,
    /// anticlockwise neighbor first, clockwise neighbor second.
    pub const fn flanking_edges(self) -> [EdgeDirection; 2] {
        match self {
            EdgeDirection::NorthEast => [EdgeDirection::NorthWest, EdgeDirection::East],
            EdgeDirection::East => [EdgeDirection::NorthEast, EdgeDirection::SouthEast],
            EdgeDirection::SouthEast => [EdgeDirection::East, EdgeDirection::SouthWest],
            EdgeDirection::SouthWest => [EdgeDirection::SouthEast, EdgeDirection::West],
            EdgeDirection::West => [EdgeDirection::SouthWest, EdgeDirection::NorthWest],
            EdgeDirection::NorthWest => [EdgeDirection::West, EdgeDirection::NorthEast],
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compass = match self {
            EdgeDirection::NorthEast => "NE",
            EdgeDirection::East => "E",
            EdgeDirection::SouthEast => "SE",
            EdgeDirection::SouthWest => "SW",
            EdgeDirection::West => "W",
            EdgeDirection::NorthWest => "NW",
        };
        write!(f, "{}", compass)
    }
}

/// Direction from the center of a hex to one of its six corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CornerDirection {
    /// Top corner
    North,
    /// Top-right corner
    NorthEast,
    /// Bottom-right corner
    SouthEast,
    /// Bottom corner
    South,
    /// Bottom-left corner
    SouthWest,
    /// Top-left corner
    NorthWest,
}

impl CornerDirection {
    /// All corner directions in clockwise order starting from North.
    /// The position in this array is the ordinal used for slot indexing.
    pub const ALL: [CornerDirection; 6] = [
        CornerDirection::North,
        CornerDirection::NorthEast,
        CornerDirection::SouthEast,
        CornerDirection::South,
        CornerDirection::SouthWest,
        CornerDirection::NorthWest,
    ];

    /// Ordinal index (0-5) for slot arrays and table lookup
    pub const fn index(self) -> usize {
        match self {
            CornerDirection::North => 0,
            CornerDirection::NorthEast => 1,
            CornerDirection::SouthEast => 2,
            CornerDirection::South => 3,
            CornerDirection::SouthWest => 4,
            CornerDirection::NorthWest => 5,
        }
    }

    /// The two edges of the same hex which touch this corner, anticlockwise
    /// edge first, clockwise edge second.
    pub const fn edges(self) -> [EdgeDirection; 2] {
        match self {
            CornerDirection::North => [EdgeDirection::NorthWest, EdgeDirection::NorthEast],
            CornerDirection::NorthEast => [EdgeDirection::NorthEast, EdgeDirection::East],
            CornerDirection::SouthEast => [EdgeDirection::East, EdgeDirection::SouthEast],
            CornerDirection::South => [EdgeDirection::SouthEast, EdgeDirection::SouthWest],
            CornerDirection::SouthWest => [EdgeDirection::SouthWest, EdgeDirection::West],
            CornerDirection::NorthWest => [EdgeDirection::West, EdgeDirection::NorthWest],
        }
    }

    /// The two corners of the same hex one rotational step away from this one.
    /// Together with the corner itself these are the local slots checked by
    /// the settlement distance rule.
    pub fn rotational_neighbors(self) -> [CornerDirection; 2] {
        let ordinal = self.index();
        [
            CornerDirection::ALL[(ordinal + 5) % 6],
            CornerDirection::ALL[(ordinal + 1) % 6],
        ]
    }

    /// Translate this corner across the given edge: the result is the corner
    /// a neighbor sharing `edge` would use to name the same physical point.
    ///
    /// The translation preserves sides: the anticlockwise corner of `edge`
    /// maps to the clockwise corner of `edge.opposite()`, and vice versa.
    /// `self` must be one of the two corners touching `edge`.
    pub fn reflected_across(self, edge: EdgeDirection) -> CornerDirection {
        let [anticlockwise, clockwise] = edge.corners();
        debug_assert!(
            self == anticlockwise || self == clockwise,
            "corner {} does not touch edge {}",
            self,
            edge
        );

        let [opposite_anticlockwise, opposite_clockwise] = edge.opposite().corners();
        if self == anticlockwise {
            opposite_clockwise
        } else {
            opposite_anticlockwise
        }
    }
}

impl fmt::Display for CornerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compass = match self {
            CornerDirection::North => "N",
            CornerDirection::NorthEast => "NE",
            CornerDirection::SouthEast => "SE",
            CornerDirection::South => "S",
            CornerDirection::SouthWest => "SW",
            CornerDirection::NorthWest => "NW",
        };
        write!(f, "{}", compass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_opposite_is_involution() {
        for edge in EdgeDirection::ALL {
            assert_eq!(edge.opposite().opposite(), edge);
            assert_ne!(edge.opposite(), edge);
        }
    }

    #[test]
    fn test_ordinals_match_all_order() {
        for (position, edge) in EdgeDirection::ALL.iter().enumerate() {
            assert_eq!(edge.index(), position);
        }
        for (position, corner) in CornerDirection::ALL.iter().enumerate() {
            assert_eq!(corner.index(), position);
        }
    }

    #[test]
    fn test_edge_corners_and_corner_edges_agree() {
        // An edge touches a corner exactly when the corner touches the edge.
        for edge in EdgeDirection::ALL {
            for corner in edge.corners() {
                assert!(
                    corner.edges().contains(&edge),
                    "corner {} should list edge {}",
                    corner,
                    edge
                );
            }
        }
        for corner in CornerDirection::ALL {
            for edge in corner.edges() {
                assert!(
                    edge.corners().contains(&corner),
                    "edge {} should list corner {}",
                    edge,
                    corner
                );
            }
        }
    }

    #[test]
    fn test_flanking_edges_share_a_corner() {
        for edge in EdgeDirection::ALL {
            let [anticlockwise, clockwise] = edge.flanking_edges();
            assert_ne!(anticlockwise, clockwise);

            let [acw_corner, cw_corner] = edge.corners();
            assert!(anticlockwise.corners().contains(&acw_corner));
            assert!(clockwise.corners().contains(&cw_corner));
        }
    }

    #[test]
    fn test_rotational_neighbors_are_adjacent_ordinals() {
        for corner in CornerDirection::ALL {
            let [previous, next] = corner.rotational_neighbors();
            assert_eq!((previous.index() + 1) % 6, corner.index());
            assert_eq!((corner.index() + 1) % 6, next.index());
        }
    }

    #[test]
    fn test_reflection_preserves_sides() {
        for edge in EdgeDirection::ALL {
            let [anticlockwise, clockwise] = edge.corners();
            let [opposite_anticlockwise, opposite_clockwise] = edge.opposite().corners();

            assert_eq!(anticlockwise.reflected_across(edge), opposite_clockwise);
            assert_eq!(clockwise.reflected_across(edge), opposite_anticlockwise);
        }
    }

    #[test]
    fn test_reflection_round_trips_through_opposite_edge() {
        for edge in EdgeDirection::ALL {
            for corner in edge.corners() {
                let translated = corner.reflected_across(edge);
                assert_eq!(translated.reflected_across(edge.opposite()), corner);
            }
        }
    }
}
