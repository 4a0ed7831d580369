//! Resource types, resource card sets, building costs, and the card bank.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five fungible resource types produced by land hexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Lumber,
    Ore,
    Grain,
    Wool,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Ore,
        Resource::Grain,
        Resource::Wool,
    ];
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Brick => "brick",
            Resource::Lumber => "lumber",
            Resource::Ore => "ore",
            Resource::Grain => "grain",
            Resource::Wool => "wool",
        };
        write!(f, "{}", name)
    }
}

/// A set of resource cards, one counter per resource type.
///
/// Counters are signed so a cost-then-credit sequence may pass through a
/// transient negative without wrapping; a set at rest is never negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCardSet {
    pub brick: i64,
    pub lumber: i64,
    pub ore: i64,
    pub grain: i64,
    pub wool: i64,
}

impl ResourceCardSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set with specific counts
    pub fn with_counts(brick: i64, lumber: i64, ore: i64, grain: i64, wool: i64) -> Self {
        Self {
            brick,
            lumber,
            ore,
            grain,
            wool,
        }
    }

    /// Create a set holding a single resource type
    pub fn single(resource: Resource, count: i64) -> Self {
        let mut cards = Self::new();
        cards.add_to(resource, count);
        cards
    }

    /// Count of a specific resource
    pub fn count(&self, resource: Resource) -> i64 {
        match resource {
            Resource::Brick => self.brick,
            Resource::Lumber => self.lumber,
            Resource::Ore => self.ore,
            Resource::Grain => self.grain,
            Resource::Wool => self.wool,
        }
    }

    /// Add cards of one type (a negative count removes cards)
    pub fn add_to(&mut self, resource: Resource, count: i64) {
        match resource {
            Resource::Brick => self.brick += count,
            Resource::Lumber => self.lumber += count,
            Resource::Ore => self.ore += count,
            Resource::Grain => self.grain += count,
            Resource::Wool => self.wool += count,
        }
    }

    /// Add every count of another set to this one
    pub fn add_all(&mut self, other: &ResourceCardSet) {
        self.brick += other.brick;
        self.lumber += other.lumber;
        self.ore += other.ore;
        self.grain += other.grain;
        self.wool += other.wool;
    }

    /// Subtract every count of another set from this one
    pub fn subtract_all(&mut self, other: &ResourceCardSet) {
        self.brick -= other.brick;
        self.lumber -= other.lumber;
        self.ore -= other.ore;
        self.grain -= other.grain;
        self.wool -= other.wool;
    }

    /// Total number of cards
    pub fn total(&self) -> i64 {
        self.brick + self.lumber + self.ore + self.grain + self.wool
    }

    /// True if every counter is zero
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True if this set has at least as many cards of every type as `other`
    pub fn has_at_least(&self, other: &ResourceCardSet) -> bool {
        self.brick >= other.brick
            && self.lumber >= other.lumber
            && self.ore >= other.ore
            && self.grain >= other.grain
            && self.wool >= other.wool
    }

    /// If exactly one resource type has a non-zero count, return it with its
    /// count; otherwise None. Used to validate maritime trade offers.
    pub fn single_resource_and_count(&self) -> Option<(Resource, i64)> {
        let mut found: Option<(Resource, i64)> = None;
        for resource in Resource::ALL {
            let count = self.count(resource);
            if count != 0 {
                if found.is_some() {
                    return None;
                }
                found = Some((resource, count));
            }
        }
        found
    }
}

/// Building costs
pub mod costs {
    use super::ResourceCardSet;

    /// Cost to build a road: 1 brick, 1 lumber
    pub fn road() -> ResourceCardSet {
        ResourceCardSet::with_counts(1, 1, 0, 0, 0)
    }

    /// Cost to build a settlement: 1 brick, 1 lumber, 1 grain, 1 wool
    pub fn settlement() -> ResourceCardSet {
        ResourceCardSet::with_counts(1, 1, 0, 1, 1)
    }

    /// Cost to upgrade a village to a city: 3 ore, 2 grain
    pub fn city() -> ResourceCardSet {
        ResourceCardSet::with_counts(0, 0, 3, 2, 0)
    }
}

/// The stock of cards passed out when hexes produce and absorbed as building
/// costs and maritime payments.
///
/// The physical stock is not modelled - running out of cards is rare enough
/// that the bank simply never does - but maritime trade validation belongs
/// here rather than on the player, so the type exists with instance methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardBank;

impl CardBank {
    pub fn new() -> Self {
        Self
    }

    /// Execute a maritime trade against the given hand, or refuse it.
    ///
    /// The offer must be a single resource type with a count of at least
    /// `maritime_rate`; the request must be exactly one card of a different
    /// single type. Only `maritime_rate` cards are taken even if more were
    /// offered, making the optimal trade on the player's behalf. Returns
    /// false (and leaves the hand untouched) for any invalid offer or a hand
    /// that cannot cover the rate.
    pub fn make_maritime_trade(
        &mut self,
        trading_hand: &mut ResourceCardSet,
        maritime_rate: i64,
        offered_outgoing: &ResourceCardSet,
        desired_incoming: &ResourceCardSet,
    ) -> bool {
        let desired = match desired_incoming.single_resource_and_count() {
            Some(resource_and_count) => resource_and_count,
            None => return false,
        };
        if desired.1 != 1 {
            return false;
        }

        let offered = match offered_outgoing.single_resource_and_count() {
            Some(resource_and_count) => resource_and_count,
            None => return false,
        };
        if offered.0 == desired.0 || offered.1 < maritime_rate {
            return false;
        }

        if trading_hand.count(offered.0) < maritime_rate {
            return false;
        }

        trading_hand.add_to(offered.0, -maritime_rate);
        self.absorb(&ResourceCardSet::single(offered.0, maritime_rate));
        self.give_out(&ResourceCardSet::single(desired.0, desired.1));
        trading_hand.add_to(desired.0, desired.1);

        true
    }

    /// Take spent cards back into the stock
    pub fn absorb(&mut self, _spent_cards: &ResourceCardSet) {
        // The stock is effectively infinite.
    }

    fn give_out(&mut self, _granted_cards: &ResourceCardSet) {
        // The stock is effectively infinite.
    }
}
