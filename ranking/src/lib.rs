use std::fmt;

use serde::{Deserialize, Serialize};

/// The only game with its own ladder. Matched exactly, case included.
pub const VALORANT: &str = "Valorant";

const VALORANT_TIERS: [(u64, Rank); 7] = [
    (5, Rank::Iron),
    (10, Rank::Bronze),
    (15, Rank::Silver),
    (20, Rank::Gold),
    (25, Rank::Platinum),
    (30, Rank::Diamond),
    (35, Rank::Immortal),
];

const GENERIC_TIERS: [(u64, Rank); 3] = [(10, Rank::Beginner), (30, Rank::Pro), (50, Rank::Elite)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Unranked,
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Immortal,
    Radiant,
    Beginner,
    Pro,
    Elite,
    Mythic,
}

impl Rank {
    pub fn label(self) -> &'static str {
        match self {
            Rank::Unranked => "Unranked",
            Rank::Iron => "Iron",
            Rank::Bronze => "Bronze",
            Rank::Silver => "Silver",
            Rank::Gold => "Gold",
            Rank::Platinum => "Platinum",
            Rank::Diamond => "Diamond",
            Rank::Immortal => "Immortal",
            Rank::Radiant => "Radiant",
            Rank::Beginner => "Beginner",
            Rank::Pro => "Pro",
            Rank::Elite => "Elite",
            Rank::Mythic => "Mythic",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derives the cosmetic rank for a level given as text.
///
/// Anything other than a non-empty run of ASCII digits is `Unranked`, which
/// includes negative numbers. Valorant players climb the Iron..Radiant ladder;
/// every other game, or no game at all, uses Beginner..Mythic. Upper bounds
/// are inclusive.
pub fn rank(level: &str, game: Option<&str>) -> Rank {
    if level.is_empty() || !level.bytes().all(|b| b.is_ascii_digit()) {
        log::trace!("level {level:?} is not a whole number, unranked");
        return Rank::Unranked;
    }

    // All digits, so the only possible parse failure is overflow.
    let lvl = level.parse::<u64>().unwrap_or(u64::MAX);

    if game == Some(VALORANT) {
        tier(lvl, &VALORANT_TIERS, Rank::Radiant)
    } else {
        tier(lvl, &GENERIC_TIERS, Rank::Mythic)
    }
}

/// Ranks a stored integer level.
pub fn rank_for_level(level: i64, game: Option<&str>) -> Rank {
    rank(&level.to_string(), game)
}

fn tier(lvl: u64, tiers: &[(u64, Rank)], top: Rank) -> Rank {
    tiers
        .iter()
        .find(|(upper, _)| lvl <= *upper)
        .map(|(_, rank)| *rank)
        .unwrap_or(top)
}
