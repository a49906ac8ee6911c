use std::cmp::Ordering;
use std::fmt;

use enum_iterator::{all, Sequence};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Sequence,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "camelCase")]
pub enum Suit {
    #[default]
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    pub fn glyph(&self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Sequence,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "camelCase")]
pub enum Rank {
    #[default]
    Seven = 0,
    Eight = 1,
    Nine = 2,
    Ten = 3,
    Jack = 4,
    Queen = 5,
    King = 6,
    Ace = 7,
}

impl Rank {
    /// Counting value of the rank. Every suit carries the same 30 points.
    pub fn points(&self) -> i32 {
        match self {
            Rank::Ace => 11,
            Rank::Ten => 10,
            Rank::King => 4,
            Rank::Queen => 3,
            Rank::Jack => 2,
            _ => 0,
        }
    }

    /// Trick-taking order: A > 10 > K > Q > J > 9 > 8 > 7
    pub fn strength(&self) -> i32 {
        match self {
            Rank::Ace => 7,
            Rank::Ten => 6,
            Rank::King => 5,
            Rank::Queen => 4,
            Rank::Jack => 3,
            Rank::Nine => 2,
            Rank::Eight => 1,
            Rank::Seven => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    // Index assigned at deck build, used as the stable handle for moves
    // and UI animations
    pub id: i32,
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn points(&self) -> i32 {
        self.rank.points()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.glyph())
    }
}

/// All 32 cards in build order. Shuffling happens at deal time.
pub fn deck() -> Vec<Card> {
    let mut deck = Vec::new();
    let mut id = 0;
    for suit in all::<Suit>() {
        for rank in all::<Rank>() {
            deck.push(Card { id, suit, rank });
            id += 1;
        }
    }
    return deck;
}

pub fn human_card_sorter(a: &Card, b: &Card) -> Ordering {
    match a.suit.cmp(&b.suit) {
        Ordering::Less => Ordering::Less,
        Ordering::Greater => Ordering::Greater,
        Ordering::Equal => b.rank.strength().cmp(&a.rank.strength()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_deck_composition() {
        let deck = deck();
        assert_eq!(deck.len(), 32);

        let pairs: HashSet<(Suit, Rank)> = deck.iter().map(|c| (c.suit, c.rank)).collect();
        assert_eq!(pairs.len(), 32, "every (suit, rank) pair appears once");

        let ids: HashSet<i32> = deck.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 32, "ids are unique");
        assert!(deck.iter().all(|c| (0..32).contains(&c.id)));
    }

    #[test]
    fn test_deck_points_total() {
        // 4 suits x (11 + 10 + 4 + 3 + 2)
        let total: i32 = deck().iter().map(|c| c.points()).sum();
        assert_eq!(total, 120);
    }

    #[test]
    fn test_rank_points() {
        assert_eq!(Rank::Ace.points(), 11);
        assert_eq!(Rank::Ten.points(), 10);
        assert_eq!(Rank::King.points(), 4);
        assert_eq!(Rank::Queen.points(), 3);
        assert_eq!(Rank::Jack.points(), 2);
        assert_eq!(Rank::Nine.points(), 0);
        assert_eq!(Rank::Eight.points(), 0);
        assert_eq!(Rank::Seven.points(), 0);
    }

    #[test]
    fn test_rank_strength_order() {
        let descending = [
            Rank::Ace,
            Rank::Ten,
            Rank::King,
            Rank::Queen,
            Rank::Jack,
            Rank::Nine,
            Rank::Eight,
            Rank::Seven,
        ];
        for pair in descending.windows(2) {
            assert!(
                pair[0].strength() > pair[1].strength(),
                "{:?} should outrank {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_card_display() {
        let card = Card {
            id: 0,
            suit: Suit::Hearts,
            rank: Rank::Ace,
        };
        assert_eq!(card.to_string(), "A♥");
        let card = Card {
            id: 1,
            suit: Suit::Spades,
            rank: Rank::Ten,
        };
        assert_eq!(card.to_string(), "10♠");
    }
}
