//! Core card types: Card, Rank, Suit, CardId.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

/// Card rank A..K. `value()` gives the numeric 1..=13 rank used by the
/// adjacency rule and the multiplayer tower variant; `label()` gives the
/// symbolic form shown in the solitaire layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Numeric rank 1..=13 (Ace = 1, King = 13).
    pub fn value(self) -> u8 {
        self as u8 + 1
    }

    /// Rank from a numeric value, if in 1..=13.
    pub fn from_value(value: u8) -> Option<Rank> {
        if (1..=13).contains(&value) {
            Some(Rank::ALL[(value - 1) as usize])
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// Stable card identity. Derived from suit+rank for solitaire decks so
/// replays with the same seed reference the same ids; fresh v4 UUIDs for
/// the multiplayer tower variant.
pub type CardId = String;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    /// Card with an id derived from suit and rank (`hearts-7`, `spades-K`).
    pub fn keyed(suit: Suit, rank: Rank) -> Self {
        let id = format!("{}-{}", suit_key(suit), rank.label());
        Self { id, suit, rank }
    }

    /// Card with a fresh unique id.
    pub fn unique(suit: Suit, rank: Rank) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            suit,
            rank,
        }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }
}

fn suit_key(suit: Suit) -> &'static str {
    match suit {
        Suit::Hearts => "hearts",
        Suit::Diamonds => "diamonds",
        Suit::Clubs => "clubs",
        Suit::Spades => "spades",
    }
}
