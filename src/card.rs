//! Playing cards as sent by the game service.
//!
//! The wire representation is a bag of optional fields and two jack flags.
//! [`Card::variant`] folds them into a [`CardVariant`] so callers dispatch on
//! an enum instead of checking flags ad hoc.

use serde::{Deserialize, Serialize};

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// Hearts and diamonds render in red.
    pub fn is_red(self) -> bool {
        matches!(self, Self::Hearts | Self::Diamonds)
    }
}

/// A card in a player's hand or printed on a board space.
///
/// Two cards are equal iff suit, value and both jack flags match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suit: Option<Suit>,
    /// 1 (ace) through 13 (king).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
    #[serde(default, deserialize_with = "crate::protocol::null_as_default")]
    pub one_eyed_jack: bool,
    #[serde(default, deserialize_with = "crate::protocol::null_as_default")]
    pub two_eyed_jack: bool,
}

/// What a card does when played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardVariant {
    /// Wild: place a chip on any empty space.
    TwoEyedJack,
    /// Removal: take an unlocked opponent chip off the board.
    OneEyedJack,
    /// Place a chip on a space printed with the same suit and value.
    Regular { suit: Suit, value: u8 },
    /// Missing suit or value and no jack flag; matches nothing.
    Blank,
}

impl CardVariant {
    /// Short badge text for jacks.
    pub fn special_label(self) -> Option<&'static str> {
        match self {
            Self::TwoEyedJack => Some("Wild"),
            Self::OneEyedJack => Some("Remove"),
            Self::Regular { .. } | Self::Blank => None,
        }
    }
}

impl Card {
    /// A regular card.
    pub fn new(suit: Suit, value: u8) -> Self {
        Self {
            suit: Some(suit),
            value: Some(value),
            ..Self::default()
        }
    }

    /// A two-eyed (wild) jack of the given suit.
    pub fn two_eyed_jack(suit: Suit) -> Self {
        Self {
            two_eyed_jack: true,
            ..Self::new(suit, 11)
        }
    }

    /// A one-eyed (removal) jack of the given suit.
    pub fn one_eyed_jack(suit: Suit) -> Self {
        Self {
            one_eyed_jack: true,
            ..Self::new(suit, 11)
        }
    }

    /// Classify the card. The two-eyed flag wins if both flags are set.
    pub fn variant(&self) -> CardVariant {
        if self.two_eyed_jack {
            return CardVariant::TwoEyedJack;
        }
        if self.one_eyed_jack {
            return CardVariant::OneEyedJack;
        }
        match (self.suit, self.value) {
            (Some(suit), Some(value)) if value > 0 => CardVariant::Regular { suit, value },
            _ => CardVariant::Blank,
        }
    }

    /// `true` for either kind of jack.
    pub fn is_jack(&self) -> bool {
        self.one_eyed_jack || self.two_eyed_jack
    }

    /// Same printed face (suit and value), ignoring jack flags.
    pub fn same_face(&self, other: &Card) -> bool {
        match (self.variant_face(), other.variant_face()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn variant_face(&self) -> Option<(Suit, u8)> {
        match (self.suit, self.value) {
            (Some(suit), Some(value)) if value > 0 => Some((suit, value)),
            _ => None,
        }
    }
}

/// Face text for a card value: `A`, `J`, `Q`, `K`, the number, or `-`.
pub fn format_card_value(value: Option<u8>) -> String {
    match value {
        Some(1) => "A".to_string(),
        Some(11) => "J".to_string(),
        Some(12) => "Q".to_string(),
        Some(13) => "K".to_string(),
        None | Some(0) => "-".to_string(),
        Some(n) => n.to_string(),
    }
}
