//! Which board spaces to highlight for the card the viewer has selected.
//!
//! Rules, first match wins:
//!
//! 1. nothing selected → nothing highlighted
//! 2. two-eyed jack → every space without a chip
//! 3. one-eyed jack → every opponent chip not locked in a sequence
//! 4. regular card → empty spaces printed with the same suit and value
//!
//! Dispatch is on [`CardVariant`], so jack flags always beat suit/value
//! matching. Highlighting is presentation only; the server is the judge of
//! legality.

use std::collections::HashMap;

use crate::card::{Card, CardVariant};
use crate::protocol::{BoardResponse, BoardSpace, TeamColour};

/// Largest grid side accepted from the server. The standard board is 10x10.
pub const MAX_BOARD_SIDE: u32 = 64;

/// Highlight classification of one space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Highlight {
    #[default]
    None,
    /// Empty space a wild jack may fill.
    Wild,
    /// Opponent chip a one-eyed jack may remove.
    Removal,
    /// Empty space printed with the selected card.
    Match,
}

impl Highlight {
    pub fn is_highlighted(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Classify one space for the given selection and viewer team.
pub fn highlight_for(
    space: &BoardSpace,
    selected: Option<&Card>,
    viewer_team: Option<TeamColour>,
) -> Highlight {
    let Some(selected) = selected else {
        return Highlight::None;
    };
    match selected.variant() {
        CardVariant::TwoEyedJack if space.is_empty() => Highlight::Wild,
        CardVariant::OneEyedJack => match space.colour {
            Some(chip) if Some(chip) != viewer_team && !space.part_of_sequence => {
                Highlight::Removal
            }
            _ => Highlight::None,
        },
        CardVariant::Regular { .. }
            if space.is_empty()
                && space
                    .card
                    .as_ref()
                    .is_some_and(|printed| printed.same_face(selected)) =>
        {
            Highlight::Match
        }
        CardVariant::TwoEyedJack | CardVariant::Regular { .. } | CardVariant::Blank => {
            Highlight::None
        }
    }
}

/// One grid cell with its decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoratedCell<'a> {
    pub row: u32,
    pub col: u32,
    /// `None` for a hole in sparse board data.
    pub space: Option<&'a BoardSpace>,
    pub highlight: Highlight,
}

/// A board indexed by position, with malformed spaces filtered out.
#[derive(Debug, Clone)]
pub struct BoardView<'a> {
    rows: u32,
    cols: u32,
    by_position: HashMap<(u32, u32), &'a BoardSpace>,
}

impl<'a> BoardView<'a> {
    /// Index `board`, skipping spaces without both `row` and `col` and
    /// spaces beyond [`MAX_BOARD_SIDE`].
    pub fn new(board: &'a BoardResponse) -> Self {
        let mut by_position = HashMap::with_capacity(board.spaces.len());
        let mut skipped = 0usize;
        for space in &board.spaces {
            match space.position() {
                Some((row, col)) if row < MAX_BOARD_SIDE && col < MAX_BOARD_SIDE => {
                    by_position.insert((row, col), space);
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "ignoring board spaces without usable coordinates");
        }
        let rows = by_position.keys().map(|(row, _)| row + 1).max().unwrap_or(0);
        let cols = by_position.keys().map(|(_, col)| col + 1).max().unwrap_or(0);
        Self {
            rows,
            cols,
            by_position,
        }
    }

    /// Number of grid rows (highest row index + 1).
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of grid columns (highest column index + 1).
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// `true` if no space survived filtering.
    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    /// The space at `(row, col)`, if any.
    pub fn cell(&self, row: u32, col: u32) -> Option<&'a BoardSpace> {
        self.by_position.get(&(row, col)).copied()
    }

    /// Valid spaces in row-major order.
    pub fn spaces(&self) -> impl Iterator<Item = &'a BoardSpace> + '_ {
        self.positions().filter_map(|(row, col)| self.cell(row, col))
    }

    /// Every grid cell in row-major order. Holes are never highlighted.
    pub fn decorate(
        &self,
        selected: Option<&Card>,
        viewer_team: Option<TeamColour>,
    ) -> Vec<DecoratedCell<'a>> {
        self.positions()
            .map(|(row, col)| {
                let space = self.cell(row, col);
                let highlight = space
                    .map(|space| highlight_for(space, selected, viewer_team))
                    .unwrap_or_default();
                DecoratedCell {
                    row,
                    col,
                    space,
                    highlight,
                }
            })
            .collect()
    }

    fn positions(&self) -> impl Iterator<Item = (u32, u32)> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }
}

/// Coordinates a card would highlight, in row-major order.
pub fn playable_targets(
    card: &Card,
    board: &BoardResponse,
    viewer_team: Option<TeamColour>,
) -> Vec<(u32, u32)> {
    BoardView::new(board)
        .spaces()
        .filter(|space| highlight_for(space, Some(card), viewer_team).is_highlighted())
        .filter_map(BoardSpace::position)
        .collect()
}

/// A regular card whose printed spaces are all occupied.
///
/// Jacks are never dead. Blank cards are not regular and so never dead.
pub fn is_dead_card(card: &Card, board: &BoardResponse) -> bool {
    match card.variant() {
        CardVariant::Regular { .. } => playable_targets(card, board, None).is_empty(),
        CardVariant::TwoEyedJack | CardVariant::OneEyedJack | CardVariant::Blank => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn board(spaces: Vec<BoardSpace>) -> BoardResponse {
        BoardResponse { spaces }
    }

    #[test]
    fn nothing_selected_highlights_nothing() {
        let b = board(vec![BoardSpace::new(0, 0, Some(Card::new(Suit::Hearts, 5)))]);
        let view = BoardView::new(&b);
        assert!(view
            .decorate(None, Some(TeamColour::Red))
            .iter()
            .all(|cell| cell.highlight == Highlight::None));
    }

    #[test]
    fn two_eyed_jack_highlights_only_empty_spaces() {
        let b = board(vec![
            BoardSpace::new(0, 0, Some(Card::new(Suit::Hearts, 5))),
            BoardSpace::new(0, 1, Some(Card::new(Suit::Clubs, 2))).with_chip(TeamColour::Blue),
        ]);
        let jack = Card::two_eyed_jack(Suit::Diamonds);
        let cells = BoardView::new(&b).decorate(Some(&jack), Some(TeamColour::Red));
        assert_eq!(cells[0].highlight, Highlight::Wild);
        assert_eq!(cells[1].highlight, Highlight::None);
    }

    #[test]
    fn one_eyed_jack_skips_locked_and_own_chips() {
        let b = board(vec![
            BoardSpace::new(0, 0, None).with_chip(TeamColour::Blue),
            BoardSpace::new(0, 1, None).with_chip(TeamColour::Blue).locked(),
            BoardSpace::new(0, 2, None).with_chip(TeamColour::Red),
            BoardSpace::new(0, 3, None),
        ]);
        let jack = Card::one_eyed_jack(Suit::Spades);
        let cells = BoardView::new(&b).decorate(Some(&jack), Some(TeamColour::Red));
        let highlights: Vec<_> = cells.iter().map(|c| c.highlight).collect();
        assert_eq!(
            highlights,
            vec![
                Highlight::Removal,
                Highlight::None,
                Highlight::None,
                Highlight::None
            ]
        );
    }

    #[test]
    fn one_eyed_jack_without_team_treats_every_chip_as_opponent() {
        let space = BoardSpace::new(0, 0, None).with_chip(TeamColour::Green);
        let jack = Card::one_eyed_jack(Suit::Clubs);
        assert_eq!(highlight_for(&space, Some(&jack), None), Highlight::Removal);
    }

    #[test]
    fn regular_card_matches_suit_and_value_on_empty_spaces() {
        let five_hearts = Card::new(Suit::Hearts, 5);
        let b = board(vec![
            BoardSpace::new(0, 0, Some(five_hearts.clone())),
            BoardSpace::new(0, 1, Some(five_hearts.clone())).with_chip(TeamColour::Green),
            BoardSpace::new(1, 0, Some(Card::new(Suit::Hearts, 6))),
            BoardSpace::new(1, 1, Some(Card::new(Suit::Diamonds, 5))),
        ]);
        assert_eq!(playable_targets(&five_hearts, &b, Some(TeamColour::Red)), vec![(0, 0)]);
    }

    #[test]
    fn jack_flags_beat_face_matching() {
        // A two-eyed jack printed face must not restrict a wild to J spaces.
        let b = board(vec![
            BoardSpace::new(0, 0, Some(Card::new(Suit::Hearts, 11))),
            BoardSpace::new(0, 1, Some(Card::new(Suit::Clubs, 4))),
        ]);
        let wild = Card::two_eyed_jack(Suit::Hearts);
        assert_eq!(playable_targets(&wild, &b, None), vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn malformed_spaces_are_filtered() {
        let mut missing_col = BoardSpace::new(5, 0, None);
        missing_col.col = None;
        let b = board(vec![BoardSpace::new(1, 2, None), missing_col]);
        let view = BoardView::new(&b);
        assert_eq!((view.rows(), view.cols()), (2, 3));
        assert_eq!(view.spaces().count(), 1);
        let cells = view.decorate(Some(&Card::two_eyed_jack(Suit::Hearts)), None);
        assert_eq!(cells.len(), 6);
        // Holes have no space and are never highlighted.
        assert_eq!(
            cells.iter().filter(|c| c.highlight.is_highlighted()).count(),
            1
        );
        assert!(cells[0].space.is_none());
    }

    #[test]
    fn oversized_coordinates_are_filtered() {
        let b = board(vec![
            BoardSpace::new(0, 0, None),
            BoardSpace::new(MAX_BOARD_SIDE, 0, None),
            BoardSpace::new(0, u32::MAX, None),
        ]);
        let view = BoardView::new(&b);
        assert_eq!((view.rows(), view.cols()), (1, 1));
    }

    #[test]
    fn empty_board_has_no_cells() {
        let b = BoardResponse::default();
        let view = BoardView::new(&b);
        assert!(view.is_empty());
        assert!(view.decorate(None, None).is_empty());
    }

    #[test]
    fn dead_cards() {
        let two_clubs = Card::new(Suit::Clubs, 2);
        let b = board(vec![
            BoardSpace::new(0, 0, Some(two_clubs.clone())).with_chip(TeamColour::Red),
            BoardSpace::new(0, 1, Some(Card::new(Suit::Clubs, 3))),
        ]);
        assert!(is_dead_card(&two_clubs, &b));
        assert!(!is_dead_card(&Card::new(Suit::Clubs, 3), &b));
        assert!(!is_dead_card(&Card::two_eyed_jack(Suit::Hearts), &b));
        assert!(!is_dead_card(&Card::default(), &b));
    }
}
