//! Pyramid/tower layout engine: brick-pattern coverage and visibility.
//!
//! Cards are laid into rows where each row holds one more card than the row
//! behind it, so every back-row card is undercut by exactly two front-row
//! neighbors. A card is exposed only once both cards covering it are gone.
//! Visibility is recomputed globally after every removal because clearing a
//! single card can promote an entire row at once.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, CardId};
use crate::domain::rules::BRICK_ROWS;

/// Per-peak row sizes for the tri-peaks variant.
const PEAK_ROWS: [usize; 3] = [3, 4, 5];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidNode {
    pub row: usize,
    pub col: usize,
    /// Partition index: always 0 for the brick pyramid, 0..=2 for tri-peaks.
    pub peak: usize,
    /// The card held by this cell, until it is played away.
    pub card: Option<Card>,
    /// Ids of the cards in the row in front whose removal uncovers this node.
    pub covered_by: Vec<CardId>,
    pub is_face_up: bool,
    pub is_playable: bool,
    pub is_second_row: bool,
    pub is_dimmed: bool,
}

impl PyramidNode {
    fn new(row: usize, col: usize, peak: usize, card: Card) -> Self {
        Self {
            row,
            col,
            peak,
            card: Some(card),
            covered_by: Vec::new(),
            is_face_up: false,
            is_playable: false,
            is_second_row: false,
            is_dimmed: false,
        }
    }
}

/// Lay `cards` into the brick pyramid (rows 5..=10, 45 cards). Row 0 is the
/// backmost, fully covered row; the last row starts fully exposed.
pub fn create_brick_pyramid(cards: Vec<Card>) -> Vec<PyramidNode> {
    build_partition(cards, &BRICK_ROWS, 0)
}

/// Lay `cards` into three independent peaks (rows 3,4,5 per peak, 36 cards).
/// Coverage never crosses a peak boundary.
pub fn create_peaks_layout(cards: Vec<Card>) -> Vec<PyramidNode> {
    let per_peak: usize = PEAK_ROWS.iter().sum();
    let mut nodes = Vec::with_capacity(cards.len());
    let mut cards = cards.into_iter();
    for peak in 0..3 {
        let chunk: Vec<Card> = cards.by_ref().take(per_peak).collect();
        nodes.extend(build_partition(chunk, &PEAK_ROWS, peak));
    }
    update_playability(&mut nodes);
    nodes
}

fn build_partition(cards: Vec<Card>, row_sizes: &[usize], peak: usize) -> Vec<PyramidNode> {
    let mut nodes = Vec::with_capacity(cards.len());
    let mut cards = cards.into_iter();
    for (row, &size) in row_sizes.iter().enumerate() {
        for col in 0..size {
            let Some(card) = cards.next() else {
                break;
            };
            nodes.push(PyramidNode::new(row, col, peak, card));
        }
    }

    // Brick overlap: a node at (row, col) is covered by (row+1, col) and
    // (row+1, col+1).
    let coverage: Vec<Vec<CardId>> = nodes
        .iter()
        .map(|node| {
            nodes
                .iter()
                .filter(|below| {
                    below.peak == node.peak
                        && below.row == node.row + 1
                        && (below.col == node.col || below.col == node.col + 1)
                })
                .filter_map(|below| below.card.as_ref().map(|c| c.id.clone()))
                .collect()
        })
        .collect();
    for (node, covered_by) in nodes.iter_mut().zip(coverage) {
        node.covered_by = covered_by;
    }

    let mut nodes = nodes;
    update_playability(&mut nodes);
    nodes
}

/// Recompute face-up/playable/dimmed flags for every node.
///
/// The front row is the highest row index that still holds an uncovered
/// card, not a fixed row number; that is what lets rows advance as cards
/// are cleared. Must run after every removal.
pub fn update_playability(nodes: &mut [PyramidNode]) {
    let occupied: Vec<CardId> = nodes
        .iter()
        .filter_map(|n| n.card.as_ref().map(|c| c.id.clone()))
        .collect();
    let has_card = |id: &CardId| occupied.contains(id);

    // A node is covered iff every id in covered_by still holds a card.
    // An empty covered_by list is vacuously uncovered.
    let uncovered: Vec<bool> = nodes
        .iter()
        .map(|n| n.covered_by.is_empty() || !n.covered_by.iter().all(has_card))
        .collect();

    let peak_count = nodes.iter().map(|n| n.peak).max().map_or(0, |p| p + 1);
    for peak in 0..peak_count {
        let front_row = nodes
            .iter()
            .zip(&uncovered)
            .filter(|(n, &u)| n.peak == peak && n.card.is_some() && u)
            .map(|(n, _)| n.row)
            .max();
        let Some(front_row) = front_row else {
            continue;
        };
        let second_row = front_row.checked_sub(1);

        for (node, &is_uncovered) in nodes.iter_mut().zip(&uncovered) {
            if node.peak != peak || node.card.is_none() {
                continue;
            }
            node.is_second_row = second_row == Some(node.row);
            if is_uncovered && node.row == front_row {
                node.is_face_up = true;
                node.is_playable = true;
                node.is_dimmed = false;
            } else if node.is_second_row {
                // Visible but locked, whether or not it is already uncovered.
                node.is_face_up = true;
                node.is_playable = false;
                node.is_dimmed = true;
            } else {
                node.is_face_up = false;
                node.is_playable = false;
                node.is_dimmed = false;
            }
        }
    }
}

/// Remove a card from the layout by id. Caller must recompute playability.
pub fn take_card(nodes: &mut [PyramidNode], card_id: &str) -> Option<Card> {
    nodes
        .iter_mut()
        .find(|n| n.card.as_ref().is_some_and(|c| c.id == card_id))
        .and_then(|n| n.card.take())
}

pub fn cards_remaining(nodes: &[PyramidNode]) -> usize {
    nodes.iter().filter(|n| n.card.is_some()).count()
}

/// Cards currently face-up and legal to pick up.
pub fn playable_cards(nodes: &[PyramidNode]) -> impl Iterator<Item = &Card> {
    nodes
        .iter()
        .filter(|n| n.is_playable)
        .filter_map(|n| n.card.as_ref())
}

/// Number of partitions with no cards left.
pub fn cleared_peaks(nodes: &[PyramidNode]) -> usize {
    let peak_count = nodes.iter().map(|n| n.peak).max().map_or(0, |p| p + 1);
    (0..peak_count)
        .filter(|&peak| nodes.iter().all(|n| n.peak != peak || n.card.is_none()))
        .count()
}
