use crate::domain::deck::generate_deck;
use crate::domain::layout::{
    self, cards_remaining, cleared_peaks, create_brick_pyramid, create_peaks_layout,
    playable_cards, take_card, update_playability, PyramidNode,
};
use crate::domain::rules::BRICK_ROWS;

fn brick() -> Vec<PyramidNode> {
    let cards = generate_deck().into_iter().take(45).collect();
    create_brick_pyramid(cards)
}

#[test]
fn brick_pyramid_shape() {
    let pyramid = brick();
    assert_eq!(pyramid.len(), 45);
    for (row, &size) in BRICK_ROWS.iter().enumerate() {
        assert_eq!(pyramid.iter().filter(|n| n.row == row).count(), size);
    }
}

#[test]
fn coverage_graph_brick_pattern() {
    let pyramid = brick();
    for node in &pyramid {
        if node.row + 1 < BRICK_ROWS.len() {
            // Undercut by exactly the two front-row neighbors at col, col+1.
            assert_eq!(node.covered_by.len(), 2, "row {} col {}", node.row, node.col);
        } else {
            assert!(node.covered_by.is_empty());
        }
    }
}

#[test]
fn initial_visibility() {
    let pyramid = brick();
    let front = BRICK_ROWS.len() - 1;
    for node in &pyramid {
        if node.row == front {
            assert!(node.is_face_up && node.is_playable && !node.is_dimmed);
        } else if node.row == front - 1 {
            assert!(node.is_face_up && !node.is_playable);
            assert!(node.is_second_row && node.is_dimmed);
        } else {
            assert!(!node.is_face_up && !node.is_playable);
        }
    }
}

#[test]
fn second_row_unlocks_only_when_front_row_empties() {
    let mut pyramid = brick();
    let front = BRICK_ROWS.len() - 1;
    let front_ids: Vec<String> = pyramid
        .iter()
        .filter(|n| n.row == front)
        .filter_map(|n| n.card.as_ref().map(|c| c.id.clone()))
        .collect();

    // Remove all but one front card: row above must stay locked.
    for id in &front_ids[..front_ids.len() - 1] {
        take_card(&mut pyramid, id);
        update_playability(&mut pyramid);
        assert!(
            pyramid
                .iter()
                .filter(|n| n.row == front - 1)
                .all(|n| !n.is_playable),
            "second row node playable while a covering card remains"
        );
    }

    // Removing the last one promotes the whole row at once.
    take_card(&mut pyramid, &front_ids[front_ids.len() - 1]);
    update_playability(&mut pyramid);
    assert!(pyramid
        .iter()
        .filter(|n| n.row == front - 1)
        .all(|n| n.is_playable));
    // And the row behind becomes the new telegraphed second row.
    assert!(pyramid
        .iter()
        .filter(|n| n.row == front - 2)
        .all(|n| n.is_face_up && n.is_dimmed && !n.is_playable));
}

#[test]
fn no_node_playable_while_covered() {
    // Remove cards front-to-back in column order and assert the invariant
    // after every single removal.
    let mut pyramid = brick();
    loop {
        let next = playable_cards(&pyramid).next().map(|c| c.id.clone());
        let Some(id) = next else { break };
        take_card(&mut pyramid, &id);
        update_playability(&mut pyramid);

        let occupied: Vec<&str> = pyramid
            .iter()
            .filter_map(|n| n.card.as_ref().map(|c| c.id.as_str()))
            .collect();
        for node in pyramid.iter().filter(|n| n.is_playable) {
            assert!(
                !node.covered_by.iter().all(|id| occupied.contains(&id.as_str()))
                    || node.covered_by.is_empty(),
                "covered node marked playable"
            );
        }
    }
    assert_eq!(cards_remaining(&pyramid), 0);
}

#[test]
fn peaks_layout_is_partitioned() {
    let cards = generate_deck().into_iter().take(36).collect();
    let pyramid = create_peaks_layout(cards);
    assert_eq!(pyramid.len(), 36);
    for peak in 0..3 {
        assert_eq!(pyramid.iter().filter(|n| n.peak == peak).count(), 12);
    }
    // Coverage never crosses a peak boundary.
    for node in &pyramid {
        for id in &node.covered_by {
            let owner = pyramid
                .iter()
                .find(|n| n.card.as_ref().is_some_and(|c| &c.id == id))
                .unwrap();
            assert_eq!(owner.peak, node.peak);
        }
    }
}

#[test]
fn clearing_one_peak_counts_as_cleared() {
    let cards = generate_deck().into_iter().take(36).collect();
    let mut pyramid = create_peaks_layout(cards);
    assert_eq!(cleared_peaks(&pyramid), 0);

    // Strip peak 0 in any playable order.
    loop {
        let next = pyramid
            .iter()
            .filter(|n| n.peak == 0 && n.is_playable)
            .filter_map(|n| n.card.as_ref().map(|c| c.id.clone()))
            .next();
        let Some(id) = next else { break };
        take_card(&mut pyramid, &id);
        update_playability(&mut pyramid);
    }
    assert_eq!(cleared_peaks(&pyramid), 1);
    assert_eq!(layout::cards_remaining(&pyramid), 24);
}
