//! Domain layer: pure game logic types and helpers.

pub mod cards;
pub mod deck;
pub mod layout;
pub mod round;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod snapshot;
pub mod solitaire;
pub mod tower;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_deck;
#[cfg(test)]
mod tests_layout;
#[cfg(test)]
mod tests_props;
#[cfg(test)]
mod tests_solitaire;

// Re-exports for ergonomics
pub use cards::{Card, CardId, Rank, Suit};
pub use deck::{generate_bonus_card, generate_deck, shuffle_deck};
pub use round::{MatchPhase, MatchState, PlayOutcome, RoundEvent};
pub use rules::can_play_card;
pub use seed_derivation::{derive_player_seed, derive_round_seed};
pub use snapshot::{MatchSnapshot, RoomSnapshot};
pub use solitaire::{SoloPhase, SoloState};
