// ═══════════════════════════════════════════════════════════════════════
// Cards — typed multiset hand and random-draw deck
//
// Cards are authorization tokens: reinforcement cards back Deploy orders,
// the other four types gate their namesake orders.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::CardType;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A player's hand: per-type card counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hand {
    counts: BTreeMap<CardType, u32>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, card: CardType) {
        *self.counts.entry(card).or_insert(0) += 1;
    }

    pub fn insert_many(&mut self, card: CardType, n: u32) {
        *self.counts.entry(card).or_insert(0) += n;
    }

    /// Play one card of the given type. Returns false if none is held.
    pub fn play(&mut self, card: CardType) -> bool {
        match self.counts.get_mut(&card) {
            Some(c) if *c > 0 => {
                *c -= 1;
                true
            }
            _ => false,
        }
    }

    /// Play up to `n` cards of the given type; returns how many were
    /// actually played.
    pub fn play_many(&mut self, card: CardType, n: u32) -> u32 {
        match self.counts.get_mut(&card) {
            Some(c) => {
                let played = n.min(*c);
                *c -= played;
                played
            }
            None => 0,
        }
    }

    pub fn count(&self, card: CardType) -> u32 {
        self.counts.get(&card).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn card_count(&self) -> &BTreeMap<CardType, u32> {
        &self.counts
    }
}

/// A finite collection of cards drawn from uniformly at random.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<CardType>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// A deck stocked with `n` uniformly random cards.
    pub fn stocked<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut cards = Vec::with_capacity(n);
        for _ in 0..n {
            cards.push(CardType::ALL[rng.gen_range(0..CardType::ALL.len())]);
        }
        Deck { cards }
    }

    /// Draw a random card into `hand`. Returns the drawn type, or None
    /// if the deck is empty.
    pub fn draw<R: Rng>(&mut self, rng: &mut R, hand: &mut Hand) -> Option<CardType> {
        if self.cards.is_empty() {
            return None;
        }
        let i = rng.gen_range(0..self.cards.len());
        let card = self.cards.swap_remove(i);
        hand.insert(card);
        Some(card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn play_decrements_and_refuses_missing() {
        let mut hand = Hand::new();
        hand.insert(CardType::Bomb);
        assert_eq!(hand.count(CardType::Bomb), 1);
        assert!(hand.play(CardType::Bomb));
        assert!(!hand.play(CardType::Bomb));
        assert!(!hand.play(CardType::Airlift));
    }

    #[test]
    fn play_many_caps_at_held_count() {
        let mut hand = Hand::new();
        hand.insert_many(CardType::Reinforcement, 3);
        assert_eq!(hand.play_many(CardType::Reinforcement, 5), 3);
        assert_eq!(hand.count(CardType::Reinforcement), 0);
    }

    #[test]
    fn draw_transfers_from_deck_to_hand() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut deck = Deck::stocked(20, &mut rng);
        let mut hand = Hand::new();
        assert!(deck.draw(&mut rng, &mut hand).is_some());
        assert_eq!(deck.len(), 19);
        assert_eq!(hand.total(), 1);
    }

    #[test]
    fn empty_deck_draws_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut deck = Deck::new();
        let mut hand = Hand::new();
        assert!(deck.draw(&mut rng, &mut hand).is_none());
        assert_eq!(hand.total(), 0);
    }
}
