use lazy_static::lazy_static;

use crate::cardlib::cards::Card;
use crate::cardlib::cardset::CardSet;
use crate::cardlib::combiner::Combiner;
use crate::cardlib::error::{Error, Result};
use crate::cardlib::hand_info::HandInfo;
use crate::cardlib::poker_tables::{self, Tables, STRIDE};
use crate::cardlib::sequence::CardSequence;

lazy_static! {
    static ref TABLES: Tables = poker_tables::build();
}

#[inline]
fn slot(card: Card) -> usize {
    usize::from(card.id() - 1)
}

fn check_hand(cards: &[Card], len: usize) {
    assert_eq!(cards.len(), len, "hand must hold exactly {len} cards");
    assert!(
        cards.iter().all(|card| !card.is_joker()),
        "jokers cannot be evaluated"
    );
    assert!(
        CardSet::try_from_cards(cards).is_some(),
        "hand repeats a card"
    );
}

/// Table-driven poker hand evaluation.
///
/// Hand values run from 1 (a royal flush) to 7462 (seven-high), lower being
/// better, and two hands tie exactly when their values are equal. The lookup
/// tables are built on first use and shared by every thread afterwards.
#[derive(Copy, Clone, Debug, Default)]
pub struct PokerEvaluator;

impl PokerEvaluator {
    /// Value of five distinct, non-joker cards in any order.
    ///
    /// ```
    /// # use cardlib_core::prelude::{CardSequence, PokerEvaluator};
    /// let quads = CardSequence::from_idents("Qc Qd Qh Qs 3c");
    /// let boat = CardSequence::from_idents("6c 6d 6h 9s 9d");
    /// assert!(PokerEvaluator::eval5(&quads) < PokerEvaluator::eval5(&boat));
    /// ```
    pub fn eval5(hand: impl AsRef<[Card]>) -> u16 {
        let cards = hand.as_ref();
        check_hand(cards, 5);
        let tables = &*TABLES;

        let offset = slot(cards[0]) * STRIDE + slot(cards[1]);
        let offset = tables.pairs[offset] as usize + slot(cards[2]);
        let offset = tables.triples[offset] as usize + slot(cards[3]);
        let offset = tables.quads[offset] as usize + slot(cards[4]);
        tables.values[offset]
    }

    /// Value of the best five-card hand within seven cards.
    pub fn eval7(hand: impl AsRef<[Card]>) -> u16 {
        let cards = hand.as_ref();
        check_hand(cards, 7);
        let tables = &*TABLES;

        let mut best = u16::MAX;
        for a in 0..3 {
            let row = slot(cards[a]) * STRIDE;
            for b in a + 1..4 {
                let two = tables.pairs[row + slot(cards[b])] as usize;
                for c in b + 1..5 {
                    let three = tables.triples[two + slot(cards[c])] as usize;
                    for d in c + 1..6 {
                        let four = tables.quads[three + slot(cards[d])] as usize;
                        for card in &cards[d + 1..] {
                            best = best.min(tables.values[four + slot(*card)]);
                        }
                    }
                }
            }
        }
        best
    }

    /// Find the best five cards of `hand` (five or more distinct cards),
    /// write them to `best` and return their value.
    pub fn best5(hand: &CardSequence, best: &mut CardSequence) -> Result<u16> {
        assert!(hand.len() >= 5, "hand must hold at least 5 cards");
        if hand.len() == 5 {
            let value = Self::eval5(hand);
            best.copy_from(hand)?;
            return Ok(value);
        }
        if best.is_read_only() {
            return Err(Error::ReadOnly);
        }
        if best.capacity() < 5 {
            return Err(Error::Full);
        }

        let mut scratch = CardSequence::new(5);
        let mut combiner = Combiner::new(hand, &mut scratch, 5, None)?;
        let mut found = (u16::MAX, 0);
        while let Some(candidate) = combiner.next_combination() {
            let value = Self::eval5(candidate);
            if value < found.0 {
                found = (value, combiner.rank());
            }
        }
        combiner.colex_hand_at(found.1, best)?;
        Ok(found.0)
    }

    /// Classify a five-card hand, evaluating it unless its value is given.
    pub fn hand_info(hand: impl AsRef<[Card]>, value: Option<u16>) -> HandInfo {
        let cards = hand.as_ref();
        let value = value.unwrap_or_else(|| Self::eval5(cards));
        HandInfo::new(cards, value)
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::cardlib::decks::DeckType;
    use crate::cardlib::hand_info::HandGroup;
    use crate::cardlib::random::RandomSource;
    use crate::cards;

    fn expect_value(idents: &str, expected: u16) {
        let hand = CardSequence::from_idents(idents);
        assert_eq!(PokerEvaluator::eval5(&hand), expected, "{idents}");
    }

    #[test]
    fn known_values_test() {
        expect_value("As Ks Qs Js Ts", 1);
        expect_value("Kh Qh Jh Th 9h", 2);
        expect_value("5d 4d 3d 2d Ad", 10);
        expect_value("Ac Ad Ah As Kd", 11);
        expect_value("2c 2d 2h 2s 3d", 166);
        expect_value("Ac Ad Ah Ks Kd", 167);
        expect_value("2c 2d 2h 3s 3d", 322);
        expect_value("As Ks Qs Js 9s", 323);
        expect_value("7h 5h 4h 3h 2h", 1599);
        expect_value("Ac Kd Qh Js Ts", 1600);
        expect_value("5c 4d 3h 2s Ad", 1609);
        expect_value("Ac Ad Ah Ks Qd", 1610);
        expect_value("Ac Ad Ks Kh Qd", 2468);
        expect_value("Ac Ad Ks Qh Jd", 3326);
        expect_value("Ac Kd Qs Jh 9d", 6186);
        expect_value("7c 5d 4s 3h 2d", 7462);
    }

    #[test]
    fn ordering_test() {
        let flush = PokerEvaluator::eval5(cards!("2s 5s 9s Js Ks"));
        let straight = PokerEvaluator::eval5(cards!("9c Td Jh Qs Kc"));
        let wheel = PokerEvaluator::eval5(cards!("Ac 2d 3h 4s 5c"));
        let six_high = PokerEvaluator::eval5(cards!("2c 3d 4h 5s 6c"));
        let aces_up = PokerEvaluator::eval5(cards!("Ac Ad 3h 3s 2c"));
        let kings_up = PokerEvaluator::eval5(cards!("Kc Kd Qh Qs Jc"));
        assert!(flush < straight);
        assert!(six_high < wheel);
        assert!(aces_up < kings_up);
        assert_eq!(
            PokerEvaluator::eval5(cards!("Th Jh Qh Kh Ah")),
            PokerEvaluator::eval5(cards!("Ts Js Qs Ks As"))
        );
    }

    #[test]
    fn permutation_invariance_test() {
        let mut rng = SmallRng::seed_from_u64(17);
        let mut deck = DeckType::Standard.deck().as_slice().to_vec();
        for _ in 0..500 {
            rng.partial_shuffle(&mut deck, 5);
            let mut hand = [deck[0], deck[1], deck[2], deck[3], deck[4]];
            let value = PokerEvaluator::eval5(hand);
            for permutation in (0..5).permutations(5) {
                let permuted = permutation.iter().map(|i| hand[*i]).collect_vec();
                assert_eq!(PokerEvaluator::eval5(&permuted), value);
            }
            hand.reverse();
            assert_eq!(PokerEvaluator::eval5(hand), value);
        }
    }

    #[test]
    fn eval7_matches_best_subset_test() {
        let mut rng = SmallRng::seed_from_u64(71);
        let mut deck = DeckType::Standard.cards().to_vec();
        for _ in 0..2_000 {
            rng.partial_shuffle(&mut deck, 7);
            let hand = &deck[..7];
            let expected = hand
                .iter()
                .copied()
                .combinations(5)
                .map(PokerEvaluator::eval5)
                .min();
            assert_eq!(Some(PokerEvaluator::eval7(hand)), expected);
        }
    }

    #[test]
    fn best5_test() {
        let hand = CardSequence::from_idents("Kd 2c Kh 7s Ks 2h 9c");
        let mut best = CardSequence::new(5);
        let value = PokerEvaluator::best5(&hand, &mut best).unwrap();

        assert_eq!(value, PokerEvaluator::eval7(&hand));
        assert_eq!(value, PokerEvaluator::eval5(&best));
        assert_eq!(HandGroup::of_value(value), HandGroup::FullHouse);
        let mut sorted = best.clone();
        sorted.sort().unwrap();
        assert_eq!(sorted, CardSequence::from_idents("2c 2h Kd Kh Ks"));
    }

    #[test]
    fn best5_of_six_and_five_test() {
        let six = CardSequence::from_idents("9h 8h 7h 6h 5h 4h");
        let mut best = CardSequence::new(7);
        let value = PokerEvaluator::best5(&six, &mut best).unwrap();
        assert_eq!(value, 6);
        assert_eq!(best.to_string(), "(9h 8h 7h 6h 5h)");

        let five = CardSequence::from_idents("Jd 8c 8s 3h Ac");
        let value = PokerEvaluator::best5(&five, &mut best).unwrap();
        assert_eq!(best, five);
        assert_eq!(value, PokerEvaluator::eval5(&five));
    }

    #[test]
    fn best5_output_errors_test() {
        let hand = CardSequence::from_idents("Kd 2c Kh 7s Ks 2h 9c");
        let mut locked = CardSequence::new(5).frozen();
        assert_eq!(
            PokerEvaluator::best5(&hand, &mut locked),
            Err(Error::ReadOnly)
        );
        let mut small = CardSequence::new(4);
        assert_eq!(PokerEvaluator::best5(&hand, &mut small), Err(Error::Full));
    }

    #[test]
    #[should_panic(expected = "jokers")]
    fn joker_panics_test() {
        let _ = PokerEvaluator::eval5(cards!("As Ks Qs Js JK"));
    }

    #[test]
    #[should_panic(expected = "repeats a card")]
    fn repeated_card_panics_test() {
        let _ = PokerEvaluator::eval5(cards!("As As Ks Qs Js"));
    }

    #[test]
    #[should_panic(expected = "repeats a card")]
    fn repeated_card_in_seven_panics_test() {
        let _ = PokerEvaluator::eval7(cards!("As As Ks Qs Js 2c 3d"));
    }

    #[test]
    #[should_panic(expected = "exactly 5")]
    fn short_hand_panics_test() {
        let _ = PokerEvaluator::eval5(cards!("As Ks Qs Js"));
    }

    #[test]
    fn exhaustive_group_counts_test() {
        let deck = DeckType::Standard.deck();
        let mut hand = CardSequence::new(5);
        let mut combiner = Combiner::new(&deck, &mut hand, 5, None).unwrap();

        let mut counts = [0_u32; 9];
        let mut seen = vec![false; 7463];
        while let Some(hand) = combiner.next_combination() {
            let value = PokerEvaluator::eval5(hand);
            counts[HandGroup::of_value(value) as usize] += 1;
            seen[usize::from(value)] = true;
        }

        assert_eq!(
            counts,
            [40, 624, 3744, 5108, 10200, 54912, 123552, 1098240, 1302540]
        );
        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|hit| *hit));
    }
}
