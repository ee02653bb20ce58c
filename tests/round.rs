//! Round engine integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use vingtun::{
    ActionError, ActionTally, BetError, BlackjackResult, Card, InsuranceError, MemoryStore,
    OutcomeKind, Phase, Rank, Round, RoundError, RoundEvent, RoundObserver, RoundState, Rules,
    Shoe, StateStore, Suit,
};

const fn card(suit: Suit, rank: Rank) -> Card {
    Card::new(suit, rank)
}

/// Replaces the shoe so that `draws` come off the top in order.
fn script_shoe(round: &mut Round, draws: &[Card]) {
    let mut cards = draws.to_vec();
    cards.reverse();
    round.set_shoe(Shoe::from_cards(cards));
}

#[derive(Default)]
struct Recorder(Vec<RoundEvent>);

impl RoundObserver for Recorder {
    fn on_event(&mut self, event: &RoundEvent) {
        self.0.push(*event);
    }
}

fn recorded(round: &mut Round) -> Rc<RefCell<Recorder>> {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    round.set_observer(Box::new(Rc::clone(&recorder)));
    recorder
}

#[test]
fn confirm_bet_guards() {
    let mut round = Round::new(Rules::default(), 1);

    assert_eq!(round.confirm_bet(0).unwrap_err(), BetError::ZeroBet);
    assert_eq!(
        round.confirm_bet(20_000).unwrap_err(),
        BetError::InsufficientFunds
    );

    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Eight),
            card(Suit::Clubs, Rank::Six),
            card(Suit::Diamonds, Rank::Seven),
            card(Suit::Spades, Rank::Ten),
        ],
    );
    round.confirm_bet(100).unwrap();
    assert_eq!(round.state().phase, Phase::PlayerTurn);
    assert_eq!(round.confirm_bet(100).unwrap_err(), BetError::InvalidState);
}

#[test]
fn betting_helpers_assemble_the_bet() {
    let mut round = Round::new(Rules::default(), 1);

    round.add_to_bet(200).unwrap();
    round.add_to_bet(300).unwrap();
    assert_eq!(round.state().current_bet, 500);

    assert_eq!(
        round.add_to_bet(20_000).unwrap_err(),
        BetError::InsufficientFunds
    );
    assert_eq!(round.state().current_bet, 500);

    round.clear_bet().unwrap();
    assert_eq!(round.state().current_bet, 0);

    round.all_in().unwrap();
    assert_eq!(round.state().current_bet, round.state().balance);
}

#[test]
fn rejected_intents_leave_state_bit_identical() {
    let mut round = Round::new(Rules::default(), 1);
    let before = serde_json::to_string(round.state()).unwrap();

    assert_eq!(round.hit().unwrap_err(), ActionError::InvalidState);
    assert_eq!(round.stand().unwrap_err(), ActionError::InvalidState);
    assert_eq!(round.double_down().unwrap_err(), ActionError::InvalidState);
    assert_eq!(round.split().unwrap_err(), ActionError::InvalidState);
    assert_eq!(
        round.accept_insurance(50).unwrap_err(),
        InsuranceError::NotOffered
    );
    assert_eq!(
        round.decline_insurance().unwrap_err(),
        InsuranceError::NotOffered
    );
    assert_eq!(round.repeat_bet().unwrap_err(), BetError::InvalidState);
    assert_eq!(round.change_bet().unwrap_err(), BetError::InvalidState);

    let after = serde_json::to_string(round.state()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn basic_round_flow() {
    let mut round = Round::new(Rules::default(), 42);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Eight),  // player
            card(Suit::Clubs, Rank::Six),     // dealer up
            card(Suit::Diamonds, Rank::Seven), // player
            card(Suit::Spades, Rank::Ten),    // dealer hole
            card(Suit::Hearts, Rank::Four),   // player hit
            card(Suit::Clubs, Rank::Five),    // dealer draw
        ],
    );

    round.confirm_bet(100).unwrap();
    assert_eq!(round.state().phase, Phase::PlayerTurn);
    assert_eq!(round.state().balance, 9_900);
    assert_eq!(round.state().initial_bet, 100);
    assert_eq!(round.state().hands[0].value(), 15);
    assert!(!round.state().dealer.is_hole_revealed());
    assert_eq!(round.state().dealer.visible_value(), 6);

    let hit_card = round.hit().unwrap();
    assert_eq!(hit_card.rank, Rank::Four);
    assert_eq!(round.state().phase, Phase::PlayerTurn);

    round.stand().unwrap();
    assert_eq!(round.state().phase, Phase::Resolution);
    assert!(round.state().dealer.is_hole_revealed());
    assert_eq!(round.state().dealer.value(), 21);

    let settlement = round.state().hands[0].settlement().unwrap();
    assert_eq!(settlement.kind, OutcomeKind::Lost);
    assert_eq!(settlement.amount, 100);
    assert_eq!(round.state().balance, 9_900);
    assert_eq!(round.state().hands_played, 1);
}

#[test]
fn winning_hand_pays_double_the_stake() {
    let mut round = Round::new(Rules::default(), 2);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Ten),
            card(Suit::Diamonds, Rank::King),
            card(Suit::Spades, Rank::Eight),
        ],
    );

    round.confirm_bet(100).unwrap();
    round.stand().unwrap();

    let settlement = round.state().hands[0].settlement().unwrap();
    assert_eq!(settlement.kind, OutcomeKind::Won);
    assert_eq!(settlement.amount, 100);
    assert_eq!(round.state().balance, 10_100);
}

#[test]
fn equal_totals_push_the_stake_back() {
    let mut round = Round::new(Rules::default(), 3);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Nine),
            card(Suit::Clubs, Rank::Ten),
            card(Suit::Diamonds, Rank::Nine),
            card(Suit::Spades, Rank::Eight),
        ],
    );

    round.confirm_bet(100).unwrap();
    round.stand().unwrap();

    let settlement = round.state().hands[0].settlement().unwrap();
    assert_eq!(settlement.kind, OutcomeKind::Push);
    assert_eq!(round.state().balance, 10_000);
}

#[test]
fn dealer_bust_pays_the_live_hand() {
    let mut round = Round::new(Rules::default(), 4);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Ten),
            card(Suit::Diamonds, Rank::Five),
            card(Suit::Spades, Rank::Six),
            card(Suit::Diamonds, Rank::Ten), // dealer draw, busts
        ],
    );

    round.confirm_bet(100).unwrap();
    round.stand().unwrap();

    assert!(round.state().dealer.is_busted());
    let settlement = round.state().hands[0].settlement().unwrap();
    assert_eq!(settlement.kind, OutcomeKind::Won);
    assert_eq!(round.state().balance, 10_100);
}

#[test]
fn busting_every_hand_skips_the_dealer_draw_out() {
    let mut round = Round::new(Rules::default(), 5);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Nine),
            card(Suit::Diamonds, Rank::Six),
            card(Suit::Spades, Rank::Seven),
            card(Suit::Diamonds, Rank::Ten), // player hit, busts
        ],
    );

    round.confirm_bet(100).unwrap();
    round.hit().unwrap();

    assert_eq!(round.state().phase, Phase::Resolution);
    // Dealer never drew against a dead table, but the hand is shown.
    assert_eq!(round.state().dealer.len(), 2);
    assert!(round.state().dealer.is_hole_revealed());

    let settlement = round.state().hands[0].settlement().unwrap();
    assert_eq!(settlement.kind, OutcomeKind::Bust);
    assert_eq!(settlement.amount, 100);
    assert_eq!(round.state().balance, 9_900);
    assert_eq!(round.state().hands_played, 1);
}

#[test]
fn hitting_to_twenty_one_ends_the_turn() {
    let mut round = Round::new(Rules::default(), 6);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Nine),
            card(Suit::Diamonds, Rank::Five),
            card(Suit::Spades, Rank::Seven),
            card(Suit::Hearts, Rank::Six),   // player hit, 21
            card(Suit::Diamonds, Rank::Ten), // dealer draw, busts
        ],
    );

    round.confirm_bet(100).unwrap();
    round.hit().unwrap();

    // The 21 stood automatically and the dealer played out.
    assert_eq!(round.state().phase, Phase::Resolution);
    let settlement = round.state().hands[0].settlement().unwrap();
    assert_eq!(settlement.kind, OutcomeKind::Won);
    assert_eq!(round.state().balance, 10_100);
}

#[test]
fn opening_natural_short_circuits_the_round() {
    let mut round = Round::new(Rules::default(), 7);
    let recorder = recorded(&mut round);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ace),
            card(Suit::Clubs, Rank::Seven),
            card(Suit::Diamonds, Rank::King),
            card(Suit::Spades, Rank::Nine),
        ],
    );

    round.confirm_bet(100).unwrap();

    assert_eq!(round.state().phase, Phase::Resolution);
    assert_eq!(
        round.state().blackjack_result,
        BlackjackResult::PlayerBlackjack
    );
    let settlement = round.state().hands[0].settlement().unwrap();
    assert_eq!(settlement.kind, OutcomeKind::Blackjack);
    assert_eq!(settlement.amount, 150);
    assert_eq!(round.state().balance, 10_250);

    // The round never reached the player turn.
    assert!(!recorder.borrow().0.iter().any(|event| matches!(
        event,
        RoundEvent::PhaseChanged {
            to: Phase::PlayerTurn,
            ..
        }
    )));
}

#[test]
fn naturals_on_both_sides_push() {
    let mut round = Round::new(Rules::default(), 8);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ace),
            card(Suit::Clubs, Rank::King),
            card(Suit::Diamonds, Rank::King),
            card(Suit::Spades, Rank::Ace),
        ],
    );

    round.confirm_bet(100).unwrap();

    assert_eq!(round.state().phase, Phase::Resolution);
    assert_eq!(round.state().blackjack_result, BlackjackResult::Push);
    assert_eq!(round.state().balance, 10_000);
    assert!(round.state().dealer.is_hole_revealed());
}

#[test]
fn dealer_natural_under_a_ten_ends_the_round() {
    let mut round = Round::new(Rules::default(), 9);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Nine),
            card(Suit::Clubs, Rank::King),
            card(Suit::Diamonds, Rank::Seven),
            card(Suit::Spades, Rank::Ace),
        ],
    );

    round.confirm_bet(100).unwrap();

    assert_eq!(round.state().phase, Phase::Resolution);
    assert_eq!(
        round.state().blackjack_result,
        BlackjackResult::DealerBlackjack
    );
    let settlement = round.state().hands[0].settlement().unwrap();
    assert_eq!(settlement.kind, OutcomeKind::DealerBlackjack);
    assert_eq!(round.state().balance, 9_900);
}

#[test]
fn ace_upcard_opens_the_insurance_offer() {
    let mut round = Round::new(Rules::default(), 10);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Nine),
            card(Suit::Clubs, Rank::Ace),
            card(Suit::Diamonds, Rank::Seven),
            card(Suit::Spades, Rank::King),
        ],
    );

    round.confirm_bet(100).unwrap();

    assert_eq!(round.state().phase, Phase::Dealing);
    assert!(round.state().insurance_offered);
    assert_eq!(round.max_insurance(), 50);

    // No other action is accepted while the offer is open.
    assert_eq!(round.hit().unwrap_err(), ActionError::InvalidState);

    round.accept_insurance(50).unwrap();

    // Dealer had the natural: insurance pays 2:1, the hand loses.
    assert_eq!(round.state().phase, Phase::Resolution);
    assert_eq!(
        round.state().blackjack_result,
        BlackjackResult::DealerBlackjack
    );
    assert_eq!(round.state().balance, 9_950);
}

#[test]
fn declined_insurance_still_peeks() {
    let mut round = Round::new(Rules::default(), 11);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Nine),
            card(Suit::Clubs, Rank::Ace),
            card(Suit::Diamonds, Rank::Seven),
            card(Suit::Spades, Rank::King),
        ],
    );

    round.confirm_bet(100).unwrap();
    round.decline_insurance().unwrap();

    assert_eq!(round.state().phase, Phase::Resolution);
    assert_eq!(round.state().balance, 9_900);
}

#[test]
fn lost_insurance_plays_on() {
    let mut round = Round::new(Rules::default(), 12);
    let recorder = recorded(&mut round);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Nine),
            card(Suit::Clubs, Rank::Ace),
            card(Suit::Diamonds, Rank::Seven),
            card(Suit::Spades, Rank::Nine), // dealer 20, no natural
        ],
    );

    round.confirm_bet(100).unwrap();
    round.accept_insurance(50).unwrap();

    assert_eq!(round.state().phase, Phase::PlayerTurn);
    assert_eq!(round.state().balance, 9_850);
    assert!(recorder.borrow().0.contains(&RoundEvent::InsuranceSettled {
        won: false,
        amount: 50,
    }));

    round.stand().unwrap();
    let settlement = round.state().hands[0].settlement().unwrap();
    assert_eq!(settlement.kind, OutcomeKind::Lost);
    assert_eq!(round.state().balance, 9_850);
}

#[test]
fn insurance_amount_is_bounded() {
    let mut round = Round::new(Rules::default(), 13);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Nine),
            card(Suit::Clubs, Rank::Ace),
            card(Suit::Diamonds, Rank::Seven),
            card(Suit::Spades, Rank::Nine),
        ],
    );

    round.confirm_bet(100).unwrap();

    assert_eq!(
        round.accept_insurance(0).unwrap_err(),
        InsuranceError::InvalidAmount
    );
    assert_eq!(
        round.accept_insurance(51).unwrap_err(),
        InsuranceError::InvalidAmount
    );
    assert!(round.state().insurance_offered);
}

#[test]
fn insurance_requires_funds() {
    let mut round = Round::new(Rules::default(), 14);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Nine),
            card(Suit::Clubs, Rank::Ace),
            card(Suit::Diamonds, Rank::Seven),
            card(Suit::Spades, Rank::Nine),
        ],
    );

    round.confirm_bet(10_000).unwrap();
    assert_eq!(round.state().balance, 0);
    assert_eq!(
        round.accept_insurance(50).unwrap_err(),
        InsuranceError::InsufficientFunds
    );
}

#[test]
fn split_duplicates_the_stake_and_grows_the_table() {
    let mut round = Round::new(Rules::default(), 15);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Eight),
            card(Suit::Clubs, Rank::Five),
            card(Suit::Diamonds, Rank::Eight),
            card(Suit::Spades, Rank::Nine),
            card(Suit::Hearts, Rank::Two),   // first hand's replacement card
            card(Suit::Spades, Rank::Eight), // second hand's card on activation
            card(Suit::Diamonds, Rank::Ten), // dealer draw, busts
        ],
    );

    round.confirm_bet(100).unwrap();
    round.split().unwrap();

    assert_eq!(round.state().hands.len(), 2);
    assert_eq!(round.state().split_count, 1);
    assert_eq!(round.state().balance, 9_800);
    assert_eq!(round.state().hands[0].bet(), 100);
    assert_eq!(round.state().hands[1].bet(), 100);
    assert_eq!(round.state().hands[0].len(), 2);
    assert_eq!(round.state().hands[1].len(), 1);
    assert_eq!(round.state().active_hand, 0);

    round.stand().unwrap();

    // The second hand drew its card on activation and is another pair,
    // but the split allowance is spent.
    assert_eq!(round.state().active_hand, 1);
    assert_eq!(round.state().hands[1].len(), 2);
    assert!(round.state().hands[1].is_pair());
    assert_eq!(round.split().unwrap_err(), ActionError::MaxSplitsReached);

    round.stand().unwrap();
    assert_eq!(round.state().phase, Phase::Resolution);
    assert!(round.state().dealer.is_busted());
    assert_eq!(round.state().balance, 9_800 + 200 + 200);
}

#[test]
fn split_aces_take_one_card_each() {
    let mut round = Round::new(Rules::default(), 16);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ace),
            card(Suit::Clubs, Rank::Five),
            card(Suit::Diamonds, Rank::Ace),
            card(Suit::Spades, Rank::Nine),
            card(Suit::Hearts, Rank::King),  // first ace's card
            card(Suit::Clubs, Rank::Queen),  // second ace's card
            card(Suit::Diamonds, Rank::Ten), // dealer draw, busts
        ],
    );

    round.confirm_bet(100).unwrap();
    round.split().unwrap();

    // Both hands completed with one card and play passed to the dealer.
    assert_eq!(round.state().phase, Phase::Resolution);
    assert_eq!(round.state().hands[0].value(), 21);
    assert_eq!(round.state().hands[1].value(), 21);
    // Post-split 21s are not naturals.
    assert_eq!(round.state().blackjack_result, BlackjackResult::None);
    assert_eq!(
        round.state().hands[0].settlement().unwrap().kind,
        OutcomeKind::Won
    );
    assert_eq!(round.state().balance, 9_800 + 400);
}

#[test]
fn post_split_twenty_one_advances_automatically() {
    let mut round = Round::new(Rules::default(), 17);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Nine),
            card(Suit::Diamonds, Rank::Ten),
            card(Suit::Spades, Rank::Seven),
            card(Suit::Hearts, Rank::Ace),  // first hand: 21, auto-advance
            card(Suit::Clubs, Rank::Five),  // second hand's card
            card(Suit::Diamonds, Rank::Two), // dealer draw
        ],
    );

    round.confirm_bet(100).unwrap();
    round.split().unwrap();

    assert_eq!(round.state().phase, Phase::PlayerTurn);
    assert_eq!(round.state().active_hand, 1);
    assert_eq!(round.state().hands[0].value(), 21);
    assert_eq!(round.state().hands[1].value(), 15);

    round.stand().unwrap();

    assert_eq!(round.state().dealer.value(), 18);
    assert_eq!(
        round.state().hands[0].settlement().unwrap().kind,
        OutcomeKind::Won
    );
    assert_eq!(
        round.state().hands[1].settlement().unwrap().kind,
        OutcomeKind::Lost
    );
    assert_eq!(round.state().balance, 9_800 + 200);
}

#[test]
fn split_requires_a_pair_and_funds() {
    let mut round = Round::new(Rules::default(), 18);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Eight),
            card(Suit::Clubs, Rank::Five),
            card(Suit::Diamonds, Rank::Seven),
            card(Suit::Spades, Rank::Nine),
        ],
    );

    round.confirm_bet(6_000).unwrap();
    assert_eq!(round.split().unwrap_err(), ActionError::CannotSplit);

    let mut round = Round::new(Rules::default(), 18);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Eight),
            card(Suit::Clubs, Rank::Five),
            card(Suit::Diamonds, Rank::Eight),
            card(Suit::Spades, Rank::Nine),
        ],
    );

    round.confirm_bet(6_000).unwrap();
    assert_eq!(round.split().unwrap_err(), ActionError::InsufficientFunds);
}

#[test]
fn double_down_doubles_the_stake_for_one_card() {
    let mut round = Round::new(Rules::default(), 19);
    let recorder = recorded(&mut round);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Five),
            card(Suit::Clubs, Rank::Six),
            card(Suit::Diamonds, Rank::Four),
            card(Suit::Spades, Rank::Ten),
            card(Suit::Hearts, Rank::King), // double-down card
            card(Suit::Clubs, Rank::Seven), // dealer draw, busts
        ],
    );

    round.confirm_bet(100).unwrap();
    let drawn = round.double_down().unwrap();

    assert_eq!(drawn.rank, Rank::King);
    assert_eq!(round.state().hands[0].bet(), 200);
    assert_eq!(round.state().hands[0].value(), 19);
    assert_eq!(round.state().phase, Phase::Resolution);
    assert!(round.state().dealer.is_busted());
    assert_eq!(round.state().balance, 10_000 - 200 + 400);
    assert!(recorder.borrow().0.contains(&RoundEvent::DoubledDown));
}

#[test]
fn double_down_guards() {
    let rules = Rules::default().with_allow_double_down(false);
    let mut round = Round::new(rules, 20);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Five),
            card(Suit::Clubs, Rank::Six),
            card(Suit::Diamonds, Rank::Four),
            card(Suit::Spades, Rank::Ten),
        ],
    );
    round.confirm_bet(100).unwrap();
    assert_eq!(round.double_down().unwrap_err(), ActionError::CannotDouble);

    // Doubling needs the funds to match the stake.
    let mut round = Round::new(Rules::default(), 20);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Five),
            card(Suit::Clubs, Rank::Six),
            card(Suit::Diamonds, Rank::Four),
            card(Suit::Spades, Rank::Ten),
        ],
    );
    round.confirm_bet(6_000).unwrap();
    assert_eq!(
        round.double_down().unwrap_err(),
        ActionError::InsufficientFunds
    );

    // And exactly two cards.
    let mut round = Round::new(Rules::default(), 20);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Five),
            card(Suit::Clubs, Rank::Six),
            card(Suit::Diamonds, Rank::Four),
            card(Suit::Spades, Rank::Ten),
            card(Suit::Hearts, Rank::Two),
        ],
    );
    round.confirm_bet(100).unwrap();
    round.hit().unwrap();
    assert_eq!(round.double_down().unwrap_err(), ActionError::CannotDouble);
}

#[test]
fn soft_17_policy_controls_the_dealer_draw() {
    let draws = [
        card(Suit::Hearts, Rank::Ten),
        card(Suit::Clubs, Rank::Six),
        card(Suit::Diamonds, Rank::Nine),
        card(Suit::Spades, Rank::Ace), // dealer: soft 17
        card(Suit::Hearts, Rank::Three), // only drawn when hitting soft 17
    ];

    // Default table stands on every 17.
    let mut round = Round::new(Rules::default(), 21);
    script_shoe(&mut round, &draws);
    round.confirm_bet(100).unwrap();
    round.stand().unwrap();
    assert_eq!(round.state().dealer.value(), 17);
    assert_eq!(
        round.state().hands[0].settlement().unwrap().kind,
        OutcomeKind::Won
    );

    // Configured table re-hits the soft 17.
    let rules = Rules::default().with_dealer_hits_soft17(true);
    let mut round = Round::new(rules, 21);
    script_shoe(&mut round, &draws);
    round.confirm_bet(100).unwrap();
    round.stand().unwrap();
    assert_eq!(round.state().dealer.value(), 20);
    assert_eq!(
        round.state().hands[0].settlement().unwrap().kind,
        OutcomeKind::Lost
    );
}

#[test]
fn shoe_exhaustion_aborts_the_round_without_payouts() {
    let mut round = Round::new(Rules::default(), 22);
    let recorder = recorded(&mut round);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Nine),
            card(Suit::Diamonds, Rank::Five),
            card(Suit::Spades, Rank::Seven),
        ],
    );

    round.confirm_bet(100).unwrap();
    assert_eq!(round.state().phase, Phase::PlayerTurn);

    assert_eq!(round.hit().unwrap_err(), ActionError::ShoeExhausted);
    assert_eq!(round.state().phase, Phase::Resolution);
    assert_eq!(round.state().round_error, Some(RoundError::ShoeExhausted));
    assert!(round.state().hands[0].settlement().is_none());
    assert_eq!(round.state().balance, 9_900);
    // An aborted round does not count toward the bonus.
    assert_eq!(round.state().hands_played, 0);
    assert!(recorder.borrow().0.contains(&RoundEvent::RoundAborted {
        error: RoundError::ShoeExhausted,
    }));

    // The next round starts from a fresh shuffle.
    round.repeat_bet().unwrap();
    assert_eq!(round.state().round_error, None);
    assert_eq!(round.cards_remaining(), 4 * 52 - 4);
}

#[test]
fn exhaustion_during_the_deal_aborts_too() {
    let mut round = Round::new(Rules::default(), 23);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Nine),
        ],
    );

    round.confirm_bet(100).unwrap();
    assert_eq!(round.state().phase, Phase::Resolution);
    assert_eq!(round.state().round_error, Some(RoundError::ShoeExhausted));
    assert_eq!(round.state().balance, 9_900);
}

#[test]
fn reshuffle_is_scheduled_at_the_threshold() {
    let rules = Rules::default()
        .with_num_decks(1)
        .with_reshuffle_threshold(0.25);
    let mut round = Round::new(rules, 24);
    let recorder = recorded(&mut round);

    // 17 cards: the opening deal leaves exactly 13, the trigger point for
    // one deck at a quarter remaining.
    let mut cards = vec![card(Suit::Hearts, Rank::Two); 13];
    cards.extend([
        card(Suit::Spades, Rank::Eight),  // dealer hole
        card(Suit::Diamonds, Rank::Ten),  // player
        card(Suit::Clubs, Rank::Ten),     // dealer up
        card(Suit::Hearts, Rank::Ten),    // player
    ]);
    round.set_shoe(Shoe::from_cards(cards));

    round.confirm_bet(100).unwrap();
    round.stand().unwrap();

    assert_eq!(round.state().phase, Phase::Resolution);
    assert_eq!(round.cards_remaining(), 13);
    assert!(round.reshuffle_pending());

    round.change_bet().unwrap();

    assert_eq!(round.state().phase, Phase::Betting);
    assert_eq!(round.state().current_bet, 0);
    assert!(!round.reshuffle_pending());
    assert_eq!(round.cards_remaining(), 52);

    let events = recorder.borrow();
    assert!(events.0.contains(&RoundEvent::ShoeReshuffled {
        cards_remaining: 52,
    }));
    // The transient phases surfaced in order on the way back to betting.
    let phases: Vec<Phase> = events
        .0
        .iter()
        .filter_map(|event| match event {
            RoundEvent::PhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    let tail = &phases[phases.len() - 3..];
    assert_eq!(tail, [Phase::ClearTable, Phase::ShuffleDecks, Phase::Betting]);
}

#[test]
fn repeat_bet_restakes_and_deals() {
    let mut round = Round::new(Rules::default(), 25);
    // Filler under the scripted draws keeps the shoe above the reshuffle
    // threshold between the two rounds.
    let mut cards = vec![card(Suit::Hearts, Rank::Two); 60];
    let mut top = vec![
        card(Suit::Hearts, Rank::Ten),
        card(Suit::Clubs, Rank::Ten),
        card(Suit::Diamonds, Rank::King),
        card(Suit::Spades, Rank::Eight),
        // next round
        card(Suit::Hearts, Rank::Nine),
        card(Suit::Clubs, Rank::Seven),
        card(Suit::Diamonds, Rank::Six),
        card(Suit::Spades, Rank::Ten),
    ];
    top.reverse();
    cards.extend(top);
    round.set_shoe(Shoe::from_cards(cards));

    round.confirm_bet(100).unwrap();
    round.stand().unwrap();
    assert_eq!(round.state().balance, 10_100);

    round.repeat_bet().unwrap();
    assert_eq!(round.state().phase, Phase::PlayerTurn);
    assert_eq!(round.state().current_bet, 100);
    assert_eq!(round.state().balance, 10_000);
    assert_eq!(round.state().hands[0].value(), 15);
    assert!(round.state().hands[0].settlement().is_none());

    round.stand().unwrap();
    assert_eq!(round.state().hands_played, 2);
    assert_eq!(round.state().balance, 10_000);
}

#[test]
fn reset_for_new_round_returns_to_betting() {
    let mut round = Round::new(Rules::default(), 26);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Ten),
            card(Suit::Diamonds, Rank::King),
            card(Suit::Spades, Rank::Eight),
        ],
    );

    round.confirm_bet(100).unwrap();
    assert_eq!(
        round.reset_for_new_round().unwrap_err(),
        BetError::InvalidState
    );

    round.stand().unwrap();
    round.reset_for_new_round().unwrap();

    assert_eq!(round.state().phase, Phase::Betting);
    assert!(round.state().hands.is_empty());
    assert_eq!(round.state().current_bet, 0);
}

#[test]
fn reset_bankroll_restores_the_stake_from_any_phase() {
    let mut round = Round::new(Rules::default(), 27);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Ten),
            card(Suit::Diamonds, Rank::King),
            card(Suit::Spades, Rank::Eight),
        ],
    );

    round.confirm_bet(5_000).unwrap();
    assert_eq!(round.state().phase, Phase::PlayerTurn);

    round.reset_bankroll();

    assert_eq!(round.state().phase, Phase::Betting);
    assert_eq!(round.state().balance, 10_000);
    assert_eq!(round.state().hands_played, 0);
    assert!(round.state().hands.is_empty());
}

#[test]
fn bankroll_bonus_lands_every_fifty_hands() {
    let mut store = MemoryStore::new();
    let state = RoundState {
        hands_played: 49,
        ..RoundState::default()
    };
    store.save(&state);

    let mut round = Round::with_store(Rules::default(), 28, Box::new(store));
    let recorder = recorded(&mut round);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Ten),
            card(Suit::Diamonds, Rank::King),
            card(Suit::Spades, Rank::Eight),
        ],
    );

    round.confirm_bet(100).unwrap();
    round.stand().unwrap();

    assert_eq!(round.state().hands_played, 0);
    assert_eq!(round.state().balance, 10_000 + 100 + 25_000);
    assert!(recorder.borrow().0.contains(&RoundEvent::BonusAwarded {
        amount: 25_000,
    }));
}

#[test]
fn restored_sessions_resume_at_betting() {
    let mut store = MemoryStore::new();
    let state = RoundState {
        phase: Phase::PlayerTurn,
        balance: 7_777,
        hands_played: 12,
        ..RoundState::default()
    };
    store.save(&state);

    let round = Round::with_store(Rules::default(), 29, Box::new(store));
    assert_eq!(round.state().phase, Phase::Betting);
    assert_eq!(round.state().balance, 7_777);
    assert_eq!(round.state().hands_played, 12);
    assert!(round.state().hands.is_empty());
}

#[test]
fn broke_sessions_restart_with_the_default_balance() {
    let mut store = MemoryStore::new();
    let state = RoundState {
        balance: 0,
        ..RoundState::default()
    };
    store.save(&state);

    let round = Round::with_store(Rules::default(), 30, Box::new(store));
    assert_eq!(round.state().balance, 10_000);
}

#[test]
fn every_intent_saves_a_snapshot() {
    let store = Rc::new(RefCell::new(MemoryStore::new()));
    let mut round = Round::with_store(Rules::default(), 31, Box::new(Rc::clone(&store)));
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Ten),
            card(Suit::Clubs, Rank::Ten),
            card(Suit::Diamonds, Rank::King),
            card(Suit::Spades, Rank::Eight),
        ],
    );

    round.confirm_bet(100).unwrap();
    let saved = store.borrow().load().unwrap();
    assert_eq!(saved.phase, Phase::PlayerTurn);
    assert_eq!(saved.balance, 9_900);

    round.stand().unwrap();
    let saved = store.borrow().load().unwrap();
    assert_eq!(saved.phase, Phase::Resolution);
    assert_eq!(saved, *round.state());
}

#[test]
fn state_and_rules_round_trip_through_json() {
    let mut round = Round::new(Rules::default(), 32);
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Eight),
            card(Suit::Clubs, Rank::Six),
            card(Suit::Diamonds, Rank::Seven),
            card(Suit::Spades, Rank::Ten),
        ],
    );
    round.confirm_bet(100).unwrap();

    let json = serde_json::to_string(round.state()).unwrap();
    let restored: RoundState = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, round.state());

    let rules_json = serde_json::to_string(round.rules()).unwrap();
    let restored_rules: Rules = serde_json::from_str(&rules_json).unwrap();
    assert_eq!(&restored_rules, round.rules());
}

#[test]
fn tally_observer_accumulates_session_counters() {
    let tally = Rc::new(RefCell::new(ActionTally::new()));
    let mut round = Round::new(Rules::default(), 33);
    round.set_observer(Box::new(Rc::clone(&tally)));
    script_shoe(
        &mut round,
        &[
            card(Suit::Hearts, Rank::Eight),
            card(Suit::Clubs, Rank::Six),
            card(Suit::Diamonds, Rank::Seven),
            card(Suit::Spades, Rank::Ten),
            card(Suit::Hearts, Rank::Four),
            card(Suit::Clubs, Rank::Five),
        ],
    );

    round.confirm_bet(100).unwrap();
    round.hit().unwrap();
    round.stand().unwrap();

    let tally = tally.borrow();
    assert_eq!(tally.bets, 1);
    assert_eq!(tally.hits, 1);
    assert_eq!(tally.stands, 1);
    assert_eq!(tally.average_bet(), 100.0);
}

#[test]
fn award_bonus_credits_the_balance() {
    let mut round = Round::new(Rules::default(), 34);
    round.award_bonus(500);
    assert_eq!(round.state().balance, 10_500);
}
