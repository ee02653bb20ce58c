//! CLI blackjack example. Run with `--practice` for the strategy trainer.

#![allow(clippy::missing_docs_in_private_items)]

use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use vingtun::{
    Action, Card, DealerHand, Hand, OutcomeKind, Phase, PracticeSession, Rank, Round, Rules, Suit,
    recommend,
};

fn main() {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    if std::env::args().any(|arg| arg == "--practice") {
        run_practice(seed);
    } else {
        run_table(seed);
    }
}

fn run_table(seed: u64) {
    println!("Blackjack CLI example (type 'q' to quit)");

    let mut round = Round::new(Rules::default(), seed);

    // Drive the engine by polling the phase after every intent.
    loop {
        match round.state().phase {
            Phase::Betting => {
                let balance = round.state().balance;
                if balance == 0 {
                    println!("You are out of money. Resetting bankroll.");
                    round.reset_bankroll();
                    continue;
                }

                let Some(bet) = prompt_amount(&format!("Bet amount (1-{balance}, 0 to quit): "))
                else {
                    return;
                };
                if bet == 0 {
                    println!("Goodbye.");
                    return;
                }
                if let Err(err) = round.confirm_bet(bet) {
                    println!("Bet error: {err}");
                }
            }
            Phase::Dealing => {
                // The only pause inside dealing is the insurance offer.
                println!(
                    "Dealer shows an Ace. Insurance offered (up to {}).",
                    round.max_insurance()
                );
                match prompt_line("Take insurance? (y/n): ").as_str() {
                    "y" | "yes" => {
                        let Some(amount) = prompt_amount("Insurance amount: ") else {
                            return;
                        };
                        if let Err(err) = round.accept_insurance(amount) {
                            println!("Insurance error: {err}");
                            let _ = round.decline_insurance();
                        }
                    }
                    _ => {
                        let _ = round.decline_insurance();
                    }
                }
            }
            Phase::PlayerTurn => {
                print_table(&round);

                let action = prompt_line("Action [h]it [s]tand [d]ouble [p]split [?]hint: ");
                let result = match action.as_str() {
                    "h" | "hit" => round.hit().map(|_| ()),
                    "s" | "stand" => round.stand(),
                    "d" | "double" => round.double_down().map(|_| ()),
                    "p" | "split" => round.split(),
                    "?" | "hint" => {
                        print_hint(&round);
                        continue;
                    }
                    "q" | "quit" => return,
                    _ => {
                        println!("Unknown action.");
                        continue;
                    }
                };
                if let Err(err) = result {
                    println!("Action error: {err}");
                }
            }
            Phase::Resolution => {
                print_resolution(&round);

                match prompt_line("Again? [r]epeat bet [c]hange bet [q]uit: ").as_str() {
                    "r" | "repeat" => {
                        if let Err(err) = round.repeat_bet() {
                            println!("Repeat error: {err}");
                            let _ = round.change_bet();
                        }
                    }
                    "c" | "change" => {
                        if let Err(err) = round.change_bet() {
                            println!("Change error: {err}");
                        }
                    }
                    _ => {
                        println!("Goodbye.");
                        return;
                    }
                }
            }
            // Transient phases resolve inside the intents that enter them.
            Phase::DealerTurn | Phase::ClearTable | Phase::ShuffleDecks => {}
        }
    }
}

fn run_practice(seed: u64) {
    println!("Basic-strategy trainer (type 'q' to quit)");

    let mut session = PracticeSession::new(seed);
    if let Err(err) = session.deal() {
        println!("Deal error: {err}");
        return;
    }

    loop {
        println!(
            "\nDealer shows: {}",
            session.dealer_upcard().map_or_else(String::new, format_card)
        );
        println!(
            "Your hand:    {}",
            session
                .player()
                .iter()
                .map(format_card)
                .collect::<Vec<_>>()
                .join(" ")
        );

        let answer = match prompt_line("Correct play? [h]it [s]tand [d]ouble [p]split: ").as_str() {
            "h" | "hit" => Action::Hit,
            "s" | "stand" => Action::Stand,
            "d" | "double" => Action::Double,
            "p" | "split" => Action::Split,
            "q" | "quit" => return,
            _ => {
                println!("Unknown action.");
                continue;
            }
        };

        match session.choose(answer) {
            Ok(feedback) => {
                if feedback.correct {
                    println!("Correct! Streak: {}", feedback.streak);
                } else {
                    println!("Incorrect. The chart says {:?}.", feedback.expected);
                }
                if let Some(bonus) = feedback.bonus {
                    println!("Streak complete: +{bonus} bankroll bonus!");
                }
            }
            Err(err) => println!("Grade error: {err}"),
        }

        if let Err(err) = session.next_hand() {
            println!("Deal error: {err}");
            return;
        }
    }
}

fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_lowercase()
}

fn prompt_amount(prompt: &str) -> Option<u32> {
    loop {
        let input = prompt_line(prompt);
        if input == "q" || input == "quit" {
            return None;
        }
        match input.parse::<u32>() {
            Ok(value) => return Some(value),
            Err(_) => println!("Please enter a number."),
        }
    }
}

fn print_hint(round: &Round) {
    let state = round.state();
    let Some(hand) = state.hands.get(state.active_hand) else {
        return;
    };
    let Some(upcard) = state.dealer.up_card() else {
        return;
    };
    let can_double = hand.len() == 2 && state.balance >= hand.bet();
    let action = recommend(hand.cards(), *upcard, can_double);
    println!("The chart says: {action:?}");
}

fn print_table(round: &Round) {
    let state = round.state();
    println!("\nShoe: {} cards remaining", round.cards_remaining());
    println!(
        "Dealer: {} (value {})",
        format_dealer(&state.dealer),
        state.dealer.visible_value()
    );

    for (index, hand) in state.hands.iter().enumerate() {
        let marker = if index == state.active_hand { "*" } else { " " };
        println!(
            "{} Hand {}: {} | value {} | bet {}",
            marker,
            index,
            format_hand(hand),
            hand.value(),
            hand.bet(),
        );
    }
    println!("Balance: {}", state.balance);
}

fn print_resolution(round: &Round) {
    let state = round.state();
    println!(
        "\nDealer: {} (value {})",
        format_dealer(&state.dealer),
        state.dealer.value()
    );

    for (index, hand) in state.hands.iter().enumerate() {
        let outcome = hand.settlement().map_or_else(
            || "(unsettled)".to_string(),
            |settlement| match settlement.kind {
                OutcomeKind::Bust => format!("Bust -{}", settlement.amount),
                OutcomeKind::Won => format!("Won +{}", settlement.amount),
                OutcomeKind::Lost => format!("Lost -{}", settlement.amount),
                OutcomeKind::Push => "Push".to_string(),
                OutcomeKind::Blackjack => format!("Blackjack +{}", settlement.amount),
                OutcomeKind::DealerBlackjack => {
                    format!("Dealer Blackjack -{}", settlement.amount)
                }
            },
        );
        println!(
            "Hand {}: {} | value {} | {}",
            index,
            format_hand(hand),
            hand.value(),
            outcome
        );
    }

    if let Some(error) = state.round_error {
        println!("Round aborted: {error}");
    }
    println!("Balance: {}", state.balance);
}

fn format_dealer(dealer: &DealerHand) -> String {
    if dealer.cards().is_empty() {
        return "(no cards)".to_string();
    }

    if dealer.is_hole_revealed() {
        dealer
            .cards()
            .iter()
            .map(format_card)
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        let mut parts = Vec::new();
        if let Some(card) = dealer.up_card() {
            parts.push(format_card(card));
        }
        if dealer.len() > 1 {
            parts.push("??".to_string());
        }
        parts.join(" ")
    }
}

fn format_hand(hand: &Hand) -> String {
    if hand.is_empty() {
        return "(empty)".to_string();
    }
    hand.cards()
        .iter()
        .map(format_card)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_card(card: &Card) -> String {
    let suit = match card.suit {
        Suit::Hearts => "H",
        Suit::Diamonds => "D",
        Suit::Clubs => "C",
        Suit::Spades => "S",
    };
    let rank = match card.rank {
        Rank::Ace => "A".to_string(),
        Rank::Jack => "J".to_string(),
        Rank::Queen => "Q".to_string(),
        Rank::King => "K".to_string(),
        other => other.value().to_string(),
    };
    format!("{rank}{suit}")
}
