/*
Game: Baloot
Four players in two fixed partnerships play eight tricks from a 32-card
deck after a single sun/hukm declaration sets the round's trump mode.
*/

use std::cmp::Ordering;
use std::collections::HashMap;

use enum_iterator::{all, Sequence};
use rand::{seq::SliceRandom, thread_rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::cards::{deck, human_card_sorter, Card, Suit};

pub const HAND_SIZE: usize = 8;
// Moves 0..=31 are card ids; declarations and the new-round request
// live above that range
pub const SUN_DECLARATION: i32 = 32;
pub const HUKM_DECLARATION_OFFSET: i32 = 33; // 33..=36, one per suit
pub const NEW_ROUND: i32 = 37;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum State {
    // Waiting for the round's sun/hukm declaration
    #[default]
    Declaring,
    // Trick play
    Play,
    // Round result stays on display until a new round is requested
    RoundOver,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Sequence,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "camelCase")]
pub enum Seat {
    #[default]
    Bottom = 0,
    Right = 1,
    Top = 2,
    Left = 3,
}

impl Seat {
    /// Next seat in the fixed clockwise cycle bottom -> right -> top -> left.
    pub fn next(&self) -> Seat {
        match self {
            Seat::Bottom => Seat::Right,
            Seat::Right => Seat::Top,
            Seat::Top => Seat::Left,
            Seat::Left => Seat::Bottom,
        }
    }

    /// Partnerships are fixed: the bottom/top seats face the right/left seats.
    pub fn team(&self) -> Team {
        match self {
            Seat::Bottom | Seat::Top => Team::Team1,
            Seat::Right | Seat::Left => Team::Team2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Seat::Bottom => "You",
            Seat::Right => "East",
            Seat::Top => "North",
            Seat::Left => "West",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Team {
    Team1 = 0,
    Team2 = 1,
}

impl Team {
    pub fn name(&self) -> &'static str {
        match self {
            Team::Team1 => "Team 1",
            Team::Team2 => "Team 2",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Declaration {
    // No trump: tricks go to the highest card of the lead suit
    Sun,
    // The named suit outranks every other card
    Hukm(Suit),
}

impl Declaration {
    pub fn trump(&self) -> Option<Suit> {
        match self {
            Declaration::Sun => None,
            Declaration::Hukm(suit) => Some(*suit),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FollowSuitRule {
    // The original table rules: any card may be played at any time
    #[default]
    AnyCard,
    // Seats holding the lead suit must play it
    MustFollow,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TieBreak {
    #[default]
    Team1,
    Team2,
}

impl TieBreak {
    pub fn favored_team(&self) -> Team {
        match self {
            TieBreak::Team1 => Team::Team1,
            TieBreak::Team2 => Team::Team2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BalootError {
    #[error("it is not {0:?}'s turn")]
    TurnViolation(Seat),
    #[error("a declaration has already been made this round")]
    IllegalDeclaration,
    #[error("{seat:?} does not hold card {card_id}")]
    CardNotInHand { seat: Seat, card_id: i32 },
    #[error("{0:?} must follow the lead suit")]
    MustFollowSuit(Seat),
    #[error("cards cannot be played before a declaration is made")]
    DeclarationRequired,
    #[error("the round is over; request a new round first")]
    RoundOver,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
enum Location {
    #[default]
    Deck,
    Hand,
    Play,
    TricksTaken,
    Score,
    GameScore,
    ReorderHand,
    Message,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Hash, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChangeType {
    #[default]
    Deal,
    Play,
    TricksToWinner,
    Shuffle,
    Score,
    ShowPlayable,
    HidePlayable,
    OptionalPause,
    ShowWinningCard,
    Reorder,
    Message,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(rename(serialize = "type", deserialize = "type"))]
    pub change_type: ChangeType,
    object_id: i32,
    dest: Location,
    start_score: i32,
    end_score: i32,
    offset: usize,
    seat: Seat,
    length: usize,
    message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalootGame {
    // Current game state
    pub state: State,
    // Seat making a move now
    pub current_seat: Seat,
    // Seat that led the current trick
    pub lead_seat: Seat,
    // Cards each seat has played in the current trick
    pub current_trick: [Option<Card>; 4],
    // Cards in each seat's hand
    pub hands: [Vec<Card>; 4],
    // Sun/hukm declaration for the current round, fixed once accepted
    pub declaration: Option<Declaration>,
    // Card points each team has taken this round
    pub round_scores: [i32; 2],
    // Rounds each team has won this session
    pub game_scores: [i32; 2],
    // Current round number
    pub round: usize,
    // Human readable summary of the last resolved event
    pub status: String,
    // Whether off-suit plays are rejected while the seat could follow
    pub follow_suit: FollowSuitRule,
    // Which team takes a drawn round
    pub tie_break: TieBreak,
    // List of list of animations to run after a move is made to get from the current state to the next state
    pub changes: Vec<Vec<Change>>,
    // When running simulations we save time by not creating vecs and structs to be added to the change animation list
    pub no_changes: bool,
}

impl BalootGame {
    pub fn new() -> Self {
        let mut game = Self {
            no_changes: false,
            ..Default::default()
        };
        game.deal();
        game
    }

    pub fn new_with_rules(follow_suit: FollowSuitRule, tie_break: TieBreak) -> Self {
        let mut game = Self {
            follow_suit,
            tie_break,
            ..Default::default()
        };
        game.deal();
        game
    }

    // Called at the start of a game and whenever a new round is dealt
    pub fn deal(&mut self) {
        self.state = State::Declaring;
        self.round += 1;
        self.hands = [vec![], vec![], vec![], vec![]];
        self.current_trick = [None; 4];
        self.declaration = None;
        self.round_scores = [0, 0];
        self.current_seat = Seat::Bottom;
        self.lead_seat = Seat::Bottom;
        let mut cards = deck();
        cards.shuffle(&mut thread_rng());
        let shuffle_index = self.new_change();
        let deal_index = self.new_change();
        self.add_change(
            shuffle_index,
            Change {
                change_type: ChangeType::Shuffle,
                object_id: 0,
                dest: Location::Deck,
                ..Default::default()
            },
        );
        for seat in all::<Seat>() {
            for hand_index in 0..HAND_SIZE {
                let card = cards.pop().expect("the deck should have enough cards");
                self.add_change(
                    deal_index,
                    Change {
                        change_type: ChangeType::Deal,
                        object_id: card.id,
                        dest: Location::Hand,
                        seat,
                        offset: hand_index,
                        length: HAND_SIZE,
                        ..Default::default()
                    },
                );
                self.hands[seat as usize].push(card);
            }
        }
        assert!(cards.is_empty(), "deck should be all dealt");
        self.hands[Seat::Bottom as usize].sort_by(human_card_sorter);
        self.reorder_hand(Seat::Bottom, true);
        debug!(round = self.round, "new round dealt");
        let message_index = self.new_change();
        self.set_status(message_index, "Cards dealt, waiting for a declaration".to_string());
    }

    /// Fix the round's declaration. Exactly one declaration is accepted per
    /// round; the bottom seat then leads the first trick.
    pub fn declare(&mut self, declaration: Declaration) -> Result<(), BalootError> {
        if self.state != State::Declaring {
            return Err(BalootError::IllegalDeclaration);
        }
        self.begin_changes();
        self.declaration = Some(declaration);
        self.state = State::Play;
        self.current_seat = Seat::Bottom;
        self.lead_seat = Seat::Bottom;
        info!(?declaration, round = self.round, "declaration accepted");
        let message_index = self.new_change();
        let message = match declaration {
            Declaration::Sun => "Sun declared".to_string(),
            Declaration::Hukm(suit) => format!("Hukm declared: {}", suit.glyph()),
        };
        self.set_status(message_index, message);
        self.show_playable();
        Ok(())
    }

    /// Play a card from a seat's hand into the current trick. The fourth
    /// card resolves the trick in the same call. A rejected play leaves
    /// every piece of state exactly as it was.
    pub fn play(&mut self, seat: Seat, card_id: i32) -> Result<(), BalootError> {
        match self.state {
            State::Declaring => return Err(BalootError::DeclarationRequired),
            State::RoundOver => return Err(BalootError::RoundOver),
            State::Play => {}
        }
        if seat != self.current_seat {
            return Err(BalootError::TurnViolation(seat));
        }
        let pos = match self.hands[seat as usize].iter().position(|c| c.id == card_id) {
            Some(pos) => pos,
            None => return Err(BalootError::CardNotInHand { seat, card_id }),
        };
        if !self.playable_card_ids().contains(&card_id) {
            return Err(BalootError::MustFollowSuit(seat));
        }
        self.begin_changes();
        let card = self.hands[seat as usize].remove(pos);
        if self.current_trick.iter().all(|c| c.is_none()) {
            self.lead_seat = seat;
        }
        debug!(seat = seat.name(), card = %card, "card played");
        self.add_change(
            0,
            Change {
                change_type: ChangeType::Play,
                object_id: card.id,
                dest: Location::Play,
                seat,
                ..Default::default()
            },
        );
        self.reorder_hand(seat, false);
        self.current_trick[seat as usize] = Some(card);
        self.current_seat = seat.next();
        self.hide_playable();
        if self.current_trick.iter().flatten().count() == 4 {
            self.resolve_trick();
        }
        self.show_playable();
        Ok(())
    }

    /// Deal the next round. Game scores persist; anything left of the
    /// current round is discarded.
    pub fn request_new_round(&mut self) {
        self.begin_changes();
        self.deal();
        self.show_playable();
    }

    fn resolve_trick(&mut self) {
        let winner = self.trick_winner();
        let winning_card = self.current_trick[winner as usize].expect("there has to be a winning card");
        let trick_points: i32 = self.current_trick.iter().flatten().map(|c| c.points()).sum();
        let team = winner.team();

        let index = self.new_change();
        self.add_change(
            index,
            Change {
                change_type: ChangeType::ShowWinningCard,
                object_id: winning_card.id,
                dest: Location::Play,
                ..Default::default()
            },
        );
        self.add_change(
            index,
            Change {
                change_type: ChangeType::OptionalPause,
                object_id: 0,
                dest: Location::Play,
                ..Default::default()
            },
        );
        self.add_change(
            index,
            Change {
                change_type: ChangeType::Score,
                object_id: team as i32,
                dest: Location::Score,
                seat: winner,
                start_score: self.round_scores[team as usize],
                end_score: self.round_scores[team as usize] + trick_points,
                ..Default::default()
            },
        );
        self.round_scores[team as usize] += trick_points;

        // Animate trick to winner
        let change_index = self.new_change();
        for card in self.current_trick {
            self.add_change(
                change_index,
                Change {
                    change_type: ChangeType::TricksToWinner,
                    object_id: card.expect("resolved tricks have four cards").id,
                    dest: Location::TricksTaken,
                    seat: winner,
                    ..Default::default()
                },
            );
        }
        self.current_trick = [None; 4];
        // Winner of the trick leads the next one
        self.lead_seat = winner;
        self.current_seat = winner;
        debug!(winner = winner.name(), points = trick_points, "trick resolved");
        let message_index = self.new_change();
        self.set_status(message_index, format!("{} won the trick", winner.name()));

        if self.hands.iter().all(|hand| hand.is_empty()) {
            self.finish_round();
        }
    }

    fn finish_round(&mut self) {
        let winner = self.round_winner();
        let index = self.new_change();
        self.add_change(
            index,
            Change {
                change_type: ChangeType::Score,
                object_id: winner as i32,
                dest: Location::GameScore,
                start_score: self.game_scores[winner as usize],
                end_score: self.game_scores[winner as usize] + 1,
                ..Default::default()
            },
        );
        self.game_scores[winner as usize] += 1;
        self.state = State::RoundOver;
        info!(
            round = self.round,
            team = winner.name(),
            team1_points = self.round_scores[0],
            team2_points = self.round_scores[1],
            "round finished"
        );
        let message_index = self.new_change();
        self.set_status(message_index, format!("{} won the round", winner.name()));
    }

    /// Team with strictly more card points takes the round; a drawn round
    /// goes to the configured side.
    pub fn round_winner(&self) -> Team {
        if self.round_scores[Team::Team1 as usize] > self.round_scores[Team::Team2 as usize] {
            Team::Team1
        } else if self.round_scores[Team::Team2 as usize] > self.round_scores[Team::Team1 as usize]
        {
            Team::Team2
        } else {
            self.tie_break.favored_team()
        }
    }

    pub fn trump(&self) -> Option<Suit> {
        self.declaration.and_then(|declaration| declaration.trump())
    }

    pub fn trick_winner(&self) -> Seat {
        let lead_suit = self.current_trick[self.lead_seat as usize]
            .expect("the lead seat should have played a card")
            .suit;
        let mut card_id_to_seat: HashMap<i32, Seat> = HashMap::new();
        for seat in all::<Seat>() {
            if let Some(card) = self.current_trick[seat as usize] {
                card_id_to_seat.insert(card.id, seat);
            }
        }
        let mut cards: Vec<Card> = self.current_trick.iter().filter_map(|&c| c).collect();
        cards.sort_by_key(|c| std::cmp::Reverse(self.winning_value(lead_suit, c)));
        *card_id_to_seat
            .get(&cards.first().expect("there should be a winning card").id)
            .expect("card_id_to_seat missing card")
    }

    /// Trump beats the lead suit beats everything else; rank strength only
    /// separates cards within the same tier.
    pub fn winning_value(&self, lead_suit: Suit, card: &Card) -> i32 {
        let mut bonus: i32 = 0;
        if card.suit == lead_suit {
            bonus += 100;
        }
        if self.trump() == Some(card.suit) {
            bonus += 200;
        }
        card.rank.strength() + bonus
    }

    /// Ordering of two cards competing in the same trick. Two off-suit,
    /// non-trump cards of equal rank compare equal; neither can win the
    /// trick, so resolution never depends on their relative order.
    pub fn compare_cards(&self, a: &Card, b: &Card, lead_suit: Suit) -> Ordering {
        self.winning_value(lead_suit, a)
            .cmp(&self.winning_value(lead_suit, b))
    }

    pub fn get_moves(&self) -> Vec<i32> {
        match self.state {
            State::Declaring => {
                let mut moves = vec![SUN_DECLARATION];
                moves.extend(all::<Suit>().map(|suit| HUKM_DECLARATION_OFFSET + suit as i32));
                moves
            }
            State::Play => self.playable_card_ids(),
            State::RoundOver => vec![NEW_ROUND],
        }
    }

    pub fn playable_card_ids(&self) -> Vec<i32> {
        let hand = &self.hands[self.current_seat as usize];
        if self.follow_suit == FollowSuitRule::MustFollow {
            if let Some(lead_card) = self.current_trick[self.lead_seat as usize] {
                let following: Vec<i32> = hand
                    .iter()
                    .filter(|c| c.suit == lead_card.suit)
                    .map(|c| c.id)
                    .collect();
                if !following.is_empty() {
                    return following;
                }
            }
        }
        return hand.iter().map(|c| c.id).collect();
    }

    pub fn apply_move(&mut self, action: i32) {
        self.changes = vec![vec![]]; // card from player to table
        if !self.get_moves().contains(&action) {
            // leave the game untouched when an invalid move comes in
            return;
        }
        let result = match self.state {
            State::Declaring => {
                let declaration = declaration_for_action(action)
                    .expect("declaration actions were just validated");
                self.declare(declaration)
            }
            State::Play => self.play(self.current_seat, action),
            State::RoundOver => {
                self.request_new_round();
                Ok(())
            }
        };
        if let Err(error) = result {
            debug!(%error, "move rejected");
        }
    }

    #[inline]
    fn begin_changes(&mut self) {
        self.changes = vec![vec![]];
    }

    #[inline]
    fn new_change(&mut self) -> usize {
        self.changes.push(vec![]);
        self.changes.len() - 1
    }

    #[inline]
    fn add_change(&mut self, index: usize, change: Change) {
        if self.no_changes {
            return;
        }
        self.changes[index].push(change);
    }

    #[inline]
    fn reorder_hand(&mut self, seat: Seat, force_new_animation: bool) {
        if self.no_changes {
            return;
        }
        if self.changes.is_empty() || force_new_animation {
            self.new_change();
        }
        let length = self.hands[seat as usize].len();
        let index = self.changes.len() - 1;
        self.changes[index].extend(self.hands[seat as usize].iter().enumerate().map(
            |(offset, card)| Change {
                change_type: ChangeType::Reorder,
                dest: Location::ReorderHand,
                object_id: card.id,
                seat,
                offset,
                length,
                ..Default::default()
            },
        ));
    }

    fn set_status(&mut self, index: usize, message: String) {
        self.status = message.clone();
        self.add_change(
            index,
            Change {
                change_type: ChangeType::Message,
                message: Some(message),
                object_id: -1,
                dest: Location::Message,
                ..Default::default()
            },
        );
    }

    fn show_playable(&mut self) {
        if self.changes.is_empty() {
            self.changes = vec![vec![]];
        }
        let change_index = self.new_change();
        if self.state == State::Play && self.current_seat == Seat::Bottom {
            let moves = self.get_moves();
            for id in moves {
                self.add_change(
                    change_index,
                    Change {
                        object_id: id,
                        change_type: ChangeType::ShowPlayable,
                        dest: Location::Hand,
                        seat: self.current_seat,
                        ..Default::default()
                    },
                );
            }
        } else {
            self.hide_playable();
        }
    }

    fn hide_playable(&mut self) {
        if self.changes.is_empty() {
            self.changes = vec![vec![]];
        }
        let change_index = self.changes.len() - 1;
        let cards = self.hands[Seat::Bottom as usize].clone();
        for card in cards {
            self.add_change(
                change_index,
                Change {
                    object_id: card.id,
                    change_type: ChangeType::HidePlayable,
                    dest: Location::Hand,
                    seat: self.current_seat,
                    ..Default::default()
                },
            );
        }
    }
}

pub fn declaration_for_action(action: i32) -> Option<Declaration> {
    if action == SUN_DECLARATION {
        return Some(Declaration::Sun);
    }
    all::<Suit>()
        .find(|suit| HUKM_DECLARATION_OFFSET + *suit as i32 == action)
        .map(Declaration::Hukm)
}
