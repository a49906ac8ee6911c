/*
Card selection for the three non-human seats.

Picks uniformly at random among the legal moves. This is a stand-in
decision procedure, not a competitive player: it has no notion of
strategy, points, or partners.
*/

use rand::{seq::SliceRandom, thread_rng};

use super::game::BalootGame;

pub fn get_random_move(game: &BalootGame) -> i32 {
    let mut actions = game.get_moves();
    actions.shuffle(&mut thread_rng());
    *actions.first().expect("should have a move to make")
}
