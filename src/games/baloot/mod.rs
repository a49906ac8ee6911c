pub mod cards;
pub mod game;
pub mod policy;

// Re-export the main types
pub use cards::{deck, Card, Rank, Suit};
pub use game::{
    BalootError, BalootGame, ChangeType, Declaration, FollowSuitRule, Seat, State, Team, TieBreak,
    HUKM_DECLARATION_OFFSET, NEW_ROUND, SUN_DECLARATION,
};
pub use policy::get_random_move;
