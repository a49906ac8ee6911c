use std::io;
use std::time::Instant;

use baloot_rs::games::baloot::{
    get_random_move, BalootGame, Card, Declaration, FollowSuitRule, Seat, State, Suit, TieBreak,
};
use clap::Parser;
use colored::Colorize;
use tracing::info;

#[derive(Parser)]
#[command(name = "baloot")]
#[command(about = "Baloot engine driver: random simulations and interactive play")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Round wins a team needs to take the game (the engine itself has no
    /// threshold; ending the game is this driver's policy)
    #[arg(short, long, default_value = "3")]
    target: i32,

    /// Enforce follow-suit legality instead of the permissive table rules
    #[arg(long)]
    strict: bool,

    /// Play the bottom seat yourself
    #[arg(short, long)]
    interactive: bool,

    /// Dump each finished game's state as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let follow_suit = if args.strict {
        FollowSuitRule::MustFollow
    } else {
        FollowSuitRule::AnyCard
    };

    if args.interactive {
        interactive_play(follow_suit, args.target);
    } else {
        simulate(&args, follow_suit);
    }
}

fn simulate(args: &Args, follow_suit: FollowSuitRule) {
    let mut team_wins = [0u32; 2];
    let start = Instant::now();
    for game_num in 1..=args.games {
        let mut game = BalootGame::new_with_rules(follow_suit, TieBreak::Team1);
        game.no_changes = true;
        while game.game_scores.iter().all(|&rounds| rounds < args.target) {
            game.apply_move(get_random_move(&game));
        }
        team_wins[if game.game_scores[0] >= args.target { 0 } else { 1 }] += 1;
        info!(game_num, rounds_won = ?game.game_scores, "game finished");
        if args.json {
            println!(
                "{}",
                serde_json::to_string(&game).expect("game state should serialize")
            );
        }
    }
    let elapsed = start.elapsed();

    println!("=== Simulation Summary ===");
    println!("Games completed: {}", args.games);
    println!("Team 1 wins: {}", team_wins[0]);
    println!("Team 2 wins: {}", team_wins[1]);
    println!("Total time: {:?}", elapsed);
}

pub fn get_input(prompt: &str) -> String {
    println!("{}", prompt);
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(_goes_into_input_above) => {}
        Err(_no_updates_is_fine) => {}
    }
    input.trim().to_string()
}

fn print_card(card: Card) -> String {
    let string = format!("{}{}", card.rank.label(), card.suit.glyph());
    let colored_string = match card.suit {
        Suit::Hearts | Suit::Diamonds => string.red(),
        Suit::Clubs | Suit::Spades => string.normal(),
    };
    return format!("{}:{}", card.id, colored_string);
}

fn display_game(game: &BalootGame) {
    println!(
        "\nround {} | round points {:?} | rounds won {:?}",
        game.round, game.round_scores, game.game_scores
    );
    println!("declaration: {:?}", game.declaration);
    println!("status: {}", game.status);
    println!(
        "current trick: {}",
        game.current_trick
            .iter()
            .flatten()
            .map(|c| print_card(*c))
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!(
        "your hand:\n{}",
        game.hands[Seat::Bottom as usize]
            .iter()
            .map(|c| print_card(*c))
            .collect::<Vec<_>>()
            .join(" ")
    );
}

fn interactive_play(follow_suit: FollowSuitRule, target: i32) {
    let mut game = BalootGame::new_with_rules(follow_suit, TieBreak::Team1);
    while game.game_scores.iter().all(|&rounds| rounds < target) {
        match game.state {
            State::Declaring => {
                display_game(&game);
                let choice = get_input("declare: s = sun, h/d/c/sp = hukm suit");
                let declaration = match choice.as_str() {
                    "s" => Some(Declaration::Sun),
                    "h" => Some(Declaration::Hukm(Suit::Hearts)),
                    "d" => Some(Declaration::Hukm(Suit::Diamonds)),
                    "c" => Some(Declaration::Hukm(Suit::Clubs)),
                    "sp" => Some(Declaration::Hukm(Suit::Spades)),
                    _ => None,
                };
                match declaration {
                    Some(declaration) => {
                        if let Err(error) = game.declare(declaration) {
                            println!("{}", error);
                        }
                    }
                    None => println!("unrecognized declaration"),
                }
            }
            State::Play => {
                if game.current_seat == Seat::Bottom {
                    display_game(&game);
                    match get_input("card id to play:").parse::<i32>() {
                        Ok(id) => {
                            if let Err(error) = game.play(Seat::Bottom, id) {
                                println!("{}", error);
                            }
                        }
                        Err(_) => println!("enter the number shown before the card"),
                    }
                } else {
                    game.apply_move(get_random_move(&game));
                    println!("{}", game.status);
                }
            }
            State::RoundOver => {
                display_game(&game);
                get_input("round over - press enter for the next deal");
                game.request_new_round();
            }
        }
    }
    println!("final rounds won: {:?}", game.game_scores);
}
