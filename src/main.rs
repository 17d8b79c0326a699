use std::io::{self, Write};
use std::time::{Duration, Instant};

use broadside::transport::{in_memory, tcp, PeerLink};
use broadside::{
    coord_label, init_logging, parse_coord, render_board, render_grid, Board, Coord, Difficulty,
    GameConfig, LocalGame, MatchEnd, RemoteEvent, RemoteGame, Seat, ShotReport, ShotResult,
    TurnError, TurnState,
};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about = "Turn-based naval combat with a hunt-and-destroy opponent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SeatArg {
    Human,
    Ai,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer in this terminal.
    Local {
        #[arg(long, value_enum, default_value_t = DifficultyArg::Hard)]
        difficulty: DifficultyArg,
        #[arg(long, default_value_t = 10)]
        grid: usize,
        #[arg(long, help = "Fix RNG seed for reproducible games")]
        seed: Option<u64>,
    },
    /// Two players passing one terminal back and forth.
    Hotseat {
        #[arg(long, default_value_t = 10)]
        grid: usize,
        #[arg(long, help = "Fix RNG seed for reproducible games")]
        seed: Option<u64>,
    },
    /// Host a networked game and wait for the other player.
    Host {
        #[arg(long, default_value = "0.0.0.0:5000")]
        bind: String,
        #[arg(long, value_enum, default_value_t = SeatArg::Human)]
        player: SeatArg,
        #[arg(long, value_enum, default_value_t = DifficultyArg::Hard)]
        difficulty: DifficultyArg,
        #[arg(long, default_value_t = 10)]
        grid: usize,
        #[arg(long, help = "Fix RNG seed for reproducible games")]
        seed: Option<u64>,
    },
    /// Join a hosted game.
    Join {
        #[arg(long, default_value = "127.0.0.1:5000")]
        connect: String,
        #[arg(long, value_enum, default_value_t = SeatArg::Human)]
        player: SeatArg,
        #[arg(long, value_enum, default_value_t = DifficultyArg::Hard)]
        difficulty: DifficultyArg,
        #[arg(long, default_value_t = 10)]
        grid: usize,
        #[arg(long, help = "Fix RNG seed for reproducible games")]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Local {
            difficulty,
            grid,
            seed,
        } => {
            check_grid(grid)?;
            run_local(difficulty.into(), grid, seed)
        }
        Commands::Hotseat { grid, seed } => {
            check_grid(grid)?;
            run_hotseat(grid, seed).await
        }
        Commands::Host {
            bind,
            player,
            difficulty,
            grid,
            seed,
        } => {
            check_grid(grid)?;
            let listener = tokio::net::TcpListener::bind(&bind).await?;
            println!(
                "Hosting on {}. Waiting for an opponent...",
                listener.local_addr()?
            );
            let (recv, send) = tcp::accept(&listener).await?;
            let link = PeerLink::spawn(recv, send);
            let seat = make_seat(player, difficulty.into(), seed);
            run_remote(link, true, seat, grid, seed).await
        }
        Commands::Join {
            connect,
            player,
            difficulty,
            grid,
            seed,
        } => {
            check_grid(grid)?;
            println!("Connecting to {}...", connect);
            let (recv, send) = tcp::connect(&connect).await?;
            let link = PeerLink::spawn(recv, send);
            let seat = make_seat(player, difficulty.into(), seed);
            run_remote(link, false, seat, grid, seed).await
        }
    }
}

fn check_grid(grid: usize) -> anyhow::Result<()> {
    anyhow::ensure!(
        (5..=16).contains(&grid),
        "grid size must be between 5 and 16"
    );
    Ok(())
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

fn make_seat(player: SeatArg, difficulty: Difficulty, seed: Option<u64>) -> Seat {
    match player {
        SeatArg::Human => Seat::Human,
        SeatArg::Ai => Seat::engine(difficulty, make_rng(seed.map(|s| s.wrapping_add(1)))),
    }
}

fn prompt(msg: &str) -> anyhow::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}

fn read_coord(msg: &str) -> anyhow::Result<Coord> {
    loop {
        let line = prompt(msg)?;
        match parse_coord(line.trim()) {
            Some(coord) => return Ok(coord),
            None => println!("Could not read that; try something like B4."),
        }
    }
}

fn report_line(actor: &str, report: &ShotReport) -> String {
    let outcome = match (report.result, report.sunk) {
        (ShotResult::Hit, Some(name)) => format!("hit, {} sunk!", name),
        (ShotResult::Hit, None) => "hit!".to_string(),
        (ShotResult::Miss, _) => "miss.".to_string(),
    };
    format!(
        "{} fires at {}: {}",
        actor,
        coord_label(report.coord),
        outcome
    )
}

fn announce(end: MatchEnd) {
    match end {
        MatchEnd::Won => println!("\nAll enemy ships destroyed. You win!"),
        MatchEnd::Lost => println!("\nYour fleet is gone. You lose."),
        MatchEnd::OpponentLeft => println!("\nOpponent left the game."),
    }
}

fn run_local(difficulty: Difficulty, grid: usize, seed: Option<u64>) -> anyhow::Result<()> {
    let config = GameConfig::for_grid(grid);
    let mut rng = make_rng(seed);

    let mut player_board = Board::new(grid);
    player_board
        .place_fleet_random(&mut rng, &config.fleet)
        .map_err(|e| anyhow::anyhow!(e))?;
    let mut enemy_board = Board::new(grid);
    enemy_board
        .place_fleet_random(&mut rng, &config.fleet)
        .map_err(|e| anyhow::anyhow!(e))?;

    let engine_rng = SmallRng::from_rng(&mut rng);
    let mut game = LocalGame::new(
        player_board,
        enemy_board,
        difficulty,
        config.think_delay_ms,
        engine_rng,
    );
    let clock = Instant::now();

    loop {
        println!(
            "\nEnemy waters:\n{}",
            render_grid(game.enemy_board().grid(), false)
        );
        println!("Your fleet:\n{}", render_board(game.player_board()));

        let coord = read_coord("Your shot (e.g. B4): ")?;
        let now_ms = clock.elapsed().as_millis() as u64;
        match game.fire(coord, now_ms) {
            Ok(report) => println!("{}", report_line("You", &report)),
            Err(TurnError::Board(err)) => {
                println!("{}", err);
                continue;
            }
            Err(err) => {
                println!("{}", err);
                continue;
            }
        }
        if let Some(end) = game.outcome() {
            announce(end);
            return Ok(());
        }

        loop {
            let now_ms = clock.elapsed().as_millis() as u64;
            let reports = game.tick(now_ms);
            for report in &reports {
                println!("{}", report_line("The enemy", report));
            }
            match game.turn() {
                TurnState::EnemyThinking { .. } => {
                    std::thread::sleep(Duration::from_millis(25));
                }
                _ => break,
            }
        }
        if let Some(end) = game.outcome() {
            announce(end);
            return Ok(());
        }
    }
}

fn print_remote_event(actor_you: &str, actor_peer: &str, event: &RemoteEvent) {
    match event {
        RemoteEvent::ShotResolved { coord, result } => {
            let outcome = if result.is_hit() { "hit!" } else { "miss." };
            println!("{} fires at {}: {}", actor_you, coord_label(*coord), outcome);
        }
        RemoteEvent::IncomingShot { coord, result } => {
            let outcome = if result.is_hit() { "hit!" } else { "miss." };
            println!(
                "{} fires at {}: {}",
                actor_peer,
                coord_label(*coord),
                outcome
            );
        }
        RemoteEvent::Ended(_) => {}
    }
}

async fn run_remote(
    link: PeerLink,
    first_turn: bool,
    seat: Seat,
    grid: usize,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let config = GameConfig::for_grid(grid);
    let mut rng = make_rng(seed);

    let mut board = Board::new(grid);
    board
        .place_fleet_random(&mut rng, &config.fleet)
        .map_err(|e| anyhow::anyhow!(e))?;
    println!("Your fleet:\n{}", render_board(&board));

    let human = matches!(seat, Seat::Human);
    let mut game = RemoteGame::new(board, config.total_fleet_cells(), seat, link, first_turn);

    loop {
        let events = game.tick();
        for event in &events {
            print_remote_event("You", "Opponent", event);
        }
        if let Some(end) = game.outcome() {
            announce(end);
            return Ok(());
        }
        if human && game.my_turn() && !game.awaiting_result() {
            println!("\nEnemy waters:\n{}", render_grid(game.attacks(), false));
            println!("Your fleet:\n{}", render_board(game.board()));
            let coord = read_coord("Your shot (e.g. B4): ")?;
            if let Err(err) = game.queue_shot(coord) {
                println!("{}", err);
            }
        } else {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }
}

async fn run_hotseat(grid: usize, seed: Option<u64>) -> anyhow::Result<()> {
    let config = GameConfig::for_grid(grid);
    let mut rng = make_rng(seed);

    let ((send_a, recv_a), (send_b, recv_b)) = in_memory::pair();
    let link1 = PeerLink::spawn(recv_a, send_a);
    let link2 = PeerLink::spawn(recv_b, send_b);

    let mut board1 = Board::new(grid);
    board1
        .place_fleet_random(&mut rng, &config.fleet)
        .map_err(|e| anyhow::anyhow!(e))?;
    let mut board2 = Board::new(grid);
    board2
        .place_fleet_random(&mut rng, &config.fleet)
        .map_err(|e| anyhow::anyhow!(e))?;

    let total = config.total_fleet_cells();
    let mut game1 = RemoteGame::new(board1, total, Seat::Human, link1, true);
    let mut game2 = RemoteGame::new(board2, total, Seat::Human, link2, false);

    println!("Player 1 fires first. No peeking at the other fleet!");
    loop {
        for event in game1.tick() {
            print_remote_event("Player 1", "Player 2", &event);
        }
        for event in game2.tick() {
            print_remote_event("Player 2", "Player 1", &event);
        }
        match (game1.outcome(), game2.outcome()) {
            (Some(MatchEnd::Won), _) => {
                println!("\nPlayer 1 wins!");
                return Ok(());
            }
            (_, Some(MatchEnd::Won)) => {
                println!("\nPlayer 2 wins!");
                return Ok(());
            }
            _ => {}
        }
        if game1.my_turn() && !game1.awaiting_result() {
            println!(
                "\nPlayer 1, enemy waters:\n{}",
                render_grid(game1.attacks(), false)
            );
            let coord = read_coord("Player 1, your shot: ")?;
            if let Err(err) = game1.queue_shot(coord) {
                println!("{}", err);
            }
        } else if game2.my_turn() && !game2.awaiting_result() {
            println!(
                "\nPlayer 2, enemy waters:\n{}",
                render_grid(game2.attacks(), false)
            );
            let coord = read_coord("Player 2, your shot: ")?;
            if let Err(err) = game2.queue_shot(coord) {
                println!("{}", err);
            }
        } else {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
