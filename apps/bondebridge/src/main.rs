//! BondeBridge CLI: print round schedules, standings and statistics.

use std::process::ExitCode;

use bondebridge::api::dto::StatsQuery;
use bondebridge::domain::player_view::{standings_table, BidMargin};
use bondebridge::domain::rules::largest_round_size;
use bondebridge::domain::schedule::generate_rounds;
use bondebridge::domain::state::GamePlayerId;
use bondebridge::{ApiConfig, AppError, BondeApi, GameConfig, HttpBondeApi};
use clap::{Parser, Subcommand};
use time::macros::format_description;
use time::Date;
use tracing::{error, info};

mod telemetry;

use telemetry::LogFormat;

#[derive(Parser)]
#[command(name = "bondebridge")]
#[command(about = "BondeBridge scoring engine")]
struct Args {
    /// Log output on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Json, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the round schedule for a table
    Schedule {
        /// Number of players at the table
        #[arg(short, long)]
        players: usize,

        /// Seat dealing the first round
        #[arg(long, default_value = "0")]
        starting_dealer: usize,

        /// Rounds per phase at the largest hand size (more than four players)
        #[arg(long, default_value = "3")]
        largest_repeats: u8,

        /// Rounds per phase at the second-largest hand size (more than four players)
        #[arg(long, default_value = "2")]
        second_largest_repeats: u8,
    },
    /// Fetch a game and print standings and prizes
    Standings {
        #[arg(long)]
        game_id: i64,

        /// Show scores truncated at the game's midpoint
        #[arg(long)]
        halfway: bool,
    },
    /// Fetch aggregate statistics
    Stats {
        /// Comma-separated user ids
        #[arg(long, value_delimiter = ',')]
        player_ids: Vec<i64>,

        /// Only games with exactly the selected players
        #[arg(long)]
        exclusive: bool,

        #[arg(long)]
        only_favorite: bool,

        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        from: Option<Date>,

        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        to: Option<Date>,
    },
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init_tracing(args.log_format);

    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(code = %err.code(), error = %err, "command failed");
            eprintln!("❌ {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Cmd) -> Result<(), AppError> {
    match command {
        Cmd::Schedule {
            players,
            starting_dealer,
            largest_repeats,
            second_largest_repeats,
        } => {
            let config = GameConfig {
                largest_repeats,
                second_largest_repeats,
                ..GameConfig::default()
            };
            print_schedule(players, &config, starting_dealer)
        }
        Cmd::Standings { game_id, halfway } => {
            let api = HttpBondeApi::new(&ApiConfig::from_env()?)?;
            print_standings(&api, game_id, halfway).await
        }
        Cmd::Stats {
            player_ids,
            exclusive,
            only_favorite,
            from,
            to,
        } => {
            let api = HttpBondeApi::new(&ApiConfig::from_env()?)?;
            let query = StatsQuery {
                player_ids,
                exclusive_select: exclusive,
                only_favorite,
                from_date: from,
                to_date: to,
            };
            print_stats(&api, &query).await
        }
    }
}

fn print_schedule(
    players: usize,
    config: &GameConfig,
    starting_dealer: usize,
) -> Result<(), AppError> {
    let ids: Vec<GamePlayerId> = (1..=players as i64).map(GamePlayerId).collect();
    let rounds = generate_rounds(&config.schedule(starting_dealer), &ids)?;
    info!(players, rounds = rounds.len(), "schedule generated");

    println!(
        "{players} players, largest hand {} cards, {} rounds",
        largest_round_size(players).unwrap_or(0),
        rounds.len()
    );
    for (i, round) in rounds.iter().enumerate() {
        println!(
            "round {:>3}  cards {:>2}  dealer seat {}",
            i + 1,
            round.num_cards,
            round.dealer_index
        );
    }
    Ok(())
}

async fn print_standings(
    api: &dyn BondeApi,
    game_id: i64,
    halfway: bool,
) -> Result<(), AppError> {
    let session = api.get_game(game_id).await?.into_session()?;
    let round = session.current_round();
    println!(
        "game {game_id}: round {}/{} ({} cards, bids {}), {:?}",
        session.current_round_index() + 1,
        session.rounds().len(),
        round.num_cards,
        BidMargin::of(round),
        session.status()
    );

    for row in standings_table(&session, halfway) {
        let earnings = row.earnings.map(|e| format!("{e:+}")).unwrap_or_default();
        let shown = if halfway { row.halfway_score } else { row.score };
        println!(
            "{:>2}. {:<3} {:<16} {:>5}  streak {:>2}  warnings {}  bleedings {}  {}",
            row.place + 1,
            row.initials,
            row.nickname,
            shown,
            row.consecutive_stands,
            row.warnings,
            row.bleedings,
            earnings
        );
    }

    if let Some(prizes) = session.prizes() {
        println!("{} pays {} to {}", prizes.loser, prizes.winner_prize, prizes.winner);
        if let (Some(second), Some(second_loser), Some(amount)) =
            (&prizes.second, &prizes.second_loser, prizes.second_prize)
        {
            println!("{second_loser} pays {amount} to {second}");
        }
    }
    Ok(())
}

async fn print_stats(api: &dyn BondeApi, query: &StatsQuery) -> Result<(), AppError> {
    let Some(stats) = api.stats(query).await? else {
        println!("no statistics for this selection");
        return Ok(());
    };
    println!(
        "underbid {:.1}%  average bid difference {:+.1}",
        stats.perc_underbid, stats.total_avg_diff
    );
    for (nickname, earnings) in &stats.player_earnings {
        println!(
            "{nickname:<16} games {:>3}  total {:>8.1}  average {:>6.1}",
            earnings.num_games, earnings.total_earnings, earnings.avg_earnings
        );
    }
    Ok(())
}
