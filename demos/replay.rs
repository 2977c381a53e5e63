//! Replays an observed trace against a randomized adversary.
//!
//! Run with:
//! ```bash
//! cargo run --example replay -- demos/data/handshake.lts demos/data/handshake.trace --seed 7
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use reachgame::automaton::Automaton;
use reachgame::game::GameGraph;
use reachgame::io::load_trace;
use reachgame::rank::Ranks;
use reachgame::simulate::{Phase, SimulationConfig, Simulator};
use reachgame::strategy::Strategy;

#[derive(Debug, Parser)]
#[command(author, version, about = "Replay a trace on a reachability game")]
struct Cli {
    /// Automaton file
    automaton: PathBuf,

    /// Trace file, one label per line
    trace: PathBuf,

    /// Seed of the adversary
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Maximum number of attempts
    #[arg(long, default_value = "10000")]
    max_attempts: usize,

    /// Maximum number of moves per phase
    #[arg(long, default_value = "1000")]
    max_steps: usize,

    /// Wall-clock limit in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the game graph and ranks
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    let time_total = Instant::now();

    let automaton = Automaton::load(&args.automaton)?;
    let trace = load_trace(&args.trace)?;
    println!(
        "automaton: {} states, {} transitions; trace: {} labels",
        automaton.num_states(),
        automaton.num_transitions(),
        trace.len()
    );

    let graph = GameGraph::from_automaton(&automaton);
    if args.verbose {
        print!("{}", graph.debug_string());
    }

    if let Some(target) = automaton.target() {
        let target = graph.state_vertex(target);
        let ranks = Ranks::compute(&graph, target);
        if args.verbose {
            print!("{}", graph.debug_ranks(&ranks));
        }
        let strategy = Strategy::extract(&automaton, &graph, &ranks);
        print!("{}", strategy.debug_string(&automaton, &graph));
    }

    let simulator = Simulator::new(&automaton, &graph, &trace)?;
    println!("anchor: {}", automaton.name(simulator.anchor()));
    print!("{}", simulator.strategy_to_anchor().debug_string(&automaton, &graph));

    let mut config = SimulationConfig::default()
        .with_seed(args.seed)
        .with_max_attempts(args.max_attempts)
        .with_max_steps(args.max_steps);
    if let Some(secs) = args.timeout {
        config = config.with_deadline(Instant::now() + Duration::from_secs(secs));
    }

    let replay = simulator.run(&config)?;
    println!("succeeded on attempt {}: {:?}", replay.attempt, replay.stats);
    for phase in [Phase::Approach, Phase::Replay, Phase::Return] {
        let moves: Vec<String> = replay
            .phase_moves(phase)
            .map(|m| format!("{} -> {}", graph.vertex_name(m.from), graph.vertex_name(m.to)))
            .collect();
        println!("{:>8}: {}", phase.to_string(), moves.join(", "));
    }

    println!("Total time: {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
