#![warn(clippy::pedantic)]

use clap::{ArgGroup, Parser, error::ErrorKind};
use env_logger::TimestampPrecision;
use log::{LevelFilter, info};
use std::process::ExitCode;
use twophase::{
    CubieCube, FaceletCube, Solver, SolverConfig, Tables, parse_cube, parse_moves,
};

/// Solves a 3x3x3 cube with Kociemba's two-phase algorithm
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("cube").required(true).args(["facelets", "scramble", "random"])))]
struct Cli {
    /// The 54 facelets of the cube in URFDLB face order, e.g.
    /// UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB for the solved cube.
    facelets: Option<String>,

    /// Solve the cube reached by this move sequence, e.g. "R U' F2".
    #[arg(long)]
    scramble: Option<String>,

    /// Solve a uniformly random cube.
    #[arg(long)]
    random: bool,

    /// The seed of the random cube.
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Never return a solution longer than this.
    #[arg(short, long, default_value_t = twophase::GODS_NUMBER)]
    max_length: usize,

    /// Keep searching until a solution at most this long is found. Defaults
    /// to the maximum length.
    #[arg(short, long)]
    target_length: Option<usize>,

    /// The longest phase 2 search.
    #[arg(long, default_value_t = 10)]
    max_phase2_length: usize,

    /// Print a `.` between the two phases of the solution.
    #[arg(short, long)]
    separator: bool,

    /// The number of search threads. Defaults to the number of CPUs.
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn cube(&self) -> color_eyre::Result<CubieCube> {
        if let Some(facelets) = &self.facelets {
            return Ok(parse_cube(facelets)?);
        }
        let cube = if let Some(scramble) = &self.scramble {
            CubieCube::from_moves(&parse_moves(scramble)?)
        } else {
            let mut rng = self
                .seed
                .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
            CubieCube::random(&mut rng)
        };
        info!("Solving {}", FaceletCube::from(&cube));
        Ok(cube)
    }

    fn solver_config(&self) -> SolverConfig {
        let config = SolverConfig::default()
            .with_max_length(self.max_length)
            .with_max_phase2_length(self.max_phase2_length);
        match self.target_length {
            Some(target_length) => config.with_target_length(target_length),
            None => config,
        }
    }
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            err.print()?;
            return Ok(ExitCode::FAILURE);
        }
    };

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let cube = cli.cube()?;
    let tables = Tables::generate()?;
    let solution = Solver::new(&tables, cli.solver_config()).solve(&cube)?;
    if cli.separator {
        println!("{solution:#}");
    } else {
        println!("{solution}");
    }
    Ok(ExitCode::SUCCESS)
}
