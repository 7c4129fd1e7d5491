extern crate clap;
#[macro_use]
extern crate log;
extern crate mandeltile;
extern crate num_cpus;
extern crate simplelog;

use clap::{App, Arg, ArgMatches};
use mandeltile::{Config, Explorer, FrameSize, Grid, PnmPresenter, ScriptedEvents};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::str::FromStr;

const MAX_ITERATIONS: usize = 200_000;

// "WIDTHxHEIGHT" or "COLUMNSxROWS".
fn parse_dimensions(s: &str) -> Option<(usize, usize)> {
    let mut parts = s.splitn(2, 'x');
    match (parts.next()?.parse(), parts.next()?.parse()) {
        (Ok(first), Ok(second)) => Some((first, second)),
        _ => None,
    }
}

fn parse_grid(s: &str) -> Option<Grid> {
    if s == "auto" {
        return Some(Grid::fit(num_cpus::get()));
    }
    match parse_dimensions(s) {
        Some((cols, rows)) if cols > 0 && rows > 0 => Some(Grid { rows, cols }),
        _ => None,
    }
}

fn validate_iterations(s: String) -> Result<(), String> {
    match usize::from_str(&s) {
        Ok(n) if n >= 1 && n <= MAX_ITERATIONS => Ok(()),
        Ok(_) => Err(format!(
            "Iteration count must be between 1 and {}",
            MAX_ITERATIONS
        )),
        Err(_) => Err("Could not parse iteration count".to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const GRID: &str = "grid";
const ITERATIONS: &str = "iterations";
const KEYS: &str = "keys";
const VERBOSE: &str = "verbose";
const QUIET: &str = "quiet";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandeltile")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Tile-parallel Mandelbrot explorer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("PPM file each new frame is written to"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("600x400")
                .validator(|s| match parse_dimensions(&s) {
                    Some(_) => Ok(()),
                    None => Err("Frame size must be WIDTHxHEIGHT".to_string()),
                })
                .help("Frame size, WIDTHxHEIGHT"),
        )
        .arg(
            Arg::with_name(GRID)
                .required(false)
                .long(GRID)
                .short("g")
                .takes_value(true)
                .default_value("5x4")
                .validator(|s| match parse_grid(&s) {
                    Some(_) => Ok(()),
                    None => Err("Grid must be COLUMNSxROWS or 'auto'".to_string()),
                })
                .help("Tile grid, COLUMNSxROWS, or 'auto' for one tile per CPU"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(validate_iterations)
                .help("Escape iteration cap and palette length"),
        )
        .arg(
            Arg::with_name(KEYS)
                .required(false)
                .long(KEYS)
                .short("k")
                .takes_value(true)
                .help("Keys to replay, one per frame: '=' zoom in, '-' zoom out, wasd pan, space quits"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .multiple(true)
                .help("More logging; repeat for more"),
        )
        .arg(
            Arg::with_name(QUIET)
                .long(QUIET)
                .short("q")
                .conflicts_with(VERBOSE)
                .help("Only log warnings and errors"),
        )
        .get_matches()
}

fn level(matches: &ArgMatches) -> LevelFilter {
    if matches.is_present(QUIET) {
        return LevelFilter::Warn;
    }
    match matches.occurrences_of(VERBOSE) {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let matches = args();
    if let Err(e) = TermLogger::init(
        level(&matches),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not start logging: {}", e);
    }

    let size = parse_dimensions(matches.value_of(SIZE).unwrap()).expect("Error parsing frame size");
    let grid = parse_grid(matches.value_of(GRID).unwrap()).expect("Error parsing tile grid");
    let max_iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Could not parse iteration count.");
    let config = Config {
        size: FrameSize::new(size.0, size.1),
        grid,
        max_iterations,
        ..Config::default()
    };

    let mut explorer = match Explorer::new(&config) {
        Ok(explorer) => explorer,
        Err(e) => {
            eprintln!("Setup failure: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "{} tiles on {} CPUs",
        explorer.context().tiles().len(),
        num_cpus::get()
    );

    let mut events = ScriptedEvents::from_keys(matches.value_of(KEYS).unwrap_or(""));
    let mut presenter = PnmPresenter::new(matches.value_of(OUTPUT).unwrap());
    let result = explorer.run(&mut events, &mut presenter);
    explorer.shutdown();

    match result {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(view) => println!("{}", view),
    }
}
