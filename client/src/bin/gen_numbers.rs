//! Number-set generator for the lottery betting surface.
//!
//! Usage: cargo run --bin gen-numbers -- gate 5
//!
//! Prints the same sets the betting UI offers: nineteen-gates, front/back
//! sweeps, two-digit filters, and any-order permutations.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use huay_types::lottery::generate;

#[derive(Parser, Debug)]
#[command(name = "gen-numbers")]
#[command(about = "Print lottery number sets")]
struct Args {
    #[command(subcommand)]
    set: Set,
}

#[derive(Subcommand, Debug)]
enum Set {
    /// All 19 two-digit numbers containing a digit
    Gate { digit: String },
    /// The ten two-digit numbers starting with a digit
    Front { digit: String },
    /// The ten two-digit numbers ending with a digit
    Back { digit: String },
    /// Two-digit numbers 00-49
    Low,
    /// Two-digit numbers 50-99
    High,
    /// Even two-digit numbers
    Even,
    /// Odd two-digit numbers
    Odd,
    /// The ten doubles 00, 11, .. 99
    Doubles,
    /// Distinct orderings of a three-digit number
    Perm3 { number: String },
    /// Distinct orderings of a four-digit number
    Perm4 { number: String },
    /// All numbers of a given length (1 to 4 digits)
    Grid { digits: usize },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("gen-numbers failed: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let numbers = match args.set {
        Set::Gate { digit } => generate::nineteen_gate(&digit),
        Set::Front { digit } => generate::sweep_front(&digit),
        Set::Back { digit } => generate::sweep_back(&digit),
        Set::Low => generate::two_digit_low(),
        Set::High => generate::two_digit_high(),
        Set::Even => generate::two_digit_even(),
        Set::Odd => generate::two_digit_odd(),
        Set::Doubles => generate::two_digit_doubles(),
        Set::Perm3 { number } => generate::permutations_three(&number),
        Set::Perm4 { number } => generate::permutations_four(&number),
        Set::Grid { digits } => generate::number_grid(digits),
    };
    if numbers.is_empty() {
        bail!("no numbers for that input");
    }
    println!("{} numbers:", numbers.len());
    println!("{}", numbers.join(" "));
    Ok(())
}
