extern crate clap;

use clap::Parser;
use sweep_decoder::cli::Cli;

fn main() {
    Cli::parse().run();
}
