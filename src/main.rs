#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod input;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, boost, estimate, guard, status, stop},
    input::Terminal,
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();

    match args.command {
        Command::Estimate(estimate_args) => {
            estimate(&estimate_args, &mut Terminal::stdio(), &args.discord)?;
        }
        Command::Boost(boost_args) => {
            boost(&boost_args, &args.discord)?;
        }
        Command::Status(status_args) => {
            status(&status_args, &args.discord)?;
        }
        Command::Stop(stop_args) => {
            stop(&stop_args, &args.discord)?;
        }
        Command::Guard(guard_args) => {
            guard(&guard_args, &args.discord)?;
        }
    }

    info!("done!");
    Ok(())
}
