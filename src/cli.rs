mod discord;
mod estimate;
mod snapshot;
mod zappi;

use clap::{Parser, Subcommand};

pub use self::{
    discord::DiscordArgs,
    estimate::{EstimateArgs, estimate},
    zappi::{BoostArgs, GuardArgs, StatusArgs, StopArgs, boost, guard, status, stop},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub discord: DiscordArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: ask for the battery state, estimate the top-up, and boost the charger by that much.
    #[clap(name = "estimate")]
    Estimate(Box<EstimateArgs>),

    /// Boost by the given energy, or by the last estimate.
    #[clap(name = "boost")]
    Boost(Box<BoostArgs>),

    /// Show the charger status.
    #[clap(name = "status")]
    Status(Box<StatusArgs>),

    /// Stop charging.
    #[clap(name = "stop")]
    Stop(Box<StopArgs>),

    /// Stop charging once the charger has delivered the estimated energy.
    #[clap(name = "guard")]
    Guard(Box<GuardArgs>),
}
