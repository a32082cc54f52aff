use chrono::NaiveTime;
use clap::Parser;

use crate::{
    api::zappi::Endpoint,
    cli::{
        discord::DiscordArgs,
        snapshot::SnapshotArgs,
        zappi::{ZappiArgs, parse_ready_by},
    },
    core::{estimator::ChargeRequest, snapshot::Snapshot},
    input::InputProvider,
    prelude::*,
    quantity::{energy::KilowattHours, percent::Percent, rate::KilowattHourRate},
    tables::build_estimate_table,
};

#[derive(Parser)]
pub struct EstimateArgs {
    /// Current battery state of charge. When omitted, the battery figures are prompted for.
    #[clap(long = "current-percent", env = "CURRENT_PERCENT")]
    pub current: Option<Percent>,

    /// Target battery state of charge.
    #[clap(long = "target-percent", default_value = "80", env = "TARGET_PERCENT")]
    pub target: Percent,

    /// Usable battery capacity.
    #[clap(long = "capacity-kwh", default_value = "50", env = "BATTERY_CAPACITY_KWH")]
    pub capacity: KilowattHours,

    /// Unit price of the energy.
    #[clap(long = "price-per-kwh", default_value = "0.0899", env = "PRICE_PER_KWH")]
    pub price: KilowattHourRate,

    /// Finish by this time of day (smart boost) instead of boosting right away.
    #[clap(long = "ready-by", env = "READY_BY", value_parser = parse_ready_by)]
    pub ready_by: Option<NaiveTime>,

    /// Do not send the boost to the charger (dry run).
    #[clap(long)]
    pub scout: bool,

    #[clap(flatten)]
    pub snapshot: SnapshotArgs,

    #[clap(flatten)]
    pub zappi: ZappiArgs,
}

impl EstimateArgs {
    /// Take the figures from the arguments, or ask for them with the arguments as defaults.
    pub fn charge_request(&self, input: &mut impl InputProvider) -> Result<ChargeRequest> {
        let builder = ChargeRequest::builder().target(self.target);
        let request = if let Some(current) = self.current {
            builder.current(current).capacity(self.capacity).price(self.price).build()
        } else {
            builder
                .current(input.ask_required("Current battery percentage")?)
                .capacity(input.ask_or("Battery capacity", self.capacity)?)
                .price(input.ask_or("Price per kWh", self.price)?)
                .build()
        };
        Ok(request)
    }
}

#[instrument(skip_all)]
pub fn estimate(
    args: &EstimateArgs,
    input: &mut impl InputProvider,
    discord: &DiscordArgs,
) -> Result {
    let request = args.charge_request(input)?;
    let estimate = request.estimate()?;
    println!("{}", build_estimate_table(&request, &estimate));

    let Some(requirement) = estimate.requirement() else {
        info!(current = %request.current, target = %request.target, "already charged, nothing to do");
        return Ok(());
    };
    info!(
        kwh_needed = %requirement.kwh_needed_rounded,
        estimated_cost = %requirement.estimated_cost_rounded,
        "estimated",
    );

    let zappi = if args.scout { None } else { Some(args.zappi.connect()?) };
    Snapshot::from(requirement).write_to(&args.snapshot.path)?;

    let Some(zappi) = zappi else {
        info!("scouting, the charger is left alone");
        return Ok(());
    };
    zappi.boost(Endpoint::boost(requirement.kwh_needed_rounded, args.ready_by)?)?;
    discord.notify(&format!(
        "Boosting by {} for about {}",
        requirement.kwh_needed_rounded, requirement.estimated_cost_rounded,
    ));
    Ok(())
}
