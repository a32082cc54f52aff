use chrono::NaiveTime;
use clap::Parser;

use crate::{
    api::zappi::{self, Credentials, DEFAULT_BASE_URL, Endpoint},
    cli::{discord::DiscordArgs, snapshot::SnapshotArgs},
    core::{error::InputError, snapshot::Snapshot},
    prelude::*,
    quantity::energy::KilowattHours,
    tables::build_status_table,
};

#[derive(Parser)]
pub struct ZappiArgs {
    /// Hub serial number, also the digest username.
    #[clap(long = "myenergi-serial", env = "MYENERGI_SERIAL")]
    serial: Option<String>,

    /// API key from the myenergi app, also the digest password.
    #[clap(long = "myenergi-key", env = "MYENERGI_KEY", hide_env_values = true)]
    key: Option<String>,

    #[clap(long = "myenergi-base-url", env = "MYENERGI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

impl ZappiArgs {
    pub fn credentials(&self) -> Result<Credentials, InputError> {
        let serial = non_empty(self.serial.as_deref())
            .ok_or_else(|| InputError::missing("MYENERGI_SERIAL"))?;
        let key =
            non_empty(self.key.as_deref()).ok_or_else(|| InputError::missing("MYENERGI_KEY"))?;
        Ok(Credentials { serial: serial.to_string(), key: key.to_string() })
    }

    pub fn connect(&self) -> Result<zappi::Api> {
        Ok(zappi::Api::new(&self.base_url, self.credentials()?))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Smart boost completion time, `HH:MM`.
pub fn parse_ready_by(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, "%H:%M")
}

#[derive(Parser)]
pub struct BoostArgs {
    /// Energy to add, defaults to the last estimate.
    #[clap(long = "kwh")]
    pub energy: Option<KilowattHours>,

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

#[instrument(skip_all)]
pub fn boost(args: &BoostArgs, discord: &DiscordArgs) -> Result {
    let energy = match args.energy {
        Some(energy) => energy,
        None => Snapshot::read_from(&args.snapshot.path)?.kwh_needed(),
    };
    let endpoint = Endpoint::boost(energy, args.ready_by)?;
    if args.scout {
        info!(?endpoint, "scouting, the charger is left alone");
        return Ok(());
    }
    args.zappi.connect()?.boost(endpoint)?;
    discord.notify(&format!("Boosting by {energy:.2}"));
    Ok(())
}

#[derive(Parser)]
pub struct StatusArgs {
    /// Fail when the charger is not charging.
    #[clap(long)]
    pub check: bool,

    /// Do not send the status to Discord.
    #[clap(long)]
    pub no_notify: bool,

    #[clap(flatten)]
    pub zappi: ZappiArgs,
}

#[instrument(skip_all)]
pub fn status(args: &StatusArgs, discord: &DiscordArgs) -> Result {
    let status = args.zappi.connect()?.get_status()?;
    println!("{}", build_status_table(&status));
    if !args.no_notify {
        discord.notify(&format!(
            "mode={}, status={}, {:.2}",
            status.mode_name(),
            status.status_name(),
            status.charge_added,
        ));
    }
    ensure!(!args.check || status.is_charging(), "the charger is not charging");
    Ok(())
}

#[derive(Parser)]
pub struct StopArgs {
    /// Send the stop command without checking the status first.
    #[clap(long)]
    pub force: bool,

    #[clap(flatten)]
    pub zappi: ZappiArgs,
}

#[instrument(skip_all)]
pub fn stop(args: &StopArgs, discord: &DiscordArgs) -> Result {
    if args.zappi.connect()?.stop_charging(args.force)? {
        discord.notify("Charging stopped");
    }
    Ok(())
}

#[derive(Parser)]
pub struct GuardArgs {
    /// Delivered energy to stop at, defaults to the last estimate.
    #[clap(long = "threshold-kwh")]
    pub threshold: Option<KilowattHours>,

    #[clap(flatten)]
    pub snapshot: SnapshotArgs,

    #[clap(flatten)]
    pub zappi: ZappiArgs,
}

#[instrument(skip_all)]
pub fn guard(args: &GuardArgs, discord: &DiscordArgs) -> Result {
    let api = args.zappi.connect()?;
    let threshold =
        args.threshold.unwrap_or_else(|| Snapshot::read_threshold(&args.snapshot.path));
    let status = api.get_status()?;
    info!(delivered = %status.charge_added, threshold = %threshold, "checking the delivered energy…");
    if status.has_delivered(threshold) {
        discord.notify(&format!(
            "Energy delivered {} reached the threshold {threshold}, stopping",
            status.charge_added,
        ));
        api.stop_charging(true)?;
    }
    Ok(())
}
