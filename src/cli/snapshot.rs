use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
pub struct SnapshotArgs {
    /// JSON file handing the energy figure from `estimate` over to `boost` and `guard`.
    #[clap(long = "snapshot", env = "SNAPSHOT_PATH", default_value = "battery.json")]
    pub path: PathBuf,
}
