//! One-shot scratch file handing the energy figure from `estimate` over to `boost` and `guard`.

use std::{fs, path::Path};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{As, DisplayFromStr, PickFirst, Same};

use crate::{
    core::estimator::Requirement,
    prelude::*,
    quantity::energy::KilowattHours,
};

/// Written as a JSON number, read back from a number or a numeric string.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[serde(deserialize_with = "As::<PickFirst<(Same, DisplayFromStr)>>::deserialize")]
    kwh_needed: Decimal,
}

impl Snapshot {
    pub const fn kwh_needed(self) -> KilowattHours {
        KilowattHours(self.kwh_needed)
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let contents =
            fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
        serde_json::from_slice(&contents)
            .with_context(|| format!("failed to deserialize `{}`", path.display()))
    }

    #[instrument(skip_all, fields(path = %path.display(), kwh_needed = %self.kwh_needed))]
    pub fn write_to(self, path: &Path) -> Result {
        let mut contents = serde_json::to_string_pretty(&self)?;
        contents.push('\n');
        fs::write(path, contents).with_context(|| format!("failed to write `{}`", path.display()))?;
        info!("saved");
        Ok(())
    }

    /// Delivered-energy threshold for the guard, falling back to the default on any problem.
    pub fn read_threshold(path: &Path) -> KilowattHours {
        match Self::read_from(path) {
            Ok(snapshot) => snapshot.kwh_needed(),
            Err(error) => {
                warn!(
                    default = %KilowattHours::DEFAULT_GUARD_THRESHOLD,
                    "failed to load the snapshot, using the default threshold: {error:#}",
                );
                KilowattHours::DEFAULT_GUARD_THRESHOLD
            }
        }
    }
}

impl From<&Requirement> for Snapshot {
    fn from(requirement: &Requirement) -> Self {
        Self { kwh_needed: requirement.kwh_needed_rounded.0 }
    }
}

impl From<KilowattHours> for Snapshot {
    fn from(kwh_needed: KilowattHours) -> Self {
        Self { kwh_needed: kwh_needed.round_to(2).0 }
    }
}

#[cfg(test)]
mod tests {
    use std::{env, path::PathBuf, process};

    use rust_decimal::dec;

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("zappi-boost-{}-{name}.json", process::id()))
    }

    #[test]
    fn test_serialize_as_number() -> Result {
        let json = serde_json::to_string(&Snapshot::from(KilowattHours(dec!(17.5))))?;
        assert_eq!(json, r#"{"kwh_needed":17.5}"#);
        Ok(())
    }

    #[test]
    fn test_deserialize_ok() -> Result {
        // language=json
        let snapshot: Snapshot = serde_json::from_str(r#"{"kwh_needed": 28.5}"#)?;
        assert_eq!(snapshot.kwh_needed(), KilowattHours(dec!(28.5)));
        Ok(())
    }

    #[test]
    fn test_deserialize_string_ok() -> Result {
        // language=json
        let snapshot: Snapshot = serde_json::from_str(r#"{"kwh_needed": "28.5"}"#)?;
        assert_eq!(snapshot.kwh_needed(), KilowattHours(dec!(28.5)));
        Ok(())
    }

    #[test]
    fn test_read_threshold_string_value() -> Result {
        let path = scratch_path("string-value");
        fs::write(&path, r#"{"kwh_needed": "28.5"}"#)?;
        let threshold = Snapshot::read_threshold(&path);
        fs::remove_file(&path)?;
        assert_eq!(threshold, KilowattHours(dec!(28.5)));
        Ok(())
    }

    #[test]
    fn test_write_then_read_ok() -> Result {
        let path = scratch_path("write-then-read");
        Snapshot::from(KilowattHours(dec!(12.345))).write_to(&path)?;
        let snapshot = Snapshot::read_from(&path)?;
        fs::remove_file(&path)?;
        assert_eq!(snapshot.kwh_needed(), KilowattHours(dec!(12.35)));
        Ok(())
    }

    #[test]
    fn test_read_threshold_missing_file() {
        let threshold = Snapshot::read_threshold(&scratch_path("missing"));
        assert_eq!(threshold, KilowattHours::DEFAULT_GUARD_THRESHOLD);
    }

    #[test]
    fn test_read_threshold_invalid_value() -> Result {
        let path = scratch_path("invalid-value");
        fs::write(&path, r#"{"kwh_needed": "lots"}"#)?;
        let threshold = Snapshot::read_threshold(&path);
        fs::remove_file(&path)?;
        assert_eq!(threshold, KilowattHours::DEFAULT_GUARD_THRESHOLD);
        Ok(())
    }
}
