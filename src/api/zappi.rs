//! [myenergi](https://myenergi.com) Zappi charger over the cloud director API.

use std::time::Duration;

use chrono::{NaiveTime, Timelike};
use http::{
    StatusCode,
    header::{AUTHORIZATION, WWW_AUTHENTICATE},
};
use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use ureq::{Agent, Body, http::Response};

use crate::{
    api::digest::{self, Challenge},
    prelude::*,
    quantity::energy::KilowattHours,
};

pub const DEFAULT_BASE_URL: &str = "https://s18.myenergi.net";

/// Hub serial and API key, which double as the digest username and password.
pub struct Credentials {
    pub serial: String,
    pub key: String,
}

impl Credentials {
    /// Combine the base host, the endpoint path and the credentials, without sending anything.
    pub fn prepare(&self, base_url: &str, endpoint: Endpoint) -> PreparedRequest<'_> {
        let path = endpoint.path(&self.serial);
        PreparedRequest {
            url: format!("{}{path}", base_url.trim_end_matches('/')),
            path,
            credentials: digest::Credentials { username: &self.serial, password: &self.key },
        }
    }
}

pub struct PreparedRequest<'a> {
    pub url: String,
    pub path: String,
    pub credentials: digest::Credentials<'a>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Status,
    Stop,

    /// Manual boost by the given whole amount of energy.
    Boost {
        kilowatt_hours: u32,
    },

    /// Deliver the energy by the given time of day.
    SmartBoost {
        kilowatt_hours: u32,
        ready_by: NaiveTime,
    },
}

impl Endpoint {
    /// The charger only takes whole kilowatt-hours, so the energy is rounded up.
    pub fn boost(energy: KilowattHours, ready_by: Option<NaiveTime>) -> Result<Self> {
        let kilowatt_hours =
            energy.ceil_whole().with_context(|| format!("cannot boost by {energy}"))?;
        ensure!(kilowatt_hours != 0, "nothing to boost by: {energy}");
        let Some(ready_by) = ready_by else {
            return Ok(Self::Boost { kilowatt_hours });
        };
        ensure!(
            ready_by.minute() % 15 == 0 && ready_by.second() == 0,
            "smart boost must finish on a quarter hour, got {ready_by}",
        );
        Ok(Self::SmartBoost { kilowatt_hours, ready_by })
    }

    pub fn path(&self, serial: &str) -> String {
        match self {
            Self::Status => format!("/cgi-jstatus-Z{serial}"),
            Self::Stop => format!("/cgi-zappi-mode-Z{serial}-{}-0-0-0000", Status::STOPPED_MODE),
            Self::Boost { kilowatt_hours } => {
                format!("/cgi-zappi-mode-Z{serial}-0-10-{kilowatt_hours}-0000")
            }
            Self::SmartBoost { kilowatt_hours, ready_by } => {
                format!(
                    "/cgi-zappi-mode-Z{serial}-0-11-{kilowatt_hours}-{}",
                    ready_by.format("%H%M"),
                )
            }
        }
    }
}

pub struct Api {
    client: Agent,
    base_url: String,
    credentials: Credentials,
}

impl Api {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let client = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();
        Self { client, base_url: base_url.into(), credentials }
    }

    #[instrument(skip_all)]
    pub fn get_status(&self) -> Result<Status> {
        info!("fetching…");
        let status = self
            .call(Endpoint::Status)?
            .body_mut()
            .read_json::<StatusResponse>()
            .context("failed to deserialize the status")?
            .zappi
            .into_iter()
            .next()
            .context("the hub reported no Zappi")?;
        debug!(?status, "fetched");
        Ok(status)
    }

    /// Returns whether a stop command was actually sent.
    #[instrument(skip_all, fields(force = force))]
    pub fn stop_charging(&self, force: bool) -> Result<bool> {
        if !force && !self.get_status()?.is_charging() {
            info!("not charging, nothing to stop");
            return Ok(false);
        }
        info!("stopping…");
        let response = self.call(Endpoint::Stop)?.body_mut().read_to_string()?;
        info!(%response, "stopped");
        Ok(true)
    }

    #[instrument(skip_all, fields(endpoint = ?endpoint))]
    pub fn boost(&self, endpoint: Endpoint) -> Result {
        info!("boosting…");
        let response = self.call(endpoint)?.body_mut().read_to_string()?;
        info!(%response, "boosted");
        Ok(())
    }

    /// Send the GET, answering the digest challenge if the hub asks for one.
    #[instrument(skip_all, level = Level::DEBUG, fields(endpoint = ?endpoint))]
    fn call(&self, endpoint: Endpoint) -> Result<Response<Body>> {
        let request = self.credentials.prepare(&self.base_url, endpoint);
        let response = self
            .client
            .get(request.url.as_str())
            .call()
            .with_context(|| format!("failed to call `{}`", request.path))?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            let challenge = response
                .headers()
                .get_all(WWW_AUTHENTICATE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .find_map(|value| value.parse::<Challenge>().ok())
                .with_context(|| format!("`{}` sent no usable digest challenge", request.path))?;
            debug!(realm = %challenge.realm, "answering the digest challenge…");
            let authorization = challenge.authorize(
                &request.credentials,
                "GET",
                &request.path,
                &digest::new_client_nonce(),
                1,
            );
            self.client
                .get(request.url.as_str())
                .header(AUTHORIZATION, authorization)
                .call()
                .with_context(|| format!("failed to call `{}`", request.path))?
        } else {
            response
        };

        ensure!(
            response.status().is_success(),
            "`{}` failed with {}",
            request.path,
            response.status(),
        );
        Ok(response)
    }
}

#[derive(Deserialize)]
struct StatusResponse {
    zappi: Vec<Status>,
}

/// The hub returns these as numbers or as strings, depending on the firmware.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Status {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "zmo")]
    pub mode: u8,

    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "sta")]
    pub status: u8,

    /// Energy added in the current session.
    #[serde(rename = "che", default)]
    pub charge_added: KilowattHours,
}

impl Status {
    pub const STOPPED_MODE: u8 = 4;

    pub const fn is_charging(&self) -> bool {
        self.mode != Self::STOPPED_MODE
    }

    pub fn has_delivered(&self, threshold: KilowattHours) -> bool {
        self.charge_added >= threshold
    }

    pub const fn mode_name(&self) -> &'static str {
        match self.mode {
            1 => "fast",
            2 => "eco",
            3 => "eco+",
            Self::STOPPED_MODE => "stopped",
            _ => "unknown",
        }
    }

    pub const fn status_name(&self) -> &'static str {
        match self.status {
            1 => "paused",
            3 => "charging",
            5 => "complete",
            _ => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn credentials() -> Credentials {
        Credentials { serial: "12345678".to_string(), key: "secret".to_string() }
    }

    #[test]
    fn test_paths() -> Result {
        assert_eq!(Endpoint::Status.path("12345678"), "/cgi-jstatus-Z12345678");
        assert_eq!(Endpoint::Stop.path("12345678"), "/cgi-zappi-mode-Z12345678-4-0-0-0000");
        assert_eq!(
            Endpoint::boost(KilowattHours(dec!(17.50)), None)?.path("12345678"),
            "/cgi-zappi-mode-Z12345678-0-10-18-0000",
        );
        assert_eq!(
            Endpoint::boost(KilowattHours(dec!(20)), Some(NaiveTime::from_hms_opt(7, 30, 0).unwrap()))?
                .path("12345678"),
            "/cgi-zappi-mode-Z12345678-0-11-20-0730",
        );
        Ok(())
    }

    #[test]
    fn test_boost_rejects_nothing() {
        assert!(Endpoint::boost(KilowattHours::ZERO, None).is_err());
        assert!(Endpoint::boost(KilowattHours(dec!(-3)), None).is_err());
    }

    #[test]
    fn test_smart_boost_rejects_odd_minutes() {
        let ready_by = NaiveTime::from_hms_opt(7, 10, 0);
        assert!(Endpoint::boost(KilowattHours(dec!(5)), ready_by).is_err());
    }

    #[test]
    fn test_prepare_ok() {
        let credentials = credentials();
        let request = credentials.prepare("https://s18.myenergi.net/", Endpoint::Status);
        assert_eq!(request.url, "https://s18.myenergi.net/cgi-jstatus-Z12345678");
        assert_eq!(request.path, "/cgi-jstatus-Z12345678");
        assert_eq!(request.credentials.username, "12345678");
        assert_eq!(request.credentials.password, "secret");
    }

    #[test]
    fn test_status_numbers_ok() -> Result {
        // language=json
        let body = r#"{"zappi": [{"sno": 12345678, "zmo": 1, "sta": 3, "che": 12.34, "frq": 50.01}]}"#;
        let status = serde_json::from_str::<StatusResponse>(body)?.zappi.remove(0);
        assert_eq!(status, Status { mode: 1, status: 3, charge_added: KilowattHours(dec!(12.34)) });
        assert!(status.is_charging());
        assert_eq!(status.mode_name(), "fast");
        assert_eq!(status.status_name(), "charging");
        Ok(())
    }

    #[test]
    fn test_status_strings_ok() -> Result {
        // language=json
        let body = r#"{"zappi": [{"zmo": "4", "sta": "1"}]}"#;
        let status = serde_json::from_str::<StatusResponse>(body)?.zappi.remove(0);
        assert!(!status.is_charging());
        assert_eq!(status.charge_added, KilowattHours::ZERO);
        Ok(())
    }

    #[test]
    fn test_has_delivered() {
        let status = Status { mode: 3, status: 3, charge_added: KilowattHours(dec!(28.5)) };
        assert!(status.has_delivered(KilowattHours(dec!(28.5))));
        assert!(status.has_delivered(KilowattHours(dec!(25))));
        assert!(!status.has_delivered(KilowattHours(dec!(28.51))));
    }
}
