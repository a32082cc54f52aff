//! HTTP Digest access authentication, [RFC 2617][1] with the MD5 family only.
//!
//! [1]: https://www.rfc-editor.org/rfc/rfc2617

use std::{fmt::Write, str::FromStr};

use chrono::Utc;

use crate::prelude::*;

/// Parsed `WWW-Authenticate: Digest …` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    pub realm: String,
    pub nonce: String,
    pub opaque: Option<String>,
    pub algorithm: Algorithm,

    /// Whether the server offered `qop=auth`.
    pub qop_auth: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    Md5,
    Md5Session,
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("MD5") {
            Ok(Self::Md5)
        } else if s.eq_ignore_ascii_case("MD5-sess") {
            Ok(Self::Md5Session)
        } else {
            bail!("unsupported digest algorithm `{s}`")
        }
    }
}

impl Algorithm {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Md5Session => "MD5-sess",
        }
    }
}

impl FromStr for Challenge {
    type Err = Error;

    fn from_str(header: &str) -> Result<Self> {
        let header = header.trim();
        let params = header
            .get(..6)
            .filter(|scheme| scheme.eq_ignore_ascii_case("digest"))
            .map(|_| &header[6..])
            .with_context(|| format!("not a digest challenge: `{header}`"))?;

        let (mut realm, mut nonce, mut opaque) = (None, None, None);
        let mut algorithm = Algorithm::default();
        let mut qop_auth = false;
        for (key, value) in parse_params(params)? {
            match key.as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "opaque" => opaque = Some(value),
                "algorithm" => algorithm = value.parse()?,
                "qop" => qop_auth = value.split(',').any(|qop| qop.trim() == "auth"),
                _ => {}
            }
        }

        Ok(Self {
            realm: realm.context("the challenge has no realm")?,
            nonce: nonce.context("the challenge has no nonce")?,
            opaque,
            algorithm,
            qop_auth,
        })
    }
}

/// Split `key=value, key="quoted, value"` pairs, lower-casing the keys.
fn parse_params(mut rest: &str) -> Result<Vec<(String, String)>> {
    let mut params = Vec::new();
    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            return Ok(params);
        }
        let (key, after_key) =
            rest.split_once('=').with_context(|| format!("malformed parameter: `{rest}`"))?;
        let after_key = after_key.trim_start();
        let (value, remainder) = if let Some(quoted) = after_key.strip_prefix('"') {
            unquote(quoted).with_context(|| format!("unterminated quote: `{rest}`"))?
        } else {
            let (value, remainder) = after_key.split_once(',').unwrap_or((after_key, ""));
            (value.trim().to_string(), remainder)
        };
        params.push((key.trim().to_ascii_lowercase(), value));
        rest = remainder;
    }
}

/// Read a quoted string up to its closing quote, resolving backslash escapes.
fn unquote(quoted: &str) -> Option<(String, &str)> {
    let mut value = String::new();
    let mut chars = quoted.char_indices();
    while let Some((index, c)) = chars.next() {
        match c {
            '"' => return Some((value, &quoted[index + 1..])),
            '\\' => value.push(chars.next()?.1),
            _ => value.push(c),
        }
    }
    None
}

fn quote(value: &str) -> String {
    value.replace('\\', r"\\").replace('"', r#"\""#)
}

pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl Challenge {
    /// Build the `Authorization` header value for a request to `uri`.
    pub fn authorize(
        &self,
        credentials: &Credentials<'_>,
        method: &str,
        uri: &str,
        client_nonce: &str,
        nonce_count: u32,
    ) -> String {
        let mut ha1 = hex_md5(&format!(
            "{}:{}:{}",
            credentials.username, self.realm, credentials.password
        ));
        if self.algorithm == Algorithm::Md5Session {
            ha1 = hex_md5(&format!("{ha1}:{}:{client_nonce}", self.nonce));
        }
        let ha2 = hex_md5(&format!("{method}:{uri}"));
        let nonce_count = format!("{nonce_count:08x}");

        let response = if self.qop_auth {
            hex_md5(&format!("{ha1}:{}:{nonce_count}:{client_nonce}:auth:{ha2}", self.nonce))
        } else {
            hex_md5(&format!("{ha1}:{}:{ha2}", self.nonce))
        };

        let mut header = format!(
            r#"Digest username="{}", realm="{}", nonce="{}", uri="{}", algorithm={}, response="{response}""#,
            quote(credentials.username),
            quote(&self.realm),
            quote(&self.nonce),
            quote(uri),
            self.algorithm.as_str(),
        );
        if self.qop_auth {
            let _ = write!(header, r#", qop=auth, nc={nonce_count}, cnonce="{client_nonce}""#);
        }
        if let Some(opaque) = &self.opaque {
            let _ = write!(header, r#", opaque="{}""#, quote(opaque));
        }
        header
    }
}

/// Fresh client nonce: good enough for a one-off request, not a secret.
pub fn new_client_nonce() -> String {
    let mut nonce = hex_md5(&Utc::now().timestamp_nanos_opt().unwrap_or_default().to_string());
    nonce.truncate(16);
    nonce
}

fn hex_md5(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The worked example from RFC 2617, section 3.5.
    const RFC_CHALLENGE: &str = r#"Digest
        realm="testrealm@host.com",
        qop="auth,auth-int",
        nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093",
        opaque="5ccc069c403ebaf9f0171e9517f40e41""#;

    #[test]
    fn test_parse_challenge_ok() -> Result {
        let challenge: Challenge = RFC_CHALLENGE.parse()?;
        assert_eq!(
            challenge,
            Challenge {
                realm: "testrealm@host.com".to_string(),
                nonce: "dcd98b7102dd2f0e8b11d0f600bfb0c093".to_string(),
                opaque: Some("5ccc069c403ebaf9f0171e9517f40e41".to_string()),
                algorithm: Algorithm::Md5,
                qop_auth: true,
            }
        );
        Ok(())
    }

    #[test]
    fn test_parse_unquoted_and_mixed_case() -> Result {
        let challenge: Challenge =
            r#"digest Realm="MyEnergi Telemetry", nonce=abc123, Algorithm=md5-sess"#.parse()?;
        assert_eq!(challenge.realm, "MyEnergi Telemetry");
        assert_eq!(challenge.nonce, "abc123");
        assert_eq!(challenge.algorithm, Algorithm::Md5Session);
        assert!(!challenge.qop_auth);
        Ok(())
    }

    #[test]
    fn test_parse_escaped_quotes() -> Result {
        let challenge: Challenge =
            r#"Digest realm="the \"hub\" \\ realm", nonce="n", opaque="o""#.parse()?;
        assert_eq!(challenge.realm, r#"the "hub" \ realm"#);
        assert_eq!(challenge.opaque.as_deref(), Some("o"));
        Ok(())
    }

    #[test]
    fn test_parse_rejects_unterminated_quote() {
        assert!(r#"Digest realm="x, nonce=y"#.parse::<Challenge>().is_err());
    }

    #[test]
    fn test_authorize_escapes_quotes() -> Result {
        let challenge: Challenge = r#"Digest realm="the \"hub\"", nonce="n""#.parse()?;
        let credentials = Credentials { username: "u", password: "p" };
        let header = challenge.authorize(&credentials, "GET", "/", "c", 1);
        assert!(header.contains(r#"realm="the \"hub\"""#), "{header}");
        Ok(())
    }

    #[test]
    fn test_parse_rejects_basic() {
        assert!(r#"Basic realm="x""#.parse::<Challenge>().is_err());
    }

    #[test]
    fn test_parse_rejects_missing_nonce() {
        assert!(r#"Digest realm="x""#.parse::<Challenge>().is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_algorithm() {
        assert!(r#"Digest realm="x", nonce="y", algorithm=SHA-256"#.parse::<Challenge>().is_err());
    }

    #[test]
    fn test_authorize_rfc_example() -> Result {
        let challenge: Challenge = RFC_CHALLENGE.parse()?;
        let credentials = Credentials { username: "Mufasa", password: "Circle Of Life" };
        let header = challenge.authorize(&credentials, "GET", "/dir/index.html", "0a4f113b", 1);
        assert_eq!(
            header,
            concat!(
                r#"Digest username="Mufasa", realm="testrealm@host.com", "#,
                r#"nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", uri="/dir/index.html", "#,
                r#"algorithm=MD5, response="6629fae49393a05397450978507c4ef1", "#,
                r#"qop=auth, nc=00000001, cnonce="0a4f113b", "#,
                r#"opaque="5ccc069c403ebaf9f0171e9517f40e41""#,
            )
        );
        Ok(())
    }

    #[test]
    fn test_authorize_without_qop() -> Result {
        let challenge: Challenge = r#"Digest realm="r", nonce="n""#.parse()?;
        let credentials = Credentials { username: "u", password: "p" };
        let header = challenge.authorize(&credentials, "GET", "/", "c", 1);
        assert!(!header.contains("qop="));
        assert!(!header.contains("cnonce="));
        assert!(!header.contains("opaque="));
        Ok(())
    }

    #[test]
    fn test_client_nonce_shape() {
        let nonce = new_client_nonce();
        assert_eq!(nonce.len(), 16);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
