//! Cookie-backed sessions and login throttling for the admin screens.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

const COOKIE_NAME: &str = "wf_session";
const SESSION_TTL_DAYS: i64 = 7;

/// Max admin login attempts per IP per hour.
pub const AUTH_RATE_LIMIT_PER_HOUR: usize = 10;

/// A verified admin session.
///
/// The cookie value is `<expiry>.<hex username>.<hex hmac>`. The
/// username is hex encoded so it can never collide with the separators,
/// and the MAC covers both preceding fields.
pub struct Session {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn issue(username: &str) -> Self {
        Self {
            username: username.to_string(),
            expires_at: Utc::now() + chrono::Duration::days(SESSION_TTL_DAYS),
        }
    }

    pub fn encode(&self, secret: &str) -> String {
        let body = format!(
            "{}.{}",
            self.expires_at.timestamp(),
            hex::encode(&self.username)
        );
        let tag = keyed_mac(secret, body.as_bytes()).finalize().into_bytes();
        format!("{body}.{}", hex::encode(tag))
    }

    /// Decode and verify a cookie value. Returns None for a bad
    /// signature, malformed fields, or an expired session.
    pub fn decode(value: &str, secret: &str) -> Option<Self> {
        let (body, tag_hex) = value.rsplit_once('.')?;
        let tag = hex::decode(tag_hex).ok()?;
        keyed_mac(secret, body.as_bytes()).verify_slice(&tag).ok()?;

        let (exp_str, user_hex) = body.split_once('.')?;
        let expires_at = DateTime::from_timestamp(exp_str.parse().ok()?, 0)?;
        if expires_at < Utc::now() {
            return None;
        }
        let username = String::from_utf8(hex::decode(user_hex).ok()?).ok()?;
        Some(Self { username, expires_at })
    }
}

/// Authenticated admin session extractor. Handlers that take this are
/// unreachable without a valid cookie; anything else bounces to login.
pub struct AdminSession {
    pub username: String,
}

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(session_cookie_value)
            .and_then(|raw| Session::decode(raw, state.config.session_secret()))
            .map(|session| AdminSession {
                username: session.username,
            })
            .ok_or_else(|| Redirect::to("/admin/login").into_response())
    }
}

/// Build the Set-Cookie header value for a fresh session.
/// In release builds, adds `Secure` to prevent transmission over HTTP.
pub fn session_cookie(username: &str, secret: &str) -> String {
    let value = Session::issue(username).encode(secret);
    let max_age = SESSION_TTL_DAYS * 24 * 3600;
    let secure = if cfg!(debug_assertions) { "" } else { "; Secure" };
    format!(
        "{COOKIE_NAME}={value}; Path=/admin; HttpOnly; SameSite=Lax; Max-Age={max_age}{secure}"
    )
}

/// Build a Set-Cookie header that clears the session.
pub fn clear_session_cookie() -> String {
    format!("{COOKIE_NAME}=; Path=/admin; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pull the session cookie's value out of a Cookie header.
fn session_cookie_value(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, value)| value)
}

fn keyed_mac(secret: &str, data: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(data);
    mac
}

/// Compare a submitted credential against the configured one. Both
/// sides are reduced to fixed-length MAC tags and compared by the MAC
/// layer, so neither length nor prefix timing leaks.
pub fn credential_matches(given: &str, expected: &str) -> bool {
    const COMPARE_KEY: &str = "wayfare.credential-compare";
    let given_tag = keyed_mac(COMPARE_KEY, given.as_bytes())
        .finalize()
        .into_bytes();
    keyed_mac(COMPARE_KEY, expected.as_bytes())
        .verify_slice(&given_tag)
        .is_ok()
}

/// Record a login attempt for `ip` and decide whether it is allowed.
/// Prunes attempts older than an hour across the whole map, dropping
/// IPs with none left so the map cannot grow without bound.
pub fn allow_attempt(
    attempts_by_ip: &mut HashMap<IpAddr, Vec<Instant>>,
    ip: IpAddr,
    now: Instant,
    max_per_hour: usize,
) -> bool {
    let cutoff = now - Duration::from_secs(3600);
    attempts_by_ip.retain(|_, attempts| {
        attempts.retain(|t| *t > cutoff);
        !attempts.is_empty()
    });

    let attempts = attempts_by_ip.entry(ip).or_default();
    if attempts.len() >= max_per_hour {
        return false;
    }
    attempts.push(now);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";

    #[test]
    fn session_roundtrip() {
        let encoded = Session::issue("admin").encode(SECRET);
        let decoded = Session::decode(&encoded, SECRET).unwrap();
        assert_eq!(decoded.username, "admin");
        assert!(decoded.expires_at > Utc::now());
    }

    #[test]
    fn session_survives_separator_characters_in_username() {
        let encoded = Session::issue("ops.lead=admin").encode(SECRET);
        let decoded = Session::decode(&encoded, SECRET).unwrap();
        assert_eq!(decoded.username, "ops.lead=admin");
    }

    #[test]
    fn tampered_session_is_rejected() {
        let encoded = Session::issue("admin").encode(SECRET);
        let (body, tag) = encoded.rsplit_once('.').unwrap();
        let (_, user_hex) = body.split_once('.').unwrap();
        let forged_body = body.replace(user_hex, &hex::encode("imposter"));
        assert!(Session::decode(&format!("{forged_body}.{tag}"), SECRET).is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let encoded = Session::issue("admin").encode("secret-a");
        assert!(Session::decode(&encoded, "secret-b").is_none());
    }

    #[test]
    fn expired_session_is_rejected() {
        let stale = Session {
            username: "admin".to_string(),
            expires_at: Utc::now() - chrono::Duration::hours(1),
        };
        assert!(Session::decode(&stale.encode(SECRET), SECRET).is_none());
    }

    #[test]
    fn finds_session_cookie_among_others() {
        assert_eq!(
            session_cookie_value("theme=dark; wf_session=abc123"),
            Some("abc123")
        );
        assert_eq!(
            session_cookie_value("wf_session=abc123; theme=dark"),
            Some("abc123")
        );
        assert_eq!(session_cookie_value("theme=dark"), None);
    }

    #[test]
    fn credential_comparison() {
        assert!(credential_matches("hunter2", "hunter2"));
        assert!(!credential_matches("hunter2", "hunter3"));
        assert!(!credential_matches("hunter", "hunter2"));
        assert!(!credential_matches("", "hunter2"));
    }

    #[test]
    fn attempts_over_the_limit_are_refused() {
        let mut map = HashMap::new();
        let ip: IpAddr = "203.0.113.9".parse().unwrap();
        let now = Instant::now();
        for _ in 0..AUTH_RATE_LIMIT_PER_HOUR {
            assert!(allow_attempt(&mut map, ip, now, AUTH_RATE_LIMIT_PER_HOUR));
        }
        assert!(!allow_attempt(&mut map, ip, now, AUTH_RATE_LIMIT_PER_HOUR));
    }

    #[test]
    fn stale_attempts_free_the_limit() {
        let mut map = HashMap::new();
        let ip: IpAddr = "203.0.113.9".parse().unwrap();
        let old = Instant::now() - Duration::from_secs(3601);
        map.insert(ip, vec![old; 10]);
        assert!(allow_attempt(&mut map, ip, Instant::now(), 10));
        assert_eq!(map[&ip].len(), 1);
    }

    #[test]
    fn idle_ips_are_dropped_from_the_map() {
        let mut map = HashMap::new();
        let old = Instant::now() - Duration::from_secs(3601);
        for n in 1..=50u8 {
            map.insert(IpAddr::from([198, 51, 100, n]), vec![old]);
        }
        let active: IpAddr = "203.0.113.9".parse().unwrap();
        assert!(allow_attempt(&mut map, active, Instant::now(), 10));
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&active));
    }
}
