use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
    response::Redirect,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{config::SessionConfig, state::AppState};

pub const SESSION_COOKIE: &str = "kitchen_session";
const STAFF_SUBJECT: &str = "staff";

/// Session token payload. There are no per-user identities, only the staff
/// role, so `sid` is what tells two logins apart in the logs.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub sid: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
    pub secure_cookie: bool,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        let SessionConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.session.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs((ttl_minutes.max(1) as u64) * 60),
            secure_cookie: state.config.secure_cookies(),
        }
    }
}

impl SessionKeys {
    pub fn sign(&self) -> anyhow::Result<(Uuid, String)> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let sid = Uuid::new_v4();
        let claims = Claims {
            sub: STAFF_SUBJECT.to_string(),
            sid,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(session_id = %sid, "session signed");
        Ok((sid, token))
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        if data.claims.sub != STAFF_SUBJECT {
            anyhow::bail!("not a staff session");
        }
        Ok(data.claims)
    }

    /// `Set-Cookie` value carrying a freshly signed token.
    pub fn login_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.ttl.as_secs()
        );
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub fn logout_cookie(&self) -> String {
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

/// Value of cookie `name` across all `Cookie` headers of a request.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Present on every staff-only handler. Without a valid session cookie the
/// request is redirected to the login page.
#[derive(Debug)]
pub struct StaffSession(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for StaffSession
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        let Some(token) = cookie_value(&parts.headers, SESSION_COOKIE) else {
            debug!(uri = %parts.uri, "no session cookie");
            return Err(Redirect::to("/login"));
        };

        match keys.verify(token) {
            Ok(claims) => Ok(StaffSession(claims.sid)),
            Err(e) => {
                warn!(error = %e, "invalid or expired session");
                Err(Redirect::to("/login"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn keys(secret: &str, issuer: &str, audience: &str, ttl_secs: u64) -> SessionKeys {
        SessionKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl: Duration::from_secs(ttl_secs),
            secure_cookie: false,
        }
    }

    #[test]
    fn sign_and_verify_session() {
        let keys = keys("dev-secret", "test-iss", "test-aud", 300);
        let (sid, token) = keys.sign().expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sid, sid);
        assert_eq!(claims.sub, "staff");
        assert_eq!(claims.iss, "test-iss");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn claims_serialize_with_registered_names() {
        let claims = Claims {
            sub: "staff".into(),
            sid: Uuid::nil(),
            iat: 1,
            exp: 2,
            iss: "i".into(),
            aud: "a".into(),
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["exp"], 2);
        assert_eq!(json["aud"], "a");
    }

    #[test]
    fn verify_rejects_other_secret_or_audience() {
        let good = keys("same-secret", "iss", "aud", 300);
        let (_, token) = good.sign().unwrap();

        assert!(keys("other-secret", "iss", "aud", 300).verify(&token).is_err());
        assert!(keys("same-secret", "iss", "other-aud", 300).verify(&token).is_err());
        assert!(good.verify("not.a.token").is_err());
    }

    #[test]
    fn verify_rejects_expired_session() {
        let keys = keys("dev-secret", "iss", "aud", 300);
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let stale = Claims {
            sub: "staff".into(),
            sid: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600, // well past the default 60s leeway
            iss: "iss".into(),
            aud: "aud".into(),
        };
        let token = encode(&Header::default(), &stale, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn cookie_attributes() {
        let mut k = keys("s", "i", "a", 600);
        let cookie = k.login_cookie("abc");
        assert!(cookie.starts_with("kitchen_session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=600"));
        assert!(!cookie.contains("Secure"));

        k.secure_cookie = true;
        assert!(k.login_cookie("abc").ends_with("; Secure"));
        assert!(k.logout_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn finds_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; lang=en"));
        headers.append(header::COOKIE, HeaderValue::from_static("kitchen_session=tok.en.x"));
        assert_eq!(cookie_value(&headers, SESSION_COOKIE), Some("tok.en.x"));
        assert_eq!(cookie_value(&headers, "lang"), Some("en"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
