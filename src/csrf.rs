use axum_extra::extract::cookie::{Cookie, CookieJar};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

pub const CSRF_COOKIE: &str = "csrf_secret";

const SECRET_LEN: usize = 32;

/// Returns the per-browser CSRF secret, setting the cookie when absent.
pub fn ensure_secret(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(CSRF_COOKIE) {
        let secret = cookie.value().to_string();
        if !secret.is_empty() {
            return (jar, secret);
        }
    }

    let secret: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect();

    let mut cookie = Cookie::new(CSRF_COOKIE, secret.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);

    (jar.add(cookie), secret)
}

/// Anti-forgery token embedded in a form, scoped to one intent such as
/// `delete_user_7` or `import_users`.
pub fn token(secret: &str, intent: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(intent.as_bytes());

    hex::encode(hasher.finalize())
}

/// Verifies a submitted token against the secret cookie for the intent.
/// A missing cookie, missing token or mismatch all fail.
pub fn is_valid(jar: &CookieJar, intent: &str, submitted: Option<&str>) -> bool {
    let secret = match jar.get(CSRF_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
        _ => return false,
    };

    match submitted {
        Some(value) if !value.is_empty() => token(&secret, intent) == value,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar_with_secret(secret: &str) -> CookieJar {
        CookieJar::new().add(Cookie::new(CSRF_COOKIE, secret.to_string()))
    }

    #[test]
    fn test_token_is_deterministic_per_secret_and_intent() {
        assert_eq!(token("s3cret", "delete_user_7"), token("s3cret", "delete_user_7"));
        assert_ne!(token("s3cret", "delete_user_7"), token("s3cret", "delete_user_8"));
        assert_ne!(token("s3cret", "delete_user_7"), token("other", "delete_user_7"));
    }

    #[test]
    fn test_valid_token_passes() {
        let jar = jar_with_secret("s3cret");
        let submitted = token("s3cret", "import_users");

        assert!(is_valid(&jar, "import_users", Some(&submitted)));
    }

    #[test]
    fn test_wrong_intent_fails() {
        let jar = jar_with_secret("s3cret");
        let submitted = token("s3cret", "delete_user_1");

        assert!(!is_valid(&jar, "delete_user_2", Some(&submitted)));
    }

    #[test]
    fn test_missing_token_or_cookie_fails() {
        let jar = jar_with_secret("s3cret");
        assert!(!is_valid(&jar, "import_users", None));
        assert!(!is_valid(&jar, "import_users", Some("")));

        let submitted = token("s3cret", "import_users");
        assert!(!is_valid(&CookieJar::new(), "import_users", Some(&submitted)));
    }

    #[test]
    fn test_ensure_secret_reuses_existing_cookie() {
        let (jar, secret) = ensure_secret(jar_with_secret("s3cret"));

        assert_eq!(secret, "s3cret");
        assert_eq!(jar.get(CSRF_COOKIE).unwrap().value(), "s3cret");
    }

    #[test]
    fn test_ensure_secret_creates_cookie_when_absent() {
        let (jar, secret) = ensure_secret(CookieJar::new());

        assert_eq!(secret.len(), SECRET_LEN);
        assert_eq!(jar.get(CSRF_COOKIE).unwrap().value(), secret);
    }
}
