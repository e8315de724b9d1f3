use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

const FLASH_COOKIE: &str = "flash";

/// One-request notification rendered at the top of the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: String,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Queues a message behind whatever is already pending.
pub fn push(jar: CookieJar, flash: FlashMessage) -> CookieJar {
    let mut pending = peek(&jar);
    pending.push(flash);

    let payload = serde_json::to_string(&pending).unwrap_or_default();

    let mut cookie = Cookie::new(FLASH_COOKIE, BASE64.encode(payload));
    cookie.set_path("/");
    cookie.set_http_only(true);

    jar.add(cookie)
}

/// Drains the pending messages, clearing the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    let pending = peek(&jar);

    let mut removal = Cookie::new(FLASH_COOKIE, "");
    removal.set_path("/");

    (jar.remove(removal), pending)
}

fn peek(jar: &CookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| BASE64.decode(cookie.value()).ok())
        .and_then(|payload| serde_json::from_slice(&payload).ok())
        .unwrap_or_default()
}
