//! HMAC validation for OAuth callbacks.
//!
//! The platform signs every callback: the `hmac` parameter is the hex
//! HMAC-SHA256 of all other query parameters, sorted by key and joined as
//! `key=value&key=value`, keyed with the app's client secret.
//!
//! All comparisons are constant-time. If the primary secret fails, the old
//! secret (when configured) is tried so in-flight installs survive key
//! rotation.
//!
//! # Example
//!
//! ```rust
//! use shopify_installer::auth::oauth::hmac::{compute_signature, constant_time_compare};
//!
//! let sig = compute_signature("code=abc&shop=foo.myshopify.com", "secret");
//! assert_eq!(sig.len(), 64);
//! assert!(constant_time_compare(&sig, &sig.clone()));
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::auth::oauth::CallbackParams;
use crate::config::AppConfig;

type HmacSha256 = Hmac<Sha256>;

/// Computes a lowercase hex HMAC-SHA256 of `message` keyed with `secret`.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Compares two strings in constant time.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Returns `true` if the callback's `hmac` matches its other parameters
/// under the current or the old API secret.
#[must_use]
pub fn validate_hmac(params: &CallbackParams, config: &AppConfig) -> bool {
    let Some(received) = params.hmac() else {
        return false;
    };
    let signable = params.to_signable_string();

    std::iter::once(config.api_secret_key())
        .chain(config.old_api_secret_key())
        .any(|secret| constant_time_compare(&compute_signature(&signable, secret.as_ref()), received))
}
