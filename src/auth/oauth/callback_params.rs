//! Query parameters of the OAuth callback.

use serde::Deserialize;
use std::collections::BTreeMap;

/// All query parameters received on the OAuth callback.
///
/// Every parameter is kept (not just `code`, `shop`, and `state`) because
/// the callback HMAC covers the full query. Keys are held sorted, which is
/// the order the signature is computed over.
///
/// # Example
///
/// ```rust
/// use shopify_installer::auth::oauth::CallbackParams;
///
/// let params = CallbackParams::from_pairs([
///     ("shop", "foo.myshopify.com"),
///     ("code", "abc"),
///     ("hmac", "ignored-in-signable"),
/// ]);
/// assert_eq!(params.code(), Some("abc"));
/// assert_eq!(params.to_signable_string(), "code=abc&shop=foo.myshopify.com");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CallbackParams(BTreeMap<String, String>);

impl CallbackParams {
    /// Builds parameters from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Sets a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns a non-empty parameter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The one-time authorization code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.get("code")
    }

    /// The shop identifier.
    #[must_use]
    pub fn shop(&self) -> Option<&str> {
        self.get("shop")
    }

    /// The echoed anti-forgery token.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.get("state")
    }

    /// The platform's signature over the other parameters.
    #[must_use]
    pub fn hmac(&self) -> Option<&str> {
        self.get("hmac")
    }

    /// Returns the string the callback HMAC is computed over: every
    /// parameter except `hmac` and `signature`, sorted by key, joined as
    /// `key=value` pairs with `&`.
    #[must_use]
    pub fn to_signable_string(&self) -> String {
        self.0
            .iter()
            .filter(|(k, _)| k.as_str() != "hmac" && k.as_str() != "signature")
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_count_as_missing() {
        let params = CallbackParams::from_pairs([("code", ""), ("shop", "foo.myshopify.com")]);
        assert_eq!(params.code(), None);
        assert_eq!(params.shop(), Some("foo.myshopify.com"));
        assert_eq!(params.state(), None);
    }

    #[test]
    fn test_signable_string_is_sorted_and_excludes_signatures() {
        let params = CallbackParams::from_pairs([
            ("timestamp", "1700000000"),
            ("state", "s"),
            ("signature", "legacy"),
            ("hmac", "h"),
            ("code", "c"),
        ]);
        assert_eq!(
            params.to_signable_string(),
            "code=c&state=s&timestamp=1700000000"
        );
    }

    #[test]
    fn test_deserializes_from_map() {
        let params: CallbackParams =
            serde_json::from_str(r#"{"code":"abc","shop":"foo.myshopify.com","extra":"1"}"#)
                .unwrap();
        assert_eq!(params.code(), Some("abc"));
        assert_eq!(params.get("extra"), Some("1"));
    }
}
