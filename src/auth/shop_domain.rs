//! Shop identifier validation.

use crate::auth::oauth::OAuthError;
use std::fmt;

/// A validated shop identifier such as `my-store.myshopify.com`.
///
/// Accepts exactly `^[a-zA-Z0-9][a-zA-Z0-9-]*\.myshopify\.com$`. The value
/// is kept byte-for-byte as supplied: no lowercasing and no expansion of a
/// bare shop name, so a state derived from it round-trips exactly.
///
/// # Example
///
/// ```rust
/// use shopify_installer::ShopDomain;
///
/// let shop = ShopDomain::parse("My-Store.myshopify.com").unwrap();
/// assert_eq!(shop.as_ref(), "My-Store.myshopify.com");
/// assert_eq!(shop.shop_name(), "My-Store");
///
/// assert!(ShopDomain::parse("my-store").is_err());
/// assert!(ShopDomain::parse("evil.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// The platform domain every shop identifier must end with.
    pub const SUFFIX: &'static str = ".myshopify.com";

    /// Validates a shop identifier.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidShopFormat`] if `shop` does not match
    /// the expected pattern.
    pub fn parse(shop: &str) -> Result<Self, OAuthError> {
        let valid = shop
            .strip_suffix(Self::SUFFIX)
            .is_some_and(Self::is_valid_shop_name);

        if valid {
            Ok(Self(shop.to_string()))
        } else {
            Err(OAuthError::InvalidShopFormat {
                shop: shop.to_string(),
            })
        }
    }

    /// Returns the shop name portion, e.g. `my-store`.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        &self.0[..self.0.len() - Self::SUFFIX.len()]
    }

    /// Returns the shop's admin app list, shown after a successful install.
    #[must_use]
    pub fn admin_apps_url(&self) -> String {
        format!("https://{}/admin/apps", self.0)
    }

    fn is_valid_shop_name(name: &str) -> bool {
        let mut chars = name.chars();
        chars
            .next()
            .is_some_and(|first| first.is_ascii_alphanumeric())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
