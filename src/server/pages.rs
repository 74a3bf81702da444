//! HTML pages shown at the end of the install flow.

use askama::Template;

use crate::auth::ShopDomain;

/// Shown after a successful install.
#[derive(Template)]
#[template(path = "install_success.html")]
pub struct InstallSuccessPage<'a> {
    pub shop: &'a str,
    pub admin_apps_url: String,
}

impl<'a> InstallSuccessPage<'a> {
    pub fn new(shop: &'a ShopDomain) -> Self {
        Self {
            shop: shop.as_ref(),
            admin_apps_url: shop.admin_apps_url(),
        }
    }
}

/// Shown when the callback fails. `message` must be a public message,
/// never internal error text.
#[derive(Template)]
#[template(path = "install_failed.html")]
pub struct InstallFailedPage<'a> {
    pub message: &'a str,
}
