// Centralized environment variable keys to avoid repeated string literals.

pub const ENV_XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";
pub const ENV_HOME: &str = "HOME";
pub const ENV_SITEMAP_URL: &str = "SITEMAP_URL";
pub const ENV_GC_SITE_URL: &str = "GC_SITE_URL";
pub const ENV_GC_ACCESS_TOKEN: &str = "GC_ACCESS_TOKEN";
pub const ENV_MOCK_SITEMAP: &str = "SITEMAP_INSPECT_MOCK_SITEMAP";
pub const ENV_MOCK_INSPECT: &str = "SITEMAP_INSPECT_MOCK_INSPECT";
