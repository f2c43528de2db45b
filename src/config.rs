use clap::Args;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the CMS REST API.
#[derive(Args, Clone)]
pub struct CmsArgs {
    /// Base URL of the CMS REST API
    #[arg(long, global = true, env = "OPTIMIZELY_CMS_BASE_URL", default_value = "")]
    pub base_url: String,
    /// OAuth client id
    #[arg(long, global = true, env = "OPTIMIZELY_CMS_CLIENT_ID", default_value = "")]
    pub client_id: String,
    /// OAuth client secret
    #[arg(
        long,
        global = true,
        env = "OPTIMIZELY_CMS_CLIENT_SECRET",
        default_value = "",
        hide_env_values = true
    )]
    pub client_secret: String,
    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "OPTIMIZELY_CMS_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub timeout_secs: u64,
}

#[derive(Clone, PartialEq, Eq)]
pub struct CmsConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout: Duration,
}

impl CmsConfig {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }

    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl From<&CmsArgs> for CmsConfig {
    fn from(args: &CmsArgs) -> Self {
        CmsConfig::new(&args.base_url, &args.client_id, &args.client_secret)
            .with_timeout(Duration::from_secs(args.timeout_secs))
    }
}

impl fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmsConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("has_secret", &!self.client_secret.is_empty())
            .field("timeout", &self.timeout)
            .finish()
    }
}
