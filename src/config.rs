use serde::Deserialize;

use crate::error::{TiqError, TiqResult};
use crate::session::Credentials;

/// API host used until the auth endpoint redirects to another one.
pub const DEFAULT_API_HOST: &str = "platform.tealiumapis.com";
pub const DEFAULT_HISTORY_DIR: &str = "history";
pub const DEFAULT_EXTENSIONS_DIR: &str = "extensions";

/// Everything a run needs: where to connect, who to authenticate as, and
/// where artifacts land inside the output store.
#[derive(Clone, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_api_host")]
    pub api_host: String,
    pub account: String,
    pub profile: String,
    pub username: String,
    pub key: String,
    #[serde(default = "default_history_dir")]
    pub history_dir: String,
    #[serde(default = "default_extensions_dir")]
    pub extensions_dir: String,
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

fn default_history_dir() -> String {
    DEFAULT_HISTORY_DIR.to_string()
}

fn default_extensions_dir() -> String {
    DEFAULT_EXTENSIONS_DIR.to_string()
}

impl ExtractConfig {
    pub fn new(
        account: impl Into<String>,
        profile: impl Into<String>,
        username: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            api_host: default_api_host(),
            account: account.into(),
            profile: profile.into(),
            username: username.into(),
            key: key.into(),
            history_dir: default_history_dir(),
            extensions_dir: default_extensions_dir(),
        }
    }

    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    pub fn with_history_dir(mut self, dir: impl Into<String>) -> Self {
        self.history_dir = dir.into();
        self
    }

    pub fn with_extensions_dir(mut self, dir: impl Into<String>) -> Self {
        self.extensions_dir = dir.into();
        self
    }

    /// Reject configs that could never authenticate.
    pub fn validate(&self) -> TiqResult<()> {
        let required = [
            ("api_host", &self.api_host),
            ("account", &self.account),
            ("profile", &self.profile),
            ("username", &self.username),
            ("key", &self.key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(TiqError::Config(format!("{name} is required")));
            }
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            account: self.account.clone(),
            profile: self.profile.clone(),
            username: self.username.clone(),
            key: self.key.clone(),
        }
    }
}

impl std::fmt::Debug for ExtractConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractConfig")
            .field("api_host", &self.api_host)
            .field("account", &self.account)
            .field("profile", &self.profile)
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .field("history_dir", &self.history_dir)
            .field("extensions_dir", &self.extensions_dir)
            .finish()
    }
}
