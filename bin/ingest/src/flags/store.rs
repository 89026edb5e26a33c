//! Persistent store arguments.

use clap::Args;
use insight_storage::PostgrestConfig;
use url::Url;

/// Host fragment of the template project URL that ships in example environments.
const PLACEHOLDER_PROJECT: &str = "your-project";

/// Connection to the PostgREST endpoint of the block store.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct StoreArgs {
    /// Project URL of the store.
    #[arg(long = "store.url", env = "SUPABASE_URL")]
    pub(crate) url: Option<Url>,
    /// Service key of the store.
    #[arg(long = "store.key", env = "SUPABASE_SERVICE_KEY", hide_env_values = true)]
    pub(crate) key: Option<String>,
    /// Table holding the blocks.
    #[arg(long = "store.table", default_value = PostgrestConfig::DEFAULT_TABLE)]
    pub(crate) table: String,
}

impl StoreArgs {
    /// Returns the store configuration, or `None` when the store is not configured.
    ///
    /// A missing URL or key, or the placeholder project URL, leaves the store unconfigured.
    pub(crate) fn config(&self) -> Option<PostgrestConfig> {
        let url = self.url.as_ref().filter(|url| {
            !url.host_str().is_some_and(|host| host.contains(PLACEHOLDER_PROJECT))
        })?;
        let key = self.key.as_deref().filter(|key| !key.is_empty())?;

        let mut config = PostgrestConfig::new(url.clone(), key);
        config.table = self.table.clone();
        Some(config)
    }
}
