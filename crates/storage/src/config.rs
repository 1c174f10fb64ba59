use serde::Deserialize;

const DEFAULT_API_VERSION: &str = "2021-10-21";

/// Where the content store lives. Passed explicitly to everything that
/// talks to the store or its image CDN.
#[derive(Debug, Clone, Deserialize)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub use_cdn: bool,
    #[serde(default)]
    pub token: Option<String>,
    /// Overrides the derived API host, e.g. for a local mock.
    #[serde(default)]
    pub api_host: Option<String>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

impl CmsConfig {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            api_version: default_api_version(),
            use_cdn: false,
            token: None,
            api_host: None,
        }
    }

    pub fn api_base(&self) -> String {
        if let Some(host) = &self.api_host {
            return host.trim_end_matches('/').to_string();
        }
        let domain = if self.use_cdn { "apicdn" } else { "api" };
        format!("https://{}.{}.sanity.io", self.project_id, domain)
    }

    pub fn query_url(&self) -> String {
        let version = self.api_version.trim_start_matches('v');
        format!(
            "{}/v{}/data/query/{}",
            self.api_base(),
            version,
            self.dataset
        )
    }
}
