//! Build master status clients.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use super::{fetch, join_url};
use crate::error::NetError;
use crate::ports::Web;

/// One builder's state on the build master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderStatus {
    /// Builder name.
    pub name: String,
    /// Raw state: `idle`, `building`, `offline`, ...
    pub state: String,
}

impl BuilderStatus {
    /// A builder is green when it is connected and not failing to start.
    #[must_use]
    pub fn is_green(&self) -> bool {
        matches!(self.state.as_str(), "idle" | "building")
    }
}

#[derive(Deserialize)]
struct BuilderJson {
    #[serde(default)]
    state: String,
}

/// Client for a build master's JSON status API.
pub struct BuildBot {
    base_url: String,
    web: Arc<dyn Web>,
}

impl BuildBot {
    /// Creates a client for `base_url`. Performs no I/O.
    #[must_use]
    pub fn new(base_url: impl Into<String>, web: Arc<dyn Web>) -> Self {
        Self { base_url: base_url.into(), web }
    }

    /// Base URL of the master.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// All builders, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the master cannot be reached or answers with
    /// unexpected JSON.
    pub fn builder_statuses(&self) -> Result<Vec<BuilderStatus>, NetError> {
        let url = join_url(&self.base_url, "json/builders");
        let body = fetch(self.web.as_ref(), &url)?;
        let builders: BTreeMap<String, BuilderJson> = serde_json::from_str(&body)
            .map_err(|e| NetError::Decode { url: url.clone(), message: e.to_string() })?;
        Ok(builders
            .into_iter()
            .map(|(name, builder)| BuilderStatus { name, state: builder.state })
            .collect())
    }

    /// Returns `true` if every builder is green.
    ///
    /// # Errors
    ///
    /// Propagates [`BuildBot::builder_statuses`] failures.
    pub fn all_builders_are_green(&self) -> Result<bool, NetError> {
        Ok(self.builder_statuses()?.iter().all(BuilderStatus::is_green))
    }
}

/// The Chromium master that runs WebKit canaries.
pub struct ChromiumBuildBot {
    inner: BuildBot,
}

impl ChromiumBuildBot {
    /// Creates a client for the Chromium master at `base_url`. Performs no I/O.
    #[must_use]
    pub fn new(base_url: impl Into<String>, web: Arc<dyn Web>) -> Self {
        Self { inner: BuildBot::new(base_url, web) }
    }

    /// The generic client underneath.
    #[must_use]
    pub fn buildbot(&self) -> &BuildBot {
        &self.inner
    }

    /// Builders whose name mentions WebKit.
    ///
    /// # Errors
    ///
    /// Propagates [`BuildBot::builder_statuses`] failures.
    pub fn webkit_builders(&self) -> Result<Vec<BuilderStatus>, NetError> {
        Ok(self
            .inner
            .builder_statuses()?
            .into_iter()
            .filter(|b| b.name.contains("WebKit"))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::testing::CannedWeb;

    const BUILDERS: &str = r#"{
        "SnowLeopard Intel Release (Tests)": {"state": "building", "basedir": "x"},
        "GTK Linux 64-bit Debug": {"state": "offline"},
        "Apple Lion Release (Build)": {"state": "idle"}
    }"#;

    #[test]
    fn statuses_are_sorted_and_classified() {
        let web = CannedWeb::default().with_page("https://build.webkit.org/json/builders", BUILDERS);
        let bot = BuildBot::new("https://build.webkit.org", Arc::new(web));

        let statuses = bot.builder_statuses().unwrap();
        let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Apple Lion Release (Build)", "GTK Linux 64-bit Debug", "SnowLeopard Intel Release (Tests)"]
        );
        assert!(statuses[0].is_green());
        assert!(!statuses[1].is_green());
        assert!(!bot.all_builders_are_green().unwrap());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let web = CannedWeb::default().with_page("https://build.webkit.org/json/builders", "<html>");
        let bot = BuildBot::new("https://build.webkit.org", Arc::new(web));
        assert!(matches!(bot.builder_statuses(), Err(NetError::Decode { .. })));
    }

    #[test]
    fn chromium_filters_webkit_builders() {
        let body = r#"{"Webkit Linux": {"state": "idle"}, "WebKit Mac10.6": {"state": "idle"}, "Linux Tests": {"state": "idle"}}"#;
        let web = CannedWeb::default()
            .with_page("https://build.chromium.org/p/chromium.webkit/json/builders", body);
        let bot = ChromiumBuildBot::new("https://build.chromium.org/p/chromium.webkit", Arc::new(web));
        let names: Vec<String> = bot.webkit_builders().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["WebKit Mac10.6"]);
    }
}
