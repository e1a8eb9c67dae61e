//! Layout-test ports: per-platform configuration for running and
//! baselining layout tests.

use std::path::{Path, PathBuf};

use crate::error::PortFactoryError;
use crate::host::HostServices;

/// Static description of one known port.
struct KnownPort {
    name: &'static str,
    operating_system: &'static str,
    baseline_search_path: &'static [&'static str],
}

const PORTS: &[KnownPort] = &[
    KnownPort { name: "mac", operating_system: "mac", baseline_search_path: &["mac"] },
    KnownPort { name: "win", operating_system: "win", baseline_search_path: &["win", "mac"] },
    KnownPort { name: "gtk", operating_system: "linux", baseline_search_path: &["gtk"] },
    KnownPort { name: "qt", operating_system: "linux", baseline_search_path: &["qt"] },
    KnownPort { name: "efl", operating_system: "linux", baseline_search_path: &["efl"] },
    KnownPort {
        name: "chromium-mac",
        operating_system: "mac",
        baseline_search_path: &["chromium-mac", "chromium", "mac"],
    },
    KnownPort {
        name: "chromium-win",
        operating_system: "win",
        baseline_search_path: &["chromium-win", "chromium", "win", "mac"],
    },
    KnownPort {
        name: "chromium-linux",
        operating_system: "linux",
        baseline_search_path: &["chromium-linux", "chromium-win", "chromium", "win", "mac"],
    },
    KnownPort { name: "test", operating_system: "test", baseline_search_path: &["test"] },
];

/// A layout-test port bound to the host's environment services.
pub struct Port {
    known: &'static KnownPort,
    services: HostServices,
}

impl Port {
    /// Port name, e.g. `chromium-linux`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.known.name
    }

    /// Operating system the port targets.
    #[must_use]
    pub fn operating_system(&self) -> &'static str {
        self.known.operating_system
    }

    /// Platform directories searched for expected results, most specific first.
    #[must_use]
    pub fn baseline_search_path(&self) -> Vec<&'static str> {
        self.known.baseline_search_path.to_vec()
    }

    /// How many test drivers to run in parallel by default.
    #[must_use]
    pub fn default_child_processes(&self) -> usize {
        self.services.executive.cpu_count().max(1)
    }

    /// `LayoutTests` directory inside a checkout.
    #[must_use]
    pub fn layout_tests_dir(&self, checkout_root: &Path) -> PathBuf {
        checkout_root.join("LayoutTests")
    }

    /// Platform baseline directories that exist in the checkout.
    #[must_use]
    pub fn existing_baseline_dirs(&self, checkout_root: &Path) -> Vec<PathBuf> {
        let platform = self.layout_tests_dir(checkout_root).join("platform");
        self.known
            .baseline_search_path
            .iter()
            .map(|dir| platform.join(dir))
            .filter(|dir| self.services.filesystem.is_dir(dir))
            .collect()
    }
}

impl std::fmt::Debug for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Port").field("name", &self.known.name).finish_non_exhaustive()
    }
}

/// Builds [`Port`]s.
///
/// Holds the host's environment capabilities rather than the host itself,
/// so ports can be created without a reference cycle.
#[derive(Clone)]
pub struct PortFactory {
    services: HostServices,
}

impl PortFactory {
    /// Creates a factory over `services`. Performs no I/O.
    #[must_use]
    pub fn new(services: HostServices) -> Self {
        Self { services }
    }

    /// Every port name the factory knows.
    #[must_use]
    pub fn all_port_names(&self) -> Vec<&'static str> {
        PORTS.iter().map(|p| p.name).collect()
    }

    /// Returns the named port, or the platform's default when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown port name.
    pub fn get(&self, name: Option<&str>) -> Result<Port, PortFactoryError> {
        let wanted = name.map_or_else(|| self.default_port_name(), ToString::to_string);
        let known = PORTS.iter().find(|p| p.name == wanted).ok_or_else(|| {
            PortFactoryError::UnknownPort { name: wanted.clone(), known: self.all_port_names().join(", ") }
        })?;
        tracing::debug!(port = known.name, "port selected");
        Ok(Port { known, services: self.services.clone() })
    }

    fn default_port_name(&self) -> String {
        let platform = &self.services.platform;
        if platform.is_mac() {
            "mac".to_string()
        } else if platform.is_win() {
            "win".to_string()
        } else {
            "chromium-linux".to_string()
        }
    }
}
