//! Configuration for the validation boundary.

use std::path::PathBuf;

/// Module that hosts the validation callable.
pub const DEFAULT_MODULE: &str = "nac";

/// Callable resolved by fixed name inside the module.
pub const DEFAULT_ENTRY_POINT: &str = "generate_validation_data";

/// Deployment-relative directory holding the module and its data files.
pub const DEFAULT_MODULE_DIR: &str = "emulated";

/// Device metadata file the module reads from its directory.
///
/// The boundary never opens this file itself; the path exists so hosts can
/// stage and diagnose the deployment layout.
pub const DATA_PLIST_FILE: &str = "data.plist";

/// Binary image the module reads from its directory.
pub const BINARY_IMAGE_FILE: &str = "IMDAppleServices";

/// Configuration for the validation boundary.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Directory prepended to the interpreter's module search path.
    pub module_dir: PathBuf,
    /// Module that hosts the validation callable.
    pub module: String,
    /// Entry-point callable, invoked with no arguments.
    pub entry_point: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            module_dir: DEFAULT_MODULE_DIR.into(),
            module: DEFAULT_MODULE.into(),
            entry_point: DEFAULT_ENTRY_POINT.into(),
        }
    }
}

impl BridgeConfig {
    /// Create a configuration with the default deployment layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the module search directory.
    #[must_use]
    pub fn module_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.module_dir = dir.into();
        self
    }

    /// Set the module name.
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Set the entry-point callable name.
    #[must_use]
    pub fn entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    /// Path of the device metadata file inside the module directory.
    #[must_use]
    pub fn data_plist_path(&self) -> PathBuf {
        self.module_dir.join(DATA_PLIST_FILE)
    }

    /// Path of the binary image inside the module directory.
    #[must_use]
    pub fn binary_image_path(&self) -> PathBuf {
        self.module_dir.join(BINARY_IMAGE_FILE)
    }
}
