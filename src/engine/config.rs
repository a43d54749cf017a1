//! Engine installation layout and environment checks

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use super::error::{EngineError, EngineResult};
use crate::core::env::getopt;

pub const SCAN_BINARY: &str = "t3scan_l64";
pub const UPDATE_BINARY: &str = "t3update_l64";
pub const ENGINE_LIBRARY: &str = "libT3_l64.so";
pub const LICENSE_FILE: &str = "t3cmd.ikkey";
pub const UPDATED_FILE: &str = "UPDATED";

/// Filesystem layout of the scanner installation and the plugin's own state.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the scanner binaries, library and license key
    pub install_dir: PathBuf,
    /// Directory holding plugin state (the UPDATED timestamp file)
    pub work_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("/opt/ikarus"),
            work_dir: PathBuf::from("/opt/malice"),
        }
    }
}

impl EngineConfig {
    /// Build a config from the environment, falling back to the stock layout.
    pub fn from_env() -> Self {
        Self {
            install_dir: PathBuf::from(getopt("IKARUS_INSTALL_DIR", "/opt/ikarus")),
            work_dir: PathBuf::from(getopt("MALICE_WORK_DIR", "/opt/malice")),
        }
    }

    pub fn scan_binary(&self) -> PathBuf {
        self.install_dir.join(SCAN_BINARY)
    }

    pub fn update_binary(&self) -> PathBuf {
        self.install_dir.join(UPDATE_BINARY)
    }

    pub fn license_file(&self) -> PathBuf {
        self.install_dir.join(LICENSE_FILE)
    }

    pub fn updated_file(&self) -> PathBuf {
        self.work_dir.join(UPDATED_FILE)
    }

    /// Verify the scanner library and both binaries exist and carry an
    /// execute permission bit. Violations are setup errors, fatal at the
    /// CLI boundary.
    pub fn check_binaries(&self) -> EngineResult<()> {
        for name in [ENGINE_LIBRARY, SCAN_BINARY, UPDATE_BINARY] {
            let path = self.install_dir.join(name);
            let metadata = std::fs::metadata(&path).map_err(|_| EngineError::BinaryMissing {
                path: path.display().to_string(),
            })?;
            if metadata.permissions().mode() & 0o001 == 0 {
                return Err(EngineError::NotExecutable {
                    binary: name.to_string(),
                });
            }
        }
        Ok(())
    }
}
