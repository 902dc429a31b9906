/// Project configuration file looked up in the project directory.
pub const PROJECT_FILE: &str = "project.json";

/// Default dependency manifest inside the frontend directory.
pub const DEFAULT_MANIFEST: &str = "package.json";

/// Extension appended to the manifest file name for its fingerprint record.
pub const FINGERPRINT_EXT: &str = "sha256";

/// File name the runtime bridge is written to inside the bridge directory.
pub const BRIDGE_FILE: &str = "runtimebridge.js";

pub const DEFAULT_COMPILER: &str = "go";

/// Linker symbol that receives the build mode string.
pub const DEFAULT_BUILD_MODE_SYMBOL: &str = "main.BuildMode";

/// Delay before the serve reminder is printed.
pub const SERVE_REMINDER_DELAY_SECS: u64 = 2;
