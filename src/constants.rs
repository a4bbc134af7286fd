//! Crate-wide constants.

/// Session manager defaults.
pub mod session {
    /// Directory under the host's data folder that holds schematic files.
    pub const SCHEMATICS_DIR: &str = "schematics";
}

/// Format detection tuning.
pub mod detection {
    /// Number of leading bytes handed to content probes.
    pub const PROBE_BYTES: usize = 64;
}

/// Scheduler sizing.
pub mod scheduling {
    /// Upper bound on the default background worker pool size.
    pub const MAX_DEFAULT_WORKERS: usize = 4;
}
