//! Shared test constants

/// Component used by the end-to-end scenarios
pub const X_NAME: &str = "x";
pub const X_VERSION: &str = "1.0";
pub const X_NEXT_VERSION: &str = "1.1";
pub const X_ZIP_PATH: &str = "/x-1.0.zip";
pub const X_NEXT_ZIP_PATH: &str = "/x-1.1.zip";

/// Single-file component
pub const TOOL_NAME: &str = "tool";
pub const TOOL_VERSION: &str = "2.0.0";
pub const TOOL_PHAR_PATH: &str = "/download/2.0.0/tool.phar";

pub const FAKE_EXE: &[u8] = b"MZ fake executable";
pub const FAKE_PHAR: &[u8] = b"<?php echo 'tool'; __HALT_COMPILER();";
