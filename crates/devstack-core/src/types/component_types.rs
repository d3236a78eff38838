//! Component descriptor types
//!
//! A [`ComponentDescriptor`] is the static description of one supported
//! tool: where its versions live, which distribution shape it ships in and
//! how its main executable is finalized. Descriptors are plain data; the
//! engine interprets them.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::substitute_version;

/// Component-specific step run after the generic install succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostInstallHook {
    /// Nothing to do
    #[default]
    None,

    /// Write php.ini, enable allow-listed extensions and version php-cgi
    PhpIni,

    /// Version the bundled npm/npx launchers after the npm release they ship
    NodeShortcuts,
}

/// Static description of one supported tool
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentDescriptor {
    name: String,

    /// Human readable name
    pub label: String,

    /// Root directory holding every installed version of this tool
    pub tool_dir: PathBuf,

    /// Download is a zip archive
    pub is_archive: bool,

    /// Tool has a main executable worth finalizing
    pub is_executable: bool,

    /// Tool is used from a shell
    pub is_command_line: bool,

    /// Tool runs as a background service
    pub is_service: bool,

    /// Download is a native installer that must be executed
    pub run_installer: bool,

    /// Folder, relative to the version directory, holding the executable
    pub executable_folder: Option<String>,

    /// Executable file name, may contain `{version}`
    pub executable_pattern: Option<String>,

    /// Version directory name override, may contain `{version}`
    pub sub_directory: Option<String>,

    /// Copy the finalized executable into `<tool_dir>/bin`
    pub create_bin_shortcut: bool,

    /// Rename the executable to `<name>-<version>.<ext>`
    pub rename_exe_after_install: bool,

    /// Installer argument template, supports `{version}` and `{target_dir}`
    pub installer_args: Option<String>,

    /// Process image name used when the tool runs as a service
    pub service_pattern: Option<String>,

    /// Worker processes started for services
    pub max_workers: Option<u32>,

    /// Component-specific post-install step
    pub post_install: PostInstallHook,
}

impl ComponentDescriptor {
    /// Create a descriptor with every capability flag off
    ///
    /// The name becomes a directory prefix verbatim, so it must be non-empty
    /// and free of path separators.
    pub fn new(name: impl Into<String>, tool_dir: impl Into<PathBuf>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;

        Ok(Self {
            label: name.clone(),
            name,
            tool_dir: tool_dir.into(),
            is_archive: false,
            is_executable: false,
            is_command_line: false,
            is_service: false,
            run_installer: false,
            executable_folder: None,
            executable_pattern: None,
            sub_directory: None,
            create_bin_shortcut: false,
            rename_exe_after_install: false,
            installer_args: None,
            service_pattern: None,
            max_workers: None,
            post_install: PostInstallHook::None,
        })
    }

    /// Catalog key and directory prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn archive(mut self) -> Self {
        self.is_archive = true;
        self
    }

    pub fn installer(mut self, args: impl Into<String>) -> Self {
        self.run_installer = true;
        self.installer_args = Some(args.into());
        self
    }

    /// Installer arguments used only when the URL itself is a native installer
    pub fn with_installer_args(mut self, args: impl Into<String>) -> Self {
        self.installer_args = Some(args.into());
        self
    }

    /// Mark as executable with the given file pattern
    pub fn executable(mut self, pattern: impl Into<String>) -> Self {
        self.is_executable = true;
        self.executable_pattern = Some(pattern.into());
        self
    }

    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.executable_folder = Some(folder.into());
        self
    }

    pub fn command_line(mut self) -> Self {
        self.is_command_line = true;
        self
    }

    pub fn with_bin_shortcut(mut self) -> Self {
        self.create_bin_shortcut = true;
        self
    }

    pub fn renaming_exe(mut self) -> Self {
        self.rename_exe_after_install = true;
        self
    }

    pub fn service(mut self, pattern: impl Into<String>, max_workers: Option<u32>) -> Self {
        self.is_service = true;
        self.service_pattern = Some(pattern.into());
        self.max_workers = max_workers;
        self
    }

    pub fn with_sub_directory(mut self, sub_directory: impl Into<String>) -> Self {
        self.sub_directory = Some(sub_directory.into());
        self
    }

    pub fn with_hook(mut self, hook: PostInstallHook) -> Self {
        self.post_install = hook;
        self
    }

    /// Version directory name, `<name>-<version>` unless overridden
    pub fn sub_dir(&self, version: &str) -> String {
        match &self.sub_directory {
            Some(pattern) => substitute_version(pattern, version),
            None => format!("{}-{}", self.name, version),
        }
    }

    /// Version-specific install root
    pub fn target_dir(&self, version: &str) -> PathBuf {
        self.tool_dir.join(self.sub_dir(version))
    }

    /// Shared shortcut directory
    pub fn bin_dir(&self) -> PathBuf {
        self.tool_dir.join("bin")
    }

    /// Executable path relative to the version directory
    pub fn executable_relative_path(&self, version: &str) -> Option<PathBuf> {
        let pattern = self.executable_pattern.as_deref()?;
        let file = substitute_version(pattern, version);
        Some(match &self.executable_folder {
            Some(folder) => Path::new(folder).join(file),
            None => PathBuf::from(file),
        })
    }

    /// Installer arguments with placeholders substituted
    pub fn render_installer_args(&self, version: &str, target_dir: &Path) -> Option<String> {
        self.installer_args.as_deref().map(|template| {
            substitute_version(template, version)
                .replace("{target_dir}", &target_dir.display().to_string())
        })
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_component(name, "name must not be empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::invalid_component(
            name,
            "name must not contain path separators",
        ));
    }
    Ok(())
}
