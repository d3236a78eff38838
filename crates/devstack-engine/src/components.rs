//! Built-in component table
//!
//! Every supported tool is a plain [`ComponentDescriptor`]; the differences
//! between tools are data, not subclasses. Each tool owns
//! `<base_dir>/<name>` exclusively.

use devstack_core::{ComponentDescriptor, Error, PostInstallHook, Result};
use std::path::Path;

/// Names of every built-in component, in display order
const BUILTIN_COMPONENTS: &[&str] = &[
    "php",
    "nginx",
    "mysql",
    "node",
    "python",
    "composer",
    "phpmyadmin",
    "git",
    "mongodb",
    "pgsql",
    "elasticsearch",
    "wpcli",
    "adminer",
    "go",
    "openssl",
    "phpcsfixer",
    "dbeaver",
];

pub fn all_names() -> &'static [&'static str] {
    BUILTIN_COMPONENTS
}

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_COMPONENTS.contains(&name)
}

/// Descriptor for a built-in component rooted at `<base_dir>/<name>`
pub fn descriptor(name: &str, base_dir: &Path) -> Result<ComponentDescriptor> {
    if !is_builtin(name) {
        return Err(Error::unknown_component(name));
    }

    let base = ComponentDescriptor::new(name, base_dir.join(name))?;

    let descriptor = match name {
        "php" => base
            .with_label("PHP")
            .archive()
            .executable("php.exe")
            .renaming_exe()
            .with_hook(PostInstallHook::PhpIni),
        "nginx" => base
            .with_label("Nginx")
            .archive()
            .service("nginx.exe", Some(1)),
        "mysql" => base
            .with_label("MySQL")
            .archive()
            .service("mysqld.exe", None),
        "node" => base
            .with_label("Node")
            .archive()
            .executable("node.exe")
            .command_line()
            .with_bin_shortcut()
            .with_hook(PostInstallHook::NodeShortcuts),
        "python" => base
            .with_label("Python")
            .archive()
            .executable("python.exe")
            .command_line()
            .with_bin_shortcut(),
        "composer" => base.with_label("Composer").command_line(),
        "phpmyadmin" => base.with_label("phpMyAdmin").archive(),
        "git" => base
            .with_label("Git")
            .archive()
            .with_installer_args("-y -o\"{target_dir}\""),
        "mongodb" => base
            .with_label("MongoDB")
            .archive()
            .service("mongod.exe", None),
        "pgsql" => base
            .with_label("PostgreSQL")
            .archive()
            .service("postgres.exe", Some(3)),
        "elasticsearch" => base
            .with_label("Elasticsearch")
            .archive()
            .service("elasticsearch.bat", None),
        "wpcli" => base.with_label("WP-CLI").command_line(),
        "adminer" => base.with_label("Adminer"),
        "go" => base
            .with_label("Go")
            .archive()
            .executable("go.exe")
            .in_folder("bin")
            .command_line()
            .with_bin_shortcut(),
        "openssl" => base
            .with_label("OpenSSL")
            .installer("/VERYSILENT /SUPPRESSMSGBOXES /NORESTART /DIR=\"{target_dir}\""),
        "phpcsfixer" => base.with_label("PHP CS Fixer").command_line(),
        "dbeaver" => base
            .with_label("DBeaver")
            .archive()
            .executable("dbeaver.exe")
            .with_bin_shortcut(),
        _ => return Err(Error::unknown_component(name)),
    };

    Ok(descriptor)
}

/// Descriptors for every built-in component
pub fn all(base_dir: &Path) -> Result<Vec<ComponentDescriptor>> {
    BUILTIN_COMPONENTS
        .iter()
        .map(|name| descriptor(name, base_dir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_every_builtin_builds() {
        let all = all(Path::new("/tools")).unwrap();
        assert_eq!(all.len(), 17);
        for desc in &all {
            assert_eq!(desc.tool_dir, PathBuf::from("/tools").join(desc.name()));
        }
    }

    #[test]
    fn test_unknown_component() {
        let err = descriptor("cobol", Path::new("/tools")).unwrap_err();
        assert!(matches!(err, Error::UnknownComponent { .. }));
        assert!(err.is_catalog());
    }

    #[test]
    fn test_php_and_node_hooks() {
        let php = descriptor("php", Path::new("/tools")).unwrap();
        assert_eq!(php.post_install, PostInstallHook::PhpIni);
        assert!(php.rename_exe_after_install);

        let node = descriptor("node", Path::new("/tools")).unwrap();
        assert_eq!(node.post_install, PostInstallHook::NodeShortcuts);
        assert!(node.create_bin_shortcut);
        assert!(!node.rename_exe_after_install);
    }

    #[test]
    fn test_openssl_runs_installer_into_target_dir() {
        let openssl = descriptor("openssl", Path::new("/tools")).unwrap();
        assert!(openssl.run_installer);
        let args = openssl
            .render_installer_args("3.1.8", &openssl.target_dir("3.1.8"))
            .unwrap();
        assert!(args.ends_with("/DIR=\"/tools/openssl/openssl-3.1.8\""));
    }

    #[test]
    fn test_go_executable_lives_in_bin_folder() {
        let go = descriptor("go", Path::new("/tools")).unwrap();
        assert_eq!(
            go.executable_relative_path("1.22.0"),
            Some(PathBuf::from("bin").join("go.exe"))
        );
    }
}
