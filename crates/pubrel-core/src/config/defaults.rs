//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "pubrel.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "pubrel.yaml";

/// Packages of the minigpu family, in release order
pub const DEFAULT_PACKAGES: &[&str] = &[
    "minigpu",
    "minigpu_platform_interface",
    "minigpu_ffi",
    "minigpu_web",
    "gpu_tensor",
];

/// Manifest file inside each package directory
pub const DEFAULT_MANIFEST_FILE: &str = "pubspec.yaml";

/// Changelog file inside each package directory
pub const DEFAULT_CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Publish executable
pub const DEFAULT_PUBLISH_COMMAND: &str = "dart";

/// Arguments for the publish executable
pub const DEFAULT_PUBLISH_ARGS: &[&str] = &["pub", "publish", "--skip-validation"];

/// Answer fed to the publish confirmation prompt
pub const DEFAULT_PUBLISH_STDIN: &str = "y\n";

/// Publish timeout (5 minutes)
pub const DEFAULT_PUBLISH_TIMEOUT_SECS: u64 = 300;

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".pubrel.toml",
        ".pubrel.yaml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# pubrel configuration

packages = ["minigpu", "minigpu_platform_interface", "minigpu_ffi", "minigpu_web", "gpu_tensor"]
manifest_file = "pubspec.yaml"
changelog_file = "CHANGELOG.md"

[publish]
command = "dart"
args = ["pub", "publish", "--skip-validation"]
stdin = "y\n"
timeout_secs = 300
"#;
