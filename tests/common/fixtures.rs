//! Test fixtures - reusable content constants for tests.

/// Settings template appended to every release
pub const BASE_SETTINGS_TEMPLATE: &str = "STATIC_URL = '/{{ static_link }}/'\nHOST = '{{ host }}'\n";

/// Settings module shipped inside the build
pub const SETTINGS_MODULE: &str = "DEBUG = False\n";

pub const APP_SOURCE: &str = "print('hello')\n";

pub const APP_CSS: &str = "body { color: black; }\n";

/// Files git should never see
pub const GITIGNORE: &str = "build/\n.shipyard/\n";

/// Config for a single `local` host named `dev`; `{base}` is replaced
pub const LOCAL_CONFIG: &str = r#"
[deploy]
base_remote_path = "{base}"
max_keep = 3

[hosts.dev]
address = "local"
platform = "debian"
"#;
