//! Crowdin app descriptor.
//!
//! Tells Crowdin how to install the app: identifier, OAuth client, lifecycle
//! events, scopes, and the editor/QA modules it provides.

use serde_json::{json, Value};

use crate::config::Config;

pub const QA_CHECK_URL: &str = "/api/qa/text-length-check";
pub const BATCH_SIZE_URL: &str = "/api/qa/batch-size";
pub const PANEL_URL: &str = "/length-checker";
pub const INSTALLED_URL: &str = "/events/installed";
pub const UNINSTALL_URL: &str = "/events/uninstall";
pub const LOGO_URL: &str = "/logo.svg";

pub fn build_manifest(config: &Config) -> Value {
    json!({
        "identifier": config.app_identifier,
        "name": config.app_name,
        "baseUrl": config.base_url,
        "logo": LOGO_URL,
        "authentication": {
            "type": "crowdin_app",
            "clientId": config.crowdin_client_id,
        },
        "events": {
            "installed": INSTALLED_URL,
            "uninstall": UNINSTALL_URL,
        },
        "scopes": ["project"],
        "modules": {
            "editor-translations-panel": [{
                "key": "length-checker",
                "name": "Length Checker",
                "modes": ["translate", "review"],
                "url": PANEL_URL,
            }],
            "editor-right-panel": [{
                "key": "length-checker-right-panel",
                "name": "Length Checker",
                "modes": ["translate", "review"],
                "url": PANEL_URL,
            }],
            "external-qa-check": [{
                "key": "text-length-qa-check",
                "name": "Text Length QA Check",
                "runQaCheckUrl": QA_CHECK_URL,
                "getBatchSizeUrl": BATCH_SIZE_URL,
            }],
        },
    })
}
