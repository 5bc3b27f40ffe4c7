use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Business profile stored under the `settings` key.
///
/// Fields this crate does not interpret (price catalog, passcode, UI preferences) are kept
/// in `extra` so that a backup taken here restores them untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "Settings::default_business_name", alias = "appName")]
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            business_name: Self::default_business_name(),
            phone: None,
            extra: Map::new(),
        }
    }
}

impl Settings {
    pub fn default_business_name() -> String {
        "My Business".into()
    }

    /// Supplier names kept inside settings by older documents.
    pub fn legacy_suppliers(&self) -> Vec<String> {
        self.extra
            .get("suppliers")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}
