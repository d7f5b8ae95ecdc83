// Wi-Fi settings, theme, and the persisted subset of store state

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiSettings {
    pub ssid: String,
    pub password: String,
}

impl Default for WifiSettings {
    fn default() -> Self {
        Self {
            ssid: "LiFi-Network".into(),
            password: String::new(),
        }
    }
}

/// Partial settings update; merge semantics like [`super::StatusPatch`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiSettingsPatch {
    pub ssid: Option<String>,
    pub password: Option<String>,
}

impl WifiSettingsPatch {
    pub fn apply_to(&self, settings: &mut WifiSettings) {
        if let Some(v) = &self.ssid {
            settings.ssid = v.clone();
        }
        if let Some(v) = &self.password {
            settings.password = v.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// The only state that survives a restart. Everything else (status, messages,
/// transmission flag) reinitializes to defaults each run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub theme: Theme,
    pub wifi_settings: WifiSettings,
}
