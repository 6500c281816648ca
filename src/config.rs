//! Application configuration, loaded from environment variables.

use crate::constants;
use crate::types::{FieldOrientation, FieldSize, RouteErasePolicy};
use std::path::PathBuf;

/// Connection settings of the AI advisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    /// OpenAI-compatible chat completions URL
    pub endpoint: String,
    /// Bearer token, if the endpoint needs one
    pub api_key: Option<String>,
    pub model: String,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Field orientation, which fixes the coordinate space.
    pub orientation: FieldOrientation,
    /// Playbook every play is saved under.
    pub playbook_id: String,
    /// Directory of the native play store. Unused on the web.
    pub store_dir: PathBuf,
    /// Advisor settings; `None` leaves suggestions unconfigured.
    pub advisor: Option<AdvisorConfig>,
    /// What happens to routes when their player is erased.
    pub erase_policy: RouteErasePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PLAY_DESIGNER_ORIENTATION` - `landscape` (default) or `portrait`
    /// - `PLAY_DESIGNER_PLAYBOOK_ID` - playbook id (default: `my-playbook`)
    /// - `PLAY_DESIGNER_STORE_DIR` - native store directory (default: `./playbook-data`)
    /// - `PLAY_DESIGNER_AI_ENDPOINT` - chat completions URL; suggestions are disabled without it
    /// - `PLAY_DESIGNER_AI_API_KEY` - bearer token for the endpoint
    /// - `PLAY_DESIGNER_AI_MODEL` - model name (default: `gpt-4o-mini`)
    /// - `PLAY_DESIGNER_ERASE_ROUTES` - `near-start` (default) or `keep`
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let orientation = match var("PLAY_DESIGNER_ORIENTATION").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("portrait") => FieldOrientation::Portrait,
            Some(v) if !v.eq_ignore_ascii_case("landscape") => {
                log::warn!("unknown orientation {v:?}, using landscape");
                FieldOrientation::Landscape
            }
            _ => FieldOrientation::Landscape,
        };

        let playbook_id = var("PLAY_DESIGNER_PLAYBOOK_ID")
            .unwrap_or_else(|| constants::DEFAULT_PLAYBOOK_ID.to_string());

        let store_dir = var("PLAY_DESIGNER_STORE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./playbook-data"));

        let advisor = var("PLAY_DESIGNER_AI_ENDPOINT").map(|endpoint| AdvisorConfig {
            endpoint,
            api_key: var("PLAY_DESIGNER_AI_API_KEY"),
            model: var("PLAY_DESIGNER_AI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
        });

        let erase_policy = match var("PLAY_DESIGNER_ERASE_ROUTES").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("keep") => RouteErasePolicy::KeepRoutes,
            Some(v) if !v.eq_ignore_ascii_case("near-start") => {
                log::warn!("unknown route erase policy {v:?}, using near-start");
                RouteErasePolicy::default()
            }
            _ => RouteErasePolicy::default(),
        };

        AppConfig {
            orientation,
            playbook_id,
            store_dir,
            advisor,
            erase_policy,
        }
    }

    /// Logical field size for the configured orientation.
    pub fn field_size(&self) -> FieldSize {
        FieldSize::for_orientation(self.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.orientation, FieldOrientation::Landscape);
        assert_eq!(config.playbook_id, "my-playbook");
        assert_eq!(config.store_dir, PathBuf::from("./playbook-data"));
        assert!(config.advisor.is_none());
        assert_eq!(config.erase_policy, RouteErasePolicy::default());
        assert_eq!(config.field_size(), FieldSize::landscape());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PLAY_DESIGNER_ORIENTATION", "Portrait"),
            ("PLAY_DESIGNER_PLAYBOOK_ID", "spring"),
            ("PLAY_DESIGNER_AI_ENDPOINT", "http://localhost:8080/v1/chat/completions"),
            ("PLAY_DESIGNER_ERASE_ROUTES", "keep"),
        ]);
        assert_eq!(config.field_size(), FieldSize::portrait());
        assert_eq!(config.playbook_id, "spring");
        assert_eq!(config.erase_policy, RouteErasePolicy::KeepRoutes);

        let advisor = config.advisor.unwrap();
        assert_eq!(advisor.model, "gpt-4o-mini");
        assert!(advisor.api_key.is_none());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config(&[
            ("PLAY_DESIGNER_PLAYBOOK_ID", "  "),
            ("PLAY_DESIGNER_AI_ENDPOINT", ""),
        ]);
        assert_eq!(config.playbook_id, "my-playbook");
        assert!(config.advisor.is_none());
    }

    #[test]
    fn test_unknown_erase_policy_uses_default() {
        let config1 = config(&[("PLAY_DESIGNER_ERASE_ROUTES", "sometimes")]);
        assert_eq!(config1.erase_policy, RouteErasePolicy::default());

        let config2 = config(&[("PLAY_DESIGNER_ERASE_ROUTES", "Near-Start")]);
        assert_eq!(config2.erase_policy, RouteErasePolicy::default());
    }
}
