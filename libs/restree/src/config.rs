use restree_query::{DEFAULT_COUNT, QueryLimits};
use serde::{Deserialize, Serialize};

/// Dispatcher settings. Every field has a default, so partial configs deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Largest request body the HTTP adapter buffers (default: 16 MiB)
    pub max_body_bytes: usize,
    /// Page size when a listing request names none (default: 20)
    pub default_count: u64,
    pub limits: QueryLimits,
    /// Honor `_method` / `X-Method-Override` (default: true)
    pub method_override: bool,
    /// Pretty-print JSON when the request has no `pretty` flag (default: false)
    pub pretty: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 16 * 1024 * 1024,
            default_count: DEFAULT_COUNT,
            limits: QueryLimits::default(),
            method_override: true,
            pretty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ServeConfig::default();
        assert_eq!(cfg.default_count, 20);
        assert!(cfg.method_override);
        assert!(!cfg.pretty);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: ServeConfig =
            serde_json::from_str(r#"{"pretty": true, "limits": {"max_count": 5}}"#).unwrap();
        assert!(cfg.pretty);
        assert_eq!(cfg.limits.max_count, 5);
        assert_eq!(cfg.limits.max_filters, 16);
        assert_eq!(cfg.max_body_bytes, 16 * 1024 * 1024);
    }
}
