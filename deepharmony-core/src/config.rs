use std::{env, sync::OnceLock};

pub const DEFAULT_GRAPH_NAME: &str = "default";

const GRAPH_NAME_VAR: &str = "DEEPHARMONY_GRAPH_NAME";
const UNIQUE_NAMES_VAR: &str = "DEEPHARMONY_UNIQUE_NAMES";

static ENV_CONFIG: OnceLock<GraphConfig> = OnceLock::new();

/// Construction-time settings of a [`crate::Graph`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphConfig {
    pub name: String,
    /// Rename colliding tensor names to `name_1`, `name_2`, ... instead of failing.
    pub unique_names: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_GRAPH_NAME.to_string(),
            unique_names: false,
        }
    }
}

impl GraphConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn unique_names(mut self, unique_names: bool) -> Self {
        self.unique_names = unique_names;
        self
    }

    /// The configuration used for the lazily created default graph.
    ///
    /// Read once per process from `DEEPHARMONY_GRAPH_NAME` and
    /// `DEEPHARMONY_UNIQUE_NAMES`.
    pub fn from_env() -> Self {
        ENV_CONFIG
            .get_or_init(|| {
                Self::from_vars(
                    env::var(GRAPH_NAME_VAR).ok().as_deref(),
                    env::var(UNIQUE_NAMES_VAR).ok().as_deref(),
                )
            })
            .clone()
    }

    fn from_vars(name: Option<&str>, unique_names: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            config.name = name.to_string();
        }
        if let Some(value) = unique_names.filter(|v| !v.trim().is_empty()) {
            config.unique_names = parse_bool(value);
        }
        config
    }
}

fn parse_bool(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.name, "default");
        assert!(!config.unique_names);
    }

    #[test]
    fn vars_override_defaults() {
        let config = GraphConfig::from_vars(Some(" mnist "), Some("YES"));
        assert_eq!(config, GraphConfig::new("mnist").unique_names(true));
    }

    #[test]
    fn blank_vars_are_ignored() {
        let config = GraphConfig::from_vars(Some("  "), Some(""));
        assert_eq!(config, GraphConfig::default());
        assert!(!GraphConfig::from_vars(None, Some("off")).unique_names);
    }
}
