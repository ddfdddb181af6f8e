//! Configuration of the standard enrichers.

/// What to do when metadata resolvers of one component disagree on their category.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryMismatchPolicy {
    /// Keep the first category and emit a warning.
    #[default]
    Warn,
    /// Reject the model.
    Fail,
}

/// Configuration of the standard enrichers.
///
/// Names the infrastructure parameters the enrichers add and controls how
/// strictly markers are checked.
#[derive(Clone, Debug)]
pub struct EnrichmentConfig {
    /// Parameter letting a source run on every cluster node or only the primary.
    pub primary_node_only_parameter: String,

    /// Parameter selecting what a source does when the flow is saturated.
    pub back_pressure_parameter: String,

    /// Parameter selecting how streamed output is buffered.
    pub streaming_strategy_parameter: String,

    /// Parameter configuring reconnection of a connection provider.
    pub reconnection_parameter: String,

    /// Parameter configuring reconnection of a connected source.
    pub reconnection_strategy_parameter: String,

    /// Handling of diverging metadata categories.
    pub category_mismatch: CategoryMismatchPolicy,

    /// Reject custom stereotypes declared in another extension's namespace.
    pub strict_stereotype_namespaces: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            primary_node_only_parameter: "primaryNodeOnly".to_string(),
            back_pressure_parameter: "onCapacityOverload".to_string(),
            streaming_strategy_parameter: "streamingStrategy".to_string(),
            reconnection_parameter: "reconnection".to_string(),
            reconnection_strategy_parameter: "reconnectionStrategy".to_string(),
            category_mismatch: CategoryMismatchPolicy::Warn,
            strict_stereotype_namespaces: true,
        }
    }
}

impl EnrichmentConfig {
    /// Creates a configuration that turns every flagged divergence into an error.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            category_mismatch: CategoryMismatchPolicy::Fail,
            strict_stereotype_namespaces: true,
            ..Self::default()
        }
    }

    /// Creates a configuration that only warns and accepts foreign stereotypes.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            category_mismatch: CategoryMismatchPolicy::Warn,
            strict_stereotype_namespaces: false,
            ..Self::default()
        }
    }

    /// Builder method to set the metadata category mismatch policy.
    #[must_use]
    pub fn with_category_mismatch(mut self, policy: CategoryMismatchPolicy) -> Self {
        self.category_mismatch = policy;
        self
    }

    /// Builder method to enable/disable stereotype namespace checks.
    #[must_use]
    pub fn with_strict_stereotype_namespaces(mut self, strict: bool) -> Self {
        self.strict_stereotype_namespaces = strict;
        self
    }

    /// Builder method to rename the cluster support parameter.
    #[must_use]
    pub fn with_primary_node_only_parameter(mut self, name: impl Into<String>) -> Self {
        self.primary_node_only_parameter = name.into();
        self
    }

    /// Builder method to rename the back-pressure parameter.
    #[must_use]
    pub fn with_back_pressure_parameter(mut self, name: impl Into<String>) -> Self {
        self.back_pressure_parameter = name.into();
        self
    }

    /// Builder method to rename the streaming strategy parameter.
    #[must_use]
    pub fn with_streaming_strategy_parameter(mut self, name: impl Into<String>) -> Self {
        self.streaming_strategy_parameter = name.into();
        self
    }

    /// Builder method to rename the reconnection parameters.
    #[must_use]
    pub fn with_reconnection_parameters(
        mut self,
        provider: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        self.reconnection_parameter = provider.into();
        self.reconnection_strategy_parameter = source.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EnrichmentConfig::default();
        assert_eq!(config.primary_node_only_parameter, "primaryNodeOnly");
        assert_eq!(config.category_mismatch, CategoryMismatchPolicy::Warn);
        assert!(config.strict_stereotype_namespaces);
    }

    #[test]
    fn presets() {
        assert_eq!(EnrichmentConfig::strict().category_mismatch, CategoryMismatchPolicy::Fail);
        assert!(!EnrichmentConfig::lenient().strict_stereotype_namespaces);
    }

    #[test]
    fn builder_pattern() {
        let config = EnrichmentConfig::default()
            .with_category_mismatch(CategoryMismatchPolicy::Fail)
            .with_primary_node_only_parameter("primaryOnly")
            .with_reconnection_parameters("reconnect", "reconnectSource");

        assert_eq!(config.category_mismatch, CategoryMismatchPolicy::Fail);
        assert_eq!(config.primary_node_only_parameter, "primaryOnly");
        assert_eq!(config.reconnection_parameter, "reconnect");
        assert_eq!(config.reconnection_strategy_parameter, "reconnectSource");
    }
}
