//! Planner configuration
//!
//! Loaded from TOML and validated before a [`Planner`](crate::Planner) is
//! built:
//!
//! ```toml
//! months = ["Jan", "Feb", "Mar"]
//! default_capacity = 20.0
//! group_window_months = 6
//!
//! [thresholds]
//! balanced = 80.0
//! over = 100.0
//! ```

use capgrid_model::{MonthError, MonthLabel, MonthSet, Quantity, QuantityError, DEFAULT_MONTHS};
use capgrid_store::MutationSettings;
use capgrid_view::{UtilizationThresholds, ViewSettings};
use serde::{Deserialize, Serialize};

/// Planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Ordered month vocabulary
    pub months: Vec<MonthLabel>,
    /// Capacity of cells created by an effort write
    pub default_capacity: f64,
    /// Leading months used for group averages
    pub group_window_months: usize,
    /// Capacity bucket boundaries (percent)
    pub thresholds: UtilizationThresholds,
}

impl PlannerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// Returns error if the document does not parse or fails validation
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        tracing::info!(
            months = config.months.len(),
            default_capacity = config.default_capacity,
            "planner config loaded"
        );
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// With a month vocabulary
    #[inline]
    #[must_use]
    pub fn with_months<I, S>(mut self, months: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.months = months.into_iter().map(MonthLabel::new).collect();
        self
    }

    /// With default capacity
    #[inline]
    #[must_use]
    pub fn with_default_capacity(mut self, capacity: f64) -> Self {
        self.default_capacity = capacity;
        self
    }

    /// With bucket thresholds
    #[inline]
    #[must_use]
    pub fn with_thresholds(mut self, balanced: f64, over: f64) -> Self {
        self.thresholds = UtilizationThresholds { balanced, over };
        self
    }

    /// With group window
    #[inline]
    #[must_use]
    pub fn with_group_window(mut self, months: usize) -> Self {
        self.group_window_months = months;
        self
    }

    /// Check every field
    ///
    /// # Errors
    /// Returns the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.month_set()?;
        self.default_capacity()?;
        let UtilizationThresholds { balanced, over } = self.thresholds;
        if !balanced.is_finite() || !over.is_finite() || balanced < 0.0 || balanced > over {
            return Err(ConfigError::Thresholds { balanced, over });
        }
        if self.group_window_months == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }

    /// Validated month vocabulary
    ///
    /// # Errors
    /// Returns error if the months are empty, blank or repeated
    pub fn month_set(&self) -> Result<MonthSet, ConfigError> {
        Ok(MonthSet::new(self.months.clone())?)
    }

    /// Validated default capacity
    ///
    /// # Errors
    /// Returns error if the capacity is negative or not finite
    pub fn default_capacity(&self) -> Result<Quantity, ConfigError> {
        Quantity::new(self.default_capacity).map_err(ConfigError::Capacity)
    }

    /// Materializer settings derived from this config
    #[must_use]
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            thresholds: self.thresholds,
            group_window: self.group_window_months,
        }
    }

    /// Mutator settings derived from this config
    ///
    /// # Errors
    /// Returns error if the default capacity is invalid
    pub fn mutation_settings(&self) -> Result<MutationSettings, ConfigError> {
        Ok(MutationSettings {
            default_capacity: self.default_capacity()?,
        })
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            months: DEFAULT_MONTHS.iter().map(|m| MonthLabel::new(*m)).collect(),
            default_capacity: Quantity::DEFAULT_CAPACITY.get(),
            group_window_months: 6,
            thresholds: UtilizationThresholds::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML did not parse
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML could not be produced
    #[error("config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Month vocabulary rejected
    #[error("invalid months: {0}")]
    Months(#[from] MonthError),

    /// Default capacity rejected
    #[error("invalid default capacity: {0}")]
    Capacity(QuantityError),

    /// Thresholds out of order or not finite
    #[error("thresholds must satisfy 0 <= balanced <= over, got balanced={balanced} over={over}")]
    Thresholds { balanced: f64, over: f64 },

    /// Group window of zero months
    #[error("group window must cover at least one month")]
    ZeroWindow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let config = PlannerConfig::new();
        config.validate().unwrap();
        assert_eq!(config.month_set().unwrap().len(), 9);
        assert_eq!(config.default_capacity().unwrap(), Quantity::DEFAULT_CAPACITY);
        assert_eq!(config.view_settings().group_window, 6);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = PlannerConfig::from_toml_str(
            r#"
            months = ["Q1", "Q2", "Q3", "Q4"]

            [thresholds]
            balanced = 70.0
            over = 90.0
            "#,
        )
        .unwrap();
        assert_eq!(config.months.len(), 4);
        assert_eq!(config.thresholds.balanced, 70.0);
        assert_eq!(config.default_capacity, 20.0);
    }

    #[test]
    fn toml_round_trip() {
        let config = PlannerConfig::new().with_months(["Jan", "Feb"]).with_group_window(2);
        let text = config.to_toml_string().unwrap();
        assert_eq!(PlannerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let dup = PlannerConfig::new().with_months(["Jan", "Jan"]);
        assert!(matches!(dup.validate(), Err(ConfigError::Months(MonthError::Duplicate(_)))));

        let cap = PlannerConfig::new().with_default_capacity(-1.0);
        assert!(matches!(cap.validate(), Err(ConfigError::Capacity(_))));

        let order = PlannerConfig::new().with_thresholds(100.0, 80.0);
        assert!(matches!(order.validate(), Err(ConfigError::Thresholds { .. })));

        let window = PlannerConfig::new().with_group_window(0);
        assert!(matches!(window.validate(), Err(ConfigError::ZeroWindow)));

        assert!(matches!(
            PlannerConfig::from_toml_str("months = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
