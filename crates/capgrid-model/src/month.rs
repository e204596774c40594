//! Month labels and the ordered month vocabulary

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Default vocabulary: nine consecutive calendar months
pub const DEFAULT_MONTHS: [&str; 9] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep",
];

/// Label of one time bucket (e.g. `"Jan"`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthLabel(String);

impl MonthLabel {
    /// Create a label
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Borrow the raw label
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MonthLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MonthLabel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Ordered, duplicate-free month vocabulary
///
/// Column index `i` of the grid is `months()[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MonthLabel>", into = "Vec<MonthLabel>")]
pub struct MonthSet(Vec<MonthLabel>);

impl MonthSet {
    /// Build a vocabulary
    ///
    /// # Errors
    /// Returns error if empty or if a label repeats
    pub fn new(months: Vec<MonthLabel>) -> Result<Self, MonthError> {
        if months.is_empty() {
            return Err(MonthError::EmptyVocabulary);
        }
        for (i, m) in months.iter().enumerate() {
            if m.as_str().trim().is_empty() {
                return Err(MonthError::BlankLabel);
            }
            if months[..i].contains(m) {
                return Err(MonthError::Duplicate(m.clone()));
            }
        }
        Ok(Self(months))
    }

    /// Labels in column order
    #[inline]
    #[must_use]
    pub fn months(&self) -> &[MonthLabel] {
        &self.0
    }

    /// Number of columns
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a validated set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label at a column index
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MonthLabel> {
        self.0.get(index)
    }

    /// Column index of a label
    #[inline]
    #[must_use]
    pub fn index_of(&self, label: &MonthLabel) -> Option<usize> {
        self.0.iter().position(|m| m == label)
    }

    /// Resolve a raw label against the vocabulary
    ///
    /// # Errors
    /// Returns error if the label is not part of the vocabulary
    pub fn resolve(&self, raw: &str) -> Result<MonthLabel, MonthError> {
        self.0
            .iter()
            .find(|m| m.as_str() == raw)
            .cloned()
            .ok_or_else(|| MonthError::Unknown(raw.to_string()))
    }

    /// First `n` months (the whole set if shorter)
    #[inline]
    #[must_use]
    pub fn window(&self, n: usize) -> &[MonthLabel] {
        &self.0[..n.min(self.0.len())]
    }
}

impl Default for MonthSet {
    fn default() -> Self {
        Self(DEFAULT_MONTHS.iter().map(|m| MonthLabel::new(*m)).collect())
    }
}

impl TryFrom<Vec<MonthLabel>> for MonthSet {
    type Error = MonthError;

    fn try_from(value: Vec<MonthLabel>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonthSet> for Vec<MonthLabel> {
    fn from(value: MonthSet) -> Self {
        value.0
    }
}

/// Errors related to the month vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthError {
    /// No months configured
    #[error("month vocabulary must not be empty")]
    EmptyVocabulary,

    /// Blank label
    #[error("month label must not be blank")]
    BlankLabel,

    /// Label listed twice
    #[error("duplicate month label: {0}")]
    Duplicate(MonthLabel),

    /// Label outside the vocabulary
    #[error("unknown month: {0}")]
    Unknown(String),
}
