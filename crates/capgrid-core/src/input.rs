//! Raw editor input and its validation
//!
//! Editors hand over strings. They are turned into typed requests here, so
//! nothing malformed ever reaches the mutator.

use crate::error::PlannerError;
use capgrid_model::{parse_quantity, EntityId, MonthLabel, MonthSet, NodeId, NodeTemplate};
use capgrid_store::{DeleteAllocation, InlineSave, SaveAssignment, SaveMode};
use serde::{Deserialize, Serialize};

/// Assignment editor form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveInput {
    pub mode: SaveMode,
    pub resource_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub months: Vec<String>,
    pub effort: String,
    #[serde(default)]
    pub new_item: Option<NodeTemplate>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_capacity_edit: bool,
}

impl SaveInput {
    /// Typed request
    ///
    /// # Errors
    /// Returns error for a malformed id, an unknown month or an invalid amount
    pub fn validate(&self, vocabulary: &MonthSet) -> Result<SaveAssignment, PlannerError> {
        Ok(SaveAssignment {
            mode: self.mode,
            resource: self.resource_id.parse()?,
            parent: parse_parent(self.parent_id.as_deref())?,
            months: resolve_months(vocabulary, &self.months)?,
            effort: parse_quantity(&self.effort)?,
            new_item: self.new_item.clone(),
            role: self.role.clone().filter(|r| !r.trim().is_empty()),
            capacity_edit: self.is_capacity_edit,
        })
    }
}

/// Delete request from the editor or toolbar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteInput {
    pub resource_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Empty means unassign
    #[serde(default)]
    pub months: Vec<String>,
}

impl DeleteInput {
    /// Typed request
    ///
    /// # Errors
    /// Returns error for a malformed id or an unknown month
    pub fn validate(&self, vocabulary: &MonthSet) -> Result<DeleteAllocation, PlannerError> {
        Ok(DeleteAllocation {
            resource: self.resource_id.parse()?,
            parent: parse_parent(self.parent_id.as_deref())?,
            months: resolve_months(vocabulary, &self.months)?,
        })
    }
}

/// Inline cell editor commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineInput {
    pub resource_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub month: String,
    pub value: String,
    #[serde(default)]
    pub is_capacity: bool,
}

impl InlineInput {
    /// Typed request
    ///
    /// # Errors
    /// Returns error for a malformed id, an unknown month or an invalid amount
    pub fn validate(&self, vocabulary: &MonthSet) -> Result<InlineSave, PlannerError> {
        let resource: NodeId = self.resource_id.parse()?;
        Ok(InlineSave {
            resource,
            parent: parse_parent(self.parent_id.as_deref())?,
            month: vocabulary.resolve(&self.month)?,
            value: parse_quantity(&self.value)?,
            is_capacity: self.is_capacity,
        })
    }
}

fn parse_parent(raw: Option<&str>) -> Result<Option<EntityId>, PlannerError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => Ok(Some(EntityId::new(id)?)),
    }
}

fn resolve_months(vocabulary: &MonthSet, raw: &[String]) -> Result<Vec<MonthLabel>, PlannerError> {
    raw.iter()
        .map(|m| vocabulary.resolve(m.trim()).map_err(PlannerError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use capgrid_model::{MonthError, QuantityError};

    fn form(effort: &str, months: &[&str]) -> SaveInput {
        SaveInput {
            mode: SaveMode::Edit,
            resource_id: "p1".into(),
            parent_id: Some("e1".into()),
            months: months.iter().map(|m| (*m).to_string()).collect(),
            effort: effort.into(),
            new_item: None,
            role: Some("  ".into()),
            is_capacity_edit: false,
        }
    }

    #[test]
    fn valid_form_becomes_request() {
        let req = form(" 4.5 ", &["Jan", "Mar"]).validate(&MonthSet::default()).unwrap();
        assert_eq!(req.effort.get(), 4.5);
        assert_eq!(req.months.len(), 2);
        assert_eq!(req.parent.unwrap().as_str(), "e1");
        assert!(req.role.is_none());
    }

    #[test]
    fn bad_amounts_and_months_are_rejected() {
        let vocab = MonthSet::default();
        assert!(matches!(
            form("-2", &["Jan"]).validate(&vocab),
            Err(PlannerError::Quantity(QuantityError::Negative(_)))
        ));
        assert!(matches!(
            form("abc", &["Jan"]).validate(&vocab),
            Err(PlannerError::Quantity(QuantityError::Malformed(_)))
        ));
        assert!(matches!(
            form("1", &["Dec"]).validate(&vocab),
            Err(PlannerError::Month(MonthError::Unknown(_)))
        ));
    }

    #[test]
    fn malformed_ids_are_rejected() {
        let input = InlineInput {
            resource_id: "::p1".into(),
            parent_id: None,
            month: "Jan".into(),
            value: "3".into(),
            is_capacity: false,
        };
        assert!(matches!(input.validate(&MonthSet::default()), Err(PlannerError::Id(_))));
    }

    #[test]
    fn form_deserializes_from_camel_case() {
        let json = r#"{
            "mode": "add",
            "resourceId": "e1",
            "months": ["Jan"],
            "effort": "5",
            "newItem": { "id": "p9", "displayName": "Nova", "kind": "workItem" }
        }"#;
        let input: SaveInput = serde_json::from_str(json).unwrap();
        let req = input.validate(&MonthSet::default()).unwrap();
        assert_eq!(req.mode, SaveMode::Add);
        assert_eq!(req.new_item.unwrap().id.as_str(), "p9");
    }
}
