use serde::{Deserialize, Serialize};

use crate::{
    domain::{DashboardField, FieldValue},
    error::FetchError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DashboardUpdate {
    FieldRequested {
        field: DashboardField,
    },
    FieldResolved {
        field: DashboardField,
        #[serde(default)]
        value: Option<FieldValue>,
    },
    FieldFailed(FetchError),
    /// An in-flight request was abandoned because its session detached.
    FieldAbandoned {
        field: DashboardField,
    },
}

impl DashboardUpdate {
    pub fn field(&self) -> DashboardField {
        match self {
            DashboardUpdate::FieldRequested { field }
            | DashboardUpdate::FieldResolved { field, .. }
            | DashboardUpdate::FieldAbandoned { field } => *field,
            DashboardUpdate::FieldFailed(err) => err.field,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
