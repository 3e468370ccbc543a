//! Per-item batch operations exposed to remote callers.
//!
//! Each operation takes a list, processes every item independently through
//! the [`OverrideManager`], and returns a result list of the same length in
//! the same order. An item's failure lands in that item's `error` field and
//! never aborts its siblings; each item targets its own parent quiz, so
//! even an authorization failure is per item here.

use serde::Serialize;

use crate::types::DbId;

use super::form::OverrideFormData;
use super::manager::OverrideManager;
use super::model::OverrideRecord;

/// Result of fetching the overrides of one quiz.
#[derive(Debug, Clone, Serialize)]
pub struct GetOverridesOutcome {
    pub data: Vec<OverrideRecord>,
    pub error: Option<String>,
}

/// Result of one override upsert.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertOutcome {
    /// Id of the created or updated override. `None` on error.
    pub id: Option<DbId>,
    pub error: Option<String>,
}

/// Result of one override deletion. Echoes the requested id regardless of
/// the outcome.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub id: DbId,
    pub error: Option<String>,
}

/// Fetch the overrides of each listed quiz.
pub async fn get_overrides(
    manager: &OverrideManager,
    actor: DbId,
    quiz_ids: &[DbId],
) -> Vec<GetOverridesOutcome> {
    let mut outcomes = Vec::with_capacity(quiz_ids.len());
    for &quiz_id in quiz_ids {
        let outcome = match manager.get_all_overrides(actor, quiz_id).await {
            Ok(overrides) => GetOverridesOutcome {
                data: overrides.iter().map(|o| o.to_record()).collect(),
                error: None,
            },
            Err(err) => GetOverridesOutcome {
                data: Vec::new(),
                error: Some(err.to_string()),
            },
        };
        outcomes.push(outcome);
    }
    outcomes
}

/// Create or update each submitted override.
pub async fn upsert_overrides(
    manager: &OverrideManager,
    actor: DbId,
    forms: &[OverrideFormData],
) -> Vec<UpsertOutcome> {
    let mut outcomes = Vec::with_capacity(forms.len());
    for form in forms {
        let outcome = match manager.upsert_override(actor, form).await {
            Ok(id) => UpsertOutcome {
                id: Some(id),
                error: None,
            },
            Err(err) => UpsertOutcome {
                id: None,
                error: Some(err.to_string()),
            },
        };
        outcomes.push(outcome);
    }
    outcomes
}

/// Delete each listed override.
pub async fn delete_overrides(
    manager: &OverrideManager,
    actor: DbId,
    ids: &[DbId],
) -> Vec<DeleteOutcome> {
    let mut outcomes = Vec::with_capacity(ids.len());
    for &id in ids {
        let outcome = match manager.delete_override(actor, id).await {
            Ok(()) => DeleteOutcome { id, error: None },
            Err(err) => DeleteOutcome {
                id,
                error: Some(err.to_string()),
            },
        };
        outcomes.push(outcome);
    }
    outcomes
}
