//! In-memory [`EscalationStore`] used by the unit tests in this crate.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use vigil_core::{CaseId, ComplianceCase, EscalationId, SlaId, StoreError, Timestamp};

use crate::history::EscalationHistory;
use crate::notification::Notification;
use crate::rule::EscalationRule;
use crate::sla::{SlaStatus, SlaTracking};
use crate::store::EscalationStore;

/// Mutex-per-table store. Tests reach into the tables directly to seed
/// rules and assert on written rows.
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub(crate) cases: Mutex<HashMap<CaseId, ComplianceCase>>,
    pub(crate) rules: Mutex<Vec<EscalationRule>>,
    pub(crate) history: Mutex<HashMap<EscalationId, EscalationHistory>>,
    pub(crate) slas: Mutex<HashMap<SlaId, SlaTracking>>,
    pub(crate) notifications: Mutex<Vec<Notification>>,
    /// Case ids whose `update_case` calls fail, for failure-isolation tests.
    pub(crate) fail_update_for: Mutex<HashSet<CaseId>>,
}

#[async_trait]
impl EscalationStore for MemoryStore {
    async fn create_case(&self, case: &ComplianceCase) -> Result<(), StoreError> {
        self.cases.lock().unwrap().insert(case.id, case.clone());
        Ok(())
    }

    async fn get_case(&self, case_id: &CaseId) -> Result<ComplianceCase, StoreError> {
        self.cases
            .lock()
            .unwrap()
            .get(case_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: "case",
                id: case_id.to_string(),
            })
    }

    async fn update_case(&self, case: &ComplianceCase) -> Result<(), StoreError> {
        if self.fail_update_for.lock().unwrap().contains(&case.id) {
            return Err(StoreError::Unavailable("case row locked".into()));
        }
        self.cases.lock().unwrap().insert(case.id, case.clone());
        Ok(())
    }

    async fn list_overdue_cases(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<ComplianceCase>, StoreError> {
        Ok(self
            .cases
            .lock()
            .unwrap()
            .values()
            .filter(|c| !c.status.is_terminal() && c.created_at <= cutoff)
            .cloned()
            .collect())
    }

    async fn active_escalation_rules(&self) -> Result<Vec<EscalationRule>, StoreError> {
        Ok(self
            .rules
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect())
    }

    async fn insert_escalation(&self, history: &EscalationHistory) -> Result<(), StoreError> {
        self.history
            .lock()
            .unwrap()
            .insert(history.id, history.clone());
        Ok(())
    }

    async fn get_escalation(
        &self,
        escalation_id: &EscalationId,
    ) -> Result<EscalationHistory, StoreError> {
        self.history
            .lock()
            .unwrap()
            .get(escalation_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: "escalation",
                id: escalation_id.to_string(),
            })
    }

    async fn update_escalation(&self, history: &EscalationHistory) -> Result<(), StoreError> {
        self.history
            .lock()
            .unwrap()
            .insert(history.id, history.clone());
        Ok(())
    }

    async fn active_escalations(
        &self,
        case_id: &CaseId,
    ) -> Result<Vec<EscalationHistory>, StoreError> {
        let mut rows: Vec<EscalationHistory> = self
            .history
            .lock()
            .unwrap()
            .values()
            .filter(|h| h.case_id == *case_id && h.is_active())
            .cloned()
            .collect();
        rows.sort_by_key(|h| h.escalation_date);
        Ok(rows)
    }

    async fn insert_sla(&self, sla: &SlaTracking) -> Result<(), StoreError> {
        self.slas.lock().unwrap().insert(sla.id, sla.clone());
        Ok(())
    }

    async fn update_sla(&self, sla: &SlaTracking) -> Result<(), StoreError> {
        self.slas.lock().unwrap().insert(sla.id, sla.clone());
        Ok(())
    }

    async fn pending_slas(&self) -> Result<Vec<SlaTracking>, StoreError> {
        Ok(self
            .slas
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.status == SlaStatus::Pending)
            .cloned()
            .collect())
    }

    async fn pending_slas_for_case(
        &self,
        case_id: &CaseId,
    ) -> Result<Vec<SlaTracking>, StoreError> {
        Ok(self
            .slas
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.case_id == *case_id && s.status == SlaStatus::Pending)
            .cloned()
            .collect())
    }

    async fn create_notification(&self, notification: &Notification) -> Result<(), StoreError> {
        self.notifications
            .lock()
            .unwrap()
            .push(notification.clone());
        Ok(())
    }
}
