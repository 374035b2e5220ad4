//! # Escalation Service
//!
//! Drives the escalation ladder over open cases: rule checks, automatic
//! and manual escalation, resolution, SLA breach detection, and the
//! overdue-case sweep.
//!
//! ## Error Policy
//!
//! Authorization problems (no actor, actor not linked to an organization)
//! are precondition violations and propagate as hard errors — the caller
//! must fix them, they are not transient. Store failures propagate from
//! single-case mutations but are isolated per case inside the overdue
//! sweep, which is a best-effort batch: partial progress is expected and
//! safe because every mutation is append-only or idempotent.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vigil_core::{
    Assignee, CaseId, CasePriority, CaseStatus, CoreError, EscalationId, StoreError, Timestamp,
    UserId,
};

use crate::history::EscalationHistory;
use crate::notification::{Notification, NotificationChannel, Recipient};
use crate::rule::{EscalationCheckResult, EscalationLevel};
use crate::sla::{SlaBreach, SlaTracking, SlaType};
use crate::store::EscalationStore;

/// The authenticated operator identity behind an escalation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable actor identifier (analyst id, service principal).
    pub actor_id: String,
    /// The organization the actor belongs to. Required for any mutation.
    pub organization: Option<String>,
}

impl Actor {
    /// An actor linked to an organization.
    pub fn new(actor_id: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            organization: Some(organization.into()),
        }
    }

    /// An actor with no organization link. Rejected by every mutation
    /// entry point; exists so callers can represent the state faithfully.
    pub fn unlinked(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            organization: None,
        }
    }

    /// The identity used by rule-driven escalations and sweeps.
    pub fn system() -> Self {
        Self::new("system", "system")
    }
}

/// Errors from escalation operations.
#[derive(Error, Debug)]
pub enum EscalationError {
    /// The request carried no authenticated actor.
    #[error("no authenticated actor on request")]
    MissingActor,

    /// The actor is not linked to an organization.
    #[error("actor {actor_id} is not linked to an organization")]
    ActorNotLinked {
        /// The offending actor.
        actor_id: String,
    },

    /// The case is in a terminal state and cannot be escalated.
    #[error("case {case_id} is {status} and cannot be escalated")]
    TerminalCase {
        /// The case.
        case_id: CaseId,
        /// Its terminal status.
        status: &'static str,
    },

    /// The escalation row has already been resolved.
    #[error("escalation {0} is already resolved")]
    AlreadyResolved(EscalationId),

    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A case lifecycle transition was rejected.
    #[error("case lifecycle: {0}")]
    Lifecycle(#[from] CoreError),
}

/// Require an authenticated, organization-linked actor.
pub(crate) fn authorize(actor: Option<&Actor>) -> Result<Actor, EscalationError> {
    let actor = actor.ok_or(EscalationError::MissingActor)?;
    if actor.organization.is_none() {
        return Err(EscalationError::ActorNotLinked {
            actor_id: actor.actor_id.clone(),
        });
    }
    Ok(actor.clone())
}

/// SLA windows and sweep policy, constructor-injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationConfig {
    /// Resolution SLA target hours per escalation level (index 0 is
    /// level 1). Higher levels get tighter windows.
    pub sla_hours_by_level: [u32; 5],
    /// Age in hours past which a non-terminal case counts as overdue.
    pub overdue_age_hours: u32,
}

/// The documented default escalation policy.
pub const DEFAULT_ESCALATION_CONFIG: EscalationConfig = EscalationConfig {
    sla_hours_by_level: [72, 48, 24, 8, 4],
    overdue_age_hours: 24,
};

impl Default for EscalationConfig {
    fn default() -> Self {
        DEFAULT_ESCALATION_CONFIG
    }
}

impl EscalationConfig {
    /// The SLA window for a level.
    pub fn sla_hours(&self, level: EscalationLevel) -> u32 {
        self.sla_hours_by_level[usize::from(level.get() - 1)]
    }
}

/// A manual escalation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRequest {
    /// The case to escalate.
    pub case_id: CaseId,
    /// The level to escalate to.
    pub target_level: EscalationLevel,
    /// Why the case is being escalated.
    pub reason: String,
    /// Role to reassign the case to, if any.
    pub target_role: Option<String>,
    /// User to reassign the case to, if any (wins over the role).
    pub target_user_id: Option<UserId>,
    /// Whether to boost the case priority one severity step.
    pub priority_boost: bool,
    /// Whether to create notification intents for the recipients.
    pub send_notifications: bool,
    /// The requesting actor. Absence is a hard error.
    pub actor: Option<Actor>,
    /// The escalation rule that triggered this request, for rule-driven
    /// escalations.
    pub triggered_by_rule: Option<String>,
}

/// A request to resolve one escalation row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveEscalationRequest {
    /// The escalation row to resolve.
    pub escalation_id: EscalationId,
    /// Resolution notes for the audit trail.
    pub resolution_notes: String,
    /// The resolving actor. Absence is a hard error.
    pub actor: Option<Actor>,
}

/// What a successful escalation did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationOutcome {
    /// The history row that was appended.
    pub escalation: EscalationHistory,
    /// Case priority before.
    pub previous_priority: CasePriority,
    /// Case priority after.
    pub new_priority: CasePriority,
    /// The SLA timer started for the reached level.
    pub sla: SlaTracking,
    /// How many notification intents were created.
    pub notifications_created: usize,
}

/// Result of one overdue sweep.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OverdueSweepReport {
    /// Cases examined.
    pub checked: usize,
    /// Cases escalated by a matching rule.
    pub escalated: usize,
    /// Cases whose processing failed (logged, sweep continued).
    pub failed: usize,
}

/// The escalation state machine over a case store.
#[derive(Clone)]
pub struct EscalationService {
    store: Arc<dyn EscalationStore>,
    config: EscalationConfig,
}

impl EscalationService {
    /// Create a service over a store with an explicit policy.
    pub fn new(store: Arc<dyn EscalationStore>, config: EscalationConfig) -> Self {
        Self { store, config }
    }

    /// Create a service with the documented default policy.
    pub fn with_defaults(store: Arc<dyn EscalationStore>) -> Self {
        Self::new(store, EscalationConfig::default())
    }

    /// The active policy.
    pub fn config(&self) -> &EscalationConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn EscalationStore> {
        &self.store
    }

    /// Evaluate every active escalation rule against the case's current
    /// priority, risk score, and age. Read-only: mutating nothing, it
    /// returns one result per satisfied rule, in rule order.
    pub async fn check_case_escalation(
        &self,
        case_id: &CaseId,
    ) -> Result<Vec<EscalationCheckResult>, EscalationError> {
        let case = self.store.get_case(case_id).await?;
        let rules = self.store.active_escalation_rules().await?;
        let now = Timestamp::now();

        let results = rules
            .iter()
            .filter_map(|rule| {
                rule.matches(&case, now).map(|reason| EscalationCheckResult {
                    rule_id: rule.id.clone(),
                    should_escalate: true,
                    escalation_level: rule.escalation_level,
                    target_role: if rule.auto_assign {
                        rule.target_role.clone()
                    } else {
                        None
                    },
                    target_user_id: if rule.auto_assign {
                        rule.target_user_id
                    } else {
                        None
                    },
                    reason,
                })
            })
            .collect();
        Ok(results)
    }

    /// Escalate a case via the first satisfied escalation rule, with
    /// priority boost and notifications enabled. Returns `None` when no
    /// rule fires.
    pub async fn auto_escalate_case(
        &self,
        case_id: &CaseId,
    ) -> Result<Option<EscalationOutcome>, EscalationError> {
        let checks = self.check_case_escalation(case_id).await?;
        let Some(check) = checks.into_iter().next() else {
            return Ok(None);
        };

        let outcome = self
            .manually_escalate_case(EscalationRequest {
                case_id: *case_id,
                target_level: check.escalation_level,
                reason: check.reason,
                target_role: check.target_role,
                target_user_id: check.target_user_id,
                priority_boost: true,
                send_notifications: true,
                actor: Some(Actor::system()),
                triggered_by_rule: Some(check.rule_id),
            })
            .await?;
        Ok(Some(outcome))
    }

    /// Escalate a case: append a history row, optionally reassign and
    /// boost priority, move the case to `escalated`, start the SLA timer
    /// for the reached level, and create notification intents.
    pub async fn manually_escalate_case(
        &self,
        request: EscalationRequest,
    ) -> Result<EscalationOutcome, EscalationError> {
        let actor = authorize(request.actor.as_ref())?;
        let mut case = self.store.get_case(&request.case_id).await?;
        if case.status.is_terminal() {
            return Err(EscalationError::TerminalCase {
                case_id: case.id,
                status: case.status.as_str(),
            });
        }

        let now = Timestamp::now();
        let previous_priority = case.priority;
        let previous_assignee = case.assigned_to.clone();

        let new_priority = if request.priority_boost {
            previous_priority.boosted()
        } else {
            previous_priority
        };
        let new_assignee = if let Some(user_id) = request.target_user_id {
            Some(Assignee::User { user_id })
        } else if let Some(role) = request.target_role.clone() {
            Some(Assignee::Role { role })
        } else {
            previous_assignee.clone()
        };

        let history = EscalationHistory {
            id: EscalationId::new(),
            case_id: case.id,
            escalation_level: request.target_level,
            reason: request.reason.clone(),
            previous_priority,
            new_priority,
            previous_assignee,
            new_assignee: new_assignee.clone(),
            escalated_by: actor.actor_id.clone(),
            triggered_by_rule: request.triggered_by_rule.clone(),
            escalation_date: now,
            resolved_at: None,
            resolution_notes: None,
        };
        self.store.insert_escalation(&history).await?;

        case.priority = new_priority;
        case.assigned_to = new_assignee;
        case.transition_to(CaseStatus::Escalated, now)?;
        self.store.update_case(&case).await?;

        let sla = SlaTracking::started(
            case.id,
            request.target_level,
            SlaType::Resolution,
            self.config.sla_hours(request.target_level),
            now,
        );
        self.store.insert_sla(&sla).await?;

        let mut notifications_created = 0;
        if request.send_notifications {
            for recipient in escalation_recipients(&request, &case.assigned_to) {
                let notification = Notification::new(
                    case.id,
                    recipient.clone(),
                    format!(
                        "Case {} escalated to level {}",
                        case.id, request.target_level
                    ),
                    request.reason.clone(),
                    channel_for(&recipient),
                );
                self.store.create_notification(&notification).await?;
                notifications_created += 1;
            }
        }

        tracing::info!(
            case_id = %case.id,
            level = %request.target_level,
            previous_priority = %previous_priority,
            new_priority = %new_priority,
            escalated_by = %actor.actor_id,
            "case escalated"
        );

        Ok(EscalationOutcome {
            escalation: history,
            previous_priority,
            new_priority,
            sla,
            notifications_created,
        })
    }

    /// Resolve one escalation row and close its SLA timer — `met` only
    /// when the timer is within its target window.
    pub async fn resolve_escalation(
        &self,
        request: ResolveEscalationRequest,
    ) -> Result<EscalationHistory, EscalationError> {
        let actor = authorize(request.actor.as_ref())?;
        let mut history = self.store.get_escalation(&request.escalation_id).await?;
        if !history.is_active() {
            return Err(EscalationError::AlreadyResolved(history.id));
        }

        let now = Timestamp::now();
        history.resolve(now, request.resolution_notes);
        self.store.update_escalation(&history).await?;
        self.close_sla_for_level(&history.case_id, history.escalation_level, now)
            .await?;

        tracing::info!(
            escalation_id = %history.id,
            case_id = %history.case_id,
            resolved_by = %actor.actor_id,
            "escalation resolved"
        );
        Ok(history)
    }

    /// Resolve every active escalation on a case — the cleanup path when
    /// a case is resolved or closed while still escalated. Idempotent: a
    /// second call finds no active rows and resolves nothing.
    pub async fn resolve_escalation_on_case_resolution(
        &self,
        case_id: &CaseId,
        notes: &str,
    ) -> Result<usize, EscalationError> {
        let active = self.store.active_escalations(case_id).await?;
        let now = Timestamp::now();
        let mut resolved = 0;
        for mut history in active {
            history.resolve(now, notes);
            self.store.update_escalation(&history).await?;
            self.close_sla_for_level(case_id, history.escalation_level, now)
                .await?;
            resolved += 1;
        }
        if resolved > 0 {
            tracing::info!(case_id = %case_id, resolved, "cleared active escalations on case resolution");
        }
        Ok(resolved)
    }

    /// Scan all pending SLA timers and report the ones past target.
    /// Detection only — timers are not mutated; reacting to breaches is
    /// the caller's responsibility.
    pub async fn check_sla_breaches(&self) -> Result<Vec<SlaBreach>, EscalationError> {
        let now = Timestamp::now();
        let pending = self.store.pending_slas().await?;
        Ok(pending
            .iter()
            .filter(|sla| sla.is_breached_at(now))
            .map(|sla| SlaBreach {
                sla_id: sla.id,
                case_id: sla.case_id,
                escalation_level: sla.escalation_level,
                target_hours: sla.target_hours,
                elapsed_hours: sla.elapsed_hours(now),
            })
            .collect())
    }

    /// Attempt rule-driven escalation of every non-terminal case older
    /// than the configured age. A failure on one case is logged and the
    /// sweep continues — this is a batch job, not a transaction.
    pub async fn monitor_overdue_cases(&self) -> Result<OverdueSweepReport, EscalationError> {
        let cutoff = Timestamp::now().minus_hours(self.config.overdue_age_hours);
        let overdue = self.store.list_overdue_cases(cutoff).await?;

        let mut report = OverdueSweepReport {
            checked: overdue.len(),
            ..Default::default()
        };
        for case in overdue {
            match self.auto_escalate_case(&case.id).await {
                Ok(Some(_)) => report.escalated += 1,
                Ok(None) => {}
                Err(error) => {
                    report.failed += 1;
                    tracing::warn!(
                        case_id = %case.id,
                        error = %error,
                        "overdue case escalation failed, continuing sweep"
                    );
                }
            }
        }

        tracing::info!(
            checked = report.checked,
            escalated = report.escalated,
            failed = report.failed,
            "overdue sweep complete"
        );
        Ok(report)
    }

    async fn close_sla_for_level(
        &self,
        case_id: &CaseId,
        level: EscalationLevel,
        at: Timestamp,
    ) -> Result<(), EscalationError> {
        let pending = self.store.pending_slas_for_case(case_id).await?;
        for mut sla in pending {
            if sla.escalation_level == level {
                sla.close(at);
                self.store.update_sla(&sla).await?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for EscalationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscalationService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The recipients of escalation notifications: the explicit targets, or
/// the case assignee when no target was given.
fn escalation_recipients(
    request: &EscalationRequest,
    assignee: &Option<Assignee>,
) -> Vec<Recipient> {
    let mut recipients = Vec::new();
    if let Some(user_id) = request.target_user_id {
        recipients.push(Recipient::User { user_id });
    }
    if let Some(role) = &request.target_role {
        recipients.push(Recipient::Role { role: role.clone() });
    }
    if recipients.is_empty() {
        if let Some(assignee) = assignee {
            recipients.push(match assignee {
                Assignee::User { user_id } => Recipient::User { user_id: *user_id },
                Assignee::Role { role } => Recipient::Role { role: role.clone() },
            });
        }
    }
    recipients
}

fn channel_for(recipient: &Recipient) -> NotificationChannel {
    match recipient {
        Recipient::User { .. } => NotificationChannel::InApp,
        Recipient::Role { .. } | Recipient::Email { .. } => NotificationChannel::Email,
    }
}
