//! Collaboration requests between companies.
//!
//! Accept and reject are plain status overwrites unless strict mode is on.
//! In lenient mode a transition the guarded machine would refuse still goes
//! through and is logged at WARN.
use std::collections::HashMap;

use sea_orm::{
    prelude::DateTimeWithTimeZone, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use models::collaboration::{self, CollaborationStatus, TransitionDenied};
use models::company;
use crate::company_service::{build_responses, current_company, CompanyResponse};
use crate::errors::ServiceError;
use crate::mail::Notifier;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationRequest {
    pub target_company_id: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationResponse {
    pub id: i64,
    pub status: CollaborationStatus,
    pub message: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub requester_company: CompanyResponse,
    pub target_company: CompanyResponse,
}

/// Attach both parties to every collaboration.
async fn to_responses(db: &DatabaseConnection, rows: Vec<collaboration::Model>) -> Result<Vec<CollaborationResponse>, ServiceError> {
    let mut ids: Vec<i64> = rows.iter().flat_map(|c| [c.requester_company_id, c.target_company_id]).collect();
    ids.sort_unstable();
    ids.dedup();
    let companies = company::find_by_ids(db, ids).await?;
    let by_id: HashMap<i64, CompanyResponse> = build_responses(db, companies)
        .await?
        .into_iter()
        .map(|c| (c.company_id, c))
        .collect();
    let mut out = Vec::with_capacity(rows.len());
    for c in rows {
        let (Some(requester), Some(target)) = (by_id.get(&c.requester_company_id), by_id.get(&c.target_company_id)) else {
            warn!(collaboration_id = c.id, "collaboration references a missing company");
            continue;
        };
        out.push(CollaborationResponse {
            id: c.id,
            status: c.status,
            message: c.message,
            created_at: c.created_at,
            requester_company: requester.clone(),
            target_company: target.clone(),
        });
    }
    Ok(out)
}

async fn to_response(db: &DatabaseConnection, row: collaboration::Model) -> Result<CollaborationResponse, ServiceError> {
    to_responses(db, vec![row])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::not_found("Collaboration"))
}

/// New PENDING request from the actor's company; the target is notified by mail.
#[instrument(skip(db, notifier, req))]
pub async fn send_collaboration_request(
    db: &DatabaseConnection,
    notifier: &Notifier,
    actor_email: &str,
    req: CollaborationRequest,
) -> Result<CollaborationResponse, ServiceError> {
    let requester = current_company(db, actor_email).await?;
    let target_id = req
        .target_company_id
        .ok_or_else(|| ServiceError::Validation("Target company id is required".into()))?;
    let target = company::find_active_by_id(db, target_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Target company not found".into()))?;
    let message = req.message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty());
    let created = collaboration::create(db, requester.id, target.id, message).await?;
    info!(collaboration_id = created.id, requester = requester.id, target = target.id, "collaboration_requested");
    notifier.send_collaboration_request(&target.email, &requester.company_name, created.message.as_deref());
    to_response(db, created).await
}

pub async fn get_sent_collaborations(db: &DatabaseConnection, actor_email: &str) -> Result<Vec<CollaborationResponse>, ServiceError> {
    let me = current_company(db, actor_email).await?;
    let rows = collaboration::Entity::find()
        .filter(collaboration::Column::RequesterCompanyId.eq(me.id))
        .filter(collaboration::Column::IsActive.eq(true))
        .order_by_desc(collaboration::Column::CreatedAt)
        .all(db)
        .await?;
    to_responses(db, rows).await
}

pub async fn get_received_collaborations(db: &DatabaseConnection, actor_email: &str) -> Result<Vec<CollaborationResponse>, ServiceError> {
    let me = current_company(db, actor_email).await?;
    let rows = collaboration::Entity::find()
        .filter(collaboration::Column::TargetCompanyId.eq(me.id))
        .filter(collaboration::Column::IsActive.eq(true))
        .order_by_desc(collaboration::Column::CreatedAt)
        .all(db)
        .await?;
    to_responses(db, rows).await
}

async fn find_collaboration(db: &DatabaseConnection, id: i64) -> Result<collaboration::Model, ServiceError> {
    collaboration::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Collaboration"))
}

fn denied(reason: TransitionDenied) -> ServiceError {
    match reason {
        TransitionDenied::NotTarget => ServiceError::Forbidden("Only the target company can respond to this collaboration".into()),
        TransitionDenied::NotPending(_) => ServiceError::InvalidState("Collaboration is no longer pending".into()),
    }
}

async fn respond(
    db: &DatabaseConnection,
    actor_email: &str,
    id: i64,
    to: CollaborationStatus,
    strict: bool,
) -> Result<CollaborationResponse, ServiceError> {
    let existing = find_collaboration(db, id).await?;
    let responder = company::find_active_by_email(db, actor_email).await?.map(|c| c.id);
    if strict {
        if !existing.is_active {
            return Err(ServiceError::not_found("Collaboration"));
        }
        existing.check_response(responder).map_err(denied)?;
    } else if let Err(reason) = existing.check_response(responder) {
        warn!(collaboration_id = id, ?reason, from = ?existing.status, ?to, "unguarded collaboration transition");
    }
    let from = existing.status;
    let updated = collaboration::set_status(db, existing, to).await?;
    info!(collaboration_id = id, ?from, ?to, "collaboration_status_changed");
    to_response(db, updated).await
}

#[instrument(skip(db))]
pub async fn accept_collaboration(db: &DatabaseConnection, actor_email: &str, id: i64, strict: bool) -> Result<CollaborationResponse, ServiceError> {
    respond(db, actor_email, id, CollaborationStatus::Accepted, strict).await
}

#[instrument(skip(db))]
pub async fn reject_collaboration(db: &DatabaseConnection, actor_email: &str, id: i64, strict: bool) -> Result<CollaborationResponse, ServiceError> {
    respond(db, actor_email, id, CollaborationStatus::Rejected, strict).await
}

/// Soft delete. Status is left untouched.
#[instrument(skip(db))]
pub async fn delete_collaboration(db: &DatabaseConnection, actor_email: &str, id: i64, strict: bool) -> Result<(), ServiceError> {
    let existing = find_collaboration(db, id).await?;
    if strict {
        let me = current_company(db, actor_email).await?;
        if !existing.involves(me.id) {
            return Err(ServiceError::Forbidden("You are not a party of this collaboration".into()));
        }
    }
    collaboration::soft_delete(db, existing).await?;
    info!(collaboration_id = id, "collaboration_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mail::RecordingMailer;
    use crate::test_support::{get_db, seed_company};

    fn notifier() -> (Notifier, Arc<RecordingMailer>) {
        let rec = Arc::new(RecordingMailer::default());
        (Notifier::new(rec.clone(), "noreply@startupocean.in"), rec)
    }

    fn request(target: i64) -> CollaborationRequest {
        CollaborationRequest { target_company_id: Some(target), message: Some("Let's partner".into()) }
    }

    #[tokio::test]
    async fn send_notifies_target_and_lists_both_sides() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (n, rec) = notifier();
        seed_company(&db, "a@x.io", "Alpha").await?;
        let b = seed_company(&db, "b@x.io", "Beta").await?;

        let sent = send_collaboration_request(&db, &n, "a@x.io", request(b.company_id)).await?;
        assert_eq!(sent.status, CollaborationStatus::Pending);
        assert_eq!(sent.requester_company.company_name, "Alpha");
        assert_eq!(sent.target_company.company_name, "Beta");

        let mails = rec.wait_for(1).await;
        assert_eq!(mails[0].to, "b@x.io");
        assert_eq!(mails[0].subject, "New Collaboration Request from Alpha");

        assert_eq!(get_sent_collaborations(&db, "a@x.io").await?.len(), 1);
        assert_eq!(get_received_collaborations(&db, "b@x.io").await?.len(), 1);
        assert!(get_received_collaborations(&db, "a@x.io").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn cannot_collaborate_with_self_or_missing_target() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (n, _) = notifier();
        let a = seed_company(&db, "a@x.io", "Alpha").await?;

        let err = send_collaboration_request(&db, &n, "a@x.io", request(a.company_id)).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot send collaboration request to your own company");

        let err = send_collaboration_request(&db, &n, "a@x.io", request(9999)).await.unwrap_err();
        assert_eq!(err.to_string(), "Target company not found");
        Ok(())
    }

    #[tokio::test]
    async fn lenient_mode_overwrites_status() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (n, _) = notifier();
        seed_company(&db, "a@x.io", "Alpha").await?;
        let b = seed_company(&db, "b@x.io", "Beta").await?;
        let c = send_collaboration_request(&db, &n, "a@x.io", request(b.company_id)).await?;

        // requester accepts its own request, then rejects after acceptance
        let accepted = accept_collaboration(&db, "a@x.io", c.id, false).await?;
        assert_eq!(accepted.status, CollaborationStatus::Accepted);
        let rejected = reject_collaboration(&db, "a@x.io", c.id, false).await?;
        assert_eq!(rejected.status, CollaborationStatus::Rejected);
        Ok(())
    }

    #[tokio::test]
    async fn strict_mode_guards_responder_and_state() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (n, _) = notifier();
        seed_company(&db, "a@x.io", "Alpha").await?;
        let b = seed_company(&db, "b@x.io", "Beta").await?;
        let c = send_collaboration_request(&db, &n, "a@x.io", request(b.company_id)).await?;

        let err = accept_collaboration(&db, "a@x.io", c.id, true).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let accepted = accept_collaboration(&db, "b@x.io", c.id, true).await?;
        assert_eq!(accepted.status, CollaborationStatus::Accepted);

        let err = reject_collaboration(&db, "b@x.io", c.id, true).await.unwrap_err();
        assert_eq!(err.to_string(), "Collaboration is no longer pending");
        Ok(())
    }

    #[tokio::test]
    async fn delete_hides_from_lists_but_keeps_status() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (n, _) = notifier();
        seed_company(&db, "a@x.io", "Alpha").await?;
        let b = seed_company(&db, "b@x.io", "Beta").await?;
        seed_company(&db, "c@x.io", "Gamma").await?;
        let c = send_collaboration_request(&db, &n, "a@x.io", request(b.company_id)).await?;

        let err = delete_collaboration(&db, "c@x.io", c.id, true).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        delete_collaboration(&db, "b@x.io", c.id, false).await?;
        assert!(get_sent_collaborations(&db, "a@x.io").await?.is_empty());
        let row = collaboration::Entity::find_by_id(c.id).one(&db).await?.unwrap();
        assert!(!row.is_active);
        assert_eq!(row.status, CollaborationStatus::Pending);

        let err = delete_collaboration(&db, "a@x.io", 4242, false).await.unwrap_err();
        assert_eq!(err.to_string(), "Collaboration not found");
        Ok(())
    }
}
