use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    sea_query::{Condition, Expr, Func},
    prelude::DateTimeWithTimeZone,
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::company::{self, CompanyType, NewCompany};
use models::social_link::{self, SocialLinks};
use models::offering;
use crate::errors::ServiceError;

/// Create/update payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequest {
    #[serde(default)]
    pub company_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub company_type: String,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub offerings: Vec<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub company_id: i64,
    pub company_name: String,
    pub description: Option<String>,
    pub company_type: CompanyType,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    pub offerings: Vec<String>,
    pub social_links: SocialLinks,
    pub email: String,
    pub phone_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

/// Validated form of a `CompanyRequest`.
struct CompanyDraft {
    company_name: String,
    description: Option<String>,
    company_type: CompanyType,
    city: Option<String>,
    phone_number: Option<String>,
    logo_url: Option<String>,
    offerings: Vec<String>,
    social_links: SocialLinks,
}

fn blank_to_none(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl CompanyRequest {
    fn validate(self) -> Result<CompanyDraft, ServiceError> {
        company::validate_name(&self.company_name)?;
        let description = blank_to_none(self.description);
        company::validate_description(description.as_deref())?;
        let company_type: CompanyType = self.company_type.parse()?;
        let phone_number = blank_to_none(self.phone_number);
        company::validate_phone(phone_number.as_deref())?;
        let offerings = offering::validate_names(&self.offerings)?;
        let social_links = SocialLinks {
            website: blank_to_none(self.social_links.website),
            linkedin: blank_to_none(self.social_links.linkedin),
            facebook: blank_to_none(self.social_links.facebook),
            instagram: blank_to_none(self.social_links.instagram),
            twitter: blank_to_none(self.social_links.twitter),
        };
        social_links.validate()?;
        Ok(CompanyDraft {
            company_name: self.company_name.trim().to_string(),
            description,
            company_type,
            city: blank_to_none(self.city),
            phone_number,
            logo_url: blank_to_none(self.logo_url),
            offerings,
            social_links,
        })
    }
}

/// The active company behind an authenticated email.
pub async fn current_company<C: ConnectionTrait>(db: &C, email: &str) -> Result<company::Model, ServiceError> {
    company::find_active_by_email(db, email)
        .await?
        .ok_or_else(|| ServiceError::not_found("Company"))
}

/// Assemble responses with offerings and links, preserving input order.
pub async fn build_responses<C: ConnectionTrait>(db: &C, companies: Vec<company::Model>) -> Result<Vec<CompanyResponse>, ServiceError> {
    let ids: Vec<i64> = companies.iter().map(|c| c.id).collect();
    let mut offerings: HashMap<i64, Vec<String>> = HashMap::new();
    for o in offering::active_for_companies(db, ids.clone()).await? {
        offerings.entry(o.company_id).or_default().push(o.offering_name);
    }
    let mut links: HashMap<i64, SocialLinks> = social_link::active_for_companies(db, ids)
        .await?
        .into_iter()
        .map(|l| (l.company_id, SocialLinks::from(l)))
        .collect();
    Ok(companies
        .into_iter()
        .map(|c| CompanyResponse {
            offerings: offerings.remove(&c.id).unwrap_or_default(),
            social_links: links.remove(&c.id).unwrap_or_default(),
            company_id: c.id,
            company_name: c.company_name,
            description: c.description,
            company_type: c.company_type,
            city: c.city,
            logo_url: c.logo_url,
            email: c.email,
            phone_number: c.phone_number,
            created_at: c.created_at,
        })
        .collect())
}

pub async fn build_response<C: ConnectionTrait>(db: &C, c: company::Model) -> Result<CompanyResponse, ServiceError> {
    build_responses(db, vec![c])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::not_found("Company"))
}

/// One active company per email; company, offerings and links in one transaction.
#[instrument(skip(db, req))]
pub async fn create_company(db: &DatabaseConnection, actor_email: &str, req: CompanyRequest) -> Result<CompanyResponse, ServiceError> {
    let draft = req.validate()?;
    if company::find_active_by_email(db, actor_email).await?.is_some() {
        return Err(ServiceError::Conflict("You already have a registered company".into()));
    }
    let txn = db.begin().await?;
    let created = company::create(
        &txn,
        NewCompany {
            email: actor_email.to_string(),
            company_name: draft.company_name,
            description: draft.description,
            company_type: draft.company_type,
            city: draft.city,
            phone_number: draft.phone_number,
            logo_url: draft.logo_url,
        },
    )
    .await?;
    offering::insert_many(&txn, created.id, &draft.offerings).await?;
    social_link::upsert_for_company(&txn, created.id, draft.social_links).await?;
    txn.commit().await?;
    info!(company_id = created.id, email = %created.email, "company_created");
    build_response(db, created).await
}

#[instrument(skip(db, req))]
pub async fn update_company(db: &DatabaseConnection, actor_email: &str, id: i64, req: CompanyRequest) -> Result<CompanyResponse, ServiceError> {
    let draft = req.validate()?;
    let existing = company::find_active_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Company"))?;
    if existing.email != company::normalize_email(actor_email) {
        return Err(ServiceError::Forbidden("Unauthorized to update this company".into()));
    }
    let txn = db.begin().await?;
    let mut am: company::ActiveModel = existing.into();
    am.company_name = Set(draft.company_name);
    am.description = Set(draft.description);
    am.company_type = Set(draft.company_type);
    am.city = Set(draft.city);
    am.phone_number = Set(draft.phone_number);
    am.logo_url = Set(draft.logo_url);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await?;
    offering::replace_for_company(&txn, updated.id, &draft.offerings).await?;
    social_link::upsert_for_company(&txn, updated.id, draft.social_links).await?;
    txn.commit().await?;
    info!(company_id = updated.id, "company_updated");
    build_response(db, updated).await
}

pub async fn get_my_company(db: &DatabaseConnection, actor_email: &str) -> Result<CompanyResponse, ServiceError> {
    let found = company::find_active_by_email(db, actor_email)
        .await?
        .ok_or_else(|| ServiceError::NotFound("No company found for this user".into()))?;
    build_response(db, found).await
}

/// Active companies, optionally filtered by type.
pub async fn get_all_companies(db: &DatabaseConnection, company_type: Option<&str>) -> Result<Vec<CompanyResponse>, ServiceError> {
    let mut query = company::Entity::find().filter(company::Column::IsActive.eq(true));
    if let Some(t) = company_type.filter(|t| !t.trim().is_empty()) {
        let parsed: CompanyType = t.parse()?;
        query = query.filter(company::Column::CompanyType.eq(parsed));
    }
    let found = query.order_by_asc(company::Column::CompanyName).all(db).await?;
    build_responses(db, found).await
}

pub async fn get_company_by_id(db: &DatabaseConnection, id: i64) -> Result<CompanyResponse, ServiceError> {
    let found = company::find_active_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Company"))?;
    build_response(db, found).await
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim().to_lowercase())
}

/// Case-insensitive substring match on name or description.
pub async fn search_companies(db: &DatabaseConnection, keyword: &str) -> Result<Vec<CompanyResponse>, ServiceError> {
    let pattern = like_pattern(keyword);
    let found = company::Entity::find()
        .filter(company::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(company::Column::CompanyName))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(company::Column::Description))).like(pattern)),
        )
        .order_by_asc(company::Column::CompanyName)
        .all(db)
        .await?;
    build_responses(db, found).await
}

/// Active companies listing a matching active offering.
pub async fn search_by_offering(db: &DatabaseConnection, term: &str) -> Result<Vec<CompanyResponse>, ServiceError> {
    let company_ids: Vec<i64> = offering::Entity::find()
        .select_only()
        .column(offering::Column::CompanyId)
        .distinct()
        .filter(offering::Column::IsActive.eq(true))
        .filter(Expr::expr(Func::lower(Expr::col(offering::Column::OfferingName))).like(like_pattern(term)))
        .into_tuple()
        .all(db)
        .await?;
    if company_ids.is_empty() {
        return Ok(vec![]);
    }
    let found = company::Entity::find()
        .filter(company::Column::Id.is_in(company_ids))
        .filter(company::Column::IsActive.eq(true))
        .order_by_asc(company::Column::CompanyName)
        .all(db)
        .await?;
    build_responses(db, found).await
}

#[instrument(skip(db))]
pub async fn delete_company(db: &DatabaseConnection, actor_email: &str, id: i64) -> Result<(), ServiceError> {
    let existing = company::find_active_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Company"))?;
    if existing.email != company::normalize_email(actor_email) {
        return Err(ServiceError::Forbidden("Unauthorized to delete this company".into()));
    }
    company::soft_delete(db, existing).await?;
    info!(company_id = id, "company_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{company_request, get_db};

    #[tokio::test]
    async fn create_then_fetch_and_refuse_second() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let created = create_company(&db, "Founder@Acme.io", company_request("Acme", &["Cloud", "AI"])).await?;
        assert_eq!(created.email, "founder@acme.io");
        assert_eq!(created.offerings, vec!["Cloud".to_string(), "AI".to_string()]);
        assert_eq!(created.company_type, CompanyType::Startup);

        let mine = get_my_company(&db, "founder@acme.io").await?;
        assert_eq!(mine.company_id, created.company_id);

        let err = create_company(&db, "founder@acme.io", company_request("Again", &["X"])).await.unwrap_err();
        assert_eq!(err.to_string(), "You already have a registered company");
        Ok(())
    }

    #[tokio::test]
    async fn validation_messages_surface() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let no_offerings = company_request("Acme", &[]);
        let err = create_company(&db, "a@acme.io", no_offerings).await.unwrap_err();
        assert_eq!(err.to_string(), "At least one offering is required");

        let mut bad_type = company_request("Acme", &["X"]);
        bad_type.company_type = "AGENCY".into();
        let err = create_company(&db, "a@acme.io", bad_type).await.unwrap_err();
        assert_eq!(err.to_string(), "Company type must be STARTUP or SERVICE_PROVIDER");

        let mut bad_phone = company_request("Acme", &["X"]);
        bad_phone.phone_number = Some("12ab".into());
        let err = create_company(&db, "a@acme.io", bad_phone).await.unwrap_err();
        assert_eq!(err.to_string(), "Phone number must be 10 digits");
        Ok(())
    }

    #[tokio::test]
    async fn only_owner_updates_and_offerings_are_replaced() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let created = create_company(&db, "owner@acme.io", company_request("Acme", &["Cloud"])).await?;

        let err = update_company(&db, "intruder@evil.io", created.company_id, company_request("Evil", &["X"])).await.unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized to update this company");

        let mut req = company_request("Acme Labs", &["Robotics", "IoT"]);
        req.social_links.website = Some("https://acme.io".into());
        let updated = update_company(&db, "owner@acme.io", created.company_id, req).await?;
        assert_eq!(updated.company_name, "Acme Labs");
        assert_eq!(updated.offerings, vec!["Robotics".to_string(), "IoT".to_string()]);
        assert_eq!(updated.social_links.website.as_deref(), Some("https://acme.io"));
        Ok(())
    }

    #[tokio::test]
    async fn search_and_filters_skip_deleted() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = create_company(&db, "a@x.io", company_request("Rocket Science", &["Launch Services"])).await?;
        let mut sp = company_request("Helper", &["Bookkeeping"]);
        sp.company_type = "SERVICE_PROVIDER".into();
        sp.description = Some("We do rocket paperwork".into());
        let b = create_company(&db, "b@x.io", sp).await?;

        let hits = search_companies(&db, "ROCKET").await?;
        assert_eq!(hits.len(), 2);

        let by_offering = search_by_offering(&db, "launch").await?;
        assert_eq!(by_offering.len(), 1);
        assert_eq!(by_offering[0].company_id, a.company_id);

        let providers = get_all_companies(&db, Some("SERVICE_PROVIDER")).await?;
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].company_id, b.company_id);

        delete_company(&db, "b@x.io", b.company_id).await?;
        assert_eq!(search_companies(&db, "rocket").await?.len(), 1);
        assert!(matches!(get_company_by_id(&db, b.company_id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_requires_owner() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = create_company(&db, "own@x.io", company_request("Own", &["A"])).await?;
        let err = delete_company(&db, "other@x.io", c.company_id).await.unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized to delete this company");
        Ok(())
    }

    #[tokio::test]
    async fn deleted_company_can_register_again() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let c = create_company(&db, "again@x.io", company_request("First", &["A"])).await?;
        delete_company(&db, "again@x.io", c.company_id).await?;
        let second = create_company(&db, "again@x.io", company_request("Second", &["B"])).await?;
        assert_ne!(second.company_id, c.company_id);
        Ok(())
    }
}
