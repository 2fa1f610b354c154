use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};

use super::setup_test_db;
use crate::company::{self, CompanyType, NewCompany};
use crate::errors::ModelError;
use crate::social_link::SocialLinks;
use crate::{city, collaboration, enquiry, event, event_participant, message, offering, social_link};

async fn company_named(db: &DatabaseConnection, name: &str) -> Result<company::Model> {
    let created = company::create(
        db,
        NewCompany {
            email: format!("{}@example.com", name.to_lowercase()),
            company_name: name.to_string(),
            description: Some("Builds things".into()),
            company_type: CompanyType::Startup,
            city: Some("Pune".into()),
            phone_number: Some("9876543210".into()),
            logo_url: None,
        },
    )
    .await?;
    Ok(created)
}

#[tokio::test]
async fn company_create_normalizes_email_and_finds_active() -> Result<()> {
    let db = setup_test_db().await?;
    let created = company::create(
        &db,
        NewCompany {
            email: "  Founder@Acme.IO ".into(),
            company_name: "Acme".into(),
            description: None,
            company_type: CompanyType::ServiceProvider,
            city: None,
            phone_number: None,
            logo_url: None,
        },
    )
    .await?;
    assert_eq!(created.email, "founder@acme.io");
    assert!(created.is_active);

    let found = company::find_active_by_email(&db, "FOUNDER@acme.io").await?;
    assert_eq!(found.map(|c| c.id), Some(created.id));
    Ok(())
}

#[tokio::test]
async fn company_validation_messages() -> Result<()> {
    assert!(matches!(company::validate_name("  "), Err(ModelError::Validation(m)) if m == "Company name is required"));
    assert!(company::validate_name(&"a".repeat(256)).is_err());
    assert!(company::validate_description(Some(&"d".repeat(151))).is_err());
    assert!(company::validate_description(Some(&"d".repeat(150))).is_ok());
    assert!(company::validate_phone(Some("12345")).is_err());
    assert!(company::validate_phone(Some("12345abcde")).is_err());
    assert!(company::validate_phone(Some("0123456789")).is_ok());
    assert!(company::validate_phone(None).is_ok());
    assert!(company::validate_email("no-at-sign").is_err());
    assert!(company::validate_email("a@b").is_err());
    assert!(company::validate_email("a@b.co").is_ok());
    assert_eq!("service_provider".parse::<CompanyType>().ok(), Some(CompanyType::ServiceProvider));
    assert!("AGENCY".parse::<CompanyType>().is_err());
    Ok(())
}

#[tokio::test]
async fn offerings_are_replaced_not_appended() -> Result<()> {
    let db = setup_test_db().await?;
    let c = company_named(&db, "Replace").await?;
    offering::insert_many(&db, c.id, &["Design".into(), "Hosting".into()]).await?;
    offering::replace_for_company(&db, c.id, &["Consulting".into()]).await?;

    let active = offering::active_for_companies(&db, vec![c.id]).await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].offering_name, "Consulting");

    let all = offering::Entity::find().all(&db).await?;
    assert_eq!(all.len(), 3);
    assert!(all.iter().filter(|o| !o.is_active).all(|o| o.deleted_at.is_some()));
    Ok(())
}

#[test]
fn offering_names_require_one_non_blank() {
    assert!(offering::validate_names(&[]).is_err());
    assert!(offering::validate_names(&["  ".into()]).is_err());
    let cleaned = offering::validate_names(&[" Cloud ".into(), "".into()]).unwrap();
    assert_eq!(cleaned, vec!["Cloud".to_string()]);
}

#[tokio::test]
async fn social_links_upsert_keeps_single_row() -> Result<()> {
    let db = setup_test_db().await?;
    let c = company_named(&db, "Links").await?;
    let first = social_link::upsert_for_company(&db, c.id, SocialLinks { website: Some("https://a.io".into()), ..Default::default() }).await?;
    let second = social_link::upsert_for_company(&db, c.id, SocialLinks { linkedin: Some("https://linkedin.com/a".into()), ..Default::default() }).await?;
    assert_eq!(first.id, second.id);
    assert_eq!(second.website, None);
    assert_eq!(second.linkedin.as_deref(), Some("https://linkedin.com/a"));

    let too_long = SocialLinks { twitter: Some("x".repeat(501)), ..Default::default() };
    assert!(social_link::upsert_for_company(&db, c.id, too_long).await.is_err());
    Ok(())
}

#[tokio::test]
async fn collaboration_rejects_self_and_starts_pending() -> Result<()> {
    let db = setup_test_db().await?;
    let a = company_named(&db, "Alpha").await?;
    let b = company_named(&db, "Beta").await?;

    let err = collaboration::create(&db, a.id, a.id, None).await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot send collaboration request to your own company");

    let c = collaboration::create(&db, a.id, b.id, Some("Let's partner".into())).await?;
    assert_eq!(c.status, collaboration::CollaborationStatus::Pending);
    let accepted = collaboration::set_status(&db, c, collaboration::CollaborationStatus::Accepted).await?;
    assert_eq!(accepted.status, collaboration::CollaborationStatus::Accepted);
    Ok(())
}

#[tokio::test]
async fn messages_list_in_send_order_and_mark_read() -> Result<()> {
    let db = setup_test_db().await?;
    let a = company_named(&db, "Sender").await?;
    let b = company_named(&db, "Receiver").await?;
    let c = collaboration::create(&db, a.id, b.id, None).await?;

    assert!(message::create(&db, c.id, a.id, "   ").await.is_err());
    let m1 = message::create(&db, c.id, a.id, "first").await?;
    let _m2 = message::create(&db, c.id, b.id, "second").await?;

    let thread = message::active_in_collaboration(&db, c.id).await?;
    let contents: Vec<_> = thread.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second"]);

    let read = message::mark_read(&db, m1).await?;
    assert!(read.is_read);
    Ok(())
}

#[tokio::test]
async fn participant_counting_ignores_cancelled() -> Result<()> {
    let db = setup_test_db().await?;
    let host = company_named(&db, "Host").await?;
    let guest = company_named(&db, "Guest").await?;
    let ev = event::create(
        &db,
        &host,
        event::EventFields {
            event_name: "Demo Day".into(),
            event_description: None,
            event_date: (Utc::now() + Duration::days(3)).into(),
            location: Some("Pune".into()),
            max_participants: Some(10),
            event_type: Some("MEETUP".into()),
        },
    )
    .await?;
    assert_eq!(ev.organizer, "Host");

    let reg = event_participant::register(&db, ev.id, guest.id).await?;
    assert_eq!(event_participant::count_registered(&db, ev.id).await?, 1);
    assert_eq!(event_participant::registered_event_ids(&db, guest.id, vec![ev.id]).await?, vec![ev.id]);

    event_participant::cancel(&db, reg).await?;
    assert_eq!(event_participant::count_registered(&db, ev.id).await?, 0);
    assert!(event_participant::count_registered_by_event(&db, vec![ev.id]).await?.is_empty());
    assert!(event_participant::find_active(&db, ev.id, guest.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn grouped_registration_counts_match_per_event_counts() -> Result<()> {
    let db = setup_test_db().await?;
    let host = company_named(&db, "Host").await?;
    let guests = [company_named(&db, "G1").await?, company_named(&db, "G2").await?, company_named(&db, "G3").await?];
    let fields = |name: &str| event::EventFields {
        event_name: name.into(),
        event_description: None,
        event_date: (Utc::now() + Duration::days(5)).into(),
        location: None,
        max_participants: None,
        event_type: None,
    };
    let busy = event::create(&db, &host, fields("Busy")).await?;
    let quiet = event::create(&db, &host, fields("Quiet")).await?;
    let empty = event::create(&db, &host, fields("Empty")).await?;

    for g in &guests {
        event_participant::register(&db, busy.id, g.id).await?;
    }
    let dropped = event_participant::register(&db, quiet.id, guests[0].id).await?;
    event_participant::register(&db, quiet.id, guests[1].id).await?;
    event_participant::cancel(&db, dropped).await?;

    let counts = event_participant::count_registered_by_event(&db, vec![busy.id, quiet.id, empty.id]).await?;
    assert_eq!(counts.get(&busy.id), Some(&3));
    assert_eq!(counts.get(&quiet.id), Some(&1));
    assert_eq!(counts.get(&empty.id), None);
    assert!(event_participant::count_registered_by_event(&db, vec![]).await?.is_empty());
    Ok(())
}

#[test]
fn event_fields_validation() {
    let base = event::EventFields {
        event_name: "".into(),
        event_description: None,
        event_date: Utc::now().into(),
        location: None,
        max_participants: None,
        event_type: None,
    };
    assert!(base.validate().is_err());
    let zero_cap = event::EventFields { event_name: "Meetup".into(), max_participants: Some(0), ..base.clone() };
    assert!(zero_cap.validate().is_err());
    let ok = event::EventFields { event_name: "Meetup".into(), ..base };
    assert!(ok.validate().is_ok());
}

#[tokio::test]
async fn city_lookup_is_case_insensitive() -> Result<()> {
    let db = setup_test_db().await?;
    city::create(&db, "Bengaluru").await?;
    assert!(city::find_by_name_ignore_case(&db, "bengaluru").await?.is_some());
    assert!(city::find_by_name_ignore_case(&db, " BENGALURU ").await?.is_some());
    assert!(city::find_by_name_ignore_case(&db, "Mysuru").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn enquiry_starts_new_and_parses_status() -> Result<()> {
    let db = setup_test_db().await?;
    let e = enquiry::create(&db, "Riya", "riya@example.com", Some("9999999999".into()), "Need help").await?;
    assert_eq!(e.status, enquiry::EnquiryStatus::New);
    let status: enquiry::EnquiryStatus = "in_progress".parse()?;
    let updated = enquiry::set_status(&db, e, status).await?;
    assert_eq!(updated.status, enquiry::EnquiryStatus::InProgress);
    assert!("DONE".parse::<enquiry::EnquiryStatus>().is_err());
    assert!(enquiry::create(&db, "Riya", "riya@example.com", Some("123".into()), "Hi").await.is_err());
    Ok(())
}
