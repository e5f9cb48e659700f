//! Integration tests for shooting days, locations and guards.

mod common;

use rstest::rstest;
use rust_decimal_macros::dec;
use shootlogix_db::repositories::{
    CreateGuardPostInput, CreateLocationInput, CreateShootingDayInput, ScheduleError,
    ShootingDayError, UpdateShootingDayInput, UpsertGuardScheduleInput,
    UpsertLocationScheduleInput,
};
use shootlogix_db::{GuardRepository, LocationRepository, ShootingDayRepository};

use common::{create_production, test_db};

fn cell(location: &str, date: &str, status: &str) -> UpsertLocationScheduleInput {
    UpsertLocationScheduleInput {
        location_name: location.to_string(),
        date: date.to_string(),
        status: status.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_shooting_days_ordered_by_date() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let repo = ShootingDayRepository::new(db.clone());

    for date in ["2026-03-22", "2026-03-20", "2026-03-21"] {
        repo.create(
            production_id,
            CreateShootingDayInput {
                date: date.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }
    let days = repo.list(production_id).await.unwrap();
    let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(dates, ["2026-03-20", "2026-03-21", "2026-03-22"]);
    assert_eq!(days[0].status, "draft");

    let invalid = repo
        .create(production_id, CreateShootingDayInput::default())
        .await;
    assert!(matches!(invalid, Err(ShootingDayError::InvalidDate)));

    let updated = repo
        .update(
            production_id,
            days[0].id,
            UpdateShootingDayInput {
                game_name: Some(Some("TRIBAL".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.game_name.as_deref(), Some("TRIBAL"));

    repo.delete(production_id, days[0].id).await.unwrap();
    assert_eq!(repo.list(production_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_location_schedule_upsert_and_lock() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let repo = LocationRepository::new(db.clone());

    let first = repo
        .upsert_schedule(production_id, cell("CHAPERA", "2026-03-20", "P"))
        .await
        .unwrap();
    let again = repo
        .upsert_schedule(production_id, cell("CHAPERA", "2026-03-20", "F"))
        .await
        .unwrap();
    assert_eq!(first.id, again.id);
    assert_eq!(again.status, "F");
    assert_eq!(repo.list_schedules(production_id).await.unwrap().len(), 1);

    let bad_status = repo
        .upsert_schedule(production_id, cell("CHAPERA", "2026-03-21", "X"))
        .await;
    assert!(matches!(bad_status, Err(ScheduleError::InvalidStatus(_))));

    let changed = repo
        .set_locked(production_id, &["2026-03-20".to_string()], true)
        .await
        .unwrap();
    assert_eq!(changed, 1);

    let locked = repo
        .upsert_schedule(production_id, cell("CHAPERA", "2026-03-20", "W"))
        .await;
    assert!(matches!(locked, Err(ScheduleError::Locked)));
    assert!(matches!(
        repo.delete_schedule(production_id, first.id).await,
        Err(ScheduleError::Locked)
    ));

    repo.set_locked(production_id, &["2026-03-20".to_string()], false)
        .await
        .unwrap();
    repo.delete_schedule(production_id, first.id).await.unwrap();
    assert!(repo.list_schedules(production_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_location_budget_inputs() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let repo = LocationRepository::new(db.clone());

    repo.create_site(
        production_id,
        CreateLocationInput {
            name: "MOGO".to_string(),
            price_p: Some(dec!(100)),
            price_f: Some(dec!(200)),
            price_w: Some(dec!(50)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    for (date, status) in [("2026-03-20", "P"), ("2026-03-21", "F")] {
        repo.upsert_schedule(production_id, cell("MOGO", date, status))
            .await
            .unwrap();
    }

    let (sites, days) = repo.budget_inputs(production_id).await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].price_f, Some(dec!(200)));
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].status, "P");
}

#[tokio::test]
async fn test_guard_posts_and_schedules() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let repo = GuardRepository::new(db.clone());

    let post = repo
        .create_post(
            production_id,
            CreateGuardPostInput {
                name: "BASE CAMP GATE".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(post.daily_rate, dec!(45));

    let entry = repo
        .upsert_schedule(
            production_id,
            UpsertGuardScheduleInput {
                location_name: "CHAPERA".to_string(),
                date: "2026-03-20".to_string(),
                status: "F".to_string(),
                nb_guards: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(entry.nb_guards, 1);

    let updated = repo
        .upsert_schedule(
            production_id,
            UpsertGuardScheduleInput {
                location_name: "CHAPERA".to_string(),
                date: "2026-03-20".to_string(),
                status: "F".to_string(),
                nb_guards: Some(3),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, entry.id);

    let negative = repo
        .upsert_schedule(
            production_id,
            UpsertGuardScheduleInput {
                location_name: "CHAPERA".to_string(),
                date: "2026-03-21".to_string(),
                status: "F".to_string(),
                nb_guards: Some(-1),
            },
        )
        .await;
    assert!(matches!(negative, Err(ScheduleError::NegativeGuards)));

    let days = repo.budget_inputs(production_id).await.unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].nb_guards, 3);
}

#[rstest]
#[case("CHAPERA", "2026-03-20", "p")]
#[case("CHAPERA", "2026-03-20", "")]
#[case("CHAPERA", "20/03/2026", "P")]
#[case("  ", "2026-03-20", "P")]
#[tokio::test]
async fn test_location_cell_rejects_bad_input(
    #[case] location: &str,
    #[case] date: &str,
    #[case] status: &str,
) {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;

    let result = LocationRepository::new(db.clone())
        .upsert_schedule(production_id, cell(location, date, status))
        .await;

    assert!(matches!(
        result,
        Err(ScheduleError::InvalidStatus(_)
            | ScheduleError::InvalidDate
            | ScheduleError::Required(_))
    ));
}
