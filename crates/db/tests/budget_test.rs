//! Integration tests for FNB tracking, manual lines and the budget view.

mod common;

use rust_decimal_macros::dec;
use shootlogix_core::resource::ResourceKind;
use shootlogix_db::repositories::{
    BudgetLineError, CreateAssignmentInput, CreateBudgetLineInput, CreateFnbCategoryInput,
    CreateFnbItemInput, CreateLocationInput, FnbError, UpsertFnbEntryInput,
    UpsertLocationScheduleInput,
};
use shootlogix_db::{
    AssignmentRepository, BudgetRepository, FnbRepository, LocationRepository,
    ProductionRepository,
};

use common::{create_function, create_production, create_resource, test_db};

async fn seed_fnb(db: &sea_orm::DatabaseConnection, production_id: i32) {
    let repo = FnbRepository::new(db.clone());
    let drinks = repo
        .create_category(
            production_id,
            CreateFnbCategoryInput {
                name: "DRINKS".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let water = repo
        .create_item(
            production_id,
            CreateFnbItemInput {
                category_id: Some(drinks.id),
                name: "WATER 1.5L".to_string(),
                unit_price: Some(dec!(1.5)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    for (entry_type, qty) in [("purchase", dec!(100)), ("consumption", dec!(40))] {
        repo.upsert_entry(
            production_id,
            UpsertFnbEntryInput {
                item_id: Some(water.id),
                entry_type: entry_type.to_string(),
                date: "2026-03-20".to_string(),
                quantity: Some(qty),
                notes: None,
            },
        )
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn test_fnb_category_names_unique_per_production() {
    let db = test_db().await;
    let first = create_production(&db, "FIRST").await;
    let second = create_production(&db, "SECOND").await;
    let repo = FnbRepository::new(db.clone());
    let input = CreateFnbCategoryInput {
        name: "SNACKS".to_string(),
        ..Default::default()
    };

    repo.create_category(first, input.clone()).await.unwrap();
    assert!(matches!(
        repo.create_category(first, input.clone()).await,
        Err(FnbError::DuplicateCategory(_))
    ));
    repo.create_category(second, input).await.unwrap();
}

#[tokio::test]
async fn test_fnb_entries_upsert_and_budget() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    seed_fnb(&db, production_id).await;
    let repo = FnbRepository::new(db.clone());

    let entries = repo.list_entries(production_id).await.unwrap();
    assert_eq!(entries.len(), 2);

    // Same item, type and day: replaces the quantity.
    repo.upsert_entry(
        production_id,
        UpsertFnbEntryInput {
            item_id: Some(entries[0].item_id),
            entry_type: "purchase".to_string(),
            date: "2026-03-20".to_string(),
            quantity: Some(dec!(120)),
            notes: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(repo.list_entries(production_id).await.unwrap().len(), 2);

    let budget = repo.budget(production_id).await.unwrap();
    assert_eq!(budget.grand_purchase, dec!(180));
    assert_eq!(budget.grand_consumption, dec!(60));
    assert_eq!(budget.balance, dec!(120));

    let bad_type = repo
        .upsert_entry(
            production_id,
            UpsertFnbEntryInput {
                item_id: Some(entries[0].item_id),
                entry_type: "waste".to_string(),
                date: "2026-03-20".to_string(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(bad_type, Err(FnbError::InvalidEntry(_))));
}

#[tokio::test]
async fn test_manual_line_amounts() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let fuel = ProductionRepository::new(db.clone())
        .list_departments(production_id)
        .await
        .unwrap()
        .into_iter()
        .find(|d| d.name == "FUEL")
        .unwrap();
    let repo = BudgetRepository::new(db.clone());

    let line = repo
        .create_line(
            production_id,
            CreateBudgetLineInput {
                department_id: Some(fuel.id),
                name: "JERRY CANS".to_string(),
                qty_estimate: Some(dec!(3)),
                unit_price_estimate: Some(dec!(12.345)),
                qty_actual: Some(dec!(2)),
                unit_price_actual: Some(dec!(12)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(line.amount_estimate, dec!(37.04));
    assert_eq!(line.amount_actual, Some(dec!(24)));
    assert_eq!(line.source, "manual");
    assert_eq!(line.unit, "day");

    let blank = repo
        .create_line(production_id, CreateBudgetLineInput::default())
        .await;
    assert!(matches!(blank, Err(BudgetLineError::Invalid(_))));

    repo.delete_line(production_id, line.id).await.unwrap();
    assert!(matches!(
        repo.delete_line(production_id, line.id).await,
        Err(BudgetLineError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_budget_report_rolls_up_every_department() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let function_id = create_function(&db, production_id, "UNIT GAMES 2").await;
    let boat = create_resource(&db, production_id, ResourceKind::Boat, "ORCA", dec!(300)).await;
    AssignmentRepository::new(db.clone())
        .create(
            production_id,
            ResourceKind::Boat,
            CreateAssignmentInput {
                function_id: Some(function_id),
                resource_id: Some(boat),
                start_date: Some("2026-03-20".to_string()),
                end_date: Some("2026-04-25".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    seed_fnb(&db, production_id).await;

    let locations = LocationRepository::new(db.clone());
    locations
        .create_site(
            production_id,
            CreateLocationInput {
                name: "CHAPERA".to_string(),
                global_deal: Some(dec!(5000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    locations
        .upsert_schedule(
            production_id,
            UpsertLocationScheduleInput {
                location_name: "CHAPERA".to_string(),
                date: "2026-03-20".to_string(),
                status: "F".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    BudgetRepository::new(db.clone())
        .create_line(
            production_id,
            CreateBudgetLineInput {
                name: "INSURANCE".to_string(),
                qty_estimate: Some(dec!(1)),
                unit_price_estimate: Some(dec!(1000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let report = BudgetRepository::new(db.clone())
        .report(production_id)
        .await
        .unwrap();

    let departments: Vec<&str> = report.by_department.names().collect();
    assert_eq!(departments, ["BOATS", "FNB", "FUEL", "LOCATIONS", "OTHER"]);
    assert_eq!(
        report.by_department.get("BOATS").unwrap().total_estimate,
        dec!(9300)
    );
    assert_eq!(
        report.by_department.get("LOCATIONS").unwrap().total_estimate,
        dec!(5000)
    );
    // 9300 boats + 150 fnb + 179300 fuel + 5000 locations + 1000 manual
    assert_eq!(report.grand_total_estimate, dec!(194750));
    assert_eq!(report.fnb_purchase_total, dec!(150));
    assert_eq!(report.fnb_consumption_total, dec!(60));
}

#[tokio::test]
async fn test_manual_lines_follow_department_creation_order() {
    use sea_orm::{ActiveModelTrait, Set};
    use shootlogix_db::entities::departments;

    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let out = ProductionRepository::new(db.clone())
        .list_departments(production_id)
        .await
        .unwrap()
        .into_iter()
        .find(|d| d.name == "OUT")
        .unwrap();
    // Added after seeding, so it sorts after OUT by ID but before it by name.
    let art = departments::ActiveModel {
        production_id: Set(production_id),
        name: Set("ART".to_string()),
        status_global: Set("to_complete".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let repo = BudgetRepository::new(db.clone());
    for (department_id, name) in [(art.id, "PAINT"), (out.id, "RENTALS")] {
        repo.create_line(
            production_id,
            CreateBudgetLineInput {
                department_id: Some(department_id),
                name: name.to_string(),
                qty_estimate: Some(dec!(1)),
                unit_price_estimate: Some(dec!(10)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let report = repo.report(production_id).await.unwrap();
    let departments: Vec<&str> = report.by_department.names().collect();
    assert_eq!(departments, ["FUEL", "OUT", "ART"]);
}
