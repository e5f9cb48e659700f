//! Integration tests for assignments, history and undo.

mod common;

use rust_decimal_macros::dec;
use serde_json::json;
use shootlogix_core::resource::ResourceKind;
use shootlogix_db::repositories::{
    AssignmentError, CreateAssignmentInput, CreateResourceInput, DEFAULT_HISTORY_LIMIT,
    ResourceError, UndoOutcome, UpdateAssignmentInput,
};
use shootlogix_db::{
    AssignmentRepository, FunctionRepository, HistoryRepository, ResourceRepository,
};

use common::{create_function, create_production, create_resource, test_db};

fn march_input(function_id: i32, resource_id: i32) -> CreateAssignmentInput {
    CreateAssignmentInput {
        function_id: Some(function_id),
        resource_id: Some(resource_id),
        start_date: Some("2026-03-20".to_string()),
        end_date: Some("2026-04-25".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_returns_costed_detail() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let function_id = create_function(&db, production_id, "UNIT GAMES 2").await;
    let boat_id =
        create_resource(&db, production_id, ResourceKind::Boat, "BLUE MARLIN", dec!(300)).await;
    let repo = AssignmentRepository::new(db.clone());

    let mut input = march_input(function_id, boat_id);
    input.day_overrides = Some(json!({"2026-03-23": "empty"}));
    let detail = repo
        .create(production_id, ResourceKind::Boat, input, Some(1))
        .await
        .unwrap();

    assert_eq!(detail.function_name, "UNIT GAMES 2");
    assert_eq!(detail.resource_name.as_deref(), Some("BLUE MARLIN"));
    assert_eq!(detail.vendor.as_deref(), Some("AQUA SERVICES"));
    assert_eq!(detail.working_days, 30);
    assert_eq!(detail.amount_estimate, dec!(9000));
    assert_eq!(detail.amount_actual, None);
    assert_eq!(detail.assignment_status, "confirmed");
}

#[tokio::test]
async fn test_price_override_applies_to_estimate_only() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let function_id = create_function(&db, production_id, "SAFETY").await;
    let resources = ResourceRepository::new(db.clone());
    let boat = resources
        .create(
            production_id,
            ResourceKind::SecurityBoat,
            shootlogix_db::repositories::CreateResourceInput {
                name: "GUARDIAN".to_string(),
                daily_rate_estimate: Some(dec!(250)),
                daily_rate_actual: Some(dec!(280)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut input = march_input(function_id, boat.id);
    input.price_override = Some(dec!(200));
    let detail = AssignmentRepository::new(db.clone())
        .create(production_id, ResourceKind::SecurityBoat, input, None)
        .await
        .unwrap();

    assert_eq!(detail.working_days, 31);
    assert_eq!(detail.amount_estimate, dec!(6200));
    assert_eq!(detail.amount_actual, Some(dec!(8680)));
}

#[tokio::test]
async fn test_validation_errors() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let other_production = create_production(&db, "OTHER").await;
    let function_id = create_function(&db, production_id, "GAMES").await;
    let foreign_function = create_function(&db, other_production, "GAMES").await;
    let helper_id =
        create_resource(&db, production_id, ResourceKind::Helper, "JOSE", dec!(40)).await;
    let repo = AssignmentRepository::new(db.clone());
    let kind = ResourceKind::Boat;

    let missing = repo
        .create(production_id, kind, CreateAssignmentInput::default(), None)
        .await;
    assert!(matches!(missing, Err(AssignmentError::FunctionRequired)));

    let foreign = repo
        .create(
            production_id,
            kind,
            CreateAssignmentInput {
                function_id: Some(foreign_function),
                ..Default::default()
            },
            None,
        )
        .await;
    assert!(matches!(foreign, Err(AssignmentError::FunctionNotFound(_))));

    let wrong_kind = repo
        .create(production_id, kind, march_input(function_id, helper_id), None)
        .await;
    assert!(matches!(wrong_kind, Err(AssignmentError::ResourceNotFound(_))));

    let bad_date = repo
        .create(
            production_id,
            kind,
            CreateAssignmentInput {
                function_id: Some(function_id),
                start_date: Some("20/03/2026".to_string()),
                ..Default::default()
            },
            None,
        )
        .await;
    assert!(matches!(bad_date, Err(AssignmentError::InvalidDate("start_date"))));

    let reversed = repo
        .create(
            production_id,
            kind,
            CreateAssignmentInput {
                function_id: Some(function_id),
                start_date: Some("2026-04-25".to_string()),
                end_date: Some("2026-03-20".to_string()),
                ..Default::default()
            },
            None,
        )
        .await;
    assert!(matches!(reversed, Err(AssignmentError::DateOrder)));

    let bad_overrides = repo
        .create(
            production_id,
            kind,
            CreateAssignmentInput {
                function_id: Some(function_id),
                day_overrides: Some(json!({"2026-03-23": 1})),
                ..Default::default()
            },
            None,
        )
        .await;
    assert!(matches!(
        bad_overrides,
        Err(AssignmentError::InvalidOverrides(_))
    ));
}

#[tokio::test]
async fn test_listing_is_scoped_by_kind_and_ordered_by_function() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let functions = FunctionRepository::new(db.clone());
    let late = functions
        .create(
            production_id,
            shootlogix_db::repositories::CreateFunctionInput {
                name: "LATE".to_string(),
                sort_order: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let early = functions
        .create(
            production_id,
            shootlogix_db::repositories::CreateFunctionInput {
                name: "EARLY".to_string(),
                sort_order: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let boat = create_resource(&db, production_id, ResourceKind::Boat, "A", dec!(100)).await;
    let van = create_resource(&db, production_id, ResourceKind::Transport, "VAN", dec!(80)).await;
    let repo = AssignmentRepository::new(db.clone());

    repo.create(production_id, ResourceKind::Boat, march_input(late.id, boat), None)
        .await
        .unwrap();
    repo.create(production_id, ResourceKind::Boat, march_input(early.id, boat), None)
        .await
        .unwrap();
    repo.create(production_id, ResourceKind::Transport, march_input(early.id, van), None)
        .await
        .unwrap();

    let boats = repo.list(production_id, ResourceKind::Boat).await.unwrap();
    let names: Vec<&str> = boats.iter().map(|d| d.function_name.as_str()).collect();
    assert_eq!(names, ["EARLY", "LATE"]);

    let all = repo.budget_inputs(production_id).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_out_of_range_rates_are_rejected() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let function_id = create_function(&db, production_id, "GAMES").await;
    let boat = create_resource(&db, production_id, ResourceKind::Boat, "ORCA", dec!(100)).await;
    let huge = dec!(10_000_000_000);

    let result = ResourceRepository::new(db.clone())
        .create(
            production_id,
            ResourceKind::Boat,
            CreateResourceInput {
                name: "TITAN".to_string(),
                daily_rate_estimate: Some(huge),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ResourceError::InvalidRate(_))));

    let repo = AssignmentRepository::new(db.clone());
    let mut input = march_input(function_id, boat);
    input.price_override = Some(huge);
    let result = repo.create(production_id, ResourceKind::Boat, input, None).await;
    assert!(matches!(result, Err(AssignmentError::InvalidPrice(_))));

    let created = repo
        .create(production_id, ResourceKind::Boat, march_input(function_id, boat), None)
        .await
        .unwrap();
    let result = repo
        .update(
            production_id,
            ResourceKind::Boat,
            created.id,
            UpdateAssignmentInput {
                price_override: Some(Some(huge)),
                ..Default::default()
            },
            None,
        )
        .await;
    assert!(matches!(result, Err(AssignmentError::InvalidPrice(_))));
}

#[tokio::test]
async fn test_undo_create_update_and_delete() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let function_id = create_function(&db, production_id, "GAMES").await;
    let boat = create_resource(&db, production_id, ResourceKind::Boat, "ORCA", dec!(100)).await;
    let repo = AssignmentRepository::new(db.clone());
    let history = HistoryRepository::new(db.clone());
    let kind = ResourceKind::Boat;

    let created = repo
        .create(production_id, kind, march_input(function_id, boat), Some(7))
        .await
        .unwrap();
    repo.update(
        production_id,
        kind,
        created.id,
        UpdateAssignmentInput {
            notes: Some(Some("night shoot".to_string())),
            end_date: Some(Some("2026-03-31".to_string())),
            ..Default::default()
        },
        Some(7),
    )
    .await
    .unwrap();
    repo.delete(production_id, kind, created.id, Some(7))
        .await
        .unwrap();

    let entries = history
        .list(production_id, DEFAULT_HISTORY_LIMIT)
        .await
        .unwrap();
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, ["delete", "update", "create"]);
    assert_eq!(entries[0].user_id, Some(7));

    // Undo delete: the updated row is back under its original id.
    let outcome = history.undo_latest(production_id).await.unwrap();
    let UndoOutcome::Undone { restored } = outcome else {
        panic!("expected an undo");
    };
    assert_eq!(restored.unwrap()["id"], json!(created.id));
    let restored = repo.detail(production_id, kind, created.id).await.unwrap();
    assert_eq!(restored.notes.as_deref(), Some("night shoot"));
    assert_eq!(restored.end_date.as_deref(), Some("2026-03-31"));

    // Undo update: the original dates come back.
    history.undo_latest(production_id).await.unwrap();
    let original = repo.detail(production_id, kind, created.id).await.unwrap();
    assert_eq!(original.end_date.as_deref(), Some("2026-04-25"));
    assert_eq!(original.notes, None);

    // Undo create: the row is gone.
    let outcome = history.undo_latest(production_id).await.unwrap();
    assert_eq!(outcome, UndoOutcome::Undone { restored: None });
    assert!(repo.list(production_id, kind).await.unwrap().is_empty());

    assert_eq!(
        history.undo_latest(production_id).await.unwrap(),
        UndoOutcome::Nothing
    );
}

#[tokio::test]
async fn test_undo_skips_entry_whose_function_was_deleted() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let function_id = create_function(&db, production_id, "GAMES").await;
    let boat = create_resource(&db, production_id, ResourceKind::Boat, "ORCA", dec!(100)).await;
    let repo = AssignmentRepository::new(db.clone());
    let history = HistoryRepository::new(db.clone());
    let kind = ResourceKind::Boat;

    let created = repo
        .create(production_id, kind, march_input(function_id, boat), None)
        .await
        .unwrap();
    repo.delete(production_id, kind, created.id, None)
        .await
        .unwrap();
    FunctionRepository::new(db.clone())
        .delete(production_id, function_id)
        .await
        .unwrap();

    let outcome = history.undo_latest(production_id).await.unwrap();
    assert!(matches!(outcome, UndoOutcome::Skipped { .. }));
    assert!(repo.list(production_id, kind).await.unwrap().is_empty());

    // The stale entry is consumed so the older one is reachable.
    let entries = history.list(production_id, DEFAULT_HISTORY_LIMIT).await.unwrap();
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, ["create"]);

    assert_eq!(
        history.undo_latest(production_id).await.unwrap(),
        UndoOutcome::Undone { restored: None }
    );
    assert_eq!(
        history.undo_latest(production_id).await.unwrap(),
        UndoOutcome::Nothing
    );
}

#[tokio::test]
async fn test_undo_skips_entry_whose_resource_was_deleted() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let function_id = create_function(&db, production_id, "GAMES").await;
    let boat = create_resource(&db, production_id, ResourceKind::Boat, "ORCA", dec!(100)).await;
    let repo = AssignmentRepository::new(db.clone());
    let kind = ResourceKind::Boat;

    let created = repo
        .create(production_id, kind, march_input(function_id, boat), None)
        .await
        .unwrap();
    repo.update(
        production_id,
        kind,
        created.id,
        UpdateAssignmentInput {
            notes: Some(Some("moved".to_string())),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap();
    ResourceRepository::new(db.clone())
        .delete(production_id, kind, boat)
        .await
        .unwrap();

    let outcome = HistoryRepository::new(db.clone())
        .undo_latest(production_id)
        .await
        .unwrap();
    assert!(matches!(outcome, UndoOutcome::Skipped { .. }));
    assert!(repo.list(production_id, kind).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_undo_is_scoped_to_production() {
    let db = test_db().await;
    let first = create_production(&db, "FIRST").await;
    let second = create_production(&db, "SECOND").await;
    let function_id = create_function(&db, first, "GAMES").await;
    let boat = create_resource(&db, first, ResourceKind::Boat, "ORCA", dec!(100)).await;

    AssignmentRepository::new(db.clone())
        .create(first, ResourceKind::Boat, march_input(function_id, boat), None)
        .await
        .unwrap();

    let history = HistoryRepository::new(db.clone());
    assert_eq!(
        history.undo_latest(second).await.unwrap(),
        UndoOutcome::Nothing
    );
    assert_eq!(history.list(first, 50).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_clear_function_and_cascades() {
    let db = test_db().await;
    let production_id = create_production(&db, "KLAS7").await;
    let function_id = create_function(&db, production_id, "GAMES").await;
    let other_function = create_function(&db, production_id, "SAFETY").await;
    let boat = create_resource(&db, production_id, ResourceKind::Boat, "ORCA", dec!(100)).await;
    let repo = AssignmentRepository::new(db.clone());
    let kind = ResourceKind::Boat;

    for _ in 0..2 {
        repo.create(production_id, kind, march_input(function_id, boat), None)
            .await
            .unwrap();
    }
    repo.create(production_id, kind, march_input(other_function, boat), None)
        .await
        .unwrap();

    let cleared = repo
        .clear_function(production_id, kind, function_id, None)
        .await
        .unwrap();
    assert_eq!(cleared, 2);
    assert_eq!(repo.list(production_id, kind).await.unwrap().len(), 1);

    FunctionRepository::new(db.clone())
        .delete(production_id, other_function)
        .await
        .unwrap();
    assert!(repo.list(production_id, kind).await.unwrap().is_empty());

    repo.create(production_id, kind, march_input(function_id, boat), None)
        .await
        .unwrap();
    ResourceRepository::new(db.clone())
        .delete(production_id, kind, boat)
        .await
        .unwrap();
    assert!(repo.list(production_id, kind).await.unwrap().is_empty());
}
