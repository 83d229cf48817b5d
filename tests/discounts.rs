use chrono::{NaiveDate, TimeZone, Utc};
use furbish_storefront::{
    dto::discounts::DiscountForm,
    error::AppError,
    models::{DiscountStatus, DiscountType},
    services::discount_service::DiscountRegistry,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn form(code: &str) -> DiscountForm {
    DiscountForm {
        code: code.to_string(),
        kind: DiscountType::Percentage,
        value: 15,
        min_purchase: 5_000,
        max_uses: Some(100),
        start_date: day(2026, 10, 1),
        end_date: day(2026, 12, 31),
        is_active: true,
    }
}

fn rejection(result: Result<impl std::fmt::Debug, AppError>) -> String {
    match result {
        Err(AppError::BadRequest(message)) => message,
        other => panic!("expected a bad request, got {other:?}"),
    }
}

#[tokio::test]
async fn samples_are_loaded() {
    let registry = DiscountRegistry::with_samples();
    let codes: Vec<String> = registry.list().await.into_iter().map(|d| d.code).collect();
    assert_eq!(codes, ["SUMMER25", "WELCOME10", "FREESHIP"]);
}

#[tokio::test]
async fn create_normalizes_code_and_covers_whole_days() {
    let registry = DiscountRegistry::new(Vec::new());
    let discount = registry.create(form("  autumn15 ")).await.unwrap();

    assert_eq!(discount.code, "AUTUMN15");
    assert_eq!(discount.used_count, 0);
    assert_eq!(
        discount.start_date,
        Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(
        discount.end_date,
        Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap()
    );
    assert_eq!(registry.get(discount.id).await.unwrap().code, "AUTUMN15");
}

#[tokio::test]
async fn invalid_forms_are_rejected() {
    let registry = DiscountRegistry::new(Vec::new());

    let message = rejection(registry.create(form("AB")).await);
    assert_eq!(message, "Code must be at least 3 characters");

    let mut too_much = form("BIGSALE");
    too_much.value = 150;
    assert_eq!(
        rejection(registry.create(too_much).await),
        "Percentage value must be at most 100"
    );

    let mut backwards = form("BACKWARDS");
    backwards.end_date = day(2026, 9, 1);
    assert_eq!(
        rejection(registry.create(backwards).await),
        "End date must not be before start date"
    );

    let mut negative = form("NEGATIVE");
    negative.min_purchase = -1;
    assert_eq!(
        rejection(registry.create(negative).await),
        "Min purchase must be at least 0"
    );

    assert!(registry.list().await.is_empty());
}

#[tokio::test]
async fn fixed_amounts_may_exceed_one_hundred() {
    let registry = DiscountRegistry::new(Vec::new());
    let mut fixed = form("FLAT500");
    fixed.kind = DiscountType::Fixed;
    fixed.value = 500;
    assert_eq!(registry.create(fixed).await.unwrap().value, 500);
}

#[tokio::test]
async fn codes_are_unique() {
    let registry = DiscountRegistry::new(Vec::new());
    registry.create(form("WINTER")).await.unwrap();
    let message = rejection(registry.create(form("winter")).await);
    assert_eq!(message, "Code WINTER already exists");
}

#[tokio::test]
async fn update_and_delete() {
    let registry = DiscountRegistry::new(Vec::new());
    let created = registry.create(form("SPRING")).await.unwrap();

    let mut edit = form("SPRING");
    edit.value = 30;
    let updated = registry.update(created.id, edit).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.value, 30);

    registry.delete(created.id).await.unwrap();
    assert!(matches!(
        registry.get(created.id).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        registry.delete(created.id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn toggle_flips_active_until_expiry() {
    let registry = DiscountRegistry::new(Vec::new());
    let created = registry.create(form("TOGGLE")).await.unwrap();
    let during = Utc.with_ymd_and_hms(2026, 11, 1, 12, 0, 0).unwrap();

    let toggled = registry.toggle_active(created.id, during).await.unwrap();
    assert!(!toggled.is_active);
    assert_eq!(toggled.status_at(during), DiscountStatus::Inactive);

    let toggled = registry.toggle_active(created.id, during).await.unwrap();
    assert_eq!(toggled.status_at(during), DiscountStatus::Active);

    let after = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(toggled.status_at(after), DiscountStatus::Expired);
    assert_eq!(
        rejection(registry.toggle_active(created.id, after).await),
        "Discount has expired"
    );
}
