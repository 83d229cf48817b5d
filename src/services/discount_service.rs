//! Discount codes managed from the back office.
//!
//! Codes live in process memory only; the registry starts from a few sample
//! codes and every change is lost on restart.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    dto::discounts::{DiscountForm, DiscountList, DiscountView},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Discount, DiscountStatus, DiscountType},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Clone, Default)]
pub struct DiscountRegistry {
    discounts: Arc<RwLock<Vec<Discount>>>,
}

impl DiscountRegistry {
    pub fn new(discounts: Vec<Discount>) -> Self {
        Self {
            discounts: Arc::new(RwLock::new(discounts)),
        }
    }

    pub fn with_samples() -> Self {
        Self::new(sample_discounts())
    }

    pub async fn list(&self) -> Vec<Discount> {
        self.discounts.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Discount> {
        self.discounts
            .read()
            .await
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    pub async fn create(&self, form: DiscountForm) -> AppResult<Discount> {
        let validated = validate(form)?;
        let mut discounts = self.discounts.write().await;
        ensure_unique_code(&discounts, &validated.code, None)?;

        let discount = Discount {
            id: Uuid::new_v4(),
            code: validated.code,
            kind: validated.kind,
            value: validated.value,
            min_purchase: validated.min_purchase,
            max_uses: validated.max_uses,
            used_count: 0,
            start_date: validated.start,
            end_date: validated.end,
            is_active: validated.is_active,
        };
        discounts.push(discount.clone());
        Ok(discount)
    }

    /// Replaces every editable field; `used_count` is kept.
    pub async fn update(&self, id: Uuid, form: DiscountForm) -> AppResult<Discount> {
        let validated = validate(form)?;
        let mut discounts = self.discounts.write().await;
        ensure_unique_code(&discounts, &validated.code, Some(id))?;

        let discount = discounts
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(AppError::NotFound)?;
        discount.code = validated.code;
        discount.kind = validated.kind;
        discount.value = validated.value;
        discount.min_purchase = validated.min_purchase;
        discount.max_uses = validated.max_uses;
        discount.start_date = validated.start;
        discount.end_date = validated.end;
        discount.is_active = validated.is_active;
        Ok(discount.clone())
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut discounts = self.discounts.write().await;
        let before = discounts.len();
        discounts.retain(|d| d.id != id);
        if discounts.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Flips `is_active`. Expired codes cannot be toggled.
    pub async fn toggle_active(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Discount> {
        let mut discounts = self.discounts.write().await;
        let discount = discounts
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(AppError::NotFound)?;
        if discount.status_at(now) == DiscountStatus::Expired {
            return Err(AppError::BadRequest("Discount has expired".into()));
        }
        discount.is_active = !discount.is_active;
        Ok(discount.clone())
    }
}

struct ValidDiscount {
    code: String,
    kind: DiscountType,
    value: i64,
    min_purchase: i64,
    max_uses: Option<i64>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    is_active: bool,
}

fn validate(form: DiscountForm) -> AppResult<ValidDiscount> {
    let code = form.code.trim().to_uppercase();
    if code.chars().count() < 3 {
        return Err(AppError::BadRequest(
            "Code must be at least 3 characters".into(),
        ));
    }
    if code.chars().any(char::is_whitespace) {
        return Err(AppError::BadRequest("Code must not contain spaces".into()));
    }
    if form.value < 0 {
        return Err(AppError::BadRequest("Value must be at least 0".into()));
    }
    if form.kind == DiscountType::Percentage && form.value > 100 {
        return Err(AppError::BadRequest(
            "Percentage value must be at most 100".into(),
        ));
    }
    if form.min_purchase < 0 {
        return Err(AppError::BadRequest(
            "Min purchase must be at least 0".into(),
        ));
    }
    if form.max_uses.is_some_and(|m| m < 0) {
        return Err(AppError::BadRequest("Max uses must be at least 0".into()));
    }
    if form.end_date < form.start_date {
        return Err(AppError::BadRequest(
            "End date must not be before start date".into(),
        ));
    }

    Ok(ValidDiscount {
        code,
        kind: form.kind,
        value: form.value,
        min_purchase: form.min_purchase,
        max_uses: form.max_uses,
        start: day_start(form.start_date),
        end: day_end(form.end_date),
        is_active: form.is_active,
    })
}

fn ensure_unique_code(discounts: &[Discount], code: &str, except: Option<Uuid>) -> AppResult<()> {
    let taken = discounts
        .iter()
        .any(|d| d.code == code && Some(d.id) != except);
    if taken {
        return Err(AppError::BadRequest(format!("Code {code} already exists")));
    }
    Ok(())
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

fn day_end(day: NaiveDate) -> DateTime<Utc> {
    let end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&day.and_time(end))
}

fn sample(
    code: &str,
    kind: DiscountType,
    value: i64,
    min_purchase: i64,
    max_uses: Option<i64>,
    used_count: i64,
    window: (NaiveDate, NaiveDate),
    is_active: bool,
) -> Discount {
    Discount {
        id: Uuid::new_v4(),
        code: code.to_string(),
        kind,
        value,
        min_purchase,
        max_uses,
        used_count,
        start_date: day_start(window.0),
        end_date: day_end(window.1),
        is_active,
    }
}

pub fn sample_discounts() -> Vec<Discount> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    vec![
        sample(
            "SUMMER25",
            DiscountType::Percentage,
            25,
            10_000,
            Some(1000),
            456,
            (date(2023, 6, 1), date(2023, 9, 30)),
            true,
        ),
        sample(
            "WELCOME10",
            DiscountType::Percentage,
            10,
            0,
            None,
            789,
            (date(2023, 1, 1), date(2023, 12, 31)),
            true,
        ),
        sample(
            "FREESHIP",
            DiscountType::Fixed,
            1_500,
            7_500,
            Some(500),
            320,
            (date(2023, 4, 15), date(2023, 7, 15)),
            false,
        ),
    ]
}

fn view(discount: Discount, now: DateTime<Utc>) -> DiscountView {
    let status = discount.status_at(now);
    DiscountView { discount, status }
}

pub async fn list_discounts(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<DiscountList>> {
    ensure_admin(user)?;
    let now = Utc::now();
    let items: Vec<DiscountView> = state
        .discounts
        .list()
        .await
        .into_iter()
        .map(|d| view(d, now))
        .collect();
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Discounts", DiscountList { items }, Some(meta)))
}

pub async fn get_discount(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<DiscountView>> {
    ensure_admin(user)?;
    let discount = state.discounts.get(id).await?;
    Ok(ApiResponse::success("Discount", view(discount, Utc::now()), None))
}

pub async fn create_discount(
    state: &AppState,
    user: &AuthUser,
    form: DiscountForm,
) -> AppResult<ApiResponse<DiscountView>> {
    ensure_admin(user)?;
    let discount = state.discounts.create(form).await?;
    tracing::info!(code = %discount.code, "discount created");
    Ok(ApiResponse::success(
        "Discount Added",
        view(discount, Utc::now()),
        Some(Meta::empty()),
    ))
}

pub async fn update_discount(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    form: DiscountForm,
) -> AppResult<ApiResponse<DiscountView>> {
    ensure_admin(user)?;
    let discount = state.discounts.update(id, form).await?;
    tracing::info!(code = %discount.code, "discount updated");
    Ok(ApiResponse::success(
        "Discount Updated",
        view(discount, Utc::now()),
        Some(Meta::empty()),
    ))
}

pub async fn delete_discount(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    state.discounts.delete(id).await?;
    Ok(ApiResponse::success(
        "Discount Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn toggle_discount(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<DiscountView>> {
    ensure_admin(user)?;
    let now = Utc::now();
    let discount = state.discounts.toggle_active(id, now).await?;
    let message = if discount.is_active {
        "Discount Activated"
    } else {
        "Discount Deactivated"
    };
    Ok(ApiResponse::success(message, view(discount, now), Some(Meta::empty())))
}
