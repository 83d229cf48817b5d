use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{
        CreateProductRequest, ProductImage, ProductImageList, ProductList, UpdateProductRequest,
    },
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Product, ProductCondition},
    pricing::discount_percent,
    response::{ApiResponse, Meta},
    routes::params::{ProductFilter, ProductFilterForm, ProductSortBy, SortOrder, like_pattern},
    state::AppState,
    storage::{Bucket, PLACEHOLDER_IMAGE, file_extension},
};

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn ensure_image(&self) -> AppResult<()> {
        if self.bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".into()));
        }
        match self.content_type.as_deref() {
            Some(ct) if ct.starts_with("image/") => Ok(()),
            _ => Err(AppError::BadRequest("Only image uploads are accepted".into())),
        }
    }
}

pub async fn list_products(
    state: &AppState,
    filter: ProductFilter,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = filter.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = filter.search.as_ref() {
        condition = condition.add(Expr::col(Column::Title).ilike(like_pattern(search)));
    }

    match (filter.category.as_ref(), filter.subcategory.as_ref()) {
        (Some(category), Some(sub)) => {
            condition = condition.add(Column::Category.eq(format!("{category}/{sub}")));
        }
        (Some(category), None) => {
            condition = condition.add(
                Condition::any()
                    .add(Column::Category.eq(category.clone()))
                    .add(Column::Category.starts_with(format!("{category}/"))),
            );
        }
        (None, Some(sub)) => {
            condition = condition.add(Column::Category.ends_with(format!("/{sub}")));
        }
        (None, None) => {}
    }

    if let Some(featured) = filter.featured {
        condition = condition.add(Column::IsFeatured.eq(featured));
    }

    if let Some(visible) = filter.visible {
        condition = condition.add(Column::IsVisible.eq(visible));
    }

    if let Some(min_price) = filter.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = filter.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    let sort_col = match filter.sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Title => Column::Title,
    };

    let mut finder = Products::find().filter(condition);
    finder = match filter.sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };
    finder = finder.order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = with_images(state, models).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

/// Hidden products are only visible to admins.
pub async fn get_product(
    state: &AppState,
    id: Uuid,
    viewer: Option<&AuthUser>,
) -> AppResult<ApiResponse<Product>> {
    let model = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let is_admin = viewer.is_some_and(|user| user.is_admin);
    if !model.is_visible && !is_admin {
        return Err(AppError::NotFound);
    }

    let images = product_images(state, model.id).await?;
    Ok(ApiResponse::success(
        "Product",
        product_from_entity(model, images),
        None,
    ))
}

/// Visible products for the given ids, in the order given. Unknown ids are skipped.
pub async fn products_by_ids(state: &AppState, ids: &[Uuid]) -> AppResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let models = Products::find()
        .filter(Column::Id.is_in(ids.iter().copied()))
        .filter(Column::IsVisible.eq(true))
        .all(&state.orm)
        .await?;

    let mut ordered = Vec::with_capacity(models.len());
    for id in ids {
        if let Some(model) = models.iter().find(|m| m.id == *id) {
            if !ordered.iter().any(|p: &Product| p.id == *id) {
                let images = product_images(state, model.id).await?;
                ordered.push(product_from_entity(model.clone(), images));
            }
        }
    }
    Ok(ordered)
}

/// Filter bar defaults with the slider ceiling set to the highest catalog price.
pub async fn filter_defaults(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ProductFilterForm>> {
    ensure_admin(user)?;
    let max_price: Option<Option<i64>> = Products::find()
        .select_only()
        .column_as(Column::Price.max(), "max_price")
        .into_tuple()
        .one(&state.orm)
        .await?;

    let ceiling = max_price
        .flatten()
        .filter(|p| *p > 0)
        .unwrap_or(crate::routes::params::DEFAULT_PRICE_CEILING);

    Ok(ApiResponse::success(
        "Filter defaults",
        ProductFilterForm::with_ceiling(ceiling),
        Some(Meta::empty()),
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    let title = required_text("title", &payload.title)?;
    validate_price("price", payload.price)?;
    if let Some(original) = payload.original_price {
        validate_price("original_price", original)?;
    }
    let category = normalize_category(&payload.category)?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        description: Set(payload.description.filter(|d| !d.trim().is_empty())),
        price: Set(payload.price),
        original_price: Set(payload.original_price),
        category: Set(category),
        brand: Set(payload.brand.filter(|b| !b.trim().is_empty())),
        condition: Set(payload.condition.as_str().to_string()),
        sizes: Set(normalize_sizes(payload.sizes)),
        is_visible: Set(payload.is_visible),
        is_featured: Set(payload.is_featured),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;
    tracing::info!(product_id = %product.id, "product created");

    audit::record(
        &state.pool,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product, vec![PLACEHOLDER_IMAGE.to_string()]),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(required_text("title", &title)?);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
    }
    if let Some(price) = payload.price {
        validate_price("price", price)?;
        active.price = Set(price);
    }
    if let Some(original_price) = payload.original_price {
        if let Some(original) = original_price {
            validate_price("original_price", original)?;
        }
        active.original_price = Set(original_price);
    }
    if let Some(category) = payload.category {
        active.category = Set(normalize_category(&category)?);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(Some(brand).filter(|b| !b.trim().is_empty()));
    }
    if let Some(condition) = payload.condition {
        active.condition = Set(condition.as_str().to_string());
    }
    if let Some(sizes) = payload.sizes {
        active.sizes = Set(normalize_sizes(sizes));
    }
    if let Some(is_visible) = payload.is_visible {
        active.is_visible = Set(is_visible);
    }
    if let Some(is_featured) = payload.is_featured {
        active.is_featured = Set(is_featured);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    let images = product_images(state, product.id).await?;
    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product, images),
        Some(Meta::empty()),
    ))
}

/// Deletes the product's stored images, then the row.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if Products::find_by_id(id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let order_count = Orders::find()
        .filter(OrderCol::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    if order_count > 0 {
        return Err(AppError::BadRequest(
            "Product has orders; hide it instead of deleting".into(),
        ));
    }

    let prefix = id.to_string();
    let paths: Vec<String> = state
        .storage
        .list(Bucket::ProductImages, &prefix)
        .await?
        .into_iter()
        .map(|name| format!("{prefix}/{name}"))
        .collect();
    if !paths.is_empty() {
        state.storage.remove(Bucket::ProductImages, &paths).await?;
    }

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    tracing::info!(product_id = %id, images = paths.len(), "product deleted");

    audit::record(
        &state.pool,
        user.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_images(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductImageList>> {
    if Products::find_by_id(id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let prefix = id.to_string();
    let items = state
        .storage
        .list(Bucket::ProductImages, &prefix)
        .await?
        .into_iter()
        .map(|file_name| ProductImage {
            product_id: id,
            url: state
                .storage
                .public_url(Bucket::ProductImages, &format!("{prefix}/{file_name}")),
            file_name,
        })
        .collect();
    Ok(ApiResponse::success(
        "Images",
        ProductImageList { items },
        Some(Meta::empty()),
    ))
}

/// Stores an image as `<product id>/<millis>-<uuid>.<ext>` and returns its public URL.
pub async fn upload_image(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    file: UploadedFile,
) -> AppResult<ApiResponse<ProductImage>> {
    ensure_admin(user)?;
    file.ensure_image()?;
    if Products::find_by_id(id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let file_name = format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        file_extension(&file.file_name)
    );
    let path = format!("{id}/{file_name}");
    state
        .storage
        .upload(Bucket::ProductImages, &path, &file.bytes)
        .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_image_upload",
        "products",
        serde_json::json!({ "product_id": id, "file": file_name }),
    )
    .await;

    Ok(ApiResponse::success(
        "Image uploaded",
        ProductImage {
            product_id: id,
            url: state.storage.public_url(Bucket::ProductImages, &path),
            file_name,
        },
        Some(Meta::empty()),
    ))
}

/// `file_name` may also be a full public URL; only its last segment is used.
pub async fn delete_image(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    file_name: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let file_name = file_name
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("Invalid image URL".into()))?;

    let removed = state
        .storage
        .remove(Bucket::ProductImages, &[format!("{id}/{file_name}")])
        .await?;
    if removed == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "product_image_delete",
        "products",
        serde_json::json!({ "product_id": id, "file": file_name }),
    )
    .await;

    Ok(ApiResponse::success(
        "Image deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Public URLs of a product's images, or the placeholder when there are none.
pub async fn product_images(state: &AppState, id: Uuid) -> AppResult<Vec<String>> {
    let prefix = id.to_string();
    let urls: Vec<String> = state
        .storage
        .list(Bucket::ProductImages, &prefix)
        .await?
        .into_iter()
        .map(|name| {
            state
                .storage
                .public_url(Bucket::ProductImages, &format!("{prefix}/{name}"))
        })
        .collect();

    if urls.is_empty() {
        Ok(vec![PLACEHOLDER_IMAGE.to_string()])
    } else {
        Ok(urls)
    }
}

pub async fn with_images(state: &AppState, models: Vec<ProductModel>) -> AppResult<Vec<Product>> {
    let mut items = Vec::with_capacity(models.len());
    for model in models {
        let images = product_images(state, model.id).await?;
        items.push(product_from_entity(model, images));
    }
    Ok(items)
}

pub fn product_from_entity(model: ProductModel, images: Vec<String>) -> Product {
    let (category, subcategory) = split_category(&model.category);
    let condition = model
        .condition
        .parse::<ProductCondition>()
        .unwrap_or(ProductCondition::Good);

    Product {
        id: model.id,
        name: model.title,
        description: model.description.unwrap_or_default(),
        category,
        subcategory,
        price: model.price,
        original_price: model.original_price,
        discount_percent: discount_percent(model.price, model.original_price),
        images,
        sizes: model.sizes,
        brand: model.brand.unwrap_or_else(|| "Unknown".to_string()),
        condition,
        featured: model.is_featured,
        in_stock: model.is_visible,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

/// `women/outerwear` → (`women`, `outerwear`); a bare category has no subcategory.
pub fn split_category(path: &str) -> (String, String) {
    match path.split_once('/') {
        Some((category, sub)) => (category.to_string(), sub.to_string()),
        None => (path.to_string(), String::new()),
    }
}

pub fn normalize_category(raw: &str) -> AppResult<String> {
    let segments: Vec<String> = raw
        .split('/')
        .map(|s| s.trim().to_lowercase())
        .collect();
    if segments.is_empty() || segments.len() > 2 || segments.iter().any(|s| s.is_empty()) {
        return Err(AppError::BadRequest(
            "category must be `category` or `category/subcategory`".into(),
        ));
    }
    Ok(segments.join("/"))
}

fn normalize_sizes(sizes: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(sizes.len());
    for size in sizes {
        let size = size.trim().to_string();
        if !size.is_empty() && !out.contains(&size) {
            out.push(size);
        }
    }
    out
}

fn required_text(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn validate_price(field: &str, value: i64) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::BadRequest(format!("{field} must not be negative")));
    }
    Ok(())
}
