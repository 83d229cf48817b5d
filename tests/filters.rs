use furbish_storefront::routes::params::{
    CategorySort, DEFAULT_PRICE_CEILING, Pagination, ProductFilter, ProductFilterForm,
    ProductQuery, ProductSortBy, SortOrder, like_pattern,
};

#[test]
fn untouched_filter_bar_applies_no_constraints() {
    let form = ProductFilterForm::with_ceiling(50_000);
    let filter = form.applied();

    assert_eq!(filter.search, None);
    assert_eq!(filter.category, None);
    assert_eq!(filter.visible, None);
    assert_eq!(filter.min_price, None);
    assert_eq!(filter.max_price, None);
    assert_eq!(filter.sort_by, ProductSortBy::CreatedAt);
    assert_eq!(filter.sort_order, SortOrder::Desc);
}

#[test]
fn filter_bar_values_are_applied() {
    let mut form = ProductFilterForm::with_ceiling(50_000);
    form.search = "  denim ".to_string();
    form.category = "women".to_string();
    form.in_stock = "false".to_string();
    form.min_price = 1_000;
    form.max_price = 20_000;
    form.sort_by = ProductSortBy::Price;
    form.sort_direction = SortOrder::Asc;

    let filter = form.applied();
    assert_eq!(filter.search.as_deref(), Some("denim"));
    assert_eq!(filter.category.as_deref(), Some("women"));
    assert_eq!(filter.visible, Some(false));
    assert_eq!(filter.min_price, Some(1_000));
    assert_eq!(filter.max_price, Some(20_000));
    assert_eq!(filter.sort_by, ProductSortBy::Price);
    assert_eq!(filter.sort_order, SortOrder::Asc);
}

#[test]
fn clear_keeps_the_price_ceiling() {
    let mut form = ProductFilterForm::with_ceiling(75_000);
    form.search = "watch".to_string();
    form.in_stock = "true".to_string();
    form.max_price = 10_000;

    form.clear();
    assert_eq!(form, ProductFilterForm::with_ceiling(75_000));
    assert_eq!(form.max_price, 75_000);
    assert_eq!(ProductFilterForm::default().price_ceiling, DEFAULT_PRICE_CEILING);
}

#[test]
fn storefront_query_only_lists_visible_products() {
    let filter = ProductQuery::default().into_filter();
    assert_eq!(
        filter,
        ProductFilter {
            visible: Some(true),
            ..ProductFilter::default()
        }
    );
}

#[test]
fn storefront_sorting() {
    let by_price = ProductQuery {
        sort_by: Some(ProductSortBy::Price),
        ..ProductQuery::default()
    }
    .into_filter();
    assert_eq!(by_price.sort_order, SortOrder::Asc);

    let high_first = ProductQuery {
        sort_by: Some(ProductSortBy::Title),
        sort: Some(CategorySort::PriceHigh),
        ..ProductQuery::default()
    }
    .into_filter();
    assert_eq!(
        (high_first.sort_by, high_first.sort_order),
        (ProductSortBy::Price, SortOrder::Desc)
    );
}

#[test]
fn all_means_no_category() {
    let filter = ProductQuery {
        category: Some("all".to_string()),
        subcategory: Some("shirts".to_string()),
        featured: Some(false),
        ..ProductQuery::default()
    }
    .into_filter();
    assert_eq!(filter.category, None);
    assert_eq!(filter.subcategory.as_deref(), Some("shirts"));
    assert_eq!(filter.featured, None);
}

#[test]
fn category_query_is_case_insensitive() {
    let filter = ProductQuery {
        category: Some(" Women ".to_string()),
        subcategory: Some("OuterWear".to_string()),
        ..ProductQuery::default()
    }
    .into_filter();
    assert_eq!(filter.category.as_deref(), Some("women"));
    assert_eq!(filter.subcategory.as_deref(), Some("outerwear"));

    let mut form = ProductFilterForm::default();
    form.category = "Men".to_string();
    assert_eq!(form.applied().category.as_deref(), Some("men"));
}

#[test]
fn pagination_defaults_and_bounds() {
    assert_eq!(Pagination::default().normalize(), (1, 20, 0));
    assert_eq!(
        Pagination {
            page: Some(3),
            per_page: Some(500),
        }
        .normalize(),
        (3, 100, 200)
    );
    assert_eq!(
        Pagination {
            page: Some(-4),
            per_page: Some(0),
        }
        .normalize(),
        (1, 1, 0)
    );
}

#[test]
fn huge_page_numbers_saturate_the_offset() {
    let (page, per_page, offset) = Pagination {
        page: Some(i64::MAX),
        per_page: Some(20),
    }
    .normalize();
    assert_eq!(page, i64::MAX);
    assert_eq!(per_page, 20);
    assert_eq!(offset, i64::MAX);
}

#[test]
fn search_text_is_matched_literally() {
    assert_eq!(like_pattern("denim"), "%denim%");
    assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
}
