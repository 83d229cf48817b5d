use furbish_storefront::pricing::discount_percent;

#[test]
fn discount_badge_rounds_to_nearest_percent() {
    assert_eq!(discount_percent(4599, Some(12000)), Some(62));
    assert_eq!(discount_percent(7500, Some(10000)), Some(25));
    // 1/3 off is 33.33..., 2/3 off is 66.66...
    assert_eq!(discount_percent(2000, Some(3000)), Some(33));
    assert_eq!(discount_percent(1000, Some(3000)), Some(67));
    // exactly half a percent rounds up
    assert_eq!(discount_percent(995, Some(1000)), Some(1));
}

#[test]
fn no_badge_without_a_usable_original_price() {
    assert_eq!(discount_percent(4599, None), None);
    assert_eq!(discount_percent(4599, Some(0)), None);
    assert_eq!(discount_percent(4599, Some(-10)), None);
}

#[test]
fn same_price_is_zero_percent() {
    assert_eq!(discount_percent(5000, Some(5000)), Some(0));
}
