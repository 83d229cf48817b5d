/// Percentage shown on the "% OFF" badge.
///
/// `round((original - price) / original * 100)` with halves rounded up, in
/// integer arithmetic on minor units. No badge without a positive original price.
pub fn discount_percent(price: i64, original_price: Option<i64>) -> Option<i64> {
    let original = original_price.filter(|o| *o > 0)?;
    let numerator = (original - price) * 200 + original;
    Some(numerator.div_euclid(original * 2))
}
