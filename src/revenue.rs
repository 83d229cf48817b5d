//! Revenue-by-period aggregation for the admin dashboard chart.
//!
//! Buckets are calendar ranges in UTC. Every bucket of the lookback window is
//! emitted, including the ones no order falls into.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const DAILY_BUCKETS: u64 = 14;
const WEEKLY_LOOKBACK_DAYS: u64 = 70;
const MONTHLY_BUCKETS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RevenuePoint {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub revenue: i64,
}

/// Anything with a creation time and an amount can be charted.
pub trait Revenue {
    fn created_at(&self) -> DateTime<Utc>;
    fn amount(&self) -> i64;
}

impl Revenue for (DateTime<Utc>, i64) {
    fn created_at(&self) -> DateTime<Utc> {
        self.0
    }

    fn amount(&self) -> i64 {
        self.1
    }
}

pub fn revenue_series<R: Revenue>(
    orders: &[R],
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> Vec<RevenuePoint> {
    buckets(timeframe, now.date_naive())
        .into_iter()
        .map(|(label, start, end)| {
            let revenue = orders
                .iter()
                .filter(|order| {
                    let day = order.created_at().date_naive();
                    day >= start && day <= end
                })
                .map(Revenue::amount)
                .sum();
            RevenuePoint {
                label,
                start,
                end,
                revenue,
            }
        })
        .collect()
}

fn buckets(timeframe: Timeframe, today: NaiveDate) -> Vec<(String, NaiveDate, NaiveDate)> {
    match timeframe {
        Timeframe::Daily => {
            let first = today - Days::new(DAILY_BUCKETS - 1);
            first
                .iter_days()
                .take(DAILY_BUCKETS as usize)
                .map(|day| (day.format("%b %d").to_string(), day, day))
                .collect()
        }
        Timeframe::Weekly => {
            let first = start_of_week(today - Days::new(WEEKLY_LOOKBACK_DAYS));
            let last = end_of_week(today);
            first
                .iter_weeks()
                .take_while(|week_start| *week_start <= last)
                .map(|week_start| {
                    let week_end = end_of_week(week_start);
                    let label = format!(
                        "{} - {}",
                        week_start.format("%b %d"),
                        week_end.format("%b %d")
                    );
                    (label, week_start, week_end)
                })
                .collect()
        }
        Timeframe::Monthly => {
            let current = start_of_month(today);
            (0..MONTHLY_BUCKETS)
                .rev()
                .filter_map(|back| current.checked_sub_months(Months::new(back)))
                .map(|month_start| {
                    let month_end = end_of_month(month_start);
                    (month_start.format("%b %Y").to_string(), month_start, month_end)
                })
                .collect()
        }
    }
}

/// Weeks start on Sunday.
pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Days::new(u64::from(day.weekday().num_days_from_sunday()))
}

pub fn end_of_week(day: NaiveDate) -> NaiveDate {
    start_of_week(day) + Days::new(6)
}

fn start_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn end_of_month(day: NaiveDate) -> NaiveDate {
    start_of_month(day)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(day)
}
