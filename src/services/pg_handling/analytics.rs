use std::collections::HashMap;

use actix::Handler;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use diesel::dsl::count_distinct;
use diesel::sql_types::{BigInt, Date, Text, Timestamptz};
use diesel::{
    ExpressionMethods, PgConnection, QueryDsl, QueryResult, QueryableByName, RunQueryDsl,
};

use crate::services::db_utils::PgActor;
use crate::services::insertable::{NewAnalyticsEvent, NewVisitor};
use crate::services::messages::{
    FetchAnalyticsMetrics, FetchDashboardMetrics, RecordAnalyticsBatch,
};
use crate::services::pg_handling::establish_connection;
use crate::types::{
    AnalyticsMetrics, ConversionFunnel, DailyMetric, DashboardMetrics, PageMetric,
};

#[derive(QueryableByName)]
struct DayRow {
    #[diesel(sql_type = Date)]
    day: NaiveDate,
    #[diesel(sql_type = BigInt)]
    views: i64,
}

#[derive(QueryableByName)]
struct PageRow {
    #[diesel(sql_type = Text)]
    page: String,
    #[diesel(sql_type = BigInt)]
    views: i64,
}

impl Handler<RecordAnalyticsBatch> for PgActor {
    type Result = QueryResult<usize>;

    fn handle(&mut self, msg: RecordAnalyticsBatch, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::analytics_events::dsl::analytics_events;
        use crate::schema::visitors::{device_meta, dsl::visitors, last_seen, visitor_id};

        let mut conn = establish_connection(&self.0)?;
        let now = Utc::now();

        // last_seen moves on every batch; device_meta only overwrites when
        // the batch actually carried it.
        let row = visitor_row(msg.visitor_id.clone(), now, msg.visitor_meta.clone());
        match msg.visitor_meta {
            Some(meta) => diesel::insert_into(visitors)
                .values(row)
                .on_conflict(visitor_id)
                .do_update()
                .set((last_seen.eq(now), device_meta.eq(meta)))
                .execute(&mut conn)?,
            None => diesel::insert_into(visitors)
                .values(row)
                .on_conflict(visitor_id)
                .do_update()
                .set(last_seen.eq(now))
                .execute(&mut conn)?,
        };

        let rows: Vec<NewAnalyticsEvent> = msg
            .events
            .into_iter()
            .map(|event| NewAnalyticsEvent {
                visitor_id: msg.visitor_id.clone(),
                event_name: event.event_name,
                event_props: event.event_props,
                url: event.url,
                referrer: event.referrer,
                created_at: event.timestamp.unwrap_or(now),
            })
            .collect();

        if rows.is_empty() {
            return Ok(0);
        }

        diesel::insert_into(analytics_events)
            .values(&rows)
            .execute(&mut conn)
    }
}

impl Handler<FetchAnalyticsMetrics> for PgActor {
    type Result = QueryResult<AnalyticsMetrics>;

    fn handle(&mut self, msg: FetchAnalyticsMetrics, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::analytics_events::{created_at, dsl::analytics_events, event_name, visitor_id};

        let mut conn = establish_connection(&self.0)?;

        let days = msg.days.clamp(1, 365);
        let cutoff = Utc::now() - Duration::days(days);

        let unique_visitors = analytics_events
            .filter(created_at.ge(cutoff))
            .select(count_distinct(visitor_id))
            .first::<i64>(&mut conn)?;

        let count_events = |conn: &mut PgConnection, name: &str| -> QueryResult<i64> {
            analytics_events
                .filter(created_at.ge(cutoff))
                .filter(event_name.eq(name))
                .count()
                .get_result::<i64>(conn)
        };

        let page_views = count_events(&mut conn, "page_view")?;
        let reservation_starts = count_events(&mut conn, "reservation_start")?;
        let reservation_submits = count_events(&mut conn, "reservation_submit")?;

        let day_rows: Vec<DayRow> = diesel::sql_query(
            "SELECT created_at::date AS day, COUNT(*) AS views \
             FROM analytics_events \
             WHERE event_name = 'page_view' AND created_at >= $1 \
             GROUP BY day ORDER BY day",
        )
        .bind::<Timestamptz, _>(cutoff)
        .load(&mut conn)?;

        let top_pages: Vec<PageRow> = diesel::sql_query(
            "SELECT url AS page, COUNT(*) AS views \
             FROM analytics_events \
             WHERE event_name = 'page_view' AND url IS NOT NULL AND created_at >= $1 \
             GROUP BY url ORDER BY views DESC LIMIT 10",
        )
        .bind::<Timestamptz, _>(cutoff)
        .load(&mut conn)?;

        let counts: HashMap<NaiveDate, i64> =
            day_rows.into_iter().map(|row| (row.day, row.views)).collect();

        Ok(AnalyticsMetrics {
            unique_visitors,
            total_page_views: page_views,
            daily_page_views: fill_daily(Utc::now().date_naive(), days, &counts),
            conversion_funnel: ConversionFunnel {
                page_views,
                reservation_starts,
                reservation_submits,
                conversion_rate: conversion_rate(page_views, reservation_submits),
            },
            top_pages: top_pages
                .into_iter()
                .map(|row| PageMetric {
                    page: row.page,
                    views: row.views,
                })
                .collect(),
        })
    }
}

impl Handler<FetchDashboardMetrics> for PgActor {
    type Result = QueryResult<DashboardMetrics>;

    fn handle(&mut self, _msg: FetchDashboardMetrics, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::notifications::{dsl::notifications, read_at};
        use crate::schema::orders::{
            created_at as order_created, dsl::orders, status as order_status, total_amount,
        };
        use crate::schema::reservations::{created_at as res_created, dsl::reservations};

        let mut conn = establish_connection(&self.0)?;

        let today = Utc::now()
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();

        let today_reservations = reservations
            .filter(res_created.ge(today))
            .count()
            .get_result::<i64>(&mut conn)?;

        let pending_orders = orders
            .filter(order_status.eq_any(["pending", "preparing"]))
            .count()
            .get_result::<i64>(&mut conn)?;

        let completed_orders_today = orders
            .filter(order_status.eq("completed"))
            .filter(order_created.ge(today))
            .count()
            .get_result::<i64>(&mut conn)?;

        let revenue_today = orders
            .filter(order_status.eq("completed"))
            .filter(order_created.ge(today))
            .select(diesel::dsl::sum(total_amount))
            .first::<Option<i64>>(&mut conn)?
            .unwrap_or(0);

        let unread_notifications = notifications
            .filter(read_at.is_null())
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(DashboardMetrics {
            today_reservations,
            pending_orders,
            completed_orders_today,
            revenue_today,
            unread_notifications,
        })
    }
}

fn visitor_row(
    visitor_id: String,
    now: chrono::DateTime<Utc>,
    meta: Option<serde_json::Value>,
) -> NewVisitor {
    NewVisitor {
        visitor_id,
        first_seen: now,
        last_seen: now,
        device_meta: meta.unwrap_or_else(|| serde_json::json!({})),
    }
}

/// Zero-fills the daily series so the dashboard chart always spans the whole
/// window, last bucket being `end`.
fn fill_daily(end: NaiveDate, days: i64, counts: &HashMap<NaiveDate, i64>) -> Vec<DailyMetric> {
    (0..days)
        .rev()
        .map(|offset| {
            let date = end - Duration::days(offset);
            DailyMetric {
                date,
                value: counts.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

fn conversion_rate(page_views: i64, submits: i64) -> f64 {
    if page_views == 0 {
        return 0.0;
    }
    (submits as f64 / page_views as f64 * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_series_is_zero_filled_and_ordered() {
        let end = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let mut counts = HashMap::new();
        counts.insert(end, 12);
        counts.insert(end - Duration::days(2), 4);

        let series = fill_daily(end, 3, &counts);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, end - Duration::days(2));
        assert_eq!(series[0].value, 4);
        assert_eq!(series[1].value, 0);
        assert_eq!(series[2].date, end);
        assert_eq!(series[2].value, 12);
    }

    #[test]
    fn visitor_row_is_built_even_without_meta() {
        let now = Utc::now();

        let bare = visitor_row("v-1".to_owned(), now, None);
        assert_eq!(bare.visitor_id, "v-1");
        assert_eq!(bare.last_seen, now);
        assert_eq!(bare.device_meta, serde_json::json!({}));

        let meta = serde_json::json!({ "ua": "Mobile Safari" });
        let full = visitor_row("v-2".to_owned(), now, Some(meta.clone()));
        assert_eq!(full.device_meta, meta);
    }

    #[test]
    fn conversion_rate_handles_empty_traffic() {
        assert_eq!(conversion_rate(0, 10), 0.0);
        assert_eq!(conversion_rate(200, 3), 1.5);
        assert_eq!(conversion_rate(3, 1), 33.33);
    }
}
