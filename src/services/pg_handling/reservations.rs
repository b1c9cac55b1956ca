use actix::Handler;
use chrono::Utc;
use diesel::{ExpressionMethods, QueryDsl, QueryResult, RunQueryDsl};

use crate::services::db_models::Reservation;
use crate::services::db_utils::PgActor;
use crate::services::messages::{
    CreateReservation, FetchReservations, TransitionOutcome, TransitionReservation,
};
use crate::services::pg_handling::establish_connection;
use crate::types::ReservationStatus;

impl Handler<FetchReservations> for PgActor {
    type Result = QueryResult<Vec<Reservation>>;

    fn handle(&mut self, msg: FetchReservations, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::reservations::{created_at, dsl::reservations, status};

        let mut conn = establish_connection(&self.0)?;

        let mut query = reservations.into_boxed();
        if let Some(wanted) = msg.status {
            query = query.filter(status.eq(wanted));
        }

        query
            .order(created_at.desc())
            .limit(msg.limit)
            .offset(msg.offset)
            .get_results::<Reservation>(&mut conn)
    }
}

impl Handler<CreateReservation> for PgActor {
    type Result = QueryResult<Reservation>;

    fn handle(&mut self, msg: CreateReservation, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::reservations::dsl::reservations;

        let mut conn = establish_connection(&self.0)?;

        diesel::insert_into(reservations)
            .values(msg.0)
            .get_result::<Reservation>(&mut conn)
    }
}

impl Handler<TransitionReservation> for PgActor {
    type Result = QueryResult<TransitionOutcome>;

    fn handle(&mut self, msg: TransitionReservation, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::reservations::{
            dsl::reservations, special_requests, status, table_number, updated_at,
        };

        let mut conn = establish_connection(&self.0)?;

        // The current status is re-read under FOR UPDATE so a concurrent
        // transition blocks here and re-evaluates the guard against the
        // committed status instead of a stale snapshot.
        conn.build_transaction().run(|trx_conn| {
            let current: Reservation = reservations
                .find(msg.id)
                .for_update()
                .first(trx_conn)?;

            let allowed = current
                .status()
                .map(|s| s.can_become(msg.new_status))
                .unwrap_or(false);
            if !allowed {
                return Ok(TransitionOutcome::Rejected {
                    current: current.status.clone(),
                });
            }

            let now = Utc::now();
            let updated: Reservation = match msg.new_status {
                ReservationStatus::Cancelled => diesel::update(reservations.find(msg.id))
                    .set((
                        status.eq(msg.new_status.as_str()),
                        special_requests.eq(with_cancel_reason(
                            current.special_requests.as_deref(),
                            msg.cancel_reason.as_deref(),
                        )),
                        updated_at.eq(now),
                    ))
                    .get_result(trx_conn)?,
                ReservationStatus::Arrived if msg.table_number.is_some() => {
                    diesel::update(reservations.find(msg.id))
                        .set((
                            status.eq(msg.new_status.as_str()),
                            table_number.eq(msg.table_number),
                            updated_at.eq(now),
                        ))
                        .get_result(trx_conn)?
                }
                _ => diesel::update(reservations.find(msg.id))
                    .set((status.eq(msg.new_status.as_str()), updated_at.eq(now)))
                    .get_result(trx_conn)?,
            };

            Ok(TransitionOutcome::Updated(updated))
        })
    }
}

fn with_cancel_reason(existing: Option<&str>, reason: Option<&str>) -> String {
    let note = format!(
        "Cancellation reason: {}",
        reason.unwrap_or("No reason provided")
    );
    match existing {
        Some(prior) if !prior.is_empty() => format!("{prior}\n\n{note}"),
        _ => note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_reason_appends_to_existing_requests() {
        let merged = with_cancel_reason(Some("window seat"), Some("double booking"));
        assert_eq!(
            merged,
            "window seat\n\nCancellation reason: double booking"
        );
    }

    #[test]
    fn cancel_reason_defaults_when_absent() {
        assert_eq!(
            with_cancel_reason(None, None),
            "Cancellation reason: No reason provided"
        );
        assert_eq!(
            with_cancel_reason(Some(""), None),
            "Cancellation reason: No reason provided"
        );
    }
}
