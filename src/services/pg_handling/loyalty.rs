use actix::Handler;
use chrono::Utc;
use diesel::{
    ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, QueryResult, RunQueryDsl,
};

use crate::services::db_models::{LoyaltyAccount, LoyaltyTransaction};
use crate::services::db_utils::PgActor;
use crate::services::insertable::{NewLoyaltyAccount, NewLoyaltyTransaction};
use crate::services::messages::{
    AdjustOutcome, AdjustPoints, AwardOutcome, AwardPoints, FetchLoyaltyAccount, LoyaltyLookup,
};
use crate::services::pg_handling::establish_connection;

/// Earn/adjust entries keep their sign; redeem entries are stored negative.
pub fn signed_points(entry_type: &str, points: i32) -> i32 {
    if entry_type == "redeem" {
        -points.abs()
    } else {
        points
    }
}

fn find_account(
    conn: &mut PgConnection,
    by_user: Option<&str>,
    by_email: Option<&str>,
    by_phone: Option<&str>,
) -> QueryResult<Option<LoyaltyAccount>> {
    use crate::schema::loyalty_accounts::{dsl::loyalty_accounts, email, phone, user_ref};

    if let Some(u) = by_user {
        if let Some(found) = loyalty_accounts
            .filter(user_ref.eq(u))
            .first::<LoyaltyAccount>(conn)
            .optional()?
        {
            return Ok(Some(found));
        }
    }
    if let Some(e) = by_email {
        if let Some(found) = loyalty_accounts
            .filter(email.eq(e))
            .first::<LoyaltyAccount>(conn)
            .optional()?
        {
            return Ok(Some(found));
        }
    }
    if let Some(p) = by_phone {
        if let Some(found) = loyalty_accounts
            .filter(phone.eq(p))
            .first::<LoyaltyAccount>(conn)
            .optional()?
        {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

impl Handler<AwardPoints> for PgActor {
    type Result = QueryResult<AwardOutcome>;

    fn handle(&mut self, msg: AwardPoints, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::loyalty_accounts::{dsl::loyalty_accounts, points, total_earned, updated_at};
        use crate::schema::loyalty_transactions::dsl::loyalty_transactions;

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let now = Utc::now();

            let account = match find_account(
                trx_conn,
                msg.user_ref.as_deref(),
                msg.email.as_deref(),
                msg.phone.as_deref(),
            )? {
                Some(existing) => existing,
                None => diesel::insert_into(loyalty_accounts)
                    .values(NewLoyaltyAccount {
                        user_ref: msg.user_ref.clone(),
                        email: msg.email.clone(),
                        phone: msg.phone.clone(),
                        points: 0,
                        tier: "bronze".to_owned(),
                        total_earned: 0,
                        total_redeemed: 0,
                        created_at: now,
                        updated_at: now,
                    })
                    .get_result::<LoyaltyAccount>(trx_conn)?,
            };

            let entry: LoyaltyTransaction = diesel::insert_into(loyalty_transactions)
                .values(NewLoyaltyTransaction {
                    account_id: account.id,
                    entry_type: "earn".to_owned(),
                    points: msg.points,
                    reason: msg.reason,
                    reference_type: msg.reference_type,
                    reference_id: msg.reference_id,
                    staff_id: msg.staff_id,
                    metadata: msg.metadata,
                    created_at: now,
                })
                .get_result(trx_conn)?;

            let refreshed: LoyaltyAccount = diesel::update(loyalty_accounts.find(account.id))
                .set((
                    points.eq(points + msg.points),
                    total_earned.eq(total_earned + msg.points),
                    updated_at.eq(now),
                ))
                .get_result(trx_conn)?;

            Ok(AwardOutcome {
                transaction_id: entry.id,
                account_id: refreshed.id,
                new_balance: refreshed.points,
            })
        })
    }
}

impl Handler<FetchLoyaltyAccount> for PgActor {
    type Result = QueryResult<Option<(LoyaltyAccount, Vec<LoyaltyTransaction>)>>;

    fn handle(&mut self, msg: FetchLoyaltyAccount, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::loyalty_transactions::{account_id, created_at, dsl::loyalty_transactions};

        let mut conn = establish_connection(&self.0)?;

        let account = match msg.lookup {
            LoyaltyLookup::UserRef => find_account(&mut conn, Some(&msg.key), None, None)?,
            LoyaltyLookup::Email => find_account(&mut conn, None, Some(&msg.key), None)?,
            LoyaltyLookup::Phone => find_account(&mut conn, None, None, Some(&msg.key))?,
        };

        let Some(account) = account else {
            return Ok(None);
        };

        let ledger = loyalty_transactions
            .filter(account_id.eq(account.id))
            .order(created_at.desc())
            .limit(50)
            .get_results::<LoyaltyTransaction>(&mut conn)?;

        Ok(Some((account, ledger)))
    }
}

impl Handler<AdjustPoints> for PgActor {
    type Result = QueryResult<AdjustOutcome>;

    fn handle(&mut self, msg: AdjustPoints, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::loyalty_accounts::{
            dsl::loyalty_accounts, points, total_earned, total_redeemed, updated_at,
        };
        use crate::schema::loyalty_transactions::dsl::loyalty_transactions;

        let mut conn = establish_connection(&self.0)?;

        conn.build_transaction().run(|trx_conn| {
            let account = match find_account(trx_conn, Some(&msg.user_ref), None, None)? {
                Some(existing) => existing,
                None => return Ok(AdjustOutcome::NoAccount),
            };

            let delta = signed_points(&msg.entry_type, msg.points);
            if account.points + delta < 0 {
                return Ok(AdjustOutcome::InsufficientPoints {
                    balance: account.points,
                });
            }

            let now = Utc::now();
            let entry: LoyaltyTransaction = diesel::insert_into(loyalty_transactions)
                .values(NewLoyaltyTransaction {
                    account_id: account.id,
                    entry_type: msg.entry_type.clone(),
                    points: delta,
                    reason: format!("Manual adjustment: {}", msg.reason),
                    reference_type: Some("manual_adjustment".to_owned()),
                    reference_id: None,
                    staff_id: Some(msg.staff_id),
                    metadata: serde_json::json!({
                        "staff_user": msg.staff_name,
                        "adjustment_reason": msg.reason,
                        "manual_adjustment": true,
                    }),
                    created_at: now,
                })
                .get_result(trx_conn)?;

            let refreshed: LoyaltyAccount = match msg.entry_type.as_str() {
                "redeem" => diesel::update(loyalty_accounts.find(account.id))
                    .set((
                        points.eq(points + delta),
                        total_redeemed.eq(total_redeemed + delta.abs()),
                        updated_at.eq(now),
                    ))
                    .get_result(trx_conn)?,
                "earn" => diesel::update(loyalty_accounts.find(account.id))
                    .set((
                        points.eq(points + delta),
                        total_earned.eq(total_earned + delta),
                        updated_at.eq(now),
                    ))
                    .get_result(trx_conn)?,
                _ => diesel::update(loyalty_accounts.find(account.id))
                    .set((points.eq(points + delta), updated_at.eq(now)))
                    .get_result(trx_conn)?,
            };

            Ok(AdjustOutcome::Adjusted {
                transaction: entry,
                new_balance: refreshed.points,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeem_is_always_negative() {
        assert_eq!(signed_points("redeem", 100), -100);
        assert_eq!(signed_points("redeem", -100), -100);
    }

    #[test]
    fn earn_and_adjust_keep_their_sign() {
        assert_eq!(signed_points("earn", 150), 150);
        assert_eq!(signed_points("adjust", -30), -30);
        assert_eq!(signed_points("adjust", 30), 30);
    }
}
