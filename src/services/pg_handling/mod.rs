use actix::Handler;
use chrono::Utc;
use diesel::{
    r2d2::{ConnectionManager, Pool, PooledConnection},
    result::{DatabaseErrorKind, Error},
    ExpressionMethods, PgConnection, QueryDsl, QueryResult, RunQueryDsl,
};

use crate::services::db_models::{Notification, StaffUser};
use crate::services::db_utils::PgActor;
use crate::services::insertable::{NewNotification, NewStaffActivity};
use crate::services::messages::{
    FetchStaffByToken, FetchUnreadNotifications, MarkNotificationRead, PushNotification,
    RecordStaffActivity,
};

pub mod analytics;
pub mod content;
pub mod loyalty;
pub mod menu;
pub mod orders;
pub mod reservations;

pub(crate) fn establish_connection(
    pool: &Pool<ConnectionManager<PgConnection>>,
) -> Result<PooledConnection<ConnectionManager<PgConnection>>, Error> {
    match pool.get() {
        Ok(val) => Ok(val),
        Err(_) => Err(connection_err()),
    }
}

fn connection_err() -> Error {
    Error::DatabaseError(
        DatabaseErrorKind::ClosedConnection,
        Box::new("Failed to establish connection".to_owned()),
    )
}

pub(crate) fn get_db_err(msg: &str) -> Error {
    Error::DatabaseError(
        DatabaseErrorKind::UnableToSendCommand,
        Box::new(msg.to_owned()),
    )
}

impl Handler<FetchStaffByToken> for PgActor {
    type Result = QueryResult<StaffUser>;

    fn handle(&mut self, msg: FetchStaffByToken, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::staff_users::{api_token, dsl::staff_users, is_active};

        let mut conn = establish_connection(&self.0)?;

        staff_users
            .filter(api_token.eq(msg.0))
            .filter(is_active.eq(true))
            .first::<StaffUser>(&mut conn)
    }
}

impl Handler<RecordStaffActivity> for PgActor {
    type Result = QueryResult<()>;

    fn handle(&mut self, msg: RecordStaffActivity, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::staff_activity::dsl::staff_activity;

        let mut conn = establish_connection(&self.0)?;

        diesel::insert_into(staff_activity)
            .values(NewStaffActivity {
                staff_id: msg.staff_id,
                staff_name: msg.staff_name,
                action: msg.action,
                entity_type: msg.entity_type,
                entity_id: msg.entity_id,
                details: msg.details,
                created_at: Utc::now(),
            })
            .execute(&mut conn)?;

        Ok(())
    }
}

impl Handler<FetchUnreadNotifications> for PgActor {
    type Result = QueryResult<Vec<Notification>>;

    fn handle(&mut self, _msg: FetchUnreadNotifications, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::notifications::{created_at, dsl::notifications, read_at};

        let mut conn = establish_connection(&self.0)?;

        notifications
            .filter(read_at.is_null())
            .order(created_at.desc())
            .get_results::<Notification>(&mut conn)
    }
}

impl Handler<MarkNotificationRead> for PgActor {
    type Result = QueryResult<usize>;

    fn handle(&mut self, msg: MarkNotificationRead, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::notifications::{dsl::notifications, read_at};

        let mut conn = establish_connection(&self.0)?;

        diesel::update(notifications.find(msg.0))
            .set(read_at.eq(Utc::now()))
            .execute(&mut conn)
    }
}

impl Handler<PushNotification> for PgActor {
    type Result = QueryResult<()>;

    fn handle(&mut self, msg: PushNotification, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::notifications::dsl::notifications;

        let mut conn = establish_connection(&self.0)?;

        diesel::insert_into(notifications)
            .values(NewNotification {
                kind: msg.kind,
                title: msg.title,
                message: msg.message,
                metadata: msg.metadata,
                created_at: Utc::now(),
            })
            .execute(&mut conn)?;

        Ok(())
    }
}
