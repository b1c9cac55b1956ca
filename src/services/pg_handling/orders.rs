use actix::Handler;
use chrono::Utc;
use diesel::{QueryResult, RunQueryDsl};
use tracing::warn;

use crate::services::db_models::Order;
use crate::services::db_utils::PgActor;
use crate::services::insertable::{NewKitchenTicket, NewOrderItem};
use crate::services::messages::IngestWebsiteOrder;
use crate::services::pg_handling::establish_connection;

impl Handler<IngestWebsiteOrder> for PgActor {
    type Result = QueryResult<i64>;

    fn handle(&mut self, msg: IngestWebsiteOrder, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::kitchen_tickets::dsl::kitchen_tickets;
        use crate::schema::order_items::dsl::order_items;
        use crate::schema::orders::dsl::orders;

        let mut conn = establish_connection(&self.0)?;

        let order: Order = diesel::insert_into(orders)
            .values(msg.order)
            .get_result(&mut conn)?;

        // Items and the kitchen ticket are best-effort; a failure there must
        // not lose the order itself.
        let items: Vec<NewOrderItem> = msg
            .items
            .into_iter()
            .map(|item| NewOrderItem {
                order_id: order.id,
                ..item
            })
            .collect();
        if let Err(err) = diesel::insert_into(order_items)
            .values(&items)
            .execute(&mut conn)
        {
            warn!(order_id = order.id, "failed to insert order items: {err}");
        }

        if let Err(err) = diesel::insert_into(kitchen_tickets)
            .values(NewKitchenTicket {
                order_id: order.id,
                order_number: order.order_number.clone(),
                customer_name: order.customer_name.clone(),
                items: msg.ticket_items,
                status: "pending".to_owned(),
                priority: "normal".to_owned(),
                special_instructions: msg.special_instructions,
                created_at: Utc::now(),
            })
            .execute(&mut conn)
        {
            warn!(order_id = order.id, "failed to create kitchen ticket: {err}");
        }

        Ok(order.id)
    }
}
