use actix::Handler;
use chrono::Utc;
use diesel::{ExpressionMethods, QueryDsl, QueryResult, RunQueryDsl};

use crate::services::db_models::{Dish, DishCategory};
use crate::services::db_utils::PgActor;
use crate::services::messages::{
    CreateDish, DeleteDish, FetchCategories, FetchDish, FetchDishes, UpdateDish,
};
use crate::services::pg_handling::establish_connection;

impl Handler<FetchDishes> for PgActor {
    type Result = QueryResult<Vec<Dish>>;

    fn handle(&mut self, msg: FetchDishes, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dishes::{available, dsl::dishes, name};

        let mut conn = establish_connection(&self.0)?;

        let mut query = dishes.into_boxed();
        if msg.only_available {
            query = query.filter(available.eq(true));
        }

        query.order(name.asc()).get_results::<Dish>(&mut conn)
    }
}

impl Handler<FetchDish> for PgActor {
    type Result = QueryResult<Dish>;

    fn handle(&mut self, msg: FetchDish, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dishes::dsl::dishes;

        let mut conn = establish_connection(&self.0)?;

        dishes.find(msg.0).first(&mut conn)
    }
}

impl Handler<CreateDish> for PgActor {
    type Result = QueryResult<Dish>;

    fn handle(&mut self, msg: CreateDish, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dishes::dsl::dishes;

        let mut conn = establish_connection(&self.0)?;

        diesel::insert_into(dishes)
            .values(msg.0)
            .get_result::<Dish>(&mut conn)
    }
}

impl Handler<UpdateDish> for PgActor {
    type Result = QueryResult<Dish>;

    fn handle(&mut self, msg: UpdateDish, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dishes::dsl::dishes;

        let mut conn = establish_connection(&self.0)?;

        let mut changes = msg.changes;
        changes.updated_at = Some(Utc::now());

        diesel::update(dishes.find(msg.id))
            .set(changes)
            .get_result::<Dish>(&mut conn)
    }
}

impl Handler<DeleteDish> for PgActor {
    type Result = QueryResult<usize>;

    fn handle(&mut self, msg: DeleteDish, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dishes::dsl::dishes;

        let mut conn = establish_connection(&self.0)?;

        diesel::delete(dishes.find(msg.0)).execute(&mut conn)
    }
}

impl Handler<FetchCategories> for PgActor {
    type Result = QueryResult<Vec<DishCategory>>;

    fn handle(&mut self, _msg: FetchCategories, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dish_categories::{dsl::dish_categories, order_index};

        let mut conn = establish_connection(&self.0)?;

        dish_categories
            .order(order_index.asc())
            .get_results::<DishCategory>(&mut conn)
    }
}
