use crate::dto::{AssignmentDetails, PlatformDetails, ResponseData, RESPONSE_INTERNAL_ERROR, RESPONSE_OK};
use crate::pool::Db;
use market_db_entity::db::market_assignment::{
    Column as AssignmentColumn, Entity as MarketAssignment,
};
use market_db_entity::db::platform_price::{Column as PlatformColumn, Entity as PlatformPrice};
use rocket::serde::json::Json;
use sea_orm::{EntityTrait, QueryOrder};
use sea_orm_rocket::Connection;
use tracing::error;

#[get("/price_catalog", format = "application/json")]
pub async fn get_price_catalog(conn: Connection<'_, Db>) -> Json<ResponseData<Vec<PlatformDetails>>> {
    let db = conn.into_inner();
    let platforms = PlatformPrice::find()
        .order_by_asc(PlatformColumn::PlatformId)
        .all(db)
        .await;
    match platforms {
        Ok(rows) => {
            let details: Vec<PlatformDetails> = rows.iter().map(PlatformDetails::new).collect();
            Json(ResponseData::new(RESPONSE_OK, "".to_owned(), Some(details)))
        }
        Err(err) => {
            error!("Error fetching price catalog: {:?}", err);
            Json(ResponseData::new(
                RESPONSE_INTERNAL_ERROR,
                "Error fetching price catalog.".to_owned(),
                None,
            ))
        }
    }
}

#[get("/market_assignments", format = "application/json")]
pub async fn get_assignments(
    conn: Connection<'_, Db>,
) -> Json<ResponseData<Vec<AssignmentDetails>>> {
    let db = conn.into_inner();
    let assignments = MarketAssignment::find()
        .order_by_desc(AssignmentColumn::CreatedAt)
        .all(db)
        .await;
    match assignments {
        Ok(rows) => {
            let details: Vec<AssignmentDetails> = rows.iter().map(AssignmentDetails::new).collect();
            Json(ResponseData::new(RESPONSE_OK, "".to_owned(), Some(details)))
        }
        Err(err) => {
            error!("Error fetching assignments: {:?}", err);
            Json(ResponseData::new(
                RESPONSE_INTERNAL_ERROR,
                "Error fetching assignments.".to_owned(),
                None,
            ))
        }
    }
}
