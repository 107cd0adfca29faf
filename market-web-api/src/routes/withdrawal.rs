use crate::auth::MerchantToken;
use crate::dto::{
    ResponseData, WithdrawalDetails, WithdrawalHistory, WithdrawalIntakeRequestData,
    RESPONSE_BAD_REQUEST, RESPONSE_INTERNAL_ERROR, RESPONSE_OK,
};
use crate::pool::Db;
use crate::sql_stmt::{DB_BACKEND, WITHDRAWAL_HISTORY, WITHDRAWAL_HISTORY_COUNT};
use crate::store::Coordinator;
use market_db_entity::db::withdrawal_request::Entity as WithdrawalRequest;
use rocket::{serde::json::Json, State};
use sea_orm::{ConnectionTrait, EntityTrait, Statement};
use sea_orm_rocket::Connection;
use tracing::{error, warn};

#[post(
    "/request_withdrawal",
    format = "application/json",
    data = "<withdrawal_intake_request_data>"
)]
pub async fn request_withdrawal(
    coordinator: &State<Coordinator>,
    token: MerchantToken,
    withdrawal_intake_request_data: Json<WithdrawalIntakeRequestData>,
) -> Json<ResponseData<WithdrawalDetails>> {
    let result = coordinator
        .request_withdrawal(
            &token.user_id,
            &withdrawal_intake_request_data.pin,
            withdrawal_intake_request_data.amount,
            &withdrawal_intake_request_data.method,
            &withdrawal_intake_request_data.address,
        )
        .await;
    match result {
        Ok(withdrawal) => Json(ResponseData::new(
            RESPONSE_OK,
            "".to_owned(),
            Some(WithdrawalDetails::from_domain(&withdrawal)),
        )),
        Err(error) => {
            warn!("Withdrawal refused for {}: {}", token.user_id, error);
            Json(ResponseData::from_error(&error))
        }
    }
}

#[get("/withdrawal_history?<page>&<limit>", format = "application/json")]
pub async fn get_history(
    conn: Connection<'_, Db>,
    token: MerchantToken,
    page: i64,
    limit: i64,
) -> Json<ResponseData<WithdrawalHistory>> {
    if limit > 15 {
        return Json(ResponseData::new(
            RESPONSE_BAD_REQUEST,
            "'limit' can not be more than 15".to_string(),
            None,
        ));
    }
    if page < 1 || limit < 1 {
        return Json(ResponseData::new(
            RESPONSE_BAD_REQUEST,
            "'page' and 'limit' must be positive".to_string(),
            None,
        ));
    }
    let db = conn.into_inner();
    let start = (page - 1) * limit;

    let total_records = db
        .query_one(Statement::from_sql_and_values(
            DB_BACKEND,
            WITHDRAWAL_HISTORY_COUNT,
            vec![token.user_id.to_owned().into()],
        ))
        .await;

    let mut messages = String::new();
    let mut response = RESPONSE_OK;
    let mut total_pages = 0;
    match total_records {
        Ok(Some(total_records)) => {
            let total_records = total_records.try_get::<i64>("", "total_records").unwrap();
            let if_remainder = if total_records % limit > 0 { 1 } else { 0 };
            total_pages = (total_records / limit) + if_remainder;
        }
        Ok(None) => {}
        Err(error) => {
            warn!("Error counting withdrawals: {:?}", error);
            messages = String::from("Error counting withdrawals.");
            response = RESPONSE_INTERNAL_ERROR;
        }
    };

    if total_pages == 0 {
        let message = "No withdrawals found.";
        return Json(ResponseData::new(response, String::from(message), None));
    }

    let withdrawals = WithdrawalRequest::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DB_BACKEND,
            WITHDRAWAL_HISTORY,
            vec![token.user_id.to_owned().into(), start.into(), limit.into()],
        ))
        .all(db)
        .await;

    let withdrawals = match withdrawals {
        Ok(rows) => rows,
        Err(err) => {
            error!("Error fetching withdrawal history: {:?}", err);
            response = RESPONSE_INTERNAL_ERROR;
            vec![]
        }
    };

    let withdrawal_details: Vec<WithdrawalDetails> =
        withdrawals.iter().map(WithdrawalDetails::new).collect();

    let history = WithdrawalHistory {
        total_pages,
        withdrawals: withdrawal_details,
    };
    Json(ResponseData::new(response, messages, Some(history)))
}
