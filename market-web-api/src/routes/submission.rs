use crate::auth::MerchantToken;
use crate::dto::{
    ResponseData, SubmissionDetails, SubmissionHistory, SubmitBatchRequestData,
    RESPONSE_BAD_REQUEST, RESPONSE_INTERNAL_ERROR, RESPONSE_OK,
};
use crate::pool::Db;
use crate::sql_stmt::{DB_BACKEND, SUBMISSION_HISTORY, SUBMISSION_HISTORY_COUNT};
use crate::store::Coordinator;
use market_db_entity::db::asset_submission::Entity as AssetSubmission;
use rocket::{serde::json::Json, State};
use sea_orm::{ConnectionTrait, EntityTrait, Statement};
use sea_orm_rocket::Connection;
use tracing::{error, warn};

#[post("/submit_batch", format = "application/json", data = "<submit_batch_request_data>")]
pub async fn submit_batch(
    coordinator: &State<Coordinator>,
    token: MerchantToken,
    submit_batch_request_data: Json<SubmitBatchRequestData>,
) -> Json<ResponseData<SubmissionDetails>> {
    let result = coordinator
        .submit_batch(
            &token.user_id,
            &submit_batch_request_data.platform_id,
            submit_batch_request_data.quantity,
            submit_batch_request_data.sheet_link.to_owned(),
        )
        .await;
    match result {
        Ok(submission) => Json(ResponseData::new(
            RESPONSE_OK,
            "".to_owned(),
            Some(SubmissionDetails::from_domain(&submission)),
        )),
        Err(error) => {
            warn!("Batch intake refused: {}", error);
            Json(ResponseData::from_error(&error))
        }
    }
}

#[get("/submission_history?<page>&<limit>", format = "application/json")]
pub async fn get_history(
    conn: Connection<'_, Db>,
    token: MerchantToken,
    page: i64,
    limit: i64,
) -> Json<ResponseData<SubmissionHistory>> {
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
            SUBMISSION_HISTORY_COUNT,
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
            warn!("Error counting submissions: {:?}", error);
            messages = String::from("Error counting submissions.");
            response = RESPONSE_INTERNAL_ERROR;
        }
    };

    if total_pages == 0 {
        let message = "No submissions found.";
        return Json(ResponseData::new(response, String::from(message), None));
    }

    let submissions = AssetSubmission::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DB_BACKEND,
            SUBMISSION_HISTORY,
            vec![token.user_id.to_owned().into(), start.into(), limit.into()],
        ))
        .all(db)
        .await;

    let submissions = match submissions {
        Ok(rows) => rows,
        Err(err) => {
            error!("Error fetching submission history: {:?}", err);
            response = RESPONSE_INTERNAL_ERROR;
            vec![]
        }
    };

    let submission_details: Vec<SubmissionDetails> =
        submissions.iter().map(SubmissionDetails::new).collect();

    let history = SubmissionHistory {
        total_pages,
        submissions: submission_details,
    };
    Json(ResponseData::new(response, messages, Some(history)))
}
