use crate::auth::AdminToken;
use crate::dto::{
    AssignmentDetails, CreateAssignmentRequestData, PlatformDetails,
    ProcessSubmissionRequestData, ProcessWithdrawalRequestData, ResponseData, SubmissionDetails,
    UnlockUserRequestData, UpdatePriceRequestData, WithdrawalDetails, RESPONSE_BAD_REQUEST,
    RESPONSE_INTERNAL_ERROR, RESPONSE_OK,
};
use crate::pool::Db;
use crate::store::Coordinator;
use market_core::model::{PlatformStatus, SubmissionStatus, WithdrawalStatus};
use market_db_entity::db::asset_submission::{
    Column as SubmissionColumn, Entity as AssetSubmission,
};
use market_db_entity::db::withdrawal_request::{
    Column as WithdrawalColumn, Entity as WithdrawalRequest,
};
use rocket::{serde::json::Json, State};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use sea_orm_rocket::Connection;
use std::str::FromStr;
use tracing::{error, info, warn};

#[post(
    "/admin/process_submission",
    format = "application/json",
    data = "<process_submission_request_data>"
)]
pub async fn process_submission(
    coordinator: &State<Coordinator>,
    admin: AdminToken,
    process_submission_request_data: Json<ProcessSubmissionRequestData>,
) -> Json<ResponseData<SubmissionDetails>> {
    let request = process_submission_request_data.into_inner();
    let result = match SubmissionStatus::from_str(&request.outcome) {
        Ok(SubmissionStatus::Approved) => {
            coordinator
                .approve_submission(
                    &request.submission_id,
                    request.verified_quantity,
                    request.failed_quantity,
                )
                .await
        }
        Ok(SubmissionStatus::Rejected) => {
            coordinator
                .reject_submission(
                    &request.submission_id,
                    request.verified_quantity,
                    request.failed_quantity,
                )
                .await
        }
        _ => {
            return Json(ResponseData::new(
                RESPONSE_BAD_REQUEST,
                "'outcome' should be approved or rejected only.".to_owned(),
                None,
            ))
        }
    };
    match result {
        Ok(submission) => {
            info!(
                "admin {} decided submission {}: {}",
                admin.user_id, submission.submission_id, submission.status
            );
            Json(ResponseData::new(
                RESPONSE_OK,
                "".to_owned(),
                Some(SubmissionDetails::from_domain(&submission)),
            ))
        }
        Err(error) => {
            warn!("Submission decision refused: {}", error);
            Json(ResponseData::from_error(&error))
        }
    }
}

#[post(
    "/admin/process_withdrawal",
    format = "application/json",
    data = "<process_withdrawal_request_data>"
)]
pub async fn process_withdrawal(
    coordinator: &State<Coordinator>,
    admin: AdminToken,
    process_withdrawal_request_data: Json<ProcessWithdrawalRequestData>,
) -> Json<ResponseData<WithdrawalDetails>> {
    let request = process_withdrawal_request_data.into_inner();
    let result = match WithdrawalStatus::from_str(&request.outcome) {
        Ok(WithdrawalStatus::Paid) => {
            let transaction_id = request.transaction_id.unwrap_or_default();
            coordinator
                .fulfill_withdrawal(&request.withdrawal_id, &transaction_id)
                .await
        }
        Ok(WithdrawalStatus::Rejected) => {
            coordinator.reject_withdrawal(&request.withdrawal_id).await
        }
        _ => {
            return Json(ResponseData::new(
                RESPONSE_BAD_REQUEST,
                "'outcome' should be paid or rejected only.".to_owned(),
                None,
            ))
        }
    };
    match result {
        Ok(withdrawal) => {
            info!(
                "admin {} processed withdrawal {}: {}",
                admin.user_id, withdrawal.withdrawal_id, withdrawal.status
            );
            Json(ResponseData::new(
                RESPONSE_OK,
                "".to_owned(),
                Some(WithdrawalDetails::from_domain(&withdrawal)),
            ))
        }
        Err(error) => {
            warn!("Withdrawal processing refused: {}", error);
            Json(ResponseData::from_error(&error))
        }
    }
}

#[post(
    "/admin/create_assignment",
    format = "application/json",
    data = "<create_assignment_request_data>"
)]
pub async fn create_assignment(
    coordinator: &State<Coordinator>,
    admin: AdminToken,
    create_assignment_request_data: Json<CreateAssignmentRequestData>,
) -> Json<ResponseData<AssignmentDetails>> {
    let request = create_assignment_request_data.into_inner();
    let result = coordinator
        .create_goal(
            &request.platform_id,
            request.target_quantity,
            request.instructions,
        )
        .await;
    match result {
        Ok(assignment) => {
            info!(
                "admin {} posted assignment {} for {}",
                admin.user_id, assignment.assignment_id, assignment.platform_id
            );
            Json(ResponseData::new(
                RESPONSE_OK,
                "".to_owned(),
                Some(AssignmentDetails::from_domain(&assignment)),
            ))
        }
        Err(error) => {
            warn!("Assignment refused: {}", error);
            Json(ResponseData::from_error(&error))
        }
    }
}

#[post(
    "/admin/update_price",
    format = "application/json",
    data = "<update_price_request_data>"
)]
pub async fn update_price(
    coordinator: &State<Coordinator>,
    _admin: AdminToken,
    update_price_request_data: Json<UpdatePriceRequestData>,
) -> Json<ResponseData<PlatformDetails>> {
    let request = update_price_request_data.into_inner();
    let status = match PlatformStatus::from_str(&request.status) {
        Ok(status) => status,
        Err(_) => {
            return Json(ResponseData::new(
                RESPONSE_BAD_REQUEST,
                "'status' should be buying or closed only.".to_owned(),
                None,
            ))
        }
    };
    let result = coordinator
        .update_price(
            &request.platform_id,
            request.today_price,
            request.regular_price,
            status,
        )
        .await;
    match result {
        Ok(platform) => Json(ResponseData::new(
            RESPONSE_OK,
            "".to_owned(),
            Some(PlatformDetails {
                platform_id: platform.platform_id,
                name: platform.name,
                today_price: platform.today_price,
                regular_price: platform.regular_price,
                status: platform.status.to_string(),
                updated_at: platform.updated_at,
            }),
        )),
        Err(error) => {
            warn!("Price update refused: {}", error);
            Json(ResponseData::from_error(&error))
        }
    }
}

#[post(
    "/admin/unlock_user",
    format = "application/json",
    data = "<unlock_user_request_data>"
)]
pub async fn unlock_user(
    coordinator: &State<Coordinator>,
    admin: AdminToken,
    unlock_user_request_data: Json<UnlockUserRequestData>,
) -> Json<ResponseData<String>> {
    match coordinator
        .admin_unlock(&unlock_user_request_data.user_id)
        .await
    {
        Ok(merchant) => {
            info!(
                "admin {} restored withdrawal access for {}",
                admin.user_id, merchant.user_id
            );
            Json(ResponseData::new(
                RESPONSE_OK,
                "Withdrawal access restored.".to_owned(),
                Some(merchant.user_id),
            ))
        }
        Err(error) => {
            warn!("Unlock refused: {}", error);
            Json(ResponseData::from_error(&error))
        }
    }
}

#[get("/admin/pending_submissions", format = "application/json")]
pub async fn pending_submissions(
    conn: Connection<'_, Db>,
    _admin: AdminToken,
) -> Json<ResponseData<Vec<SubmissionDetails>>> {
    let db = conn.into_inner();
    let submissions = AssetSubmission::find()
        .filter(SubmissionColumn::Status.eq(SubmissionStatus::Pending.to_string()))
        .order_by_asc(SubmissionColumn::SubmittedAt)
        .all(db)
        .await;
    match submissions {
        Ok(rows) => {
            let details: Vec<SubmissionDetails> = rows.iter().map(SubmissionDetails::new).collect();
            Json(ResponseData::new(RESPONSE_OK, "".to_owned(), Some(details)))
        }
        Err(err) => {
            error!("Error fetching pending submissions: {:?}", err);
            Json(ResponseData::new(
                RESPONSE_INTERNAL_ERROR,
                "Error fetching pending submissions.".to_owned(),
                None,
            ))
        }
    }
}

#[get("/admin/pending_withdrawals", format = "application/json")]
pub async fn pending_withdrawals(
    conn: Connection<'_, Db>,
    _admin: AdminToken,
) -> Json<ResponseData<Vec<WithdrawalDetails>>> {
    let db = conn.into_inner();
    let withdrawals = WithdrawalRequest::find()
        .filter(WithdrawalColumn::Status.eq(WithdrawalStatus::Pending.to_string()))
        .order_by_asc(WithdrawalColumn::CreatedAt)
        .all(db)
        .await;
    match withdrawals {
        Ok(rows) => {
            let details: Vec<WithdrawalDetails> = rows.iter().map(WithdrawalDetails::new).collect();
            Json(ResponseData::new(RESPONSE_OK, "".to_owned(), Some(details)))
        }
        Err(err) => {
            error!("Error fetching pending withdrawals: {:?}", err);
            Json(ResponseData::new(
                RESPONSE_INTERNAL_ERROR,
                "Error fetching pending withdrawals.".to_owned(),
                None,
            ))
        }
    }
}
