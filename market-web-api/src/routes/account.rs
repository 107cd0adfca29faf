use crate::auth::MerchantToken;
use crate::dto::{
    AccountSummary, ResponseData, SetPinRequestData, SetPinResponseData, VerifyPinRequestData,
    RESPONSE_BAD_REQUEST, RESPONSE_OK,
};
use crate::pool::Db;
use crate::sql_stmt::{DB_BACKEND, PENDING_EARNINGS, TOTAL_WITHDRAWN};
use crate::store::Coordinator;
use market_core::pin::PIN_RESET_COOLDOWN_SECS;
use market_core::MarketStore;
use rocket::{serde::json::Json, State};
use sea_orm::prelude::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_rocket::Connection;
use tracing::warn;

#[get("/account_summary", format = "application/json")]
pub async fn get_summary(
    conn: Connection<'_, Db>,
    coordinator: &State<Coordinator>,
    token: MerchantToken,
) -> Json<ResponseData<AccountSummary>> {
    let merchant = match coordinator.store().merchant(&token.user_id).await {
        Ok(merchant) => merchant,
        Err(error) => {
            warn!("Error fetching merchant {}: {}", token.user_id, error);
            return Json(ResponseData::from_error(&error));
        }
    };

    let db = conn.into_inner();
    let total_withdrawn = sum_query(db, TOTAL_WITHDRAWN, "total_withdrawn", &token.user_id).await;
    let pending_earnings = sum_query(db, PENDING_EARNINGS, "pending_earnings", &token.user_id).await;

    let summary = AccountSummary::new(
        &merchant,
        total_withdrawn,
        pending_earnings,
        chrono::Utc::now().timestamp(),
    );
    Json(ResponseData::new(RESPONSE_OK, "".to_owned(), Some(summary)))
}

async fn sum_query(
    db: &DatabaseConnection,
    statement: &str,
    column: &str,
    user_id: &str,
) -> Decimal {
    let row = db
        .query_one(Statement::from_sql_and_values(
            DB_BACKEND,
            statement,
            vec![user_id.to_owned().into()],
        ))
        .await;
    match row {
        Ok(Some(row)) => row.try_get::<Decimal>("", column).unwrap_or(Decimal::ZERO),
        Ok(None) => Decimal::ZERO,
        Err(error) => {
            warn!("Error aggregating {}: {:?}", column, error);
            Decimal::ZERO
        }
    }
}

#[post("/verify_pin", format = "application/json", data = "<verify_pin_request_data>")]
pub async fn verify_pin(
    coordinator: &State<Coordinator>,
    token: MerchantToken,
    verify_pin_request_data: Json<VerifyPinRequestData>,
) -> Json<ResponseData<String>> {
    match coordinator
        .authorize_pin(&token.user_id, &verify_pin_request_data.pin)
        .await
    {
        Ok(()) => Json(ResponseData::new(
            RESPONSE_OK,
            "".to_owned(),
            Some("authorized".to_owned()),
        )),
        Err(error) => {
            warn!("Pin check failed for {}: {}", token.user_id, error);
            Json(ResponseData::from_error(&error))
        }
    }
}

#[post("/set_pin", format = "application/json", data = "<set_pin_request_data>")]
pub async fn set_pin(
    coordinator: &State<Coordinator>,
    token: MerchantToken,
    set_pin_request_data: Json<SetPinRequestData>,
) -> Json<ResponseData<SetPinResponseData>> {
    if set_pin_request_data.pin.ne(&set_pin_request_data.confirm_pin) {
        return Json(ResponseData::new(
            RESPONSE_BAD_REQUEST,
            "Pins do not match.".to_owned(),
            None,
        ));
    }
    match coordinator
        .set_pin(&token.user_id, &set_pin_request_data.pin)
        .await
    {
        Ok(is_reset) => {
            let message = if is_reset {
                "Security pin reset. Withdrawals are locked for 24 hours.".to_owned()
            } else {
                "Security pin setup successful.".to_owned()
            };
            Json(ResponseData::new(
                RESPONSE_OK,
                message,
                Some(SetPinResponseData {
                    is_reset,
                    cooldown_secs: if is_reset { PIN_RESET_COOLDOWN_SECS } else { 0 },
                }),
            ))
        }
        Err(error) => {
            warn!("Pin update refused for {}: {}", token.user_id, error);
            Json(ResponseData::from_error(&error))
        }
    }
}
