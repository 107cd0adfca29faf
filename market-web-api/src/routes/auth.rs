use crate::auth;
use crate::dto::{LoginRequestData, LoginResponseData, ResponseData, RESPONSE_INTERNAL_ERROR, RESPONSE_OK};
use crate::pool::MarketConfig;
use crate::store::Coordinator;
use market_core::model::UserRole;
use rocket::{serde::json::Json, State};
use tracing::warn;
use uuid::Uuid;

/// Mock sign-in: identity is taken at face value and only materializes the
/// ledger row. The signed role claim is what the admin routes check.
#[post("/auth/login", format = "application/json", data = "<login_request_data>")]
pub async fn login(
    market_config: &State<MarketConfig>,
    coordinator: &State<Coordinator>,
    login_request_data: Json<LoginRequestData>,
) -> Json<ResponseData<LoginResponseData>> {
    let email = login_request_data.email.trim().to_lowercase();
    let role = if market_config
        .admin_emails
        .split(',')
        .any(|admin| admin.trim().eq_ignore_ascii_case(&email))
    {
        UserRole::Admin
    } else {
        UserRole::Merchant
    };
    let user_id = Uuid::new_v5(&Uuid::NAMESPACE_DNS, email.as_bytes()).to_string();

    let merchant = coordinator
        .register_merchant(&user_id, &email, &login_request_data.display_name, role)
        .await;
    let merchant = match merchant {
        Ok(merchant) => merchant,
        Err(error) => {
            warn!("Error registering merchant: {}", error);
            return Json(ResponseData::from_error(&error));
        }
    };

    match auth::generate_token(&merchant.user_id, &email, merchant.role, &market_config.jwt_key) {
        Ok(token) => Json(ResponseData::new(
            RESPONSE_OK,
            "".to_owned(),
            Some(LoginResponseData {
                user_id: merchant.user_id,
                role: merchant.role.to_string(),
                token,
            }),
        )),
        Err(error) => {
            warn!("Error generating token: {}", error);
            Json(ResponseData::new(RESPONSE_INTERNAL_ERROR, error, None))
        }
    }
}
