use sea_orm::DbBackend;

pub const DB_BACKEND: DbBackend = DbBackend::Postgres;

pub const SUBMISSION_HISTORY: &str = r#"SELECT asset_submission.submission_id,
    asset_submission.user_id,
    asset_submission.platform_id,
    asset_submission.quantity,
    asset_submission.verified_quantity,
    asset_submission.failed_quantity,
    asset_submission.price_per_unit,
    asset_submission.sheet_link,
    asset_submission.status,
    asset_submission.submitted_at,
    asset_submission.processed_at
    FROM asset_submission
    WHERE user_id = $1
    ORDER BY submitted_at DESC OFFSET $2 ROWS LIMIT $3"#;

pub const SUBMISSION_HISTORY_COUNT: &str = r#"SELECT COUNT(*) AS total_records
    FROM asset_submission
    WHERE user_id = $1"#;

pub const WITHDRAWAL_HISTORY: &str = r#"SELECT withdrawal_request.withdrawal_id,
    withdrawal_request.user_id,
    withdrawal_request.amount,
    withdrawal_request.method,
    withdrawal_request.address,
    withdrawal_request.status,
    withdrawal_request.transaction_id,
    withdrawal_request.created_at,
    withdrawal_request.processed_at
    FROM withdrawal_request
    WHERE user_id = $1
    ORDER BY created_at DESC OFFSET $2 ROWS LIMIT $3"#;

pub const WITHDRAWAL_HISTORY_COUNT: &str = r#"SELECT COUNT(*) AS total_records
    FROM withdrawal_request
    WHERE user_id = $1"#;

pub const PENDING_EARNINGS: &str = r#"SELECT COALESCE(SUM(quantity * price_per_unit), 0) AS pending_earnings
    FROM asset_submission
    WHERE user_id = $1 AND status = 'pending'"#;

pub const TOTAL_WITHDRAWN: &str = r#"SELECT COALESCE(SUM(amount), 0) AS total_withdrawn
    FROM withdrawal_request
    WHERE user_id = $1 AND status = 'paid'"#;
