use rocket::fairing::AdHoc;

pub mod account;
pub mod admin;
pub mod auth;
pub mod market;
pub mod submission;
pub mod withdrawal;

pub fn mount() -> AdHoc {
    AdHoc::on_ignite("Attaching Routes", |rocket| async {
        rocket.mount(
            "/",
            routes![
                account::get_summary,
                account::set_pin,
                account::verify_pin,
                admin::create_assignment,
                admin::pending_submissions,
                admin::pending_withdrawals,
                admin::process_submission,
                admin::process_withdrawal,
                admin::unlock_user,
                admin::update_price,
                auth::login,
                market::get_assignments,
                market::get_price_catalog,
                submission::get_history,
                submission::submit_batch,
                withdrawal::get_history,
                withdrawal::request_withdrawal
            ],
        )
    })
}
