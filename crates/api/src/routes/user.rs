//! Route definitions for accounts: registration, sessions, password flows,
//! profiles, and admin account management.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{admin, user};
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// POST   /register                     register (multipart, public)
/// POST   /login                        login (public)
/// POST   /admin/login                  admin_login (public)
/// GET    /refresh                      refresh (cookie)
/// POST   /logout                       logout (cookie)
///
/// POST   /forgot-password              email a reset link (public)
/// POST   /reset-password/{token}       reset via emailed token (public)
/// POST   /admin/forgot-password        email a 6-digit code (public)
/// POST   /verify-code                  check the code (public)
/// POST   /admin/set-new-password       set password after code check
/// PUT    /update-password              authed password change
///
/// PUT    /edit-profile                 profile update (multipart)
/// PUT    /set-preferred-language       language preference
/// GET    /profile/{user_id}            fetch a profile
/// DELETE /delete-user                  delete own account
///
/// POST   /make-admin                   create or promote an admin
/// GET    /get-all-admins               list admins (admin only)
/// DELETE /delete-admin/{user_id}       delete an admin (admin only)
/// GET    /all                          list all users (admin only)
/// DELETE /{user_id}                    delete any user (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .route("/admin/login", post(user::admin_login))
        .route("/refresh", get(user::refresh))
        .route("/logout", post(user::logout))
        .route("/forgot-password", post(user::forgot_password))
        .route("/reset-password/{token}", post(user::reset_password))
        .route("/admin/forgot-password", post(admin::send_verification_code))
        .route("/verify-code", post(admin::verify_code))
        .route("/admin/set-new-password", post(admin::set_new_password))
        .route("/update-password", put(user::update_password))
        .route("/edit-profile", put(user::edit_profile))
        .route("/set-preferred-language", put(user::set_preferred_language))
        .route("/profile/{user_id}", get(user::get_profile))
        .route("/delete-user", delete(user::delete_self))
        .route("/make-admin", post(admin::make_admin))
        .route("/get-all-admins", get(admin::get_all_admins))
        .route("/delete-admin/{user_id}", delete(admin::delete_admin))
        .route("/all", get(user::list_users))
        .route("/{user_id}", delete(user::delete_user))
}
