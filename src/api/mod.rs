pub mod health;
pub mod swagger;
pub mod users;

use actix_web::web;

/// Registers every route. Expects a `web::Data<dyn UserStore>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/addUser", web::post().to(users::add_user))
        .route("/fetchUser", web::get().to(users::fetch_users));
}
