mod chain;
mod health;
pub mod models;
mod peer;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(peer::post_announcement)
            .service(peer::get_announcements),
    );
}
