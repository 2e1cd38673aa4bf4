use actix_web::{HttpResponse, Responder, get, post, web};
use chrono::Utc;
use log::info;

use super::models::{AppState, ErrorResponse, PeerAck, PeerMessage};
use crate::network::BlockAnnouncement;

/// Accept a block hash announced by another process.
#[post("/peer/")]
pub async fn post_announcement(
    state: web::Data<AppState>,
    body: web::Json<BlockAnnouncement>,
) -> impl Responder {
    let block_hash = body.into_inner().block_hash;
    if block_hash.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "blockHash required".into(),
        });
    }

    info!("[peer -> hub]: {block_hash}");
    let received = state.record_announcement(PeerMessage {
        block_hash,
        received_at: Utc::now().timestamp_millis(),
    });
    HttpResponse::Ok().json(PeerAck { received })
}

/// Announcements received so far, oldest first.
#[get("/peer/")]
pub async fn get_announcements(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.announcements())
}
