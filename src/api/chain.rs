use actix_web::{HttpResponse, Responder, get, web};
use log::{debug, warn};

use super::models::{AppState, ChainResponse, ErrorResponse, ValidateResponse};
use crate::blockchain::Auditor;
use crate::error::LedgerError;

/// Get the full stored blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    match state.storage.load() {
        Ok(bc) => HttpResponse::Ok().json(ChainResponse {
            length: bc.len(),
            difficulty: bc.difficulty(),
            chain: bc.records(),
        }),
        Err(e) => storage_failure(e),
    }
}

/// Audit the stored chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = match state.storage.load() {
        Ok(bc) => bc,
        Err(e) => return storage_failure(e),
    };

    let auditor = Auditor::new(&bc);
    let valid = auditor.verify();
    let corruption = if valid { None } else { auditor.first_corruption() };
    debug!("API - validate: {} blocks, corruption={corruption:?}", bc.len());
    HttpResponse::Ok().json(ValidateResponse {
        valid,
        length: bc.len(),
        difficulty: bc.difficulty(),
        top_hash: valid.then(|| bc.last_block().block_hash().to_string()),
        corruption: corruption.map(|c| c.to_string()),
    })
}

fn storage_failure(e: LedgerError) -> HttpResponse {
    warn!("API - could not load chain: {e}");
    let body = ErrorResponse {
        error: e.to_string(),
    };
    match e {
        LedgerError::Storage { .. } => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
