use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::chat::{ChatReply, ChatService};
use crate::corpus::{PhraseCorpus, PhraseId};

pub struct AppState {
    pub corpus: Arc<PhraseCorpus>,
    pub chat: ChatService,
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[post("/api/chat")]
async fn chat_endpoint(req: web::Json<ChatRequest>, state: web::Data<AppState>) -> impl Responder {
    let message = req.into_inner().message;
    let worker = state.clone();
    let reply = web::block(move || worker.chat.reply(message.as_deref()))
        .await
        .unwrap_or_else(|e| {
            log::error!("chat request failed: {}", e);
            ChatReply::error()
        });
    HttpResponse::Ok().json(reply)
}

#[get("/api/phrases")]
async fn list_phrases(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.corpus.phrases())
}

#[get("/api/phrases/{id}")]
async fn phrase_detail(path: web::Path<PhraseId>, state: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    match state.corpus.phrase_detail(id) {
        Some(detail) => HttpResponse::Ok().json(detail),
        None => HttpResponse::NotFound().json(ErrorBody {
            error: format!("phrase {} not found", id),
        }),
    }
}

#[get("/api/categories")]
async fn list_categories(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.corpus.categories())
}

#[get("/api/categories/{name}/phrases")]
async fn category_phrases(path: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let name = path.into_inner();
    let phrases: Vec<_> = state.corpus.phrases_in_category(&name).collect();
    HttpResponse::Ok().json(phrases)
}

/// Unreadable chat bodies get the canned error reply instead of a bare 400.
fn chat_body_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("rejected chat body: {}", err);
    InternalError::from_response(err, HttpResponse::Ok().json(ChatReply::error())).into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(chat_body_error))
        .service(chat_endpoint)
        .service(list_phrases)
        .service(phrase_detail)
        .service(list_categories)
        .service(category_phrases);
}
