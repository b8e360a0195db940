use actix_web::{web, App, HttpServer};
use anyhow::Result;
use std::sync::Arc;

use moleboheng::api::{self, AppState};
use moleboheng::{ChatService, InteractionLogger, MatchEngine, PhraseCorpus, ResponseSelector, Settings};

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load("Config")?;

    let corpus = Arc::new(PhraseCorpus::load(&settings.data)?);
    if corpus.is_empty() {
        log::warn!("Phrase corpus is empty; every message will get the no-match reply.");
    }
    log::info!(
        "Loaded {} phrases, {} responses, {} categories",
        corpus.len(),
        corpus.response_count(),
        corpus.categories().len()
    );

    let engine = MatchEngine::new(corpus.clone(), settings.matching);
    let chat = ChatService::new(
        ResponseSelector::new(engine),
        InteractionLogger::open(&settings.data.interaction_log),
        settings.limits.max_input_chars,
    );
    let data = web::Data::new(AppState { corpus, chat });

    let host = settings.server.host.clone();
    let port = settings.server.port;
    log::info!("Starting server at http://{}:{}", host, port);
    let app_data = data.clone();
    HttpServer::new(move || App::new().app_data(app_data.clone()).configure(api::configure))
        .bind((host, port))?
        .run()
        .await?;

    match Arc::try_unwrap(data.into_inner()) {
        Ok(state) => state.chat.shutdown(),
        Err(_) => log::warn!("Server state still shared at shutdown; pending interaction records may be lost"),
    }
    Ok(())
}
