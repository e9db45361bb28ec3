// src/webhook.rs

use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{post, web, HttpRequest, HttpResponse};
use mongodb::bson::Document;
use serde::Deserialize;
use tracing::{error, info};

use crate::db::DB;
use crate::reply::{CollectionState, WebhookReply};

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    pub database: String,
    pub coll_to_update: String,
}

// Body must be a JSON array of objects; anything else is rejected before any
// database call.
pub fn parse_documents(body: &[u8]) -> serde_json::Result<Vec<Document>> {
    serde_json::from_slice(body)
}

// Missing or undeserializable query params get the same reply shape as every
// other outcome instead of actix's default error page.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let reply = WebhookReply::failure(err.to_string(), CollectionState::Unchanged);

    InternalError::from_response(err, HttpResponse::BadRequest().json(reply)).into()
}

#[post("/webhook")]
pub async fn update_collection(
    query: web::Query<UpdateParams>,
    body: web::Bytes,
    db: web::Data<DB>,
) -> HttpResponse {
    let UpdateParams {
        database,
        coll_to_update,
    } = query.into_inner();

    if database.is_empty() || coll_to_update.is_empty() {
        return HttpResponse::BadRequest().json(WebhookReply::failure(
            "database and coll_to_update must be non-empty",
            CollectionState::Unchanged,
        ));
    }

    let documents = match parse_documents(&body) {
        Ok(documents) => documents,
        Err(e) => {
            error!(error = %e, %database, %coll_to_update, "rejected payload");
            return HttpResponse::BadRequest().json(WebhookReply::failure(
                format!("body must be a JSON array of objects: {e}"),
                CollectionState::Unchanged,
            ));
        }
    };

    let deleted = match db.delete_all(&database, &coll_to_update).await {
        Ok(deleted) => deleted,
        Err(e) => {
            error!(error = %e, %database, %coll_to_update, "failed to delete documents");
            return HttpResponse::InternalServerError().json(WebhookReply::failure(
                e.to_string(),
                CollectionState::Unchanged,
            ));
        }
    };
    info!(%database, %coll_to_update, "deleted {} item(s)", deleted);

    // An empty payload is a plain "clear the collection" request; the driver
    // rejects an insert_many with zero documents.
    if documents.is_empty() {
        info!(%database, %coll_to_update, "empty payload, collection left cleared");
        return HttpResponse::Ok().json(WebhookReply::success());
    }

    if let Err(e) = db
        .insert_unordered(&database, &coll_to_update, documents)
        .await
    {
        error!(error = %e, %database, %coll_to_update, "failed to insert documents");
        return HttpResponse::InternalServerError()
            .json(WebhookReply::failure(e.to_string(), CollectionState::Emptied));
    }

    match db.count(&database, &coll_to_update).await {
        Ok(total) => {
            info!(%database, %coll_to_update, "successfully inserted {} item(s)", total);
            HttpResponse::Ok().json(WebhookReply::success())
        }
        Err(e) => {
            error!(error = %e, %database, %coll_to_update, "failed to count documents");
            HttpResponse::InternalServerError()
                .json(WebhookReply::failure(e.to_string(), CollectionState::Emptied))
        }
    }
}
