//! Post creation - the write path that feeds the broadcaster.

use actix_web::{HttpResponse, web};

use ripple_shared::dto::{CreatePostRequest, CreatePostResponse, PostPayload};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /create_post
///
/// Commit first, then notify. The broadcast is best effort: a post nobody
/// is listening for is dropped at the channel, and subscribers catch up on
/// their next feed read.
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let item = state
        .feed
        .create_post(&identity.0, &form.content, form.title.as_deref())
        .await?;

    tracing::info!(post_id = %item.id, username = %item.username, "Post created");

    let payload = PostPayload::from(item.clone());
    state.feed_channel.publish(item);

    Ok(HttpResponse::Ok().json(CreatePostResponse::new(payload)))
}
