//! `/process_query`: prompt in, model output streamed back as SSE

use crate::services::relay;
use crate::state::AppState;
use crate::types::{self, QueryParams, RelayError};
use crate::web::sse::RelayEventStream;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Bounded so a stalled client eventually stalls the upstream read too.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Validation and prompt errors are answered with a plain HTTP error. Once the
/// event stream is open, every failure is reported in-band instead.
pub async fn process_query(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, RelayError> {
    let params: QueryParams = pairs.into_iter().collect();
    let query = types::Query::try_from(params).inspect_err(|_| {
        tracing::debug!("Rejecting request without a query");
    })?;
    let prompt = state.templates.render_prompt(&query)?;

    let relay_id = Uuid::now_v7();
    tracing::info!(%relay_id, query_len = query.as_str().len(), "📡 Relay session starting");

    let (mut tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();
    let events = RelayEventStream::new(rx, cancel.clone().drop_guard());

    let upstream = state.upstream.clone();
    tokio::spawn(
        async move {
            let outcome = relay(&upstream, &prompt, &mut tx, &cancel).await;
            tracing::info!(
                state = %outcome.state,
                fragments = outcome.fragments,
                "Relay session ended"
            );
        }
        .instrument(tracing::info_span!("relay", %relay_id)),
    );

    let mut response = events.into_sse().into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(response)
}
