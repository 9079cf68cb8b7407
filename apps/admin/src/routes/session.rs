use axum::extract::State;

use crate::auth::guard::{check_session, SessionOutcome};
use crate::auth::Credentials;
use crate::state::AppState;

/// GET /api/v1/session
/// Profile probe. A failed check clears both token cookies and redirects to login.
pub async fn handle_session(
    State(state): State<AppState>,
    credentials: Option<Credentials>,
) -> SessionOutcome {
    check_session(&state.api, credentials).await
}
