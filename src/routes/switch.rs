use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::dto::switch_dto::SwitchResponse;
use crate::routes::error::ApiError;
use crate::services::auth_user::AuthUser;
use crate::services::team_switcher::{Mode, TeamSwitcher};

/**
 * POST to move the user into the team selected by `mode`.
 */
pub async fn switch_team(
    _auth: AuthUser,
    Extension(switcher): Extension<Arc<TeamSwitcher>>,
    Path(mode): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mode: Mode = mode.parse()?;

    let report = switcher.switch(mode).await?;
    info!(
        "Switched OK: mode={} user_id={} added={:?} removed={:?}",
        mode,
        switcher.user_id(),
        report.added,
        report.removed
    );

    Ok((
        StatusCode::OK,
        Json(SwitchResponse {
            ok: true,
            mode: mode.to_string(),
        }),
    ))
}
