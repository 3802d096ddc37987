use std::sync::Arc;

use axum::{extract::Extension, response::Html};
use tracing::info;

use crate::services::auth_user::AuthUser;
use crate::settings::Settings;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/**
 * GET the switch page with the configured team and user ids filled in.
 */
pub async fn index(
    Extension(settings): Extension<Arc<Settings>>,
    _auth: AuthUser,
) -> Html<String> {
    info!("Serving switch page.");
    Html(render_index(&settings))
}

/// Fills `{{name}}` placeholders in one pass; substituted values are never rescanned.
pub fn render_index(settings: &Settings) -> String {
    let mut out = String::with_capacity(INDEX_TEMPLATE.len());
    let mut rest = INDEX_TEMPLATE;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let value = match &after_open[..end] {
            "cs_team" => Some(&settings.team_cs_id),
            "tech_team" => Some(&settings.team_tech_id),
            "nina_user" => Some(&settings.nina_user_id),
            _ => None,
        };
        match value {
            Some(value) => out.push_str(&escape_html(value)),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }

        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    out
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
