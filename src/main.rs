use std::sync::Arc;

use tracing::info;

mod app;
mod logging;
mod settings;

mod dto {
    pub mod switch_dto;
}

mod routes {
    pub mod error;
    pub mod health;
    pub mod index;
    pub mod switch;
}

mod services {
    pub mod aircall_client;
    pub mod auth_user;
    pub mod team_switcher;
}

use services::{aircall_client::AircallClient, team_switcher::TeamSwitcher};
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    // Missing configuration stops the process before it binds.
    let settings = Arc::new(Settings::from_env()?);
    info!("Loaded configuration: {:?}", settings);

    let client = AircallClient::new(&settings)?;
    let switcher = Arc::new(TeamSwitcher::new(Arc::new(client), &settings));

    let app = app::build_router(settings.clone(), switcher);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Started server on {}.", settings.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
