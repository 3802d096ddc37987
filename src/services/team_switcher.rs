use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use reqwest::Method;
use thiserror::Error;
use tracing::info;

use crate::services::aircall_client::{TeamApi, team_user_path};
use crate::settings::Settings;

/// Which team the user should end up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Customer service: join the CS team, leave the technical team.
    CustomerService,
    /// Technical: join the technical team, leave the CS team.
    Technical,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::CustomerService => "kundeservice",
            Mode::Technical => "teknisk",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid mode: {0}")]
pub struct ModeError(pub String);

impl FromStr for Mode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kundeservice" => Ok(Mode::CustomerService),
            "teknisk" => Ok(Mode::Technical),
            other => Err(ModeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Add,
    Remove,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Add => f.write_str("add"),
            Step::Remove => f.write_str("remove"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    AlreadyInDesiredState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchReport {
    pub added: Outcome,
    pub removed: Outcome,
}

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("Aircall {step} failed: {status} {body}")]
    Rejected { step: Step, status: u16, body: String },

    #[error("Aircall request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/**
 * Maps an Aircall status code to an outcome for the given step. A conflict on
 * add and a not-found on remove both mean the membership is already as wanted.
 */
pub fn interpret(step: Step, status: u16, body: String) -> Result<Outcome, SwitchError> {
    match (step, status) {
        (Step::Add, 200 | 201 | 204) | (Step::Remove, 200 | 204) => Ok(Outcome::Applied),
        (Step::Add, 409) | (Step::Remove, 404) => Ok(Outcome::AlreadyInDesiredState),
        _ => Err(SwitchError::Rejected { step, status, body }),
    }
}

pub struct TeamSwitcher {
    api: Arc<dyn TeamApi>,
    cs_team_id: String,
    tech_team_id: String,
    user_id: String,
}

impl TeamSwitcher {
    pub fn new(api: Arc<dyn TeamApi>, settings: &Settings) -> Self {
        Self {
            api,
            cs_team_id: settings.team_cs_id.clone(),
            tech_team_id: settings.team_tech_id.clone(),
            user_id: settings.nina_user_id.clone(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns (team to join, team to leave) for a mode.
    fn teams_for(&self, mode: Mode) -> (&str, &str) {
        match mode {
            Mode::CustomerService => (self.cs_team_id.as_str(), self.tech_team_id.as_str()),
            Mode::Technical => (self.tech_team_id.as_str(), self.cs_team_id.as_str()),
        }
    }

    /**
     * Adds the user to the target team, then removes them from the other one.
     * A failed add stops before the remove. A failed remove leaves the add in
     * place; nothing is rolled back.
     */
    pub async fn switch(&self, mode: Mode) -> Result<SwitchReport, SwitchError> {
        let (join, leave) = self.teams_for(mode);

        let added = self.run_step(Step::Add, join).await?;
        let removed = self.run_step(Step::Remove, leave).await?;

        Ok(SwitchReport { added, removed })
    }

    async fn run_step(&self, step: Step, team_id: &str) -> Result<Outcome, SwitchError> {
        let method = match step {
            Step::Add => Method::POST,
            Step::Remove => Method::DELETE,
        };

        let (status, body) = self
            .api
            .call(method, &team_user_path(team_id, &self.user_id))
            .await?;

        let outcome = interpret(step, status, body)?;

        if outcome == Outcome::AlreadyInDesiredState {
            match step {
                Step::Add => info!(
                    "User already in team (team_id={} user_id={})",
                    team_id, self.user_id
                ),
                Step::Remove => info!(
                    "User not in team (team_id={} user_id={})",
                    team_id, self.user_id
                ),
            }
        }

        Ok(outcome)
    }
}
