//! The setup workflow: stages run strictly in order and the first fatal
//! failure ends the run with [`AppError::SetupFailed`].

use crate::ports::{Host, RuntimeVersions};
use crate::stage::{Outcome, Stage, StageReport};
use botprov_core::record::SourceAction;
use botprov_core::{AppError, SetupConfig};
use botprov_ui::progress::{self, ProgressTx};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

/// Stages run by `botprov clean`.
pub const CLEAN_STAGES: [Stage; 2] = [Stage::RootCheck, Stage::Cleanup];

pub struct Workflow<'a> {
    pub(crate) cfg: &'a SetupConfig,
    pub(crate) host: &'a Host,
    pub(crate) tx: ProgressTx,
    pub(crate) state: RunState,
}

/// Facts gathered by earlier stages for later ones.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    pub(crate) versions: Option<RuntimeVersions>,
    pub(crate) source: Option<SourceAction>,
    pub(crate) login_exit_code: Option<i32>,
    pub(crate) record_path: Option<PathBuf>,
}

/// What a completed run did.
#[derive(Debug)]
pub struct SetupReport {
    pub stages: Vec<StageReport>,
    pub source: Option<SourceAction>,
    pub record_path: Option<PathBuf>,
}

impl SetupReport {
    pub fn outcome(&self, stage: Stage) -> Option<&Outcome> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.outcome)
    }
}

impl<'a> Workflow<'a> {
    pub fn new(cfg: &'a SetupConfig, host: &'a Host) -> Self {
        Self {
            cfg,
            host,
            tx: None,
            state: RunState::default(),
        }
    }

    /// Mirror every progress line into `tx`.
    pub fn with_progress(mut self, tx: UnboundedSender<String>) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Full setup: all nine stages.
    pub async fn run(self) -> Result<SetupReport, AppError> {
        self.run_stages(&Stage::ALL).await
    }

    /// Privilege check and cleanup only.
    pub async fn run_clean(self) -> Result<SetupReport, AppError> {
        self.run_stages(&CLEAN_STAGES).await
    }

    async fn run_stages(mut self, stages: &[Stage]) -> Result<SetupReport, AppError> {
        let mut reports = Vec::with_capacity(stages.len());

        for &stage in stages {
            progress::emit(&self.tx, &stage.header());

            let result = self.execute(stage).await;
            let message = result.as_ref().err().map(ToString::to_string);
            let outcome = match stage.tier().settle(&self.tx, stage.title(), result) {
                Ok(Some(outcome)) => outcome,
                Ok(None) => Outcome::Tolerated(message.unwrap_or_default()),
                Err(e) => {
                    return Err(AppError::SetupFailed {
                        step: stage.number(),
                        name: stage.title().to_string(),
                        message: e.to_string(),
                    })
                }
            };
            reports.push(StageReport { stage, outcome });
        }

        Ok(SetupReport {
            stages: reports,
            source: self.state.source,
            record_path: self.state.record_path,
        })
    }

    async fn execute(&mut self, stage: Stage) -> Result<Outcome, AppError> {
        match stage {
            Stage::RootCheck => self.root_check(),
            Stage::Cleanup => self.cleanup().await,
            Stage::Dependencies => self.install_dependencies().await,
            Stage::Runtime => self.install_runtime().await,
            Stage::Application => self.setup_application().await,
            Stage::FirstRunLogin => self.first_run_login().await,
            Stage::Supervisor => self.register_service().await,
            Stage::LogRotation => self.configure_log_rotation().await,
            Stage::Summary => {
                let lines = botprov_ui::report::completion_lines(
                    self.cfg,
                    self.state.record_path.as_deref(),
                );
                for line in lines {
                    progress::emit(&self.tx, &line);
                }
                Ok(Outcome::Done)
            }
        }
    }
}
