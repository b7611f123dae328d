use std::fs;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use jobtrail_core::{is_job_page, JobPatch, JobState, TabId};
use jobtrail_engine::{
    FileHost, JobExtractor, LocalExtractionHost, NavigationEvent, Orchestrator,
    OrchestratorSettings, Request, Response, StaticDocument,
};
use trail_logging::{trail_info, trail_warn};

use super::config::AppConfig;
use super::panel::LoggingPanel;
use crate::cli::{Cli, Command};

pub fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.config)?;
    trail_logging::initialize(config.log.destination(), config.log.level()?);
    trail_info!("Using data directory {:?}", config.data_dir);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(execute(cli.command, config))
}

struct Session {
    orchestrator: Orchestrator,
    pages: Arc<LocalExtractionHost>,
}

impl Session {
    fn open(config: &AppConfig, recent_limit: Option<usize>) -> Result<Self> {
        let kv = FileHost::open(&config.data_dir)
            .with_context(|| format!("opening data directory {:?}", config.data_dir))?;
        let extractor = JobExtractor::new(config.extraction(), &config.layout)?;
        let pages = Arc::new(LocalExtractionHost::new(extractor));
        let settings = OrchestratorSettings {
            recent_limit: recent_limit.unwrap_or(config.recent_limit),
            tab_limit: config.tab_limit,
            ..OrchestratorSettings::default()
        };
        let orchestrator = Orchestrator::new(
            Arc::new(kv),
            pages.clone(),
            Arc::new(LoggingPanel),
            settings,
        );
        Ok(Self {
            orchestrator,
            pages,
        })
    }

    async fn request(&self, request: Request, sender: Option<TabId>) -> Result<Response> {
        let response = self.orchestrator.handle_request(request, sender).await;
        println!("{}", response.to_json());
        if let Response::Failure { error, .. } = &response {
            bail!("request failed: {error}");
        }
        Ok(response)
    }
}

async fn execute(command: Command, config: AppConfig) -> Result<()> {
    match command {
        Command::Scrape {
            url,
            html,
            tab,
            save,
        } => {
            let markup =
                fs::read_to_string(&html).with_context(|| format!("reading {html:?}"))?;
            if !is_job_page(&url) {
                trail_warn!("{} is not a recognised job page", url);
            }
            let session = Session::open(&config, None)?;
            session
                .pages
                .attach(tab, Arc::new(StaticDocument::new(url.clone(), markup)));
            for status in ["loading", "complete"] {
                session
                    .orchestrator
                    .handle_navigation(NavigationEvent::new(tab, status, &url))
                    .await;
            }
            let current = session.orchestrator.current_job(Some(tab));
            println!("{}", Response::CurrentJob(current.clone()).to_json());

            if save {
                let Some(job) = current
                    .data
                    .as_ref()
                    .and_then(|data| data.to_record(JobState::Bookmark, None))
                else {
                    bail!("no job id could be derived from {url}");
                };
                session
                    .request(
                        Request::SaveJob {
                            job_id: job.id.clone(),
                            job,
                        },
                        Some(tab),
                    )
                    .await?;
            }
        }
        Command::List { limit } => {
            Session::open(&config, limit)?
                .request(Request::ListRecentJobs, None)
                .await?;
        }
        Command::Update { id, state } => {
            let Some(state) = JobState::parse(&state) else {
                bail!("unknown job state {state:?}");
            };
            Session::open(&config, None)?
                .request(
                    Request::UpdateJob {
                        job_id: id,
                        updated_job: JobPatch::state(state),
                    },
                    None,
                )
                .await?;
        }
        Command::Delete { id } => {
            Session::open(&config, None)?
                .request(Request::DeleteJob { job_id: id }, None)
                .await?;
        }
        Command::Clear => {
            let session = Session::open(&config, None)?;
            session.orchestrator.store().clear().await?;
            trail_info!("Cleared all saved jobs");
        }
        Command::Message { json, tab } => {
            let session = Session::open(&config, None)?;
            println!("{}", session.orchestrator.handle_json(&json, tab).await);
        }
    }
    Ok(())
}
