// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jw run` - run jobs concurrently and report their output

use crate::output::{self, JobReport, OutputFormat};
use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use jw_core::{IdGen, Service, UuidIdGen, Worker, WorkerConfig, WorkerStatus};
use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args)]
pub struct RunArgs {
    /// Job to run: a command followed by its arguments, split on whitespace (repeatable)
    #[arg(long = "job", short = 'j', value_name = "COMMAND")]
    pub jobs: Vec<String>,

    /// Output format for the final report
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Keep log files instead of removing them after reporting
    #[arg(long)]
    pub keep_logs: bool,

    /// Status poll interval in milliseconds
    #[arg(long, default_value_t = 100)]
    pub poll_ms: u64,

    /// Directory for job logs (overrides JW_LOG_DIR)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// A single job given as separate arguments, after `--`
    #[arg(last = true, value_name = "CMD")]
    pub command: Vec<String>,
}

impl RunArgs {
    /// All jobs as (command, args) pairs, `--job` entries first
    pub fn job_list(&self) -> Result<Vec<(String, Vec<String>)>> {
        let mut jobs = Vec::new();
        for job in &self.jobs {
            let mut parts = job.split_whitespace().map(str::to_string);
            let command = parts
                .next()
                .ok_or_else(|| anyhow!("empty --job value"))?;
            jobs.push((command, parts.collect()));
        }
        if let Some((command, args)) = self.command.split_first() {
            jobs.push((command.clone(), args.to_vec()));
        }
        if jobs.is_empty() {
            bail!("no jobs given: pass --job \"<cmd> <args>\" or -- <cmd> <args>");
        }
        Ok(jobs)
    }
}

/// Returns whether every job finished successfully
pub async fn run(args: RunArgs) -> Result<bool> {
    let jobs = args.job_list()?;
    let config = args
        .log_dir
        .clone()
        .map_or_else(WorkerConfig::from_env, WorkerConfig::new);

    let workers = create_workers(jobs, &config, &UuidIdGen)?;
    let service = Service::new();
    for worker in &workers {
        service.add_worker(Arc::clone(worker));
    }
    let ids: Vec<String> = workers.iter().map(|w| w.id().to_string()).collect();

    let reports = run_jobs(&service, &ids, Duration::from_millis(args.poll_ms.max(1))).await;
    let cleanup = if args.keep_logs {
        Ok(())
    } else {
        remove_all_logs(&workers)
    };
    let reports = reports?;
    cleanup?;

    output::print_list(&reports, args.format);
    Ok(reports.iter().all(|r| r.status == WorkerStatus::Finished))
}

/// Build one worker per job; on failure, logs of the workers already built are removed
fn create_workers(
    jobs: Vec<(String, Vec<String>)>,
    config: &WorkerConfig,
    id_gen: &impl IdGen,
) -> Result<Vec<Arc<Worker>>> {
    let mut workers = Vec::with_capacity(jobs.len());
    for (command, job_args) in jobs {
        match Worker::with_config(&command, job_args, config, id_gen) {
            Ok(worker) => workers.push(Arc::new(worker)),
            Err(e) => {
                let _ = remove_all_logs(&workers);
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to create worker for {command}")));
            }
        }
    }
    Ok(workers)
}

/// Start every job, wait until all are terminal and collect their reports
async fn run_jobs(service: &Service, ids: &[String], poll: Duration) -> Result<Vec<JobReport>> {
    let mut tasks = Vec::with_capacity(ids.len());
    for id in ids {
        let worker = lookup(service, id)?;
        tasks.push(tokio::spawn(async move {
            let result = worker.start().await;
            (worker, result)
        }));
    }

    supervise(service, ids, poll).await?;

    for task in tasks {
        let (worker, result) = task.await.context("worker task panicked")?;
        if let Err(e) = result {
            tracing::warn!(worker_id = worker.id(), error = %e, "job did not finish");
        }
    }

    ids.iter()
        .map(|id| lookup(service, id).and_then(|worker| report(&worker)))
        .collect()
}

/// Remove every log, returning the first failure after trying all of them
fn remove_all_logs(workers: &[Arc<Worker>]) -> Result<()> {
    let mut first_error = None;
    for worker in workers {
        if let Err(e) = worker.remove_logs() {
            tracing::warn!(worker_id = worker.id(), error = %e, "failed to remove logs");
            first_error.get_or_insert_with(|| {
                anyhow::Error::new(e).context(format!("failed to remove logs for {}", worker.id()))
            });
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Poll until every job is terminal, stopping running jobs on Ctrl-C
async fn supervise(service: &Service, ids: &[String], poll: Duration) -> Result<()> {
    let mut last_seen: HashMap<&str, WorkerStatus> = HashMap::new();
    let mut interrupted = false;
    let mut signal_armed = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let mut all_terminal = true;
        for id in ids {
            let worker = lookup(service, id)?;
            let status = worker.status();
            if last_seen.insert(id.as_str(), status) != Some(status) {
                tracing::info!(worker_id = %id, %status, "job status");
            }
            if interrupted && status.is_running() {
                if let Err(e) = worker.stop() {
                    tracing::warn!(worker_id = %id, error = %e, "failed to stop job");
                }
            }
            all_terminal &= status.is_terminal();
        }
        if all_terminal {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::time::sleep(poll) => {}
            signal = &mut ctrl_c, if signal_armed => {
                signal_armed = false;
                match signal {
                    Ok(()) => {
                        tracing::warn!("interrupted, stopping running jobs");
                        interrupted = true;
                    }
                    Err(e) => tracing::warn!(error = %e, "cannot listen for Ctrl-C"),
                }
            }
        }
    }
}

fn lookup(service: &Service, id: &str) -> Result<Arc<Worker>> {
    service
        .get_worker(id)
        .ok_or_else(|| anyhow!("worker {id} missing from registry"))
}

fn report(worker: &Worker) -> Result<JobReport> {
    let mut raw = Vec::new();
    worker
        .read_logs()
        .with_context(|| format!("failed to open logs for {}", worker.id()))?
        .read_to_end(&mut raw)
        .with_context(|| format!("failed to read logs for {}", worker.id()))?;

    Ok(JobReport {
        id: worker.id().to_string(),
        command: worker.command().to_string(),
        args: worker.args().to_vec(),
        status: worker.status(),
        exit_code: worker.exit_code(),
        output: String::from_utf8_lossy(&raw).into_owned(),
    })
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
