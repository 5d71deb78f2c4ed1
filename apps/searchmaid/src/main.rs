use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    FetchOutcome, HttpListingTransport, PagerDirection, PendingRequest, ResultListController,
};
use shared::domain::FilterKey;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

mod commands;
mod config;
mod terminal;

use commands::{Command, HELP};
use config::load_settings;
use terminal::{card_position, TerminalView};

#[derive(Parser, Debug)]
#[command(name = "searchmaid", about = "Search the maid listing from a terminal")]
struct Args {
    #[arg(long, default_value = "searchmaid.toml")]
    config: PathBuf,
    #[arg(long)]
    listing_url: Option<String>,
    /// Query string of the listing page, e.g. "nationality=PH&sort_by=price".
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long)]
    viewport_width: Option<f64>,
    /// Render the first page and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(listing_url) = args.listing_url {
        settings.listing_url = listing_url;
    }
    if let Some(viewport_width) = args.viewport_width {
        settings.viewport_width = viewport_width;
    }

    let filter =
        EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let listing_url = Url::parse(&settings.listing_url)
        .with_context(|| format!("invalid listing url '{}'", settings.listing_url))?;
    let transport =
        HttpListingTransport::with_timeout(settings.request_timeout_secs.map(Duration::from_secs))
            .context("failed to build http client")?;
    let view = Arc::new(TerminalView::new(&listing_url));
    let controller = Arc::new(ResultListController::new_with_transport(
        listing_url.as_str(),
        Arc::new(transport),
        view.clone(),
    )?);
    info!(listing_url = %listing_url, "searchmaid: starting");

    let outcome = controller.initialize(&args.query).await;
    report(&view, outcome);
    if args.once {
        return Ok(());
    }

    println!("type 'help' for commands");
    let mut pending: Vec<JoinHandle<()>> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        pending.retain(|handle| !handle.is_finished());

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        debug!(command = command.name(), "searchmaid: command received");

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::ShowFilters => {
                let filters = controller.filters().await;
                for key in FilterKey::ALL {
                    println!("{key} = {:?}", filters.get(key));
                }
            }
            Command::SetFilter { key, value } => {
                // The change and the request's place in line are fixed now,
                // the fetch itself runs in the background.
                controller.apply_filter_change(key, &value).await;
                let request = controller.begin_search().await;
                pending.push(spawn_request(&controller, &view, request));
            }
            Command::Reset => {
                controller.apply_reset().await;
                let request = controller.begin_search().await;
                pending.push(spawn_request(&controller, &view, request));
            }
            Command::Refresh => {
                let request = controller.begin_search().await;
                pending.push(spawn_request(&controller, &view, request));
            }
            Command::Next => {
                let request = controller.begin_pager(PagerDirection::Next).await;
                dispatch(&controller, &view, &mut pending, request);
            }
            Command::Previous => {
                let request = controller.begin_pager(PagerDirection::Previous).await;
                dispatch(&controller, &view, &mut pending, request);
            }
            Command::Page { label } => {
                let request = controller.begin_page_link(&label).await;
                dispatch(&controller, &view, &mut pending, request);
            }
            Command::Hover { index } => {
                let position = card_position(index, settings.viewport_width);
                if controller
                    .hover_card(index, position, settings.viewport_width)
                    .await
                    .is_none()
                {
                    println!("no card #{index} on this page");
                }
            }
            Command::Unhover { index } => controller.unhover_card(index).await,
        }
    }

    drain(pending).await;
    Ok(())
}

/// Waits for every in-flight request task and returns how many of them failed.
async fn drain(pending: Vec<JoinHandle<()>>) -> usize {
    let mut failed = 0;
    for handle in pending {
        if let Err(err) = handle.await {
            warn!("searchmaid: request task failed: {err}");
            failed += 1;
        }
    }
    failed
}

fn dispatch(
    controller: &Arc<ResultListController>,
    view: &Arc<TerminalView>,
    pending: &mut Vec<JoinHandle<()>>,
    request: Option<PendingRequest>,
) {
    match request {
        Some(request) => pending.push(spawn_request(controller, view, request)),
        None => report(view, FetchOutcome::NoTarget),
    }
}

fn spawn_request(
    controller: &Arc<ResultListController>,
    view: &Arc<TerminalView>,
    request: PendingRequest,
) -> JoinHandle<()> {
    debug!(seq = request.seq(), url = %request.url(), "searchmaid: request queued");
    let controller = Arc::clone(controller);
    let view = Arc::clone(view);
    tokio::spawn(async move {
        let outcome = controller.complete(request).await;
        report(&view, outcome);
    })
}

fn report(view: &TerminalView, outcome: FetchOutcome) {
    match outcome {
        FetchOutcome::Rendered { .. } => {
            if let Some(strip) = view.page_strip_line() {
                println!("pages: {strip}");
            }
        }
        FetchOutcome::Empty | FetchOutcome::Stale => {}
        FetchOutcome::Failed => println!("request failed; see log output"),
        FetchOutcome::NoTarget => println!("nothing to follow"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drain_reports_panicked_request_tasks() {
        let pending = vec![
            tokio::spawn(async {}),
            tokio::spawn(async { panic!("render blew up") }),
            tokio::spawn(async {}),
        ];
        assert_eq!(drain(pending).await, 1);
    }
}
