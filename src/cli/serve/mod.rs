//! Asset server.
//!
//! Binds the HTTP server, then hands each request to a worker thread.
//! Transcoding is CPU-bound and blocks its worker, so the pool size bounds
//! how many images are encoded at once.

mod lifecycle;
mod response;

use crate::{
    app::App,
    config::{AppConfig, reload_config},
    debug, log,
    media::AssetResolver,
    settings::LiveSettings,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Bind and run the server until Ctrl+C.
pub fn serve(config: &AppConfig, resolver: Arc<dyn AssetResolver>) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server_for_shutdown(Arc::clone(&server));

    // Without an explicit base URL, generated URLs follow the port actually bound
    let base_url = match &config.serve.base_url {
        Some(_) => config.base_url(),
        None => format!("http://{addr}"),
    };
    let app = Arc::new(App::new(config, resolver, Arc::new(LiveSettings), &base_url));

    log!("serve"; "http://{}", addr);
    debug!("serve"; "generated URLs use {}", base_url);

    run_request_loop(&server, app, config.serve.workers)
}

fn run_request_loop(server: &Server, app: Arc<App>, workers: usize) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("fastimg-worker-{i}"))
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let app = Arc::clone(&app);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &app) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, app: &App) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    // Pick up edits to `[settings]` and `[cache]` before serving
    match reload_config() {
        Ok(true) => log!("serve"; "config reloaded"),
        Ok(false) => {}
        Err(e) => log!("error"; "config reload failed, keeping previous: {e:#}"),
    }

    let url = request.url().to_string();
    let response = app.handle(&url);
    debug!("route"; "{} {} -> {}", request.method(), url, response.status);

    response::respond(request, response)
}
