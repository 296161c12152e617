use std::sync::Arc;

use donotcommit::config::{AppState, Config};
use donotcommit::logger;
use donotcommit::server;
use donotcommit::templates::TemplateIndex;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Fatal: without a corpus there is nothing to serve
    let index = TemplateIndex::build(&cfg.templates.root_dir)?;
    logger::log_index_duplicates(&index);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, index))
}

async fn async_main(cfg: Config, index: TemplateIndex) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&addr, &cfg, &index);

    let state = Arc::new(AppState::new(cfg, index));
    server::run_server(listener, state, server::shutdown_signal()).await;

    Ok(())
}
