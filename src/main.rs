#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    // Set up logging; RUST_LOG=debug shows editor and store activity
    env_logger::init();

    let config = play_designer::AppConfig::load();
    log::info!(
        "starting with {:?} field, playbook {:?}",
        config.orientation,
        config.playbook_id
    );

    // Background saves, advisor requests and file dialogs run on this runtime
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    play_designer::run_app(config).map_err(|e| anyhow::anyhow!("failed to run app: {e}"))
}

// The web build starts from the library's wasm entry point.
#[cfg(target_arch = "wasm32")]
fn main() {}
