use fastdraw::{app, FastDrawConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = FastDrawConfig::from_args_or_env(std::env::args().skip(1))?;
    log::info!(
        "{} nodes, zoom policy {:?}",
        config.scene.node_count,
        config.zoom.policy()
    );
    app::run_app(config)
}
