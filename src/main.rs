use scene_change::{AppConfig, demo, run};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::new().title("Scene Change");

    run(config, |scenes| {
        demo::register(scenes);
        scenes.change_scene(demo::SQUARES, 0.0)
    })?;

    Ok(())
}
