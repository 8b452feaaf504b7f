use dataplan::config;
use dataplan::gui::app::AppModel;
use dataplan::gui::selector::State;
use dataplan::sys::runtime;
use dial::plan::PlanConfig;
use relm4::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load_or_default();
    let state = match State::new(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid plan in config, using defaults: {}", e);
            State::new(&PlanConfig::default())?
        }
    };

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(tx);

    let app = RelmApp::new("org.dataplan.Dataplan");
    app.run::<AppModel>((state, rx));
    Ok(())
}
