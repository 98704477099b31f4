use codelens::app::App;
use codelens::config::Config;
use codelens::logging;
use color_eyre::eyre::eyre;
use directories::ProjectDirs;
use ratatui::crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use ratatui::crossterm::execute;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "codelens", "codelens")
}

fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = project_dirs() {
        proj_dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config/default.toml")
    }
}

fn get_log_dir() -> PathBuf {
    if let Some(proj_dirs) = project_dirs() {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".")
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let mut config = Config::load_or_default(&get_config_path());
    config.apply_env_overrides();
    logging::init(&get_log_dir(), &config.logging.level).map_err(|e| eyre!("{e:#}"))?;

    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let mut terminal = ratatui::init();
    execute!(io::stdout(), EnableMouseCapture, EnableBracketedPaste)?;

    let result = run(&mut terminal, config);

    let _ = execute!(io::stdout(), DisableBracketedPaste, DisableMouseCapture);
    ratatui::restore();

    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, config: Config) -> color_eyre::Result<()> {
    let mut app = App::new(config);
    app.init();

    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            match app.handle_event(event) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => tracing::warn!("Event handling failed: {e}"),
            }
        }

        app.process_async_events();

        if app.should_quit {
            break;
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}
