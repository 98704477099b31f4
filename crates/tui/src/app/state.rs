use super::*;

pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub ui: UiState,
    pub layout: LayoutState,
    pub keybinds: Keybinds,
    pub client: Option<AnalysisClient>,
    pub file_picker: Option<InputState>,
    pub show_error_details: bool,
    pub app_async_tx: Option<mpsc::UnboundedSender<AppAsyncEvent>>,
    pub app_async_rx: Option<mpsc::UnboundedReceiver<AppAsyncEvent>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl App {
    pub fn new(config: Config) -> Self {
        let (app_async_tx, app_async_rx) = mpsc::unbounded_channel();
        let ui = UiState::new(config.analyze.chunk_limit);

        let mut app = Self {
            should_quit: false,
            config,
            ui,
            layout: LayoutState::default(),
            keybinds: Keybinds,
            client: None,
            file_picker: None,
            show_error_details: false,
            app_async_tx: Some(app_async_tx),
            app_async_rx: Some(app_async_rx),
        };

        match AnalysisClient::new(&app.config.client_options()) {
            Ok(client) => app.client = Some(client),
            Err(e) => app.report_error("Service client unavailable", e),
        }

        app
    }
}
