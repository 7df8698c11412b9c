use iced::widget::canvas;
use iced::{Element, Length, Point, Rectangle, Size, Task, Theme};
use log::{info, warn};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use schemer::canvas::{Editor, EditorMessage};
use schemer::config::{Config, ConfigError, LogLevel};
use schemer::graph::GraphHandler;

fn main() -> iced::Result {
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(config.log_level);

    match load_error {
        Some(e) => warn!("using default settings: {e}"),
        None => write_defaults_on_first_run(&config),
    }

    iced::application(move || init(config.clone()), update, view)
        .title("Schemer")
        .theme(theme)
        .antialiasing(true)
        .run()
}

fn init_logging(level: LogLevel) {
    if let Err(e) = TermLogger::init(
        level.filter(),
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logger already initialised: {e}");
    }
}

fn write_defaults_on_first_run(config: &Config) {
    let exists = Config::config_path().map(|path| path.exists());
    if let Ok(false) = exists {
        match config.save() {
            Ok(()) => info!("wrote default settings"),
            Err(e) => warn!("could not write default settings: {e}"),
        }
    } else if let Err(ConfigError::NoConfigDir) = exists {
        warn!("no config directory; settings will not be saved");
    }
}

fn theme(_state: &Schemer) -> Theme {
    Theme::Light
}

fn init(config: Config) -> (Schemer, Task<Message>) {
    let mut graph = GraphHandler::new(config.attribute_layout);
    graph.add_entity("Entity1", Rectangle::new(Point::new(400.0, 30.0), Size::new(50.0, 50.0)));
    graph.add_entity("Entity2", Rectangle::new(Point::new(250.0, 30.0), Size::new(50.0, 50.0)));

    let editor = Editor::new(graph);
    (Schemer { editor, config }, Task::none())
}

#[derive(Debug, Clone)]
pub enum Message {
    Editor(EditorMessage),
}

struct Schemer {
    editor: Editor,
    config: Config,
}

fn update(state: &mut Schemer, message: Message) -> Task<Message> {
    match message {
        Message::Editor(msg) => {
            state.editor.update(msg, &state.config);
        }
    }
    Task::none()
}

fn view(state: &Schemer) -> Element<'_, Message> {
    Element::from(
        canvas(&state.editor)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .map(Message::Editor)
}
