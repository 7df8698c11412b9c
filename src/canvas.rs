use iced::alignment::{Horizontal, Vertical};
use iced::mouse;
use iced::widget::canvas::{self, Cache, Frame, Geometry, Path, Text};
use iced::{Color, Point, Rectangle, Size};
use log::debug;

use crate::config::Config;
use crate::geometry;
use crate::graph::{ClickOutcome, GraphHandler, HitResult, Interaction};
use crate::prompt::PromptInput;
use crate::surface::{self, palette, Anchor, Primitive, RenderSurface};

/// Pointer travel below which a press and release still count as a click.
const CLICK_SLOP: f32 = 3.0;

#[derive(Debug, Clone)]
pub enum EditorMessage {
    Pressed(Point),
    Moved(Point),
    Released { position: Point, click: bool },
    AddEntity,
    AddEdge,
    Deselect,
    PromptInput { text: String },
    PromptBackspace,
    PromptToggleIdentifier,
    PromptCommit,
    PromptCancel,
}

pub struct Editor {
    pub graph: GraphHandler,
    pub prompt: Option<PromptInput>,
    cache: Cache,
}

impl Editor {
    pub fn new(graph: GraphHandler) -> Self {
        Self {
            graph,
            prompt: None,
            cache: Cache::new(),
        }
    }

    pub fn update(&mut self, message: EditorMessage, config: &Config) {
        match message {
            EditorMessage::Pressed(position) => {
                self.graph.pointer_pressed(position);
            }
            EditorMessage::Moved(position) => {
                if !self.graph.pointer_moved(position) {
                    return;
                }
            }
            EditorMessage::Released { position, click } => {
                self.graph.pointer_released();
                if click {
                    if let ClickOutcome::RequestAttribute(entity) = self.graph.click(position) {
                        self.prompt = Some(PromptInput::new(entity, self.graph.layout()));
                    }
                }
            }
            EditorMessage::AddEntity => {
                self.graph
                    .add_next_entity(Size::new(config.entity_width, config.entity_height));
            }
            EditorMessage::AddEdge => {
                self.graph.add_next_edge();
            }
            EditorMessage::Deselect => self.graph.deselect(),
            EditorMessage::PromptInput { text } => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.push_str(&text);
                }
            }
            EditorMessage::PromptBackspace => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.backspace();
                }
            }
            EditorMessage::PromptToggleIdentifier => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.toggle_identifier();
                }
            }
            EditorMessage::PromptCommit => {
                if let Some(mut input) = self.prompt.take() {
                    if self.graph.prompt_attribute(input.entity, &mut input).is_none() {
                        debug!("attribute prompt submitted without a name");
                    }
                }
            }
            EditorMessage::PromptCancel => self.prompt = None,
        }
        self.cache.clear();
    }
}

/// Tracks the press that may turn into a click.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    pressed_at: Option<Point>,
    dragged: bool,
}

struct FrameSurface<'a> {
    frame: &'a mut Frame,
}

impl RenderSurface for FrameSurface<'_> {
    fn paint(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Rect { bounds, fill, stroke } => {
                self.frame.fill_rectangle(bounds.position(), bounds.size(), *fill);
                if let Some(stroke) = stroke {
                    let path = Path::rectangle(bounds.position(), bounds.size());
                    self.frame.stroke(&path, outline(stroke));
                }
            }
            Primitive::Text {
                content,
                position,
                size,
                color,
                anchor,
            } => {
                // iced has no baseline anchor, bottom alignment is the closest
                self.frame.fill_text(Text {
                    content: content.clone(),
                    position: *position,
                    color: *color,
                    size: iced::Pixels(*size),
                    align_x: horizontal(*anchor).into(),
                    align_y: Vertical::Bottom,
                    ..Text::default()
                });
            }
            Primitive::Line { from, to, stroke } => {
                self.frame.stroke(&Path::line(*from, *to), outline(stroke));
            }
            Primitive::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let circle = Path::circle(*center, *radius);
                self.frame.fill(&circle, *fill);
                if let Some(stroke) = stroke {
                    self.frame.stroke(&circle, outline(stroke));
                }
            }
        }
    }
}

fn horizontal(anchor: Anchor) -> Horizontal {
    match anchor {
        Anchor::Start => Horizontal::Left,
        Anchor::Middle => Horizontal::Center,
    }
}

fn outline(stroke: &surface::Stroke) -> canvas::Stroke<'static> {
    canvas::Stroke::default()
        .with_color(stroke.color)
        .with_width(stroke.width)
}

impl canvas::Program<EditorMessage> for Editor {
    type State = PointerState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let content = self.cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, bounds.size(), palette::CANVAS);
            surface::paint_scene(&self.graph, &mut FrameSurface { frame: &mut *frame });
            draw_hint(frame, bounds.size());
        });

        let overlay = match &self.prompt {
            Some(prompt) => {
                let mut frame = Frame::new(renderer, bounds.size());
                draw_prompt_overlay(&mut frame, bounds.size(), prompt);
                frame.into_geometry()
            }
            None => Frame::new(renderer, bounds.size()).into_geometry(),
        };

        vec![content, overlay]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<EditorMessage>> {
        if let iced::Event::Keyboard(iced::keyboard::Event::KeyPressed { key, modifiers, text, .. }) = event {
            use iced::keyboard::key::Named;
            use iced::keyboard::Key;

            let message = if self.prompt.is_some() {
                match key.as_ref() {
                    Key::Named(Named::Escape) => Some(EditorMessage::PromptCancel),
                    Key::Named(Named::Backspace) => Some(EditorMessage::PromptBackspace),
                    Key::Named(Named::Enter) => Some(EditorMessage::PromptCommit),
                    Key::Named(Named::Tab) => Some(EditorMessage::PromptToggleIdentifier),
                    _ => text
                        .as_ref()
                        .filter(|txt| !txt.is_empty() && !modifiers.control() && !modifiers.alt())
                        .map(|txt| EditorMessage::PromptInput { text: txt.to_string() }),
                }
            } else {
                match key.as_ref() {
                    Key::Character("e") | Key::Character("E") if !modifiers.control() => {
                        Some(EditorMessage::AddEntity)
                    }
                    Key::Character("l") | Key::Character("L") if !modifiers.control() => {
                        Some(EditorMessage::AddEdge)
                    }
                    Key::Named(Named::Escape) => Some(EditorMessage::Deselect),
                    _ => None,
                }
            };
            return message.map(canvas::Action::publish);
        }

        // The prompt is modal
        if self.prompt.is_some() {
            return None;
        }

        let iced::Event::Mouse(mouse_event) = event else {
            return None;
        };

        match mouse_event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let position = cursor.position_in(bounds)?;
                *state = PointerState {
                    pressed_at: Some(position),
                    dragged: false,
                };
                Some(canvas::Action::publish(EditorMessage::Pressed(position)))
            }
            mouse::Event::CursorMoved { .. } => {
                let pressed_at = state.pressed_at?;
                let position = cursor.position_in(bounds)?;
                if geometry::distance(position, pressed_at) > CLICK_SLOP {
                    state.dragged = true;
                }
                Some(canvas::Action::publish(EditorMessage::Moved(position)))
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) => {
                let released = std::mem::take(state);
                released.pressed_at?;
                let (position, click) = match cursor.position_in(bounds) {
                    Some(position) => (position, !released.dragged),
                    None => (Point::ORIGIN, false),
                };
                Some(canvas::Action::publish(EditorMessage::Released { position, click }))
            }
            _ => None,
        }
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        let Some(position) = cursor.position_in(bounds) else {
            return mouse::Interaction::default();
        };
        match self.graph.interaction() {
            Interaction::DraggingEntity { .. } | Interaction::DraggingEdge { .. } => mouse::Interaction::Grabbing,
            Interaction::Resizing { .. } | Interaction::DraggingHandle { .. } => mouse::Interaction::Crosshair,
            Interaction::Idle => match self.graph.hit_test(position) {
                HitResult::Entity(_) => mouse::Interaction::Grab,
                HitResult::ResizeHandle(_) | HitResult::Handle { .. } => mouse::Interaction::Crosshair,
                HitResult::AddButton(_) | HitResult::Edge(_) => mouse::Interaction::Pointer,
                HitResult::None => mouse::Interaction::default(),
            },
        }
    }
}

fn draw_hint(frame: &mut Frame, size: Size) {
    frame.fill_text(Text {
        content: "E  add entity   •   L  add edge   •   Esc  deselect".to_string(),
        position: Point::new(12.0, size.height - 24.0),
        color: Color::from_rgba(0.0, 0.0, 0.0, 0.45),
        size: iced::Pixels(11.0),
        ..Text::default()
    });
}

fn draw_prompt_overlay(frame: &mut Frame, size: Size, prompt: &PromptInput) {
    let bar_width = 320.0;
    let bar_height = if prompt.asks_identifier { 64.0 } else { 40.0 };
    let bar_x = (size.width - bar_width) / 2.0;
    let bar_y = 20.0;

    frame.fill_rectangle(Point::ORIGIN, size, Color::from_rgba(0.0, 0.0, 0.0, 0.2));
    frame.fill_rectangle(
        Point::new(bar_x, bar_y),
        Size::new(bar_width, bar_height),
        Color::WHITE,
    );
    frame.stroke(
        &Path::rectangle(Point::new(bar_x, bar_y), Size::new(bar_width, bar_height)),
        canvas::Stroke::default()
            .with_color(palette::OUTLINE)
            .with_width(1.5),
    );

    let (content, color) = if prompt.text.is_empty() {
        ("Enter attribute name...".to_string(), Color::from_rgb(0.55, 0.55, 0.60))
    } else {
        (format!("{}|", prompt.text), palette::TEXT)
    };
    frame.fill_text(Text {
        content,
        position: Point::new(bar_x + 14.0, bar_y + 12.0),
        color,
        size: iced::Pixels(13.0),
        ..Text::default()
    });

    if prompt.asks_identifier {
        let mark = if prompt.is_identifier { "x" } else { " " };
        frame.fill_text(Text {
            content: format!("[{mark}] identifier (Tab)"),
            position: Point::new(bar_x + 14.0, bar_y + 38.0),
            color: palette::TEXT,
            size: iced::Pixels(12.0),
            ..Text::default()
        });
    }

    frame.fill_text(Text {
        content: "Enter to add • Esc to cancel".to_string(),
        position: Point::new(bar_x + (bar_width - 160.0) / 2.0, bar_y + bar_height + 8.0),
        color: Color::from_rgba(0.0, 0.0, 0.0, 0.5),
        size: iced::Pixels(10.0),
        ..Text::default()
    });
}
