use iced::{Color, Point, Rectangle, Size};

use crate::edge::Edge;
use crate::entity::{Entity, RESIZE_HANDLE_SIZE, ROW_HEIGHT};
use crate::graph::{GraphHandler, HANDLE_RADIUS};

pub mod palette {
    use iced::Color;

    pub const CANVAS: Color = Color::WHITE;
    pub const ENTITY: Color = Color::from_rgb(0.678, 0.847, 0.902);
    pub const ENTITY_SELECTED: Color = Color::from_rgb(1.0, 1.0, 0.0);
    pub const ATTRIBUTE_ROW: Color = Color::from_rgb(0.565, 0.933, 0.565);
    pub const HANDLE: Color = Color::from_rgb(1.0, 0.0, 0.0);
    pub const OUTLINE: Color = Color::BLACK;
    pub const TEXT: Color = Color::BLACK;
    pub const EDGE: Color = Color::BLACK;
    pub const EDGE_SELECTED: Color = Color::from_rgb(1.0, 1.0, 0.0);
    pub const BUTTON: Color = Color::from_rgb(0.94, 0.94, 0.94);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub const OUTLINE: Stroke = Stroke {
        color: palette::OUTLINE,
        width: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
}

/// One visual element, in canvas coordinates. Text positions are baselines.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        bounds: Rectangle,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Text {
        content: String,
        position: Point,
        size: f32,
        color: Color,
        anchor: Anchor,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
    },
}

/// Whatever paints primitives: the iced canvas in the app, a recorder in tests.
pub trait RenderSurface {
    fn paint(&mut self, primitive: &Primitive);
}

impl RenderSurface for Vec<Primitive> {
    fn paint(&mut self, primitive: &Primitive) {
        self.push(primitive.clone());
    }
}

pub fn paint_scene(graph: &GraphHandler, surface: &mut impl RenderSurface) {
    for entity in graph.entities() {
        for primitive in entity_primitives(entity) {
            surface.paint(&primitive);
        }
    }
    for edge in graph.edges() {
        for primitive in edge_primitives(edge) {
            surface.paint(&primitive);
        }
    }
}

pub fn entity_primitives(entity: &Entity) -> Vec<Primitive> {
    let Rectangle { x, y, width, .. } = entity.geometry;
    let mut out = vec![Primitive::Rect {
        bounds: entity.geometry,
        fill: if entity.selected { palette::ENTITY_SELECTED } else { palette::ENTITY },
        stroke: Some(Stroke::OUTLINE),
    }];

    let label = entity.label_offset();
    out.push(Primitive::Text {
        content: entity.label().to_string(),
        position: Point::new(x + label.x, y + label.y),
        size: 14.0,
        color: palette::TEXT,
        anchor: Anchor::Middle,
    });

    for (offset, attribute) in entity.rows() {
        out.push(Primitive::Rect {
            bounds: Rectangle::new(Point::new(x, y + offset), Size::new(width, ROW_HEIGHT)),
            fill: palette::ATTRIBUTE_ROW,
            stroke: Some(Stroke::OUTLINE),
        });
        out.push(Primitive::Text {
            content: attribute.name.clone(),
            position: Point::new(x + 5.0, y + offset + 20.0),
            size: 12.0,
            color: palette::TEXT,
            anchor: Anchor::Start,
        });
    }

    if entity.selected {
        let handle = entity.resize_handle_offset();
        out.push(Primitive::Rect {
            bounds: Rectangle::new(
                Point::new(x + handle.x, y + handle.y),
                Size::new(RESIZE_HANDLE_SIZE, RESIZE_HANDLE_SIZE),
            ),
            fill: palette::HANDLE,
            stroke: None,
        });

        let button = entity.add_button_bounds();
        out.push(Primitive::Rect {
            bounds: button,
            fill: palette::BUTTON,
            stroke: Some(Stroke::OUTLINE),
        });
        out.push(Primitive::Text {
            content: "+".to_string(),
            position: Point::new(button.x + button.width / 2.0, button.y + button.height - 5.0),
            size: 14.0,
            color: palette::TEXT,
            anchor: Anchor::Middle,
        });
    }

    out
}

pub fn edge_primitives(edge: &Edge) -> Vec<Primitive> {
    let stroke = if edge.selected {
        Stroke {
            color: palette::EDGE_SELECTED,
            width: 2.0,
        }
    } else {
        Stroke {
            color: palette::EDGE,
            width: 1.0,
        }
    };

    let handle = |center| Primitive::Circle {
        center,
        radius: HANDLE_RADIUS,
        fill: palette::HANDLE,
        stroke: Some(Stroke::OUTLINE),
    };

    vec![
        Primitive::Line {
            from: edge.start(),
            to: edge.end(),
            stroke,
        },
        handle(edge.start()),
        handle(edge.end()),
    ]
}
