use iced::{Point, Rectangle, Size};
use serde::{Deserialize, Serialize};

use crate::geometry;

/// Height of one attribute row band.
pub const ROW_HEIGHT: f32 = 30.0;
/// Width and height must stay strictly above this.
pub const MIN_SIZE: f32 = 10.0;
/// Side length used when a requested size is at or below [`MIN_SIZE`].
pub const DEFAULT_SIZE: f32 = 50.0;
pub const RESIZE_HANDLE_SIZE: f32 = 10.0;
pub const ADD_BUTTON_SIZE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub is_identifier: bool,
}

/// How new attribute rows are placed in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeLayout {
    /// Rows appear in insertion order.
    #[default]
    Ordered,
    /// Identifier rows are clustered at the top, each new one placed right
    /// after the last existing identifier.
    IdentifiersFirst,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub geometry: Rectangle,
    pub selected: bool,
    label: String,
    attributes: Vec<Attribute>,
    layout: AttributeLayout,
}

impl Entity {
    /// Sides at or below [`MIN_SIZE`] fall back to [`DEFAULT_SIZE`].
    pub fn new(id: EntityId, label: impl Into<String>, geometry: Rectangle, layout: AttributeLayout) -> Self {
        let label = label.into();
        Self {
            id,
            geometry: Rectangle {
                width: usable_side(geometry.width),
                height: usable_side(geometry.height),
                ..geometry
            },
            selected: false,
            label: if label.is_empty() { "New Entity".to_string() } else { label },
            attributes: Vec::new(),
            layout,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn layout(&self) -> AttributeLayout {
        self.layout
    }

    /// Height of the box above the attribute rows.
    pub fn base_height(&self) -> f32 {
        self.geometry.height - ROW_HEIGHT * self.attributes.len() as f32
    }

    pub fn is_point_in_entity(&self, point: Point) -> bool {
        geometry::contains(&self.geometry, point)
    }

    /// Always derived from the current geometry, never cached.
    pub fn connection_points(&self) -> [Point; 4] {
        geometry::connection_points(&self.geometry)
    }

    /// Connection point nearest to the center of `target`.
    pub fn find_closest_connection_point(&self, target: &Rectangle) -> Point {
        let points = self.connection_points();
        geometry::closest_point(&points, geometry::center(target)).unwrap_or(points[0])
    }

    pub fn closest_connection_point_to(&self, point: Point) -> Point {
        self.find_closest_connection_point(&Rectangle::new(point, Size::ZERO))
    }

    /// Connection point nearest to the entity's own center.
    pub fn connection_point(&self) -> Option<Point> {
        let points = self.connection_points();
        geometry::closest_point(&points, geometry::center(&self.geometry))
    }

    pub fn move_to(&mut self, position: Point) {
        self.geometry.x = position.x;
        self.geometry.y = position.y;
    }

    /// Applies each axis only when its candidate exceeds [`MIN_SIZE`].
    /// Returns whether anything changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let mut changed = false;
        if width > MIN_SIZE && width != self.geometry.width {
            self.geometry.width = width;
            changed = true;
        }
        if height > MIN_SIZE && height != self.geometry.height {
            self.geometry.height = height;
            changed = true;
        }
        changed
    }

    /// Inserts a row and grows the box by one row. Returns the row index.
    pub fn add_attribute(&mut self, name: impl Into<String>, is_identifier: bool) -> usize {
        let attribute = Attribute {
            name: name.into(),
            is_identifier,
        };
        let index = match self.layout {
            AttributeLayout::IdentifiersFirst if is_identifier => self
                .attributes
                .iter()
                .rposition(|a| a.is_identifier)
                .map_or(0, |last| last + 1),
            _ => self.attributes.len(),
        };
        self.attributes.insert(index, attribute);
        self.geometry.height += ROW_HEIGHT;
        index
    }

    /// Vertical offset of row `index` relative to the entity's top.
    /// Rows are anchored to the bottom edge.
    pub fn row_offset(&self, index: usize) -> Option<f32> {
        let below = self.attributes.len().checked_sub(index).filter(|&n| n > 0)?;
        Some(self.geometry.height - ROW_HEIGHT * below as f32)
    }

    pub fn rows(&self) -> impl Iterator<Item = (f32, &Attribute)> {
        let bottom = self.geometry.height;
        let count = self.attributes.len();
        self.attributes
            .iter()
            .enumerate()
            .map(move |(i, attribute)| (bottom - ROW_HEIGHT * (count - i) as f32, attribute))
    }

    /// Resize handle origin relative to the entity's top-left.
    pub fn resize_handle_offset(&self) -> Point {
        Point::new(
            self.geometry.width - RESIZE_HANDLE_SIZE,
            self.geometry.height - RESIZE_HANDLE_SIZE,
        )
    }

    pub fn resize_handle_bounds(&self) -> Rectangle {
        let offset = self.resize_handle_offset();
        Rectangle::new(
            Point::new(self.geometry.x + offset.x, self.geometry.y + offset.y),
            Size::new(RESIZE_HANDLE_SIZE, RESIZE_HANDLE_SIZE),
        )
    }

    /// The "+" affordance sits against the top-right corner, outside the box.
    pub fn add_button_bounds(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.geometry.x + self.geometry.width, self.geometry.y),
            Size::new(ADD_BUTTON_SIZE, ADD_BUTTON_SIZE),
        )
    }

    /// Label anchor relative to the entity's top-left. The clustered layout
    /// draws the label above the box.
    pub fn label_offset(&self) -> Point {
        let y = match self.layout {
            AttributeLayout::Ordered => 15.0,
            AttributeLayout::IdentifiersFirst => -5.0,
        };
        Point::new(self.geometry.width / 2.0, y)
    }
}

fn usable_side(side: f32) -> f32 {
    if side > MIN_SIZE { side } else { DEFAULT_SIZE }
}
