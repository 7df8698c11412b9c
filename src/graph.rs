use iced::{Point, Rectangle, Size, Vector};
use log::{debug, info};

use crate::edge::{Edge, EdgeId, Endpoint};
use crate::entity::{AttributeLayout, Entity, EntityId};
use crate::geometry;
use crate::prompt::AttributePrompt;
use crate::selection::{Item, ItemStore, Selectable, SelectionModel};

/// Radius of the circular endpoint handles on an edge.
pub const HANDLE_RADIUS: f32 = 5.0;
const EDGE_HIT_TOLERANCE: f32 = 4.0;

const CASCADE_ORIGIN_X: f32 = 40.0;
const CASCADE_ORIGIN_Y: f32 = 120.0;
const CASCADE_STEP: f32 = 30.0;
const CASCADE_WRAP: usize = 12;
const NEW_EDGE_LENGTH: f32 = 120.0;

/// The one pointer-driven operation in progress, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// `offset` is the pointer's distance from the entity's top-left.
    DraggingEntity { entity: EntityId, offset: Vector },
    Resizing { entity: EntityId },
    /// `last` is the pointer position the line was last translated to.
    DraggingEdge { edge: EdgeId, last: Point },
    DraggingHandle { edge: EdgeId, endpoint: Endpoint },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitResult {
    None,
    AddButton(EntityId),
    ResizeHandle(EntityId),
    Handle { edge: EdgeId, endpoint: Endpoint },
    Edge(EdgeId),
    Entity(EntityId),
}

/// What a click did, so the surface can open the prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    Selected(Item),
    Cleared,
    RequestAttribute(EntityId),
}

/// Entities and edges, indexed by their ids. Nothing is ever removed, so an
/// id stays valid for the life of the scene.
#[derive(Debug, Default)]
pub struct Scene {
    pub cells: Vec<Entity>,
    pub edges: Vec<Edge>,
}

impl ItemStore for Scene {
    fn item_mut(&mut self, item: Item) -> Option<&mut dyn Selectable> {
        match item {
            Item::Entity(id) => self.cells.get_mut(id.0).map(|e| e as &mut dyn Selectable),
            Item::Edge(id) => self.edges.get_mut(id.0).map(|e| e as &mut dyn Selectable),
        }
    }
}

impl Scene {
    fn update_edges(&mut self) {
        for edge in &mut self.edges {
            edge.update_position(&self.cells);
        }
    }
}

pub struct GraphHandler {
    scene: Scene,
    selection: SelectionModel,
    interaction: Interaction,
    layout: AttributeLayout,
}

impl GraphHandler {
    pub fn new(layout: AttributeLayout) -> Self {
        Self {
            scene: Scene::default(),
            selection: SelectionModel::new(),
            interaction: Interaction::Idle,
            layout,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.scene.cells
    }

    pub fn edges(&self) -> &[Edge] {
        &self.scene.edges
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.scene.cells.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.scene.edges.get(id.0)
    }

    pub fn selection(&self) -> Option<Item> {
        self.selection.selected()
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn layout(&self) -> AttributeLayout {
        self.layout
    }

    pub fn add_entity(&mut self, label: impl Into<String>, bounds: Rectangle) -> EntityId {
        let id = EntityId(self.scene.cells.len());
        let entity = Entity::new(id, label, bounds, self.layout);
        info!("added entity {:?} '{}'", id, entity.label());
        self.scene.cells.push(entity);
        id
    }

    /// Adds `Entity{n+1}` at the next cascade slot.
    pub fn add_next_entity(&mut self, size: Size) -> EntityId {
        let index = self.scene.cells.len();
        let label = format!("Entity{}", index + 1);
        self.add_entity(label, Rectangle::new(cascade_position(index), size))
    }

    /// Binds a new edge to two existing entities.
    pub fn add_edge(&mut self, entity1: EntityId, entity2: EntityId) -> Option<EdgeId> {
        if self.entity(entity1).is_none() || self.entity(entity2).is_none() {
            return None;
        }
        let id = EdgeId(self.scene.edges.len());
        let edge = Edge::between(id, entity1, entity2, &self.scene.cells);
        info!("added edge {:?} between {:?} and {:?}", id, entity1, entity2);
        self.scene.edges.push(edge);
        Some(id)
    }

    pub fn add_edge_standalone(&mut self, start: Point, end: Point) -> EdgeId {
        let id = EdgeId(self.scene.edges.len());
        info!("added standalone edge {:?}", id);
        self.scene.edges.push(Edge::standalone(id, start, end));
        id
    }

    /// Adds a horizontal free edge at the next cascade slot.
    pub fn add_next_edge(&mut self) -> EdgeId {
        let start = cascade_position(self.scene.edges.len()) + Vector::new(0.0, 200.0);
        self.add_edge_standalone(start, start + Vector::new(NEW_EDGE_LENGTH, 0.0))
    }

    /// Re-resolves every edge against current entity geometry.
    pub fn update_edges(&mut self) {
        self.scene.update_edges();
    }

    pub fn select_entity(&mut self, id: EntityId) {
        self.selection.select_element(id, &mut self.scene);
    }

    pub fn select_edge(&mut self, id: EdgeId) {
        self.selection.select_edge(id, &mut self.scene);
    }

    pub fn deselect(&mut self) {
        self.selection.deselect(&mut self.scene);
    }

    pub fn move_entity(&mut self, id: EntityId, position: Point) {
        if let Some(entity) = self.scene.cells.get_mut(id.0) {
            entity.move_to(position);
            self.scene.update_edges();
        }
    }

    pub fn resize_entity(&mut self, id: EntityId, width: f32, height: f32) {
        let changed = self
            .scene
            .cells
            .get_mut(id.0)
            .is_some_and(|entity| entity.resize(width, height));
        if changed {
            self.scene.update_edges();
        }
    }

    /// Blank names are ignored. Returns the new row's index.
    pub fn add_attribute(&mut self, id: EntityId, name: &str, is_identifier: bool) -> Option<usize> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let entity = self.scene.cells.get_mut(id.0)?;
        let index = entity.add_attribute(name, is_identifier);
        info!("added attribute '{}' to {:?} at row {}", name, id, index);
        self.scene.update_edges();
        Some(index)
    }

    /// Asks `prompt` for an attribute; cancellation adds nothing.
    pub fn prompt_attribute(&mut self, id: EntityId, prompt: &mut impl AttributePrompt) -> Option<usize> {
        let request = prompt.request_attribute(self.entity(id)?)?;
        self.add_attribute(id, &request.name, request.is_identifier)
    }

    pub fn hit_test(&self, point: Point) -> HitResult {
        if let Some(entity) = self.selection.selected_entity().and_then(|id| self.entity(id)) {
            if geometry::contains(&entity.add_button_bounds(), point) {
                return HitResult::AddButton(entity.id);
            }
            if geometry::contains(&entity.resize_handle_bounds(), point) {
                return HitResult::ResizeHandle(entity.id);
            }
        }

        // Later items are painted on top, so test them first
        for edge in self.scene.edges.iter().rev() {
            for endpoint in [Endpoint::Start, Endpoint::End] {
                if geometry::distance(edge.handle(endpoint), point) <= HANDLE_RADIUS {
                    return HitResult::Handle { edge: edge.id, endpoint };
                }
            }
        }

        for edge in self.scene.edges.iter().rev() {
            if geometry::distance_to_segment(point, edge.start(), edge.end()) <= EDGE_HIT_TOLERANCE {
                return HitResult::Edge(edge.id);
            }
        }

        for entity in self.scene.cells.iter().rev() {
            if entity.is_point_in_entity(point) {
                return HitResult::Entity(entity.id);
            }
        }

        HitResult::None
    }

    /// Starts at most one drag. Returns whether the press was captured.
    pub fn pointer_pressed(&mut self, point: Point) -> bool {
        if self.interaction != Interaction::Idle {
            return false;
        }

        let next = match self.hit_test(point) {
            HitResult::ResizeHandle(entity) => Some(Interaction::Resizing { entity }),
            HitResult::Handle { edge, endpoint } => self
                .edge(edge)
                .is_some_and(|e| e.can_drag_handle(endpoint))
                .then_some(Interaction::DraggingHandle { edge, endpoint }),
            HitResult::Edge(edge) => self
                .edge(edge)
                .is_some_and(Edge::can_drag_whole)
                .then_some(Interaction::DraggingEdge { edge, last: point }),
            HitResult::Entity(entity) => self.entity(entity).map(|e| Interaction::DraggingEntity {
                entity,
                offset: point - e.geometry.position(),
            }),
            HitResult::AddButton(_) | HitResult::None => None,
        };

        match next {
            Some(interaction) => {
                debug!("interaction started: {:?}", interaction);
                self.interaction = interaction;
                true
            }
            None => false,
        }
    }

    /// Applies the active drag. Returns whether anything moved.
    pub fn pointer_moved(&mut self, point: Point) -> bool {
        match self.interaction {
            Interaction::Idle => false,
            Interaction::DraggingEntity { entity, offset } => {
                self.move_entity(entity, point - offset);
                true
            }
            Interaction::Resizing { entity } => {
                if let Some(origin) = self.entity(entity).map(|e| e.geometry.position()) {
                    self.resize_entity(entity, point.x - origin.x, point.y - origin.y);
                }
                true
            }
            Interaction::DraggingEdge { edge, last } => {
                if let Some(line) = self.scene.edges.get_mut(edge.0) {
                    line.translate(point - last);
                }
                self.interaction = Interaction::DraggingEdge { edge, last: point };
                true
            }
            Interaction::DraggingHandle { edge, endpoint } => {
                if let Some(line) = self.scene.edges.get_mut(edge.0) {
                    line.move_handle(endpoint, point);
                }
                true
            }
        }
    }

    /// Ends the active drag, reconciling edge bindings.
    pub fn pointer_released(&mut self) -> bool {
        let interaction = std::mem::take(&mut self.interaction);
        match interaction {
            Interaction::Idle => return false,
            Interaction::DraggingHandle { edge, endpoint } => {
                if let Some(line) = self.scene.edges.get_mut(edge.0) {
                    line.release_handle(endpoint, &self.scene.cells);
                }
            }
            Interaction::DraggingEntity { .. } | Interaction::Resizing { .. } | Interaction::DraggingEdge { .. } => {}
        }
        debug!("interaction ended: {:?}", interaction);
        true
    }

    /// A press and release without a drag in between.
    pub fn click(&mut self, point: Point) -> ClickOutcome {
        let item = match self.hit_test(point) {
            HitResult::AddButton(entity) => return ClickOutcome::RequestAttribute(entity),
            HitResult::Entity(entity) | HitResult::ResizeHandle(entity) => Item::Entity(entity),
            HitResult::Edge(edge) | HitResult::Handle { edge, .. } => Item::Edge(edge),
            HitResult::None => {
                self.deselect();
                return ClickOutcome::Cleared;
            }
        };
        self.selection.select(item, &mut self.scene);
        ClickOutcome::Selected(item)
    }
}

fn cascade_position(index: usize) -> Point {
    let step = (index % CASCADE_WRAP) as f32 * CASCADE_STEP;
    Point::new(CASCADE_ORIGIN_X + step, CASCADE_ORIGIN_Y + step)
}
