use log::debug;

use crate::edge::{Edge, EdgeId};
use crate::entity::{Entity, EntityId};

/// Anything the user can select on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Entity(EntityId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Entity,
    Edge,
}

/// Shared selection behaviour. Each item decides which affordances its
/// selected state turns on: an entity shows its resize handle and "+"
/// button, an edge only highlights its stroke.
pub trait Selectable {
    fn select(&mut self);
    fn deselect(&mut self);
    fn kind(&self) -> ItemKind;
}

impl Selectable for Entity {
    fn select(&mut self) {
        self.selected = true;
    }

    fn deselect(&mut self) {
        self.selected = false;
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Entity
    }
}

impl Selectable for Edge {
    fn select(&mut self) {
        self.selected = true;
    }

    fn deselect(&mut self) {
        self.selected = false;
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Edge
    }
}

/// Resolves items to their live objects.
pub trait ItemStore {
    fn item_mut(&mut self, item: Item) -> Option<&mut dyn Selectable>;
}

/// At most one selected item.
#[derive(Debug, Default)]
pub struct SelectionModel {
    selected: Option<Item>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Item> {
        self.selected
    }

    pub fn selected_entity(&self) -> Option<EntityId> {
        match self.selected {
            Some(Item::Entity(id)) => Some(id),
            _ => None,
        }
    }

    pub fn select_element(&mut self, entity: EntityId, store: &mut impl ItemStore) {
        self.select(Item::Entity(entity), store);
    }

    pub fn select_edge(&mut self, edge: EdgeId, store: &mut impl ItemStore) {
        self.select(Item::Edge(edge), store);
    }

    pub fn select(&mut self, item: Item, store: &mut impl ItemStore) {
        self.clear(store);
        match store.item_mut(item) {
            Some(target) => {
                target.select();
                debug!("selected {:?} {:?}", target.kind(), item);
                self.selected = Some(item);
            }
            None => debug!("ignored selection of unknown {:?}", item),
        }
    }

    pub fn deselect(&mut self, store: &mut impl ItemStore) {
        if self.selected.is_some() {
            debug!("selection cleared");
        }
        self.clear(store);
    }

    fn clear(&mut self, store: &mut impl ItemStore) {
        if let Some(previous) = self.selected.take() {
            if let Some(target) = store.item_mut(previous) {
                target.deselect();
            }
        }
    }
}
