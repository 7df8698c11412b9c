use iced::{Point, Vector};
use log::debug;

use crate::entity::{Entity, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

/// How many of the two ends follow an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Unbound,
    HalfBound,
    Bound,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub selected: bool,
    start: Point,
    end: Point,
    entity1: Option<EntityId>,
    entity2: Option<EntityId>,
    standalone: bool,
}

fn lookup(entities: &[Entity], id: Option<EntityId>) -> Option<&Entity> {
    id.and_then(|id| entities.get(id.0))
}

impl Edge {
    /// A free-floating line between two literal coordinates.
    pub fn standalone(id: EdgeId, start: Point, end: Point) -> Self {
        Self {
            id,
            selected: false,
            start,
            end,
            entity1: None,
            entity2: None,
            standalone: true,
        }
    }

    /// A line bound at both ends, positioned immediately.
    pub fn between(id: EdgeId, entity1: EntityId, entity2: EntityId, entities: &[Entity]) -> Self {
        let mut edge = Self {
            id,
            selected: false,
            start: Point::ORIGIN,
            end: Point::ORIGIN,
            entity1: Some(entity1),
            entity2: Some(entity2),
            standalone: false,
        };
        edge.update_position(entities);
        edge
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn handle(&self, endpoint: Endpoint) -> Point {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    pub fn entity(&self, endpoint: Endpoint) -> Option<EntityId> {
        match endpoint {
            Endpoint::Start => self.entity1,
            Endpoint::End => self.entity2,
        }
    }

    pub fn is_standalone(&self) -> bool {
        self.standalone
    }

    pub fn binding(&self) -> Binding {
        match (self.entity1, self.entity2) {
            (None, None) => Binding::Unbound,
            (Some(_), Some(_)) => Binding::Bound,
            _ => Binding::HalfBound,
        }
    }

    /// Sets the raw line; both handles sit on the endpoints.
    pub fn set_position(&mut self, start: Point, end: Point) {
        self.start = start;
        self.end = end;
    }

    /// Re-attaches bound ends to their entities' current geometry.
    pub fn update_position(&mut self, entities: &[Entity]) {
        if self.standalone {
            return;
        }

        match (lookup(entities, self.entity1), lookup(entities, self.entity2)) {
            (Some(a), Some(b)) => {
                let start = a.find_closest_connection_point(&b.geometry);
                let end = b.find_closest_connection_point(&a.geometry);
                self.set_position(start, end);
            }
            (Some(a), None) => {
                let start = a.closest_connection_point_to(self.end);
                self.set_position(start, self.end);
            }
            (None, Some(b)) => {
                let end = b.closest_connection_point_to(self.start);
                self.set_position(self.start, end);
            }
            (None, None) => {}
        }
    }

    /// Bound endpoints follow their entity and cannot be grabbed.
    pub fn can_drag_handle(&self, endpoint: Endpoint) -> bool {
        self.entity(endpoint).is_none()
    }

    /// Only a selected, fully free edge can be moved as a whole.
    pub fn can_drag_whole(&self) -> bool {
        self.selected && self.standalone
    }

    pub fn move_handle(&mut self, endpoint: Endpoint, pointer: Point) {
        match endpoint {
            Endpoint::Start => self.set_position(pointer, self.end),
            Endpoint::End => self.set_position(self.start, pointer),
        }
    }

    pub fn translate(&mut self, delta: Vector) {
        self.set_position(self.start + delta, self.end + delta);
    }

    /// A released handle binds to the first entity (in creation order)
    /// containing it, at that entity's connection point nearest to the
    /// release coordinate. Otherwise it stays where it was dropped.
    pub fn release_handle(&mut self, endpoint: Endpoint, entities: &[Entity]) {
        let position = self.handle(endpoint);
        match entities.iter().find(|e| e.is_point_in_entity(position)) {
            Some(entity) => {
                let point = entity.closest_connection_point_to(position);
                match endpoint {
                    Endpoint::Start => {
                        self.entity1 = Some(entity.id);
                        self.start = point;
                    }
                    Endpoint::End => {
                        self.entity2 = Some(entity.id);
                        self.end = point;
                    }
                }
                debug!("edge {:?} {:?} bound to entity {:?}", self.id, endpoint, entity.id);
            }
            None => debug!("edge {:?} {:?} left free at {:?}", self.id, endpoint, position),
        }
        self.standalone = self.entity1.is_none() && self.entity2.is_none();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AttributeLayout;
    use iced::{Rectangle, Size};
    use proptest::prelude::*;

    fn entities() -> Vec<Entity> {
        vec![
            Entity::new(
                EntityId(0),
                "A",
                Rectangle::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0)),
                AttributeLayout::Ordered,
            ),
            Entity::new(
                EntityId(1),
                "B",
                Rectangle::new(Point::new(300.0, 0.0), Size::new(100.0, 100.0)),
                AttributeLayout::Ordered,
            ),
        ]
    }

    #[test]
    fn bound_edge_connects_facing_sides() {
        let cells = entities();
        let edge = Edge::between(EdgeId(0), EntityId(0), EntityId(1), &cells);
        assert_eq!(edge.start(), Point::new(100.0, 50.0));
        assert_eq!(edge.end(), Point::new(300.0, 50.0));
        assert_eq!(edge.binding(), Binding::Bound);
        assert!(!edge.is_standalone());
    }

    #[test]
    fn bound_edge_follows_entity() {
        let mut cells = entities();
        let mut edge = Edge::between(EdgeId(0), EntityId(0), EntityId(1), &cells);
        cells[1].move_to(Point::new(0.0, 400.0));
        edge.update_position(&cells);
        assert_eq!(edge.start(), Point::new(50.0, 100.0));
        assert_eq!(edge.end(), Point::new(20.0, 400.0));
    }

    #[test]
    fn standalone_edge_ignores_entities() {
        let cells = entities();
        let mut edge = Edge::standalone(EdgeId(0), Point::new(5.0, 5.0), Point::new(50.0, 50.0));
        edge.update_position(&cells);
        assert_eq!(edge.start(), Point::new(5.0, 5.0));
        assert_eq!(edge.end(), Point::new(50.0, 50.0));
    }

    #[test]
    fn bound_handle_is_not_draggable() {
        let cells = entities();
        let edge = Edge::between(EdgeId(0), EntityId(0), EntityId(1), &cells);
        assert!(!edge.can_drag_handle(Endpoint::Start));
        assert!(!edge.can_drag_handle(Endpoint::End));
    }

    #[test]
    fn dropping_handle_inside_entity_binds_it() {
        let cells = entities();
        let mut edge = Edge::standalone(EdgeId(0), Point::new(200.0, 300.0), Point::new(200.0, 400.0));
        assert!(edge.can_drag_handle(Endpoint::Start));
        edge.move_handle(Endpoint::Start, Point::new(320.0, 90.0));
        edge.release_handle(Endpoint::Start, &cells);

        assert_eq!(edge.entity(Endpoint::Start), Some(EntityId(1)));
        assert_eq!(edge.start(), Point::new(350.0, 100.0));
        assert_eq!(edge.binding(), Binding::HalfBound);
        assert!(!edge.is_standalone());
    }

    #[test]
    fn dropping_handle_in_empty_space_leaves_it_free() {
        let cells = entities();
        let mut edge = Edge::standalone(EdgeId(0), Point::new(200.0, 300.0), Point::new(200.0, 400.0));
        edge.move_handle(Endpoint::End, Point::new(200.0, 150.0));
        edge.release_handle(Endpoint::End, &cells);

        assert_eq!(edge.entity(Endpoint::End), None);
        assert_eq!(edge.end(), Point::new(200.0, 150.0));
        assert!(edge.is_standalone());
    }

    #[test]
    fn half_bound_edge_resolves_against_free_end() {
        let mut cells = entities();
        let mut edge = Edge::standalone(EdgeId(0), Point::new(90.0, 50.0), Point::new(200.0, 50.0));
        edge.release_handle(Endpoint::Start, &cells);
        assert_eq!(edge.start(), Point::new(100.0, 50.0));

        cells[0].move_to(Point::new(0.0, 300.0));
        edge.update_position(&cells);
        assert_eq!(edge.start(), Point::new(20.0, 300.0));
        assert_eq!(edge.end(), Point::new(200.0, 50.0));
    }

    #[test]
    fn whole_drag_needs_selection_and_no_bindings() {
        let cells = entities();
        let mut edge = Edge::standalone(EdgeId(0), Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(!edge.can_drag_whole());

        edge.selected = true;
        assert!(edge.can_drag_whole());
        edge.translate(Vector::new(3.0, 4.0));
        edge.translate(Vector::new(2.0, 6.0));
        assert_eq!(edge.start(), Point::new(5.0, 10.0));
        assert_eq!(edge.end(), Point::new(15.0, 10.0));

        let mut bound = Edge::between(EdgeId(1), EntityId(0), EntityId(1), &cells);
        bound.selected = true;
        assert!(!bound.can_drag_whole());
    }

    #[test]
    fn drop_binds_to_containing_entity_over_nearer_neighbour() {
        // B's top point (120.5, 0) is nearer the drop than any point of A,
        // but only A contains it.
        let cells = vec![
            Entity::new(
                EntityId(0),
                "A",
                Rectangle::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0)),
                AttributeLayout::Ordered,
            ),
            Entity::new(
                EntityId(1),
                "B",
                Rectangle::new(Point::new(100.5, 0.0), Size::new(100.0, 100.0)),
                AttributeLayout::Ordered,
            ),
        ];
        let mut edge = Edge::standalone(EdgeId(0), Point::new(300.0, 300.0), Point::new(300.0, 400.0));
        edge.move_handle(Endpoint::Start, Point::new(99.0, 10.0));
        edge.release_handle(Endpoint::Start, &cells);

        assert_eq!(edge.entity(Endpoint::Start), Some(EntityId(0)));
        assert_eq!(edge.start(), Point::new(100.0, 50.0));
    }

    #[test]
    fn drop_on_overlap_binds_to_first_created() {
        let cells = vec![
            Entity::new(
                EntityId(0),
                "A",
                Rectangle::new(Point::new(0.0, 0.0), Size::new(100.0, 100.0)),
                AttributeLayout::Ordered,
            ),
            Entity::new(
                EntityId(1),
                "C",
                Rectangle::new(Point::new(50.0, 50.0), Size::new(100.0, 100.0)),
                AttributeLayout::Ordered,
            ),
        ];
        let mut edge = Edge::standalone(EdgeId(0), Point::new(300.0, 300.0), Point::new(300.0, 400.0));
        edge.move_handle(Endpoint::End, Point::new(90.0, 80.0));
        edge.release_handle(Endpoint::End, &cells);

        assert_eq!(edge.entity(Endpoint::End), Some(EntityId(0)));
        assert_eq!(edge.end(), Point::new(100.0, 50.0));
        assert_eq!(edge.binding(), Binding::HalfBound);
    }

    proptest! {
        #[test]
        fn bound_ends_match_closest_points(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
        ) {
            let mut cells = entities();
            let mut edge = Edge::between(EdgeId(0), EntityId(0), EntityId(1), &cells);
            cells[0].move_to(Point::new(ax, ay));
            cells[1].move_to(Point::new(bx, by));
            edge.update_position(&cells);
            prop_assert_eq!(edge.start(), cells[0].find_closest_connection_point(&cells[1].geometry));
            prop_assert_eq!(edge.end(), cells[1].find_closest_connection_point(&cells[0].geometry));
        }
    }
}
