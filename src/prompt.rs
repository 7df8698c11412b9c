use crate::entity::{AttributeLayout, Entity, EntityId};

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRequest {
    pub name: String,
    pub is_identifier: bool,
}

/// Asks the user for a new attribute. `None` means the user cancelled.
pub trait AttributePrompt {
    fn request_attribute(&mut self, entity: &Entity) -> Option<AttributeRequest>;
}

impl<F> AttributePrompt for F
where
    F: FnMut(&Entity) -> Option<AttributeRequest>,
{
    fn request_attribute(&mut self, entity: &Entity) -> Option<AttributeRequest> {
        self(entity)
    }
}

/// Text typed into the on-canvas attribute prompt.
#[derive(Debug, Clone)]
pub struct PromptInput {
    pub entity: EntityId,
    pub text: String,
    pub is_identifier: bool,
    /// Only the clustered layout distinguishes identifier rows.
    pub asks_identifier: bool,
}

impl PromptInput {
    pub fn new(entity: EntityId, layout: AttributeLayout) -> Self {
        Self {
            entity,
            text: String::new(),
            is_identifier: false,
            asks_identifier: layout == AttributeLayout::IdentifiersFirst,
        }
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.extend(text.chars().filter(|c| !c.is_control()));
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn toggle_identifier(&mut self) {
        if self.asks_identifier {
            self.is_identifier = !self.is_identifier;
        }
    }
}

impl AttributePrompt for PromptInput {
    fn request_attribute(&mut self, _entity: &Entity) -> Option<AttributeRequest> {
        let name = self.text.trim();
        if name.is_empty() {
            return None;
        }
        Some(AttributeRequest {
            name: name.to_string(),
            is_identifier: self.asks_identifier && self.is_identifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::{Point, Rectangle, Size};

    fn entity() -> Entity {
        Entity::new(
            EntityId(0),
            "A",
            Rectangle::new(Point::ORIGIN, Size::new(50.0, 50.0)),
            AttributeLayout::Ordered,
        )
    }

    #[test]
    fn blank_input_is_a_cancellation() {
        let mut input = PromptInput::new(EntityId(0), AttributeLayout::Ordered);
        input.push_str("   ");
        assert_eq!(input.request_attribute(&entity()), None);
    }

    #[test]
    fn control_characters_are_dropped() {
        let mut input = PromptInput::new(EntityId(0), AttributeLayout::Ordered);
        input.push_str("na\u{8}me\r");
        input.backspace();
        assert_eq!(input.text, "nam");
    }

    #[test]
    fn identifier_flag_needs_clustered_layout() {
        let mut plain = PromptInput::new(EntityId(0), AttributeLayout::Ordered);
        plain.push_str("id");
        plain.toggle_identifier();
        assert_eq!(
            plain.request_attribute(&entity()),
            Some(AttributeRequest { name: "id".into(), is_identifier: false })
        );

        let mut clustered = PromptInput::new(EntityId(0), AttributeLayout::IdentifiersFirst);
        clustered.push_str(" id ");
        clustered.toggle_identifier();
        assert_eq!(
            clustered.request_attribute(&entity()),
            Some(AttributeRequest { name: "id".into(), is_identifier: true })
        );
    }
}
