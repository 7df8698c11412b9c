//! Entity-relationship style diagram editor: entities with attribute rows,
//! edges that snap to entity connection points, and the pointer state
//! machine that drags, resizes and rewires them.

pub mod canvas;
pub mod config;
pub mod edge;
pub mod entity;
pub mod geometry;
pub mod graph;
pub mod prompt;
pub mod selection;
pub mod surface;
