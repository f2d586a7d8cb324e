//! In-memory entity/relationship model shared by the host and the engine.

use serde::{Deserialize, Serialize};

/// Cosmetic color category for an entity. Closed set; meaning is host-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Blue,
    Orange,
    Green,
    Pink,
}

/// Participation marker at one end of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardinalityMarker {
    Zero,
    One,
    Many,
}

/// Non-empty set of markers at one relationship end.
///
/// The editor only ever emits singletons, but combined notations
/// ("zero-or-many") are representable so future notations don't need a
/// model change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardinalitySet(Vec<CardinalityMarker>);

impl CardinalitySet {
    pub fn new(markers: Vec<CardinalityMarker>) -> Self {
        Self(markers)
    }

    pub fn zero() -> Self {
        Self(vec![CardinalityMarker::Zero])
    }

    pub fn one() -> Self {
        Self(vec![CardinalityMarker::One])
    }

    pub fn many() -> Self {
        Self(vec![CardinalityMarker::Many])
    }

    pub fn includes(&self, marker: CardinalityMarker) -> bool {
        self.0.contains(&marker)
    }

    /// Whether this end admits a to-many participation.
    pub fn is_many(&self) -> bool {
        self.includes(CardinalityMarker::Many)
    }

    pub fn markers(&self) -> &[CardinalityMarker] {
        &self.0
    }
}

/// A modeled column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: String,
    pub name: String,
    /// Free-form type text, case and parameterization preserved verbatim.
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(rename = "isKey")]
    pub is_key: bool,
}

/// A modeled table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub title: String,
    #[serde(rename = "colorScheme")]
    pub color_scheme: ColorScheme,
    pub x: f64,
    pub y: f64,
    /// Display order; also the column order of generated DDL.
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity {
    /// Reorder one attribute. Order is otherwise preserved by every
    /// mutation, so this is the only way attributes move.
    pub fn move_attribute(&mut self, from: usize, to: usize) {
        if from >= self.attributes.len() || to >= self.attributes.len() {
            return;
        }
        let attr = self.attributes.remove(from);
        self.attributes.insert(to, attr);
    }

    /// First attribute flagged as primary key, if any.
    pub fn primary_key(&self) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_key)
    }
}

/// A modeled association between two entities, referenced by id.
///
/// Endpoints are non-owning: deleting an entity must prune every
/// relationship touching it (see [`Model::remove_entity`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "cardFrom")]
    pub card_from: CardinalitySet,
    #[serde(rename = "cardTo")]
    pub card_to: CardinalitySet,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The full entity/relationship graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl Model {
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Delete an entity and cascade to every relationship referencing it.
    /// Returns the number of relationships pruned.
    pub fn remove_entity(&mut self, id: &str) -> usize {
        let before = self.relationships.len();
        self.relationships.retain(|r| r.from != id && r.to != id);
        self.entities.retain(|e| e.id != id);
        before - self.relationships.len()
    }

    /// Replace the whole model with a remote snapshot. Last writer wins;
    /// conflict policy is the host's concern.
    pub fn apply_snapshot(&mut self, snapshot: Model) {
        *self = snapshot;
    }
}

/// Generator of fresh opaque identifiers, unique within one generator.
#[derive(Debug, Default)]
pub struct IdGen {
    next: usize,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{}_{}", prefix, self.next)
    }
}
