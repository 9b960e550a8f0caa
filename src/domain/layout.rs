//! Layout hints - 3-D node placement for an external renderer.
//!
//! Nothing in this crate renders; results simply carry these hints.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Role of a node in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Criterion,
    Alternative,
    Pattern,
}

/// A positioned node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub position: [f64; 3],
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub size: f64,
    /// Marks the node the renderer should emphasise.
    #[serde(default)]
    pub highlighted: bool,
}

impl LayoutNode {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: NodeKind,
        position: [f64; 3],
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            position,
            children: Vec::new(),
            score: None,
            confidence: None,
            size: 1.0,
            highlighted: false,
        }
    }

    pub fn with_children(mut self, children: Vec<String>) -> Self {
        self.children = children;
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn highlighted(mut self) -> Self {
        self.highlighted = true;
        self
    }
}

/// Position of the `index`-th of `count` points evenly spaced on a
/// horizontal ring.
pub fn ring_position(index: usize, count: usize, radius: f64, y: f64) -> [f64; 3] {
    let angle = if count == 0 {
        0.0
    } else {
        2.0 * PI * index as f64 / count as f64
    };
    [angle.cos() * radius, y, angle.sin() * radius]
}
