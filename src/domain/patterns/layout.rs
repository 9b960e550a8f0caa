//! Pattern layout hints: one ring, pushed outwards by confidence.

use serde::{Deserialize, Serialize};

use super::IdentifiedPattern;
use crate::domain::layout::{ring_position, LayoutNode, NodeKind};

const BASE_RADIUS: f64 = 2.0;
const HIGHLIGHT_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternLayout {
    pub nodes: Vec<LayoutNode>,
}

impl PatternLayout {
    pub fn build(patterns: &[IdentifiedPattern]) -> Self {
        let count = patterns.len();
        let nodes = patterns
            .iter()
            .enumerate()
            .map(|(index, pattern)| {
                let radius = BASE_RADIUS + pattern.confidence;
                let node = LayoutNode::new(
                    format!("pattern:{}", pattern.id),
                    pattern.pattern_type.as_str(),
                    NodeKind::Pattern,
                    ring_position(index, count, radius, 0.0),
                )
                .with_confidence(pattern.confidence)
                .with_score(pattern.predictive_value)
                .with_size(0.2 + pattern.confidence * 0.8);
                if pattern.confidence > HIGHLIGHT_CONFIDENCE {
                    node.highlighted()
                } else {
                    node
                }
            })
            .collect();
        Self { nodes }
    }
}
