//! Decision layout hints: root, criteria ring, alternatives ring.

use serde::{Deserialize, Serialize};

use crate::domain::layout::{ring_position, LayoutNode, NodeKind};
use crate::domain::scenario::{AlternativeRanking, Scenario};

const CRITERIA_RADIUS: f64 = 2.0;
const CRITERIA_HEIGHT: f64 = 1.0;
const ALTERNATIVES_RADIUS: f64 = 1.5;
const ALTERNATIVES_HEIGHT: f64 = -1.0;

/// Layout hints for a ranked decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionLayout {
    pub nodes: Vec<LayoutNode>,
}

impl DecisionLayout {
    /// Lays out the scenario root, its criteria and the ranked alternatives.
    pub fn build(scenario: &Scenario, rankings: &[AlternativeRanking]) -> Self {
        let criterion_ids: Vec<String> = scenario
            .criteria
            .keys()
            .map(|name| criterion_id(name))
            .collect();
        let alternative_ids: Vec<String> = rankings
            .iter()
            .map(|r| alternative_id(&r.alternative))
            .collect();

        let mut nodes = vec![LayoutNode::new("root", &scenario.name, NodeKind::Root, [0.0; 3])
            .with_children(criterion_ids.clone())];

        let criteria_count = scenario.criteria.len();
        for (index, ((name, criterion), id)) in
            scenario.criteria.iter().zip(criterion_ids).enumerate()
        {
            nodes.push(
                LayoutNode::new(
                    id,
                    name,
                    NodeKind::Criterion,
                    ring_position(index, criteria_count, CRITERIA_RADIUS, CRITERIA_HEIGHT),
                )
                .with_children(alternative_ids.clone())
                .with_score(criterion.weight)
                .with_size(0.3 + criterion.weight * 0.7),
            );
        }

        for (index, (ranking, id)) in rankings.iter().zip(alternative_ids).enumerate() {
            let node = LayoutNode::new(
                id,
                &ranking.alternative,
                NodeKind::Alternative,
                ring_position(index, rankings.len(), ALTERNATIVES_RADIUS, ALTERNATIVES_HEIGHT),
            )
            .with_score(ranking.score)
            .with_confidence(ranking.confidence)
            .with_size(0.2 + ranking.score * 0.6);
            nodes.push(if index == 0 { node.highlighted() } else { node });
        }

        Self { nodes }
    }

    /// Finds a node by id.
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

fn criterion_id(name: &str) -> String {
    format!("criterion:{}", name)
}

fn alternative_id(name: &str) -> String {
    format!("alternative:{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scenario::{Criterion, RiskAssessment};
    use std::collections::BTreeMap;

    fn ranking(alternative: &str, score: f64) -> AlternativeRanking {
        AlternativeRanking {
            alternative: alternative.to_string(),
            score,
            per_criterion_scores: BTreeMap::new(),
            confidence: score,
            risk_assessment: RiskAssessment::bare(1.0 - score),
        }
    }

    #[test]
    fn layout_has_root_criteria_and_alternatives() {
        let scenario = Scenario::builder("s-1", "Vendors")
            .criterion("cost", Criterion::minimize(0.5, 0.5))
            .criterion("quality", Criterion::maximize(0.5, 0.5))
            .alternatives(vec!["A", "B"])
            .build();
        let rankings = vec![ranking("A", 0.8), ranking("B", 0.3)];

        let layout = DecisionLayout::build(&scenario, &rankings);

        assert_eq!(layout.nodes.len(), 5);
        let root = layout.node("root").unwrap();
        assert_eq!(root.label, "Vendors");
        assert_eq!(root.children, vec!["criterion:cost", "criterion:quality"]);
        assert_eq!(layout.node("criterion:cost").unwrap().position[1], 1.0);
        assert!(layout.node("alternative:A").unwrap().highlighted);
        assert!(!layout.node("alternative:B").unwrap().highlighted);
    }

    #[test]
    fn shared_names_get_distinct_ids() {
        let scenario = Scenario::builder("s-2", "Clash")
            .criterion("speed", Criterion::maximize(0.5, 1.0))
            .alternatives(vec!["speed"])
            .build();

        let layout = DecisionLayout::build(&scenario, &[ranking("speed", 0.5)]);

        assert!(layout.node("criterion:speed").is_some());
        assert!(layout.node("alternative:speed").is_some());
    }
}
