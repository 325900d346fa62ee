//! Cluster orchestration driven by hub analysis.
//!
//! Converts per-node centrality into per-cluster musical treatment: who
//! conducts, who accompanies, how loud, where in the stereo field, and how
//! elaborate the harmony gets. Every decision is a pure function of the
//! cluster, the metrics, and the configuration, so identical inputs always
//! produce identical decisions.

use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::PI;
use std::sync::Arc;
use tracing::debug;

use super::models::{
    ClusterHubAnalysis, MusicalRole, OrchestrationConfig, OrchestrationDecisions,
    OrchestrationMode, ScoreDistribution, DEFAULT_INSTRUMENT,
};
use crate::centrality::{CentralityAnalyzer, CentralityReport, ProminenceTier};
use crate::graph::{Cluster, GraphLink, GraphNode};

/// Derives musical roles and mixing decisions for clusters.
pub struct OrchestrationManager {
    analyzer: Arc<CentralityAnalyzer>,
    config: OrchestrationConfig,
}

impl OrchestrationManager {
    pub fn new(analyzer: Arc<CentralityAnalyzer>, config: OrchestrationConfig) -> Self {
        Self { analyzer, config }
    }

    pub fn config(&self) -> &OrchestrationConfig {
        &self.config
    }

    /// Identify the hub structure of one cluster.
    ///
    /// Members are ranked by composite score (ties broken by ID): the top
    /// scorer becomes the primary hub if it classifies as a hub, the next
    /// three hub-classified members become secondary, everyone else is
    /// peripheral. Members absent from the metrics table rank as peripheral.
    pub fn analyze_cluster_hubs(
        &self,
        cluster: &Cluster,
        nodes: &[GraphNode],
        links: &[GraphLink],
    ) -> ClusterHubAnalysis {
        let report = self.analyzer.compute_metrics(nodes, links);
        self.analyze_with_report(cluster, &report)
    }

    /// Produce the full set of musical decisions for one cluster.
    ///
    /// With a primary hub, roles and volumes follow each member's own
    /// prominence tier and the hub anchors the stereo center. Without one,
    /// the democratic fallback treats every member identically. An empty
    /// cluster yields empty decision maps, never an error.
    pub fn orchestrate_cluster_from_hub(
        &self,
        cluster: &Cluster,
        nodes: &[GraphNode],
        links: &[GraphLink],
    ) -> OrchestrationDecisions {
        let report = self.analyzer.compute_metrics(nodes, links);

        if cluster.nodes.is_empty() {
            return OrchestrationDecisions::empty(&cluster.id, cluster.kind.base_harmony());
        }

        let analysis = self.analyze_with_report(cluster, &report);
        let Some(hub_id) = analysis.primary_hub else {
            debug!(cluster_id = %cluster.id, "no primary hub, democratic fallback");
            return self.democratic_fallback(cluster, &report);
        };

        let hub_score = report
            .metrics
            .get(&hub_id)
            .map(|m| m.composite_score)
            .unwrap_or(0.0);

        // Score and tier per member, in cluster membership order.
        let members: Vec<(String, f64, ProminenceTier)> = cluster
            .nodes
            .iter()
            .map(|id| {
                let score = report
                    .metrics
                    .get(id)
                    .map(|m| m.composite_score)
                    .unwrap_or(0.0);
                (id.clone(), score, ProminenceTier::from_score(score))
            })
            .collect();

        let kind_ordinal = cluster.kind.ordinal();
        let mut lead_instrument = DEFAULT_INSTRUMENT.to_string();
        let mut accompanying_instruments: Vec<String> = Vec::new();
        let mut node_roles = HashMap::with_capacity(members.len());
        let mut node_volumes = HashMap::with_capacity(members.len());
        let mut node_complexities = HashMap::with_capacity(members.len());

        for (id, score, tier) in &members {
            let role = MusicalRole::from_tier(*tier);
            let pool = role.instrument_pool();
            let is_primary = *id == hub_id;
            let index = if is_primary {
                (kind_ordinal + (score * pool.len() as f64).floor() as usize) % pool.len()
            } else {
                kind_ordinal % pool.len()
            };
            let instrument = pool[index];

            if is_primary {
                lead_instrument = instrument.to_string();
            } else if !accompanying_instruments.iter().any(|a| a == instrument) {
                accompanying_instruments.push(instrument.to_string());
            }

            let volume = if is_primary {
                self.hub_volume(*tier, *score)
            } else {
                tier.base_volume()
            };

            node_roles.insert(id.clone(), role);
            node_volumes.insert(id.clone(), volume.clamp(0.0, 1.0));
            node_complexities.insert(id.clone(), tier.voice_complexity());
        }

        // Hub holds the stereo center; the rest spread around a circle,
        // peripheral members wider than the core.
        let mut node_pans = HashMap::with_capacity(members.len());
        node_pans.insert(hub_id.clone(), 0.0);
        let others: Vec<&(String, f64, ProminenceTier)> =
            members.iter().filter(|(id, _, _)| *id != hub_id).collect();
        let spread = others.len().max(1) as f64;
        for (i, (id, _, tier)) in others.iter().enumerate() {
            let radius = if *tier == ProminenceTier::Peripheral {
                0.8
            } else {
                0.4
            };
            let angle = 2.0 * PI * i as f64 / spread;
            node_pans.insert(id.clone(), angle.sin() * radius);
        }

        let harmony_complexity =
            (cluster.kind.base_harmony() + hub_score * 0.3).min(1.0);

        debug!(
            cluster_id = %cluster.id,
            hub = %hub_id,
            lead = %lead_instrument,
            harmony = harmony_complexity,
            "cluster orchestrated"
        );

        OrchestrationDecisions {
            cluster_id: cluster.id.clone(),
            hub_node_id: Some(hub_id.clone()),
            lead_instrument,
            accompanying_instruments,
            harmony_complexity,
            node_roles,
            node_volumes,
            node_pans,
            node_complexities,
            hub_distances: hub_distances(cluster, links, &hub_id),
        }
    }

    fn analyze_with_report(
        &self,
        cluster: &Cluster,
        report: &CentralityReport,
    ) -> ClusterHubAnalysis {
        let mut scored: Vec<(&str, f64, bool)> = cluster
            .nodes
            .iter()
            .filter_map(|id| {
                report
                    .metrics
                    .get(id)
                    .map(|m| (id.as_str(), m.composite_score, m.is_hub))
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let primary_hub = scored
            .first()
            .filter(|(_, _, is_hub)| *is_hub)
            .map(|(id, _, _)| (*id).to_string());
        let secondary_hubs: Vec<String> = scored
            .iter()
            .skip(1)
            .filter(|(_, _, is_hub)| *is_hub)
            .take(3)
            .map(|(id, _, _)| (*id).to_string())
            .collect();

        let peripheral_nodes: Vec<String> = cluster
            .nodes
            .iter()
            .filter(|id| {
                primary_hub.as_deref() != Some(id.as_str())
                    && !secondary_hubs.iter().any(|s| s == *id)
            })
            .cloned()
            .collect();

        let scores: Vec<f64> = scored.iter().map(|(_, s, _)| *s).collect();

        ClusterHubAnalysis {
            cluster_id: cluster.id.clone(),
            primary_hub,
            secondary_hubs,
            peripheral_nodes,
            distribution: ScoreDistribution::from_scores(&scores),
        }
    }

    /// Hub-less treatment: every member is an equal accompanist on the
    /// default instrument, spread evenly around the stereo circle.
    fn democratic_fallback(
        &self,
        cluster: &Cluster,
        report: &CentralityReport,
    ) -> OrchestrationDecisions {
        let mut decisions =
            OrchestrationDecisions::empty(&cluster.id, cluster.kind.base_harmony());
        let spread = cluster.nodes.len() as f64;

        for (i, id) in cluster.nodes.iter().enumerate() {
            let tier = report
                .metrics
                .get(id)
                .map(|m| ProminenceTier::from_score(m.composite_score))
                .unwrap_or(ProminenceTier::Peripheral);
            let angle = 2.0 * PI * i as f64 / spread;

            decisions.node_roles.insert(id.clone(), MusicalRole::Accompaniment);
            decisions.node_volumes.insert(id.clone(), 0.5);
            decisions.node_pans.insert(id.clone(), angle.sin() * 0.8);
            decisions
                .node_complexities
                .insert(id.clone(), tier.voice_complexity());
            decisions.hub_distances.insert(id.clone(), 0.0);
        }
        decisions.accompanying_instruments = vec![DEFAULT_INSTRUMENT.to_string()];
        decisions
    }

    fn hub_volume(&self, tier: ProminenceTier, score: f64) -> f64 {
        let base = tier.base_volume();
        let boosted = match self.config.mode {
            OrchestrationMode::HubLed => {
                base + score * 0.4 * self.config.prominence_multiplier
            }
            OrchestrationMode::Democratic => 0.6,
            OrchestrationMode::Balanced => {
                base + score * 0.2 * self.config.prominence_multiplier
            }
        };
        boosted.clamp(0.0, 1.0)
    }
}

/// BFS hop counts from the hub, walking only links whose endpoints both
/// belong to the cluster. Unreachable members stay infinite.
fn hub_distances(cluster: &Cluster, links: &[GraphLink], hub_id: &str) -> HashMap<String, f64> {
    let members: HashSet<&str> = cluster.nodes.iter().map(String::as_str).collect();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for l in links {
        let (s, t) = (l.source.as_str(), l.target.as_str());
        if s != t && members.contains(s) && members.contains(t) {
            adjacency.entry(s).or_default().push(t);
            adjacency.entry(t).or_default().push(s);
        }
    }

    let mut distances: HashMap<String, f64> = cluster
        .nodes
        .iter()
        .map(|id| (id.clone(), f64::INFINITY))
        .collect();
    if !distances.contains_key(hub_id) {
        return distances;
    }
    distances.insert(hub_id.to_string(), 0.0);

    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(hub_id);
    while let Some(current) = queue.pop_front() {
        let current_dist = distances.get(current).copied().unwrap_or(f64::INFINITY);
        if let Some(neighbors) = adjacency.get(current) {
            for &next in neighbors {
                let seen = distances
                    .get(next)
                    .map(|d| d.is_finite())
                    .unwrap_or(true);
                if !seen {
                    distances.insert(next.to_string(), current_dist + 1.0);
                    queue.push_back(next);
                }
            }
        }
    }
    distances
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centrality::CentralityConfig;
    use crate::graph::ClusterKind;
    use crate::test_helpers::{cluster_of, complete_vault, link, node, star_vault};

    fn manager_with(config: OrchestrationConfig) -> OrchestrationManager {
        let analyzer = Arc::new(CentralityAnalyzer::new(CentralityConfig::default()));
        OrchestrationManager::new(analyzer, config)
    }

    fn manager() -> OrchestrationManager {
        manager_with(OrchestrationConfig::default())
    }

    #[test]
    fn test_star_cluster_analysis() {
        let (nodes, links) = star_vault(5);
        let cluster = cluster_of(
            "all",
            ClusterKind::TagBased,
            &["center", "leaf_0", "leaf_1", "leaf_2", "leaf_3", "leaf_4"],
        );
        let analysis = manager().analyze_cluster_hubs(&cluster, &nodes, &links);

        assert_eq!(analysis.primary_hub.as_deref(), Some("center"));
        assert!(analysis.secondary_hubs.is_empty());
        assert_eq!(
            analysis.peripheral_nodes,
            vec!["leaf_0", "leaf_1", "leaf_2", "leaf_3", "leaf_4"]
        );
        assert!((analysis.distribution.max - 1.0).abs() < 1e-9);
        assert!(analysis.distribution.min < 0.6);
    }

    #[test]
    fn test_secondary_hubs_capped_at_three_with_id_tie_break() {
        // Complete graph: every member scores identically and classifies
        // as a hub, so ranking falls back to ID order.
        let (nodes, links) = complete_vault(6);
        let cluster = cluster_of(
            "clique",
            ClusterKind::Community,
            &["k_0", "k_1", "k_2", "k_3", "k_4", "k_5"],
        );
        let analysis = manager().analyze_cluster_hubs(&cluster, &nodes, &links);

        assert_eq!(analysis.primary_hub.as_deref(), Some("k_0"));
        assert_eq!(analysis.secondary_hubs, vec!["k_1", "k_2", "k_3"]);
        assert_eq!(analysis.peripheral_nodes, vec!["k_4", "k_5"]);
        assert!(analysis.distribution.std_dev < 1e-9);
    }

    #[test]
    fn test_star_cluster_decisions() {
        let (nodes, links) = star_vault(5);
        let cluster = cluster_of(
            "all",
            ClusterKind::TagBased,
            &["center", "leaf_0", "leaf_1", "leaf_2", "leaf_3", "leaf_4"],
        );
        let decisions = manager().orchestrate_cluster_from_hub(&cluster, &nodes, &links);

        assert_eq!(decisions.hub_node_id.as_deref(), Some("center"));
        assert_eq!(decisions.node_roles["center"], MusicalRole::Conductor);
        assert_eq!(decisions.node_roles["leaf_0"], MusicalRole::Accompaniment);

        // Conductor pool at tag-based ordinal 0 with a full score wraps
        // back to the pool start.
        assert_eq!(decisions.lead_instrument, "piano");
        assert_eq!(decisions.accompanying_instruments, vec!["harp"]);

        // Hub-led volume saturates for a perfect score; leaves sit at the
        // peripheral tier base.
        assert!((decisions.node_volumes["center"] - 1.0).abs() < 1e-9);
        assert!((decisions.node_volumes["leaf_0"] - 0.2).abs() < 1e-9);

        assert!((decisions.node_pans["center"] - 0.0).abs() < f64::EPSILON);
        assert!((decisions.node_pans["leaf_0"] - 0.0).abs() < 1e-9);
        let expected = (2.0 * PI / 5.0).sin() * 0.8;
        assert!((decisions.node_pans["leaf_1"] - expected).abs() < 1e-9);

        assert!((decisions.harmony_complexity - 0.9).abs() < 1e-9);
        assert!((decisions.node_complexities["center"] - 0.9).abs() < 1e-9);
        assert!((decisions.node_complexities["leaf_2"] - 0.3).abs() < 1e-9);

        assert!((decisions.hub_distances["center"] - 0.0).abs() < f64::EPSILON);
        assert!((decisions.hub_distances["leaf_3"] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cluster_kind_rotates_instrument_pools() {
        let (nodes, links) = star_vault(5);
        let cluster = cluster_of(
            "dense",
            ClusterKind::LinkDense,
            &["center", "leaf_0", "leaf_1", "leaf_2", "leaf_3", "leaf_4"],
        );
        let decisions = manager().orchestrate_cluster_from_hub(&cluster, &nodes, &links);

        // Link-dense ordinal 2: hub lands on (2 + 4) % 4, members on 2.
        assert_eq!(decisions.lead_instrument, "brass-ensemble");
        assert_eq!(decisions.accompanying_instruments, vec!["vibraphone"]);
    }

    #[test]
    fn test_democratic_fallback_without_hub() {
        // Isolated nodes: uniform PageRank alone cannot cross the hub
        // threshold, so the cluster has no primary hub.
        let nodes = vec![node("a.md"), node("b.md"), node("c.md")];
        let cluster = cluster_of("flat", ClusterKind::FolderBased, &["a.md", "b.md", "c.md"]);
        let decisions = manager().orchestrate_cluster_from_hub(&cluster, &nodes, &[]);

        assert_eq!(decisions.hub_node_id, None);
        assert_eq!(decisions.lead_instrument, DEFAULT_INSTRUMENT);
        assert_eq!(
            decisions.accompanying_instruments,
            vec![DEFAULT_INSTRUMENT.to_string()]
        );
        assert!((decisions.harmony_complexity - 0.5).abs() < 1e-9);

        for id in ["a.md", "b.md", "c.md"] {
            assert_eq!(decisions.node_roles[id], MusicalRole::Accompaniment);
            assert!((decisions.node_volumes[id] - 0.5).abs() < f64::EPSILON);
            assert!((decisions.hub_distances[id] - 0.0).abs() < f64::EPSILON);
        }

        assert!((decisions.node_pans["a.md"] - 0.0).abs() < 1e-9);
        let expected = (2.0 * PI / 3.0).sin() * 0.8;
        assert!((decisions.node_pans["b.md"] - expected).abs() < 1e-9);
        assert!((decisions.node_pans["c.md"] + expected).abs() < 1e-9);
    }

    #[test]
    fn test_empty_cluster_yields_empty_decisions() {
        let (nodes, links) = star_vault(3);
        let cluster = cluster_of("void", ClusterKind::Temporal, &[]);
        let decisions = manager().orchestrate_cluster_from_hub(&cluster, &nodes, &links);

        assert_eq!(decisions.hub_node_id, None);
        assert!(decisions.node_roles.is_empty());
        assert!(decisions.node_volumes.is_empty());
        assert!(decisions.node_pans.is_empty());
        assert!(decisions.hub_distances.is_empty());
        assert!(decisions.accompanying_instruments.is_empty());
        assert!((decisions.harmony_complexity - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_unreachable_member_gets_infinite_distance() {
        let mut nodes = vec![node("center"), node("leaf_0"), node("leaf_1")];
        nodes.push(node("detached"));
        let links = vec![link("center", "leaf_0"), link("center", "leaf_1")];
        let cluster = cluster_of(
            "mixed",
            ClusterKind::TagBased,
            &["center", "leaf_0", "detached"],
        );
        let decisions = manager().orchestrate_cluster_from_hub(&cluster, &nodes, &links);

        assert_eq!(decisions.hub_node_id.as_deref(), Some("center"));
        assert!((decisions.hub_distances["leaf_0"] - 1.0).abs() < f64::EPSILON);
        assert!(decisions.hub_distances["detached"].is_infinite());
    }

    #[test]
    fn test_orchestration_modes_shape_hub_volume() {
        let (nodes, links) = star_vault(5);
        let members = ["center", "leaf_0", "leaf_1", "leaf_2", "leaf_3", "leaf_4"];
        let cluster = cluster_of("all", ClusterKind::TagBased, &members);

        // Multiplier 0.25 keeps the boosted volumes below the clamp so the
        // three modes stay distinguishable.
        let hub_led = manager_with(OrchestrationConfig {
            mode: OrchestrationMode::HubLed,
            prominence_multiplier: 0.25,
        })
        .orchestrate_cluster_from_hub(&cluster, &nodes, &links);
        let balanced = manager_with(OrchestrationConfig {
            mode: OrchestrationMode::Balanced,
            prominence_multiplier: 0.25,
        })
        .orchestrate_cluster_from_hub(&cluster, &nodes, &links);
        let democratic = manager_with(OrchestrationConfig {
            mode: OrchestrationMode::Democratic,
            prominence_multiplier: 0.25,
        })
        .orchestrate_cluster_from_hub(&cluster, &nodes, &links);

        assert!((hub_led.node_volumes["center"] - 1.0).abs() < 1e-9);
        assert!((balanced.node_volumes["center"] - 0.95).abs() < 1e-9);
        assert!((democratic.node_volumes["center"] - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_decisions_are_deterministic() {
        let (nodes, links) = star_vault(5);
        let cluster = cluster_of(
            "all",
            ClusterKind::Community,
            &["center", "leaf_0", "leaf_1", "leaf_2", "leaf_3", "leaf_4"],
        );
        let m = manager();
        let first = m.orchestrate_cluster_from_hub(&cluster, &nodes, &links);
        let second = m.orchestrate_cluster_from_hub(&cluster, &nodes, &links);

        assert_eq!(first.lead_instrument, second.lead_instrument);
        assert_eq!(
            first.accompanying_instruments,
            second.accompanying_instruments
        );
        assert_eq!(first.node_volumes, second.node_volumes);
        assert_eq!(first.node_pans, second.node_pans);
    }
}
