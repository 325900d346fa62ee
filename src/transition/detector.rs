//! Hub transition detection.
//!
//! Compares two centrality snapshots and describes how the hub landscape
//! changed between them:
//!
//! - **Emergence**: a node crossed the hub threshold from below, or showed
//!   up as a hub in a graph it was previously absent from.
//! - **Demise**: a hub dropped below the threshold or vanished entirely.
//! - **Shift**: a node stayed a hub on both sides but its prominence moved
//!   by more than the shift threshold.
//!
//! Hub status is re-derived here from composite scores against the
//! threshold the caller passes in, rather than trusting the `is_hub` flags
//! baked into the snapshots. A threshold change between two computations
//! then shows up as emergences/demises instead of being silently ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::centrality::CentralityReport;

/// Minimum composite-score change for a hub-to-hub move to register as a
/// shift. Smaller fluctuations are treated as noise.
const SHIFT_THRESHOLD: f64 = 0.15;

// ============================================================================
// Event types
// ============================================================================

/// What happened to a node's hub status between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// A node became a hub.
    Emergence,
    /// A hub fell below the threshold or left the graph.
    Demise,
    /// A hub's prominence changed substantially while staying a hub.
    Shift,
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionKind::Emergence => write!(f, "emergence"),
            TransitionKind::Demise => write!(f, "demise"),
            TransitionKind::Shift => write!(f, "shift"),
        }
    }
}

/// Volume ramp curve used when rendering a transition gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampCurve {
    Linear,
    Exponential,
    Logarithmic,
}

/// Overall dynamic direction of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionEffect {
    Crescendo,
    Decrescendo,
}

/// Rendering parameters for a single transition gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionAudioConfig {
    /// Gesture length in seconds.
    pub duration_secs: f64,
    /// Volume ramp curve.
    pub ramp: RampCurve,
    /// How rich the harmonic stack should be, 0.0–1.0.
    pub harmonic_enrichment: f64,
    /// Dynamic direction.
    pub effect: TransitionEffect,
}

impl TransitionAudioConfig {
    /// Derive gesture parameters from the transition kind and score change.
    ///
    /// Emergences grow longer the further the score rose; demises take a
    /// fixed 2.5 s fade; shifts sweep over 1.5 s with enrichment scaled to
    /// the size of the move.
    pub fn for_kind(kind: TransitionKind, previous_score: f64, new_score: f64) -> Self {
        match kind {
            TransitionKind::Emergence => Self {
                duration_secs: 2.0 + (new_score - previous_score),
                ramp: RampCurve::Exponential,
                harmonic_enrichment: new_score,
                effect: TransitionEffect::Crescendo,
            },
            TransitionKind::Demise => Self {
                duration_secs: 2.5,
                ramp: RampCurve::Logarithmic,
                harmonic_enrichment: 0.0,
                effect: TransitionEffect::Decrescendo,
            },
            TransitionKind::Shift => Self {
                duration_secs: 1.5,
                ramp: RampCurve::Linear,
                harmonic_enrichment: (new_score - previous_score).abs(),
                effect: if new_score > previous_score {
                    TransitionEffect::Crescendo
                } else {
                    TransitionEffect::Decrescendo
                },
            },
        }
    }
}

/// A single detected change in a node's hub status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubTransitionEvent {
    /// Unique event ID, used to match cleanup tasks to registry entries.
    pub id: Uuid,
    pub kind: TransitionKind,
    /// Node whose status changed.
    pub node_id: String,
    /// Composite score before the change (0.0 if the node was absent).
    pub previous_score: f64,
    /// Composite score after the change (0.0 if the node vanished).
    pub new_score: f64,
    /// When the transition was detected.
    pub timestamp: DateTime<Utc>,
    /// Derived rendering parameters.
    pub audio: TransitionAudioConfig,
}

impl HubTransitionEvent {
    pub fn new(
        kind: TransitionKind,
        node_id: impl Into<String>,
        previous_score: f64,
        new_score: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            node_id: node_id.into(),
            previous_score,
            new_score,
            timestamp: Utc::now(),
            audio: TransitionAudioConfig::for_kind(kind, previous_score, new_score),
        }
    }
}

// ============================================================================
// Detection
// ============================================================================

/// Compare two centrality snapshots and return the hub transitions between
/// them, sorted by node ID for deterministic output.
///
/// Identical snapshots produce an empty list. Score moves that never cross
/// the threshold (non-hub fluctuation, sub-threshold hub wobble) are
/// ignored.
pub fn detect_hub_transitions(
    previous: &CentralityReport,
    current: &CentralityReport,
    hub_threshold: f64,
) -> Vec<HubTransitionEvent> {
    let mut events = Vec::new();

    // Emergences and shifts are keyed by the current snapshot.
    for (node_id, metrics) in &current.metrics {
        let now_hub = metrics.composite_score >= hub_threshold;
        if !now_hub {
            continue;
        }
        match previous.metrics.get(node_id) {
            Some(old) if old.composite_score >= hub_threshold => {
                let delta = metrics.composite_score - old.composite_score;
                if delta.abs() > SHIFT_THRESHOLD {
                    events.push(HubTransitionEvent::new(
                        TransitionKind::Shift,
                        node_id.clone(),
                        old.composite_score,
                        metrics.composite_score,
                    ));
                }
            }
            Some(old) => {
                events.push(HubTransitionEvent::new(
                    TransitionKind::Emergence,
                    node_id.clone(),
                    old.composite_score,
                    metrics.composite_score,
                ));
            }
            None => {
                events.push(HubTransitionEvent::new(
                    TransitionKind::Emergence,
                    node_id.clone(),
                    0.0,
                    metrics.composite_score,
                ));
            }
        }
    }

    // Demises are keyed by the previous snapshot so vanished nodes are seen.
    for (node_id, old) in &previous.metrics {
        if old.composite_score < hub_threshold {
            continue;
        }
        let new_score = current
            .metrics
            .get(node_id)
            .map(|m| m.composite_score)
            .unwrap_or(0.0);
        if new_score < hub_threshold {
            events.push(HubTransitionEvent::new(
                TransitionKind::Demise,
                node_id.clone(),
                old.composite_score,
                new_score,
            ));
        }
    }

    events.sort_by(|a, b| a.node_id.cmp(&b.node_id));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centrality::HubMetrics;
    use std::collections::HashMap;

    fn report_of(scores: &[(&str, f64)]) -> CentralityReport {
        let metrics: HashMap<String, HubMetrics> = scores
            .iter()
            .map(|(id, score)| {
                (
                    (*id).to_string(),
                    HubMetrics {
                        degree: *score,
                        betweenness: *score,
                        eigenvector: *score,
                        pagerank: *score,
                        composite_score: *score,
                        is_hub: *score >= 0.6,
                    },
                )
            })
            .collect();
        CentralityReport {
            metrics,
            node_count: scores.len(),
            link_count: 0,
            computation_ms: 0,
        }
    }

    #[test]
    fn test_emergence_for_new_node() {
        let previous = report_of(&[("old", 0.9)]);
        let current = report_of(&[("old", 0.9), ("rising", 0.8)]);

        let events = detect_hub_transitions(&previous, &current, 0.6);
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.kind, TransitionKind::Emergence);
        assert_eq!(event.node_id, "rising");
        assert_eq!(event.previous_score, 0.0);
        assert_eq!(event.new_score, 0.8);
        assert!((event.audio.duration_secs - 2.8).abs() < 1e-9);
        assert_eq!(event.audio.ramp, RampCurve::Exponential);
        assert_eq!(event.audio.effect, TransitionEffect::Crescendo);
        assert!((event.audio.harmonic_enrichment - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_emergence_from_below_threshold() {
        let previous = report_of(&[("node", 0.4)]);
        let current = report_of(&[("node", 0.7)]);

        let events = detect_hub_transitions(&previous, &current, 0.6);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, TransitionKind::Emergence);
        assert_eq!(events[0].previous_score, 0.4);
        assert!((events[0].audio.duration_secs - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_demise_below_threshold() {
        let previous = report_of(&[("fading", 0.8)]);
        let current = report_of(&[("fading", 0.4)]);

        let events = detect_hub_transitions(&previous, &current, 0.6);
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.kind, TransitionKind::Demise);
        assert_eq!(event.previous_score, 0.8);
        assert_eq!(event.new_score, 0.4);
        assert!((event.audio.duration_secs - 2.5).abs() < f64::EPSILON);
        assert_eq!(event.audio.ramp, RampCurve::Logarithmic);
        assert_eq!(event.audio.effect, TransitionEffect::Decrescendo);
        assert_eq!(event.audio.harmonic_enrichment, 0.0);
    }

    #[test]
    fn test_demise_for_vanished_node() {
        let previous = report_of(&[("gone", 0.9), ("stays", 0.7)]);
        let current = report_of(&[("stays", 0.7)]);

        let events = detect_hub_transitions(&previous, &current, 0.6);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, TransitionKind::Demise);
        assert_eq!(events[0].node_id, "gone");
        assert_eq!(events[0].new_score, 0.0);
    }

    #[test]
    fn test_shift_upward() {
        let previous = report_of(&[("hub", 0.625)]);
        let current = report_of(&[("hub", 0.8)]);

        let events = detect_hub_transitions(&previous, &current, 0.6);
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.kind, TransitionKind::Shift);
        assert_eq!(event.audio.effect, TransitionEffect::Crescendo);
        assert_eq!(event.audio.ramp, RampCurve::Linear);
        assert!((event.audio.duration_secs - 1.5).abs() < f64::EPSILON);
        assert!((event.audio.harmonic_enrichment - 0.175).abs() < 1e-9);
    }

    #[test]
    fn test_shift_downward() {
        let previous = report_of(&[("hub", 0.8)]);
        let current = report_of(&[("hub", 0.625)]);

        let events = detect_hub_transitions(&previous, &current, 0.6);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, TransitionKind::Shift);
        assert_eq!(events[0].audio.effect, TransitionEffect::Decrescendo);
    }

    #[test]
    fn test_no_shift_within_threshold() {
        // A 0.14-point wobble stays under the shift threshold.
        let previous = report_of(&[("hub", 0.6)]);
        let current = report_of(&[("hub", 0.74)]);

        let events = detect_hub_transitions(&previous, &current, 0.6);
        assert!(events.is_empty());
    }

    #[test]
    fn test_identical_snapshots_produce_nothing() {
        let report = report_of(&[("a", 0.9), ("b", 0.4), ("c", 0.7)]);
        let events = detect_hub_transitions(&report, &report, 0.6);
        assert!(events.is_empty());
    }

    #[test]
    fn test_non_hub_fluctuation_ignored() {
        let previous = report_of(&[("quiet", 0.2)]);
        let current = report_of(&[("quiet", 0.5)]);

        let events = detect_hub_transitions(&previous, &current, 0.6);
        assert!(events.is_empty());
    }

    #[test]
    fn test_events_sorted_by_node_id() {
        let previous = report_of(&[("zeta", 0.9), ("alpha", 0.3)]);
        let current = report_of(&[("zeta", 0.3), ("alpha", 0.9), ("mid", 0.7)]);

        let events = detect_hub_transitions(&previous, &current, 0.6);
        let ids: Vec<&str> = events.iter().map(|e| e.node_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);

        assert_eq!(events[0].kind, TransitionKind::Emergence);
        assert_eq!(events[1].kind, TransitionKind::Emergence);
        assert_eq!(events[2].kind, TransitionKind::Demise);
    }

    #[test]
    fn test_threshold_is_rederived_from_scores() {
        // The caller's threshold governs, not the is_hub flags in the
        // snapshots (which were classified at 0.6 here).
        let previous = report_of(&[("node", 0.2)]);
        let current = report_of(&[("node", 0.4)]);

        let events = detect_hub_transitions(&previous, &current, 0.3);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, TransitionKind::Emergence);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TransitionKind::Emergence.to_string(), "emergence");
        assert_eq!(TransitionKind::Demise.to_string(), "demise");
        assert_eq!(TransitionKind::Shift.to_string(), "shift");
    }
}
