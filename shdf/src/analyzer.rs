//! Structural analysis of SHDF documents.
//!
//! The analyzer builds an undirected graph of the circuit (components
//! as nodes, component-to-component wires as edges) and reports
//! wiring statistics: duplicate wires, endpoint conflicts, unused
//! components, and connectivity.

use std::collections::BTreeMap;

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;

use crate::schema::{Document, Endpoint};

/// A wire whose unordered endpoint pair already appeared earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateConnection {
    /// Index of the repeated wire in `connections`.
    pub index: usize,
    pub endpoints: [String; 2],
}

/// A non-board endpoint used by more than one wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointConflict {
    pub endpoint: String,
    pub connection_indices: Vec<usize>,
}

/// Statistics over one document.
#[derive(Debug, Clone, Serialize)]
pub struct DesignReport {
    pub component_count: usize,
    pub connection_count: usize,
    pub duplicate_connections: Vec<DuplicateConnection>,
    pub endpoint_conflicts: Vec<EndpointConflict>,
    /// Declared components no wire touches.
    pub unused_components: Vec<String>,
    /// Wires running component-to-component.
    pub direct_connections: usize,
    /// Wires with at least one breadboard endpoint.
    pub breadboard_connections: usize,
    pub direct_connection_ratio: f64,
    /// Number of disconnected islands among the declared components.
    pub connected_groups: usize,
}

/// Component-count differences against a reference document.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceComparison {
    /// Types the document has more of than the reference.
    pub surplus: BTreeMap<String, usize>,
    /// Types the reference has more of than the document.
    pub missing: BTreeMap<String, usize>,
}

impl ReferenceComparison {
    pub fn matches(&self) -> bool {
        self.surplus.is_empty() && self.missing.is_empty()
    }
}

pub struct DesignAnalyzer;

impl DesignAnalyzer {
    pub fn analyze(document: &Document) -> DesignReport {
        let mut graph: UnGraph<&str, ()> = UnGraph::new_undirected();
        let mut nodes: BTreeMap<&str, NodeIndex> = BTreeMap::new();
        for component in &document.components {
            let index = graph.add_node(component.id.as_str());
            nodes.insert(component.id.as_str(), index);
        }

        let mut duplicate_connections = Vec::new();
        let mut seen_pairs: BTreeMap<[&str; 2], usize> = BTreeMap::new();
        let mut endpoint_uses: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        let mut direct_connections = 0;
        let mut breadboard_connections = 0;

        for (index, connection) in document.connections.iter().enumerate() {
            let [from, to] = connection.endpoints();

            let mut pair = [from, to];
            pair.sort_unstable();
            if seen_pairs.insert(pair, index).is_some() {
                duplicate_connections.push(DuplicateConnection {
                    index,
                    endpoints: [from.to_string(), to.to_string()],
                });
            }

            let mut touches_board = false;
            for raw in [from, to] {
                match Endpoint::parse(raw) {
                    Endpoint::Board(_) => touches_board = true,
                    Endpoint::Pin { .. } | Endpoint::Bare(_) => {
                        endpoint_uses.entry(raw).or_default().push(index);
                    }
                }
            }
            if touches_board {
                breadboard_connections += 1;
            } else {
                direct_connections += 1;
            }

            if let (Endpoint::Pin { component: a, .. }, Endpoint::Pin { component: b, .. }) =
                (Endpoint::parse(from), Endpoint::parse(to))
            {
                if let (Some(&na), Some(&nb)) = (nodes.get(a), nodes.get(b)) {
                    graph.add_edge(na, nb, ());
                }
            }
        }

        let endpoint_conflicts = endpoint_uses
            .into_iter()
            .filter(|(_, uses)| uses.len() > 1)
            .map(|(endpoint, connection_indices)| EndpointConflict {
                endpoint: endpoint.to_string(),
                connection_indices,
            })
            .collect();

        let unused_components = document
            .components
            .iter()
            .filter(|component| !referenced_by_any_wire(document, &component.id))
            .map(|component| component.id.clone())
            .collect();

        let connection_count = document.connections.len();
        DesignReport {
            component_count: document.components.len(),
            connection_count,
            duplicate_connections,
            endpoint_conflicts,
            unused_components,
            direct_connections,
            breadboard_connections,
            direct_connection_ratio: if connection_count == 0 {
                0.0
            } else {
                direct_connections as f64 / connection_count as f64
            },
            connected_groups: connected_components(&graph),
        }
    }

    /// Compare component-type counts against a reference design.
    pub fn compare_with_reference(
        document: &Document,
        reference: &Document,
    ) -> ReferenceComparison {
        let ours = type_counts(document);
        let theirs = type_counts(reference);

        let mut surplus = BTreeMap::new();
        for (kind, count) in &ours {
            let expected = theirs.get(kind).copied().unwrap_or(0);
            if *count > expected {
                surplus.insert(kind.clone(), count - expected);
            }
        }
        let mut missing = BTreeMap::new();
        for (kind, count) in &theirs {
            let actual = ours.get(kind).copied().unwrap_or(0);
            if *count > actual {
                missing.insert(kind.clone(), count - actual);
            }
        }
        ReferenceComparison { surplus, missing }
    }
}

fn referenced_by_any_wire(document: &Document, id: &str) -> bool {
    document.connections.iter().any(|connection| {
        connection.endpoints().into_iter().any(|raw| {
            matches!(Endpoint::parse(raw), Endpoint::Pin { component, .. } if component == id)
        })
    })
}

fn type_counts(document: &Document) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for component in &document.components {
        *counts.entry(component.kind.to_lowercase()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Component, Connection};

    fn blink() -> Document {
        let mut doc = Document::new();
        doc.add_component(Component::new("uno1", "arduino uno"));
        doc.add_component(Component::new("led1", "led"));
        doc.add_component(Component::new("r1", "resistor").with_property("value", "220 ohm"));
        doc.add_connection(Connection::new("uno1.pin13", "r1.pin1"));
        doc.add_connection(Connection::new("r1.pin2", "led1.anode"));
        doc.add_connection(Connection::new("led1.cathode", "uno1.gnd1"));
        doc
    }

    #[test]
    fn test_clean_design() {
        let report = DesignAnalyzer::analyze(&blink());

        assert_eq!(report.component_count, 3);
        assert_eq!(report.connection_count, 3);
        assert!(report.duplicate_connections.is_empty());
        assert!(report.endpoint_conflicts.is_empty());
        assert!(report.unused_components.is_empty());
        assert_eq!(report.direct_connections, 3);
        assert_eq!(report.breadboard_connections, 0);
        assert_eq!(report.direct_connection_ratio, 1.0);
        assert_eq!(report.connected_groups, 1);
    }

    #[test]
    fn test_duplicate_wires_detected_unordered() {
        let mut doc = blink();
        doc.add_connection(Connection::new("r1.pin1", "uno1.pin13"));
        let report = DesignAnalyzer::analyze(&doc);

        assert_eq!(report.duplicate_connections.len(), 1);
        assert_eq!(report.duplicate_connections[0].index, 3);
    }

    #[test]
    fn test_endpoint_conflicts() {
        let mut doc = blink();
        doc.add_connection(Connection::new("uno1.pin13", "led1.anode"));
        let report = DesignAnalyzer::analyze(&doc);

        let conflicts: Vec<&str> = report
            .endpoint_conflicts
            .iter()
            .map(|c| c.endpoint.as_str())
            .collect();
        assert!(conflicts.contains(&"uno1.pin13"));
        assert!(conflicts.contains(&"led1.anode"));
    }

    #[test]
    fn test_unused_component_reported() {
        let mut doc = blink();
        doc.add_component(Component::new("buzz1", "buzzer"));
        let report = DesignAnalyzer::analyze(&doc);

        assert_eq!(report.unused_components, vec!["buzz1".to_string()]);
    }

    #[test]
    fn test_breadboard_wires_do_not_mark_unused() {
        let mut doc = Document::new();
        doc.add_component(Component::new("led1", "led"));
        doc.add_connection(Connection::new("led1.anode", "breadboard.10a"));
        let report = DesignAnalyzer::analyze(&doc);

        assert!(report.unused_components.is_empty());
        assert_eq!(report.breadboard_connections, 1);
        assert_eq!(report.direct_connection_ratio, 0.0);
    }

    #[test]
    fn test_connected_groups() {
        let mut doc = blink();
        doc.add_component(Component::new("btn1", "button"));
        doc.add_component(Component::new("buzz1", "buzzer"));
        doc.add_connection(Connection::new("btn1.pin1.l", "buzz1.pin1"));
        let report = DesignAnalyzer::analyze(&doc);

        assert_eq!(report.connected_groups, 2);
    }

    #[test]
    fn test_reference_comparison() {
        let mut doc = blink();
        doc.add_component(Component::new("led2", "LED"));
        let mut reference = blink();
        reference.add_component(Component::new("btn1", "button"));

        let diff = DesignAnalyzer::compare_with_reference(&doc, &reference);
        assert_eq!(diff.surplus.get("led"), Some(&1));
        assert_eq!(diff.missing.get("button"), Some(&1));
        assert!(!diff.matches());

        let same = DesignAnalyzer::compare_with_reference(&blink(), &blink());
        assert!(same.matches());
    }
}
