//! Projects a machine onto a directed graph for diagram rendering.
//!
//! Nodes are the declared states, tagged with every role they play, plus the current state
//! when it was never declared (an undefined transition lands in `Q_rej`). Edges are the
//! transitions, coalesced so that each `(source, target)` pair yields exactly one edge whose
//! label lists every `symbol; move` that leads from source to target.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;

use crate::machine::TuringMachine;

/// Roles a state plays. They are independent; a state can hold all three at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Roles {
    pub initial: bool,
    pub current: bool,
    #[serde(rename = "final")]
    pub is_final: bool,
}

impl Roles {
    pub fn is_normal(&self) -> bool {
        !(self.initial || self.current || self.is_final)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub roles: Roles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// One `symbol; move` line per coalesced transition, in table order.
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Builds the graph for `machine` as it stands. Reads only; safe to call at any time.
pub fn project(machine: &TuringMachine) -> Graph {
    let definition = machine.definition();

    let mut nodes: Vec<Node> = definition
        .states()
        .iter()
        .map(|state| Node {
            id: state.clone(),
            roles: Roles {
                initial: state == definition.initial_state(),
                current: state == machine.state(),
                is_final: definition.is_final_state(state),
            },
        })
        .collect();

    if !definition.states().contains(machine.state()) {
        nodes.push(Node {
            id: machine.state().to_string(),
            roles: Roles {
                initial: false,
                current: true,
                is_final: definition.is_final_state(machine.state()),
            },
        });
    }

    let mut labels: IndexMap<(&str, &str), Vec<String>> = IndexMap::new();
    for (state, symbol, action) in definition.transitions().iter() {
        let symbol_label = if symbol == action.write {
            symbol.to_string()
        } else {
            format!("{} -> {}", symbol, action.write)
        };

        labels
            .entry((state.as_str(), action.next_state.as_str()))
            .or_default()
            .push(format!("{}; {}", symbol_label, action.movement.label()));
    }

    let edges = labels
        .into_iter()
        .map(|((source, target), lines)| Edge {
            source: source.to_string(),
            target: target.to_string(),
            label: lines.join("\n"),
        })
        .collect();

    Graph { nodes, edges }
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
    }

    /// Renders Graphviz DOT text.
    ///
    /// Final states are double circles filled lime, the initial state cyan and the current
    /// state yellow. Where roles overlap the later fill wins, so the current state is
    /// always yellow.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph G {\n    rankdir=LR;\n");

        for node in &self.nodes {
            let mut attributes = Vec::new();
            if !node.roles.is_normal() {
                attributes.push("style=filled".to_string());
            }
            if node.roles.is_final {
                attributes.push("peripheries=2".to_string());
            }
            let fill = if node.roles.current {
                Some("yellow")
            } else if node.roles.initial {
                Some("cyan")
            } else if node.roles.is_final {
                Some("lime")
            } else {
                None
            };
            if let Some(fill) = fill {
                attributes.push(format!("fillcolor={}", fill));
            }

            if attributes.is_empty() {
                dot.push_str(&format!("    {};\n", quote(&node.id)));
            } else {
                dot.push_str(&format!(
                    "    {} [{}];\n",
                    quote(&node.id),
                    attributes.join(", ")
                ));
            }
        }

        for edge in &self.edges {
            dot.push_str(&format!(
                "    {} -> {} [label={}];\n",
                quote(&edge.source),
                quote(&edge.target),
                quote(&edge.label)
            ));
        }

        dot.push_str("}\n");
        dot
    }

    /// Renders a Cytoscape-style element list: nodes carry their roles as classes, edges
    /// carry `source`, `target` and `label` data.
    pub fn to_elements_json(&self) -> String {
        let mut elements = Vec::new();

        for node in &self.nodes {
            let classes = [
                (node.roles.initial, "initial"),
                (node.roles.current, "current"),
                (node.roles.is_final, "final"),
            ]
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, class)| *class)
            .collect::<Vec<_>>()
            .join(" ");

            elements.push(json!({
                "data": { "id": node.id },
                "classes": classes
            }));
        }

        for (i, edge) in self.edges.iter().enumerate() {
            elements.push(json!({
                "data": {
                    "id": format!("{}-{}-{}", edge.source, edge.target, i),
                    "source": edge.source,
                    "target": edge.target,
                    "label": edge.label
                }
            }));
        }

        serde_json::Value::Array(elements).to_string()
    }
}

/// Quotes a DOT identifier, escaping quotes, backslashes and newlines.
fn quote(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}
