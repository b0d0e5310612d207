use std::collections::HashMap;

use petgraph::algo::has_path_connecting;
use petgraph::graph::NodeIndex;
use petgraph::Graph;

use crate::ir::{FieldType, Label, Message, Schema};

/// `MessageGraph` builds a graph of messages whose edges correspond to
/// singular message-typed fields. The goal is to recognize when message
/// types are recursively nested, so that the generated field can be boxed
/// when necessary: an unboxed recursive field would make the Rust type
/// infinitely sized. Repeated fields already live behind a `Vec` and map
/// values behind their map container, so neither contributes an edge.
pub struct MessageGraph {
    index: HashMap<String, NodeIndex>,
    graph: Graph<String, ()>,
}

impl MessageGraph {
    pub fn new(schema: &Schema) -> MessageGraph {
        let mut msg_graph = MessageGraph {
            index: HashMap::new(),
            graph: Graph::new(),
        };

        schema.for_each_message(|message| msg_graph.add_message(message));
        msg_graph
    }

    fn get_or_insert_index(&mut self, msg_name: String) -> NodeIndex {
        let MessageGraph {
            ref mut index,
            ref mut graph,
        } = *self;
        debug_assert_eq!(b'.', msg_name.as_bytes()[0]);
        *index
            .entry(msg_name.clone())
            .or_insert_with(|| graph.add_node(msg_name))
    }

    fn add_message(&mut self, message: &Message) {
        let msg_index = self.get_or_insert_index(message.fqn.clone());

        for field in &message.fields {
            if field.label == Label::Repeated {
                continue;
            }
            let target = match &field.typ {
                FieldType::Message(fqn) | FieldType::Group(fqn) => fqn.clone(),
                _ => continue,
            };
            let field_index = self.get_or_insert_index(target);
            self.graph.add_edge(msg_index, field_index, ());
        }
    }

    /// Returns true if `inner` is reachable from `outer` through singular
    /// message fields, i.e. embedding `outer` inside `inner` would close a
    /// cycle.
    pub fn is_nested(&self, outer: &str, inner: &str) -> bool {
        let outer = match self.index.get(outer) {
            Some(outer) => *outer,
            None => return false,
        };
        let inner = match self.index.get(inner) {
            Some(inner) => *inner,
            None => return false,
        };

        has_path_connecting(&self.graph, outer, inner, None)
    }
}
