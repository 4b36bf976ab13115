//! Flat, arena-backed [Graph] of material expression nodes.
//!
//! Nodes never own each other: every link between two nodes is a [NodeId] indexing into the
//! graph's arena, and the name table only ever maps a [Name] to the latest node declared with it.

use crate::{color::LinearColor, texture::Texture, vector::Vec2};

use std::{
    borrow::Borrow,
    collections::{HashMap, HashSet},
    fmt,
    marker::PhantomData,
    str::FromStr,
};

use derive_more::Display;

macro_rules! node_kinds {
    { $($(#[$attr:meta])* $kind:ident $([$($socket:literal),+])?),+ $(,)? } => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        /// Every node kind a description line can instantiate.
        pub enum NodeKind {
            $(
                $(#[$attr])*
                $kind,
            )+
        }

        impl NodeKind {
            /// All kinds, in registration order.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind),+];

            /// Keyword used in description lines.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind),)+
                }
            }

            /// Sub-inputs which can be bound later on through a compound `<node><socket>`
            /// slot name.
            pub fn sockets(&self) -> &'static [&'static str] {
                match self {
                    $(NodeKind::$kind => &[$($($socket),+)?],)+
                }
            }
        }

        impl FromStr for NodeKind {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $(stringify!($kind) => Self::$kind,)+
                    other => Err(format!("Unrecognized node kind `{other}`."))?,
                })
            }
        }
    };
}

node_kinds! {
    /// RGBA parameter with a default value.
    VectorParameter,
    /// Texture lookup, optionally driven by a coordinate input.
    TextureSample ["Coordinates"],
    /// Scalar parameter with a default value.
    ScalarParameter,
    /// Elapsed time source.
    Time,
    /// Coordinate scrolling over time.
    Panner ["Coordinate", "Speed", "Time"],
    /// Two-channel constant.
    Constant2Vector,
    /// Sine of its input.
    Sine,
    #[allow(missing_docs)]
    Add,
    #[allow(missing_docs)]
    Subtract,
    #[allow(missing_docs)]
    Multiply,
    #[allow(missing_docs)]
    Divide,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display(fmt = "#{}", _0)]
/// Stable index of a [Node] inside its [Graph]'s arena.
pub struct NodeId(usize);

impl NodeId {
    /// Position in [Graph::nodes].
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Default, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Wrapper around [String].
pub struct Name(String);
impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
impl From<String> for Name {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl From<&Name> for String {
    fn from(name: &Name) -> Self {
        name.0.clone()
    }
}
impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}
impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Operand of an arithmetic node: either a constant default or a live input.
pub enum Operand {
    /// Numeric literal.
    Constant(f32),
    /// Output of another node.
    Node(NodeId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
/// Arithmetic operation performed by a binary node.
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    /// [NodeKind] instantiating this operation.
    pub fn kind(&self) -> NodeKind {
        match self {
            BinaryOp::Add => NodeKind::Add,
            BinaryOp::Subtract => NodeKind::Subtract,
            BinaryOp::Multiply => NodeKind::Multiply,
            BinaryOp::Divide => NodeKind::Divide,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Kind-specific attributes of a [Node].
pub enum Expression {
    #[allow(missing_docs)]
    VectorParameter { default: LinearColor },
    #[allow(missing_docs)]
    ScalarParameter { default: f32 },
    /// Sampled texture, the coordinates defaulting to the mesh UVs when unbound.
    TextureSample {
        #[allow(missing_docs)]
        texture: Texture,
        #[allow(missing_docs)]
        coordinates: Option<NodeId>,
    },
    #[allow(missing_docs)]
    Time,
    #[allow(missing_docs)]
    Panner {
        coordinate: Option<NodeId>,
        speed: Option<NodeId>,
        time: Option<NodeId>,
    },
    #[allow(missing_docs)]
    Constant2Vector { value: Vec2 },
    #[allow(missing_docs)]
    Sine { input: NodeId },
    #[allow(missing_docs)]
    Binary { op: BinaryOp, a: Operand, b: Operand },
}

impl Expression {
    /// [NodeKind] this expression was built from.
    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::VectorParameter { .. } => NodeKind::VectorParameter,
            Expression::ScalarParameter { .. } => NodeKind::ScalarParameter,
            Expression::TextureSample { .. } => NodeKind::TextureSample,
            Expression::Time => NodeKind::Time,
            Expression::Panner { .. } => NodeKind::Panner,
            Expression::Constant2Vector { .. } => NodeKind::Constant2Vector,
            Expression::Sine { .. } => NodeKind::Sine,
            Expression::Binary { op, .. } => op.kind(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A single named material expression.
pub struct Node {
    /// Identifier given on the construction line.
    pub name: Name,
    /// Typed attributes.
    pub expression: Expression,
}

impl Node {
    #[allow(missing_docs)]
    pub fn new(name: impl Into<Name>, expression: Expression) -> Self {
        Self {
            name: name.into(),
            expression,
        }
    }

    #[inline]
    #[allow(missing_docs)]
    pub fn kind(&self) -> NodeKind {
        self.expression.kind()
    }

    /// Bindable sub-input matching one of [NodeKind::sockets].
    pub fn input_mut(&mut self, socket: &str) -> Option<&mut Option<NodeId>> {
        match (&mut self.expression, socket) {
            (Expression::TextureSample { coordinates, .. }, "Coordinates") => Some(coordinates),
            (Expression::Panner { coordinate, .. }, "Coordinate") => Some(coordinate),
            (Expression::Panner { speed, .. }, "Speed") => Some(speed),
            (Expression::Panner { time, .. }, "Time") => Some(time),
            _ => None,
        }
    }

    /// Every input currently linked to another node, with the socket it comes through.
    pub fn links(&self) -> Vec<(&'static str, NodeId)> {
        let operand = |socket, operand: &Operand| match operand {
            Operand::Node(id) => Some((socket, *id)),
            Operand::Constant(_) => None,
        };

        match &self.expression {
            Expression::TextureSample { coordinates, .. } => {
                coordinates.map(|id| ("Coordinates", id)).into_iter().collect()
            }
            Expression::Panner {
                coordinate,
                speed,
                time,
            } => [
                coordinate.map(|id| ("Coordinate", id)),
                speed.map(|id| ("Speed", id)),
                time.map(|id| ("Time", id)),
            ]
            .into_iter()
            .flatten()
            .collect(),
            Expression::Sine { input } => vec![("Input", *input)],
            Expression::Binary { a, b, .. } => [operand("A", a), operand("B", b)]
                .into_iter()
                .flatten()
                .collect(),
            Expression::VectorParameter { .. }
            | Expression::ScalarParameter { .. }
            | Expression::Time
            | Expression::Constant2Vector { .. } => vec![],
        }
    }
}

macro_rules! states {
    ($($(#[$attr:meta])* $state:ident),+ $(,)?) => {
        $(
            #[derive(Clone, Debug, Default, PartialEq)]
            $(#[$attr])*
            pub struct $state;
        )+
    };
}
states! {
    /// Built line by line, may contain cycles introduced by connections.
    Unvalidated,
    /// Checked for cycles, safe to hand over to a renderer.
    Validated,
}

#[derive(Debug, PartialEq, thiserror::Error)]
/// [Graph] validation error
pub enum Error {
    #[error("Detected a cycle while validating the path {}; `{}` is reached again through its `{socket}` input",
        .during.iter().map(|name| name.to_string()).collect::<Vec<_>>().join(" -> "), .detected)]
    /// Detected a cycle on the node with the given [Name].
    Cycle {
        /// Current path.
        during: Vec<Name>,
        /// Socket of the last node on the path leading back into it.
        socket: &'static str,
        /// Node detected as already visited in the current path.
        detected: Name,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Flat graph data structure state machine implementation.
pub struct Graph<State> {
    nodes: Vec<Node>,
    names: HashMap<Name, NodeId>,
    sockets: HashMap<Name, (NodeId, &'static str)>,

    /// Current state
    pub state: PhantomData<State>,
}

impl<State> Graph<State> {
    /// Every node ever built, including the ones whose name was later redeclared.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[allow(missing_docs)]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Latest node declared under `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Same as [Graph::find] but returns the node itself.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.find(name).and_then(|id| self.node(id))
    }

    /// Name table entries count, i.e. nodes reachable by name.
    pub fn named_len(&self) -> usize {
        self.names.len()
    }

    /// Node and socket behind a compound `<node><socket>` slot name.
    pub fn socket(&self, slot: &str) -> Option<(NodeId, &'static str)> {
        self.sockets.get(slot).copied()
    }
}

impl Graph<Unvalidated> {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node to the arena, make its name point to it and expose its sub-inputs.
    ///
    /// A previous node with the same name stays in the arena but is no longer reachable by name.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());

        for socket in node.kind().sockets() {
            self.sockets
                .insert(format!("{}{socket}", node.name).into(), (id, *socket));
        }

        self.names.insert(node.name.clone(), id);
        self.nodes.push(node);

        id
    }

    #[allow(missing_docs)]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Check the [unvalidated](Unvalidated) [Graph] for cycles.
    pub fn validate(self) -> Result<Graph<Validated>, Error> {
        let mut done: HashSet<NodeId> = HashSet::new();

        for index in 0..self.nodes.len() {
            self.visit(NodeId(index), &mut done)?;
        }

        Ok(self.assume_valid())
    }

    /// Mark the graph as validated without looking for cycles.
    pub fn assume_valid(self) -> Graph<Validated> {
        let Self {
            nodes,
            names,
            sockets,
            state: _state,
        } = self;

        Graph {
            nodes,
            names,
            sockets,
            state: PhantomData::<Validated>,
        }
    }

    /// Depth-first walk from `start`, keeping the current path on an explicit stack so that
    /// long chains cannot exhaust the call stack.
    fn visit(&self, start: NodeId, done: &mut HashSet<NodeId>) -> Result<(), Error> {
        if done.contains(&start) {
            return Ok(());
        }

        let links_of = |id: NodeId| {
            self.node(id)
                .map(Node::links)
                .unwrap_or_default()
                .into_iter()
        };

        let mut stack = vec![(start, links_of(start))];
        let mut on_path = HashSet::from([start]);

        while let Some((id, pending)) = stack.last_mut() {
            let id = *id;
            let Some((socket, next)) = pending.next() else {
                on_path.remove(&id);
                done.insert(id);
                stack.pop();
                continue;
            };

            if on_path.contains(&next) {
                let name = |id: NodeId| {
                    self.node(id)
                        .map(|node| node.name.clone())
                        .unwrap_or_else(|| id.to_string().into())
                };

                return Err(Error::Cycle {
                    during: stack.iter().map(|(id, _)| name(*id)).collect(),
                    socket,
                    detected: name(next),
                });
            }

            if !done.contains(&next) {
                on_path.insert(next);
                stack.push((next, links_of(next)));
            }
        }

        Ok(())
    }
}

impl<State> fmt::Display for Graph<State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = |id: NodeId| {
            self.node(id)
                .map_or_else(|| id.to_string(), |node| node.name.to_string())
        };
        let operand = |operand: &Operand| match operand {
            Operand::Constant(value) => value.to_string(),
            Operand::Node(id) => name(*id),
        };
        let link = |link: &Option<NodeId>| link.map_or_else(|| "-".to_string(), name);

        for (index, node) in self.nodes.iter().enumerate() {
            let shadowed = self.find(node.name.as_ref()) != Some(NodeId(index));

            write!(f, "{} {}", node.kind(), node.name)?;
            match &node.expression {
                Expression::VectorParameter { default } => write!(f, " = {default}")?,
                Expression::ScalarParameter { default } => write!(f, " = {default}")?,
                Expression::TextureSample {
                    texture,
                    coordinates,
                } => write!(f, " <- {} (Coordinates: {})", texture, link(coordinates))?,
                Expression::Time => {}
                Expression::Panner {
                    coordinate,
                    speed,
                    time,
                } => write!(
                    f,
                    " (Coordinate: {}, Speed: {}, Time: {})",
                    link(coordinate),
                    link(speed),
                    link(time)
                )?,
                Expression::Constant2Vector { value } => write!(f, " = {value}")?,
                Expression::Sine { input } => write!(f, " (Input: {})", name(*input))?,
                Expression::Binary { a, b, .. } => {
                    write!(f, " (A: {}, B: {})", operand(a), operand(b))?
                }
            }
            if shadowed {
                write!(f, " [shadowed]")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scalar(name: &str, default: f32) -> Node {
        Node::new(name, Expression::ScalarParameter { default })
    }

    #[test]
    fn kind_keywords() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.as_str().parse::<NodeKind>(), Ok(*kind));
        }

        assert!("Lerp".parse::<NodeKind>().is_err());
        assert_eq!(NodeKind::ALL.len(), 11);
    }

    #[test]
    fn redeclaration_shadows() {
        let mut graph = Graph::new();
        let first = graph.insert(scalar("X", 0.5));
        let second = graph.insert(scalar("X", 0.9));

        assert_ne!(first, second);
        assert_eq!(graph.find("X"), Some(second));
        assert_eq!(graph.named_len(), 1);
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(
            graph.get("X").map(|node| &node.expression),
            Some(&Expression::ScalarParameter { default: 0.9 })
        );
    }

    #[test]
    fn sockets_follow_latest_declaration() {
        let mut graph = Graph::new();
        let panner = Expression::Panner {
            coordinate: None,
            speed: None,
            time: None,
        };

        graph.insert(Node::new("P", panner.clone()));
        let latest = graph.insert(Node::new("P", panner));

        assert_eq!(graph.socket("PSpeed"), Some((latest, "Speed")));
        assert_eq!(graph.socket("PCoordinate"), Some((latest, "Coordinate")));
        assert_eq!(graph.socket("PCoordinates"), None);
        assert_eq!(graph.socket("Speed"), None);
    }

    #[cfg(test)]
    mod cycle_detection {
        use super::*;

        #[test]
        fn no_cycle() {
            let mut graph = Graph::new();
            let time = graph.insert(Node::new("T", Expression::Time));
            graph.insert(Node::new("S", Expression::Sine { input: time }));
            let panner = graph.insert(Node::new(
                "P",
                Expression::Panner {
                    coordinate: None,
                    speed: None,
                    time: Some(time),
                },
            ));
            graph.insert(Node::new(
                "Sum",
                Expression::Binary {
                    op: BinaryOp::Add,
                    a: Operand::Node(panner),
                    b: Operand::Constant(1.),
                },
            ));

            let validation_result = graph.validate();
            assert!(
                validation_result.is_ok(),
                "Expected a success, got `{validation_result:?}`"
            );
        }

        #[test]
        fn self_cycle() {
            let mut graph = Graph::new();
            let panner = graph.insert(Node::new(
                "P",
                Expression::Panner {
                    coordinate: None,
                    speed: None,
                    time: None,
                },
            ));
            *graph
                .node_mut(panner)
                .and_then(|node| node.input_mut("Coordinate"))
                .unwrap() = Some(panner);

            let expected = Error::Cycle {
                during: vec!["P".into()],
                socket: "Coordinate",
                detected: "P".into(),
            };

            assert_eq!(graph.validate().unwrap_err(), expected);
        }

        #[test]
        fn cycle() {
            let mut graph = Graph::new();
            let panner = graph.insert(Node::new(
                "P",
                Expression::Panner {
                    coordinate: None,
                    speed: None,
                    time: None,
                },
            ));
            let sine = graph.insert(Node::new("S", Expression::Sine { input: panner }));
            *graph
                .node_mut(panner)
                .and_then(|node| node.input_mut("Time"))
                .unwrap() = Some(sine);

            let expected = Error::Cycle {
                during: vec!["P".into(), "S".into()],
                socket: "Input",
                detected: "P".into(),
            };

            assert_eq!(graph.validate().unwrap_err(), expected);
        }

        fn chain(len: usize) -> (Graph<Unvalidated>, NodeId, NodeId) {
            let mut graph = Graph::new();
            let head = graph.insert(Node::new(
                "P",
                Expression::Panner {
                    coordinate: None,
                    speed: None,
                    time: None,
                },
            ));

            let mut last = head;
            for k in 1..len {
                last = graph.insert(Node::new(
                    format!("N{k}"),
                    Expression::Binary {
                        op: BinaryOp::Add,
                        a: Operand::Node(last),
                        b: Operand::Constant(1.),
                    },
                ));
            }

            (graph, head, last)
        }

        #[test]
        fn long_chain() {
            let (graph, _, _) = chain(200_000);
            assert!(graph.validate().is_ok());
        }

        #[test]
        fn long_cycle() {
            let (mut graph, head, last) = chain(100_000);
            *graph
                .node_mut(head)
                .and_then(|node| node.input_mut("Time"))
                .unwrap() = Some(last);

            let Err(Error::Cycle {
                during,
                socket,
                detected,
            }) = graph.validate()
            else {
                panic!("Expected a cycle");
            };

            assert_eq!(during.len(), 100_000);
            assert_eq!(socket, "A");
            assert_eq!(detected, Name::from("P"));
        }
    }
}
