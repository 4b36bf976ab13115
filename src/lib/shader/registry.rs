//! Node kind registry: maps a kind keyword to the constructor building its [Expression].

use super::{
    error::{Error, LineResult},
    graph::{BinaryOp, Expression, Graph, NodeKind, Unvalidated},
    nodes::{math, parameters, texture, time},
};

use crate::texture::TextureLoader;

use std::{collections::BTreeMap, fmt::Debug};

/// Everything a constructor may look at while building a node.
pub struct Context<'a> {
    /// Graph built so far, used to resolve references.
    pub graph: &'a Graph<Unvalidated>,
    /// Texture import collaborator.
    pub textures: &'a dyn TextureLoader,
    /// Package of the material being compiled.
    pub package: &'a str,
}

/// Type-specific node constructor.
pub trait Construct: Send + Sync {
    /// Names of the parameters expected after the node name, in order.
    fn schema(&self) -> &'static [&'static str];

    /// Build the node's attributes from its parameter tokens.
    fn construct(&self, params: &[&str], context: &Context<'_>) -> LineResult<Expression>;
}

/// Split `params` into exactly `N` tokens.
pub(crate) fn expect_params<'p, const N: usize>(
    kind: NodeKind,
    params: &[&'p str],
) -> LineResult<[&'p str; N]> {
    <[&'p str; N]>::try_from(params).map_err(|_| Error::ArityMismatch {
        context: kind.to_string(),
        expected: N,
        got: params.len(),
    })
}

fn constructor(kind: NodeKind) -> Box<dyn Construct> {
    match kind {
        NodeKind::VectorParameter => Box::new(parameters::VectorParameter),
        NodeKind::ScalarParameter => Box::new(parameters::ScalarParameter),
        NodeKind::Constant2Vector => Box::new(parameters::Constant2Vector),
        NodeKind::TextureSample => Box::new(texture::TextureSample),
        NodeKind::Time => Box::new(time::Time),
        NodeKind::Panner => Box::new(time::Panner),
        NodeKind::Sine => Box::new(math::Sine),
        NodeKind::Add => Box::new(math::Arithmetic(BinaryOp::Add)),
        NodeKind::Subtract => Box::new(math::Arithmetic(BinaryOp::Subtract)),
        NodeKind::Multiply => Box::new(math::Arithmetic(BinaryOp::Multiply)),
        NodeKind::Divide => Box::new(math::Arithmetic(BinaryOp::Divide)),
    }
}

/// Read-only table of the node kinds a compile accepts.
pub struct Registry {
    constructors: BTreeMap<NodeKind, Box<dyn Construct>>,
}

impl Registry {
    /// Every known kind.
    pub fn standard() -> Self {
        Self::with_kinds(NodeKind::ALL.iter().copied())
    }

    /// Only the given kinds, for hosts supporting a subset of expressions.
    pub fn with_kinds(kinds: impl IntoIterator<Item = NodeKind>) -> Self {
        Self {
            constructors: kinds
                .into_iter()
                .map(|kind| (kind, constructor(kind)))
                .collect(),
        }
    }

    /// Constructor registered for a kind keyword.
    pub fn lookup(&self, kind: &str) -> Option<(NodeKind, &dyn Construct)> {
        let kind = kind.parse::<NodeKind>().ok()?;
        self.constructors
            .get(&kind)
            .map(|constructor| (kind, constructor.as_ref()))
    }

    /// Registered kinds along with their parameter schema.
    pub fn kinds(&self) -> impl Iterator<Item = (NodeKind, &'static [&'static str])> + '_ {
        self.constructors
            .iter()
            .map(|(kind, constructor)| (*kind, constructor.schema()))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.constructors.keys())
            .finish()
    }
}

lazy_static::lazy_static! {
    /// Registry shared by every compile, built on first use and never modified afterwards.
    pub static ref REGISTRY: Registry = Registry::standard();
}
