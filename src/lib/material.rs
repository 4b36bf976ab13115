//! Material definition: an expression [Graph] plus the material inputs bound to its nodes.

use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
    str::FromStr,
};

use crate::shader::graph::{self, Graph, Node, NodeId, Unvalidated, Validated};

macro_rules! material_inputs {
    ($($(#[$attr:meta])* $input:ident),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
        /// Material input slots a node output can be connected to.
        pub enum MaterialInput {
            $(
                $(#[$attr])*
                $input,
            )+
        }

        impl MaterialInput {
            /// Every input a material exposes.
            pub const ALL: &'static [MaterialInput] = &[$(MaterialInput::$input),+];

            /// Slot name used by `Connect` directives.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(MaterialInput::$input => stringify!($input),)+
                }
            }
        }

        impl FromStr for MaterialInput {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $(stringify!($input) => Self::$input,)+
                    other => Err(format!("Unrecognized material input `{other}`."))?,
                })
            }
        }
    };
}

material_inputs! {
    #[allow(missing_docs)]
    BaseColor,
    #[allow(missing_docs)]
    Metallic,
    #[allow(missing_docs)]
    Specular,
    #[allow(missing_docs)]
    Roughness,
    #[allow(missing_docs)]
    EmissiveColor,
    /// Tangent-space normal.
    Normal,
    /// Vertex offset, in world space.
    WorldPositionOffset,
    #[allow(missing_docs)]
    AmbientOcclusion,
}

impl Display for MaterialInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Inputs a host material actually exposes. Fixed before compiling, never modified by it.
pub struct MaterialInputs(HashSet<MaterialInput>);

impl MaterialInputs {
    /// Only accept the given inputs.
    pub fn new(inputs: impl IntoIterator<Item = MaterialInput>) -> Self {
        Self(inputs.into_iter().collect())
    }

    /// Resolve a slot name, failing for inputs the host does not expose.
    pub fn lookup(&self, slot: &str) -> Option<MaterialInput> {
        slot.parse().ok().filter(|input| self.0.contains(input))
    }

    #[allow(missing_docs)]
    pub fn contains(&self, input: MaterialInput) -> bool {
        self.0.contains(&input)
    }
}

impl Default for MaterialInputs {
    fn default() -> Self {
        Self::new(MaterialInput::ALL.iter().copied())
    }
}

lazy_static::lazy_static! {
    /// Every standard surface input.
    pub static ref STANDARD_INPUTS: MaterialInputs = MaterialInputs::default();
}

#[derive(Debug, Clone, Default, PartialEq)]
/// A compiled material, to be handed over to a [GraphSink](crate::sink::GraphSink).
pub struct Material<State> {
    graph: Graph<State>,
    bindings: BTreeMap<MaterialInput, NodeId>,
}

impl<State> Material<State> {
    /// Expression graph.
    pub fn graph(&self) -> &Graph<State> {
        &self.graph
    }

    /// Node currently connected to `input`.
    pub fn binding(&self, input: MaterialInput) -> Option<&Node> {
        self.bindings
            .get(&input)
            .and_then(|id| self.graph.node(*id))
    }

    /// Every connected input, in declaration order of [MaterialInput].
    pub fn bindings(&self) -> impl Iterator<Item = (MaterialInput, &Node)> + '_ {
        self.bindings
            .iter()
            .filter_map(|(input, id)| self.graph.node(*id).map(|node| (*input, node)))
    }
}

impl Material<Unvalidated> {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(missing_docs)]
    pub fn graph_mut(&mut self) -> &mut Graph<Unvalidated> {
        &mut self.graph
    }

    /// Connect `input` to a node output, replacing any previous connection.
    pub fn bind(&mut self, input: MaterialInput, node: NodeId) -> Option<NodeId> {
        self.bindings.insert(input, node)
    }

    /// Check the underlying graph for cycles.
    pub fn validate(self) -> Result<Material<Validated>, graph::Error> {
        let Self { graph, bindings } = self;

        Ok(Material {
            graph: graph.validate()?,
            bindings,
        })
    }

    /// Same as [Material::validate], skipping cycle detection.
    pub fn assume_valid(self) -> Material<Validated> {
        Material {
            graph: self.graph.assume_valid(),
            bindings: self.bindings,
        }
    }
}

impl<State> Display for Material<State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.graph)?;
        for (input, node) in self.bindings() {
            writeln!(f, "{input} <- {}", node.name)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shader::graph::Expression;

    #[test]
    fn slot_lookup() {
        assert_eq!(STANDARD_INPUTS.lookup("Metallic"), Some(MaterialInput::Metallic));
        assert_eq!(STANDARD_INPUTS.lookup("metallic"), None);
        assert_eq!(STANDARD_INPUTS.lookup("Opacity"), None);

        let restricted = MaterialInputs::new([MaterialInput::BaseColor]);
        assert_eq!(restricted.lookup("BaseColor"), Some(MaterialInput::BaseColor));
        assert_eq!(restricted.lookup("Roughness"), None);
    }

    #[test]
    fn rebinding_overwrites() {
        let mut material = Material::new();
        let first = material
            .graph_mut()
            .insert(Node::new("A", Expression::ScalarParameter { default: 0. }));
        let second = material
            .graph_mut()
            .insert(Node::new("B", Expression::ScalarParameter { default: 1. }));

        assert_eq!(material.bind(MaterialInput::Roughness, first), None);
        assert_eq!(material.bind(MaterialInput::Roughness, second), Some(first));
        assert_eq!(
            material
                .binding(MaterialInput::Roughness)
                .map(|node| node.name.to_string()),
            Some("B".to_string())
        );
        assert_eq!(material.bindings().count(), 1);
    }
}
