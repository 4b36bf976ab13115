#![warn(missing_docs)]

//! Library used by the matfactory tool. Compiles line-oriented material descriptions into a
//! material expression graph, importing the textures they reference along the way.

pub mod color;
pub mod material;
pub mod shader;
pub mod sink;
pub mod texture;
pub mod vector;

/// Types needed to compile and publish a material.
pub mod prelude {
    pub use crate::{
        color::LinearColor,
        material::{Material, MaterialInput, MaterialInputs, STANDARD_INPUTS},
        shader::{
            factory::{CompileResult, LineError, MaterialFactory},
            graph::{Expression, Graph, Node, NodeId, NodeKind, Unvalidated, Validated},
            registry::{Registry, REGISTRY},
            Error,
        },
        sink::{GraphSink, WriterSink},
        texture::{FileTextureLoader, Texture, TextureLoader},
        vector::{Vec2, Vec4},
    };
}
