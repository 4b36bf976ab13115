//! Texture sampling.

use log::debug;

use crate::shader::{
    error::{Error, LineResult},
    graph::{Expression, NodeKind},
    registry::{expect_params, Construct, Context},
};

/// Builds [Expression::TextureSample] nodes, importing the texture through the context's
/// [TextureLoader](crate::texture::TextureLoader). The coordinates can be connected afterwards
/// through `<name>Coordinates`.
pub struct TextureSample;

impl Construct for TextureSample {
    fn schema(&self) -> &'static [&'static str] {
        &["path"]
    }

    fn construct(&self, params: &[&str], context: &Context<'_>) -> LineResult<Expression> {
        let [path] = expect_params::<1>(NodeKind::TextureSample, params)?;

        let texture = context
            .textures
            .load(path, context.package)
            .map_err(|source| Error::ResourceLoadFailure {
                path: path.to_owned(),
                source,
            })?;
        debug!("Texture `{path}` imported as `{}`", texture.package);

        Ok(Expression::TextureSample {
            texture,
            coordinates: None,
        })
    }
}
