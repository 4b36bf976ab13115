//! Destinations for compiled materials.

use std::io::{self, Write};

use anyhow::Context;

use crate::{
    material::Material,
    shader::graph::{Expression, Validated},
};

/// Host environment receiving validated materials.
pub trait GraphSink {
    /// Hand a material over to the host under `name`.
    fn publish(&mut self, name: &str, material: &Material<Validated>) -> anyhow::Result<()>;
}

/// Writes a human readable listing of each published material.
pub struct WriterSink<W: Write> {
    writer: W,
    published: usize,
}

impl<W: Write> WriterSink<W> {
    #[allow(missing_docs)]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            published: 0,
        }
    }

    /// Number of materials published so far.
    pub fn published(&self) -> usize {
        self.published
    }

    #[allow(missing_docs)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> WriterSink<W> {
    fn write_listing(&mut self, name: &str, material: &Material<Validated>) -> io::Result<()> {
        writeln!(self.writer, "Material `{name}`")?;
        write!(self.writer, "{material}")?;

        for node in material.graph().nodes() {
            if let Expression::TextureSample { texture, .. } = &node.expression {
                writeln!(self.writer, "texture {texture}")?;
            }
        }

        self.writer.flush()
    }
}

impl<W: Write> GraphSink for WriterSink<W> {
    fn publish(&mut self, name: &str, material: &Material<Validated>) -> anyhow::Result<()> {
        self.write_listing(name, material)
            .with_context(|| format!("Could not publish material `{name}`"))?;

        self.published += 1;
        Ok(())
    }
}
