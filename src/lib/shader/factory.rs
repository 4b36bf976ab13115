//! Material description compiler.
//!
//! A description is a sequence of directives, one per line:
//!
//! ```text
//! ScalarParameter Shininess 0.8
//! TextureSample Albedo textures/brick.png
//! Connect Albedo BaseColor
//! Connect Shininess Metallic
//! ```
//!
//! Lines are processed strictly in order. A failing line is recorded and skipped, the remaining
//! ones are still processed, and the compile as a whole only succeeds if every line did.

use super::{
    error::{Error, LineResult},
    graph::{Node, Unvalidated},
    parsing::tokenize,
    registry::{Context, Registry, REGISTRY},
};

use crate::{
    material::{Material, MaterialInputs, STANDARD_INPUTS},
    texture::TextureLoader,
};

use std::{
    ffi::OsStr,
    fmt::Display,
    fs,
    path::Path,
};

use log::{debug, info, warn};

/// Keyword of connection directives.
pub const CONNECT_CMD: &str = "Connect";

/// Extension of material description files.
pub const EXTENSION: &str = "mt";

/// Package materials are compiled into unless told otherwise.
pub const DEFAULT_PACKAGE: &str = "/Game/Material";

#[derive(Debug)]
/// A line which could not be processed.
pub struct LineError {
    /// 1-based line number.
    pub line: usize,
    /// Trimmed line content.
    pub text: String,
    #[allow(missing_docs)]
    pub error: Error,
}

impl Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {} (`{}`)", self.line, self.error, self.text)
    }
}

#[derive(Debug)]
/// Outcome of compiling a whole description.
pub struct CompileResult {
    /// Everything that could be built, even when some lines failed.
    pub material: Material<Unvalidated>,
    /// Whether every line succeeded. A failed compile should not be published.
    pub ok: bool,
    /// Failing lines, in order.
    pub errors: Vec<LineError>,
}

/// Compiles material descriptions against a fixed [Registry] and set of [MaterialInputs].
pub struct MaterialFactory<'a> {
    registry: &'a Registry,
    inputs: &'a MaterialInputs,
    textures: &'a dyn TextureLoader,
    package: String,
}

impl<'a> MaterialFactory<'a> {
    /// Factory accepting every node kind and material input.
    pub fn new(textures: &'a dyn TextureLoader) -> Self {
        Self {
            registry: &REGISTRY,
            inputs: &STANDARD_INPUTS,
            textures,
            package: DEFAULT_PACKAGE.to_owned(),
        }
    }

    /// Restrict the accepted node kinds.
    pub fn with_registry(mut self, registry: &'a Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Restrict the material inputs `Connect` directives can target.
    pub fn with_inputs(mut self, inputs: &'a MaterialInputs) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the package the material is created in. Imported textures land next to it.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    #[allow(missing_docs)]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Whether `path` looks like a material description.
    pub fn supports(path: &Path) -> bool {
        path.extension().and_then(OsStr::to_str) == Some(EXTENSION)
    }

    /// Start a line by line compile.
    pub fn begin(&self) -> Compilation<'_, 'a> {
        Compilation {
            factory: self,
            material: Material::new(),
            errors: Vec::new(),
            line: 0,
        }
    }

    /// Compile every line of a description.
    pub fn compile<I, S>(&self, lines: I) -> CompileResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compilation = self.begin();
        for line in lines {
            let _ = compilation.process_line(line.as_ref());
        }

        compilation.finish()
    }

    /// Read and compile a description file. Failing to read it is the only fatal error.
    pub fn compile_file(&self, path: &Path) -> Result<CompileResult, Error> {
        if !Self::supports(path) {
            return Err(Error::UnsupportedFormat(path.to_path_buf()));
        }

        info!("Compiling `{}` into `{}`", path.display(), self.package);
        Ok(self.compile(read_lines(path)?))
    }
}

/// Read a description, one string per line.
pub fn read_lines(path: &Path) -> Result<Vec<String>, Error> {
    fs::read_to_string(path)
        .map(|content| content.lines().map(str::to_owned).collect())
        .map_err(|source| Error::IoFailure {
            path: path.to_path_buf(),
            source,
        })
}

/// State of a single compile: the material being built and the failures met so far.
pub struct Compilation<'f, 'a> {
    factory: &'f MaterialFactory<'a>,
    material: Material<Unvalidated>,
    errors: Vec<LineError>,
    line: usize,
}

impl Compilation<'_, '_> {
    /// Material built so far.
    pub fn material(&self) -> &Material<Unvalidated> {
        &self.material
    }

    /// Process the next line of the description. A failure is recorded in the compile's
    /// errors, making the whole compile fail, and returned along with its line number.
    /// Blank lines are accepted and do nothing.
    pub fn process_line(&mut self, line: &str) -> Result<(), &LineError> {
        self.line += 1;
        debug!("{:>4}: {}", self.line, line.trim_end());

        let Err(error) = self.apply(line) else {
            return Ok(());
        };

        warn!("Line {}: {error}", self.line);
        self.errors.push(LineError {
            line: self.line,
            text: line.trim().to_owned(),
            error,
        });

        self.errors.last().map_or(Ok(()), Err)
    }

    fn apply(&mut self, line: &str) -> LineResult<()> {
        let tokens = tokenize(line)?;
        let Some((&command, args)) = tokens.split_first() else {
            return Ok(());
        };

        if command == CONNECT_CMD {
            let [source, slot] = <[&str; 2]>::try_from(args).map_err(|_| Error::ArityMismatch {
                context: CONNECT_CMD.to_owned(),
                expected: 2,
                got: args.len(),
            })?;

            return self.connect(source, slot);
        }

        self.add_node(command, args)
    }

    /// Connect the output of the node named `source` to `slot`, either a material input or a
    /// `<node><socket>` sub-input. Any previous connection of that slot is replaced; nothing
    /// changes on failure.
    fn connect(&mut self, source: &str, slot: &str) -> LineResult<()> {
        let source_id = self
            .material
            .graph()
            .find(source)
            .ok_or_else(|| Error::UndeclaredReference(source.to_owned()))?;

        if let Some(input) = self.factory.inputs.lookup(slot) {
            self.material.bind(input, source_id);
            debug!("Connected `{source}` to material input {input}");
            return Ok(());
        }

        let (target, socket) = self
            .material
            .graph()
            .socket(slot)
            .ok_or_else(|| Error::UnknownSlot(slot.to_owned()))?;

        let input = self
            .material
            .graph_mut()
            .node_mut(target)
            .and_then(|node| node.input_mut(socket))
            .ok_or_else(|| Error::UnknownSlot(slot.to_owned()))?;
        *input = Some(source_id);
        debug!("Connected `{source}` to {socket} of {target}");

        Ok(())
    }

    fn add_node(&mut self, keyword: &str, args: &[&str]) -> LineResult<()> {
        let (kind, constructor) = self
            .factory
            .registry
            .lookup(keyword)
            .ok_or_else(|| Error::UnknownKind(keyword.to_owned()))?;

        let schema = constructor.schema();
        let Some((&name, params)) = args
            .split_first()
            .filter(|(_name, params)| params.len() == schema.len())
        else {
            return Err(Error::ArityMismatch {
                context: kind.to_string(),
                expected: schema.len() + 1,
                got: args.len(),
            });
        };

        let expression = constructor.construct(
            params,
            &Context {
                graph: self.material.graph(),
                textures: self.factory.textures,
                package: &self.factory.package,
            },
        )?;

        let id = self.material.graph_mut().insert(Node::new(name, expression));
        debug!("Added {kind} `{name}` as {id}");

        Ok(())
    }

    /// End the compile.
    pub fn finish(self) -> CompileResult {
        let Self {
            material,
            errors,
            line,
            ..
        } = self;
        let ok = errors.is_empty();

        info!(
            "Compiled {line} line(s): {} node(s), {} connected input(s), {} error(s)",
            material.graph().nodes().len(),
            material.bindings().count(),
            errors.len()
        );

        CompileResult {
            material,
            ok,
            errors,
        }
    }
}
