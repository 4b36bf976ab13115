use std::{
    io,
    path::{Path, PathBuf},
    process,
};

use anyhow::{bail, Context};
use clap::Parser;
use log::{error, info};

use matfactory::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "matfactory")]
#[command(about = "Compile material descriptions (.mt) into material graphs")]
struct Args {
    /// Material descriptions to compile
    #[arg(required_unless_present = "list_kinds")]
    files: Vec<PathBuf>,

    /// Print the accepted node kinds with their parameters and exit
    #[arg(long = "list-kinds")]
    list_kinds: bool,

    /// Publish graphs without checking them for cycles
    #[arg(long = "no-validate")]
    no_validate: bool,

    /// Package directory materials are created in
    #[arg(long = "package", default_value = "/Game/Materials")]
    package: String,
}

fn list_kinds(registry: &Registry) {
    for (kind, schema) in registry.kinds() {
        let sockets = kind.sockets();
        if sockets.is_empty() {
            println!("{kind} <name> {}", schema.join(" "));
        } else {
            println!(
                "{kind} <name> {} (inputs: {})",
                schema.join(" "),
                sockets.join(", ")
            );
        }
    }
}

fn material_name(path: &Path) -> anyhow::Result<&str> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("`{}` has no usable file name", path.display()))
}

fn build(path: &Path, args: &Args, sink: &mut dyn GraphSink) -> anyhow::Result<()> {
    let name = material_name(path)?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let textures = FileTextureLoader::relative_to(root);

    let factory = MaterialFactory::new(&textures)
        .with_package(format!("{}/{name}", args.package.trim_end_matches('/')));
    let result = factory.compile_file(path)?;

    if !result.ok {
        for line_error in &result.errors {
            error!("{}:{line_error}", path.display());
        }
        bail!(
            "`{}` failed to compile with {} error(s)",
            path.display(),
            result.errors.len()
        );
    }

    let material = if args.no_validate {
        result.material.assume_valid()
    } else {
        result
            .material
            .validate()
            .with_context(|| format!("`{}` is not a valid material", path.display()))?
    };

    sink.publish(name, &material)?;
    info!("Published `{name}` to `{}`", factory.package());

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_kinds {
        list_kinds(&REGISTRY);
        return;
    }

    let mut sink = WriterSink::new(io::stdout());
    let mut failures = 0;
    for path in &args.files {
        if let Err(err) = build(path, &args, &mut sink) {
            error!("{err:#}");
            failures += 1;
        }
    }

    info!(
        "{} material(s) published, {failures} failed",
        sink.published()
    );

    if failures > 0 {
        process::exit(1);
    }
}
