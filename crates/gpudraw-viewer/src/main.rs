use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use gpudraw_engine::assets::{AssetPaths, DirSource};
use gpudraw_engine::logging::{LoggingConfig, init_logging};
use gpudraw_engine::window::Runtime;

mod args;
mod demo;

use args::Args;
use demo::{Demo, MeshSelector};

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(
        args.log
            .clone()
            .map(LoggingConfig::with_filter)
            .unwrap_or_default(),
    );

    let source = DirSource::new(&args.assets);
    let available = source
        .list_stems(Path::new(AssetPaths::MESH_DIR), "obj")
        .unwrap_or_else(|e| {
            log::warn!(
                "can't list meshes in {}: {e}",
                source.root().join(AssetPaths::MESH_DIR).display()
            );
            Vec::new()
        });
    let meshes = MeshSelector::new(available, &args.mesh);
    log::info!("mesh `{}` selected; Tab cycles, Esc quits", meshes.current());

    let demo = Demo::new(
        source,
        args.asset_paths(),
        args.render_settings(),
        meshes,
    );

    match Runtime::run(args.runtime_config(), args.gpu_init(), demo) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
