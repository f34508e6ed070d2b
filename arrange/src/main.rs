use std::fs;
use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result, ensure};
use arrange::config::ArrangeConfig;
use arrange::io::cli::{Cli, LockArg};
use arrange::io::output::ArrangeOutput;
use arrange::opt::PlacementOrchestrator;
use arrange::opt::apply::{apply_configuration, groups_from_scene};
use arrange::opt::configuration::AxisLock;
use arrange::{EPOCH, io};
use clap::Parser as ClapParser;
use conduit_rs::io::catalog::Catalog;
use conduit_rs::io::export::export_project;
use conduit_rs::io::import::Importer;
use conduit_rs::io::dxf::scene_to_dxf;
use conduit_rs::io::svg::scene_to_svg;
use conduit_rs::physics::PhysicsEngine;
use log::{info, warn};
use thousands::Separable;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            ArrangeConfig::default()
        }
        Some(config_file) => {
            let file = File::open(config_file)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };
    config.validate()?;

    info!("[MAIN] Successfully parsed ArrangeConfig: {config:?}");

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no usable name")?;

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!("could not create solution folder: {:?}", args.solution_folder)
        })?;
    }

    let catalog = match &args.catalog_dir {
        Some(dir) => Catalog::load_dir(dir),
        None => Catalog::builtin(),
    };

    let ext_project = io::read_project(&args.input_file)?;
    let mut scene = Importer::new(catalog).import_project(&ext_project)?;

    let (groups, targets) = groups_from_scene(&scene);
    ensure!(!targets.is_empty(), "project contains no conduits to arrange");

    let lock = args.lock.map(|axis| match axis {
        LockArg::Width => AxisLock::width(scene.container().width()),
        LockArg::Height => AxisLock::height(scene.container().height()),
    });

    let orchestrator = PlacementOrchestrator::new(config);
    let best = orchestrator.compute_best_placement(&groups, lock)?;
    apply_configuration(&mut scene, &targets, &best)?;

    if let Some(max_ticks) = args.settle_ticks {
        let engine = PhysicsEngine::new(config.physics);
        let ticks = engine.settle(&mut scene, max_ticks, 1e-3);
        info!(
            "[MAIN] settled scene in {} ticks",
            ticks.separate_with_commas()
        );
    }

    {
        let project_path = args.solution_folder.join(format!("arranged_{input_stem}.json"));
        io::write_json(&export_project(&scene), &project_path)?;
    }

    {
        let output = ArrangeOutput {
            groups,
            lock,
            configuration: best.clone(),
            config,
        };
        let report_path = args.solution_folder.join(format!("placement_{input_stem}.json"));
        io::write_json(&output, &report_path)?;
    }

    {
        let title = format!("{:?}, score: {:.3}", best.strategy, best.composite_score());
        let svg = scene_to_svg(&scene, config.svg_draw_options, &title);
        let svg_path = args.solution_folder.join(format!("arranged_{input_stem}.svg"));
        io::write_svg(&svg, &svg_path)?;
    }

    {
        let drawing = scene_to_dxf(&scene, config.dxf_draw_options);
        let dxf_path = args.solution_folder.join(format!("arranged_{input_stem}.dxf"));
        io::write_dxf(&drawing, &dxf_path)?;
    }

    info!(
        "[MAIN] done in {:.3}s",
        EPOCH.elapsed().as_secs_f64()
    );

    Ok(())
}
