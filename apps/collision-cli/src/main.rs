mod scene;

use clap::{Parser, Subcommand};
use collision_common::{Shape, Transform};
use collision_tools::WorldInspector;
use collision_world::{ChangeLog, SubframeMap, World};
use scene::SceneFile;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "collision-cli", about = "CLI tool for collision world scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load a scene file and print its objects
    Inspect {
        /// Scene file (YAML, or JSON with a .json extension)
        scene: PathBuf,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve "<object>" or "<object>/<subframe>" to a world-frame transform
    Transform {
        scene: PathBuf,
        path: String,
    },
    /// Run a scripted sequence of edits and print the change notifications
    Demo,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("collision-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("world: objects={}", World::new().size());
            println!("tools: {}", collision_tools::crate_info());
        }
        Commands::Inspect { scene, json } => {
            let world = SceneFile::load(&scene)?.build_world()?;
            let summary = WorldInspector::summary(&world);
            let objects: Vec<_> = WorldInspector::list_objects(&world)
                .iter()
                .filter_map(|id| WorldInspector::inspect_object(&world, id))
                .collect();
            if json {
                let doc = serde_json::json!({ "summary": summary, "objects": objects });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("{summary}");
                for info in &objects {
                    println!("  {info}");
                    for (i, shape) in info.shapes.iter().enumerate() {
                        println!(
                            "    [{i}] {} global=({:.3}, {:.3}, {:.3})",
                            shape.kind, shape.global[0], shape.global[1], shape.global[2]
                        );
                    }
                }
            }
        }
        Commands::Transform { scene, path } => {
            let world = SceneFile::load(&scene)?.build_world()?;
            let Some(t) = world.get_transform(&path) else {
                anyhow::bail!("unknown frame '{path}'");
            };
            let p = t.translation;
            let r = t.rotation;
            println!("{path}: translation=({}, {}, {})", p.x, p.y, p.z);
            println!("{path}: rotation=({}, {}, {}, {})", r.x, r.y, r.z, r.w);
        }
        Commands::Demo => run_demo(),
    }

    Ok(())
}

fn run_demo() {
    let mut world = World::new();
    let (log, _handle) = ChangeLog::attach(&mut world);

    let cuboid = Shape::cuboid(1.0, 1.0, 1.0);
    let cyl = Shape::cylinder(0.5, 3.0);

    world.set_object_pose("mix1", Transform::IDENTITY);
    world.add_to_object("mix1", cuboid.clone(), Transform::IDENTITY);
    world.add_to_object("mix1", cyl.clone(), Transform::from_xyz(0.0, 0.0, 2.0));
    world.add_to_object("obj3", cuboid.clone(), Transform::IDENTITY);

    let mut subframes = SubframeMap::new();
    subframes.insert("frame1".into(), Transform::from_xyz(0.0, 0.0, 2.0));
    world.set_subframes_of_object("mix1", subframes);

    let before = world.get_object("mix1");
    world.set_object_pose("mix1", Transform::from_xyz(0.0, 0.0, 1.0));
    world.move_object("mix1", Transform::from_xyz(0.0, 0.0, 1.0));
    world.move_shape_in_object("mix1", &cyl, Transform::from_xyz(0.0, 0.0, 3.0));
    world.remove_shape_from_object("obj3", &cuboid);

    for change in log.events() {
        println!(
            "{:<8} {:<28} shapes={} z={}",
            change.id,
            change.action.to_string(),
            change.shape_count,
            change.pose.translation.z
        );
    }

    let (frame1, _) = world.transform_or_identity("mix1/frame1");
    println!("mix1/frame1 z={}", frame1.translation.z);
    if let Some(before) = before {
        println!(
            "snapshot taken before moves still has cylinder at z={}",
            before.shape_poses[1].translation.z
        );
    }
    println!("{}", WorldInspector::summary(&world));
}
