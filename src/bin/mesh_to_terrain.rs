//! Mesh to terrain converter — samples an OBJ mesh into a heightmap.
//!
//! Usage: cargo run --release --bin mesh_to_terrain -- --input <MESH.obj> [OPTIONS]
//!
//! Options:
//!   --input <PATH>       Source mesh (Wavefront OBJ), required
//!   --output <DIR>       Output directory (default: "terrain")
//!   --name <NAME>        Output file stem (default: mesh file stem)
//!   --config <PATH>      JSON sampling parameters; flags below override it
//!   --resolution <N>     Heightmap resolution (default: 512)
//!   --pad-x <X>          Extra terrain width (default: 0)
//!   --pad-y <Y>          Extra terrain height / headroom (default: 0)
//!   --pad-z <Z>          Extra terrain depth (default: 0)
//!   --shift <S>          Vertical shift added to every height, usually -1..1 (default: 0)
//!   --mode <MODE>        bottom-up | top-down (default: bottom-up)
//!   --format <FMT>       raw | png (default: raw)
//!   --scale <S>          Uniform scale applied to the mesh before sampling (default: 1)
//!
//! Output:
//!   <output>/<name>.r16|png   # 16-bit heightmap, row 0 at minimum Z
//!   <output>/<name>.json      # terrain manifest (size, resolution, height range)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use meshterrain::core::{Error, Mat4, Result, Vec3};
use meshterrain::geometry::{load_obj, SceneObject};
use meshterrain::heightmap::{
    object_to_terrain, HeightmapFormat, HeightmapSampler, NormalizationMode, ProgressLogger, SampleParams,
    TerrainExporter,
};

fn main() {
    meshterrain::core::logging::init_with_millis();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let input = parse_str_arg(args, "--input")
        .map(PathBuf::from)
        .ok_or_else(|| Error::InvalidParameter("--input <MESH.obj> is required".into()))?;
    let output_dir = PathBuf::from(parse_str_arg(args, "--output").unwrap_or_else(|| "terrain".to_string()));
    let name = parse_str_arg(args, "--name").unwrap_or_else(|| file_stem(&input));

    let params = build_params(args)?;
    let format = parse_arg::<HeightmapFormat>(args, "--format")?.unwrap_or_default();
    let transform = build_transform(args)?;

    println!("=== Mesh to Terrain ===");
    println!("Input:      {}", input.display());
    println!("Resolution: {} x {}", params.resolution, params.resolution);
    println!("Padding:    {} x {} x {}", params.padding.x, params.padding.y, params.padding.z);
    println!("Shift:      {}", params.vertical_shift);
    println!("Mode:       {}", params.mode);
    println!("Output:     {}", output_dir.display());
    println!();

    let start = Instant::now();
    let mesh = load_obj(&input)?;
    println!("Mesh: {} vertices, {} triangles", mesh.positions().len(), mesh.triangle_count());

    let mut object = SceneObject::new(name.clone(), mesh).with_transform(transform);
    let sampler = HeightmapSampler::new(params)?;
    let mut progress = ProgressLogger::new("Creating terrain");
    let mut exporter = TerrainExporter::new(output_dir.clone(), name, format);

    let summary = object_to_terrain(&mut object, &sampler, &mut progress, &mut exporter)?;

    println!();
    println!("Terrain size: {:.2} x {:.2} x {:.2}", summary.size.x, summary.size.y, summary.size.z);
    println!("Heights:      {:.4} .. {:.4}", summary.min_height, summary.max_height);
    for path in exporter.written() {
        println!("Wrote:        {}", path.display());
    }
    println!("Done in {:.2?}", start.elapsed());
    Ok(())
}

fn build_params(args: &[String]) -> Result<SampleParams> {
    let mut params = match parse_str_arg(args, "--config") {
        Some(path) => SampleParams::load_sync(Path::new(&path))?,
        None => SampleParams::default(),
    };

    if let Some(resolution) = parse_arg::<usize>(args, "--resolution")? {
        params.resolution = resolution;
    }
    if let Some(x) = parse_arg::<f32>(args, "--pad-x")? {
        params.padding.x = x;
    }
    if let Some(y) = parse_arg::<f32>(args, "--pad-y")? {
        params.padding.y = y;
    }
    if let Some(z) = parse_arg::<f32>(args, "--pad-z")? {
        params.padding.z = z;
    }
    if let Some(shift) = parse_arg::<f32>(args, "--shift")? {
        params.vertical_shift = shift;
    }
    if let Some(mode) = parse_arg::<NormalizationMode>(args, "--mode")? {
        params.mode = mode;
    }

    Ok(params)
}

fn build_transform(args: &[String]) -> Result<Mat4> {
    match parse_arg::<f32>(args, "--scale")? {
        Some(scale) if !scale.is_finite() || scale <= 0.0 => Err(Error::InvalidParameter(format!(
            "--scale must be positive, got {}",
            scale
        ))),
        Some(scale) => Ok(Mat4::from_scale(Vec3::splat(scale))),
        None => Ok(Mat4::IDENTITY),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "terrain".to_string())
}

fn parse_arg<T: FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    match parse_str_arg(args, flag) {
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidParameter(format!("invalid value '{}' for {}", s, flag))),
        None => Ok(None),
    }
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.clone())
}
