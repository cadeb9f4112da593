#![warn(missing_docs)]
//! Hex terrain map viewer.
//!
//! Sculpts a noise-driven elevation map, carves a river down from the
//! highest ridge, and renders the chunked terrain mesh under a slowly
//! orbiting camera. Chunk meshes rebuild whenever the grid reports them
//! dirty, so the upload path is the same one an editor would use.

use bevy::app::AppExit;
use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use hexmesa::{
    CellId, HexDirection, HexGrid, HexHashGrid, MapConfig, MeshData, NoiseField, Triangulator,
    metrics,
};

#[cfg(feature = "native")]
use clap::Parser;

/// Command-line options for the native build.
#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(name = "hexmesa", about = "Hexagonal terrain map viewer")]
struct Args {
    /// Seed for terrain sculpting and vertex perturbation.
    #[arg(long, default_value_t = 1)]
    seed: u32,
    /// Map width in chunks.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(i32).range(1..=64))]
    chunks_x: i32,
    /// Map depth in chunks.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..=64))]
    chunks_z: i32,
}

/// Viewer settings, from the command line on native builds.
#[derive(Resource, Clone, Debug)]
struct ViewerConfig {
    seed: u32,
    chunk_count_x: i32,
    chunk_count_z: i32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            chunk_count_x: 4,
            chunk_count_z: 3,
        }
    }
}

#[cfg(feature = "native")]
fn viewer_config() -> ViewerConfig {
    let args = Args::parse();
    ViewerConfig {
        seed: args.seed,
        chunk_count_x: args.chunks_x,
        chunk_count_z: args.chunks_z,
    }
}

#[cfg(not(feature = "native"))]
fn viewer_config() -> ViewerConfig {
    ViewerConfig::default()
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hexmesa".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(ViewerPlugin(viewer_config()))
        .run();
}

/// Map generation at startup, dirty-chunk mesh upload every frame.
struct ViewerPlugin(ViewerConfig);

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.0.clone())
            .insert_resource(ClearColor(Color::srgb(0.04, 0.05, 0.08)))
            .add_systems(Startup, (setup_scene, generate_map))
            .add_systems(
                Update,
                (
                    sync_chunk_meshes.run_if(resource_exists::<TerrainMap>),
                    orbit_camera,
                    exit_on_esc,
                ),
            );
    }
}

/// The grid being viewed.
#[derive(Resource)]
struct TerrainMap {
    grid: HexGrid,
}

/// One mesh handle per chunk, spawned lazily on first build.
#[derive(Resource)]
struct ChunkMeshes {
    handles: Vec<Option<Handle<Mesh>>>,
    material: Handle<StandardMaterial>,
}

#[derive(Component)]
struct OrbitCamera;

/// Elevation-indexed terrain palette, low to high.
const PALETTE: [LinearRgba; 6] = [
    LinearRgba::rgb(0.76, 0.70, 0.50),
    LinearRgba::rgb(0.30, 0.55, 0.22),
    LinearRgba::rgb(0.22, 0.45, 0.18),
    LinearRgba::rgb(0.42, 0.40, 0.36),
    LinearRgba::rgb(0.55, 0.53, 0.50),
    LinearRgba::rgb(0.92, 0.94, 0.96),
];

const SCULPT_FREQUENCY: f64 = 0.008;

fn setup_scene(mut commands: Commands, config: Res<ViewerConfig>) {
    let center = map_center(&config);

    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Transform::from_translation(center + Vec3::new(0.0, 120.0, 160.0))
            .looking_at(center, Vec3::Y),
        OrbitCamera,
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.6, 0.0)),
    ));
}

/// Builds the grid, sculpts elevations from fractal noise and carves a
/// river downhill from the highest cell.
fn generate_map(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<ViewerConfig>,
) {
    let map_config = MapConfig {
        chunk_count_x: config.chunk_count_x,
        chunk_count_z: config.chunk_count_z,
        ..default()
    };
    let noise = NoiseField::generate(config.seed);
    let hash = HexHashGrid::new(u64::from(config.seed));
    let mut grid = match HexGrid::new(&map_config, noise, hash) {
        Ok(grid) => grid,
        Err(err) => {
            error!("failed to build map: {err}");
            return;
        }
    };

    let sculpt = Fbm::<Perlin>::new(config.seed).set_octaves(4);
    let ids: Vec<CellId> = grid.cell_ids().collect();
    for &id in &ids {
        let position = grid.cell(id).position();
        let sample = sculpt.get([
            f64::from(position.x) * SCULPT_FREQUENCY,
            f64::from(position.z) * SCULPT_FREQUENCY,
        ]);
        let elevation = (((sample + 1.0) * 0.5 * PALETTE.len() as f64) as i32)
            .clamp(0, PALETTE.len() as i32 - 1);
        grid.set_elevation(id, elevation);
        grid.set_color(id, PALETTE[elevation as usize]);
    }

    if let Some(spring) = ids
        .iter()
        .copied()
        .max_by_key(|&id| grid.cell(id).elevation())
    {
        carve_river(&mut grid, spring);
    }

    let chunk_count = grid.chunk_count();
    commands.insert_resource(TerrainMap { grid });
    commands.insert_resource(ChunkMeshes {
        handles: vec![None; chunk_count],
        material: materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.9,
            ..default()
        }),
    });
}

/// Follows the steepest downhill neighbor until the river bottoms out.
fn carve_river(grid: &mut HexGrid, spring: CellId) {
    let mut visited: HashSet<CellId> = HashSet::new();
    let mut current = spring;

    while visited.insert(current) {
        let elevation = grid.cell(current).elevation();
        let step = HexDirection::ALL
            .into_iter()
            .filter_map(|direction| {
                let neighbor = grid.cell(current).neighbor(direction)?;
                let drop = elevation - grid.cell(neighbor).elevation();
                (drop >= 0 && !visited.contains(&neighbor)).then_some((direction, neighbor, drop))
            })
            .max_by_key(|&(_, _, drop)| drop);

        let Some((direction, neighbor, _)) = step else {
            break;
        };
        grid.set_outgoing_river(current, direction);
        current = neighbor;
    }
}

/// Rebuilds the mesh of every chunk the grid reports dirty.
fn sync_chunk_meshes(
    mut commands: Commands,
    mut map: ResMut<TerrainMap>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut chunks: ResMut<ChunkMeshes>,
) {
    let dirty = map.grid.take_dirty_chunks();
    if dirty.is_empty() {
        return;
    }

    let mut buffer = MeshData::new();
    for chunk in dirty {
        Triangulator::new(&map.grid, &mut buffer).triangulate_chunk(chunk);
        let mesh = upload_mesh(&buffer);
        match &chunks.handles[chunk] {
            Some(handle) => {
                let _ = meshes.insert(handle, mesh);
            }
            None => {
                let handle = meshes.add(mesh);
                commands.spawn((
                    Name::new(format!("Chunk {chunk}")),
                    Mesh3d(handle.clone()),
                    MeshMaterial3d(chunks.material.clone()),
                ));
                chunks.handles[chunk] = Some(handle);
            }
        }
    }
}

fn upload_mesh(data: &MeshData) -> Mesh {
    let positions: Vec<[f32; 3]> = data.positions().iter().map(|p| p.to_array()).collect();
    let colors: Vec<[f32; 4]> = data.colors().iter().map(|c| c.to_f32_array()).collect();
    let uvs: Vec<[f32; 2]> = data.uvs().iter().map(|uv| uv.to_array()).collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(data.indices().to_vec()));
    mesh.compute_normals();
    mesh
}

fn orbit_camera(
    time: Res<Time>,
    config: Res<ViewerConfig>,
    mut cameras: Query<&mut Transform, With<OrbitCamera>>,
) {
    let center = map_center(&config);
    let angle = time.elapsed_secs() * 0.08;
    let radius = 160.0;
    for mut transform in &mut cameras {
        transform.translation =
            center + Vec3::new(angle.cos() * radius, 120.0, angle.sin() * radius);
        transform.look_at(center, Vec3::Y);
    }
}

fn map_center(config: &ViewerConfig) -> Vec3 {
    let width = (config.chunk_count_x * metrics::CHUNK_SIZE_X) as f32 * metrics::INNER_RADIUS * 2.0;
    let depth = (config.chunk_count_z * metrics::CHUNK_SIZE_Z) as f32 * metrics::OUTER_RADIUS * 1.5;
    Vec3::new(width * 0.5, 0.0, depth * 0.5)
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
