//! Entry point: parse flags, load the mesh or texture, open the viewer.

mod config;

use std::path::Path;

use anyhow::{Context, Result};
use asset::{LoadOptions, load_obj_with, texture::TextureData};
use platform::SceneSetup;

use config::{AppConfig, Demo};

/// Size of the procedural checkerboard used when no `--texture` is given.
const TEST_TEXTURE_SIZE: u32 = 64;

fn load_scene(config: &AppConfig) -> Result<SceneSetup> {
    match config.demo {
        Demo::Cube => {
            let texture = match &config.texture {
                Some(path) => load_texture(path, config.texture_size)
                    .with_context(|| format!("Failed to load texture {}", path.display()))?,
                None => TextureData::create_test_texture(TEST_TEXTURE_SIZE),
            };
            Ok(SceneSetup::TexturedCube { texture })
        }
        Demo::Mesh => {
            let options = if config.lenient {
                LoadOptions::lenient()
            } else {
                LoadOptions::default()
            };
            let mesh = load_obj_with(&config.mesh, &options)
                .with_context(|| format!("Failed to load mesh {}", config.mesh.display()))?;
            log::info!(
                "Loaded {}: {} vertices, {} normals, {} triangles",
                config.mesh.display(),
                mesh.vertices.len(),
                mesh.normals.len(),
                mesh.triangle_count()
            );
            if let Some((lo, hi)) = mesh.bounds() {
                log::debug!("Bounds: {:?} .. {:?}", lo, hi);
            }

            let mesh = mesh
                .to_mesh_data()
                .with_context(|| format!("Failed to build mesh {}", config.mesh.display()))?;
            Ok(SceneSetup::Mesh { mesh })
        }
    }
}

/// PNG by default; `.rgb` files are raw 8-bit RGB and need `--texture-size`.
fn load_texture(path: &Path, size: Option<(u32, u32)>) -> Result<TextureData> {
    let is_raw = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("rgb"));
    if !is_raw {
        return TextureData::load_png(path);
    }

    let (width, height) = size.context("Raw RGB textures need --texture-size=WxH")?;
    let rgb = std::fs::read(path).context("Failed to read raw RGB texture")?;
    let texture = TextureData::from_rgb8(width, height, &rgb)?;
    log::info!("Loaded raw RGB texture: {}x{}", width, height);
    Ok(texture)
}

fn describe(setup: &SceneSetup) -> String {
    match setup {
        SceneSetup::TexturedCube { texture } => {
            format!("cube, texture {}x{}", texture.width, texture.height)
        }
        SceneSetup::Mesh { mesh } => format!(
            "mesh, {} GPU vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        ),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = AppConfig::from_args(&args);
    log::info!(
        "Starting meshview. Demo: {:?}, backend: {:?}, show_fps={}, window_size={}x{}",
        config.demo,
        config.backends,
        config.show_fps,
        config.width,
        config.height
    );

    let setup = load_scene(&config)?;

    if config.check_only {
        println!("OK: {}", describe(&setup));
        return Ok(());
    }

    platform::run_with_renderer(config.run_config(), setup)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn repo_asset(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets")
            .join(name)
    }

    #[test]
    fn bundled_cube_loads_as_mesh_scene() {
        let mut config = AppConfig::from_args(&[]);
        config.mesh = repo_asset("cube.obj");
        let setup = load_scene(&config).unwrap();
        assert_eq!(describe(&setup), "mesh, 24 GPU vertices, 12 triangles");
    }

    #[test]
    fn missing_mesh_error_names_the_file() {
        let mut config = AppConfig::from_args(&[]);
        config.mesh = PathBuf::from("nowhere/suzanne.obj");
        let err = load_scene(&config).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("nowhere/suzanne.obj"), "{msg}");
        assert!(matches!(
            err.downcast_ref::<asset::ObjError>(),
            Some(asset::ObjError::FileNotFound { .. })
        ));
    }

    #[test]
    fn cube_demo_defaults_to_checkerboard() {
        let config = AppConfig::from_args(&["--demo=cube".to_string()]);
        let setup = load_scene(&config).unwrap();
        assert_eq!(describe(&setup), "cube, texture 64x64");
    }

    #[test]
    fn raw_rgb_texture_uses_the_given_size() {
        let path = std::env::temp_dir().join(format!("meshview-{}-2x3.rgb", std::process::id()));
        std::fs::write(&path, [200u8; 2 * 3 * 3]).unwrap();

        let mut config = AppConfig::from_args(&["--demo=cube".to_string()]);
        config.texture = Some(path.clone());
        config.texture_size = Some((2, 3));
        let setup = load_scene(&config).unwrap();
        assert_eq!(describe(&setup), "cube, texture 2x3");
        let SceneSetup::TexturedCube { texture } = &setup else {
            panic!("expected the cube scene");
        };
        assert_eq!(&texture.data[..4], &[200, 200, 200, 255]);

        config.texture_size = Some((4, 4));
        let msg = format!("{:#}", load_scene(&config).unwrap_err());
        assert!(msg.contains("Failed to load texture"), "{msg}");

        config.texture_size = None;
        let msg = format!("{:#}", load_scene(&config).unwrap_err());
        assert!(msg.contains("--texture-size"), "{msg}");

        std::fs::remove_file(&path).unwrap();
    }
}
