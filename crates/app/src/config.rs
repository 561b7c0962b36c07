//! Command-line flags (`--name=value`), parsed by hand.

use std::path::PathBuf;

use platform::RunConfig;

pub const DEFAULT_MESH: &str = "assets/cube.obj";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Demo {
    Cube,
    Mesh,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub demo: Demo,
    pub mesh: PathBuf,
    pub texture: Option<PathBuf>,
    /// Pixel size of a raw `.rgb` texture, which carries no header.
    pub texture_size: Option<(u32, u32)>,
    pub lenient: bool,
    pub check_only: bool,
    pub backends: wgpu::Backends,
    pub show_fps: bool,
    pub width: u32,
    pub height: u32,
}

impl AppConfig {
    /// Build from program arguments (without the executable name).
    pub fn from_args(args: &[String]) -> Self {
        let (width, height) = parse_size_args(args);
        Self {
            demo: parse_demo_arg(args),
            mesh: value_of(args, "--mesh=")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MESH)),
            texture: value_of(args, "--texture=").map(PathBuf::from),
            texture_size: value_of(args, "--texture-size=")
                .and_then(parse_dims)
                .filter(|&(w, h)| w > 0 && h > 0),
            lenient: has_flag(args, "--lenient"),
            check_only: has_flag(args, "--check"),
            backends: parse_backend_arg(args),
            show_fps: parse_show_fps_arg(args),
            width,
            height,
        }
    }

    pub fn run_config(&self) -> RunConfig {
        let title = match self.demo {
            Demo::Cube => "Cube".to_owned(),
            Demo::Mesh => format!("Mesh - {}", self.mesh.display()),
        };
        RunConfig {
            title,
            backends: self.backends,
            show_fps: self.show_fps,
            width: self.width,
            height: self.height,
        }
    }
}

/// Last `--name=value` wins.
fn value_of<'a>(args: &'a [String], prefix: &str) -> Option<&'a str> {
    args.iter()
        .filter_map(|arg| arg.strip_prefix(prefix))
        .filter(|v| !v.is_empty())
        .last()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn parse_demo_arg(args: &[String]) -> Demo {
    match value_of(args, "--demo=").map(str::to_ascii_lowercase).as_deref() {
        None | Some("mesh") | Some("obj") | Some("monkey") => Demo::Mesh,
        Some("cube") => Demo::Cube,
        Some(other) => {
            log::warn!("Unknown demo '{}', falling back to mesh.", other);
            Demo::Mesh
        }
    }
}

fn parse_backend_arg(args: &[String]) -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in args {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    log::warn!("Unknown backend '{}', falling back to auto.", other);
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_show_fps_arg(args: &[String]) -> bool {
    // --show-fps[=on|off], default off
    for arg in args {
        if arg == "--show-fps" {
            return true;
        }
        if let Some(val) = arg.strip_prefix("--show-fps=") {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    false
}

/// `WxH` (or `WXH`) as two integers.
fn parse_dims(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once('x').or_else(|| value.split_once('X'))?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

fn parse_size_args(args: &[String]) -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in args {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((pw, ph)) = parse_dims(v) {
                w = Some(pw);
                h = Some(ph);
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let ww = w.unwrap_or(800).max(1);
    let hh = h.unwrap_or(600).max(1);
    (ww, hh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_match_the_mesh_demo() {
        let cfg = AppConfig::from_args(&[]);
        assert_eq!(cfg.demo, Demo::Mesh);
        assert_eq!(cfg.mesh, PathBuf::from(DEFAULT_MESH));
        assert_eq!((cfg.width, cfg.height), (800, 600));
        assert_eq!(cfg.backends, wgpu::Backends::all());
        assert!(!cfg.lenient && !cfg.check_only && !cfg.show_fps);
        assert!(cfg.texture.is_none());
        assert!(cfg.texture_size.is_none());
    }

    #[test]
    fn parses_every_flag() {
        let cfg = AppConfig::from_args(&args(&[
            "--demo=CUBE",
            "--mesh=models/suzanne.obj",
            "--texture=brick.png",
            "--texture-size=256X128",
            "--lenient",
            "--check",
            "--gpu-backend=vk",
            "--show-fps=on",
            "--size=1024x768",
        ]));
        assert_eq!(cfg.demo, Demo::Cube);
        assert_eq!(cfg.mesh, PathBuf::from("models/suzanne.obj"));
        assert_eq!(cfg.texture, Some(PathBuf::from("brick.png")));
        assert_eq!(cfg.texture_size, Some((256, 128)));
        assert!(cfg.lenient && cfg.check_only && cfg.show_fps);
        assert_eq!(cfg.backends, wgpu::Backends::VULKAN);
        assert_eq!((cfg.width, cfg.height), (1024, 768));
        assert_eq!(cfg.run_config().title, "Cube");
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = AppConfig::from_args(&args(&[
            "--demo=teapot",
            "--gpu-backend=glide",
            "--size=big",
            "--height=0",
            "--mesh=",
            "--texture-size=0x4",
        ]));
        assert_eq!(cfg.demo, Demo::Mesh);
        assert_eq!(cfg.backends, wgpu::Backends::all());
        assert_eq!((cfg.width, cfg.height), (800, 1));
        assert_eq!(cfg.mesh, PathBuf::from(DEFAULT_MESH));
        assert!(cfg.texture_size.is_none());
    }

    #[test]
    fn width_and_height_flags_override_separately() {
        let (w, h) = parse_size_args(&args(&["--width=320", "--size=640x480", "--height=200"]));
        assert_eq!((w, h), (640, 200));
    }
}
