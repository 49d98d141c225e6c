// build.rs
// Compiles the GLSL material shaders to SPIR-V with glslc when a Vulkan SDK
// is available. One <material-type>.vert / <material-type>.frag pair per
// material type under ../shaders.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn compile_shader_dir(shader_dir: &Path, target_dir: &Path, glslc: &str, compiled_count: &mut i32) {
    let shader_files = match std::fs::read_dir(shader_dir) {
        Ok(files) => files,
        Err(_) => {
            eprintln!("info: No shader directory found at: {:?}", shader_dir);
            return;
        }
    };

    for entry in shader_files.flatten() {
        let path = entry.path();

        let Some(ext) = path.extension() else { continue };
        if ext != "vert" && ext != "frag" {
            continue;
        }

        // Keep both the stage and the stem: basic.vert -> basic.vert.spv
        let out_file = match path.file_name() {
            Some(name) => {
                let mut name = name.to_os_string();
                name.push(".spv");
                target_dir.join(name)
            }
            None => continue,
        };

        let needs_compile = if let (Ok(src_meta), Ok(dst_meta)) =
            (std::fs::metadata(&path), std::fs::metadata(&out_file))
        {
            match (src_meta.modified(), dst_meta.modified()) {
                (Ok(src), Ok(dst)) => src > dst,
                _ => true,
            }
        } else {
            true
        };

        if !needs_compile {
            eprintln!("info: Shader {:?} is up to date", path.file_name());
            continue;
        }

        let status = Command::new(glslc).arg(&path).arg("-o").arg(&out_file).status();

        match status {
            Ok(s) if s.success() => {
                eprintln!("info: Compiled {:?} -> {:?}", path.file_name(), out_file.file_name());
                *compiled_count += 1;
            }
            Ok(s) => {
                eprintln!("error: glslc failed for {:?} with exit code: {}", path, s.code().unwrap_or(-1));
                panic!("Shader compilation failed");
            }
            Err(e) => {
                eprintln!("error: Failed to run glslc for {:?}: {}", path, e);
                panic!("Failed to execute shader compiler");
            }
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=../shaders");
    println!("cargo:rerun-if-env-changed=VULKAN_SDK");

    let skip_shaders = env::var("SKIP_SHADERS").is_ok();
    if skip_shaders {
        eprintln!("info: Skipping shader compilation (SKIP_SHADERS set)");
        return;
    }

    let vulkan_sdk = match env::var("VULKAN_SDK") {
        Ok(sdk) => sdk,
        Err(_) => {
            eprintln!("warning: VULKAN_SDK not set, shader compilation skipped");
            eprintln!("hint: Install the Vulkan SDK and set VULKAN_SDK to compile shaders");
            return;
        }
    };

    let glslc = if cfg!(target_os = "windows") {
        format!("{}\\Bin\\glslc.exe", vulkan_sdk)
    } else {
        format!("{}/bin/glslc", vulkan_sdk)
    };

    if !Path::new(&glslc).exists() {
        eprintln!("error: glslc not found at: {}", glslc);
        panic!("Shader compiler not found");
    }

    let shader_dir = PathBuf::from("../shaders");
    let target_dir = PathBuf::from("../target/shaders");

    if let Err(e) = std::fs::create_dir_all(&target_dir) {
        eprintln!("warning: Failed to create target directory: {}", e);
        return;
    }

    let mut compiled_count = 0;
    compile_shader_dir(&shader_dir, &target_dir, &glslc, &mut compiled_count);

    if compiled_count > 0 {
        eprintln!("info: Successfully compiled {} shader(s)", compiled_count);
    } else {
        eprintln!("info: All shaders are up to date");
    }
}
