//! Demo application: textured and shaded quads
//!
//! Exercises all three material types with procedural checkerboard
//! textures, animates transforms each frame, and survives window
//! resizes through the renderer's swapchain rebuild path.

use nalgebra::Vector3;
use vk_engine::prelude::*;
use vk_engine::render::StandardUniforms;

const QUAD_OFFSETS: [f32; 3] = [-1.6, 0.0, 1.6];

fn build_scene(
    renderer: &mut Renderer,
) -> Result<(Vec<MeshHandle>, MaterialHandle), VulkanError> {
    let quad = Mesh::quad();

    // Basic: one checkerboard texture.
    let checker = renderer.create_texture(&ImageData::checkerboard(
        256,
        32,
        [235, 235, 235, 255],
        [40, 40, 40, 255],
    ))?;
    let basic = renderer.create_basic_material(checker)?;

    // Colored: flat color updated every frame.
    let colored = renderer.create_colored_material([1.0, 0.2, 0.2, 1.0])?;

    // Standard: albedo plus flat normal and pbr control textures.
    let albedo = renderer.create_texture(&ImageData::checkerboard(
        256,
        64,
        [200, 120, 60, 255],
        [90, 50, 25, 255],
    ))?;
    let flat_normal = renderer.create_texture(&ImageData::checkerboard(
        4,
        4,
        [128, 128, 255, 255],
        [128, 128, 255, 255],
    ))?;
    // Green = roughness, blue = metallic.
    let pbr_control = renderer.create_texture(&ImageData::checkerboard(
        4,
        4,
        [0, 160, 40, 255],
        [0, 160, 40, 255],
    ))?;
    let standard = renderer.create_standard_material(
        albedo,
        flat_normal,
        pbr_control,
        StandardUniforms::default(),
    )?;

    let meshes = vec![
        renderer.register_mesh(&quad, basic)?,
        renderer.register_mesh(&quad, colored)?,
        renderer.register_mesh(&quad, standard)?,
    ];
    Ok((meshes, colored))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::default();

    let mut window = Window::new(
        &config.window.title,
        config.window.width,
        config.window.height,
    )?;
    let mut renderer = Renderer::new(&mut window, &config)?;

    let (meshes, colored) = build_scene(&mut renderer)?;

    let mut camera = Camera::default();
    camera.transform.position = Vector3::new(0.0, 0.0, 4.0);

    let mut clock = Clock::new();

    while !window.should_close() {
        window.poll_events();
        clock.tick();
        let t = clock.elapsed();

        for (i, &mesh) in meshes.iter().enumerate() {
            let transform = Transform {
                position: Vector3::new(QUAD_OFFSETS[i], (t + i as f32).sin() * 0.3, 0.0),
                rotation: nalgebra::UnitQuaternion::from_axis_angle(
                    &Vector3::y_axis(),
                    t * 0.8 + i as f32,
                ),
                scale: Vector3::new(1.0, 1.0, 1.0),
            };
            renderer.set_transform(mesh, &transform.to_matrix())?;
        }

        let pulse = (t * 2.0).sin() * 0.5 + 0.5;
        renderer.set_material_color(colored, [1.0, pulse, 0.2, 1.0])?;

        match renderer.render(&mut window, &camera)? {
            FrameOutcome::Rendered => {}
            FrameOutcome::SwapchainRebuilt => {
                log::debug!("Swapchain rebuilt, skipping frame");
            }
        }
    }

    renderer.wait_idle()?;
    Ok(())
}

fn main() {
    vk_engine::foundation::logging::init();
    if let Err(e) = run() {
        log::error!("Fatal: {e}");
        std::process::exit(1);
    }
}
