//! Simple path tracer example.
//!
//! Renders a field of bouncing spheres under a spherical light and saves
//! it as PNG.

use lumen_renderer::{
    render_parallel, Camera, CameraSettings, Color, Dielectric, DiffuseLight, Hittable,
    HittableList, Integrator, Lambertian, Metal, RenderConfig, Scene, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn main() {
    println!("Lumen Path Tracer - Simple Example");
    println!("==================================");

    let mut rng = StdRng::seed_from_u64(2024);

    // Build the scene
    let start = std::time::Instant::now();
    let scene = match build_scene(&mut rng) {
        Ok(scene) => scene,
        Err(err) => {
            eprintln!("Failed to build scene: {err}");
            std::process::exit(1);
        }
    };
    println!("Scene built in {:?}", start.elapsed());

    // Set up camera
    let settings = CameraSettings {
        look_from: Vec3::new(13.0, 2.0, 3.0),
        look_at: Vec3::ZERO,
        vup: Vec3::Y,
        vfov: 20.0,
        aperture: 0.1,
        focus_dist: 10.0,
        shutter: (0.0, 1.0),
    };
    let camera = Camera::new(400, 225, &settings);

    // Render configuration
    let config = RenderConfig {
        samples_per_pixel: 50,
        max_depth: 10,
        background: Color::new(0.05, 0.06, 0.08),
        ..Default::default()
    };

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.image_width, camera.image_height, config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let integrator = Integrator::new(&scene);
    let image = render_parallel(&camera, &integrator, &config, 7);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.png";
    if let Err(err) = image.save_png(filename) {
        eprintln!("Failed to save image: {err}");
        std::process::exit(1);
    }
    println!("Saved to {}", filename);
}

fn build_scene(rng: &mut StdRng) -> Result<Scene, lumen_renderer::BuildError> {
    let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();

    // Ground
    objects.push(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(Color::new(0.5, 0.5, 0.5)),
    )));

    // Three main spheres
    objects.push(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Dielectric::new(1.5),
    )));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::new(Color::new(0.4, 0.2, 0.1)),
    )));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    // Overhead light
    let light: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(0.0, 8.0, 0.0),
        2.0,
        DiffuseLight::with_illumination(Color::ONE, 4.0),
    ));
    objects.push(Arc::clone(&light));

    // Small random spheres; the diffuse ones bounce during the shutter
    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() > 0.9 {
                let choose_mat: f32 = rng.gen();

                if choose_mat < 0.8 {
                    // Diffuse
                    let albedo = Color::new(
                        rng.gen::<f32>() * rng.gen::<f32>(),
                        rng.gen::<f32>() * rng.gen::<f32>(),
                        rng.gen::<f32>() * rng.gen::<f32>(),
                    );
                    let center1 = center + Vec3::new(0.0, 0.5 * rng.gen::<f32>(), 0.0);
                    let material = Lambertian::new(albedo);
                    objects.push(Arc::new(Sphere::moving(center, center1, 0.2, material)));
                } else if choose_mat < 0.95 {
                    // Metal
                    let albedo = Color::new(
                        0.5 + 0.5 * rng.gen::<f32>(),
                        0.5 + 0.5 * rng.gen::<f32>(),
                        0.5 + 0.5 * rng.gen::<f32>(),
                    );
                    let fuzz = 0.5 * rng.gen::<f32>();
                    objects.push(Arc::new(Sphere::new(center, 0.2, Metal::new(albedo, fuzz))));
                } else {
                    // Glass
                    objects.push(Arc::new(Sphere::new(center, 0.2, Dielectric::new(1.5))));
                }
            }
        }
    }

    println!("Created {} objects", objects.len());

    let mut lights = HittableList::new();
    lights.add(light);

    Scene::build(objects, lights, Color::new(0.05, 0.06, 0.08), 0.0, 1.0, rng)
}
