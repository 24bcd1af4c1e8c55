//! Built-in demo scene: a Cornell box with a turned white block carrying a
//! glass ball, a brushed metal ball and a tall turned block of smoke.

use lumen_math::Vec3;
use lumen_renderer::{
    axis_box, BuildResult, Camera, CameraSettings, Color, ConstantMedium, Dielectric,
    DiffuseLight, Hittable, HittableList, Lambertian, Metal, Rect, Scene, Sphere, Transform,
};
use rand::RngCore;
use std::sync::Arc;

/// Side length of the room.
const ROOM: f32 = 555.0;

/// Build the room and its contents.
///
/// The ceiling light and the glass ball are sampled directly.
pub fn cornell_scene(background: Color, rng: &mut dyn RngCore) -> BuildResult<Scene> {
    let red = Lambertian::new(Color::new(0.65, 0.05, 0.05));
    let white = Lambertian::new(Color::new(0.73, 0.73, 0.73));
    let green = Lambertian::new(Color::new(0.12, 0.45, 0.15));
    let half = ROOM / 2.0;

    let mut objects: Vec<Arc<dyn Hittable>> = vec![
        // Right and left walls
        wall(Vec3::new(ROOM, half, half), Vec3::Z, -Vec3::Y, green),
        wall(Vec3::new(0.0, half, half), Vec3::Z, -Vec3::Y, red),
        // Floor, ceiling and back wall
        wall(Vec3::new(half, 0.0, half), -Vec3::X, Vec3::Z, white.clone()),
        wall(Vec3::new(half, ROOM, half), -Vec3::X, -Vec3::Z, white.clone()),
        wall(Vec3::new(half, half, ROOM), -Vec3::X, Vec3::Y, white.clone()),
    ];

    let light: Arc<dyn Hittable> = Arc::new(Rect::new(
        Vec3::new(half, ROOM - 1.0, half),
        Vec3::X,
        Vec3::Z,
        230.0,
        205.0,
        DiffuseLight::with_illumination(Color::ONE, 7.0),
    ));
    let glass: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(183.0, 235.0, 169.0),
        70.0,
        Dielectric::new(1.5),
    ));

    objects.push(Arc::clone(&light));
    objects.push(Arc::clone(&glass));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(400.0, 70.0, 120.0),
        70.0,
        Metal::new(Color::new(0.8, 0.85, 0.88), 0.1),
    )));

    // Short block at the front, the glass ball resting on top
    let short = axis_box(Vec3::ZERO, Vec3::splat(165.0), white.clone());
    objects.push(Arc::new(Transform::rotated_y(
        Arc::new(short),
        -18.0,
        Vec3::new(130.0, 0.0, 65.0),
    )));

    // Tall block at the back, filled with light grey smoke
    let tall = axis_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white);
    let tall = Transform::rotated_y(Arc::new(tall), 15.0, Vec3::new(265.0, 0.0, 295.0));
    objects.push(Arc::new(ConstantMedium::new(Arc::new(tall), 0.01, Color::splat(0.9))));

    let mut lights = HittableList::new();
    lights.add(light);
    lights.add(glass);

    Scene::build(objects, lights, background, 0.0, 1.0, rng)
}

/// Full-size square wall; the normal is `length_axis x width_axis`.
fn wall(
    center: Vec3,
    length_axis: Vec3,
    width_axis: Vec3,
    material: Lambertian,
) -> Arc<dyn Hittable> {
    Arc::new(Rect::new(center, length_axis, width_axis, ROOM, ROOM, material))
}

/// Camera looking into the open side of the room.
pub fn cornell_camera(width: u32, height: u32) -> Camera {
    let half = ROOM / 2.0;
    let settings = CameraSettings {
        look_from: Vec3::new(half, half, -800.0),
        look_at: Vec3::new(half, half, 0.0),
        vfov: 40.0,
        focus_dist: 10.0,
        shutter: (0.0, 1.0),
        ..Default::default()
    };
    Camera::new(width, height, &settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::{Integrator, Interval, Ray};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cornell_scene_builds() {
        let mut rng = StdRng::seed_from_u64(0);
        let scene = cornell_scene(Color::ZERO, &mut rng).unwrap();

        assert_eq!(scene.lights.len(), 2);
        let bbox = scene.world.bbox();
        assert!(bbox.x.min <= 0.0 && bbox.x.max >= ROOM);
        assert!(bbox.y.min <= 0.0 && bbox.y.max >= ROOM);
    }

    #[test]
    fn test_cornell_light_is_visible() {
        let mut rng = StdRng::seed_from_u64(1);
        let scene = cornell_scene(Color::ZERO, &mut rng).unwrap();
        let integrator = Integrator::new(&scene);

        // Straight up from the floor, between the blocks and clear of both balls
        let ray = Ray::new_simple(Vec3::new(ROOM / 2.0, 1.0, ROOM / 2.0 - 40.0), Vec3::Y);
        assert_eq!(integrator.trace(&ray, 10, 1.0, &mut rng), Color::ONE);
    }

    #[test]
    fn test_cornell_short_block_is_turned() {
        let mut rng = StdRng::seed_from_u64(2);
        let scene = cornell_scene(Color::ZERO, &mut rng).unwrap();

        // Unturned, this face would sit at x = 130 facing -X.
        let ray = Ray::new_simple(Vec3::new(1.0, 80.0, 169.0), Vec3::X);
        let rec = scene.world.hit(&ray, Interval::from_min(0.001)).unwrap();
        assert!(rec.p.x > 94.0 && rec.p.x < 99.0, "hit at {:?}", rec.p);
        assert!(rec.normal.x < -0.9 && rec.normal.z < -0.25, "normal {:?}", rec.normal);
    }
}
