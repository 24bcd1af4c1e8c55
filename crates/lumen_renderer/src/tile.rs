//! Tiled parallel rendering.
//!
//! The image is cut into square tiles, numbered in row-major order. Each
//! tile is one rayon task with a generator derived from the render seed and
//! the tile number, so the picture does not depend on the thread count.

use crate::renderer::{render_pixel, ImageBuffer};
use crate::sampling::mix64;
use crate::{Camera, Color, Integrator, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

/// Tile edge in pixels when the config does not name one.
pub const DEFAULT_TILE_SIZE: u32 = 64;

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Tile {
    /// Pixel coordinates inside the tile, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let Tile { x0, y0, x1, y1 } = *self;
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

/// Row-major tiles covering a `width` x `height` image.
///
/// Tiles on the right and bottom edges are clipped to the image. A size of
/// zero is treated as one.
pub fn tiles(width: u32, height: u32, size: u32) -> impl Iterator<Item = Tile> {
    let size = size.max(1);
    (0..height).step_by(size as usize).flat_map(move |y0| {
        (0..width).step_by(size as usize).map(move |x0| Tile {
            x0,
            y0,
            x1: (x0 + size).min(width),
            y1: (y0 + size).min(height),
        })
    })
}

/// Generator for tile number `index` of a render seeded with `seed`.
pub fn tile_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(mix64(seed ^ mix64(index as u64)))
}

/// Render every pixel of `tile`, in the order of [`Tile::pixels`].
pub fn render_tile(
    tile: &Tile,
    camera: &Camera,
    integrator: &Integrator,
    config: &RenderConfig,
    rng: &mut StdRng,
) -> Vec<Color> {
    tile.pixels()
        .map(|(x, y)| render_pixel(camera, integrator, x, y, config, &mut *rng))
        .collect()
}

/// Render the whole image, one rayon task per tile.
///
/// The same `seed` always gives the same image.
pub fn render_parallel(
    camera: &Camera,
    integrator: &Integrator,
    config: &RenderConfig,
    seed: u64,
) -> ImageBuffer {
    let grid: Vec<Tile> =
        tiles(camera.image_width, camera.image_height, config.tile_size).collect();

    log::info!(
        "Rendering {}x{} in {} tiles, {} spp, seed {}",
        camera.image_width,
        camera.image_height,
        grid.len(),
        config.samples_per_pixel,
        seed
    );

    let rendered: Vec<Vec<Color>> = grid
        .par_iter()
        .enumerate()
        .map(|(index, tile)| {
            let mut rng = tile_rng(seed, index);
            render_tile(tile, camera, integrator, config, &mut rng)
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for (tile, colors) in grid.iter().zip(&rendered) {
        for ((x, y), color) in tile.pixels().zip(colors) {
            image.set(x, y, *color);
        }
    }
    image
}
