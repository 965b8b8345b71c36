//! The drawables scene: one kind of drawable per cell of a 2x2 viewer.
//!
//! - (0, 0) 10 000 random points in the unit cube
//! - (0, 1) the unit cube as 12 triangles
//! - (1, 0) the cube's 12 edges
//! - (1, 1) a star outline given in window pixels

use rand::Rng;

use multiview_engine::{Drawable, Result};

use crate::MultiViewer;

pub const POINT_COUNT: usize = 10_000;

pub const CUBE_VERTICES: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5],
];

/// Two triangles per face.
pub const CUBE_TRIANGLES: [u32; 36] = [
    0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7, 0, 7, 3, 0, 4, 7, //
    1, 2, 6, 1, 6, 5, 0, 1, 5, 0, 5, 4, 2, 3, 7, 2, 7, 6,
];

pub const CUBE_EDGES: [u32; 24] = [
    0, 1, 1, 2, 2, 3, 3, 0, // bottom
    4, 5, 5, 6, 6, 7, 7, 4, // top
    0, 4, 1, 5, 2, 6, 3, 7, // vertical
];

/// Pixel coordinates, origin top-left, laid out for an 800x600 window.
pub const STAR_VERTICES: [[f32; 2]; 10] = [
    [505.0, 480.0],
    [411.0, 104.0],
    [317.0, 480.0],
    [600.0, 245.0],
    [223.0, 245.0],
    [350.0, 351.0],
    [411.0, 402.0],
    [376.0, 245.0],
    [447.0, 245.0],
    [473.0, 351.0],
];

pub const STAR_EDGES: [u32; 20] = [0, 6, 6, 2, 2, 5, 5, 4, 4, 7, 7, 1, 1, 8, 8, 3, 3, 9, 9, 0];

/// `count` points uniformly distributed in `[-0.5, 0.5]^3`.
pub fn random_points<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<[f32; 3]> {
    (0..count)
        .map(|_| {
            [
                rng.gen_range(-0.5..=0.5),
                rng.gen_range(-0.5..=0.5),
                rng.gen_range(-0.5..=0.5),
            ]
        })
        .collect()
}

/// Adds the four drawables to `viewer` and assigns one per cell.
///
/// `viewer` needs at least 2x2 cells.
pub fn populate<R: Rng + ?Sized>(viewer: &mut MultiViewer, rng: &mut R) -> Result<()> {
    let mut points = Drawable::points("points")?;
    points.update_vertex_buffer(&random_points(POINT_COUNT, rng))?;
    let points = viewer.add_drawable(points)?;
    viewer.assign(0, 0, points)?;

    let mut cube = Drawable::triangles("cube")?;
    cube.update_vertex_buffer(&CUBE_VERTICES)?;
    cube.update_element_buffer(&CUBE_TRIANGLES)?;
    let cube = viewer.add_drawable(cube)?;
    viewer.assign(0, 1, cube)?;

    let mut wireframe = Drawable::lines("wireframe")?;
    wireframe.update_vertex_buffer(&CUBE_VERTICES)?;
    wireframe.update_element_buffer(&CUBE_EDGES)?;
    let wireframe = viewer.add_drawable(wireframe)?;
    viewer.assign(1, 0, wireframe)?;

    let mut star = Drawable::lines_2d("star")?;
    star.update_screen_vertex_buffer(
        &STAR_VERTICES,
        viewer.width() as f32,
        viewer.height() as f32,
    )?;
    star.update_element_buffer(&STAR_EDGES)?;
    let star = viewer.add_drawable(star)?;
    viewer.assign(1, 1, star)?;

    log::debug!("drawables scene populated");
    Ok(())
}
