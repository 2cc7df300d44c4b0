use image::{Rgb, RgbImage};

use crate::types::LandmarkSet;

/// BlazePose edge list, pairs of landmark indices.
pub const POSE_CONNECTIONS: &[(usize, usize)] = &[
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 7),
    (0, 4),
    (4, 5),
    (5, 6),
    (6, 8),
    (9, 10),
    (11, 12),
    (11, 13),
    (13, 15),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (12, 14),
    (14, 16),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    (11, 23),
    (12, 24),
    (23, 24),
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
    (27, 31),
    (28, 32),
];

const LINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const POINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const POINT_RADIUS: i32 = 3;

/// Draws the detected skeleton onto the image in place: one line per
/// connection, one filled circle per landmark, clipped at the borders.
pub fn draw_skeleton(image: &mut RgbImage, set: &LandmarkSet) {
    for &(a, b) in POSE_CONNECTIONS {
        if let (Some(pa), Some(pb)) = (set.pixels.get(a), set.pixels.get(b)) {
            draw_line(image, pa, pb, LINE_COLOR);
        }
    }

    for &(x, y) in &set.pixels {
        draw_circle(image, (x as i32, y as i32), POINT_RADIUS, POINT_COLOR);
    }
}

fn draw_line(image: &mut RgbImage, p0: &(f32, f32), p1: &(f32, f32), color: Rgb<u8>) {
    let (mut x0, mut y0) = (p0.0 as i32, p0.1 as i32);
    let (x1, y1) = (p1.0 as i32, p1.1 as i32);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel_safe(image, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_circle(image: &mut RgbImage, center: (i32, i32), radius: i32, color: Rgb<u8>) {
    let (cx, cy) = center;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel_safe(image, cx + dx, cy + dy, color);
            }
        }
    }
}

fn put_pixel_safe(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (ux, uy) = (x as u32, y as u32);
    if ux < image.width() && uy < image.height() {
        image.put_pixel(ux, uy, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Landmark, NUM_LANDMARKS};

    fn centered_set(w: u32, h: u32) -> LandmarkSet {
        let normalized = vec![
            Landmark {
                x: 0.5,
                y: 0.5,
                z: 0.0,
                visibility: 1.0,
            };
            NUM_LANDMARKS
        ];
        let pixels = vec![(w as f32 / 2.0, h as f32 / 2.0); NUM_LANDMARKS];
        LandmarkSet { normalized, pixels }
    }

    #[test]
    fn connections_stay_within_landmark_range() {
        for &(a, b) in POSE_CONNECTIONS {
            assert!(a < NUM_LANDMARKS);
            assert!(b < NUM_LANDMARKS);
        }
    }

    #[test]
    fn drawing_marks_the_landmark_pixels() {
        let mut image = RgbImage::new(64, 64);
        draw_skeleton(&mut image, &centered_set(64, 64));
        assert_eq!(*image.get_pixel(32, 32), POINT_COLOR);
    }

    #[test]
    fn drawing_clips_out_of_bounds_points() {
        let mut image = RgbImage::new(16, 16);
        let mut set = centered_set(16, 16);
        set.pixels[0] = (-50.0, 400.0);
        // must not panic
        draw_skeleton(&mut image, &set);
    }
}
