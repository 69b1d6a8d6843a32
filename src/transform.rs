//! Geometric transforms producing new surfaces.
//!
//! Transforms only read pixels inside the source's nominal `[0, width) x [0, height)` area and
//! never modify the source.

use crate::rendering::surface::Surface;

/// Resizes `surface` to `width x height` with nearest-neighbor sampling.
///
/// Every target pixel samples its source pixel, so upscaling leaves no holes.
pub fn scale(surface: &Surface, (width, height): (usize, usize)) -> Surface {
    let mut scaled = Surface::new(width, height);
    let (src_w, src_h) = surface.size();
    if src_w == 0 || src_h == 0 {
        return scaled;
    }
    for y in 0..height {
        for x in 0..width {
            let src = ((x * src_w / width) as i64, (y * src_h / height) as i64);
            scaled.put_pixel((x as i64, y as i64), surface.get_pixel(src));
        }
    }
    scaled
}

/// Doubles both dimensions.
pub fn scale2x(surface: &Surface) -> Surface {
    scale(surface, (surface.width() * 2, surface.height() * 2))
}

/// Scales each dimension by its own factor, truncating the resulting size.
pub fn scale_by(surface: &Surface, (fx, fy): (f64, f64)) -> Surface {
    let width = (surface.width() as f64 * fx).max(0.0) as usize;
    let height = (surface.height() as f64 * fy).max(0.0) as usize;
    scale(surface, (width, height))
}

/// Mirrors horizontally and/or vertically.
pub fn flip(surface: &Surface, flip_x: bool, flip_y: bool) -> Surface {
    let (width, height) = surface.size();
    let (w, h) = (width as i64, height as i64);
    let mut flipped = Surface::new(width, height);
    for ((x, y), rgb) in surface.pixels() {
        if !(0..w).contains(&x) || !(0..h).contains(&y) {
            continue;
        }
        let nx = if flip_x { w - 1 - x } else { x };
        let ny = if flip_y { h - 1 - y } else { y };
        flipped.put_pixel((nx, ny), rgb);
    }
    flipped
}

/// Rotates by `degrees` (clockwise in screen coordinates) around the origin and shifts the
/// result back into positive coordinates.
///
/// Forward mapping leaves gaps at most angles; each source pixel is therefore written to all
/// four combinations of truncated and rounded target coordinates.
pub fn rotate(surface: &Surface, degrees: f64) -> Surface {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let forward = |x: i64, y: i64| {
        let (x, y) = (x as f64, y as f64);
        (x * cos - y * sin, x * sin + y * cos)
    };

    let (width, height) = (surface.width() as i64, surface.height() as i64);
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (0, 0, 0, 0);
    for x in 0..width {
        for y in 0..height {
            let (nx, ny) = forward(x, y);
            let (nx, ny) = (nx.round() as i64, ny.round() as i64);
            min_x = min_x.min(nx);
            min_y = min_y.min(ny);
            max_x = max_x.max(nx);
            max_y = max_y.max(ny);
        }
    }

    let mut rotated = Surface::new((max_x - min_x) as usize, (max_y - min_y) as usize);
    for ((x, y), rgb) in surface.pixels() {
        if !(0..width).contains(&x) || !(0..height).contains(&y) {
            continue;
        }
        let (nx, ny) = forward(x, y);
        for fx in [nx.trunc(), nx.round()] {
            for fy in [ny.trunc(), ny.round()] {
                rotated.put_pixel((fx as i64 - min_x, fy as i64 - min_y), rgb);
            }
        }
    }
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::color::Color;

    fn checker(width: usize, height: usize) -> Surface {
        let mut s = Surface::new(width, height);
        for x in 0..width as i64 {
            for y in 0..height as i64 {
                if (x + y) % 2 == 0 {
                    s.put_pixel((x, y), [255, 255, 255]);
                }
            }
        }
        s
    }

    #[test]
    fn test_scale2x_has_no_holes() {
        let mut s = Surface::new(2, 2);
        s.fill([9, 9, 9]);
        let scaled = scale2x(&s);
        assert_eq!(scaled.size(), (4, 4));
        assert_eq!(scaled.len(), 16);
    }

    #[test]
    fn test_scale_down_samples() {
        let scaled = scale(&checker(4, 4), (2, 2));
        assert_eq!(scaled.get_pixel((0, 0)), Color::WHITE);
        assert_eq!(scaled.get_pixel((1, 1)), Color::WHITE);
        assert_eq!(scaled.get_pixel((1, 0)), Color::WHITE);
    }

    #[test]
    fn test_scale_by() {
        let scaled = scale_by(&checker(4, 6), (0.5, 1.5));
        assert_eq!(scaled.size(), (2, 9));
        assert!(scale_by(&checker(4, 4), (0.0, 1.0)).is_empty());
    }

    #[test]
    fn test_flip() {
        let mut s = Surface::new(3, 2);
        s.put_pixel((0, 0), [1, 0, 0]);
        let f = flip(&s, true, false);
        assert_eq!(f.get_pixel((2, 0)), Color::Rgb([1, 0, 0]));
        let f = flip(&s, true, true);
        assert_eq!(f.get_pixel((2, 1)), Color::Rgb([1, 0, 0]));
        assert_eq!(flip(&flip(&s, true, true), true, true), s);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut s = Surface::new(3, 1);
        s.put_pixel((0, 0), [1, 0, 0]);
        s.put_pixel((2, 0), [2, 0, 0]);
        let r = rotate(&s, 90.0);
        assert_eq!(r.get_pixel((0, 0)), Color::Rgb([1, 0, 0]));
        assert_eq!(r.get_pixel((0, 2)), Color::Rgb([2, 0, 0]));
    }
}
