//! Drawing primitives.
//!
//! Every primitive writes through the [`Canvas`] trait, so it works on a standalone [`Surface`]
//! as well as directly on a [`Display`](crate::rendering::display::Display). Pixels outside the
//! canvas' nominal size are written like any other (they are simply never rendered).
//!
//! [`Surface`]: crate::rendering::surface::Surface

use crate::rendering::color::Color;
use crate::rendering::surface::Canvas;
use crate::util::for_coord_in_line;
use crate::util::region::Region;

/// Draws `region`. A `width` of 0 fills it, otherwise only a border `width` pixels thick is
/// drawn inside the region.
pub fn rect<C: Canvas + ?Sized>(canvas: &mut C, color: impl Into<Color>, region: Region, width: i64) {
    let color = color.into();
    for dx in 0..region.width {
        for dy in 0..region.height {
            let on_border = dx < width
                || dx >= region.width - width
                || dy < width
                || dy >= region.height - width;
            if width == 0 || on_border {
                canvas.set_color((region.x + dx, region.y + dy), color);
            }
        }
    }
}

/// Draws a circle around `center`. A `width` of 0 fills it, otherwise a ring `width` pixels
/// thick is drawn inside the radius.
pub fn circle<C: Canvas + ?Sized>(
    canvas: &mut C,
    color: impl Into<Color>,
    (x, y): (i64, i64),
    radius: i64,
    width: i64,
) {
    let color = color.into();
    let outer = radius * radius;
    let inner = (radius - width).max(0).pow(2);
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            let distance = dx * dx + dy * dy;
            if distance > outer {
                continue;
            }
            if width == 0 || distance >= inner {
                canvas.set_color((x + dx, y + dy), color);
            }
        }
    }
}

/// Draws a line from `start` to `end` (both included), `width` pixels thick.
pub fn line<C: Canvas + ?Sized>(
    canvas: &mut C,
    color: impl Into<Color>,
    start: (i64, i64),
    end: (i64, i64),
    width: i64,
) {
    let color = color.into();
    let width = width.max(1);
    let offset = width / 2;
    for_coord_in_line(false, start, end, |x, y| {
        for w1 in 0..width {
            for w2 in 0..width {
                canvas.set_color((x + w1 - offset, y + w2 - offset), color);
            }
        }
    });
}

/// Draws the closed polygon through `points`, optionally filled with a scanline fill.
pub fn polygon<C: Canvas + ?Sized>(
    canvas: &mut C,
    color: impl Into<Color>,
    points: &[(i64, i64)],
    filled: bool,
) {
    let color = color.into();
    let Some(&last) = points.last() else {
        return;
    };

    let mut previous = last;
    for &point in points {
        line(canvas, color, previous, point, 1);
        previous = point;
    }
    if !filled {
        return;
    }

    let min_y = points.iter().map(|p| p.1).min().unwrap_or(0);
    let max_y = points.iter().map(|p| p.1).max().unwrap_or(0);
    let mut intersections: Vec<f64> = Vec::new();
    for y in min_y..=max_y {
        intersections.clear();
        for (i, &(x1, y1)) in points.iter().enumerate() {
            let (x2, y2) = points[(i + 1) % points.len()];
            let ((x1, y1), (x2, y2)) = if y1 > y2 {
                ((x2, y2), (x1, y1))
            } else {
                ((x1, y1), (x2, y2))
            };
            // half-open so shared vertices are counted once
            if y1 <= y && y < y2 {
                let t = (y - y1) as f64 / (y2 - y1) as f64;
                intersections.push(x1 as f64 + t * (x2 - x1) as f64);
            }
        }
        intersections.sort_by(f64::total_cmp);
        for pair in intersections.chunks_exact(2) {
            for x in pair[0] as i64..=pair[1] as i64 {
                canvas.set_color((x, y), color);
            }
        }
    }
}
