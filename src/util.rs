//! Common utility functions.

pub mod clock;
pub mod region;

/// Runs a function for each coordinate in a line.
/// If `exclude_start` is true, the start coordinate will not be included, unless it's the same as the end coordinate.
pub fn for_coord_in_line(
    exclude_start: bool,
    (start_x, start_y): (i64, i64),
    (end_x, end_y): (i64, i64),
    mut f: impl FnMut(i64, i64),
) {
    // only exclude start if it's not the same as end
    let exclude_start = exclude_start && (start_x != end_x || start_y != end_y);

    let dx = (end_x - start_x).abs();
    let dy = (end_y - start_y).abs();
    let sx = if start_x < end_x { 1 } else { -1 };
    let sy = if start_y < end_y { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (start_x, start_y);
    loop {
        if !exclude_start || x != start_x || y != start_y {
            f(x, y);
        }
        if x == end_x && y == end_y {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}
