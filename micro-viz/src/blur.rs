//! 5×5 discrete Gaussian blur over the lanes × positions grid.

/// Unnormalized weights, sum 273.
pub const GAUSSIAN_KERNEL: [[u16; 5]; 5] = [
    [1, 4, 7, 4, 1],
    [4, 16, 26, 16, 4],
    [7, 26, 41, 26, 7],
    [4, 16, 26, 16, 4],
    [1, 4, 7, 4, 1],
];

const RADIUS: isize = 2;

/// Blur `src` into `dst`. Both grids hold one column per entry of `lengths`,
/// `rows` positions each, stored column after column.
///
/// Column `c` only owns its first `lengths[c]` positions. Taps falling
/// outside the grid or past the end of their column are skipped and each
/// cell is divided by the weights of the taps that landed, so a uniform
/// field stays uniform up to the edges of every column. Positions past a
/// column's end are zeroed in `dst`.
pub fn gaussian_blur(src: &[f32], dst: &mut [f32], lengths: &[usize], rows: usize) {
    let columns = lengths.len();
    debug_assert_eq!(src.len(), columns * rows);
    debug_assert_eq!(dst.len(), columns * rows);
    debug_assert!(lengths.iter().all(|&l| l <= rows));

    for (column, &length) in lengths.iter().enumerate() {
        for row in 0..rows {
            if row >= length {
                dst[column * rows + row] = 0.0;
                continue;
            }
            let mut acc = 0.0;
            let mut weight = 0u32;
            for (ky, kernel_row) in GAUSSIAN_KERNEL.iter().enumerate() {
                let r = row as isize + ky as isize - RADIUS;
                if r < 0 {
                    continue;
                }
                for (kx, &w) in kernel_row.iter().enumerate() {
                    let c = column as isize + kx as isize - RADIUS;
                    if c < 0 || c >= columns as isize || r >= lengths[c as usize] as isize {
                        continue;
                    }
                    acc += w as f32 * src[c as usize * rows + r as usize];
                    weight += w as u32;
                }
            }
            // The centre tap always lands, so `weight` is never zero.
            dst[column * rows + row] = acc / weight as f32;
        }
    }
}
