//! Reordering of row-major GID grids into the Y-up target frame.

use crate::error::TmxError;
use crate::format::Orientation;

/// Reorder a row-major, top-down GID grid of `stride` columns.
///
/// * Orthogonal: rows are reversed, columns keep their order.
/// * Isometric: the grid is transposed, then the whole array is reversed.
///   The result has `rows` columns, so reordering it back uses `rows` as stride.
/// * Hexagonal: unchanged, the host applies a render transform instead.
pub fn reorder(gids: &[u32], stride: usize, orientation: Orientation) -> Result<Vec<u32>, TmxError> {
    if gids.is_empty() {
        return Ok(Vec::new());
    }
    if stride == 0 || gids.len() % stride != 0 {
        return Err(TmxError::CorruptData(format!(
            "{} tiles do not fill rows of {stride}",
            gids.len()
        )));
    }
    let rows = gids.len() / stride;

    Ok(match orientation {
        Orientation::Orthogonal => gids
            .chunks_exact(stride)
            .rev()
            .flatten()
            .copied()
            .collect(),
        Orientation::Isometric => {
            let mut transposed = vec![0; gids.len()];
            for (index, gid) in gids.iter().enumerate() {
                let (row, col) = (index / stride, index % stride);
                transposed[col * rows + row] = *gid;
            }
            transposed.reverse();
            transposed
        }
        Orientation::Hexagonal => gids.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthogonal_reverses_rows() {
        let grid = [1, 2, 3, 4, 5, 6];
        assert_eq!(
            reorder(&grid, 3, Orientation::Orthogonal).unwrap(),
            vec![4, 5, 6, 1, 2, 3]
        );
    }

    #[test]
    fn test_orthogonal_is_involution() {
        let grid: Vec<u32> = (0..12).collect();
        for stride in [1, 2, 3, 4, 6, 12] {
            let once = reorder(&grid, stride, Orientation::Orthogonal).unwrap();
            let twice = reorder(&once, stride, Orientation::Orthogonal).unwrap();
            assert_eq!(twice, grid, "stride {stride}");
        }
    }

    #[test]
    fn test_isometric_square() {
        // 1 2      transpose 1 3    reverse 4 2
        // 3 4                2 4            3 1
        let grid = [1, 2, 3, 4];
        let once = reorder(&grid, 2, Orientation::Isometric).unwrap();
        assert_eq!(once, vec![4, 2, 3, 1]);
        assert_eq!(reorder(&once, 2, Orientation::Isometric).unwrap(), grid);
    }

    #[test]
    fn test_isometric_round_trip_uses_transposed_stride() {
        let grid: Vec<u32> = (1..=6).collect();
        let once = reorder(&grid, 3, Orientation::Isometric).unwrap();
        assert_eq!(once, vec![6, 3, 5, 2, 4, 1]);
        assert_eq!(reorder(&once, 2, Orientation::Isometric).unwrap(), grid);
    }

    #[test]
    fn test_hexagonal_is_identity() {
        let grid = [9, 8, 7, 6];
        assert_eq!(reorder(&grid, 2, Orientation::Hexagonal).unwrap(), grid);
    }

    #[test]
    fn test_ragged_grid_is_corrupt() {
        for orientation in [
            Orientation::Orthogonal,
            Orientation::Isometric,
            Orientation::Hexagonal,
        ] {
            assert!(matches!(
                reorder(&[1, 2, 3], 2, orientation),
                Err(TmxError::CorruptData(_))
            ));
        }
        assert!(matches!(
            reorder(&[1], 0, Orientation::Orthogonal),
            Err(TmxError::CorruptData(_))
        ));
    }
}
