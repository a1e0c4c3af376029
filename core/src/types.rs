use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Size of a 2D array as `(x, y)` board coordinates.
pub fn grid_size<T>(grid: &Array2<T>) -> Coord2 {
    let (x, y) = grid.dim();
    // grids are only ever allocated from a `Coord2`
    (x as Coord, y as Coord)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, grid_size(self))
    }
}

/// Values stored in the neighbors of a cell.
pub trait NeighborCellIterExt<T>: NeighborIterExt {
    fn iter_neighbor_cells(&self, index: Coord2) -> impl Iterator<Item = T>;
}

impl<T: Copy> NeighborCellIterExt<T> for Array2<T> {
    fn iter_neighbor_cells(&self, index: Coord2) -> impl Iterator<Item = T> {
        self.iter_neighbors(index)
            .map(move |pos| self[pos.to_nd_index()])
    }
}

/// Iterates the Moore neighborhood (up to 8 cells) of `center`, clipped to `bounds`.
///
/// Scans the 3x3 window around `center` row by row, skipping the center itself.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    min: Coord2,
    max: Coord2,
    cursor: Option<Coord2>,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        let (x, y) = center;
        let (width, height) = bounds;
        let min = (x.saturating_sub(1), y.saturating_sub(1));
        let max = (
            x.saturating_add(1).min(width.saturating_sub(1)),
            y.saturating_add(1).min(height.saturating_sub(1)),
        );
        let empty = width == 0 || height == 0 || min.0 > max.0 || min.1 > max.1;

        Self {
            center,
            min,
            max,
            cursor: (!empty).then_some(min),
        }
    }

    fn advance(&self, (x, y): Coord2) -> Option<Coord2> {
        if x < self.max.0 {
            Some((x + 1, y))
        } else if y < self.max.1 {
            Some((self.min.0, y + 1))
        } else {
            None
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pos = self.cursor?;
            self.cursor = self.advance(pos);

            if pos != self.center {
                return Some(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = NeighborIter::new((0, 0), (3, 3)).collect();
        assert_eq!(neighbors, [(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn center_has_full_moore_neighborhood() {
        assert_eq!(NeighborIter::new((1, 1), (3, 3)).count(), 8);
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert_eq!(NeighborIter::new((0, 0), (1, 1)).count(), 0);
    }

    #[test]
    fn far_edge_is_clipped() {
        let neighbors: Vec<_> = NeighborIter::new((254, 0), (255, 1)).collect();
        assert_eq!(neighbors, [(253, 0)]);
    }

    #[test]
    fn out_of_bounds_center_has_no_neighbors() {
        assert_eq!(NeighborIter::new((5, 0), (3, 3)).count(), 0);
        assert_eq!(NeighborIter::new((0, 0), (0, 0)).count(), 0);
    }

    #[test]
    fn neighbor_cells_follow_neighbor_order() {
        let grid = Array2::from_shape_fn([3, 2], |(x, y)| (x + 10 * y) as u8);
        let cells: Vec<u8> = grid.iter_neighbor_cells((0, 0)).collect();

        assert_eq!(cells, [1, 10, 11]);
    }

    #[test]
    fn mult_saturates() {
        assert_eq!(mult(3, 4), 12);
        assert_eq!(mult(255, 255), 65025);
    }
}
