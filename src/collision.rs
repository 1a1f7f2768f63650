use crate::grid::{Cell, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Collision {
    #[display("safe")]
    Safe,
    #[display("wall")]
    Wall,
    #[display("self")]
    SelfHit,
}

/// Classify a proposed head position against the board and the current body.
///
/// Walls are checked before the body. The body is the snake as it is *before*
/// the move, tail included: a cell the tail is about to leave still counts as
/// occupied on this tick. `will_grow` does not relax that rule.
pub fn check<'a, I>(grid: &Grid, head: Cell, body: I, _will_grow: bool) -> Collision
where
    I: IntoIterator<Item = &'a Cell>,
{
    if !grid.contains(head) {
        return Collision::Wall;
    }

    if body.into_iter().any(|&segment| segment == head) {
        return Collision::SelfHit;
    }

    Collision::Safe
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(cells: &[(i32, i32)]) -> Vec<Cell> {
        cells.iter().copied().map(Cell::from).collect()
    }

    #[test]
    fn open_cell_is_safe() {
        let grid = Grid::new(15);
        let snake = body(&[(7, 7), (6, 7), (5, 7)]);
        assert_eq!(check(&grid, Cell::new(8, 7), &snake, false), Collision::Safe);
    }

    #[test]
    fn leaving_the_board_hits_a_wall() {
        let grid = Grid::new(15);
        let snake = body(&[(14, 7), (13, 7)]);
        assert_eq!(check(&grid, Cell::new(15, 7), &snake, false), Collision::Wall);
        assert_eq!(check(&grid, Cell::new(3, -1), &snake, false), Collision::Wall);
    }

    #[test]
    fn running_into_the_body_is_a_self_hit() {
        let grid = Grid::new(15);
        let snake = body(&[(5, 5), (5, 6), (6, 6), (6, 5), (6, 4)]);
        assert_eq!(check(&grid, Cell::new(6, 5), &snake, false), Collision::SelfHit);
    }

    #[test]
    fn the_tail_still_counts_as_occupied() {
        let grid = Grid::new(15);
        // A 2x2 loop: moving the head onto the tail cell.
        let snake = body(&[(5, 5), (5, 6), (6, 6), (6, 5)]);
        assert_eq!(check(&grid, Cell::new(6, 5), &snake, false), Collision::SelfHit);
        assert_eq!(check(&grid, Cell::new(6, 5), &snake, true), Collision::SelfHit);
    }

    #[test]
    fn wall_is_reported_before_body() {
        let grid = Grid::new(3);
        // Out-of-board body cells never happen in play, but the order still holds.
        let snake = body(&[(0, 0), (-1, 0)]);
        assert_eq!(check(&grid, Cell::new(-1, 0), &snake, false), Collision::Wall);
    }
}
