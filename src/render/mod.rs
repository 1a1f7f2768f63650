//! Drawing a [`Snapshot`] onto a 2D surface.
//!
//! The renderer only ever reads the snapshot. Everything it emits goes
//! through the four primitives of [`Surface`], so any backend that can fill
//! rectangles and circles can show the game.

mod raster;

pub use raster::PixelSurface;

use log::debug;

use crate::grid::Direction;
use crate::session::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

/// A fixed-size drawable region, in pixels.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    /// Paints the rectangle, replacing whatever was there.
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Rgb);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb);
    fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Rgb);
}

pub trait Renderer {
    /// Draws one frame. `None` means the surface is not available right now
    /// and the frame is skipped.
    fn draw(&self, surface: Option<&mut dyn Surface>, snapshot: &Snapshot);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb,
    pub grid_line: Rgb,
    pub food: Rgb,
    pub food_highlight: Rgb,
    pub head: Rgb,
    pub eye: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Rgb::hex(0x1a1d23),
            grid_line: Rgb::hex(0x2d323c),
            food: Rgb::hex(0xef4444),
            food_highlight: Rgb::hex(0xfca5a5),
            head: Rgb::hex(0x22c55e),
            eye: Rgb::hex(0x000000),
        }
    }
}

impl Theme {
    /// Body segments fade from bright to dark green towards the tail.
    pub fn body(&self, index: usize) -> Rgb {
        let green = 200usize.saturating_sub(index.saturating_mul(5)).max(100);
        Rgb(34, green as u8, 94)
    }
}

const GRID_LINE_WIDTH: f32 = 0.5;
const SEGMENT_PADDING: f32 = 1.0;
const SEGMENT_RADIUS: f32 = 4.0;
const HIGHLIGHT_OFFSET: f32 = 2.0;
const HIGHLIGHT_RADIUS: f32 = 3.0;
const EYE_RADIUS: f32 = 3.0;
const EYE_NEAR: f32 = 4.0;
const EYE_FAR: f32 = 7.0;

/// The board as the original canvas widget drew it: dark background, faint
/// grid, a red apple with a highlight and a green snake with eyes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRenderer {
    cell_size: f32,
    theme: Theme,
}

impl CanvasRenderer {
    pub fn new(cell_size: i32) -> Self {
        CanvasRenderer {
            cell_size: cell_size as f32,
            theme: Theme::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn draw_grid(&self, surface: &mut dyn Surface, grid_size: i32) {
        let (w, h) = (surface.width(), surface.height());
        for i in 0..=grid_size {
            let p = i as f32 * self.cell_size;
            surface.stroke_line((p, 0.0), (p, h), GRID_LINE_WIDTH, self.theme.grid_line);
            surface.stroke_line((0.0, p), (w, p), GRID_LINE_WIDTH, self.theme.grid_line);
        }
    }

    fn draw_food(&self, surface: &mut dyn Surface, snapshot: &Snapshot) {
        let Some(food) = snapshot.food else {
            return;
        };
        let cell = self.cell_size;
        let cx = food.x as f32 * cell + cell / 2.0;
        let cy = food.y as f32 * cell + cell / 2.0;
        surface.fill_circle(cx, cy, cell / 2.0 - 2.0, self.theme.food);
        surface.fill_circle(
            cx - HIGHLIGHT_OFFSET,
            cy - HIGHLIGHT_OFFSET,
            HIGHLIGHT_RADIUS,
            self.theme.food_highlight,
        );
    }

    fn draw_snake(&self, surface: &mut dyn Surface, snapshot: &Snapshot) {
        let cell = self.cell_size;
        let size = cell - SEGMENT_PADDING * 2.0;

        for (index, segment) in snapshot.snake.iter().enumerate() {
            let x = segment.x as f32 * cell + SEGMENT_PADDING;
            let y = segment.y as f32 * cell + SEGMENT_PADDING;
            let color = if index == 0 {
                self.theme.head
            } else {
                self.theme.body(index)
            };
            surface.fill_rounded_rect(x, y, size, size, SEGMENT_RADIUS, color);

            if index == 0 {
                for (ex, ey) in eye_positions(x, y, size, snapshot.direction) {
                    surface.fill_circle(ex, ey, EYE_RADIUS, self.theme.eye);
                }
            }
        }
    }
}

/// Both eyes sit on the edge of the head that faces `direction`.
pub fn eye_positions(x: f32, y: f32, size: f32, direction: Direction) -> [(f32, f32); 2] {
    let near_x = x + EYE_NEAR;
    let near_y = y + EYE_NEAR;
    let far_x = x + size - EYE_FAR;
    let far_y = y + size - EYE_FAR;
    match direction {
        Direction::Up => [(near_x, near_y), (far_x, near_y)],
        Direction::Down => [(near_x, far_y), (far_x, far_y)],
        Direction::Left => [(near_x, near_y), (near_x, far_y)],
        Direction::Right => [(far_x, near_y), (far_x, far_y)],
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&self, surface: Option<&mut dyn Surface>, snapshot: &Snapshot) {
        let Some(surface) = surface else {
            debug!("render surface unavailable, frame skipped");
            return;
        };

        let (w, h) = (surface.width(), surface.height());
        surface.clear_rect(0.0, 0.0, w, h, self.theme.background);
        self.draw_grid(surface, snapshot.grid_size);
        self.draw_food(surface, snapshot);
        self.draw_snake(surface, snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::session::Status;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear(Rgb),
        Line,
        Circle { cx: f32, cy: f32, radius: f32, color: Rgb },
        RoundedRect { x: f32, y: f32, size: f32, color: Rgb },
    }

    struct Recording {
        side: f32,
        ops: Vec<Op>,
    }

    impl Surface for Recording {
        fn width(&self) -> f32 {
            self.side
        }
        fn height(&self) -> f32 {
            self.side
        }
        fn clear_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, color: Rgb) {
            self.ops.push(Op::Clear(color));
        }
        fn stroke_line(&mut self, _from: (f32, f32), _to: (f32, f32), _width: f32, _color: Rgb) {
            self.ops.push(Op::Line);
        }
        fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
            self.ops.push(Op::Circle { cx, cy, radius, color });
        }
        fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, _h: f32, _radius: f32, color: Rgb) {
            self.ops.push(Op::RoundedRect { x, y, size: w, color });
        }
    }

    fn snapshot(direction: Direction) -> Snapshot {
        Snapshot {
            grid_size: 15,
            snake: vec![Cell::new(7, 7), Cell::new(6, 7), Cell::new(5, 7)],
            food: Some(Cell::new(10, 3)),
            direction,
            score: 0,
            high_score: 0,
            speed_ms: 150,
            status: Status::Running,
        }
    }

    fn render(direction: Direction) -> Vec<Op> {
        let mut surface = Recording {
            side: 270.0,
            ops: Vec::new(),
        };
        CanvasRenderer::new(18).draw(Some(&mut surface), &snapshot(direction));
        surface.ops
    }

    #[test]
    fn draws_background_grid_food_then_snake() {
        let theme = Theme::default();
        let ops = render(Direction::Right);

        assert_eq!(ops[0], Op::Clear(theme.background));
        let lines = ops.iter().filter(|op| **op == Op::Line).count();
        assert_eq!(lines, 2 * 16);

        let rest = &ops[1 + lines..];
        assert_eq!(
            rest[0],
            Op::Circle { cx: 189.0, cy: 63.0, radius: 7.0, color: theme.food }
        );
        assert_eq!(
            rest[1],
            Op::Circle { cx: 187.0, cy: 61.0, radius: 3.0, color: theme.food_highlight }
        );
        assert_eq!(
            rest[2],
            Op::RoundedRect { x: 127.0, y: 127.0, size: 16.0, color: theme.head }
        );
        // Two eyes follow the head, then the body.
        assert!(matches!(rest[3], Op::Circle { radius, .. } if radius == EYE_RADIUS));
        assert!(matches!(rest[4], Op::Circle { radius, .. } if radius == EYE_RADIUS));
        assert_eq!(
            rest[5],
            Op::RoundedRect { x: 109.0, y: 127.0, size: 16.0, color: Rgb(34, 195, 94) }
        );
        assert_eq!(rest.len(), 7);
    }

    #[test]
    fn eyes_face_the_direction_of_travel() {
        assert_eq!(eye_positions(0.0, 0.0, 16.0, Direction::Up), [(4.0, 4.0), (9.0, 4.0)]);
        assert_eq!(eye_positions(0.0, 0.0, 16.0, Direction::Down), [(4.0, 9.0), (9.0, 9.0)]);
        assert_eq!(eye_positions(0.0, 0.0, 16.0, Direction::Left), [(4.0, 4.0), (4.0, 9.0)]);
        assert_eq!(eye_positions(0.0, 0.0, 16.0, Direction::Right), [(9.0, 4.0), (9.0, 9.0)]);
        assert_ne!(render(Direction::Up), render(Direction::Down));
    }

    #[test]
    fn body_colour_fades_and_bottoms_out() {
        let theme = Theme::default();
        assert_eq!(theme.body(1), Rgb(34, 195, 94));
        assert_eq!(theme.body(20), Rgb(34, 100, 94));
        assert_eq!(theme.body(500), Rgb(34, 100, 94));
    }

    #[test]
    fn missing_surface_is_a_no_op() {
        let snap = snapshot(Direction::Left);
        let before = snap.clone();
        CanvasRenderer::new(18).draw(None, &snap);
        assert_eq!(snap, before);
    }

    #[test]
    fn idle_board_has_no_food_or_snake() {
        let mut surface = Recording {
            side: 270.0,
            ops: Vec::new(),
        };
        let snap = Snapshot {
            snake: Vec::new(),
            food: None,
            status: Status::Idle,
            ..snapshot(Direction::Right)
        };
        CanvasRenderer::new(18).draw(Some(&mut surface), &snap);
        assert!(surface
            .ops
            .iter()
            .all(|op| matches!(op, Op::Clear(_) | Op::Line)));
    }

    #[test]
    fn hex_colours() {
        assert_eq!(Rgb::hex(0x1a1d23), Rgb(0x1a, 0x1d, 0x23));
    }
}
