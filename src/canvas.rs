//! Character grid the terminal and text surfaces paint onto.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub horizontal: char,
    pub vertical: char,
    /// Segment going up to the right on screen.
    pub rising: char,
    /// Segment going down to the right on screen.
    pub falling: char,
    pub self_loop: char,
}

impl Glyphs {
    pub const ASCII: Glyphs = Glyphs {
        horizontal: '-',
        vertical: '|',
        rising: '/',
        falling: '\\',
        self_loop: '@',
    };

    pub const UNICODE: Glyphs = Glyphs {
        horizontal: '─',
        vertical: '│',
        rising: '╱',
        falling: '╲',
        self_loop: '↺',
    };

    pub fn for_mode(ascii: bool) -> Self {
        if ascii { Self::ASCII } else { Self::UNICODE }
    }

    /// Picks the glyph that best follows a segment with screen-space slope
    /// `dy / dx`.
    pub fn for_slope(&self, dx: i64, dy: i64) -> char {
        let (adx, ady) = (dx.abs(), dy.abs());
        if ady * 2 < adx {
            self.horizontal
        } else if adx * 2 < ady {
            self.vertical
        } else if (dx > 0) == (dy > 0) {
            self.falling
        } else {
            self.rising
        }
    }
}

pub struct Canvas {
    pub width: usize,
    pub height: usize,
    glyphs: Glyphs,
    cells: Vec<Vec<char>>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, glyphs: Glyphs) -> Self {
        Self {
            width,
            height,
            glyphs,
            cells: vec![vec![' '; width]; height],
        }
    }

    pub fn get(&self, col: usize, row: usize) -> char {
        if row < self.height && col < self.width {
            self.cells[row][col]
        } else {
            ' '
        }
    }

    /// Off-grid coordinates are ignored.
    pub fn set(&mut self, col: i64, row: i64, ch: char) {
        if col < 0 || row < 0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if row < self.height && col < self.width {
            self.cells[row][col] = ch;
        }
    }

    /// Draws a straight segment between two cells (Bresenham). Endpoints are
    /// left for the node labels drawn on top.
    pub fn line(&mut self, from: (i64, i64), to: (i64, i64)) {
        let (mut x, mut y) = from;
        let (x1, y1) = to;
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let ch = self.glyphs.for_slope(x1 - x, y1 - y);
        let mut err = dx + dy;
        loop {
            if (x, y) != from && (x, y) != to {
                self.set(x, y, ch);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Writes `text` centered on `(col, row)`.
    pub fn write_centered(&mut self, col: i64, row: i64, text: &str) {
        let len = text.chars().count() as i64;
        let start = col - len / 2;
        for (offset, ch) in text.chars().enumerate() {
            self.set(start + offset as i64, row, ch);
        }
    }

    /// Render the canvas to a string, trimming trailing whitespace per line.
    pub fn render_to_string(&self) -> String {
        let mut lines: Vec<String> = self
            .cells
            .iter()
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }
}
