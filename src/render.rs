use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use rdx::PixelBuffer;
use std::io::{self, Stdout, Write};

const HUD_ROWS: usize = 3;
const HALF_BLOCK: char = '▀';

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    top: Color,
    bottom: Color,
}

impl Cell {
    fn blank() -> Self {
        Self {
            top: Color::Reset,
            bottom: Color::Reset,
        }
    }
}

pub(crate) struct TermGuard {
    pub(crate) out: Stdout,
}

impl TermGuard {
    pub(crate) fn new() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            EnterAlternateScreen,
            DisableLineWrap,
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        Ok(Self { out })
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            EndSynchronizedUpdate,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Draws pixel buffers as half-block cells, two pixel rows per terminal row, and only
/// rewrites cells that changed since the previous frame.
pub(crate) struct Screen {
    cols: usize,
    rows: usize,
    last: Vec<Cell>,
}

impl Screen {
    pub(crate) fn new(cols: usize, rows: usize) -> Self {
        let rows = rows.saturating_sub(HUD_ROWS);
        Self {
            cols,
            rows,
            last: vec![Cell::blank(); cols * rows],
        }
    }

    /// Square viewport in cells: (cols, rows). Terminal cells are about twice as tall as
    /// wide, which the half block cancels out.
    fn viewport(&self) -> (usize, usize) {
        let side = self.cols.min(self.rows * 2);
        (side, side.div_ceil(2))
    }

    pub(crate) fn draw(&mut self, out: &mut Stdout, px: &PixelBuffer) -> io::Result<()> {
        let n = px.side();
        if n == 0 {
            return Ok(());
        }
        let (vw, vh) = self.viewport();
        let sample = |sx: usize, sy: usize| -> Color {
            let x = (sx * n / vw.max(1)).min(n - 1);
            let y = (sy * n / vw.max(1)).min(n - 1);
            let [r, g, b, _] = px.pixel(x, y);
            Color::Rgb { r, g, b }
        };

        queue!(out, BeginSynchronizedUpdate)?;
        for ty in 0..vh {
            for tx in 0..vw {
                let top = sample(tx, ty * 2);
                let bottom = if ty * 2 + 1 < vw {
                    sample(tx, ty * 2 + 1)
                } else {
                    Color::Reset
                };
                let cell = Cell { top, bottom };
                let fi = ty * self.cols + tx;
                if fi < self.last.len() && self.last[fi] != cell {
                    queue!(
                        out,
                        cursor::MoveTo(tx as u16, (ty + HUD_ROWS) as u16),
                        SetForegroundColor(top),
                        SetBackgroundColor(bottom),
                        Print(HALF_BLOCK)
                    )?;
                    self.last[fi] = cell;
                }
            }
        }
        queue!(out, ResetColor)?;
        Ok(())
    }

    pub(crate) fn hud(&self, out: &mut Stdout, lines: [&str; HUD_ROWS]) -> io::Result<()> {
        for (row, line) in lines.iter().enumerate() {
            let shown: String = line.chars().take(self.cols).collect();
            let pad = self.cols.saturating_sub(shown.chars().count());
            queue!(
                out,
                cursor::MoveTo(0, row as u16),
                ResetColor,
                Print(shown),
                Print(" ".repeat(pad))
            )?;
        }
        queue!(out, EndSynchronizedUpdate)?;
        out.flush()
    }
}
