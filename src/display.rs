use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display renders the interpreter's framebuffer. It should abstract the
/// implementation details, so a variety of kinds of screen would work.
///
/// The framebuffer is row-major, one byte per pixel, 0 or 1. Implementations
/// must not mutate it.
pub trait Display {
    /// render one full frame
    fn draw(&mut self, cells: &[u8]) -> Result<(), io::Error>;

    /// how many framebuffer cells a frame must carry
    fn cell_count(&self) -> usize;
}

// width and height of the framebuffer in cells
struct Resolution(usize, usize);

impl Resolution {
    fn cell_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every cell holding `value`; the y axis is
    /// flipped because the canvas grows upward and the framebuffer downward
    fn cells_with_value<'a>(
        &self,
        cells: &'a [u8],
        value: u8,
    ) -> impl Iterator<Item = (f64, f64)> + 'a {
        let w = self.0;
        cells.iter().enumerate().filter_map(move |(count, &cell)| {
            if cell == value {
                Some(((count % w) as f64, -1.0 * ((count / w) as f64)))
            } else {
                None
            }
        })
    }
}

/// monochrome display in a terminal, rendered using TUI over crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new(x: usize, y: usize) -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(x, y),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, cells: &[u8]) -> Result<(), io::Error> {
        // make sure we're given exactly the right amount of data to draw
        assert_eq!(
            cells.len(),
            self.resolution.cell_count(),
            "MonoTermDisplay must have correct-sized data to draw"
        );

        // 1:1 ratio between terminal characters, chip8 pixels and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(
                0,
                0,
                2 + self.resolution.0 as u16,
                2 + self.resolution.1 as u16,
            );

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(self.resolution.x_bounds())
                .y_bounds(self.resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &self
                            .resolution
                            .cells_with_value(cells, 0)
                            .collect::<Vec<_>>(),
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &self
                            .resolution
                            .cells_with_value(cells, 1)
                            .collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }

    fn cell_count(&self) -> usize {
        self.resolution.cell_count()
    }
}

/// useful for testing non-display routines
pub struct DummyDisplay {
    resolution: Resolution,
}

impl DummyDisplay {
    #[allow(dead_code)]
    pub fn new(x: usize, y: usize) -> Result<DummyDisplay, io::Error> {
        Ok(DummyDisplay {
            resolution: Resolution(x, y),
        })
    }
}

impl Display for DummyDisplay {
    #[allow(unused)]
    fn draw(&mut self, cells: &[u8]) -> Result<(), io::Error> {
        Ok(())
    }
    fn cell_count(&self) -> usize {
        self.resolution.cell_count()
    }
}
