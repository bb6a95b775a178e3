use crate::canvas::{Canvas, Glyphs};
use crate::config::{Config, RenderConfig};
use crate::error::{Stage, TourError};
use crate::ir::{Graph, NodeId};
use crate::layout::{Point, Positions};
use crate::theme::Theme;
use std::io::{self, Write};

/// Terminal cells are roughly twice as tall as they are wide.
pub const TERMINAL_CELL_ASPECT: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub label: String,
    pub at: Point,
}

#[derive(Debug, Clone)]
pub struct SceneEdge {
    pub from: Point,
    pub to: Point,
    pub self_loop: bool,
}

/// Everything a surface needs to draw one tour, in unit-circle coordinates.
#[derive(Debug, Clone)]
pub struct Scene {
    pub title: Option<String>,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

impl Scene {
    pub fn build(
        graph: &Graph,
        positions: &Positions,
        title: Option<String>,
    ) -> Result<Self, TourError> {
        if graph.node_count() == 0 {
            return Err(TourError::render(Stage::Render, "graph has no nodes to draw"));
        }
        let position_of = |id: NodeId| {
            positions.get(id).ok_or_else(|| {
                TourError::render(Stage::Render, format!("node {id} has no layout position"))
            })
        };

        let nodes = graph
            .nodes
            .iter()
            .map(|node| {
                Ok(SceneNode {
                    id: node.id,
                    label: node.label.clone(),
                    at: position_of(node.id)?,
                })
            })
            .collect::<Result<Vec<_>, TourError>>()?;

        let edges = graph
            .edges
            .iter()
            .map(|edge| {
                Ok(SceneEdge {
                    from: position_of(edge.a)?,
                    to: position_of(edge.b)?,
                    self_loop: edge.is_self_loop(),
                })
            })
            .collect::<Result<Vec<_>, TourError>>()?;

        Ok(Self {
            title,
            nodes,
            edges,
        })
    }
}

/// Maps unit-circle coordinates into a drawing area. Screen y grows downward.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
}

impl Viewport {
    /// Largest circle that fits in the area once `margin_x`/`margin_y` are
    /// kept free on every side. `aspect` is the width-to-height ratio of one
    /// drawing unit's visual footprint (1 for pixels).
    pub fn fit(
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        margin_x: f32,
        margin_y: f32,
        aspect: f32,
    ) -> Self {
        let rx_max = (width / 2.0 - margin_x).max(0.0);
        let ry_max = (height / 2.0 - margin_y).max(0.0);
        let rx = rx_max.min(ry_max * aspect);
        Self {
            cx: left + width / 2.0,
            cy: top + height / 2.0,
            rx,
            ry: rx / aspect,
        }
    }

    pub fn project(&self, point: Point) -> (f32, f32) {
        (self.cx + self.rx * point.x, self.cy - self.ry * point.y)
    }

    pub fn cell(&self, point: Point) -> (i64, i64) {
        let (x, y) = self.project(point);
        (x.round() as i64, y.round() as i64)
    }
}

/// An output the renderer draws one scene onto. Implementations release what
/// they hold when dropped.
pub trait Surface {
    fn draw(&mut self, scene: &Scene, config: &Config) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;
}

/// Draws a laid-out graph onto a surface obtained from `open`.
///
/// The surface is only acquired once the scene is known to be drawable, and
/// is dropped (released) before this returns on every path.
pub fn render<S, F>(
    graph: &Graph,
    positions: &Positions,
    config: &Config,
    open: F,
) -> Result<(), TourError>
where
    S: Surface,
    F: FnOnce() -> io::Result<S>,
{
    let scene = Scene::build(graph, positions, config.render.title.clone())?;
    let mut surface = open().map_err(|err| surface_error("open", err))?;
    surface
        .draw(&scene, config)
        .map_err(|err| surface_error("draw on", err))?;
    surface
        .present()
        .map_err(|err| surface_error("present", err))?;
    Ok(())
}

fn surface_error(action: &str, err: io::Error) -> TourError {
    TourError::render(Stage::Render, format!("failed to {action} output surface: {err}"))
}

pub fn render_svg(scene: &Scene, theme: &Theme, config: &RenderConfig) -> String {
    let mut svg = String::new();
    let width = config.width.max(100.0);
    let height = config.height.max(100.0);
    let title_band = if scene.title.is_some() {
        theme.font_size * 3.0
    } else {
        0.0
    };
    let reach = config.node_radius + config.self_loop_radius * 2.0;
    let viewport = Viewport::fit(
        0.0,
        title_band,
        width,
        height - title_band,
        config.margin + reach,
        config.margin + reach,
        1.0,
    );

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    if let Some(title) = &scene.title {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            width / 2.0,
            title_band * 0.6,
            theme.font_family,
            theme.font_size * 1.4,
            theme.title_color,
            escape_xml(title)
        ));
    }

    svg.push_str("<g class=\"edges\">");
    for edge in &scene.edges {
        let (x1, y1) = viewport.project(edge.from);
        if edge.self_loop {
            let (lx, ly) = self_loop_center(edge.from, &viewport, config);
            svg.push_str(&format!(
                "<circle cx=\"{lx:.2}\" cy=\"{ly:.2}\" r=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                config.self_loop_radius, theme.line_color, config.edge_width
            ));
            continue;
        }
        let (x2, y2) = viewport.project(edge.to);
        svg.push_str(&format!(
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            theme.line_color, config.edge_width
        ));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for node in &scene.nodes {
        let (x, y) = viewport.project(node.at);
        svg.push_str(&format!(
            "<circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            config.node_radius, theme.node_fill, theme.node_border
        ));
        svg.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\">{}</text>",
            theme.font_family,
            theme.font_size,
            theme.font_weight,
            theme.label_color,
            escape_xml(&node.label)
        ));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

/// Self-loops sit just outside their node, away from the circle's center.
fn self_loop_center(at: Point, viewport: &Viewport, config: &RenderConfig) -> (f32, f32) {
    let (x, y) = viewport.project(at);
    let len = at.distance(&Point::new(0.0, 0.0));
    let (ux, uy) = if len > f32::EPSILON {
        (at.x / len, -at.y / len)
    } else {
        (0.0, -1.0)
    };
    let offset = config.node_radius + config.self_loop_radius * 0.6;
    (x + ux * offset, y + uy * offset)
}

/// Paints the scene onto a `cols` x `rows` character grid.
pub fn rasterize(scene: &Scene, glyphs: Glyphs, cols: usize, rows: usize) -> Canvas {
    let mut canvas = Canvas::new(cols, rows, glyphs);
    let top = title_rows(scene);
    let widest = widest_marker(scene) as f32;
    let viewport = Viewport::fit(
        0.0,
        top,
        cols as f32,
        rows as f32 - top,
        widest / 2.0 + 1.0,
        1.0,
        TERMINAL_CELL_ASPECT,
    );

    for edge in &scene.edges {
        let from = viewport.cell(edge.from);
        if edge.self_loop {
            let half = node_marker_half_width(scene, edge.from);
            canvas.set(from.0 + half + 1, from.1, glyphs.self_loop);
            continue;
        }
        canvas.line(from, viewport.cell(edge.to));
    }
    for node in &scene.nodes {
        let (col, row) = viewport.cell(node.at);
        canvas.write_centered(col, row, &node_marker(&node.label));
    }
    if let Some(title) = &scene.title {
        canvas.write_centered(cols as i64 / 2, 0, title);
    }
    canvas
}

/// Smallest grid, at least `cols` x `rows`, on which no two node markers share
/// a cell.
///
/// Any two markers are at least one chord of the circle apart. Once the chord
/// spans `sqrt(2) * max(widest + 1, 2)` columns, each pair is either a full
/// marker apart horizontally or on different rows.
pub fn grid_size(scene: &Scene, cols: usize, rows: usize) -> (usize, usize) {
    let n = scene.nodes.len();
    if n < 2 {
        return (cols, rows);
    }
    let widest = widest_marker(scene) as f32;
    let chord = 2.0 * (std::f32::consts::PI / n as f32).sin();
    let rx = std::f32::consts::SQRT_2 * (widest + 1.0).max(2.0) / chord;
    let need_cols = (2.0 * (rx + widest / 2.0 + 1.0)).ceil() as usize;
    let need_rows = (2.0 * (rx / TERMINAL_CELL_ASPECT + 1.0) + title_rows(scene)).ceil() as usize;
    (cols.max(need_cols), rows.max(need_rows))
}

fn title_rows(scene: &Scene) -> f32 {
    if scene.title.is_some() { 2.0 } else { 0.0 }
}

fn widest_marker(scene: &Scene) -> usize {
    scene
        .nodes
        .iter()
        .map(|node| node_marker(&node.label).chars().count())
        .max()
        .unwrap_or(3)
}

fn node_marker(label: &str) -> String {
    format!("({label})")
}

fn node_marker_half_width(scene: &Scene, at: Point) -> i64 {
    scene
        .nodes
        .iter()
        .find(|node| node.at == at)
        .map(|node| node_marker(&node.label).chars().count() as i64 / 2)
        .unwrap_or(1)
}

/// Writes the scene as an SVG document.
pub struct SvgSurface<W: Write> {
    out: W,
    document: Option<String>,
}

impl<W: Write> SvgSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            document: None,
        }
    }
}

impl SvgSurface<io::Stdout> {
    pub fn stdout() -> io::Result<Self> {
        Ok(Self::new(io::stdout()))
    }
}

impl<W: Write> Surface for SvgSurface<W> {
    fn draw(&mut self, scene: &Scene, config: &Config) -> io::Result<()> {
        self.document = Some(render_svg(scene, &config.theme, &config.render));
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let Some(document) = self.document.take() else {
            return Err(io::Error::other("nothing was drawn"));
        };
        writeln!(self.out, "{document}")?;
        self.out.flush()
    }
}

impl<W: Write> Drop for SvgSurface<W> {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}

/// Writes the character-grid rendering to a plain writer. The grid grows past
/// `cols` x `rows` when the tour has too many nodes to label legibly.
pub struct TextSurface<W: Write> {
    out: W,
    cols: usize,
    rows: usize,
    text: Option<String>,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W, cols: usize, rows: usize) -> Self {
        Self {
            out,
            cols,
            rows,
            text: None,
        }
    }
}

impl TextSurface<io::Stdout> {
    pub fn stdout(cols: usize, rows: usize) -> io::Result<Self> {
        Ok(Self::new(io::stdout(), cols, rows))
    }
}

impl<W: Write> Surface for TextSurface<W> {
    fn draw(&mut self, scene: &Scene, config: &Config) -> io::Result<()> {
        let glyphs = Glyphs::for_mode(config.render.ascii);
        let (cols, rows) = grid_size(scene, self.cols, self.rows);
        self.text = Some(rasterize(scene, glyphs, cols, rows).render_to_string());
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let Some(text) = self.text.take() else {
            return Err(io::Error::other("nothing was drawn"));
        };
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TextSurface<W> {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}

#[cfg(feature = "cli")]
pub use terminal::TerminalSurface;

#[cfg(feature = "cli")]
mod terminal {
    use super::{Scene, Surface, rasterize};
    use crate::canvas::Glyphs;
    use crate::config::Config;
    use crossterm::event::{self, Event, KeyCode, KeyEventKind};
    use crossterm::terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    };
    use crossterm::{cursor, execute, queue, style::Print};
    use std::io::{self, Write};

    const HINT: &str = "q / Esc / Enter: close";

    /// Interactive full-screen view. Holds raw mode and the alternate screen
    /// until dropped.
    pub struct TerminalSurface {
        stdout: io::Stdout,
        scene: Option<Scene>,
        glyphs: Glyphs,
    }

    impl TerminalSurface {
        pub fn open() -> io::Result<Self> {
            enable_raw_mode()?;
            let mut surface = Self {
                stdout: io::stdout(),
                scene: None,
                glyphs: Glyphs::UNICODE,
            };
            execute!(surface.stdout, EnterAlternateScreen, cursor::Hide)?;
            Ok(surface)
        }

        /// Rasterizes the scene for the current terminal size and paints it.
        fn paint(&mut self) -> io::Result<()> {
            let Some(scene) = &self.scene else {
                return Err(io::Error::other("nothing was drawn"));
            };
            let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
            let text = frame(scene, self.glyphs, width, height);

            queue!(self.stdout, Clear(ClearType::All))?;
            for (row, line) in text.lines().enumerate() {
                queue!(self.stdout, cursor::MoveTo(0, row as u16), Print(line))?;
            }
            queue!(
                self.stdout,
                cursor::MoveTo(0, height.saturating_sub(1)),
                Print(HINT)
            )?;
            self.stdout.flush()
        }
    }

    /// Screen contents for a `width` x `height` terminal; the last row is kept
    /// for the key hint.
    fn frame(scene: &Scene, glyphs: Glyphs, width: u16, height: u16) -> String {
        let rows = usize::from(height.saturating_sub(1));
        rasterize(scene, glyphs, usize::from(width), rows).render_to_string()
    }

    impl Surface for TerminalSurface {
        fn draw(&mut self, scene: &Scene, config: &Config) -> io::Result<()> {
            self.scene = Some(scene.clone());
            self.glyphs = Glyphs::for_mode(config.render.ascii);
            Ok(())
        }

        fn present(&mut self) -> io::Result<()> {
            self.paint()?;
            loop {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                            return Ok(());
                        }
                    }
                    Event::Resize(..) => self.paint()?,
                    _ => {}
                }
            }
        }
    }

    impl Drop for TerminalSurface {
        fn drop(&mut self) {
            let _ = execute!(self.stdout, LeaveAlternateScreen, cursor::Show);
            let _ = disable_raw_mode();
        }
    }

}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{Tour, build_cycle_graph};
    use crate::layout::compute_layout;
    use std::cell::Cell;

    fn laid_out(stops: &[NodeId]) -> (Graph, Positions) {
        let graph = build_cycle_graph(&Tour::new(stops.to_vec()).unwrap());
        let positions = compute_layout(&graph, &LayoutConfig::default()).unwrap();
        (graph, positions)
    }

    struct Recording<'a> {
        released: &'a Cell<bool>,
        fail_draw: bool,
    }

    impl Surface for Recording<'_> {
        fn draw(&mut self, _scene: &Scene, _config: &Config) -> io::Result<()> {
            if self.fail_draw {
                return Err(io::Error::other("device lost"));
            }
            Ok(())
        }

        fn present(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for Recording<'_> {
        fn drop(&mut self) {
            self.released.set(true);
        }
    }

    #[test]
    fn render_svg_basic() {
        let (graph, positions) = laid_out(&[1, 2, 3]);
        let scene = Scene::build(&graph, &positions, Some("Route <A>".to_string())).unwrap();
        let config = Config::default();
        let svg = render_svg(&scene, &config.theme, &config.render);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<line ").count(), 3);
        assert_eq!(svg.matches("<circle ").count(), 3);
        assert!(svg.contains(">2</text>"));
        assert!(svg.contains("Route &lt;A&gt;"));
        assert!(svg.contains("#ADD8E6"));
    }

    #[test]
    fn self_loop_is_drawn_as_circle() {
        let (graph, positions) = laid_out(&[1, 1]);
        let scene = Scene::build(&graph, &positions, None).unwrap();
        assert_eq!(scene.edges.len(), 1);
        assert!(scene.edges[0].self_loop);
        let config = Config::default();
        let svg = render_svg(&scene, &config.theme, &config.render);
        assert_eq!(svg.matches("<line ").count(), 0);
        assert_eq!(svg.matches("<circle ").count(), 2);
    }

    #[test]
    fn empty_graph_cannot_build_scene() {
        let (_, positions) = laid_out(&[1]);
        let err = Scene::build(&Graph::new(), &positions, None).unwrap_err();
        assert_eq!(err.stage(), Stage::Render);
    }

    #[test]
    fn missing_position_is_a_render_error() {
        let (graph, _) = laid_out(&[1, 2, 3]);
        let (_, other) = laid_out(&[7]);
        let err = Scene::build(&graph, &other, None).unwrap_err();
        assert!(err.to_string().contains("no layout position"));
    }

    #[test]
    fn surface_not_opened_for_bad_scene() {
        let mut opened = false;
        let result = render(&Graph::new(), &laid_out(&[1]).1, &Config::default(), || {
            opened = true;
            Ok(SvgSurface::new(Vec::new()))
        });
        assert!(result.is_err());
        assert!(!opened);
    }

    #[test]
    fn surface_released_after_success_and_failure() {
        let (graph, positions) = laid_out(&[1, 2, 3]);
        let config = Config::default();

        let released = Cell::new(false);
        render(&graph, &positions, &config, || {
            Ok(Recording {
                released: &released,
                fail_draw: false,
            })
        })
        .unwrap();
        assert!(released.get());

        let released = Cell::new(false);
        let err = render(&graph, &positions, &config, || {
            Ok(Recording {
                released: &released,
                fail_draw: true,
            })
        })
        .unwrap_err();
        assert!(released.get());
        assert!(err.to_string().contains("device lost"));
    }

    #[test]
    fn text_surface_draws_labels() {
        let (graph, positions) = laid_out(&[1, 2, 3, 4]);
        let mut config = Config::default();
        config.render.ascii = true;
        let mut out = Vec::new();
        render(&graph, &positions, &config, || Ok(TextSurface::new(&mut out, 60, 20))).unwrap();
        let text = String::from_utf8(out).unwrap();
        for label in ["(1)", "(2)", "(3)", "(4)"] {
            assert!(text.contains(label), "{label} missing from\n{text}");
        }
        assert!(text.contains('/') || text.contains('\\'));
    }

    #[test]
    fn text_grid_grows_until_labels_stop_colliding() {
        let stops: Vec<NodeId> = (1..=40).collect();
        let (graph, positions) = laid_out(&stops);
        let scene = Scene::build(&graph, &positions, None).unwrap();
        let (cols, rows) = grid_size(&scene, 80, 24);
        assert!(cols > 80 && rows > 24);

        let mut out = Vec::new();
        render(&graph, &positions, &Config::default(), || {
            Ok(TextSurface::new(&mut out, 80, 24))
        })
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('(').count(), 40, "{text}");
        for id in stops {
            assert!(text.contains(&format!("({id})")), "({id}) missing from\n{text}");
        }
    }

    #[test]
    fn small_tours_keep_requested_grid() {
        let (graph, positions) = laid_out(&[1, 2, 3, 4]);
        let scene = Scene::build(&graph, &positions, None).unwrap();
        assert_eq!(grid_size(&scene, 80, 24), (80, 24));
    }

    #[test]
    fn viewport_keeps_terminal_circle_round() {
        let viewport = Viewport::fit(0.0, 0.0, 80.0, 24.0, 2.0, 1.0, TERMINAL_CELL_ASPECT);
        assert_eq!(viewport.ry, 11.0);
        assert_eq!(viewport.rx, 22.0);
        assert_eq!(viewport.cell(Point::new(1.0, 0.0)), (62, 12));
        assert_eq!(viewport.cell(Point::new(0.0, 1.0)), (40, 1));
    }
}
