//! Thrust curve plotting.

use crate::model::{Anomaly, Series};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Constraint,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition},
};
use std::io::{self, IsTerminal, Stdout};

/// Output surface for a thrust curve and its anomalies.
pub trait Renderer {
    fn render(&mut self, series: &Series, anomalies: &[Anomaly]) -> Result<()>;
}

/// Full-screen interactive chart drawn in the terminal.
///
/// Blocks until the user closes the chart with `q`, `Esc`, `Enter` or `Ctrl-C`.
pub struct TerminalRenderer;

impl TerminalRenderer {
    /// Whether stdout is attached to a terminal the chart can be drawn on.
    pub fn is_available() -> bool {
        io::stdout().is_terminal()
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, series: &Series, anomalies: &[Anomaly]) -> Result<()> {
        let mut session = TerminalSession::acquire().context("failed to acquire terminal")?;
        log::debug!("acquired terminal");

        loop {
            session
                .terminal
                .draw(|frame| draw_chart(frame, series, anomalies))
                .context("failed to draw chart")?;

            // Any other event (resize included) triggers a redraw.
            if let Event::Key(key) = event::read().context("failed to read terminal event")?
                && is_close_key(key)
            {
                break;
            }
        }

        Ok(())
    }
}

/// Raw mode and alternate screen, restored when dropped.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn acquire() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen) {
            disable_raw_mode().ok();
            return Err(error).context("failed to enter alternate screen");
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(error) => {
                execute!(io::stdout(), LeaveAlternateScreen).ok();
                disable_raw_mode().ok();
                return Err(error).context("failed to construct terminal");
            }
        };

        Ok(Self { terminal })
    }

    fn restore(&mut self) -> Result<()> {
        disable_raw_mode().context("failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("failed to leave alternate screen")?;
        self.terminal.show_cursor().context("failed to show cursor")?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        match self.restore() {
            Ok(()) => log::debug!("released terminal"),
            Err(error) => log::error!("{error:#?}"),
        }
    }
}

fn is_close_key(key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Draw the thrust line, the anomaly markers, legend and grid over the whole frame.
pub fn draw_chart(frame: &mut Frame, series: &Series, anomalies: &[Anomaly]) {
    let thrust_points: Vec<(f64, f64)> = series
        .samples()
        .iter()
        .map(|smp| (smp.time, smp.thrust))
        .collect();
    let anomaly_points: Vec<(f64, f64)> = anomalies
        .iter()
        .map(|anm| (anm.sample.time, anm.sample.thrust))
        .collect();

    let x_bounds = padded_bounds(thrust_points.iter().map(|p| p.0), 0.0);
    let y_bounds = padded_bounds(thrust_points.iter().map(|p| p.1), 0.05);
    let x_ticks = ticks(x_bounds);
    let y_ticks = ticks(y_bounds);

    let grid_lines: Vec<[(f64, f64); 2]> = x_ticks
        .iter()
        .map(|&x| [(x, y_bounds[0]), (x, y_bounds[1])])
        .chain(y_ticks.iter().map(|&y| [(x_bounds[0], y), (x_bounds[1], y)]))
        .collect();

    // Unnamed datasets stay out of the legend.
    let mut datasets: Vec<Dataset> = grid_lines
        .iter()
        .map(|line| {
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::DarkGray))
                .data(line)
        })
        .collect();

    datasets.push(
        Dataset::default()
            .name("Thrust")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&thrust_points),
    );

    if !anomaly_points.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Anomalies")
                .marker(Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Red))
                .data(&anomaly_points),
        );
    }

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Thrust vs Time ")
                .title_bottom(" q: close "),
        )
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
        .x_axis(
            Axis::default()
                .title("Time (s)")
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(tick_labels(&x_ticks)),
        )
        .y_axis(
            Axis::default()
                .title("Thrust (N)")
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(tick_labels(&y_ticks)),
        );

    frame.render_widget(chart, frame.area());
}

/// Bounds of `vals` widened by `pad` times their range on each side.
///
/// Degenerate ranges are widened to a unit interval.
fn padded_bounds<I: Iterator<Item = f64>>(vals: I, pad: f64) -> [f64; 2] {
    let (min, max) = vals.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), val| {
        (min.min(val), max.max(val))
    });
    if !(min.is_finite() && max.is_finite()) {
        return [0.0, 1.0];
    }
    let range = max - min;
    if range <= 0.0 {
        return [min - 0.5, max + 0.5];
    }
    [min - pad * range, max + pad * range]
}

fn ticks(bounds: [f64; 2]) -> [f64; 3] {
    [bounds[0], (bounds[0] + bounds[1]) / 2.0, bounds[1]]
}

fn tick_labels(ticks: &[f64]) -> Vec<Span<'static>> {
    ticks
        .iter()
        .map(|tick| Span::raw(format!("{tick:.1}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sample;
    use crate::source::load_data;
    use ratatui::backend::TestBackend;

    fn render_to_string(series: &Series, anomalies: &[Anomaly]) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("test terminal");
        terminal
            .draw(|frame| draw_chart(frame, series, anomalies))
            .expect("draw chart");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn chart_has_title_axes_and_legend() {
        let series = load_data().expect("reference curve");
        let screen = render_to_string(&series, &[]);

        assert!(screen.contains("Thrust vs Time"));
        assert!(screen.contains("Time (s)"));
        assert!(screen.contains("Thrust (N)"));
        assert!(screen.contains("Thrust"));
        assert!(!screen.contains("Anomalies"));
    }

    #[test]
    fn anomalies_appear_in_legend() {
        let series = load_data().expect("reference curve");
        let anomalies = [Anomaly {
            index: 10,
            sample: series.samples()[10],
        }];
        let screen = render_to_string(&series, &anomalies);

        assert!(screen.contains("Anomalies"));
    }

    #[test]
    fn draws_degenerate_series() {
        let series = Series::new(vec![Sample::new(1.0, 5.0)]).expect("valid series");
        let screen = render_to_string(&series, &[]);
        assert!(screen.contains("Thrust vs Time"));

        let screen = render_to_string(&Series::default(), &[]);
        assert!(screen.contains("Thrust vs Time"));
    }

    #[test]
    fn bounds_padding() {
        assert_eq!(padded_bounds([0.0, 10.0].into_iter(), 0.0), [0.0, 10.0]);
        assert_eq!(padded_bounds([5.0, 25.0].into_iter(), 0.05), [4.0, 26.0]);
        assert_eq!(padded_bounds([3.0, 3.0].into_iter(), 0.05), [2.5, 3.5]);
        assert_eq!(padded_bounds(std::iter::empty(), 0.05), [0.0, 1.0]);
    }

    #[test]
    fn close_keys() {
        let press = |code, modifiers| KeyEvent::new(code, modifiers);

        assert!(is_close_key(press(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_close_key(press(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_close_key(press(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(is_close_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_close_key(press(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_close_key(press(KeyCode::Char('x'), KeyModifiers::NONE)));

        let mut release = press(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!is_close_key(release));
    }
}
