//! Ratatui-based terminal UI.
//!
//! The sidebar holds cascading attribute filters, the curves they match and a
//! unit selector per axis. The main area renders the fitted curve over its raw
//! samples, with an optional metadata panel below.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use tracing::{info, warn};

use crate::app::pipeline::{Caches, CurveView, ViewRequest, render_view};
use crate::data::CurveRepository;
use crate::domain::{COL_X_VARIABLE, COL_Y_VARIABLE, FILTER_ALL, FILTER_ATTRIBUTES, FilterSet};
use crate::error::AppError;
use crate::fit::DEFAULT_RESAMPLE_COUNT;
use crate::units::{UnitInfo, short_name, units_for};

mod plotters_chart;

use plotters_chart::CurvePlottersChart;

/// Start the TUI on the dataset at `data_path`.
pub fn run(data_path: &Path) -> Result<(), AppError> {
    let mut app = App::load(data_path);

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Filters,
    Curves,
    Units,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Filters => Focus::Curves,
            Focus::Curves => Focus::Units,
            Focus::Units => Focus::Filters,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Filters => Focus::Units,
            Focus::Curves => Focus::Filters,
            Focus::Units => Focus::Curves,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Status {
    kind: StatusKind,
    text: String,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Warning,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    fn color(&self) -> Color {
        match self.kind {
            StatusKind::Info => Color::Gray,
            StatusKind::Warning => Color::Yellow,
            StatusKind::Error => Color::Red,
        }
    }
}

/// Unit selection for one axis of the selected curve.
#[derive(Debug, Clone)]
struct AxisChoice {
    variable: String,
    info: UnitInfo,
    /// Index into `info.units()`.
    unit: usize,
}

impl AxisChoice {
    fn new(variable: &str) -> Self {
        let info = units_for(variable);
        Self {
            variable: variable.to_string(),
            unit: info.default_index(),
            info,
        }
    }

    /// Unit to request; `None` for variables that cannot be converted.
    fn selected_unit(&self) -> Option<String> {
        match &self.info {
            UnitInfo::Known { units, .. } => units.get(self.unit).map(|u| u.to_string()),
            UnitInfo::Unknown { .. } => None,
        }
    }

    fn describe(&self, axis: &str) -> String {
        match &self.info {
            UnitInfo::Known { units, .. } => {
                let unit = units.get(self.unit).copied().unwrap_or("-");
                format!("{axis}: {} [{unit}]", short_name(&self.variable))
            }
            UnitInfo::Unknown { raw_name } => format!("{axis}: {raw_name} (no conversion)"),
        }
    }
}

/// One filter row. `options[0]` is always `"All"`.
#[derive(Debug, Clone)]
struct FilterRow {
    attribute: &'static str,
    options: Vec<String>,
}

struct App {
    data_path: PathBuf,
    repository: CurveRepository,
    caches: Caches,
    filters: FilterSet,
    filter_rows: Vec<FilterRow>,
    titles: Vec<String>,
    focus: Focus,
    selected_filter: usize,
    selected_curve: usize,
    selected_axis: Axis,
    x_axis: Option<AxisChoice>,
    y_axis: Option<AxisChoice>,
    view: Option<CurveView>,
    show_metadata: bool,
    status: Status,
}

impl App {
    fn load(data_path: &Path) -> Self {
        let mut app = Self::with_repository(data_path, CurveRepository::empty());
        app.reload();
        app
    }

    fn with_repository(data_path: &Path, repository: CurveRepository) -> Self {
        let mut app = Self {
            data_path: data_path.to_path_buf(),
            repository,
            caches: Caches::new(),
            filters: FilterSet::new(),
            filter_rows: Vec::new(),
            titles: Vec::new(),
            focus: Focus::Curves,
            selected_filter: 0,
            selected_curve: 0,
            selected_axis: Axis::X,
            x_axis: None,
            y_axis: None,
            view: None,
            show_metadata: false,
            status: Status::info(""),
        };
        app.rebuild_filters();
        app.refresh_curves(true);
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Char('m') => self.show_metadata = !self.show_metadata,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('c') => {
                self.filters = FilterSet::new();
                self.rebuild_filters();
                self.refresh_curves(false);
            }
            _ => {}
        }
        false
    }

    fn reload(&mut self) {
        let (data, err) = crate::app::load_or_empty(&self.data_path);
        self.caches.fits.retain_version(data.repository.version());
        self.repository = data.repository;
        self.rebuild_filters();
        self.refresh_curves(false);

        if let Some(err) = err {
            self.status = Status::error(err.to_string());
        } else if !data.report.dropped.is_empty() {
            self.status = Status::warning(format!(
                "Loaded {} curve(s); dropped {} row(s) with missing or non-numeric values.",
                self.repository.len(),
                data.report.dropped.len()
            ));
        }
        info!(path = %self.data_path.display(), curves = self.repository.len(), "tui dataset (re)loaded");
    }

    fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Focus::Filters => {
                self.selected_filter = step(self.selected_filter, delta, self.filter_rows.len());
            }
            Focus::Curves => {
                let next = step(self.selected_curve, delta, self.titles.len());
                if next != self.selected_curve {
                    self.selected_curve = next;
                    self.on_curve_changed();
                }
            }
            Focus::Units => {
                self.selected_axis = match self.selected_axis {
                    Axis::X => Axis::Y,
                    Axis::Y => Axis::X,
                };
            }
        }
    }

    fn adjust(&mut self, delta: isize) {
        match self.focus {
            Focus::Filters => self.cycle_filter(delta),
            Focus::Curves => {}
            Focus::Units => self.cycle_unit(delta),
        }
    }

    /// Recompute every row's options; a value no longer offered falls back to "All".
    ///
    /// Rows are processed in narrowing order, so each row sees the already
    /// corrected filters above it.
    fn rebuild_filters(&mut self) {
        let columns = self.repository.attribute_columns();
        let present: Vec<&'static str> = FILTER_ATTRIBUTES
            .iter()
            .copied()
            .filter(|a| {
                *a == COL_X_VARIABLE || *a == COL_Y_VARIABLE || columns.iter().any(|c| c == a)
            })
            .collect();

        self.filter_rows.clear();
        for attribute in present {
            let mut options = vec![FILTER_ALL.to_string()];
            options.extend(self.repository.distinct_values(attribute, &self.filters));
            if let Some(current) = self.filters.get(attribute) {
                if !options.iter().any(|o| o == current) {
                    self.filters.set(attribute, FILTER_ALL);
                }
            }
            self.filter_rows.push(FilterRow { attribute, options });
        }
        self.selected_filter = self
            .selected_filter
            .min(self.filter_rows.len().saturating_sub(1));
    }

    fn cycle_filter(&mut self, delta: isize) {
        let Some(row) = self.filter_rows.get(self.selected_filter) else {
            return;
        };
        let current = self.filters.get(row.attribute).unwrap_or(FILTER_ALL);
        let idx = row.options.iter().position(|o| o == current).unwrap_or(0);
        let next = wrap(idx, delta, row.options.len());
        let (attribute, value) = (row.attribute, row.options[next].clone());

        self.filters.set(attribute, &value);
        self.rebuild_filters();
        self.refresh_curves(true);
    }

    fn cycle_unit(&mut self, delta: isize) {
        let axis = match self.selected_axis {
            Axis::X => self.x_axis.as_mut(),
            Axis::Y => self.y_axis.as_mut(),
        };
        let Some(axis) = axis else {
            return;
        };
        match &axis.info {
            UnitInfo::Known { units, .. } => {
                axis.unit = wrap(axis.unit, delta, units.len());
                self.refresh_view();
            }
            UnitInfo::Unknown { raw_name } => {
                let message = format!("Unknown variable '{raw_name}'; units cannot be converted.");
                self.status = Status::warning(message);
            }
        }
    }

    fn selected_title(&self) -> Option<&str> {
        self.titles.get(self.selected_curve).map(String::as_str)
    }

    /// Re-run the filters. With `keep_units`, an unchanged selection keeps its
    /// chosen units.
    fn refresh_curves(&mut self, keep_units: bool) {
        let previous = self.selected_title().map(str::to_string);
        self.titles = self
            .repository
            .filter(&self.filters)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.selected_curve = previous
            .as_ref()
            .and_then(|p| self.titles.iter().position(|t| t == p))
            .unwrap_or(0);

        let unchanged = previous.as_deref() == self.selected_title();
        if keep_units && unchanged {
            self.refresh_view();
        } else {
            self.on_curve_changed();
        }
    }

    /// New selection: reset both axes to the stored units.
    fn on_curve_changed(&mut self) {
        let axes = self
            .selected_title()
            .and_then(|t| self.repository.samples_for(t))
            .map(|(_, x, y)| (AxisChoice::new(x), AxisChoice::new(y)));
        (self.x_axis, self.y_axis) = axes.unzip();
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        let Some(title) = self.selected_title().map(str::to_string) else {
            self.view = None;
            return;
        };
        let request = ViewRequest {
            title,
            x_unit: self.x_axis.as_ref().and_then(AxisChoice::selected_unit),
            y_unit: self.y_axis.as_ref().and_then(AxisChoice::selected_unit),
            resample_count: DEFAULT_RESAMPLE_COUNT,
        };
        match render_view(&self.repository, &mut self.caches, &request) {
            Ok(view) => {
                self.status = if view.notices.is_empty() {
                    Status::info(format!(
                        "{}: n={} | k={}",
                        view.title, view.n_points, view.degree
                    ))
                } else {
                    Status::warning(view.notices.join(" | "))
                };
                self.view = Some(view);
            }
            Err(err) => {
                warn!(title = %request.title, %err, "cannot display curve");
                self.view = None;
                self.status = Status::error(err.to_string());
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("critview", Style::default().fg(Color::Cyan)),
                Span::raw(" critical-mass curves"),
            ]),
            Line::from(Span::styled(
                format!(
                    "data: {} | curves: {} | matching: {}",
                    self.data_path.display(),
                    self.repository.len(),
                    self.titles.len()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(area);

        let filter_height = self.filter_rows.len() as u16 + 2;
        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(filter_height),
                Constraint::Min(3),
                Constraint::Length(4),
            ])
            .split(columns[0]);

        self.draw_filters(frame, sidebar[0]);
        self.draw_curves(frame, sidebar[1]);
        self.draw_units(frame, sidebar[2]);

        match (&self.view, self.show_metadata) {
            (Some(view), true) => {
                let meta_height = (view.metadata.len() as u16 + 2).min(columns[1].height / 2);
                let main = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(meta_height)])
                    .split(columns[1]);
                self.draw_chart(frame, main[0]);
                draw_metadata(frame, main[1], view);
            }
            _ => self.draw_chart(frame, columns[1]),
        }
    }

    fn pane_block(&self, title: String, focus: Focus) -> Block<'static> {
        let style = if self.focus == focus {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        Block::default().title(title).borders(Borders::ALL).border_style(style)
    }

    fn draw_filters(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .filter_rows
            .iter()
            .map(|row| {
                let value = self.filters.get(row.attribute).unwrap_or(FILTER_ALL);
                ListItem::new(format!(
                    "{:<12} {value} ({})",
                    row.attribute,
                    row.options.len() - 1
                ))
            })
            .collect();
        self.render_list(
            frame,
            area,
            items,
            self.pane_block("Filters".to_string(), Focus::Filters),
            Focus::Filters,
            self.selected_filter,
        );
    }

    fn draw_curves(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = self.pane_block(format!("Curves ({})", self.titles.len()), Focus::Curves);
        if self.titles.is_empty() {
            let msg = Paragraph::new("No curves match the current filters.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }
        let items: Vec<ListItem> = self.titles.iter().map(|t| ListItem::new(t.as_str())).collect();
        self.render_list(frame, area, items, block, Focus::Curves, self.selected_curve);
    }

    fn draw_units(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let row = |axis: &str, choice: Option<&AxisChoice>| -> ListItem<'static> {
            let text = choice
                .map(|c| c.describe(axis))
                .unwrap_or_else(|| format!("{axis}: -"));
            ListItem::new(text)
        };
        let items = vec![row("X", self.x_axis.as_ref()), row("Y", self.y_axis.as_ref())];
        let selected = match self.selected_axis {
            Axis::X => 0,
            Axis::Y => 1,
        };
        self.render_list(
            frame,
            area,
            items,
            self.pane_block("Units".to_string(), Focus::Units),
            Focus::Units,
            selected,
        );
    }

    fn render_list(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        items: Vec<ListItem<'_>>,
        block: Block<'_>,
        focus: Focus,
        selected: usize,
    ) {
        let highlight = if self.focus == focus {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight)
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self
            .view
            .as_ref()
            .map(|v| v.title.clone())
            .unwrap_or_else(|| "Curve".to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(view) = &self.view else {
            let msg = Paragraph::new("No curve to display.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (x_bounds, y_bounds) = chart_bounds(view);
        let x_label = view.x_label();
        let y_label = view.y_label();

        let (chart_rect, insets) = chart_layout(inner);
        let widget = CurvePlottersChart {
            fitted: &view.fitted,
            raw: &view.raw,
            x_bounds,
            y_bounds,
            x_label: &x_label,
            y_label: &y_label,
            fmt_x: fmt_tick,
            fmt_y: fmt_tick,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            let axes = AxisText {
                x_bounds,
                y_bounds,
                x_label: &x_label,
                y_label: &y_label,
            };
            draw_axis_ticks(frame, inner, chart_rect, insets, &axes);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab pane  ↑/↓ select  ←/→ change  c clear filters  m metadata  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status.text, Style::default().fg(self.status.color())),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_metadata(frame: &mut ratatui::Frame<'_>, area: Rect, view: &CurveView) {
    let width = view
        .metadata
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0);
    let lines: Vec<Line> = view
        .metadata
        .iter()
        .map(|(k, v)| {
            Line::from(vec![
                Span::styled(format!("{k:<width$} "), Style::default().fg(Color::Gray)),
                Span::raw(v.clone().unwrap_or_else(|| "-".to_string())),
            ])
        })
        .collect();
    let p = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Metadata").borders(Borders::ALL));
    frame.render_widget(p, area);
}

/// Move within `0..len` without wrapping.
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

/// Move within `0..len`, wrapping at both ends.
fn wrap(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + delta).rem_euclid(len as isize) as usize
}

/// Padded bounds covering raw samples and the fitted curve.
fn chart_bounds(view: &CurveView) -> ([f64; 2], [f64; 2]) {
    let points = view.raw.iter().chain(view.fitted.iter());
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        if x.is_finite() && y.is_finite() {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    (padded(x_min, x_max), padded(y_min, y_max))
}

fn padded(min: f64, max: f64) -> [f64; 2] {
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (min.abs() * 0.05).max(0.5)
    };
    [min - pad, max + pad]
}

fn fmt_tick(v: f64) -> String {
    let a = v.abs();
    if v != 0.0 && !(1e-2..1e4).contains(&a) {
        format!("{v:.1e}")
    } else {
        format!("{v:.2}")
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

struct AxisText<'a> {
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_label: &'a str,
    y_label: &'a str,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    axes: &AxisText<'_>,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);
    let [x0, x1] = axes.x_bounds;
    let [y0, y1] = axes.y_bounds;

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = fmt_tick(x0 + u * (x1 - x0));
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.clone()).style(style),
            Rect {
                x: start,
                y,
                width: label.len() as u16,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = fmt_tick(y0 + u * (y1 - y0));
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.clone()).style(style),
            Rect {
                x: start,
                y,
                width: label.len() as u16,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(axes.x_label.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(axes.y_label.to_string())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.min(chart.width + insets.left),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Curve, Sample};
    use ratatui::backend::TestBackend;

    fn curve(title: &str, geometry: &str, critmat: &str, points: &[(f64, f64)]) -> Curve {
        Curve {
            title: title.to_string(),
            samples: points.iter().map(|&(x, y)| Sample::new(x, y)).collect(),
            x_variable: "Diameter in".to_string(),
            y_variable: "critmass kg".to_string(),
            attributes: vec![
                ("geometry".to_string(), Some(geometry.to_string())),
                ("critmat".to_string(), Some(critmat.to_string())),
            ],
        }
    }

    fn app() -> App {
        let pts = [(12.0, 1.0), (24.0, 2.0), (36.0, 2.5)];
        let repo = CurveRepository::new(
            vec![
                curve("A", "sphere", "U", &pts),
                curve("B", "cylinder", "Pu", &pts),
                curve("C", "sphere", "Pu", &pts),
                curve("D", "slab", "U", &pts[..1]),
            ],
            vec!["title".to_string(), "geometry".to_string(), "critmat".to_string()],
        );
        App::with_repository(Path::new("test.csv"), repo)
    }

    fn row<'a>(app: &'a App, attribute: &str) -> &'a FilterRow {
        app.filter_rows
            .iter()
            .find(|r| r.attribute == attribute)
            .unwrap()
    }

    #[test]
    fn filter_rows_follow_dataset_columns() {
        let app = app();
        let attrs: Vec<&str> = app.filter_rows.iter().map(|r| r.attribute).collect();
        assert_eq!(attrs, vec!["geometry", "critmat", "X_Variable", "Y_Variable"]);
        assert_eq!(row(&app, "geometry").options, vec!["All", "sphere", "cylinder", "slab"]);
        assert_eq!(app.titles, vec!["A", "B", "C", "D"]);
        assert!(app.view.is_some());
    }

    #[test]
    fn filters_cascade_and_reset_stale_values() {
        let mut app = app();
        app.focus = Focus::Filters;

        app.handle_key(KeyCode::Right);
        assert_eq!(app.filters.get("geometry"), Some("sphere"));
        assert_eq!(app.titles, vec!["A", "C"]);
        assert_eq!(row(&app, "critmat").options, vec!["All", "U", "Pu"]);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.filters.get("critmat"), Some("U"));
        assert_eq!(app.titles, vec!["A"]);

        // cylinder has no U, so critmat falls back to All.
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.filters.get("geometry"), Some("cylinder"));
        assert_eq!(app.filters.get("critmat"), None);
        assert_eq!(row(&app, "critmat").options, vec!["All", "Pu"]);
        assert_eq!(app.titles, vec!["B"]);

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.titles.len(), 4);
    }

    #[test]
    fn units_cycle_and_convert() {
        let mut app = app();
        app.focus = Focus::Units;
        // Length units: cm, m, in, ft; inches are stored.
        assert_eq!(app.x_axis.as_ref().unwrap().unit, 2);

        app.handle_key(KeyCode::Right);
        let view = app.view.as_ref().unwrap();
        assert_eq!(view.x_scale.unit, "feet (ft)");
        assert!((view.raw[0].0 - 1.0).abs() < 1e-12);
        assert!((view.raw[1].0 - 2.0).abs() < 1e-12);

        // Wraps back to the first unit.
        app.handle_key(KeyCode::Right);
        assert_eq!(app.view.as_ref().unwrap().x_scale.unit, "centimeters (cm)");

        // Units are reset when another curve is selected.
        app.focus = Focus::Curves;
        app.handle_key(KeyCode::Down);
        assert_eq!(app.x_axis.as_ref().unwrap().unit, 2);
        assert_eq!(app.x_axis.as_ref().unwrap().describe("X"), "X: Diameter [inches (in)]");
    }

    #[test]
    fn unfittable_curve_reports_an_error() {
        let mut app = app();
        app.focus = Focus::Curves;
        for _ in 0..3 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.selected_title(), Some("D"));
        assert!(app.view.is_none());
        assert_eq!(app.status.kind, StatusKind::Error);
        assert!(app.status.text.contains("too few points"));
    }

    #[test]
    fn empty_dataset_draws() {
        let app = App::with_repository(Path::new("none.csv"), CurveRepository::empty());
        assert!(app.titles.is_empty());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
    }

    #[test]
    fn selection_helpers() {
        assert_eq!(step(0, -1, 3), 0);
        assert_eq!(step(2, 1, 3), 2);
        assert_eq!(wrap(0, -1, 3), 2);
        assert_eq!(wrap(2, 1, 3), 0);
        assert_eq!(wrap(0, 1, 0), 0);
        assert_eq!(padded(2.0, 2.0), [1.5, 2.5]);
    }
}
