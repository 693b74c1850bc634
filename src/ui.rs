use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use dishpoint::guidance::{azimuth_to_cardinal, guide, TurnDirection};
use dishpoint::quality::SignalQuality;

use crate::AppState;

pub fn draw_ui(f: &mut Frame, app_state: &AppState) {
    let show_sky_map = app_state.config.display.show_sky_map;

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Left side (table)
            Constraint::Percentage(40), // Right side (sky map + details)
        ])
        .split(f.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(10),   // Satellite table
            Constraint::Length(3), // Footer
        ])
        .split(main_chunks[0]);

    draw_header(f, left_chunks[0], app_state);
    draw_satellite_table(f, left_chunks[1], app_state);
    draw_footer(f, left_chunks[2]);

    if show_sky_map {
        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Percentage(55), // Sky map
                Constraint::Percentage(45), // Pointing details
            ])
            .split(main_chunks[1]);

        draw_sky_map(f, right_chunks[0], app_state);
        draw_pointing_details(f, right_chunks[1], app_state);
    } else {
        let right_area = Layout::default()
            .margin(1)
            .constraints([Constraint::Percentage(100)])
            .split(main_chunks[1]);
        draw_pointing_details(f, right_area[0], app_state);
    }
}

fn quality_color(quality: SignalQuality) -> Color {
    match quality {
        SignalQuality::Excellent => Color::Green,
        SignalQuality::Good => Color::LightGreen,
        SignalQuality::Fair => Color::Yellow,
        SignalQuality::Poor => Color::LightRed,
        SignalQuality::NoSignal => Color::Gray,
    }
}

fn draw_header(f: &mut Frame, area: Rect, app_state: &AppState) {
    let header_text = vec![
        Line::from(vec![
            Span::styled("Observer: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{} ", app_state.observer.name)),
            Span::styled("Location: ", Style::default().fg(Color::Cyan)),
            Span::raw(app_state.observer.format_position()),
        ]),
        Line::from(vec![
            Span::styled("Showing: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                "{} of {} satellites",
                app_state.rows.len(),
                app_state.registry.len()
            )),
            Span::raw("  "),
            Span::styled("Time: ", Style::default().fg(Color::Cyan)),
            Span::raw(Local::now().format("%Y-%m-%d %H:%M:%S %Z").to_string()),
        ]),
    ];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Dishpoint")
            .style(Style::default().fg(Color::White)),
    );

    f.render_widget(header, area);
}

fn draw_satellite_table(f: &mut Frame, area: Rect, app_state: &AppState) {
    let header_cells = [
        "Satellite", "Position", "Az", "El", "Skew", "Range", "Signal",
    ]
    .iter()
    .map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = app_state
        .rows
        .iter()
        .enumerate()
        .map(|(idx, (satellite, solution))| {
            let style = if idx == app_state.selected_satellite {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if !solution.is_visible {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            let cells = vec![
                Cell::from(satellite.name.clone()),
                Cell::from(satellite.orbital_position()),
                Cell::from(format!("{:.1}°", solution.azimuth_deg)),
                Cell::from(format!("{:.1}°", solution.elevation_deg)),
                Cell::from(format!("{:+.1}°", solution.lnb_tilt_deg)),
                Cell::from(format!("{:.0} km", solution.distance_km)),
                Cell::from(solution.signal_quality.as_str().to_string())
                    .style(Style::default().fg(quality_color(solution.signal_quality))),
            ];

            Row::new(cells).height(1).style(style)
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(if app_state.show_below_horizon {
                "All satellites"
            } else {
                "Satellites in view"
            })
            .style(Style::default().fg(Color::White)),
    );

    f.render_widget(table, area);
}

fn draw_sky_map(f: &mut Frame, area: Rect, app_state: &AppState) {
    use ratatui::symbols;
    use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};

    let heading_rad = app_state.heading.to_radians();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Sky map (polar view)")
                .style(Style::default().fg(Color::White)),
        )
        .x_bounds([-1.2, 1.2])
        .y_bounds([-1.2, 1.2])
        .marker(symbols::Marker::Braille)
        .paint(|ctx| {
            // Horizon and the 30°/60° elevation rings
            for radius in [1.0, 0.667, 0.333] {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius,
                    color: if radius == 1.0 {
                        Color::White
                    } else {
                        Color::DarkGray
                    },
                });
            }

            // Compass needle
            ctx.draw(&CanvasLine {
                x1: 0.0,
                y1: 0.0,
                x2: heading_rad.sin(),
                y2: heading_rad.cos(),
                color: Color::Magenta,
            });

            // Radius on map: 0 at zenith, 1 at horizon. North is up.
            for (idx, (_, solution)) in app_state.rows.iter().enumerate() {
                if !solution.is_visible {
                    continue;
                }
                let azimuth_rad = solution.azimuth_deg.to_radians();
                let radius = (90.0 - solution.elevation_deg) / 90.0;
                let x = radius * azimuth_rad.sin();
                let y = radius * azimuth_rad.cos();

                let color = if idx == app_state.selected_satellite {
                    Color::Cyan
                } else {
                    quality_color(solution.signal_quality)
                };

                ctx.draw(&Circle {
                    x,
                    y,
                    radius: 0.05,
                    color,
                });
                ctx.print(x, y, "●");
            }

            ctx.print(0.0, 1.05, "N");
            ctx.print(1.05, 0.0, "E");
            ctx.print(0.0, -1.05, "S");
            ctx.print(-1.05, 0.0, "W");
            ctx.print(0.0, 0.0, "+");
        });

    f.render_widget(canvas, area);
}

fn draw_pointing_details(f: &mut Frame, area: Rect, app_state: &AppState) {
    let Some((satellite, solution)) = app_state.selected() else {
        let empty = Paragraph::new("No satellite in view (press b to show all)").block(
            Block::default()
                .borders(Borders::ALL)
                .title("Pointing")
                .style(Style::default().fg(Color::White)),
        );
        f.render_widget(empty, area);
        return;
    };

    let guidance = guide(
        solution.azimuth_deg,
        app_state.heading,
        app_state.config.guidance.on_target_tolerance,
    );
    let (turn_color, turn_text) = match guidance.direction {
        TurnDirection::OnTarget => (Color::Green, guidance.direction.as_str().to_string()),
        _ => (
            Color::Yellow,
            format!("{} {:.1}°", guidance.direction.as_str(), guidance.delta_deg.abs()),
        ),
    };

    let detail_lines = vec![
        Line::from(vec![
            Span::styled(
                "Satellite: ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "{} ({}, {})",
                satellite.name,
                satellite.orbital_position(),
                satellite.region
            )),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  Azimuth:   "),
            Span::styled(
                format!("{:.1}°", solution.azimuth_deg),
                Style::default().fg(Color::White),
            ),
            Span::raw(format!(" ({})", azimuth_to_cardinal(solution.azimuth_deg))),
        ]),
        Line::from(vec![
            Span::raw("  Elevation: "),
            Span::styled(
                format!("{:.1}°", solution.elevation_deg),
                Style::default().fg(quality_color(solution.signal_quality)),
            ),
        ]),
        Line::from(vec![
            Span::raw("  LNB tilt:  "),
            Span::styled(
                format!("{:+.1}°", solution.lnb_tilt_deg),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::raw("  Range:     "),
            Span::styled(
                format!("{:.0} km", solution.distance_km),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            Span::raw("  Signal:    "),
            Span::styled(
                solution.signal_quality.as_str().to_string(),
                Style::default().fg(quality_color(solution.signal_quality)),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  Heading:   "),
            Span::styled(
                format!(
                    "{:.1}° ({})",
                    guidance.heading_deg,
                    azimuth_to_cardinal(guidance.heading_deg)
                ),
                Style::default().fg(Color::Magenta),
            ),
        ]),
        Line::from(vec![
            Span::raw("  Guidance:  "),
            Span::styled(
                turn_text,
                Style::default().fg(turn_color).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let details = Paragraph::new(detail_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Pointing")
            .style(Style::default().fg(Color::White)),
    );

    f.render_widget(details, area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(
        "↑/↓ j/k: Select | ←/→ h/l: Heading | a: Align | b: Below horizon | q/ESC: Quit",
    )
    .style(Style::default().fg(Color::Gray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
