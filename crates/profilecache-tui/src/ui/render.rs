use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
    },
    Frame,
};

use profilecache_core::utils::{
    format_birth_date, format_coordinates, format_phone, truncate_string,
};
use profilecache_core::{Backdrop, CoreError, GallerySlot, Profile, Snapshot};

use crate::app::{App, AppState};

use super::styles;

/// Width of the hero card when a backdrop panel is showing
const HERO_WIDTH_PERCENT: u16 = 42;

/// Bulk grid columns; 12 profiles fill four rows
const BULK_COLUMNS: usize = 3;

pub fn render(frame: &mut Frame, app: &App) {
    let snap = app.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_main_content(frame, app, &snap, chunks[1]);
    render_status_bar(frame, &snap, chunks[2]);

    // Overlays
    if let Some(profile) = snap.modal {
        render_profile_modal(frame, profile, snap.is_favorite(profile));
    }

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  profilecache";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, snap: &Snapshot, area: Rect) {
    let Some(current) = snap.current else {
        match snap.error {
            Some(error) => render_error_screen(frame, error, area),
            None => render_loading_screen(frame, area),
        }
        return;
    };

    if snap.backdrop == Backdrop::None {
        render_hero(frame, snap, current, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(HERO_WIDTH_PERCENT),
            Constraint::Percentage(100 - HERO_WIDTH_PERCENT),
        ])
        .split(area);

    render_hero(frame, snap, current, chunks[0]);

    match snap.backdrop {
        Backdrop::Details => render_details(frame, current, chunks[1]),
        Backdrop::Favorites => render_favorites(frame, app, snap, chunks[1]),
        Backdrop::Gallery => render_gallery(frame, app, snap, snap.rotating, chunks[1]),
        Backdrop::BulkProfiles => render_bulk(frame, app, snap, chunks[1]),
        Backdrop::None => {}
    }
}

// ============================================================================
// Full-screen states
// ============================================================================

fn render_loading_screen(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Loading profile...", styles::highlight_style())),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(paragraph, area);
}

fn render_error_screen(frame: &mut Frame, error: &CoreError, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(error.user_message(), styles::error_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("g", styles::help_key_style()),
            Span::styled(" to try again", styles::muted_style()),
        ]),
    ];
    let paragraph = Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Current profile
// ============================================================================

fn render_hero(frame: &mut Frame, snap: &Snapshot, profile: &Profile, area: Rect) {
    let theme = profile.theme();

    let mut username_line = vec![Span::styled(
        format!("@{}", profile.username()),
        styles::muted_style(),
    )];
    if snap.current_is_favorite {
        username_line.push(Span::styled("  ★ Favorite", styles::favorite_style()));
    }

    let lines = vec![
        Line::from(Span::styled(profile.full_name(), styles::theme_style(theme))),
        Line::from(username_line),
        Line::from(""),
        field_line("Age", profile.age().to_string()),
        field_line("Gender", profile.gender.clone()),
        field_line("Email", profile.email.clone()),
        field_line("Phone", format_phone(&profile.phone)),
        field_line("Address", profile.full_address()),
        Line::from(""),
        Line::from(Span::styled(profile.picture.large.clone(), styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[f]", styles::help_key_style()),
            Span::styled(" favorite  ", styles::muted_style()),
            Span::styled("[g]", styles::help_key_style()),
            Span::styled(" new profile", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(format!(" {} ", theme.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(styles::theme_color(theme)));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<9}", label), styles::muted_style()),
        Span::styled(value, styles::list_item_style()),
    ])
}

// ============================================================================
// Backdrops
// ============================================================================

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
}

fn render_details(frame: &mut Frame, profile: &Profile, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(6)])
        .split(area);

    let point = profile.geo_point();
    let lines = vec![
        field_line("Born", format_birth_date(&profile.dob.date)),
        field_line("Cell", profile.cell.as_deref().map(format_phone).unwrap_or_default()),
        field_line("State", profile.location.state.clone().unwrap_or_default()),
        field_line("Country", profile.location.country.clone()),
        field_line("Nat", profile.nat.clone().unwrap_or_default()),
        field_line(
            "Location",
            point
                .map(format_coordinates)
                .unwrap_or_else(|| "unknown".to_string()),
        ),
    ];
    let text = Paragraph::new(lines).block(panel_block(Backdrop::Details.title()));
    frame.render_widget(text, chunks[0]);

    let marker_style = styles::theme_style(profile.theme());
    let map = Canvas::default()
        .block(Block::default().borders(Borders::ALL).border_style(styles::muted_style()))
        .marker(symbols::Marker::Braille)
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0])
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: styles::MUTED,
                resolution: MapResolution::High,
            });
            if let Some(point) = point {
                ctx.layer();
                ctx.print(point.longitude, point.latitude, Span::styled("●", marker_style));
            }
        });
    frame.render_widget(map, chunks[1]);
}

fn profile_list_item(profile: &Profile, favorite: bool, width: usize) -> ListItem<'static> {
    let star = if favorite { "★ " } else { "  " };
    let label = format!(
        "{}, {} · {}",
        profile.full_name(),
        profile.age(),
        profile.location.country
    );
    ListItem::new(Line::from(vec![
        Span::styled(star, styles::favorite_style()),
        Span::styled(truncate_string(&label, width), styles::list_item_style()),
    ]))
}

fn render_profile_list(
    frame: &mut Frame,
    app: &App,
    snap: &Snapshot,
    profiles: &[Profile],
    block: Block,
    area: Rect,
) {
    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = profiles
        .iter()
        .map(|p| profile_list_item(p, snap.is_favorite(p), width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_style());
    let mut state = ListState::default().with_selected(Some(app.selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_favorites(frame: &mut Frame, app: &App, snap: &Snapshot, area: Rect) {
    let title = format!("{} ({})", Backdrop::Favorites.title(), snap.favorites.len());
    let block = panel_block(&title);

    if snap.favorites.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No favorites yet. Press f to add the current profile.",
                styles::muted_style(),
            )),
        ])
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    render_profile_list(frame, app, snap, snap.favorites, block, area);
}

fn gallery_status_line(slot: &GallerySlot) -> Option<Line<'static>> {
    if slot.is_loading() {
        Some(Line::from(Span::styled(
            format!(" Loading {} profiles...", slot.kind().count()),
            styles::highlight_style(),
        )))
    } else {
        slot.last_error().map(|e| {
            Line::from(Span::styled(
                format!(" {} ([r] to retry)", e.user_message()),
                styles::error_style(),
            ))
        })
    }
}

fn render_gallery(frame: &mut Frame, app: &App, snap: &Snapshot, slot: &GallerySlot, area: Rect) {
    let block = panel_block(slot.kind().label());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    if let Some(status) = gallery_status_line(slot) {
        frame.render_widget(Paragraph::new(status), chunks[0]);
    }
    render_profile_list(
        frame,
        app,
        snap,
        slot.profiles(),
        Block::default().borders(Borders::NONE),
        chunks[1],
    );
}

fn render_bulk(frame: &mut Frame, app: &App, snap: &Snapshot, area: Rect) {
    let slot = snap.bulk;
    let block = panel_block(slot.kind().label());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    if let Some(status) = gallery_status_line(slot) {
        frame.render_widget(Paragraph::new(status), chunks[0]);
    }

    let profiles = slot.profiles();
    if profiles.is_empty() {
        return;
    }

    let row_count = profiles.len().div_ceil(BULK_COLUMNS);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, row_count as u32); row_count])
        .split(chunks[1]);

    for (row_index, row_area) in rows.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, BULK_COLUMNS as u32); BULK_COLUMNS])
            .split(*row_area);

        for (col, cell_area) in cells.iter().enumerate() {
            let index = row_index * BULK_COLUMNS + col;
            if let Some(profile) = profiles.get(index) {
                render_bulk_cell(frame, snap, profile, index == app.selection, *cell_area);
            }
        }
    }
}

fn render_bulk_cell(frame: &mut Frame, snap: &Snapshot, profile: &Profile, selected: bool, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let theme = profile.theme();

    let mut name = vec![Span::styled(
        truncate_string(&profile.full_name(), width.saturating_sub(2)),
        styles::theme_style(theme),
    )];
    if snap.is_favorite(profile) {
        name.push(Span::styled(" ★", styles::favorite_style()));
    }

    let lines = vec![
        Line::from(name),
        Line::from(Span::styled(
            truncate_string(&format!("{} · {}", profile.age(), profile.location.country), width),
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(selected));
    let mut paragraph = Paragraph::new(lines).block(block);
    if selected {
        paragraph = paragraph.style(styles::selected_style());
    }
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Overlays
// ============================================================================

fn render_profile_modal(frame: &mut Frame, profile: &Profile, favorite: bool) {
    let area = centered_rect_fixed(64, 16, frame.area());
    frame.render_widget(Clear, area);

    let theme = profile.theme();
    let favorite_line = if favorite {
        Line::from(Span::styled("★ In your favorites", styles::favorite_style()))
    } else {
        Line::from(Span::styled("Not a favorite", styles::muted_style()))
    };

    let lines = vec![
        Line::from(Span::styled(profile.full_name(), styles::theme_style(theme))),
        Line::from(Span::styled(format!("@{}", profile.username()), styles::muted_style())),
        Line::from(""),
        field_line("Age", profile.age().to_string()),
        field_line("Born", format_birth_date(&profile.dob.date)),
        field_line("Email", profile.email.clone()),
        field_line("Phone", format_phone(&profile.phone)),
        field_line("Address", profile.full_address()),
        Line::from(""),
        favorite_line,
        Line::from(""),
        Line::from(vec![
            Span::styled("[x]", styles::help_key_style()),
            Span::styled(" toggle favorite  ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Profile ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(styles::theme_color(theme)));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  profilecache", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Profile", styles::highlight_style())),
        help_line("g", "Generate new profile"),
        help_line("f", "Favorite / unfavorite current"),
        Line::from(""),
        Line::from(Span::styled(" Panels", styles::highlight_style())),
        help_line("d", "Details and map"),
        help_line("v", "Favorites"),
        help_line("l", "Gallery (5 profiles)"),
        help_line("b", "Bulk profiles (12)"),
        help_line("r", "Refresh gallery"),
        help_line("Esc", "Close modal, then panel"),
        Line::from(""),
        Line::from(Span::styled(" Lists", styles::highlight_style())),
        help_line("↑/↓", "Navigate"),
        help_line("Enter", "Open profile"),
        help_line("x", "Toggle favorite on selected"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, snap: &Snapshot, area: Rect) {
    let shortcuts = "[g]enerate | [v]favorites | [q]uit";

    let (left_text, left_style) = match (snap.status_message, snap.loading, &snap.cached_age) {
        (Some(msg), _, _) => (format!(" {} ", msg), styles::muted_style()),
        (None, true, _) => (" Fetching profile... ".to_string(), styles::highlight_style()),
        (None, false, Some(age)) => (format!(" Updated {} ", age), styles::success_style()),
        (None, false, None) => (String::new(), styles::muted_style()),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
