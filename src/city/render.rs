//! Minimal Pixel City rendering: stats header, click button, tabbed shop, log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::platform;
use crate::widgets::{ClickableList, TabBar};

use super::actions::{
    listed_upgrades, Tab, BUY_GENERATOR_BASE, BUY_SKILL_BASE, BUY_UPGRADE_BASE, CLICK_PIXEL,
    REBIRTH, RESET,
};
use super::logic::{
    can_buy_generator, can_buy_upgrade, format_number, generator_price, is_upgrade_unlocked,
    prerequisites_met, skill_available, upgrade_price,
};
use super::catalog;
use super::state::GameState;
use super::PixelCity;

pub fn render(city: &PixelCity, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    // Log panel on the right when wide enough
    let (main_area, log_area) = if is_narrow_layout(area.width) {
        (area, None)
    } else {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (h_chunks[0], Some(h_chunks[1]))
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // stats
            Constraint::Length(3), // click button
            Constraint::Length(3), // tab bar
            Constraint::Min(5),    // content
            Constraint::Length(3), // rebirth / reset
        ])
        .split(main_area);

    render_header(city, f, chunks[0]);
    render_click_button(city, f, chunks[1], click_state);
    render_tab_bar(city.tab(), f, chunks[2], click_state);
    match city.tab() {
        Tab::Generators => render_generators(&city.state(), f, chunks[3], click_state),
        Tab::Upgrades => render_upgrades(&city.state(), f, chunks[3], click_state),
        Tab::Skills => render_skills(&city.state(), f, chunks[3], click_state),
        Tab::Stats => render_stats(city, f, chunks[3]),
    }
    render_footer(city, f, chunks[4], click_state);

    if let Some(log_area) = log_area {
        render_log(city, f, log_area);
    }
}

fn render_header(city: &PixelCity, f: &mut Frame, area: Rect) {
    let state = city.state();
    let saved = match city.last_saved() {
        Some(stamp) => {
            let secs = ((platform::now_ms() - stamp) / 1000.0).max(0.0).floor();
            format!("saved {}s ago", secs as u64)
        }
        None => "not saved yet".to_string(),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} pixels", format_number(state.pixels)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  +{}/s", format_number(city.pixels_per_second())),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!(" Society Lv {}", state.society_level),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("  RP {}", state.rebirth_points),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(format!("  {}", saved), Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Minimal Pixel City ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_click_button(
    city: &PixelCity,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let state = city.state();
    let label = Line::from(vec![
        Span::styled(
            " ▣ CLICK ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  +{} per click", format_number(state.click_power)),
            Style::default().fg(Color::White),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(
        Paragraph::new(label).alignment(Alignment::Center).block(block),
        area,
    );

    click_state.borrow_mut().add_click_target(area, CLICK_PIXEL);
}

fn render_tab_bar(active: Tab, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let mut bar = TabBar::new("│");
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let style = if *tab == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        bar = bar.tab(format!("{} {}", i + 1, tab.label()), style, tab.action_id());
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let mut cs = click_state.borrow_mut();
    bar.block(block).render(f, area, &mut cs);
}

/// Key hint for the n-th listed entry; entries past `z` are click-only.
fn key_label(n: usize) -> String {
    if n < 26 {
        format!("[{}]", (b'a' + n as u8) as char)
    } else {
        "   ".to_string()
    }
}

fn buy_style(affordable: bool) -> Style {
    if affordable {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn section_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" ── {} ──", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn render_content(f: &mut Frame, area: Rect, title: &str, cl: ClickableList, click_state: &Rc<RefCell<ClickState>>) {
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", title));
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_generators(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    let mut current_tier = None;

    for (i, g) in state.generators.iter().enumerate() {
        if current_tier != Some(g.tier) {
            current_tier = Some(g.tier);
            cl.push(section_header(g.tier.name()));
        }
        let price = generator_price(state, g.id).unwrap_or(g.cost);
        let style = buy_style(can_buy_generator(state, g.id));
        let line = Line::from(vec![
            Span::styled(format!(" {} {}", key_label(i), g.name), style),
            Span::styled(format!(" x{}", g.count), Style::default().fg(Color::White)),
            Span::styled(format!("  {} px", format_number(price)), style),
            Span::styled(
                format!("  +{}/s each", format_number(g.pixels_per_second)),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        cl.push_clickable(line, BUY_GENERATOR_BASE + i as u16);
    }

    render_content(f, area, "Generators", cl, click_state);
}

fn render_upgrades(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    let listed = listed_upgrades(state);
    if listed.is_empty() {
        cl.push(Line::from(Span::styled(
            " Every upgrade has been bought.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let mut current_tier = None;
    for (n, &idx) in listed.iter().enumerate() {
        let u = &state.upgrades[idx];
        if current_tier != Some(u.tier) {
            current_tier = Some(u.tier);
            cl.push(section_header(u.tier.name()));
        }
        let line = if is_upgrade_unlocked(state, u) {
            let price = upgrade_price(state, u.id).unwrap_or(u.cost);
            let style = buy_style(can_buy_upgrade(state, u.id));
            Line::from(vec![
                Span::styled(format!(" {} {}", key_label(n), u.name), style),
                Span::styled(format!("  {} px", format_number(price)), style),
                Span::styled(format!("  {}", u.description), Style::default().fg(Color::DarkGray)),
            ])
        } else {
            let needed = u.required_rebirths.unwrap_or(0);
            Line::from(Span::styled(
                format!(" {} {}  (needs {} rebirths)", key_label(n), u.name, needed),
                Style::default().fg(Color::DarkGray),
            ))
        };
        cl.push_clickable(line, BUY_UPGRADE_BASE + idx as u16);
    }

    render_content(f, area, "Upgrades", cl, click_state);
}

fn render_skills(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        format!(" Rebirth points: {}", state.rebirth_points),
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    )));

    for (i, s) in state.rebirth_skills.iter().enumerate() {
        let status = if s.is_maxed() {
            Span::styled("  MAX", Style::default().fg(Color::Cyan))
        } else if !prerequisites_met(state, s) {
            let names: Vec<&str> = s
                .requires
                .iter()
                .map(|req| state.skill(req).map_or(*req, |r| r.name))
                .collect();
            Span::styled(
                format!("  needs {}", names.join(", ")),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::styled(format!("  {} RP", s.cost), Style::default().fg(Color::White))
        };
        let affordable = skill_available(state, s.id) && state.rebirth_points >= s.cost;
        let line = Line::from(vec![
            Span::styled(format!(" {} {}", key_label(i), s.name), buy_style(affordable)),
            Span::styled(
                format!(" Lv {}/{}", s.level, s.max_level),
                Style::default().fg(Color::White),
            ),
            status,
        ]);
        cl.push_clickable(line, BUY_SKILL_BASE + i as u16);
    }
    if state.rebirth_skills.is_empty() {
        cl.push(Line::from(Span::styled(
            " The skill tree is empty. Buy any skill to restore it.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        cl.push(section_header("Skill tree"));
        for line in skill_tree_lines(state) {
            cl.push(line);
        }
    }

    render_content(f, area, "Rebirth Skills", cl, click_state);
}

/// One row per prerequisite edge, lit once the required skill has a level.
fn skill_tree_lines(state: &GameState) -> Vec<Line<'static>> {
    let name = |id: &'static str| state.skill(id).map_or(id, |s| s.name);
    catalog::skill_edges()
        .into_iter()
        .map(|(required, dependent)| {
            let met = state.skill(required).map_or(false, |s| s.level > 0);
            let style = if met {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::from(Span::styled(
                format!("   {} ─▶ {}", name(required), name(dependent)),
                style,
            ))
        })
        .collect()
}

fn render_stats(city: &PixelCity, f: &mut Frame, area: Rect) {
    let state = city.state();
    let effects = city.rebirth_effects();
    let special = &state.special_effects;
    let percent = |v: f64| format!("{}%", format_number(v * 100.0));

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {:<22}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ])
    };

    let lines = vec![
        section_header("Progress"),
        row("Lifetime pixels", format_number(state.lifetime_pixels)),
        row("Total clicks", format_number(state.total_clicks as f64)),
        row("Rebirths", state.rebirth_count.to_string()),
        row("Rebirth points", state.rebirth_points.to_string()),
        section_header("Skill bonuses"),
        row("Click multiplier", format!("x{}", format_number(effects.click_multiplier))),
        row("Generator efficiency", format!("x{}", format_number(effects.generator_efficiency))),
        row("Starting pixels", format_number(effects.starting_pixels)),
        row("Upgrade discount", percent(effects.upgrade_cost_reduction)),
        row("Generator discount", percent(effects.generator_cost_reduction)),
        section_header("Prestige effects"),
        row("Critical click chance", percent(special.critical_click_chance)),
        row("Generator speed", percent(special.auto_click_speed_boost)),
        row("Combo", percent(special.current_combo)),
        row("Passive income", percent(special.passive_income_rate)),
        row("Rebirth bonus", percent(special.rebirth_bonus)),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Stats ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(city: &PixelCity, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let pending = city.pending_rebirth_points();
    let (rebirth_text, rebirth_style) = if pending > 0 {
        (
            format!(" [R] Rebirth (+{} RP)", pending),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            " [R] Rebirth (needs 1,000 lifetime px)".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    };
    let (reset_text, reset_style) = if city.reset_armed() {
        (
            " [X] Confirm reset!",
            Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        (" [X] Reset", Style::default().fg(Color::Red))
    };

    let border = Style::default().fg(Color::DarkGray);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(rebirth_text, rebirth_style)))
            .block(Block::default().borders(Borders::ALL).border_style(border)),
        cols[0],
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(reset_text, reset_style)))
            .block(Block::default().borders(Borders::ALL).border_style(border)),
        cols[1],
    );

    let mut cs = click_state.borrow_mut();
    cs.add_click_target(cols[0], REBIRTH);
    cs.add_click_target(cols[1], RESET);
}

fn render_log(city: &PixelCity, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2);

    // Newest first, stopping once the wrapped rows fill the panel
    let mut lines: Vec<Line> = Vec::new();
    let mut used = 0;
    for entry in city.log().iter().rev() {
        let style = if entry.is_important {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let line = Line::from(Span::styled(format!(" {}", entry.text), style));
        let rows = Paragraph::new(line.clone())
            .wrap(Wrap { trim: false })
            .line_count(inner_width);
        if used + rows > visible {
            break;
        }
        used += rows;
        lines.push(line);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Log ");
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
