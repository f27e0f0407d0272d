mod city;
mod input;
mod platform;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use city::config::EngineConfig;
use city::save::SnapshotStore;
use city::PixelCity;
use input::{ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

/// Query the grid container's bounding rect and convert a mouse position to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();
    cs.cell_at(click_x, click_y, rect.width(), rect.height())
}

#[cfg(target_arch = "wasm32")]
fn open_store() -> Box<dyn SnapshotStore> {
    Box::new(city::save::LocalStorage::new())
}

#[cfg(not(target_arch = "wasm32"))]
fn open_store() -> Box<dyn SnapshotStore> {
    Box::new(city::save::MemoryStore::new())
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let city = Rc::new(RefCell::new(PixelCity::new(
        open_store(),
        EngineConfig::default(),
        platform::rng_seed(),
    )));
    city.borrow_mut().start();

    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let city = city.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                return;
            };
            let matched = cs.hit_test(col, row);
            drop(cs);

            if let Some(action_id) = matched {
                city.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let city = city.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => c,
                KeyCode::Enter => '\n',
                _ => return,
            };
            city.borrow_mut().handle_input(&InputEvent::Key(key));
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let mut pc = city.borrow_mut();
            pc.advance(platform::frame_ms());
            pc.flush();

            let area = f.area();
            click_state.borrow_mut().begin_frame(area);
            pc.render(f, area, &click_state);
        }
    });

    Ok(())
}
