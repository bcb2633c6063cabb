use leptos::prelude::*;
use wasm_bindgen::JsCast;

use tilemap_shared::{GameState, MapCommand, MapStyle, MapView, Rect, Viewport};

use crate::canvas::MapCanvas;
use crate::provider;

/// Apply a provider command to the map.
fn handle_command(
    command: MapCommand,
    map_view: RwSignal<MapView>,
    viewport: RwSignal<Viewport>,
    names: RwSignal<Vec<String>>,
    centered: RwSignal<bool>,
) {
    match command {
        MapCommand::GameState { state } => {
            apply_snapshot(&state, map_view, viewport, names, centered)
        }
        MapCommand::CenterOnPlayer { player } => center_on(&player, map_view, viewport),
    }
}

/// Scene bounds to center on for the first snapshot with anything in it.
fn initial_focus(already_centered: bool, state: &GameState, map_view: &MapView) -> Option<Rect> {
    if already_centered || state.is_empty() {
        return None;
    }
    map_view.scene().bounds()
}

fn apply_snapshot(
    state: &GameState,
    map_view: RwSignal<MapView>,
    viewport: RwSignal<Viewport>,
    names: RwSignal<Vec<String>>,
    centered: RwSignal<bool>,
) {
    // Identical scenes do not wake the canvas.
    map_view.maybe_update(|mv| mv.update_game_map(state));

    let latest = map_view.with_untracked(|mv| mv.player_names());
    if names.with_untracked(|current| *current != latest) {
        names.set(latest);
    }

    let focus = map_view.with_untracked(|mv| initial_focus(centered.get_untracked(), state, mv));
    if let Some(bounds) = focus {
        centered.set(true);
        viewport.update(|vp| vp.center_on_rect(&bounds));
    }
}

/// Unknown names leave the view where it is.
fn center_on(name: &str, map_view: RwSignal<MapView>, viewport: RwSignal<Viewport>) {
    let mut vp = viewport.get_untracked();
    if map_view.with_untracked(|mv| mv.center_map_on_player(name, &mut vp)) {
        viewport.set(vp);
    }
}

/// Root component: owns the render model and the view, and wires the provider to them.
#[component]
pub fn App(map_style: MapStyle) -> impl IntoView {
    let map_view: RwSignal<MapView> = RwSignal::new(MapView::new(map_style));
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());
    let player_names: RwSignal<Vec<String>> = RwSignal::new(Vec::new());
    let selected: RwSignal<Option<String>> = RwSignal::new(None);
    let centered: RwSignal<bool> = RwSignal::new(false);

    provide_context(map_view);
    provide_context(viewport);

    Effect::new(move || {
        provider::connect(move |command| {
            handle_command(command, map_view, viewport, player_names, centered);
        });
        on_cleanup(|| {
            provider::disconnect();
        });
    });

    let on_change = move |e: web_sys::Event| {
        let Some(target) = e.target() else {
            return;
        };
        let Ok(select) = target.dyn_into::<web_sys::HtmlSelectElement>() else {
            return;
        };
        let value = select.value();
        if value.is_empty() {
            selected.set(None);
            return;
        }
        center_on(&value, map_view, viewport);
        selected.set(Some(value));
    };

    view! {
        <div style="width: 100%; height: 100%; display: flex; flex-direction: column;">
            <div style="display: flex; align-items: center; gap: 8px; padding: 6px 10px; background: #1a1d2a; color: #e2e0d8; font-family: system-ui, sans-serif; font-size: 0.8rem;">
                <span>"Center on"</span>
                <select
                    on:change=on_change
                    style="min-width: 140px; background: #13161f; border: 1px solid #282c3e; border-radius: 4px; color: #e2e0d8; padding: 3px 6px;"
                >
                    <option value="" selected=move || selected.get().is_none()>"-"</option>
                    <For
                        each=move || player_names.get()
                        key=|name| name.clone()
                        children=move |name| {
                            let is_selected = {
                                let name = name.clone();
                                move || selected.get().as_deref() == Some(name.as_str())
                            };
                            let value = name.clone();
                            view! {
                                <option value=value selected=is_selected>
                                    {name}
                                </option>
                            }
                        }
                    />
                </select>
            </div>
            <div style="flex: 1; position: relative; overflow: hidden; background: #0c0e17;">
                <MapCanvas />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use tilemap_shared::{Coord, PlayerState};

    use super::*;

    fn with_player(name: &str, x: i32, y: i32) -> GameState {
        let mut state = GameState::default();
        state.players.insert(
            name.to_string(),
            PlayerState {
                coord: Coord::new(x, y),
                color: 0,
            },
        );
        state
    }

    #[test]
    fn empty_first_snapshot_defers_initial_centering() {
        let mut view = MapView::default();

        let empty = GameState::default();
        view.update_game_map(&empty);
        assert_eq!(initial_focus(false, &empty, &view), None);

        let populated = with_player("p", 10, 10);
        view.update_game_map(&populated);
        let bounds = initial_focus(false, &populated, &view).expect("populated scene has bounds");
        assert_eq!(bounds, view.scene().bounds().expect("scene bounds"));
        assert!(bounds.right() >= 11.0 * 48.0);
    }

    #[test]
    fn later_snapshots_keep_the_user_view() {
        let mut view = MapView::default();
        let populated = with_player("p", 2, 2);
        view.update_game_map(&populated);
        assert_eq!(initial_focus(true, &populated, &view), None);
    }
}
