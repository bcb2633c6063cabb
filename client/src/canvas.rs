use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent};

use tilemap_shared::{DrawCommand, DrawList, MapView, TextAlign, Viewport};

use crate::colors::rgb_css;
use crate::render_loop::RenderScheduler;

const LINE_HEIGHT_RATIO: f64 = 1.25;
const FONT_FAMILY: &str = "sans-serif";

struct ResizeBinding {
    window: web_sys::Window,
    handler: Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

/// Pointer drag in progress, in client pixels.
#[derive(Default)]
struct DragState {
    active: Cell<bool>,
    last: Cell<(f64, f64)>,
}

impl DragState {
    fn begin(&self, x: f64, y: f64) {
        self.active.set(true);
        self.last.set((x, y));
    }

    /// Delta since the previous pointer position, or `None` when not dragging.
    fn move_to(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !self.active.get() {
            return None;
        }
        let (lx, ly) = self.last.replace((x, y));
        Some((x - lx, y - ly))
    }

    /// Pointer released, cancelled, or capture lost.
    fn end(&self) {
        self.active.set(false);
    }
}

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|dpr| dpr.is_finite() && *dpr > 0.0)
        .unwrap_or(1.0)
}

/// Backing-store size for a CSS-pixel canvas at the given device pixel ratio.
fn backing_size(css_w: f64, css_h: f64, dpr: f64) -> (u32, u32) {
    (
        (css_w * dpr).round().max(1.0) as u32,
        (css_h * dpr).round().max(1.0) as u32,
    )
}

fn font_css(font_px: f64) -> String {
    format!("{font_px}px {FONT_FAMILY}")
}

/// Horizontal anchor for `fill_text` given the command's box and alignment.
fn text_anchor_x(x: f64, width: Option<f64>, align: TextAlign) -> f64 {
    match (align, width) {
        (TextAlign::Center, Some(w)) => x + w / 2.0,
        _ => x,
    }
}

/// Each line of a text command with its top offset from the text box.
fn text_lines(text: &str, font_px: f64) -> impl Iterator<Item = (f64, &str)> {
    let line_height = font_px * LINE_HEIGHT_RATIO;
    text.split('\n')
        .enumerate()
        .map(move |(i, line)| (i as f64 * line_height, line))
}

/// Paint the background brush and every draw command, in list order.
pub fn paint_scene(
    ctx: &CanvasRenderingContext2d,
    scene: &DrawList,
    vp: &Viewport,
    font_px: f64,
    dpr: f64,
) {
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.clear_rect(0.0, 0.0, vp.width * dpr, vp.height * dpr);
    ctx.set_transform(dpr, 0.0, 0.0, dpr, vp.offset_x * dpr, vp.offset_y * dpr)
        .ok();
    ctx.set_line_width(1.0);

    let brush = scene.background();
    let ground = rgb_css(brush.fill);
    let grid = rgb_css(brush.stroke);
    ctx.set_fill_style_str(&ground);
    ctx.set_stroke_style_str(&grid);
    for tile in brush.tiles_in(vp.visible_world_rect()) {
        ctx.fill_rect(tile.x, tile.y, tile.w, tile.h);
        ctx.stroke_rect(tile.x + 0.5, tile.y + 0.5, tile.w, tile.h);
    }

    let font = font_css(font_px);
    ctx.set_font(&font);
    ctx.set_text_baseline("top");

    for command in scene.commands() {
        match command {
            DrawCommand::Rect {
                bounds,
                stroke,
                fill,
                ..
            } => {
                ctx.set_fill_style_str(&rgb_css(*fill));
                ctx.fill_rect(bounds.x, bounds.y, bounds.w, bounds.h);
                ctx.set_stroke_style_str(&rgb_css(*stroke));
                ctx.stroke_rect(bounds.x + 0.5, bounds.y + 0.5, bounds.w, bounds.h);
            }
            DrawCommand::Ellipse {
                bounds,
                stroke,
                fill,
                ..
            } => {
                let (cx, cy) = bounds.center();
                ctx.begin_path();
                if ctx
                    .ellipse(cx, cy, bounds.w / 2.0, bounds.h / 2.0, 0.0, 0.0, TAU)
                    .is_err()
                {
                    continue;
                }
                ctx.set_fill_style_str(&rgb_css(*fill));
                ctx.fill();
                ctx.set_stroke_style_str(&rgb_css(*stroke));
                ctx.stroke();
            }
            DrawCommand::Text {
                x,
                y,
                text,
                color,
                align,
                width,
                ..
            } => {
                ctx.set_fill_style_str(&rgb_css(*color));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                });
                let ax = text_anchor_x(*x, *width, *align);
                for (dy, line) in text_lines(text, font_px) {
                    ctx.fill_text(line, ax, y + dy).ok();
                }
            }
        }
    }
}

/// Map canvas: paints the current scene and scrolls it by dragging.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let map_view: RwSignal<MapView> = expect_context();
    let viewport: RwSignal<Viewport> = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    let drag = Rc::new(DragState::default());

    // Cached 2D context, dropped whenever the backing store is resized.
    let cached_ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
    let cached_ctx_render = cached_ctx.clone();

    let scheduler = RenderScheduler::new(move || {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let canvas: &HtmlCanvasElement = &canvas;
        let Some(parent) = canvas.parent_element() else {
            return;
        };
        let w = parent.client_width() as f64;
        let h = parent.client_height() as f64;
        if w <= 0.0 || h <= 0.0 {
            return;
        }

        let dpr = device_pixel_ratio();
        let (bw, bh) = backing_size(w, h, dpr);
        if canvas.width() != bw || canvas.height() != bh {
            canvas.set_width(bw);
            canvas.set_height(bh);
            *cached_ctx_render.borrow_mut() = None;
        }
        if viewport.with_untracked(|vp| vp.width != w || vp.height != h) {
            viewport.update_untracked(|vp| vp.resize(w, h));
        }

        let ctx = {
            let mut ctx_cache = cached_ctx_render.borrow_mut();
            if ctx_cache.is_none() {
                let Some(ctx) = canvas
                    .get_context("2d")
                    .ok()
                    .flatten()
                    .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
                else {
                    return;
                };
                *ctx_cache = Some(ctx);
            }
            let Some(ctx) = ctx_cache.clone() else {
                return;
            };
            ctx
        };

        viewport.with_untracked(|vp| {
            map_view.with_untracked(|mv| {
                paint_scene(&ctx, mv.scene(), vp, mv.style().font_px, dpr);
            });
        });
    });
    let scheduler = Rc::new(scheduler);

    // New scene or moved view: repaint.
    let sched_state = scheduler.clone();
    Effect::new(move || {
        map_view.track();
        viewport.track();
        sched_state.mark_dirty();
    });

    // Container size follows the window.
    let sched_resize = scheduler.clone();
    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        let sched = sched_resize.clone();
        let handler = Closure::<dyn Fn()>::new(move || sched.mark_dirty());
        RESIZE_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                old.window
                    .remove_event_listener_with_callback(
                        "resize",
                        old.handler.as_ref().unchecked_ref(),
                    )
                    .ok();
            }
            if window
                .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
                .is_ok()
            {
                *slot.borrow_mut() = Some(ResizeBinding {
                    window: window.clone(),
                    handler,
                });
            }
        });
        on_cleanup(|| {
            RESIZE_BINDING.with(|slot| {
                if let Some(binding) = slot.borrow_mut().take() {
                    binding
                        .window
                        .remove_event_listener_with_callback(
                            "resize",
                            binding.handler.as_ref().unchecked_ref(),
                        )
                        .ok();
                }
            });
        });
    });

    let on_pointer_down = {
        let drag = drag.clone();
        move |e: PointerEvent| {
            drag.begin(e.client_x() as f64, e.client_y() as f64);

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let drag = drag.clone();
        move |e: PointerEvent| {
            if let Some((dx, dy)) = drag.move_to(e.client_x() as f64, e.client_y() as f64) {
                viewport.update(|vp| vp.pan(dx, dy));
            }
        }
    };

    let on_pointer_end = move |e: PointerEvent| {
        drag.end();
        if let Some(target) = e.target()
            && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
        {
            el.style().set_property("cursor", "grab").ok();
        }
    };

    view! {
        <div
            style="position: relative; width: 100%; height: 100%; overflow: hidden;"
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_end.clone()
            on:pointercancel=on_pointer_end.clone()
            on:lostpointercapture=on_pointer_end
        >
            <canvas
                node_ref=canvas_ref
                style="position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none; cursor: grab;"
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_size_scales_and_never_hits_zero() {
        assert_eq!(backing_size(800.0, 600.0, 2.0), (1600, 1200));
        assert_eq!(backing_size(0.2, 0.2, 1.0), (1, 1));
    }

    #[test]
    fn centered_text_anchors_mid_box() {
        assert_eq!(text_anchor_x(96.0, Some(48.0), TextAlign::Center), 120.0);
        assert_eq!(text_anchor_x(96.0, None, TextAlign::Center), 96.0);
        assert_eq!(text_anchor_x(96.0, Some(48.0), TextAlign::Left), 96.0);
    }

    #[test]
    fn multi_line_text_steps_by_line_height() {
        let lines: Vec<(f64, &str)> = text_lines("a\nb\nc", 12.0).collect();
        assert_eq!(lines, vec![(0.0, "a"), (15.0, "b"), (30.0, "c")]);
    }

    #[test]
    fn drag_pans_by_pointer_delta() {
        let drag = DragState::default();
        assert_eq!(drag.move_to(5.0, 5.0), None);
        drag.begin(10.0, 20.0);
        assert_eq!(drag.move_to(14.0, 17.0), Some((4.0, -3.0)));
        assert_eq!(drag.move_to(14.0, 20.0), Some((0.0, 3.0)));
    }

    #[test]
    fn cancelled_drag_stops_panning() {
        let drag = DragState::default();
        drag.begin(0.0, 0.0);
        drag.end();
        assert_eq!(drag.move_to(50.0, 50.0), None);
    }

    #[test]
    fn font_string() {
        assert_eq!(font_css(12.0), "12px sans-serif");
    }
}
