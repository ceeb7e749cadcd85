//! Drawing Surface Component
//!
//! Tissue image on an HTML5 Canvas with pan/zoom and the four drawing tools.
//! Finished shapes stay on the overlay and are sent to the chat.

use leptos::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent};

use labscope::annotation::{DrawTool, DrawnShape, Gesture, Point, ShapeCollection, Viewport};

use crate::state::ChatState;

/// Zoom factor per wheel notch or button press
const ZOOM_STEP: f64 = 1.25;
/// Clicks this close to the first vertex close a polygon (screen pixels)
const CLOSE_TOLERANCE_PX: f64 = 10.0;
const MARKER_RADIUS_PX: f64 = 6.0;

const SHAPE_STROKE: &str = "#FF9800";
const SHAPE_FILL: &str = "rgba(255, 152, 0, 0.2)";
const PREVIEW_STROKE: &str = "#4CAF50";
const PREVIEW_FILL: &str = "rgba(76, 175, 80, 0.15)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Pan,
    Draw(DrawTool),
}

/// Pannable, zoomable image with a shape overlay
#[component]
pub fn DrawingSurface(
    #[prop(into)]
    image_url: Signal<String>,
) -> impl IntoView {
    let state = use_context::<ChatState>().expect("ChatState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    let viewport = create_rw_signal(state.viewer_config.with_value(Viewport::from_config));
    let gesture = create_rw_signal(Gesture::default());
    let mode = create_rw_signal(Mode::Pan);
    let drag_from = create_rw_signal(None::<(f64, f64)>);
    let image = store_value(None::<LoadingImage>);
    let image_ready = create_rw_signal(false);

    // (Re)load the raster whenever the URL changes
    create_effect(move |_| {
        let url = image_url.get();
        image_ready.set(false);

        let loading = LoadingImage::new(&url, move || {
            if let Some(canvas) = canvas_ref.get_untracked() {
                viewport.update(|vp| vp.fit(canvas.width() as f64, canvas.height() as f64));
            }
            image_ready.set(true);
        });
        // Dropping the previous image detaches its callbacks
        image.set_value(loading);
    });

    // Redraw on any view, shape or gesture change
    create_effect(move |_| {
        let vp = viewport.get();
        let img = if image_ready.get() {
            image.with_value(|i| i.as_ref().map(|l| l.element.clone()))
        } else {
            None
        };
        let preview = gesture.with(|g| g.preview());

        if let Some(canvas) = canvas_ref.get() {
            state.shapes.with(|shapes| {
                draw_surface(&canvas, &vp, img.as_ref(), shapes, preview.as_ref());
            });
        }
    });

    let on_wheel = move |ev: web_sys::WheelEvent| {
        ev.prevent_default();
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let (x, y) = canvas_point(&canvas, &ev);
        let factor = wheel_factor(ev.delta_y());
        viewport.update(|vp| vp.zoom_at(x, y, factor));
    };

    let on_mouse_down = move |ev: MouseEvent| {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let (x, y) = canvas_point(&canvas, &ev);

        match mode.get_untracked() {
            Mode::Pan => drag_from.set(Some((x, y))),
            Mode::Draw(_) => {
                let vp = viewport.get_untracked();
                let p = vp.screen_to_image(x, y);
                let tolerance = vp.screen_distance(CLOSE_TOLERANCE_PX);
                if let Some(shape) = gesture.try_update(|g| g.press(p, tolerance)).flatten() {
                    state.shape_drawn(shape);
                }
            }
        }
    };

    let on_mouse_move = move |ev: MouseEvent| {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let (x, y) = canvas_point(&canvas, &ev);

        match mode.get_untracked() {
            Mode::Pan => {
                if let Some((last_x, last_y)) = drag_from.get_untracked() {
                    viewport.update(|vp| vp.pan_by(x - last_x, y - last_y));
                    drag_from.set(Some((x, y)));
                }
            }
            Mode::Draw(_) => {
                if gesture.with_untracked(Gesture::is_active) {
                    let p = viewport.with_untracked(|vp| vp.screen_to_image(x, y));
                    gesture.update(|g| g.move_to(p));
                }
            }
        }
    };

    let on_mouse_up = move |ev: MouseEvent| {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let (x, y) = canvas_point(&canvas, &ev);

        match mode.get_untracked() {
            Mode::Pan => drag_from.set(None),
            Mode::Draw(_) => {
                let p = viewport.with_untracked(|vp| vp.screen_to_image(x, y));
                if let Some(shape) = gesture.try_update(|g| g.release(p)).flatten() {
                    state.shape_drawn(shape);
                }
            }
        }
    };

    let select_tool = move |target: Mode| {
        match target {
            Mode::Pan => gesture.update(|g| g.cancel()),
            Mode::Draw(tool) => gesture.update(|g| g.set_tool(tool)),
        }
        mode.set(target);
    };

    let zoom_center = move |factor: f64| {
        if let Some(canvas) = canvas_ref.get_untracked() {
            let (cx, cy) = (canvas.width() as f64 / 2.0, canvas.height() as f64 / 2.0);
            viewport.update(|vp| vp.zoom_at(cx, cy, factor));
        }
    };

    view! {
        <div class="space-y-3">
            // Tool bar
            <div class="flex flex-wrap items-center gap-2">
                <ToolButton
                    label="Pan"
                    current=mode
                    target=Mode::Pan
                    on_click=move |_| select_tool(Mode::Pan)
                />
                {DrawTool::ALL.into_iter().map(|tool| view! {
                    <ToolButton
                        label=tool.label()
                        current=mode
                        target=Mode::Draw(tool)
                        on_click=move |_| select_tool(Mode::Draw(tool))
                    />
                }).collect_view()}

                {move || (mode.get() == Mode::Draw(DrawTool::Polygon)).then(|| view! {
                    <button
                        on:click=move |_| {
                            if let Some(shape) = gesture.try_update(|g| g.finish()).flatten() {
                                state.shape_drawn(shape);
                            }
                        }
                        class="px-3 py-2 rounded-lg text-sm bg-green-700 hover:bg-green-600 transition-colors"
                    >
                        "Finish polygon"
                    </button>
                })}

                <div class="flex-1" />

                <SmallButton label="+" on_click=move |_| zoom_center(ZOOM_STEP) />
                <SmallButton label="−" on_click=move |_| zoom_center(1.0 / ZOOM_STEP) />
                <SmallButton label="Fit" on_click=move |_| {
                    if let Some(canvas) = canvas_ref.get_untracked() {
                        viewport.update(|vp| vp.fit(canvas.width() as f64, canvas.height() as f64));
                    }
                } />
                <SmallButton label="Clear shapes" on_click=move |_| {
                    gesture.update(|g| g.cancel());
                    state.shapes.update(|s| s.clear());
                } />
            </div>

            <canvas
                node_ref=canvas_ref
                width="900"
                height="600"
                class=move || {
                    let cursor = match mode.get() {
                        Mode::Pan => "cursor-grab",
                        Mode::Draw(_) => "cursor-crosshair",
                    };
                    format!("w-full rounded-lg border border-gray-700 {}", cursor)
                }
                on:wheel=on_wheel
                on:mousedown=on_mouse_down
                on:mousemove=on_mouse_move
                on:mouseup=on_mouse_up
                on:mouseleave=move |_| {
                    drag_from.set(None);
                    gesture.update(|g| g.pointer_left());
                }
            />
        </div>
    }
}

#[component]
fn ToolButton(
    label: &'static str,
    current: RwSignal<Mode>,
    target: Mode,
    on_click: impl Fn(MouseEvent) + 'static,
) -> impl IntoView {
    view! {
        <button
            type="button"
            on:click=on_click
            class=move || {
                let base = "px-3 py-2 rounded-lg text-sm font-medium transition-colors";
                if current.get() == target {
                    format!("{} bg-primary-600 text-white", base)
                } else {
                    format!("{} bg-gray-700 text-gray-300 hover:bg-gray-600", base)
                }
            }
        >
            {label}
        </button>
    }
}

#[component]
fn SmallButton(
    label: &'static str,
    on_click: impl Fn(MouseEvent) + 'static,
) -> impl IntoView {
    view! {
        <button
            type="button"
            on:click=on_click
            class="px-3 py-2 rounded-lg text-sm bg-gray-700 text-gray-300 hover:bg-gray-600 transition-colors"
        >
            {label}
        </button>
    }
}

/// Scrolling up zooms in
fn wheel_factor(delta_y: f64) -> f64 {
    if delta_y < 0.0 {
        ZOOM_STEP
    } else {
        1.0 / ZOOM_STEP
    }
}

/// Event position in canvas pixels (the element may be scaled by CSS)
fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
    let scale_x = canvas.width() as f64 / canvas.client_width().max(1) as f64;
    let scale_y = canvas.height() as f64 / canvas.client_height().max(1) as f64;
    (ev.offset_x() as f64 * scale_x, ev.offset_y() as f64 * scale_y)
}

fn draw_surface(
    canvas: &HtmlCanvasElement,
    vp: &Viewport,
    image: Option<&HtmlImageElement>,
    shapes: &ShapeCollection,
    preview: Option<&DrawnShape>,
) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    // Clear canvas
    ctx.set_fill_style(&"#111827".into()); // gray-900
    ctx.fill_rect(0.0, 0.0, width, height);

    // Raster spans the whole image space; its top-left is (0, height)
    match image {
        Some(img) => {
            let (left, top) = vp.image_to_screen(&Point::new(0.0, vp.image_height));
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                left,
                top,
                vp.image_width * vp.zoom,
                vp.image_height * vp.zoom,
            );
        }
        None => {
            ctx.set_fill_style(&"#6b7280".into());
            ctx.set_font("16px sans-serif");
            let _ = ctx.fill_text("Loading image...", width / 2.0 - 60.0, height / 2.0);
        }
    }

    ctx.set_line_width(2.0);
    ctx.set_stroke_style(&SHAPE_STROKE.into());
    ctx.set_fill_style(&SHAPE_FILL.into());
    for (_, shape) in shapes.iter() {
        trace_shape(&ctx, vp, shape);
    }

    if let Some(shape) = preview {
        ctx.set_stroke_style(&PREVIEW_STROKE.into());
        ctx.set_fill_style(&PREVIEW_FILL.into());
        trace_shape(&ctx, vp, shape);
    }
}

fn trace_shape(ctx: &CanvasRenderingContext2d, vp: &Viewport, shape: &DrawnShape) {
    ctx.begin_path();
    match shape {
        DrawnShape::Rectangle { .. } | DrawnShape::Polygon { .. } => {
            for (i, p) in shape.vertices().iter().enumerate() {
                let (x, y) = vp.image_to_screen(p);
                if i == 0 {
                    ctx.move_to(x, y);
                } else {
                    ctx.line_to(x, y);
                }
            }
            ctx.close_path();
        }
        DrawnShape::Circle { center, radius } => {
            let (x, y) = vp.image_to_screen(center);
            let _ = ctx.arc(x, y, radius * vp.zoom, 0.0, std::f64::consts::PI * 2.0);
        }
        DrawnShape::Marker { position } => {
            let (x, y) = vp.image_to_screen(position);
            let _ = ctx.arc(x, y, MARKER_RADIUS_PX, 0.0, std::f64::consts::PI * 2.0);
        }
    }
    ctx.fill();
    ctx.stroke();
}

/// Image element that owns its load callbacks
struct LoadingImage {
    element: HtmlImageElement,
    _on_load: Closure<dyn FnMut()>,
    _on_error: Closure<dyn FnMut()>,
}

impl LoadingImage {
    fn new(url: &str, on_ready: impl FnMut() + 'static) -> Option<Self> {
        let element = HtmlImageElement::new().ok()?;

        let on_load = Closure::wrap(Box::new(on_ready) as Box<dyn FnMut()>);
        element.set_onload(Some(on_load.as_ref().unchecked_ref()));

        let on_error = Closure::wrap(Box::new(|| {
            web_sys::console::error_1(&"Failed to load image".into());
        }) as Box<dyn FnMut()>);
        element.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        element.set_src(url);
        Some(Self {
            element,
            _on_load: on_load,
            _on_error: on_error,
        })
    }
}

impl Drop for LoadingImage {
    fn drop(&mut self) {
        self.element.set_onload(None);
        self.element.set_onerror(None);
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn replaced_image_releases_its_callbacks() {
        let mut current = LoadingImage::new("data:,", || {});
        let element = current.as_ref().unwrap().element.clone();
        assert!(element.onload().is_some());
        assert!(element.onerror().is_some());

        current = LoadingImage::new("data:,", || {});
        assert!(element.onload().is_none());
        assert!(element.onerror().is_none());
        assert!(current.unwrap().element.onload().is_some());
    }
}
