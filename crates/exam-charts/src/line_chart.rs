//! Interactive multi-axis line chart surface
//!
//! Draws one [`SurfaceSpec`] and handles hover, drag-pan, wheel zoom and
//! two-pointer pinch zoom. All listeners are attached to the surface's own
//! `<svg>` and go away with it.

use crate::{
    ChartDimensions,
    colors,
    surface::{AxisView, HoverInfo, Projection, SurfaceConfig, SurfaceSpec, project},
    view_window::{ViewWindow, pointer_distance},
};
use exam_core::AxisPosition;
use leptos::{ev, prelude::*};
use wasm_bindgen::JsCast;

/// Zoom factor of one wheel notch
const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Active pointers by id, in view-box coordinates
type Pointers = Vec<(i32, (f64, f64))>;

#[component]
pub fn SurfaceChart(spec: SurfaceSpec, config: SurfaceConfig) -> impl IntoView {
    let dims = spec.dimensions(&config);
    let interaction = spec.interaction;
    let clip_id = format!("{}-clip", spec.id());
    let clip_url = format!("url(#{})", clip_id);
    let legend = legend_entries(&spec);

    let window = RwSignal::new(ViewWindow::default());
    let hover_at = RwSignal::new(None::<i64>);
    let pointers = StoredValue::new(Pointers::new());

    let spec = StoredValue::new(spec);
    let config = StoredValue::new(config);

    let projection = Memo::new(move |_| {
        let window = window.get();
        spec.with_value(|s| config.with_value(|c| project(s, c, &window)))
    });

    let hover = Memo::new(move |_| {
        hover_at
            .get()
            .and_then(|x_ms| spec.with_value(|s| s.hover_at(x_ms)))
    });

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    let on_wheel = move |ev: ev::WheelEvent| {
        if !interaction.wheel_zoom {
            return;
        }
        ev.prevent_default();
        let Some((x, y)) = viewbox_point(&ev, &dims) else {
            return;
        };
        let (fx, fy) = dims.plot_fraction(x, y);
        let factor = if ev.delta_y() < 0.0 {
            WHEEL_ZOOM_STEP
        } else {
            1.0 / WHEEL_ZOOM_STEP
        };
        window.update(|w| w.zoom_on(interaction.zoom, factor, fx, fy));
    };

    let on_pointer_down = move |ev: ev::PointerEvent| {
        let Some(point) = viewbox_point(&ev, &dims) else {
            return;
        };
        hover_at.set(None);
        let id = ev.pointer_id();
        pointers.update_value(|ps| {
            ps.retain(|(p, _)| *p != id);
            ps.push((id, point));
        });
    };

    let on_pointer_move = move |ev: ev::PointerEvent| {
        let Some(point) = viewbox_point(&ev, &dims) else {
            return;
        };
        let id = ev.pointer_id();
        let active = pointers.get_value();

        match active.as_slice() {
            [] => {
                let x_ms = projection.with_untracked(|p| p.x_scale.invert(point.0 - dims.margin.left));
                hover_at.set(Some(x_ms));
            }
            [(only, last)] if *only == id => {
                let dx = (point.0 - last.0) / dims.inner_width().max(1.0);
                let dy = -(point.1 - last.1) / dims.inner_height().max(1.0);
                window.update(|w| w.pan_on(interaction.pan, dx, dy));
            }
            [_, ..] if interaction.pinch_zoom => {
                let Some(last) = active.iter().find(|(p, _)| *p == id).map(|(_, at)| *at) else {
                    return;
                };
                let Some(other) = active.iter().find(|(p, _)| *p != id).map(|(_, at)| *at) else {
                    return;
                };
                let before = pointer_distance(last, other);
                let after = pointer_distance(point, other);
                if before > 0.0 {
                    let mid = ((point.0 + other.0) / 2.0, (point.1 + other.1) / 2.0);
                    let (fx, fy) = dims.plot_fraction(mid.0, mid.1);
                    window.update(|w| w.zoom_on(interaction.zoom, after / before, fx, fy));
                }
            }
            _ => {}
        }

        pointers.update_value(|ps| {
            if let Some(entry) = ps.iter_mut().find(|(p, _)| *p == id) {
                entry.1 = point;
            }
        });
    };

    let on_pointer_up = move |ev: ev::PointerEvent| {
        let id = ev.pointer_id();
        pointers.update_value(|ps| ps.retain(|(p, _)| *p != id));
    };

    let on_pointer_leave = move |_: ev::PointerEvent| {
        pointers.update_value(Vec::clear);
        hover_at.set(None);
    };

    let on_reset = move |_: ev::MouseEvent| window.update(ViewWindow::reset);

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    view! {
        <svg
            class="surface-chart"
            viewBox=dims.viewbox()
            preserveAspectRatio="none"
            style="width: 100%; height: 100%; touch-action: none;"
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointercancel=on_pointer_up
            on:pointerleave=on_pointer_leave
            on:dblclick=on_reset
        >
            <defs>
                <clipPath id=clip_id>
                    <rect width=dims.inner_width() height=dims.inner_height() />
                </clipPath>
            </defs>

            // Background
            <rect width=dims.width height=dims.height fill=colors::BG_PANEL />

            <Legend entries=legend dims=dims />

            <g transform=dims.inner_transform()>
                // x grid and date labels
                {move || projection.with(|p| x_axis_view(p, &dims))}

                // One y-axis per dataset
                {move || projection.with(|p| {
                    p.axes.iter().map(|axis| y_axis_view(axis, &dims)).collect_view()
                })}

                // Series
                <g clip-path=clip_url>
                    {move || projection.with(|p| {
                        let radius = config.with_value(|c| c.point_radius);
                        p.series.iter().map(|series| {
                            let color = series.color;
                            view! {
                                <g class="surface-series">
                                    <path
                                        d=series.path.clone()
                                        fill="none"
                                        stroke=color
                                        stroke-width="2"
                                    />
                                    {series.points.iter().map(|&(x, y)| view! {
                                        <circle cx=x cy=y r=radius fill=color />
                                    }).collect_view()}
                                </g>
                            }
                        }).collect_view()
                    })}
                </g>

                // Hover line and tooltip
                {move || hover.get().map(|info| {
                    let x = projection.with(|p| p.x_scale.scale(info.timestamp));
                    tooltip_view(info, x, &dims)
                })}
            </g>
        </svg>
    }
}

// ============================================================================
// PARTS
// ============================================================================

#[component]
fn Legend(entries: Vec<(String, &'static str)>, dims: ChartDimensions) -> impl IntoView {
    let y = dims.margin.top / 2.0 + 4.0;
    let mut x = dims.margin.left;

    entries
        .into_iter()
        .map(|(label, color)| {
            let at = x;
            x += 24.0 + label.chars().count() as f64 * 7.0;
            view! {
                <g class="surface-legend-item">
                    <rect x=at y={y - 8.0} width="12" height="8" fill=color />
                    <text x={at + 16.0} y=y font-size="11" fill=colors::TEXT_PRIMARY>{label}</text>
                </g>
            }
        })
        .collect_view()
}

fn legend_entries(spec: &SurfaceSpec) -> Vec<(String, &'static str)> {
    spec.datasets
        .iter()
        .map(|d| (d.label().to_string(), d.color))
        .collect()
}

fn x_axis_view(projection: &Projection, dims: &ChartDimensions) -> impl IntoView + use<> {
    let height = dims.inner_height();

    projection
        .x_ticks
        .iter()
        .map(|(x, label)| {
            let x = *x;
            view! {
                <g class="x-tick">
                    <line x1=x y1="0" x2=x y2=height stroke=colors::GRID stroke-width="1" />
                    <text
                        x=x
                        y={height + 18.0}
                        text-anchor="middle"
                        font-size="11"
                        fill=colors::TEXT_MUTED
                    >
                        {label.clone()}
                    </text>
                </g>
            }
        })
        .collect_view()
}

fn y_axis_view(axis: &AxisView, dims: &ChartDimensions) -> impl IntoView + use<> {
    let offset = axis.offset;
    let color = axis.color;
    let height = dims.inner_height();
    let (tick_dx, anchor) = match axis.position {
        AxisPosition::Left => (-6.0, "end"),
        AxisPosition::Right => (6.0, "start"),
    };

    let ticks = axis
        .ticks
        .iter()
        .map(|(y, label)| {
            let y = *y;
            view! {
                <g class="y-tick">
                    <line x1=offset y1=y x2={offset + tick_dx / 2.0} y2=y stroke=color />
                    <text
                        x={offset + tick_dx}
                        y={y + 4.0}
                        text-anchor=anchor
                        font-size="10"
                        fill=color
                    >
                        {label.clone()}
                    </text>
                </g>
            }
        })
        .collect_view();

    view! {
        <g class=format!("y-axis {}", axis.position.as_str())>
            <line x1=offset y1="0" x2=offset y2=height stroke=color stroke-width="1" />
            {ticks}
        </g>
    }
}

fn tooltip_view(info: HoverInfo, x: f64, dims: &ChartDimensions) -> impl IntoView + use<> {
    const LINE: f64 = 16.0;
    const BOX_WIDTH: f64 = 170.0;

    let height = dims.inner_height();
    let box_height = LINE * (info.items.len() + 1) as f64 + 8.0;
    let box_x = if x + 10.0 + BOX_WIDTH > dims.inner_width() {
        x - 10.0 - BOX_WIDTH
    } else {
        x + 10.0
    };

    let rows = info
        .items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            view! {
                <text
                    x={box_x + 8.0}
                    y={LINE * (i + 2) as f64}
                    font-size="11"
                    fill=item.color
                >
                    {format!("{}: {}", item.label, item.value)}
                </text>
            }
        })
        .collect_view();

    view! {
        <g class="surface-tooltip" pointer-events="none">
            <line x1=x y1="0" x2=x y2=height stroke=colors::BORDER stroke-dasharray="4 3" />
            <rect
                x=box_x
                y="4"
                width=BOX_WIDTH
                height=box_height
                rx="3"
                fill=colors::BG_PANEL
                stroke=colors::BORDER
            />
            <text x={box_x + 8.0} y=LINE font-size="11" font-weight="bold" fill=colors::TEXT_PRIMARY>
                {info.date}
            </text>
            {rows}
        </g>
    }
}

/// Pointer position mapped from client pixels into view-box units
fn viewbox_point(ev: &web_sys::MouseEvent, dims: &ChartDimensions) -> Option<(f64, f64)> {
    let target = ev.current_target()?.dyn_into::<web_sys::Element>().ok()?;
    let rect = target.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }

    let x = (f64::from(ev.client_x()) - rect.left()) * dims.width / rect.width();
    let y = (f64::from(ev.client_y()) - rect.top()) * dims.height / rect.height();
    Some((x, y))
}
