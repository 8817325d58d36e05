use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use egui::{Color32, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};

use crate::engine::geometry::{bar_rect, edge_path, position};
use crate::engine::{
    hovered_edge, Conflicts, DependencyGraph, DependencyListener, DragOutcome, EdgeInteractionController,
    EdgeScene, PointerEvent,
};
use crate::model::{Dependency, Task, TaskId, TimelineViewport};
use crate::ui::theme::{self, ROWS};

/// What happened in the chart this frame that the owner has to act on.
#[derive(Debug, Default)]
pub struct ChartInteraction {
    /// Index of a dependency the user clicked to delete.
    pub delete_request: Option<usize>,
    /// Result of a connection drag that ended this frame.
    pub drag_outcome: Option<DragOutcome>,
}

/// Render the Gantt chart with dependency arrows and drive edge creation.
///
/// Bars and arrows are recomputed from `tasks` and `edges` every frame; the
/// only state carried between frames is the controller's drag.
#[allow(clippy::too_many_arguments)]
pub fn show_gantt_chart(
    tasks: &[Task],
    edges: &mut Vec<Dependency>,
    conflicts: &Conflicts,
    viewport: &mut TimelineViewport,
    controller: &mut EdgeInteractionController,
    listener: &mut dyn DependencyListener,
    selected_task: &mut Option<TaskId>,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let available = ui.available_size();
    let chart_width = viewport.total_width().max(available.x);
    let chart_height = ROWS.content_height(tasks.len()) + 40.0;

    // Ctrl+scroll and pinch arrive as a zoom factor, not a scroll delta
    if ui.rect_contains_pointer(ui.max_rect()) {
        viewport.apply_zoom_delta(ui.input(|i| i.zoom_delta()));
    }

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click(),
            );
            let origin = response.rect.min;
            let to_screen = |p: Pos2| p + origin.to_vec2();
            let to_local = |p: Pos2| p - origin.to_vec2();

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_rows(&painter, origin, tasks.len(), chart_width);
            draw_timeline_header(&painter, origin, viewport, chart_width, chart_height);

            // Chart-local bar rectangles, keyed by task.
            let rects: HashMap<TaskId, Rect> = tasks
                .iter()
                .enumerate()
                .map(|(row, task)| {
                    let pos = position(task, viewport.start, viewport.pixels_per_day)
                        .clamped(theme::MIN_BAR_WIDTH);
                    (task.id, bar_rect(pos, row, &ROWS))
                })
                .collect();

            // Dangling edges have no path and are simply not drawn.
            let paths: Vec<(usize, Vec<Pos2>)> = edges
                .iter()
                .enumerate()
                .filter_map(|(index, dep)| {
                    let from = rects.get(&dep.from_task)?;
                    let to = rects.get(&dep.to_task)?;
                    Some((index, edge_path(dep.kind, *from, *to)))
                })
                .collect();

            let graph = DependencyGraph::from_edges(edges.as_slice());

            let pointer = ui.input(|i| i.pointer.hover_pos());
            let hovered = match pointer {
                Some(p) if !controller.is_dragging() && response.rect.contains(p) => {
                    hovered_edge(to_local(p), &paths, theme::EDGE_HOVER_TOLERANCE)
                }
                _ => None,
            };

            for (index, path) in &paths {
                let dep = &edges[*index];
                let color = if Some(*index) == hovered {
                    theme::ARROW_HOVER
                } else if conflicts.edge_violated(dep) {
                    theme::CONFLICT
                } else {
                    theme::ARROW
                };
                let width = if Some(*index) == hovered { 2.5 } else { 1.5 };
                draw_arrow(&painter, path.iter().map(|p| to_screen(*p)).collect(), color, width);
            }

            let mut consumed_click = false;
            for task in tasks {
                let Some(local) = rects.get(&task.id) else {
                    continue;
                };
                let rect = local.translate(origin.to_vec2());
                let is_selected = *selected_task == Some(task.id);
                draw_task_bar(&painter, task, rect, is_selected, conflicts.is_conflicted(task.id));

                let bar_response = ui.interact(
                    rect,
                    ui.make_persistent_id(("task-bar", task.id)),
                    Sense::click(),
                );
                if bar_response.clicked() {
                    *selected_task = Some(task.id);
                    consumed_click = true;
                }
                if bar_response.hovered() && hovered.is_none() {
                    show_task_tooltip(ui, task, tasks, &graph, conflicts);
                }

                // Connection affordance at the finish edge.
                let handle_center = rect.right_center() + Vec2::new(theme::CONNECT_HANDLE_RADIUS + 2.0, 0.0);
                let handle_rect = Rect::from_center_size(
                    handle_center,
                    Vec2::splat(theme::CONNECT_HANDLE_RADIUS * 2.0 + 4.0),
                );
                let handle_response = ui.interact(
                    handle_rect,
                    ui.make_persistent_id(("connect", task.id)),
                    Sense::drag(),
                );
                if handle_response.hovered() || is_selected {
                    painter.circle(
                        handle_center,
                        theme::CONNECT_HANDLE_RADIUS,
                        theme::BG_DARK,
                        Stroke::new(1.5, theme::HANDLE_COLOR),
                    );
                }
                if handle_response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
                }
                if handle_response.drag_started() {
                    let start = handle_response.interact_pointer_pos().unwrap_or(handle_center);
                    let mut scene = EdgeScene {
                        rows: &ROWS,
                        tasks,
                        edges: &mut *edges,
                        listener: &mut *listener,
                    };
                    controller.handle(
                        PointerEvent::Down {
                            source: task.id,
                            pos: to_local(start),
                        },
                        &mut scene,
                    );
                }
            }

            if let Some((_, anchor, cursor)) = controller.provisional_edge() {
                let latest = ui.input(|i| i.pointer.latest_pos()).map(to_local).unwrap_or(cursor);
                let released = ui.input(|i| i.pointer.any_released());
                let mut scene = EdgeScene {
                    rows: &ROWS,
                    tasks,
                    edges: &mut *edges,
                    listener: &mut *listener,
                };
                if released {
                    interaction.drag_outcome =
                        Some(controller.handle(PointerEvent::Up { pos: latest }, &mut scene));
                } else {
                    controller.handle(PointerEvent::Move { pos: latest }, &mut scene);
                    draw_drag_preview(&painter, to_screen(anchor), to_screen(latest), origin, chart_width, tasks.len());
                    ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
                }
            }

            if let Some(index) = hovered {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                let dep = &edges[index];
                show_edge_tooltip(ui, dep, tasks, conflicts);
                if response.clicked() {
                    interaction.delete_request = Some(index);
                    consumed_click = true;
                }
            }

            // Empty click on background clears selection
            if response.clicked() && !consumed_click {
                *selected_task = None;
            }
        });

    interaction
}

fn draw_rows(painter: &egui::Painter, origin: Pos2, rows: usize, width: f32) {
    for i in 0..rows {
        let y = origin.y + ROWS.row_top(i);
        let row_bg = if i % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, ROWS.pitch())),
            0.0,
            row_bg,
        );
        painter.line_segment(
            [
                Pos2::new(origin.x, y + ROWS.pitch()),
                Pos2::new(origin.x + width, y + ROWS.pitch()),
            ],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }
}

fn draw_timeline_header(
    painter: &egui::Painter,
    origin: Pos2,
    viewport: &TimelineViewport,
    width: f32,
    height: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, theme::HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );

    // Daily ticks when there is room for them, weekly (Mondays) otherwise.
    let daily = viewport.pixels_per_day >= 14.0;
    let mut date = viewport.start;
    if !daily {
        let weekday = date.weekday().num_days_from_monday();
        date -= chrono::Duration::days(weekday as i64);
    }
    let step = chrono::Duration::days(if daily { 1 } else { 7 });

    while date <= viewport.end {
        let x = origin.x + viewport.date_to_x(date);
        painter.line_segment(
            [
                Pos2::new(x, origin.y + theme::HEADER_HEIGHT),
                Pos2::new(x, origin.y + height),
            ],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        let label = if daily {
            date.format("%d").to_string()
        } else {
            date.format("W%V").to_string()
        };
        painter.text(
            Pos2::new(x + 3.0, origin.y + 30.0),
            egui::Align2::LEFT_CENTER,
            label,
            theme::font_sub(),
            theme::TEXT_SECONDARY,
        );

        if starts_month_label(date, daily) {
            painter.text(
                Pos2::new(x + 3.0, origin.y + 12.0),
                egui::Align2::LEFT_CENTER,
                date.format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }

        date += step;
    }

    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + theme::HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + theme::HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn starts_month_label(date: NaiveDate, daily: bool) -> bool {
    if daily {
        date.day() == 1
    } else {
        date.day() <= 7
    }
}

fn draw_task_bar(painter: &egui::Painter, task: &Task, rect: Rect, is_selected: bool, conflicted: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    painter.rect_filled(rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(rect, rounding, task.color);

    if task.progress > 0.0 {
        let progress_rect = Rect::from_min_size(
            rect.min,
            Vec2::new(rect.width() * task.progress.clamp(0.0, 1.0), rect.height()),
        );
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    if conflicted {
        painter.rect_stroke(rect.expand(1.0), rounding, Stroke::new(1.5, theme::CONFLICT));
        let badge = Pos2::new(rect.left() - 9.0, rect.center().y);
        painter.circle_filled(badge, 6.0, theme::CONFLICT);
        painter.text(badge, egui::Align2::CENTER_CENTER, "!", theme::font_sub(), Color32::WHITE);
    }

    if is_selected {
        painter.rect_stroke(
            rect.expand(2.0),
            Rounding::same(theme::BAR_ROUNDING + 2.0),
            Stroke::new(2.0, theme::ACCENT),
        );
    }

    // Task name on bar (single line, clipped to bar bounds)
    if rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = rect.top() + (rect.height() - galley.size().y) / 2.0;
        painter
            .with_clip_rect(rect)
            .galley(Pos2::new(rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }
}

fn draw_arrow(painter: &egui::Painter, points: Vec<Pos2>, color: Color32, width: f32) {
    let (Some(&tip), Some(&before)) = (points.last(), points.iter().rev().nth(1)) else {
        return;
    };
    painter.add(Shape::line(points, Stroke::new(width, color)));

    let dir = (tip - before).normalized();
    let normal = dir.rot90();
    let size = 5.0;
    painter.add(Shape::convex_polygon(
        vec![tip, tip - dir * size + normal * size * 0.6, tip - dir * size - normal * size * 0.6],
        color,
        Stroke::NONE,
    ));
}

fn draw_drag_preview(
    painter: &egui::Painter,
    anchor: Pos2,
    cursor: Pos2,
    origin: Pos2,
    width: f32,
    rows: usize,
) {
    if let Some(row) = ROWS.row_at(cursor.y - origin.y, rows) {
        let y = origin.y + ROWS.row_top(row);
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, ROWS.pitch())),
            0.0,
            theme::BG_SELECTED,
        );
    }
    painter.add(Shape::dashed_line(
        &[anchor, cursor],
        Stroke::new(1.5, theme::ARROW_PREVIEW),
        6.0,
        4.0,
    ));
    painter.circle_filled(cursor, 3.0, theme::ARROW_PREVIEW);
}

/// Comma-separated names of the given tasks, skipping ids that aren't loaded.
fn task_names(ids: &[TaskId], tasks: &[Task]) -> Option<String> {
    let names: Vec<&str> = ids
        .iter()
        .filter_map(|id| tasks.iter().find(|t| t.id == *id))
        .map(|t| t.name.as_str())
        .collect();
    (!names.is_empty()).then(|| names.join(", "))
}

fn show_task_tooltip(
    ui: &Ui,
    task: &Task,
    tasks: &[Task],
    graph: &DependencyGraph,
    conflicts: &Conflicts,
) {
    egui::show_tooltip_at_pointer(
        ui.ctx(),
        ui.layer_id(),
        egui::Id::new(("task-tip", task.id)),
        |ui| {
            ui.strong(&task.name);
            ui.label(format!(
                "{} → {}",
                task.start.format("%d/%m/%Y"),
                task.end.format("%d/%m/%Y"),
            ));
            ui.label(format!("Progress: {}%", (task.progress * 100.0) as i32));
            if let Some(upstream) = task_names(&graph.ancestors_of(task.id), tasks) {
                ui.label(format!("Depends on: {}", upstream));
            }
            if let Some(next) = task_names(graph.successors_of(task.id), tasks) {
                ui.label(format!("Blocks: {}", next));
            }
            for message in conflicts.messages_for(task.id) {
                ui.colored_label(theme::CONFLICT, message);
            }
        },
    );
}

fn show_edge_tooltip(ui: &Ui, dep: &Dependency, tasks: &[Task], conflicts: &Conflicts) {
    let name = |id: TaskId| {
        tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
            .unwrap_or("?")
    };
    egui::show_tooltip_at_pointer(
        ui.ctx(),
        ui.layer_id(),
        egui::Id::new(("edge-tip", dep.from_task, dep.to_task, dep.kind)),
        |ui| {
            ui.strong(format!("{} → {}", name(dep.from_task), name(dep.to_task)));
            ui.label(dep.kind.label());
            if conflicts.edge_violated(dep) {
                ui.colored_label(theme::CONFLICT, "Constraint violated");
            }
            ui.label(egui::RichText::new("Click to remove").small().weak());
        },
    );
}
