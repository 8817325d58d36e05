use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::engine::{
    delete_edge, detect_conflicts, Conflicts, DependencyListener, DragOutcome, EdgeInteractionController,
};
use crate::error::Error;
use crate::model::{Dependency, DependencyKind, Project, Task, TaskId, TimelineViewport};
use crate::ui;

/// Edge edits reported by the engine during a frame, applied afterwards.
#[derive(Debug, Default)]
pub struct EdgeEvents {
    pub created: Vec<Dependency>,
    pub deleted: Vec<(TaskId, TaskId)>,
}

impl DependencyListener for EdgeEvents {
    fn on_dependency_create(&mut self, dependency: &Dependency) {
        self.created.push(dependency.clone());
    }

    fn on_dependency_delete(&mut self, from: TaskId, to: TaskId) {
        self.deleted.push((from, to));
    }
}

/// Main application state.
pub struct GanttApp {
    pub project: Project,
    pub viewport: TimelineViewport,
    pub controller: EdgeInteractionController,
    pub selected_task: Option<TaskId>,
    pub status_message: String,

    /// Conflicts for the current project; recomputed only when it changes.
    conflicts: Conflicts,
    conflicts_stale: bool,
    events: EdgeEvents,

    /// Last saved settings and where they go. No path means nothing is saved.
    settings: Settings,
    settings_path: Option<PathBuf>,
}

impl GanttApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: &Settings) -> Self {
        let (project, status_message) = match &settings.project_path {
            Some(path) => match crate::io::load_project(path) {
                Ok(project) => (project, format!("Loaded {}", path.display())),
                Err(e) => {
                    warn!("could not load {:?}: {}", path, e);
                    (Self::sample_project(), format!("Error loading: {}", e))
                }
            },
            None => (Self::sample_project(), "Ready".to_string()),
        };
        let mut app = Self::with_project(project, settings, status_message);
        app.settings_path = Settings::config_path();
        app
    }

    pub fn with_project(project: Project, settings: &Settings, status_message: String) -> Self {
        let today = chrono::Local::now().date_naive();
        let viewport = TimelineViewport::around(project.date_span(), today, settings.pixels_per_day);
        Self {
            project,
            viewport,
            controller: EdgeInteractionController::new(settings.default_dependency_kind),
            selected_task: None,
            status_message,
            conflicts: Conflicts::default(),
            conflicts_stale: true,
            events: EdgeEvents::default(),
            settings: settings.clone(),
            settings_path: None,
        }
    }

    /// Generate a sample project for demonstration.
    fn sample_project() -> Project {
        let today = chrono::Local::now().date_naive();
        let day = |n: i64| -> NaiveDate { today + chrono::Duration::days(n) };
        let mut project = Project::new("Sample Project");

        let kickoff = Task::new("Project Kickoff", day(-5), day(-2))
            .with_progress(1.0)
            .with_color(ui::theme::task_color(0));
        let requirements = Task::new("Requirements", day(-2), day(5))
            .with_progress(0.6)
            .with_color(ui::theme::task_color(1));
        let design = Task::new("UI Design", day(6), day(18)).with_color(ui::theme::task_color(2));
        // Starts before design finishes: shows up as a conflict.
        let backend = Task::new("Backend Development", day(12), day(28))
            .with_group("Build")
            .with_color(ui::theme::task_color(3));
        let qa = Task::new("Testing & QA", day(22), day(30))
            .with_group("Build")
            .with_color(ui::theme::task_color(4));
        let launch = Task::new("Launch", day(32), day(32)).with_color(ui::theme::task_color(5));

        project.dependencies = vec![
            Dependency::new(kickoff.id, requirements.id, DependencyKind::FinishToStart),
            Dependency::new(requirements.id, design.id, DependencyKind::FinishToStart),
            Dependency::new(design.id, backend.id, DependencyKind::FinishToStart),
            Dependency::new(backend.id, qa.id, DependencyKind::FinishToFinish),
            Dependency::new(qa.id, launch.id, DependencyKind::FinishToStart),
        ];
        project.tasks = vec![kickoff, requirements, design, backend, qa, launch];
        project
    }

    pub fn conflicts(&self) -> &Conflicts {
        &self.conflicts
    }

    fn refresh_conflicts(&mut self) {
        if self.conflicts_stale {
            self.conflicts = detect_conflicts(&self.project.tasks, &self.project.dependencies);
            self.conflicts_stale = false;
        }
    }

    fn handle_drag_outcome(&mut self, outcome: DragOutcome) {
        match outcome {
            DragOutcome::Rejected(Error::Cycle { from, to }) => {
                self.status_message = format!(
                    "Cannot link '{}' → '{}': it would create a cycle",
                    self.project.task_name(from),
                    self.project.task_name(to)
                );
            }
            DragOutcome::Rejected(err) => {
                self.status_message = format!("Cannot link: {}", err);
            }
            _ => {}
        }
    }

    /// Write zoom and link kind back to the settings file when they changed.
    fn persist_settings(&mut self) {
        let kind = self.controller.kind();
        let zoom = self.viewport.pixels_per_day;
        if kind == self.settings.default_dependency_kind && zoom == self.settings.pixels_per_day {
            return;
        }
        self.settings.default_dependency_kind = kind;
        self.settings.pixels_per_day = zoom;

        let Some(path) = &self.settings_path else {
            return;
        };
        match self.settings.save_to(path) {
            Ok(()) => debug!(path = %path.display(), "settings saved"),
            Err(e) => warn!("could not save settings to {:?}: {}", path, e),
        }
    }

    /// Apply what the listener collected this frame.
    fn apply_edge_events(&mut self) {
        let events = std::mem::take(&mut self.events);
        if events.created.is_empty() && events.deleted.is_empty() {
            return;
        }
        for dep in &events.created {
            self.status_message = format!(
                "Linked '{}' → '{}' ({})",
                self.project.task_name(dep.from_task),
                self.project.task_name(dep.to_task),
                dep.kind.short_label()
            );
        }
        for (from, to) in &events.deleted {
            self.status_message = format!(
                "Removed link '{}' → '{}'",
                self.project.task_name(*from),
                self.project.task_name(*to)
            );
        }
        self.project.touch();
        self.conflicts_stale = true;
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);
        self.refresh_conflicts();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.status_message).size(11.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} tasks · {} links · {} conflicts",
                            self.project.tasks.len(),
                            self.project.live_dependencies().count(),
                            self.conflicts.len()
                        ))
                        .size(11.0)
                        .color(ui::theme::TEXT_DIM),
                    );
                });
            });
        });

        let panel_click = egui::SidePanel::left("conflicts")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui::conflict_panel::show_conflict_panel(
                    &self.project.tasks,
                    &self.conflicts,
                    self.selected_task,
                    ui,
                )
            })
            .inner;
        if let Some(id) = panel_click {
            self.selected_task = Some(id);
        }

        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let interaction = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| {
                ui::gantt_chart::show_gantt_chart(
                    &self.project.tasks,
                    &mut self.project.dependencies,
                    &self.conflicts,
                    &mut self.viewport,
                    &mut self.controller,
                    &mut self.events,
                    &mut self.selected_task,
                    ui,
                )
            })
            .inner;

        if let Some(outcome) = interaction.drag_outcome {
            self.handle_drag_outcome(outcome);
        }
        if let Some(index) = interaction.delete_request {
            if delete_edge(&mut self.project.dependencies, index, &mut self.events).is_none() {
                warn!(index, "delete requested for an edge that no longer exists");
            }
        }
        self.apply_edge_events();
        self.persist_settings();

        if self.controller.is_dragging() {
            ctx.request_repaint();
        }
    }
}
