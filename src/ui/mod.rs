pub mod conflict_panel;
pub mod gantt_chart;
pub mod theme;
pub mod toolbar;
