mod gizmos;
mod input;
mod selection;

pub use selection::SelectionState;

use bevy::{gizmos::config::GizmoConfigStore, prelude::*};

/// Settings for the trajectory authoring tools.
#[derive(Resource, Debug, Clone)]
pub struct EditorSettings {
    /// Whether the editor is enabled (responds to input).
    pub enabled: bool,
    /// Whether to show gizmos (path curves and waypoint handles).
    pub show_gizmos: bool,
    /// Offset step used when sampling the path for rendering.
    pub sample_step: f32,
    /// Radius of waypoint handle spheres.
    pub point_radius: f32,
    /// Line width for path curves.
    pub line_width: f32,
    /// Color of unselected paths.
    pub path_color: Color,
    /// Color of selected paths.
    pub selected_path_color: Color,
    /// Color of waypoint handles.
    pub point_color: Color,
    /// Color of selected waypoint handles.
    pub selected_point_color: Color,
    /// Color of the goal marker.
    pub goal_color: Color,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            show_gizmos: true,
            sample_step: 0.05,
            point_radius: 0.1,
            line_width: 3.0,
            path_color: Color::srgb(1.0, 0.0, 1.0),
            selected_path_color: Color::srgb(1.0, 0.2, 0.2),
            point_color: Color::srgb(1.0, 0.0, 1.0),
            selected_point_color: Color::srgb(1.0, 0.2, 0.2),
            goal_color: Color::srgb(0.2, 1.0, 0.4),
        }
    }
}

impl EditorSettings {
    /// Toggle the editor on/off.
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Toggle gizmo visibility.
    pub fn toggle_gizmos(&mut self) {
        self.show_gizmos = !self.show_gizmos;
    }
}

/// System to sync editor settings to gizmo config.
fn sync_gizmo_config(settings: Res<EditorSettings>, mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.line.width = settings.line_width;
}

/// Plugin that adds interactive trajectory authoring.
///
/// This plugin requires `TrajectoryPlugin` to be added first.
///
/// # Features
/// - Visual gizmos for the path curve, waypoint handles and the goal
/// - Mouse picking and dragging of waypoints
/// - Waypoint handle entities other tooling can use as pick targets
///
/// # Hotkeys
/// - `A`: Add waypoint after selection
/// - `X`: Delete selected waypoint(s)
/// - `Tab`: Cycle interpolation method
/// - `Escape`: Deselect all
pub struct TrajectoryEditorPlugin;

impl Plugin for TrajectoryEditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorSettings>()
            .init_resource::<SelectionState>()
            .add_systems(
                Update,
                (
                    // Config sync
                    sync_gizmo_config,
                    // Gizmo rendering
                    gizmos::render_trajectory_curves,
                    gizmos::render_trajectory_points,
                    gizmos::sync_point_markers,
                    gizmos::cleanup_orphaned_markers,
                    // Selection
                    selection::pick_trajectory_points,
                    selection::handle_selection_click,
                    selection::handle_point_drag,
                    // Input
                    input::handle_hotkeys,
                ),
            );
    }
}
