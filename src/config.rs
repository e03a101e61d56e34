// Window
pub const WINDOW_TITLE: &str = "Shader Switcher";
pub const WINDOW_WIDTH: u32 = 600;
pub const WINDOW_HEIGHT: u32 = 600;

// Rendering
pub const VSYNC_ENABLED: bool = true;
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
