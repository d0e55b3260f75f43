pub const WINDOW_WIDTH: u32 = 1280;            // Default window width
pub const WINDOW_HEIGHT: u32 = 720;            // Default window height
pub const MAX_PIXEL_RATIO: f32 = 2.0;          // Framebuffer scale cap on HiDPI screens
pub const FPS: u32 = 60;                       // Frames per second

pub const TRANSITION_DURATION: f32 = 2.0;      // Duration of a slide wipe (seconds)
pub const PEAK_DISPLACEMENT: f32 = 25.0;       // Filter scale at the middle of a wipe (pixels)
pub const DISPLACEMENT_DRIFT: f32 = 0.0;       // Noise map vertical drift per wipe (pixels)
pub const DISPLACEMENT_MAP_SCALE: f32 = 1.5;   // Noise map sprite scale
pub const NOISE_SIZE: i32 = 512;               // Generated noise map size (pixels)

pub const TITLE_SHIFT: f32 = 100.0;            // Title/counter slide distance (% of label box)
pub const DESCRIPTION_SHIFT: f32 = 40.0;       // Description slide distance (pixels)

pub const MANIFEST_FILE: &str = "slides.toml"; // Manifest looked up inside an image directory
