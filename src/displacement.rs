use std::path::Path;

use log::{debug, info};
use rand::Rng;
use raylib::prelude::*;

use crate::constants::{DISPLACEMENT_MAP_SCALE, NOISE_SIZE};
use crate::error::SliderError;
use crate::texture_loader::load_texture_with_exif_rotation;

// The slide layer is an atlas: the canvas on the left, the noise map squeezed
// into a square on the right. Each canvas fragment is offset by the map's
// red/green channels, centred on 0.5. The green lookup is shifted so greyscale
// maps still displace in both axes.
const DISPLACEMENT_FS: &str = r#"
#version 330

in vec2 fragTexCoord;
in vec4 fragColor;

uniform sampler2D texture0;
uniform vec4 colDiffuse;
uniform vec2 canvasRegion;
uniform vec2 mapOrigin;
uniform vec2 mapSize;
uniform vec2 displacementScale;
uniform vec2 mapScale;
uniform vec2 mapOffset;

out vec4 finalColor;

vec4 sampleMap(vec2 coord, vec2 texel)
{
    vec2 uv = mapOrigin + fract(coord) * mapSize;
    return texture(texture0, clamp(uv, mapOrigin + texel, mapOrigin + mapSize - texel));
}

void main()
{
    vec2 texel = 0.5 / vec2(textureSize(texture0, 0));
    vec2 p = fragTexCoord / canvasRegion;
    vec2 mapCoord = p * mapScale + mapOffset;
    float dx = sampleMap(mapCoord, texel).r;
    float dy = sampleMap(mapCoord + vec2(0.5, 0.25), texel).g;
    vec2 q = clamp(p + (vec2(dx, dy) - 0.5) * displacementScale, 0.0, 1.0);
    vec2 uv = clamp(q * canvasRegion, texel, canvasRegion - texel);
    finalColor = texture(texture0, uv) * colDiffuse * fragColor;
}
"#;

/// Animated parameters of the distortion filter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplacementFilter {
    /// Maximum displacement in canvas pixels.
    pub scale: f32,
    /// Vertical position of the noise map sprite in canvas pixels.
    pub shift: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementUniforms {
    pub scale: Vector2,
    pub map_scale: Vector2,
    pub map_offset: Vector2,
}

impl DisplacementFilter {
    pub fn is_active(&self) -> bool {
        self.scale != 0.0
    }

    /// Shader uniforms relative to the canvas, for a map sprite drawn at
    /// `DISPLACEMENT_MAP_SCALE`.
    ///
    /// The layer is sampled bottom-up, so the map's vertical phase is measured
    /// from the bottom edge of the canvas.
    pub fn uniforms(&self, canvas: Vector2, map: Vector2) -> DisplacementUniforms {
        let sprite = Vector2::new(map.x * DISPLACEMENT_MAP_SCALE, map.y * DISPLACEMENT_MAP_SCALE);
        DisplacementUniforms {
            scale: Vector2::new(self.scale / canvas.x, self.scale / canvas.y),
            map_scale: Vector2::new(canvas.x / sprite.x, canvas.y / sprite.y),
            map_offset: Vector2::new(0.0, (self.shift - canvas.y) / sprite.y),
        }
    }
}

/// Size of the slide layer for a canvas: the canvas plus a square map slot.
pub fn layer_size(canvas: Vector2) -> Vector2 {
    Vector2::new(canvas.x + canvas.y, canvas.y)
}

/// Where the noise map is drawn inside the slide layer.
pub fn map_slot(canvas: Vector2) -> Rectangle {
    Rectangle::new(canvas.x, 0.0, canvas.y, canvas.y)
}

/// The displacement shader and its noise map.
pub struct DisplacementEffect {
    shader: Shader,
    map: Texture2D,
    scale_loc: i32,
    map_scale_loc: i32,
    map_offset_loc: i32,
    active: bool,
}

impl DisplacementEffect {
    /// Uses the given map image, or generates Perlin noise when there is none.
    pub fn new(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        map_path: Option<&Path>,
        canvas: Vector2,
    ) -> Result<Self, SliderError> {
        let mut map = match map_path {
            Some(path) => {
                info!("Using displacement map {:?}", path);
                load_texture_with_exif_rotation(rl, thread, path)?
            }
            None => generate_noise_map(rl, thread)?,
        };
        map.set_texture_filter(thread, TextureFilter::TEXTURE_FILTER_BILINEAR);

        let mut shader = rl.load_shader_from_memory(thread, None, Some(DISPLACEMENT_FS));
        let scale_loc = shader.get_shader_location("displacementScale");
        let map_scale_loc = shader.get_shader_location("mapScale");
        let map_offset_loc = shader.get_shader_location("mapOffset");
        let canvas_region_loc = shader.get_shader_location("canvasRegion");
        let map_origin_loc = shader.get_shader_location("mapOrigin");
        let map_size_loc = shader.get_shader_location("mapSize");
        debug!(
            "Displacement shader locations: scale={} mapScale={} mapOffset={} canvasRegion={} mapOrigin={} mapSize={}",
            scale_loc, map_scale_loc, map_offset_loc, canvas_region_loc, map_origin_loc, map_size_loc
        );

        // The atlas layout only depends on the canvas.
        let layer = layer_size(canvas);
        let slot = map_slot(canvas);
        shader.set_shader_value(canvas_region_loc, Vector2::new(canvas.x / layer.x, canvas.y / layer.y));
        shader.set_shader_value(map_origin_loc, Vector2::new(slot.x / layer.x, slot.y / layer.y));
        shader.set_shader_value(map_size_loc, Vector2::new(slot.width / layer.x, slot.height / layer.y));

        Ok(Self {
            shader,
            map,
            scale_loc,
            map_scale_loc,
            map_offset_loc,
            active: false,
        })
    }

    pub fn update(&mut self, filter: &DisplacementFilter, canvas: Vector2) {
        let map = Vector2::new(self.map.width() as f32, self.map.height() as f32);
        let uniforms = filter.uniforms(canvas, map);
        self.active = filter.is_active();
        self.shader.set_shader_value(self.scale_loc, uniforms.scale);
        self.shader.set_shader_value(self.map_scale_loc, uniforms.map_scale);
        self.shader.set_shader_value(self.map_offset_loc, uniforms.map_offset);
    }

    /// Copies the noise map into its slot of the slide layer. Nothing is drawn
    /// while the filter is at rest.
    pub fn draw_map<D: RaylibDraw>(&self, d: &mut D, canvas: Vector2) {
        if !self.active {
            return;
        }
        let source = Rectangle::new(0.0, 0.0, self.map.width() as f32, self.map.height() as f32);
        d.draw_texture_pro(&self.map, source, map_slot(canvas), Vector2::zero(), 0.0, Color::WHITE);
    }

    /// Draws the canvas part of `layer` through the filter, flipped the way
    /// render textures need. The shader is skipped entirely while the filter
    /// is at rest.
    pub fn draw_layer<D: RaylibDraw + RaylibShaderModeExt>(
        &mut self,
        d: &mut D,
        layer: &RenderTexture2D,
        canvas: Vector2,
    ) {
        let source = Rectangle::new(0.0, 0.0, canvas.x, -canvas.y);
        let dest = Rectangle::new(0.0, 0.0, canvas.x, canvas.y);
        if !self.active {
            d.draw_texture_pro(layer, source, dest, Vector2::zero(), 0.0, Color::WHITE);
            return;
        }
        let mut s = d.begin_shader_mode(&mut self.shader);
        s.draw_texture_pro(layer, source, dest, Vector2::zero(), 0.0, Color::WHITE);
    }
}

fn generate_noise_map(rl: &mut RaylibHandle, thread: &RaylibThread) -> Result<Texture2D, SliderError> {
    let mut rng = rand::rng();
    let (offset_x, offset_y) = (rng.random_range(0..4096), rng.random_range(0..4096));
    debug!("Generating {}px noise map at offset ({}, {})", NOISE_SIZE, offset_x, offset_y);

    let base = Image::gen_image_color(NOISE_SIZE, NOISE_SIZE, Color::GRAY);
    let image = base.gen_image_perlin_noise(NOISE_SIZE, NOISE_SIZE, offset_x, offset_y, 4.0);
    rl.load_texture_from_image(thread, &image)
        .map_err(|e| SliderError::asset("<generated noise>", e))
}
