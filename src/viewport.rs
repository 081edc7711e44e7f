use bevy::prelude::*;
#[cfg(feature = "post_process")]
use bevy::window::{
    PrimaryWindow,
    WindowResized,
};

#[cfg(feature = "post_process")]
use crate::post_process::ShaderBackground;


/// Rendering above this device pixel ratio costs fill rate without visible gain.
pub const MAX_PIXEL_RATIO: f32 = 2.0;


/// `None` when the device ratio is already within the cap.
pub fn capped_scale_factor(device_ratio: f32) -> Option<f32> {
    (device_ratio > MAX_PIXEL_RATIO).then_some(MAX_PIXEL_RATIO)
}

/// Only registered on wasm, where the canvas keeps its css size and the override caps the
/// drawing buffer. On desktop winit resizes the window instead.
pub fn cap_pixel_ratio(
    mut windows: Query<&mut Window>,
) {
    for mut window in &mut windows {
        let capped = capped_scale_factor(window.resolution.base_scale_factor());

        if window.resolution.scale_factor_override() != capped {
            debug!("window scale factor override: {capped:?}");
            window.resolution.set_scale_factor_override(capped);
        }
    }
}

#[cfg(feature = "post_process")]
pub fn resize_background(
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window>,
    mut backgrounds: Query<&mut ShaderBackground>,
) {
    let Some(event) = resized.read().last() else {
        return;
    };

    let Ok(window) = windows.get(event.window) else {
        return;
    };

    let resolution = window.physical_size().as_vec2();
    for mut background in &mut backgrounds {
        background.resolution = resolution;
    }
}

/// Backgrounds spawned after startup take the primary window's size right away.
#[cfg(feature = "post_process")]
pub fn init_background_resolution(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut backgrounds: Query<&mut ShaderBackground, Added<ShaderBackground>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let resolution = window.physical_size().as_vec2();
    for mut background in &mut backgrounds {
        background.resolution = resolution;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_capped_at_two() {
        assert_eq!(capped_scale_factor(1.0), None);
        assert_eq!(capped_scale_factor(2.0), None);
        assert_eq!(capped_scale_factor(3.0), Some(2.0));
    }
}
