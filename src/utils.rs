use bevy::prelude::*;
use bevy_args::{
    Deserialize,
    Parser,
    Serialize,
};

use crate::session::{
    Session,
    Variant,
    DEFAULT_MODEL_PATH,
    DEFAULT_TEXTURE_PATH,
};


#[derive(
    Debug,
    Resource,
    Serialize,
    Deserialize,
    Parser,
)]
#[command(about = "bevy_skull_points viewer", version, long_about = None)]
pub struct SkullPointsViewer {
    #[arg(long, default_value = "true")]
    pub editor: bool,

    #[arg(long, default_value = "true")]
    pub press_esc_close: bool,

    #[arg(long, default_value = "true")]
    pub show_fps: bool,

    #[arg(long, default_value = "1920.0")]
    pub width: f32,

    #[arg(long, default_value = "1080.0")]
    pub height: f32,

    #[arg(long, default_value = "bevy_skull_points")]
    pub name: String,

    #[arg(long, default_value = "1")]
    pub msaa_samples: u8,

    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    pub model_path: String,

    #[arg(long, default_value = DEFAULT_TEXTURE_PATH)]
    pub texture_path: String,

    #[arg(long, value_enum, default_value_t = Variant::Classic)]
    pub variant: Variant,

    /// Zero keeps the variant's own count.
    #[arg(long, default_value = "0")]
    pub point_count: usize,

    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for SkullPointsViewer {
    fn default() -> SkullPointsViewer {
        SkullPointsViewer {
            editor: true,
            press_esc_close: true,
            show_fps: true,
            width: 1920.0,
            height: 1080.0,
            name: "bevy_skull_points".to_string(),
            msaa_samples: 1,
            model_path: DEFAULT_MODEL_PATH.to_string(),
            texture_path: DEFAULT_TEXTURE_PATH.to_string(),
            variant: Variant::Classic,
            point_count: 0,
            seed: None,
        }
    }
}

impl SkullPointsViewer {
    pub fn session(&self) -> Session {
        let mut session = Session::new(self.variant);

        if self.point_count > 0 {
            session.point_count = self.point_count;
        }
        session.seed = self.seed;
        session.model_path = self.model_path.clone();
        session.texture_path = self.texture_path.clone();
        session.msaa_samples = self.msaa_samples;

        session
    }
}


pub fn setup_hooks() {
    #[cfg(debug_assertions)]
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
    }
}


pub fn log(_msg: &str) {
    #[cfg(debug_assertions)]
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::console::log_1(&_msg.into());
    }
    #[cfg(debug_assertions)]
    #[cfg(not(target_arch = "wasm32"))]
    {
        println!("{}", _msg);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_variant_defaults() {
        let viewer = SkullPointsViewer::parse_from([
            "bevy_skull_points",
            "--variant",
            "post-processed",
            "--seed",
            "7",
        ]);
        let session = viewer.session();

        assert_eq!(session.variant, Variant::PostProcessed);
        assert_eq!(session.point_count, 99_000);
        assert_eq!(session.seed, Some(7));
    }

    #[test]
    fn explicit_point_count_wins() {
        let viewer = SkullPointsViewer {
            point_count: 123,
            ..default()
        };
        assert_eq!(viewer.session().point_count, 123);
    }
}
