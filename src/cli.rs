// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::rooms::SceneKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "museum-walk")]
#[command(about = "Walkable 3D museum", long_about = None)]
pub struct Cli {
    /// JSON config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding models/ and textures/
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Scene to start in: lobby, music, painter, literary or museum
    #[arg(long)]
    pub scene: Option<SceneKind>,

    /// Walking speed in units per second
    #[arg(long)]
    pub speed: Option<f32>,

    /// Disable UI elements
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_everything_unset() {
        let cli = Cli::parse_from(["museum-walk"]);
        assert!(cli.config.is_none() && cli.scene.is_none() && cli.speed.is_none());
        assert!(!cli.no_ui);
    }

    #[test]
    fn scene_accepts_short_names() {
        let cli = Cli::parse_from(["museum-walk", "--scene", "literary"]);
        assert_eq!(cli.scene, Some(SceneKind::LiteraryRoom));
        assert!(Cli::try_parse_from(["museum-walk", "--scene", "attic"]).is_err());
    }
}
