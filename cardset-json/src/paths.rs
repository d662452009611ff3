use directories::ProjectDirs;
use std::path::PathBuf;

pub fn data_root() -> PathBuf {
    if let Some(pd) = ProjectDirs::from("com", "cardset", "Cardset") {
        pd.data_dir().to_path_buf()
    } else {
        // Fallback: current dir
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

pub fn config_file() -> PathBuf {
    if let Some(pd) = ProjectDirs::from("com", "cardset", "Cardset") {
        pd.config_dir().join("config.toml")
    } else {
        PathBuf::from("cardset.toml")
    }
}

pub fn backups_dir(root: &std::path::Path) -> PathBuf {
    root.join("backups")
}
