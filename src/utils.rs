//! Small helpers shared across modules.

use std::path::Path;

/// Display a path with the home directory replaced by `~`.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        return if rest.as_os_str().is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", rest.display())
        };
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_path_hides_home() {
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".config").join("centinela");
            assert_eq!(private_path(&path), "~/.config/centinela");
            assert_eq!(private_path(&home), "~");
        }
    }

    #[test]
    fn test_private_path_leaves_other_paths() {
        assert_eq!(private_path(Path::new("/etc/centinela")), "/etc/centinela");
    }
}
