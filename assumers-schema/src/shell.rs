use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Unknown(String),
}

impl Shell {
    pub fn from_process_path<P: AsRef<Path>>(process_path: P) -> Option<Shell> {
        let process = process_path.as_ref().file_stem().and_then(|f| f.to_str());
        process.map(|p| match p {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "fish" => Shell::Fish,
            _ => Shell::Unknown(p.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_shells_from_path() {
        assert_eq!(Shell::from_process_path("/bin/bash"), Some(Shell::Bash));
        assert_eq!(Shell::from_process_path("/usr/local/bin/zsh"), Some(Shell::Zsh));
        assert_eq!(Shell::from_process_path("fish"), Some(Shell::Fish));
    }

    #[test]
    fn keeps_unknown_shell_name() {
        assert_eq!(
            Shell::from_process_path("/usr/bin/nu"),
            Some(Shell::Unknown("nu".to_string()))
        );
        assert_eq!(Shell::from_process_path(""), None);
    }
}
