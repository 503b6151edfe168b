use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const SPECS_FILE: &str = "specs.json";
pub const CONFIG_FILE: &str = "taskgen.yaml";

pub fn specs_file(data_dir: &Path) -> PathBuf {
    data_dir.join(SPECS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specs_file_lives_in_data_dir() {
        let p = specs_file(Path::new("/srv/taskgen"));
        assert_eq!(p, PathBuf::from("/srv/taskgen/specs.json"));
    }
}
