use super::*;
use std::path::PathBuf;

#[test]
fn bare_file_names_need_no_directory() {
    ensure_parent_dir(Path::new("out.mp4")).unwrap();
}

#[test]
fn missing_parents_are_created() {
    let dir = PathBuf::from("target").join("fs_unit").join("a").join("b");
    let _ = std::fs::remove_dir_all(&dir);
    ensure_parent_dir(&dir.join("frame.png")).unwrap();
    assert!(dir.is_dir());
}
