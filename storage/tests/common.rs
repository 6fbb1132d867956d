use std::fs;
use tempfile::TempDir;

/// 创建一个已有内容的本地"远端"目录
pub fn create_remote_structure() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("dest/sub")).unwrap();
    fs::write(root.join("dest/a.txt"), b"remote a").unwrap();
    fs::write(root.join("dest/sub/b.txt"), b"remote b").unwrap();
    fs::write(root.join("dest/empty.txt"), b"").unwrap();

    temp_dir
}
