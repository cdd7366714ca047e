use crate::error::{AppError, FileError, Result};
use crate::models::person::ResearchRequest;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载一次调研请求
///
/// 文件格式：
/// ```toml
/// user_notes = "Met at RustConf 2024"
///
/// [person]
/// email = "ada@example.com"
/// name = "Ada Lovelace"
/// ```
pub async fn load_request(toml_file_path: &Path) -> Result<ResearchRequest> {
    let path_str = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let mut request: ResearchRequest =
        toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
            path: path_str.clone(),
            source: Box::new(e),
        })?;

    // 设置文件路径
    request.file_path = Some(path_str);

    Ok(request)
}

/// 从文件夹中加载所有 TOML 调研请求，按文件名排序
///
/// 单个文件解析失败只记录警告，不影响其他文件
pub async fn load_all_requests(folder_path: &str) -> Result<Vec<ResearchRequest>> {
    let folder = PathBuf::from(folder_path);

    if !folder.is_dir() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut requests = Vec::with_capacity(paths.len());
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_request(&path).await {
            Ok(request) => {
                tracing::info!("成功加载调研对象 {}", request.person);
                requests.push(request);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    #[tokio::test]
    async fn test_load_request_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ada.toml");
        std_fs::write(
            &path,
            r#"
user_notes = "Focus on early career"

[person]
email = "ada@example.com"
name = "Ada Lovelace"
linkedin = "https://www.linkedin.com/in/ada"
"#,
        )
        .unwrap();

        let request = load_request(&path).await.unwrap();
        assert_eq!(request.person.email, "ada@example.com");
        assert_eq!(request.person.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(request.user_notes.as_deref(), Some("Focus on early career"));
        assert!(request.file_path.unwrap().ends_with("ada.toml"));
    }

    #[tokio::test]
    async fn test_load_all_skips_bad_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std_fs::write(dir.path().join("b.toml"), "[person]\nemail = \"b@example.com\"\n").unwrap();
        std_fs::write(dir.path().join("a.toml"), "[person]\nemail = \"a@example.com\"\n").unwrap();
        // 缺少必填的 email
        std_fs::write(dir.path().join("c.toml"), "[person]\nname = \"No Email\"\n").unwrap();
        std_fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let requests = load_all_requests(dir.path().to_str().unwrap()).await.unwrap();
        let emails: Vec<&str> = requests.iter().map(|r| r.person.email.as_str()).collect();
        assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn test_missing_folder_is_an_error() {
        let err = load_all_requests("/definitely/not/here").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::DirectoryNotFound { .. })
        ));
    }
}
