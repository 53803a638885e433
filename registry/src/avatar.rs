use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tempfile::TempPath;
use unicode_normalization::UnicodeNormalization;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Prefix under which stored avatars are referenced from player records.
pub const AVATAR_URL_PREFIX: &str = "avatars";

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Reads a local image file as if it had been uploaded under its own name.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { filename, bytes })
    }
}

pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduces a client supplied filename to a plain ASCII basename that is safe
/// to join onto the avatar directory. Accented letters keep their base
/// letter, path separators split words. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename.nfkd().filter(char::is_ascii).collect();
    let mut flattened = ascii.replace('/', " ");
    if MAIN_SEPARATOR != '/' {
        flattened = flattened.replace(MAIN_SEPARATOR, " ");
    }
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_FILENAME_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// An accepted upload written under a temporary name next to its final
/// location. Dropping it without [`AvatarStore::commit`] removes the
/// temporary file and leaves any existing avatar of the same name untouched.
#[derive(Debug)]
pub struct StagedAvatar {
    filename: String,
    temp: TempPath,
}

impl StagedAvatar {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Relative reference stored on the player record.
    pub fn reference(&self) -> String {
        format!("{AVATAR_URL_PREFIX}/{}", self.filename)
    }
}

#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Writes an accepted upload aside without replacing anything. Returns
    /// `None` when the upload is not an accepted image.
    async fn stage(&self, upload: &AvatarUpload) -> std::io::Result<Option<StagedAvatar>>;

    /// Moves a staged avatar to its final name and returns its reference.
    async fn commit(&self, staged: StagedAvatar) -> std::io::Result<String>;
}

pub struct FsAvatarStore {
    dir: PathBuf,
}

impl FsAvatarStore {
    pub async fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl AvatarStore for FsAvatarStore {
    async fn stage(&self, upload: &AvatarUpload) -> std::io::Result<Option<StagedAvatar>> {
        if !allowed_file(&upload.filename) {
            log::info!("Ignoring avatar {:?}: unsupported extension", upload.filename);
            return Ok(None);
        }

        let filename = secure_filename(&upload.filename);
        if filename.is_empty() {
            log::info!("Ignoring avatar {:?}: no usable filename", upload.filename);
            return Ok(None);
        }

        let temp = tempfile::Builder::new()
            .prefix(".avatar-")
            .suffix(".part")
            .tempfile_in(&self.dir)?
            .into_temp_path();
        tokio::fs::write(&temp, &upload.bytes).await?;
        log::debug!("Staged avatar {} at {}", filename, temp.display());

        Ok(Some(StagedAvatar { filename, temp }))
    }

    async fn commit(&self, staged: StagedAvatar) -> std::io::Result<String> {
        let reference = staged.reference();
        let path = self.dir.join(&staged.filename);
        staged.temp.persist(&path).map_err(|e| e.error)?;
        log::debug!("Stored avatar at {}", path.display());
        Ok(reference)
    }
}

/// Avatar store that accepts nothing, for registries without uploads.
pub struct NoopAvatarStore;

#[async_trait]
impl AvatarStore for NoopAvatarStore {
    async fn stage(&self, _upload: &AvatarUpload) -> std::io::Result<Option<StagedAvatar>> {
        Ok(None)
    }

    async fn commit(&self, staged: StagedAvatar) -> std::io::Result<String> {
        Ok(staged.reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(allowed_file("me.png"));
        assert!(allowed_file("me.JPG"));
        assert!(allowed_file("me.Jpeg"));
        assert!(allowed_file("archive.tar.png"));
        assert!(!allowed_file("me.gif"));
        assert!(!allowed_file("png"));
        assert!(!allowed_file("me.png.exe"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My cool avatar.png"), "My_cool_avatar.png");
        assert_eq!(secure_filename("../../etc/passwd.png"), "etc_passwd.png");
        assert_eq!(secure_filename("héllo.png"), "hello.png");
        assert_eq!(secure_filename("ｆａｃｅ.png"), "face.png");
        assert_eq!(secure_filename("日本.png"), "png");
        assert_eq!(secure_filename("..."), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_secure_filename_keeps_backslash_paths_as_one_name() {
        assert_eq!(secure_filename("C:\\Users\\me\\pic.jpg"), "CUsersmepic.jpg");
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_stage_and_commit_accepted_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAvatarStore::open(dir.path().join("avatars")).await.unwrap();

        let staged = store
            .stage(&AvatarUpload::new("face.PNG", vec![1, 2, 3]))
            .await
            .unwrap()
            .expect("png uploads are accepted");
        assert_eq!(staged.filename(), "face.PNG");
        assert!(!store.dir().join("face.PNG").exists());

        let reference = store.commit(staged).await.unwrap();

        assert_eq!(reference, "avatars/face.PNG");
        let written = std::fs::read(store.dir().join("face.PNG")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
        assert_eq!(dir_entries(store.dir()), vec!["face.PNG"]);
    }

    #[tokio::test]
    async fn test_dropped_stage_keeps_existing_avatar() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAvatarStore::open(dir.path()).await.unwrap();

        let first = store
            .stage(&AvatarUpload::new("face.png", b"A".to_vec()))
            .await
            .unwrap()
            .unwrap();
        store.commit(first).await.unwrap();

        let second = store
            .stage(&AvatarUpload::new("face.png", b"B".to_vec()))
            .await
            .unwrap()
            .unwrap();
        drop(second);

        assert_eq!(std::fs::read(dir.path().join("face.png")).unwrap(), b"A".to_vec());
        assert_eq!(dir_entries(dir.path()), vec!["face.png"]);
    }

    #[tokio::test]
    async fn test_stage_ignores_unsupported_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAvatarStore::open(dir.path()).await.unwrap();

        let staged = store
            .stage(&AvatarUpload::new("anim.gif", vec![0]))
            .await
            .unwrap();

        assert!(staged.is_none());
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("static").join("avatars");

        FsAvatarStore::open(&nested).await.unwrap();

        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_upload_from_path_uses_basename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portrait.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        let upload = AvatarUpload::from_path(&path).await.unwrap();

        assert_eq!(upload.filename, "portrait.jpg");
        assert_eq!(upload.bytes, b"jpeg".to_vec());
    }
}
