//! Archive readers for release assets
//!
//! The staging algorithm only talks to [`ArchiveReader`]; the tar and zip
//! implementations are picked by [`ArchiveFormat`], which follows the
//! platform (zip on Windows, tar everywhere else).
//!
//! - [`TarReader`]: `.tar.gz`/`.tgz`, `.tar.xz` or plain `.tar`, chosen from
//!   the archive name. Only the executable member is extracted.
//! - [`ZipReader`]: the whole archive is unpacked into the staging directory.
//!
//! Both readers extract into a scratch directory inside the staging directory
//! and only rename into place once extraction has fully succeeded. The
//! executable is always the last file to appear at its final path, so a file
//! there means the version is completely staged.
//!
//! Leading `/` and `.` components of member names are dropped, the way `tar`
//! unpacks them; members containing `..` are rejected.

use crate::error::ReleaseError;
use log::debug;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar,
    Zip,
}

/// Read access to the members of a downloaded archive
pub trait ArchiveReader {
    /// Names of the regular files in the archive, in archive order
    fn list_members(&mut self) -> Result<Vec<String>, ReleaseError>;

    /// Extracts `member` below `dest_dir`, returning the extracted file path
    fn extract_member(&mut self, member: &str, dest_dir: &Path) -> Result<PathBuf, ReleaseError>;

    /// Places `member` at exactly `executable`, inside `staging_dir`
    ///
    /// The member is extracted into a scratch subdirectory of `staging_dir`,
    /// made executable, moved to `executable`, and the scratch directory is
    /// removed, so any directory nesting inside the archive is dropped.
    fn stage(
        &mut self,
        member: &str,
        staging_dir: &Path,
        executable: &Path,
    ) -> Result<(), ReleaseError> {
        let scratch = scratch_dir(staging_dir)?;

        let extracted = self.extract_member(member, scratch.path())?;
        place_executable(&extracted, executable)?;

        remove_scratch(scratch, staging_dir)
    }
}

/// Opens the downloaded archive at `path` with the reader for `format`
///
/// `archive_name` is the release asset name; the tar reader uses its
/// extension to pick the decompressor.
pub fn open_archive(
    format: ArchiveFormat,
    path: &Path,
    archive_name: &str,
) -> Result<Box<dyn ArchiveReader>, ReleaseError> {
    match format {
        ArchiveFormat::Tar => Ok(Box::new(TarReader::new(path, archive_name))),
        ArchiveFormat::Zip => Ok(Box::new(ZipReader::open(path)?)),
    }
}

/// Finds the first member that is the executable itself or ends with `/{executable}`
pub fn find_executable_member<'a>(members: &'a [String], executable: &str) -> Option<&'a str> {
    let nested_suffix = format!("/{executable}");
    members
        .iter()
        .map(String::as_str)
        .find(|member| *member == executable || member.ends_with(&nested_suffix))
}

/// Relative path a member is unpacked to, `None` if it would leave the destination
///
/// Mirrors `tar::Entry::unpack_in`: root, prefix and `.` components are
/// skipped, `..` is refused.
fn sanitized_member_path(member: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(member).components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => continue,
            Component::ParentDir => return None,
            Component::Normal(part) => relative.push(part),
        }
    }
    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}

fn scratch_dir(staging_dir: &Path) -> Result<TempDir, ReleaseError> {
    tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(staging_dir)
        .map_err(|e| {
            ReleaseError::io(
                format!("create scratch directory in {}", staging_dir.display()),
                e,
            )
        })
}

fn remove_scratch(scratch: TempDir, staging_dir: &Path) -> Result<(), ReleaseError> {
    scratch.close().map_err(|e| {
        ReleaseError::io(format!("remove scratch directory in {}", staging_dir.display()), e)
    })
}

/// Makes `extracted` executable, then renames it to `executable`
fn place_executable(extracted: &Path, executable: &Path) -> Result<(), ReleaseError> {
    #[cfg(unix)]
    set_executable_permissions(extracted)?;

    move_into_place(extracted, executable)
}

/// Sets executable permissions on Unix
#[cfg(unix)]
fn set_executable_permissions(path: &Path) -> Result<(), ReleaseError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path)
        .map_err(|e| ReleaseError::io(format!("get metadata for {}", path.display()), e))?;

    let mut permissions = metadata.permissions();
    let mode = permissions.mode();

    // Add executable bit (owner, group, other)
    permissions.set_mode(mode | 0o111);

    fs::set_permissions(path, permissions)
        .map_err(|e| ReleaseError::io(format!("set permissions for {}", path.display()), e))
}

/// Moves `from` over `to`, first clearing a leftover directory or file at `to`
fn replace_into_place(from: &Path, to: &Path) -> Result<(), ReleaseError> {
    let cleared = match fs::symlink_metadata(to) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(to),
        Ok(_) => fs::remove_file(to),
        Err(_) => Ok(()),
    };
    cleared.map_err(|e| ReleaseError::io(format!("remove stale {}", to.display()), e))?;
    move_into_place(from, to)
}

fn move_into_place(from: &Path, to: &Path) -> Result<(), ReleaseError> {
    fs::rename(from, to).map_err(|e| {
        ReleaseError::io(format!("move {} to {}", from.display(), to.display()), e)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TarCompression {
    Gzip,
    Xz,
    None,
}

impl TarCompression {
    fn from_archive_name(name: &str) -> Self {
        if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            TarCompression::Xz
        } else if name.ends_with(".tar") {
            TarCompression::None
        } else {
            // Release tarballs are gzip unless they say otherwise
            TarCompression::Gzip
        }
    }

    fn label(self) -> &'static str {
        match self {
            TarCompression::Gzip => "tar.gz",
            TarCompression::Xz => "tar.xz",
            TarCompression::None => "tar",
        }
    }
}

/// Tar archive reader
///
/// Tar streams are forward-only, so every operation reopens the file.
#[derive(Debug)]
pub struct TarReader {
    path: PathBuf,
    compression: TarCompression,
}

impl TarReader {
    pub fn new(path: &Path, archive_name: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            compression: TarCompression::from_archive_name(archive_name),
        }
    }

    fn archive(&self) -> Result<tar::Archive<Box<dyn Read>>, ReleaseError> {
        let file = fs::File::open(&self.path)
            .map_err(|e| ReleaseError::io(format!("open archive {}", self.path.display()), e))?;

        let reader: Box<dyn Read> = match self.compression {
            TarCompression::Gzip => Box::new(flate2::read::GzDecoder::new(file)),
            TarCompression::Xz => Box::new(xz2::read::XzDecoder::new(file)),
            TarCompression::None => Box::new(file),
        };

        Ok(tar::Archive::new(reader))
    }

    fn extraction_failed(&self, reason: impl ToString) -> ReleaseError {
        ReleaseError::ExtractionFailed {
            archive_type: self.compression.label().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ArchiveReader for TarReader {
    fn list_members(&mut self) -> Result<Vec<String>, ReleaseError> {
        let mut archive = self.archive()?;
        let mut members = Vec::new();

        for entry in archive
            .entries()
            .map_err(|e| self.extraction_failed(e))?
        {
            let entry = entry.map_err(|e| self.extraction_failed(e))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let path = entry.path().map_err(|e| self.extraction_failed(e))?;
            members.push(path.to_string_lossy().into_owned());
        }

        Ok(members)
    }

    fn extract_member(&mut self, member: &str, dest_dir: &Path) -> Result<PathBuf, ReleaseError> {
        let mut archive = self.archive()?;

        for entry in archive
            .entries()
            .map_err(|e| self.extraction_failed(e))?
        {
            let mut entry = entry.map_err(|e| self.extraction_failed(e))?;
            let is_member = entry
                .path()
                .map_err(|e| self.extraction_failed(e))?
                .to_string_lossy()
                == member;
            if !is_member {
                continue;
            }

            let escapes = || {
                self.extraction_failed(format!("member {member} escapes the extraction directory"))
            };
            let relative = sanitized_member_path(member).ok_or_else(escapes)?;
            let unpacked = entry
                .unpack_in(dest_dir)
                .map_err(|e| self.extraction_failed(e))?;
            if !unpacked {
                return Err(escapes());
            }

            debug!("extracted {member} into {}", dest_dir.display());
            return Ok(dest_dir.join(relative));
        }

        Err(self.extraction_failed(format!("member {member} not found")))
    }
}

/// Zip archive reader
pub struct ZipReader {
    archive: zip::ZipArchive<fs::File>,
}

impl std::fmt::Debug for ZipReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipReader")
            .field("len", &self.archive.len())
            .finish()
    }
}

fn zip_failed(reason: impl ToString) -> ReleaseError {
    ReleaseError::ExtractionFailed {
        archive_type: "zip".to_string(),
        reason: reason.to_string(),
    }
}

impl ZipReader {
    pub fn open(path: &Path) -> Result<Self, ReleaseError> {
        let file = fs::File::open(path)
            .map_err(|e| ReleaseError::io(format!("open archive {}", path.display()), e))?;
        let archive = zip::ZipArchive::new(file).map_err(zip_failed)?;
        Ok(Self { archive })
    }

    fn extract_index(&mut self, index: usize, dest_dir: &Path) -> Result<PathBuf, ReleaseError> {
        let mut file = self.archive.by_index(index).map_err(zip_failed)?;

        let outpath = match file.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => {
                return Err(zip_failed(format!(
                    "member {} escapes the extraction directory",
                    file.name()
                )));
            }
        };

        if file.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| {
                ReleaseError::io(format!("create directory {}", outpath.display()), e)
            })?;
            return Ok(outpath);
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ReleaseError::io(format!("create parent directory {}", parent.display()), e)
            })?;
        }

        let mut outfile = fs::File::create(&outpath)
            .map_err(|e| ReleaseError::io(format!("create file {}", outpath.display()), e))?;

        io::copy(&mut file, &mut outfile)
            .map_err(|e| ReleaseError::io(format!("extract file {}", outpath.display()), e))?;

        Ok(outpath)
    }
}

impl ArchiveReader for ZipReader {
    fn list_members(&mut self) -> Result<Vec<String>, ReleaseError> {
        let mut members = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i).map_err(zip_failed)?;
            if file.is_file() {
                members.push(file.name().to_string());
            }
        }
        Ok(members)
    }

    fn extract_member(&mut self, member: &str, dest_dir: &Path) -> Result<PathBuf, ReleaseError> {
        let index = self
            .archive
            .index_for_name(member)
            .ok_or_else(|| zip_failed(format!("member {member} not found")))?;
        self.extract_index(index, dest_dir)
    }

    /// Unpacks every member into `staging_dir`, with the executable at `executable`
    ///
    /// Everything is unpacked into scratch first. Companion files are moved
    /// into `staging_dir` after the whole archive extracted cleanly, and the
    /// executable is moved last.
    fn stage(
        &mut self,
        member: &str,
        staging_dir: &Path,
        executable: &Path,
    ) -> Result<(), ReleaseError> {
        let scratch = scratch_dir(staging_dir)?;
        let unpacked = scratch.path().join("unpacked");

        let mut extracted_executable = None;
        for i in 0..self.archive.len() {
            let name = self.archive.by_index(i).map_err(zip_failed)?.name().to_string();
            let outpath = self.extract_index(i, &unpacked)?;
            if name == member {
                extracted_executable = Some(outpath);
            }
        }

        let extracted = extracted_executable
            .ok_or_else(|| zip_failed(format!("member {member} not found")))?;
        let file_name = executable
            .file_name()
            .ok_or_else(|| zip_failed(format!("invalid executable path {}", executable.display())))?;
        let held = scratch.path().join(file_name);
        move_into_place(&extracted, &held)?;

        let companions = fs::read_dir(&unpacked)
            .map_err(|e| ReleaseError::io(format!("read {}", unpacked.display()), e))?;
        for companion in companions {
            let companion = companion
                .map_err(|e| ReleaseError::io(format!("read {}", unpacked.display()), e))?;
            replace_into_place(&companion.path(), &staging_dir.join(companion.file_name()))?;
        }

        place_executable(&held, executable)?;
        remove_scratch(scratch, staging_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zitilab_testkit::{
        tar_gz_with_member, tar_xz_with_member, temp_dir_in_workspace, zip_with_member,
    };

    fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_find_executable_member_top_level_and_nested() {
        let members = vec!["README.md".to_string(), "ziti-v1/ziti".to_string()];
        assert_eq!(find_executable_member(&members, "ziti"), Some("ziti-v1/ziti"));

        let members = vec!["ziti".to_string()];
        assert_eq!(find_executable_member(&members, "ziti"), Some("ziti"));
    }

    #[test]
    fn test_find_executable_member_rejects_lookalikes() {
        let members = vec![
            "ziti-edge-tunnel".to_string(),
            "bin/not-ziti".to_string(),
            "ziti.sig".to_string(),
        ];
        assert_eq!(find_executable_member(&members, "ziti"), None);
    }

    #[test]
    fn test_member_paths_are_rooted_in_destination() {
        assert_eq!(
            sanitized_member_path("/opt/ziti-v1/ziti"),
            Some(PathBuf::from("opt/ziti-v1/ziti"))
        );
        assert_eq!(sanitized_member_path("./ziti"), Some(PathBuf::from("ziti")));
        assert_eq!(sanitized_member_path("ziti-v1/../../ziti"), None);
        assert_eq!(sanitized_member_path("/"), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_tar_extract_absolute_member_stays_in_destination() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(
            temp.path(),
            "abs.tar.gz",
            &zitilab_testkit::tar_gz_with_raw_member("/zitilab-abs/ziti", b"inside"),
        );

        let dest = temp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        let mut reader = TarReader::new(&path, "abs.tar.gz");
        let extracted = reader.extract_member("/zitilab-abs/ziti", &dest).unwrap();

        assert_eq!(extracted, dest.join("zitilab-abs").join("ziti"));
        assert_eq!(fs::read(&extracted).unwrap(), b"inside");
    }

    #[test]
    fn test_tar_extract_rejects_parent_traversal() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(
            temp.path(),
            "up.tar.gz",
            &zitilab_testkit::tar_gz_with_raw_member("../ziti", b"outside"),
        );

        let dest = temp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        let mut reader = TarReader::new(&path, "up.tar.gz");
        assert!(matches!(
            reader.extract_member("../ziti", &dest),
            Err(ReleaseError::ExtractionFailed { .. })
        ));
        assert!(!temp.path().join("ziti").exists());
    }

    #[test]
    fn test_tar_gz_lists_only_files() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(
            temp.path(),
            "ziti-linux-amd64-1.0.0.tar.gz",
            &tar_gz_with_member("ziti-v1/ziti", b"bin"),
        );

        let mut reader = TarReader::new(&path, "ziti-linux-amd64-1.0.0.tar.gz");
        assert_eq!(reader.list_members().unwrap(), vec!["ziti-v1/ziti".to_string()]);
    }

    #[test]
    fn test_tar_xz_extract_member() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(
            temp.path(),
            "ziti-darwin-arm64-1.0.0.tar.xz",
            &tar_xz_with_member("ziti", b"xz-bin"),
        );

        let dest = temp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        let mut reader = TarReader::new(&path, "ziti-darwin-arm64-1.0.0.tar.xz");
        let extracted = reader.extract_member("ziti", &dest).unwrap();
        assert_eq!(extracted, dest.join("ziti"));
        assert_eq!(fs::read(&extracted).unwrap(), b"xz-bin");
    }

    #[test]
    fn test_tar_stage_strips_nested_directory() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(
            temp.path(),
            "product-linux-amd64-v1.tar.gz",
            &tar_gz_with_member("product-v1/product", b"nested"),
        );

        let staging = temp.path().join("staging");
        fs::create_dir_all(&staging).unwrap();
        let executable = staging.join("product");

        let mut reader = TarReader::new(&path, "product-linux-amd64-v1.tar.gz");
        reader.stage("product-v1/product", &staging, &executable).unwrap();

        assert_eq!(fs::read(&executable).unwrap(), b"nested");
        // Only the executable is left; the scratch directory is gone
        assert_eq!(zitilab_testkit::count_entries(&staging), 1);
    }

    #[test]
    fn test_corrupted_tar_fails_extraction() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(temp.path(), "ziti-linux-amd64.tar.gz", b"not a real archive");

        let mut reader = TarReader::new(&path, "ziti-linux-amd64.tar.gz");
        assert!(matches!(
            reader.list_members(),
            Err(ReleaseError::ExtractionFailed { .. })
        ));
    }

    #[test]
    fn test_tar_extract_missing_member() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(
            temp.path(),
            "a.tar.gz",
            &tar_gz_with_member("other", b"x"),
        );
        let mut reader = TarReader::new(&path, "a.tar.gz");
        assert!(reader.extract_member("ziti", temp.path()).is_err());
    }

    #[test]
    fn test_zip_lists_members() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(
            temp.path(),
            "ziti-windows-amd64-1.0.0.zip",
            &zip_with_member(&[("ziti.exe", b"exe"), ("LICENSE", b"license")]),
        );

        let mut reader = ZipReader::open(&path).unwrap();
        assert_eq!(
            reader.list_members().unwrap(),
            vec!["ziti.exe".to_string(), "LICENSE".to_string()]
        );
    }

    #[test]
    fn test_zip_stage_unpacks_whole_archive() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(
            temp.path(),
            "ziti-windows-amd64-1.0.0.zip",
            &zip_with_member(&[("ziti.exe", b"exe"), ("LICENSE", b"license")]),
        );

        let staging = temp.path().join("staging");
        fs::create_dir_all(&staging).unwrap();
        let executable = staging.join("ziti.exe");

        let mut reader = ZipReader::open(&path).unwrap();
        reader.stage("ziti.exe", &staging, &executable).unwrap();

        assert_eq!(fs::read(&executable).unwrap(), b"exe");
        assert_eq!(fs::read(staging.join("LICENSE")).unwrap(), b"license");
        // Scratch directory removed after the move
        assert_eq!(zitilab_testkit::count_entries(&staging), 2);
    }

    #[test]
    fn test_zip_stage_moves_nested_executable_up() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(
            temp.path(),
            "ziti-windows-arm64-1.0.0.zip",
            &zip_with_member(&[("ziti-1.0.0/ziti.exe", b"nested-exe")]),
        );

        let staging = temp.path().join("staging");
        fs::create_dir_all(&staging).unwrap();
        let executable = staging.join("ziti.exe");

        let mut reader = ZipReader::open(&path).unwrap();
        reader
            .stage("ziti-1.0.0/ziti.exe", &staging, &executable)
            .unwrap();
        assert_eq!(fs::read(&executable).unwrap(), b"nested-exe");
    }

    #[test]
    fn test_corrupted_zip_fails_to_open() {
        let temp = temp_dir_in_workspace();
        let path = write_archive(temp.path(), "broken.zip", b"PK not really");
        assert!(matches!(
            ZipReader::open(&path),
            Err(ReleaseError::ExtractionFailed { .. })
        ));
    }

    #[test]
    fn test_open_archive_picks_reader_by_format() {
        let temp = temp_dir_in_workspace();
        let tar_path = write_archive(temp.path(), "a.tar.gz", &tar_gz_with_member("ziti", b"t"));
        let zip_path = write_archive(temp.path(), "a.zip", &zip_with_member(&[("ziti.exe", b"z")]));

        let mut tar = open_archive(ArchiveFormat::Tar, &tar_path, "a.tar.gz").unwrap();
        assert_eq!(tar.list_members().unwrap(), vec!["ziti".to_string()]);

        let mut zip = open_archive(ArchiveFormat::Zip, &zip_path, "a.zip").unwrap();
        assert_eq!(zip.list_members().unwrap(), vec!["ziti.exe".to_string()]);
    }
}
