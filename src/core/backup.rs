use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use flate2::Compression;
use flate2::write::GzEncoder;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database to `dest_file`, optionally compressed (zip on
    /// Windows, tar.gz elsewhere). An existing destination is only
    /// replaced with `force`.
    pub fn backup(
        db_path: &str,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<PathBuf> {
        let src = Path::new(db_path);
        let dest = Path::new(dest_file);

        // 1️⃣ Check DB exists
        if !src.exists() {
            return Err(AppError::not_found("Database", src.display()));
        }

        // 2️⃣ Destination folder and overwrite check
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let final_target = if compress { compressed_path(dest) } else { dest.to_path_buf() };
        if final_target.exists() && !force {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists (use --force to overwrite)", final_target.display()),
            )));
        }

        // 3️⃣ Copy database
        fs::copy(src, dest)?;
        info(format!("Database copied to {}", dest.display()));

        // 4️⃣ Optional compression
        let final_path = if compress {
            let compressed = compress_backup(dest)?;
            if compressed != dest
                && let Err(e) = fs::remove_file(dest)
            {
                warning(format!("Failed to remove uncompressed backup: {e}"));
            }
            compressed
        } else {
            dest.to_path_buf()
        };

        success(format!("Backup created: {}", final_path.display()));

        // 5️⃣ Log in DB
        if let Ok(conn) = Connection::open(src) {
            audit(
                &conn,
                "backup",
                &final_path.to_string_lossy(),
                if compress {
                    "Backup created and compressed"
                } else {
                    "Backup created"
                },
            );
        }

        Ok(final_path)
    }
}

fn compressed_path(path: &Path) -> PathBuf {
    if cfg!(windows) {
        path.with_extension("zip")
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".tar.gz");
        PathBuf::from(name)
    }
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fieldops.sqlite".to_string())
}

fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let out = compressed_path(path);
    if cfg!(windows) {
        let file = fs::File::create(&out)?;
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut f = fs::File::open(path)?;
        zip.start_file(entry_name(path), options)
            .map_err(std::io::Error::other)?;
        std::io::copy(&mut f, &mut zip)?;
        zip.finish().map_err(std::io::Error::other)?;
    } else {
        let file = fs::File::create(&out)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut archive = tar::Builder::new(encoder);
        archive.append_path_with_name(path, entry_name(path))?;
        archive.into_inner()?.finish()?;
    }
    Ok(out)
}
