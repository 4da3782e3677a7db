//! In-memory release fixtures
//!
//! Builds the archives and release-index JSON that a GitHub release feed would
//! serve, so tests never touch the network.

use std::io::Write;

/// Shell script standing in for the product executable
pub const FAKE_EXECUTABLE: &[u8] = b"#!/bin/sh\necho 'ziti v0.0.0-test'\n";

fn tar_bytes<W: Write>(writer: W, member: &str, content: &[u8]) -> W {
    let mut builder = tar::Builder::new(writer);

    // Parent directories get their own entries, like real release tarballs
    let mut prefix = String::new();
    let parts: Vec<&str> = member.split('/').collect();
    for dir in &parts[..parts.len() - 1] {
        prefix.push_str(dir);
        prefix.push('/');
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, &prefix, std::io::empty())
            .expect("Failed to append directory entry");
    }

    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, member, content)
        .expect("Failed to append file entry");

    builder.into_inner().expect("Failed to finish tar archive")
}

/// Builds a `.tar.gz` containing a single file `member` (e.g. `ziti-v1/ziti`)
pub fn tar_gz_with_member(member: &str, content: &[u8]) -> Vec<u8> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    tar_bytes(encoder, member, content)
        .finish()
        .expect("Failed to finish gzip stream")
}

/// Builds a `.tar.gz` whose single member name is written verbatim into the header
///
/// `tar::Builder` refuses absolute and `..` names; real-world archives do not,
/// so this writes the name bytes directly. `name` must fit in 100 bytes.
pub fn tar_gz_with_raw_member(name: &str, content: &[u8]) -> Vec<u8> {
    assert!(name.len() <= 100, "raw member name too long: {name}");

    let mut header = tar::Header::new_gnu();
    header.as_old_mut().name[..name.len()].copy_from_slice(name.as_bytes());
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();

    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder
        .append(&header, content)
        .expect("Failed to append raw entry");
    builder
        .into_inner()
        .expect("Failed to finish tar archive")
        .finish()
        .expect("Failed to finish gzip stream")
}

/// Builds a `.tar.xz` containing a single file `member`
pub fn tar_xz_with_member(member: &str, content: &[u8]) -> Vec<u8> {
    let encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    tar_bytes(encoder, member, content)
        .finish()
        .expect("Failed to finish xz stream")
}

/// Builds a `.zip` containing the given `(name, content)` files
pub fn zip_with_member(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options: zip::write::FileOptions<'_, ()> =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, content) in files {
        zip.start_file(*name, options)
            .expect("Failed to start zip entry");
        zip.write_all(content).expect("Failed to write zip entry");
    }

    zip.finish()
        .expect("Failed to finish zip archive")
        .into_inner()
}

/// Release-index JSON as served by `GET /repos/{owner}/{name}/releases/...`
pub fn release_json(tag: &str, asset_names: &[&str]) -> String {
    let assets: Vec<serde_json::Value> = asset_names
        .iter()
        .map(|name| {
            serde_json::json!({
                "name": name,
                "size": 0,
                "browser_download_url": format!("https://github.com/openziti/ziti/releases/download/{tag}/{name}"),
            })
        })
        .collect();

    serde_json::json!({
        "tag_name": tag,
        "name": tag,
        "draft": false,
        "prerelease": false,
        "assets": assets,
    })
    .to_string()
}
