//! Builder for zip archives assembled in memory

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Fluent zip builder; entries keep insertion order
#[derive(Debug, Clone, Default)]
pub struct ZipBuilder {
    entries: Vec<(String, Option<Vec<u8>>)>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory entry; a trailing `/` is added when missing
    pub fn dir(mut self, name: &str) -> Self {
        let name = if name.ends_with('/') {
            name.to_string()
        } else {
            format!("{}/", name)
        };
        self.entries.push((name, None));
        self
    }

    pub fn file(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push((name.to_string(), Some(content.to_vec())));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        for (name, content) in self.entries {
            match content {
                None => zip.add_directory(name, options).unwrap(),
                Some(bytes) => {
                    zip.start_file(name, options).unwrap();
                    zip.write_all(&bytes).unwrap();
                }
            }
        }

        zip.finish().unwrap().into_inner()
    }
}

/// `x-1.0/` wrapper holding a binary and a readme
pub fn wrapped_x_zip() -> Vec<u8> {
    ZipBuilder::new()
        .dir("x-1.0")
        .file("x-1.0/bin/x.exe", super::constants::FAKE_EXE)
        .file("x-1.0/README.txt", b"x readme")
        .build()
}

/// Files at the archive root, no common folder
pub fn flat_x_zip() -> Vec<u8> {
    ZipBuilder::new()
        .file("x.exe", super::constants::FAKE_EXE)
        .dir("lib")
        .file("lib/x.dll", b"dll")
        .build()
}
