//! Filesystem run archive.

mod fs_archive;

pub use fs_archive::FsRunArchive;
