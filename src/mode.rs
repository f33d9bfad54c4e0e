//! Open-mode bits for file handles.

use bitflags::bitflags;

bitflags! {
    /// The mode a file is opened in, as a bit-set.
    ///
    /// The numeric values mirror the POSIX `O_*` constants on Linux.
    /// Read-only is the empty set, per POSIX, so it cannot be tested as
    /// a bit; use [`OpenMode::is_read_only`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenMode: u32 {
        /// Open for writing only.
        const WRONLY = 0o1;
        /// Open for reading and writing.
        const RDWR = 0o2;
        /// Create the file if it does not exist.
        const CREATE = 0o100;
        /// With `CREATE`: fail if the file already exists.
        const EXCL = 0o200;
        /// Truncate the file to zero length on open.
        const TRUNC = 0o1000;
        /// Position every write at the end of the file.
        const APPEND = 0o2000;
    }
}

impl OpenMode {
    /// Open for reading only. Zero, per POSIX.
    pub const RDONLY: OpenMode = OpenMode::empty();

    /// The mode `create_file` opens with: read-write, create, and fail
    /// if the path already exists.
    pub const CREATE_FILE: OpenMode =
        OpenMode::RDWR.union(OpenMode::CREATE).union(OpenMode::EXCL);

    pub fn is_write_allowed(self) -> bool {
        self.contains(OpenMode::WRONLY) || self.contains(OpenMode::RDWR)
    }

    pub fn is_read_only(self) -> bool {
        !self.is_write_allowed()
    }

    pub fn is_write_only(self) -> bool {
        self.contains(OpenMode::WRONLY)
    }

    pub fn is_create(self) -> bool {
        self.contains(OpenMode::CREATE)
    }

    pub fn is_append(self) -> bool {
        self.contains(OpenMode::APPEND)
    }

    /// Truncation only applies when the mode also allows writing.
    pub fn is_truncate(self) -> bool {
        self.is_write_allowed() && self.contains(OpenMode::TRUNC)
    }

    /// `EXCL` only applies when `CREATE` is set.
    pub fn is_exclusive(self) -> bool {
        self.is_create() && self.contains(OpenMode::EXCL)
    }
}
