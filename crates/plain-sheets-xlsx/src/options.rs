//! XLSX writer options

use chrono::{DateTime, Utc};

/// Options for writing XLSX packages
#[derive(Debug, Clone)]
pub struct XlsxWriteOptions {
    /// `dc:creator` in `docProps/core.xml`
    pub creator: String,
    /// `Application` in `docProps/app.xml`
    pub application: String,
    /// `AppVersion` in `docProps/app.xml`
    pub app_version: String,
    /// How zip entries are stored
    pub compression: Compression,
    /// Creation stamp for `docProps/core.xml` and the zip entries.
    /// `None` uses the time of the save.
    pub created: Option<DateTime<Utc>>,
}

impl Default for XlsxWriteOptions {
    fn default() -> Self {
        Self {
            creator: "plain-sheets".to_string(),
            application: "Microsoft Excel".to_string(),
            app_version: "16.0300".to_string(),
            compression: Compression::Deflated,
            created: None,
        }
    }
}

impl XlsxWriteOptions {
    /// Set the document creator
    pub fn creator<S: Into<String>>(mut self, creator: S) -> Self {
        self.creator = creator.into();
        self
    }

    /// Set the entry compression
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Pin the creation stamp, making the output reproducible
    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

/// Zip entry compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Deflate (what Excel writes)
    #[default]
    Deflated,
    /// No compression
    Stored,
}

impl Compression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            Compression::Deflated => zip::CompressionMethod::Deflated,
            Compression::Stored => zip::CompressionMethod::Stored,
        }
    }
}
