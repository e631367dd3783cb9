//! Game client layout on disk.
//!
//! Each supported client version keeps its logs under
//! `<appdata>/<app>/clients/<folder>/` with a `logs/` and a `crash-reports/`
//! subdirectory.

pub mod locator;
pub mod version;

pub use locator::{ClientLayout, FML_LOG, LATEST_LOG, find_latest_crash_report};
pub use version::{GameVersion, ParseVersionError};
