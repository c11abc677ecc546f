use std::path::PathBuf;

use log::debug;
use mirage_core::{MirrorError, MirrorResult};

use crate::win_api;
use crate::win32::HMODULE;

/// File path of the DLL (or executable) identified by `module`.
pub fn module_path(module: HMODULE) -> MirrorResult<PathBuf> {
    let path = win_api::module_file_name(module)
        .map_err(|e| MirrorError::Window(format!("GetModuleFileNameW failed: {e:?}")))?;
    debug!("Module path: {}", path.display());
    Ok(path)
}
