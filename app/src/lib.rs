pub mod sync;
pub mod transfer;

/// 公共API的prelude模块
/// 用户可以通过 `use app::prelude::*` 来导入最常用的类型
pub mod prelude {
    pub use crate::sync::{sync_folder, SyncOptions, SyncReport, TransferTask};
    pub use crate::transfer::{create_folder, download, upload, upload_file, UploadOutcome};
    pub use storage::{RemoteKey, RemoteStore, StorageError, WriteMode};
}
