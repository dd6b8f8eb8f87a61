// Resolution and retrieval core
//
// dispatcher -> catalog (extractors, storage) | probe
//            -> responder for materialized files

pub mod catalog;
pub mod dispatcher;
pub mod errors;
pub mod extractors;
pub mod models;
pub mod probe;
pub mod responder;
pub mod storage;
pub mod utils;

pub use catalog::CatalogResolver;
pub use dispatcher::Dispatcher;
pub use errors::{ErrorKind, FetchError};
pub use extractors::{DownloadedMedia, ExtractorConfig, MediaExtractor, YtDlpExtractor};
pub use models::{
    ExtractedMetadata, FormatEntry, ResolutionRequest, ResourceClass, RetrievedFile, SizeResult,
    Strictness, VIDEO_MIME_TYPE,
};
pub use probe::{HttpProber, LinkProber};
pub use responder::stream_file;
pub use storage::{DownloadDir, DownloadStore};
