// Extraction capability for catalog videos
//
// `MediaExtractor` is the seam; `YtDlpExtractor` is the production
// implementation. Tests substitute their own.

mod traits;
mod ytdlp;

pub use traits::{DownloadedMedia, ExtractorConfig, MediaExtractor};
pub use ytdlp::{Launcher, YtDlpExtractor};
