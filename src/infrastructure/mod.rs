pub mod blob;
pub mod http;
pub mod liveness;
pub mod saver;

pub use blob::{BlobStore, BlobUrl, TransientBlob};
pub use http::{HttpResponse, HttpTransport, ReqwestTransport, RequestBody, TransportFailure};
pub use liveness::Liveness;
pub use saver::{DirectorySaver, ReportSaver};
