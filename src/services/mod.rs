mod chunker;
mod completion;
mod embedding;
mod index;
mod reassembly;
mod responder;
mod uploader;

pub use chunker::TextChunker;
pub use completion::{Completer, CompletionClient};
pub use embedding::{Embedder, EmbeddingClient};
pub use index::{CollectionInfo, QdrantIndex, VectorIndex};
pub use reassembly::reassemble;
pub use responder::answer_query;
pub use uploader::{UploadReport, build_records, upload_records};
