pub mod manifest;

pub use manifest::{fetch_manifest, StreamEntry, StreamManifest, TEST_STREAMS_MANIFEST_URL};
