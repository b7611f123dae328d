//! Jobtrail engine: page extraction, record persistence and host wiring.
mod classify;
mod document;
mod extract;
mod host;
mod layout;
mod local;
mod messages;
mod orchestrator;
mod persist;
mod poll;
mod sanitize;
mod store;
mod types;

pub use classify::{classify_detail, classify_details, DetailKind, EmploymentDetails};
pub use document::{Document, LiveDocument, StaticDocument};
pub use extract::{ExtractionSettings, JobExtractor, TimeoutPolicy};
pub use host::{ExtractionHost, KvHost, MemoryHost, PanelHost};
pub use layout::PageLayout;
pub use local::LocalExtractionHost;
pub use messages::{NavigationEvent, Request, Response};
pub use orchestrator::{Orchestrator, OrchestratorSettings, DEFAULT_RECENT_LIMIT};
pub use persist::{ensure_data_dir, AtomicFileWriter, FileHost, PersistError};
pub use poll::poll_until;
pub use sanitize::DescriptionSanitizer;
pub use store::{RecordStore, SessionFlag, JOBS_KEY, LOGIN_KEY};
pub use types::{ExtractError, Field, HostError, LayoutError, StoreError};
