//! m2v core: resolve a descriptor graph and mirror every file it reaches.
//!
//! Resolution runs as a single worklist over descriptor references. Listings
//! of flat-layout directories and catalog pages feed the frontier; each
//! processed descriptor routes its dependencies back into one of the two
//! resolvers. Once the frontier drains, [`io::mirror`] materializes the
//! collected download links under a local repository root.

pub mod config;
pub mod error;
pub mod io;
pub mod markup;
pub mod paths;
pub mod reporter;
pub mod resolve;

pub use config::MirrorConfig;
pub use error::{Fetch, ResolveError, TransportError};
pub use io::mirror::{Mirror, MirrorReport};
pub use io::transport::{HttpTransport, Transport};
pub use reporter::{NullReporter, Reporter};
pub use resolve::{EntryPoint, Resolution, Resolver};
