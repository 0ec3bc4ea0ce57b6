//! Request extractors for LDP headers and credentials

mod credentials;
mod headers;
mod links;
mod negotiate;

pub use credentials::{Agent, UserTable};
pub use headers::LdpHeaders;
pub use links::{Link, RequestLinks, ResponseLinks};
pub use negotiate::negotiate;
